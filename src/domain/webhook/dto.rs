//! LemonSqueezy resource shapes carried in webhook `data`.
//!
//! Field names follow the provider's snake_case wire format. Enum-valued
//! fields are closed: an unknown value fails deserialization.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════
// Enumerations
// ════════════════════════════════════════════════════════════════════

/// Subscription status as reported by LemonSqueezy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSubscriptionStatus {
    OnTrial,
    Active,
    Paused,
    PastDue,
    Unpaid,
    Cancelled,
    Expired,
}

impl ProviderSubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSubscriptionStatus::OnTrial => "on_trial",
            ProviderSubscriptionStatus::Active => "active",
            ProviderSubscriptionStatus::Paused => "paused",
            ProviderSubscriptionStatus::PastDue => "past_due",
            ProviderSubscriptionStatus::Unpaid => "unpaid",
            ProviderSubscriptionStatus::Cancelled => "cancelled",
            ProviderSubscriptionStatus::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Void,
    Refunded,
    PartialRefund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingReason {
    Initial,
    Renewal,
    Updated,
}

// ════════════════════════════════════════════════════════════════════
// Subscription
// ════════════════════════════════════════════════════════════════════

/// A `subscriptions` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    /// LemonSqueezy's subscription id.
    pub id: String,
    pub attributes: SubscriptionAttributes,
    #[serde(default)]
    pub relationships: serde_json::Value,
    #[serde(default)]
    pub links: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionAttributes {
    pub store_id: i64,
    pub customer_id: i64,
    pub order_id: i64,
    pub order_item_id: i64,
    pub product_id: i64,
    pub variant_id: i64,
    pub product_name: String,
    pub variant_name: String,
    pub user_name: String,
    pub user_email: String,
    pub status: ProviderSubscriptionStatus,
    pub status_formatted: String,
    pub card_brand: Option<String>,
    pub card_last_four: Option<String>,
    pub pause: Option<SubscriptionPause>,
    pub cancelled: bool,
    pub trial_ends_at: Option<Timestamp>,
    pub billing_anchor: i64,
    pub renews_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub test_mode: bool,
    pub first_subscription_item: Option<FirstSubscriptionItem>,
    #[serde(default)]
    pub urls: SubscriptionUrls,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPause {
    /// `void` or `free`.
    pub mode: String,
    pub resumes_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstSubscriptionItem {
    pub id: i64,
    pub subscription_id: i64,
    pub price_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub is_usage_based: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUrls {
    pub update_payment_method: Option<String>,
    pub customer_portal: Option<String>,
    pub customer_portal_update_subscription: Option<String>,
}

// ════════════════════════════════════════════════════════════════════
// Invoice
// ════════════════════════════════════════════════════════════════════

/// A `subscription-invoices` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub attributes: InvoiceAttributes,
    #[serde(default)]
    pub relationships: serde_json::Value,
    #[serde(default)]
    pub links: serde_json::Value,
}

/// Monetary amounts are in the currency's minor unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAttributes {
    pub store_id: i64,
    pub subscription_id: i64,
    pub customer_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub billing_reason: BillingReason,
    pub card_brand: Option<String>,
    pub card_last_four: Option<String>,
    pub currency: String,
    pub currency_rate: String,
    pub status: InvoiceStatus,
    pub status_formatted: String,
    pub refunded: bool,
    pub refunded_at: Option<Timestamp>,
    pub subtotal: i64,
    pub discount_total: i64,
    pub tax: i64,
    #[serde(default)]
    pub tax_inclusive: bool,
    pub total: i64,
    #[serde(default)]
    pub refunded_amount: i64,
    pub subtotal_usd: i64,
    pub discount_total_usd: i64,
    pub tax_usd: i64,
    pub total_usd: i64,
    #[serde(default)]
    pub refunded_amount_usd: i64,
    pub subtotal_formatted: String,
    pub discount_total_formatted: String,
    pub tax_formatted: String,
    pub total_formatted: String,
    #[serde(default)]
    pub refunded_amount_formatted: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub urls: serde_json::Value,
}
