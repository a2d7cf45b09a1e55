//! Request parsing and payload conversion.
//!
//! Turns a verified webhook body into a [`RemoteEvent`]:
//!
//! 1. Structural validation: `data`, `meta` and
//!    `meta.custom_data.subscription_id` must be present (400 otherwise)
//! 2. `data.type` selects the resource shape; unknown types pass through
//!    as [`RemoteEvent::Generic`]
//! 3. Unknown subscription statuses and resource conversion failures
//!    are rejected (406)

use serde_json::Value;
use uuid::Uuid;

use super::{
    InvoiceResource, LemonSqueezyEvent, ProviderSubscriptionStatus, SubscriptionResource,
    WebhookError,
};
use crate::domain::foundation::SubscriptionId;

const SUBSCRIPTIONS: &str = "subscriptions";
const SUBSCRIPTION_INVOICES: &str = "subscription-invoices";

/// Normalized webhook delivery, before domain translation.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEvent {
    Subscription {
        event: LemonSqueezyEvent,
        subscription_id: SubscriptionId,
        subscription: Box<SubscriptionResource>,
    },
    SubscriptionPayment {
        event: LemonSqueezyEvent,
        subscription_id: SubscriptionId,
        invoice: Box<InvoiceResource>,
    },
    /// A resource type we do not model. Acknowledged and ignored.
    Generic {
        name: String,
        id: String,
        payload: Value,
    },
}

impl RemoteEvent {
    /// Parses a raw webhook body.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        let payload: Value =
            serde_json::from_slice(body).map_err(|_| WebhookError::missing_fields())?;
        Self::from_payload(payload)
    }

    /// Validates and converts an already decoded payload.
    pub fn from_payload(mut payload: Value) -> Result<Self, WebhookError> {
        let meta = match payload.get("meta") {
            Some(meta) if meta.is_object() => meta.clone(),
            _ => return Err(WebhookError::missing_fields()),
        };
        let data = match payload.get_mut("data") {
            Some(data) => data.take(),
            None => return Err(WebhookError::missing_fields()),
        };

        let correlation = meta
            .pointer("/custom_data/subscription_id")
            .filter(|v| !v.is_null())
            .ok_or_else(WebhookError::missing_fields)?;
        let subscription_id = parse_subscription_id(correlation)?;

        let event_name = meta
            .get("event_name")
            .and_then(Value::as_str)
            .ok_or_else(|| WebhookError::MalformedPayload("Missing meta.event_name.".to_string()))?
            .to_string();

        match data.get("type").and_then(Value::as_str) {
            Some(SUBSCRIPTIONS) => {
                let event = parse_event(&event_name)?;
                check_subscription_status(&data)?;
                let subscription: SubscriptionResource = serde_json::from_value(data)
                    .map_err(|e| WebhookError::ParseError(e.to_string()))?;
                Ok(RemoteEvent::Subscription {
                    event,
                    subscription_id,
                    subscription: Box::new(subscription),
                })
            }
            Some(SUBSCRIPTION_INVOICES) => {
                let event = parse_event(&event_name)?;
                let invoice: InvoiceResource = serde_json::from_value(data)
                    .map_err(|e| WebhookError::ParseError(e.to_string()))?;
                Ok(RemoteEvent::SubscriptionPayment {
                    event,
                    subscription_id,
                    invoice: Box::new(invoice),
                })
            }
            _ => {
                let id = meta
                    .get("id")
                    .or_else(|| data.get("id"))
                    .map(value_to_string)
                    .unwrap_or_default();
                Ok(RemoteEvent::Generic {
                    name: event_name,
                    id,
                    payload: data,
                })
            }
        }
    }

    /// Provider event name, as sent.
    pub fn name(&self) -> &str {
        match self {
            RemoteEvent::Subscription { event, .. }
            | RemoteEvent::SubscriptionPayment { event, .. } => event.as_str(),
            RemoteEvent::Generic { name, .. } => name,
        }
    }

    /// Correlation id, absent for generic events.
    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        match self {
            RemoteEvent::Subscription {
                subscription_id, ..
            }
            | RemoteEvent::SubscriptionPayment {
                subscription_id, ..
            } => Some(*subscription_id),
            RemoteEvent::Generic { .. } => None,
        }
    }
}

fn parse_event(name: &str) -> Result<LemonSqueezyEvent, WebhookError> {
    name.parse()
        .map_err(|_| WebhookError::UnsupportedEvent(name.to_string()))
}

/// Status values outside the known set are rejected before shape conversion.
fn check_subscription_status(data: &Value) -> Result<(), WebhookError> {
    match data.pointer("/attributes/status") {
        Some(status @ Value::String(name)) => {
            serde_json::from_value::<ProviderSubscriptionStatus>(status.clone())
                .map(|_| ())
                .map_err(|_| WebhookError::UnsupportedSubscriptionStatus(name.clone()))
        }
        _ => Ok(()),
    }
}

fn parse_subscription_id(value: &Value) -> Result<SubscriptionId, WebhookError> {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(SubscriptionId::from_uuid)
        .ok_or_else(|| {
            WebhookError::MalformedPayload(format!(
                "Invalid custom_data.subscription_id: {}",
                value
            ))
        })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
