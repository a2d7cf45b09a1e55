//! LemonSqueezy payment integration.
//!
//! Talks to the JSON:API at `https://api.lemonsqueezy.com/v1/` for the
//! product catalogue, hosted checkouts and the customer portal.
//!
//! # Configuration
//!
//! ```ignore
//! let config = LemonSqueezyConfig::new(api_key, store_id, return_url);
//! let client = LemonSqueezyClient::new(config)?;
//! ```

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::subscription::{BillingInterval, Plan, Subscription};
use crate::ports::{
    CheckoutOptions, IntegrationProduct, PaymentError, PaymentErrorCode, PaymentIntegration,
};

pub const DEFAULT_BASE_URL: &str = "https://api.lemonsqueezy.com/v1/";

const JSON_API: &str = "application/vnd.api+json";

/// Connection settings for the LemonSqueezy API.
#[derive(Clone)]
pub struct LemonSqueezyConfig {
    api_key: SecretString,
    store_id: String,
    /// Where the hosted checkout sends the customer afterwards.
    return_url: String,
    base_url: String,
    timeout: Duration,
}

impl LemonSqueezyConfig {
    pub fn new(
        api_key: SecretString,
        store_id: impl Into<String>,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            store_id: store_id.into(),
            return_url: return_url.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for LemonSqueezyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemonSqueezyConfig")
            .field("api_key", &"[REDACTED]")
            .field("store_id", &self.store_id)
            .field("return_url", &self.return_url)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ════════════════════════════════════════════════════════════════════
// JSON:API response shapes
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct Document<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Resource<A> {
    id: String,
    attributes: A,
    #[serde(default)]
    relationships: HashMap<String, Relationship>,
}

impl<A> Resource<A> {
    fn related_link(&self, name: &str) -> Option<&str> {
        self.relationships
            .get(name)
            .and_then(|r| r.links.related.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
struct Relationship {
    #[serde(default)]
    links: RelationshipLinks,
}

#[derive(Debug, Default, Deserialize)]
struct RelationshipLinks {
    related: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductAttributes {
    name: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceModelAttributes {
    #[serde(default)]
    unit_price: i64,
    renewal_interval_quantity: Option<u32>,
    renewal_interval_unit: Option<String>,
}

impl PriceModelAttributes {
    /// One-off prices carry no renewal interval.
    fn interval(&self) -> Option<BillingInterval> {
        let quantity = self.renewal_interval_quantity?;
        let unit = self.renewal_interval_unit.as_deref()?;
        BillingInterval::from_parts(quantity, unit).ok()
    }
}

#[derive(Debug, Deserialize)]
struct CheckoutAttributes {
    url: String,
}

#[derive(Debug, Deserialize)]
struct PortalAttributes {
    #[serde(default)]
    urls: PortalUrls,
}

#[derive(Debug, Default, Deserialize)]
struct PortalUrls {
    customer_portal: Option<String>,
}

// ════════════════════════════════════════════════════════════════════
// Client
// ════════════════════════════════════════════════════════════════════

/// LemonSqueezy implementation of [`PaymentIntegration`].
pub struct LemonSqueezyClient {
    config: LemonSqueezyConfig,
    base_url: Url,
    http_client: reqwest::Client,
}

impl LemonSqueezyClient {
    pub fn new(config: LemonSqueezyConfig) -> Result<Self, PaymentError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PaymentError::provider(format!("Invalid API base URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            base_url,
            http_client,
        })
    }

    /// Resolves a path or an absolute related link against the base URL.
    fn url(&self, path_or_link: &str) -> Result<Url, PaymentError> {
        self.base_url
            .join(path_or_link)
            .map_err(|e| PaymentError::invalid_response(format!("Invalid link {}: {}", path_or_link, e)))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, PaymentError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn post<T: DeserializeOwned>(&self, url: Url, body: &Value) -> Result<T, PaymentError> {
        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.config.api_key.expose_secret())
            .body(body.to_string())
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn variant_product(
        &self,
        product: &Resource<ProductAttributes>,
        variant: &Resource<IgnoredAny>,
        price_link: &str,
    ) -> Result<IntegrationProduct, PaymentError> {
        let price: Document<Resource<PriceModelAttributes>> = self.get(self.url(price_link)?).await?;

        Ok(IntegrationProduct {
            id: variant.id.clone(),
            name: product.attributes.name.clone(),
            description: product.attributes.description.clone(),
            price: price.data.attributes.unit_price,
            interval: price.data.attributes.interval(),
        })
    }

    fn checkout_body(&self, subscription: &Subscription, plan: &Plan, options: &CheckoutOptions) -> Value {
        json!({
            "data": {
                "type": "checkouts",
                "attributes": {
                    "product_options": {
                        "redirect_url": self.config.return_url,
                    },
                    "checkout_data": {
                        "email": options.email(),
                        "custom": {
                            "subscription_id": subscription.id.to_string(),
                        },
                    },
                },
                "relationships": {
                    "store": {
                        "data": { "type": "stores", "id": self.config.store_id },
                    },
                    "variant": {
                        "data": { "type": "variants", "id": plan.plan_id },
                    },
                },
            },
        })
    }
}

fn transport_error(err: reqwest::Error) -> PaymentError {
    if err.is_timeout() {
        PaymentError::timeout(err.to_string())
    } else {
        PaymentError::network(err.to_string())
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PaymentError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, error = %body, "LemonSqueezy request failed");
        return Err(status_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| PaymentError::invalid_response(format!("Failed to parse LemonSqueezy response: {}", e)))
}

fn status_error(status: StatusCode, body: &str) -> PaymentError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PaymentError::authentication("LemonSqueezy rejected the API key")
        }
        StatusCode::NOT_FOUND => PaymentError::not_found("LemonSqueezy resource"),
        StatusCode::TOO_MANY_REQUESTS => {
            PaymentError::new(PaymentErrorCode::RateLimitExceeded, "LemonSqueezy rate limit hit")
        }
        _ => {
            let mut err = PaymentError::provider(format!("LemonSqueezy API error ({}): {}", status, body))
                .with_provider_code(status.as_str());
            err.retryable = status.is_server_error();
            err
        }
    }
}

#[async_trait]
impl PaymentIntegration for LemonSqueezyClient {
    async fn checkout(
        &self,
        subscription: &Subscription,
        plan: &Plan,
        options: &CheckoutOptions,
    ) -> Result<String, PaymentError> {
        let body = self.checkout_body(subscription, plan, options);
        let document: Document<Resource<CheckoutAttributes>> =
            self.post(self.url("checkouts")?, &body).await?;

        tracing::debug!(
            subscription_id = %subscription.id,
            variant = %plan.plan_id,
            "Created LemonSqueezy checkout"
        );

        Ok(document.data.attributes.url)
    }

    async fn plans(&self) -> Result<Vec<IntegrationProduct>, PaymentError> {
        let mut url = self.url("products")?;
        url.query_pairs_mut()
            .append_pair("filter[store_id]", &self.config.store_id);

        let products: Document<Vec<Resource<ProductAttributes>>> = self.get(url).await?;
        let mut catalogue = Vec::new();

        for product in &products.data {
            let Some(variants_link) = product.related_link("variants") else {
                continue;
            };

            let variants: Document<Vec<Resource<IgnoredAny>>> =
                self.get(self.url(variants_link)?).await?;

            let lookups = variants.data.iter().filter_map(|variant| {
                variant
                    .related_link("price-model")
                    .map(|price_link| self.variant_product(product, variant, price_link))
            });
            catalogue.extend(try_join_all(lookups).await?);
        }

        tracing::debug!(count = catalogue.len(), "Fetched LemonSqueezy catalogue");
        Ok(catalogue)
    }

    async fn customer_portal_url(&self, subscription: &Subscription) -> Result<String, PaymentError> {
        let external_id = subscription
            .external_subscription_id
            .as_deref()
            .ok_or_else(|| PaymentError::not_found("External subscription"))?;

        let document: Document<Resource<PortalAttributes>> = self
            .get(self.url(&format!("subscriptions/{}", external_id))?)
            .await?;

        document
            .data
            .attributes
            .urls
            .customer_portal
            .ok_or_else(|| PaymentError::invalid_response("Subscription has no customer portal URL"))
    }
}

impl std::fmt::Debug for LemonSqueezyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemonSqueezyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
