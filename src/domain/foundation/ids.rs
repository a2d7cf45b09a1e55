//! Strongly-typed identifier value objects.
//!
//! UUID-backed ids are declared through `uuid_id!` so every record type
//! gets the same constructor, display and parsing surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Declares a `Copy` newtype over [`Uuid`] serialized as a bare string.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Random v4 id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Plan record key.
    PlanId
);

uuid_id!(
    /// Subscription record key.
    ///
    /// Also the correlation id handed to the payment provider at checkout
    /// (`custom_data.subscription_id`) and echoed back on every webhook.
    SubscriptionId
);

uuid_id!(
    /// Per-plan feature override row.
    PlanFeatureId
);

uuid_id!(
    /// Subscription audit log entry.
    SubscriptionLogId
);

uuid_id!(
    /// Received webhook delivery.
    WebhookEventLogId
);

/// Identifier of the party holding a subscription (account, organisation, user).
///
/// Subscribers live outside this crate, so the id is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Rejects blank ids.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("subscriber_id"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubscriberId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubscriberId> for String {
    fn from(id: SubscriberId) -> Self {
        id.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(PlanId::new(), PlanId::new());
        assert_ne!(WebhookEventLogId::default(), WebhookEventLogId::default());
    }

    #[test]
    fn subscription_id_parses_its_own_display() {
        let id = SubscriptionId::new();
        let parsed: SubscriptionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<SubscriptionId>().is_err());
    }

    #[test]
    fn uuid_ids_serialize_as_plain_strings() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&PlanFeatureId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn subscriber_id_rejects_blank() {
        assert!(SubscriberId::new("").is_err());
        assert!(SubscriberId::new("   ").is_err());
        assert!(serde_json::from_str::<SubscriberId>("\"  \"").is_err());
    }

    #[test]
    fn subscriber_id_keeps_raw_value() {
        let id = SubscriberId::new("org-42").unwrap();
        assert_eq!(id.as_str(), "org-42");
        assert_eq!(id.to_string(), "org-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"org-42\"");
    }
}
