//! Billing period of a plan or subscription.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Day => "day",
            IntervalUnit::Week => "week",
            IntervalUnit::Month => "month",
            IntervalUnit::Year => "year",
        }
    }

    /// Accepts singular and plural spellings ("month", "months").
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.trim_end_matches('s') {
            "day" => Ok(IntervalUnit::Day),
            "week" => Ok(IntervalUnit::Week),
            "month" => Ok(IntervalUnit::Month),
            "year" => Ok(IntervalUnit::Year),
            _ => Err(ValidationError::invalid_format(
                "interval_unit",
                format!("unknown interval unit '{}'", value),
            )),
        }
    }
}

/// How often a subscription renews, e.g. every 1 month or every 2 weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingInterval {
    pub quantity: u32,
    pub unit: IntervalUnit,
}

impl BillingInterval {
    pub fn new(quantity: u32, unit: IntervalUnit) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::invalid_format(
                "interval_quantity",
                "must be at least 1",
            ));
        }
        Ok(Self { quantity, unit })
    }

    pub fn monthly() -> Self {
        Self {
            quantity: 1,
            unit: IntervalUnit::Month,
        }
    }

    pub fn yearly() -> Self {
        Self {
            quantity: 1,
            unit: IntervalUnit::Year,
        }
    }

    /// Builds an interval from provider fields such as `(1, "month")`.
    pub fn from_parts(quantity: u32, unit: &str) -> Result<Self, ValidationError> {
        Self::new(quantity, IntervalUnit::parse(unit)?)
    }
}

impl Default for BillingInterval {
    fn default() -> Self {
        Self::monthly()
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quantity == 1 {
            write!(f, "1 {}", self.unit.as_str())
        } else {
            write!(f, "{} {}s", self.quantity, self.unit.as_str())
        }
    }
}
