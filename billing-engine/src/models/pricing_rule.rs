//! Pricing rule model for the billing engine.

use crate::models::CustomerGroup;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a matched rule prices the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceType {
    /// The rule value replaces the unit price outright.
    Fixed,
    /// The rule value is a percentage discount off the base price.
    Percentage,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Fixed => "Fixed",
            PriceType::Percentage => "Percentage",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Fixed" => PriceType::Fixed,
            _ => PriceType::Percentage,
        }
    }
}

/// A pricing rule scoped to a customer, a product, or a customer group.
///
/// Rules are evaluated, never consumed: matching one leaves it unchanged.
/// `created_at` is the precedence tie-break between rules that match the
/// same sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    pub id: Uuid,
    pub account_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub customer_group: Option<CustomerGroup>,
    pub price_type: PriceType,
    pub price_value: Decimal,
    pub min_quantity: i64,
    pub max_quantity: Option<i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PricingRule {
    /// Whether the rule's active window contains `at` and its quantity band
    /// admits the requested quantity.
    pub fn admits(&self, quantity: i64, at: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date <= at
            && self.end_date.map_or(true, |end| end >= at)
            && self.min_quantity <= quantity
            && self.max_quantity.map_or(true, |max| max >= quantity)
    }

    /// Scope match for a sale: the rule's customer, the rule's product, or
    /// the Regular-group fallback.
    pub fn matches_sale(&self, customer_id: Uuid, product_id: Uuid) -> bool {
        self.customer_id == Some(customer_id)
            || self.product_id == Some(product_id)
            || self.customer_group == Some(CustomerGroup::Regular)
    }
}
