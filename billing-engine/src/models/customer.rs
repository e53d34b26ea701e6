//! Customer model for the billing engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer group tag, matched by group-scoped pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerGroup {
    Regular,
    #[serde(rename = "VIP")]
    Vip,
    Wholesale,
}

impl CustomerGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerGroup::Regular => "Regular",
            CustomerGroup::Vip => "VIP",
            CustomerGroup::Wholesale => "Wholesale",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "VIP" => CustomerGroup::Vip,
            "Wholesale" => CustomerGroup::Wholesale,
            _ => CustomerGroup::Regular,
        }
    }
}

/// A billing customer.
///
/// `credit_used` tracks the outstanding balance consumed against
/// `credit_limit`; both are mutated only through the store's atomic
/// reserve/release operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub credit_limit: Decimal,
    pub credit_used: Decimal,
    pub loyalty_points: i64,
    pub customer_group: CustomerGroup,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Credit headroom remaining before the limit.
    pub fn available_credit(&self) -> Decimal {
        self.credit_limit - self.credit_used
    }
}
