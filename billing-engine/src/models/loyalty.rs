//! Loyalty transaction model for the billing engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Direction of a loyalty transaction.
///
/// Only `Earned` is produced here; `Redeemed` exists for ledger
/// compatibility and is written by no current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoyaltyTxType {
    Earned,
    Redeemed,
}

impl LoyaltyTxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoyaltyTxType::Earned => "Earned",
            LoyaltyTxType::Redeemed => "Redeemed",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Redeemed" => LoyaltyTxType::Redeemed,
            _ => LoyaltyTxType::Earned,
        }
    }
}

/// A loyalty ledger entry. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyTransaction {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub points: i64,
    #[serde(rename = "type")]
    pub tx_type: LoyaltyTxType,
    pub invoice_id: Option<Uuid>,
    pub description: String,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for accruing loyalty points from an invoice.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyLoyaltyPoints {
    pub customer_id: Uuid,
    pub invoice_id: Uuid,
    /// Explicit points override; zero derives points from the invoice total.
    #[serde(default)]
    #[validate(range(min = 0, message = "Points cannot be negative"))]
    pub points: i64,
    pub points_per_rupee: Option<Decimal>,
}

/// Points awarded by an accrual.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyAward {
    pub earned_points: i64,
}

/// A customer's loyalty ledger with their current balance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyHistory {
    pub transactions: Vec<LoyaltyTransaction>,
    pub customer_points: i64,
}

/// Filter parameters for listing loyalty transactions.
#[derive(Debug, Clone, Default)]
pub struct ListLoyaltyFilter {
    pub customer_id: Option<Uuid>,
    pub tx_type: Option<LoyaltyTxType>,
}
