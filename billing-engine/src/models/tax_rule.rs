//! Tax rule model for the billing engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// TDS/TCS applicability for an account, keyed by HSN code.
///
/// A rate of `None` defers to the engine's configured default for that
/// deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRule {
    pub id: Uuid,
    pub account_id: Uuid,
    pub hsn_code: Option<String>,
    pub tds_applicable: bool,
    pub tds_rate: Option<Decimal>,
    pub tcs_applicable: bool,
    pub tcs_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}
