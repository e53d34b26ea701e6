//! Line item model for the billing engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A line on an invoice. Created with the invoice, immutable thereafter.
///
/// Exactly one of `cgst + sgst` or `igst` is non-zero, decided by the
/// same-state flag of the invoice the line belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub discount_percent: Decimal,
    pub taxable_amount: Decimal,
    pub gst_rate: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub line_total: Decimal,
    pub cost_price: Decimal,
    pub profit: Decimal,
}

/// One submitted line of a prospective invoice.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
    pub discount: Option<Decimal>,
}
