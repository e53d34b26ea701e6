//! Product model for the billing engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable product owned by a billing account.
///
/// `quantity` is the on-hand stock and is only ever mutated through the
/// store's conditional deduction; `gst_rate` of `None` falls back to the
/// engine's configured default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub price: Decimal,
    pub gst_rate: Option<Decimal>,
    pub quantity: i64,
    pub low_stock_at: i64,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// On-hand quantity at or below the low-stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_at
    }
}
