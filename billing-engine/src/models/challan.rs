//! Delivery challan model for the billing engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Delivery challan status.
///
/// Issuance always produces `Pending`; the terminal states are reserved for
/// the dispatch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallanStatus {
    Pending,
    Delivered,
    Cancelled,
}

impl ChallanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallanStatus::Pending => "Pending",
            ChallanStatus::Delivered => "Delivered",
            ChallanStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Delivered" => ChallanStatus::Delivered,
            "Cancelled" => ChallanStatus::Cancelled,
            _ => ChallanStatus::Pending,
        }
    }
}

/// A dispatch document accompanying the goods of an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryChallan {
    pub id: Uuid,
    pub account_id: Uuid,
    pub challan_number: String,
    pub invoice_id: Uuid,
    pub delivery_date: DateTime<Utc>,
    pub delivery_address: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub notes: Option<String>,
    pub status: ChallanStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for issuing a delivery challan against an invoice.
///
/// Recipient fields default from the invoice's customer when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChallan {
    pub account_id: Uuid,
    pub invoice_id: Uuid,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub notes: Option<String>,
}
