//! Invoice model for the billing engine.

use crate::models::{Customer, LineItem, LineItemInput};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Invoice payment status.
///
/// Draft -> Issued happens on inventory deduction; Partial and Paid are
/// driven solely by recorded payments against the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Partial,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Issued => "Issued",
            InvoiceStatus::Partial => "Partial",
            InvoiceStatus::Paid => "Paid",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Issued" => InvoiceStatus::Issued,
            "Partial" => InvoiceStatus::Partial,
            "Paid" => InvoiceStatus::Paid,
            _ => InvoiceStatus::Draft,
        }
    }
}

/// A persisted invoice.
///
/// Invariants: `total = subtotal + cgst + sgst + igst - tds - tcs` and
/// `amount_due = total - amount_paid`, both exact at 2 decimal places.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub account_id: Uuid,
    pub invoice_number: String,
    pub customer_id: Uuid,
    pub invoice_date: DateTime<Utc>,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub tds: Decimal,
    pub tcs: Decimal,
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub status: InvoiceStatus,
    pub profit_margin: Decimal,
    pub profit_percent: Decimal,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    pub account_id: Uuid,
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "At least one line item is required"), nested)]
    pub line_items: Vec<LineItemInput>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_same_state")]
    pub is_same_state: bool,
}

fn default_same_state() -> bool {
    true
}

/// Filter parameters for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct ListInvoicesFilter {
    pub customer_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
}

/// An invoice composed with its line items and customer, the shape handed
/// back to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub line_items: Vec<LineItem>,
    pub customer: Customer,
}
