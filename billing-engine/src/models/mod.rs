//! Domain models for the billing engine.
//!
//! Field names serialize in camelCase because the JSON shapes are consumed
//! by an existing boundary; renaming them breaks compatibility.

mod challan;
mod customer;
mod invoice;
mod line_item;
mod loyalty;
mod payment;
mod pricing_rule;
mod product;
mod tax_rule;

pub use challan::{ChallanStatus, DeliveryChallan, GenerateChallan};
pub use customer::{Customer, CustomerGroup};
pub use invoice::{CreateInvoice, Invoice, InvoiceDetail, InvoiceStatus, ListInvoicesFilter};
pub use line_item::{LineItem, LineItemInput};
pub use loyalty::{
    ApplyLoyaltyPoints, ListLoyaltyFilter, LoyaltyAward, LoyaltyHistory, LoyaltyTransaction,
    LoyaltyTxType,
};
pub use payment::{ListPaymentsFilter, Payment, RecordPayment};
pub use pricing_rule::{PriceType, PricingRule};
pub use product::Product;
pub use tax_rule::TaxRule;
