//! Persistence port consumed by the billing engine.
//!
//! The engine never talks to a database directly; every read and write goes
//! through [`BillingStore`]. Backends must honor the atomicity contracts
//! spelled out on `next_sequence`, `deduct_stock`, `reserve_credit`, and
//! `insert_invoice` — those four are where concurrent billing goes wrong
//! when left to read-modify-write.

use crate::error::EngineError;
use crate::models::{
    Customer, DeliveryChallan, Invoice, InvoiceStatus, LineItem, ListInvoicesFilter,
    ListLoyaltyFilter, ListPaymentsFilter, LoyaltyTransaction, Payment, PricingRule, Product,
    TaxRule,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

mod memory;

pub use memory::InMemoryStore;

/// Candidate query for pricing-rule resolution.
#[derive(Debug, Clone)]
pub struct PricingRuleQuery {
    pub account_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub at: DateTime<Utc>,
}

/// Outcome of a conditional stock deduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockDeduction {
    /// Every line was deducted.
    Applied,
    /// No line was deducted; the first shortfall encountered.
    Short {
        product_id: Uuid,
        available: i64,
        requested: i64,
    },
}

/// Storage operations required by the engine.
#[async_trait]
pub trait BillingStore: Send + Sync {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn create_product(&self, product: Product) -> Result<(), EngineError>;

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, EngineError>;

    /// Conditionally deduct stock for a set of lines, all-or-nothing.
    ///
    /// Either every line satisfies `quantity >= requested` and all are
    /// decremented in one atomic write, or nothing is written and the first
    /// shortfall is reported. Stock can never go negative through this call.
    async fn deduct_stock(&self, lines: &[(Uuid, i64)]) -> Result<StockDeduction, EngineError>;

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    async fn create_customer(&self, customer: Customer) -> Result<(), EngineError>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, EngineError>;

    /// Atomically grow `credit_used` by `amount` if the result stays within
    /// the customer's limit; returns whether the reservation was applied.
    async fn reserve_credit(&self, customer_id: Uuid, amount: Decimal)
        -> Result<bool, EngineError>;

    /// Shrink `credit_used` by `amount`. Unknown customers are ignored.
    async fn release_credit(&self, customer_id: Uuid, amount: Decimal)
        -> Result<(), EngineError>;

    /// Add (or, for negative values, remove) loyalty points on the customer.
    async fn add_loyalty_points(&self, customer_id: Uuid, points: i64)
        -> Result<(), EngineError>;

    // -------------------------------------------------------------------------
    // Pricing rules
    // -------------------------------------------------------------------------

    async fn create_pricing_rule(&self, rule: PricingRule) -> Result<(), EngineError>;

    /// Active rules admitting the queried sale, ordered by creation time
    /// descending with rule id as the tie-break. The head of the list is the
    /// rule the resolver applies.
    async fn active_pricing_rules(
        &self,
        query: &PricingRuleQuery,
    ) -> Result<Vec<PricingRule>, EngineError>;

    // -------------------------------------------------------------------------
    // Tax rules
    // -------------------------------------------------------------------------

    async fn create_tax_rule(&self, rule: TaxRule) -> Result<(), EngineError>;

    async fn find_tax_rule_by_hsn(
        &self,
        account_id: Uuid,
        hsn_code: &str,
    ) -> Result<Option<TaxRule>, EngineError>;

    // -------------------------------------------------------------------------
    // Document numbering
    // -------------------------------------------------------------------------

    /// Next value of the atomic per-(account, prefix, day) counter,
    /// starting at 1. Two concurrent callers can never observe the same
    /// value for the same key.
    async fn next_sequence(
        &self,
        account_id: Uuid,
        prefix: &str,
        date_key: &str,
    ) -> Result<u32, EngineError>;

    // -------------------------------------------------------------------------
    // Invoices
    // -------------------------------------------------------------------------

    /// Persist an invoice and its line items in one atomic write. Fails with
    /// `Conflict` if the invoice number already exists for the account.
    async fn insert_invoice(
        &self,
        invoice: Invoice,
        items: Vec<LineItem>,
    ) -> Result<(), EngineError>;

    async fn find_invoice(&self, id: Uuid) -> Result<Option<Invoice>, EngineError>;

    async fn invoice_line_items(&self, invoice_id: Uuid) -> Result<Vec<LineItem>, EngineError>;

    async fn list_invoices(
        &self,
        account_id: Uuid,
        filter: &ListInvoicesFilter,
    ) -> Result<Vec<Invoice>, EngineError>;

    async fn update_invoice_payment(
        &self,
        invoice_id: Uuid,
        amount_paid: Decimal,
        amount_due: Decimal,
        status: InvoiceStatus,
    ) -> Result<(), EngineError>;

    async fn update_invoice_status(
        &self,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), EngineError>;

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    async fn insert_payment(&self, payment: Payment) -> Result<(), EngineError>;

    async fn find_payment_by_transaction(
        &self,
        invoice_id: Uuid,
        transaction_id: &str,
    ) -> Result<Option<Payment>, EngineError>;

    async fn list_payments(
        &self,
        filter: &ListPaymentsFilter,
    ) -> Result<Vec<Payment>, EngineError>;

    // -------------------------------------------------------------------------
    // Loyalty
    // -------------------------------------------------------------------------

    async fn insert_loyalty_transaction(
        &self,
        transaction: LoyaltyTransaction,
    ) -> Result<(), EngineError>;

    async fn list_loyalty_transactions(
        &self,
        filter: &ListLoyaltyFilter,
    ) -> Result<Vec<LoyaltyTransaction>, EngineError>;

    // -------------------------------------------------------------------------
    // Delivery challans
    // -------------------------------------------------------------------------

    async fn insert_challan(&self, challan: DeliveryChallan) -> Result<(), EngineError>;
}
