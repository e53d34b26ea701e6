//! In-memory [`BillingStore`] backing the test suites.
//!
//! All tables live behind a single `RwLock`, so every trait method is
//! atomic with respect to every other; this makes the implementation the
//! executable reference for the port's atomicity contracts.

use crate::error::EngineError;
use crate::models::{
    Customer, DeliveryChallan, Invoice, InvoiceStatus, LineItem, ListInvoicesFilter,
    ListLoyaltyFilter, ListPaymentsFilter, LoyaltyTransaction, Payment, PricingRule, Product,
    TaxRule,
};
use crate::store::{BillingStore, PricingRuleQuery, StockDeduction};
use anyhow::anyhow;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    products: HashMap<Uuid, Product>,
    customers: HashMap<Uuid, Customer>,
    pricing_rules: Vec<PricingRule>,
    tax_rules: Vec<TaxRule>,
    invoices: HashMap<Uuid, Invoice>,
    line_items: HashMap<Uuid, Vec<LineItem>>,
    payments: Vec<Payment>,
    loyalty: Vec<LoyaltyTransaction>,
    challans: Vec<DeliveryChallan>,
    sequences: HashMap<(Uuid, String, String), u32>,
}

/// Single-process store for tests and local tooling.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillingStore for InMemoryStore {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn create_product(&self, product: Product) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        tables.products.insert(product.id, product);
        Ok(())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, EngineError> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).filter(|p| !p.deleted).cloned())
    }

    async fn deduct_stock(&self, lines: &[(Uuid, i64)]) -> Result<StockDeduction, EngineError> {
        let mut tables = self.tables.write().await;

        // Cumulative need per product, so a product repeated across lines
        // cannot pass each check individually yet oversell in aggregate.
        let mut needed: HashMap<Uuid, i64> = HashMap::new();
        for (product_id, requested) in lines {
            let total_requested = needed.entry(*product_id).or_insert(0);
            *total_requested += *requested;
            match tables.products.get(product_id) {
                Some(product) if product.quantity >= *total_requested => {}
                Some(product) => {
                    return Ok(StockDeduction::Short {
                        product_id: *product_id,
                        available: product.quantity,
                        requested: *total_requested,
                    })
                }
                None => {
                    return Err(EngineError::NotFound(anyhow!(
                        "Product {product_id} not found"
                    )))
                }
            }
        }

        for (product_id, requested) in &needed {
            if let Some(product) = tables.products.get_mut(product_id) {
                product.quantity -= requested;
            }
        }

        Ok(StockDeduction::Applied)
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    async fn create_customer(&self, customer: Customer) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        tables.customers.insert(customer.id, customer);
        Ok(())
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, EngineError> {
        let tables = self.tables.read().await;
        Ok(tables.customers.get(&id).cloned())
    }

    async fn reserve_credit(
        &self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> Result<bool, EngineError> {
        let mut tables = self.tables.write().await;
        let customer = tables
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| EngineError::NotFound(anyhow!("Customer {customer_id} not found")))?;

        if customer.credit_used + amount > customer.credit_limit {
            return Ok(false);
        }
        customer.credit_used += amount;
        Ok(true)
    }

    async fn release_credit(
        &self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        if let Some(customer) = tables.customers.get_mut(&customer_id) {
            customer.credit_used -= amount;
        }
        Ok(())
    }

    async fn add_loyalty_points(
        &self,
        customer_id: Uuid,
        points: i64,
    ) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        let customer = tables
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| EngineError::NotFound(anyhow!("Customer {customer_id} not found")))?;
        customer.loyalty_points += points;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Pricing rules
    // -------------------------------------------------------------------------

    async fn create_pricing_rule(&self, rule: PricingRule) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        tables.pricing_rules.push(rule);
        Ok(())
    }

    async fn active_pricing_rules(
        &self,
        query: &PricingRuleQuery,
    ) -> Result<Vec<PricingRule>, EngineError> {
        let tables = self.tables.read().await;
        let mut rules: Vec<PricingRule> = tables
            .pricing_rules
            .iter()
            .filter(|rule| rule.account_id == query.account_id)
            .filter(|rule| rule.matches_sale(query.customer_id, query.product_id))
            .filter(|rule| rule.admits(query.quantity, query.at))
            .cloned()
            .collect();
        rules.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rules)
    }

    // -------------------------------------------------------------------------
    // Tax rules
    // -------------------------------------------------------------------------

    async fn create_tax_rule(&self, rule: TaxRule) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        tables.tax_rules.push(rule);
        Ok(())
    }

    async fn find_tax_rule_by_hsn(
        &self,
        account_id: Uuid,
        hsn_code: &str,
    ) -> Result<Option<TaxRule>, EngineError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tax_rules
            .iter()
            .find(|rule| {
                rule.account_id == account_id && rule.hsn_code.as_deref() == Some(hsn_code)
            })
            .cloned())
    }

    // -------------------------------------------------------------------------
    // Document numbering
    // -------------------------------------------------------------------------

    async fn next_sequence(
        &self,
        account_id: Uuid,
        prefix: &str,
        date_key: &str,
    ) -> Result<u32, EngineError> {
        let mut tables = self.tables.write().await;
        let counter = tables
            .sequences
            .entry((account_id, prefix.to_string(), date_key.to_string()))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    // -------------------------------------------------------------------------
    // Invoices
    // -------------------------------------------------------------------------

    async fn insert_invoice(
        &self,
        invoice: Invoice,
        items: Vec<LineItem>,
    ) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;

        let duplicate = tables.invoices.values().any(|existing| {
            existing.account_id == invoice.account_id
                && existing.invoice_number == invoice.invoice_number
        });
        if duplicate {
            return Err(EngineError::Conflict(anyhow!(
                "Invoice number {} already exists",
                invoice.invoice_number
            )));
        }

        tables.line_items.insert(invoice.id, items);
        tables.invoices.insert(invoice.id, invoice);
        Ok(())
    }

    async fn find_invoice(&self, id: Uuid) -> Result<Option<Invoice>, EngineError> {
        let tables = self.tables.read().await;
        Ok(tables.invoices.get(&id).filter(|i| !i.deleted).cloned())
    }

    async fn invoice_line_items(&self, invoice_id: Uuid) -> Result<Vec<LineItem>, EngineError> {
        let tables = self.tables.read().await;
        Ok(tables.line_items.get(&invoice_id).cloned().unwrap_or_default())
    }

    async fn list_invoices(
        &self,
        account_id: Uuid,
        filter: &ListInvoicesFilter,
    ) -> Result<Vec<Invoice>, EngineError> {
        let tables = self.tables.read().await;
        let mut invoices: Vec<Invoice> = tables
            .invoices
            .values()
            .filter(|invoice| invoice.account_id == account_id && !invoice.deleted)
            .filter(|invoice| {
                filter
                    .customer_id
                    .map_or(true, |customer| invoice.customer_id == customer)
            })
            .filter(|invoice| filter.status.map_or(true, |status| invoice.status == status))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn update_invoice_payment(
        &self,
        invoice_id: Uuid,
        amount_paid: Decimal,
        amount_due: Decimal,
        status: InvoiceStatus,
    ) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        let invoice = tables
            .invoices
            .get_mut(&invoice_id)
            .ok_or_else(|| EngineError::NotFound(anyhow!("Invoice {invoice_id} not found")))?;
        invoice.amount_paid = amount_paid;
        invoice.amount_due = amount_due;
        invoice.status = status;
        Ok(())
    }

    async fn update_invoice_status(
        &self,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        let invoice = tables
            .invoices
            .get_mut(&invoice_id)
            .ok_or_else(|| EngineError::NotFound(anyhow!("Invoice {invoice_id} not found")))?;
        invoice.status = status;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    async fn insert_payment(&self, payment: Payment) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        tables.payments.push(payment);
        Ok(())
    }

    async fn find_payment_by_transaction(
        &self,
        invoice_id: Uuid,
        transaction_id: &str,
    ) -> Result<Option<Payment>, EngineError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .find(|payment| {
                payment.invoice_id == invoice_id
                    && payment.transaction_id.as_deref() == Some(transaction_id)
            })
            .cloned())
    }

    async fn list_payments(
        &self,
        filter: &ListPaymentsFilter,
    ) -> Result<Vec<Payment>, EngineError> {
        let tables = self.tables.read().await;
        let mut payments: Vec<Payment> = tables
            .payments
            .iter()
            .filter(|payment| {
                filter
                    .invoice_id
                    .map_or(true, |invoice| payment.invoice_id == invoice)
            })
            .filter(|payment| {
                filter
                    .customer_id
                    .map_or(true, |customer| payment.customer_id == customer)
            })
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    // -------------------------------------------------------------------------
    // Loyalty
    // -------------------------------------------------------------------------

    async fn insert_loyalty_transaction(
        &self,
        transaction: LoyaltyTransaction,
    ) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        tables.loyalty.push(transaction);
        Ok(())
    }

    async fn list_loyalty_transactions(
        &self,
        filter: &ListLoyaltyFilter,
    ) -> Result<Vec<LoyaltyTransaction>, EngineError> {
        let tables = self.tables.read().await;
        let mut transactions: Vec<LoyaltyTransaction> = tables
            .loyalty
            .iter()
            .filter(|tx| {
                filter
                    .customer_id
                    .map_or(true, |customer| tx.customer_id == customer)
            })
            .filter(|tx| filter.tx_type.map_or(true, |tx_type| tx.tx_type == tx_type))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }

    // -------------------------------------------------------------------------
    // Delivery challans
    // -------------------------------------------------------------------------

    async fn insert_challan(&self, challan: DeliveryChallan) -> Result<(), EngineError> {
        let mut tables = self.tables.write().await;
        tables.challans.push(challan);
        Ok(())
    }
}
