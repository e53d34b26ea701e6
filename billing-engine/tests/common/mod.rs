//! Shared harness for billing-engine integration tests.

#![allow(dead_code)]

use billing_engine::models::{
    Customer, CustomerGroup, Invoice, InvoiceStatus, LineItemInput, PriceType, PricingRule,
    Product, TaxRule,
};
use billing_engine::store::{BillingStore, InMemoryStore};
use billing_engine::BillingEngine;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// An engine over a fresh in-memory store, with seeding helpers.
pub struct TestApp {
    pub engine: BillingEngine,
    pub store: Arc<InMemoryStore>,
    pub account_id: Uuid,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let engine = BillingEngine::with_defaults(store.clone());
        Self {
            engine,
            store,
            account_id: Uuid::new_v4(),
        }
    }

    /// Seed a product with the default GST rate (none on the product, so the
    /// engine's 18% default applies).
    pub async fn seed_product(&self, name: &str, price: &str, quantity: i64) -> Product {
        self.seed_product_with_gst(name, price, quantity, None).await
    }

    pub async fn seed_product_with_gst(
        &self,
        name: &str,
        price: &str,
        quantity: i64,
        gst_rate: Option<&str>,
    ) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            name: name.to_string(),
            sku: None,
            price: dec(price),
            gst_rate: gst_rate.map(dec),
            quantity,
            low_stock_at: 5,
            deleted: false,
            created_at: Utc::now(),
        };
        self.store
            .create_product(product.clone())
            .await
            .expect("Failed to seed product");
        product
    }

    pub async fn seed_customer(&self, name: &str, credit_limit: &str, credit_used: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            name: name.to_string(),
            email: None,
            phone: Some("9876543210".to_string()),
            address: Some("14 Market Road, Pune".to_string()),
            gstin: None,
            credit_limit: dec(credit_limit),
            credit_used: dec(credit_used),
            loyalty_points: 0,
            customer_group: CustomerGroup::Regular,
            created_at: Utc::now(),
        };
        self.store
            .create_customer(customer.clone())
            .await
            .expect("Failed to seed customer");
        customer
    }

    /// A percentage rule scoped to one customer, created `age` ago with an
    /// open-ended window.
    pub async fn seed_customer_rule(
        &self,
        customer_id: Uuid,
        percent: &str,
        age: Duration,
    ) -> PricingRule {
        let rule = PricingRule {
            customer_id: Some(customer_id),
            customer_group: None,
            price_type: PriceType::Percentage,
            price_value: dec(percent),
            ..self.base_rule(age)
        };
        self.store
            .create_pricing_rule(rule.clone())
            .await
            .expect("Failed to seed pricing rule");
        rule
    }

    /// A fixed-price rule scoped to one product.
    pub async fn seed_product_rule(
        &self,
        product_id: Uuid,
        fixed_price: &str,
        age: Duration,
    ) -> PricingRule {
        let rule = PricingRule {
            product_id: Some(product_id),
            customer_group: None,
            price_type: PriceType::Fixed,
            price_value: dec(fixed_price),
            ..self.base_rule(age)
        };
        self.store
            .create_pricing_rule(rule.clone())
            .await
            .expect("Failed to seed pricing rule");
        rule
    }

    pub async fn seed_rule(&self, rule: PricingRule) -> PricingRule {
        self.store
            .create_pricing_rule(rule.clone())
            .await
            .expect("Failed to seed pricing rule");
        rule
    }

    /// Rule template: active, Regular-group scope, quantity band [1, ∞),
    /// window opened `age` ago.
    pub fn base_rule(&self, age: Duration) -> PricingRule {
        let created_at = Utc::now() - age;
        PricingRule {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            customer_id: None,
            product_id: None,
            customer_group: Some(CustomerGroup::Regular),
            price_type: PriceType::Percentage,
            price_value: Decimal::ZERO,
            min_quantity: 1,
            max_quantity: None,
            start_date: created_at,
            end_date: None,
            is_active: true,
            created_at,
        }
    }

    pub async fn seed_tax_rule(
        &self,
        hsn_code: &str,
        tds_applicable: bool,
        tcs_applicable: bool,
    ) -> TaxRule {
        let rule = TaxRule {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            hsn_code: Some(hsn_code.to_string()),
            tds_applicable,
            tds_rate: None,
            tcs_applicable,
            tcs_rate: None,
            created_at: Utc::now(),
        };
        self.store
            .create_tax_rule(rule.clone())
            .await
            .expect("Failed to seed tax rule");
        rule
    }

    pub async fn customer_credit_used(&self, customer_id: Uuid) -> Decimal {
        self.store
            .find_customer(customer_id)
            .await
            .expect("Failed to load customer")
            .expect("Customer missing")
            .credit_used
    }

    pub async fn product_quantity(&self, product_id: Uuid) -> i64 {
        self.store
            .find_product(product_id)
            .await
            .expect("Failed to load product")
            .expect("Product missing")
            .quantity
    }
}

/// A minimal invoice record for seeding directly through the store.
pub fn bare_invoice(account_id: Uuid, customer_id: Uuid, invoice_number: &str) -> Invoice {
    let now = Utc::now();
    Invoice {
        id: Uuid::new_v4(),
        account_id,
        invoice_number: invoice_number.to_string(),
        customer_id,
        invoice_date: now,
        subtotal: Decimal::ZERO,
        cgst: Decimal::ZERO,
        sgst: Decimal::ZERO,
        igst: Decimal::ZERO,
        tds: Decimal::ZERO,
        tcs: Decimal::ZERO,
        total: Decimal::ZERO,
        amount_paid: Decimal::ZERO,
        amount_due: Decimal::ZERO,
        status: InvoiceStatus::Draft,
        profit_margin: Decimal::ZERO,
        profit_percent: Decimal::ZERO,
        delivery_address: None,
        notes: None,
        deleted: false,
        deleted_at: None,
        created_at: now,
    }
}

/// One submitted invoice line without an explicit discount.
pub fn line(product: &Product, quantity: i64) -> LineItemInput {
    LineItemInput {
        product_id: product.id,
        quantity,
        discount: None,
    }
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal literal")
}

/// Today's date key as used in document numbers.
pub fn today_key() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (b - a).num_days()
}
