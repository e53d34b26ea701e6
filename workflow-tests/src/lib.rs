//! End-to-end billing workflow test library.
//!
//! Provides a seeded [`BillingEngine`] over the in-memory store so tests can
//! drive complete billing flows (price -> invoice -> issue -> pay -> loyalty
//! -> challan) without standing up any external services.

use billing_engine::models::{
    Customer, CustomerGroup, LineItemInput, Product, TaxRule,
};
use billing_engine::store::{BillingStore, InMemoryStore};
use billing_engine::{BillingEngine, EngineConfig};
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Once};
use uuid::Uuid;

static TRACING: Once = Once::new();

/// Install the JSON tracing subscriber once per test binary.
fn init_tracing_once() {
    TRACING.call_once(|| billing_engine::observability::logging::init_tracing("warn"));
}

/// A billing account wired to a fresh engine and store.
pub struct BillingWorkflow {
    pub engine: BillingEngine,
    pub store: Arc<InMemoryStore>,
    pub account_id: Uuid,
}

impl BillingWorkflow {
    /// Engine with default business constants over an empty store.
    pub async fn bootstrap() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    pub async fn with_config(config: EngineConfig) -> Self {
        init_tracing_once();
        let store = Arc::new(InMemoryStore::new());
        let engine = BillingEngine::new(store.clone(), config);
        Self {
            engine,
            store,
            account_id: Uuid::new_v4(),
        }
    }

    pub async fn seed_product(
        &self,
        name: &str,
        price: &str,
        gst_rate: Option<&str>,
        quantity: i64,
    ) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            name: name.to_string(),
            sku: Some(format!("SKU-{}", &Uuid::new_v4().to_string()[..8])),
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

    pub async fn seed_customer(&self, name: &str, credit_limit: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            name: name.to_string(),
            email: Some("orders@example.in".to_string()),
            phone: Some("9876543210".to_string()),
            address: Some("14 Market Road, Pune".to_string()),
            gstin: Some("27AAPFU0939F1ZV".to_string()),
            credit_limit: dec(credit_limit),
            credit_used: Decimal::ZERO,
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

    /// A TDS/TCS rule keyed to the given product id (the engine uses the
    /// first invoice line's product id as the HSN key).
    pub async fn seed_tax_rule_for(&self, product: &Product) -> TaxRule {
        let rule = TaxRule {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            hsn_code: Some(product.id.to_string()),
            tds_applicable: true,
            tds_rate: None,
            tcs_applicable: true,
            tcs_rate: None,
            created_at: Utc::now(),
        };
        self.store
            .create_tax_rule(rule.clone())
            .await
            .expect("Failed to seed tax rule");
        rule
    }
}

/// One submitted invoice line.
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
