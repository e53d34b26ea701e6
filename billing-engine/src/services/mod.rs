//! Billing engine operations, one module per concern.
//!
//! Every operation is a method on [`BillingEngine`]; the impl blocks live in
//! the module owning that concern (pricing, tax, invoicing, payments,
//! loyalty, challans, numbering).

pub mod challan;
pub mod credit;
pub mod invoicing;
pub mod loyalty;
pub mod metrics;
pub mod numbering;
pub mod payments;
pub mod pricing;
pub mod tax;

use crate::config::EngineConfig;
use crate::store::BillingStore;
use std::sync::Arc;

pub use pricing::PriceQuote;
pub use tax::TaxBreakdown;

/// The billing engine: stateless operations over an injected store.
#[derive(Clone)]
pub struct BillingEngine {
    store: Arc<dyn BillingStore>,
    config: EngineConfig,
}

impl BillingEngine {
    /// Create an engine over a store with the given configuration.
    pub fn new(store: Arc<dyn BillingStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Engine with default business constants.
    pub fn with_defaults(store: Arc<dyn BillingStore>) -> Self {
        Self::new(store, EngineConfig::default())
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
