use crate::error::EngineError;
use config::{Config as Cfg, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Tunable business constants for the engine.
///
/// Every value has a default matching the behavior the engine ships with;
/// deployments override via `billing.*` config files or `BILLING__*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Assumed cost basis as a percentage of a product's base price, used
    /// for per-line profit estimation.
    #[serde(default = "default_cost_basis_percent")]
    pub cost_basis_percent: Decimal,

    /// GST rate applied when a product carries none.
    #[serde(default = "default_gst_rate")]
    pub default_gst_rate: Decimal,

    /// TDS rate applied when a tax rule marks TDS applicable but carries no
    /// rate of its own.
    #[serde(default = "default_tds_rate")]
    pub default_tds_rate: Decimal,

    /// TCS rate applied when a tax rule marks TCS applicable but carries no
    /// rate of its own.
    #[serde(default = "default_tcs_rate")]
    pub default_tcs_rate: Decimal,

    /// Loyalty points accrued per rupee of invoice total.
    #[serde(default = "default_points_per_rupee")]
    pub points_per_rupee: Decimal,

    /// Days until earned loyalty points expire.
    #[serde(default = "default_loyalty_expiry_days")]
    pub loyalty_expiry_days: i64,

    /// Prefix for invoice numbers.
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,

    /// Prefix for delivery-challan numbers.
    #[serde(default = "default_challan_prefix")]
    pub challan_prefix: String,
}

fn default_cost_basis_percent() -> Decimal {
    Decimal::from(60)
}

fn default_gst_rate() -> Decimal {
    Decimal::from(18)
}

fn default_tds_rate() -> Decimal {
    Decimal::from(2)
}

fn default_tcs_rate() -> Decimal {
    Decimal::ONE
}

fn default_points_per_rupee() -> Decimal {
    Decimal::ONE
}

fn default_loyalty_expiry_days() -> i64 {
    365
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

fn default_challan_prefix() -> String {
    "CHALLAN".to_string()
}

impl EngineConfig {
    /// Load configuration from `billing.*` files and the environment.
    pub fn load() -> Result<Self, EngineError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("billing").required(false))
            .add_source(config::Environment::with_prefix("BILLING").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cost_basis_percent: default_cost_basis_percent(),
            default_gst_rate: default_gst_rate(),
            default_tds_rate: default_tds_rate(),
            default_tcs_rate: default_tcs_rate(),
            points_per_rupee: default_points_per_rupee(),
            loyalty_expiry_days: default_loyalty_expiry_days(),
            invoice_prefix: default_invoice_prefix(),
            challan_prefix: default_challan_prefix(),
        }
    }
}
