//! Prometheus metrics for the billing engine.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_int_counter, CounterVec, IntCounter, TextEncoder,
};

/// Invoice counter by status reached (Draft on creation, Issued on
/// inventory deduction).
pub static INVOICES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "billing_invoices_total",
        "Total number of invoices by status",
        &["status"]
    )
    .expect("Failed to register invoices_total")
});

/// Payment counter by payment method.
pub static PAYMENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "billing_payments_total",
        "Total number of payments by method",
        &["payment_method"]
    )
    .expect("Failed to register payments_total")
});

/// Delivery challan counter.
pub static CHALLANS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "billing_challans_total",
        "Total number of delivery challans generated"
    )
    .expect("Failed to register challans_total")
});

/// Loyalty points earned counter.
pub static LOYALTY_POINTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "billing_loyalty_points_earned_total",
        "Total loyalty points earned"
    )
    .expect("Failed to register loyalty_points_earned_total")
});

/// Render the default registry in the Prometheus text format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    encoder
        .encode_to_string(&prometheus::gather())
        .unwrap_or_default()
}
