//! GST, TDS, and TCS calculators.
//!
//! Pure functions over `Decimal`. Every derived amount is rounded to 2
//! decimal places, half away from zero, at the point it is produced, so
//! invoice aggregates are exact sums of already-rounded parts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Split of GST into central/state/integrated components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total_tax: Decimal,
}

/// Round a monetary amount to 2 decimal places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// GST split for a taxable amount.
///
/// Same-state sales split the rate evenly into CGST and SGST; inter-state
/// sales levy the full rate as IGST. For a non-zero rate exactly one of the
/// two sides is non-zero.
pub fn calculate_tax(taxable_amount: Decimal, gst_rate: Decimal, is_same_state: bool) -> TaxBreakdown {
    if is_same_state {
        let half_rate = gst_rate / Decimal::TWO;
        let cgst = round_money(taxable_amount * half_rate / Decimal::ONE_HUNDRED);
        let sgst = round_money(taxable_amount * half_rate / Decimal::ONE_HUNDRED);
        TaxBreakdown {
            cgst,
            sgst,
            igst: Decimal::ZERO,
            total_tax: cgst + sgst,
        }
    } else {
        let igst = round_money(taxable_amount * gst_rate / Decimal::ONE_HUNDRED);
        TaxBreakdown {
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst,
            total_tax: igst,
        }
    }
}

/// TDS withheld by the payer, applied once at invoice level.
pub fn calculate_tds(amount: Decimal, applicable: bool, rate: Decimal) -> Decimal {
    if !applicable {
        return Decimal::ZERO;
    }
    round_money(amount * rate / Decimal::ONE_HUNDRED)
}

/// TCS collected by the seller, applied once at invoice level.
pub fn calculate_tcs(amount: Decimal, applicable: bool, rate: Decimal) -> Decimal {
    if !applicable {
        return Decimal::ZERO;
    }
    round_money(amount * rate / Decimal::ONE_HUNDRED)
}
