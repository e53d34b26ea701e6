//! Credit-limit admission control.

use crate::error::EngineError;
use crate::models::Customer;
use rust_decimal::Decimal;

/// Reject when the projected usage would exceed the customer's limit.
///
/// The projection is over the pre-tax subtotal, not the tax-inclusive
/// invoice total (see DESIGN.md). The store's `reserve_credit` applies the
/// same comparison atomically; this check exists for callers that want to
/// pre-validate a prospective invoice without reserving.
pub fn check_credit(customer: &Customer, proposed_subtotal: Decimal) -> Result<(), EngineError> {
    if customer.credit_used + proposed_subtotal > customer.credit_limit {
        return Err(EngineError::CreditLimitExceeded {
            available: customer.available_credit(),
        });
    }
    Ok(())
}
