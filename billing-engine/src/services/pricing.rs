//! Effective-price resolution for a (product, customer, quantity) sale.

use crate::error::EngineError;
use crate::models::PriceType;
use crate::services::tax::round_money;
use crate::services::BillingEngine;
use crate::store::PricingRuleQuery;
use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

/// Resolved pricing for one sale line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub discounted_price: Decimal,
    pub discount_amount: Decimal,
    pub discount_percent: Decimal,
}

impl PriceQuote {
    fn undiscounted(base_price: Decimal) -> Self {
        Self {
            base_price,
            discounted_price: base_price,
            discount_amount: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
        }
    }

    fn percentage_off(base_price: Decimal, discount_percent: Decimal) -> Self {
        let discount_amount = round_money(base_price * discount_percent / Decimal::ONE_HUNDRED);
        Self {
            base_price,
            discounted_price: base_price - discount_amount,
            discount_amount,
            discount_percent,
        }
    }
}

/// Quantity-tier fallback applied when no pricing rule matches.
///
/// Tiers are checked lowest threshold first, so any quantity of ten or more
/// resolves to 5%; the 10% and 15% arms are unreachable. Callers depend on
/// this flat behavior (see DESIGN.md).
pub(crate) fn bulk_discount_percent(quantity: i64) -> Decimal {
    if quantity >= 10 {
        Decimal::from(5)
    } else if quantity >= 20 {
        Decimal::from(10)
    } else if quantity >= 50 {
        Decimal::from(15)
    } else {
        Decimal::ZERO
    }
}

impl BillingEngine {
    /// Resolve the effective unit price for a sale.
    ///
    /// Precedence: the most recently created active rule whose scope matches
    /// the sale, whose window contains now, and whose quantity band admits
    /// the requested quantity; the bulk tier ladder applies only when no
    /// rule matches. Pure over current rule and product state: no writes,
    /// and identical inputs against unchanged state yield identical quotes.
    #[instrument(skip(self), fields(product_id = %product_id, customer_id = %customer_id))]
    pub async fn calculate_price(
        &self,
        product_id: Uuid,
        customer_id: Uuid,
        quantity: i64,
    ) -> Result<PriceQuote, EngineError> {
        if quantity < 1 {
            return Err(EngineError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .store
            .find_product(product_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(anyhow!("Product {product_id} not found")))?;
        let base_price = product.price;

        let rules = self
            .store
            .active_pricing_rules(&PricingRuleQuery {
                account_id: product.account_id,
                customer_id,
                product_id,
                quantity,
                at: Utc::now(),
            })
            .await?;

        if let Some(rule) = rules.first() {
            let quote = match rule.price_type {
                PriceType::Fixed => PriceQuote {
                    base_price,
                    discounted_price: rule.price_value,
                    discount_amount: Decimal::ZERO,
                    discount_percent: Decimal::ZERO,
                },
                PriceType::Percentage => PriceQuote::percentage_off(base_price, rule.price_value),
            };
            return Ok(quote);
        }

        let discount_percent = bulk_discount_percent(quantity);
        if discount_percent > Decimal::ZERO {
            Ok(PriceQuote::percentage_off(base_price, discount_percent))
        } else {
            Ok(PriceQuote::undiscounted(base_price))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_below_ten_get_no_bulk_discount() {
        assert_eq!(bulk_discount_percent(1), Decimal::ZERO);
        assert_eq!(bulk_discount_percent(9), Decimal::ZERO);
    }

    #[test]
    fn every_bulk_quantity_resolves_to_the_first_tier() {
        // The ladder is ordered lowest threshold first, so 5% wins for any
        // quantity of ten or more; the deeper tiers never fire.
        assert_eq!(bulk_discount_percent(10), Decimal::from(5));
        assert_eq!(bulk_discount_percent(20), Decimal::from(5));
        assert_eq!(bulk_discount_percent(50), Decimal::from(5));
        assert_eq!(bulk_discount_percent(500), Decimal::from(5));
    }
}
