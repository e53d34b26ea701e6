//! Loyalty point accrual.

use crate::error::EngineError;
use crate::models::{
    ApplyLoyaltyPoints, ListLoyaltyFilter, LoyaltyAward, LoyaltyHistory, LoyaltyTransaction,
    LoyaltyTxType,
};
use crate::services::metrics::LOYALTY_POINTS_TOTAL;
use crate::services::BillingEngine;
use anyhow::anyhow;
use chrono::{Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

impl BillingEngine {
    /// Accrue loyalty points for an invoice.
    ///
    /// Explicit `points` win when positive; otherwise points are the floor
    /// of `invoice.total * points_per_rupee`. Appends an `Earned` ledger
    /// entry with the configured expiry and increments the customer's
    /// balance. No redemption path exists here.
    #[instrument(skip(self, input), fields(customer_id = %input.customer_id, invoice_id = %input.invoice_id))]
    pub async fn apply_loyalty_points(
        &self,
        input: ApplyLoyaltyPoints,
    ) -> Result<LoyaltyAward, EngineError> {
        input.validate()?;

        let invoice = self
            .store
            .find_invoice(input.invoice_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(anyhow!("Invoice {} not found", input.invoice_id))
            })?;
        // Resolve the customer up front so a missing one cannot leave an
        // orphaned ledger entry behind.
        self.store
            .find_customer(input.customer_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(anyhow!("Customer {} not found", input.customer_id))
            })?;

        let earned_points = if input.points > 0 {
            input.points
        } else {
            let points_per_rupee = input
                .points_per_rupee
                .unwrap_or(self.config.points_per_rupee);
            (invoice.total * points_per_rupee)
                .floor()
                .to_i64()
                .ok_or_else(|| {
                    EngineError::Validation("Earned points out of range".to_string())
                })?
        };

        let now = Utc::now();
        let transaction = LoyaltyTransaction {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            points: earned_points,
            tx_type: LoyaltyTxType::Earned,
            invoice_id: Some(invoice.id),
            description: format!("Earned from invoice {}", invoice.invoice_number),
            expiry_date: now + Duration::days(self.config.loyalty_expiry_days),
            created_at: now,
        };

        self.store.insert_loyalty_transaction(transaction).await?;
        self.store
            .add_loyalty_points(input.customer_id, earned_points)
            .await?;

        LOYALTY_POINTS_TOTAL.inc_by(earned_points.max(0) as u64);
        info!(
            customer_id = %input.customer_id,
            invoice_id = %invoice.id,
            points = earned_points,
            "Loyalty points earned"
        );

        Ok(LoyaltyAward { earned_points })
    }

    /// A customer's loyalty ledger with their current point balance.
    pub async fn loyalty_history(
        &self,
        customer_id: Uuid,
    ) -> Result<LoyaltyHistory, EngineError> {
        let transactions = self
            .store
            .list_loyalty_transactions(&ListLoyaltyFilter {
                customer_id: Some(customer_id),
                tx_type: None,
            })
            .await?;
        let customer_points = self
            .store
            .find_customer(customer_id)
            .await?
            .map(|customer| customer.loyalty_points)
            .unwrap_or(0);
        Ok(LoyaltyHistory {
            transactions,
            customer_points,
        })
    }
}
