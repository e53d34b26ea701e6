//! Delivery-challan issuance.

use crate::error::EngineError;
use crate::models::{ChallanStatus, DeliveryChallan, GenerateChallan};
use crate::services::metrics::CHALLANS_TOTAL;
use crate::services::BillingEngine;
use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

impl BillingEngine {
    /// Issue a delivery challan for an invoice.
    ///
    /// Recipient name and phone default from the customer; the delivery
    /// address falls back from the invoice to the customer, then to an
    /// empty string. Challans are numbered from their own daily sequence
    /// and always start `Pending`.
    #[instrument(skip(self, input), fields(account_id = %input.account_id, invoice_id = %input.invoice_id))]
    pub async fn generate_delivery_challan(
        &self,
        input: GenerateChallan,
    ) -> Result<DeliveryChallan, EngineError> {
        input.validate()?;

        let invoice = self
            .store
            .find_invoice(input.invoice_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(anyhow!("Invoice {} not found", input.invoice_id))
            })?;
        if invoice.account_id != input.account_id {
            return Err(EngineError::Unauthorized(anyhow!(
                "Invoice does not belong to this account"
            )));
        }
        let customer = self
            .store
            .find_customer(invoice.customer_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(anyhow!("Customer {} not found", invoice.customer_id))
            })?;

        let challan_number = self
            .next_document_number(input.account_id, &self.config.challan_prefix)
            .await?;

        let now = Utc::now();
        let challan = DeliveryChallan {
            id: Uuid::new_v4(),
            account_id: input.account_id,
            challan_number,
            invoice_id: invoice.id,
            delivery_date: now,
            delivery_address: invoice
                .delivery_address
                .clone()
                .or_else(|| customer.address.clone())
                .unwrap_or_default(),
            recipient_name: input.recipient_name.unwrap_or_else(|| customer.name.clone()),
            recipient_phone: input
                .recipient_phone
                .or_else(|| customer.phone.clone())
                .unwrap_or_default(),
            notes: input.notes,
            status: ChallanStatus::Pending,
            created_at: now,
        };

        self.store.insert_challan(challan.clone()).await?;

        CHALLANS_TOTAL.inc();
        info!(
            challan_id = %challan.id,
            challan_number = %challan.challan_number,
            invoice_id = %invoice.id,
            "Delivery challan generated"
        );

        Ok(challan)
    }
}
