//! Payment recording and invoice balance tracking.

use crate::error::EngineError;
use crate::models::{InvoiceStatus, ListPaymentsFilter, Payment, RecordPayment};
use crate::services::metrics::PAYMENTS_TOTAL;
use crate::services::BillingEngine;
use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

impl BillingEngine {
    /// Record a payment against an invoice and advance its status.
    ///
    /// Status becomes `Paid` once `amount_paid >= total` and `Partial` for
    /// any smaller positive balance; overpayment is accepted and leaves
    /// `amount_due` negative. A replayed `transaction_id` returns the
    /// originally recorded payment without touching the ledger again.
    ///
    /// The payment amount also releases the customer's credit
    /// (`credit_used -= amount`); note the amount is tax-inclusive while
    /// reservations are made from pre-tax subtotals (see DESIGN.md).
    #[instrument(skip(self, input), fields(invoice_id = %input.invoice_id, amount = %input.amount))]
    pub async fn record_payment(&self, input: RecordPayment) -> Result<Payment, EngineError> {
        input.validate()?;

        let invoice = self
            .store
            .find_invoice(input.invoice_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(anyhow!("Invoice {} not found", input.invoice_id))
            })?;

        if let Some(transaction_id) = input.transaction_id.as_deref() {
            if let Some(existing) = self
                .store
                .find_payment_by_transaction(invoice.id, transaction_id)
                .await?
            {
                info!(
                    payment_id = %existing.id,
                    transaction_id = %transaction_id,
                    "Replayed transaction id, returning recorded payment"
                );
                return Ok(existing);
            }
        }

        let new_amount_paid = invoice.amount_paid + input.amount;
        let status = if new_amount_paid >= invoice.total {
            InvoiceStatus::Paid
        } else if new_amount_paid > Decimal::ZERO {
            InvoiceStatus::Partial
        } else {
            invoice.status
        };

        let payment = Payment {
            id: Uuid::new_v4(),
            invoice_id: invoice.id,
            customer_id: input.customer_id,
            amount: input.amount,
            payment_method: input.payment_method,
            transaction_id: input.transaction_id,
            notes: input.notes,
            created_at: Utc::now(),
        };

        self.store.insert_payment(payment.clone()).await?;
        self.store
            .update_invoice_payment(
                invoice.id,
                new_amount_paid,
                invoice.total - new_amount_paid,
                status,
            )
            .await?;
        self.store
            .release_credit(input.customer_id, payment.amount)
            .await?;

        PAYMENTS_TOTAL
            .with_label_values(&[payment.payment_method.as_str()])
            .inc();
        info!(
            payment_id = %payment.id,
            invoice_id = %invoice.id,
            amount = %payment.amount,
            status = status.as_str(),
            "Payment recorded"
        );

        Ok(payment)
    }

    /// List recorded payments, newest first.
    pub async fn list_payments(
        &self,
        filter: &ListPaymentsFilter,
    ) -> Result<Vec<Payment>, EngineError> {
        self.store.list_payments(filter).await
    }
}
