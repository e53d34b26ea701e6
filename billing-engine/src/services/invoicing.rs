//! Invoice assembly and inventory issuance.

use crate::error::EngineError;
use crate::models::{
    CreateInvoice, Customer, Invoice, InvoiceDetail, InvoiceStatus, LineItem, ListInvoicesFilter,
};
use crate::services::metrics::INVOICES_TOTAL;
use crate::services::tax::{calculate_tax, calculate_tcs, calculate_tds, round_money};
use crate::services::BillingEngine;
use crate::store::StockDeduction;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Aggregates accumulated across the lines of a prospective invoice.
#[derive(Debug, Clone, Copy, Default)]
struct LineTotals {
    subtotal: Decimal,
    cgst: Decimal,
    sgst: Decimal,
    igst: Decimal,
    profit: Decimal,
}

impl BillingEngine {
    /// Assemble and persist a draft invoice for a customer.
    ///
    /// Preconditions, each aborting the whole operation with no partial
    /// writes: the customer exists and belongs to the account, every product
    /// exists with sufficient stock, and the projected credit usage stays
    /// within the customer's limit. The credit check doubles as an atomic
    /// reservation (`credit_used += subtotal`) and is rolled back if the
    /// invoice fails to persist afterwards.
    ///
    /// Stock is not deducted here; callers issue the invoice explicitly via
    /// [`BillingEngine::deduct_inventory`].
    #[instrument(skip(self, input), fields(account_id = %input.account_id, customer_id = %input.customer_id))]
    pub async fn create_invoice(&self, input: CreateInvoice) -> Result<InvoiceDetail, EngineError> {
        input.validate()?;

        let customer = self
            .store
            .find_customer(input.customer_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(anyhow!("Customer {} not found", input.customer_id))
            })?;
        if customer.account_id != input.account_id {
            return Err(EngineError::Unauthorized(anyhow!(
                "Customer does not belong to this account"
            )));
        }

        let now = Utc::now();
        let invoice_id = Uuid::new_v4();
        let mut totals = LineTotals::default();
        let mut items = Vec::with_capacity(input.line_items.len());

        for line in &input.line_items {
            let product = self
                .store
                .find_product(line.product_id)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(anyhow!("Product {} not found", line.product_id))
                })?;
            if product.quantity < line.quantity {
                return Err(EngineError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.quantity,
                    requested: line.quantity,
                });
            }

            let pricing = self
                .calculate_price(line.product_id, input.customer_id, line.quantity)
                .await?;
            let unit_price = pricing.discounted_price;
            let taxable_amount = round_money(unit_price * Decimal::from(line.quantity));
            let gst_rate = product.gst_rate.unwrap_or(self.config.default_gst_rate);
            let tax = calculate_tax(taxable_amount, gst_rate, input.is_same_state);
            let discount = line.discount.unwrap_or(Decimal::ZERO);
            let line_total = taxable_amount + tax.total_tax - discount;
            let cost_price =
                round_money(product.price * self.config.cost_basis_percent / Decimal::ONE_HUNDRED);
            let profit = round_money((unit_price - cost_price) * Decimal::from(line.quantity));

            totals.subtotal += taxable_amount;
            totals.cgst += tax.cgst;
            totals.sgst += tax.sgst;
            totals.igst += tax.igst;
            totals.profit += profit;

            items.push(LineItem {
                id: Uuid::new_v4(),
                invoice_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price,
                discount,
                discount_percent: pricing.discount_percent,
                taxable_amount,
                gst_rate,
                cgst: tax.cgst,
                sgst: tax.sgst,
                igst: tax.igst,
                line_total,
                cost_price,
                profit,
            });
        }

        // Check and reservation happen in one atomic store operation.
        let reserved = totals.subtotal;
        if !self.store.reserve_credit(customer.id, reserved).await? {
            return Err(EngineError::CreditLimitExceeded {
                available: customer.available_credit(),
            });
        }

        match self
            .persist_invoice(&input, &customer, invoice_id, items, totals, now)
            .await
        {
            Ok(detail) => Ok(detail),
            Err(err) => {
                if let Err(release_err) = self.store.release_credit(customer.id, reserved).await {
                    warn!(
                        error = %release_err,
                        customer_id = %customer.id,
                        "Failed to release credit reservation after aborted invoice"
                    );
                }
                Err(err)
            }
        }
    }

    async fn persist_invoice(
        &self,
        input: &CreateInvoice,
        customer: &Customer,
        invoice_id: Uuid,
        items: Vec<LineItem>,
        totals: LineTotals,
        now: DateTime<Utc>,
    ) -> Result<InvoiceDetail, EngineError> {
        // The TDS/TCS rule lookup keys on the first line's product id as the
        // HSN code (see DESIGN.md).
        let first_product = input.line_items[0].product_id;
        let tax_rule = self
            .store
            .find_tax_rule_by_hsn(input.account_id, &first_product.to_string())
            .await?;

        let (tds_applicable, tds_rate, tcs_applicable, tcs_rate) = match &tax_rule {
            Some(rule) => (
                rule.tds_applicable,
                rule.tds_rate.unwrap_or(self.config.default_tds_rate),
                rule.tcs_applicable,
                rule.tcs_rate.unwrap_or(self.config.default_tcs_rate),
            ),
            None => (
                false,
                self.config.default_tds_rate,
                false,
                self.config.default_tcs_rate,
            ),
        };
        let tds = calculate_tds(totals.subtotal, tds_applicable, tds_rate);
        let tcs = calculate_tcs(totals.subtotal, tcs_applicable, tcs_rate);

        let total = totals.subtotal + totals.cgst + totals.sgst + totals.igst - tds - tcs;
        let profit_percent = if totals.subtotal > Decimal::ZERO {
            round_money(totals.profit * Decimal::ONE_HUNDRED / totals.subtotal)
        } else {
            Decimal::ZERO
        };

        let invoice_number = self
            .next_document_number(input.account_id, &self.config.invoice_prefix)
            .await?;

        let invoice = Invoice {
            id: invoice_id,
            account_id: input.account_id,
            invoice_number,
            customer_id: customer.id,
            invoice_date: now,
            subtotal: totals.subtotal,
            cgst: totals.cgst,
            sgst: totals.sgst,
            igst: totals.igst,
            tds,
            tcs,
            total,
            amount_paid: Decimal::ZERO,
            amount_due: total,
            status: InvoiceStatus::Draft,
            profit_margin: totals.profit,
            profit_percent,
            delivery_address: input.delivery_address.clone(),
            notes: input.notes.clone(),
            deleted: false,
            deleted_at: None,
            created_at: now,
        };

        self.store
            .insert_invoice(invoice.clone(), items.clone())
            .await?;

        INVOICES_TOTAL
            .with_label_values(&[invoice.status.as_str()])
            .inc();
        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = %invoice.total,
            "Invoice created"
        );

        Ok(InvoiceDetail {
            invoice,
            line_items: items,
            customer: customer.clone(),
        })
    }

    /// Deduct stock for every line and move the invoice to Issued.
    ///
    /// The deduction is all-or-nothing across the invoice's lines; a single
    /// short line aborts with no stock written.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn deduct_inventory(&self, invoice_id: Uuid) -> Result<Invoice, EngineError> {
        let invoice = self
            .store
            .find_invoice(invoice_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(anyhow!("Invoice {invoice_id} not found")))?;
        match invoice.status {
            InvoiceStatus::Draft | InvoiceStatus::Issued => {}
            other => {
                return Err(EngineError::Validation(format!(
                    "Inventory can only be deducted for Draft or Issued invoices, not {}",
                    other.as_str()
                )))
            }
        }

        let items = self.store.invoice_line_items(invoice_id).await?;
        let lines: Vec<(Uuid, i64)> = items
            .iter()
            .map(|item| (item.product_id, item.quantity))
            .collect();

        match self.store.deduct_stock(&lines).await? {
            StockDeduction::Applied => {}
            StockDeduction::Short {
                product_id,
                available,
                requested,
            } => {
                let product = self.store.find_product(product_id).await?;
                return Err(EngineError::InsufficientStock {
                    product: product
                        .map(|p| p.name)
                        .unwrap_or_else(|| product_id.to_string()),
                    available,
                    requested,
                });
            }
        }

        self.store
            .update_invoice_status(invoice_id, InvoiceStatus::Issued)
            .await?;
        INVOICES_TOTAL
            .with_label_values(&[InvoiceStatus::Issued.as_str()])
            .inc();
        info!(invoice_id = %invoice_id, "Inventory deducted, invoice issued");

        Ok(Invoice {
            status: InvoiceStatus::Issued,
            ..invoice
        })
    }

    /// Fetch an invoice composed with its line items and customer.
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<InvoiceDetail, EngineError> {
        let invoice = self
            .store
            .find_invoice(invoice_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(anyhow!("Invoice {invoice_id} not found")))?;
        let line_items = self.store.invoice_line_items(invoice_id).await?;
        let customer = self
            .store
            .find_customer(invoice.customer_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(anyhow!("Customer {} not found", invoice.customer_id))
            })?;
        Ok(InvoiceDetail {
            invoice,
            line_items,
            customer,
        })
    }

    /// List an account's invoices, newest first, excluding soft-deleted ones.
    pub async fn list_invoices(
        &self,
        account_id: Uuid,
        filter: &ListInvoicesFilter,
    ) -> Result<Vec<Invoice>, EngineError> {
        self.store.list_invoices(account_id, filter).await
    }
}
