//! Date-scoped document numbering.

use crate::error::EngineError;
use crate::services::BillingEngine;
use chrono::Utc;
use uuid::Uuid;

/// Render a document number as `{PREFIX}{YYYYMMDD}{NNNN}`.
pub(crate) fn format_document_number(prefix: &str, date_key: &str, sequence: u32) -> String {
    format!("{}{}{:04}", prefix, date_key, sequence)
}

impl BillingEngine {
    /// Next human-readable number in an account's document series.
    ///
    /// Sequences restart at 1 each day and run independently per prefix;
    /// the store's counter is atomic, so concurrent issuance cannot mint
    /// the same number twice.
    pub(crate) async fn next_document_number(
        &self,
        account_id: Uuid,
        prefix: &str,
    ) -> Result<String, EngineError> {
        let date_key = Utc::now().format("%Y%m%d").to_string();
        let sequence = self.store.next_sequence(account_id, prefix, &date_key).await?;
        Ok(format_document_number(prefix, &date_key, sequence))
    }
}
