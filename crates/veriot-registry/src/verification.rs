//! Verification workflow: `pending -> verified | rejected`.

use crate::data::DataRecordStore;
use crate::entities::DataRecord;
use crate::error::Result;
use tracing::{info, warn};
use veriot_core::LedgerEffects;

/// Moves data records through their verification state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationWorkflow {
    records: DataRecordStore,
}

impl VerificationWorkflow {
    /// Workflow reading and writing through `records`
    pub fn new(records: DataRecordStore) -> Self {
        Self { records }
    }

    /// Mark the record `(device_id, timestamp)` as verified (`is_valid`) or
    /// rejected, attributing the decision to `verifier_id`.
    ///
    /// The transition applies regardless of the current status, so an
    /// already verified or rejected record is overridden. If the write fails
    /// the stored record keeps its previous state.
    pub async fn verify_data<L>(
        &self,
        ledger: &L,
        device_id: &str,
        timestamp: &str,
        verifier_id: &str,
        is_valid: bool,
    ) -> Result<DataRecord>
    where
        L: LedgerEffects + ?Sized,
    {
        let mut record = self
            .records
            .get_data_record(ledger, device_id, timestamp)
            .await?;

        let previous = record.status;
        record.apply_verification(verifier_id, is_valid);
        if previous.is_terminal() {
            warn!(
                device_id = %device_id,
                timestamp = %timestamp,
                previous = %previous,
                status = %record.status,
                "Overriding an earlier verification"
            );
        }

        self.records.put_data_record(ledger, &record).await?;

        info!(
            device_id = %device_id,
            timestamp = %timestamp,
            verifier_id = %verifier_id,
            status = %record.status,
            "Data record verified"
        );
        Ok(record)
    }
}
