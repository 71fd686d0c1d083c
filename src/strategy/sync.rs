//! Synchronous processing strategy
//!
//! Applies transfers one at a time in file order on the calling thread. The
//! outcome is deterministic, which makes this strategy the reference for
//! comparing against the concurrent one.

use crate::core::TransferConfig;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{report_rejection, seeded_service, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    transfer_config: TransferConfig,
}

impl SyncProcessingStrategy {
    pub fn new(transfer_config: TransferConfig) -> Self {
        Self { transfer_config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let service = seeded_service(accounts_path, self.transfer_config)?;
        let reader = SyncReader::new(transfers_path)?;

        let mut applied = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            match result {
                Ok(request) => match service.transfer(&request) {
                    Ok(_) => applied += 1,
                    Err(e) => {
                        rejected += 1;
                        report_rejection(&request, &e);
                    }
                },
                Err(e) => warn!(error = %e, "Skipping transfer record"),
            }
        }
        info!(applied, rejected, "Transfers processed");

        write_accounts_csv(&service.accounts(), output)
    }
}
