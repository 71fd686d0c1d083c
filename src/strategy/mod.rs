//! Processing strategy module for driving the transfer engine from CSV files
//!
//! A strategy owns the complete pipeline: seed the ledger, read transfer
//! requests, push them through the `TransferService`, and write the final
//! ledger. Strategies are selected at runtime from the CLI.

use crate::cli::StrategyType;
use crate::core::{InMemoryAccountStore, LoggingNotifier, TransferConfig, TransferService};
use crate::io::read_accounts;
use crate::types::{LedgerError, TransferRequest};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete transfer pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Seed accounts, apply transfers and write the resulting ledger
    ///
    /// # Arguments
    ///
    /// * `accounts_path` - CSV file with `id,balance` rows
    /// * `transfers_path` - CSV file with `from,to,amount` rows
    /// * `output` - Writer receiving the final `id,balance` CSV
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or the output cannot
    /// be written. Individual rejected transfers are logged and skipped.
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch_config` is ignored by the sync strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    transfer_config: TransferConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(transfer_config)),
        StrategyType::Async => {
            let batch_config = batch_config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(batch_config, transfer_config))
        }
    }
}

/// Build a transfer service seeded from the accounts file
pub(crate) fn seeded_service(
    accounts_path: &Path,
    config: TransferConfig,
) -> Result<Arc<TransferService>, String> {
    let service = TransferService::with_config(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(LoggingNotifier),
        config,
    );

    let accounts = read_accounts(accounts_path)?;
    let seeded = accounts.len();
    for account in accounts {
        if let Err(e) = service.create_account(account) {
            warn!(error = %e, "Skipping account seed");
        }
    }
    info!(accounts = seeded, "Ledger seeded");

    Ok(Arc::new(service))
}

/// Log a transfer the engine refused or failed to apply
pub(crate) fn report_rejection(request: &TransferRequest, e: &LedgerError) {
    if e.is_recoverable() {
        warn!(from = %request.from, to = %request.to, error = %e, "Transfer rejected");
    } else {
        error!(from = %request.from, to = %request.to, error = %e, "Ledger left inconsistent");
    }
}
