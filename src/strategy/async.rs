//! Asynchronous batch processing strategy
//!
//! Reads transfers in batches and runs every transfer of a batch
//! concurrently, so transfers touching the same accounts really contend for
//! the per-account locks.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, workers)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (spawn_blocking fan-out)
//!         └── TransferService
//!             ├── InMemoryAccountStore
//!             ├── LockRegistry
//!             └── LoggingNotifier
//! ```
//!
//! Batches are processed one after another; within a batch, execution order
//! is arbitrary. The final ledger therefore only matches the sync strategy
//! when the outcome of a batch does not depend on the order of its transfers.

use crate::core::{BatchProcessor, TransferConfig};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::open_error;
use crate::strategy::{report_rejection, seeded_service, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of transfers read and dispatched together
    pub batch_size: usize,
    /// Number of threads executing transfers
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            workers: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, workers: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let workers = if workers == 0 {
            warn!(
                "Invalid workers ({}), using default ({})",
                workers, default.workers
            );
            default.workers
        } else {
            workers
        };

        Self {
            batch_size,
            workers,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    transfer_config: TransferConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, transfer_config: TransferConfig) -> Self {
        Self {
            config,
            transfer_config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        // Transfers block on account locks, so they run on the blocking
        // pool; its size is the effective parallelism.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.workers)
            .max_blocking_threads(self.config.workers)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        // Seeding reads the accounts file with blocking I/O
        let service = seeded_service(accounts_path, self.transfer_config)?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(service.clone());

            let file = tokio::fs::File::open(transfers_path)
                .await
                .map_err(|e| open_error(transfers_path, e))?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut applied = 0usize;
            let mut rejected = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for processed in processor.process_batch(batch).await {
                    match processed.result {
                        Ok(_) => applied += 1,
                        Err(e) => {
                            rejected += 1;
                            report_rejection(&processed.request, &e);
                        }
                    }
                }
            }
            info!(applied, rejected, "Transfers processed");

            write_accounts_csv(&service.accounts(), output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(config: BatchConfig, accounts: &str, transfers: &str) -> Result<String, String> {
        let accounts_file = create_temp_csv(accounts);
        let transfers_file = create_temp_csv(transfers);
        let mut output = Vec::new();

        AsyncProcessingStrategy::new(config, TransferConfig::default()).process(
            accounts_file.path(),
            transfers_file.path(),
            &mut output,
        )?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_batch_config_zero_values_fall_back_to_defaults() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config, BatchConfig::default());

        let config = BatchConfig::new(20, 3);
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn test_async_strategy_concurrent_drain() {
        let transfers: String = std::iter::once("from,to,amount\n".to_string())
            .chain((0..10).map(|_| "1,2,100.00\n".to_string()))
            .collect();

        let output = run(
            BatchConfig::default(),
            "id,balance\n1,1200.00\n2,500.00\n",
            &transfers,
        )
        .unwrap();

        assert_eq!(output, "id,balance\n1,200.0000\n2,1500.0000\n");
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        // Batch size 1 forces the second transfer to see the first one's credit
        let output = run(
            BatchConfig::new(1, 4),
            "id,balance\n1,100\n2,0\n3,0\n",
            "from,to,amount\n1,2,60\n2,3,50\n",
        )
        .unwrap();

        assert_eq!(output, "id,balance\n1,40.0000\n2,10.0000\n3,50.0000\n");
    }

    #[test]
    fn test_async_strategy_handles_missing_transfers_file() {
        let accounts_file = create_temp_csv("id,balance\n1,10\n");
        let mut output = Vec::new();

        let result = AsyncProcessingStrategy::new(BatchConfig::default(), TransferConfig::default())
            .process(accounts_file.path(), Path::new("nonexistent.csv"), &mut output);

        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_async_strategy_handles_missing_accounts_file() {
        let transfers_file = create_temp_csv("from,to,amount\n1,2,5\n");
        let mut output = Vec::new();

        let result = AsyncProcessingStrategy::new(BatchConfig::default(), TransferConfig::default())
            .process(Path::new("nonexistent.csv"), transfers_file.path(), &mut output);

        assert!(result.unwrap_err().contains("File not found: nonexistent.csv"));
        assert!(output.is_empty());
    }
}
