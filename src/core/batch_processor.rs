//! Concurrent batch execution of transfer requests
//!
//! This module provides the `BatchProcessor` struct, which fans a batch of
//! transfer requests out across blocking worker tasks on the tokio runtime.
//!
//! # Design
//!
//! Every transfer in a batch runs as its own `spawn_blocking` task, so
//! transfers that touch overlapping accounts genuinely race for the same
//! per-account locks. Ordering within a batch is therefore not preserved;
//! the caller awaits the whole batch before submitting the next one.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<TransferService>  (shared transfer orchestrator)
//! ```

use std::sync::Arc;

use super::TransferService;
use crate::types::{LedgerError, TransferReceipt, TransferRequest};
use futures::future::join_all;
use tracing::error;

/// Result of processing a single transfer request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was processed
    pub request: TransferRequest,

    /// The outcome of the transfer
    pub result: Result<TransferReceipt, LedgerError>,
}

/// Batch processor over a shared transfer service
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    service: Arc<TransferService>,
}

impl BatchProcessor {
    pub fn new(service: Arc<TransferService>) -> Self {
        Self { service }
    }

    /// Run one transfer to completion on the calling thread
    pub fn process_request(&self, request: TransferRequest) -> ProcessingResult {
        let result = self.service.transfer(&request);
        ProcessingResult { request, result }
    }

    /// Process a batch of transfers concurrently
    ///
    /// Must be called from within a tokio runtime. Results are returned in
    /// submission order even though execution order is arbitrary. A panicked
    /// worker is logged and its result dropped.
    pub async fn process_batch(&self, batch: Vec<TransferRequest>) -> Vec<ProcessingResult> {
        let tasks = batch.into_iter().map(|request| {
            let processor = self.clone();
            tokio::task::spawn_blocking(move || processor.process_request(request))
        });

        let mut results = Vec::new();
        for joined in join_all(tasks).await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => error!(error = ?e, "Transfer task panicked"),
            }
        }

        results
    }
}
