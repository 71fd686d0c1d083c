//! Rust Transfer Engine Library
//! # Overview
//!
//! This library moves funds between accounts of an in-memory ledger while
//! many transfers run concurrently from independent callers.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, TransferRequest, LedgerError, etc.)
//! - [`core`] - Business logic components:
//!   - [`core::lock_registry`] - One lazily created lock per account id
//!   - [`core::transfer_service`] - Ordered-lock transfer orchestration
//!   - [`core::account_store`] - Concurrent account storage
//!   - [`core::notifier`] - Best-effort transfer notifications
//!   - [`core::batch_processor`] - Concurrent execution of transfer batches
//! - [`io`] - CSV input and ledger output for the command-line driver
//! - [`strategy`] - Sequential and concurrent processing pipelines
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - Tracing subscriber setup
//!
//! # Transfer guarantees
//!
//! - Locks are always taken in ascending account id order, so opposite
//!   transfers between the same pair of accounts cannot deadlock
//! - Balances are re-read under lock and written only after both new values
//!   have been computed
//! - A transfer never pushes a balance below zero
//! - The sum of balances is conserved by every committed transfer
//! - `get_account` and `accounts` read under the same account locks, so a
//!   half-applied transfer is never visible to a caller

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    AccountStore, InMemoryAccountStore, LockRegistry, LoggingNotifier, NotificationPolicy,
    Notifier, TransferConfig, TransferService,
};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, LedgerError, NotificationStatus, TransferReceipt, TransferRequest,
};
