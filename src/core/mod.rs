//! Core business logic module
//!
//! This module contains the transfer processing components:
//! - `traits` - Collaborator abstractions (account store, notifier)
//! - `account_store` - Concurrent in-memory account storage
//! - `lock_registry` - Lazily created per-account locks
//! - `transfer_service` - Ordered-lock transfer orchestration
//! - `notifier` - Tracing-backed notification channel
//! - `batch_processor` - Concurrent execution of transfer batches

pub mod account_store;
pub mod batch_processor;
pub mod lock_registry;
pub mod notifier;
pub mod traits;
pub mod transfer_service;

pub use account_store::InMemoryAccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use lock_registry::{AccountLock, LockRegistry};
pub use notifier::LoggingNotifier;
pub use traits::{AccountStore, Notifier};
pub use transfer_service::{NotificationPolicy, TransferConfig, TransferService};
