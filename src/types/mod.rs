//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account identifier and record
//! - `transfer`: Transfer request and receipt
//! - `error`: Error types for the transfer engine

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountId};
pub use error::LedgerError;
pub use transfer::{NotificationStatus, TransferReceipt, TransferRequest};
