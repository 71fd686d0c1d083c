//! Collaborator traits for the transfer orchestrator
//!
//! The orchestrator talks to account storage and to the notification side
//! channel only through these traits, so alternative stores and notifiers
//! can be plugged in without touching the locking logic.

use crate::types::{Account, AccountId, LedgerError};

/// Trait for storing account records
///
/// Implementations must be safe to share between threads. The store itself
/// gives no cross-account guarantees; those come from the lock registry.
pub trait AccountStore: Send + Sync {
    /// Get the current record for an account, if it exists
    fn get(&self, id: &AccountId) -> Option<Account>;

    /// Insert a new account
    ///
    /// Fails with `LedgerError::DuplicateAccount` if the id is taken.
    fn create(&self, account: Account) -> Result<(), LedgerError>;

    /// Overwrite the stored record for `account.id`
    fn update(&self, account: Account) -> Result<(), LedgerError>;

    /// Snapshot of every stored account
    fn get_all(&self) -> Vec<Account>;
}

/// Trait for the best-effort transfer notification channel
pub trait Notifier: Send + Sync {
    /// Inform the holder of `account` about a completed transfer
    ///
    /// Returns a human-readable reason on failure.
    fn notify_about_transfer(&self, account: &Account, message: &str) -> Result<(), String>;
}
