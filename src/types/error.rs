//! Error types for the transfer engine
//!
//! This module defines all error types that can occur while moving funds
//! between accounts or while driving the engine from CSV files.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Malformed transfer amounts, rejected before locking
//! - **Ledger Errors**: Unknown accounts, insufficient funds, duplicate ids
//! - **Concurrency Errors**: Bounded lock acquisition that timed out
//! - **Commit Errors**: Store writes that failed and were (or could not be) undone
//! - **File I/O Errors**: Only raised by the CSV driver layer

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the transfer engine
///
/// Every failure is returned to the caller; none is only logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Transfer amount is zero or negative
    ///
    /// Reported before any lock is taken.
    #[error("Invalid transfer amount {amount}: must be greater than zero")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Referenced account does not exist
    ///
    /// Reported after lock acquisition; no balance is mutated.
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The missing account id
        account: AccountId,
    },

    /// Source balance is lower than the requested amount
    ///
    /// This is a recoverable error - the transfer is aborted and both
    /// accounts remain unchanged.
    #[error("Insufficient funds in account {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Source account id
        account: AccountId,
        /// Balance observed under lock
        available: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// Account creation collided with an existing id
    #[error("Account id {account} already exists!")]
    DuplicateAccount {
        /// The duplicated account id
        account: AccountId,
    },

    /// Notifier reported a failure after the transfer was committed
    #[error("Notification for account {account} failed: {message}")]
    Notification {
        /// Account that was being notified
        account: AccountId,
        /// Reason given by the notifier
        message: String,
    },

    /// Lock for an account could not be acquired within the configured bound
    #[error("Timed out after {timeout_ms}ms waiting for lock on account {account}")]
    LockTimeout {
        /// Account whose lock was contended
        account: AccountId,
        /// Configured acquisition bound in milliseconds
        timeout_ms: u128,
    },

    /// Balance arithmetic would overflow the decimal range
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account id
        account: AccountId,
    },

    /// Store rejected a write; the transfer was rolled back
    #[error("Failed to write account {account}: {message}")]
    StoreWrite {
        /// Account whose write failed
        account: AccountId,
        /// Store-provided reason
        message: String,
    },

    /// A failed commit could not be compensated
    ///
    /// This is fatal: exactly one side of the transfer may have been applied.
    #[error("Inconsistent state between accounts {from} and {to}: {message}")]
    InconsistentState {
        /// Source account id
        from: AccountId,
        /// Destination account id
        to: AccountId,
        /// What went wrong during compensation
        message: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: &AccountId) -> Self {
        LedgerError::AccountNotFound {
            account: account.clone(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &AccountId, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.clone(),
            available,
            requested,
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: &AccountId) -> Self {
        LedgerError::DuplicateAccount {
            account: account.clone(),
        }
    }

    /// Create a Notification error
    pub fn notification(account: &AccountId, message: impl Into<String>) -> Self {
        LedgerError::Notification {
            account: account.clone(),
            message: message.into(),
        }
    }

    /// Create a LockTimeout error
    pub fn lock_timeout(account: &AccountId, timeout: std::time::Duration) -> Self {
        LedgerError::LockTimeout {
            account: account.clone(),
            timeout_ms: timeout.as_millis(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.clone(),
        }
    }

    /// Create a StoreWrite error
    pub fn store_write(account: &AccountId, message: impl Into<String>) -> Self {
        LedgerError::StoreWrite {
            account: account.clone(),
            message: message.into(),
        }
    }

    /// Create an InconsistentState error
    pub fn inconsistent_state(from: &AccountId, to: &AccountId, message: impl Into<String>) -> Self {
        LedgerError::InconsistentState {
            from: from.clone(),
            to: to.clone(),
            message: message.into(),
        }
    }

    /// Whether the caller may retry or carry on with other work
    ///
    /// Only a failed compensation leaves the ledger in a state that needs
    /// operator attention.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LedgerError::InconsistentState { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: Decimal::new(-100, 2) },
        "Invalid transfer amount -1.00: must be greater than zero"
    )]
    #[case::account_not_found(
        LedgerError::AccountNotFound { account: AccountId::new("42") },
        "Account 42 not found"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds {
            account: AccountId::new("1"),
            available: Decimal::new(120000, 2),
            requested: Decimal::new(150000, 2),
        },
        "Insufficient funds in account 1: available 1200.00, requested 1500.00"
    )]
    #[case::duplicate_account(
        LedgerError::DuplicateAccount { account: AccountId::new("Id-123") },
        "Account id Id-123 already exists!"
    )]
    #[case::notification(
        LedgerError::Notification { account: AccountId::new("2"), message: "smtp down".to_string() },
        "Notification for account 2 failed: smtp down"
    )]
    #[case::lock_timeout(
        LedgerError::LockTimeout { account: AccountId::new("7"), timeout_ms: 250 },
        "Timed out after 250ms waiting for lock on account 7"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(3), message: "bad field".to_string() },
        "CSV parse error at line 3: bad field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "bad field".to_string() },
        "CSV parse error: bad field"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds(&AccountId::new("1"), Decimal::ONE, Decimal::TEN),
        LedgerError::InsufficientFunds { account: AccountId::new("1"), available: Decimal::ONE, requested: Decimal::TEN }
    )]
    #[case::lock_timeout(
        LedgerError::lock_timeout(&AccountId::new("1"), Duration::from_millis(50)),
        LedgerError::LockTimeout { account: AccountId::new("1"), timeout_ms: 50 }
    )]
    #[case::store_write(
        LedgerError::store_write(&AccountId::new("2"), "disk full"),
        LedgerError::StoreWrite { account: AccountId::new("2"), message: "disk full".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_only_inconsistent_state_is_unrecoverable() {
        let a = AccountId::new("a");
        let b = AccountId::new("b");

        assert!(LedgerError::insufficient_funds(&a, Decimal::ZERO, Decimal::ONE).is_recoverable());
        assert!(LedgerError::store_write(&a, "x").is_recoverable());
        assert!(!LedgerError::inconsistent_state(&a, &b, "x").is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
