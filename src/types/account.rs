//! Account-related types for the transfer engine
//!
//! This module defines the account identifier and the Account record
//! held by the account store.

use rust_decimal::Decimal;
use std::fmt;

/// Account identifier
///
/// Opaque, unique and immutable once the account exists. Identifiers are
/// totally ordered by their string value; that order is what the transfer
/// orchestrator uses to sequence lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Create an identifier from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        AccountId::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        AccountId(id)
    }
}

/// Ledger account
///
/// The balance is an exact decimal. Non-negativity is enforced by transfers
/// only: an account may be opened with a negative balance, but no transfer
/// will push a balance below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The account identifier
    pub id: AccountId,

    /// Current balance
    ///
    /// Mutated only by a thread holding this account's lock.
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with a zero balance
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier for this account
    pub fn new(id: impl Into<AccountId>) -> Self {
        Account {
            id: id.into(),
            balance: Decimal::ZERO,
        }
    }

    /// Create a new account with an opening balance
    pub fn with_balance(id: impl Into<AccountId>, balance: Decimal) -> Self {
        Account {
            id: id.into(),
            balance,
        }
    }
}
