//! Thread-safe in-memory account store
//!
//! This module provides the `InMemoryAccountStore` struct, which keeps account
//! records in a `DashMap` so that concurrent transfers touching different
//! accounts never contend on a global lock.
//!
//! # Thread Safety
//!
//! Individual reads and writes are synchronized by DashMap's sharded locks.
//! Consistency across the two accounts of a transfer is not the store's job:
//! the transfer orchestrator holds both per-account locks from the lock
//! registry for the whole read-validate-write sequence.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, LedgerError};
use dashmap::DashMap;

/// Concurrent account store backed by `DashMap`
#[derive(Debug)]
pub struct InMemoryAccountStore {
    /// Account records keyed by id
    accounts: DashMap<AccountId, Account>,
}

impl InMemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    /// Get a clone of the stored account
    ///
    /// The returned value is a snapshot; callers that intend to act on the
    /// balance must re-read it while holding the account's lock.
    fn get(&self, id: &AccountId) -> Option<Account> {
        self.accounts.get(id).map(|entry| entry.value().clone())
    }

    /// Insert a new account
    ///
    /// Insert-if-absent is performed under the entry's shard lock, so two
    /// threads creating the same id concurrently see exactly one success.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateAccount` if the id already exists.
    fn create(&self, account: Account) -> Result<(), LedgerError> {
        let id = account.id.clone();
        let mut inserted = false;

        self.accounts.entry(id.clone()).or_insert_with(|| {
            inserted = true;
            account
        });

        if inserted {
            Ok(())
        } else {
            Err(LedgerError::duplicate_account(&id))
        }
    }

    /// Overwrite an existing account record
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the id was never created.
    fn update(&self, account: Account) -> Result<(), LedgerError> {
        match self.accounts.get_mut(&account.id) {
            Some(mut entry) => {
                *entry.value_mut() = account;
                Ok(())
            }
            None => Err(LedgerError::account_not_found(&account.id)),
        }
    }

    fn get_all(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
