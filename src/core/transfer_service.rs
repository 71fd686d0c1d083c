//! Transfer orchestration
//!
//! This module provides the `TransferService` struct, which moves funds
//! between two accounts while many transfers run concurrently.
//!
//! # Design
//!
//! ```text
//! TransferService
//!     ├── Arc<dyn AccountStore>  (account records)
//!     ├── LockRegistry           (one mutex per account id)
//!     ├── Arc<dyn Notifier>      (best-effort side channel)
//!     └── TransferConfig         (lock timeout, notification policy)
//! ```
//!
//! A transfer takes the two account locks in ascending `AccountId` order.
//! Because every caller uses the same total order, `transfer(A, B)` and
//! `transfer(B, A)` can never wait on each other in a cycle. A self-transfer
//! takes its single lock once.
//!
//! With both locks held the accounts are re-read from the store, the source
//! balance is validated, both new balances are computed, and only then are
//! the two records written. A failure of the second write restores the first.
//! Readers go through `get_account` and `accounts`, which take the same
//! account locks, so no caller ever observes a half-applied move.
//!
//! Locks are released by guard drop in reverse acquisition order on every
//! exit path, including early returns through `?`.

use crate::core::lock_registry::{AccountLock, LockRegistry};
use crate::core::traits::{AccountStore, Notifier};
use crate::types::{
    Account, AccountId, LedgerError, NotificationStatus, TransferReceipt, TransferRequest,
};
use parking_lot::MutexGuard;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// What a notifier failure means to the caller of `transfer`
///
/// Balances are committed before the notifier runs, so neither policy
/// reverts the money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPolicy {
    /// Log a warning and report the failure inside the receipt
    #[default]
    Warn,

    /// Return `LedgerError::Notification` to the caller
    Fail,
}

/// Configuration for the transfer orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferConfig {
    /// Upper bound for each lock acquisition; `None` blocks until acquired
    pub lock_timeout: Option<Duration>,

    pub notification_policy: NotificationPolicy,
}

impl TransferConfig {
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    pub fn with_notification_policy(mut self, policy: NotificationPolicy) -> Self {
        self.notification_policy = policy;
        self
    }
}

/// Concurrency-safe fund transfer orchestrator
///
/// Cheap to share: wrap it in an `Arc` and call `transfer` from as many
/// threads as needed.
pub struct TransferService {
    store: Arc<dyn AccountStore>,
    locks: LockRegistry,
    notifier: Arc<dyn Notifier>,
    config: TransferConfig,
}

impl fmt::Debug for TransferService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferService")
            .field("config", &self.config)
            .field("locks", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl TransferService {
    /// Create a service with the default configuration
    pub fn new(store: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_config(store, notifier, TransferConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        config: TransferConfig,
    ) -> Self {
        Self {
            store,
            locks: LockRegistry::new(),
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Open a new account
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateAccount` if the id already exists.
    pub fn create_account(&self, account: Account) -> Result<(), LedgerError> {
        self.store.create(account)
    }

    /// Current state of an account, read under its lock
    ///
    /// Blocks while a transfer touching the account is in flight, so a debit
    /// that is later rolled back is never observed. Unknown ids return `None`
    /// without registering a lock.
    pub fn get_account(&self, id: &AccountId) -> Option<Account> {
        // Accounts are never removed, so an absent id needs no lock.
        self.store.get(id)?;

        let lock = self.locks.lock_for(id);
        let _guard = lock.lock();
        self.store.get(id)
    }

    /// Consistent snapshot of every account, sorted by id
    ///
    /// Takes the lock of every account present when the call starts, in the
    /// same ascending order transfers use, and reads all of them while holding
    /// every lock. No in-flight transfer is visible half-applied and the sum of
    /// the returned balances is conserved. Accounts created after the locks are
    /// taken are not included.
    pub fn accounts(&self) -> Vec<Account> {
        let mut ids: Vec<AccountId> = self
            .store
            .get_all()
            .into_iter()
            .map(|account| account.id)
            .collect();
        ids.sort();
        ids.dedup();

        let locks: Vec<Arc<AccountLock>> = ids.iter().map(|id| self.locks.lock_for(id)).collect();
        let mut guards: Vec<MutexGuard<'_, ()>> = locks.iter().map(|lock| lock.lock()).collect();

        let accounts = ids.iter().filter_map(|id| self.store.get(id)).collect();

        // Release in reverse acquisition order
        while let Some(guard) = guards.pop() {
            drop(guard);
        }
        accounts
    }

    /// Number of account locks created so far
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Move `request.amount` from `request.from` to `request.to`
    ///
    /// # Returns
    ///
    /// * `Ok(TransferReceipt)` - The transfer was committed
    /// * `Err(LedgerError)` - The transfer was rejected or failed
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive (before locking)
    /// - `LockTimeout` if a bounded acquisition expired (nothing mutated)
    /// - `AccountNotFound` if either account is missing (nothing mutated)
    /// - `InsufficientFunds` if the source balance is too low (nothing mutated)
    /// - `ArithmeticOverflow` if the destination balance would overflow
    /// - `StoreWrite` (or the store's own error) if a write failed and was rolled back
    /// - `InconsistentState` if a write failed and could not be rolled back
    /// - `Notification` if the notifier failed under `NotificationPolicy::Fail`
    ///   (balances stay committed)
    pub fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, LedgerError> {
        request.validate()?;

        let (from_lock, to_lock) = self.locks.acquire_pair(&request.from, &request.to);

        let (first, second) = if request.from <= request.to {
            ((&request.from, &from_lock), (&request.to, &to_lock))
        } else {
            ((&request.to, &to_lock), (&request.from, &from_lock))
        };

        // Declaration order matters: `_second` is dropped before `_first`.
        let _first = self.acquire(first.1, first.0)?;
        let _second = if request.is_self_transfer() {
            None
        } else {
            Some(self.acquire(second.1, second.0)?)
        };

        let (from_account, to_account) = self.apply(request)?;

        debug!(
            from = %request.from,
            to = %request.to,
            amount = %request.amount,
            "Transfer committed"
        );

        let notification = self.notify(request, &to_account)?;

        Ok(TransferReceipt {
            from: request.from.clone(),
            to: request.to.clone(),
            amount: request.amount,
            from_balance: from_account.balance,
            to_balance: to_account.balance,
            notification,
        })
    }

    /// Lock one account, honouring the configured timeout
    fn acquire<'a>(
        &self,
        lock: &'a AccountLock,
        id: &AccountId,
    ) -> Result<MutexGuard<'a, ()>, LedgerError> {
        match self.config.lock_timeout {
            None => Ok(lock.lock()),
            Some(timeout) => lock
                .try_lock_for(timeout)
                .ok_or_else(|| LedgerError::lock_timeout(id, timeout)),
        }
    }

    /// Read, validate and write both accounts
    ///
    /// Must only be called while the locks for both accounts are held.
    /// Returns the committed source and destination records.
    fn apply(&self, request: &TransferRequest) -> Result<(Account, Account), LedgerError> {
        let from = self
            .store
            .get(&request.from)
            .ok_or_else(|| LedgerError::account_not_found(&request.from))?;
        let to = self
            .store
            .get(&request.to)
            .ok_or_else(|| LedgerError::account_not_found(&request.to))?;

        if from.balance < request.amount {
            return Err(LedgerError::insufficient_funds(
                &from.id,
                from.balance,
                request.amount,
            ));
        }

        // Debit and credit cancel out; nothing to write.
        if request.is_self_transfer() {
            return Ok((from, to));
        }

        let new_from_balance = from
            .balance
            .checked_sub(request.amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", &from.id))?;
        let new_to_balance = to
            .balance
            .checked_add(request.amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", &to.id))?;

        let staged_from = Account::with_balance(from.id.clone(), new_from_balance);
        let staged_to = Account::with_balance(to.id.clone(), new_to_balance);

        self.commit(from, staged_from, staged_to)
    }

    /// Write both staged records, restoring the source if the second write fails
    fn commit(
        &self,
        original_from: Account,
        staged_from: Account,
        staged_to: Account,
    ) -> Result<(Account, Account), LedgerError> {
        self.store.update(staged_from.clone())?;

        if let Err(write_error) = self.store.update(staged_to.clone()) {
            return match self.store.update(original_from) {
                Ok(()) => {
                    warn!(
                        from = %staged_from.id,
                        to = %staged_to.id,
                        error = %write_error,
                        "Credit failed, debit rolled back"
                    );
                    Err(write_error)
                }
                Err(rollback_error) => {
                    error!(
                        from = %staged_from.id,
                        to = %staged_to.id,
                        error = %write_error,
                        rollback_error = %rollback_error,
                        "Credit failed and debit could not be rolled back"
                    );
                    Err(LedgerError::inconsistent_state(
                        &staged_from.id,
                        &staged_to.id,
                        format!(
                            "credit failed ({}), rollback failed ({})",
                            write_error, rollback_error
                        ),
                    ))
                }
            };
        }

        Ok((staged_from, staged_to))
    }

    /// Tell the destination about the committed transfer
    fn notify(
        &self,
        request: &TransferRequest,
        destination: &Account,
    ) -> Result<NotificationStatus, LedgerError> {
        let message = format!(
            "Amount of {} successfully transferred from {}",
            request.amount, request.from
        );

        match self.notifier.notify_about_transfer(destination, &message) {
            Ok(()) => Ok(NotificationStatus::Delivered),
            Err(reason) => match self.config.notification_policy {
                NotificationPolicy::Warn => {
                    warn!(
                        account = %destination.id,
                        error = %reason,
                        "Transfer committed but notification failed"
                    );
                    Ok(NotificationStatus::Failed(reason))
                }
                NotificationPolicy::Fail => {
                    Err(LedgerError::notification(&destination.id, reason))
                }
            },
        }
    }
}
