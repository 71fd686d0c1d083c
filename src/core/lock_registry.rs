//! Per-account lock registry
//!
//! Maps every account id ever referenced by a transfer to a dedicated mutex.
//! Locks are created lazily on first reference and kept for the lifetime of
//! the registry; the registry grows by at most one entry per distinct id.
//!
//! # Single-creation guarantee
//!
//! Creation goes through `DashMap::entry(..).or_insert_with(..)`, which runs
//! under the shard's write lock. Concurrent first lookups of the same id
//! therefore all observe the one lock that was inserted, never a private copy.

use crate::types::AccountId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mutual-exclusion primitive guarding a single account
///
/// The mutex protects no data of its own; holding it grants the right to
/// read-validate-write that account's record in the store.
pub type AccountLock = Mutex<()>;

/// Registry of per-account locks
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<AccountId, Arc<AccountLock>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock for `id`, creating it on first reference
    ///
    /// The shard guard is released before returning, so callers may block on
    /// the returned lock without holding up unrelated registry lookups.
    pub fn lock_for(&self, id: &AccountId) -> Arc<AccountLock> {
        if let Some(existing) = self.locks.get(id) {
            return Arc::clone(existing.value());
        }

        let entry = self
            .locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(entry.value())
    }

    /// Get the locks for both accounts of a transfer, in argument order
    ///
    /// When `a == b` both halves are the same `Arc`. Ordering for acquisition
    /// is left to the caller.
    pub fn acquire_pair(
        &self,
        a: &AccountId,
        b: &AccountId,
    ) -> (Arc<AccountLock>, Arc<AccountLock>) {
        let lock_a = self.lock_for(a);
        let lock_b = if a == b {
            Arc::clone(&lock_a)
        } else {
            self.lock_for(b)
        };
        (lock_a, lock_b)
    }

    /// Number of distinct account ids seen so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_lock_for_reuses_existing_lock() {
        let registry = LockRegistry::new();
        let id = AccountId::new("1");

        let first = registry.lock_for(&id);
        let second = registry.lock_for(&id);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_ids_get_distinct_locks() {
        let registry = LockRegistry::new();

        let (a, b) = registry.acquire_pair(&AccountId::new("1"), &AccountId::new("2"));

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_acquire_pair_same_id_returns_same_lock() {
        let registry = LockRegistry::new();
        let id = AccountId::new("A");

        let (a, b) = registry.acquire_pair(&id, &id);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_acquire_pair_is_symmetric() {
        let registry = LockRegistry::new();
        let x = AccountId::new("x");
        let y = AccountId::new("y");

        let (x1, y1) = registry.acquire_pair(&x, &y);
        let (y2, x2) = registry.acquire_pair(&y, &x);

        assert!(Arc::ptr_eq(&x1, &x2));
        assert!(Arc::ptr_eq(&y1, &y2));
    }

    #[test]
    fn test_concurrent_first_lookups_return_identical_lock() {
        let registry = Arc::new(LockRegistry::new());
        let barrier = Arc::new(Barrier::new(100));
        let mut handles = vec![];

        for _ in 0..100 {
            let registry_clone = Arc::clone(&registry);
            let barrier_clone = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier_clone.wait();
                registry_clone.lock_for(&AccountId::new("never-seen"))
            }));
        }

        let locks: Vec<Arc<AccountLock>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        for lock in &locks[1..] {
            assert!(Arc::ptr_eq(&locks[0], lock));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_never_evicts() {
        let registry = LockRegistry::new();

        for i in 0..50 {
            let _ = registry.lock_for(&AccountId::new(i.to_string()));
        }
        // Dropping every returned Arc leaves the entries in place
        assert_eq!(registry.len(), 50);
    }
}
