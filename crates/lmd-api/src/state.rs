//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor: one in-memory store per registry, the session
//! store, and the configuration.
//!
//! Stores are **insertion-ordered**. The list pipeline's laws require that
//! an unfiltered listing reproduces the registry in a stable order, so the
//! store keeps a vector of entries rather than a hash map. Registries hold
//! tens of records; linear scans are the simple and sufficient choice.

use std::sync::Arc;

use parking_lot::RwLock;

use lmd_core::{District, UserRecord};
use lmd_state::{ApplicationRecord, InspectionRecord, LicenseRecord};
use uuid::Uuid;

use crate::auth::SessionStore;
use crate::config::AppConfig;

// ── Generic In-Memory Store ─────────────────────────────────────────────────

/// Thread-safe, cloneable, insertion-ordered in-memory store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<K, T> {
    data: Arc<RwLock<Vec<(K, T)>>>,
}

impl<K, T> Clone for Store<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Clone, T: Clone> Store<K, T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Insert a record. An existing key is replaced in place, keeping its
    /// position in the sequence; a new key appends. Returns the previous
    /// value if the key existed.
    pub fn insert(&self, key: K, value: T) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut entry.1, value));
        }
        guard.push((key, value));
        None
    }

    /// Retrieve a record by key.
    pub fn get(&self, key: &K) -> Option<T> {
        self.data
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// List all records in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().iter().map(|(_, v)| v.clone()).collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if
    /// the key is absent.
    pub fn update(&self, key: &K, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.iter_mut().find(|(k, _)| k == key) {
            f(&mut entry.1);
            Some(entry.1.clone())
        } else {
            None
        }
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure may inspect the current state, validate preconditions,
    /// mutate the record, and return `Ok(R)` or `Err(E)`. The entire
    /// operation runs under a single write lock, eliminating TOCTOU races
    /// between read and update.
    ///
    /// Returns `None` if the key is absent, or `Some(result)` with the
    /// closure's `Result`.
    pub fn try_update<R, E>(
        &self,
        key: &K,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        let mut guard = self.data.write();
        guard.iter_mut().find(|(k, _)| k == key).map(|(_, v)| f(v))
    }

    /// Remove a record by key, preserving the order of the rest.
    pub fn remove(&self, key: &K) -> Option<T> {
        let mut guard = self.data.write();
        let idx = guard.iter().position(|(k, _)| k == key)?;
        Some(guard.remove(idx).1)
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &K) -> bool {
        self.data.read().iter().any(|(k, _)| k == key)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Clone, T: Clone> Default for Store<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Application State ───────────────────────────────────────────────────────

/// Shared application state accessible to all route handlers.
///
/// Holds one store per registry, the session store, and the configuration.
/// Clone-friendly via `Arc` internals in each store.
#[derive(Debug, Clone)]
pub struct AppState {
    pub applications: Store<Uuid, ApplicationRecord>,
    pub licenses: Store<Uuid, LicenseRecord>,
    pub inspections: Store<Uuid, InspectionRecord>,
    /// District reference data, keyed by district code.
    pub districts: Store<String, District>,
    pub users: Store<Uuid, UserRecord>,

    /// Active sign-in sessions.
    pub sessions: SessionStore,

    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create an application state with empty stores.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            applications: Store::new(),
            licenses: Store::new(),
            inspections: Store::new(),
            districts: Store::new(),
            users: Store::new(),
            sessions: SessionStore::new(),
            config: Arc::new(config),
        }
    }

    /// Create an application state with default configuration and the seed
    /// dataset loaded — the configuration the consoles demo against.
    pub fn seeded() -> Self {
        let state = Self::with_config(AppConfig::default());
        crate::seed::populate(&state);
        state
    }

    /// Create a seeded state with the given configuration.
    pub fn seeded_with_config(config: AppConfig) -> Self {
        let state = Self::with_config(config);
        crate::seed::populate(&state);
        state
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store<u32, String> {
        Store::new()
    }

    #[test]
    fn new_store_is_empty() {
        let s = store();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(s.list().is_empty());
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let s = store();
        assert!(s.insert(1, "a".into()).is_none());
        assert_eq!(s.get(&1).as_deref(), Some("a"));
        assert!(s.get(&2).is_none());
    }

    #[test]
    fn insert_existing_replaces_in_place() {
        let s = store();
        s.insert(1, "a".into());
        s.insert(2, "b".into());
        let prev = s.insert(1, "a2".into());
        assert_eq!(prev.as_deref(), Some("a"));
        // Position preserved: key 1 still lists first.
        assert_eq!(s.list(), vec!["a2".to_string(), "b".to_string()]);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let s = store();
        for (k, v) in [(3, "c"), (1, "a"), (2, "b")] {
            s.insert(k, v.to_string());
        }
        assert_eq!(s.list(), vec!["c", "a", "b"]);
    }

    #[test]
    fn update_modifies_existing() {
        let s = store();
        s.insert(1, "a".into());
        let updated = s.update(&1, |v| v.push('!'));
        assert_eq!(updated.as_deref(), Some("a!"));
        assert_eq!(s.get(&1).as_deref(), Some("a!"));
        assert!(s.update(&9, |_| {}).is_none());
    }

    #[test]
    fn try_update_threads_the_closure_result() {
        let s = store();
        s.insert(1, "a".into());

        let ok: Option<Result<usize, &str>> = s.try_update(&1, |v| {
            v.push('!');
            Ok(v.len())
        });
        assert_eq!(ok, Some(Ok(2)));

        let rejected: Option<Result<(), &str>> = s.try_update(&1, |_| Err("no"));
        assert_eq!(rejected, Some(Err("no")));

        let missing: Option<Result<(), &str>> = s.try_update(&9, |_| Ok(()));
        assert!(missing.is_none());
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let s = store();
        for (k, v) in [(1, "a"), (2, "b"), (3, "c")] {
            s.insert(k, v.to_string());
        }
        assert_eq!(s.remove(&2).as_deref(), Some("b"));
        assert_eq!(s.list(), vec!["a", "c"]);
        assert!(s.remove(&2).is_none());
    }

    #[test]
    fn clone_shares_underlying_data() {
        let s = store();
        s.insert(1, "a".into());
        let clone = s.clone();
        clone.insert(2, "b".into());
        assert_eq!(s.len(), 2);
        assert!(s.contains(&2));
    }

    #[test]
    fn seeded_state_populates_every_registry() {
        let state = AppState::seeded();
        assert!(!state.applications.is_empty());
        assert!(!state.licenses.is_empty());
        assert!(!state.inspections.is_empty());
        assert!(!state.districts.is_empty());
        assert!(!state.users.is_empty());
    }
}
