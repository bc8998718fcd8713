//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, PoisonError};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigLoader, PayrollPolicy};
use crate::error::EngineResult;
use crate::storage::{InMemoryStore, Storage};

/// Shared application state.
///
/// Holds the store, the payroll policy and the time source. Every mutation
/// goes through [`AppState::write`], which serializes writers behind a single
/// gate so concurrent requests cannot interleave a duplicate check with its
/// insert.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Storage>,
    policy: Arc<PayrollPolicy>,
    clock: Arc<dyn Clock>,
    write_gate: Arc<Mutex<()>>,
}

impl AppState {
    /// Creates state with an empty in-memory store and the system clock.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_parts(
            Arc::new(InMemoryStore::new()),
            config.into_policy(),
            Arc::new(SystemClock),
        )
    }

    /// Creates state from explicit collaborators.
    pub fn with_parts(
        store: Arc<dyn Storage>,
        policy: PayrollPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
            clock,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the store for reads.
    pub fn store(&self) -> &dyn Storage {
        self.store.as_ref()
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// Returns the time source.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Runs `op` while holding the write gate.
    ///
    /// The gate is a blocking `std::sync::Mutex` held for the whole of `op`,
    /// including a full payroll run, so callers on an async runtime should
    /// run long operations on a blocking thread. The gate guards no data, so
    /// a gate poisoned by a panicking writer is reclaimed and later writes
    /// proceed.
    pub fn write<T>(&self, op: impl FnOnce(&dyn Storage) -> EngineResult<T>) -> EngineResult<T> {
        let _guard = self
            .write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        op(self.store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEmployee;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_store() {
        let state = AppState::new(ConfigLoader::default());
        let other = state.clone();

        state
            .write(|store| {
                store.insert_employee(NewEmployee {
                    id: "E1".to_string(),
                    full_name: "Ada Lovelace".to_string(),
                    role: "Analyst".to_string(),
                    department: None,
                    contact: None,
                    hourly_rate: None,
                })
            })
            .unwrap();

        assert!(other.store().read_employee("E1").unwrap().is_some());
    }

    #[test]
    fn test_write_recovers_after_panicking_writer() {
        let state = AppState::new(ConfigLoader::default());

        let panicking = state.clone();
        let joined = std::thread::spawn(move || {
            panicking.write::<()>(|_| panic!("writer panicked"))
        })
        .join();
        assert!(joined.is_err());
        assert!(state.write_gate.is_poisoned());

        let employee = state
            .write(|store| {
                store.insert_employee(NewEmployee {
                    id: "E2".to_string(),
                    full_name: "Grace Hopper".to_string(),
                    role: "Engineer".to_string(),
                    department: None,
                    contact: None,
                    hourly_rate: None,
                })
            })
            .unwrap();
        assert_eq!(employee.id, "E2");
    }
}
