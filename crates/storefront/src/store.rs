//! State container that pairs a pure reducer with a persistence adapter.
//!
//! The container is owned by the application root and passed to whatever
//! needs it. Each [`Store::dispatch`] runs the transition to completion and
//! then writes the full snapshot, so there is never partially-applied state to
//! observe.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::persistence::{SnapshotStorage, StorageError};

/// A persistable state with a pure transition function.
pub trait Snapshot: Default + Serialize + DeserializeOwned {
    /// Intents accepted by [`Snapshot::transition`].
    type Action;

    /// Key the snapshot is stored under.
    const STORAGE_KEY: &'static str;

    /// Compute the next state. Must not perform I/O.
    #[must_use]
    fn transition(self, action: Self::Action) -> Self;
}

/// Owns a state value and writes it through `P` after every transition.
#[derive(Debug)]
pub struct Store<S, P> {
    state: S,
    storage: P,
    last_persist_error: Option<StorageError>,
}

impl<S: Snapshot, P: SnapshotStorage> Store<S, P> {
    /// Load the persisted snapshot, falling back to the empty state.
    ///
    /// Missing, unreadable and unparsable snapshots all yield `S::default()`;
    /// the latter two are logged at `warn`.
    pub fn load(storage: P) -> Self {
        let state = match storage.load(S::STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    key = S::STORAGE_KEY,
                    error = %e,
                    "Discarding unparsable snapshot"
                );
                S::default()
            }),
            Ok(None) => {
                tracing::debug!(key = S::STORAGE_KEY, "No snapshot found, starting empty");
                S::default()
            }
            Err(e) => {
                tracing::warn!(key = S::STORAGE_KEY, error = %e, "Failed to read snapshot");
                S::default()
            }
        };

        Self {
            state,
            storage,
            last_persist_error: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Apply `action`, then persist the resulting snapshot.
    ///
    /// A failed write does not roll the state back: the in-memory state stays
    /// authoritative and the failure is kept in [`Store::last_persist_error`]
    /// until a later write succeeds.
    pub fn dispatch(&mut self, action: S::Action) -> &S {
        let current = std::mem::take(&mut self.state);
        self.state = current.transition(action);
        self.persist();
        &self.state
    }

    /// Error from the most recent write, if it failed.
    #[must_use]
    pub const fn last_persist_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    /// Take the error from the most recent write, leaving `None` behind.
    pub const fn take_persist_error(&mut self) -> Option<StorageError> {
        self.last_persist_error.take()
    }

    /// The persistence adapter.
    #[must_use]
    pub const fn storage(&self) -> &P {
        &self.storage
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.state)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.save(S::STORAGE_KEY, &raw));

        match result {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::warn!(
                    key = S::STORAGE_KEY,
                    error = %e,
                    "Failed to persist snapshot, keeping in-memory state"
                );
                self.last_persist_error = Some(e);
            }
        }
    }
}
