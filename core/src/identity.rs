//! Anonymous user and session identifiers.

use std::sync::{Arc, Mutex, PoisonError};

use moodping_types::Identifier;

use crate::storage::{KeyValueStore, StorageError};

/// Durable-storage key of the per-profile user id.
pub const USER_ID_KEY: &str = "user_id";
/// Session-storage key of the per-session id.
pub const SESSION_ID_KEY: &str = "session_id";

/// Resolves the durable user id and the session id, creating each on first use.
///
/// Both are read from storage on every call, so clearing a store yields a fresh
/// identifier on the next call and nothing else does.
pub struct Identity {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    resolve_lock: Mutex<()>,
}

impl Identity {
    #[must_use]
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            durable,
            session,
            resolve_lock: Mutex::new(()),
        }
    }

    pub fn user_id(&self) -> Result<Identifier, StorageError> {
        self.get_or_create(self.durable.as_ref(), USER_ID_KEY)
    }

    pub fn session_id(&self) -> Result<Identifier, StorageError> {
        self.get_or_create(self.session.as_ref(), SESSION_ID_KEY)
    }

    fn get_or_create(
        &self,
        store: &dyn KeyValueStore,
        key: &'static str,
    ) -> Result<Identifier, StorageError> {
        let _guard = self.resolve_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(raw) = store.get(key)? {
            match Identifier::parse(&raw) {
                Ok(id) => return Ok(id),
                Err(e) => tracing::warn!(key, "Replacing malformed stored identifier: {e}"),
            }
        }

        let id = Identifier::generate();
        store.set(key, id.as_str())?;
        tracing::debug!(key, id = %id, "Created identifier");
        Ok(id)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity").finish_non_exhaustive()
    }
}
