use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::session::SessionState;

/// Opaque handle the presentation layer passes back on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction so each session's state stays isolated from the others.
pub trait SessionStore: Send + Sync {
    fn insert(&self, id: SessionId, state: SessionState) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionState>, StoreError>;
    /// Runs `command` against the stored session and keeps its changes only on `Ok`.
    ///
    /// Commands on the same session never interleave: each one sees every change
    /// committed before it. A missing session is reported as [`StoreError::NotFound`].
    fn modify<T, E, F>(&self, id: &SessionId, command: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionState) -> Result<T, E>,
        E: From<StoreError>;
    fn remove(&self, id: &SessionId) -> Result<Option<SessionState>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store; one mutex guards the whole map.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SessionState>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Commands only ever mutate a draft, so a poisoned map still holds committed states.
    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionState>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, id: SessionId, state: SessionState) -> Result<(), StoreError> {
        let mut guard = self.lock();
        if guard.contains_key(&id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(id, state);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        Ok(self.lock().get(id).cloned())
    }

    fn modify<T, E, F>(&self, id: &SessionId, command: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionState) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut guard = self.lock();
        let slot = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        let mut draft = slot.clone();
        let output = command(&mut draft)?;
        *slot = draft;
        Ok(output)
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        Ok(self.lock().remove(id))
    }
}
