use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::session::Session;

/// Errors surfaced by a session store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session '{id}' not found")]
    NotFound { id: String },
    #[error("session backend error: {message}")]
    Backend { message: String },
}

/// Narrow contract for loading and saving sessions.
///
/// The agent loop performs no session I/O itself; a caller loads a session,
/// hands it to the loop for its exclusive use, and saves the mutated copy
/// afterwards.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &str) -> Result<Session, StoreError>;
    fn save(&self, session: &Session) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and single-process embedders.
#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Session, StoreError> {
        let sessions = self.sessions.lock().map_err(|_| StoreError::Backend {
            message: "session store lock poisoned".to_string(),
        })?;
        sessions.get(id).cloned().ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().map_err(|_| StoreError::Backend {
            message: "session store lock poisoned".to_string(),
        })?;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
}
