use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// An identity tag attached to a session (e.g. an authenticated email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One conversation and its durable state.
///
/// The agent loop receives an already-loaded session, appends to `history`,
/// and records the provider that last served it in `active_llm_provider`.
/// History only ever shrinks through [`Session::replace_prefix`], the
/// compaction primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub history: Vec<Message>,
    #[serde(default)]
    pub identities: Vec<Identity>,
    #[serde(default)]
    pub active_llm_provider: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            history: Vec::new(),
            identities: Vec::new(),
            active_llm_provider: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message. History is append-only outside of compaction.
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
        self.updated_at = Utc::now();
    }

    /// Replace everything before the last `keep_tail` messages with a single
    /// summary message. This is the only operation that shrinks history; it
    /// is a no-op when the history already fits in `keep_tail`.
    pub fn replace_prefix(&mut self, keep_tail: usize, summary: Message) {
        if self.history.len() <= keep_tail {
            return;
        }
        let tail = self.history.split_off(self.history.len() - keep_tail);
        self.history = std::iter::once(summary).chain(tail).collect();
        self.updated_at = Utc::now();
    }
}
