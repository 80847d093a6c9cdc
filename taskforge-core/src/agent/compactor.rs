//! History compaction.
//!
//! Long sessions get their oldest messages folded into one summary thought so
//! the prompt stays bounded. Runs at the end of a loop, not inside it, and
//! its failure is the one error the loop propagates: silently losing history
//! would corrupt every later run on the session.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::info;

use taskforge_session::{Message, Session};

use crate::config::AgentSettings;
use crate::tooling::builtin::SUMMARIZE_TOOL_NAME;
use crate::tooling::{ToolContext, ToolDispatcher, ToolOutcome};

#[derive(Debug, Error)]
pub enum CompactionError {
    #[error("summarization failed: {message}")]
    Summarizer { message: String },
    #[error("summarizer returned a non-text result")]
    NonTextSummary,
}

pub struct HistoryCompactor {
    dispatcher: Arc<ToolDispatcher>,
    max_length: usize,
    keep_tail: usize,
}

impl HistoryCompactor {
    pub fn new(dispatcher: Arc<ToolDispatcher>, settings: &AgentSettings) -> Self {
        Self {
            dispatcher,
            max_length: settings.history_max_length,
            keep_tail: settings.keep_tail(),
        }
    }

    /// Shrink the session history to the configured bound. No-op when the
    /// history already fits. The history is only mutated after the summary
    /// succeeds, so a failed compaction leaves the session untouched.
    pub async fn compact(
        &self,
        session: &mut Session,
        ctx: &ToolContext,
    ) -> Result<(), CompactionError> {
        if session.history.len() <= self.max_length {
            return Ok(());
        }

        let evicted = session.history.len() - self.keep_tail;
        let transcript = render_transcript(&session.history[..evicted]);

        info!(
            session_id = session.id.as_str(),
            history_len = session.history.len(),
            evicted,
            "Compacting session history"
        );

        let outcome = self
            .dispatcher
            .dispatch(SUMMARIZE_TOOL_NAME, json!({ "text": transcript }), ctx)
            .await;

        let summary = match outcome {
            ToolOutcome::Success(value) => value
                .as_str()
                .map(str::to_string)
                .ok_or(CompactionError::NonTextSummary)?,
            ToolOutcome::Failure { message, .. } => {
                return Err(CompactionError::Summarizer { message });
            }
        };

        session.replace_prefix(
            self.keep_tail,
            Message::agent_thought(format!("Summarized conversation: {summary}")),
        );

        info!(
            session_id = session.id.as_str(),
            history_len = session.history.len(),
            "Session history compacted"
        );
        Ok(())
    }
}

/// Role-tagged plain text of the messages being folded away.
fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.payload.role_tag(), m.payload.content()))
        .collect::<Vec<_>>()
        .join("\n")
}
