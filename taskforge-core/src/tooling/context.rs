//! Execution context handed to tools.

use serde_json::Value;

use crate::agent::events::{AgentEvent, EventSink};
use crate::agent::interrupt::InterruptToken;

/// The narrow surface a tool sees of the run it executes in: which session it
/// serves, a best-effort event sink for progress, and the run's interrupt
/// token so long-running tools can bail out cooperatively.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub session_id: String,
    events: EventSink,
    interrupt: InterruptToken,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>, events: EventSink, interrupt: InterruptToken) -> Self {
        Self {
            session_id: session_id.into(),
            events,
            interrupt,
        }
    }

    /// Context without event delivery, for tests and background work.
    pub fn headless(session_id: impl Into<String>) -> Self {
        Self::new(session_id, EventSink::disabled(), InterruptToken::new())
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt.is_triggered()
    }

    pub fn emit(&self, event: AgentEvent) {
        self.events.emit(event);
    }

    /// Stream intermediate content to the canvas while a tool runs.
    pub fn stream_canvas(&self, content: impl Into<String>) {
        self.events.emit(AgentEvent::CanvasOutput {
            content: content.into(),
            content_type: taskforge_session::CanvasContentType::Markdown,
        });
    }

    /// Report tool progress as a thought-style event.
    pub fn report_progress(&self, message: impl Into<String>) {
        self.events.emit(AgentEvent::Thought {
            content: message.into(),
        });
    }

    pub(crate) fn emit_tool_start(&self, name: &str, params: &Value) {
        self.events.emit(AgentEvent::ToolStart {
            name: name.to_string(),
            params: params.clone(),
        });
    }

    pub(crate) fn emit_tool_result(&self, name: &str, success: bool, content: &str) {
        self.events.emit(AgentEvent::ToolResult {
            name: name.to_string(),
            success,
            content: content.to_string(),
        });
    }
}
