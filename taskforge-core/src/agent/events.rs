//! Run-progress events for an embedding UI or webhook layer.
//!
//! The loop and the dispatcher emit these over an unbounded channel; the
//! transport on the other end is out of scope here. A closed receiver is
//! never an error, events are best-effort.

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use taskforge_session::CanvasContentType;

/// One observable step of a run.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    Thought {
        content: String,
    },
    ToolStart {
        name: String,
        params: Value,
    },
    ToolResult {
        name: String,
        success: bool,
        content: String,
    },
    CanvasOutput {
        content: String,
        content_type: CanvasContentType,
    },
    CanvasClose,
    Response {
        content: String,
    },
}

/// Best-effort sender. `None` means the run is headless.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<AgentEvent>>,
}

impl EventSink {
    pub fn new(sender: UnboundedSender<AgentEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A connected sink plus its receiver, for embedders and tests.
    pub fn channel() -> (Self, UnboundedReceiver<AgentEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: AgentEvent) {
        if let Some(sender) = &self.sender {
            // Receiver gone means nobody is watching; drop silently.
            let _ = sender.send(event);
        }
    }
}
