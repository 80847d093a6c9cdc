use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content type of a canvas payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasContentType {
    Html,
    Markdown,
    Text,
    Url,
}

impl CanvasContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            CanvasContentType::Html => "html",
            CanvasContentType::Markdown => "markdown",
            CanvasContentType::Text => "text",
            CanvasContentType::Url => "url",
        }
    }
}

/// The discriminated message body.
///
/// Every entry in a session history is one of these kinds. Canvas output is
/// carried in history for the record but is not replayed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePayload {
    User {
        content: String,
    },
    AgentThought {
        content: String,
    },
    AgentResponse {
        content: String,
    },
    AgentCanvasOutput {
        content: String,
        content_type: CanvasContentType,
    },
    ToolResult {
        tool: String,
        content: String,
    },
}

impl MessagePayload {
    /// The text carried by this message, regardless of kind.
    pub fn content(&self) -> &str {
        match self {
            MessagePayload::User { content }
            | MessagePayload::AgentThought { content }
            | MessagePayload::AgentResponse { content }
            | MessagePayload::AgentCanvasOutput { content, .. }
            | MessagePayload::ToolResult { content, .. } => content,
        }
    }

    /// Role tag used when flattening history into prompt text.
    pub fn role_tag(&self) -> &'static str {
        match self {
            MessagePayload::User { .. } => "user",
            MessagePayload::AgentThought { .. } => "agent_thought",
            MessagePayload::AgentResponse { .. } => "agent_response",
            MessagePayload::AgentCanvasOutput { .. } => "agent_canvas_output",
            MessagePayload::ToolResult { .. } => "tool_result",
        }
    }
}

/// One entry in a session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: MessagePayload,
}

impl Message {
    pub fn new(payload: MessagePayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessagePayload::User {
            content: content.into(),
        })
    }

    pub fn agent_thought(content: impl Into<String>) -> Self {
        Self::new(MessagePayload::AgentThought {
            content: content.into(),
        })
    }

    pub fn agent_response(content: impl Into<String>) -> Self {
        Self::new(MessagePayload::AgentResponse {
            content: content.into(),
        })
    }

    pub fn agent_canvas_output(
        content: impl Into<String>,
        content_type: CanvasContentType,
    ) -> Self {
        Self::new(MessagePayload::AgentCanvasOutput {
            content: content.into(),
            content_type,
        })
    }

    pub fn tool_result(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(MessagePayload::ToolResult {
            tool: tool.into(),
            content: content.into(),
        })
    }
}
