//! Parsed model intent.

use serde::Deserialize;
use serde_json::{Map, Value};

use taskforge_session::CanvasContentType;

/// A tool invocation the model asked for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Command {
    pub name: String,
    /// Tool arguments; absent in the raw reply means `{}`.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Command {
    pub fn new(name: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn params_value(&self) -> Value {
        Value::Object(self.params.clone())
    }
}

/// Content the model wants rendered on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CanvasDirective {
    pub content: String,
    #[serde(default = "default_canvas_type", rename = "contentType")]
    pub content_type: CanvasContentType,
}

fn default_canvas_type() -> CanvasContentType {
    CanvasContentType::Markdown
}

/// Everything a single model reply can carry. All fields optional; a reply
/// that fills none of them is malformed data the loop re-prompts about, never
/// a parse error.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ParsedIntent {
    pub thought: Option<String>,
    pub command: Option<Command>,
    pub canvas: Option<CanvasDirective>,
    pub answer: Option<String>,
}

impl ParsedIntent {
    /// Malformed: none of the four recognized fields present.
    pub fn is_empty(&self) -> bool {
        self.thought.is_none()
            && self.command.is_none()
            && self.canvas.is_none()
            && self.answer.is_none()
    }

    pub fn answer_only(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }
}
