//! Tool contract: what a capability must declare and how its result travels
//! back into the loop.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::context::ToolContext;

/// JSON kind a declared parameter must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
            ParamKind::Array => "array",
        }
    }

    /// Whether `value` is of this kind. Integers count as numbers.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::Object => value.is_object(),
            ParamKind::Array => value.is_array(),
        }
    }
}

/// One declared tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// Errors a tool implementation may raise. The dispatcher converts every one
/// of them into a [`ToolOutcome::Failure`]; they never reach the loop as `Err`.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid parameters: {reason}")]
    InvalidParams { reason: String },
    #[error("{reason}")]
    Execution { reason: String },
}

impl ToolError {
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }
}

/// What the loop records after a dispatch. Failure is expected data, carried
/// into history as a `ToolResult` the model can react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure { name: String, message: String },
}

impl ToolOutcome {
    pub fn failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success(_))
    }

    /// Text form that enters session history.
    pub fn render(&self) -> String {
        match self {
            ToolOutcome::Success(Value::String(text)) => text.clone(),
            ToolOutcome::Success(value) => value.to_string(),
            ToolOutcome::Failure { message, .. } => format!("Error: {message}"),
        }
    }
}

/// A capability the agent can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Declared parameters, validated by the dispatcher before execution.
    fn params(&self) -> &[ParamSpec];

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value, ToolError>;
}
