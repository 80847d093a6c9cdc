//! Tool dispatch: lookup, validation, bounded execution, outcome capture.
//!
//! Everything that can go wrong here becomes a `ToolOutcome::Failure` the
//! model gets to see and react to. The dispatcher never hands the loop an
//! `Err`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::timeout;
use tracing::{info, warn};

use super::context::ToolContext;
use super::interface::ToolOutcome;
use super::registry::ToolRegistry;
use crate::config::AgentSettings;

const TRUNCATION_NOTICE: &str = "... [output truncated]";

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    execution_timeout: Duration,
    output_cap: usize,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, settings: &AgentSettings) -> Self {
        Self {
            registry,
            execution_timeout: settings.tool_timeout(),
            output_cap: settings.tool_output_cap,
        }
    }

    /// Run one named tool invocation to an outcome.
    pub async fn dispatch(&self, name: &str, params: Value, ctx: &ToolContext) -> ToolOutcome {
        let Some(tool) = self.registry.lookup(name) else {
            warn!(tool = name, "Model requested an unknown tool");
            return ToolOutcome::failure(name, format!("Tool not found: {name}"));
        };

        if let Some(reason) = validate_params(&tool, &params) {
            warn!(tool = name, reason = reason.as_str(), "Rejected tool parameters");
            return ToolOutcome::failure(name, reason);
        }

        info!(tool = name, "Executing tool");
        ctx.emit_tool_start(name, &params);

        let outcome = match timeout(self.execution_timeout, tool.execute(params, ctx)).await {
            Ok(Ok(value)) => ToolOutcome::Success(truncate_output(value, self.output_cap)),
            Ok(Err(err)) => {
                warn!(tool = name, %err, "Tool execution failed");
                ToolOutcome::failure(name, err.to_string())
            }
            Err(_) => {
                warn!(
                    tool = name,
                    timeout_secs = self.execution_timeout.as_secs(),
                    "Tool execution timed out"
                );
                ToolOutcome::failure(
                    name,
                    format!(
                        "Tool execution timed out after {}s",
                        self.execution_timeout.as_secs()
                    ),
                )
            }
        };

        ctx.emit_tool_result(name, outcome.is_success(), &outcome.render());
        outcome
    }
}

fn validate_params(tool: &Arc<dyn super::interface::Tool>, params: &Value) -> Option<String> {
    let specs = tool.params();
    if specs.is_empty() {
        return None;
    }

    let Some(object) = params.as_object() else {
        return Some(format!(
            "Parameters for '{}' must be a JSON object",
            tool.name()
        ));
    };

    for spec in specs {
        match object.get(spec.name) {
            None | Some(Value::Null) if spec.required => {
                return Some(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    spec.name,
                    tool.name()
                ));
            }
            Some(value) if !value.is_null() && !spec.kind.matches(value) => {
                return Some(format!(
                    "Parameter '{}' for tool '{}' must be a {}",
                    spec.name,
                    tool.name(),
                    spec.kind.as_str()
                ));
            }
            _ => {}
        }
    }
    None
}

/// Cap oversized outputs before they enter history. String values keep their
/// head; anything else is rendered to JSON first when it exceeds the cap.
fn truncate_output(value: Value, cap: usize) -> Value {
    let rendered = match &value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if rendered.chars().count() <= cap {
        return value;
    }
    let head: String = rendered.chars().take(cap).collect();
    Value::String(format!("{head}{TRUNCATION_NOTICE}"))
}
