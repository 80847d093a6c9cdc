//! Builtin summarization tool.
//!
//! Goes through the same gateway as the main loop, so summarization inherits
//! the fallback hierarchy for free. Registered under the name the history
//! compactor dispatches.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::super::context::ToolContext;
use super::super::interface::{ParamKind, ParamSpec, Tool, ToolError};
use crate::model::{ConversationTurn, GatewayReply, ProviderGateway};

pub const SUMMARIZE_TOOL_NAME: &str = "summarize";

const SUMMARIZER_PROMPT: &str = "You are a precise summarizer. Condense the \
provided conversation into a short summary that preserves every fact, \
decision, open task, and outcome needed to continue the work. Reply with the \
summary text only.";

pub struct SummarizeTool {
    gateway: Arc<ProviderGateway>,
}

impl SummarizeTool {
    pub fn new(gateway: Arc<ProviderGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &str {
        SUMMARIZE_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Summarizes a block of text, preserving key facts and outcomes"
    }

    fn params(&self) -> &[ParamSpec] {
        const PARAMS: &[ParamSpec] = &[ParamSpec {
            name: "text",
            kind: ParamKind::String,
            required: true,
            description: "Text to summarize",
        }];
        PARAMS
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let text = params["text"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_params("text must be a string"))?;

        info!(chars = text.len(), "Summarizing text");

        let reply = self
            .gateway
            .complete(
                None,
                Some(SUMMARIZER_PROMPT.to_string()),
                vec![ConversationTurn::user(text)],
            )
            .await;

        match reply {
            GatewayReply::Served { text, .. } => Ok(Value::String(text.trim().to_string())),
            GatewayReply::Exhausted { attempts } => Err(ToolError::execution(
                GatewayReply::exhausted_text(&attempts),
            )),
        }
    }
}
