//! History compaction at the end of a run.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use taskforge_core::agent::{Agent, InterruptToken, Termination};
use taskforge_core::config::AgentSettings;
use taskforge_core::model::types::{ModelError, ModelReply, ModelRequest};
use taskforge_core::model::{ModelClient, ProviderGateway};
use taskforge_core::tooling::builtin::SUMMARIZE_TOOL_NAME;
use taskforge_core::tooling::{ParamKind, ParamSpec, Tool, ToolContext, ToolError, ToolRegistry};
use taskforge_session::{Message, Session};

struct AnswerClient;

#[async_trait]
impl ModelClient for AnswerClient {
    fn id(&self) -> &str {
        "answering"
    }

    async fn chat(&self, _request: ModelRequest) -> Result<ModelReply, ModelError> {
        Ok(ModelReply::new(r#"{"answer": "all done"}"#))
    }
}

/// Summarizer stub that records how much text it was asked to fold away.
struct StubSummarizer;

#[async_trait]
impl Tool for StubSummarizer {
    fn name(&self) -> &str {
        SUMMARIZE_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Summarizes text"
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
        let text = params["text"].as_str().unwrap_or_default();
        assert!(!text.is_empty());
        Ok(Value::String("earlier work, condensed".to_string()))
    }
}

fn agent_with_bound(history_max_length: usize) -> Agent {
    let settings = AgentSettings {
        history_max_length,
        ..AgentSettings::default()
    };
    let gateway = Arc::new(ProviderGateway::from_clients(
        vec![(
            "answering".to_string(),
            Box::new(AnswerClient) as Box<dyn ModelClient>,
        )],
        "test-model",
    ));
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(StubSummarizer)).unwrap();
    Agent::new(gateway, Arc::new(registry), settings, None)
}

fn preloaded_session(len: usize) -> Session {
    let mut session = Session::new("long-running");
    for i in 0..len {
        session.push(Message::user(format!("step {i}")));
    }
    session
}

#[tokio::test]
async fn oversized_history_is_compacted_to_the_bound() {
    // 1198 preexisting + objective + answer = 1200 entering compaction.
    let mut session = preloaded_session(1198);

    let outcome = agent_with_bound(1000)
        .run(&mut session, "finish up", InterruptToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::Answered);
    assert_eq!(session.history.len(), 1000);
    assert_eq!(
        session.history[0].payload.content(),
        "Summarized conversation: earlier work, condensed"
    );
    // The newest messages survive verbatim.
    assert_eq!(
        session.history.last().unwrap().payload.content(),
        "all done"
    );
}

#[tokio::test]
async fn short_history_is_left_alone() {
    let mut session = preloaded_session(5);

    agent_with_bound(1000)
        .run(&mut session, "finish up", InterruptToken::new())
        .await
        .unwrap();

    // 5 preexisting + objective + answer, untouched.
    assert_eq!(session.history.len(), 7);
    assert_eq!(session.history[0].payload.content(), "step 0");
}
