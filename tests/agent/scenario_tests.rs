//! End-to-end agent loop scenarios over scripted providers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use taskforge_core::agent::{Agent, AgentEvent, EventSink, InterruptToken, Termination};
use taskforge_core::config::AgentSettings;
use taskforge_core::model::types::{ModelError, ModelReply, ModelRequest};
use taskforge_core::model::{ModelClient, ProviderGateway};
use taskforge_core::tooling::{ParamSpec, Tool, ToolContext, ToolError, ToolRegistry};
use taskforge_session::Session;

/// Backend that always rejects with a rate limit.
struct RateLimitedClient {
    id: String,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl ModelClient for RateLimitedClient {
    fn id(&self) -> &str {
        &self.id
    }

    async fn chat(&self, _request: ModelRequest) -> Result<ModelReply, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ModelError::rate_limited(&self.id))
    }
}

/// Backend that replays a fixed reply forever.
struct FixedClient {
    id: String,
    reply: String,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl ModelClient for FixedClient {
    fn id(&self) -> &str {
        &self.id
    }

    async fn chat(&self, _request: ModelRequest) -> Result<ModelReply, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ModelReply::new(self.reply.clone()))
    }
}

/// Backend that trips an interrupt token as a side effect of serving.
struct InterruptingClient {
    token: InterruptToken,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl ModelClient for InterruptingClient {
    fn id(&self) -> &str {
        "interrupting"
    }

    async fn chat(&self, _request: ModelRequest) -> Result<ModelReply, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.trigger();
        Ok(ModelReply::new(r#"{"thought": "one more step"}"#))
    }
}

struct NoopTool;

#[async_trait]
impl Tool for NoopTool {
    fn name(&self) -> &str {
        "noop"
    }

    fn description(&self) -> &str {
        "Does nothing"
    }

    fn params(&self) -> &[ParamSpec] {
        &[]
    }

    async fn execute(&self, _params: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(Value::String("ok".to_string()))
    }
}

fn agent_over(gateway: ProviderGateway) -> Agent {
    Agent::new(
        Arc::new(gateway),
        Arc::new(ToolRegistry::new()),
        AgentSettings::default(),
        None,
    )
}

#[tokio::test]
async fn rate_limited_primary_falls_back_and_the_session_remembers() {
    let primary_calls = Arc::new(AtomicU32::new(0));
    let gateway = ProviderGateway::from_clients(
        vec![
            (
                "primary".to_string(),
                Box::new(RateLimitedClient {
                    id: "primary".to_string(),
                    calls: primary_calls.clone(),
                }) as Box<dyn ModelClient>,
            ),
            (
                "secondary".to_string(),
                Box::new(FixedClient {
                    id: "secondary".to_string(),
                    reply: r#"{"answer": "42"}"#.to_string(),
                    calls: Arc::new(AtomicU32::new(0)),
                }),
            ),
        ],
        "test-model",
    );
    let mut session = Session::new("fallback");

    let outcome = agent_over(gateway)
        .run(&mut session, "the ultimate question", InterruptToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::Answered);
    assert_eq!(outcome.text, "42");
    assert_eq!(session.active_llm_provider.as_deref(), Some("secondary"));
    // Rate limit advances immediately, no same-backend retries.
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhausted_hierarchy_surfaces_as_the_final_answer() {
    let gateway = ProviderGateway::from_clients(
        vec![(
            "only".to_string(),
            Box::new(RateLimitedClient {
                id: "only".to_string(),
                calls: Arc::new(AtomicU32::new(0)),
            }) as Box<dyn ModelClient>,
        )],
        "test-model",
    );
    let mut session = Session::new("exhausted");

    let outcome = agent_over(gateway)
        .run(&mut session, "anything", InterruptToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::ProvidersExhausted);
    assert!(outcome.text.starts_with("All LLM providers failed"));
}

#[tokio::test]
async fn interrupt_during_iteration_prevents_the_next_llm_call() {
    let token = InterruptToken::new();
    let calls = Arc::new(AtomicU32::new(0));
    let gateway = ProviderGateway::from_clients(
        vec![(
            "interrupting".to_string(),
            Box::new(InterruptingClient {
                token: token.clone(),
                calls: calls.clone(),
            }) as Box<dyn ModelClient>,
        )],
        "test-model",
    );
    let mut session = Session::new("interrupt");

    let outcome = agent_over(gateway)
        .run(&mut session, "long task", token)
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::Interrupted);
    assert_eq!(outcome.text, "Agent execution interrupted.");
    // The in-flight call completed; no new one was started.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_identical_behavior_is_cut_short() {
    let calls = Arc::new(AtomicU32::new(0));
    let gateway = ProviderGateway::from_clients(
        vec![(
            "stuck".to_string(),
            Box::new(FixedClient {
                id: "stuck".to_string(),
                reply: r#"{"thought": "checking the same thing", "command": {"name": "noop"}}"#
                    .to_string(),
                calls: calls.clone(),
            }) as Box<dyn ModelClient>,
        )],
        "test-model",
    );
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(NoopTool)).unwrap();
    let settings = AgentSettings::default();
    let agent = Agent::new(Arc::new(gateway), Arc::new(registry), settings.clone(), None);
    let mut session = Session::new("loop");

    let outcome = agent
        .run(&mut session, "verify the thing", InterruptToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::RepeatingBehavior);
    assert_eq!(outcome.text, "Agent stuck in a loop.");
    // Termination well before the iteration cap.
    assert!((calls.load(Ordering::SeqCst) as usize) < settings.max_iterations);
}

#[tokio::test]
async fn malformed_forever_terminates_within_the_malformed_limit() {
    let calls = Arc::new(AtomicU32::new(0));
    let gateway = ProviderGateway::from_clients(
        vec![(
            "garbage".to_string(),
            Box::new(FixedClient {
                id: "garbage".to_string(),
                reply: "{{{ never valid".to_string(),
                calls: calls.clone(),
            }) as Box<dyn ModelClient>,
        )],
        "test-model",
    );
    let mut session = Session::new("malformed");
    let settings = AgentSettings::default();

    let outcome = agent_over(ProviderGateway::from_clients(vec![], "unused"))
        .run(&mut session, "anything", InterruptToken::new())
        .await;
    assert!(outcome.is_err(), "no providers must be a configuration error");

    let agent = Agent::new(
        Arc::new(gateway),
        Arc::new(ToolRegistry::new()),
        settings.clone(),
        None,
    );
    let mut session = Session::new("malformed");
    let outcome = agent
        .run(&mut session, "anything", InterruptToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::MalformedResponses);
    assert_eq!(
        calls.load(Ordering::SeqCst),
        settings.malformed_limit,
        "one LLM call per malformed strike"
    );
}

#[tokio::test]
async fn unknown_tool_failure_reaches_the_event_stream_and_the_run_recovers() {
    struct TwoStepClient {
        step: AtomicU32,
    }

    #[async_trait]
    impl ModelClient for TwoStepClient {
        fn id(&self) -> &str {
            "two-step"
        }

        async fn chat(&self, _request: ModelRequest) -> Result<ModelReply, ModelError> {
            let step = self.step.fetch_add(1, Ordering::SeqCst);
            if step == 0 {
                Ok(ModelReply::new(
                    r#"{"command": {"name": "missing_tool", "params": {}}}"#,
                ))
            } else {
                Ok(ModelReply::new(r#"{"answer": "managed anyway"}"#))
            }
        }
    }

    let gateway = ProviderGateway::from_clients(
        vec![(
            "two-step".to_string(),
            Box::new(TwoStepClient {
                step: AtomicU32::new(0),
            }) as Box<dyn ModelClient>,
        )],
        "test-model",
    );
    let (sink, mut events) = EventSink::channel();
    let agent = Agent::new(
        Arc::new(gateway),
        Arc::new(ToolRegistry::new()),
        AgentSettings::default(),
        None,
    )
    .with_events(sink);
    let mut session = Session::new("recovery");

    let outcome = agent
        .run(&mut session, "try the tool", InterruptToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::Answered);
    assert_eq!(outcome.text, "managed anyway");

    let mut saw_failed_tool = false;
    while let Ok(event) = events.try_recv() {
        if let AgentEvent::ToolResult { name, success, content } = event {
            assert_eq!(name, "missing_tool");
            assert!(!success);
            assert!(content.contains("Tool not found: missing_tool"));
            saw_failed_tool = true;
        }
    }
    assert!(saw_failed_tool);
}
