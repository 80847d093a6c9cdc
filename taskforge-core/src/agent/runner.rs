//! The orchestration loop.
//!
//! Drives one objective to a textual result: prompt the model, parse the
//! reply into an intent, act on it, repeat. Bounded by `max_iterations`,
//! the malformed-reply limit, and the loop detector; interruption is checked
//! at the top of each iteration and again right before the LLM call.

use std::sync::Arc;

use tracing::{debug, info, warn};

use taskforge_session::{Message, MessagePayload, Session};

use super::compactor::HistoryCompactor;
use super::detector::LoopDetector;
use super::errors::AgentError;
use super::events::{AgentEvent, EventSink};
use super::interrupt::InterruptToken;
use super::parser;
use super::prompt::{CORRECTIVE_INSTRUCTION, master_prompt};
use crate::config::AgentSettings;
use crate::model::{ConversationTurn, GatewayReply, ProviderGateway};
use crate::tooling::{ToolContext, ToolDispatcher, ToolRegistry};

const INTERRUPTED_RESULT: &str = "Agent execution interrupted.";
const CANVAS_RESULT: &str = "Agent displayed content on the canvas.";
const MAX_ITERATIONS_RESULT: &str = "Agent reached maximum iterations without a final answer.";
const MALFORMED_RESULT: &str = "Agent stopped due to persistent malformed responses.";
const LOOP_RESULT: &str = "Agent stuck in a loop.";

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Answered,
    CanvasDisplayed,
    Interrupted,
    MaxIterations,
    RepeatingBehavior,
    MalformedResponses,
    ProvidersExhausted,
}

/// The textual result of a run and how it was reached.
#[derive(Debug)]
pub struct RunOutcome {
    pub text: String,
    pub termination: Termination,
}

impl RunOutcome {
    fn new(text: impl Into<String>, termination: Termination) -> Self {
        Self {
            text: text.into(),
            termination,
        }
    }
}

pub struct Agent {
    gateway: Arc<ProviderGateway>,
    registry: Arc<ToolRegistry>,
    dispatcher: Arc<ToolDispatcher>,
    compactor: HistoryCompactor,
    settings: AgentSettings,
    base_prompt: Option<String>,
    events: EventSink,
}

impl Agent {
    pub fn new(
        gateway: Arc<ProviderGateway>,
        registry: Arc<ToolRegistry>,
        settings: AgentSettings,
        base_prompt: Option<String>,
    ) -> Self {
        let dispatcher = Arc::new(ToolDispatcher::new(registry.clone(), &settings));
        let compactor = HistoryCompactor::new(dispatcher.clone(), &settings);
        Self {
            gateway,
            registry,
            dispatcher,
            compactor,
            settings,
            base_prompt,
            events: EventSink::disabled(),
        }
    }

    /// Attach an event sink for run progress.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Drive one objective to completion on the given session.
    pub async fn run(
        &self,
        session: &mut Session,
        objective: &str,
        interrupt: InterruptToken,
    ) -> Result<RunOutcome, AgentError> {
        if self.gateway.is_empty() {
            return Err(AgentError::NoProviders);
        }

        info!(session_id = session.id.as_str(), "Agent run started");
        session.push(Message::user(objective));

        let system_prompt = master_prompt(self.base_prompt.as_deref(), &self.registry);
        let ctx = ToolContext::new(session.id.clone(), self.events.clone(), interrupt.clone());
        let mut detector = LoopDetector::new(&self.settings);
        let mut malformed_count: u32 = 0;

        let mut outcome = RunOutcome::new(MAX_ITERATIONS_RESULT, Termination::MaxIterations);

        for iteration in 1..=self.settings.max_iterations {
            if interrupt.is_triggered() {
                outcome = self.interrupted(session);
                break;
            }

            debug!(iteration, "Agent iteration");
            let turns = build_turns(&session.history);

            // The listener may have fired while history was being assembled;
            // do not start a new LLM call after that point.
            if interrupt.is_triggered() {
                outcome = self.interrupted(session);
                break;
            }

            let raw = match self
                .gateway
                .invoke(session, Some(system_prompt.clone()), turns)
                .await
            {
                GatewayReply::Served { text, .. } => text,
                GatewayReply::Exhausted { attempts } => {
                    let text = GatewayReply::exhausted_text(&attempts);
                    session.push(Message::agent_response(text.clone()));
                    outcome = RunOutcome::new(text, Termination::ProvidersExhausted);
                    break;
                }
            };

            let intent = parser::parse(&raw);

            if intent.is_empty() {
                malformed_count += 1;
                warn!(malformed_count, "Model reply carried no usable intent");
                if malformed_count >= self.settings.malformed_limit {
                    outcome =
                        RunOutcome::new(MALFORMED_RESULT, Termination::MalformedResponses);
                    break;
                }
                session.push(Message::user(CORRECTIVE_INSTRUCTION));
                continue;
            }
            malformed_count = 0;

            if let Some(thought) = &intent.thought {
                info!(thought = thought.as_str(), "Agent thought");
                session.push(Message::agent_thought(thought));
                self.events.emit(AgentEvent::Thought {
                    content: thought.clone(),
                });
            }

            if let Some(command) = &intent.command {
                let result = self
                    .dispatcher
                    .dispatch(&command.name, command.params_value(), &ctx)
                    .await;
                session.push(Message::tool_result(&command.name, result.render()));

                if detector.observe(intent.thought.as_deref(), Some(command)) {
                    outcome = RunOutcome::new(LOOP_RESULT, Termination::RepeatingBehavior);
                    break;
                }
                continue;
            }

            if let Some(canvas) = intent.canvas {
                session.push(Message::agent_canvas_output(
                    canvas.content.clone(),
                    canvas.content_type,
                ));
                self.events.emit(AgentEvent::CanvasOutput {
                    content: canvas.content,
                    content_type: canvas.content_type,
                });
                self.events.emit(AgentEvent::CanvasClose);
                outcome = RunOutcome::new(CANVAS_RESULT, Termination::CanvasDisplayed);
                break;
            }

            if let Some(answer) = intent.answer {
                session.push(Message::agent_response(answer.clone()));
                self.events.emit(AgentEvent::Response {
                    content: answer.clone(),
                });
                outcome = RunOutcome::new(answer, Termination::Answered);
                break;
            }

            // Thought-only reply: keep thinking.
        }

        // Compaction failure is the only error surfaced from a finished run.
        self.compactor.compact(session, &ctx).await?;

        info!(
            session_id = session.id.as_str(),
            termination = ?outcome.termination,
            "Agent run finished"
        );
        Ok(outcome)
    }

    fn interrupted(&self, session: &mut Session) -> RunOutcome {
        info!(session_id = session.id.as_str(), "Agent run interrupted");
        session.push(Message::agent_response(INTERRUPTED_RESULT));
        RunOutcome::new(INTERRUPTED_RESULT, Termination::Interrupted)
    }
}

/// Flatten history into role-tagged turns. Canvas output is a terminal side
/// effect, never replayed to the model.
fn build_turns(history: &[Message]) -> Vec<ConversationTurn> {
    history
        .iter()
        .filter_map(|message| match &message.payload {
            MessagePayload::User { content } => Some(ConversationTurn::user(content)),
            MessagePayload::AgentThought { content }
            | MessagePayload::AgentResponse { content } => Some(ConversationTurn::model(content)),
            MessagePayload::ToolResult { tool, content } => Some(ConversationTurn::tool(
                format!("Tool '{tool}' result: {content}"),
            )),
            MessagePayload::AgentCanvasOutput { .. } => None,
        })
        .collect()
}
