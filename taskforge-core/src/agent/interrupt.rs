//! Cooperative interruption.
//!
//! A run never aborts mid-operation. The token is a monotonic flag the loop
//! polls at its safe points (top of iteration, before the LLM call); once set
//! it stays set for the lifetime of the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Clone-cheap interrupt flag shared between a run and its controllers.
#[derive(Debug, Clone, Default)]
pub struct InterruptToken {
    flag: Arc<AtomicBool>,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request interruption. Irreversible for this token.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Subscription to out-of-band notices published on a topic. Implementations
/// bridge whatever pub/sub transport the host application uses.
#[async_trait]
pub trait InterruptChannel: Send + Sync {
    /// Subscribe to raw JSON notice payloads for `topic`. The receiver closes
    /// when the subscription ends.
    async fn subscribe(&self, topic: &str) -> UnboundedReceiver<String>;
}

/// Topic carrying interruption notices for one session.
pub fn interrupt_topic(session_id: &str) -> String {
    format!("session:{session_id}:interrupt")
}

/// Bind a session's interrupt topic to a token. Notices must carry
/// `{"action": "interrupt"}`; anything else is logged and ignored. The task
/// ends when the subscription closes or the token trips.
pub fn spawn_interrupt_listener(
    channel: Arc<dyn InterruptChannel>,
    session_id: String,
    token: InterruptToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let topic = interrupt_topic(&session_id);
        let mut notices = channel.subscribe(&topic).await;
        debug!(topic = topic.as_str(), "Listening for interruption notices");

        while let Some(raw) = notices.recv().await {
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(notice) if notice.get("action").and_then(|a| a.as_str()) == Some("interrupt") => {
                    info!(
                        session_id = session_id.as_str(),
                        "Interruption requested for session"
                    );
                    token.trigger();
                    break;
                }
                Ok(_) => debug!(topic = topic.as_str(), "Ignoring unrelated notice"),
                Err(err) => warn!(topic = topic.as_str(), %err, "Discarding unparsable notice"),
            }
        }
    })
}
