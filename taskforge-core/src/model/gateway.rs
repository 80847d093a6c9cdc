//! Provider fallback gateway.
//!
//! Walks the ranked provider hierarchy until one backend serves the request.
//! Hierarchy order is authoritative; there is no load balancing. Iteration
//! starts from the session's last-known-good provider to minimize backend
//! switches, wrapping around so every configured backend gets one chance.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use taskforge_session::Session;

use super::factory::ProviderFactory;
use super::traits::ModelClient;
use super::types::{ConversationTurn, ModelError, ModelRequest};
use crate::config::{AgentSettings, ModelProviderConfig};

/// Record of one failed backend invocation. Used only to decide whether to
/// advance the hierarchy and to explain an exhausted run; never persisted.
#[derive(Debug)]
pub struct ProviderAttempt {
    pub provider: String,
    pub error: ModelError,
}

/// Outcome of walking the hierarchy. Exhaustion is data, not an error, so the
/// loop can surface it as the final answer instead of crashing.
#[derive(Debug)]
pub enum GatewayReply {
    Served {
        text: String,
        provider: String,
    },
    Exhausted {
        attempts: Vec<ProviderAttempt>,
    },
}

impl GatewayReply {
    /// Final-answer text for a fully failed hierarchy.
    pub fn exhausted_text(attempts: &[ProviderAttempt]) -> String {
        let detail: Vec<String> = attempts
            .iter()
            .map(|a| format!("{}: {}", a.provider, a.error))
            .collect();
        format!("All LLM providers failed. Attempts: [{}]", detail.join("; "))
    }
}

struct Backend {
    id: String,
    model: String,
    client: Box<dyn ModelClient>,
}

/// The fallback manager over the ranked backend hierarchy.
pub struct ProviderGateway {
    backends: Vec<Backend>,
    transient_retries: u32,
    call_timeout: Duration,
}

impl ProviderGateway {
    /// Build the gateway from configuration, instantiating HTTP clients
    /// through the factory. Config order is hierarchy order.
    pub fn from_configs(configs: &[ModelProviderConfig], settings: &AgentSettings) -> Self {
        let backends = configs
            .iter()
            .map(|config| Backend {
                id: config.id.clone(),
                model: config.model.clone(),
                client: ProviderFactory::create(config),
            })
            .collect();

        Self {
            backends,
            transient_retries: 2,
            call_timeout: settings.llm_timeout(),
        }
    }

    /// Build a gateway over pre-constructed clients. Used by tests and by
    /// embedders that bring their own backends.
    pub fn from_clients(clients: Vec<(String, Box<dyn ModelClient>)>, model: &str) -> Self {
        let backends = clients
            .into_iter()
            .map(|(id, client)| Backend {
                id,
                model: model.to_string(),
                client,
            })
            .collect();

        Self {
            backends,
            transient_retries: 2,
            call_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_transient_retries(mut self, retries: u32) -> Self {
        self.transient_retries = retries;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Walk the hierarchy for one request. On success the session's
    /// `active_llm_provider` is updated to the serving backend.
    pub async fn invoke(
        &self,
        session: &mut Session,
        system_prompt: Option<String>,
        turns: Vec<ConversationTurn>,
    ) -> GatewayReply {
        let reply = self
            .complete(session.active_llm_provider.as_deref(), system_prompt, turns)
            .await;
        if let GatewayReply::Served { provider, .. } = &reply {
            if session.active_llm_provider.as_deref() != Some(provider.as_str()) {
                info!(provider = provider.as_str(), "Switching active LLM provider");
            }
            session.active_llm_provider = Some(provider.clone());
        }
        reply
    }

    /// Walk the hierarchy without touching session state. `active` seeds the
    /// rotation when it names a configured backend.
    pub async fn complete(
        &self,
        active: Option<&str>,
        system_prompt: Option<String>,
        turns: Vec<ConversationTurn>,
    ) -> GatewayReply {
        let mut attempts = Vec::new();

        for backend in self.rotation(active) {
            match self.call_backend(backend, &system_prompt, &turns).await {
                Ok(text) => {
                    return GatewayReply::Served {
                        text,
                        provider: backend.id.clone(),
                    };
                }
                Err(error) => {
                    warn!(
                        provider = backend.id.as_str(),
                        %error,
                        "Backend failed, advancing fallback hierarchy"
                    );
                    attempts.push(ProviderAttempt {
                        provider: backend.id.clone(),
                        error,
                    });
                }
            }
        }

        warn!(
            attempts = attempts.len(),
            "Every backend in the hierarchy failed"
        );
        GatewayReply::Exhausted { attempts }
    }

    /// One backend, with bounded same-backend retries for transient errors.
    /// Rate-limit and auth failures advance immediately.
    async fn call_backend(
        &self,
        backend: &Backend,
        system_prompt: &Option<String>,
        turns: &[ConversationTurn],
    ) -> Result<String, ModelError> {
        let mut attempt = 0;
        loop {
            let request = ModelRequest {
                model: backend.model.clone(),
                system_prompt: system_prompt.clone(),
                turns: turns.to_vec(),
            };

            let result = match timeout(self.call_timeout, backend.client.chat(request)).await {
                Ok(result) => result,
                Err(_) => Err(ModelError::timeout(
                    &backend.id,
                    self.call_timeout.as_secs(),
                )),
            };

            match result {
                Ok(reply) => return Ok(reply.text),
                Err(error) if error.is_transient() && attempt < self.transient_retries => {
                    attempt += 1;
                    debug!(
                        provider = backend.id.as_str(),
                        attempt,
                        %error,
                        "Retrying backend after transient error"
                    );
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Hierarchy order, rotated so the session's active provider (when it is
    /// still configured) goes first.
    fn rotation(&self, active: Option<&str>) -> impl Iterator<Item = &Backend> {
        let start = active
            .and_then(|id| self.backends.iter().position(|b| b.id == id))
            .unwrap_or(0);
        self.backends
            .iter()
            .skip(start)
            .chain(self.backends.iter().take(start))
    }
}
