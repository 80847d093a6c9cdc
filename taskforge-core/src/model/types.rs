//! Model types - request, reply, and classified errors

use thiserror::Error;

/// Role of one conversation turn sent to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
    Tool,
}

/// One role-tagged text turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Model, text)
    }

    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Tool, text)
    }
}

/// Request for one LLM call.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub turns: Vec<ConversationTurn>,
}

/// Raw text reply from a backend.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
}

impl ModelReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Classified backend errors. The gateway decides from the class whether to
/// retry the same backend, advance to the next one, or both.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' rate limited the request")]
    RateLimited { provider: String },
    #[error("provider '{provider}' rejected the credentials")]
    Auth { provider: String },
    #[error("provider '{provider}' timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
        }
    }

    pub fn auth(provider: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            provider: provider.into(),
            seconds,
        }
    }

    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Transient errors are worth retrying against the same backend.
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Timeout { .. } => true,
            ModelError::Network { source, .. } => {
                source.is_timeout()
                    || source.is_connect()
                    || source.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}
