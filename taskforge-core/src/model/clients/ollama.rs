//! Ollama client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ModelProviderConfig;
use crate::model::traits::ModelClient;
use crate::model::types::{ModelError, ModelReply, ModelRequest, TurnRole};

/// Ollama client for local LLM
#[derive(Clone)]
pub struct OllamaClient {
    base: HttpClientBase,
}

impl OllamaClient {
    /// Creates client from provider config.
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), None),
        }
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelReply, ModelError> {
        let url = self.base.build_url("/api/chat");

        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(json!({ "role": "system", "content": system }));
        }
        for turn in &request.turns {
            let role = match turn.role {
                TurnRole::Model => "assistant",
                TurnRole::User | TurnRole::Tool => "user",
            };
            messages.push(json!({ "role": role, "content": turn.text }));
        }

        let payload = OllamaRequest {
            model: request.model.clone(),
            messages,
            stream: false,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            turns = request.turns.len(),
            "Sending request to Ollama"
        );

        let response: OllamaResponse = self.base.post_no_auth(&url, &payload).await?;
        debug!("Received response from Ollama");

        let content = response
            .message
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing message"))?
            .content;

        Ok(ModelReply::new(content))
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<serde_json::Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}
