//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ModelProviderConfig;
use crate::model::factory::resolve_api_key;
use crate::model::traits::ModelClient;
use crate::model::types::{ModelError, ModelReply, ModelRequest, TurnRole};

/// OpenAI-compatible client (works with OpenAI, Mistral, Groq, etc.)
#[derive(Clone)]
pub struct OpenAiClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAiClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| "/v1/chat/completions".to_string()),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelReply, ModelError> {
        let url = self.base.build_url(&self.api_path);

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

        let payload = OpenAiRequest {
            model: request.model.clone(),
            messages,
            stream: false,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            turns = request.turns.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAiResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!("Received response from OpenAI-compatible provider");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing content"))?;

        Ok(ModelReply::new(content))
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<serde_json::Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiMessage>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}
