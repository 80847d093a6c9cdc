//! Model provider configuration.
//!
//! Each `[[providers]]` entry names one LLM backend. Entry order in the file
//! is the fallback hierarchy: the agent tries providers in this order until
//! one serves the request.

use serde::{Deserialize, Serialize};

/// Configuration for one model provider in the fallback hierarchy.
///
/// # Example
///
/// ```toml
/// [[providers]]
/// id = "gemini"
/// type = "gemini"
/// endpoint = "https://generativelanguage.googleapis.com"
/// api_key = "GEMINI_API_KEY"
/// model = "gemini-2.0-flash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelProviderConfig {
    /// Unique identifier for this provider (e.g. "gemini", "ollama-local")
    pub id: String,
    /// Provider type determines the API format: "ollama", "gemini", "openai"
    #[serde(rename = "type")]
    pub provider_type: String,
    /// API endpoint URL
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API path override (e.g. "v1beta/models" for Gemini)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
    /// Model identifier used in API calls
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawProviderConfig {
    pub(super) id: String,
    #[serde(rename = "type", default)]
    pub(super) provider_type: String,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
    pub(super) model: Option<String>,
}

impl RawProviderConfig {
    pub(super) fn into_config(self, default_model: &str) -> ModelProviderConfig {
        ModelProviderConfig {
            id: self.id,
            provider_type: self.provider_type,
            endpoint: self.endpoint.unwrap_or_default(),
            api_key: self.api_key,
            api_path: self.api_path,
            model: self.model.unwrap_or_else(|| default_model.to_string()),
        }
    }
}
