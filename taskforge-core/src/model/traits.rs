//! Model client trait

use async_trait::async_trait;

use super::types::{ModelError, ModelReply, ModelRequest};

/// One LLM backend in the fallback hierarchy.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Get the client ID
    fn id(&self) -> &str;

    /// Send a chat request and return the raw text reply
    async fn chat(&self, request: ModelRequest) -> Result<ModelReply, ModelError>;
}
