//! Model provider layer: request/reply types, HTTP clients for the supported
//! backend families, and the fallback gateway that walks the configured
//! provider hierarchy.

pub mod clients;
pub mod factory;
pub mod gateway;
pub mod traits;
pub mod types;

pub use clients::{GeminiClient, OllamaClient, OpenAiClient};
pub use factory::ProviderFactory;
pub use gateway::{GatewayReply, ProviderAttempt, ProviderGateway};
pub use traits::ModelClient;
pub use types::{ConversationTurn, ModelError, ModelReply, ModelRequest, TurnRole};
