pub mod agent;
pub mod error;
pub mod loader;
pub mod provider;

/// Default config file path - can be overridden by the embedding binary
pub const CONFIG_PATH: &str = "config/taskforge.toml";

pub use agent::AgentSettings;
pub use error::ConfigError;
pub use loader::{AppConfig, load_config};
pub use provider::ModelProviderConfig;
