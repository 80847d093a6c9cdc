use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;

use dotenvy::from_filename;
use serde::Deserialize;
use tracing::debug;

use super::CONFIG_PATH;
use super::agent::AgentSettings;
use super::error::ConfigError;
use super::provider::{ModelProviderConfig, RawProviderConfig};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub providers: Vec<RawProviderConfig>,
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Fallback model used by providers that do not name their own.
    pub model: String,
    /// Extra text prepended to the master prompt.
    pub system_prompt: Option<String>,
    pub agent: AgentSettings,
    /// Provider fallback hierarchy, in file order.
    pub providers: Vec<ModelProviderConfig>,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        load_config(path)
    }
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename("config/.env");
    });
}

/// Load and validate configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    read_config(config_path)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading taskforge configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    if parsed.providers.is_empty() {
        return Err(ConfigError::NoProvidersConfigured);
    }

    let default_model = parsed.model.unwrap_or_default();
    let mut providers: Vec<ModelProviderConfig> = Vec::new();
    for raw_provider in parsed.providers {
        if raw_provider.endpoint.is_none() {
            return Err(ConfigError::MissingEndpoint {
                provider: raw_provider.id.clone(),
            });
        }
        if providers.iter().any(|p| p.id == raw_provider.id) {
            return Err(ConfigError::DuplicateProvider {
                provider: raw_provider.id.clone(),
            });
        }
        providers.push(raw_provider.into_config(&default_model));
    }

    let agent = parsed.agent;
    if agent.max_iterations == 0 {
        return Err(ConfigError::InvalidAgentSetting {
            field: "max_iterations",
        });
    }
    if agent.history_max_length == 0 {
        return Err(ConfigError::InvalidAgentSetting {
            field: "history_max_length",
        });
    }
    if agent.max_behavior_history == 0 {
        return Err(ConfigError::InvalidAgentSetting {
            field: "max_behavior_history",
        });
    }

    Ok(AppConfig {
        model: default_model,
        system_prompt: parsed.system_prompt,
        agent,
        providers,
    })
}
