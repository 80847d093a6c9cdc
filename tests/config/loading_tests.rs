//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serial_test::serial;
use tempfile::TempDir;

use taskforge_core::config::{AppConfig, ConfigError, ModelProviderConfig};
use taskforge_core::model::factory::resolve_api_key;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("taskforge.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn full_config_loads_from_a_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
model = "gemini-2.0-flash"
system_prompt = "You are TaskForge."

[agent]
max_iterations = 6
history_max_length = 500

[[providers]]
id = "gemini-main"
type = "gemini"
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"

[[providers]]
id = "local-ollama"
type = "ollama"
endpoint = "http://localhost:11434"
model = "llama3"
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("config loads");

    assert_eq!(config.model, "gemini-2.0-flash");
    assert_eq!(config.system_prompt.as_deref(), Some("You are TaskForge."));
    assert_eq!(config.agent.max_iterations, 6);
    assert_eq!(config.agent.history_max_length, 500);

    let ids: Vec<_> = config.providers.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["gemini-main", "local-ollama"]);
    assert_eq!(config.providers[0].model, "gemini-2.0-flash");
    assert_eq!(config.providers[1].model, "llama3");
}

#[test]
fn missing_file_is_a_not_found_error() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/taskforge.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "model = [broken");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn config_without_providers_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "model = \"m\"\n");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::NoProvidersConfigured)));
}

#[test]
#[serial]
fn api_keys_resolve_through_environment_variable_names() {
    // SAFETY: serialized test, no concurrent env access.
    unsafe {
        std::env::set_var("TASKFORGE_TEST_KEY", "secret-value");
    }
    let resolved = resolve_api_key("test-provider", Some("TASKFORGE_TEST_KEY"));
    assert_eq!(resolved.as_deref(), Some("secret-value"));

    unsafe {
        std::env::remove_var("TASKFORGE_TEST_KEY");
    }
    let resolved = resolve_api_key("test-provider", Some("TASKFORGE_TEST_KEY"));
    assert_eq!(resolved, None);

    assert_eq!(resolve_api_key("test-provider", None), None);
    assert_eq!(resolve_api_key("test-provider", Some("   ")), None);
}

#[test]
fn provider_config_carries_the_env_var_name_not_the_secret() {
    let config = ModelProviderConfig {
        id: "p".to_string(),
        provider_type: "openai".to_string(),
        endpoint: "https://api.example.com".to_string(),
        api_key: Some("MY_KEY_VAR".to_string()),
        api_path: None,
        model: "gpt-4o".to_string(),
    };

    assert_eq!(config.api_key.as_deref(), Some("MY_KEY_VAR"));
}
