//! Configuration loading and graceful degradation
//!
//! Tests that manipulate environment variables are marked #[serial] so they
//! do not race each other.

use neurasync_common::config::{
    load_config, load_toml_config, resolve_config_path, ChatProviderKind, TomlConfig,
    CONFIG_PATH_ENV,
};
use neurasync_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PROVIDER_ENV_VARS: [&str; 8] = [
    "OPENAI_API_KEY",
    "GEMINI_API_KEY",
    "VERTEX_AI_API_KEY",
    "GOOGLE_CLOUD_API_KEY",
    "NEURASYNC_CHAT_PROVIDER",
    "NEURASYNC_VISION_ENDPOINT",
    "NEURASYNC_LOCAL_DETECTOR_URL",
    "NEURASYNC_LOG_LEVEL",
];

fn clear_env() {
    env::remove_var(CONFIG_PATH_ENV);
    for name in PROVIDER_ENV_VARS {
        env::remove_var(name);
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_toml_config(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_partial_file_fills_remaining_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
port = 8080

[chat]
provider = "gemini"
gemini_api_key = "g-key"

[detection]
local_service_url = "http://localhost:8502"
timeout_secs = 3
"#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.bind_addr, "127.0.0.1");
    assert_eq!(config.chat.provider, ChatProviderKind::Gemini);
    assert_eq!(config.chat.gemini_api_key.as_deref(), Some("g-key"));
    assert_eq!(config.chat.gemini_model, "gemini-1.5-pro");
    assert_eq!(
        config.detection.local_service_url.as_deref(),
        Some("http://localhost:8502")
    );
    assert_eq!(config.detection.timeout_secs, 3);
    assert!(config.detection.mock_fallback);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server\nport = ");

    match load_toml_config(&path) {
        Err(Error::Config(msg)) => assert!(msg.contains("Parse TOML failed")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_config_round_trips_through_toml() {
    let mut config = TomlConfig::default();
    config.chat.provider = ChatProviderKind::OpenAi;
    config.detection.vision_endpoint = Some("https://vision.example/predict".to_string());

    let text = toml::to_string(&config).unwrap();
    let parsed: TomlConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
#[serial]
fn test_cli_path_beats_env_path() {
    clear_env();
    env::set_var(CONFIG_PATH_ENV, "/tmp/neurasync-env.toml");

    let cli = Path::new("/tmp/neurasync-cli.toml");
    assert_eq!(resolve_config_path(Some(cli)), Some(cli.to_path_buf()));
    assert_eq!(
        resolve_config_path(None),
        Some(PathBuf::from("/tmp/neurasync-env.toml"))
    );

    clear_env();
}

#[test]
#[serial]
fn test_env_keys_override_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[chat]
provider = "scripted"
openai_api_key = "from-file"
"#,
    );

    env::set_var("OPENAI_API_KEY", "from-env");
    env::set_var("NEURASYNC_CHAT_PROVIDER", "openai");
    env::set_var("GOOGLE_CLOUD_API_KEY", "gcloud-key");

    let config = load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.chat.openai_api_key.as_deref(), Some("from-env"));
    assert_eq!(config.chat.provider, ChatProviderKind::OpenAi);
    assert_eq!(config.detection.vision_api_key.as_deref(), Some("gcloud-key"));

    clear_env();
}

#[test]
#[serial]
fn test_vertex_key_preferred_and_blank_env_ignored() {
    clear_env();
    env::set_var("VERTEX_AI_API_KEY", "vertex-key");
    env::set_var("GOOGLE_CLOUD_API_KEY", "gcloud-key");
    env::set_var("GEMINI_API_KEY", "   ");

    let mut config = TomlConfig::default();
    config.chat.gemini_api_key = Some("file-key".to_string());
    config.apply_env_overrides();

    assert_eq!(config.detection.vision_api_key.as_deref(), Some("vertex-key"));
    assert_eq!(config.chat.gemini_api_key.as_deref(), Some("file-key"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_provider_env_is_ignored() {
    clear_env();
    env::set_var("NEURASYNC_CHAT_PROVIDER", "nonsense");

    let mut config = TomlConfig::default();
    config.apply_env_overrides();
    assert_eq!(config.chat.provider, ChatProviderKind::Scripted);

    clear_env();
}
