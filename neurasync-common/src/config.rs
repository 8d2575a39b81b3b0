//! Configuration loading
//!
//! Resolution priority:
//! 1. Command-line argument (highest priority, applied by the binary)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and defaults
//! are used. A file that exists but cannot be parsed is a `Config` error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "NEURASYNC_CONFIG";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub detection: DetectionConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing level used when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Emotion detection provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Prediction endpoint of the hosted vision model
    pub vision_endpoint: Option<String>,
    pub vision_api_key: Option<String>,
    /// Base URL of the local detection service
    pub local_service_url: Option<String>,
    /// Per-provider timeout
    pub timeout_secs: u64,
    /// Fall back to generated emotions when every provider fails
    pub mock_fallback: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            vision_endpoint: None,
            vision_api_key: None,
            local_service_url: None,
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            mock_fallback: true,
        }
    }
}

/// Which chat backend answers therapy messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatProviderKind {
    OpenAi,
    Gemini,
    #[default]
    Scripted,
}

impl std::str::FromStr for ChatProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ChatProviderKind::OpenAi),
            "gemini" => Ok(ChatProviderKind::Gemini),
            "scripted" => Ok(ChatProviderKind::Scripted),
            other => Err(Error::Config(format!("Unknown chat provider: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub provider: ChatProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: ChatProviderKind::default(),
            openai_api_key: None,
            openai_model: "gpt-4o".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-pro".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TomlConfig {
    /// Overlay provider settings found in the environment
    ///
    /// Environment values win over the file; blank values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = env_value("OPENAI_API_KEY") {
            self.chat.openai_api_key = Some(key);
        }
        if let Some(key) = env_value("GEMINI_API_KEY") {
            self.chat.gemini_api_key = Some(key);
        }
        if let Some(provider) = env_value("NEURASYNC_CHAT_PROVIDER") {
            match provider.parse() {
                Ok(kind) => self.chat.provider = kind,
                Err(e) => warn!("Ignoring NEURASYNC_CHAT_PROVIDER: {}", e),
            }
        }
        if let Some(key) = env_value("VERTEX_AI_API_KEY").or_else(|| env_value("GOOGLE_CLOUD_API_KEY")) {
            self.detection.vision_api_key = Some(key);
        }
        if let Some(endpoint) = env_value("NEURASYNC_VISION_ENDPOINT") {
            self.detection.vision_endpoint = Some(endpoint);
        }
        if let Some(url) = env_value("NEURASYNC_LOCAL_DETECTOR_URL") {
            self.detection.local_service_url = Some(url);
        }
        if let Some(level) = env_value("NEURASYNC_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Config file path: explicit argument, then `NEURASYNC_CONFIG`, then the
/// platform config directory
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env_value(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    default_config_path()
}

/// `~/.config/neurasync/config.toml` on Linux, the platform equivalent elsewhere
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("neurasync").join("config.toml"))
}

/// Load a TOML config file, using defaults when the file is missing
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolve the path, load the file and apply environment overrides
pub fn load_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match resolve_config_path(cli_path) {
        Some(path) => load_toml_config(&path)?,
        None => {
            warn!("Could not determine config directory, using defaults");
            TomlConfig::default()
        }
    };
    config.apply_env_overrides();
    Ok(config)
}
