use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config as cfg;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Values shipped in sample `.env` files that must not be treated as real keys.
const PLACEHOLDER_KEYS: [&str; 3] = [
    "your-gemini-api-key-here",
    "your-openai-api-key-here",
    "changeme",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body, in bytes
    #[serde(default = "ServerConfig::default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    fn default_max_body_bytes() -> usize {
        16 * 1024 * 1024
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            max_body_bytes: Self::default_max_body_bytes(),
        }
    }
}

/// Generative-text service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "LlmConfig::default_enabled")]
    pub enabled: bool,
    /// "auto", "gemini", "openai" or "openai-compatible"
    #[serde(default = "LlmConfig::default_provider")]
    pub provider: String,
    /// Model override; each provider has its own default
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL override; each provider has its own default
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub gemini_api_key: Option<SecretString>,
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<SecretString>,
    #[serde(default = "LlmConfig::default_temperature")]
    pub temperature: f32,
    #[serde(default = "LlmConfig::default_max_output_tokens")]
    pub max_output_tokens: usize,
    /// Upper bound on a single generation call, in seconds
    #[serde(default = "LlmConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_provider() -> String {
        "auto".to_string()
    }

    fn default_temperature() -> f32 {
        0.7
    }

    fn default_max_output_tokens() -> usize {
        8192
    }

    fn default_timeout_secs() -> u64 {
        60
    }

    /// Gemini key from config, then `GEMINI_API_KEY`. Placeholders count as absent.
    pub fn gemini_key(&self) -> Option<String> {
        resolve_secret(self.gemini_api_key.as_ref(), "GEMINI_API_KEY")
    }

    /// OpenAI key from config, then `OPENAI_API_KEY`. Placeholders count as absent.
    pub fn openai_key(&self) -> Option<String> {
        resolve_secret(self.openai_api_key.as_ref(), "OPENAI_API_KEY")
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            provider: Self::default_provider(),
            model: None,
            base_url: None,
            gemini_api_key: None,
            openai_api_key: None,
            temperature: Self::default_temperature(),
            max_output_tokens: Self::default_max_output_tokens(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// Spreadsheet request log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "SheetsConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub sheet_id: Option<String>,
    /// A1 range rows are appended after
    #[serde(default = "SheetsConfig::default_range")]
    pub range: String,
    /// Path to a service-account JSON key
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    /// Inline service-account JSON; takes precedence over the path
    #[serde(default, skip_serializing)]
    pub credentials_json: Option<SecretString>,
    #[serde(default = "SheetsConfig::default_api_base")]
    pub api_base: String,
    #[serde(default = "SheetsConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SheetsConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_range() -> String {
        "Sheet1!A:K".to_string()
    }

    fn default_api_base() -> String {
        "https://sheets.googleapis.com/v4".to_string()
    }

    fn default_timeout_secs() -> u64 {
        15
    }

    pub fn sheet_id(&self) -> Option<String> {
        self.sheet_id
            .clone()
            .or_else(|| env::var("GOOGLE_SHEET_ID").ok())
            .filter(|id| !id.trim().is_empty())
    }

    pub fn credentials_json(&self) -> Option<String> {
        resolve_secret(self.credentials_json.as_ref(), "GOOGLE_CREDENTIALS_JSON")
    }

    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path
            .clone()
            .or_else(|| env::var("GOOGLE_CREDENTIALS_PATH").ok().map(PathBuf::from))
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            sheet_id: None,
            range: Self::default_range(),
            credentials_path: None,
            credentials_json: None,
            api_base: Self::default_api_base(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_env")]
    pub env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: Self::default_env(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            sheets: SheetsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    pub fn default_env() -> String {
        env::var("APP_ENV")
            .ok()
            .or_else(|| env::var("RUST_ENV").ok())
            .unwrap_or_else(|| "development".to_string())
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.server.host.trim().is_empty(),
            "server.host cannot be empty"
        );
        anyhow::ensure!(self.server.port > 0, "server.port must be > 0");
        anyhow::ensure!(
            (0.0..=2.0).contains(&self.llm.temperature),
            "llm.temperature must be within 0.0..=2.0"
        );
        anyhow::ensure!(self.llm.timeout_secs > 0, "llm.timeout_secs must be > 0");
        anyhow::ensure!(
            self.llm.max_output_tokens > 0,
            "llm.max_output_tokens must be > 0"
        );
        anyhow::ensure!(
            !self.sheets.range.trim().is_empty(),
            "sheets.range cannot be empty"
        );
        Ok(())
    }

    /// Load layered settings from `config_dir`:
    /// `default.toml` → `{env}.toml` → `local.toml` → `STARPAIR__*` variables.
    /// A bare `PORT` variable overrides the port when set.
    pub fn load(config_dir: &Path, env_name: &str) -> Result<Self> {
        let mut settings: Settings = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                cfg::File::from(config_dir.join(format!("{}.toml", env_name))).required(false),
            )
            .add_source(cfg::File::from(config_dir.join("local.toml")).required(false))
            .add_source(cfg::Environment::with_prefix("STARPAIR").separator("__"))
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;

        settings.env = env_name.to_string();
        if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            settings.server.port = port;
        }
        settings.validate()?;
        info!(env = env_name, dir = ?config_dir, "configuration loaded");
        Ok(settings)
    }

    /// `./config` when present, otherwise the working directory.
    pub fn default_config_dir() -> PathBuf {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_config = cwd.join("config");
        if project_config.exists() {
            project_config
        } else {
            cwd
        }
    }
}

fn resolve_secret(configured: Option<&SecretString>, env_key: &str) -> Option<String> {
    configured
        .map(|s| s.expose_secret().to_string())
        .or_else(|| env::var(env_key).ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !PLACEHOLDER_KEYS.contains(&v.as_str()))
}
