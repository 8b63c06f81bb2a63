//! Application configuration for DealBrief.
//!
//! User config lives at `~/.dealbrief/dealbrief.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DealBriefError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "dealbrief.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".dealbrief";

// ---------------------------------------------------------------------------
// Config structs (matching dealbrief.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Research synthesis settings.
    #[serde(default)]
    pub synthesis: SynthesisSettings,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default report output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum companies processed concurrently in a batch. Also gates the
    /// synthesis request rate — no more than this many requests in flight.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Timeout in seconds for fetching a pitch-deck document.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_concurrency: default_max_concurrency(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_output_dir() -> String {
    "~/dealbrief-reports".into()
}
fn default_max_concurrency() -> u32 {
    2
}
fn default_fetch_timeout() -> u64 {
    30
}

/// `[synthesis]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisSettings {
    /// Chat-completions endpoint URL of the text-generation service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model to request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature. Kept low so the service follows the schema.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Response token budget.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds. Research responses are large; the bound
    /// exists so one hung request cannot stall a batch.
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_synthesis_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}
fn default_api_key_env() -> String {
    "DEALBRIEF_API_KEY".into()
}
fn default_model() -> String {
    "gpt-4-turbo".into()
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> u32 {
    4000
}
fn default_synthesis_timeout() -> u64 {
    180
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.dealbrief/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DealBriefError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.dealbrief/dealbrief.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DealBriefError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DealBriefError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DealBriefError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DealBriefError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DealBriefError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the API key from the configured env var.
///
/// An absent or empty key is not fatal to the pipeline — synthesis degrades
/// to the fallback brief — but callers that want research output should
/// surface this to the user.
pub fn resolve_api_key(config: &AppConfig) -> Option<String> {
    match std::env::var(&config.synthesis.api_key_env) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => None,
    }
}

/// Check that the API key env var is set and non-empty.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.synthesis.api_key_env;
    resolve_api_key(config).map(|_| ()).ok_or_else(|| {
        DealBriefError::config(format!(
            "research API key not found. Set the {var_name} environment variable."
        ))
    })
}
