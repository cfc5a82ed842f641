//! Application configuration for vtdex.
//!
//! User config lives at `~/.vtdex/vtdex.toml`.
//! A missing file means every value takes its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VtdexError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "vtdex.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".vtdex";

/// Largest number of channel ids the YouTube API accepts per request.
pub const MAX_CHANNEL_BATCH: usize = 50;

// ---------------------------------------------------------------------------
// Config structs (matching vtdex.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where stage outputs are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Listing site settings.
    #[serde(default)]
    pub listing: ListingConfig,

    /// YouTube Data API settings.
    #[serde(default)]
    pub youtube: YoutubeConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory holding the stage files.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Basic stage output.
    #[serde(default = "default_basic_file")]
    pub basic_file: String,

    /// Detailed stage output.
    #[serde(default = "default_detailed_file")]
    pub detailed_file: String,

    /// YouTube stage output.
    #[serde(default = "default_youtube_file")]
    pub youtube_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            basic_file: default_basic_file(),
            detailed_file: default_detailed_file(),
            youtube_file: default_youtube_file(),
        }
    }
}

impl OutputConfig {
    pub fn basic_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.basic_file)
    }

    pub fn detailed_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.detailed_file)
    }

    pub fn youtube_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.youtube_file)
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_basic_file() -> String {
    "vtubers-basic.json".into()
}
fn default_detailed_file() -> String {
    "vtubers-detailed.json".into()
}
fn default_youtube_file() -> String {
    "vtubers-detailed-with-youtube.json".into()
}

/// `[listing]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Listing site origin.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Detail pages fetched per window.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            detail_concurrency: default_detail_concurrency(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://hololist.net".into()
}
fn default_detail_concurrency() -> usize {
    25
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[youtube]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// API origin; overridable for testing.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Channel ids per API request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_base_url: default_api_base_url(),
            batch_size: default_batch_size(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".into()
}
fn default_api_base_url() -> String {
    "https://www.googleapis.com".into()
}
fn default_batch_size() -> usize {
    MAX_CHANNEL_BATCH
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.vtdex/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| VtdexError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.vtdex/vtdex.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| VtdexError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| VtdexError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| VtdexError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| VtdexError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| VtdexError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the YouTube API key from the env var named in the config.
pub fn resolve_api_key(config: &YoutubeConfig) -> Result<String> {
    let var_name = &config.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(VtdexError::config(format!(
            "YouTube API key not found. Set the {var_name} environment variable."
        ))),
    }
}
