//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.r4r/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct R4rConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub type_delay_ms: Option<u64>,
    pub notice_duration_ms: Option<u64>,
    pub header_restore_ms: Option<u64>,
    pub sidebar_width: Option<u16>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TYPE_DELAY_MS: u64 = 12;
pub const DEFAULT_NOTICE_DURATION_MS: u64 = 3000;
pub const DEFAULT_HEADER_RESTORE_MS: u64 = 2500;
pub const DEFAULT_SIDEBAR_WIDTH: u16 = 32;

const MIN_SIDEBAR_WIDTH: u16 = 16;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub type_delay: Duration,
    pub notice_duration: Duration,
    pub header_restore: Duration,
    pub sidebar_width: u16,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with(&R4rConfig::default(), |_| None, &CliOverrides::default())
    }
}

/// Values given on the command line (None = flag not passed).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub type_delay_ms: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.r4r/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".r4r").join("config.toml"))
}

/// Load config from `~/.r4r/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `R4rConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<R4rConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(R4rConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<R4rConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(R4rConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: R4rConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# r4r Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost:5000"   # Or set R4R_BASE_URL, or pass --base-url
# request_timeout_secs = 120

# [ui]
# type_delay_ms = 12                   # Typewriter delay per character (R4R_TYPE_DELAY_MS, --delay)
# notice_duration_ms = 3000            # How long notifications stay up
# header_restore_ms = 2500             # Delay before the header drops the save result
# sidebar_width = 32
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config from the file, the process environment and CLI flags.
pub fn resolve(config: &R4rConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, |key| std::env::var(key).ok(), cli)
}

/// Same as [`resolve`] with an explicit env lookup.
pub fn resolve_with(
    config: &R4rConfig,
    env: impl Fn(&str) -> Option<String>,
    cli: &CliOverrides,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("R4R_BASE_URL"))
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Typewriter delay: CLI → env → config → default
    let env_delay = env("R4R_TYPE_DELAY_MS").and_then(|raw| match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            warn!("Ignoring R4R_TYPE_DELAY_MS={:?}: {}", raw, e);
            None
        }
    });
    let type_delay_ms = cli
        .type_delay_ms
        .or(env_delay)
        .or(config.ui.type_delay_ms)
        .unwrap_or(DEFAULT_TYPE_DELAY_MS);

    ResolvedConfig {
        base_url,
        request_timeout: Duration::from_secs(
            config
                .server
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        type_delay: Duration::from_millis(type_delay_ms),
        notice_duration: Duration::from_millis(
            config
                .ui
                .notice_duration_ms
                .unwrap_or(DEFAULT_NOTICE_DURATION_MS),
        ),
        header_restore: Duration::from_millis(
            config
                .ui
                .header_restore_ms
                .unwrap_or(DEFAULT_HEADER_RESTORE_MS),
        ),
        sidebar_width: config
            .ui
            .sidebar_width
            .unwrap_or(DEFAULT_SIDEBAR_WIDTH)
            .max(MIN_SIDEBAR_WIDTH),
    }
}
