//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.atlas/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub api_base_url: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub cache_dir: PathBuf,
    pub request_timeout: Duration,
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

/// Returns the path to `~/.atlas/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".atlas").join("config.toml"))
}

/// Load config from `~/.atlas/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AtlasConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AtlasConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AtlasConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(AtlasConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: AtlasConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Atlas Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# api_base_url = "https://restcountries.com/v3.1"
# cache_dir = "/home/you/.atlas/cache"
# request_timeout_secs = 10
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env
/// vars → CLI flags. CLI values are `None` when the flag was not given.
pub fn resolve(
    config: &AtlasConfig,
    cli_api_url: Option<&str>,
    cli_cache_dir: Option<&PathBuf>,
) -> ResolvedConfig {
    // API base URL: CLI → env → config → default
    let api_base_url = cli_api_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("ATLAS_API_URL").ok())
        .or_else(|| config.general.api_base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    // Cache dir: CLI → env → config → ~/.atlas/cache → ./cache
    let cache_dir = cli_cache_dir
        .cloned()
        .or_else(|| std::env::var("ATLAS_CACHE_DIR").ok().map(PathBuf::from))
        .or_else(|| config.general.cache_dir.clone())
        .unwrap_or_else(default_cache_dir);

    let request_timeout = Duration::from_secs(
        config
            .general
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
    );

    ResolvedConfig { api_base_url, cache_dir, request_timeout }
}

fn default_cache_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".atlas").join("cache"),
        None => {
            warn!("Could not determine home directory, caching beside the binary");
            PathBuf::from("cache")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AtlasConfig::default();
        assert!(config.general.api_base_url.is_none());
        assert!(config.general.cache_dir.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = AtlasConfig::default();
        let resolved = resolve(&config, None, None);
        assert_eq!(resolved.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(
            resolved.request_timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = AtlasConfig {
            general: GeneralConfig {
                api_base_url: Some("http://localhost:8080/v3.1".to_string()),
                cache_dir: Some(PathBuf::from("/tmp/atlas-cache")),
                request_timeout_secs: Some(3),
            },
        };
        let resolved = resolve(&config, None, None);
        assert_eq!(resolved.api_base_url, "http://localhost:8080/v3.1");
        assert_eq!(resolved.cache_dir, PathBuf::from("/tmp/atlas-cache"));
        assert_eq!(resolved.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_resolve_cli_flags_win() {
        let config = AtlasConfig {
            general: GeneralConfig {
                api_base_url: Some("http://from-config/v3.1".to_string()),
                cache_dir: Some(PathBuf::from("/from-config")),
                request_timeout_secs: None,
            },
        };
        let cli_cache = PathBuf::from("/from-cli");
        let resolved = resolve(&config, Some("http://from-cli/v3.1"), Some(&cli_cache));
        assert_eq!(resolved.api_base_url, "http://from-cli/v3.1");
        assert_eq!(resolved.cache_dir, cli_cache);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[general]
request_timeout_secs = 30
"#;
        let config: AtlasConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.request_timeout_secs, Some(30));
        assert!(config.general.api_base_url.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
api_base_url = "https://restcountries.com/v3.1"
cache_dir = "/var/cache/atlas"
request_timeout_secs = 10
"#;
        let config: AtlasConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.general.api_base_url.as_deref(),
            Some("https://restcountries.com/v3.1")
        );
        assert_eq!(config.general.cache_dir, Some(PathBuf::from("/var/cache/atlas")));
        assert_eq!(config.general.request_timeout_secs, Some(10));
    }
}
