use crate::config::types::{split_comma, CacheMode, Config};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub max_concurrency: Option<usize>,
    pub max_depth: Option<u32>,
    pub initial_url: Option<String>,
    pub proxy_enabled: bool,
    pub proxy_url: Option<String>,
    pub overlay_enabled: bool,
    pub memory_cache: bool,
    pub tlds: Option<String>,
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use webcrawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be matched to the configuration they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies command-line overrides and re-validates the result
pub fn apply_overrides(mut config: Config, overrides: &Overrides) -> Result<Config, ConfigError> {
    if let Some(n) = overrides.max_concurrency {
        config.crawler.max_concurrency = n;
    }
    if let Some(depth) = overrides.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(url) = &overrides.initial_url {
        config.crawler.initial_url = url.clone();
    }
    if overrides.proxy_enabled {
        config.proxy.enabled = true;
    }
    if let Some(url) = &overrides.proxy_url {
        config.proxy.url = url.clone();
    }
    if overrides.overlay_enabled {
        config.overlay.enabled = true;
    }
    if overrides.memory_cache {
        config.cache.mode = CacheMode::Mem;
    }
    if let Some(tlds) = &overrides.tlds {
        // Normalise spacing so the stored list matches what the filter sees
        config.filter.tlds = split_comma(tlds).join(",");
    }

    validate(&config)?;
    Ok(config)
}
