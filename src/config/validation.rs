use crate::config::types::{CacheConfig, Config, CrawlerConfig, FetchConfig, FilterConfig};
use crate::ConfigError;
use url::Url;

const MAX_CONCURRENCY_LIMIT: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_filter_config(&config.filter)?;
    validate_crawler_config(&config.crawler, &config.filter)?;
    validate_fetch_config(&config.fetch)?;
    if config.proxy.enabled {
        validate_proxy_url("proxy url", &config.proxy.url)?;
    }
    if config.overlay.enabled {
        validate_proxy_url("overlay address", &config.overlay.address)?;
        if config.overlay.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "overlay timeout_secs must be > 0".to_string(),
            ));
        }
    }
    validate_cache_config(&config.cache)?;

    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig, filter: &FilterConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.max_concurrency
        )));
    }

    let url = Url::parse(&config.initial_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid initial URL '{}': {}", config.initial_url, e))
    })?;

    if !filter.allowed_schemes.iter().any(|s| s == url.scheme()) {
        return Err(ConfigError::Validation(format!(
            "Initial URL '{}' uses scheme '{}' which is not in allowed_schemes",
            config.initial_url,
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates link filtering configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.allowed_schemes.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_schemes cannot be empty".to_string(),
        ));
    }

    if let Some(suffix) = config.deny_suffixes.iter().find(|s| s.is_empty()) {
        return Err(ConfigError::Validation(format!(
            "deny_suffixes contains an empty entry: {:?}",
            suffix
        )));
    }

    for tld in config.tld_list() {
        if !tld
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "TLD '{}' contains invalid characters",
                tld
            )));
        }
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.allowed_mime.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_mime cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch timeout_secs must be > 0".to_string(),
        ));
    }

    if config.max_body_bytes == 0 {
        return Err(ConfigError::Validation(
            "max_body_bytes must be > 0".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_proxy_url(label: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", label, value, e)))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            label, value
        )));
    }

    Ok(())
}

/// Validates cache storage configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.compaction_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "compaction_interval_secs must be > 0".to_string(),
        ));
    }

    if config.dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("cache dir cannot be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_max_concurrency_bounds() {
        let mut config = Config::default();
        config.crawler.max_concurrency = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrency = MAX_CONCURRENCY_LIMIT + 1;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrency = MAX_CONCURRENCY_LIMIT;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_initial_url_must_parse() {
        let mut config = Config::default();
        config.crawler.initial_url = "example.com".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_initial_url_scheme_must_be_allowed() {
        let mut config = Config::default();
        config.crawler.initial_url = "ftp://example.com/".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_proxy_url_checked_only_when_enabled() {
        let mut config = Config::default();
        config.proxy.url = "nonsense".to_string();
        assert!(validate(&config).is_ok());

        config.proxy.enabled = true;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_overlay_address_checked_when_enabled() {
        let mut config = Config::default();
        config.overlay.enabled = true;
        assert!(validate(&config).is_ok());

        config.overlay.address = "::".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_tld_rejected() {
        let mut config = Config::default();
        config.filter.tlds = "com,b r".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_mime_list_rejected() {
        let mut config = Config::default();
        config.fetch.allowed_mime.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.fetch.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }
}
