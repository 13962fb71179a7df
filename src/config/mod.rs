//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and layering command-line overrides on top of them.
//!
//! # Example
//!
//! ```no_run
//! use webcrawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    split_comma, CacheConfig, CacheMode, Config, CrawlerConfig, FetchConfig, FilterConfig,
    OutputConfig, OverlayConfig, ProxyConfig, DEFAULT_ALLOWED_MIME, DEFAULT_ALLOWED_SCHEMES,
    DEFAULT_DENY_SUFFIXES,
};

// Re-export parser functions
pub use parser::{apply_overrides, compute_config_hash, load_config, load_config_with_hash, Overrides};
pub use validation::validate;
