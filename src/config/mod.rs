//! Configuration module for Showcase-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; missing sections fall back to the defaults in
//! [`types`].
//!
//! # Example
//!
//! ```no_run
//! use showcase_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Walking {} listing pages", config.showcase.total_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EventsConfig, OutputConfig, ScraperConfig, ShowcaseConfig, UserAgentConfig,
    DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENCY,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
