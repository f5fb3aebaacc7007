//! Showcase-Harvest: a concurrent extraction pipeline for hackathon pages
//!
//! This crate discovers project showcases, hackathon events and sponsor prizes
//! on the ETHGlobal site and materializes them as flat CSV tables. Each stage
//! pairs a URL frontier with a page extractor and runs them through a bounded
//! worker pool that tolerates per-URL failures.

pub mod config;
pub mod crawler;
pub mod dom;
pub mod extract;
pub mod frontier;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod state;

use thiserror::Error;

/// Main error type for Showcase-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed stage input: {0}")]
    Frontier(#[from] FrontierError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid task state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::TaskState,
        to: state::TaskState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Invalid frontier parameters
///
/// These are programming or configuration errors, so a stage that hits one
/// fails before any network I/O happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontierError {
    #[error("total pages must be at least 1, got {0}")]
    InvalidPageCount(u32),

    #[error("showcase event name cannot be empty")]
    EmptyEvent,

    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

/// Result type alias for Showcase-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, FetchError, Fetcher};
pub use pipeline::Pipeline;
pub use records::{EventDetail, EventUrl, ProjectDetail, ProjectLink, PrizeRecord, NOT_AVAILABLE};
pub use state::{Stage, TaskState};
