//! Tendril: a depth-bounded, domain-scoped web/FTP crawler
//!
//! This crate implements a single-threaded crawler that discovers resources
//! reachable from a set of seed URLs, classifies them (crawlable page, static
//! file, email contact, phone contact), deduplicates them across prefix and
//! relative-path variants, and emits a traversal log preserving tree shape.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Tendril operations
#[derive(Debug, Error)]
pub enum TendrilError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Ledger entry not found for key: {0}")]
    LedgerMiss(String),

    #[error("Ledger entry already present for key: {0}")]
    LedgerDuplicate(String),

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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Result type alias for Tendril operations
pub type Result<T> = std::result::Result<T, TendrilError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, DisplayLevel, RedundancyLevel};
pub use crawler::{CrawlJob, Fetcher, HttpFetcher};
pub use state::{CrawlRecord, VisitLedger};
pub use url::{check_link, domain, prefix, rebuilt_link, stripped};
