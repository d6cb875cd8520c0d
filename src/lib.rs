//! letterboxd-trakt: move a Letterboxd watch history into Trakt
//!
//! This crate scrapes a public Letterboxd profile's watched-films listing,
//! resolves every film page to its TMDb identifier, writes the result as CSV,
//! and imports such a CSV into a Trakt account's history.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod trakt;
pub mod url;

use thiserror::Error;

/// Main error type for export and import operations
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Invalid input data at record {record}: {message}")]
    InputData { record: u64, message: String },

    #[error("Invalid Letterboxd username '{0}'")]
    InvalidUsername(String),

    #[error("Missing or invalid credentials: {0}")]
    AuthConfig(String),

    #[error("Trakt API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task failed: {0}")]
    Task(String),
}

impl MigrationError {
    /// Returns true for connection failures and non-success HTTP statuses
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::HttpStatus { .. })
    }
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

/// Result type alias for export and import operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use model::{ItemDetail, ItemReference, MediaType, RatingEntry, WatchRecord};
