//! Configuration module
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and reading Trakt credentials from the environment.
//!
//! # Example
//!
//! ```no_run
//! use letterboxd_trakt::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("letterboxd-trakt.toml")).unwrap();
//! println!("Scraping {}", config.scraper.base_url);
//! ```

mod credentials;
mod parser;
mod types;
mod validation;

// Re-export types
pub use credentials::{
    ApiAuth, Credentials, OAuthClient, ACCESS_TOKEN_VAR, CLIENT_ID_VAR, CLIENT_SECRET_VAR,
};
pub use types::{Config, OutputConfig, ScraperConfig, TraktConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
