//! Crawler module for Letterboxd page fetching and processing
//!
//! This module contains the core export pipeline, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - HTML parsing of listing, ratings and film pages
//! - Bounded fan-out of independent fetches
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Crawler, ExportReport};
pub use fetcher::{build_http_client, fetch_url, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{parse_detail, parse_last_page, parse_listing, parse_ratings, rating_from_class};
pub use scheduler::{fan_out, StageProgress};

use crate::config::Config;
use crate::MigrationError;

/// Runs a complete export crawl for `username`
///
/// This is the main entry point for an export. It will:
/// 1. Build the HTTP client
/// 2. Resolve the listing's page count
/// 3. Fetch every listing page
/// 4. Fetch every film page
/// 5. Optionally crawl the ratings listing
pub async fn crawl(
    config: &Config,
    username: &str,
    with_ratings: bool,
) -> Result<ExportReport, MigrationError> {
    Crawler::from_config(config)?
        .export(username, with_ratings)
        .await
}
