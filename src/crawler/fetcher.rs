//! HTTP fetcher implementation
//!
//! This module handles every Letterboxd request, including:
//! - Building the HTTP client with a proper user agent string
//! - GET requests returning the page body
//! - Error classification into connection failures and bad statuses
//!
//! There is no retry and no response size cap. A failed fetch fails only the
//! unit of work that issued it.

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::MigrationError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,

    /// Final URL after redirects
    pub final_url: String,

    /// Page body content
    pub body: String,
}

impl FetchedPage {
    /// Returns true when the server redirected the request
    pub fn was_redirected(&self) -> bool {
        self.url != self.final_url
    }
}

/// Source of pages for the crawl
///
/// The crawler only ever talks to this trait, so tests can serve canned HTML
/// without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, failing on connection errors and non-success statuses
    async fn fetch(&self, url: &str) -> Result<FetchedPage, MigrationError>;
}

/// `PageFetcher` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `user_agent` and `scraper`
    pub fn from_config(
        user_agent: &UserAgentConfig,
        scraper: &ScraperConfig,
    ) -> Result<Self, MigrationError> {
        let client = build_http_client(user_agent, scraper).map_err(|source| {
            MigrationError::Network {
                url: scraper.base_url.clone(),
                source,
            }
        })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, MigrationError> {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use letterboxd_trakt::config::{ScraperConfig, UserAgentConfig};
/// use letterboxd_trakt::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    scraper: &ScraperConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version);

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(secs) = scraper.request_timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL and returns its body
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | Other status | `MigrationError::HttpStatus` |
/// | Connection refused, timeout, TLS, body read failure | `MigrationError::Network` |
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, MigrationError> {
    tracing::trace!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| MigrationError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return Err(MigrationError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| MigrationError::Network {
            url: url.to_string(),
            source,
        })?;

    Ok(FetchedPage {
        url: url.to_string(),
        final_url,
        body,
    })
}
