//! Crawler coordinator - export pipeline orchestration
//!
//! This module drives the two fan-out stages of an export:
//! - Resolving the pagination bound of a listing
//! - Stage 1: fetching every listing page and collecting film URLs
//! - Stage 2: fetching every film page and resolving its TMDb identifier
//! - Optionally crawling the ratings listing for a later join
//!
//! Stage 2 starts once stage 1 has finished. Per-page and per-film failures
//! are logged and skipped; failing to bound the listing aborts the export.

use crate::config::{Config, ScraperConfig};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::{parse_detail, parse_last_page, parse_listing, parse_ratings};
use crate::crawler::scheduler::fan_out;
use crate::model::{ItemDetail, ItemReference, RatingEntry, RatingMap};
use crate::url::{films_url, listing_page_url, ratings_url, validate_username};
use crate::MigrationError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything an export run collected
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Username whose profile was crawled
    pub username: String,

    /// Number of listing pages crawled
    pub pages: u32,

    /// Distinct film pages discovered in stage 1
    pub items_discovered: usize,

    /// Successfully fetched film pages, in discovery order
    pub details: Vec<ItemDetail>,

    /// Ratings by film URL, when the ratings listing was crawled
    pub ratings: Option<RatingMap>,

    /// Wall-clock time of the crawl
    pub elapsed: Duration,
}

impl ExportReport {
    /// Film pages whose fetch failed
    pub fn failed_items(&self) -> usize {
        self.items_discovered.saturating_sub(self.details.len())
    }

    /// Fetched film pages without a TMDb identifier
    pub fn unresolved_items(&self) -> usize {
        self.details.iter().filter(|d| !d.is_resolved()).count()
    }
}

/// Drives listing and film-page crawls through a `PageFetcher`
///
/// Cloning is cheap: clones share the fetcher.
pub struct Crawler<F> {
    fetcher: Arc<F>,
    base_url: String,
    width: usize,
}

impl<F> Clone for Crawler<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            base_url: self.base_url.clone(),
            width: self.width,
        }
    }
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler that talks HTTP, configured from `config`
    pub fn from_config(config: &Config) -> Result<Self, MigrationError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.scraper)?;
        Ok(Self::new(fetcher, &config.scraper))
    }
}

impl<F> Crawler<F>
where
    F: PageFetcher + 'static,
{
    pub fn new(fetcher: F, scraper: &ScraperConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            base_url: scraper.base_url.trim_end_matches('/').to_string(),
            width: scraper.max_concurrent_fetches as usize,
        }
    }

    /// The domain prefixed to site-relative links
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Finds how many pages `listing_base` has by reading page 1's pagination
    pub async fn resolve_last_page(&self, listing_base: &str) -> Result<u32, MigrationError> {
        let url = listing_page_url(listing_base, 1);
        let page = self.fetcher.fetch(&url).await?;
        parse_last_page(&page.body, &url)
    }

    /// Checks that `username` names a readable profile
    ///
    /// Returns the page count of the watched-films listing. A malformed name
    /// is `MigrationError::InvalidUsername`; an unknown or unreachable profile
    /// is a network error.
    pub async fn check_profile(&self, username: &str) -> Result<u32, MigrationError> {
        let username = validate_username(username)?;
        self.resolve_last_page(&films_url(self.base_url(), username))
            .await
    }

    /// Fetches one listing page and returns its film URLs
    pub async fn extract_item_urls(&self, page_url: &str) -> Result<Vec<String>, MigrationError> {
        let page = self.fetcher.fetch(page_url).await?;
        Ok(parse_listing(&page.body, self.base_url()))
    }

    /// Fetches one ratings listing page and returns its ratings
    pub async fn extract_ratings(&self, page_url: &str) -> Result<Vec<RatingEntry>, MigrationError> {
        let page = self.fetcher.fetch(page_url).await?;
        Ok(parse_ratings(&page.body, self.base_url()))
    }

    /// Fetches one film page and resolves it in a single pass
    ///
    /// The detail keeps the requested URL even when the page was reached
    /// through a redirect, so it can be matched back to its reference.
    pub async fn extract_detail(&self, item_url: &str) -> Result<ItemDetail, MigrationError> {
        let page = self.fetcher.fetch(item_url).await?;
        if page.was_redirected() {
            tracing::debug!("{} redirected to {}", item_url, page.final_url);
        }
        Ok(parse_detail(&page.body, item_url))
    }

    /// Stage 1: crawls pages `1..=last_page` of a listing
    ///
    /// Returns the union of every page's film URLs without duplicates, first
    /// discovery (in page order) winning.
    pub async fn crawl_listing(&self, listing_base: &str, last_page: u32) -> Vec<ItemReference> {
        let page_urls: Vec<String> = (1..=last_page)
            .map(|page| listing_page_url(listing_base, page))
            .collect();

        let crawler = self.clone();
        let results = fan_out(
            page_urls.clone(),
            self.width,
            "Crawling listing pages",
            move |url| {
                let crawler = crawler.clone();
                async move { crawler.extract_item_urls(&url).await }
            },
        )
        .await;

        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for (page_url, result) in page_urls.iter().zip(results) {
            match result {
                Ok(urls) => {
                    for url in urls {
                        if seen.insert(url.clone()) {
                            items.push(ItemReference::new(url));
                        }
                    }
                }
                Err(e) => tracing::warn!("Skipping listing page {}: {}", page_url, e),
            }
        }

        items
    }

    /// Stage 2: resolves every film page
    ///
    /// Failed fetches are logged and dropped, so each returned detail belongs
    /// to exactly one fetched reference. Output follows input order.
    pub async fn crawl_details(&self, items: &[ItemReference]) -> Vec<ItemDetail> {
        let urls: Vec<String> = items.iter().map(|i| i.detail_url.clone()).collect();

        let crawler = self.clone();
        let results = fan_out(urls.clone(), self.width, "Scanning films", move |url| {
            let crawler = crawler.clone();
            async move { crawler.extract_detail(&url).await }
        })
        .await;

        urls.iter()
            .zip(results)
            .filter_map(|(url, result)| match result {
                Ok(detail) => {
                    if !detail.is_resolved() {
                        tracing::debug!("No TMDb identifier on {}", url);
                    }
                    Some(detail)
                }
                Err(e) => {
                    tracing::warn!("Skipping film {}: {}", url, e);
                    None
                }
            })
            .collect()
    }

    /// Crawls a whole ratings listing into a map keyed by film URL
    pub async fn crawl_ratings(&self, ratings_base: &str) -> Result<RatingMap, MigrationError> {
        let last_page = self.resolve_last_page(ratings_base).await?;
        let page_urls: Vec<String> = (1..=last_page)
            .map(|page| listing_page_url(ratings_base, page))
            .collect();

        let crawler = self.clone();
        let results = fan_out(
            page_urls.clone(),
            self.width,
            "Crawling ratings pages",
            move |url| {
                let crawler = crawler.clone();
                async move { crawler.extract_ratings(&url).await }
            },
        )
        .await;

        let mut ratings = RatingMap::new();
        for (page_url, result) in page_urls.iter().zip(results) {
            match result {
                Ok(entries) => {
                    for entry in entries {
                        ratings.entry(entry.detail_url).or_insert(entry.rating);
                    }
                }
                Err(e) => tracing::warn!("Skipping ratings page {}: {}", page_url, e),
            }
        }

        Ok(ratings)
    }

    /// Runs a full export for `username`
    ///
    /// # Returns
    ///
    /// * `Ok(ExportReport)` - Crawl finished; individual failures were skipped
    /// * `Err(MigrationError)` - The username is malformed, the profile could
    ///   not be read, or a listing could not be bounded
    pub async fn export(
        &self,
        username: &str,
        with_ratings: bool,
    ) -> Result<ExportReport, MigrationError> {
        let start_time = Instant::now();
        let username = validate_username(username)?;
        let listing_base = films_url(self.base_url(), username);

        tracing::info!("Resolving pagination for {}", listing_base);
        let pages = self.resolve_last_page(&listing_base).await.map_err(|e| {
            tracing::error!("Cannot read watched films of '{}': {}", username, e);
            e
        })?;
        tracing::info!("Listing has {} page(s)", pages);

        let items = self.crawl_listing(&listing_base, pages).await;
        tracing::info!("Discovered {} films", items.len());

        let details = self.crawl_details(&items).await;

        let ratings = if with_ratings {
            let ratings = self
                .crawl_ratings(&ratings_url(self.base_url(), username))
                .await?;
            tracing::info!("Collected {} ratings", ratings.len());
            Some(ratings)
        } else {
            None
        };

        let report = ExportReport {
            username: username.to_string(),
            pages,
            items_discovered: items.len(),
            details,
            ratings,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Export crawl completed: {} films resolved, {} without TMDb id, {} failed in {:?}",
            report.details.len() - report.unresolved_items(),
            report.unresolved_items(),
            report.failed_items(),
            report.elapsed
        );

        Ok(report)
    }
}
