//! Import of a Letterboxd watch history CSV into Trakt
//!
//! This module handles:
//! - Reading `Name, Year, Letterboxd URI` rows, skipping incomplete ones
//! - Resolving each row's film page to a TMDb identifier
//! - Reporting what a dry run would add, or posting one history batch

use crate::crawler::{Crawler, PageFetcher};
use crate::model::{ItemDetail, ItemReference};
use crate::trakt::client::{HistoryItem, HistoryPayload, SyncResponse, TraktClient, TraktIds};
use crate::MigrationError;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One usable row of the input CSV
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub title: String,
    pub year: Option<String>,
    pub letterboxd_url: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Letterboxd URI")]
    letterboxd_uri: Option<String>,
}

impl CsvRow {
    fn into_entry(self) -> Option<WatchEntry> {
        let present = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        Some(WatchEntry {
            title: present(self.name)?,
            year: present(self.year),
            letterboxd_url: present(self.letterboxd_uri)?,
        })
    }
}

/// Reads watch entries from a CSV file
pub fn read_watch_csv(path: &Path) -> Result<Vec<WatchEntry>, MigrationError> {
    tracing::info!("Reading Letterboxd watch history from {}", path.display());
    let file = File::open(path)?;
    read_watch_entries(file)
}

/// Reads watch entries from CSV data with a header row
///
/// Columns other than `Name`, `Year` and `Letterboxd URI` are ignored. Rows
/// missing a name or URI, and rows that cannot be decoded, are skipped with a
/// warning.
pub fn read_watch_entries<R: Read>(reader: R) -> Result<Vec<WatchEntry>, MigrationError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut entries = Vec::new();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let record = index as u64 + 1;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let err = MigrationError::InputData {
                    record,
                    message: e.to_string(),
                };
                tracing::warn!("Skipping row: {}", err);
                continue;
            }
        };

        match row.into_entry() {
            Some(entry) => entries.push(entry),
            None => {
                let err = MigrationError::InputData {
                    record,
                    message: "missing Name or Letterboxd URI".to_string(),
                };
                tracing::warn!("Skipping row: {}", err);
            }
        }
    }

    Ok(entries)
}

/// An entry together with what its film page resolved to
#[derive(Debug, Clone)]
pub struct PlannedAddition {
    pub entry: WatchEntry,

    /// None when the film page could not be fetched
    pub detail: Option<ItemDetail>,
}

impl PlannedAddition {
    /// The Trakt history item for this entry, if it resolved to a TMDb id
    pub fn history_item(&self) -> Option<(crate::model::MediaType, HistoryItem)> {
        let detail = self.detail.as_ref().filter(|d| d.is_resolved())?;
        let tmdb = detail.tmdb_id()?;
        let year = self
            .entry
            .year
            .as_deref()
            .or(detail.year.as_deref())
            .and_then(|y| y.parse().ok());

        Some((
            detail.media_type,
            HistoryItem {
                title: self.entry.title.clone(),
                year,
                ids: TraktIds { tmdb },
            },
        ))
    }
}

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Whether the run was a dry run
    pub dry_run: bool,

    /// Every valid entry and its resolution
    pub planned: Vec<PlannedAddition>,

    /// Dry-run notifications, one per valid entry
    pub would_add: Vec<String>,

    /// Entries without a usable TMDb id
    pub unresolved: usize,

    /// Items sent to Trakt
    pub submitted: usize,

    /// Trakt's answer to the history write
    pub response: Option<SyncResponse>,
}

/// Resolves watch entries and adds them to Trakt history
pub struct Importer<F> {
    crawler: Crawler<F>,
    trakt: Option<TraktClient>,
}

impl<F> Importer<F>
where
    F: PageFetcher + 'static,
{
    /// `trakt` may be None for dry runs, which never write
    pub fn new(crawler: Crawler<F>, trakt: Option<TraktClient>) -> Self {
        Self { crawler, trakt }
    }

    /// Reads `path` and imports its entries
    pub async fn import_file(
        &self,
        path: &Path,
        dry_run: bool,
    ) -> Result<ImportReport, MigrationError> {
        let entries = read_watch_csv(path)?;
        self.import(entries, dry_run).await
    }

    /// Resolves `entries` and either reports or writes them
    pub async fn import(
        &self,
        entries: Vec<WatchEntry>,
        dry_run: bool,
    ) -> Result<ImportReport, MigrationError> {
        if !dry_run && self.trakt.is_none() {
            return Err(MigrationError::AuthConfig(
                "a Trakt client is required unless running dry".to_string(),
            ));
        }

        let planned = self.resolve(entries).await;
        let mut report = ImportReport {
            dry_run,
            ..ImportReport::default()
        };

        let mut payload = HistoryPayload::default();
        for addition in &planned {
            let entry = &addition.entry;
            tracing::info!("Processing: {} (URL: {})", entry.title, entry.letterboxd_url);

            let item = addition.history_item();
            if item.is_none() {
                report.unresolved += 1;
                tracing::warn!("No TMDb match for {} ({})", entry.title, entry.letterboxd_url);
            }

            if dry_run {
                let message = format!(
                    "Would add {} from {} to Trakt history",
                    entry.title, entry.letterboxd_url
                );
                tracing::info!("Dry run: {}", message);
                report.would_add.push(message);
            } else if let Some((media_type, item)) = item {
                payload.push(media_type, item);
            }
        }

        report.planned = planned;

        if dry_run {
            return Ok(report);
        }

        let trakt = match &self.trakt {
            Some(trakt) => trakt,
            None => return Ok(report),
        };

        if payload.is_empty() {
            tracing::info!("Nothing to add to Trakt history");
            return Ok(report);
        }

        report.submitted = payload.len();
        let response = trakt.add_to_history(&payload).await?;
        tracing::info!(
            "Trakt added {} movies and {} episodes",
            response.added.movies,
            response.added.episodes
        );
        if !response.not_found.is_empty() {
            tracing::warn!("Trakt could not match {} items", response.not_found.len());
        }
        report.response = Some(response);

        Ok(report)
    }

    /// Fetches each distinct film page once and pairs entries with results
    async fn resolve(&self, entries: Vec<WatchEntry>) -> Vec<PlannedAddition> {
        let mut seen = HashSet::new();
        let references: Vec<ItemReference> = entries
            .iter()
            .filter(|e| seen.insert(e.letterboxd_url.clone()))
            .map(|e| ItemReference::new(e.letterboxd_url.clone()))
            .collect();

        let details: HashMap<String, ItemDetail> = self
            .crawler
            .crawl_details(&references)
            .await
            .into_iter()
            .map(|d| (d.detail_url.clone(), d))
            .collect();

        entries
            .into_iter()
            .map(|entry| {
                let detail = details.get(&entry.letterboxd_url).cloned();
                PlannedAddition { entry, detail }
            })
            .collect()
    }
}
