//! Watch history CSV output
//!
//! Rows are laid out the way Letterboxd's own export does it, so the file can
//! be fed straight back into the importer.

use crate::model::{ItemDetail, RatingMap, WatchRecord};
use crate::MigrationError;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header of the exported file
pub const CSV_HEADER: [&str; 5] = ["Date", "Name", "Year", "Letterboxd URI", "Rating"];

/// Date format of the `Date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder for a title or year the film page did not show
const UNKNOWN: &str = "Unknown";

/// Turns resolved film pages into watch records stamped with `today`
///
/// Records keep the order of `details`. When `ratings` is given, each record
/// picks up the rating of its film URL.
pub fn aggregate_records(
    details: &[ItemDetail],
    ratings: Option<&RatingMap>,
    today: NaiveDate,
) -> Vec<WatchRecord> {
    details
        .iter()
        .map(|detail| WatchRecord {
            date_recorded: today,
            title: detail.title.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            year: detail.year.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            source_url: detail.detail_url.clone(),
            rating: ratings.and_then(|r| r.get(&detail.detail_url).copied()),
        })
        .collect()
}

/// Writes the header and one row per record
pub fn write_records<W: Write>(records: &[WatchRecord], writer: W) -> Result<(), MigrationError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for record in records {
        let date = record.date_recorded.format(DATE_FORMAT).to_string();
        let rating = record.rating.map(|r| r.to_string()).unwrap_or_default();

        csv_writer.write_record([
            date.as_str(),
            record.title.as_str(),
            record.year.as_str(),
            record.source_url.as_str(),
            rating.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes `records` to `path`, replacing whatever was there
pub fn write_csv(path: &Path, records: &[WatchRecord]) -> Result<(), MigrationError> {
    let file = File::create(path)?;
    write_records(records, file)?;
    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
