use chrono::NaiveDate;
use std::collections::HashMap;

/// Ratings keyed by detail page URL
pub type RatingMap = HashMap<String, f32>;

/// A rating scraped from a ratings listing card
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEntry {
    /// Absolute URL of the rated film's detail page
    pub detail_url: String,

    /// Half-star level divided by two (`rated-7` => 3.5)
    pub rating: f32,
}

/// One row of the exported watch history
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRecord {
    /// Date of the export run. Letterboxd only exposes the real watch date on
    /// diary pages, which the export does not crawl.
    pub date_recorded: NaiveDate,

    pub title: String,

    pub year: String,

    /// Detail page the record was resolved from
    pub source_url: String,

    pub rating: Option<f32>,
}
