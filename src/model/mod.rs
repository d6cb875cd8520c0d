//! Data model for the export and import pipelines
//!
//! Everything here lives for one run only and is discarded after the output is
//! written.
//!
//! # Components
//!
//! - `ItemReference`: a film detail page discovered on a listing page
//! - `ItemDetail`: what one detail page resolved to (TMDb id, media type, title, year)
//! - `WatchRecord`: one row of the exported CSV
//! - `RatingEntry`: a rating scraped from the ratings listing

mod item;
mod record;

// Re-export main types
pub use item::{ItemDetail, ItemReference, MediaType};
pub use record::{RatingEntry, RatingMap, WatchRecord};
