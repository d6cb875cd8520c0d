//! Output module for export files and run summaries
//!
//! This module handles:
//! - Aggregating resolved film pages into watch records
//! - Writing the watch history CSV
//! - Rendering export and import summaries

mod csv_writer;
mod summary;

pub use csv_writer::{aggregate_records, write_csv, write_records, CSV_HEADER, DATE_FORMAT};
pub use summary::{
    print_export_summary, print_import_summary, render_export_summary, render_import_summary,
};
