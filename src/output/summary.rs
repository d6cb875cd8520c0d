//! Human-readable run summaries
//!
//! Summaries are rendered to a `String` so they can be checked in tests and
//! printed by the command line front end.

use crate::crawler::ExportReport;
use crate::trakt::ImportReport;
use std::fmt::Write;
use std::path::Path;

/// Renders the outcome of an export
pub fn render_export_summary(report: &ExportReport, csv_path: &Path) -> String {
    let mut out = String::new();
    let resolved = report.details.len() - report.unresolved_items();

    let _ = writeln!(out, "=== Export Summary ===\n");
    let _ = writeln!(out, "Profile: {}", report.username);
    let _ = writeln!(out, "  Listing pages: {}", report.pages);
    let _ = writeln!(out, "  Films discovered: {}", report.items_discovered);
    let _ = writeln!(out, "  Films with TMDb id: {}", resolved);
    let _ = writeln!(out, "  Films without TMDb id: {}", report.unresolved_items());
    let _ = writeln!(out, "  Film pages failed: {}", report.failed_items());
    if let Some(ratings) = &report.ratings {
        let _ = writeln!(out, "  Ratings collected: {}", ratings.len());
    }
    let _ = writeln!(out, "  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "✓ Wrote {} records to {}",
        report.details.len(),
        csv_path.display()
    );

    out
}

/// Renders the outcome of an import or dry run
pub fn render_import_summary(report: &ImportReport) -> String {
    let mut out = String::new();

    if report.dry_run {
        let _ = writeln!(out, "=== Dry Run ===\n");
        for line in &report.would_add {
            let _ = writeln!(out, "  {}", line);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Entries: {}", report.planned.len());
        let _ = writeln!(out, "  Without TMDb id: {}", report.unresolved);
        let _ = writeln!(out, "\n✓ Nothing was sent to Trakt");
        return out;
    }

    let _ = writeln!(out, "=== Import Summary ===\n");
    let _ = writeln!(out, "Entries: {}", report.planned.len());
    let _ = writeln!(out, "  Without TMDb id: {}", report.unresolved);
    let _ = writeln!(out, "  Submitted: {}", report.submitted);

    match &report.response {
        Some(response) => {
            let _ = writeln!(out, "  Movies added: {}", response.added.movies);
            let _ = writeln!(out, "  Episodes added: {}", response.added.episodes);
            if !response.not_found.is_empty() {
                let _ = writeln!(out, "  Not found on Trakt: {}", response.not_found.len());
            }
        }
        None => {
            let _ = writeln!(out, "\nNothing was added to Trakt history");
        }
    }

    out
}

/// Prints the export summary to stdout
pub fn print_export_summary(report: &ExportReport, csv_path: &Path) {
    print!("{}", render_export_summary(report, csv_path));
}

/// Prints the import summary to stdout
pub fn print_import_summary(report: &ImportReport) {
    print!("{}", render_import_summary(report));
}
