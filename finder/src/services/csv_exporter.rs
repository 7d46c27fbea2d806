//! CSV export of duplicate reports

use std::io::Write;
use std::path::Path;

use shared::{DuplicateReport, ReportRow};
use crate::error::FinderResult;

pub const DEFAULT_OUTPUT: &str = "deal_duplicates.csv";

/// Column order of the exported file; matches the `ReportRow` field renames
pub const HEADERS: [&str; 11] = [
    "ID",
    "Name",
    "Company",
    "Close Date",
    "Amount",
    "Stage",
    "Owner",
    "Potential %",
    "Top Duplicate Deal",
    "Top Duplicate Deal - Company",
    "Potential Duplicates",
];

/// Write a header and one row per report to `writer`
///
/// The header is written even when there are no reports.
pub fn write_reports<W: Write>(reports: &[DuplicateReport], writer: W) -> FinderResult<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    for report in reports {
        csv_writer.serialize(ReportRow::from(report))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export reports to a CSV file at `path`, replacing any existing file
pub fn export_csv(reports: &[DuplicateReport], path: &Path) -> FinderResult<()> {
    let file = std::fs::File::create(path)?;
    write_reports(reports, file)
}
