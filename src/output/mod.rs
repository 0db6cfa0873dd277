//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan reports.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_summary, print_warning, write_plain};

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write `report` to `out` in the requested format.
pub fn write_report<W: Write>(out: W, report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, report),
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, report),
    }
}

/// Print `report` to stdout in the requested format.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    write_report(stdout.lock(), report, format)
}
