//! Plain text output formatting.
//!
//! Results go to stdout as bare `"<port> - open"` lines so they can be piped;
//! the styled summary and diagnostics go to stderr.

use crate::scanner::ScanReport;
use console::style;
use std::io::{self, Write};

/// Write one `"<port> - open"` line per open port.
pub fn write_plain<W: Write>(mut out: W, report: &ScanReport) -> io::Result<()> {
    for port in &report.open_ports {
        writeln!(out, "{} - open", port)?;
    }
    out.flush()
}

/// Print a one-line summary of the scan to stderr.
pub fn print_summary(report: &ScanReport) {
    let status = if report.completed {
        style("complete").green()
    } else {
        style("partial").yellow().bold()
    };

    eprintln!(
        "{} {}: {} open of {}/{} ports probed in {:.2}s ({})",
        style("•").dim(),
        style(&report.host).white().bold(),
        style(report.open_ports.len()).green().bold(),
        report.ports_probed,
        report.ports_requested,
        report.elapsed.as_secs_f64(),
        status
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
