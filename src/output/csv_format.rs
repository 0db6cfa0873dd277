//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write one `port,status` row per open port.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "status"])?;
    for port in &report.open_ports {
        wtr.write_record([port.to_string().as_str(), "open"])?;
    }

    wtr.flush()?;
    Ok(())
}
