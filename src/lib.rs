//! # portsweep - A Bounded TCP Reachability Scanner
//!
//! Given a host and a port specification, portsweep determines which ports
//! accept a TCP connection. It bounds how many probes run at once and how long
//! the whole scan may take, returning a partial report instead of hanging when
//! the deadline expires.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portsweep::scanner::{scan, ScanRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsweep::ScanError> {
//!     let request = ScanRequest::parse("127.0.0.1", "9000-9005")?
//!         .with_concurrency(4)
//!         .with_timeout(Duration::from_secs(5));
//!
//!     let report = scan(&request).await?;
//!     for port in &report.open_ports {
//!         println!("{} - open", port);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - `Port` and `PortRange` with spec parsing
//! - [`scanner`] - prober, limiter, aggregator and the scan coordinator
//! - [`config`] - settings file used as the defaults layer
//! - [`cli`] - command-line arguments
//! - [`output`] - plain, JSON and CSV renderers
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError};
pub use scanner::{scan, ScanCoordinator, ScanReport, ScanRequest};
pub use types::{Port, PortError, PortRange};
