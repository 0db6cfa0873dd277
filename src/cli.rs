//! Command-line interface definitions for portsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file, then to built-in defaults.

use crate::config::AppSettings;
use crate::error::{CliResult, ScanError};
use crate::scanner::{default_concurrency, ScanRequest, TcpConnectProber};
use crate::types::PortRange;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// A bounded-concurrency TCP reachability scanner.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find which TCP ports on a host accept connections", long_about = None)]
pub struct Args {
    /// Host to scan
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port(s) to scan (e.g. "80" or "22-100")
    #[arg(short, long, value_name = "SPEC")]
    pub ports: Option<String>,

    /// Maximum number of probes in flight [default: logical CPU count]
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Overall scan timeout in seconds [default: 5]
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Additional per-probe connect timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub connect_timeout: Option<u64>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Show a progress bar while scanning
    #[arg(long)]
    pub progress: bool,

    /// Verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress everything but results and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One "<port> - open" line per open port
    #[default]
    Plain,
    /// JSON report
    Json,
    /// CSV rows
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(ScanError::Config(format!("unknown output format: {}", s))),
        }
    }
}

/// Everything the binary needs to run one scan.
#[derive(Debug)]
pub struct ScanPlan {
    pub request: ScanRequest,
    pub prober: TcpConnectProber,
    pub output: OutputFormat,
}

impl Args {
    /// Merge flags over `settings` into a runnable plan.
    ///
    /// Fails with an invalid-spec or configuration error before any
    /// network activity.
    pub fn plan(&self, settings: &AppSettings) -> CliResult<ScanPlan> {
        let host = self
            .host
            .clone()
            .unwrap_or_else(|| settings.default_host.clone());
        let spec = self.ports.as_deref().unwrap_or(&settings.default_ports);
        let ports = PortRange::parse(spec)?;

        let workers = self
            .workers
            .or(settings.default_workers)
            .unwrap_or_else(default_concurrency);
        let timeout_secs = self.timeout.unwrap_or(settings.default_timeout_secs);

        let request = ScanRequest::new(host, ports)
            .with_concurrency(workers)
            .with_timeout(Duration::from_secs(timeout_secs));
        request.validate()?;

        let prober = match self.connect_timeout.or(settings.connect_timeout_ms) {
            Some(0) => {
                return Err(ScanError::Config(
                    "connect timeout must be greater than zero".to_string(),
                )
                .into())
            }
            Some(ms) => TcpConnectProber::new().with_connect_timeout(Duration::from_millis(ms)),
            None => TcpConnectProber::new(),
        };

        let output = match self.output {
            Some(format) => format,
            None => settings.default_output_format.parse()?,
        };

        Ok(ScanPlan {
            request,
            prober,
            output,
        })
    }

    /// Log filter directive implied by the verbosity flags.
    pub fn log_filter(&self, settings: &AppSettings) -> String {
        if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            settings.log_level.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::types::PortError;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["portsweep"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults_come_from_settings() {
        let plan = args(&[]).plan(&AppSettings::default()).unwrap();
        assert_eq!(plan.request.host(), "127.0.0.1");
        assert_eq!(plan.request.ports().to_string(), "5000-5500");
        assert_eq!(plan.request.concurrency(), default_concurrency());
        assert_eq!(plan.request.timeout(), Duration::from_secs(5));
        assert_eq!(plan.output, OutputFormat::Plain);
        assert!(plan.prober.connect_timeout().is_none());
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = AppSettings {
            default_workers: Some(8),
            default_output_format: "json".to_string(),
            ..AppSettings::default()
        };
        let plan = args(&[
            "--host", "10.0.0.1", "-p", "9000-9005", "-w", "4", "-t", "2", "-o", "csv",
            "--connect-timeout", "250",
        ])
        .plan(&settings)
        .unwrap();

        assert_eq!(plan.request.host(), "10.0.0.1");
        assert_eq!(plan.request.ports().len(), 6);
        assert_eq!(plan.request.concurrency(), 4);
        assert_eq!(plan.request.timeout(), Duration::from_secs(2));
        assert_eq!(plan.output, OutputFormat::Csv);
        assert_eq!(plan.prober.connect_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let err = args(&["-p", "10-5"]).plan(&AppSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Scan(ScanError::InvalidSpec(PortError::InvalidRange(10, 5)))
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_zero_workers_or_timeout_is_config_error() {
        let settings = AppSettings::default();
        for argv in [&["-w", "0"][..], &["-t", "0"][..], &["--connect-timeout", "0"][..]] {
            let err = args(argv).plan(&settings).unwrap_err();
            assert!(matches!(err, CliError::Scan(ScanError::Config(_))));
        }
    }

    #[test]
    fn test_log_filter() {
        let settings = AppSettings::default();
        assert_eq!(args(&["-v"]).log_filter(&settings), "debug");
        assert_eq!(args(&["-q"]).log_filter(&settings), "error");
        assert_eq!(args(&[]).log_filter(&settings), "warn");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
