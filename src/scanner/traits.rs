//! Prober trait abstraction.
//!
//! Defines the single-port probe interface the coordinator fans out over,
//! enabling alternative probers and scripted probers in tests.

use crate::scanner::deadline::ScanDeadline;
use crate::types::Port;
use async_trait::async_trait;
use std::fmt;
use std::io;

/// Why a probe did not find the port open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The target actively refused the connection.
    Refused,
    /// The per-probe connect timeout elapsed.
    TimedOut,
    /// Host or network unreachable.
    Unreachable,
    /// The scan deadline expired before the connect finished.
    DeadlineExceeded,
    /// Any other dial error.
    Other(String),
}

impl From<io::Error> for ProbeFailure {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused,
            io::ErrorKind::TimedOut => Self::TimedOut,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                Self::Unreachable
            }
            _ => {
                let message = err.to_string();
                if message.to_lowercase().contains("unreachable") {
                    Self::Unreachable
                } else {
                    Self::Other(message)
                }
            }
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused => write!(f, "connection refused"),
            Self::TimedOut => write!(f, "connect timed out"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::DeadlineExceeded => write!(f, "scan deadline exceeded"),
            Self::Other(reason) => write!(f, "{}", reason),
        }
    }
}

/// Outcome of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The port that was probed.
    pub port: Port,
    /// True only after a successful connect.
    pub open: bool,
    /// Failure reason when not open.
    pub cause: Option<ProbeFailure>,
}

impl ProbeResult {
    /// A port that accepted a connection.
    pub fn open(port: Port) -> Self {
        Self {
            port,
            open: true,
            cause: None,
        }
    }

    /// A port that did not accept a connection.
    pub fn closed(port: Port, cause: ProbeFailure) -> Self {
        Self {
            port,
            open: false,
            cause: Some(cause),
        }
    }

    /// Whether the probe was cut short by the scan deadline.
    pub fn is_interrupted(&self) -> bool {
        matches!(self.cause, Some(ProbeFailure::DeadlineExceeded))
    }
}

/// Trait for single-port reachability probes.
///
/// Implementations must never report `open` without a genuinely successful
/// connect, and should stop waiting once `deadline` expires.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `host:port` exactly once.
    async fn probe(&self, host: &str, port: Port, deadline: &ScanDeadline) -> ProbeResult;
}
