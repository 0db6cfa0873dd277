//! TCP connect prober.
//!
//! Performs a standard TCP connect using the operating system's socket API.
//! Does not require elevated privileges. A successful handshake marks the
//! port open; the stream is dropped immediately with no data exchanged.

use crate::scanner::deadline::ScanDeadline;
use crate::scanner::traits::{ProbeFailure, ProbeResult, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// TCP connect prober.
///
/// Each probe is bounded by the scan deadline. An optional per-probe connect
/// timeout can bound it further; it never extends past the deadline.
#[derive(Debug, Clone, Default)]
pub struct TcpConnectProber {
    connect_timeout: Option<Duration>,
}

impl TcpConnectProber {
    /// Create a prober bounded only by the scan deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Additionally bound each connect attempt by `limit`.
    pub fn with_connect_timeout(mut self, limit: Duration) -> Self {
        self.connect_timeout = Some(limit);
        self
    }

    /// The configured per-probe timeout, if any.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Attempt to connect to `host:port`.
    async fn attempt_connect(&self, host: &str, port: u16) -> Result<TcpStream, ProbeFailure> {
        let connect = TcpStream::connect((host, port));
        match self.connect_timeout {
            Some(limit) => match timeout(limit, connect).await {
                Ok(result) => result.map_err(ProbeFailure::from),
                Err(_) => Err(ProbeFailure::TimedOut),
            },
            None => connect.await.map_err(ProbeFailure::from),
        }
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, host: &str, port: Port, deadline: &ScanDeadline) -> ProbeResult {
        if deadline.is_expired() {
            return ProbeResult::closed(port, ProbeFailure::DeadlineExceeded);
        }

        let outcome = tokio::select! {
            biased;
            _ = deadline.expired() => Err(ProbeFailure::DeadlineExceeded),
            outcome = self.attempt_connect(host, port.as_u16()) => outcome,
        };

        match outcome {
            Ok(stream) => {
                drop(stream);
                debug!(%port, "open");
                ProbeResult::open(port)
            }
            Err(cause) => {
                debug!(%port, %cause, "closed");
                ProbeResult::closed(port, cause)
            }
        }
    }
}
