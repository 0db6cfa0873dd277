//! Scanner module - coordinates concurrent reachability probes.
//!
//! A scan parses nothing and resolves nothing itself: it takes a validated
//! [`ScanRequest`], fans one probe task out per port through a
//! [`ConcurrencyLimiter`], feeds every result to a [`ResultAggregator`], and
//! stops dispatching once the shared [`ScanDeadline`] expires.

pub mod aggregator;
pub mod deadline;
pub mod limiter;
pub mod tcp;
pub mod traits;

use crate::error::{ScanError, ScanResult};
use crate::types::{Port, PortRange};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use serde::{Serialize, Serializer};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub use aggregator::{ResultAggregator, Tally};
pub use deadline::ScanDeadline;
pub use limiter::{ConcurrencyLimiter, LimiterError, Slot};
pub use tcp::TcpConnectProber;
pub use traits::{ProbeFailure, ProbeResult, Prober};

/// Default overall scan budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default concurrency: the number of logical CPUs.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Immutable description of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    host: String,
    ports: PortRange,
    concurrency: usize,
    timeout: Duration,
}

impl ScanRequest {
    /// Create a request with default concurrency and timeout.
    pub fn new(host: impl Into<String>, ports: PortRange) -> Self {
        Self {
            host: host.into(),
            ports,
            concurrency: default_concurrency(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a request from a textual port specification.
    pub fn parse(host: impl Into<String>, ports: &str) -> ScanResult<Self> {
        Ok(Self::new(host, PortRange::parse(ports)?))
    }

    /// Set the maximum number of probes in flight.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the overall wall-clock budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ports(&self) -> PortRange {
        self.ports
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check the request is runnable.
    pub fn validate(&self) -> ScanResult<()> {
        if self.host.trim().is_empty() {
            return Err(ScanError::Config("host must not be empty".to_string()));
        }
        if self.concurrency == 0 {
            return Err(ScanError::Config(
                "concurrency limit must be at least 1".to_string(),
            ));
        }
        if self.concurrency > ConcurrencyLimiter::MAX_LIMIT {
            return Err(ScanError::Config(format!(
                "concurrency limit must be at most {}",
                ConcurrencyLimiter::MAX_LIMIT
            )));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::Config(
                "overall timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Final result of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Host that was scanned.
    pub host: String,
    /// Open ports, strictly ascending.
    pub open_ports: Vec<Port>,
    /// False when the deadline or a cancellation cut the scan short.
    pub completed: bool,
    /// Number of ports in the request.
    pub ports_requested: usize,
    /// Number of probes that reported back.
    pub ports_probed: usize,
    /// When the scan started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the scan.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl ScanReport {
    /// Whether this is a partial report.
    pub fn is_partial(&self) -> bool {
        !self.completed
    }

    /// Open ports as raw numbers.
    pub fn open_port_numbers(&self) -> Vec<u16> {
        self.open_ports.iter().map(|p| p.as_u16()).collect()
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// Drives a scan: limiter-gated fan-out of probes under one deadline.
pub struct ScanCoordinator<P> {
    prober: Arc<P>,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl ScanCoordinator<TcpConnectProber> {
    /// Coordinator using a plain TCP connect prober.
    pub fn tcp() -> Self {
        Self::new(TcpConnectProber::new())
    }
}

impl<P: Prober + 'static> ScanCoordinator<P> {
    /// Create a coordinator around `prober`.
    pub fn new(prober: P) -> Self {
        Self {
            prober: Arc::new(prober),
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Expire every scan's deadline early when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Advance `progress` once per completed probe.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run one scan to completion or deadline.
    ///
    /// Only an invalid request is an error. Dial failures are folded into
    /// closed ports, and deadline expiry yields a report with
    /// `completed == false`.
    pub async fn scan(&self, request: &ScanRequest) -> ScanResult<ScanReport> {
        request.validate()?;

        let started_at = Utc::now();
        let start = Instant::now();
        let total = request.ports().len();

        info!(
            host = request.host(),
            ports = %request.ports(),
            concurrency = request.concurrency(),
            timeout_ms = request.timeout().as_millis() as u64,
            "starting scan"
        );

        if let Some(pb) = &self.progress {
            pb.set_length(total as u64);
        }

        let deadline = ScanDeadline::child_of(&self.cancel, request.timeout());
        let limiter = ConcurrencyLimiter::new(request.concurrency());
        let host: Arc<str> = Arc::from(request.host());
        let mut aggregator = ResultAggregator::new();
        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;

        for port in request.ports().iter() {
            while let Some(joined) = tasks.try_join_next() {
                self.collect(&mut aggregator, joined);
            }

            let slot = match limiter.acquire(&deadline).await {
                Ok(slot) => slot,
                Err(LimiterError::Cancelled) => {
                    warn!(
                        dispatched,
                        skipped = total - dispatched,
                        "deadline expired, no further probes dispatched"
                    );
                    break;
                }
            };

            let prober = Arc::clone(&self.prober);
            let host = Arc::clone(&host);
            let deadline = deadline.clone();
            tasks.spawn(async move {
                let result = prober.probe(&host, port, &deadline).await;
                slot.release();
                result
            });
            dispatched += 1;
        }

        // In-flight probes are bounded by the same deadline; let them finish.
        while let Some(joined) = tasks.join_next().await {
            self.collect(&mut aggregator, joined);
        }

        let tally = aggregator.finalize();
        let completed = dispatched == total && tally.probed == total && tally.interrupted == 0;
        let elapsed = start.elapsed();

        if let Some(pb) = &self.progress {
            pb.finish_with_message(if completed {
                "Scan complete"
            } else {
                "Scan cut short"
            });
        }

        info!(
            open = tally.open_ports.len(),
            probed = tally.probed,
            completed,
            elapsed_ms = elapsed.as_millis() as u64,
            "scan finished"
        );

        Ok(ScanReport {
            host: request.host().to_string(),
            open_ports: tally.open_ports,
            completed,
            ports_requested: total,
            ports_probed: tally.probed,
            started_at,
            elapsed,
        })
    }

    fn collect(&self, aggregator: &mut ResultAggregator, joined: Result<ProbeResult, JoinError>) {
        match joined {
            Ok(result) => {
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                    if result.open {
                        pb.set_message(format!("Found open port: {}", result.port));
                    }
                }
                aggregator.add(result);
            }
            Err(e) => error!(error = %e, "probe task failed"),
        }
    }
}

/// Scan with a plain TCP connect prober.
pub async fn scan(request: &ScanRequest) -> ScanResult<ScanReport> {
    ScanCoordinator::tcp().scan(request).await
}
