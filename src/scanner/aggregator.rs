//! Probe result aggregation.
//!
//! The aggregator is owned by the coordinator, which feeds it every probe
//! result as probe tasks complete. Exclusive ownership serializes all
//! mutations; the open-port set is never shared.

use crate::scanner::traits::ProbeResult;
use crate::types::Port;
use std::collections::BTreeSet;

/// Tally produced by [`ResultAggregator::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    /// Open ports, strictly ascending.
    pub open_ports: Vec<Port>,
    /// Number of probe results recorded.
    pub probed: usize,
    /// Number of probes cut short by the scan deadline.
    pub interrupted: usize,
}

/// Accumulates open-port findings.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    open: BTreeSet<Port>,
    probed: usize,
    interrupted: usize,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one probe result. Only `open` results add a port.
    pub fn add(&mut self, result: ProbeResult) {
        self.probed += 1;
        if result.is_interrupted() {
            self.interrupted += 1;
        }
        if result.open {
            self.open.insert(result.port);
        }
    }

    /// Number of results recorded so far.
    pub fn probed(&self) -> usize {
        self.probed
    }

    /// Consume the aggregator, yielding the sorted, duplicate-free open ports.
    pub fn finalize(self) -> Tally {
        Tally {
            open_ports: self.open.into_iter().collect(),
            probed: self.probed,
            interrupted: self.interrupted,
        }
    }
}
