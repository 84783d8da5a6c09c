//! Commit/abort counters and latency aggregation.
//!
//! Statistics are advisory: they are read without coordinating with
//! in-flight commits, so a snapshot may be momentarily behind.

use std::time::Duration;

use serde::Serialize;

/// Running latency aggregate over terminated transactions.
#[derive(Debug, Clone, Default)]
pub(crate) struct LatencyRecorder {
    count: u64,
    total: Duration,
    min: Option<Duration>,
    max: Option<Duration>,
}

impl LatencyRecorder {
    pub(crate) fn record(&mut self, sample: Duration) {
        self.count += 1;
        self.total += sample;
        self.min = Some(self.min.map_or(sample, |m| m.min(sample)));
        self.max = Some(self.max.map_or(sample, |m| m.max(sample)));
    }

    pub(crate) fn summary(&self) -> LatencySummary {
        let to_ms = |d: Duration| d.as_secs_f64() * 1_000.0;
        LatencySummary {
            count: self.count,
            mean_ms: if self.count == 0 {
                0.0
            } else {
                to_ms(self.total) / self.count as f64
            },
            min_ms: self.min.map_or(0.0, to_ms),
            max_ms: self.max.map_or(0.0, to_ms),
        }
    }
}

/// Latency summary over terminated transactions, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    /// Number of samples aggregated
    pub count: u64,
    /// Mean begin-to-termination latency
    pub mean_ms: f64,
    /// Fastest transaction seen
    pub min_ms: f64,
    /// Slowest transaction seen
    pub max_ms: f64,
}

/// Point-in-time transaction statistics.
#[derive(Debug, Clone, Serialize)]
pub struct TxnStats {
    /// Transactions that committed
    pub committed: u64,
    /// Transactions that aborted, by conflict or by request
    pub aborted: u64,
    /// Transactions currently live
    pub live: usize,
    /// committed / (committed + aborted); 0 when nothing terminated yet
    pub success_rate: f64,
    /// Latency aggregate over terminated transactions
    pub latency: LatencySummary,
}

/// Internal counters owned by the manager.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    committed: u64,
    aborted: u64,
    latency: LatencyRecorder,
}

impl Counters {
    pub(crate) fn record_commit(&mut self, latency: Duration) {
        self.committed += 1;
        self.latency.record(latency);
    }

    pub(crate) fn record_abort(&mut self, latency: Duration) {
        self.aborted += 1;
        self.latency.record(latency);
    }

    pub(crate) fn snapshot(&self, live: usize) -> TxnStats {
        let terminated = self.committed + self.aborted;
        TxnStats {
            committed: self.committed,
            aborted: self.aborted,
            live,
            success_rate: if terminated == 0 {
                0.0
            } else {
                self.committed as f64 / terminated as f64
            },
            latency: self.latency.summary(),
        }
    }
}
