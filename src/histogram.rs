//! HDR histogram for per-write latency percentiles.

use crate::error::{Error, Result};
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest trackable latency: 60 seconds, in nanoseconds.
const MAX_TRACKABLE_NS: u64 = 60_000_000_000;

/// Per-write latency distribution in nanoseconds.
pub struct LatencyHistogram {
    inner: Histogram<u64>,
}

impl LatencyHistogram {
    pub fn new() -> Result<Self> {
        let inner = Histogram::new_with_bounds(1, MAX_TRACKABLE_NS, 3)
            .map_err(|e| Error::config(format!("latency histogram: {e:?}")))?;
        Ok(Self { inner })
    }

    /// Record one write. Values past the upper bound are clamped.
    pub fn record(&mut self, elapsed: Duration) {
        let ns = u64::try_from(elapsed.as_nanos())
            .unwrap_or(u64::MAX)
            .clamp(1, MAX_TRACKABLE_NS);
        self.inner.saturating_record(ns);
    }

    /// Summary, or `None` when nothing was recorded.
    pub fn percentiles(&self) -> Option<Percentiles> {
        if self.inner.len() == 0 {
            return None;
        }
        Some(Percentiles {
            min_ns: self.inner.min(),
            p50_ns: self.inner.value_at_quantile(0.50),
            p90_ns: self.inner.value_at_quantile(0.90),
            p99_ns: self.inner.value_at_quantile(0.99),
            p999_ns: self.inner.value_at_quantile(0.999),
            max_ns: self.inner.max(),
        })
    }
}

/// Latency percentiles in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentiles {
    pub min_ns: u64,
    pub p50_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
    pub p999_ns: u64,
    pub max_ns: u64,
}
