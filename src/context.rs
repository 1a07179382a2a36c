//! Latency accumulation for the write loop.

use crate::error::Result;
use crate::split::Destination;
use std::time::{Duration, Instant};

#[cfg(feature = "hdr")]
use crate::histogram::LatencyHistogram;

/// Running totals for one benchmark run.
///
/// Only the timed region passed to [`measure`](Self::measure) counts
/// toward the total. The pause between writes never does.
pub struct LatencyAccumulator {
    total: Duration,
    configured: u64,
    vanilla: u64,
    #[cfg(feature = "hdr")]
    histogram: LatencyHistogram,
}

impl LatencyAccumulator {
    /// Fails only when the `hdr` histogram cannot be allocated.
    pub fn new() -> Result<Self> {
        Ok(Self {
            total: Duration::ZERO,
            configured: 0,
            vanilla: 0,
            #[cfg(feature = "hdr")]
            histogram: LatencyHistogram::new()?,
        })
    }

    /// Time one write to `dest` and add it to the total.
    ///
    /// The write is only counted when `f` succeeds.
    pub fn measure<F, T, E>(&mut self, dest: Destination, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        let start = Instant::now();
        let result = f()?;
        self.record(dest, start.elapsed());
        Ok(result)
    }

    /// Manually record a duration (for cases where you time externally).
    pub fn record(&mut self, dest: Destination, elapsed: Duration) {
        self.total += elapsed;
        match dest {
            Destination::Configured => self.configured += 1,
            Destination::Vanilla => self.vanilla += 1,
        }
        #[cfg(feature = "hdr")]
        self.histogram.record(elapsed);
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn configured(&self) -> u64 {
        self.configured
    }

    pub fn vanilla(&self) -> u64 {
        self.vanilla
    }

    /// Completed writes across both files.
    pub fn writes(&self) -> u64 {
        self.configured + self.vanilla
    }

    /// Integer mean over `ops` writes, truncated. Zero when `ops` is zero.
    pub fn mean_ns(&self, ops: u64) -> u128 {
        if ops == 0 {
            0
        } else {
            self.total.as_nanos() / u128::from(ops)
        }
    }

    #[cfg(feature = "hdr")]
    pub fn histogram(&self) -> &LatencyHistogram {
        &self.histogram
    }
}
