//! The interleaved write loop.

use crate::config::BenchConfig;
use crate::context::LatencyAccumulator;
use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::result::BenchResult;
use crate::sequence::permuted_ids;
use crate::split::{Destination, SplitThreshold};
use crate::target::{Syncable, TargetFiles};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

/// One benchmark run over two exclusively owned destinations.
///
/// # Example
///
/// ```rust,no_run
/// use splitbench::{BenchConfig, InterleavedBench};
///
/// let config = BenchConfig::new(30)
///     .configured_path("/tmp/conf.txt")
///     .vanilla_path("/tmp/van.txt");
///
/// let result = InterleavedBench::open(config)?.run(&mut rand::thread_rng())?;
/// println!("{}", result.summary_line());
/// # Ok::<(), splitbench::Error>(())
/// ```
pub struct InterleavedBench<W> {
    config: BenchConfig,
    threshold: SplitThreshold,
    targets: TargetFiles<W>,
}

impl InterleavedBench<BufWriter<File>> {
    /// Open both files named in `config` for append.
    pub fn open(config: BenchConfig) -> Result<Self> {
        let targets = TargetFiles::open(&config.configured_path, &config.vanilla_path)?;
        tracing::debug!(
            configured = %targets.path(Destination::Configured).display(),
            vanilla = %targets.path(Destination::Vanilla).display(),
            "opened target files"
        );
        Ok(Self::with_targets(config, targets))
    }
}

impl<W: Syncable> InterleavedBench<W> {
    /// Run against already-open writers.
    pub fn with_targets(config: BenchConfig, targets: TargetFiles<W>) -> Self {
        let threshold = SplitThreshold::new(config.total, config.percentage);
        Self {
            config,
            threshold,
            targets,
        }
    }

    pub fn threshold(&self) -> SplitThreshold {
        self.threshold
    }

    /// Shuffle `1..=total` with `rng` and write in that order.
    pub fn run<R: Rng + ?Sized>(self, rng: &mut R) -> Result<BenchResult> {
        let ids = permuted_ids(self.config.total, rng);
        self.run_ids(&ids)
    }

    /// Run with the configured seed, or a thread-local rng when unset, and
    /// hand the result to `reporter`.
    ///
    /// A failed run never reaches the reporter.
    pub fn run_reported(self, reporter: &dyn Reporter) -> Result<BenchResult> {
        let seed = self.config.seed;
        let result = match seed {
            Some(seed) => self.run(&mut StdRng::seed_from_u64(seed))?,
            None => self.run(&mut rand::thread_rng())?,
        };
        reporter
            .run_end(&result)
            .map_err(|source| Error::Output { source })?;
        Ok(result)
    }

    /// Write once per identifier in the given order.
    ///
    /// The mean is taken over `ids.len()` writes. Consumes the benchmark so
    /// the files are closed exactly once, when this returns.
    pub fn run_ids(mut self, ids: &[u64]) -> Result<BenchResult> {
        let started_at = unix_millis();
        let run_start = Instant::now();
        let sync = self.config.sync;
        let pause = self.config.pause;
        let mut acc = LatencyAccumulator::new()?;

        tracing::debug!(
            percentage = self.config.percentage,
            total = ids.len(),
            threshold = self.threshold.value(),
            expected_configured = self.threshold.configured_count(self.config.total),
            "starting write loop"
        );

        for &id in ids {
            let dest = self.threshold.route(id);
            let written = acc.writes();
            let targets = &mut self.targets;
            if let Err(e) = acc.measure(dest, || targets.append(dest, sync, written)) {
                tracing::warn!(dest = %dest, written, error = %e, "write failed, aborting run");
                return Err(e);
            }
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }

        let ops = ids.len() as u64;
        self.targets.into_inner(ops)?;

        let result = BenchResult {
            percentage: self.config.percentage,
            total: ops,
            threshold: self.threshold.value(),
            configured_writes: acc.configured(),
            vanilla_writes: acc.vanilla(),
            total_latency: acc.total(),
            mean_ns: acc.mean_ns(ops),
            pause,
            sync,
            configured_path: self.config.configured_path.clone(),
            vanilla_path: self.config.vanilla_path.clone(),
            seed: self.config.seed,
            started_at,
            wall_time: run_start.elapsed(),
            #[cfg(feature = "hdr")]
            percentiles: acc.histogram().percentiles(),
        };

        tracing::info!(
            mean_ns = %result.mean_ns,
            configured = result.configured_writes,
            vanilla = result.vanilla_writes,
            "write loop finished"
        );
        Ok(result)
    }
}

/// Open the files, run with a seeded or thread-local rng, and notify `reporter`.
pub fn run(config: BenchConfig, reporter: &dyn Reporter) -> Result<BenchResult> {
    if !config.percentage_in_range() {
        tracing::warn!(
            percentage = config.percentage,
            "percentage outside 0..=100, routing will saturate"
        );
    }
    reporter.run_start(&config);
    InterleavedBench::open(config)?.run_reported(reporter)
}

fn unix_millis() -> String {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_millis())
}
