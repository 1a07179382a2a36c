//! Configuration for the split-write benchmark.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default number of writes per run.
pub const DEFAULT_TOTAL: u64 = 1_000_000;

/// Default pause inserted after every write.
pub const DEFAULT_PAUSE: Duration = Duration::from_micros(20);

/// Default configured-path file.
pub const DEFAULT_CONFIGURED_PATH: &str = "/home/provconf/adil/conf.txt";

/// Default vanilla-path file.
pub const DEFAULT_VANILLA_PATH: &str = "/home/provconf/adil/van.txt";

/// Configuration for one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Share of identifiers routed to the configured file, in percent.
    /// Not range-checked.
    pub percentage: i64,
    /// Number of writes (N).
    pub total: u64,
    /// Blocking pause after each write. Zero skips the sleep call.
    pub pause: Duration,
    /// Destination for identifiers at or below the threshold.
    pub configured_path: PathBuf,
    /// Destination for everything else.
    pub vanilla_path: PathBuf,
    /// Seed for a reproducible shuffle.
    pub seed: Option<u64>,
    /// Call `sync_data` after each flush.
    pub sync: bool,
    /// Print a summary to stderr.
    pub verbose: bool,
    /// Output directory for JSON results.
    pub output_dir: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            percentage: 0,
            total: DEFAULT_TOTAL,
            pause: DEFAULT_PAUSE,
            configured_path: PathBuf::from(DEFAULT_CONFIGURED_PATH),
            vanilla_path: PathBuf::from(DEFAULT_VANILLA_PATH),
            seed: None,
            sync: false,
            verbose: false,
            output_dir: None,
        }
    }
}

impl BenchConfig {
    /// Create a new config with default settings.
    pub fn new(percentage: i64) -> Self {
        Self {
            percentage,
            ..Self::default()
        }
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `SPLITBENCH_TOTAL`: number of writes (default: 1000000)
    /// - `SPLITBENCH_PAUSE_US`: pause after each write in microseconds (default: 20)
    /// - `SPLITBENCH_CONFIGURED_PATH`: configured-path file
    /// - `SPLITBENCH_VANILLA_PATH`: vanilla-path file
    /// - `SPLITBENCH_SEED`: seed for a deterministic shuffle
    /// - `SPLITBENCH_SYNC`: sync each write to disk (default: false)
    /// - `SPLITBENCH_VERBOSE`: stderr summary (default: false)
    /// - `SPLITBENCH_OUTPUT_DIR`: directory for JSON results
    ///
    /// Unlike unset variables, malformed numeric values are an error.
    pub fn from_env(percentage: i64) -> Result<Self> {
        Self::from_lookup(percentage, |key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(percentage: i64, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::new(percentage);

        if let Some(v) = lookup("SPLITBENCH_TOTAL") {
            cfg.total = parse_number("SPLITBENCH_TOTAL", &v)?;
        }
        if let Some(v) = lookup("SPLITBENCH_PAUSE_US") {
            cfg.pause = Duration::from_micros(parse_number("SPLITBENCH_PAUSE_US", &v)?);
        }
        if let Some(v) = lookup("SPLITBENCH_CONFIGURED_PATH") {
            cfg.configured_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SPLITBENCH_VANILLA_PATH") {
            cfg.vanilla_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SPLITBENCH_SEED") {
            cfg.seed = Some(parse_number("SPLITBENCH_SEED", &v)?);
        }
        if let Some(v) = lookup("SPLITBENCH_SYNC") {
            cfg.sync = parse_flag(&v);
        }
        if let Some(v) = lookup("SPLITBENCH_VERBOSE") {
            cfg.verbose = parse_flag(&v);
        }
        if let Some(v) = lookup("SPLITBENCH_OUTPUT_DIR") {
            cfg.output_dir = Some(PathBuf::from(v));
        }

        Ok(cfg)
    }

    /// Set the number of writes.
    pub fn total(mut self, n: u64) -> Self {
        self.total = n;
        self
    }

    /// Set the pause after each write.
    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Set the configured-path file.
    pub fn configured_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.configured_path = path.into();
        self
    }

    /// Set the vanilla-path file.
    pub fn vanilla_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vanilla_path = path.into();
        self
    }

    /// Use a seeded shuffle.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sync each write to disk.
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Set verbose output.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    /// Set the JSON output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Whether the percentage lies in the expected 0..=100 range.
    pub fn percentage_in_range(&self) -> bool {
        (0..=100).contains(&self.percentage)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key}={value:?} is not a valid number")))
}

fn parse_flag(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}
