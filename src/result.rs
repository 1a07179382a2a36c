//! Benchmark result types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "hdr")]
use crate::histogram::Percentiles;

/// Outcome of one completed split-write run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    /// Requested split percentage
    pub percentage: i64,
    /// Number of writes (N)
    pub total: u64,
    /// `total × percentage / 100` as used for routing
    pub threshold: f64,
    /// Writes routed to the configured file
    pub configured_writes: u64,
    /// Writes routed to the vanilla file
    pub vanilla_writes: u64,
    /// Sum of all per-write latencies
    #[serde(with = "duration_serde")]
    pub total_latency: Duration,
    /// Truncated integer mean per write, in nanoseconds
    pub mean_ns: u128,
    /// Pause after each write
    #[serde(with = "duration_serde")]
    pub pause: Duration,
    /// Whether each write was synced to disk
    pub sync: bool,
    pub configured_path: PathBuf,
    pub vanilla_path: PathBuf,
    /// Shuffle seed, if the run was reproducible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Unix milliseconds when the run started
    pub started_at: String,
    /// Wall-clock time of the whole run, pauses included
    #[serde(with = "duration_serde")]
    pub wall_time: Duration,
    #[cfg(feature = "hdr")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentiles: Option<Percentiles>,
}

impl BenchResult {
    /// The single console line: `<mean> ns/op`.
    pub fn summary_line(&self) -> String {
        format!("{} ns/op", self.mean_ns)
    }

    /// Completed writes per second of wall-clock time.
    pub fn writes_per_sec(&self) -> Option<f64> {
        let secs = self.wall_time.as_secs_f64();
        if secs > 0.0 {
            Some(self.total as f64 / secs)
        } else {
            None
        }
    }

    /// Load a result from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_nanos().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let nanos = u128::deserialize(d)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
pub(crate) fn sample(mean_ns: u128) -> BenchResult {
    BenchResult {
        percentage: 50,
        total: 10,
        threshold: 5.0,
        configured_writes: 5,
        vanilla_writes: 5,
        total_latency: Duration::from_nanos(mean_ns as u64 * 10),
        mean_ns,
        pause: Duration::ZERO,
        sync: false,
        configured_path: PathBuf::from("conf.txt"),
        vanilla_path: PathBuf::from("van.txt"),
        seed: Some(1),
        started_at: "1700000000000".to_string(),
        wall_time: Duration::from_secs(2),
        #[cfg(feature = "hdr")]
        percentiles: None,
    }
}
