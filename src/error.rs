//! Error types for the split-write benchmark.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a benchmark run.
///
/// All variants are fatal: a run never retries and never rolls back lines
/// that were already flushed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A setting could not be parsed or is unusable.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// A target file could not be opened for append.
    #[error("cannot open {} for append", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write, flush or sync failed after `written` lines had completed.
    #[error("write to {} failed after {written} completed writes", path.display())]
    WriteFailure {
        path: PathBuf,
        written: u64,
        #[source]
        source: io::Error,
    },

    /// The result line could not be written.
    #[error("cannot write benchmark result")]
    Output {
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }
}
