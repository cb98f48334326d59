//! Error types for the throughput harness.

use std::path::PathBuf;
use thiserror::Error;

use crate::Phase;

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A worker log could not be read.
    #[error("failed to read {path}: {source}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A profiler table row did not have the expected shape.
    #[error("line {line}: malformed profiler row: {message}")]
    MalformedRow { line: usize, message: String },

    /// The profiler table was absent or ended before the last phase boundary.
    #[error("profiler table truncated: {0}")]
    TruncatedTable(&'static str),

    /// A phase duration of zero (or worse) makes the throughput undefined.
    /// The original harness divided anyway and wrote `inf` into the report.
    #[error("{phase} phase time is zero or not finite; cannot compute a throughput")]
    ZeroDuration { phase: Phase },

    /// Aggregating an empty sample set.
    #[error("no worker samples to aggregate")]
    EmptyRun,

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
