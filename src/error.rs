//! Error types for the name fragment pipeline
//!
//! Recoverable per-name anomalies never surface here; they are logged by the
//! fragmenter. Everything in this module is fatal to a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading stopwords or name records from an external source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source '{source_name}' is unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures opening or writing the partition files
#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("cannot open partition '{key}' at {}: {source}", .path.display())]
    Open {
        key: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write to partition '{key}' failed: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Invalid or unreadable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Invalid(String),

    #[error("invalid schema name '{0}': expected a plain SQL identifier")]
    InvalidSchema(String),
}

/// Top-level error for a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to load stopwords: {0}")]
    Stopwords(#[source] SourceError),

    #[error("record source failed after {rows} rows: {source}")]
    Records {
        rows: u64,
        #[source]
        source: SourceError,
    },

    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
