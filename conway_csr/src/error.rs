//! Error types for the CSR life engine.
//!
//! Every failure here is a configuration or programming error. Once a
//! [`Simulation`](crate::Simulation) is running, stepping it cannot fail on
//! well-formed input; the only runtime paths are a panicking worker task and
//! a sink that refuses a frame.

use thiserror::Error;

/// Boxed error returned by a [`GenerationSink`](crate::GenerationSink).
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the engine.
#[derive(Error, Debug)]
pub enum LifeError {
    /// Zero width, height or worker count.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A state or count vector does not cover the padded grid.
    #[error("Shape mismatch: expected {expected} cells, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A state vector holds something other than 0 or 1.
    #[error("Invalid cell value {value} at index {index} (expected 0 or 1)")]
    InvalidCell { index: usize, value: u8 },

    /// CSR arrays that violate their structural invariants.
    #[error("Malformed CSR matrix: {0}")]
    MalformedMatrix(String),

    /// A worker task panicked or was cancelled before joining.
    #[error("Worker failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),

    /// The worker runtime could not be started.
    #[error("Runtime error: {0}")]
    Runtime(#[source] std::io::Error),

    /// The per-generation consumer rejected a frame.
    #[error("Generation sink failed at generation {generation}: {source}")]
    Sink {
        generation: usize,
        #[source]
        source: SinkError,
    },

    /// A configuration file could not be parsed.
    #[error("Config file error: {0}")]
    ConfigFile(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type LifeResult<T> = Result<T, LifeError>;

impl LifeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a malformed-matrix error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMatrix(msg.into())
    }

    pub(crate) fn check_len(expected: usize, actual: usize) -> LifeResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { expected, actual })
        }
    }
}
