//! Unified error types for the vmdash workspace.
//!
//! Every library crate returns [`VmdashError`]; the CLI wraps it in
//! `anyhow` at the top level.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum VmdashError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The realtime channel or snapshot endpoint could not be reached.
    #[error("transport error for {url}: {message}")]
    Transport {
        /// Endpoint that failed.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// The stream delivered bytes that are not a valid event or payload.
    #[error("protocol error: {message}")]
    Protocol {
        /// Description of the violation.
        message: String,
    },

    /// A sample in a batch is missing a field or carries an invalid value.
    #[error("malformed sample at index {index}: {reason}")]
    MalformedSample {
        /// Position of the offending entry in the batch.
        index: usize,
        /// Which field was wrong and how.
        reason: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// A worker thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Name given to the thread.
        name: &'static str,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The consumer side of a channel has gone away.
    #[error("channel closed")]
    ChannelClosed,
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, VmdashError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn spawn_error_names_thread_and_keeps_source() {
        let err = VmdashError::Spawn {
            name: "vmdash-feed",
            source: std::io::Error::new(std::io::ErrorKind::WouldBlock, "resource temporarily unavailable"),
        };
        assert_eq!(
            err.to_string(),
            "failed to spawn vmdash-feed thread: resource temporarily unavailable"
        );
        assert!(err.source().is_some());
    }
}
