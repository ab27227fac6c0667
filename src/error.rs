// src/error.rs
//! Unified error handling for the signal conditioning pipeline
//!
//! Every error is a deterministic precondition violation detected before any
//! output is produced; there is nothing transient to retry. Callers decide
//! whether a failed channel is skipped, substituted, or fatal.

use thiserror::Error;

/// Unified error type for all pipeline operations
#[derive(Debug, Clone, Error)]
pub enum SignalError {
    /// Filter specification violates a design constraint (bad cutoffs,
    /// cutoff at/above Nyquist, order out of range). Fatal: the caller must
    /// fix the configuration.
    #[error("invalid filter spec: {reason}")]
    InvalidFilterSpec { reason: String },

    /// Sequence too short for the requested filter. Recoverable by lowering
    /// the order or skipping the channel; that policy belongs to the caller.
    #[error("insufficient samples: got {got}, zero-phase filtering needs more than {required}")]
    InsufficientSamples { required: usize, got: usize },

    /// Normalization denominator is zero, negative, or non-finite, e.g. an
    /// all-silent channel.
    #[error("degenerate signal: cannot normalize by maximum {max}")]
    DegenerateSignal { max: f64 },

    /// Configuration failed validation or could not be parsed.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A requested channel does not exist in the source.
    #[error("channel not found: {name}")]
    MissingChannel { name: String },

    /// File-level failure in a source or sink adapter.
    #[error("io error during {operation}: {reason}")]
    Io { operation: String, reason: String },
}

impl SignalError {
    pub(crate) fn invalid_spec(reason: impl Into<String>) -> Self {
        SignalError::InvalidFilterSpec {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        SignalError::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(operation: &str, err: impl std::fmt::Display) -> Self {
        SignalError::Io {
            operation: operation.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for pipeline operations
pub type SignalResult<T> = Result<T, SignalError>;
