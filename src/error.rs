//! Error types (fatal stream errors only; lifecycle lookup misses are
//! recoverable and logged where they happen, never raised).

use thiserror::Error;

use crate::event::DecodeError;

#[derive(Debug, Error)]
pub enum PlanwatchError {
    /// Malformed line or unknown vocabulary. Fatal: the producer cannot
    /// resend, and a vocabulary mismatch will not fix itself mid-stream.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The line source failed before a clean end of stream.
    #[error("log stream read failed: {0}")]
    Stream(#[source] std::io::Error),

    /// Terminal, tee or export I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
