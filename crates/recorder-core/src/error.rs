// crates/recorder-core/src/error.rs
//
// One error type for the whole orchestrator. Every Orchestrator method
// returns `Result<_, RecorderError>` — the status-code taxonomy of the
// original design collapses onto the `Err` variants here; `Ok` stands in
// for `SUCCESS`.

use std::fmt;

/// Uniform error returned by every public Orchestrator operation.
///
/// `Source` and `Sink` are passthrough variants: the Orchestrator never
/// transforms a delegate's error, it only tags which side produced it.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// Operation invoked in a lifecycle state that forbids it.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    /// Out-of-range or malformed parameter. Carries a short static
    /// description of which field failed, not the offending value — callers
    /// already know what they passed in.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),

    /// `SourceRegistry` had no free slot for the requested kind.
    #[error("no free channel for source kind")]
    NoFreeChannel,

    /// A syscall-level operation (fd mode query, scheduling) failed.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// A `Source` implementation returned an error.
    #[error("source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A `Sink` implementation returned an error.
    #[error("sink error: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Catch-all for conditions the original labeled `ERR_UNKNOWN`
    /// (e.g. a required collaborator that was never constructed).
    #[error("unknown error: {0}")]
    Unknown(&'static str),
}

impl RecorderError {
    pub fn source<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        RecorderError::Source(Box::new(e))
    }

    pub fn sink<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        RecorderError::Sink(Box::new(e))
    }
}

/// Placeholder error for `Sink`/`Source` implementations that only need a
/// string message — mirrors the plain `int32_t` codes of the original
/// collaborator interfaces for fakes and simple backends.
#[derive(Debug)]
pub struct StringError(pub String);

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StringError {}

impl From<&str> for StringError {
    fn from(s: &str) -> Self { StringError(s.to_string()) }
}

pub type RecorderResult<T> = Result<T, RecorderError>;
