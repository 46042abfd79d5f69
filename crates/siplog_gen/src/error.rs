//! Typed error taxonomy for the generation pipeline.
//!
//! Expected-but-recoverable outcomes (timeouts, non-2xx, malformed payloads)
//! are values, not panics; the orchestrator decides between degrading to the
//! fallback and propagating. `Timeout` and `Transport` stay distinct kinds
//! even though current fallback policy treats them identically.

/// Failure of a single generation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// No usable provider credential configured (absent or empty string).
    #[error("no provider credential configured")]
    MissingCredential,

    /// Network failure before any usable response.
    #[error("network error: {0}")]
    Transport(String),

    /// The cancellation deadline elapsed and the request was aborted.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Provider answered with a non-2xx status.
    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    /// Structurally invalid provider payload (not JSON, or not an object).
    #[error("malformed provider response: {0}")]
    Parse(String),
}
