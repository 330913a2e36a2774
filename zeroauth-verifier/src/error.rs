//! Error types for the ZeroAuth verifier.
//!
//! `VerificationError` is the failure taxonomy a verification call settles
//! with. `RelayError` classifies the failure of a single relay call and is
//! converted into a retry or a `VerificationError` by the poll loop.

use thiserror::Error;

/// Generic message used when the relay rejects session creation without
/// supplying its own `error` field.
pub const CREATE_SESSION_FAILED: &str = "Failed to create session";

/// Reasons a verification call settles unsuccessfully.
///
/// The `Display` form of each variant is the human-readable error string
/// carried by a failed [`VerificationResult`](crate::VerificationResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The request failed client-side validation; the relay was never contacted.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The relay refused to create a session.
    #[error("{0}")]
    CreationRejected(String),

    /// The caller cancelled the call.
    #[error("Verification cancelled")]
    Cancelled,

    /// The overall timeout elapsed while the session was still pending.
    #[error("Verification timed out")]
    TimedOut,

    /// The relay answered a status query with 404.
    #[error("Session not found or expired")]
    SessionNotFound,

    /// The relay reported the session as expired.
    #[error("Session expired")]
    SessionExpired,

    /// The holder revoked the session.
    #[error("Session revoked by user")]
    SessionRevoked,

    /// Too many consecutive status queries failed.
    #[error("Too many network failures")]
    NetworkExhausted,

    /// Any other condition, carrying the underlying message.
    #[error("{0}")]
    Unexpected(String),
}

/// Errors from a single call to the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay base URL is not an absolute http(s) URL.
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),

    /// Connection, TLS or timeout failure.
    #[error("Relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay does not know the session (HTTP 404).
    #[error("Session not found")]
    NotFound,

    /// Any other non-success HTTP status.
    #[error("Server returned {code}")]
    Status {
        /// HTTP status code
        code: u16,
        /// The `error` field of the response body, if the relay sent one
        message: Option<String>,
    },

    /// The response body did not match the relay contract.
    #[error("Invalid relay response: {0}")]
    Decode(String),
}

impl RelayError {
    /// Check if an error is transient and the call may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Decode(_)
        )
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
