//! Verification result.
//!
//! A result holds either the relay's proof or a [`VerificationError`], never
//! both, plus some diagnostics about the call that produced it.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::time::Duration;

use crate::error::VerificationError;

/// Settled outcome of one verification call.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use zeroauth_verifier::{VerificationError, VerificationResult};
///
/// let ok = VerificationResult::success(json!({ "age_over": 18 }));
/// assert!(ok.is_success());
/// assert_eq!(ok.proof(), Some(&json!({ "age_over": 18 })));
/// assert!(ok.error().is_none());
///
/// let failed = VerificationResult::failure(VerificationError::TimedOut);
/// assert!(failed.proof().is_none());
/// assert_eq!(failed.error().as_deref(), Some("Verification timed out"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    outcome: Result<Value, VerificationError>,
    session_id: Option<String>,
    status_queries: u32,
    elapsed: Duration,
}

impl VerificationResult {
    /// A successful result carrying the relay's proof.
    pub fn success(proof: Value) -> Self {
        Self::from_outcome(Ok(proof))
    }

    /// A failed result.
    pub fn failure(error: VerificationError) -> Self {
        Self::from_outcome(Err(error))
    }

    fn from_outcome(outcome: Result<Value, VerificationError>) -> Self {
        Self {
            outcome,
            session_id: None,
            status_queries: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Attach call diagnostics.
    pub(crate) fn with_diagnostics(
        mut self,
        session_id: Option<String>,
        status_queries: u32,
        elapsed: Duration,
    ) -> Self {
        self.session_id = session_id;
        self.status_queries = status_queries;
        self.elapsed = elapsed;
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The proof, present iff the call succeeded.
    pub fn proof(&self) -> Option<&Value> {
        self.outcome.as_ref().ok()
    }

    /// Human-readable error, present iff the call failed.
    pub fn error(&self) -> Option<String> {
        self.error_kind().map(ToString::to_string)
    }

    /// The typed failure, present iff the call failed.
    pub fn error_kind(&self) -> Option<&VerificationError> {
        self.outcome.as_ref().err()
    }

    /// Relay session id, if a session was created.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Number of status queries issued.
    pub fn status_queries(&self) -> u32 {
        self.status_queries
    }

    /// Time from call start to settlement.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn into_outcome(self) -> Result<Value, VerificationError> {
        self.outcome
    }
}

/// JSON shape of a result.
#[derive(Serialize)]
struct ResultJson<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    proof: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    status_queries: u32,
    #[serde(rename = "elapsed_ms", serialize_with = "duration_millis")]
    elapsed: Duration,
}

impl Serialize for VerificationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ResultJson {
            success: self.is_success(),
            proof: self.proof(),
            error: self.error(),
            session_id: self.session_id(),
            status_queries: self.status_queries,
            elapsed: self.elapsed,
        }
        .serialize(serializer)
    }
}

/// Serialize a Duration as whole milliseconds.
fn duration_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(proof) => write!(
                f,
                "VERIFIED after {} status queries ({:?}): {}",
                self.status_queries, self.elapsed, proof
            ),
            Err(error) => write!(f, "NOT VERIFIED: {}", error),
        }
    }
}
