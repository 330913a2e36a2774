//! Relay wire types.
//!
//! The relay owns the session; the client only observes it. Payload and
//! proof are opaque JSON values and are passed through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/v1/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub verifier_name: String,
    pub required_claims: Vec<String>,
    pub credential_type: String,
}

/// Successful response to session creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedSession {
    /// Opaque identifier assigned by the relay.
    pub session_id: String,
    /// Scannable payload for the holder device.
    pub qr_payload: Value,
}

impl CreatedSession {
    /// Serialize the payload into the string handed to the payload sink.
    pub fn payload_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.qr_payload)
    }
}

/// Session status as reported by the relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    #[default]
    Pending,
    Completed,
    Expired,
    Revoked,
    /// Any status string this client does not know. Polled like `Pending`.
    #[serde(other)]
    Unknown,
}

impl SessionStatus {
    /// Terminal statuses never change again on the relay.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Expired | Self::Revoked)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Response to `GET /api/v1/sessions/{id}`.
///
/// A missing or null `status` reads as `PENDING`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Value>,
}

fn status_or_pending<'de, D>(deserializer: D) -> Result<SessionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SessionStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body returned by the relay on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parsing() {
        let state: SessionState =
            serde_json::from_value(json!({ "status": "COMPLETED", "proof": { "age_over": 18 } }))
                .unwrap();
        assert_eq!(state.status, SessionStatus::Completed);
        assert_eq!(state.proof, Some(json!({ "age_over": 18 })));

        let state: SessionState = serde_json::from_value(json!({ "status": "PENDING" })).unwrap();
        assert_eq!(state.status, SessionStatus::Pending);
        assert!(state.proof.is_none());
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        let state: SessionState =
            serde_json::from_value(json!({ "status": "SCANNED" })).unwrap();
        assert_eq!(state.status, SessionStatus::Unknown);
        assert!(!state.status.is_terminal());
    }

    #[test]
    fn test_missing_status_reads_as_pending() {
        let state: SessionState = serde_json::from_value(json!({})).unwrap();
        assert_eq!(state.status, SessionStatus::Pending);

        let state: SessionState = serde_json::from_value(json!({ "status": null })).unwrap();
        assert_eq!(state.status, SessionStatus::Pending);

        assert!(serde_json::from_str::<SessionState>("not json").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Expired.is_terminal());
        assert!(SessionStatus::Revoked.is_terminal());
        assert!(!SessionStatus::Pending.is_terminal());
    }

    #[test]
    fn test_payload_string_is_json() {
        let created = CreatedSession {
            session_id: "abc".into(),
            qr_payload: json!({ "session_id": "abc", "relay": "http://relay" }),
        };
        let payload = created.payload_string().unwrap();
        let back: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(back, created.qr_payload);
    }

    #[test]
    fn test_error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_value(json!({ "message": "nope" })).unwrap();
        assert!(body.error.is_none());
    }
}
