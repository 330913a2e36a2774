//! Verification request and its validation.

use std::time::Duration;

use crate::error::VerificationError;
use crate::session::CreateSessionRequest;

/// Credential type sent when the caller does not choose one.
pub const DEFAULT_CREDENTIAL_TYPE: &str = "Age Verification";

/// Overall timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(120_000);

/// What the verifier asks the holder to prove.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use zeroauth_verifier::VerificationRequest;
///
/// let request = VerificationRequest::new("Zero Demo App", ["birth_year"])
///     .with_timeout(Duration::from_secs(60));
///
/// assert_eq!(request.credential_type(), "Age Verification");
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    verifier_name: String,
    required_claims: Vec<String>,
    credential_type: Option<String>,
    timeout: Option<Duration>,
}

impl VerificationRequest {
    /// Create a request for the given claims, in order.
    pub fn new<I, S>(verifier_name: impl Into<String>, required_claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            verifier_name: verifier_name.into(),
            required_claims: required_claims.into_iter().map(Into::into).collect(),
            credential_type: None,
            timeout: None,
        }
    }

    /// Override the credential-type label.
    pub fn with_credential_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = Some(credential_type.into());
        self
    }

    /// Override the overall timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the overall timeout, in milliseconds.
    pub fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(timeout_ms))
    }

    pub fn verifier_name(&self) -> &str {
        &self.verifier_name
    }

    pub fn required_claims(&self) -> &[String] {
        &self.required_claims
    }

    /// The credential type, falling back to [`DEFAULT_CREDENTIAL_TYPE`].
    pub fn credential_type(&self) -> &str {
        self.credential_type
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_TYPE)
    }

    /// The overall timeout, falling back to [`DEFAULT_TIMEOUT`].
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Check the request before any relay call is made.
    pub fn validate(&self) -> Result<(), VerificationError> {
        if self.required_claims.is_empty() {
            return Err(VerificationError::InvalidRequest(
                "at least one required claim must be given".to_string(),
            ));
        }

        if let Some(blank) = self.required_claims.iter().position(|c| c.trim().is_empty()) {
            return Err(VerificationError::InvalidRequest(format!(
                "required claim #{} is empty",
                blank + 1
            )));
        }

        if self.timeout == Some(Duration::ZERO) {
            return Err(VerificationError::InvalidRequest(
                "timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the session-creation body.
    pub fn to_create_session(&self) -> CreateSessionRequest {
        CreateSessionRequest {
            verifier_name: self.verifier_name.clone(),
            required_claims: self.required_claims.clone(),
            credential_type: self.credential_type().to_string(),
        }
    }
}
