//! # ZeroAuth Verifier
//!
//! **Client-side orchestration of relay-brokered credential verification**
//!
//! A verifier asks a relay to open a verification session for a set of
//! claims, hands the session's scannable payload to the caller (usually to be
//! drawn as a QR code), and polls the relay until the holder completes,
//! revokes or lets the session expire.
//!
//! ## Features
//!
//! - **Exponential backoff**: 2s, 3s, 4.5s, 6.75s, then every 10s
//! - **Failure tolerant**: up to 5 consecutive failed status queries are retried
//! - **Cancellable**: every call returns a handle that can be cancelled cooperatively
//! - **Typed outcomes**: exactly one proof or one [`VerificationError`] per call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zeroauth_verifier::{SessionVerifier, VerificationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let verifier = SessionVerifier::new("http://localhost:3000")?;
//!
//!     let request = VerificationRequest::new("Zero Demo App", ["birth_year"])
//!         .with_credential_type("Age Verification");
//!
//!     let result = verifier
//!         .verify_with_payload(request, |payload| println!("QR payload: {}", payload))
//!         .await;
//!
//!     println!("Verified: {}", result.is_success());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod policy;
pub mod relay;
pub mod request;
pub mod result;
pub mod session;
pub mod verifier;

// Re-export main types for convenience
pub use error::{RelayError, VerificationError};
pub use policy::{PollConfig, PollState};
pub use relay::{HttpRelay, Relay};
pub use request::VerificationRequest;
pub use result::VerificationResult;
pub use session::{CreateSessionRequest, CreatedSession, SessionState, SessionStatus};
pub use verifier::{CancelHandle, PayloadSink, SessionVerifier, VerificationHandle};
