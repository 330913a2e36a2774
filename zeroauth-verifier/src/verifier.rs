//! Session verifier, the main public API.
//!
//! A verification call runs in three phases on its own task:
//!
//! 1. create a session on the relay (never retried),
//! 2. hand the serialized scannable payload to the caller's sink,
//! 3. poll the session status with exponential backoff until it settles.
//!
//! The caller gets a [`VerificationHandle`] that resolves to exactly one
//! [`VerificationResult`] and can cancel the call cooperatively.

use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{RelayError, VerificationError, CREATE_SESSION_FAILED};
use crate::policy::{PollConfig, PollState};
use crate::relay::{HttpRelay, Relay};
use crate::request::VerificationRequest;
use crate::result::VerificationResult;
use crate::session::{CreatedSession, SessionStatus};

/// Receives the serialized scannable payload once the session exists.
pub type PayloadSink = Box<dyn FnOnce(String) + Send + 'static>;

/// Orchestrates verification sessions against a relay.
///
/// The verifier itself is stateless between calls; every call owns its own
/// poll state, so one verifier may run any number of calls concurrently.
///
/// # Example
///
/// ```rust,no_run
/// use zeroauth_verifier::{SessionVerifier, VerificationRequest};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let verifier = SessionVerifier::new("http://localhost:3000")?;
///     let request = VerificationRequest::new("Zero Demo App", ["birth_year"]);
///
///     let handle = verifier.verify_with_payload(request, |payload| {
///         println!("Scan this: {}", payload);
///     });
///
///     let result = handle.await;
///     match result.proof() {
///         Some(proof) => println!("Proof: {}", proof),
///         None => println!("Failed: {}", result.error().unwrap_or_default()),
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SessionVerifier {
    relay: Arc<dyn Relay>,
    config: PollConfig,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionVerifier {
    /// Create a verifier for the relay at `relay_url` with the default policy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if the URL is not an absolute http(s) URL.
    pub fn new(relay_url: &str) -> Result<Self, RelayError> {
        Self::with_config(relay_url, PollConfig::default())
    }

    /// Create a verifier with a custom polling policy.
    pub fn with_config(relay_url: &str, config: PollConfig) -> Result<Self, RelayError> {
        let relay = HttpRelay::with_timeout(relay_url, config.request_timeout)?;
        Ok(Self::with_relay(relay, config))
    }

    /// Create a verifier over any [`Relay`] implementation.
    pub fn with_relay<R: Relay + 'static>(relay: R, config: PollConfig) -> Self {
        Self {
            relay: Arc::new(relay),
            config,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Start a verification call without a payload sink.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn verify(&self, request: VerificationRequest) -> VerificationHandle {
        self.spawn(request, None)
    }

    /// Start a verification call, handing the scannable payload to `on_payload`
    /// once, after the session is created and before the first status query.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn verify_with_payload<F>(&self, request: VerificationRequest, on_payload: F) -> VerificationHandle
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.spawn(request, Some(Box::new(on_payload)))
    }

    fn spawn(&self, request: VerificationRequest, sink: Option<PayloadSink>) -> VerificationHandle {
        let cancel = CancellationToken::new();
        let call = VerificationCall {
            relay: Arc::clone(&self.relay),
            config: self.config.clone(),
            cancel: cancel.clone(),
        };

        VerificationHandle {
            task: tokio::spawn(call.run(request, sink)),
            cancel,
        }
    }
}

/// One in-progress verification call.
struct VerificationCall {
    relay: Arc<dyn Relay>,
    config: PollConfig,
    cancel: CancellationToken,
}

impl VerificationCall {
    async fn run(self, request: VerificationRequest, sink: Option<PayloadSink>) -> VerificationResult {
        let call_started = Instant::now();

        if let Err(error) = request.validate() {
            warn!("Rejected verification request: {}", error);
            return VerificationResult::failure(error);
        }

        let created = match self.relay.create_session(&request.to_create_session()).await {
            Ok(created) => created,
            Err(error) => {
                warn!("Session creation failed: {}", error);
                return VerificationResult::failure(creation_failure(error))
                    .with_diagnostics(None, 0, call_started.elapsed());
            }
        };

        let session_id = created.session_id.clone();
        info!(
            "Created session {} for {} ({} claims)",
            session_id,
            request.verifier_name(),
            request.required_claims().len()
        );

        let mut state = PollState::new(&self.config, Instant::now());

        let outcome = if self.cancel.is_cancelled() {
            Err(VerificationError::Cancelled)
        } else {
            match self.emit_payload(&created, sink) {
                Ok(()) => self.poll(&session_id, request.timeout(), &mut state).await,
                Err(error) => Err(error),
            }
        };

        match &outcome {
            Ok(_) => info!("Session {} completed", session_id),
            Err(error) => info!("Session {} settled: {}", session_id, error),
        }

        let result = match outcome {
            Ok(proof) => VerificationResult::success(proof),
            Err(error) => VerificationResult::failure(error),
        };
        result.with_diagnostics(
            Some(session_id),
            state.status_queries(),
            call_started.elapsed(),
        )
    }

    fn emit_payload(
        &self,
        created: &CreatedSession,
        sink: Option<PayloadSink>,
    ) -> Result<(), VerificationError> {
        if let Some(sink) = sink {
            let payload = created
                .payload_string()
                .map_err(|e| VerificationError::Unexpected(e.to_string()))?;
            sink(payload);
        }
        Ok(())
    }

    /// Poll until the session settles, the timeout passes or the call is cancelled.
    async fn poll(
        &self,
        session_id: &str,
        timeout: Duration,
        state: &mut PollState,
    ) -> Result<Value, VerificationError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(VerificationError::Cancelled);
            }
            if state.is_timed_out(timeout) {
                return Err(VerificationError::TimedOut);
            }

            state.record_query();
            let response = self.relay.session_status(session_id).await;

            // A response that lands after cancellation is dropped.
            if self.cancel.is_cancelled() {
                debug!("Discarding status of cancelled session {}", session_id);
                return Err(VerificationError::Cancelled);
            }

            match response {
                Ok(session) => {
                    state.record_success();
                    match session.status {
                        SessionStatus::Completed => {
                            return Ok(session.proof.unwrap_or(Value::Null));
                        }
                        SessionStatus::Expired => return Err(VerificationError::SessionExpired),
                        SessionStatus::Revoked => return Err(VerificationError::SessionRevoked),
                        SessionStatus::Pending | SessionStatus::Unknown => {
                            debug!("Session {} is {}", session_id, session.status);
                        }
                    }
                }
                Err(RelayError::NotFound) => return Err(VerificationError::SessionNotFound),
                Err(error) if error.is_transient() => {
                    if state.record_failure() {
                        warn!(
                            "Giving up on session {} after {} consecutive failures: {}",
                            session_id,
                            state.consecutive_failures(),
                            error
                        );
                        return Err(VerificationError::NetworkExhausted);
                    }
                    warn!(
                        "Status query for session {} failed ({}/{}): {}",
                        session_id,
                        state.consecutive_failures(),
                        self.config.max_consecutive_failures,
                        error
                    );
                }
                Err(error) => return Err(VerificationError::Unexpected(error.to_string())),
            }

            let delay = state.advance_delay();
            debug!("Next poll of session {} in {:?}", session_id, delay);

            tokio::select! {
                _ = self.cancel.cancelled() => return Err(VerificationError::Cancelled),
                _ = sleep(delay) => {}
            }
        }
    }
}

/// Map a creation-phase relay error onto the failure taxonomy.
fn creation_failure(error: RelayError) -> VerificationError {
    match error {
        RelayError::Status { message, .. } => VerificationError::CreationRejected(
            message.unwrap_or_else(|| CREATE_SESSION_FAILED.to_string()),
        ),
        other => VerificationError::Unexpected(other.to_string()),
    }
}

/// Handle to a running verification call.
///
/// Awaiting the handle yields the call's [`VerificationResult`]. Dropping it
/// cancels the call.
#[derive(Debug)]
pub struct VerificationHandle {
    task: JoinHandle<VerificationResult>,
    cancel: CancellationToken,
}

impl VerificationHandle {
    /// Request cancellation. Takes effect at the next poll boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A cloneable trigger that cancels this call from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.cancel.clone())
    }

    /// Whether the call has settled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Future for VerificationHandle {
    type Output = VerificationResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().task).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(error)) => {
                Poll::Ready(VerificationResult::failure(VerificationError::Unexpected(
                    join_error_message(error),
                )))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for VerificationHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn join_error_message(error: JoinError) -> String {
    if !error.is_panic() {
        return "Verification task was aborted".to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Verification task panicked".to_string()
    }
}

/// Cancels a verification call. Cheap to clone and safe to use from any task.
#[derive(Debug, Clone)]
pub struct CancelHandle(CancellationToken);

impl CancelHandle {
    /// Request cancellation. Calling this after the call settled does nothing.
    pub fn cancel(&self) {
        self.0.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}
