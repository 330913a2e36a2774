#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use zeroauth_verifier::error::Result;
use zeroauth_verifier::{
    CreateSessionRequest, CreatedSession, Relay, RelayError, SessionState, SessionStatus,
    VerificationRequest,
};

pub const SESSION_ID: &str = "sess-42";

/// One scripted answer to a status query.
#[derive(Debug, Clone)]
pub enum Step {
    Status(SessionStatus),
    Completed(Value),
    NotFound,
    ServerError(u16),
    Garbage,
}

/// In-process relay that replays a script of status answers.
///
/// Once the script runs out every query answers `PENDING`.
#[derive(Clone)]
pub struct ScriptedRelay {
    inner: Arc<Inner>,
}

struct Inner {
    creation: Mutex<Option<RelayError>>,
    creation_latency: Duration,
    status_latency: Duration,
    steps: Mutex<VecDeque<Step>>,
    creates: AtomicUsize,
    poll_times: Mutex<Vec<Instant>>,
}

impl ScriptedRelay {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self::build(steps, None, Duration::ZERO, Duration::ZERO)
    }

    pub fn rejecting(error: RelayError) -> Self {
        Self::build([], Some(error), Duration::ZERO, Duration::ZERO)
    }

    pub fn with_latency(
        steps: impl IntoIterator<Item = Step>,
        creation_latency: Duration,
        status_latency: Duration,
    ) -> Self {
        Self::build(steps, None, creation_latency, status_latency)
    }

    fn build(
        steps: impl IntoIterator<Item = Step>,
        creation: Option<RelayError>,
        creation_latency: Duration,
        status_latency: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                creation: Mutex::new(creation),
                creation_latency,
                status_latency,
                steps: Mutex::new(steps.into_iter().collect()),
                creates: AtomicUsize::new(0),
                poll_times: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn creates(&self) -> usize {
        self.inner.creates.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.inner.poll_times.lock().unwrap().len()
    }

    /// Instants at which status queries arrived.
    pub fn poll_times(&self) -> Vec<Instant> {
        self.inner.poll_times.lock().unwrap().clone()
    }

    /// Gaps between consecutive status queries.
    pub fn poll_gaps(&self) -> Vec<Duration> {
        self.poll_times()
            .windows(2)
            .map(|w| w[1].duration_since(w[0]))
            .collect()
    }
}

#[async_trait]
impl Relay for ScriptedRelay {
    async fn create_session(&self, _request: &CreateSessionRequest) -> Result<CreatedSession> {
        self.inner.creates.fetch_add(1, Ordering::SeqCst);
        if !self.inner.creation_latency.is_zero() {
            tokio::time::sleep(self.inner.creation_latency).await;
        }
        if let Some(error) = self.inner.creation.lock().unwrap().take() {
            return Err(error);
        }
        Ok(CreatedSession {
            session_id: SESSION_ID.to_string(),
            qr_payload: qr_payload(),
        })
    }

    async fn session_status(&self, session_id: &str) -> Result<SessionState> {
        assert_eq!(session_id, SESSION_ID);
        self.inner.poll_times.lock().unwrap().push(Instant::now());
        if !self.inner.status_latency.is_zero() {
            tokio::time::sleep(self.inner.status_latency).await;
        }

        let step = self
            .inner
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Status(SessionStatus::Pending));

        match step {
            Step::Status(status) => Ok(SessionState { status, proof: None }),
            Step::Completed(proof) => Ok(SessionState {
                status: SessionStatus::Completed,
                proof: Some(proof),
            }),
            Step::NotFound => Err(RelayError::NotFound),
            Step::ServerError(code) => Err(RelayError::Status { code, message: None }),
            Step::Garbage => Err(RelayError::Decode("expected value at line 1 column 1".into())),
        }
    }
}

pub fn qr_payload() -> Value {
    json!({
        "session_id": SESSION_ID,
        "relay": "http://localhost:3000",
        "claims": ["birth_year"]
    })
}

pub fn age_request() -> VerificationRequest {
    VerificationRequest::new("Zero Demo App", ["birth_year"])
}

pub fn pending(n: usize) -> impl Iterator<Item = Step> {
    std::iter::repeat(Step::Status(SessionStatus::Pending)).take(n)
}

pub fn failures(n: usize) -> impl Iterator<Item = Step> {
    std::iter::repeat(Step::ServerError(503)).take(n)
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
