//! Relay client.
//!
//! [`Relay`] is the seam between the session state machine and the remote
//! relay. [`HttpRelay`] speaks the relay's HTTP contract with `reqwest`.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{RelayError, Result};
use crate::policy::DEFAULT_REQUEST_TIMEOUT;
use crate::session::{CreateSessionRequest, CreatedSession, ErrorBody, SessionState};

/// Operations the verifier needs from a relay.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Ask the relay to open a new verification session.
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<CreatedSession>;

    /// Fetch the current state of a session.
    ///
    /// Returns [`RelayError::NotFound`] when the relay does not know the session.
    async fn session_status(&self, session_id: &str) -> Result<SessionState>;
}

/// HTTP implementation of [`Relay`].
///
/// # Example
///
/// ```rust,no_run
/// use zeroauth_verifier::{HttpRelay, Relay};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let relay = HttpRelay::new("http://localhost:3000/")?;
///     assert_eq!(relay.base_url(), "http://localhost:3000");
///
///     let state = relay.session_status("3f2a").await?;
///     println!("Session is {}", state.status);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpRelay {
    base_url: String,
    base: Url,
    client: reqwest::Client,
}

impl HttpRelay {
    /// Create a client for the relay at `relay_url`.
    ///
    /// A single trailing slash is stripped from the URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if the URL is not an absolute http(s) URL.
    pub fn new(relay_url: &str) -> Result<Self> {
        Self::with_timeout(relay_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose individual requests time out after `timeout`.
    pub fn with_timeout(relay_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = relay_url.strip_suffix('/').unwrap_or(relay_url).to_string();

        let base = Url::parse(&base_url)
            .map_err(|e| RelayError::InvalidUrl(format!("{}: {}", relay_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(RelayError::InvalidUrl(format!(
                "{}: expected an http(s) URL",
                relay_url
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            base,
            client,
        })
    }

    /// The relay URL with the trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sessions_url(&self, session_id: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RelayError::InvalidUrl(self.base_url.clone()))?;
            segments.pop_if_empty().extend(["api", "v1", "sessions"]);
            if let Some(id) = session_id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<CreatedSession> {
        let url = self.sessions_url(None)?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        decode_body(response).await
    }

    async fn session_status(&self, session_id: &str) -> Result<SessionState> {
        let url = self.sessions_url(Some(session_id))?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(RelayError::NotFound);
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        decode_body(response).await
    }
}

async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| RelayError::Decode(e.to_string()))
}

/// Build a `Status` error, keeping the relay's `error` field when the body has one.
async fn status_error(status: StatusCode, response: reqwest::Response) -> RelayError {
    let message = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.error),
        Err(_) => None,
    };

    RelayError::Status {
        code: status.as_u16(),
        message,
    }
}
