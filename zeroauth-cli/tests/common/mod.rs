#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct TestEnv {
    pub server: MockServer,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// The `zeroauth` binary with a clean environment pointing nowhere.
    pub fn zeroauth(&self) -> Command {
        let mut cmd = Command::cargo_bin("zeroauth").unwrap();
        cmd.env_remove("ZEROAUTH_RELAY_URL");
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    pub fn relay_url(&self) -> String {
        self.server.uri()
    }

    pub async fn mock_session(&self, session_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/sessions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "session_id": session_id,
                "qr_payload": { "session_id": session_id, "nonce": "cli-nonce" }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_creation_error(&self, status: u16, error: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/sessions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": error })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status(&self, session_id: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/sessions/{}", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status_code(&self, session_id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/sessions/{}", session_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }
}

pub fn completed(proof: serde_json::Value) -> serde_json::Value {
    json!({ "status": "COMPLETED", "proof": proof })
}
