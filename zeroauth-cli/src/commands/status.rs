//! Status command implementation.

use clap::Args;
use serde::Serialize;

use zeroauth_verifier::{HttpRelay, Relay, RelayError, SessionState};

use crate::config::resolve_relay_url;
use crate::output;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Session identifier returned by the relay
    pub session_id: String,

    /// Relay base URL (overrides ZEROAUTH_RELAY_URL)
    #[arg(long)]
    pub relay_url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output structure.
#[derive(Serialize)]
struct JsonOutput<'a> {
    success: bool,
    session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a SessionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the status command.
pub async fn run(args: StatusArgs) -> i32 {
    let relay_url = resolve_relay_url(args.relay_url.as_deref());

    let relay = match HttpRelay::new(&relay_url) {
        Ok(r) => r,
        Err(e) => {
            output::error(&format!("Cannot use relay '{}': {}", relay_url, e));
            return 1;
        }
    };

    let outcome = relay.session_status(&args.session_id).await;

    if args.json {
        let (state, error) = match &outcome {
            Ok(state) => (Some(state), None),
            Err(e) => (None, Some(describe(e))),
        };
        let output = JsonOutput {
            success: outcome.is_ok(),
            session_id: &args.session_id,
            state,
            error,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => output::error(&format!("Failed to encode output: {}", e)),
        }
    } else {
        match &outcome {
            Ok(state) => {
                output::header(&format!("Session {}", args.session_id));
                output::kv("Status", &state.status.to_string());
                output::kv("Terminal", if state.status.is_terminal() { "yes" } else { "no" });
                if let Some(proof) = &state.proof {
                    output::kv("Proof", &proof.to_string());
                }
                println!();
            }
            Err(e) => output::error(&describe(e)),
        }
    }

    if outcome.is_ok() { 0 } else { 1 }
}

fn describe(error: &RelayError) -> String {
    match error {
        RelayError::NotFound => "Session not found or expired".to_string(),
        RelayError::Status {
            message: Some(message),
            code,
        } => format!("Relay returned {}: {}", code, message),
        other => other.to_string(),
    }
}
