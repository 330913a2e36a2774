//! Verify command implementation.

use clap::Args;
use serde::Serialize;
use std::time::Duration;

use zeroauth_verifier::{SessionVerifier, VerificationRequest, VerificationResult};

use crate::config::{resolve_relay_url, DEFAULT_VERIFIER_NAME};
use crate::output;

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Claim the holder must prove (repeatable, e.g. --claim birth_year)
    #[arg(short, long = "claim", value_name = "CLAIM", required = true)]
    pub claims: Vec<String>,

    /// Name shown to the holder on their device
    #[arg(long, default_value = DEFAULT_VERIFIER_NAME)]
    pub verifier_name: String,

    /// Credential type label (defaults to "Age Verification")
    #[arg(long)]
    pub credential_type: Option<String>,

    /// Give up after this many seconds
    #[arg(short, long, default_value = "120")]
    pub timeout: u64,

    /// Relay base URL (overrides ZEROAUTH_RELAY_URL)
    #[arg(long)]
    pub relay_url: Option<String>,

    /// Output as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// JSON line emitted as soon as the payload is ready.
#[derive(Serialize)]
struct PayloadLine<'a> {
    event: &'static str,
    qr_payload: &'a str,
}

/// JSON line emitted when the call settles.
#[derive(Serialize)]
struct ResultLine<'a> {
    event: &'static str,
    #[serde(flatten)]
    result: &'a VerificationResult,
}

/// Run the verify command.
pub async fn run(args: VerifyArgs) -> i32 {
    if args.timeout == 0 {
        output::error("Timeout must be at least 1 second.");
        return 1;
    }

    let relay_url = resolve_relay_url(args.relay_url.as_deref());

    let verifier = match SessionVerifier::new(&relay_url) {
        Ok(v) => v,
        Err(e) => {
            output::error(&format!("Cannot use relay '{}': {}", relay_url, e));
            output::hint("Pass --relay-url or set ZEROAUTH_RELAY_URL.");
            return 1;
        }
    };

    let mut request = VerificationRequest::new(args.verifier_name.clone(), args.claims.clone())
        .with_timeout(Duration::from_secs(args.timeout));
    if let Some(credential_type) = &args.credential_type {
        request = request.with_credential_type(credential_type.clone());
    }

    if !args.json {
        output::info(&format!(
            "Requesting {} from {} ({})...",
            args.claims.join(", "),
            relay_url,
            request.credential_type()
        ));
    }

    let json = args.json;
    let handle = verifier.verify_with_payload(request, move |payload| {
        if json {
            print_json(&PayloadLine {
                event: "payload",
                qr_payload: &payload,
            });
        } else {
            output::payload(&payload);
            output::info("Waiting for the holder to respond (Ctrl-C to cancel)...");
        }
    });

    let cancel = handle.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            output::warn("Cancelling verification...");
            cancel.cancel();
        }
    });

    let result = handle.await;

    if args.json {
        print_json(&ResultLine {
            event: "result",
            result: &result,
        });
    } else {
        output::verification_result(&result);
    }

    if result.is_success() { 0 } else { 1 }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => output::error(&format!("Failed to encode output: {}", e)),
    }
}
