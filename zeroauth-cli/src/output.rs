//! Terminal output formatting.

use colored::Colorize;

use zeroauth_verifier::VerificationResult;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".cyan(), msg);
}

/// Print a warning message.
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow().bold(), msg.yellow());
}

/// Print a header.
pub fn header(msg: &str) {
    println!("\n{}", msg.white().bold());
    println!("{}", "─".repeat(msg.chars().count()).dimmed());
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    println!("  {} {}", format!("{}:", key).dimmed(), value);
}

/// Print the scannable payload so it can be copied or piped into a QR renderer.
pub fn payload(payload: &str) {
    header("Scan to verify");
    println!("{}", payload);
    println!();
    hint("Render this payload as a QR code for the holder's wallet.");
}

/// Print a settled verification call.
pub fn verification_result(result: &VerificationResult) {
    println!();
    match result.proof() {
        Some(proof) => {
            success(&format!(
                "Verification completed after {} status queries",
                result.status_queries()
            ));
            if let Some(id) = result.session_id() {
                kv("Session", id);
            }
            kv("Total time", &format!("{:.2}s", result.elapsed().as_secs_f64()));
            header("Proof");
            let pretty = serde_json::to_string_pretty(proof).unwrap_or_else(|_| proof.to_string());
            println!("{}", pretty);
        }
        None => {
            error(&format!(
                "Verification failed: {}",
                result.error().unwrap_or_default()
            ));
            if let Some(id) = result.session_id() {
                hint(&format!("Run `zeroauth status {}` to inspect the session.", id));
            }
        }
    }
    println!();
}

/// Print a helpful hint.
pub fn hint(msg: &str) {
    println!("{} {}", "💡".dimmed(), msg.dimmed());
}
