//! Schedule command implementation.

use colored::Colorize;
use tokio::time::Instant;

use zeroauth_verifier::policy::{PollConfig, PollState};
use zeroauth_verifier::request::DEFAULT_TIMEOUT;

use crate::output;

/// Rows shown in the backoff table.
const ROWS: usize = 8;

/// Run the schedule command.
pub fn run() -> i32 {
    let config = PollConfig::default();

    output::header("Polling Schedule");
    output::kv("Initial delay", &format!("{:?}", config.initial_delay));
    output::kv("Backoff factor", &format!("x{}", config.backoff_factor));
    output::kv("Max delay", &format!("{:?}", config.max_delay));
    output::kv(
        "Failure budget",
        &format!("{} consecutive", config.max_consecutive_failures),
    );
    output::kv("Default timeout", &format!("{:?}", DEFAULT_TIMEOUT));

    println!();
    println!("{:<8} {:<12} {}", "Poll".bold(), "Wait".bold(), "Cumulative".bold());
    println!("{}", "─".repeat(36).dimmed());

    let mut state = PollState::new(&config, Instant::now());
    let mut cumulative = std::time::Duration::ZERO;
    println!("{:<8} {:<12} {:?}", 1, "-", cumulative);
    for poll in 2..=ROWS {
        let wait = state.advance_delay();
        cumulative += wait;
        println!("{:<8} {:<12} {:?}", poll, format!("{:?}", wait).green(), cumulative);
    }

    println!();
    output::hint("A 404 from the relay stops polling at once; other errors are retried.");

    0
}
