//! ZeroAuth CLI
//!
//! Terminal front-end for relay-brokered credential verification.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "zeroauth")]
#[command(author = "ZeroAuth Contributors")]
#[command(version = "0.1.0")]
#[command(about = "ZeroAuth - request and await credential verifications through a relay", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a verification session and wait for the holder's proof
    Verify(commands::verify::VerifyArgs),

    /// Query the status of an existing session once
    Status(commands::status::StatusArgs),

    /// Show the polling schedule used while waiting for a session
    Schedule,
}

/// Install the tracing subscriber. `RUST_LOG` overrides the default `warn` level.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let exit_code = match cli.command {
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Schedule => commands::schedule::run(),
    };

    std::process::exit(exit_code);
}
