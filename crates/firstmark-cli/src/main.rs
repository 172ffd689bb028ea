//! # firstmark CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Firstmark — first-registration proofs for content.
///
/// Hashes content, registers the first claim to it on an append-only
/// ledger, and verifies later copies byte for byte.
#[derive(Parser, Debug)]
#[command(name = "firstmark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate a signing keypair and write its seed to a key file.
    Keygen(firstmark_cli::keygen::KeygenArgs),
    /// Register a file's content under a key-file identity.
    Register(firstmark_cli::register::RegisterArgs),
    /// Check whether a file's exact content is registered.
    Verify(firstmark_cli::verify::VerifyArgs),
    /// Run the HTTP API server.
    Serve(firstmark_cli::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen(args) => firstmark_cli::keygen::run(args),
        Commands::Register(args) => firstmark_cli::register::run(args).await,
        Commands::Verify(args) => firstmark_cli::verify::run(args).await,
        Commands::Serve(args) => firstmark_cli::serve::run(args).await,
    }
}
