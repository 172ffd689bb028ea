//! # Serve Subcommand
//!
//! Runs the HTTP API server over the selected backends. The service
//! signer claims every upload made through the HTTP surface; it comes
//! from a key file, or is generated fresh for the process when none is
//! given.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use firstmark_api::{router, AppState};
use firstmark_crypto::SigningKeypair;

use crate::backend::BackendArgs;
use crate::register::load_keypair;

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Key file for the service signer. A fresh keypair is generated
    /// when omitted.
    #[arg(long)]
    pub key: Option<PathBuf>,

    #[command(flatten)]
    pub backend: BackendArgs,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let signer = match &args.key {
        Some(path) => load_keypair(path)?,
        None => {
            let keypair = SigningKeypair::generate();
            info!(identity = %keypair.identity(), "generated ephemeral service signer");
            keypair
        }
    };

    let state = AppState::new(args.backend.storage()?, args.backend.ledger()?, signer);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(addr = %args.listen, "listening");

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
