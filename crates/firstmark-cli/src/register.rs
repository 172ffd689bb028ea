//! # Register Subcommand
//!
//! Runs the full upload flow for a file under the identity in a key
//! file, and prints the committed record as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use firstmark_crypto::SigningKeypair;
use firstmark_flow::Registrar;

use crate::backend::BackendArgs;

/// Arguments for the register subcommand.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// File whose content to register.
    pub file: PathBuf,

    /// Key file holding the uploader's seed, as written by `keygen`.
    #[arg(long)]
    pub key: PathBuf,

    #[command(flatten)]
    pub backend: BackendArgs,
}

pub async fn run(args: RegisterArgs) -> anyhow::Result<()> {
    let keypair = load_keypair(&args.key)?;
    let registrar = Registrar::new(args.backend.storage()?, args.backend.ledger()?);

    let record = registrar.register_file(&args.file, &keypair).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Load a signing keypair from a `keygen`-style key file.
pub(crate) fn load_keypair(path: &PathBuf) -> anyhow::Result<SigningKeypair> {
    let seed_hex = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read key file {}", path.display()))?;
    SigningKeypair::from_seed_hex(seed_hex.trim())
        .with_context(|| format!("key file {} is not a valid seed", path.display()))
}
