//! # Verify Subcommand
//!
//! Hashes a file and checks the ledger for a registration, printing the
//! outcome as JSON. The process exits non-zero when the content is not
//! registered, so scripts can branch on the answer.

use std::path::PathBuf;

use clap::Args;

use firstmark_flow::{Registrar, VerifyOutcome};

use crate::backend::BackendArgs;

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// File whose content to check.
    pub file: PathBuf,

    #[command(flatten)]
    pub backend: BackendArgs,
}

pub async fn run(args: VerifyArgs) -> anyhow::Result<()> {
    let registrar = Registrar::new(args.backend.storage()?, args.backend.ledger()?);

    let outcome = registrar.verify_file(&args.file).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    match outcome {
        VerifyOutcome::Registered(_) => Ok(()),
        VerifyOutcome::NotRegistered => {
            anyhow::bail!("content is not registered")
        }
    }
}
