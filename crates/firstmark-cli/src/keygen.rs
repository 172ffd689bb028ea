//! # Keygen Subcommand
//!
//! Generates an Ed25519 signing keypair and writes the seed, hex
//! encoded, to a key file. The public identity goes to stdout; the
//! private seed only ever touches the key file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use firstmark_crypto::SigningKeypair;

/// Arguments for the keygen subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Path to write the key file to. Refuses to overwrite.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: KeygenArgs) -> anyhow::Result<()> {
    if args.out.exists() {
        anyhow::bail!("refusing to overwrite existing key file {}", args.out.display());
    }

    let keypair = SigningKeypair::generate();
    std::fs::write(&args.out, keypair.to_seed_hex())
        .with_context(|| format!("failed to write key file {}", args.out.display()))?;

    println!("{}", keypair.identity());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keygen_writes_usable_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uploader.key");

        run(KeygenArgs { out: path.clone() }).unwrap();

        let seed_hex = std::fs::read_to_string(&path).unwrap();
        let keypair = SigningKeypair::from_seed_hex(seed_hex.trim()).unwrap();
        assert!(!keypair.identity().is_zero());
    }

    #[test]
    fn test_keygen_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uploader.key");
        std::fs::write(&path, "existing").unwrap();

        assert!(run(KeygenArgs { out: path }).is_err());
    }
}
