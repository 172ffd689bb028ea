//! # Backend Selection
//!
//! Shared flags choosing which storage and ledger a command runs
//! against. Defaults are the in-process backends, so every command
//! works out of the box; production runs point at an IPFS node and a
//! registry contract.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, ValueEnum};

use firstmark_ledger::{EvmLedger, EvmLedgerConfig, Ledger, MemoryLedger};
use firstmark_storage::{IpfsClient, IpfsConfig, MemoryStorage, StorageClient};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StorageKind {
    /// In-process map. Contents are lost when the process exits.
    Memory,
    /// An IPFS node reached over the Kubo RPC API.
    Ipfs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LedgerKind {
    /// In-process ledger. Records are lost when the process exits.
    Memory,
    /// A registry contract on an EVM chain, reached over JSON-RPC.
    Evm,
}

/// Backend flags shared by `register`, `verify`, and `serve`. Each
/// flag falls back to a `FIRSTMARK_*` environment variable, so a
/// deployment can configure the backends once and pass no flags.
#[derive(Args, Debug)]
pub struct BackendArgs {
    /// Storage backend for content handoff.
    #[arg(long, value_enum, default_value = "memory", env = "FIRSTMARK_STORAGE")]
    pub storage: StorageKind,

    /// Kubo RPC API endpoint (with `--storage ipfs`).
    #[arg(long, default_value = "http://127.0.0.1:5001", env = "FIRSTMARK_IPFS_API")]
    pub ipfs_api: String,

    /// Ledger backend for registration records.
    #[arg(long, value_enum, default_value = "memory", env = "FIRSTMARK_LEDGER")]
    pub ledger: LedgerKind,

    /// EVM JSON-RPC endpoint (required with `--ledger evm`).
    #[arg(long, env = "FIRSTMARK_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Registry contract address (required with `--ledger evm`).
    #[arg(long, env = "FIRSTMARK_CONTRACT")]
    pub contract: Option<String>,

    /// Sender address for commit transactions (required with `--ledger evm`).
    #[arg(long, env = "FIRSTMARK_FROM_ADDRESS")]
    pub from_address: Option<String>,
}

impl BackendArgs {
    /// Construct the selected storage client.
    pub fn storage(&self) -> anyhow::Result<Arc<dyn StorageClient>> {
        Ok(match self.storage {
            StorageKind::Memory => Arc::new(MemoryStorage::new()),
            StorageKind::Ipfs => Arc::new(
                IpfsClient::new(IpfsConfig::new(&self.ipfs_api))
                    .context("failed to build IPFS client")?,
            ),
        })
    }

    /// Construct the selected ledger.
    pub fn ledger(&self) -> anyhow::Result<Arc<dyn Ledger>> {
        Ok(match self.ledger {
            LedgerKind::Memory => Arc::new(MemoryLedger::new()),
            LedgerKind::Evm => {
                let rpc_url = self
                    .rpc_url
                    .as_deref()
                    .context("--rpc-url is required with --ledger evm")?;
                let contract = self
                    .contract
                    .as_deref()
                    .context("--contract is required with --ledger evm")?;
                let from_address = self
                    .from_address
                    .as_deref()
                    .context("--from-address is required with --ledger evm")?;
                let config = EvmLedgerConfig::new(rpc_url, contract, from_address);
                Arc::new(EvmLedger::new(config).context("failed to build EVM ledger")?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        backend: BackendArgs,
    }

    #[test]
    fn test_ipfs_api_from_environment_with_flag_precedence() {
        std::env::set_var("FIRSTMARK_IPFS_API", "http://ipfs.internal:5001");

        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.backend.ipfs_api, "http://ipfs.internal:5001");

        // An explicit flag still wins over the environment.
        let cli = TestCli::parse_from(["test", "--ipfs-api", "http://127.0.0.1:5001"]);
        assert_eq!(cli.backend.ipfs_api, "http://127.0.0.1:5001");

        std::env::remove_var("FIRSTMARK_IPFS_API");
    }

    #[test]
    fn test_ledger_selection_from_environment() {
        std::env::set_var("FIRSTMARK_LEDGER", "evm");
        std::env::set_var("FIRSTMARK_RPC_URL", "https://rpc.example.com");

        let cli = TestCli::parse_from(["test"]);
        assert!(matches!(cli.backend.ledger, LedgerKind::Evm));
        assert_eq!(
            cli.backend.rpc_url.as_deref(),
            Some("https://rpc.example.com")
        );

        std::env::remove_var("FIRSTMARK_LEDGER");
        std::env::remove_var("FIRSTMARK_RPC_URL");
    }

    #[test]
    fn test_defaults_without_flags_or_environment() {
        // Only variables no other test touches, so parallel test
        // threads cannot interfere.
        let cli = TestCli::parse_from(["test"]);
        assert!(matches!(cli.backend.storage, StorageKind::Memory));
        assert!(cli.backend.contract.is_none());
        assert!(cli.backend.from_address.is_none());
    }
}
