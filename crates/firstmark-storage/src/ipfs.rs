//! # IPFS Storage Backend (Kubo RPC)
//!
//! Talks to a Kubo node's HTTP RPC API. An upload is two idempotent
//! steps, and both must succeed before `put` returns:
//!
//! 1. `POST /api/v0/add` — add the object, yielding its CID.
//! 2. `POST /api/v0/pin/add?arg=<cid>` — pin it, so the node retains
//!    the object instead of treating it as garbage-collectable cache.
//!
//! Returning after `add` alone would claim durability the node has not
//! promised; the pin is what turns "accepted" into "retained".

use async_trait::async_trait;
use tracing::debug;

use firstmark_core::Locator;

use crate::{StorageClient, StorageError};

/// Configuration for the IPFS storage backend.
#[derive(Debug, Clone)]
pub struct IpfsConfig {
    /// Base URL of the Kubo RPC API (e.g., `http://127.0.0.1:5001`).
    pub api_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl IpfsConfig {
    /// Create a configuration with the default timeout.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: 30,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Kubo RPC storage client.
#[derive(Debug)]
pub struct IpfsClient {
    client: reqwest::Client,
    config: IpfsConfig,
}

impl IpfsClient {
    /// Create a new IPFS client from configuration.
    pub fn new(config: IpfsConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v0/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn add(&self, content: &[u8]) -> Result<String, StorageError> {
        let part = reqwest::multipart::Part::bytes(content.to_vec()).file_name("file");
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(self.endpoint("add"))
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !resp.status().is_success() {
            return Err(StorageError::Unavailable(format!(
                "add returned HTTP {}",
                resp.status()
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(format!("add body not JSON: {e}")))?;
        parse_add_response(&json)
    }

    async fn pin(&self, cid: &str) -> Result<(), StorageError> {
        let resp = self
            .client
            .post(self.endpoint("pin/add"))
            .query(&[("arg", cid)])
            .send()
            .await
            .map_err(map_transport_error)?;

        if !resp.status().is_success() {
            return Err(StorageError::Unavailable(format!(
                "pin/add returned HTTP {}",
                resp.status()
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(format!("pin body not JSON: {e}")))?;
        check_pin_response(&json, cid)
    }
}

#[async_trait]
impl StorageClient for IpfsClient {
    async fn put(&self, content: &[u8]) -> Result<Locator, StorageError> {
        let cid = self.add(content).await?;
        debug!(cid = %cid, bytes = content.len(), "object added, pinning");
        self.pin(&cid).await?;
        debug!(cid = %cid, "object pinned");
        Ok(Locator::new(cid))
    }
}

fn map_transport_error(e: reqwest::Error) -> StorageError {
    if e.is_timeout() {
        StorageError::Unavailable("request timed out".to_string())
    } else {
        StorageError::Unavailable(e.to_string())
    }
}

/// Extract the CID from a Kubo `add` response (`{"Hash": "...", ...}`).
fn parse_add_response(json: &serde_json::Value) -> Result<String, StorageError> {
    json.get("Hash")
        .and_then(|h| h.as_str())
        .filter(|h| !h.is_empty())
        .map(|h| h.to_string())
        .ok_or_else(|| {
            StorageError::InvalidResponse("add response missing 'Hash' field".to_string())
        })
}

/// Confirm a Kubo `pin/add` response (`{"Pins": ["..."]}`) covers the CID.
fn check_pin_response(json: &serde_json::Value, cid: &str) -> Result<(), StorageError> {
    let pinned = json
        .get("Pins")
        .and_then(|p| p.as_array())
        .map(|pins| pins.iter().any(|p| p.as_str() == Some(cid)))
        .unwrap_or(false);
    if pinned {
        Ok(())
    } else {
        Err(StorageError::InvalidResponse(format!(
            "pin/add response does not list {cid}"
        )))
    }
}
