//! # Application State
//!
//! Shared state for the Axum application: the registrar over its
//! backend seams, plus the service signer that claims uploads made
//! through the HTTP surface.

use std::sync::Arc;

use firstmark_crypto::SigningKeypair;
use firstmark_flow::Registrar;
use firstmark_ledger::Ledger;
use firstmark_storage::StorageClient;

/// A registrar over dynamically-chosen backends. Which storage and
/// ledger sit behind it is decided at startup, not compile time.
pub type SharedRegistrar = Registrar<Arc<dyn StorageClient>, Arc<dyn Ledger>>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    registrar: Arc<SharedRegistrar>,
    signer: Arc<SigningKeypair>,
}

impl AppState {
    /// Assemble the state from backends and the service signer.
    pub fn new(
        storage: Arc<dyn StorageClient>,
        ledger: Arc<dyn Ledger>,
        signer: SigningKeypair,
    ) -> Self {
        Self {
            registrar: Arc::new(Registrar::new(storage, ledger)),
            signer: Arc::new(signer),
        }
    }

    /// The registrar all handlers go through.
    pub fn registrar(&self) -> &SharedRegistrar {
        &self.registrar
    }

    /// The signer that claims uploads on behalf of this service.
    pub fn signer(&self) -> &SigningKeypair {
        &self.signer
    }
}
