use std::sync::Arc;
use std::time::Duration;

use estate_core::clock::Clock;
use estate_core::signing::RequestSigner;
use estate_db::Ledger;
use estate_storage::{ImageLifecycle, ObjectStore};

use crate::config::ServerConfig;
use crate::engine::lease::{InProcessGuard, LeaseManager};

/// Shared application state available to all handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Row store for users, leads and properties.
    pub ledger: Arc<dyn Ledger>,
    /// Signs browser upload URLs.
    pub signer: Arc<RequestSigner>,
    /// Promotes and archives property images.
    pub images: Arc<ImageLifecycle>,
    pub leases: Arc<LeaseManager>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        ledger: Arc<dyn Ledger>,
        store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let signer = Arc::new(build_signer(&config));
        let leases = LeaseManager::new(
            Arc::clone(&ledger),
            Arc::new(InProcessGuard::new()),
            Arc::clone(&clock),
            Duration::from_secs(config.lease_wait_secs),
        );

        Self {
            config: Arc::new(config),
            ledger,
            signer,
            images: Arc::new(ImageLifecycle::new(store)),
            leases: Arc::new(leases),
            clock,
        }
    }
}

/// Request signer for the configured bucket.
pub fn build_signer(config: &ServerConfig) -> RequestSigner {
    let storage = &config.storage;
    let signer = RequestSigner::new(
        &storage.bucket,
        &storage.region,
        storage.credentials.clone(),
    );
    match &storage.endpoint {
        Some(endpoint) => signer.with_endpoint(endpoint),
        None => signer,
    }
}
