use brewdash::{BatchService, BrewfatherClient, ReadingsService, UpstreamApi};
use shared::config::{Config, CredentialSource};
use std::path::PathBuf;
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub batches: Arc<BatchService>,
    pub readings: Arc<ReadingsService>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    /// State backed by the real Brewfather API, with credentials read from the
    /// environment on every upstream call
    pub fn new(config: &Config) -> shared::Result<Self> {
        let client = BrewfatherClient::from_config(config, CredentialSource::Environment)?;
        Ok(Self::with_upstream(Arc::new(client), config))
    }

    pub fn with_upstream(upstream: Arc<dyn UpstreamApi>, config: &Config) -> Self {
        tracing::info!(
            "Cache TTLs: batches={:?}, readings={:?} (max {} batches)",
            config.batches_ttl,
            config.readings_ttl,
            config.readings_max_entries
        );

        Self {
            batches: Arc::new(BatchService::new(upstream.clone(), config.batches_ttl)),
            readings: Arc::new(ReadingsService::new(
                upstream,
                config.readings_ttl,
                config.readings_max_entries,
            )),
            static_dir: Arc::new(config.static_dir.clone()),
        }
    }
}
