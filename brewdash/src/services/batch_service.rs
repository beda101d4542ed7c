use crate::domain::{BatchQuery, BatchesEnvelope, Served, project_batches};
use crate::ports::UpstreamApi;
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use storage_engine::TtlCache;
use tracing::info;

/// Fetch-and-cache for the batch list.
///
/// Holds a single cache slot: the first miss decides which `status` and
/// `include` values populate it, later queries are served from it until it
/// expires.
pub struct BatchService {
    upstream: Arc<dyn UpstreamApi>,
    cache: TtlCache<(), Arc<BatchesEnvelope>>,
}

impl BatchService {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

    pub fn new(upstream: Arc<dyn UpstreamApi>, ttl: Duration) -> Self {
        Self {
            upstream,
            cache: TtlCache::new_unbounded("batches", ttl),
        }
    }

    pub async fn get_batches(&self, query: &BatchQuery) -> Result<Served<BatchesEnvelope>> {
        let cached = self
            .cache
            .get_or_try_fetch((), self.fetch(query))
            .await
            .map_err(Arc::unwrap_or_clone)?;

        if cached.hit {
            info!(
                age_minutes = cached.entry.age_minutes(),
                "Returning cached Brewfather data"
            );
        }

        Ok(cached.into())
    }

    async fn fetch(&self, query: &BatchQuery) -> Result<Arc<BatchesEnvelope>> {
        let status = query.status();
        let include = query.include();

        info!(status, include, "Fetching batches from Brewfather API");

        let response = self
            .upstream
            .get(&["v1", "batches"], &[("status", status), ("include", include)])
            .await?;

        if !response.is_ok() {
            return Err(Error::UpstreamHttp(response.status));
        }

        let batches = project_batches(response.body)?;
        info!("Fetched {} batches", batches.len());

        Ok(Arc::new(BatchesEnvelope::new(batches)))
    }
}

impl std::fmt::Debug for BatchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchService")
            .field("cache", &self.cache)
            .finish()
    }
}
