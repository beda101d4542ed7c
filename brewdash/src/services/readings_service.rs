use crate::domain::{ReadingsEnvelope, Served};
use crate::ports::UpstreamApi;
use serde_json::Value;
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use storage_engine::TtlCache;
use tracing::{debug, info};

/// Fetch-and-cache for sensor readings, one cache entry per batch id
pub struct ReadingsService {
    upstream: Arc<dyn UpstreamApi>,
    cache: TtlCache<String, Arc<ReadingsEnvelope>>,
}

impl ReadingsService {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_MAX_ENTRIES: u64 = 1024;

    pub fn new(upstream: Arc<dyn UpstreamApi>, ttl: Duration, max_entries: u64) -> Self {
        Self {
            upstream,
            cache: TtlCache::new_bounded("readings", max_entries, ttl),
        }
    }

    /// `batch_id` is validated before the cache or upstream is touched
    pub async fn get_readings(&self, batch_id: Option<&str>) -> Result<Served<ReadingsEnvelope>> {
        let batch_id = batch_id
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingParameter("batchId"))?;

        let cached = self
            .cache
            .get_or_try_fetch(batch_id.to_string(), self.fetch(batch_id))
            .await
            .map_err(Arc::unwrap_or_clone)?;

        if cached.hit {
            info!(batch_id, "Returning cached readings");
        }

        Ok(cached.into())
    }

    async fn fetch(&self, batch_id: &str) -> Result<Arc<ReadingsEnvelope>> {
        info!(batch_id, "Fetching readings from Brewfather API");

        let response = self
            .upstream
            .get(&["v1", "batches", batch_id, "readings"], &[])
            .await?;

        if !response.is_ok() {
            return Err(Error::UpstreamHttp(response.status));
        }

        let Value::Array(readings) = response.body else {
            return Err(Error::InvalidResponse("expected an array of readings".into()));
        };

        if let Some(Value::Object(sample)) = readings.first() {
            let fields: Vec<&String> = sample.keys().collect();
            debug!(batch_id, ?fields, "Reading sample fields");
        }

        info!(batch_id, "Fetched {} readings", readings.len());

        Ok(Arc::new(ReadingsEnvelope::new(readings)))
    }
}

impl std::fmt::Debug for ReadingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingsService")
            .field("cache", &self.cache)
            .finish()
    }
}
