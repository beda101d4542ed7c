#![deny(clippy::all)]

use async_trait::async_trait;
use serde_json::Value;
use shared::Result;

/// Raw answer from the Brewfather API: status code plus the parsed JSON body
#[derive(Clone, Debug)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Port for the upstream brewing-tracker API.
///
/// `path` is a list of unencoded path segments, e.g. `["v1", "batches"]`.
/// Implementations resolve credentials before any network I/O and parse the
/// body as JSON regardless of the status code.
#[async_trait]
pub trait UpstreamApi: Send + Sync + 'static {
    async fn get(&self, path: &[&str], query: &[(&str, &str)]) -> Result<UpstreamResponse>;
}
