use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use shared::{Error, Result};
use std::sync::Arc;
use storage_engine::Cached;

pub const DEFAULT_STATUS: &str = "Fermenting";
pub const DEFAULT_INCLUDE: &str = "estimatedFg,estimatedOg,measuredOg,temp";

/// Query parameters forwarded to `GET /v1/batches`
#[derive(Clone, Debug, Default)]
pub struct BatchQuery {
    pub status: Option<String>,
    pub include: Option<String>,
}

impl BatchQuery {
    pub fn status(&self) -> &str {
        non_empty(&self.status).unwrap_or(DEFAULT_STATUS)
    }

    pub fn include(&self) -> &str {
        non_empty(&self.include).unwrap_or(DEFAULT_INCLUDE)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// === Projections ===

/// Reduced view of a batch served to the dashboard.
///
/// Values are copied from the upstream record whatever their JSON type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub batch_no: Option<Value>,
    pub status: Option<Value>,
    pub brew_date: Option<Value>,
    pub estimated_og: Option<Value>,
    pub estimated_fg: Option<Value>,
    pub measured_og: Option<Value>,
    pub measured_fg: Option<Value>,
    pub temp: Option<Value>,
    pub recipe: Option<RecipeSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub name: Option<Value>,
    pub style: Option<Value>,
}

fn field(record: &Value, key: &str) -> Option<Value> {
    record.get(key).cloned()
}

/// `null`, `false`, `0` and `""` count as absent
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl RecipeSummary {
    fn project(recipe: &Value) -> Self {
        Self {
            name: field(recipe, "name"),
            // A style that is not an object has no name
            style: recipe
                .get("style")
                .filter(|style| is_present(style))
                .and_then(|style| field(style, "name")),
        }
    }
}

impl BatchSummary {
    /// Non-object records project to all-null summaries
    pub fn project(batch: &Value) -> Self {
        Self {
            id: field(batch, "_id"),
            name: field(batch, "name"),
            batch_no: field(batch, "batchNo"),
            status: field(batch, "status"),
            brew_date: field(batch, "brewDate"),
            estimated_og: field(batch, "estimatedOg"),
            estimated_fg: field(batch, "estimatedFg"),
            measured_og: field(batch, "measuredOg"),
            measured_fg: field(batch, "measuredFg"),
            temp: field(batch, "temp"),
            recipe: batch
                .get("recipe")
                .filter(|recipe| is_present(recipe))
                .map(RecipeSummary::project),
        }
    }
}

/// Project a `GET /v1/batches` body into batch summaries.
///
/// The body must be an array; its elements are never rejected.
pub fn project_batches(body: Value) -> Result<Vec<BatchSummary>> {
    let Value::Array(batches) = body else {
        return Err(Error::InvalidResponse("expected an array of batches".into()));
    };

    Ok(batches.iter().map(BatchSummary::project).collect())
}

// === Envelopes ===

fn serialize_iso_millis<S: Serializer>(
    at: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchesEnvelope {
    pub batches: Vec<BatchSummary>,
    pub count: usize,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub fetched_at: DateTime<Utc>,
}

impl BatchesEnvelope {
    pub fn new(batches: Vec<BatchSummary>) -> Self {
        Self {
            count: batches.len(),
            batches,
            fetched_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingsEnvelope {
    pub readings: Vec<Value>,
    pub count: usize,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub fetched_at: DateTime<Utc>,
}

impl ReadingsEnvelope {
    pub fn new(readings: Vec<Value>) -> Self {
        Self {
            count: readings.len(),
            readings,
            fetched_at: Utc::now(),
        }
    }
}

/// An envelope annotated with its cache status
#[derive(Clone, Debug, Serialize)]
pub struct Served<T> {
    #[serde(flatten)]
    pub data: Arc<T>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age_minutes: Option<i64>,
}

impl<T> From<Cached<Arc<T>>> for Served<T> {
    fn from(cached: Cached<Arc<T>>) -> Self {
        let cache_age_minutes = cached.hit.then(|| cached.entry.age_minutes());
        Self {
            data: cached.entry.value,
            cached: cached.hit,
            cache_age_minutes,
        }
    }
}
