use crate::api::{first_value, ApiError, QueryPairs};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use brewdash::{ReadingsEnvelope, Served};

const CONTEXT: &str = "Failed to fetch readings";

/// GET /api/readings?batchId=..
pub async fn get_readings(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<Served<ReadingsEnvelope>>, ApiError> {
    let batch_id = first_value(&params, "batchId");

    state
        .readings
        .get_readings(batch_id.as_deref())
        .await
        .map(Json)
        .map_err(|e| ApiError::new(CONTEXT, e))
}
