use crate::api::{first_value, ApiError, QueryPairs};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use brewdash::{BatchQuery, BatchesEnvelope, Served};

const CONTEXT: &str = "Failed to fetch Brewfather data";

/// GET /api/brewfather?status=..&include=..
pub async fn get_batches(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<Served<BatchesEnvelope>>, ApiError> {
    let query = BatchQuery {
        status: first_value(&params, "status"),
        include: first_value(&params, "include"),
    };

    state
        .batches
        .get_batches(&query)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(CONTEXT, e))
}
