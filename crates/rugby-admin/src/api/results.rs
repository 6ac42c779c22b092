//! JSON results API.

use axum::{
    extract::{Query, State},
    Json,
};
use rugby_core::MatchResult;

use crate::error::AdminError;
use crate::query::ResultQuery;
use crate::AppState;

const DEFAULT_LIMIT: usize = 20;

/// `GET /api/results`
///
/// # Query Parameters
///
/// - `category`, `gender`: bracket labels (optional)
/// - `team`: case-insensitive team name substring (optional)
/// - `limit`: maximum results (default: 20)
/// - `offset`: skip results (default: 0)
///
/// # Response
///
/// - `200 OK`: JSON array of results, newest match date first
/// - `500 Internal Server Error`: storage error
pub async fn list_results(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Json<Vec<MatchResult>>, AdminError> {
    let results = state.store.results().list(&query.filter(DEFAULT_LIMIT))?;
    Ok(Json(results))
}
