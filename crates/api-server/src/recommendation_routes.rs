use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use heat_core::{Action, Recommendation};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

#[derive(Deserialize)]
pub struct ActionQuery {
    #[serde(default = "default_action_limit")]
    pub limit: usize,
}

fn default_list_limit() -> usize {
    10
}

fn default_action_limit() -> usize {
    5
}

pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/recommendations", get(recommendations))
        .route("/api/recommendations/buys", get(top_buys))
        .route("/api/recommendations/sells", get(top_sells))
}

async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Recommendation>>>, AppError> {
    let recs = state.orchestrator.recommendations(query.limit).await?;
    Ok(Json(ApiResponse::success(recs)))
}

async fn top_buys(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> Result<Json<ApiResponse<Vec<Recommendation>>>, AppError> {
    let recs = state
        .orchestrator
        .recommendations_for_action(Action::Buy, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(recs)))
}

async fn top_sells(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> Result<Json<ApiResponse<Vec<Recommendation>>>, AppError> {
    let recs = state
        .orchestrator
        .recommendations_for_action(Action::Sell, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(recs)))
}
