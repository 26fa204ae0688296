//! Heat map endpoints: daily map reads, realtime recomputation, per-stock
//! lookups, manual refresh, and the level summary.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use heat_core::HeatMapEntry;
use heat_orchestrator::{HeatSummary, RefreshReport};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct HeatMapQuery {
    #[serde(default)]
    pub date: Option<String>,
}

pub fn heat_routes() -> Router<AppState> {
    Router::new()
        .route("/api/heat/map", get(heat_map))
        .route("/api/heat/map/realtime", get(realtime_heat_map))
        .route("/api/heat/map/with-news", get(heat_map_with_news))
        .route("/api/heat/map/:symbol", get(stock_heat))
        .route("/api/heat/refresh", post(refresh))
        .route("/api/heat/summary", get(heat_summary))
}

async fn heat_map(
    State(state): State<AppState>,
    Query(query): Query<HeatMapQuery>,
) -> Result<Json<ApiResponse<Vec<HeatMapEntry>>>, AppError> {
    let entries = state.orchestrator.heat_map(query.date.as_deref()).await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn realtime_heat_map(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<HeatMapEntry>>>, AppError> {
    let entries = state.orchestrator.realtime_heat_map().await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn heat_map_with_news(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<HeatMapEntry>>>, AppError> {
    let entries = state.orchestrator.heat_map_with_news().await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn stock_heat(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<HeatMapEntry>>, AppError> {
    let entry = state
        .orchestrator
        .stock_heat(&symbol)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock not found: {}", symbol.to_uppercase())))?;
    Ok(Json(ApiResponse::success(entry)))
}

async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RefreshReport>>, AppError> {
    let report = state.orchestrator.refresh_all().await?;
    Ok(Json(ApiResponse::success(report)))
}

async fn heat_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HeatSummary>>, AppError> {
    let summary = state.orchestrator.heat_summary().await?;
    Ok(Json(ApiResponse::success(summary)))
}
