use axum::{extract::State, routing::get, Json, Router};
use heat_orchestrator::{MarketMovers, MarketSummary};

use crate::{ApiResponse, AppError, AppState};

pub fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/api/market/movers", get(market_movers))
        .route("/api/market/summary", get(market_summary))
}

async fn market_movers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MarketMovers>>, AppError> {
    let movers = state.orchestrator.market_movers().await?;
    Ok(Json(ApiResponse::success(movers)))
}

async fn market_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MarketSummary>>, AppError> {
    let summary = state.orchestrator.market_summary().await?;
    Ok(Json(ApiResponse::success(summary)))
}
