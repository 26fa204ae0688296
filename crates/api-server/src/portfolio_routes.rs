use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use heat_store::HoldingWithStock;
use portfolio_analytics::{summarize, HoldingSnapshot, PortfolioSummary};

use crate::{ApiResponse, AppError, AppState};

pub fn portfolio_routes() -> Router<AppState> {
    Router::new().route("/api/portfolio/:holder_id/summary", get(portfolio_summary))
}

async fn portfolio_summary(
    State(state): State<AppState>,
    Path(holder_id): Path<i64>,
) -> Result<Json<ApiResponse<PortfolioSummary>>, AppError> {
    let holder = state
        .holders
        .find(holder_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Holder not found: {holder_id}")))?;

    let holdings = state.holders.holdings_with_stocks(holder_id).await?;
    let snapshots: Vec<HoldingSnapshot> = holdings.into_iter().map(snapshot).collect();
    Ok(Json(ApiResponse::success(summarize(
        &holder.name,
        &snapshots,
    ))))
}

fn snapshot(holding: HoldingWithStock) -> HoldingSnapshot {
    HoldingSnapshot {
        symbol: holding.symbol,
        sector: holding.sector,
        quantity: holding.quantity,
        avg_price: holding.avg_price,
        current_price: holding.current_price,
        volatility: holding.volatility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holdings_map_onto_valuation_snapshots() {
        let row = HoldingWithStock {
            symbol: "TCS".to_string(),
            name: "Tata Consultancy Services".to_string(),
            sector: "IT".to_string(),
            quantity: 10,
            avg_price: 3500.0,
            current_price: Some(3850.0),
            volatility: Some(0.010),
        };

        let snap = snapshot(row);
        assert_eq!(snap.symbol, "TCS");
        assert_eq!(snap.quantity, 10);
        assert_eq!(snap.current_price, Some(3850.0));
    }
}
