//! HTTP read API over the heat pipeline: heat maps, recommendations,
//! market breadth, and portfolio summaries. All handlers respond with the
//! uniform `ApiResponse` envelope.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use heat_orchestrator::HeatOrchestrator;
use heat_store::{HeatDb, HolderStore};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod heat_routes;
pub mod market_routes;
pub mod portfolio_routes;
pub mod recommendation_routes;

const DEFAULT_PORT: u16 = 3001;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<HeatOrchestrator>,
    pub holders: HolderStore,
}

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Internal(anyhow::Error),
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, what),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(heat_routes::heat_routes())
        .merge(recommendation_routes::recommendation_routes())
        .merge(market_routes::market_routes())
        .merge(portfolio_routes::portfolio_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Open the database, seed it on first run, wire the orchestrator from the
/// environment, and serve until the process is stopped.
pub async fn run_server() -> anyhow::Result<()> {
    let db = HeatDb::from_env().await?;
    heat_store::seed(&db).await?;

    let state = AppState {
        orchestrator: Arc::new(HeatOrchestrator::from_env(db.clone())),
        holders: HolderStore::new(db),
    };

    let port: u16 = std::env::var("API_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "heat api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
