use std::time::Duration;

use anyhow::Result;
use heat_orchestrator::HeatOrchestrator;
use heat_store::HeatDb;
use tokio::signal::unix::SignalKind;
use tokio::time;

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 900;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    tracing::info!("Starting HeatWatch refresh agent");

    let interval_secs: u64 = std::env::var("REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);

    let db = HeatDb::from_env().await?;
    if heat_store::seed(&db).await? {
        tracing::info!("Seeded the stock universe");
    }

    let orchestrator = HeatOrchestrator::from_env(db);
    tracing::info!(
        "Agent is now running. Refreshing every {}s. Press Ctrl+C to stop.",
        interval_secs
    );

    // First tick fires immediately, so startup includes a full pass
    let mut interval = time::interval(Duration::from_secs(interval_secs));
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;
    let shutdown = async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM");
            }
        }
    };
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match orchestrator.refresh_all().await {
                    Ok(report) => {
                        tracing::info!(
                            "Refresh pass done: {} updated, {} failed in {:.1}s",
                            report.updated,
                            report.failed,
                            report.duration_ms as f64 / 1000.0
                        );
                    }
                    Err(e) => {
                        tracing::error!("Error in refresh pass: {}", e);
                    }
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, exiting gracefully...");
                break;
            }
        }
    }

    tracing::info!("Heat agent shut down.");
    Ok(())
}
