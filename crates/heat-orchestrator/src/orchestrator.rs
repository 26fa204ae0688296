use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use heat_core::{Action, HeatMapEntry, NewsSource, QuoteSource, Recommendation};
use heat_store::{HeatDb, MetricStore, Stock, StockStore};
use quote_gateway::{demo_news, AlphaVantage, QuoteGateway, YahooQuotes};
use recommendation_engine::{recommend, StockProfile};
use sentiment_engine::SentimentAnalyzer;
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::market::{self, MarketMovers, MarketSummary};
use crate::pipeline::{metric_to_row, row_to_entry, StockPipeline};
use crate::summary::{self, HeatSummary};

/// Concurrent per-stock refreshes unless MAX_CONCURRENT_REFRESH overrides it
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Outcome of one full refresh pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub status: String,
    pub stocks_analyzed: usize,
    pub updated: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Coordinates the whole heat workflow over the stored stock universe:
/// batch refreshes, heat map reads, per-stock lookups, recommendations,
/// and market breadth views.
pub struct HeatOrchestrator {
    pipeline: StockPipeline,
    stocks: StockStore,
    metrics: MetricStore,
    max_concurrent: usize,
}

impl HeatOrchestrator {
    pub fn new(
        gateway: Arc<QuoteGateway>,
        news: Option<Arc<dyn NewsSource>>,
        analyzer: Arc<SentimentAnalyzer>,
        db: HeatDb,
        max_concurrent: usize,
    ) -> Self {
        let stocks = StockStore::new(db.clone());
        let metrics = MetricStore::new(db);
        Self {
            pipeline: StockPipeline::new(gateway, news, analyzer, stocks.clone(), metrics.clone()),
            stocks,
            metrics,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Wire the full pipeline from the environment. Yahoo leads the quote
    /// chain; Alpha Vantage joins it, and serves news, when a key is set.
    pub fn from_env(db: HeatDb) -> Self {
        let mut sources: Vec<Arc<dyn QuoteSource>> = vec![Arc::new(YahooQuotes::new())];
        let mut news: Option<Arc<dyn NewsSource>> = None;
        if let Some(alpha) = AlphaVantage::from_env() {
            let alpha = Arc::new(alpha);
            sources.push(alpha.clone());
            news = Some(alpha);
        }

        let max_concurrent = std::env::var("MAX_CONCURRENT_REFRESH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONCURRENT);

        Self::new(
            Arc::new(QuoteGateway::new(sources)),
            news,
            Arc::new(SentimentAnalyzer::from_env()),
            db,
            max_concurrent,
        )
    }

    /// Refresh every stock's quote, sentiment, and heat metric for today.
    /// Per-stock failures are counted and never abort the pass.
    pub async fn refresh_all(&self) -> Result<RefreshReport> {
        let started = Instant::now();
        let date = today();
        let stocks = self.stocks.all().await?;
        let total = stocks.len();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(total);
        for stock in stocks {
            let semaphore = semaphore.clone();
            let pipeline = self.pipeline.clone();
            let date = date.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let symbol = stock.symbol.clone();
                pipeline
                    .compute(&stock, &date)
                    .await
                    .map_err(|err| (symbol, err))
            }));
        }

        let mut updated = 0usize;
        let mut failed = 0usize;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => updated += 1,
                Ok(Err((symbol, err))) => {
                    failed += 1;
                    tracing::warn!(symbol = %symbol, error = %err, "stock refresh failed");
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(error = %err, "refresh task aborted");
                }
            }
        }

        let report = RefreshReport {
            status: "success".to_string(),
            stocks_analyzed: total,
            updated,
            failed,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        };
        tracing::info!(
            updated = report.updated,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "heat refresh complete"
        );
        Ok(report)
    }

    /// Heat map rows for a date (default today), hottest first. An empty
    /// result for today triggers one refresh pass before re-reading; past
    /// dates are returned as stored, empty or not.
    pub async fn heat_map(&self, date: Option<&str>) -> Result<Vec<HeatMapEntry>> {
        let requested = match date {
            Some(date) => date.to_string(),
            None => today(),
        };

        let mut rows = self.metrics.with_stocks(&requested).await?;
        if rows.is_empty() && requested == today() {
            self.refresh_all().await?;
            rows = self.metrics.with_stocks(&requested).await?;
        }

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    /// Score every stock for today and attach its headlines, hottest first.
    /// The headline fetch that fed scoring also fills the display payload;
    /// stocks whose feed returned nothing get canned demo headlines instead.
    pub async fn heat_map_with_news(&self) -> Result<Vec<HeatMapEntry>> {
        let date = today();
        let stocks = self.stocks.all().await?;
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        let mut handles = Vec::with_capacity(stocks.len());
        for stock in stocks {
            let semaphore = semaphore.clone();
            let pipeline = self.pipeline.clone();
            let date = date.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let symbol = stock.symbol.clone();
                pipeline
                    .compute(&stock, &date)
                    .await
                    .map_err(|err| (symbol, err))
            }));
        }

        let mut entries = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Ok(entry)) => entries.push(entry),
                Ok(Err((symbol, err))) => {
                    tracing::warn!(symbol = %symbol, error = %err, "stock scoring failed");
                }
                Err(err) => tracing::warn!(error = %err, "scoring task aborted"),
            }
        }

        for entry in &mut entries {
            let missing = entry
                .news_headlines
                .as_ref()
                .map_or(true, |headlines| headlines.is_empty());
            if missing {
                entry.news_headlines = Some(demo_news(&entry.symbol));
            }
        }

        entries.sort_by(|a, b| {
            b.heat_score
                .partial_cmp(&a.heat_score)
                .unwrap_or(Ordering::Equal)
        });
        Ok(entries)
    }

    /// Score every stock from live quotes without persisting anything
    pub async fn realtime_heat_map(&self) -> Result<Vec<HeatMapEntry>> {
        let stocks = self.stocks.all().await?;
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        let mut handles = Vec::with_capacity(stocks.len());
        for stock in stocks {
            let semaphore = semaphore.clone();
            let pipeline = self.pipeline.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                pipeline.preview(&stock).await
            }));
        }

        let mut entries = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(entry) => entries.push(entry),
                Err(err) => tracing::warn!(error = %err, "realtime scoring task aborted"),
            }
        }

        entries.sort_by(|a, b| {
            b.heat_score
                .partial_cmp(&a.heat_score)
                .unwrap_or(Ordering::Equal)
        });
        Ok(entries)
    }

    /// Heat for one stock. Today's persisted metric is reused when present,
    /// otherwise one is computed and stored. Unknown symbols yield None.
    pub async fn stock_heat(&self, symbol: &str) -> Result<Option<HeatMapEntry>> {
        let stock = match self.stocks.find_by_symbol(symbol).await? {
            Some(stock) => stock,
            None => return Ok(None),
        };

        let date = today();
        if let Some(metric) = self.metrics.latest(stock.id).await? {
            if metric.date == date {
                return Ok(Some(row_to_entry(metric_to_row(&stock, metric))));
            }
        }

        let entry = self.pipeline.compute(&stock, &date).await?;
        Ok(Some(entry))
    }

    /// Aggregate level counts and top overheated names for today's map
    pub async fn heat_summary(&self) -> Result<HeatSummary> {
        let entries = self.heat_map(None).await?;
        Ok(summary::summarize(&entries))
    }

    /// Ranked calls for every stock, highest confidence first. Stocks with
    /// no metric yet are judged at the neutral heat of 50.
    pub async fn recommendations(&self, limit: usize) -> Result<Vec<Recommendation>> {
        let stocks = self.stocks.all().await?;
        let mut recs = Vec::with_capacity(stocks.len());
        for stock in &stocks {
            let heat = match self.metrics.latest(stock.id).await? {
                Some(metric) => metric.heat_score,
                None => 50.0,
            };
            recs.push(recommend(&profile(stock), heat));
        }

        recs.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        recs.truncate(limit);
        Ok(recs)
    }

    /// Top calls for one action, filtered out of a ranked pool twice the
    /// requested size
    pub async fn recommendations_for_action(
        &self,
        action: Action,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        let pool = self.recommendations(limit * 2).await?;
        Ok(pool
            .into_iter()
            .filter(|rec| rec.action == action)
            .take(limit)
            .collect())
    }

    /// Gainers, losers and most-active lists over the stored universe
    pub async fn market_movers(&self) -> Result<MarketMovers> {
        Ok(market::market_movers(&self.stocks.all().await?))
    }

    /// Advance-decline summary over the stored universe
    pub async fn market_summary(&self) -> Result<MarketSummary> {
        Ok(market::market_summary(&self.stocks.all().await?))
    }
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn profile(stock: &Stock) -> StockProfile {
    StockProfile {
        symbol: stock.symbol.clone(),
        name: stock.name.clone(),
        sector: stock.sector.clone(),
        current_price: stock.current_price,
        change_percent: stock.change_percent,
        pe_ratio: stock.pe_ratio,
    }
}
