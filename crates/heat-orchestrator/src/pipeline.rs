use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use heat_core::{
    GatewayQuote, HeatLevel, HeatMapEntry, HeatScores, MarketCapBucket, NewsHeadline, NewsSource,
    Quote, QuoteTier, SentimentClassification, SentimentResult, Trend,
};
use heat_engine::MarketSnapshot;
use heat_store::{HeatMetric, MetricStore, MetricUpsert, MetricWithStock, Stock, StockStore};
use quote_gateway::QuoteGateway;
use rust_decimal::prelude::*;
use sentiment_engine::SentimentAnalyzer;
use tokio::sync::OnceCell;

/// How long fetched headlines stay fresh
const CACHE_TTL_SECS: i64 = 300;
/// Headlines pulled per symbol for sentiment analysis
const NEWS_LIMIT: usize = 5;

struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// The per-stock quote -> news -> sentiment -> score -> persist sequence,
/// together with the caches it reads through. Clones share the news cache
/// and the in-flight table, so cloned pipelines coalesce duplicate work.
#[derive(Clone)]
pub struct StockPipeline {
    gateway: Arc<QuoteGateway>,
    news: Option<Arc<dyn NewsSource>>,
    analyzer: Arc<SentimentAnalyzer>,
    stocks: StockStore,
    metrics: MetricStore,
    news_cache: Arc<DashMap<String, CacheEntry<Vec<NewsHeadline>>>>,
    inflight: Arc<DashMap<String, Arc<OnceCell<HeatMapEntry>>>>,
}

impl StockPipeline {
    pub fn new(
        gateway: Arc<QuoteGateway>,
        news: Option<Arc<dyn NewsSource>>,
        analyzer: Arc<SentimentAnalyzer>,
        stocks: StockStore,
        metrics: MetricStore,
    ) -> Self {
        Self {
            gateway,
            news,
            analyzer,
            stocks,
            metrics,
            news_cache: Arc::new(DashMap::new()),
            inflight: Arc::new(DashMap::new()),
        }
    }

    /// Compute and persist the heat metric for one stock on one date.
    /// Concurrent calls for the same stock and date share a single run
    /// and all observe its result.
    pub async fn compute(&self, stock: &Stock, date: &str) -> Result<HeatMapEntry> {
        let key = format!("{}:{}", stock.symbol, date);
        let cell = self
            .inflight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell
            .get_or_try_init(|| self.run(stock, date))
            .await
            .map(|entry| entry.clone());
        self.inflight.remove(&key);
        result
    }

    async fn run(&self, stock: &Stock, date: &str) -> Result<HeatMapEntry> {
        let stored = stored_quote(stock);
        let quote = self
            .gateway
            .get_quote(&stock.symbol, &stock.exchange, stored.as_ref())
            .await;

        let headlines = self.headlines(&stock.symbol).await;
        let sentiment = self.analyzer.analyze(&stock.symbol, &headlines).await;
        let scores = score_quote(&quote, sentiment.score);

        self.metrics
            .upsert(&metric_upsert(stock.id, date, &quote, &scores, &sentiment))
            .await?;
        // Only live quotes feed the stock row; fallback tiers must not
        // overwrite the last real snapshot.
        if quote.tier == QuoteTier::Live {
            self.stocks.update_snapshot(stock.id, &quote).await?;
        }

        tracing::debug!(
            symbol = %stock.symbol,
            heat = scores.heat_score,
            tier = quote.tier.as_str(),
            "stock scored"
        );

        Ok(entry_from_parts(stock, &quote, &scores, &sentiment, Some(headlines)))
    }

    /// Score one stock from live inputs without touching the database.
    /// Sentiment stays at the neutral default so the pass needs no model call.
    pub async fn preview(&self, stock: &Stock) -> HeatMapEntry {
        let stored = stored_quote(stock);
        let quote = self
            .gateway
            .get_quote(&stock.symbol, &stock.exchange, stored.as_ref())
            .await;

        let sentiment = SentimentResult::neutral("AI analysis skipped");
        let scores = score_quote(&quote, sentiment.score);
        entry_from_parts(stock, &quote, &scores, &sentiment, None)
    }

    /// Headlines for one symbol, cached for five minutes. A missing news
    /// source or a failed fetch yields an empty list and is not cached.
    pub async fn headlines(&self, symbol: &str) -> Vec<NewsHeadline> {
        let key = symbol.to_uppercase();
        if let Some(entry) = self.news_cache.get(&key) {
            let age = (Utc::now() - entry.cached_at).num_seconds();
            if age < CACHE_TTL_SECS {
                return entry.data.clone();
            }
        }

        let source = match &self.news {
            Some(source) => source,
            None => return Vec::new(),
        };

        match source.fetch_headlines(&key, NEWS_LIMIT).await {
            Ok(headlines) => {
                self.news_cache.insert(
                    key,
                    CacheEntry {
                        data: headlines.clone(),
                        cached_at: Utc::now(),
                    },
                );
                headlines
            }
            Err(err) => {
                tracing::debug!(symbol = %key, error = %err, "headline fetch failed");
                Vec::new()
            }
        }
    }
}

fn score_quote(quote: &GatewayQuote, sentiment_score: f64) -> HeatScores {
    heat_engine::evaluate(
        MarketSnapshot {
            price: quote.price.to_f64(),
            change_percent: quote.change_percent,
            volume: quote.volume,
        },
        sentiment_score,
    )
}

/// Last persisted snapshot, reshaped as a fallback quote for the gateway
fn stored_quote(stock: &Stock) -> Option<Quote> {
    let price = Decimal::from_f64(stock.current_price?)?;
    Some(Quote {
        symbol: stock.symbol.clone(),
        price,
        previous_close: stock.previous_close.and_then(Decimal::from_f64),
        change_percent: stock.change_percent,
        volume: stock.volume,
    })
}

fn metric_upsert(
    stock_id: i64,
    date: &str,
    quote: &GatewayQuote,
    scores: &HeatScores,
    sentiment: &SentimentResult,
) -> MetricUpsert {
    MetricUpsert {
        stock_id,
        date: date.to_string(),
        current_price: quote.price.to_f64().unwrap_or(0.0),
        change_percent: quote.change_percent.unwrap_or(0.0),
        volume: quote.volume.unwrap_or(0),
        price_score: scores.price_score,
        volume_score: scores.volume_score,
        sentiment_score: scores.sentiment_score,
        retail_flow_score: scores.retail_flow_score,
        buzz_score: scores.buzz_score,
        heat_score: scores.heat_score,
        heat_level: scores.heat_level.as_str().to_string(),
        trend: scores.trend.as_str().to_string(),
        trend_strength: scores.trend_strength,
        market_cap_category: scores.market_cap.as_str().to_string(),
        sentiment_classification: sentiment.classification.as_str().to_string(),
        ai_reasoning: Some(sentiment.reasoning.clone()),
    }
}

fn entry_from_parts(
    stock: &Stock,
    quote: &GatewayQuote,
    scores: &HeatScores,
    sentiment: &SentimentResult,
    news: Option<Vec<NewsHeadline>>,
) -> HeatMapEntry {
    HeatMapEntry {
        stock_id: stock.id,
        symbol: stock.symbol.clone(),
        name: stock.name.clone(),
        sector: stock.sector.clone(),
        exchange: stock.exchange.clone(),
        current_price: quote.price.to_f64(),
        change_percent: quote.change_percent,
        volume: quote.volume,
        price_score: scores.price_score,
        volume_score: scores.volume_score,
        sentiment_score: scores.sentiment_score,
        retail_flow_score: scores.retail_flow_score,
        buzz_score: scores.buzz_score,
        heat_score: scores.heat_score,
        heat_level: scores.heat_level,
        trend: scores.trend,
        trend_strength: scores.trend_strength,
        market_cap_category: scores.market_cap,
        sentiment_classification: sentiment.classification,
        ai_reasoning: Some(sentiment.reasoning.clone()),
        news_headlines: news,
        last_updated: Utc::now(),
    }
}

/// Stored metric row back into an API entry. Unknown labels fall back to
/// values derived from the numeric columns.
pub(crate) fn row_to_entry(row: MetricWithStock) -> HeatMapEntry {
    HeatMapEntry {
        stock_id: row.stock_id,
        symbol: row.symbol,
        name: row.name,
        sector: row.sector,
        exchange: row.exchange,
        current_price: Some(row.current_price),
        change_percent: Some(row.change_percent),
        volume: Some(row.volume),
        price_score: row.price_score,
        volume_score: row.volume_score,
        sentiment_score: row.sentiment_score,
        retail_flow_score: row.retail_flow_score,
        buzz_score: row.buzz_score,
        heat_score: row.heat_score,
        heat_level: HeatLevel::from_str(&row.heat_level)
            .unwrap_or_else(|| HeatLevel::from_score(row.heat_score)),
        trend: Trend::from_str(&row.trend).unwrap_or(Trend::Stable),
        trend_strength: row.trend_strength,
        market_cap_category: MarketCapBucket::from_str(&row.market_cap_category)
            .unwrap_or(MarketCapBucket::Unknown),
        sentiment_classification: SentimentClassification::from_str(&row.sentiment_classification)
            .unwrap_or(SentimentClassification::Neutral),
        ai_reasoning: row.ai_reasoning,
        news_headlines: None,
        last_updated: parse_timestamp(&row.last_updated),
    }
}

pub(crate) fn metric_to_row(stock: &Stock, metric: HeatMetric) -> MetricWithStock {
    MetricWithStock {
        stock_id: stock.id,
        symbol: stock.symbol.clone(),
        name: stock.name.clone(),
        sector: stock.sector.clone(),
        exchange: stock.exchange.clone(),
        current_price: metric.current_price,
        change_percent: metric.change_percent,
        volume: metric.volume,
        price_score: metric.price_score,
        volume_score: metric.volume_score,
        sentiment_score: metric.sentiment_score,
        retail_flow_score: metric.retail_flow_score,
        buzz_score: metric.buzz_score,
        heat_score: metric.heat_score,
        heat_level: metric.heat_level,
        trend: metric.trend,
        trend_strength: metric.trend_strength,
        market_cap_category: metric.market_cap_category,
        sentiment_classification: metric.sentiment_classification,
        ai_reasoning: metric.ai_reasoning,
        last_updated: metric.last_updated,
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use heat_core::{HeatError, QuoteSource};
    use heat_store::{seed, HeatDb};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingQuotes {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QuoteSource for CountingQuotes {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch_quote(&self, symbol: &str, _exchange: &str) -> Result<Quote, HeatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Quote {
                symbol: symbol.to_string(),
                price: dec!(1500),
                previous_close: Some(dec!(1480)),
                change_percent: Some(1.35),
                volume: Some(2_000_000),
            })
        }
    }

    struct CountingNews {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NewsSource for CountingNews {
        async fn fetch_headlines(
            &self,
            symbol: &str,
            _limit: usize,
        ) -> Result<Vec<NewsHeadline>, HeatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![NewsHeadline {
                title: format!("{symbol} posts quarterly results"),
                url: None,
                source: Some("Reuters".to_string()),
                summary: None,
                published_at: Utc::now(),
                sentiment_score: Some(0.1),
                sentiment_label: Some("Neutral".to_string()),
            }])
        }
    }

    struct FailingNews {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NewsSource for FailingNews {
        async fn fetch_headlines(
            &self,
            _symbol: &str,
            _limit: usize,
        ) -> Result<Vec<NewsHeadline>, HeatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(HeatError::ProviderUnavailable("news feed down".to_string()))
        }
    }

    fn pipeline_with(db: HeatDb, source: Arc<dyn QuoteSource>) -> StockPipeline {
        StockPipeline::new(
            Arc::new(QuoteGateway::new(vec![source])),
            None,
            Arc::new(SentimentAnalyzer::new(None)),
            StockStore::new(db.clone()),
            MetricStore::new(db),
        )
    }

    #[test]
    fn stored_quote_requires_a_price() {
        let mut stock = sample_stock();
        assert!(stored_quote(&stock).is_some());

        stock.current_price = None;
        assert!(stored_quote(&stock).is_none());
    }

    #[test]
    fn row_with_unknown_labels_falls_back_to_derived_values() {
        let mut row = sample_row();
        row.heat_level = "BLAZING".to_string();
        row.trend = "sideways".to_string();
        row.market_cap_category = "".to_string();
        row.sentiment_classification = "??".to_string();
        row.last_updated = "not a timestamp".to_string();
        row.heat_score = 80.0;

        let entry = row_to_entry(row);
        assert_eq!(entry.heat_level, HeatLevel::Overheated);
        assert_eq!(entry.trend, Trend::Stable);
        assert_eq!(entry.market_cap_category, MarketCapBucket::Unknown);
        assert_eq!(
            entry.sentiment_classification,
            SentimentClassification::Neutral
        );
    }

    #[test]
    fn missing_quote_fields_store_as_zeroes() {
        let quote = GatewayQuote {
            symbol: "TCS".to_string(),
            price: dec!(3850),
            previous_close: None,
            change_percent: None,
            volume: None,
            tier: heat_core::QuoteTier::Stored,
        };
        let scores = score_quote(&quote, 50.0);
        let sentiment = SentimentResult::neutral("AI not configured");

        let upsert = metric_upsert(7, "2026-08-25", &quote, &scores, &sentiment);
        assert_eq!(upsert.change_percent, 0.0);
        assert_eq!(upsert.volume, 0);
        assert_eq!(upsert.current_price, 3850.0);
    }

    #[tokio::test]
    async fn concurrent_compute_shares_one_run() {
        let db = HeatDb::new("sqlite::memory:").await.unwrap();
        seed(&db).await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(
            db.clone(),
            Arc::new(CountingQuotes {
                calls: calls.clone(),
            }),
        );

        let stock = StockStore::new(db)
            .find_by_symbol("RELIANCE")
            .await
            .unwrap()
            .unwrap();

        let (a, b) = tokio::join!(
            pipeline.compute(&stock, "2026-08-25"),
            pipeline.compute(&stock, "2026-08-25")
        );

        // price 1500 -> 55, volume 2M -> 60, neutral sentiment 50
        assert_eq!(a.unwrap().heat_score, 54.5);
        assert_eq!(b.unwrap().heat_score, 54.5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fallback_quotes_leave_the_stock_row_alone() {
        let db = HeatDb::new("sqlite::memory:").await.unwrap();
        seed(&db).await.unwrap();

        // No sources configured, so RELIANCE resolves from the demo table
        let pipeline = StockPipeline::new(
            Arc::new(QuoteGateway::new(Vec::new())),
            None,
            Arc::new(SentimentAnalyzer::new(None)),
            StockStore::new(db.clone()),
            MetricStore::new(db.clone()),
        );

        let stocks = StockStore::new(db);
        let stock = stocks.find_by_symbol("RELIANCE").await.unwrap().unwrap();
        let entry = pipeline.compute(&stock, "2026-08-25").await.unwrap();
        assert_eq!(entry.current_price, Some(2950.50));

        let after = stocks.find_by_symbol("RELIANCE").await.unwrap().unwrap();
        assert_eq!(after.current_price, stock.current_price);
        assert_eq!(after.updated_at, stock.updated_at);
    }

    #[tokio::test]
    async fn headlines_fetched_once_within_ttl() {
        let db = HeatDb::new("sqlite::memory:").await.unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = StockPipeline::new(
            Arc::new(QuoteGateway::new(Vec::new())),
            Some(Arc::new(CountingNews {
                calls: calls.clone(),
            })),
            Arc::new(SentimentAnalyzer::new(None)),
            StockStore::new(db.clone()),
            MetricStore::new(db),
        );

        let first = pipeline.headlines("TCS").await;
        let second = pipeline.headlines("tcs").await;

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_headline_fetches_are_not_cached() {
        let db = HeatDb::new("sqlite::memory:").await.unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = StockPipeline::new(
            Arc::new(QuoteGateway::new(Vec::new())),
            Some(Arc::new(FailingNews {
                calls: calls.clone(),
            })),
            Arc::new(SentimentAnalyzer::new(None)),
            StockStore::new(db.clone()),
            MetricStore::new(db),
        );

        assert!(pipeline.headlines("INFY").await.is_empty());
        assert!(pipeline.headlines("INFY").await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn preview_scores_without_persisting() {
        let db = HeatDb::new("sqlite::memory:").await.unwrap();
        seed(&db).await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(
            db.clone(),
            Arc::new(CountingQuotes {
                calls: calls.clone(),
            }),
        );

        let stocks = StockStore::new(db.clone());
        let stock = stocks.find_by_symbol("TCS").await.unwrap().unwrap();
        let entry = pipeline.preview(&stock).await;

        assert_eq!(entry.ai_reasoning.as_deref(), Some("AI analysis skipped"));
        assert!(MetricStore::new(db)
            .latest(stock.id)
            .await
            .unwrap()
            .is_none());
    }

    fn sample_stock() -> Stock {
        Stock {
            id: 1,
            symbol: "RELIANCE".to_string(),
            name: "Reliance Industries".to_string(),
            sector: "Energy".to_string(),
            exchange: "NSE".to_string(),
            current_price: Some(2450.0),
            previous_close: Some(2420.0),
            change_percent: Some(1.24),
            volume: Some(5_000_000),
            pe_ratio: Some(28.5),
            market_cap: Some(1_650_000.0),
            volatility: Some(0.018),
            updated_at: None,
        }
    }

    fn sample_row() -> MetricWithStock {
        MetricWithStock {
            stock_id: 1,
            symbol: "RELIANCE".to_string(),
            name: "Reliance Industries".to_string(),
            sector: "Energy".to_string(),
            exchange: "NSE".to_string(),
            current_price: 2450.0,
            change_percent: 1.24,
            volume: 5_000_000,
            price_score: 70.0,
            volume_score: 75.0,
            sentiment_score: 50.0,
            retail_flow_score: 62.5,
            buzz_score: 50.0,
            heat_score: 63.5,
            heat_level: "WARM".to_string(),
            trend: "UP".to_string(),
            trend_strength: 50.0,
            market_cap_category: "LARGE".to_string(),
            sentiment_classification: "NEUTRAL".to_string(),
            ai_reasoning: None,
            last_updated: Utc::now().to_rfc3339(),
        }
    }
}
