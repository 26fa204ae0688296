use crate::db::HeatDb;
use crate::models::{HeatMetric, MetricUpsert, MetricWithStock};
use anyhow::Result;
use chrono::Utc;

#[derive(Clone)]
pub struct MetricStore {
    db: HeatDb,
}

impl MetricStore {
    pub fn new(db: HeatDb) -> Self {
        Self { db }
    }

    /// Write the metric for (stock, date), overwriting any earlier
    /// computation for the same day
    pub async fn upsert(&self, metric: &MetricUpsert) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO heat_metrics (
                stock_id, date, current_price, change_percent, volume,
                price_score, volume_score, sentiment_score, retail_flow_score, buzz_score,
                heat_score, heat_level, trend, trend_strength,
                market_cap_category, sentiment_classification, ai_reasoning, last_updated
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(stock_id, date) DO UPDATE SET
                current_price = excluded.current_price,
                change_percent = excluded.change_percent,
                volume = excluded.volume,
                price_score = excluded.price_score,
                volume_score = excluded.volume_score,
                sentiment_score = excluded.sentiment_score,
                retail_flow_score = excluded.retail_flow_score,
                buzz_score = excluded.buzz_score,
                heat_score = excluded.heat_score,
                heat_level = excluded.heat_level,
                trend = excluded.trend,
                trend_strength = excluded.trend_strength,
                market_cap_category = excluded.market_cap_category,
                sentiment_classification = excluded.sentiment_classification,
                ai_reasoning = excluded.ai_reasoning,
                last_updated = excluded.last_updated
            RETURNING id
            "#,
        )
        .bind(metric.stock_id)
        .bind(&metric.date)
        .bind(metric.current_price)
        .bind(metric.change_percent)
        .bind(metric.volume)
        .bind(metric.price_score)
        .bind(metric.volume_score)
        .bind(metric.sentiment_score)
        .bind(metric.retail_flow_score)
        .bind(metric.buzz_score)
        .bind(metric.heat_score)
        .bind(&metric.heat_level)
        .bind(&metric.trend)
        .bind(metric.trend_strength)
        .bind(&metric.market_cap_category)
        .bind(&metric.sentiment_classification)
        .bind(&metric.ai_reasoning)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(self.db.pool())
        .await?;

        Ok(id)
    }

    /// All metrics for a calendar date
    pub async fn for_date(&self, date: &str) -> Result<Vec<HeatMetric>> {
        let metrics = sqlx::query_as::<_, HeatMetric>("SELECT * FROM heat_metrics WHERE date = ?")
            .bind(date)
            .fetch_all(self.db.pool())
            .await?;

        Ok(metrics)
    }

    /// Metrics for a date joined with their stock rows, hottest first
    pub async fn with_stocks(&self, date: &str) -> Result<Vec<MetricWithStock>> {
        let rows = sqlx::query_as::<_, MetricWithStock>(
            r#"
            SELECT s.id AS stock_id, s.symbol, s.name, s.sector, s.exchange,
                   m.current_price, m.change_percent, m.volume,
                   m.price_score, m.volume_score, m.sentiment_score,
                   m.retail_flow_score, m.buzz_score,
                   m.heat_score, m.heat_level, m.trend, m.trend_strength,
                   m.market_cap_category, m.sentiment_classification,
                   m.ai_reasoning, m.last_updated
            FROM heat_metrics m
            JOIN stocks s ON s.id = m.stock_id
            WHERE m.date = ?
            ORDER BY m.heat_score DESC
            "#,
        )
        .bind(date)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// Most recent metric for a stock across all dates
    pub async fn latest(&self, stock_id: i64) -> Result<Option<HeatMetric>> {
        let metric = sqlx::query_as::<_, HeatMetric>(
            "SELECT * FROM heat_metrics WHERE stock_id = ? ORDER BY date DESC LIMIT 1",
        )
        .bind(stock_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(metric)
    }
}
