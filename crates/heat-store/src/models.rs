use serde::{Deserialize, Serialize};

/// Row in the `stocks` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Stock {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub exchange: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<i64>,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<f64>,
    pub volatility: Option<f64>,
    pub updated_at: Option<String>,
}

/// Row in the `heat_metrics` table, one per (stock, date)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HeatMetric {
    pub id: i64,
    pub stock_id: i64,
    pub date: String,
    pub current_price: f64,
    pub change_percent: f64,
    pub volume: i64,
    pub price_score: f64,
    pub volume_score: f64,
    pub sentiment_score: f64,
    pub retail_flow_score: f64,
    pub buzz_score: f64,
    pub heat_score: f64,
    pub heat_level: String,
    pub trend: String,
    pub trend_strength: f64,
    pub market_cap_category: String,
    pub sentiment_classification: String,
    pub ai_reasoning: Option<String>,
    pub last_updated: String,
}

/// Insert/overwrite payload for one (stock, date) metric row
#[derive(Debug, Clone)]
pub struct MetricUpsert {
    pub stock_id: i64,
    pub date: String,
    pub current_price: f64,
    pub change_percent: f64,
    pub volume: i64,
    pub price_score: f64,
    pub volume_score: f64,
    pub sentiment_score: f64,
    pub retail_flow_score: f64,
    pub buzz_score: f64,
    pub heat_score: f64,
    pub heat_level: String,
    pub trend: String,
    pub trend_strength: f64,
    pub market_cap_category: String,
    pub sentiment_classification: String,
    pub ai_reasoning: Option<String>,
}

/// Heat metric joined with its stock row, for map listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MetricWithStock {
    pub stock_id: i64,
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub exchange: String,
    pub current_price: f64,
    pub change_percent: f64,
    pub volume: i64,
    pub price_score: f64,
    pub volume_score: f64,
    pub sentiment_score: f64,
    pub retail_flow_score: f64,
    pub buzz_score: f64,
    pub heat_score: f64,
    pub heat_level: String,
    pub trend: String,
    pub trend_strength: f64,
    pub market_cap_category: String,
    pub sentiment_classification: String,
    pub ai_reasoning: Option<String>,
    pub last_updated: String,
}

/// Row in the `holders` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holder {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Row in the `holdings` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holding {
    pub id: i64,
    pub holder_id: i64,
    pub stock_id: i64,
    pub quantity: i64,
    pub avg_price: f64,
}

/// Holding joined with its stock row, for portfolio valuation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HoldingWithStock {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub quantity: i64,
    pub avg_price: f64,
    pub current_price: Option<f64>,
    pub volatility: Option<f64>,
}
