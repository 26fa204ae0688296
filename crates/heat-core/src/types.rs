use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quote produced by a single provider fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
    pub previous_close: Option<Decimal>,
    pub change_percent: Option<f64>,
    pub volume: Option<i64>,
}

/// Which fallback tier produced a gateway quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteTier {
    Live,
    Demo,
    Stored,
    Synthetic,
}

impl QuoteTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteTier::Live => "live",
            QuoteTier::Demo => "demo",
            QuoteTier::Stored => "stored",
            QuoteTier::Synthetic => "synthetic",
        }
    }
}

/// Best-effort quote returned by the gateway. Price is always positive;
/// the tier tells callers how trustworthy the data is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayQuote {
    pub symbol: String,
    pub price: Decimal,
    pub previous_close: Option<Decimal>,
    pub change_percent: Option<f64>,
    pub volume: Option<i64>,
    pub tier: QuoteTier,
}

/// News article headline with optional per-article sentiment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsHeadline {
    pub title: String,
    pub url: Option<String>,
    pub source: Option<String>,
    pub summary: Option<String>,
    pub published_at: DateTime<Utc>,
    pub sentiment_score: Option<f64>,
    pub sentiment_label: Option<String>,
}

/// Hype bucket derived from headline analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentClassification {
    Hyper,
    Warm,
    Neutral,
    Cool,
}

impl SentimentClassification {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 70.0 => SentimentClassification::Hyper,
            s if s >= 50.0 => SentimentClassification::Warm,
            s if s >= 30.0 => SentimentClassification::Neutral,
            _ => SentimentClassification::Cool,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HYPER" => Some(SentimentClassification::Hyper),
            "WARM" => Some(SentimentClassification::Warm),
            "NEUTRAL" => Some(SentimentClassification::Neutral),
            "COOL" => Some(SentimentClassification::Cool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentClassification::Hyper => "HYPER",
            SentimentClassification::Warm => "WARM",
            SentimentClassification::Neutral => "NEUTRAL",
            SentimentClassification::Cool => "COOL",
        }
    }
}

/// Result of analyzing a headline set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub classification: SentimentClassification,
    pub reasoning: String,
}

impl SentimentResult {
    /// Fixed neutral fallback used whenever the model path is unavailable
    pub fn neutral(reasoning: impl Into<String>) -> Self {
        Self {
            score: 50.0,
            classification: SentimentClassification::Neutral,
            reasoning: reasoning.into(),
        }
    }
}

/// Heat bucket derived from the combined heat score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeatLevel {
    Overheated,
    Warm,
    Neutral,
    Cool,
}

impl HeatLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 75.0 => HeatLevel::Overheated,
            s if s >= 55.0 => HeatLevel::Warm,
            s if s >= 35.0 => HeatLevel::Neutral,
            _ => HeatLevel::Cool,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OVERHEATED" => Some(HeatLevel::Overheated),
            "WARM" => Some(HeatLevel::Warm),
            "NEUTRAL" => Some(HeatLevel::Neutral),
            "COOL" => Some(HeatLevel::Cool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeatLevel::Overheated => "OVERHEATED",
            HeatLevel::Warm => "WARM",
            HeatLevel::Neutral => "NEUTRAL",
            HeatLevel::Cool => "COOL",
        }
    }
}

/// Price trend direction from daily percent change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    StrongUp,
    Up,
    Stable,
    Down,
    StrongDown,
}

impl Trend {
    pub fn from_change(change_percent: Option<f64>) -> Self {
        match change_percent {
            None => Trend::Stable,
            Some(c) if c >= 3.0 => Trend::StrongUp,
            Some(c) if c >= 1.0 => Trend::Up,
            Some(c) if c >= -1.0 => Trend::Stable,
            Some(c) if c >= -3.0 => Trend::Down,
            Some(_) => Trend::StrongDown,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STRONG_UP" => Some(Trend::StrongUp),
            "UP" => Some(Trend::Up),
            "STABLE" => Some(Trend::Stable),
            "DOWN" => Some(Trend::Down),
            "STRONG_DOWN" => Some(Trend::StrongDown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::StrongUp => "STRONG_UP",
            Trend::Up => "UP",
            Trend::Stable => "STABLE",
            Trend::Down => "DOWN",
            Trend::StrongDown => "STRONG_DOWN",
        }
    }
}

/// Rough market-cap bucket estimated from price x volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketCapBucket {
    Large,
    Mid,
    Small,
    Micro,
    Unknown,
}

impl MarketCapBucket {
    pub fn from_snapshot(price: Option<f64>, volume: Option<i64>) -> Self {
        let (price, volume) = match (price, volume) {
            (Some(p), Some(v)) => (p, v),
            _ => return MarketCapBucket::Unknown,
        };
        let notional = price * volume as f64;
        if notional > 1e13 {
            MarketCapBucket::Large
        } else if notional > 1e12 {
            MarketCapBucket::Mid
        } else if notional > 1e11 {
            MarketCapBucket::Small
        } else {
            MarketCapBucket::Micro
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LARGE" => Some(MarketCapBucket::Large),
            "MID" => Some(MarketCapBucket::Mid),
            "SMALL" => Some(MarketCapBucket::Small),
            "MICRO" => Some(MarketCapBucket::Micro),
            "UNKNOWN" => Some(MarketCapBucket::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCapBucket::Large => "LARGE",
            MarketCapBucket::Mid => "MID",
            MarketCapBucket::Small => "SMALL",
            MarketCapBucket::Micro => "MICRO",
            MarketCapBucket::Unknown => "UNKNOWN",
        }
    }
}

/// Full scoring output for one stock snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatScores {
    pub price_score: f64,
    pub volume_score: f64,
    pub sentiment_score: f64,
    pub retail_flow_score: f64,
    pub buzz_score: f64,
    pub heat_score: f64,
    pub heat_level: HeatLevel,
    pub trend: Trend,
    pub trend_strength: f64,
    pub market_cap: MarketCapBucket,
}

/// Recommendation action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

/// Buy/sell/hold call for one stock, derived on demand
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub action: Action,
    pub reason: String,
    pub confidence: f64,
    pub current_price: Option<f64>,
    pub change_percent: Option<f64>,
    pub heat_score: f64,
    pub target_price: Decimal,
}

/// One row of the heat map: stock identity plus its metric for a date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatMapEntry {
    pub stock_id: i64,
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub exchange: String,
    pub current_price: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<i64>,
    pub price_score: f64,
    pub volume_score: f64,
    pub sentiment_score: f64,
    pub retail_flow_score: f64,
    pub buzz_score: f64,
    pub heat_score: f64,
    pub heat_level: HeatLevel,
    pub trend: Trend,
    pub trend_strength: f64,
    pub market_cap_category: MarketCapBucket,
    pub sentiment_classification: SentimentClassification,
    pub ai_reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_headlines: Option<Vec<NewsHeadline>>,
    pub last_updated: DateTime<Utc>,
}
