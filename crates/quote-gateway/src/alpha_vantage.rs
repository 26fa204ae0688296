use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use heat_core::{HeatError, NewsHeadline, NewsSource, Quote, QuoteSource};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests,
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Need to wait until the oldest request falls out of the window
            let oldest = match ts.front() {
                Some(front) => *front,
                None => return,
            };
            let sleep_dur = match oldest.checked_add(self.window) {
                Some(until) => until.duration_since(now) + Duration::from_millis(50),
                None => Duration::from_millis(50),
            };
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for Alpha Vantage slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Alpha Vantage adapter: GLOBAL_QUOTE for keyed quotes and NEWS_SENTIMENT
/// for headlines. The free tier allows 5 requests per minute.
#[derive(Clone)]
pub struct AlphaVantage {
    api_key: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl AlphaVantage {
    pub fn new(api_key: String) -> Self {
        let rate_limit: usize = std::env::var("ALPHA_VANTAGE_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
        }
    }

    /// Build from ALPHA_VANTAGE_API_KEY; None when the key is not set.
    pub fn from_env() -> Option<Self> {
        match std::env::var("ALPHA_VANTAGE_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Some(Self::new(key)),
            _ => {
                tracing::debug!("ALPHA_VANTAGE_API_KEY not set, Alpha Vantage disabled");
                None
            }
        }
    }
}

#[async_trait]
impl QuoteSource for AlphaVantage {
    fn name(&self) -> &'static str {
        "alphavantage"
    }

    async fn fetch_quote(&self, symbol: &str, exchange: &str) -> Result<Quote, HeatError> {
        let provider_symbol = to_alpha_vantage_symbol(symbol, exchange);
        self.rate_limiter.acquire().await;

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", &provider_symbol),
                ("apikey", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| HeatError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HeatError::ProviderUnavailable(format!(
                "HTTP {} from Alpha Vantage for {}",
                response.status(),
                provider_symbol
            )));
        }

        let body: GlobalQuoteResponse = response
            .json()
            .await
            .map_err(|e| HeatError::ParseError(e.to_string()))?;

        if let Some(msg) = body.error_message {
            return Err(HeatError::ProviderUnavailable(format!(
                "Alpha Vantage error for {}: {}",
                provider_symbol, msg
            )));
        }
        if let Some(info) = body.information {
            // The free tier reports rate-limit exhaustion via this field
            return Err(HeatError::RateLimited(info));
        }

        let raw = body.global_quote.ok_or_else(|| {
            HeatError::ParseError(format!("no Global Quote for {}", provider_symbol))
        })?;

        let price = raw
            .price
            .as_deref()
            .and_then(parse_decimal)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| {
                HeatError::InvalidQuote(format!("missing price for {}", provider_symbol))
            })?;

        let previous_close = raw.previous_close.as_deref().and_then(parse_decimal);

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            previous_close: previous_close.or(Some(price)),
            change_percent: raw.change_percent.as_deref().and_then(parse_change_percent),
            volume: raw
                .volume
                .as_deref()
                .and_then(|v| v.trim().parse::<i64>().ok()),
        })
    }
}

#[async_trait]
impl NewsSource for AlphaVantage {
    async fn fetch_headlines(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, HeatError> {
        let ticker = to_news_ticker(symbol);
        self.rate_limiter.acquire().await;

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", &ticker),
                ("limit", &limit.to_string()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| HeatError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HeatError::ProviderUnavailable(format!(
                "HTTP {} from Alpha Vantage news for {}",
                response.status(),
                ticker
            )));
        }

        let items: Vec<AvNewsItem> = response
            .json()
            .await
            .map_err(|e| HeatError::ParseError(e.to_string()))?;

        let headlines: Vec<NewsHeadline> = items
            .into_iter()
            .filter_map(|item| {
                let title = item.title.filter(|t| !t.trim().is_empty())?;
                let score = item.overall_sentiment_score.as_ref().and_then(|v| match v {
                    serde_json::Value::Number(n) => n.as_f64(),
                    serde_json::Value::String(s) => s.parse().ok(),
                    _ => None,
                });
                Some(NewsHeadline {
                    title,
                    url: item.url,
                    source: item.source.or_else(|| Some("Unknown".to_string())),
                    summary: item.summary,
                    published_at: item
                        .time_published
                        .as_deref()
                        .map(parse_timestamp)
                        .unwrap_or_else(Utc::now),
                    sentiment_score: score,
                    sentiment_label: Some(sentiment_label(score).to_string()),
                })
            })
            .collect();

        tracing::debug!("Fetched {} news headlines for {}", headlines.len(), ticker);
        Ok(headlines)
    }
}

/// Exchange-suffixed symbol form: RELIANCE.NSE, 500325.BSE
pub fn to_alpha_vantage_symbol(symbol: &str, exchange: &str) -> String {
    match exchange.to_uppercase().as_str() {
        "BSE" => format!("{}.BSE", symbol.to_uppercase()),
        "NSE" => format!("{}.NSE", symbol.to_uppercase()),
        _ => symbol.to_uppercase(),
    }
}

/// News tickers take the bare symbol with any exchange suffix stripped
pub fn to_news_ticker(symbol: &str) -> String {
    match symbol.find('.') {
        Some(idx) => symbol[..idx].to_string(),
        None => symbol.to_uppercase(),
    }
}

/// Map a raw [-1, 1] article sentiment score to the provider's label scale
pub fn sentiment_label(score: Option<f64>) -> &'static str {
    match score {
        None => "NEUTRAL",
        Some(s) if s >= 0.35 => "BULLISH",
        Some(s) if s >= 0.15 => "SOMEWHAT_BULLISH",
        Some(s) if s > -0.15 => "NEUTRAL",
        Some(s) if s > -0.35 => "SOMEWHAT_BEARISH",
        Some(_) => "BEARISH",
    }
}

/// Parse Alpha Vantage's "20240515T143000" timestamp format; unparseable
/// values fall back to now.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.get(0..15)
        .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S").ok())
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn parse_change_percent(raw: &str) -> Option<f64> {
    raw.trim().trim_end_matches('%').trim().parse().ok()
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvNewsItem {
    title: Option<String>,
    url: Option<String>,
    source: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    time_published: Option<String>,
    #[serde(default)]
    overall_sentiment_score: Option<serde_json::Value>,
}
