use async_trait::async_trait;
use heat_core::{HeatError, Quote, QuoteSource};
use reqwest::Client;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const MAX_RETRIES: u32 = 3;
const INITIAL_DELAY_MS: u64 = 1000;

/// Yahoo Finance chart API adapter. Free and unauthenticated, so it sits
/// first in the gateway's fallback chain.
pub struct YahooQuotes {
    client: Client,
}

impl YahooQuotes {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn try_fetch(&self, symbol: &str, provider_symbol: &str) -> Result<Quote, HeatError> {
        let url = format!(
            "{}/{}?interval=1d&range=1d",
            CHART_URL, provider_symbol
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HeatError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HeatError::ProviderUnavailable(format!(
                "HTTP {} from Yahoo for {}",
                response.status(),
                provider_symbol
            )));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| HeatError::ParseError(e.to_string()))?;

        let meta = chart
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0).meta)
                }
            })
            .ok_or_else(|| {
                HeatError::ParseError(format!("empty chart result for {}", provider_symbol))
            })?;

        let price_f64 = meta
            .regular_market_price
            .filter(|p| *p > 0.0)
            .ok_or_else(|| {
                HeatError::InvalidQuote(format!("missing price for {}", provider_symbol))
            })?;
        let price = Decimal::from_f64(price_f64).ok_or_else(|| {
            HeatError::InvalidQuote(format!("unrepresentable price for {}", provider_symbol))
        })?;

        let change_percent = match meta.previous_close {
            Some(prev) if prev > 0.0 => {
                let change = (price_f64 - prev) / prev * 100.0;
                (change * 100.0).round() / 100.0
            }
            _ => 0.0,
        };

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            previous_close: meta.previous_close.and_then(Decimal::from_f64),
            change_percent: Some(change_percent),
            volume: meta.regular_market_volume,
        })
    }
}

impl Default for YahooQuotes {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteSource for YahooQuotes {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_quote(&self, symbol: &str, exchange: &str) -> Result<Quote, HeatError> {
        let provider_symbol = to_yahoo_symbol(symbol, exchange);

        for attempt in 0..MAX_RETRIES {
            match self.try_fetch(symbol, &provider_symbol).await {
                Ok(quote) => return Ok(quote),
                Err(e) => {
                    tracing::debug!(
                        "Yahoo attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        MAX_RETRIES,
                        provider_symbol,
                        e
                    );
                    if attempt < MAX_RETRIES - 1 {
                        let delay = INITIAL_DELAY_MS * 2u64.pow(attempt);
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        Err(HeatError::ProviderUnavailable(format!(
            "Yahoo failed for {} after {} attempts",
            provider_symbol, MAX_RETRIES
        )))
    }
}

/// Exchange-prefixed symbol form the chart API expects for Indian listings
pub fn to_yahoo_symbol(symbol: &str, exchange: &str) -> String {
    match exchange.to_uppercase().as_str() {
        "NSE" => format!("NSE:{}", symbol.to_uppercase()),
        "BSE" => format!("BSE:{}", symbol.to_uppercase()),
        _ => symbol.to_uppercase(),
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<i64>,
}
