//! Market-wide breadth figures derived from the stored stock universe:
//! top gainers/losers/most-active lists and an advance-decline summary.

use chrono::{DateTime, Utc};
use heat_engine::round2;
use heat_store::Stock;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// Rows per movers list
const MOVERS_LIMIT: usize = 5;

/// Overall market direction from average change and breadth sentiment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketTrend {
    Bullish,
    SlightlyBullish,
    Neutral,
    SlightlyBearish,
    Bearish,
}

impl MarketTrend {
    pub fn from_signals(avg_change: f64, sentiment: f64) -> Self {
        if avg_change > 1.5 && sentiment > 60.0 {
            MarketTrend::Bullish
        } else if avg_change < -1.5 && sentiment < 40.0 {
            MarketTrend::Bearish
        } else if avg_change > 0.5 && sentiment > 55.0 {
            MarketTrend::SlightlyBullish
        } else if avg_change < -0.5 && sentiment < 45.0 {
            MarketTrend::SlightlyBearish
        } else {
            MarketTrend::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketTrend::Bullish => "BULLISH",
            MarketTrend::SlightlyBullish => "SLIGHTLY_BULLISH",
            MarketTrend::Neutral => "NEUTRAL",
            MarketTrend::SlightlyBearish => "SLIGHTLY_BEARISH",
            MarketTrend::Bearish => "BEARISH",
        }
    }
}

/// One stock in a movers list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoverEntry {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub exchange: String,
    pub current_price: f64,
    pub change_percent: Option<f64>,
    pub volume: Option<i64>,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<f64>,
}

/// Advance-decline snapshot over a set of stocks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub total_stocks: usize,
    pub advancing: usize,
    pub declining: usize,
    pub avg_change: f64,
    pub market_sentiment: f64,
    pub trend: MarketTrend,
    pub last_updated: DateTime<Utc>,
}

/// Gainers, losers and most-active lists with a summary of the same set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMovers {
    pub top_gainers: Vec<MoverEntry>,
    pub top_losers: Vec<MoverEntry>,
    pub most_active: Vec<MoverEntry>,
    pub summary: MarketSummary,
}

/// Movers lists over the stocks that have a daily change. The attached
/// summary covers that same filtered set.
pub fn market_movers(stocks: &[Stock]) -> MarketMovers {
    let tradable: Vec<&Stock> = stocks
        .iter()
        .filter(|s| s.change_percent.is_some())
        .collect();

    let mut gainers = tradable.clone();
    gainers.sort_by(|a, b| cmp_desc(a.change_percent, b.change_percent));

    let mut losers = tradable.clone();
    losers.sort_by(|a, b| cmp_desc(b.change_percent, a.change_percent));

    let mut active: Vec<&Stock> = tradable
        .iter()
        .copied()
        .filter(|s| s.volume.is_some())
        .collect();
    active.sort_by(|a, b| b.volume.cmp(&a.volume));

    MarketMovers {
        top_gainers: top(&gainers),
        top_losers: top(&losers),
        most_active: top(&active),
        summary: summarize(&tradable),
    }
}

/// Advance-decline summary over the whole stock universe, including stocks
/// with no recorded change
pub fn market_summary(stocks: &[Stock]) -> MarketSummary {
    summarize(&stocks.iter().collect::<Vec<_>>())
}

fn summarize(stocks: &[&Stock]) -> MarketSummary {
    if stocks.is_empty() {
        return MarketSummary {
            total_stocks: 0,
            advancing: 0,
            declining: 0,
            avg_change: 0.0,
            market_sentiment: 50.0,
            trend: MarketTrend::Neutral,
            last_updated: Utc::now(),
        };
    }

    let advancing = stocks
        .iter()
        .filter(|s| s.change_percent.is_some_and(|c| c > 0.0))
        .count();
    let declining = stocks
        .iter()
        .filter(|s| s.change_percent.is_some_and(|c| c < 0.0))
        .count();

    let changes: Vec<f64> = stocks.iter().filter_map(|s| s.change_percent).collect();
    let avg_change = if changes.is_empty() { 0.0 } else { changes.mean() };

    let sentiment = market_sentiment(advancing, declining, avg_change);

    MarketSummary {
        total_stocks: stocks.len(),
        advancing,
        declining,
        avg_change,
        market_sentiment: sentiment,
        trend: MarketTrend::from_signals(avg_change, sentiment),
        last_updated: Utc::now(),
    }
}

/// Breadth sentiment: 60 points scaled by the advancing share plus a
/// 50-centered average-change term clamped to [0, 100]
fn market_sentiment(advancing: usize, declining: usize, avg_change: f64) -> f64 {
    let moving = advancing + declining;
    if moving == 0 {
        return 50.0;
    }
    let advancing_ratio = advancing as f64 / moving as f64;
    round2(advancing_ratio * 60.0 + (50.0 + avg_change).clamp(0.0, 100.0))
}

fn cmp_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(0.0)
        .partial_cmp(&a.unwrap_or(0.0))
        .unwrap_or(Ordering::Equal)
}

fn top(ranked: &[&Stock]) -> Vec<MoverEntry> {
    ranked.iter().take(MOVERS_LIMIT).map(|s| mover(s)).collect()
}

fn mover(stock: &Stock) -> MoverEntry {
    MoverEntry {
        id: stock.id,
        symbol: stock.symbol.clone(),
        name: stock.name.clone(),
        sector: stock.sector.clone(),
        exchange: stock.exchange.clone(),
        current_price: stock.current_price.unwrap_or(0.0),
        change_percent: stock.change_percent,
        volume: stock.volume,
        pe_ratio: stock.pe_ratio,
        market_cap: stock.market_cap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(id: i64, symbol: &str, change: Option<f64>, volume: Option<i64>) -> Stock {
        Stock {
            id,
            symbol: symbol.to_string(),
            name: format!("{symbol} Ltd"),
            sector: "IT".to_string(),
            exchange: "NSE".to_string(),
            current_price: Some(1000.0),
            previous_close: Some(990.0),
            change_percent: change,
            volume,
            pe_ratio: Some(20.0),
            market_cap: Some(100_000.0),
            volatility: Some(0.012),
            updated_at: None,
        }
    }

    #[test]
    fn movers_rank_gainers_losers_and_active() {
        let stocks = vec![
            stock(1, "A", Some(5.2), Some(1_000_000)),
            stock(2, "B", Some(-3.1), Some(9_000_000)),
            stock(3, "C", Some(2.0), Some(500_000)),
            stock(4, "D", Some(-0.5), Some(3_000_000)),
            stock(5, "E", Some(8.9), Some(200_000)),
            stock(6, "F", Some(1.1), Some(7_000_000)),
        ];

        let movers = market_movers(&stocks);
        assert_eq!(movers.top_gainers.len(), 5);
        assert_eq!(movers.top_gainers[0].symbol, "E");
        assert_eq!(movers.top_gainers[1].symbol, "A");
        assert_eq!(movers.top_losers[0].symbol, "B");
        assert_eq!(movers.top_losers[1].symbol, "D");
        assert_eq!(movers.most_active[0].symbol, "B");
        assert_eq!(movers.most_active[1].symbol, "F");
    }

    #[test]
    fn stocks_without_a_change_stay_out_of_the_lists() {
        let stocks = vec![
            stock(1, "A", Some(1.0), Some(1_000_000)),
            stock(2, "B", None, Some(99_000_000)),
        ];

        let movers = market_movers(&stocks);
        assert_eq!(movers.top_gainers.len(), 1);
        assert_eq!(movers.most_active.len(), 1);
        assert_eq!(movers.summary.total_stocks, 1);

        // The standalone summary still counts the whole universe
        assert_eq!(market_summary(&stocks).total_stocks, 2);
    }

    #[test]
    fn sentiment_combines_breadth_and_average_change() {
        let stocks = vec![
            stock(1, "A", Some(2.0), None),
            stock(2, "B", Some(1.0), None),
            stock(3, "C", Some(3.0), None),
            stock(4, "D", Some(-2.0), None),
        ];

        let summary = market_summary(&stocks);
        assert_eq!(summary.advancing, 3);
        assert_eq!(summary.declining, 1);
        assert!((summary.avg_change - 1.0).abs() < 1e-9);
        // 0.75 * 60 + (50 + 1) = 96
        assert_eq!(summary.market_sentiment, 96.0);
        assert_eq!(summary.trend, MarketTrend::SlightlyBullish);
    }

    #[test]
    fn broad_rally_reads_bullish() {
        let stocks = vec![stock(1, "A", Some(4.0), None), stock(2, "B", Some(2.0), None)];

        let summary = market_summary(&stocks);
        assert_eq!(summary.market_sentiment, 113.0);
        assert_eq!(summary.trend, MarketTrend::Bullish);
    }

    #[test]
    fn deep_selloff_reads_bearish() {
        let stocks = vec![
            stock(1, "A", Some(-12.0), None),
            stock(2, "B", Some(-11.0), None),
            stock(3, "C", Some(-13.0), None),
        ];

        let summary = market_summary(&stocks);
        assert_eq!(summary.market_sentiment, 38.0);
        assert_eq!(summary.trend, MarketTrend::Bearish);
    }

    #[test]
    fn mild_selloff_reads_slightly_bearish() {
        let stocks = vec![stock(1, "A", Some(-8.0), None), stock(2, "B", Some(-4.0), None)];

        let summary = market_summary(&stocks);
        assert_eq!(summary.market_sentiment, 44.0);
        assert_eq!(summary.trend, MarketTrend::SlightlyBearish);
    }

    #[test]
    fn empty_universe_is_neutral() {
        let summary = market_summary(&[]);
        assert_eq!(summary.total_stocks, 0);
        assert_eq!(summary.avg_change, 0.0);
        assert_eq!(summary.market_sentiment, 50.0);
        assert_eq!(summary.trend, MarketTrend::Neutral);
    }

    #[test]
    fn missing_price_serializes_as_zero() {
        let mut s = stock(1, "A", Some(1.0), Some(100));
        s.current_price = None;
        let movers = market_movers(&[s]);
        assert_eq!(movers.top_gainers[0].current_price, 0.0);
    }
}
