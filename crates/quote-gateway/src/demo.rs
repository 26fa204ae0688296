use chrono::{Duration, Utc};
use heat_core::{NewsHeadline, Quote};
use rust_decimal::prelude::*;
use std::collections::HashMap;

/// Baseline NSE quotes used when every live source fails for a known symbol
const DEMO_QUOTES: &[(&str, f64, f64, i64)] = &[
    ("SUNPHARMA", 1520.50, 2.35, 8_540_000),
    ("TITAN", 3850.75, 1.85, 12_500_000),
    ("HDFCBANK", 1680.25, 0.95, 15_200_000),
    ("RELIANCE", 2950.50, 1.25, 18_200_000),
    ("HINDUNILVR", 2450.00, 0.75, 8_900_000),
    ("LT", 3750.80, 1.55, 6_500_000),
    ("TCS", 4120.30, 2.10, 9_800_000),
    ("INFY", 1520.45, 1.45, 11_200_000),
    ("ICICIBANK", 1020.50, 1.15, 15_600_000),
    ("SBIN", 765.80, 0.65, 18_500_000),
    ("BHARTIARTL", 1420.50, 2.90, 3_500_000),
    ("ITC", 465.75, 1.53, 12_000_000),
    ("KOTAKBANK", 1780.25, 1.43, 2_500_000),
    ("AXISBANK", 1180.50, 2.61, 6_000_000),
    ("ASIANPAINT", 2850.00, 2.52, 800_000),
    ("MARUTI", 12500.00, 2.46, 450_000),
    ("WIPRO", 480.25, 3.23, 8_500_000),
    ("ULTRACEMCO", 9850.00, 1.34, 350_000),
    ("BAJFINANCE", 6850.00, 1.94, 850_000),
    ("NESTLEIND", 2450.00, 1.24, 120_000),
];

/// Read-only demo quote table owned by the gateway
pub struct DemoQuotes {
    quotes: HashMap<&'static str, (f64, f64, i64)>,
}

impl DemoQuotes {
    pub fn new() -> Self {
        Self {
            quotes: DEMO_QUOTES
                .iter()
                .map(|(symbol, price, change, volume)| (*symbol, (*price, *change, *volume)))
                .collect(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<Quote> {
        let (price, change, volume) = self.quotes.get(symbol.to_uppercase().as_str())?;
        Some(Quote {
            symbol: symbol.to_uppercase(),
            price: Decimal::from_f64(*price)?,
            previous_close: None,
            change_percent: Some(*change),
            volume: Some(*volume),
        })
    }
}

impl Default for DemoQuotes {
    fn default() -> Self {
        Self::new()
    }
}

/// Static display headlines for the with-news payload, keyed by symbol with
/// a generic default. Never fed into sentiment scoring.
pub fn demo_news(symbol: &str) -> Vec<NewsHeadline> {
    let now = Utc::now();
    let headline = |title: &str, source: &str, hours_ago: i64, score: f64, label: &str| {
        NewsHeadline {
            title: title.to_string(),
            url: Some("#".to_string()),
            source: Some(source.to_string()),
            summary: None,
            published_at: now - Duration::hours(hours_ago),
            sentiment_score: Some(score),
            sentiment_label: Some(label.to_string()),
        }
    };

    match symbol.to_uppercase().as_str() {
        "RELIANCE" => vec![
            headline("Reliance Industries Q4 Results Beat Street Estimates", "ET", 2, 0.45, "BULLISH"),
            headline("Reliance Jio Adds 5 Million New Subscribers", "LiveMint", 6, 0.35, "BULLISH"),
            headline("Retail Business Drives Growth for Reliance in FY24", "Business Standard", 12, 0.25, "SOMEWHAT_BULLISH"),
        ],
        "HDFCBANK" => vec![
            headline("HDFC Bank Reports Strong Q4 Profit Growth", "Economic Times", 1, 0.40, "BULLISH"),
            headline("Digital Banking Initiatives Boost HDFC Bank's Customer Base", "Moneycontrol", 5, 0.30, "SOMEWHAT_BULLISH"),
            headline("HDFC Bank Maintains Steady Asset Quality in Q4", "Business Today", 8, 0.20, "NEUTRAL"),
        ],
        "TCS" => vec![
            headline("TCS Wins Multi-Year Digital Transformation Contract", "Press Trust of India", 3, 0.50, "BULLISH"),
            headline("TCS Announces New AI Platform for Enterprise Clients", "LiveMint", 7, 0.55, "BULLISH"),
            headline("Global IT Spending Outlook Positive for TCS in 2024", "Financial Express", 14, 0.25, "SOMEWHAT_BULLISH"),
        ],
        "INFY" => vec![
            headline("Infosys Launches New Cloud Services Platform", "Economic Times", 2, 0.42, "BULLISH"),
            headline("Infosys Q4 Earnings Meet Analyst Expectations", "Business Standard", 8, 0.15, "NEUTRAL"),
            headline("European Market Growth Drives Infosys Revenue", "Moneycontrol", 16, 0.28, "SOMEWHAT_BULLISH"),
        ],
        "SUNPHARMA" => vec![
            headline("Sun Pharma's New Drug Gets FDA Approval", "Economic Times", 1, 0.60, "BULLISH"),
            headline("US Market Expansion Plan Announced by Sun Pharma", "Business Today", 6, 0.35, "SOMEWHAT_BULLISH"),
            headline("Sun Pharma Reports Strong Q4 Performance", "LiveMint", 10, 0.25, "SOMEWHAT_BULLISH"),
        ],
        "TITAN" => vec![
            headline("Titan's Jewellery Sales Surge During Wedding Season", "Economic Times", 2, 0.48, "BULLISH"),
            headline("Titan Expands Store Network in Tier-2 Cities", "Financial Express", 7, 0.30, "SOMEWHAT_BULLISH"),
            headline("Watch Segment Growth Continues for Titan", "Business Standard", 13, 0.22, "NEUTRAL"),
        ],
        "HINDUNILVR" => vec![
            headline("HUL Launches New Premium Skincare Range", "LiveMint", 3, 0.35, "SOMEWHAT_BULLISH"),
            headline("Rural Demand Recovery Helps HUL in Q4", "Business Today", 9, 0.25, "NEUTRAL"),
            headline("HUL's Digital Commerce Strategy Shows Results", "Moneycontrol", 15, 0.20, "NEUTRAL"),
        ],
        "ICICIBANK" => vec![
            headline("ICICI Bank Reports Record Q4 Profit", "Economic Times", 1, 0.42, "BULLISH"),
            headline("Digital Banking Leads ICICI Bank's Growth Story", "LiveMint", 5, 0.32, "SOMEWHAT_BULLISH"),
            headline("ICICI Bank Maintains Healthy Loan Growth", "Business Standard", 11, 0.25, "SOMEWHAT_BULLISH"),
        ],
        _ => vec![
            headline("Stock Shows Mixed Trading Patterns Today", "Reuters", 2, 0.10, "NEUTRAL"),
            headline("Sector Performance Remains Cautious", "Bloomberg", 5, 0.05, "NEUTRAL"),
            headline("Investors Await Quarterly Results Season", "CNBC", 8, 0.15, "NEUTRAL"),
        ],
    }
}
