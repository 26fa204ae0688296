use heat_core::{HeatLevel, HeatMapEntry};
use heat_engine::round2;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Entries listed under topOverheated
const TOP_OVERHEATED_LIMIT: usize = 5;

/// Aggregate view of one day's heat map
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatSummary {
    pub total_stocks: usize,
    pub overheated: usize,
    pub warm: usize,
    pub neutral: usize,
    pub cool: usize,
    pub avg_heat_score: f64,
    pub top_overheated: Vec<HeatMapEntry>,
}

/// Count heat levels and average the scores of a heat map. Entries are
/// expected hottest-first, so the overheated list keeps that order.
pub fn summarize(entries: &[HeatMapEntry]) -> HeatSummary {
    let count = |level: HeatLevel| entries.iter().filter(|e| e.heat_level == level).count();

    let scores: Vec<f64> = entries.iter().map(|e| e.heat_score).collect();
    let avg_heat_score = if scores.is_empty() {
        0.0
    } else {
        round2(scores.mean())
    };

    HeatSummary {
        total_stocks: entries.len(),
        overheated: count(HeatLevel::Overheated),
        warm: count(HeatLevel::Warm),
        neutral: count(HeatLevel::Neutral),
        cool: count(HeatLevel::Cool),
        avg_heat_score,
        top_overheated: entries
            .iter()
            .filter(|e| e.heat_level == HeatLevel::Overheated)
            .take(TOP_OVERHEATED_LIMIT)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use heat_core::{MarketCapBucket, SentimentClassification, Trend};

    fn entry(symbol: &str, heat_score: f64) -> HeatMapEntry {
        HeatMapEntry {
            stock_id: 1,
            symbol: symbol.to_string(),
            name: format!("{symbol} Ltd"),
            sector: "IT".to_string(),
            exchange: "NSE".to_string(),
            current_price: Some(1000.0),
            change_percent: Some(1.0),
            volume: Some(1_000_000),
            price_score: 45.0,
            volume_score: 60.0,
            sentiment_score: 50.0,
            retail_flow_score: 55.0,
            buzz_score: 50.0,
            heat_score,
            heat_level: HeatLevel::from_score(heat_score),
            trend: Trend::Up,
            trend_strength: 50.0,
            market_cap_category: MarketCapBucket::Mid,
            sentiment_classification: SentimentClassification::Neutral,
            ai_reasoning: None,
            news_headlines: None,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn counts_levels_and_averages_scores() {
        let entries = vec![
            entry("A", 80.0),
            entry("B", 76.0),
            entry("C", 60.0),
            entry("D", 40.0),
            entry("E", 20.0),
        ];

        let summary = summarize(&entries);
        assert_eq!(summary.total_stocks, 5);
        assert_eq!(summary.overheated, 2);
        assert_eq!(summary.warm, 1);
        assert_eq!(summary.neutral, 1);
        assert_eq!(summary.cool, 1);
        assert_eq!(summary.avg_heat_score, 55.2);
        assert_eq!(summary.top_overheated.len(), 2);
        assert_eq!(summary.top_overheated[0].symbol, "A");
    }

    #[test]
    fn top_overheated_is_capped() {
        let entries: Vec<HeatMapEntry> = (0..7).map(|i| entry(&format!("S{i}"), 90.0)).collect();

        let summary = summarize(&entries);
        assert_eq!(summary.overheated, 7);
        assert_eq!(summary.top_overheated.len(), 5);
    }

    #[test]
    fn empty_map_summarizes_to_zeroes() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_stocks, 0);
        assert_eq!(summary.avg_heat_score, 0.0);
        assert!(summary.top_overheated.is_empty());
    }
}
