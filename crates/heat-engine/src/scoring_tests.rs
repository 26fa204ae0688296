#[cfg(test)]
mod tests {
    use super::super::scoring::*;
    use heat_core::{HeatLevel, MarketCapBucket, Trend};

    #[test]
    fn high_price_high_volume_hyped_stock_is_overheated() {
        let heat = compute_heat(Some(1_000_000.0), Some(60_000_000), 90.0);
        assert_eq!(heat, 93.0);
        assert_eq!(HeatLevel::from_score(heat), HeatLevel::Overheated);
    }

    #[test]
    fn cheap_illiquid_neutral_stock_is_cool() {
        let heat = compute_heat(Some(50.0), Some(50_000), 50.0);
        assert_eq!(heat, 30.5);
        assert_eq!(HeatLevel::from_score(heat), HeatLevel::Cool);
    }

    #[test]
    fn price_tiers() {
        assert_eq!(price_score(None), 50.0);
        assert_eq!(price_score(Some(100.0)), 20.0);
        assert_eq!(price_score(Some(100.01)), 35.0);
        assert_eq!(price_score(Some(500.0)), 35.0);
        assert_eq!(price_score(Some(1_000.0)), 45.0);
        assert_eq!(price_score(Some(2_000.0)), 55.0);
        assert_eq!(price_score(Some(5_000.0)), 70.0);
        assert_eq!(price_score(Some(10_000.0)), 80.0);
        assert_eq!(price_score(Some(20_000.0)), 90.0);
        assert_eq!(price_score(Some(20_000.01)), 95.0);
    }

    #[test]
    fn volume_tiers() {
        assert_eq!(volume_score(None), 30.0);
        assert_eq!(volume_score(Some(0)), 30.0);
        assert_eq!(volume_score(Some(-5)), 30.0);
        assert_eq!(volume_score(Some(99_999)), 15.0);
        assert_eq!(volume_score(Some(100_000)), 30.0);
        assert_eq!(volume_score(Some(500_000)), 45.0);
        assert_eq!(volume_score(Some(1_000_000)), 60.0);
        assert_eq!(volume_score(Some(5_000_000)), 75.0);
        assert_eq!(volume_score(Some(10_000_000)), 85.0);
        assert_eq!(volume_score(Some(50_000_000)), 95.0);
    }

    #[test]
    fn trend_strength_tiers() {
        assert_eq!(trend_strength(None), 50.0);
        assert_eq!(trend_strength(Some(12.0)), 95.0);
        assert_eq!(trend_strength(Some(-12.0)), 95.0);
        assert_eq!(trend_strength(Some(5.0)), 80.0);
        assert_eq!(trend_strength(Some(3.0)), 65.0);
        assert_eq!(trend_strength(Some(1.0)), 50.0);
        assert_eq!(trend_strength(Some(0.5)), 35.0);
        assert_eq!(trend_strength(Some(0.2)), 20.0);
    }

    #[test]
    fn heat_score_stays_in_bounds() {
        let prices = [None, Some(0.01), Some(50.0), Some(999.0), Some(25_000.0)];
        let volumes = [None, Some(0), Some(10), Some(750_000), Some(90_000_000)];
        let sentiments = [0.0, 25.0, 50.0, 75.0, 100.0];

        for price in prices {
            for volume in volumes {
                for sentiment in sentiments {
                    let heat = compute_heat(price, volume, sentiment);
                    assert!(heat.is_finite());
                    assert!((0.0..=100.0).contains(&heat), "heat {} out of range", heat);
                }
            }
        }
    }

    #[test]
    fn evaluate_fills_all_scores() {
        let snapshot = MarketSnapshot {
            price: Some(2_950.50),
            change_percent: Some(1.25),
            volume: Some(18_200_000),
        };
        let scores = evaluate(snapshot, 62.0);

        assert_eq!(scores.price_score, 70.0);
        assert_eq!(scores.volume_score, 85.0);
        assert_eq!(scores.sentiment_score, 62.0);
        assert_eq!(scores.buzz_score, 62.0);
        assert_eq!(scores.retail_flow_score, 73.5);
        assert_eq!(scores.heat_score, round2(0.3 * 70.0 + 0.3 * 85.0 + 0.4 * 62.0));
        assert_eq!(scores.heat_level, HeatLevel::Warm);
        assert_eq!(scores.trend, Trend::Up);
        assert_eq!(scores.trend_strength, 50.0);
        assert_eq!(scores.market_cap, MarketCapBucket::Micro);
    }

    #[test]
    fn evaluate_with_empty_snapshot_uses_defaults() {
        let scores = evaluate(MarketSnapshot::default(), 50.0);

        assert_eq!(scores.price_score, 50.0);
        assert_eq!(scores.volume_score, 30.0);
        assert_eq!(scores.heat_score, 44.0);
        assert_eq!(scores.heat_level, HeatLevel::Neutral);
        assert_eq!(scores.trend, Trend::Stable);
        assert_eq!(scores.trend_strength, 50.0);
        assert_eq!(scores.market_cap, MarketCapBucket::Unknown);
    }
}
