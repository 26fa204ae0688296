use heat_core::{HeatLevel, HeatScores, MarketCapBucket, Trend};

/// Weight of each component in the combined heat score
const PRICE_WEIGHT: f64 = 0.30;
const VOLUME_WEIGHT: f64 = 0.30;
const SENTIMENT_WEIGHT: f64 = 0.40;

/// Price/change/volume snapshot for one stock, as the gateway produced it
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketSnapshot {
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<i64>,
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price tier score. Missing price scores 50.
pub fn price_score(price: Option<f64>) -> f64 {
    match price {
        None => 50.0,
        Some(p) if p <= 100.0 => 20.0,
        Some(p) if p <= 500.0 => 35.0,
        Some(p) if p <= 1_000.0 => 45.0,
        Some(p) if p <= 2_000.0 => 55.0,
        Some(p) if p <= 5_000.0 => 70.0,
        Some(p) if p <= 10_000.0 => 80.0,
        Some(p) if p <= 20_000.0 => 90.0,
        Some(_) => 95.0,
    }
}

/// Volume tier score. Missing or non-positive volume scores 30.
pub fn volume_score(volume: Option<i64>) -> f64 {
    match volume {
        None => 30.0,
        Some(v) if v <= 0 => 30.0,
        Some(v) if v < 100_000 => 15.0,
        Some(v) if v < 500_000 => 30.0,
        Some(v) if v < 1_000_000 => 45.0,
        Some(v) if v < 5_000_000 => 60.0,
        Some(v) if v < 10_000_000 => 75.0,
        Some(v) if v < 50_000_000 => 85.0,
        Some(_) => 95.0,
    }
}

/// How pronounced the daily move is, regardless of direction
pub fn trend_strength(change_percent: Option<f64>) -> f64 {
    let c = match change_percent {
        Some(c) => c.abs(),
        None => return 50.0,
    };
    if c >= 10.0 {
        95.0
    } else if c >= 5.0 {
        80.0
    } else if c >= 3.0 {
        65.0
    } else if c >= 1.0 {
        50.0
    } else if c >= 0.5 {
        35.0
    } else {
        20.0
    }
}

/// Combined heat score from raw price, raw volume, and a 0-100 sentiment
/// score. Missing inputs take the tier-table defaults, so the result is
/// always a finite value in [0, 100].
pub fn compute_heat(price: Option<f64>, volume: Option<i64>, sentiment_score: f64) -> f64 {
    let combined = PRICE_WEIGHT * price_score(price)
        + VOLUME_WEIGHT * volume_score(volume)
        + SENTIMENT_WEIGHT * sentiment_score;
    round2(combined)
}

/// Score one snapshot end to end: component tiers, combined heat, level,
/// trend, and the derived retail-flow/buzz scores.
pub fn evaluate(snapshot: MarketSnapshot, sentiment_score: f64) -> HeatScores {
    let price_score = price_score(snapshot.price);
    let volume_score = volume_score(snapshot.volume);
    let heat_score = compute_heat(snapshot.price, snapshot.volume, sentiment_score);

    HeatScores {
        price_score,
        volume_score,
        sentiment_score,
        retail_flow_score: round2((volume_score + sentiment_score) / 2.0),
        buzz_score: sentiment_score,
        heat_score,
        heat_level: HeatLevel::from_score(heat_score),
        trend: Trend::from_change(snapshot.change_percent),
        trend_strength: trend_strength(snapshot.change_percent),
        market_cap: MarketCapBucket::from_snapshot(snapshot.price, snapshot.volume),
    }
}
