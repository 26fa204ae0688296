use heat_core::{Action, Recommendation};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Stock facts the decision table runs over
#[derive(Debug, Clone)]
pub struct StockProfile {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub current_price: Option<f64>,
    pub change_percent: Option<f64>,
    pub pe_ratio: Option<f64>,
}

/// Derive a buy/sell/hold call from percent change, P/E, and heat score.
/// First matching rule wins; missing change defaults to 0, missing P/E to 20.
pub fn recommend(stock: &StockProfile, heat_score: f64) -> Recommendation {
    let change = stock.change_percent.unwrap_or(0.0);
    let pe = stock.pe_ratio.unwrap_or(20.0);

    let (action, confidence, reason) = if change > 15.0 && heat_score > 60.0 {
        (
            Action::Sell,
            75.0,
            "Stock is overheated with high retail/FOMO flow. Consider booking profits.",
        )
    } else if change > 20.0 {
        (
            Action::Hold,
            55.0,
            "Strong run-up; wait for pullback before adding.",
        )
    } else if change < -10.0 && heat_score < 40.0 {
        (
            Action::Buy,
            70.0,
            "Price correction with low emotional flow. Potential value.",
        )
    } else if pe < 15.0 && change < 5.0 {
        (Action::Buy, 65.0, "Reasonable valuation and stable price.")
    } else if pe > 40.0 && change > 10.0 {
        (
            Action::Sell,
            68.0,
            "High PE and extended price. Risk of correction.",
        )
    } else if (5.0..15.0).contains(&change) {
        (Action::Hold, 58.0, "Moderate momentum. Hold existing position.")
    } else {
        (Action::Hold, 50.0, "Neutral momentum and valuation.")
    };

    Recommendation {
        symbol: stock.symbol.clone(),
        name: stock.name.clone(),
        sector: stock.sector.clone(),
        action,
        reason: reason.to_string(),
        confidence,
        current_price: stock.current_price,
        change_percent: stock.change_percent,
        heat_score,
        target_price: target_price(stock.current_price, action),
    }
}

/// Target price = current price x a fixed per-action factor, rounded to
/// 2 decimals half-up. Missing price yields 0.
pub fn target_price(current_price: Option<f64>, action: Action) -> Decimal {
    let price = current_price
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO);
    let factor = match action {
        Action::Buy => dec!(1.10),
        Action::Sell => dec!(0.95),
        Action::Hold => dec!(1.00),
    };
    (price * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(change: Option<f64>, pe: Option<f64>) -> StockProfile {
        StockProfile {
            symbol: "RELIANCE".to_string(),
            name: "Reliance Industries".to_string(),
            sector: "Energy".to_string(),
            current_price: Some(2450.0),
            change_percent: change,
            pe_ratio: pe,
        }
    }

    #[test]
    fn overheated_runup_is_a_sell() {
        let rec = recommend(&profile(Some(18.0), Some(25.0)), 65.0);
        assert_eq!(rec.action, Action::Sell);
        assert_eq!(rec.confidence, 75.0);
    }

    #[test]
    fn correction_with_low_heat_is_a_buy() {
        let rec = recommend(&profile(Some(-15.0), Some(25.0)), 20.0);
        assert_eq!(rec.action, Action::Buy);
        assert_eq!(rec.confidence, 70.0);
    }

    #[test]
    fn cheap_stable_stock_is_a_buy() {
        let rec = recommend(&profile(Some(3.0), Some(10.0)), 50.0);
        assert_eq!(rec.action, Action::Buy);
        assert_eq!(rec.confidence, 65.0);
    }

    #[test]
    fn expensive_extended_stock_is_a_sell() {
        let rec = recommend(&profile(Some(12.0), Some(45.0)), 50.0);
        assert_eq!(rec.action, Action::Sell);
        assert_eq!(rec.confidence, 68.0);
    }

    #[test]
    fn moderate_momentum_holds() {
        let rec = recommend(&profile(Some(7.0), Some(25.0)), 50.0);
        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.confidence, 58.0);
    }

    #[test]
    fn missing_inputs_default_to_neutral_hold() {
        let rec = recommend(&profile(None, None), 50.0);
        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.confidence, 50.0);
        assert_eq!(rec.reason, "Neutral momentum and valuation.");
    }

    #[test]
    fn target_price_scales_with_action() {
        assert_eq!(target_price(Some(100.0), Action::Buy), dec!(110.00));
        assert_eq!(target_price(Some(100.0), Action::Sell), dec!(95.00));
        assert_eq!(target_price(Some(100.0), Action::Hold), dec!(100.00));
        assert_eq!(target_price(None, Action::Buy), Decimal::ZERO);
    }

    #[test]
    fn target_price_rounds_half_up() {
        // 333.45 * 0.95 = 316.7775 -> 316.78
        assert_eq!(target_price(Some(333.45), Action::Sell), dec!(316.78));
    }
}
