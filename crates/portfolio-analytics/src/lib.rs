//! Pure portfolio valuation and allocation math. No I/O; callers join
//! holdings with their stock rows and hand the snapshots in.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Sectors held × this factor, capped at 100
const DIVERSIFICATION_FACTOR: i64 = 20;

/// One holding joined with the stock fields valuation needs
#[derive(Debug, Clone)]
pub struct HoldingSnapshot {
    pub symbol: String,
    pub sector: String,
    pub quantity: i64,
    pub avg_price: f64,
    pub current_price: Option<f64>,
    pub volatility: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub holder_name: String,
    pub total_invested: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub total_holdings: usize,
    pub unique_stocks: usize,
    pub average_return: f64,
    pub best_performer: String,
    pub diversification_score: i64,
    pub risk_score: i64,
    pub sector_allocation: HashMap<String, f64>,
}

impl PortfolioSummary {
    fn empty(holder_name: &str) -> Self {
        Self {
            holder_name: holder_name.to_string(),
            total_invested: 0.0,
            current_value: 0.0,
            profit_loss: 0.0,
            total_holdings: 0,
            unique_stocks: 0,
            average_return: 0.0,
            best_performer: "-".to_string(),
            diversification_score: 0,
            risk_score: 0,
            sector_allocation: HashMap::new(),
        }
    }
}

/// Aggregate a holder's positions into a portfolio summary. An empty
/// holding set yields the all-zero summary.
pub fn summarize(holder_name: &str, holdings: &[HoldingSnapshot]) -> PortfolioSummary {
    if holdings.is_empty() {
        return PortfolioSummary::empty(holder_name);
    }

    let mut total_invested = 0.0;
    let mut current_value = 0.0;
    let mut sector_values: HashMap<String, f64> = HashMap::new();
    let mut unique_stocks: HashSet<&str> = HashSet::new();
    let mut best_performer = "-".to_string();
    let mut best_return = 0.0_f64;

    for holding in holdings {
        // A stock with no live price yet values at cost
        let price = holding.current_price.unwrap_or(holding.avg_price);
        let quantity = holding.quantity as f64;

        let invested = holding.avg_price * quantity;
        let current = price * quantity;
        let return_percent = if holding.avg_price > 0.0 {
            ((price - holding.avg_price) / holding.avg_price) * 100.0
        } else {
            0.0
        };

        total_invested += invested;
        current_value += current;
        unique_stocks.insert(holding.symbol.as_str());

        // Only a position in profit can be the best performer
        if return_percent > best_return {
            best_return = return_percent;
            best_performer = format!("{} ({:.2}%)", holding.symbol, return_percent);
        }

        *sector_values.entry(holding.sector.clone()).or_insert(0.0) += current;
    }

    let profit_loss = current_value - total_invested;
    let average_return = if total_invested > 0.0 {
        round2(((current_value - total_invested) / total_invested) * 100.0)
    } else {
        0.0
    };

    let sector_allocation: HashMap<String, f64> = if current_value > 0.0 {
        sector_values
            .into_iter()
            .map(|(sector, value)| (sector, round2(value / current_value * 100.0)))
            .collect()
    } else {
        HashMap::new()
    };

    let diversification_score =
        (sector_allocation.len() as i64 * DIVERSIFICATION_FACTOR).min(100);

    let risk_sum: f64 = holdings
        .iter()
        .map(|h| h.volatility.unwrap_or(0.0) * 100.0)
        .sum();
    let risk_score = (risk_sum / holdings.len() as f64).clamp(0.0, 100.0) as i64;

    PortfolioSummary {
        holder_name: holder_name.to_string(),
        total_invested,
        current_value,
        profit_loss,
        total_holdings: holdings.len(),
        unique_stocks: unique_stocks.len(),
        average_return,
        best_performer,
        diversification_score,
        risk_score,
        sector_allocation,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(
        symbol: &str,
        sector: &str,
        quantity: i64,
        avg_price: f64,
        current_price: f64,
        volatility: f64,
    ) -> HoldingSnapshot {
        HoldingSnapshot {
            symbol: symbol.to_string(),
            sector: sector.to_string(),
            quantity,
            avg_price,
            current_price: Some(current_price),
            volatility: Some(volatility),
        }
    }

    #[test]
    fn empty_holdings_give_zero_summary() {
        let summary = summarize("Rushil Shah", &[]);
        assert_eq!(summary.holder_name, "Rushil Shah");
        assert_eq!(summary.total_invested, 0.0);
        assert_eq!(summary.current_value, 0.0);
        assert_eq!(summary.profit_loss, 0.0);
        assert_eq!(summary.total_holdings, 0);
        assert_eq!(summary.average_return, 0.0);
        assert_eq!(summary.best_performer, "-");
        assert_eq!(summary.diversification_score, 0);
        assert_eq!(summary.risk_score, 0);
        assert!(summary.sector_allocation.is_empty());
    }

    #[test]
    fn two_equal_sectors_split_fifty_fifty() {
        let holdings = [
            holding("TECHCO", "Tech", 2, 90.0, 100.0, 0.01),
            holding("FINCO", "Finance", 4, 55.0, 50.0, 0.03),
        ];
        let summary = summarize("Shruti", &holdings);

        assert_eq!(summary.current_value, 400.0);
        assert_eq!(summary.sector_allocation.get("Tech"), Some(&50.0));
        assert_eq!(summary.sector_allocation.get("Finance"), Some(&50.0));
        assert_eq!(summary.diversification_score, 40);
        assert_eq!(summary.total_holdings, 2);
        assert_eq!(summary.unique_stocks, 2);
        assert_eq!(summary.risk_score, 2);
    }

    #[test]
    fn best_performer_is_the_top_gainer() {
        let holdings = [
            holding("TCS", "IT", 10, 3500.0, 4120.30, 0.01),
            holding("INFY", "IT", 15, 1500.0, 1520.45, 0.012),
        ];
        let summary = summarize("Rushil Shah", &holdings);
        assert_eq!(summary.best_performer, "TCS (17.72%)");
    }

    #[test]
    fn all_losing_positions_leave_no_best_performer() {
        let holdings = [
            holding("A", "Tech", 1, 100.0, 80.0, 0.01),
            holding("B", "Tech", 1, 50.0, 45.0, 0.01),
        ];
        let summary = summarize("Shivam", &holdings);
        assert_eq!(summary.best_performer, "-");
        assert!(summary.profit_loss < 0.0);
    }

    #[test]
    fn profit_and_average_return_line_up() {
        let holdings = [holding("TCS", "IT", 10, 1000.0, 1100.0, 0.01)];
        let summary = summarize("Rushil Shah", &holdings);
        assert_eq!(summary.total_invested, 10_000.0);
        assert_eq!(summary.current_value, 11_000.0);
        assert_eq!(summary.profit_loss, 1_000.0);
        assert_eq!(summary.average_return, 10.0);
    }

    #[test]
    fn risk_score_is_capped_at_100() {
        let holdings = [
            holding("A", "Tech", 1, 10.0, 10.0, 1.5),
            holding("B", "Tech", 1, 10.0, 10.0, 1.5),
        ];
        let summary = summarize("Shambhavi", &holdings);
        assert_eq!(summary.risk_score, 100);
    }

    #[test]
    fn missing_price_values_at_cost() {
        let mut snapshot = holding("NEWIPO", "Tech", 5, 200.0, 0.0, 0.02);
        snapshot.current_price = None;
        let summary = summarize("Shruti", &[snapshot]);
        assert_eq!(summary.total_invested, 1000.0);
        assert_eq!(summary.current_value, 1000.0);
        assert_eq!(summary.profit_loss, 0.0);
        assert_eq!(summary.best_performer, "-");
    }

    #[test]
    fn six_sectors_cap_diversification() {
        let holdings: Vec<HoldingSnapshot> = (0..6)
            .map(|i| holding(&format!("S{i}"), &format!("Sector{i}"), 1, 10.0, 10.0, 0.01))
            .collect();
        let summary = summarize("Shivam", &holdings);
        assert_eq!(summary.diversification_score, 100);
    }

    #[test]
    fn allocation_percentages_sum_to_100() {
        let holdings = [
            holding("A", "Tech", 3, 10.0, 33.0, 0.01),
            holding("B", "Pharma", 1, 10.0, 67.0, 0.01),
            holding("C", "Auto", 2, 10.0, 50.0, 0.01),
        ];
        let summary = summarize("Rushil Shah", &holdings);
        let total: f64 = summary.sector_allocation.values().sum();
        assert!((total - 100.0).abs() < 0.05);
    }
}
