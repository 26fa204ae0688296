use crate::db::HeatDb;
use anyhow::Result;
use chrono::Utc;

/// NSE reference universe: symbol, name, sector, price, previous close,
/// change %, volume, P/E, market cap (crore), daily volatility
const SEED_STOCKS: &[(&str, &str, &str, f64, f64, f64, i64, f64, f64, f64)] = &[
    ("RELIANCE", "Reliance Industries", "Energy", 2450.0, 2420.0, 1.24, 5_000_000, 28.5, 1_650_000.0, 0.018),
    ("TCS", "Tata Consultancy Services", "IT", 3850.0, 3820.0, 0.79, 1_200_000, 32.0, 1_400_000.0, 0.010),
    ("HDFCBANK", "HDFC Bank", "Banking", 1680.0, 1650.0, 1.82, 8_000_000, 19.0, 1_100_000.0, 0.011),
    ("INFY", "Infosys", "IT", 1520.0, 1480.0, 2.70, 4_500_000, 25.0, 630_000.0, 0.012),
    ("ICICIBANK", "ICICI Bank", "Banking", 1120.0, 1090.0, 2.75, 9_000_000, 18.5, 780_000.0, 0.013),
    ("HINDUNILVR", "Hindustan Unilever", "FMCG", 2450.0, 2480.0, -1.21, 1_500_000, 55.0, 580_000.0, 0.009),
    ("SBIN", "State Bank of India", "Banking", 780.0, 755.0, 3.31, 25_000_000, 12.0, 700_000.0, 0.020),
    ("BHARTIARTL", "Bharti Airtel", "Telecom", 1420.0, 1380.0, 2.90, 3_500_000, 45.0, 770_000.0, 0.015),
    ("ITC", "ITC Ltd", "FMCG", 465.0, 458.0, 1.53, 12_000_000, 22.0, 580_000.0, 0.008),
    ("KOTAKBANK", "Kotak Mahindra Bank", "Banking", 1780.0, 1755.0, 1.43, 2_500_000, 16.0, 350_000.0, 0.012),
    ("LT", "Larsen & Toubro", "Infrastructure", 3650.0, 3580.0, 1.96, 1_800_000, 28.0, 510_000.0, 0.015),
    ("AXISBANK", "Axis Bank", "Banking", 1180.0, 1150.0, 2.61, 6_000_000, 14.0, 360_000.0, 0.018),
    ("ASIANPAINT", "Asian Paints", "Paints", 2850.0, 2780.0, 2.52, 800_000, 48.0, 270_000.0, 0.014),
    ("MARUTI", "Maruti Suzuki", "Auto", 12500.0, 12200.0, 2.46, 450_000, 22.0, 380_000.0, 0.018),
    ("TITAN", "Titan Company", "Consumer", 3450.0, 3380.0, 2.07, 600_000, 65.0, 305_000.0, 0.015),
    ("WIPRO", "Wipro Ltd", "IT", 480.0, 465.0, 3.23, 8_500_000, 18.0, 260_000.0, 0.015),
    ("SUNPHARMA", "Sun Pharma", "Pharma", 1420.0, 1395.0, 1.79, 3_200_000, 35.0, 340_000.0, 0.014),
    ("ULTRACEMCO", "UltraTech Cement", "Cement", 9850.0, 9720.0, 1.34, 350_000, 28.0, 285_000.0, 0.014),
    ("BAJFINANCE", "Bajaj Finance", "NBFC", 6850.0, 6720.0, 1.94, 850_000, 28.0, 400_000.0, 0.016),
    ("NESTLEIND", "Nestle India", "FMCG", 2450.0, 2420.0, 1.24, 120_000, 65.0, 236_000.0, 0.007),
];

const SEED_HOLDERS: &[(&str, &str)] = &[
    ("Rushil Shah", "rushil@gmail.com"),
    ("Shambhavi", "shambhavi@gmail.com"),
    ("Shruti", "shruti@gmail.com"),
    ("Shivam", "shivam@gmail.com"),
];

/// holder email, symbol, quantity, average buy price
const SEED_HOLDINGS: &[(&str, &str, i64, f64)] = &[
    ("rushil@gmail.com", "TCS", 10, 3500.0),
    ("rushil@gmail.com", "INFY", 15, 1500.0),
    ("rushil@gmail.com", "WIPRO", 20, 450.0),
    ("shambhavi@gmail.com", "HDFCBANK", 12, 1400.0),
    ("shambhavi@gmail.com", "ITC", 50, 420.0),
    ("shambhavi@gmail.com", "NESTLEIND", 5, 2200.0),
    ("shruti@gmail.com", "SUNPHARMA", 10, 1300.0),
    ("shruti@gmail.com", "MARUTI", 3, 9500.0),
    ("shruti@gmail.com", "TITAN", 4, 3200.0),
    ("shivam@gmail.com", "RELIANCE", 6, 2700.0),
    ("shivam@gmail.com", "LT", 4, 3200.0),
    ("shivam@gmail.com", "BHARTIARTL", 10, 1250.0),
];

/// Seed the stock universe and sample portfolios on first run. Returns
/// false without touching anything when stocks already exist.
pub async fn seed(db: &HeatDb) -> Result<bool> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stocks")
        .fetch_one(db.pool())
        .await?;
    if count > 0 {
        return Ok(false);
    }

    let now = Utc::now().to_rfc3339();
    for &(symbol, name, sector, price, previous_close, change, volume, pe, market_cap, volatility) in
        SEED_STOCKS
    {
        sqlx::query(
            r#"
            INSERT INTO stocks (symbol, name, sector, current_price, previous_close,
                                change_percent, volume, pe_ratio, market_cap, volatility, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(symbol)
        .bind(name)
        .bind(sector)
        .bind(price)
        .bind(previous_close)
        .bind(change)
        .bind(volume)
        .bind(pe)
        .bind(market_cap)
        .bind(volatility)
        .bind(&now)
        .execute(db.pool())
        .await?;
    }

    for &(name, email) in SEED_HOLDERS {
        sqlx::query("INSERT INTO holders (name, email) VALUES (?, ?) ON CONFLICT(email) DO NOTHING")
            .bind(name)
            .bind(email)
            .execute(db.pool())
            .await?;
    }

    for &(email, symbol, quantity, avg_price) in SEED_HOLDINGS {
        sqlx::query(
            r#"
            INSERT INTO holdings (holder_id, stock_id, quantity, avg_price)
            SELECT h.id, s.id, ?, ?
            FROM holders h, stocks s
            WHERE h.email = ? AND s.symbol = ?
            ON CONFLICT(holder_id, stock_id) DO NOTHING
            "#,
        )
        .bind(quantity)
        .bind(avg_price)
        .bind(email)
        .bind(symbol)
        .execute(db.pool())
        .await?;
    }

    tracing::info!(
        stocks = SEED_STOCKS.len(),
        holders = SEED_HOLDERS.len(),
        "seeded reference data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holders::HolderStore;
    use crate::stocks::StockStore;

    async fn count(db: &HeatDb, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn seeds_reference_data_once() {
        let db = HeatDb::new("sqlite::memory:").await.unwrap();

        assert!(seed(&db).await.unwrap());
        assert_eq!(count(&db, "stocks").await, 20);
        assert_eq!(count(&db, "holders").await, 4);
        assert_eq!(count(&db, "holdings").await, 12);

        // Second run must leave everything untouched
        assert!(!seed(&db).await.unwrap());
        assert_eq!(count(&db, "stocks").await, 20);
    }

    #[tokio::test]
    async fn seeded_holdings_resolve_their_stocks() {
        let db = HeatDb::new("sqlite::memory:").await.unwrap();
        seed(&db).await.unwrap();

        let stocks = StockStore::new(db.clone());
        let hul = stocks.find_by_symbol("HINDUNILVR").await.unwrap().unwrap();
        assert_eq!(hul.change_percent, Some(-1.21));

        let (holder_id,): (i64,) =
            sqlx::query_as("SELECT id FROM holders WHERE email = 'rushil@gmail.com'")
                .fetch_one(db.pool())
                .await
                .unwrap();

        let holdings = HolderStore::new(db)
            .holdings_with_stocks(holder_id)
            .await
            .unwrap();
        assert_eq!(holdings.len(), 3);
        assert!(holdings.iter().any(|h| h.symbol == "TCS" && h.quantity == 10));
    }
}
