use crate::db::HeatDb;
use crate::models::Stock;
use anyhow::Result;
use chrono::Utc;
use heat_core::GatewayQuote;
use rust_decimal::prelude::*;

#[derive(Clone)]
pub struct StockStore {
    db: HeatDb,
}

impl StockStore {
    pub fn new(db: HeatDb) -> Self {
        Self { db }
    }

    /// All tracked stocks, ordered by symbol
    pub async fn all(&self) -> Result<Vec<Stock>> {
        let stocks = sqlx::query_as::<_, Stock>("SELECT * FROM stocks ORDER BY symbol")
            .fetch_all(self.db.pool())
            .await?;

        Ok(stocks)
    }

    pub async fn find_by_symbol(&self, symbol: &str) -> Result<Option<Stock>> {
        let stock = sqlx::query_as::<_, Stock>("SELECT * FROM stocks WHERE symbol = ?")
            .bind(symbol.to_uppercase())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(stock)
    }

    /// Persist the latest resolved quote on the stock row. Fields the quote
    /// does not carry keep their previous value.
    pub async fn update_snapshot(&self, stock_id: i64, quote: &GatewayQuote) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE stocks
            SET current_price = ?,
                previous_close = COALESCE(?, previous_close),
                change_percent = COALESCE(?, change_percent),
                volume = COALESCE(?, volume),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(quote.price.to_f64().unwrap_or(0.0))
        .bind(quote.previous_close.and_then(|p| p.to_f64()))
        .bind(quote.change_percent)
        .bind(quote.volume)
        .bind(Utc::now().to_rfc3339())
        .bind(stock_id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
