use crate::db::HeatDb;
use crate::models::{Holder, HoldingWithStock};
use anyhow::Result;

#[derive(Clone)]
pub struct HolderStore {
    db: HeatDb,
}

impl HolderStore {
    pub fn new(db: HeatDb) -> Self {
        Self { db }
    }

    pub async fn find(&self, holder_id: i64) -> Result<Option<Holder>> {
        let holder = sqlx::query_as::<_, Holder>("SELECT * FROM holders WHERE id = ?")
            .bind(holder_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(holder)
    }

    /// Holdings for a holder joined with the stock rows they reference
    pub async fn holdings_with_stocks(&self, holder_id: i64) -> Result<Vec<HoldingWithStock>> {
        let rows = sqlx::query_as::<_, HoldingWithStock>(
            r#"
            SELECT s.symbol, s.name, s.sector, h.quantity, h.avg_price,
                   s.current_price, s.volatility
            FROM holdings h
            JOIN stocks s ON s.id = h.stock_id
            WHERE h.holder_id = ?
            ORDER BY s.symbol
            "#,
        )
        .bind(holder_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }
}
