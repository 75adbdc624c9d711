//! Postgres-backed investment store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{InvestmentStore, StoreError};
use crate::types::investment::Investment;

const COLUMNS: &str = "id, user_id, symbol, quantity, purchase_price, purchase_date, notes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct InvestmentRow {
    id: Uuid,
    user_id: Uuid,
    symbol: String,
    quantity: f64,
    purchase_price: f64,
    purchase_date: NaiveDate,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InvestmentRow> for Investment {
    fn from(row: InvestmentRow) -> Self {
        Investment {
            id: row.id,
            owner_id: row.user_id,
            symbol: row.symbol,
            quantity: row.quantity,
            purchase_price: row.purchase_price,
            purchase_date: row.purchase_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvestmentStore for PgStore {
    async fn get(&self, id: Uuid) -> Result<Option<Investment>, StoreError> {
        let row = sqlx::query_as::<_, InvestmentRow>(&format!(
            "SELECT {COLUMNS} FROM investments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Investment::from))
    }

    async fn insert(&self, investment: &Investment) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO investments (id, user_id, symbol, quantity, purchase_price, purchase_date, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(investment.id)
        .bind(investment.owner_id)
        .bind(&investment.symbol)
        .bind(investment.quantity)
        .bind(investment.purchase_price)
        .bind(investment.purchase_date)
        .bind(&investment.notes)
        .bind(investment.created_at)
        .bind(investment.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Only the mutable fields are written; id, owner and created_at stay as stored.
    async fn update(&self, investment: &Investment) -> Result<Option<Investment>, StoreError> {
        let row = sqlx::query_as::<_, InvestmentRow>(&format!(
            "UPDATE investments \
             SET symbol = $2, quantity = $3, purchase_price = $4, purchase_date = $5, notes = $6, updated_at = $7 \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(investment.id)
        .bind(&investment.symbol)
        .bind(investment.quantity)
        .bind(investment.purchase_price)
        .bind(investment.purchase_date)
        .bind(&investment.notes)
        .bind(investment.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Investment::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM investments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Order is whatever the index scan returns; callers must not rely on it.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Investment>, StoreError> {
        let rows = sqlx::query_as::<_, InvestmentRow>(&format!(
            "SELECT {COLUMNS} FROM investments WHERE user_id = $1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Investment::from).collect())
    }
}
