//! # Stock Movement Repository
//!
//! Append-only stock movement history and its aggregates. Movements
//! are never updated or deleted; unit prices are frozen at insert.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use boutik_core::{MovementKind, NewMovement, StockMovement};

/// Repository for stock movement database operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Lists the most recent movements.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, product_id, kind, quantity, purchase_price_cents, sale_price_cents, \
                    created_at \
             FROM stock_movements ORDER BY created_at DESC, id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Lists all movements for one product, oldest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, product_id, kind, quantity, purchase_price_cents, sale_price_cents, \
                    created_at \
             FROM stock_movements WHERE product_id = ?1 ORDER BY created_at, id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Total sale revenue in cents: Σ sale_price × quantity over sale
    /// movements (snapshot prices, so later price changes don't rewrite
    /// history).
    pub async fn sales_revenue_cents(&self) -> DbResult<i64> {
        self.sum_for_kind(MovementKind::Sale, "sale_price_cents").await
    }

    /// Total purchase cost in cents: Σ purchase_price × quantity over
    /// purchase movements.
    pub async fn purchase_cost_cents(&self) -> DbResult<i64> {
        self.sum_for_kind(MovementKind::Purchase, "purchase_price_cents")
            .await
    }

    async fn sum_for_kind(&self, kind: MovementKind, price_column: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COALESCE(SUM({price_column} * quantity), 0) \
             FROM stock_movements WHERE kind = ?1"
        ))
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Counts movements of one kind.
    pub async fn count_for_kind(&self, kind: MovementKind) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE kind = ?1")
                .bind(kind)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactional writes - run inside the caller's transaction
    // =========================================================================

    /// Appends a movement, stamping it now. Returns the new rowid.
    pub async fn insert(conn: &mut SqliteConnection, movement: &NewMovement) -> DbResult<i64> {
        debug!(
            product_id = %movement.product_id,
            kind = ?movement.kind,
            quantity = %movement.quantity,
            "Appending stock movement"
        );

        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO stock_movements ( \
                product_id, kind, quantity, purchase_price_cents, sale_price_cents, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&movement.product_id)
        .bind(movement.kind)
        .bind(movement.quantity)
        .bind(movement.purchase_price_cents)
        .bind(movement.sale_price_cents)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
