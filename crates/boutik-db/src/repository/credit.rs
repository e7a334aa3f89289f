//! # Credit Repository
//!
//! Database operations for customer credits, their lines and payments.
//!
//! ## Credit Lifecycle
//! ```text
//! open_credit (service)
//!   └── insert() + insert_line()×N     one transaction
//!
//! record_credit_payment (service)
//!   └── get_in() + payments_total_in() + insert_payment()
//!       [+ mark_settled() when cumulative ≥ total]
//!       all inside one transaction: the balance read and the payment
//!       write cannot interleave with another payment on the same credit
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use boutik_core::{Credit, CreditLine, CreditPayment};

/// Columns selected for every credit read.
const CREDIT_COLUMNS: &str = "id, client_name, contact, total_cents, settled, created_at";

/// Repository for credit database operations.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    pool: SqlitePool,
}

/// A credit about to be opened (id and timestamp assigned on insert).
#[derive(Debug, Clone)]
pub struct NewCredit {
    pub client_name: String,
    pub contact: Option<String>,
    pub total_cents: i64,
}

impl CreditRepository {
    /// Creates a new CreditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CreditRepository { pool }
    }

    /// Gets a credit by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Credit>> {
        let credit = sqlx::query_as::<_, Credit>(&format!(
            "SELECT {CREDIT_COLUMNS} FROM credits WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credit)
    }

    /// Lists credits, most recent first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Credit>> {
        let credits = sqlx::query_as::<_, Credit>(&format!(
            "SELECT {CREDIT_COLUMNS} FROM credits ORDER BY created_at DESC, id DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(credits)
    }

    /// Lists the product lines of a credit.
    pub async fn lines(&self, credit_id: i64) -> DbResult<Vec<CreditLine>> {
        let lines = sqlx::query_as::<_, CreditLine>(
            "SELECT id, credit_id, product_id, quantity, unit_price_cents \
             FROM credit_lines WHERE credit_id = ?1 ORDER BY id",
        )
        .bind(credit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists the payments of a credit, oldest first.
    pub async fn payments(&self, credit_id: i64) -> DbResult<Vec<CreditPayment>> {
        let payments = sqlx::query_as::<_, CreditPayment>(
            "SELECT id, credit_id, amount_cents, created_at \
             FROM credit_payments WHERE credit_id = ?1 ORDER BY created_at, id",
        )
        .bind(credit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Sum of payments against a credit, in cents (pool read, for
    /// display).
    pub async fn payments_total(&self, credit_id: i64) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::payments_total_in(&mut conn, credit_id).await
    }

    /// Counts unsettled credits.
    pub async fn open_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM credits WHERE settled = 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactional writes - run inside the caller's transaction
    // =========================================================================

    /// Gets a credit by id inside the caller's transaction.
    pub async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Credit>> {
        let credit = sqlx::query_as::<_, Credit>(&format!(
            "SELECT {CREDIT_COLUMNS} FROM credits WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(credit)
    }

    /// Sum of payments against a credit, inside the caller's
    /// transaction. The atomic read half of the payment
    /// read-modify-write.
    pub async fn payments_total_in(conn: &mut SqliteConnection, credit_id: i64) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_cents) FROM credit_payments WHERE credit_id = ?1")
                .bind(credit_id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(total.unwrap_or(0))
    }

    /// Opens a credit row (unsettled). Returns the new credit id.
    pub async fn insert(conn: &mut SqliteConnection, new: &NewCredit) -> DbResult<i64> {
        debug!(client = %new.client_name, total = %new.total_cents, "Opening credit");

        let now = chrono::Utc::now();

        let result = sqlx::query(
            "INSERT INTO credits (client_name, contact, total_cents, settled, created_at) \
             VALUES (?1, ?2, ?3, 0, ?4)",
        )
        .bind(&new.client_name)
        .bind(&new.contact)
        .bind(new.total_cents)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Appends one product line to a credit.
    pub async fn insert_line(
        conn: &mut SqliteConnection,
        credit_id: i64,
        product_id: &str,
        quantity: i64,
        unit_price_cents: i64,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO credit_lines (credit_id, product_id, quantity, unit_price_cents) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(credit_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price_cents)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Appends a payment to a credit. Returns the new payment id.
    pub async fn insert_payment(
        conn: &mut SqliteConnection,
        credit_id: i64,
        amount_cents: i64,
    ) -> DbResult<i64> {
        debug!(credit_id = %credit_id, amount = %amount_cents, "Recording payment");

        let now = chrono::Utc::now();

        let result = sqlx::query(
            "INSERT INTO credit_payments (credit_id, amount_cents, created_at) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(credit_id)
        .bind(amount_cents)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Marks a credit as settled. One-way: there is no reverse update.
    pub async fn mark_settled(conn: &mut SqliteConnection, credit_id: i64) -> DbResult<()> {
        debug!(credit_id = %credit_id, "Marking credit settled");

        sqlx::query("UPDATE credits SET settled = 1 WHERE id = ?1")
            .bind(credit_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
