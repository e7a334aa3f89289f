//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Catalog listing in a fixed order (the resolver's tie-break order)
//! - Case-insensitive substring search for autocomplete
//! - Guarded stock decrement (the sale commit's safety check)
//! - `P###` identifier minting for newly supplied products

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use boutik_core::Product;

/// Columns selected for every product read.
const PRODUCT_COLUMNS: &str = "id, name, purchase_price_cents, sale_price_cents, stock_qty, \
     supplier_id, category, promotion_bps, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists the whole catalog in fixed order.
    ///
    /// Ordered by name (case-insensitive) then id: the resolver breaks
    /// similarity ties by slice position, so this ordering is part of
    /// the resolution contract.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name COLLATE NOCASE, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Substring search over product names, for autocomplete.
    ///
    /// SQLite LIKE is case-insensitive for ASCII out of the box; `%`
    /// and `_` in the query are escaped, so they match literally.
    pub async fn suggest(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();
        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = format!("%{}%", escape_like(query));

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 ESCAPE '\\' \
             ORDER BY name COLLATE NOCASE, id LIMIT ?2"
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products with stock at or below the threshold.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock_qty <= ?1 ORDER BY stock_qty, name COLLATE NOCASE"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactional writes - run inside the caller's transaction
    // =========================================================================

    /// Gets a product by exact (case-sensitive) name.
    ///
    /// The supply operation's update-or-create branch point: only an
    /// exact name match updates in place.
    pub async fn get_by_exact_name(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Gets a product by id inside the caller's transaction.
    pub async fn get_by_id_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Mints the next unused product id in the `P###` scheme.
    ///
    /// Takes max-numeric-suffix + 1 rather than row count, so ids never
    /// collide even if products were ever removed.
    pub async fn next_product_id(conn: &mut SqliteConnection) -> DbResult<String> {
        let max: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(CAST(substr(id, 2) AS INTEGER)), 0) \
             FROM products WHERE id GLOB 'P*'",
        )
        .fetch_one(&mut *conn)
        .await?;

        Ok(format!("P{:03}", max + 1))
    }

    /// Inserts a new product.
    pub async fn insert(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                id, name, purchase_price_cents, sale_price_cents, stock_qty, \
                supplier_id, category, promotion_bps, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.purchase_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.stock_qty)
        .bind(&product.supplier_id)
        .bind(&product.category)
        .bind(product.promotion_bps)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Re-supplies an existing product: updates both prices and
    /// increments stock.
    pub async fn restock_existing(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
        purchase_price_cents: i64,
        sale_price_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Restocking product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                purchase_price_cents = ?2, \
                sale_price_cents = ?3, \
                stock_qty = stock_qty + ?4, \
                updated_at = ?5 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(purchase_price_cents)
        .bind(sale_price_cents)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Decrements stock, guarded against going negative.
    ///
    /// Returns `false` (and changes nothing) when available stock is
    /// below `quantity`. The guard runs in the same statement as the
    /// decrement, so two concurrent sales cannot both pass it.
    pub async fn deduct_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity = %quantity, "Deducting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                stock_qty = stock_qty - ?2, \
                updated_at = ?3 \
             WHERE id = ?1 AND stock_qty >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("riz"), "riz");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
