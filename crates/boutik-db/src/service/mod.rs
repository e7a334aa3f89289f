//! # Service Layer
//!
//! The ledger operations. Each function here is one request-scoped
//! operation: it validates input, runs the pure boutik-core logic
//! against a freshly loaded catalog, then applies the result inside a
//! single sqlx transaction. The presentation layer (out of scope)
//! calls these and renders the structured results and `OpError`
//! messages it gets back.
//!
//! ## Operations
//! - [`sale`] - two-phase sale: prepare a draft, then commit it
//! - [`credit`] - open a customer credit, record payments against it
//! - [`supply`] - restock: update an existing product or create one
//! - [`supplier`] - supplier bookkeeping
//! - [`catalog`] - product autocomplete for the UI's JSON endpoints
//! - [`dashboard`] - landing-page statistics and stock overview

pub mod catalog;
pub mod credit;
pub mod dashboard;
pub mod sale;
pub mod supplier;
pub mod supply;

#[cfg(test)]
pub(crate) mod testutil {
    use crate::pool::{Database, DbConfig};
    use crate::service::supply::{restock, SupplyRequest};

    /// Fresh in-memory database with migrations applied.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds one product through the real supply path and returns its id.
    pub async fn seed_product(
        db: &Database,
        name: &str,
        quantity: i64,
        purchase_cents: i64,
        sale_cents: i64,
    ) -> String {
        let outcome = restock(
            db,
            &SupplyRequest {
                name: name.to_string(),
                quantity,
                purchase_price_cents: purchase_cents,
                sale_price_cents: sale_cents,
                supplier_id: None,
                category: None,
            },
        )
        .await
        .unwrap();
        outcome.product.id
    }

    /// Sets a promotion directly; promotions have no dedicated
    /// operation yet, the catalog screen edits them in place.
    pub async fn set_promotion(db: &Database, product_id: &str, bps: u32) {
        sqlx::query("UPDATE products SET promotion_bps = ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(bps)
            .execute(db.pool())
            .await
            .unwrap();
    }
}
