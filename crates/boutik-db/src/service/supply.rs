//! # Supply (Restock) Operation
//!
//! Brings stock in: updates an existing product or creates a new one,
//! and always appends a purchase movement.
//!
//! ## Branch Point
//! ```text
//! restock("Riz 5kg", qty 5, ...)
//!     │
//!     ▼ exact (case-sensitive) name lookup
//! exists? ── yes ──► update both prices, stock += qty
//!     │
//!     no ──► mint next P### id, insert product
//!     │
//!     ▼ always
//! append purchase movement (prices snapshotted)
//! ```
//!
//! Re-supplying the same name therefore never duplicates the product
//! row, and the movement history records every delivery.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::{DbError, OpError, OpResult};
use crate::pool::Database;
use crate::repository::movement::MovementRepository;
use crate::repository::product::ProductRepository;
use boutik_core::validation::{validate_price_cents, validate_product_name, validate_quantity};
use boutik_core::{CoreError, MovementKind, NewMovement, Product};

// =============================================================================
// Request & Outcome
// =============================================================================

/// A restock request from the supply form.
#[derive(Debug, Clone)]
pub struct SupplyRequest {
    pub name: String,
    pub quantity: i64,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
    pub supplier_id: Option<String>,
    pub category: Option<String>,
}

/// Result of a restock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockOutcome {
    /// The product after the restock (fresh stock and prices).
    pub product: Product,
    /// True when the restock created the product.
    pub created: bool,
}

// =============================================================================
// Restock
// =============================================================================

/// Applies a supply: update-or-create the product, then append the
/// purchase movement, all in one transaction.
pub async fn restock(db: &Database, request: &SupplyRequest) -> OpResult<RestockOutcome> {
    validate_product_name(&request.name).map_err(CoreError::from)?;
    validate_quantity(request.quantity).map_err(CoreError::from)?;
    validate_price_cents(request.purchase_price_cents).map_err(CoreError::from)?;
    validate_price_cents(request.sale_price_cents).map_err(CoreError::from)?;

    let name = request.name.trim();

    let mut tx = db.pool().begin().await.map_err(DbError::from)?;

    let existing = ProductRepository::get_by_exact_name(&mut tx, name).await?;
    let created = existing.is_none();

    let product_id = match existing {
        Some(product) => {
            ProductRepository::restock_existing(
                &mut tx,
                &product.id,
                request.quantity,
                request.purchase_price_cents,
                request.sale_price_cents,
            )
            .await?;
            product.id
        }
        None => {
            let id = ProductRepository::next_product_id(&mut tx).await?;
            let now = Utc::now();
            let product = Product {
                id: id.clone(),
                name: name.to_string(),
                purchase_price_cents: request.purchase_price_cents,
                sale_price_cents: request.sale_price_cents,
                stock_qty: request.quantity,
                supplier_id: normalize(&request.supplier_id),
                category: normalize(&request.category),
                promotion_bps: 0,
                created_at: now,
                updated_at: now,
            };
            ProductRepository::insert(&mut tx, &product).await?;
            id
        }
    };

    MovementRepository::insert(
        &mut tx,
        &NewMovement {
            product_id: product_id.clone(),
            kind: MovementKind::Purchase,
            quantity: request.quantity,
            purchase_price_cents: request.purchase_price_cents,
            sale_price_cents: request.sale_price_cents,
        },
    )
    .await?;

    // Re-read inside the transaction so the outcome reflects the
    // post-restock stock and prices.
    let product = ProductRepository::get_by_id_in(&mut tx, &product_id)
        .await?
        .ok_or_else(|| DbError::not_found("Product", &product_id))?;

    tx.commit().await.map_err(DbError::from)?;

    info!(
        id = %product.id,
        name = %product.name,
        quantity = %request.quantity,
        created = %created,
        "Supply recorded"
    );

    Ok(RestockOutcome { product, created })
}

fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::supplier::add_supplier;
    use crate::service::testutil::test_db;
    use boutik_core::MovementKind;

    fn request(name: &str, quantity: i64) -> SupplyRequest {
        SupplyRequest {
            name: name.to_string(),
            quantity,
            purchase_price_cents: 700,
            sale_price_cents: 1000,
            supplier_id: None,
            category: Some("Vivres".to_string()),
        }
    }

    #[tokio::test]
    async fn test_new_product_gets_sequential_id() {
        let db = test_db().await;

        let first = restock(&db, &request("Riz 5kg", 5)).await.unwrap();
        assert!(first.created);
        assert_eq!(first.product.id, "P001");
        assert_eq!(first.product.stock_qty, 5);
        assert_eq!(first.product.category.as_deref(), Some("Vivres"));

        let second = restock(&db, &request("Savon", 3)).await.unwrap();
        assert_eq!(second.product.id, "P002");
    }

    #[tokio::test]
    async fn test_idempotent_restock_updates_in_place() {
        let db = test_db().await;

        restock(&db, &request("Riz 5kg", 5)).await.unwrap();
        let outcome = restock(
            &db,
            &SupplyRequest {
                purchase_price_cents: 750,
                sale_price_cents: 1100,
                ..request("Riz 5kg", 3)
            },
        )
        .await
        .unwrap();

        // Same row updated: stock accumulates, prices replaced.
        assert!(!outcome.created);
        assert_eq!(outcome.product.id, "P001");
        assert_eq!(outcome.product.stock_qty, 8);
        assert_eq!(outcome.product.purchase_price_cents, 750);
        assert_eq!(outcome.product.sale_price_cents, 1100);

        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(
            db.movements().count_for_kind(MovementKind::Purchase).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_exact_name_match_is_case_sensitive() {
        let db = test_db().await;

        restock(&db, &request("Riz 5kg", 5)).await.unwrap();
        let outcome = restock(&db, &request("riz 5kg", 3)).await.unwrap();

        // Different casing creates a second product (only the resolver
        // folds case, the supply branch point does not).
        assert!(outcome.created);
        assert_eq!(outcome.product.id, "P002");
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_supplier_reference_is_kept() {
        let db = test_db().await;
        add_supplier(&db, "F001", "Grossiste Dakar", Some("33 800 00 00"))
            .await
            .unwrap();

        let outcome = restock(
            &db,
            &SupplyRequest {
                supplier_id: Some("F001".to_string()),
                ..request("Riz 5kg", 5)
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.product.supplier_id.as_deref(), Some("F001"));
    }

    #[tokio::test]
    async fn test_unknown_supplier_reference_fails() {
        let db = test_db().await;

        let err = restock(
            &db,
            &SupplyRequest {
                supplier_id: Some("F999".to_string()),
                ..request("Riz 5kg", 5)
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            OpError::Db(DbError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_validation_rejects_bad_requests() {
        let db = test_db().await;

        let err = restock(&db, &request("", 5)).await.unwrap_err();
        assert!(matches!(err, OpError::Core(CoreError::Validation(_))));

        let err = restock(&db, &request("Riz 5kg", 0)).await.unwrap_err();
        assert!(matches!(err, OpError::Core(CoreError::Validation(_))));

        let err = restock(
            &db,
            &SupplyRequest {
                purchase_price_cents: -1,
                ..request("Riz 5kg", 5)
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OpError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_movement_snapshots_request_prices() {
        let db = test_db().await;

        let outcome = restock(&db, &request("Riz 5kg", 5)).await.unwrap();
        let movements = db.movements().list_for_product(&outcome.product.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Purchase);
        assert_eq!(movements[0].quantity, 5);
        assert_eq!(movements[0].purchase_price_cents, 700);
        assert_eq!(movements[0].sale_price_cents, 1000);
    }
}
