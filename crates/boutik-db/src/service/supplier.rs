//! # Supplier Operation
//!
//! Supplier bookkeeping. There is deliberately no delete: products
//! reference suppliers through a nullable foreign key and history
//! stays intact.

use tracing::info;

use crate::error::OpResult;
use crate::pool::Database;
use crate::repository::supplier::new_supplier;
use boutik_core::validation::{validate_supplier_id, validate_supplier_name};
use boutik_core::{CoreError, Supplier};

/// Registers a supplier with a caller-chosen id (e.g. `F001`).
///
/// ## Errors
/// - `Validation` for a blank id or name
/// - `UniqueViolation` when the id is already taken
pub async fn add_supplier(
    db: &Database,
    id: &str,
    name: &str,
    contact: Option<&str>,
) -> OpResult<Supplier> {
    validate_supplier_id(id).map_err(CoreError::from)?;
    validate_supplier_name(name).map_err(CoreError::from)?;

    let supplier = new_supplier(id, name, contact);
    db.suppliers().insert(&supplier).await?;

    info!(id = %supplier.id, name = %supplier.name, "Supplier added");

    Ok(supplier)
}

/// Lists all suppliers, ordered by name.
pub async fn list_suppliers(db: &Database) -> OpResult<Vec<Supplier>> {
    Ok(db.suppliers().list_all().await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DbError, OpError};
    use crate::service::testutil::test_db;

    #[tokio::test]
    async fn test_add_and_list_suppliers() {
        let db = test_db().await;

        add_supplier(&db, "F002", "Marché Central", None).await.unwrap();
        let supplier = add_supplier(&db, "F001", "Grossiste Dakar", Some("33 800 00 00"))
            .await
            .unwrap();
        assert_eq!(supplier.contact.as_deref(), Some("33 800 00 00"));

        let suppliers = list_suppliers(&db).await.unwrap();
        assert_eq!(suppliers.len(), 2);
        // Ordered by name.
        assert_eq!(suppliers[0].id, "F001");
        assert_eq!(suppliers[1].id, "F002");
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = test_db().await;

        add_supplier(&db, "F001", "Grossiste Dakar", None).await.unwrap();
        let err = add_supplier(&db, "F001", "Autre", None).await.unwrap_err();
        assert!(matches!(err, OpError::Db(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let db = test_db().await;

        assert!(add_supplier(&db, " ", "Nom", None).await.is_err());
        assert!(add_supplier(&db, "F001", "  ", None).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_contact_stored_as_null() {
        let db = test_db().await;

        let supplier = add_supplier(&db, "F001", "Grossiste Dakar", Some("  ")).await.unwrap();
        assert!(supplier.contact.is_none());
    }
}
