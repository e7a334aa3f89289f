//! # Catalog Autocomplete
//!
//! Product search feeding the UI's JSON autocomplete endpoints: a
//! minimal `{id, name}` variant for pickers and a detailed variant for
//! form pre-fill. The core only produces these DTOs; rendering is the
//! presentation layer's job.

use serde::Serialize;

use crate::error::OpResult;
use crate::pool::Database;
use boutik_core::{Product, MIN_SUGGEST_CHARS, SUGGESTION_LIMIT};

// =============================================================================
// DTOs
// =============================================================================

/// Minimal autocomplete entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSuggestion {
    pub id: String,
    pub name: String,
}

impl From<Product> for ProductSuggestion {
    fn from(p: Product) -> Self {
        ProductSuggestion {
            id: p.id,
            name: p.name,
        }
    }
}

/// Detailed autocomplete entry, for pre-filling the sale and supply
/// forms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
    pub stock_qty: i64,
    pub category: String,
}

impl From<Product> for ProductDetail {
    fn from(p: Product) -> Self {
        ProductDetail {
            id: p.id,
            name: p.name,
            purchase_price_cents: p.purchase_price_cents,
            sale_price_cents: p.sale_price_cents,
            stock_qty: p.stock_qty,
            category: p.category.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Search
// =============================================================================

/// Autocomplete: products whose name contains the query
/// (case-insensitive), capped at [`SUGGESTION_LIMIT`].
///
/// Queries shorter than [`MIN_SUGGEST_CHARS`] return an empty list
/// rather than the whole catalog.
pub async fn suggest_products(db: &Database, query: &str) -> OpResult<Vec<ProductSuggestion>> {
    Ok(search(db, query)
        .await?
        .into_iter()
        .map(ProductSuggestion::from)
        .collect())
}

/// Autocomplete with full product details.
pub async fn suggest_products_detailed(db: &Database, query: &str) -> OpResult<Vec<ProductDetail>> {
    Ok(search(db, query)
        .await?
        .into_iter()
        .map(ProductDetail::from)
        .collect())
}

async fn search(db: &Database, query: &str) -> OpResult<Vec<Product>> {
    let query = query.trim();
    if query.chars().count() < MIN_SUGGEST_CHARS {
        return Ok(Vec::new());
    }
    Ok(db.products().suggest(query, SUGGESTION_LIMIT).await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{seed_product, test_db};

    #[tokio::test]
    async fn test_substring_suggestions() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;
        seed_product(&db, "Riz 25kg", 4, 3000, 4500).await;
        seed_product(&db, "Savon", 5, 300, 500).await;

        let hits = suggest_products(&db, "riz").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.name.to_lowercase().contains("riz")));
    }

    #[tokio::test]
    async fn test_short_query_returns_nothing() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;

        assert!(suggest_products(&db, "r").await.unwrap().is_empty());
        assert!(suggest_products(&db, " ").await.unwrap().is_empty());
        assert!(!suggest_products(&db, "ri").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_limit_applies() {
        let db = test_db().await;
        for i in 0..15 {
            seed_product(&db, &format!("Savon {i}"), 5, 300, 500).await;
        }

        let hits = suggest_products(&db, "savon").await.unwrap();
        assert_eq!(hits.len(), SUGGESTION_LIMIT as usize);
    }

    #[tokio::test]
    async fn test_detailed_suggestions_serialize_for_json() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;

        let hits = suggest_products_detailed(&db, "riz").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stock_qty, 10);

        let json = serde_json::to_value(&hits).unwrap();
        assert_eq!(json[0]["salePriceCents"], 1000);
        assert_eq!(json[0]["category"], "");
    }

    #[tokio::test]
    async fn test_like_wildcards_match_literally() {
        let db = test_db().await;
        seed_product(&db, "Promo 50%", 5, 300, 500).await;
        seed_product(&db, "Savon", 5, 300, 500).await;

        let hits = suggest_products(&db, "50%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Promo 50%");
    }
}
