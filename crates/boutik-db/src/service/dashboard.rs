//! # Dashboard Statistics
//!
//! The landing-page numbers and the stock overview screen. All figures
//! derive from movement snapshots and current stock; nothing here
//! writes.

use serde::Serialize;

use crate::error::OpResult;
use crate::pool::Database;
use boutik_core::{Product, LOW_STOCK_THRESHOLD};

// =============================================================================
// DTOs
// =============================================================================

/// Landing-page statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Σ sale_price × quantity over sale movements, in cents.
    pub total_sales_cents: i64,
    /// Σ purchase_price × quantity over purchase movements, in cents.
    pub total_purchases_cents: i64,
    /// Sales minus purchases, in cents. An estimate: purchases count
    /// stock still on the shelves.
    pub estimated_profit_cents: i64,
    /// Products at or below the low-stock threshold.
    pub low_stock_count: usize,
    /// Unsettled credits.
    pub open_credit_count: i64,
}

/// Stock overview: the whole catalog plus the low-stock shortlist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOverview {
    pub products: Vec<Product>,
    pub low_stock: Vec<Product>,
}

// =============================================================================
// Queries
// =============================================================================

/// Computes the landing-page statistics.
pub async fn summary(db: &Database) -> OpResult<DashboardSummary> {
    let movements = db.movements();

    let total_sales_cents = movements.sales_revenue_cents().await?;
    let total_purchases_cents = movements.purchase_cost_cents().await?;
    let low_stock_count = db.products().low_stock(LOW_STOCK_THRESHOLD).await?.len();
    let open_credit_count = db.credits().open_count().await?;

    Ok(DashboardSummary {
        total_sales_cents,
        total_purchases_cents,
        estimated_profit_cents: total_sales_cents - total_purchases_cents,
        low_stock_count,
        open_credit_count,
    })
}

/// Loads the stock overview screen.
pub async fn stock_overview(db: &Database) -> OpResult<StockOverview> {
    let products = db.products().list_all().await?;
    let low_stock = db.products().low_stock(LOW_STOCK_THRESHOLD).await?;

    Ok(StockOverview {
        products,
        low_stock,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::credit::open_credit;
    use crate::service::sale::{commit_sale, prepare_sale};
    use crate::service::testutil::{seed_product, test_db};

    #[tokio::test]
    async fn test_summary_aggregates() {
        let db = test_db().await;

        // Purchases: 10×700 + 8×300 = 9400
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;
        seed_product(&db, "Savon", 8, 300, 500).await;

        // Sale: 3×1000 = 3000
        let draft = prepare_sale(&db, "Riz 5kg x 3", 3_000).await.unwrap();
        commit_sale(&db, &draft).await.unwrap();

        // One open credit.
        open_credit(&db, "Awa", None, "Savon x 2").await.unwrap();

        let stats = summary(&db).await.unwrap();
        assert_eq!(stats.total_sales_cents, 3_000);
        assert_eq!(stats.total_purchases_cents, 9_400);
        assert_eq!(stats.estimated_profit_cents, -6_400);
        assert_eq!(stats.open_credit_count, 1);
        // Neither product is at or below 5 after the sale (7 and 8).
        assert_eq!(stats.low_stock_count, 0);
    }

    #[tokio::test]
    async fn test_low_stock_threshold_is_inclusive() {
        let db = test_db().await;
        seed_product(&db, "Savon", 5, 300, 500).await;
        seed_product(&db, "Riz 5kg", 6, 700, 1000).await;

        let stats = summary(&db).await.unwrap();
        assert_eq!(stats.low_stock_count, 1);

        let overview = stock_overview(&db).await.unwrap();
        assert_eq!(overview.products.len(), 2);
        assert_eq!(overview.low_stock.len(), 1);
        assert_eq!(overview.low_stock[0].name, "Savon");
    }

    #[tokio::test]
    async fn test_empty_database_yields_zeroes() {
        let db = test_db().await;

        let stats = summary(&db).await.unwrap();
        assert_eq!(stats.total_sales_cents, 0);
        assert_eq!(stats.total_purchases_cents, 0);
        assert_eq!(stats.estimated_profit_cents, 0);
        assert_eq!(stats.low_stock_count, 0);
        assert_eq!(stats.open_credit_count, 0);
    }
}
