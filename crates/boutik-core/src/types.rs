//! # Domain Types
//!
//! Core domain types for the shop ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Domain Types                          │
//! │                                                             │
//! │  ┌──────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │   Product    │  │ StockMovement  │  │     Credit     │  │
//! │  │ ──────────── │  │ ────────────── │  │ ────────────── │  │
//! │  │ id ("P001")  │  │ kind (enum)    │  │ client_name    │  │
//! │  │ prices cents │  │ prices frozen  │  │ total_cents    │  │
//! │  │ stock_qty    │  │ append-only    │  │ settled (1-way)│  │
//! │  └──────────────┘  └────────────────┘  └────────────────┘  │
//! │                                                             │
//! │  ┌──────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │   Supplier   │  │  CreditLine    │  │ CreditPayment  │  │
//! │  └──────────────┘  └────────────────┘  └────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products carry a business identifier in the zero-padded `P###`
//! scheme, minted by the supply operation. Movements, credits and
//! their children use database rowids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Promotion
// =============================================================================

/// Promotion rate in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%. Valid range is 0..=10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion(u32);

impl Promotion {
    /// Creates a promotion from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Promotion(bps)
    }

    /// Creates a promotion from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Promotion((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// No promotion.
    #[inline]
    pub const fn none() -> Self {
        Promotion(0)
    }

    /// Checks if there is no promotion.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Promotion {
    fn default() -> Self {
        Promotion::none()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Never deleted while movements reference it; stock and prices are
/// mutated only by the supply and sale operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Business identifier in the `P###` scheme (`P001`, `P002`, ...).
    pub id: String,

    /// Display name; the resolver matches against this.
    pub name: String,

    /// Unit purchase price in cents.
    pub purchase_price_cents: i64,

    /// Unit sale price in cents.
    pub sale_price_cents: i64,

    /// Quantity on hand. Sales must never drive this negative.
    pub stock_qty: i64,

    /// Supplier reference, if any.
    pub supplier_id: Option<String>,

    /// Free-form category, if any.
    pub category: Option<String>,

    /// Promotion in basis points (1000 = 10%), 0 when none.
    pub promotion_bps: u32,

    /// When the product was first supplied.
    pub created_at: DateTime<Utc>,

    /// When the product was last restocked or sold.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the purchase price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Returns the active promotion.
    #[inline]
    pub fn promotion(&self) -> Promotion {
        Promotion::from_bps(self.promotion_bps)
    }

    /// Margin made on one unit (sale price minus purchase price).
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.sale_price() - self.purchase_price()
    }

    /// Checks whether the requested quantity can be sold from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_qty >= quantity
    }

    /// Checks whether stock is at or below the given threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock_qty <= threshold
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier referenced by zero or more products.
///
/// There is deliberately no delete operation; products keep a nullable
/// reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// The kind of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Stock entering via a supply operation.
    Purchase,
    /// Stock leaving via a committed sale.
    Sale,
}

/// An immutable record of one stock movement. Append-only.
///
/// Both unit prices are snapshotted at write time so history survives
/// later price changes on the product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: i64,
    /// Unit purchase price in cents at movement time (frozen).
    pub purchase_price_cents: i64,
    /// Unit sale price in cents at movement time (frozen).
    pub sale_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// A stock movement about to be appended (id and timestamp assigned by
/// the repository).
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: i64,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
}

// =============================================================================
// Credit
// =============================================================================

/// A customer's running tab: goods sold on deferred payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Credit {
    pub id: i64,
    pub client_name: String,
    pub contact: Option<String>,
    /// Amount owed at creation, in cents.
    pub total_cents: i64,
    /// Flips to true exactly when cumulative payments reach the total;
    /// never reset to false.
    pub settled: bool,
    pub created_at: DateTime<Utc>,
}

impl Credit {
    /// Returns the total owed as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// One product line within a credit. Append-only, created atomically
/// with the parent credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreditLine {
    pub id: i64,
    pub credit_id: i64,
    pub product_id: String,
    pub quantity: i64,
    /// Unit sale price in cents at credit time (frozen).
    pub unit_price_cents: i64,
}

/// A partial or full payment against a credit. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreditPayment {
    pub id: i64,
    pub credit_id: i64,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, stock: i64) -> Product {
        Product {
            id: "P001".to_string(),
            name: name.to_string(),
            purchase_price_cents: 700,
            sale_price_cents: 1000,
            stock_qty: stock,
            supplier_id: None,
            category: None,
            promotion_bps: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_promotion_from_bps() {
        let promo = Promotion::from_bps(1000);
        assert_eq!(promo.bps(), 1000);
        assert!((promo.percentage() - 10.0).abs() < 0.001);
        assert!(Promotion::none().is_zero());
    }

    #[test]
    fn test_promotion_from_percentage() {
        assert_eq!(Promotion::from_percentage(10.0).bps(), 1000);
        assert_eq!(Promotion::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_unit_margin() {
        let p = product("Riz 5kg", 10);
        assert_eq!(p.unit_margin().cents(), 300);
    }

    #[test]
    fn test_can_sell_and_low_stock() {
        let p = product("Riz 5kg", 5);
        assert!(p.can_sell(5));
        assert!(!p.can_sell(6));
        assert!(p.is_low_stock(5));
        assert!(!p.is_low_stock(4));
    }
}
