//! # boutik-core: Pure Business Logic for Boutik
//!
//! This crate is the heart of Boutik, a small shop-management system:
//! product stock, suppliers, sales, and customer credit accounts. It
//! contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Boutik Architecture                      │
//! │                                                             │
//! │  Presentation layer (templates / JSON, out of scope)        │
//! │                          │                                  │
//! │  ┌───────────────────────▼───────────────────────────────┐  │
//! │  │              ★ boutik-core (THIS CRATE) ★             │  │
//! │  │                                                       │  │
//! │  │  ┌────────┐ ┌────────┐ ┌──────────┐ ┌────────────┐   │  │
//! │  │  │ types  │ │ money  │ │ parser / │ │ validation │   │  │
//! │  │  │Product │ │ Money  │ │ resolver │ │   rules    │   │  │
//! │  │  │Credit  │ │ bps    │ │          │ │            │   │  │
//! │  │  └────────┘ └────────┘ └──────────┘ └────────────┘   │  │
//! │  │                                                       │  │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS   │  │
//! │  └───────────────────────┬───────────────────────────────┘  │
//! │                          │                                  │
//! │  ┌───────────────────────▼───────────────────────────────┐  │
//! │  │              boutik-db (Database Layer)               │  │
//! │  │     SQLite queries, migrations, ledger operations     │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StockMovement, Credit, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`parser`] - Free-text order-line batch parsing
//! - [`resolver`] - Product name resolution with fuzzy matching
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic - same input,
//!    same output (the resolver's tie-breaks are part of that contract)
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod parser;
pub mod resolver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use parser::{parse_order_batch, BatchMode, LineReport, OrderLine, ParsedBatch};
pub use resolver::{resolve_product, similarity_ratio};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum similarity score a fuzzy match must EXCEED (strictly) for the
/// resolver's last tier to accept it. Scores at or below this fail with
/// `ProductNotFound`.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Stock level at or below which a product counts as "low stock" on the
/// dashboard and stock overview.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum quantity accepted on a single order line.
///
/// Guards against typos (1000 instead of 10) the same way the quantity
/// field is bounded on the supply form.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum results returned by product autocomplete.
pub const SUGGESTION_LIMIT: u32 = 10;

/// Autocomplete queries shorter than this return no results.
pub const MIN_SUGGEST_CHARS: usize = 2;
