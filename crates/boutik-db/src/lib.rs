//! # boutik-db: Database Layer for Boutik
//!
//! SQLite persistence and ledger operations for the Boutik shop
//! system, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Boutik Data Flow                        │
//! │                                                             │
//! │  Presentation layer (templates / JSON, out of scope)        │
//! │       │                                                     │
//! │  ┌────▼────────────────────────────────────────────────┐    │
//! │  │                 boutik-db (THIS CRATE)              │    │
//! │  │                                                     │    │
//! │  │  ┌───────────┐  ┌──────────────┐  ┌─────────────┐   │    │
//! │  │  │ service   │  │ repository   │  │ migrations  │   │    │
//! │  │  │ sale      │─►│ product      │  │ (embedded)  │   │    │
//! │  │  │ credit    │  │ supplier     │  └─────────────┘   │    │
//! │  │  │ supply    │  │ movement     │  ┌─────────────┐   │    │
//! │  │  │ catalog   │  │ credit       │◄─│ pool        │   │    │
//! │  │  │ dashboard │  └──────────────┘  └─────────────┘   │    │
//! │  │  └───────────┘                                      │    │
//! │  └────┬────────────────────────────────────────────────┘    │
//! │       │                                                     │
//! │  ┌────▼────────────────────────────────────────────────┐    │
//! │  │                  SQLite Database                    │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - Startup configuration from the environment
//! - [`error`] - Database and operation error types
//! - [`repository`] - Per-aggregate query implementations
//! - [`service`] - The ledger operations (sale, credit, supply, ...)
//!
//! ## Transaction Discipline
//!
//! Repository reads go through the pool; every write that belongs to an
//! operation takes `&mut SqliteConnection` so the service layer owns
//! the transaction boundary and commits or rolls back the whole batch.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boutik_db::{Database, DbConfig};
//! use boutik_db::service::sale;
//!
//! let db = Database::new(DbConfig::new("boutik.db")).await?;
//! let draft = sale::prepare_sale(&db, "Riz 5kg x 3", 5_000).await?;
//! let receipt = sale::commit_sale(&db, &draft).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError, RunMode};
pub use error::{DbError, OpError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::credit::CreditRepository;
pub use repository::movement::MovementRepository;
pub use repository::product::ProductRepository;
pub use repository::supplier::SupplierRepository;
