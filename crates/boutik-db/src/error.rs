//! # Database Error Types
//!
//! Error types for database operations, plus the operation-level error
//! the presentation layer consumes.
//!
//! ## Error Flow
//! ```text
//! SQLite Error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module)  ← adds context and categorization
//!      │
//!      ▼              CoreError (boutik-core)
//!      │                   │
//!      └────────┬──────────┘
//!               ▼
//! OpError ← code + user-visible message for flash/JSON rendering
//! ```

use serde::Serialize;
use thiserror::Error;

use boutik_core::CoreError;

// =============================================================================
// Db Error
// =============================================================================

/// Database operation errors.
///
/// These wrap sqlx errors and provide additional context for debugging
/// and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (e.g. duplicate supplier id).
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation (e.g. unknown supplier
    /// reference on a supply operation).
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// SQLite reports constraint failures through the database error
/// message; the mapping inspects it to categorize.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Operation Error
// =============================================================================

/// Machine-readable error codes for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    MalformedLine,
    InsufficientStock,
    InsufficientPayment,
    OverPayment,
    NoValidLines,
    DatabaseError,
}

/// An error surfaced by a ledger operation.
///
/// Wraps domain and storage errors; `code()` and `user_message()` form
/// the structured contract the (out-of-scope) presentation layer
/// renders as flash messages or JSON error bodies. Nothing is
/// swallowed: storage details are logged, domain details are shown.
#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl OpError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            OpError::Core(core) => match core {
                CoreError::InvalidInput { .. } | CoreError::Validation(_) => {
                    ErrorCode::ValidationError
                }
                CoreError::MalformedLine { .. } => ErrorCode::MalformedLine,
                CoreError::ProductNotFound(_) => ErrorCode::NotFound,
                CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                CoreError::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
                CoreError::OverPayment { .. } => ErrorCode::OverPayment,
                CoreError::NoValidLines => ErrorCode::NoValidLines,
            },
            OpError::Db(db) => match db {
                DbError::NotFound { .. } => ErrorCode::NotFound,
                DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                    ErrorCode::ValidationError
                }
                _ => ErrorCode::DatabaseError,
            },
        }
    }

    /// Human-readable message safe to show to the user.
    ///
    /// Domain errors carry their own wording; storage failures are
    /// collapsed to a generic message and logged with full detail.
    pub fn user_message(&self) -> String {
        match self {
            OpError::Core(core) => core.to_string(),
            OpError::Db(db) => match db {
                DbError::NotFound { entity, id } => format!("{} not found: {}", entity, id),
                DbError::UniqueViolation { field } => format!("{} already exists", field),
                DbError::ForeignKeyViolation { .. } => "Invalid reference".to_string(),
                other => {
                    tracing::error!(error = %other, "database operation failed");
                    "Database operation failed".to_string()
                }
            },
        }
    }
}

/// Result type for ledger operations.
pub type OpResult<T> = Result<T, OpError>;

// =============================================================================
// Unit Tests
// =============================================================================
