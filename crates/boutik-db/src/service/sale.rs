//! # Sale Operation
//!
//! The two-phase sale flow.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Sale Lifecycle                           │
//! │                                                              │
//! │  1. DRAFT                                                    │
//! │     └── prepare_sale() → SaleDraft                           │
//! │         parse batch, price lines (promotions applied),       │
//! │         check tendered amount covers the total               │
//! │                                                              │
//! │  2. AWAITING CONFIRMATION                                    │
//! │     └── caller presents the draft (total, change due,        │
//! │         rejected tokens); nothing has been written           │
//! │                                                              │
//! │  3. COMMITTED                                                │
//! │     └── commit_sale() → SaleReceipt                          │
//! │         one transaction: guarded stock decrement + sale      │
//! │         movement per line; any failure rolls back ALL lines  │
//! │                                                              │
//! │  Aborting is dropping the draft - no state to clean up.      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Committing is the explicit confirmation step; `prepare_sale` never
//! writes. Stock is validated twice: against the loaded catalog at
//! parse time (fast feedback) and again by the guarded UPDATE at
//! commit time (the authoritative check under concurrency).

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DbError, OpError, OpResult};
use crate::pool::Database;
use crate::repository::movement::MovementRepository;
use crate::repository::product::ProductRepository;
use boutik_core::parser::LineReportDto;
use boutik_core::{
    parse_order_batch, BatchMode, CoreError, LineReport, MovementKind, NewMovement, OrderLine,
};

// =============================================================================
// Draft & Receipt Types
// =============================================================================

/// A priced, validated sale awaiting confirmation. Holding a draft
/// writes nothing; dropping it aborts the sale.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    /// Accepted lines in input order, promotions applied.
    pub lines: Vec<OrderLine>,
    /// Tokens that were rejected during parsing, for display alongside
    /// the draft.
    pub rejects: Vec<LineReport>,
    /// Sale total in cents.
    pub total_cents: i64,
    /// Amount the customer tendered, in cents.
    pub tendered_cents: i64,
    /// Change due, in cents.
    pub change_cents: i64,
}

/// Result of a committed sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub total_cents: i64,
    pub tendered_cents: i64,
    pub change_cents: i64,
    pub lines_committed: usize,
    /// Rejected tokens carried over from the draft.
    pub rejects: Vec<LineReportDto>,
}

// =============================================================================
// Prepare (Draft → AwaitingConfirmation)
// =============================================================================

/// Parses and prices a sale batch without writing anything.
///
/// ## Errors
/// - `InvalidInput` for blank input
/// - `NoValidLines` when every token was rejected (the per-token
///   reports are logged before aborting)
/// - `InsufficientPayment` when `tendered_cents` doesn't cover the
///   total; the shortfall is in the error
pub async fn prepare_sale(db: &Database, input: &str, tendered_cents: i64) -> OpResult<SaleDraft> {
    let catalog = db.products().list_all().await?;
    let batch = parse_order_batch(input, &catalog, BatchMode::Sale);

    if batch.is_empty_input() {
        return Err(OpError::Core(CoreError::InvalidInput {
            reason: "no order lines given".to_string(),
        }));
    }

    if batch.lines.is_empty() {
        for reject in &batch.rejects {
            warn!(token = %reject.token, "rejected order line: {}", reject.message());
        }
        return Err(OpError::Core(CoreError::NoValidLines));
    }

    let total_cents = batch.total_cents;
    if tendered_cents < total_cents {
        return Err(OpError::Core(CoreError::InsufficientPayment {
            shortfall_cents: total_cents - tendered_cents,
        }));
    }

    info!(
        lines = batch.lines.len(),
        rejected = batch.rejects.len(),
        total = total_cents,
        "Sale drafted"
    );

    Ok(SaleDraft {
        lines: batch.lines,
        rejects: batch.rejects,
        total_cents,
        tendered_cents,
        change_cents: tendered_cents - total_cents,
    })
}

// =============================================================================
// Commit (AwaitingConfirmation → Committed)
// =============================================================================

/// Commits a drafted sale: the explicit confirmation step.
///
/// All lines are applied in one transaction. Each line decrements
/// stock through the guarded UPDATE and appends a sale movement with
/// both unit prices snapshotted. If any line fails - typically a
/// concurrent sale drained the stock since the draft - the whole
/// batch rolls back and `InsufficientStock` reports the current
/// availability.
pub async fn commit_sale(db: &Database, draft: &SaleDraft) -> OpResult<SaleReceipt> {
    if draft.lines.is_empty() {
        return Err(OpError::Core(CoreError::NoValidLines));
    }

    let mut tx = db.pool().begin().await.map_err(DbError::from)?;

    for line in &draft.lines {
        let deducted =
            ProductRepository::deduct_stock(&mut tx, &line.product.id, line.quantity).await?;

        if !deducted {
            // Early return drops the transaction, rolling back every
            // line already applied.
            let available = ProductRepository::get_by_id_in(&mut tx, &line.product.id)
                .await?
                .map(|p| p.stock_qty)
                .unwrap_or(0);
            return Err(OpError::Core(CoreError::InsufficientStock {
                name: line.product.name.clone(),
                available,
                requested: line.quantity,
            }));
        }

        MovementRepository::insert(
            &mut tx,
            &NewMovement {
                product_id: line.product.id.clone(),
                kind: MovementKind::Sale,
                quantity: line.quantity,
                purchase_price_cents: line.product.purchase_price_cents,
                sale_price_cents: line.unit_price_cents,
            },
        )
        .await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    info!(
        lines = draft.lines.len(),
        total = draft.total_cents,
        change = draft.change_cents,
        "Sale committed"
    );

    Ok(SaleReceipt {
        total_cents: draft.total_cents,
        tendered_cents: draft.tendered_cents,
        change_cents: draft.change_cents,
        lines_committed: draft.lines.len(),
        rejects: draft.rejects.iter().map(LineReportDto::from).collect(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
