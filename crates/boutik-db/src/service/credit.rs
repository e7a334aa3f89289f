//! # Credit Operation
//!
//! Opens customer credits and records payments against them.
//!
//! ## Invariants
//! - a credit's payments never sum past its total (`OverPayment` is
//!   rejected whole, the excess is never partially applied)
//! - `settled` flips to true exactly when cumulative payments reach
//!   the total, and never flips back
//! - the balance read and the payment write happen inside one
//!   transaction, so concurrent payments against the same credit
//!   serialize instead of both passing the balance check

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DbError, OpError, OpResult};
use crate::pool::Database;
use crate::repository::credit::{CreditRepository, NewCredit};
use boutik_core::parser::LineReportDto;
use boutik_core::validation::{validate_client_name, validate_payment_amount};
use boutik_core::{
    parse_order_batch, BatchMode, CoreError, Credit, CreditLine, CreditPayment,
};

// =============================================================================
// DTOs
// =============================================================================

/// Result of opening a credit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditReceipt {
    pub credit_id: i64,
    pub total_cents: i64,
    pub line_count: usize,
    /// Rejected tokens, for display next to the confirmation.
    pub rejects: Vec<LineReportDto>,
}

/// Result of recording one payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub payment_id: i64,
    /// Cumulative payments after this one, in cents.
    pub paid_cents: i64,
    /// Remaining balance after this one, in cents.
    pub balance_cents: i64,
    /// Whether this payment settled the credit.
    pub settled: bool,
}

/// Full view of one credit for display: header, lines, payments,
/// derived balance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditStatement {
    pub credit: Credit,
    pub lines: Vec<CreditLine>,
    pub payments: Vec<CreditPayment>,
    pub paid_cents: i64,
    pub balance_cents: i64,
}

// =============================================================================
// Open Credit
// =============================================================================

/// Opens a credit for a client from a free-text order batch.
///
/// Lines are priced at the plain sale price (no promotion, no stock
/// check - goods on credit may be reserved before restocking arrives).
/// The credit and all its lines are inserted in one transaction and
/// the credit starts unsettled.
///
/// ## Errors
/// - `Validation` for a missing client name
/// - `InvalidInput` for blank input
/// - `NoValidLines` when the accepted lines total zero
pub async fn open_credit(
    db: &Database,
    client_name: &str,
    contact: Option<&str>,
    input: &str,
) -> OpResult<CreditReceipt> {
    validate_client_name(client_name).map_err(CoreError::from)?;

    let catalog = db.products().list_all().await?;
    let batch = parse_order_batch(input, &catalog, BatchMode::Credit);

    if batch.is_empty_input() {
        return Err(OpError::Core(CoreError::InvalidInput {
            reason: "no order lines given".to_string(),
        }));
    }

    if batch.total_cents == 0 {
        for reject in &batch.rejects {
            warn!(token = %reject.token, "rejected credit line: {}", reject.message());
        }
        return Err(OpError::Core(CoreError::NoValidLines));
    }

    let mut tx = db.pool().begin().await.map_err(DbError::from)?;

    let credit_id = CreditRepository::insert(
        &mut tx,
        &NewCredit {
            client_name: client_name.trim().to_string(),
            contact: contact
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            total_cents: batch.total_cents,
        },
    )
    .await?;

    for line in &batch.lines {
        CreditRepository::insert_line(
            &mut tx,
            credit_id,
            &line.product.id,
            line.quantity,
            line.unit_price_cents,
        )
        .await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    info!(
        credit_id = %credit_id,
        client = %client_name.trim(),
        total = batch.total_cents,
        lines = batch.lines.len(),
        "Credit opened"
    );

    Ok(CreditReceipt {
        credit_id,
        total_cents: batch.total_cents,
        line_count: batch.lines.len(),
        rejects: batch.rejects.iter().map(LineReportDto::from).collect(),
    })
}

// =============================================================================
// Record Payment
// =============================================================================

/// Records a payment against a credit.
///
/// One atomic read-modify-write: balance computed and payment written
/// inside the same transaction. Rejects `OverPayment` when the amount
/// exceeds the remaining balance; flips `settled` when cumulative
/// payments reach the total.
pub async fn record_credit_payment(
    db: &Database,
    credit_id: i64,
    amount_cents: i64,
) -> OpResult<PaymentOutcome> {
    validate_payment_amount(amount_cents).map_err(CoreError::from)?;

    let mut tx = db.pool().begin().await.map_err(DbError::from)?;

    let credit = CreditRepository::get_in(&mut tx, credit_id)
        .await?
        .ok_or_else(|| DbError::not_found("Credit", credit_id.to_string()))?;

    let paid_before = CreditRepository::payments_total_in(&mut tx, credit_id).await?;
    let balance = credit.total_cents - paid_before;

    if amount_cents > balance {
        return Err(OpError::Core(CoreError::OverPayment {
            amount_cents,
            balance_cents: balance,
        }));
    }

    let payment_id = CreditRepository::insert_payment(&mut tx, credit_id, amount_cents).await?;

    let paid_cents = paid_before + amount_cents;
    let settled = paid_cents >= credit.total_cents;
    if settled && !credit.settled {
        CreditRepository::mark_settled(&mut tx, credit_id).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    info!(
        credit_id = %credit_id,
        amount = %amount_cents,
        balance = %(balance - amount_cents),
        settled = %settled,
        "Payment recorded"
    );

    Ok(PaymentOutcome {
        payment_id,
        paid_cents,
        balance_cents: balance - amount_cents,
        settled,
    })
}

// =============================================================================
// Statement
// =============================================================================

/// Loads one credit with its lines, payments and derived balance.
pub async fn credit_statement(db: &Database, credit_id: i64) -> OpResult<CreditStatement> {
    let credits = db.credits();

    let credit = credits
        .get_by_id(credit_id)
        .await?
        .ok_or_else(|| DbError::not_found("Credit", credit_id.to_string()))?;

    let lines = credits.lines(credit_id).await?;
    let payments = credits.payments(credit_id).await?;
    let paid_cents: i64 = payments.iter().map(|p| p.amount_cents).sum();

    Ok(CreditStatement {
        paid_cents,
        balance_cents: credit.total_cents - paid_cents,
        credit,
        lines,
        payments,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{seed_product, test_db};

    #[tokio::test]
    async fn test_open_credit_persists_lines_atomically() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;
        seed_product(&db, "Savon", 5, 300, 500).await;

        let receipt = open_credit(&db, "Awa Diallo", Some("77 123 45 67"), "Riz 5kg x 2, Savon x 1")
            .await
            .unwrap();
        assert_eq!(receipt.total_cents, 2_500);
        assert_eq!(receipt.line_count, 2);

        let statement = credit_statement(&db, receipt.credit_id).await.unwrap();
        assert_eq!(statement.credit.client_name, "Awa Diallo");
        assert!(!statement.credit.settled);
        assert_eq!(statement.lines.len(), 2);
        assert_eq!(statement.balance_cents, 2_500);
        assert_eq!(db.credits().open_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_credit_ignores_stock_limits() {
        let db = test_db().await;
        seed_product(&db, "Savon", 2, 300, 500).await;

        // Quantity above stock is accepted on the credit path.
        let receipt = open_credit(&db, "Awa", None, "Savon x 10").await.unwrap();
        assert_eq!(receipt.total_cents, 5_000);
    }

    #[tokio::test]
    async fn test_open_credit_requires_client_and_valid_lines() {
        let db = test_db().await;
        seed_product(&db, "Savon", 5, 300, 500).await;

        let err = open_credit(&db, "  ", None, "Savon x 1").await.unwrap_err();
        assert!(matches!(
            err,
            OpError::Core(CoreError::Validation(_))
        ));

        let err = open_credit(&db, "Awa", None, "unknown thing x 2").await.unwrap_err();
        assert!(matches!(err, OpError::Core(CoreError::NoValidLines)));

        let err = open_credit(&db, "Awa", None, " ").await.unwrap_err();
        assert!(matches!(err, OpError::Core(CoreError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_settlement_after_cumulative_payments() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;

        // total = 100 × 1 line of Riz... use 1000-cent line for total 1000,
        // paid 400 then 600.
        let receipt = open_credit(&db, "Moussa", None, "Riz 5kg x 1").await.unwrap();
        assert_eq!(receipt.total_cents, 1_000);

        let first = record_credit_payment(&db, receipt.credit_id, 400).await.unwrap();
        assert!(!first.settled);
        assert_eq!(first.balance_cents, 600);

        let second = record_credit_payment(&db, receipt.credit_id, 600).await.unwrap();
        assert!(second.settled);
        assert_eq!(second.balance_cents, 0);

        let statement = credit_statement(&db, receipt.credit_id).await.unwrap();
        assert!(statement.credit.settled);
        assert_eq!(statement.payments.len(), 2);
        assert_eq!(db.credits().open_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_overpayment_rejected_whole() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;

        let receipt = open_credit(&db, "Moussa", None, "Riz 5kg x 1").await.unwrap();

        let err = record_credit_payment(&db, receipt.credit_id, 1_500).await.unwrap_err();
        match err {
            OpError::Core(CoreError::OverPayment {
                amount_cents,
                balance_cents,
            }) => {
                assert_eq!(amount_cents, 1_500);
                assert_eq!(balance_cents, 1_000);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Nothing was applied, settled stays false.
        let statement = credit_statement(&db, receipt.credit_id).await.unwrap();
        assert!(statement.payments.is_empty());
        assert!(!statement.credit.settled);
    }

    #[tokio::test]
    async fn test_payment_on_settled_credit_rejected() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;

        let receipt = open_credit(&db, "Moussa", None, "Riz 5kg x 1").await.unwrap();
        record_credit_payment(&db, receipt.credit_id, 1_000).await.unwrap();

        // Balance is zero; any further payment overpays.
        let err = record_credit_payment(&db, receipt.credit_id, 1).await.unwrap_err();
        assert!(matches!(err, OpError::Core(CoreError::OverPayment { .. })));
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected() {
        let db = test_db().await;
        seed_product(&db, "Riz 5kg", 10, 700, 1000).await;
        let receipt = open_credit(&db, "Moussa", None, "Riz 5kg x 1").await.unwrap();

        for bad in [0, -100] {
            let err = record_credit_payment(&db, receipt.credit_id, bad).await.unwrap_err();
            assert!(matches!(err, OpError::Core(CoreError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_unknown_credit_is_not_found() {
        let db = test_db().await;
        let err = record_credit_payment(&db, 999, 100).await.unwrap_err();
        assert!(matches!(err, OpError::Db(DbError::NotFound { .. })));
    }
}
