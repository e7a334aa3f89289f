//! # Order-Line Parser
//!
//! Turns free text like `"Riz 5kg x 3, Savon x 2"` into validated
//! line items against a product catalog.
//!
//! ## Token Contract
//! ```text
//! "Riz 5kg x 3, Savon x 2, Huile"
//!        │
//!        ▼ split on commas, trim, drop blanks
//! ["Riz 5kg x 3", "Savon x 2", "Huile"]
//!        │
//!        ▼ per token: rsplit on the LAST literal 'x'
//! name ── resolver ──► product      qty ── non-negative integer
//!        │
//!        ▼ Sale mode only: qty must fit the available stock
//! OrderLine { product, quantity, unit_price, subtotal }
//! ```
//!
//! Failures never abort the batch: each bad token becomes a
//! [`LineReport`] and parsing continues with the remaining tokens. The
//! caller decides what an empty result means (`ParsedBatch` keeps
//! enough state to tell "blank input" from "nothing survived").

use serde::Serialize;

use crate::error::CoreError;
use crate::money::Money;
use crate::resolver::resolve_product;
use crate::types::Product;

// =============================================================================
// Batch Types
// =============================================================================

/// Which operation the batch feeds. The two flows price and validate
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Immediate sale: quantities are checked against stock and
    /// per-line promotions are applied to the subtotal.
    Sale,
    /// Deferred-payment credit: no stock check, no promotion; lines are
    /// priced at the plain sale price.
    Credit,
}

/// An accepted order line with its resolved product and computed
/// subtotal.
#[derive(Debug, Clone)]
pub struct OrderLine {
    /// Resolved product, cloned from the catalog so the commit phase
    /// can snapshot both prices.
    pub product: Product,
    pub quantity: i64,
    /// Unit sale price in cents at parse time (before promotion).
    pub unit_price_cents: i64,
    /// Line subtotal in cents; in Sale mode the promotion is already
    /// applied.
    pub subtotal_cents: i64,
}

/// A rejected token and the error that rejected it.
#[derive(Debug, Clone)]
pub struct LineReport {
    pub token: String,
    pub error: CoreError,
}

impl LineReport {
    /// User-visible message for this rejected token.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Outcome of parsing one batch: accepted lines in input order, plus a
/// report per rejected token.
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub lines: Vec<OrderLine>,
    pub rejects: Vec<LineReport>,
    /// Sum of accepted line subtotals, in cents.
    pub total_cents: i64,
}

impl ParsedBatch {
    /// True when the input contained no tokens at all (blank input).
    ///
    /// Distinct from "every token was rejected", which leaves
    /// `rejects` non-empty.
    pub fn is_empty_input(&self) -> bool {
        self.lines.is_empty() && self.rejects.is_empty()
    }

    /// Total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Serializable per-token error for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineReportDto {
    pub token: String,
    pub message: String,
}

impl From<&LineReport> for LineReportDto {
    fn from(report: &LineReport) -> Self {
        LineReportDto {
            token: report.token.clone(),
            message: report.message(),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a comma-separated batch of `<name> x <qty>` tokens against
/// the catalog.
///
/// Accepted lines keep their input order. Rejected tokens are collected
/// in `rejects` and never abort the batch.
///
/// ## Edge Cases
/// - the split is on the LAST `x`, so names containing `x` still parse
///   (`"Xbox x 2"` → name `"Xbox"`, qty 2)
/// - the separator is the literal ASCII `x`, case-sensitive (`×` and
///   `X` do not split)
/// - quantity `0` is accepted and contributes nothing; negatives are
///   malformed
pub fn parse_order_batch(input: &str, catalog: &[Product], mode: BatchMode) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match parse_token(token, catalog, mode) {
            Ok(line) => {
                batch.total_cents += line.subtotal_cents;
                batch.lines.push(line);
            }
            Err(error) => batch.rejects.push(LineReport {
                token: token.to_string(),
                error,
            }),
        }
    }

    batch
}

/// Parses and resolves a single `<name> x <qty>` token.
fn parse_token(token: &str, catalog: &[Product], mode: BatchMode) -> Result<OrderLine, CoreError> {
    let (name, qty) = token
        .rsplit_once('x')
        .ok_or_else(|| CoreError::MalformedLine {
            token: token.to_string(),
            reason: "missing 'x' separator".to_string(),
        })?;

    let quantity: i64 = qty
        .trim()
        .parse()
        .ok()
        .filter(|q| *q >= 0)
        .ok_or_else(|| CoreError::MalformedLine {
            token: token.to_string(),
            reason: format!("quantity '{}' is not a non-negative integer", qty.trim()),
        })?;

    let product = resolve_product(name, catalog)?;

    if mode == BatchMode::Sale && !product.can_sell(quantity) {
        return Err(CoreError::InsufficientStock {
            name: product.name.clone(),
            available: product.stock_qty,
            requested: quantity,
        });
    }

    let gross = product.sale_price().multiply_quantity(quantity);
    let subtotal = match mode {
        BatchMode::Sale if !product.promotion().is_zero() => {
            gross.apply_percentage_discount(product.promotion_bps)
        }
        _ => gross,
    };

    Ok(OrderLine {
        product: product.clone(),
        quantity,
        unit_price_cents: product.sale_price_cents,
        subtotal_cents: subtotal.cents(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
