//! # Product Resolver
//!
//! Resolves a free-text name to a catalog product.
//!
//! ## Resolution Tiers
//! ```text
//! input name
//!     │
//!     ▼
//! 1. exact match (lowercase equality)      exactly one? ──► return it
//!     │ otherwise
//!     ▼
//! 2. substring containment (lowercase)     exactly one? ──► return it
//!     │ zero or several: fall through
//!     ▼
//! 3. similarity ranking over the whole     best score > 0.6? ──► return it
//!    catalog (matching-blocks ratio)
//!     │ otherwise
//!     ▼
//! ProductNotFound
//! ```
//!
//! The first tier that produces a usable result wins; there is no
//! fallthrough once a tier matched. Tier 2 ambiguity (several products
//! containing the input) deliberately yields to tier 3 ranking instead
//! of raising an error.
//!
//! Resolution is deterministic: equality and containment use a
//! locale-naive lowercase fold, and tier 3 breaks score ties by catalog
//! order, so the same catalog slice always resolves the same input to
//! the same product.

use crate::error::CoreError;
use crate::types::Product;
use crate::SIMILARITY_THRESHOLD;

// =============================================================================
// Resolution
// =============================================================================

/// Resolves a product by name against the given catalog.
///
/// The catalog order is part of the contract: tier 3 score ties go to
/// the earliest entry, so callers must pass a stably ordered slice
/// (the product repository lists in fixed name order).
///
/// ## Errors
/// - `InvalidInput` for an empty or whitespace-only name
/// - `ProductNotFound` when no tier produces a match above threshold
pub fn resolve_product<'a>(name: &str, catalog: &'a [Product]) -> Result<&'a Product, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidInput {
            reason: "product name is empty".to_string(),
        });
    }
    let needle = name.to_lowercase();

    // Tier 1: exact match, usable only when unambiguous. Duplicate
    // exact names fall through and end up ranked by tier 3, where the
    // catalog-order tie break picks the first.
    let mut exact = catalog.iter().filter(|p| p.name.to_lowercase() == needle);
    if let Some(first) = exact.next() {
        if exact.next().is_none() {
            return Ok(first);
        }
    }

    // Tier 2: unique substring containment.
    let mut contains = catalog
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle));
    if let (Some(first), None) = (contains.next(), contains.next()) {
        return Ok(first);
    }

    // Tier 3: rank every product by similarity; strict > keeps the
    // earliest catalog entry on ties.
    let mut best: Option<(&Product, f64)> = None;
    for product in catalog {
        let score = similarity_ratio(&product.name, name);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((product, score));
        }
    }

    match best {
        Some((product, score)) if score > SIMILARITY_THRESHOLD => Ok(product),
        _ => Err(CoreError::ProductNotFound(name.to_string())),
    }
}

// =============================================================================
// Similarity Ratio
// =============================================================================

/// Normalized similarity of two strings in `[0, 1]`.
///
/// Computed as `2·M / T` where `M` is the total length of the matching
/// blocks found by the Ratcliff/Obershelp procedure (longest common
/// run, then recurse on both sides) and `T` is the combined length of
/// the lowercased inputs. Equivalent to Python difflib
/// `SequenceMatcher::ratio()` without junk heuristics, which is what
/// the 0.6 acceptance threshold was calibrated against.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        // Two empty strings are identical.
        return 1.0;
    }
    let matched = matching_block_len(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total length of matching blocks between `a` and `b`: the longest
/// common run plus, recursively, the matches to its left and right.
fn matching_block_len(a: &[char], b: &[char]) -> usize {
    let (a_start, b_start, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_block_len(&a[..a_start], &b[..b_start])
        + matching_block_len(&a[a_start + len..], &b[b_start + len..])
}

/// Finds the longest run of characters common to `a` and `b`.
///
/// Returns `(start_in_a, start_in_b, length)`; on equal lengths the
/// earliest run in `a` (then in `b`) wins, matching difflib's
/// `find_longest_match`.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // runs[j] = length of the common run ending at a[i] and b[j]
    let mut runs = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        // Walk b right-to-left so runs[j-1] still holds the previous row.
        for j in (0..b.len()).rev() {
            runs[j + 1] = if b[j] == ca { runs[j] + 1 } else { 0 };
            let len = runs[j + 1];
            if len > best.2 {
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        runs[0] = 0;
    }
    best
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            purchase_price_cents: 700,
            sale_price_cents: 1000,
            stock_qty: 10,
            supplier_id: None,
            category: None,
            promotion_bps: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("P001", "Riz"),
            product("P002", "Riz 5kg"),
            product("P003", "Huile 1L"),
            product("P004", "Savon"),
        ]
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let catalog = catalog();
        assert_eq!(resolve_product("riz", &catalog).unwrap().id, "P001");
        assert_eq!(resolve_product("RIZ", &catalog).unwrap().id, "P001");
        assert_eq!(resolve_product("  Riz  ", &catalog).unwrap().id, "P001");
    }

    #[test]
    fn test_unique_substring_match() {
        let catalog = catalog();
        // Only "Huile 1L" contains "huile".
        assert_eq!(resolve_product("huile", &catalog).unwrap().id, "P003");
    }

    #[test]
    fn test_ambiguous_substring_falls_through_to_ranking() {
        // "riz 5" is contained only in "Riz 5kg", but "ri" is contained
        // in both rice products: tier 2 is ambiguous and tier 3 ranks.
        // "Riz" (shorter) scores 2·2/5 = 0.8 against "ri";
        // "Riz 5kg" scores 2·2/9 ≈ 0.44. Expected pick: "Riz".
        let catalog = catalog();
        assert_eq!(resolve_product("ri", &catalog).unwrap().id, "P001");
    }

    #[test]
    fn test_similarity_above_threshold() {
        let catalog = catalog();
        // "savn" vs "savon": blocks "sav" + "n" → 2·4/9 ≈ 0.89
        assert_eq!(resolve_product("savn", &catalog).unwrap().id, "P004");
    }

    #[test]
    fn test_similarity_at_or_below_threshold_fails() {
        let catalog = catalog();
        let err = resolve_product("zzz", &catalog).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));

        // "sv" vs "savon": blocks "s" + "v" → 2·2/7 ≈ 0.57 ≤ 0.6, and
        // it scores below threshold against everything else too.
        let err = resolve_product("sv", &catalog).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));
    }

    #[test]
    fn test_empty_name_is_invalid_input() {
        let catalog = catalog();
        assert!(matches!(
            resolve_product("", &catalog),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            resolve_product("   ", &catalog),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_not_found() {
        assert!(matches!(
            resolve_product("riz", &[]),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_score_tie_resolves_to_first_catalog_entry() {
        // Both names score identically against "sel x"; the earlier
        // catalog entry must win, reproducibly.
        let catalog = vec![product("P001", "Sel A"), product("P002", "Sel B")];
        assert_eq!(resolve_product("sel x", &catalog).unwrap().id, "P001");
    }

    #[test]
    fn test_duplicate_exact_names_resolve_to_first() {
        let catalog = vec![
            product("P001", "Sucre"),
            product("P002", "Sucre"),
            product("P003", "Sel"),
        ];
        // Tier 1 is ambiguous, tier 2 is ambiguous, tier 3 ties at 1.0
        // and catalog order picks the first.
        assert_eq!(resolve_product("sucre", &catalog).unwrap().id, "P001");
    }

    #[test]
    fn test_similarity_ratio_known_values() {
        // Values match Python difflib.SequenceMatcher(None, a, b).ratio()
        assert!((similarity_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!((similarity_ratio("riz", "riz") - 1.0).abs() < 1e-9);
        assert!((similarity_ratio("RIZ", "riz") - 1.0).abs() < 1e-9);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert!((similarity_ratio("", "") - 1.0).abs() < 1e-9);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
        // "savon" vs "savn": 2·4/9
        assert!((similarity_ratio("savon", "savn") - 8.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_longest_common_run_prefers_earliest() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        // Two runs of length 2 exist in `a`; the earliest wins.
        assert_eq!(longest_common_run(&a, &b), (0, 0, 2));
    }
}
