//! Ledger arithmetic: the per-kind stock effect table and its reversal.
//!
//! Every stock mutation in the system funnels through `apply_effect`, and
//! every corrective deletion through `reverse_effect`. Negative stock is
//! rejected: backorders are not modeled, so a mutation that would drive
//! `current_stock` below zero fails instead of being flagged.

use stockpile_core::{DomainError, DomainResult};

use crate::transaction::{TransactionDraft, TransactionKind};

/// Validate a draft's shape before any arithmetic.
///
/// Quantity rules per kind:
/// - `stock_in` / `stock_out` / `move`: magnitude, must be > 0
/// - `adjust`: signed delta, must be nonzero
/// - `count`: absolute value, must be ≥ 0
pub fn validate_draft(draft: &TransactionDraft) -> DomainResult<()> {
    match draft.kind {
        TransactionKind::StockIn | TransactionKind::StockOut | TransactionKind::Move => {
            if draft.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "{} quantity must be positive",
                    draft.kind
                )));
            }
        }
        TransactionKind::Adjust => {
            if draft.quantity == 0 {
                return Err(DomainError::validation("adjust delta cannot be zero"));
            }
        }
        TransactionKind::Count => {
            if draft.quantity < 0 {
                return Err(DomainError::validation("counted value cannot be negative"));
            }
        }
    }

    if draft.kind == TransactionKind::Move
        && draft.source_location_id == draft.destination_location_id
    {
        // Both-None means "default bucket to default bucket".
        return Err(DomainError::validation(
            "move source and destination must be distinct",
        ));
    }

    Ok(())
}

fn overflow() -> DomainError {
    DomainError::validation("stock value out of range")
}

/// Compute the new `current_stock` after applying one transaction.
///
/// All arithmetic is checked; a quantity that would push the stock past the
/// `i64` range is rejected, never wrapped.
pub fn apply_effect(current: i64, kind: TransactionKind, quantity: i64) -> DomainResult<i64> {
    match kind {
        TransactionKind::StockIn => current.checked_add(quantity).ok_or_else(overflow),
        TransactionKind::StockOut => {
            let next = current.checked_sub(quantity).ok_or_else(overflow)?;
            if next < 0 {
                return Err(DomainError::insufficient_stock(format!(
                    "stock out of {quantity} would leave {next}"
                )));
            }
            Ok(next)
        }
        TransactionKind::Adjust => {
            let next = current.checked_add(quantity).ok_or_else(overflow)?;
            if next < 0 {
                return Err(DomainError::insufficient_stock(format!(
                    "adjustment of {quantity} would leave {next}"
                )));
            }
            Ok(next)
        }
        TransactionKind::Move => {
            // No net change to the team-wide total, but the source side must
            // be able to give up the quantity.
            if quantity > current {
                return Err(DomainError::insufficient_stock(format!(
                    "cannot move {quantity} with only {current} on hand"
                )));
            }
            Ok(current)
        }
        TransactionKind::Count => Ok(quantity),
    }
}

/// Compute the new `current_stock` after reversing one transaction: the same
/// effect table, negated.
///
/// `Count` sets an absolute value and carries no prior state, so it is not
/// reversible; deleting one is a conflict.
pub fn reverse_effect(current: i64, kind: TransactionKind, quantity: i64) -> DomainResult<i64> {
    match kind {
        TransactionKind::StockIn => {
            let next = current.checked_sub(quantity).ok_or_else(overflow)?;
            if next < 0 {
                return Err(DomainError::insufficient_stock(format!(
                    "reversing a stock in of {quantity} would leave {next}"
                )));
            }
            Ok(next)
        }
        TransactionKind::StockOut => current.checked_add(quantity).ok_or_else(overflow),
        TransactionKind::Adjust => {
            let next = current.checked_sub(quantity).ok_or_else(overflow)?;
            if next < 0 {
                return Err(DomainError::insufficient_stock(format!(
                    "reversing an adjustment of {quantity} would leave {next}"
                )));
            }
            Ok(next)
        }
        TransactionKind::Move => Ok(current),
        TransactionKind::Count => Err(DomainError::conflict(
            "count transactions cannot be reversed; record a new count",
        )),
    }
}

/// The signed contribution of one transaction to the team-wide total.
///
/// `Count` has no fixed signed effect (it depends on the prior value) and
/// returns `None`.
pub fn signed_effect(kind: TransactionKind, quantity: i64) -> Option<i64> {
    match kind {
        TransactionKind::StockIn => Some(quantity),
        TransactionKind::StockOut => Some(-quantity),
        TransactionKind::Adjust => Some(quantity),
        TransactionKind::Move => Some(0),
        TransactionKind::Count => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionKind::*;
    use proptest::prelude::*;
    use stockpile_core::ItemId;

    fn draft(kind: TransactionKind, quantity: i64) -> TransactionDraft {
        TransactionDraft {
            item_id: ItemId::new(),
            kind,
            quantity,
            source_location_id: None,
            destination_location_id: None,
            notes: None,
        }
    }

    #[test]
    fn quantity_rules_per_kind() {
        assert!(validate_draft(&draft(StockIn, 1)).is_ok());
        assert!(validate_draft(&draft(StockIn, 0)).is_err());
        assert!(validate_draft(&draft(StockOut, -1)).is_err());
        assert!(validate_draft(&draft(Adjust, -5)).is_ok());
        assert!(validate_draft(&draft(Adjust, 0)).is_err());
        assert!(validate_draft(&draft(Count, 0)).is_ok());
        assert!(validate_draft(&draft(Count, -1)).is_err());
    }

    #[test]
    fn move_requires_distinct_endpoints() {
        use stockpile_core::LocationId;

        let mut d = draft(Move, 2);
        assert!(validate_draft(&d).is_err(), "both default buckets");

        d.destination_location_id = Some(LocationId::new());
        assert!(validate_draft(&d).is_ok(), "default bucket to a location");

        d.source_location_id = d.destination_location_id;
        assert!(validate_draft(&d).is_err(), "same location twice");
    }

    #[test]
    fn stock_out_below_zero_is_rejected() {
        let err = apply_effect(2, StockOut, 3).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock(_)));
        assert_eq!(apply_effect(3, StockOut, 3).unwrap(), 0);
    }

    #[test]
    fn adjust_applies_signed_delta() {
        assert_eq!(apply_effect(10, Adjust, -4).unwrap(), 6);
        assert_eq!(apply_effect(10, Adjust, 4).unwrap(), 14);
        assert!(apply_effect(3, Adjust, -4).is_err());
    }

    #[test]
    fn move_leaves_total_unchanged_but_checks_on_hand() {
        assert_eq!(apply_effect(7, Move, 2).unwrap(), 7);
        assert!(matches!(
            apply_effect(1, Move, 2).unwrap_err(),
            DomainError::InsufficientStock(_)
        ));
    }

    #[test]
    fn overflow_is_rejected_not_wrapped() {
        let err = apply_effect(5, StockIn, i64::MAX).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = apply_effect(i64::MAX, Adjust, 1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = apply_effect(i64::MIN, Adjust, -1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Reversal arithmetic is checked the same way.
        let err = reverse_effect(5, StockOut, i64::MAX).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = reverse_effect(i64::MIN, StockIn, 1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn count_sets_absolute_value() {
        assert_eq!(apply_effect(7, Count, 42).unwrap(), 42);
        assert_eq!(apply_effect(100, Count, 0).unwrap(), 0);
    }

    #[test]
    fn reversal_undoes_each_kind() {
        assert_eq!(reverse_effect(10, StockIn, 4).unwrap(), 6);
        assert_eq!(reverse_effect(6, StockOut, 4).unwrap(), 10);
        assert_eq!(reverse_effect(6, Adjust, -4).unwrap(), 10);
        assert_eq!(reverse_effect(7, Move, 2).unwrap(), 7);
    }

    #[test]
    fn count_reversal_is_a_conflict() {
        assert!(matches!(
            reverse_effect(42, Count, 42).unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[test]
    fn out_then_move_then_reversal_scenario() {
        // initial 10, stock_out 3 → 7
        let stock = apply_effect(10, StockOut, 3).unwrap();
        assert_eq!(stock, 7);
        // move 2 → unchanged
        let stock = apply_effect(stock, Move, 2).unwrap();
        assert_eq!(stock, 7);
        // delete the stock_out → back to 10
        let stock = reverse_effect(stock, StockOut, 3).unwrap();
        assert_eq!(stock, 10);
    }

    proptest! {
        /// Replay property: for any sequence of valid stock_in/stock_out/adjust
        /// entries, the running stock equals initial + Σ(signed effects).
        #[test]
        fn replay_matches_signed_sum(
            initial in 0i64..10_000,
            ops in prop::collection::vec((0u8..3, 1i64..100), 0..64),
        ) {
            let mut stock = initial;
            let mut signed_sum = 0i64;

            for (selector, magnitude) in ops {
                let (kind, quantity) = match selector {
                    0 => (StockIn, magnitude),
                    1 => (StockOut, magnitude),
                    _ => (Adjust, if magnitude % 2 == 0 { magnitude } else { -magnitude }),
                };

                match apply_effect(stock, kind, quantity) {
                    Ok(next) => {
                        stock = next;
                        signed_sum += signed_effect(kind, quantity)
                            .expect("directional kinds always have a signed effect");
                    }
                    Err(DomainError::InsufficientStock(_)) => {
                        // Rejected entries contribute nothing.
                    }
                    Err(other) => return Err(TestCaseError::fail(format!("{other}"))),
                }
            }

            prop_assert_eq!(stock, initial + signed_sum);
            prop_assert!(stock >= 0);
        }

        /// Applying then reversing any directional entry restores the prior value.
        #[test]
        fn reversal_roundtrip(
            current in 0i64..10_000,
            selector in 0u8..3,
            magnitude in 1i64..100,
        ) {
            let (kind, quantity) = match selector {
                0 => (StockIn, magnitude),
                1 => (StockOut, magnitude),
                _ => (Adjust, if magnitude % 2 == 0 { magnitude } else { -magnitude }),
            };

            if let Ok(next) = apply_effect(current, kind, quantity) {
                prop_assert_eq!(reverse_effect(next, kind, quantity).unwrap(), current);
            }
        }
    }
}
