//! Receipt status policy.
//!
//! The whole transition table lives in [`next_status`]; the ledger store
//! invokes it in exactly one place, right after a deduction is persisted,
//! so lifecycle rules are a single auditable unit.

use crate::receipt::ReceiptStatus;

/// Absolute difference below which a receipt counts as fully settled.
pub const SETTLED_EPSILON: f64 = 0.01;

/// Derive the lifecycle status from the deducted total.
///
/// `Cancelled` is terminal. A receipt whose deducted total is within
/// [`SETTLED_EPSILON`] of its total value is `Paid`; anything else is
/// `Open`. Pure function, no side effects.
pub fn next_status(current: ReceiptStatus, total_value: f64, total_deducted: f64) -> ReceiptStatus {
    if current == ReceiptStatus::Cancelled {
        return ReceiptStatus::Cancelled;
    }

    if (total_value - total_deducted).abs() < SETTLED_EPSILON {
        ReceiptStatus::Paid
    } else {
        ReceiptStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_terminal() {
        assert_eq!(
            next_status(ReceiptStatus::Cancelled, 100.0, 100.0),
            ReceiptStatus::Cancelled
        );
        assert_eq!(
            next_status(ReceiptStatus::Cancelled, 100.0, 0.0),
            ReceiptStatus::Cancelled
        );
    }

    #[test]
    fn exact_settlement_is_paid() {
        assert_eq!(next_status(ReceiptStatus::Open, 1000.0, 1000.0), ReceiptStatus::Paid);
    }

    #[test]
    fn settlement_within_epsilon_is_paid() {
        assert_eq!(
            next_status(ReceiptStatus::Open, 100.0, 99.995),
            ReceiptStatus::Paid
        );
    }

    #[test]
    fn partial_settlement_stays_open() {
        assert_eq!(next_status(ReceiptStatus::Open, 1000.0, 400.0), ReceiptStatus::Open);
        assert_eq!(
            next_status(ReceiptStatus::Open, 100.0, 99.98),
            ReceiptStatus::Open
        );
    }

    #[test]
    fn paid_is_not_sticky_in_the_policy_itself() {
        // Callers guard terminal statuses before inserting; the policy only
        // derives from the totals it is given.
        assert_eq!(next_status(ReceiptStatus::Paid, 1000.0, 400.0), ReceiptStatus::Open);
    }
}
