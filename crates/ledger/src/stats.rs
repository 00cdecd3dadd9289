//! Derived receipt statistics.
//!
//! Nothing here is persisted: totals are recomputed from the deduction set
//! at every read, so displayed balances stay correct even when a status
//! write lagged behind (see `store`).

use serde::{Deserialize, Serialize};

use crate::deduction::Deduction;
use crate::receipt::Receipt;

/// A receipt annotated with deduction totals, computed at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptWithStats {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub total_deducted: f64,
    pub balance: f64,
}

impl ReceiptWithStats {
    /// Annotate `receipt` with totals over its deductions.
    ///
    /// Deductions belonging to other receipts are ignored, so the full
    /// deduction set may be passed as-is.
    pub fn compute(receipt: Receipt, deductions: &[Deduction]) -> Self {
        let total_deducted: f64 = deductions
            .iter()
            .filter(|d| d.receipt_id == receipt.id)
            .map(|d| d.value)
            .sum();
        let balance = receipt.total_value - total_deducted;

        Self {
            receipt,
            total_deducted,
            balance,
        }
    }
}

/// Aggregate totals over a listing, as shown on the overview screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Number of receipts on file.
    pub receipts: usize,
    /// Sum of every receipt's total value.
    pub total_value: f64,
    /// Sum of every deduction applied.
    pub total_deducted: f64,
    /// Sum of remaining balances.
    pub total_balance: f64,
}

/// Fold a listing into its aggregate totals.
pub fn summarize(receipts: &[ReceiptWithStats]) -> LedgerSummary {
    let mut summary = LedgerSummary {
        receipts: receipts.len(),
        ..LedgerSummary::default()
    };

    for entry in receipts {
        summary.total_value += entry.receipt.total_value;
        summary.total_deducted += entry.total_deducted;
        summary.total_balance += entry.balance;
    }
    summary
}
