use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use recibo_core::{DeductionId, Entity, LedgerResult, ReceiptId, require_positive};

/// A partial payment applied against a receipt's total.
///
/// Deductions are append-only: rows are never updated or deleted, and the
/// owning receipt keeps no back-collection (totals are recomputed by query).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub id: DeductionId,
    pub receipt_id: ReceiptId,
    pub date: NaiveDate,
    pub value: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Deduction {
    type Id = DeductionId;

    fn id(&self) -> &DeductionId {
        &self.id
    }
}

/// User-supplied input for `add_deduction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionDraft {
    pub receipt_id: ReceiptId,
    pub date: NaiveDate,
    pub value: f64,
    pub description: Option<String>,
}

impl DeductionDraft {
    /// Validate the deduction value (positive, finite).
    pub(crate) fn validated_value(&self) -> LedgerResult<f64> {
        require_positive(self.value, "value")
    }
}
