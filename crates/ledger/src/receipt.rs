use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use recibo_core::{Entity, LedgerError, LedgerResult, ReceiptId, UserId, require_positive};

/// Client label used when the creation form leaves the field blank.
pub const DEFAULT_CLIENT: &str = "Consumidor Final";

/// Receipt lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Open,
    Paid,
    Cancelled,
}

impl ReceiptStatus {
    /// Terminal statuses accept no further deductions or transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReceiptStatus::Paid | ReceiptStatus::Cancelled)
    }
}

impl core::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ReceiptStatus::Open => "open",
            ReceiptStatus::Paid => "paid",
            ReceiptStatus::Cancelled => "cancelled",
        })
    }
}

/// A billable record tracked until fully paid or cancelled.
///
/// `total_value` is fixed at creation and never mutated; the remaining
/// balance is derived from deductions at read time, never stored.
/// `updated_at` changes only on status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    /// The user who recorded the receipt.
    pub user_id: UserId,
    pub receipt_number: String,
    /// Issue date.
    pub date: NaiveDate,
    pub client: String,
    pub total_value: f64,
    pub description: String,
    pub status: ReceiptStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Receipt {
    type Id = ReceiptId;

    fn id(&self) -> &ReceiptId {
        &self.id
    }
}

/// User-supplied input for `create_receipt`.
///
/// Mirrors the creation form: optional fields may simply be absent, and
/// validation turns absences into the right error instead of panicking on
/// an incomplete struct.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReceiptDraft {
    pub receipt_number: String,
    pub date: Option<NaiveDate>,
    pub client: Option<String>,
    pub total_value: f64,
    pub description: Option<String>,
}

/// Draft fields after validation/normalization.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidReceiptDraft {
    pub number: String,
    pub date: NaiveDate,
    pub client: String,
    pub total_value: f64,
    pub description: String,
}

impl ReceiptDraft {
    /// Validate and normalize the draft.
    ///
    /// Fails with `MissingRequiredField` for a blank number or absent date,
    /// `InvalidAmount` for a non-positive total. A blank client falls back
    /// to [`DEFAULT_CLIENT`].
    pub(crate) fn validated(self) -> LedgerResult<ValidReceiptDraft> {
        let number = self.receipt_number.trim().to_string();
        if number.is_empty() {
            return Err(LedgerError::MissingRequiredField("receipt_number"));
        }

        let date = self.date.ok_or(LedgerError::MissingRequiredField("date"))?;
        let total_value = require_positive(self.total_value, "total_value")?;

        let client = match self.client.as_deref().map(str::trim) {
            Some(client) if !client.is_empty() => client.to_string(),
            _ => DEFAULT_CLIENT.to_string(),
        };

        Ok(ValidReceiptDraft {
            number,
            date,
            client,
            total_value,
            description: self.description.unwrap_or_default(),
        })
    }
}
