//! Ledger store: UI-facing read/write operations over the storage
//! collaborator.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value as JsonValue, json};
use tokio::sync::Mutex;

use recibo_auth::Session;
use recibo_core::{DeductionId, LedgerError, LedgerResult, ReceiptId};
use recibo_infra::{RowFilter, Table, TableStore};

use crate::deduction::{Deduction, DeductionDraft};
use crate::receipt::{Receipt, ReceiptDraft, ReceiptStatus};
use crate::stats::{LedgerSummary, ReceiptWithStats, summarize};
use crate::status::next_status;

/// Receipt/deduction ledger over a [`TableStore`] collaborator.
///
/// The collaborator offers no transactions or conditional writes, so every
/// read-check-write sequence runs under an in-process serialization point:
/// one creation lock for the receipt-number uniqueness check, and one lock
/// per receipt id for balance checks and status transitions. Reads take no
/// locks and are each consistent only with the data visible at their own
/// query moment.
pub struct LedgerStore<S> {
    storage: S,
    create_lock: Mutex<()>,
    receipt_locks: std::sync::Mutex<HashMap<ReceiptId, Arc<Mutex<()>>>>,
}

impl<S: TableStore> LedgerStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            create_lock: Mutex::new(()),
            receipt_locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Record a new receipt.
    ///
    /// The receipt number is checked against every stored receipt
    /// regardless of status; creations are serialized so two equal numbers
    /// cannot slip through between the check and the insert. The new
    /// receipt starts `Open`, stamped with the session's user.
    pub async fn create_receipt(
        &self,
        session: &Session,
        draft: ReceiptDraft,
    ) -> LedgerResult<Receipt> {
        let draft = draft.validated()?;

        let _guard = self.create_lock.lock().await;

        let existing = self
            .storage
            .query(
                Table::Receipts,
                RowFilter::Eq("receipt_number", json!(draft.number)),
            )
            .await?;
        if !existing.is_empty() {
            return Err(LedgerError::duplicate_number(draft.number));
        }

        let now = Utc::now();
        let receipt = Receipt {
            id: ReceiptId::new(),
            user_id: session.user_id(),
            receipt_number: draft.number,
            date: draft.date,
            client: draft.client,
            total_value: draft.total_value,
            description: draft.description,
            status: ReceiptStatus::Open,
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .storage
            .insert(Table::Receipts, to_row(&receipt, Table::Receipts)?)
            .await?;
        let receipt: Receipt = from_row(stored, Table::Receipts)?;

        tracing::info!(
            "user {} created receipt {} ({})",
            session.user_id(),
            receipt.receipt_number,
            receipt.id
        );
        Ok(receipt)
    }

    /// All receipts, newest issue date first, each annotated with totals
    /// computed from the deductions visible at its own query moment (no
    /// cross-receipt snapshot). No pagination.
    pub async fn list_receipts_with_stats(&self) -> LedgerResult<Vec<ReceiptWithStats>> {
        let rows = self.storage.query(Table::Receipts, RowFilter::All).await?;

        let mut receipts = Vec::with_capacity(rows.len());
        for row in rows {
            receipts.push(from_row::<Receipt>(row, Table::Receipts)?);
        }
        // Stable sort keeps insertion order within equal dates.
        receipts.sort_by(|a, b| b.date.cmp(&a.date));

        let mut listing = Vec::with_capacity(receipts.len());
        for receipt in receipts {
            listing.push(self.stats_for(receipt).await?);
        }
        Ok(listing)
    }

    /// One receipt annotated with its totals.
    pub async fn receipt_with_stats(&self, id: ReceiptId) -> LedgerResult<ReceiptWithStats> {
        let receipt = self.load_receipt(id).await?;
        self.stats_for(receipt).await
    }

    /// Deductions of one receipt, or every deduction when `receipt_id` is
    /// `None`. Stable insertion order, nothing more.
    pub async fn deductions(&self, receipt_id: Option<ReceiptId>) -> LedgerResult<Vec<Deduction>> {
        let filter = match receipt_id {
            Some(id) => RowFilter::Eq("receipt_id", json!(id)),
            None => RowFilter::All,
        };

        let rows = self.storage.query(Table::Deductions, filter).await?;
        rows.into_iter()
            .map(|row| from_row(row, Table::Deductions))
            .collect()
    }

    /// Apply a deduction against a receipt's remaining balance.
    ///
    /// Exactly one deduction row is written, followed by at most one
    /// receipt update (the `Paid` transition, derived by the status
    /// policy). If that follow-up write fails the deduction stands and the
    /// status lags; listed balances stay correct because they are
    /// recomputed from deductions on every read.
    pub async fn add_deduction(
        &self,
        session: &Session,
        draft: DeductionDraft,
    ) -> LedgerResult<Deduction> {
        let value = draft.validated_value()?;

        let lock = self.receipt_lock(draft.receipt_id);
        let _guard = lock.lock().await;

        let receipt = self.load_receipt(draft.receipt_id).await?;
        if receipt.status.is_terminal() {
            return Err(LedgerError::closed(receipt.status.to_string()));
        }

        let total_deducted: f64 = self
            .deductions(Some(receipt.id))
            .await?
            .iter()
            .map(|d| d.value)
            .sum();
        let balance = receipt.total_value - total_deducted;
        if value > balance {
            tracing::debug!(
                "rejected deduction of {value:.2} against receipt {}: balance is {balance:.2}",
                receipt.receipt_number
            );
            return Err(LedgerError::ExceedsBalance {
                requested: value,
                balance,
            });
        }

        let deduction = Deduction {
            id: DeductionId::new(),
            receipt_id: receipt.id,
            date: draft.date,
            value,
            description: draft.description.unwrap_or_default(),
            created_at: Utc::now(),
        };
        let stored = self
            .storage
            .insert(Table::Deductions, to_row(&deduction, Table::Deductions)?)
            .await?;
        let deduction: Deduction = from_row(stored, Table::Deductions)?;

        tracing::info!(
            "user {} deducted {:.2} from receipt {}",
            session.user_id(),
            deduction.value,
            receipt.receipt_number
        );

        let next = next_status(receipt.status, receipt.total_value, total_deducted + value);
        if next != receipt.status {
            self.transition(receipt.id, next).await?;
            tracing::info!("receipt {} fully settled", receipt.receipt_number);
        }

        Ok(deduction)
    }

    /// Cancel an open receipt.
    ///
    /// Cancellation does not touch recorded deductions; they stay on file.
    /// Terminal receipts (`Paid`, `Cancelled`) are rejected.
    pub async fn cancel_receipt(&self, session: &Session, id: ReceiptId) -> LedgerResult<()> {
        let lock = self.receipt_lock(id);
        let _guard = lock.lock().await;

        let receipt = self.load_receipt(id).await?;
        if receipt.status.is_terminal() {
            return Err(LedgerError::closed(receipt.status.to_string()));
        }

        self.transition(id, ReceiptStatus::Cancelled).await?;
        tracing::info!(
            "user {} cancelled receipt {}",
            session.user_id(),
            receipt.receipt_number
        );
        Ok(())
    }

    /// Aggregate totals across every receipt.
    pub async fn summary(&self) -> LedgerResult<LedgerSummary> {
        Ok(summarize(&self.list_receipts_with_stats().await?))
    }

    async fn stats_for(&self, receipt: Receipt) -> LedgerResult<ReceiptWithStats> {
        let deductions = self.deductions(Some(receipt.id)).await?;
        Ok(ReceiptWithStats::compute(receipt, &deductions))
    }

    async fn load_receipt(&self, id: ReceiptId) -> LedgerResult<Receipt> {
        let rows = self
            .storage
            .query(Table::Receipts, RowFilter::Eq("id", json!(id)))
            .await?;
        let row = rows.into_iter().next().ok_or(LedgerError::ReceiptNotFound)?;
        from_row(row, Table::Receipts)
    }

    /// The single write path for status changes; bumps `updated_at`.
    async fn transition(&self, id: ReceiptId, status: ReceiptStatus) -> LedgerResult<()> {
        let patch = json!({
            "status": status,
            "updated_at": Utc::now(),
        });
        self.storage
            .update(Table::Receipts, *id.as_uuid(), patch)
            .await?;
        Ok(())
    }

    fn receipt_lock(&self, id: ReceiptId) -> Arc<Mutex<()>> {
        // The outer guard only protects the map of handles; a poisoned
        // guard still holds a usable map.
        let mut locks = match self.receipt_locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(locks.entry(id).or_default())
    }
}

fn to_row<T: serde::Serialize>(value: &T, table: Table) -> LedgerResult<JsonValue> {
    serde_json::to_value(value)
        .map_err(|e| LedgerError::storage(format!("failed to encode {table} row: {e}")))
}

fn from_row<T: serde::de::DeserializeOwned>(row: JsonValue, table: Table) -> LedgerResult<T> {
    serde_json::from_value(row)
        .map_err(|e| LedgerError::storage(format!("malformed {table} row: {e}")))
}
