//! Consumer-side receipt filtering.
//!
//! Listing returns every receipt; screens narrow the result locally. This
//! keeps the storage contract small (no server-side search language).

use chrono::NaiveDate;

use crate::receipt::ReceiptStatus;
use crate::stats::ReceiptWithStats;

/// Filter over a listed set of receipts.
///
/// `None` fields do not constrain. `search` matches the receipt number or
/// the client label, case-insensitively; `from`/`to` bound the issue date
/// inclusively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptFilter {
    pub search: Option<String>,
    pub status: Option<ReceiptStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReceiptFilter {
    pub fn matches(&self, entry: &ReceiptWithStats) -> bool {
        let receipt = &entry.receipt;

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = receipt.receipt_number.to_lowercase().contains(&needle)
                || receipt.client.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(status) = self.status {
            if receipt.status != status {
                return false;
            }
        }

        if let Some(from) = self.from {
            if receipt.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if receipt.date > to {
                return false;
            }
        }

        true
    }

    /// Keep the entries this filter accepts, preserving order.
    pub fn apply(&self, receipts: Vec<ReceiptWithStats>) -> Vec<ReceiptWithStats> {
        receipts.into_iter().filter(|r| self.matches(r)).collect()
    }
}
