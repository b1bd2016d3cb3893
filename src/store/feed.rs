//! Pure reconciliation of the published receipt list.

use crate::domain::receipt::Receipt;
use crate::domain::types::ReceiptId;

/// A single change pushed by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptChange {
    Added(Receipt),
    Modified(Receipt),
    Removed(ReceiptId),
}

/// Incoming update: either the whole list or a batch of changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptSnapshot {
    Full(Vec<Receipt>),
    Changes(Vec<ReceiptChange>),
}

/// Returns the list that results from applying `snapshot` to `current`.
///
/// `Added` for an id already present replaces it in place, `Modified` for an
/// unknown id appends. Labels are re-derived from the registry and the result
/// is sorted by date, newest first, ties in arrival order.
pub fn apply_update(current: &[Receipt], snapshot: ReceiptSnapshot) -> Vec<Receipt> {
    let mut next = match snapshot {
        ReceiptSnapshot::Full(list) => list,
        ReceiptSnapshot::Changes(changes) => {
            let mut next = current.to_vec();
            for change in changes {
                match change {
                    ReceiptChange::Added(receipt) | ReceiptChange::Modified(receipt) => {
                        match next.iter_mut().find(|r| r.id == receipt.id) {
                            Some(slot) => *slot = receipt,
                            None => next.push(receipt),
                        }
                    }
                    ReceiptChange::Removed(id) => next.retain(|r| r.id != id),
                }
            }
            next
        }
    };
    next = next.into_iter().map(Receipt::relabel).collect();
    sort_by_date_desc(&mut next);
    next
}

/// Stable sort, newest date first. Unparsable dates go last.
pub fn sort_by_date_desc(receipts: &mut [Receipt]) {
    receipts.sort_by_key(|r| std::cmp::Reverse(r.date.timestamp()));
}
