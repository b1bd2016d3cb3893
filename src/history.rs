//! Recent prices paid for an item, looked up by name.

use serde::Serialize;

use crate::domain::receipt::Receipt;
use crate::domain::types::ReceiptDate;

/// Number of price points shown next to an item being typed.
pub const PRICE_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub name: String,
    pub price: f64,
    pub date: ReceiptDate,
}

/// Prices of items whose name contains `query`, newest receipt first.
///
/// Matching is a trimmed, case-insensitive substring test over every item of
/// every receipt. A blank query yields nothing.
pub fn price_history(query: &str, receipts: &[Receipt], limit: usize) -> Vec<PricePoint> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut points: Vec<(i64, PricePoint)> = receipts
        .iter()
        .flat_map(|receipt| {
            let needle = &needle;
            receipt
                .items
                .iter()
                .filter(move |item| item.name.to_lowercase().contains(needle))
                .map(move |item| {
                    (
                        receipt.date.timestamp(),
                        PricePoint {
                            name: item.name.to_string(),
                            price: item.price.get(),
                            date: receipt.date.clone(),
                        },
                    )
                })
        })
        .collect();

    points.sort_by_key(|(ts, _)| std::cmp::Reverse(*ts));
    points.into_iter().take(limit).map(|(_, p)| p).collect()
}
