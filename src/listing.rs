//! Derived receipt list: search, sort and per-category totals.

use serde::{Deserialize, Serialize};

use crate::domain::receipt::Receipt;

/// Label of the synthetic group holding the grand total.
pub const ALL_GROUP: &str = "All";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Amount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl SortKey {
    /// Direction used when this key becomes the active one.
    pub fn default_order(self) -> SortOrder {
        match self {
            SortKey::Date => SortOrder::Desc,
            SortKey::Amount => SortOrder::Asc,
        }
    }
}

/// Active sort key and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    /// Same key flips the direction, a new key starts at its default direction.
    pub fn toggle(self, key: SortKey) -> Self {
        if key == self.key {
            Self {
                key,
                order: self.order.flipped(),
            }
        } else {
            Self {
                key,
                order: key.default_order(),
            }
        }
    }
}

/// Inputs of [`build_view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub sort: SortState,
}

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptListView {
    pub receipts: Vec<Receipt>,
    pub summary: Vec<CategoryTotal>,
    pub total_count: usize,
}

/// Case-insensitive match on title, label, amount or any item name.
///
/// A `,` in the search text is read as a decimal point when matching the
/// amount. The text is matched as typed, surrounding spaces included; empty
/// text matches everything.
pub fn matches_search(receipt: &Receipt, search: &str) -> bool {
    let needle = search.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let amount_needle = needle.replace(',', ".");

    receipt.title.to_lowercase().contains(&needle)
        || receipt.category_label.to_lowercase().contains(&needle)
        || receipt.amount.to_string().contains(&amount_needle)
        || receipt
            .items
            .iter()
            .any(|i| i.name.to_lowercase().contains(&needle))
}

pub fn filter_receipts<'a>(receipts: &'a [Receipt], search: &str) -> Vec<&'a Receipt> {
    receipts
        .iter()
        .filter(|r| matches_search(r, search))
        .collect()
}

/// Stable ascending sort, reversed for descending order.
pub fn sort_receipts(receipts: &mut [&Receipt], sort: SortState) {
    match sort.key {
        SortKey::Date => receipts.sort_by_key(|r| r.date.timestamp()),
        SortKey::Amount => receipts.sort_by(|a, b| a.amount.get().total_cmp(&b.amount.get())),
    }
    if sort.order == SortOrder::Desc {
        receipts.reverse();
    }
}

/// Totals per category label, [`ALL_GROUP`] first, then by descending total.
///
/// Equal totals keep the order in which their label first appears.
pub fn summarize_by_category(receipts: &[Receipt]) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    let mut grand_total = 0.0;

    for receipt in receipts {
        let amount = receipt.amount.get();
        grand_total += amount;
        match groups.iter_mut().find(|g| g.label == receipt.category_label) {
            Some(group) => group.total += amount,
            None => groups.push(CategoryTotal {
                label: receipt.category_label.clone(),
                total: amount,
            }),
        }
    }
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));

    let mut summary = Vec::with_capacity(groups.len() + 1);
    summary.push(CategoryTotal {
        label: ALL_GROUP.to_string(),
        total: grand_total,
    });
    summary.extend(groups);
    summary
}

/// Filtered and sorted list plus totals over the whole, unfiltered set.
pub fn build_view(receipts: &[Receipt], query: &ListQuery) -> ReceiptListView {
    let mut visible = filter_receipts(receipts, &query.search);
    sort_receipts(&mut visible, query.sort);

    ReceiptListView {
        receipts: visible.into_iter().cloned().collect(),
        summary: summarize_by_category(receipts),
        total_count: receipts.len(),
    }
}
