//! In-memory backend used when no remote store is available.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::category;
use crate::domain::receipt::{LineItem, NewReceipt, Receipt, ReceiptOwner, items_total};
use crate::domain::types::{
    CategoryCode, ItemName, Money, ReceiptDate, ReceiptId, ReceiptTitle, TypeConstraintError,
    UserId,
};
use crate::repository::{ReceiptReader, ReceiptWriter, RepositoryError, RepositoryResult};

/// Process-local receipt list. Nothing written here leaves the process.
pub struct MockRepository {
    receipts: RwLock<Vec<Receipt>>,
    next_id: AtomicU64,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MockRepository {
    pub fn new(receipts: Vec<Receipt>) -> Self {
        Self {
            receipts: RwLock::new(receipts),
            next_id: AtomicU64::new(1),
        }
    }

    /// Repository pre-filled with [`seed_receipts`].
    pub fn seeded() -> Self {
        Self::new(seed_receipts())
    }

    fn lock_error() -> RepositoryError {
        RepositoryError::Unavailable("local receipt list is poisoned".to_string())
    }
}

impl ReceiptReader for MockRepository {
    fn list_receipts(&self, _owner: &ReceiptOwner) -> RepositoryResult<Vec<Receipt>> {
        let receipts = self.receipts.read().map_err(|_| Self::lock_error())?;
        Ok(receipts.clone())
    }

    fn get_receipt_by_id(
        &self,
        id: &ReceiptId,
        _owner: &ReceiptOwner,
    ) -> RepositoryResult<Option<Receipt>> {
        let receipts = self.receipts.read().map_err(|_| Self::lock_error())?;
        Ok(receipts.iter().find(|r| &r.id == id).cloned())
    }
}

impl ReceiptWriter for MockRepository {
    fn create_receipt(&self, receipt: &NewReceipt) -> RepositoryResult<Receipt> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = ReceiptId::new(format!("local-{n}"))?;
        let stored = receipt.clone().into_receipt(id).relabel();

        let mut receipts = self.receipts.write().map_err(|_| Self::lock_error())?;
        receipts.push(stored.clone());
        Ok(stored)
    }

    fn update_receipt(&self, receipt: &Receipt, _owner: &ReceiptOwner) -> RepositoryResult<usize> {
        let mut receipts = self.receipts.write().map_err(|_| Self::lock_error())?;
        match receipts.iter_mut().find(|r| r.id == receipt.id) {
            Some(slot) => {
                *slot = receipt.clone().relabel();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_receipt(&self, id: &ReceiptId, _owner: &ReceiptOwner) -> RepositoryResult<usize> {
        let mut receipts = self.receipts.write().map_err(|_| Self::lock_error())?;
        let before = receipts.len();
        receipts.retain(|r| &r.id != id);
        Ok(before - receipts.len())
    }
}

/// The three example receipts shown in local mode.
pub fn seed_receipts() -> Vec<Receipt> {
    let seeds: [(&str, &str, &str, &[(&str, f64)]); 3] = [
        (
            "mock-1",
            "Market Shopping A",
            "2025-11-05",
            &[
                ("Milk (1L)", 32.50),
                ("Bananas (kg)", 55.75),
                ("Eggs (10)", 45.00),
                ("Bread (whole wheat)", 15.00),
                ("Olive oil (1L)", 72.25),
            ],
        ),
        (
            "mock-2",
            "Market Shopping B",
            "2025-10-20",
            &[
                ("Milk (1L)", 28.00),
                ("Bananas (kg)", 48.00),
                ("Eggs (10)", 40.00),
                ("White cheese", 64.00),
            ],
        ),
        (
            "mock-3",
            "Market Shopping C",
            "2025-09-01",
            &[("Bananas (kg)", 39.90), ("White cheese", 70.10)],
        ),
    ];

    seeds
        .into_iter()
        .filter_map(|(id, title, date, items)| seed(id, title, date, items).ok())
        .collect()
}

fn seed(
    id: &str,
    title: &str,
    date: &str,
    items: &[(&str, f64)],
) -> Result<Receipt, TypeConstraintError> {
    let items = items
        .iter()
        .map(|(name, price)| -> Result<LineItem, TypeConstraintError> {
            Ok(LineItem::new(ItemName::new(*name)?, Money::new(*price)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let created_at = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or(NaiveDateTime::MIN);
    let code = CategoryCode::new("food_market")?;

    Ok(Receipt {
        id: ReceiptId::new(id)?,
        title: ReceiptTitle::new(title)?,
        amount: items_total(&items)?,
        category_label: category::label_of(&code).to_string(),
        category_code: code,
        date: ReceiptDate::new(date),
        items,
        image_ref: None,
        created_at,
        user_id: UserId::mock(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::receipt::ReceiptDraft;

    fn draft(title: &str) -> NewReceipt {
        ReceiptDraft {
            title: title.into(),
            category_code: "transport".into(),
            amount: "12".into(),
            date: "2025-11-06".into(),
            ..Default::default()
        }
        .into_new_receipt(ReceiptOwner::mock(), NaiveDateTime::MIN)
        .unwrap()
    }

    #[test]
    fn seeds_three_consistent_receipts() {
        let seeds = seed_receipts();
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0].amount, 220.5);
        assert_eq!(seeds[1].amount, 180.0);
        assert_eq!(seeds[2].amount, 110.0);
        assert!(seeds.iter().all(|r| r.user_id.as_str() == "mock-user"));
    }

    #[test]
    fn create_assigns_sequential_local_ids() {
        let repo = MockRepository::default();
        let owner = ReceiptOwner::mock();
        let a = repo.create_receipt(&draft("Taxi")).unwrap();
        let b = repo.create_receipt(&draft("Bus")).unwrap();
        assert_eq!(a.id.as_str(), "local-1");
        assert_eq!(b.id.as_str(), "local-2");
        assert_eq!(repo.list_receipts(&owner).unwrap().len(), 2);
    }

    #[test]
    fn update_of_unknown_id_touches_nothing() {
        let repo = MockRepository::seeded();
        let owner = ReceiptOwner::mock();
        let mut ghost = seed_receipts().remove(0);
        ghost.id = ReceiptId::new("nope").unwrap();
        assert_eq!(repo.update_receipt(&ghost, &owner).unwrap(), 0);
    }

    #[test]
    fn delete_is_idempotent() {
        let repo = MockRepository::seeded();
        let owner = ReceiptOwner::mock();
        let id = ReceiptId::new("mock-2").unwrap();
        assert_eq!(repo.delete_receipt(&id, &owner).unwrap(), 1);
        assert_eq!(repo.delete_receipt(&id, &owner).unwrap(), 0);
        assert_eq!(repo.list_receipts(&owner).unwrap().len(), 2);
    }
}
