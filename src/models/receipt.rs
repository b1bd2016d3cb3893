use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category;
use crate::domain::receipt::{
    LineItem, NewReceipt as DomainNewReceipt, Receipt as DomainReceipt,
};
use crate::domain::types::{
    CategoryCode, ItemName, Money, ReceiptDate, ReceiptId, ReceiptTitle, TypeConstraintError,
    UserId,
};

/// Diesel model representing the `receipts` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::receipts)]
pub struct Receipt {
    pub id: String,
    pub app_id: String,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub category_code: String,
    pub category_label: String,
    pub date: String,
    pub image_ref: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `receipt_items` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::receipt_items)]
pub struct ReceiptItem {
    pub id: i32,
    pub receipt_id: String,
    pub position: i32,
    pub name: String,
    pub price: f64,
}

/// Insertable form of [`Receipt`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::receipts)]
pub struct NewReceipt {
    pub id: String,
    pub app_id: String,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub category_code: String,
    pub category_label: String,
    pub date: String,
    pub image_ref: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Header columns rewritten by a full replace.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::receipts)]
#[diesel(treat_none_as_null = true)]
pub struct ReceiptChanges {
    pub title: String,
    pub amount: f64,
    pub category_code: String,
    pub category_label: String,
    pub date: String,
    pub image_ref: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`ReceiptItem`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::receipt_items)]
pub struct NewReceiptItem {
    pub receipt_id: String,
    pub position: i32,
    pub name: String,
    pub price: f64,
}

impl NewReceipt {
    pub fn new(id: &ReceiptId, receipt: &DomainNewReceipt) -> Self {
        Self {
            id: id.to_string(),
            app_id: receipt.owner.app_id.to_string(),
            user_id: receipt.owner.user_id.to_string(),
            title: receipt.title.to_string(),
            amount: receipt.amount.get(),
            category_label: category::label_of(&receipt.category_code).to_string(),
            category_code: receipt.category_code.to_string(),
            date: receipt.date.to_string(),
            image_ref: receipt.image_ref.clone(),
            created_at: receipt.created_at,
            updated_at: receipt.created_at,
        }
    }
}

impl ReceiptChanges {
    pub fn new(receipt: &DomainReceipt, updated_at: NaiveDateTime) -> Self {
        Self {
            title: receipt.title.to_string(),
            amount: receipt.amount.get(),
            category_label: category::label_of(&receipt.category_code).to_string(),
            category_code: receipt.category_code.to_string(),
            date: receipt.date.to_string(),
            image_ref: receipt.image_ref.clone(),
            updated_at,
        }
    }
}

/// Rows for `items` in list order.
pub fn new_items(receipt_id: &ReceiptId, items: &[LineItem]) -> Vec<NewReceiptItem> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| NewReceiptItem {
            receipt_id: receipt_id.to_string(),
            position: position as i32,
            name: item.name.to_string(),
            price: item.price.get(),
        })
        .collect()
}

impl TryFrom<ReceiptItem> for LineItem {
    type Error = TypeConstraintError;

    fn try_from(item: ReceiptItem) -> Result<Self, Self::Error> {
        Ok(LineItem::new(ItemName::new(item.name)?, Money::new(item.price)?))
    }
}

impl TryFrom<(Receipt, Vec<ReceiptItem>)> for DomainReceipt {
    type Error = TypeConstraintError;

    fn try_from((receipt, mut items): (Receipt, Vec<ReceiptItem>)) -> Result<Self, Self::Error> {
        let (code, label) = category::normalize_stored(&receipt.category_code, &receipt.category_label);
        items.sort_by_key(|i| i.position);
        Ok(Self {
            id: ReceiptId::new(receipt.id)?,
            title: ReceiptTitle::new(receipt.title)?,
            amount: Money::new(receipt.amount)?,
            category_code: CategoryCode::new(code)?,
            category_label: label.to_string(),
            date: ReceiptDate::new(receipt.date),
            items: items
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<LineItem>, _>>()?,
            image_ref: receipt.image_ref,
            created_at: receipt.created_at,
            user_id: UserId::new(receipt.user_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn row(code: &str, label: &str) -> Receipt {
        let ts = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Receipt {
            id: "r-1".into(),
            app_id: "app".into(),
            user_id: "u-1".into(),
            title: "Pharmacy".into(),
            amount: 12.5,
            category_code: code.into(),
            category_label: label.into(),
            date: "2025-10-01".into(),
            image_ref: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn item(position: i32, name: &str) -> ReceiptItem {
        ReceiptItem {
            id: position + 1,
            receipt_id: "r-1".into(),
            position,
            name: name.into(),
            price: 6.25,
        }
    }

    #[test]
    fn items_come_back_in_position_order() {
        let receipt: DomainReceipt = (row("health", "Health"), vec![item(1, "B"), item(0, "A")])
            .try_into()
            .unwrap();
        let names: Vec<&str> = receipt.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn legacy_label_only_rows_are_migrated() {
        let receipt: DomainReceipt = (row("", "Health"), vec![]).try_into().unwrap();
        assert_eq!(receipt.category_code.as_str(), "health");
        assert_eq!(receipt.category_label, "Health");
    }

    #[test]
    fn renamed_codes_read_with_fallback_label() {
        let receipt: DomainReceipt = (row("pharmacy", "Pharmacy"), vec![]).try_into().unwrap();
        assert_eq!(receipt.category_label, category::UNSPECIFIED_LABEL);
    }

    #[test]
    fn blank_titles_are_rejected() {
        let mut bad = row("health", "Health");
        bad.title = " ".into();
        let result: Result<DomainReceipt, _> = (bad, vec![]).try_into();
        assert_eq!(result.unwrap_err(), TypeConstraintError::EmptyString("title"));
    }
}
