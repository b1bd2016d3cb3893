use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category;
use crate::domain::types::{
    AppId, CategoryCode, ItemName, MOCK_USER_ID, Money, ReceiptDate, ReceiptId, ReceiptTitle,
    TypeConstraintError, UserId, parse_amount, round_to_cents,
};

/// Tenant and user a receipt belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptOwner {
    pub app_id: AppId,
    pub user_id: UserId,
}

impl ReceiptOwner {
    pub fn new(app_id: AppId, user_id: UserId) -> Self {
        Self { app_id, user_id }
    }

    /// Owner of local-only data that never leaves the process.
    pub fn mock() -> Self {
        Self {
            app_id: AppId::local(),
            user_id: UserId::mock(),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.user_id.as_str() == MOCK_USER_ID
    }
}

/// One product entry within a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: ItemName,
    pub price: Money,
}

impl LineItem {
    pub fn new(name: ItemName, price: Money) -> Self {
        Self { name, price }
    }
}

/// Stored receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: ReceiptId,
    pub title: ReceiptTitle,
    pub amount: Money,
    pub category_code: CategoryCode,
    /// Denormalized from `category_code`; re-derived before every write.
    pub category_label: String,
    pub date: ReceiptDate,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Where the receipt image came from; `None` for manual entry.
    #[serde(default)]
    pub image_ref: Option<String>,
    pub created_at: NaiveDateTime,
    pub user_id: UserId,
}

impl Receipt {
    /// Re-derives the display label from the category code.
    pub fn relabel(mut self) -> Self {
        self.category_label = category::label_of(&self.category_code).to_string();
        self
    }

    /// Produces the replacement receipt described by `edit`.
    ///
    /// Identity, owner, creation time and image reference are carried over.
    /// When the receipt is itemized the amount is always the rounded item sum.
    pub fn apply_edit(&self, edit: ReceiptEdit) -> Result<Receipt, TypeConstraintError> {
        let mut updated = self.clone();
        match edit {
            ReceiptEdit::Details {
                title,
                category_code,
                amount,
                date,
            } => {
                updated.title = ReceiptTitle::new(title)?;
                updated.category_code = validate_category(&category_code)?;
                updated.amount = if self.items.is_empty() {
                    positive_amount(&amount)?
                } else {
                    items_total(&self.items)?
                };
                let date = ReceiptDate::new(date);
                if !date.is_empty() {
                    updated.date = date;
                }
            }
            ReceiptEdit::Items(inputs) => {
                if inputs.is_empty() {
                    return Err(TypeConstraintError::MissingItems);
                }
                let items = inputs
                    .into_iter()
                    .map(ItemInput::into_line_item)
                    .collect::<Result<Vec<_>, _>>()?;
                updated.amount = items_total(&items)?;
                updated.items = items;
            }
        }
        Ok(updated.relabel())
    }
}

/// Validated data ready to be persisted; the backend assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub owner: ReceiptOwner,
    pub title: ReceiptTitle,
    pub amount: Money,
    pub category_code: CategoryCode,
    pub category_label: String,
    pub date: ReceiptDate,
    pub items: Vec<LineItem>,
    pub image_ref: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewReceipt {
    /// Materializes the stored receipt once an id is known.
    pub fn into_receipt(self, id: ReceiptId) -> Receipt {
        Receipt {
            id,
            title: self.title,
            amount: self.amount,
            category_code: self.category_code,
            category_label: self.category_label,
            date: self.date,
            items: self.items,
            image_ref: self.image_ref,
            created_at: self.created_at,
            user_id: self.owner.user_id,
        }
    }
}

/// Unvalidated receipt as submitted by the capture flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptDraft {
    pub title: String,
    pub category_code: String,
    /// Directly entered amount; ignored when `items` is non-empty.
    pub amount: String,
    pub date: String,
    pub items: Vec<LineItem>,
    pub image_ref: Option<String>,
}

impl ReceiptDraft {
    /// Validates the draft and derives the persisted fields.
    pub fn into_new_receipt(
        self,
        owner: ReceiptOwner,
        now: NaiveDateTime,
    ) -> Result<NewReceipt, TypeConstraintError> {
        let title = ReceiptTitle::new(self.title)?;
        let category_code = validate_category(&self.category_code)?;
        let amount = if self.items.is_empty() {
            positive_amount(&self.amount)?
        } else {
            let total = items_total(&self.items)?;
            Money::positive(total.get())?
        };
        let date = ReceiptDate::new(self.date);
        let date = if date.is_empty() {
            ReceiptDate::today()
        } else {
            date
        };

        Ok(NewReceipt {
            owner,
            title,
            amount,
            category_label: category::label_of(&category_code).to_string(),
            category_code,
            date,
            items: self.items,
            image_ref: self.image_ref.filter(|r| !r.trim().is_empty()),
            created_at: now,
        })
    }
}

/// Raw line item as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemInput {
    pub name: String,
    pub price: String,
}

impl ItemInput {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }

    /// Requires a name and a strictly positive price, rounded to cents.
    pub fn into_line_item(self) -> Result<LineItem, TypeConstraintError> {
        let name = ItemName::new(self.name)?;
        let price = parse_amount(&self.price)
            .map(round_to_cents)
            .filter(|p| *p > 0.0)
            .ok_or(TypeConstraintError::NonPositiveNumber("price"))?;
        Ok(LineItem::new(name, Money::new(price)?))
    }
}

/// Edits accepted by the store's `update` operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptEdit {
    /// Wholesale replacement of the header fields.
    Details {
        title: String,
        category_code: String,
        amount: String,
        date: String,
    },
    /// Item-by-item edit; the amount is recomputed from the items.
    Items(Vec<ItemInput>),
}

/// Category codes must be non-empty registry codes.
pub fn validate_category(code: &str) -> Result<CategoryCode, TypeConstraintError> {
    let code = CategoryCode::new(code)?;
    if category::is_known(&code) {
        Ok(code)
    } else {
        Err(TypeConstraintError::UnknownCategory(code.into_inner()))
    }
}

/// Rounded sum of item prices.
pub fn items_total(items: &[LineItem]) -> Result<Money, TypeConstraintError> {
    let sum: f64 = items.iter().map(|i| i.price.get()).sum();
    Money::new(round_to_cents(sum))
}

fn positive_amount(input: &str) -> Result<Money, TypeConstraintError> {
    let value = parse_amount(input)
        .map(round_to_cents)
        .ok_or(TypeConstraintError::NonPositiveNumber("amount"))?;
    Money::positive(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn epoch() -> NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn item(name: &str, price: f64) -> LineItem {
        LineItem::new(ItemName::new(name).unwrap(), Money::new(price).unwrap())
    }

    fn draft() -> ReceiptDraft {
        ReceiptDraft {
            title: "Corner shop".into(),
            category_code: "food_market".into(),
            amount: String::new(),
            date: "2025-11-05".into(),
            items: vec![item("Milk", 32.5), item("Bread", 15.0)],
            image_ref: None,
        }
    }

    fn stored() -> Receipt {
        draft()
            .into_new_receipt(ReceiptOwner::mock(), epoch())
            .unwrap()
            .into_receipt(ReceiptId::new("r-1").unwrap())
    }

    #[test]
    fn itemized_draft_derives_amount_and_label() {
        let new = draft()
            .into_new_receipt(ReceiptOwner::mock(), epoch())
            .unwrap();
        assert_eq!(new.amount, 47.5);
        assert_eq!(new.category_label, "Food & Groceries");
    }

    #[test]
    fn direct_amount_accepts_comma_separator() {
        let mut d = draft();
        d.items.clear();
        d.amount = "220,50".into();
        let new = d.into_new_receipt(ReceiptOwner::mock(), epoch()).unwrap();
        assert_eq!(new.amount, 220.5);
    }

    #[test]
    fn draft_rejects_placeholder_category() {
        let mut d = draft();
        d.category_code = String::new();
        let err = d.into_new_receipt(ReceiptOwner::mock(), epoch()).unwrap_err();
        assert_eq!(err, TypeConstraintError::EmptyString("category"));
    }

    #[test]
    fn draft_rejects_unknown_category() {
        let mut d = draft();
        d.category_code = "snacks".into();
        let err = d.into_new_receipt(ReceiptOwner::mock(), epoch()).unwrap_err();
        assert!(matches!(err, TypeConstraintError::UnknownCategory(_)));
    }

    #[test]
    fn draft_rejects_zero_amount() {
        let mut d = draft();
        d.items.clear();
        d.amount = "0".into();
        let err = d.into_new_receipt(ReceiptOwner::mock(), epoch()).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveNumber("amount"));
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let mut d = draft();
        d.date = "  ".into();
        let new = d.into_new_receipt(ReceiptOwner::mock(), epoch()).unwrap();
        assert_eq!(new.date, ReceiptDate::today());
    }

    #[test]
    fn item_input_requires_positive_price() {
        assert!(ItemInput::new("Milk", "0").into_line_item().is_err());
        assert!(ItemInput::new("", "3").into_line_item().is_err());
        let item = ItemInput::new("Milk", "32,499").into_line_item().unwrap();
        assert_eq!(item.price, 32.5);
    }

    #[test]
    fn items_edit_recomputes_amount() {
        let receipt = stored();
        let updated = receipt
            .apply_edit(ReceiptEdit::Items(vec![
                ItemInput::new("Milk", "30"),
                ItemInput::new("Eggs", "45.10"),
            ]))
            .unwrap();
        assert_eq!(updated.amount, 75.1);
        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.id, receipt.id);
    }

    #[test]
    fn items_edit_rejects_empty_list() {
        let err = stored().apply_edit(ReceiptEdit::Items(vec![])).unwrap_err();
        assert_eq!(err, TypeConstraintError::MissingItems);
    }

    #[test]
    fn details_edit_keeps_item_derived_amount() {
        let updated = stored()
            .apply_edit(ReceiptEdit::Details {
                title: "Renamed".into(),
                category_code: "other".into(),
                amount: "999".into(),
                date: String::new(),
            })
            .unwrap();
        assert_eq!(updated.amount, 47.5);
        assert_eq!(updated.category_label, "Other");
        assert_eq!(updated.date.as_str(), "2025-11-05");
    }

    #[test]
    fn details_edit_blocks_invalid_amount_without_items() {
        let mut receipt = stored();
        receipt.items.clear();
        let err = receipt
            .apply_edit(ReceiptEdit::Details {
                title: "Taxi".into(),
                category_code: "transport".into(),
                amount: "abc".into(),
                date: "2025-10-01".into(),
            })
            .unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveNumber("amount"));
    }

    #[test]
    fn receipt_serializes_with_camel_case_wire_names() {
        let value = serde_json::to_value(stored()).unwrap();
        assert_eq!(value["categoryCode"], "food_market");
        assert_eq!(value["categoryLabel"], "Food & Groceries");
        assert_eq!(value["userId"], "mock-user");
        assert_eq!(value["items"][0]["name"], "Milk");
    }
}
