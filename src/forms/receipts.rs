use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::receipt::{ItemInput, ReceiptEdit};
use crate::listing::{ListQuery, SortKey, SortOrder, SortState};

/// Price as sent by the client: a JSON number or user-typed text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Text form fed to the amount cleaner.
    pub fn into_input(self) -> String {
        match self {
            PriceInput::Number(value) => value.to_string(),
            PriceInput::Text(text) => text,
        }
    }
}

fn price_text(price: Option<PriceInput>) -> String {
    price.map(PriceInput::into_input).unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum ReceiptFormError {
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Deserialize, Validate)]
pub struct ItemForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub price: PriceInput,
}

impl From<ItemForm> for ItemInput {
    fn from(form: ItemForm) -> Self {
        ItemInput::new(form.name, form.price.into_input())
    }
}

/// `POST /receipts` body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddReceiptForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub category_code: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: Option<PriceInput>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<ItemForm>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Raw capture inputs, validated item by item by the capture flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AddReceiptPayload {
    pub title: String,
    pub category_code: String,
    pub date: String,
    pub amount: String,
    pub items: Vec<ItemInput>,
    pub image_ref: Option<String>,
}

impl TryFrom<AddReceiptForm> for AddReceiptPayload {
    type Error = ReceiptFormError;

    fn try_from(form: AddReceiptForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            title: form.title,
            category_code: form.category_code,
            date: form.date,
            amount: price_text(form.amount),
            items: form.items.into_iter().map(Into::into).collect(),
            image_ref: form.image_ref,
        })
    }
}

/// `PUT /receipts/{id}` body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceiptForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub category_code: String,
    #[serde(default)]
    pub amount: Option<PriceInput>,
    #[serde(default)]
    pub date: String,
}

impl TryFrom<UpdateReceiptForm> for ReceiptEdit {
    type Error = ReceiptFormError;

    fn try_from(form: UpdateReceiptForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(ReceiptEdit::Details {
            title: form.title,
            category_code: form.category_code,
            amount: price_text(form.amount),
            date: form.date,
        })
    }
}

/// `PUT /receipts/{id}/items` body.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemsForm {
    #[validate(nested)]
    pub items: Vec<ItemForm>,
}

impl TryFrom<UpdateItemsForm> for ReceiptEdit {
    type Error = ReceiptFormError;

    fn try_from(form: UpdateItemsForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(ReceiptEdit::Items(
            form.items.into_iter().map(Into::into).collect(),
        ))
    }
}

/// `GET /receipts` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListReceiptsParams {
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub order: Option<SortOrder>,
}

impl From<ListReceiptsParams> for ListQuery {
    fn from(params: ListReceiptsParams) -> Self {
        let sort = match (params.sort, params.order) {
            (None, None) => SortState::default(),
            (key, order) => {
                let key = key.unwrap_or_default();
                SortState {
                    key,
                    order: order.unwrap_or(key.default_order()),
                }
            }
        };
        ListQuery {
            search: params.search.unwrap_or_default(),
            sort,
        }
    }
}

/// `GET /price-history` query string.
#[derive(Debug, Deserialize)]
pub struct PriceHistoryParams {
    #[serde(default)]
    pub name: String,
}
