use serde::Serialize;

use crate::store::{ReceiptStore, StoreMode};

/// `GET /session` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub user_id: String,
    pub mode: StoreMode,
    pub banner: Option<String>,
}

impl From<&ReceiptStore> for SessionDto {
    fn from(store: &ReceiptStore) -> Self {
        Self {
            user_id: store.owner().user_id.to_string(),
            mode: store.mode(),
            banner: store.banner().map(str::to_string),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDto {
    pub error: String,
}

impl ErrorDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
