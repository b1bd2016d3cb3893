//! Wire contract of the external line-item recognition service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::receipt::LineItem;
use crate::domain::types::{ItemName, Money, parse_amount, round_to_cents};

/// Instruction sent to the model together with the receipt image.
pub const RECEIPT_PROMPT: &str = "List the main products on this receipt with their estimated \
prices. Output only the product name and price, one product per line, formatted as \
'Name:Price', without headings. If you cannot find any products, reply only with \
'Error: No items found'. Example output: 'Milk:32.50\nBread:15.00\nEggs:45.00'";

/// Prefix the model uses to report that nothing could be read.
pub const ERROR_PREFIX: &str = "Error:";

/// MIME type assumed when an upload does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Failures of the recognition call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// The service answered with an explicit error message.
    #[error("recognition failed: {0}")]
    Failed(String),
    /// The call succeeded but produced no usable items.
    #[error("no items recognized")]
    NoItems,
    /// The service could not be reached or returned a non-success status.
    #[error("recognition service unavailable: {0}")]
    Transport(String),
    /// The response body did not match the contract.
    #[error("malformed recognition response: {0}")]
    InvalidResponse(String),
    /// No recognition provider is configured.
    #[error("recognition is not configured")]
    NotConfigured,
}

/// Image handed to a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        }
    }
}

/// Request body: `{imageBase64, mimeType}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionRequest {
    pub image_base64: String,
    pub mime_type: String,
}

/// One item as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedItem {
    pub name: String,
    pub price: f64,
}

/// Response body: `{items: [...]}` on success, `{error}` on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RecognizedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecognitionResponse {
    pub fn from_items(items: &[LineItem]) -> Self {
        Self {
            items: Some(
                items
                    .iter()
                    .map(|i| RecognizedItem {
                        name: i.name.to_string(),
                        price: i.price.get(),
                    })
                    .collect(),
            ),
            error: None,
        }
    }

    pub fn from_error(error: &RecognitionError) -> Self {
        Self {
            items: None,
            error: Some(error.to_string()),
        }
    }

    /// Converts the response into usable line items.
    ///
    /// An explicit error wins over any items. Items with a blank name or a
    /// non-positive price are dropped; nothing left is [`RecognitionError::NoItems`].
    pub fn into_items(self) -> Result<Vec<LineItem>, RecognitionError> {
        if let Some(error) = self.error {
            return Err(RecognitionError::Failed(error));
        }
        let items: Vec<LineItem> = self
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| usable_item(&item.name, item.price))
            .collect();
        if items.is_empty() {
            Err(RecognitionError::NoItems)
        } else {
            Ok(items)
        }
    }
}

/// Parses the model's `Name:Price` per-line reply.
///
/// Lines that do not parse are skipped. A reply starting with
/// [`ERROR_PREFIX`] is reported as [`RecognitionError::Failed`].
pub fn parse_item_lines(text: &str) -> Result<Vec<LineItem>, RecognitionError> {
    let text = text.trim();
    if let Some(message) = text.strip_prefix(ERROR_PREFIX) {
        return Err(RecognitionError::Failed(message.trim().to_string()));
    }

    let items: Vec<LineItem> = text
        .lines()
        .filter_map(|line| {
            let mut parts = line.split(':');
            let name = parts.next()?;
            let price = parse_amount(parts.next()?)?;
            usable_item(name, price)
        })
        .collect();

    if items.is_empty() {
        Err(RecognitionError::NoItems)
    } else {
        Ok(items)
    }
}

fn usable_item(name: &str, price: f64) -> Option<LineItem> {
    let name = ItemName::new(name).ok()?;
    let price = Money::positive(round_to_cents(price)).ok()?;
    Some(LineItem::new(name, price))
}
