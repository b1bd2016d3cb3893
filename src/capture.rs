//! Draft receipt assembly and submission.
//!
//! A [`CaptureFlow`] moves `Idle -> Accumulating -> Submitting` and back to
//! `Idle` on success. A failed submission returns to `Accumulating` with the
//! draft intact; nothing is retried automatically.

use thiserror::Error;

use crate::domain::receipt::{ItemInput, LineItem, Receipt, ReceiptDraft, items_total};
use crate::domain::recognition::RecognitionError;
use crate::domain::types::{Money, TypeConstraintError, parse_amount};
use crate::store::{ReceiptStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Accumulating,
    Submitting,
}

/// Identifier of an item within one draft. Only unique per draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftItemId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    pub id: DraftItemId,
    pub item: LineItem,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The item was rejected; the draft is unchanged.
    #[error("invalid item: {0}")]
    InvalidItem(TypeConstraintError),
    #[error("receipt is incomplete: {0}")]
    Incomplete(&'static str),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error("could not save receipt: {0}")]
    Submit(#[from] StoreError),
    #[error("a submission is already in progress")]
    Busy,
}

#[derive(Debug)]
pub struct CaptureFlow {
    state: CaptureState,
    title: String,
    category_code: String,
    date: String,
    amount: String,
    image_ref: Option<String>,
    items: Vec<DraftItem>,
    next_item_id: u64,
}

impl Default for CaptureFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureFlow {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            title: String::new(),
            category_code: String::new(),
            date: String::new(),
            amount: String::new(),
            image_ref: None,
            items: Vec::new(),
            next_item_id: 1,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// An empty code is the "nothing selected" placeholder.
    pub fn select_category(&mut self, code: impl Into<String>) {
        self.category_code = code.into();
        self.touch();
    }

    /// Blank dates become today's date on submission.
    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
        self.touch();
    }

    /// Directly entered amount, used only while the draft has no items.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
        self.touch();
    }

    pub fn attach_image(&mut self, image_ref: Option<String>) {
        self.image_ref = image_ref;
        self.touch();
    }

    /// Adds a manually typed item. Invalid input leaves the draft unchanged.
    pub fn add_item(&mut self, name: &str, price: &str) -> Result<DraftItemId, CaptureError> {
        let item = ItemInput::new(name, price)
            .into_line_item()
            .map_err(CaptureError::InvalidItem)?;
        let id = self.push_item(item);
        self.touch();
        Ok(id)
    }

    pub fn remove_item(&mut self, id: DraftItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        before != self.items.len()
    }

    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    /// Rounded item sum, or the directly entered amount when there are no items.
    pub fn total(&self) -> f64 {
        if self.items.is_empty() {
            parse_amount(&self.amount).unwrap_or(0.0)
        } else {
            items_total(&self.line_items())
                .map(Money::get)
                .unwrap_or(0.0)
        }
    }

    /// Replaces the draft items with recognized ones.
    ///
    /// Errors and empty results add nothing and are returned as
    /// [`CaptureError::Recognition`].
    pub fn apply_recognition(
        &mut self,
        result: Result<Vec<LineItem>, RecognitionError>,
    ) -> Result<usize, CaptureError> {
        let items = result?;
        if items.is_empty() {
            return Err(RecognitionError::NoItems.into());
        }
        self.items.clear();
        for item in items {
            self.push_item(item);
        }
        self.touch();
        Ok(self.items.len())
    }

    /// Whether the draft satisfies the submission rules.
    pub fn can_submit(&self) -> Result<(), CaptureError> {
        if self.title.trim().is_empty() {
            return Err(CaptureError::Incomplete("title is required"));
        }
        if self.category_code.trim().is_empty() {
            return Err(CaptureError::Incomplete("category is required"));
        }
        let has_amount = parse_amount(&self.amount).is_some_and(|a| a > 0.0);
        if self.items.is_empty() && !has_amount {
            return Err(CaptureError::Incomplete(
                "add at least one item or enter an amount",
            ));
        }
        Ok(())
    }

    /// Enters `Submitting` and hands out the draft to persist.
    pub fn begin_submit(&mut self) -> Result<ReceiptDraft, CaptureError> {
        if self.state == CaptureState::Submitting {
            return Err(CaptureError::Busy);
        }
        self.can_submit()?;
        self.state = CaptureState::Submitting;
        Ok(self.to_draft())
    }

    /// Resets on success, returns to `Accumulating` on failure.
    pub fn finish_submit(
        &mut self,
        result: Result<Receipt, StoreError>,
    ) -> Result<Receipt, CaptureError> {
        match result {
            Ok(receipt) => {
                self.discard();
                Ok(receipt)
            }
            Err(e) => {
                self.state = CaptureState::Accumulating;
                Err(e.into())
            }
        }
    }

    pub fn submit(&mut self, store: &ReceiptStore) -> Result<Receipt, CaptureError> {
        let draft = self.begin_submit()?;
        self.finish_submit(store.add(draft))
    }

    /// Drops the draft and returns to `Idle`.
    pub fn discard(&mut self) {
        *self = Self::new();
    }

    fn to_draft(&self) -> ReceiptDraft {
        ReceiptDraft {
            title: self.title.clone(),
            category_code: self.category_code.clone(),
            amount: self.amount.clone(),
            date: self.date.clone(),
            items: self.line_items(),
            image_ref: self.image_ref.clone(),
        }
    }

    fn line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(|i| i.item.clone()).collect()
    }

    fn push_item(&mut self, item: LineItem) -> DraftItemId {
        let id = DraftItemId(self.next_item_id);
        self.next_item_id += 1;
        self.items.push(DraftItem { id, item });
        id
    }

    fn touch(&mut self) {
        if self.state == CaptureState::Idle {
            self.state = CaptureState::Accumulating;
        }
    }
}
