use crate::capture::CaptureFlow;
use crate::domain::receipt::{Receipt, ReceiptEdit};
use crate::domain::types::ReceiptId;
use crate::dto::receipts::SessionDto;
use crate::forms::receipts::AddReceiptPayload;
use crate::history::{PRICE_HISTORY_LIMIT, PricePoint, price_history as lookup_prices};
use crate::listing::{ListQuery, ReceiptListView, build_view};
use crate::store::{ReceiptStore, StoreError};

use super::{ServiceError, ServiceResult};

pub fn show_session(store: &ReceiptStore) -> SessionDto {
    SessionDto::from(store)
}

pub fn list_receipts(query: &ListQuery, store: &ReceiptStore) -> ReceiptListView {
    build_view(&store.list(), query)
}

/// Assembles the draft through the capture flow and stores it.
pub fn add_receipt(payload: AddReceiptPayload, store: &ReceiptStore) -> ServiceResult<Receipt> {
    let mut flow = CaptureFlow::new();
    flow.set_title(payload.title);
    flow.select_category(payload.category_code);
    flow.set_date(payload.date);
    flow.set_amount(payload.amount);
    flow.attach_image(payload.image_ref);
    for item in payload.items {
        flow.add_item(&item.name, &item.price)?;
    }

    flow.submit(store).map_err(|e| {
        log::error!("Failed to add receipt: {e}");
        e.into()
    })
}

pub fn update_receipt(id: &str, edit: ReceiptEdit, store: &ReceiptStore) -> ServiceResult<Receipt> {
    let id = ReceiptId::new(id).map_err(|_| ServiceError::NotFound)?;
    store.update(&id, edit).map_err(|e| log_store_error("update", &id, e))
}

pub fn delete_receipt(id: &str, store: &ReceiptStore) -> ServiceResult<()> {
    let id = ReceiptId::new(id).map_err(|_| ServiceError::NotFound)?;
    store.delete(&id).map_err(|e| log_store_error("delete", &id, e))
}

pub fn price_history(name: &str, store: &ReceiptStore) -> Vec<PricePoint> {
    lookup_prices(name, &store.list(), PRICE_HISTORY_LIMIT)
}

fn log_store_error(action: &str, id: &ReceiptId, e: StoreError) -> ServiceError {
    match &e {
        StoreError::Validation(_) | StoreError::NotFound(_) => {
            log::warn!("Rejected {action} of receipt {id}: {e}")
        }
        _ => log::error!("Failed to {action} receipt {id}: {e}"),
    }
    e.into()
}
