use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::receipt::ReceiptEdit;
use crate::forms::receipts::{
    AddReceiptForm, AddReceiptPayload, ListReceiptsParams, PriceHistoryParams, UpdateItemsForm,
    UpdateReceiptForm,
};
use crate::listing::ListQuery;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::receipts::{
    add_receipt as add_receipt_service, delete_receipt as delete_receipt_service,
    list_receipts as list_receipts_service, price_history as price_history_service,
    update_receipt as update_receipt_service,
};
use crate::store::ReceiptStore;

#[get("/receipts")]
pub async fn list_receipts(
    store: web::Data<ReceiptStore>,
    params: web::Query<ListReceiptsParams>,
) -> impl Responder {
    let query: ListQuery = params.into_inner().into();
    HttpResponse::Ok().json(list_receipts_service(&query, store.get_ref()))
}

#[post("/receipts")]
pub async fn add_receipt(
    store: web::Data<ReceiptStore>,
    web::Json(form): web::Json<AddReceiptForm>,
) -> impl Responder {
    let payload: AddReceiptPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match add_receipt_service(payload, store.get_ref()) {
        Ok(receipt) => HttpResponse::Created().json(receipt),
        Err(err) => error_response(err),
    }
}

#[put("/receipts/{id}")]
pub async fn update_receipt(
    store: web::Data<ReceiptStore>,
    id: web::Path<String>,
    web::Json(form): web::Json<UpdateReceiptForm>,
) -> impl Responder {
    let edit: ReceiptEdit = match form.try_into() {
        Ok(edit) => edit,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_receipt_service(&id, edit, store.get_ref()) {
        Ok(receipt) => HttpResponse::Ok().json(receipt),
        Err(err) => error_response(err),
    }
}

#[put("/receipts/{id}/items")]
pub async fn update_receipt_items(
    store: web::Data<ReceiptStore>,
    id: web::Path<String>,
    web::Json(form): web::Json<UpdateItemsForm>,
) -> impl Responder {
    let edit: ReceiptEdit = match form.try_into() {
        Ok(edit) => edit,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_receipt_service(&id, edit, store.get_ref()) {
        Ok(receipt) => HttpResponse::Ok().json(receipt),
        Err(err) => error_response(err),
    }
}

#[delete("/receipts/{id}")]
pub async fn delete_receipt(
    store: web::Data<ReceiptStore>,
    id: web::Path<String>,
) -> impl Responder {
    match delete_receipt_service(&id, store.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[get("/price-history")]
pub async fn price_history(
    store: web::Data<ReceiptStore>,
    params: web::Query<PriceHistoryParams>,
) -> impl Responder {
    HttpResponse::Ok().json(price_history_service(&params.name, store.get_ref()))
}
