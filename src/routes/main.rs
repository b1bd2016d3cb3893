use actix_web::{HttpResponse, Responder, get, web};

use crate::services::categories::list_categories;
use crate::services::receipts::show_session as show_session_service;
use crate::store::ReceiptStore;

#[get("/session")]
pub async fn show_session(store: web::Data<ReceiptStore>) -> impl Responder {
    HttpResponse::Ok().json(show_session_service(store.get_ref()))
}

#[get("/categories")]
pub async fn show_categories() -> impl Responder {
    HttpResponse::Ok().json(list_categories())
}
