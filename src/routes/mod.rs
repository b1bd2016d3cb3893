use actix_web::{HttpResponse, web};

use crate::dto::receipts::ErrorDto;
use crate::services::ServiceError;

pub mod main;
pub mod receipts;
pub mod recognition;

/// JSON error body with the status matching `err`.
pub fn error_response(err: ServiceError) -> HttpResponse {
    let body = ErrorDto::new(err.to_string());
    match err {
        ServiceError::Form(_) => HttpResponse::BadRequest().json(body),
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::Recognition(_) => HttpResponse::UnprocessableEntity().json(body),
        ServiceError::Unavailable => HttpResponse::ServiceUnavailable().json(body),
        ServiceError::Internal => HttpResponse::InternalServerError().json(body),
    }
}

/// Registers every endpoint of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::show_session)
        .service(main::show_categories)
        .service(receipts::list_receipts)
        .service(receipts::add_receipt)
        .service(receipts::update_receipt)
        .service(receipts::update_receipt_items)
        .service(receipts::delete_receipt)
        .service(receipts::price_history)
        .service(recognition::recognize);
}
