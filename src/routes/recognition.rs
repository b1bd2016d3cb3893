use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, post, web};

use crate::domain::recognition::RecognitionResponse;
use crate::forms::recognition::RecognizeImageForm;
use crate::recognition::ItemRecognizer;
use crate::routes::error_response;
use crate::services::recognition::recognize_items;
use crate::services::{ServiceError, ServiceResult};

#[post("/recognize")]
pub async fn recognize(
    recognizer: web::Data<dyn ItemRecognizer>,
    MultipartForm(form): MultipartForm<RecognizeImageForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    recognition_response(recognize_items(upload, recognizer.get_ref()).await)
}

/// Recognition failures keep the `{error}` wire shape; other errors use the
/// common error body.
fn recognition_response(result: ServiceResult<RecognitionResponse>) -> HttpResponse {
    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Recognition(message)) => {
            HttpResponse::UnprocessableEntity().json(RecognitionResponse {
                items: None,
                error: Some(message),
            })
        }
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::body::to_bytes;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::domain::receipt::LineItem;
    use crate::domain::recognition::{ImageUpload, RecognitionError, parse_item_lines};
    use crate::recognition::DisabledRecognizer;
    use crate::routes::configure;

    const BOUNDARY: &str = "receipt-boundary";

    struct CannedRecognizer(&'static str);

    #[async_trait]
    impl ItemRecognizer for CannedRecognizer {
        async fn recognize(&self, _image: &ImageUpload) -> Result<Vec<LineItem>, RecognitionError> {
            parse_item_lines(self.0)
        }
    }

    fn image_body(bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"receipt.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(bytes: &[u8]) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/recognize")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(image_body(bytes))
    }

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn recognizer(inner: impl ItemRecognizer + 'static) -> web::Data<dyn ItemRecognizer> {
        let inner: Arc<dyn ItemRecognizer> = Arc::new(inner);
        web::Data::from(inner)
    }

    #[actix_web::test]
    async fn recognized_items_are_returned() {
        let app = test::init_service(
            App::new()
                .app_data(recognizer(CannedRecognizer("Milk:32.50\nEggs:45")))
                .configure(configure),
        )
        .await;
        let req = upload_request(&[0xff, 0xd8, 0xff]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["name"], "Milk");
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn model_error_reply_keeps_the_error_shape() {
        let app = test::init_service(
            App::new()
                .app_data(recognizer(CannedRecognizer("Error: No items found")))
                .configure(configure),
        )
        .await;
        let req = upload_request(&[0xff, 0xd8]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "recognition failed: No items found");
        assert!(body.get("items").is_none());
    }

    #[actix_web::test]
    async fn missing_provider_is_service_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(recognizer(DisabledRecognizer))
                .configure(configure),
        )
        .await;
        let req = upload_request(&[0xff, 0xd8]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn empty_upload_is_a_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(recognizer(CannedRecognizer("Milk:32.50")))
                .configure(configure),
        )
        .await;
        let req = upload_request(&[]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Uploaded image is empty");
    }

    #[actix_web::test]
    async fn response_mapping_covers_every_outcome() {
        let ok = recognition_response(Ok(RecognitionResponse {
            items: Some(vec![]),
            error: None,
        }));
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(body_json(ok).await["items"], Value::Array(vec![]));

        let failed = recognition_response(Err(ServiceError::Recognition("blurry".into())));
        assert_eq!(failed.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(failed).await["error"], "blurry");

        let unavailable = recognition_response(Err(ServiceError::Unavailable));
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(unavailable).await["error"], "service unavailable");

        let rejected = recognition_response(Err(ServiceError::Form("bad upload".into())));
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    }
}
