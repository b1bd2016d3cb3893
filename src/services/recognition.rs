use crate::domain::recognition::{ImageUpload, RecognitionError, RecognitionResponse};
use crate::recognition::ItemRecognizer;

use super::ServiceResult;

/// Runs recognition on an uploaded receipt image.
pub async fn recognize_items(
    upload: ImageUpload,
    recognizer: &dyn ItemRecognizer,
) -> ServiceResult<RecognitionResponse> {
    match recognizer.recognize(&upload).await {
        Ok(items) => Ok(RecognitionResponse::from_items(&items)),
        Err(RecognitionError::NotConfigured) => {
            log::warn!("Recognition requested but no provider is configured");
            Err(RecognitionError::NotConfigured.into())
        }
        Err(e) => {
            log::error!("Failed to recognize receipt items: {e}");
            Err(e.into())
        }
    }
}
