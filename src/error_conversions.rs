//! Error conversion glue between the library layers and the service layer.
//!
//! The domain and store layers must not depend on service error types, so the
//! mappings live here and are only compiled with the `server` feature.

use crate::capture::CaptureError;
use crate::domain::recognition::RecognitionError;
use crate::domain::types::TypeConstraintError;
use crate::forms::receipts::ReceiptFormError;
use crate::forms::recognition::RecognizeImageFormError;
use crate::repository::RepositoryError;
use crate::services::errors::ServiceError;
use crate::store::StoreError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ReceiptFormError> for ServiceError {
    fn from(val: ReceiptFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<RecognizeImageFormError> for ServiceError {
    fn from(val: RecognizeImageFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<StoreError> for ServiceError {
    fn from(val: StoreError) -> Self {
        match val {
            StoreError::Validation(e) => e.into(),
            StoreError::NotFound(_) | StoreError::Backend(RepositoryError::NotFound) => {
                ServiceError::NotFound
            }
            StoreError::Backend(_) => ServiceError::Unavailable,
            StoreError::Configuration(_) | StoreError::Authentication(_) => ServiceError::Internal,
        }
    }
}

impl From<RecognitionError> for ServiceError {
    fn from(val: RecognitionError) -> Self {
        match val {
            RecognitionError::NotConfigured => ServiceError::Unavailable,
            other => ServiceError::Recognition(other.to_string()),
        }
    }
}

impl From<CaptureError> for ServiceError {
    fn from(val: CaptureError) -> Self {
        match val {
            CaptureError::InvalidItem(e) => e.into(),
            CaptureError::Incomplete(message) => ServiceError::Form(message.to_string()),
            CaptureError::Recognition(e) => e.into(),
            CaptureError::Submit(e) => e.into(),
            CaptureError::Busy => ServiceError::Internal,
        }
    }
}
