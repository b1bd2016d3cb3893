use std::io::{Read, Seek, SeekFrom};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use thiserror::Error;

use crate::domain::recognition::ImageUpload;

/// `POST /recognize` multipart body.
#[derive(MultipartForm)]
pub struct RecognizeImageForm {
    #[multipart(limit = "10MB")]
    pub image: TempFile,
}

#[derive(Debug, Error)]
pub enum RecognizeImageFormError {
    #[error("Error reading uploaded image")]
    FileReadError,
    #[error("Uploaded image is empty")]
    EmptyImage,
}

impl From<std::io::Error> for RecognizeImageFormError {
    fn from(_: std::io::Error) -> Self {
        RecognizeImageFormError::FileReadError
    }
}

impl RecognizeImageForm {
    pub fn into_upload(mut self) -> Result<ImageUpload, RecognizeImageFormError> {
        let file = self.image.file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        if bytes.is_empty() {
            return Err(RecognizeImageFormError::EmptyImage);
        }
        let mime_type = self
            .image
            .content_type
            .as_ref()
            .map(|m| m.essence_str().to_string());
        Ok(ImageUpload::new(bytes, mime_type))
    }
}
