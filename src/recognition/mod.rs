//! Clients for the line-item recognition service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::domain::receipt::LineItem;
use crate::domain::recognition::{
    ImageUpload, RECEIPT_PROMPT, RecognitionError, RecognitionRequest, RecognitionResponse,
    parse_item_lines,
};
use crate::models::config::{RecognitionConfig, RecognitionProvider};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Extracts line items from a receipt image.
#[async_trait]
pub trait ItemRecognizer: Send + Sync {
    async fn recognize(&self, image: &ImageUpload) -> Result<Vec<LineItem>, RecognitionError>;
}

/// Picks the recognizer named by `config`.
///
/// A provider that lacks its endpoint or key is logged and disabled.
pub fn build_recognizer(config: &RecognitionConfig) -> Arc<dyn ItemRecognizer> {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build HTTP client for recognition: {e}");
            return Arc::new(DisabledRecognizer);
        }
    };

    match config.provider {
        RecognitionProvider::Disabled => Arc::new(DisabledRecognizer),
        RecognitionProvider::Endpoint => match non_blank(config.endpoint_url.as_deref()) {
            Some(url) => Arc::new(EndpointRecognizer::new(client, url)),
            None => {
                log::warn!("Recognition endpoint_url is not set; recognition disabled");
                Arc::new(DisabledRecognizer)
            }
        },
        RecognitionProvider::Gemini => match non_blank(config.api_key.as_deref()) {
            Some(key) => Arc::new(GeminiRecognizer::new(client, key, &config.model)),
            None => {
                log::warn!("Recognition api_key is not set; recognition disabled");
                Arc::new(DisabledRecognizer)
            }
        },
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Always fails with [`RecognitionError::NotConfigured`].
pub struct DisabledRecognizer;

#[async_trait]
impl ItemRecognizer for DisabledRecognizer {
    async fn recognize(&self, _image: &ImageUpload) -> Result<Vec<LineItem>, RecognitionError> {
        Err(RecognitionError::NotConfigured)
    }
}

/// Posts `{imageBase64, mimeType}` to an external endpoint.
pub struct EndpointRecognizer {
    client: reqwest::Client,
    url: String,
}

impl EndpointRecognizer {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl ItemRecognizer for EndpointRecognizer {
    async fn recognize(&self, image: &ImageUpload) -> Result<Vec<LineItem>, RecognitionError> {
        let request = RecognitionRequest {
            image_base64: STANDARD.encode(&image.bytes),
            mime_type: image.mime_type.clone(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RecognitionError::Transport(e.to_string()))?;

        endpoint_reply(status, &body)
    }
}

/// Interprets the endpoint's answer.
///
/// Error bodies still follow the contract when the endpoint reports one.
fn endpoint_reply(status: StatusCode, body: &str) -> Result<Vec<LineItem>, RecognitionError> {
    match serde_json::from_str::<RecognitionResponse>(body) {
        Ok(parsed) if status.is_success() || parsed.error.is_some() => parsed.into_items(),
        Ok(_) => Err(RecognitionError::Transport(format!("HTTP {status}"))),
        Err(e) if status.is_success() => Err(RecognitionError::InvalidResponse(e.to_string())),
        Err(_) => Err(RecognitionError::Transport(format!("HTTP {status}"))),
    }
}

/// Calls Gemini `generateContent` with the image and the receipt prompt.
pub struct GeminiRecognizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiRecognizer {
    pub fn new(client: reqwest::Client, api_key: &str, model: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn payload(image: &ImageUpload) -> Value {
        json!({
            "contents": [{
                "parts": [
                    {"text": RECEIPT_PROMPT},
                    {"inlineData": {
                        "mimeType": image.mime_type,
                        "data": STANDARD.encode(&image.bytes),
                    }},
                ]
            }]
        })
    }
}

#[async_trait]
impl ItemRecognizer for GeminiRecognizer {
    async fn recognize(&self, image: &ImageUpload) -> Result<Vec<LineItem>, RecognitionError> {
        let url = format!("{GEMINI_BASE_URL}/{}:generateContent", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::payload(image))
            .send()
            .await
            .map_err(|e| RecognitionError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(RecognitionError::Transport(message));
        }

        let text = reply_text(&body).ok_or_else(|| {
            RecognitionError::InvalidResponse("reply carries no text".to_string())
        })?;
        parse_item_lines(&text)
    }
}

/// Concatenated text parts of the first candidate.
fn reply_text(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() { None } else { Some(text) }
}
