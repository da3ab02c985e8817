//! Gemini image generation client.
//!
//! Both remote operations share one request/response shape (image + text in,
//! image out) and differ only in how the text instruction is built: "generate"
//! wraps the profession in a fixed prompt template, "edit" sends the user's
//! instruction verbatim. Both are single-shot: no retries, no streaming.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{AppError, Operation, Result};

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model_name: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponsePart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        #[allow(dead_code)]
        text: String,
    },
    // Parts this client doesn't care about (thoughts, file data, ...).
    Other(#[allow(dead_code)] Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[allow(dead_code)]
    mime_type: String,
    data: String,
}

/// Builds the instruction for the initial career-photo transformation.
fn career_prompt(profession: &str) -> String {
    format!(
        "A photorealistic, candid action shot of the person in this photo working as a {profession}. \
         The image should look like a natural moment captured during their workday, not a posed \
         studio portrait. Maintain the person's facial features and characteristics. The overall \
         composition and lighting should be beautiful and professional, with an artistic \
         photographic quality."
    )
}

/// Builds the generateContent request body: one user turn with the image
/// part first and the instruction second, asking for image-only output.
fn build_request_body(payload: &str, mime_type: &str, instruction: &str) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": mime_type, "data": payload } },
                    { "text": instruction }
                ]
            }
        ],
        "generationConfig": {
            "responseModalities": ["IMAGE"]
        }
    })
}

/// Reads `candidates[0].content.parts[0].inlineData` as the produced image.
/// Any other response shape counts as "no image returned".
fn extract_image_payload(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.as_deref()?.first()?;
    let parts = candidate.content.as_ref()?.parts.as_deref()?;
    match parts.first()? {
        ResponsePart::InlineData { inline_data } => Some(inline_data.data.clone()),
        _ => None,
    }
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.gemini_api_key.clone(),
            model_name: config.model_name.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Sends the uploaded photo and a profession to the Gemini API and
    /// returns the base64 payload of the generated career photo.
    pub async fn generate(
        &self,
        payload: &str,
        mime_type: &str,
        profession: &str,
    ) -> Result<String> {
        self.request_image(payload, mime_type, &career_prompt(profession), Operation::Generate)
            .await
    }

    /// Sends the currently displayed image and a free-form instruction to
    /// the Gemini API and returns the base64 payload of the modified image.
    pub async fn edit(
        &self,
        payload: &str,
        mime_type: &str,
        instruction: &str,
    ) -> Result<String> {
        self.request_image(payload, mime_type, instruction, Operation::Edit)
            .await
    }

    async fn request_image(
        &self,
        payload: &str,
        mime_type: &str,
        instruction: &str,
        operation: Operation,
    ) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model_name);
        let body = build_request_body(payload, mime_type, instruction);
        debug!(
            ?operation,
            model = %self.model_name,
            payload_len = payload.len(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(&url)
            .header("X-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(?operation, "Gemini request failed: {e}");
                AppError::Upstream(operation, format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                ?operation,
                %status,
                "Gemini returned an error response: {}",
                truncate_for_log(&body, 2000)
            );
            return Err(AppError::Upstream(operation, format!("HTTP {status}")));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(?operation, "Failed to decode Gemini response: {e}");
            AppError::Upstream(operation, format!("malformed response: {e}"))
        })?;

        match extract_image_payload(&parsed) {
            Some(data) => Ok(data),
            None => {
                warn!(?operation, "Gemini response contained no image part");
                Err(AppError::NoImageReturned(operation))
            }
        }
    }
}
