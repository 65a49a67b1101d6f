//! Gemini `generateContent` model handle.
//!
//! A [`ModelHandle`] binds one API key to one model. It sends a list of
//! content parts (text and inline images) and returns the text of the
//! first candidate. All communication is over HTTP via `reqwest`.

use crate::error::AiError;

/// One part of a multimodal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Plain prompt text.
    Text(String),
    /// A base64-encoded inline blob (an image).
    InlineData {
        /// MIME type of the blob, e.g. `image/jpeg`.
        mime_type: String,
        /// Base64 payload.
        data: String,
    },
}

impl Part {
    /// Convenience constructor for a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::json!({ "text": text }),
            Self::InlineData { mime_type, data } => serde_json::json!({
                "inline_data": { "mime_type": mime_type, "data": data }
            }),
        }
    }
}

/// A single (credential, model) pair ready to be called.
///
/// Handles are cheap: the underlying `reqwest::Client` is shared.
#[derive(Clone)]
pub struct ModelHandle {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl core::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ModelHandle {
    /// Bind a key and model to a shared HTTP client.
    pub const fn new(client: reqwest::Client, api_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// API key this handle authenticates with.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Send a text-only prompt.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        self.generate(&[Part::text(prompt)]).await
    }

    /// Send the given parts and return the first candidate's text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] on a non-success status (the resilient
    /// client classifies it), [`AiError::Transport`] if the request never
    /// completed, and [`AiError::Response`] if no text came back.
    pub async fn generate(&self, parts: &[Part]) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let body = request_body(parts);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(AiError::Http {
                model: self.model.clone(),
                status: status.as_u16(),
                body: error_body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Response(format!("Gemini response parse failed: {e}")))?;

        extract_gemini_text(&json)
    }
}

/// Build the `generateContent` request body.
pub fn request_body(parts: &[Part]) -> serde_json::Value {
    let parts: Vec<serde_json::Value> = parts.iter().map(Part::to_json).collect();
    serde_json::json!({ "contents": [{ "parts": parts }] })
}

/// Extract `candidates[0].content.parts[0].text` from a response.
fn extract_gemini_text(json: &serde_json::Value) -> Result<String, AiError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            AiError::Response("Gemini response missing candidates[0].content.parts[0].text".to_owned())
        })
}
