//! HTTP client for an OpenAI-compatible chat completions endpoint.
//!
//! Sends the order summary with a fixed extraction prompt and parses the
//! model's JSON answer into an [`OrderRecord`].

use std::time::Duration;

use ordval_core::OrderRecord;
use reqwest::{Client, Url};

use crate::error::ExtractorError;
use crate::prompt::{build_extraction_prompt, strip_code_fences, SYSTEM_PROMPT};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 1500;

/// Turns free-text order summaries into structured orders.
///
/// Use [`OpenAiExtractor::new`] for the public API or
/// [`OpenAiExtractor::with_base_url`] for a compatible gateway or a mock
/// server in tests.
pub struct OpenAiExtractor {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl std::fmt::Debug for OpenAiExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiExtractor")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl OpenAiExtractor {
    /// Creates an extractor pointed at the public `OpenAI` API.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ExtractorError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates an extractor with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ExtractorError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ExtractorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ordval/0.1 (order-validation)")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment (`/v1`).
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|e| ExtractorError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Extracts a structured order from a free-text summary.
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::Http`] on network failure or timeout.
    /// - [`ExtractorError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ExtractorError::EmptyCompletion`] if the model returned no text.
    /// - [`ExtractorError::Deserialize`] if either the completion envelope
    ///   or the model's JSON does not match the expected shape.
    pub async fn extract(&self, summary: &str) -> Result<OrderRecord, ExtractorError> {
        let user_prompt = build_extraction_prompt(summary);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let content = self.complete(&request).await?;
        let order = parse_order(&content)?;

        tracing::info!(
            customer = order.customer_name.as_deref().unwrap_or("<unknown>"),
            items = order.items.len(),
            "order extracted"
        );
        Ok(order)
    }

    /// Posts the chat request and returns the first choice's text.
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, ExtractorError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractorError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
                body,
            });
        }

        let body = response.text().await?;
        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ExtractorError::Deserialize {
                context: "chat completion envelope".to_string(),
                source: e,
            })?;

        match envelope.first_content() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_owned()),
            _ => Err(ExtractorError::EmptyCompletion),
        }
    }
}

/// Parses the model's answer (possibly fenced) into an order.
///
/// # Errors
///
/// Returns [`ExtractorError::Deserialize`] when the text is not a JSON
/// object of the expected shape.
pub fn parse_order(content: &str) -> Result<OrderRecord, ExtractorError> {
    serde_json::from_str(strip_code_fences(content)).map_err(|e| ExtractorError::Deserialize {
        context: "extracted order".to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
