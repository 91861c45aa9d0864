use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors from the text-generation provider; internal only, the public
/// surface always degrades instead of propagating.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error status: {0}")]
    ApiError(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// One message in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

impl PromptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Requested response shape, e.g. `json_object`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// Used for income-stability classification and risk-clarification grading.
/// Without an API key, or on any transport or shape error, the client falls
/// back to a deterministic canned response keyed on the prompt so the
/// dialogue always progresses.
pub struct GenerationClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl GenerationClient {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model,
            client,
        }
    }

    /// Run one chat completion. Never fails: provider errors degrade to the
    /// deterministic mock response, logged at warn.
    pub async fn chat_completion(
        &self,
        messages: &[PromptMessage],
        temperature: f64,
        response_format: Option<ResponseFormat>,
    ) -> String {
        if self.api_key.is_none() {
            tracing::trace!("No generation API key configured, using mock response");
            return Self::mock_response(messages);
        }

        match self
            .fetch_completion(messages, temperature, response_format)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Generation provider failed, using mock response: {}", e);
                Self::mock_response(messages)
            }
        }
    }

    async fn fetch_completion(
        &self,
        messages: &[PromptMessage],
        temperature: f64,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": 2000,
        });
        if let Some(format) = response_format {
            payload["response_format"] = json!(format);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::ApiError(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.pointer("/message/content"))
            .and_then(|content| content.as_str())
            .map(str::to_owned)
            .ok_or_else(|| {
                GenerationError::InvalidResponse("missing choices[0].message.content".into())
            })
    }

    /// Deterministic canned response, keyed on the last prompt.
    fn mock_response(messages: &[PromptMessage]) -> String {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");

        if last.contains("income stability") {
            "stable".to_string()
        } else if last.contains("risk") {
            "partial".to_string()
        } else {
            "{}".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_income_classification() {
        let client = GenerationClient::new(
            "http://localhost:0".to_string(),
            None,
            "test-model".to_string(),
        );

        let reply = client
            .chat_completion(
                &[PromptMessage::user(
                    "Given the description 'nurse', classify income stability.",
                )],
                0.3,
                None,
            )
            .await;
        assert_eq!(reply, "stable");
    }

    #[tokio::test]
    async fn test_mock_risk_grading() {
        let client = GenerationClient::new(
            "http://localhost:0".to_string(),
            None,
            "test-model".to_string(),
        );

        let reply = client
            .chat_completion(
                &[PromptMessage::user("Assess whether this risk is resolved.")],
                0.3,
                None,
            )
            .await;
        assert_eq!(reply, "partial");
    }

    #[tokio::test]
    async fn test_provider_response_parsed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "unstable"}}]}"#)
            .create_async()
            .await;

        let client = GenerationClient::new(
            server.url(),
            Some("key".to_string()),
            "test-model".to_string(),
        );

        let reply = client
            .chat_completion(&[PromptMessage::user("classify")], 0.3, None)
            .await;
        assert_eq!(reply, "unstable");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_degrades_to_mock() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let client = GenerationClient::new(
            server.url(),
            Some("key".to_string()),
            "test-model".to_string(),
        );

        let reply = client
            .chat_completion(
                &[PromptMessage::user("classify income stability")],
                0.3,
                None,
            )
            .await;
        assert_eq!(reply, "stable");
    }
}
