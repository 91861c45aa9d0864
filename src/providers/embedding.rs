use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors from the embedding provider; internal only, the public surface
/// always degrades instead of propagating.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error status: {0}")]
    ApiError(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for an OpenAI-compatible text-embedding endpoint.
///
/// Results are cached by input text. Without an API key, or when the
/// provider fails, the client degrades to a deterministic unit vector
/// derived from the text hash so identical input still yields identical
/// output and callers always get a usable vector.
pub struct EmbeddingClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
    client: Client,
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl EmbeddingClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        dimension: usize,
        cache_size: u64,
        cache_ttl_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let cache = Cache::builder()
            .max_capacity(cache_size)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self {
            base_url,
            api_key,
            model,
            dimension,
            client,
            cache,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed one text. Never fails: provider errors degrade to the
    /// deterministic fallback vector, logged at warn.
    pub async fn embed(&self, text: &str) -> Arc<Vec<f32>> {
        if text.trim().is_empty() {
            return Arc::new(vec![0.0; self.dimension]);
        }

        if let Some(cached) = self.cache.get(text).await {
            tracing::trace!("Embedding cache hit ({} chars)", text.len());
            return cached;
        }

        let embedding = match &self.api_key {
            Some(_) => match self.fetch_embedding(text).await {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("Embedding provider failed, using fallback vector: {}", e);
                    self.fallback_vector(text)
                }
            },
            None => {
                tracing::trace!("No embedding API key configured, using fallback vector");
                self.fallback_vector(text)
            }
        };

        let embedding = Arc::new(embedding);
        self.cache.insert(text.to_string(), embedding.clone()).await;
        embedding
    }

    /// Embed a batch of texts concurrently.
    pub async fn embed_batch(&self, texts: &[String]) -> Vec<Arc<Vec<f32>>> {
        futures::future::join_all(texts.iter().map(|t| self.embed(t))).await
    }

    async fn fetch_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmbeddingError::ApiError(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        let values = body
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|item| item.get("embedding"))
            .and_then(|e| e.as_array())
            .ok_or_else(|| EmbeddingError::InvalidResponse("missing data[0].embedding".into()))?;

        Ok(values
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect())
    }

    /// Deterministic pseudo-embedding: a unit vector expanded from the text
    /// hash. Identical text always maps to the identical vector.
    fn fallback_vector(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish() | 1;

        let mut vector = Vec::with_capacity(self.dimension);
        for _ in 0..self.dimension {
            // xorshift64* keeps the expansion cheap and reproducible
            state ^= state >> 12;
            state ^= state << 25;
            state ^= state >> 27;
            let raw = state.wrapping_mul(0x2545_F491_4F6C_DD1D);
            let unit = (raw >> 11) as f64 / (1u64 << 53) as f64;
            vector.push((unit * 2.0 - 1.0) as f32);
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client(dimension: usize) -> EmbeddingClient {
        EmbeddingClient::new(
            "http://localhost:0".to_string(),
            None,
            "test-embed".to_string(),
            dimension,
            100,
            60,
        )
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic_unit_vector() {
        let client = offline_client(64);

        let a = client.embed("a calm small dog").await;
        let b = client.embed("a calm small dog").await;
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_distinct_texts_get_distinct_vectors() {
        let client = offline_client(64);
        let a = client.embed("a calm small dog").await;
        let b = client.embed("an energetic large dog").await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let client = offline_client(16);
        let v = client.embed("   ").await;
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let client = offline_client(32);
        let texts = vec!["one".to_string(), "two".to_string()];
        let batch = client.embed_batch(&texts).await;
        assert_eq!(batch[0], client.embed("one").await);
        assert_eq!(batch[1], client.embed("two").await);
    }

    #[tokio::test]
    async fn test_provider_response_parsed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": [{"embedding": [0.6, 0.8]}]}"#)
            .create_async()
            .await;

        let client = EmbeddingClient::new(
            server.url(),
            Some("key".to_string()),
            "test-embed".to_string(),
            2,
            100,
            60,
        );

        let v = client.embed("hello").await;
        assert_eq!(v.as_slice(), &[0.6, 0.8]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_error_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(500)
            .create_async()
            .await;

        let client = EmbeddingClient::new(
            server.url(),
            Some("key".to_string()),
            "test-embed".to_string(),
            8,
            100,
            60,
        );

        // Still produces a usable vector of the configured dimension.
        let v = client.embed("hello").await;
        assert_eq!(v.len(), 8);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
