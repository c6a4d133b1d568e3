//! HTTP client for LlamaCloud managed-index retrieval

use crate::error::LlamaCloudError;
use crate::types::{RetrievalRequest, RetrievalResponse};

/// Default LlamaCloud API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

/// Client for retrieving context from a LlamaCloud pipeline
#[derive(Clone, Debug)]
pub struct LlamaCloudClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    pipeline_id: String,
}

impl LlamaCloudClient {
    /// Create a client for a specific pipeline
    #[must_use]
    pub fn new(api_key: impl Into<String>, pipeline_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            pipeline_id: pipeline_id.into(),
        }
    }

    /// Create a client from `LLAMA_CLOUD_API_KEY` and `LLAMA_CLOUD_PIPELINE_ID`
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` or `MissingPipelineId` when the corresponding
    /// environment variable is not set.
    pub fn from_env() -> Result<Self, LlamaCloudError> {
        let api_key =
            std::env::var("LLAMA_CLOUD_API_KEY").map_err(|_| LlamaCloudError::MissingApiKey)?;
        let pipeline_id = std::env::var("LLAMA_CLOUD_PIPELINE_ID")
            .map_err(|_| LlamaCloudError::MissingPipelineId)?;
        Ok(Self::new(api_key, pipeline_id))
    }

    /// Override the base URL (for testing)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run a retrieval query against the pipeline
    ///
    /// # Errors
    ///
    /// Returns `Api` for non-success statuses, `RequestFailed` for transport
    /// failures, and `ResponseParseFailed` for unparseable bodies.
    pub async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<RetrievalResponse, LlamaCloudError> {
        let url = format!(
            "{}/api/v1/pipelines/{}/retrieve",
            self.base_url, self.pipeline_id
        );
        tracing::debug!(%url, query = %request.query, "sending retrieval request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LlamaCloudError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlamaCloudError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlamaCloudError::ResponseParseFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_retrieve_posts_query_to_pipeline_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/pipelines/pipe-1/retrieve"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "query": "refund policy",
                "dense_similarity_top_k": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "retrieval_nodes": [
                    { "node": { "text": "Refunds within 30 days." }, "score": 0.87 }
                ]
            })))
            .mount(&server)
            .await;

        let client = LlamaCloudClient::new("test-token", "pipe-1").with_base_url(server.uri());
        let response = client
            .retrieve(&RetrievalRequest::new("refund policy"))
            .await
            .expect("should succeed");

        assert_eq!(response.retrieval_nodes.len(), 1);
        assert_eq!(response.context_text(), "Refunds within 30 days.");
    }

    #[tokio::test]
    async fn test_api_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/pipelines/pipe-1/retrieve"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "detail": "invalid key" })),
            )
            .mount(&server)
            .await;

        let client = LlamaCloudClient::new("bad-token", "pipe-1").with_base_url(server.uri());
        let error = match client.retrieve(&RetrievalRequest::new("anything")).await {
            Err(e) => e,
            Ok(response) => panic!("expected error, got {response:?}"),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid key"));
    }
}
