//! Error types for the LlamaCloud retrieval client

use thiserror::Error;

/// Errors that can occur when retrieving from a managed index
#[derive(Debug, Error)]
pub enum LlamaCloudError {
    /// Missing `LLAMA_CLOUD_API_KEY` environment variable
    #[error("Missing LLAMA_CLOUD_API_KEY environment variable")]
    MissingApiKey,

    /// Missing `LLAMA_CLOUD_PIPELINE_ID` environment variable
    #[error("Missing LLAMA_CLOUD_PIPELINE_ID environment variable")]
    MissingPipelineId,

    /// Remote API returned a non-success status
    #[error("LlamaCloud API request failed (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error payload from the remote service
        message: String,
    },

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be parsed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}
