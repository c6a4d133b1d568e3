//! Error types for the HubSpot CRM client

use thiserror::Error;

/// Errors that can occur when validating, building, or dispatching a CRM call
#[derive(Debug, Error)]
pub enum HubSpotError {
    /// Missing `HUBSPOT_ACCESS_TOKEN` environment variable
    #[error("Missing HUBSPOT_ACCESS_TOKEN environment variable")]
    MissingApiKey,

    /// Operation name is not a member of the supported operation set
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Input did not match the operation's declared schema
    #[error("{operation} validation failed: {detail}")]
    Validation {
        /// Operation whose schema was violated
        operation: &'static str,
        /// Field-level detail from the deserializer
        detail: String,
    },

    /// Required value missing or malformed; raised before any network access
    #[error("{0}")]
    Precondition(String),

    /// Owner identifier missing or not numeric
    #[error("Invalid owner id: {0}")]
    InvalidOwnerId(String),

    /// Remote API returned a non-success status
    #[error("HubSpot API request failed (status {status}): {message}")]
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
