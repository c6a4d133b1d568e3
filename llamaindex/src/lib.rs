//! LlamaCloud managed-index retrieval client
//!
//! Retrieves scored text chunks from a LlamaCloud pipeline for use as agent
//! context. One endpoint, one request shape; the response is typed but
//! otherwise passed through.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_BASE_URL, LlamaCloudClient};
pub use error::LlamaCloudError;
pub use types::{DEFAULT_TOP_K, RetrievalRequest, RetrievalResponse, RetrievedNode};
