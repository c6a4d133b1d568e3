//! Request and response types for managed-index retrieval

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default number of nodes retrieved per query
pub const DEFAULT_TOP_K: u32 = 5;

/// Body of a retrieval call against a pipeline
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetrievalRequest {
    /// Natural-language query
    pub query: String,
    /// Number of nodes to retrieve by dense similarity
    pub dense_similarity_top_k: u32,
}

impl RetrievalRequest {
    /// Retrieval request with the default top-k
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            dense_similarity_top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the number of retrieved nodes
    #[must_use]
    pub const fn with_top_k(mut self, top_k: u32) -> Self {
        self.dense_similarity_top_k = top_k;
        self
    }
}

/// A retrieval response: scored nodes in relevance order
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RetrievalResponse {
    /// Retrieved nodes, most relevant first
    #[serde(default)]
    pub retrieval_nodes: Vec<RetrievedNode>,
}

/// A scored node from the index
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RetrievedNode {
    /// The node content
    pub node: NodeContent,
    /// Relevance score
    #[serde(default)]
    pub score: f64,
}

/// Text and metadata of a retrieved node
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct NodeContent {
    /// Chunk text
    #[serde(default)]
    pub text: String,
    /// Source metadata (file name, page, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl RetrievalResponse {
    /// Join the retrieved node texts into a single context block
    ///
    /// Nodes are separated by blank lines, in relevance order; empty nodes
    /// are skipped.
    #[must_use]
    pub fn context_text(&self) -> String {
        self.retrieval_nodes
            .iter()
            .map(|n| n.node.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_top_k() {
        let request = RetrievalRequest::new("refund policy").with_top_k(3);
        let body = serde_json::to_value(&request).unwrap_or_default();
        assert_eq!(body["query"], "refund policy");
        assert_eq!(body["dense_similarity_top_k"], 3);
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: RetrievalResponse = serde_json::from_value(json!({
            "retrieval_nodes": [
                { "node": { "text": "Chunk one" }, "score": 0.92 },
                { "node": {} }
            ]
        }))
        .unwrap_or_default();

        assert_eq!(response.retrieval_nodes.len(), 2);
        assert_eq!(response.retrieval_nodes[0].score, 0.92);
        assert_eq!(response.retrieval_nodes[1].score, 0.0);
    }

    #[test]
    fn test_context_text_joins_non_empty_nodes() {
        let response: RetrievalResponse = serde_json::from_value(json!({
            "retrieval_nodes": [
                { "node": { "text": "First chunk." }, "score": 0.9 },
                { "node": { "text": "  " }, "score": 0.5 },
                { "node": { "text": "Second chunk." }, "score": 0.4 }
            ]
        }))
        .unwrap_or_default();

        assert_eq!(response.context_text(), "First chunk.\n\nSecond chunk.");
    }
}
