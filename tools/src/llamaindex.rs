//! Knowledge-retrieval tool factory
//!
//! Wraps a [`LlamaCloudClient`] as a `search_knowledge_base` tool returning
//! the retrieved chunks and a pre-joined context block.

use crm_agent_core::{Tool, ToolError, ToolExecutorFn};
use crm_agent_llamaindex::{LlamaCloudClient, RetrievalRequest};
use serde_json::json;
use std::sync::Arc;

/// Create the `search_knowledge_base` tool
#[must_use]
pub fn llama_retrieval_tool(client: LlamaCloudClient) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "search_knowledge_base".to_string(),
        description: "Search the indexed knowledge base and return the most relevant \
                      text chunks for a natural-language query."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural-language search query"
                },
                "topK": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of chunks to retrieve (default 5)"
                }
            },
            "required": ["query"]
        }),
    };

    let client = Arc::new(client);
    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let client = Arc::clone(&client);
        Box::pin(async move {
            let parsed: serde_json::Value = serde_json::from_str(&input)
                .map_err(|e| ToolError::new(format!("Invalid input JSON: {e}")))?;
            let query = parsed["query"]
                .as_str()
                .ok_or_else(|| ToolError::new("Missing 'query' field"))?;

            let mut request = RetrievalRequest::new(query);
            if let Some(top_k) = parsed["topK"].as_u64() {
                request = request.with_top_k(u32::try_from(top_k).unwrap_or(u32::MAX));
            }

            let response = client
                .retrieve(&request)
                .await
                .map_err(|e| ToolError::new(e.to_string()))?;

            let nodes: Vec<_> = response
                .retrieval_nodes
                .iter()
                .map(|n| {
                    json!({
                        "text": n.node.text,
                        "score": n.score,
                        "metadata": n.node.metadata,
                    })
                })
                .collect();
            let output = json!({
                "context": response.context_text(),
                "nodes": nodes,
            });
            serde_json::to_string(&output).map_err(|e| ToolError::new(e.to_string()))
        })
    });

    (tool, executor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_tool_returns_context_and_nodes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/pipelines/pipe-1/retrieve"))
            .and(body_partial_json(json!({
                "query": "refund policy",
                "dense_similarity_top_k": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "retrieval_nodes": [
                    {
                        "node": { "text": "Refunds within 30 days.",
                                  "metadata": { "file_name": "policy.pdf" } },
                        "score": 0.87
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = LlamaCloudClient::new("t", "pipe-1").with_base_url(server.uri());
        let (tool, executor) = llama_retrieval_tool(client);
        assert_eq!(tool.name, "search_knowledge_base");

        let input = json!({ "query": "refund policy", "topK": 3 }).to_string();
        let output = executor(input).await.expect("should succeed");
        let parsed: Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(parsed["context"], "Refunds within 30 days.");
        assert_eq!(parsed["nodes"][0]["metadata"]["file_name"], "policy.pdf");
    }

    #[tokio::test]
    async fn test_missing_query_is_rejected() {
        let client = LlamaCloudClient::new("t", "pipe-1");
        let (_, executor) = llama_retrieval_tool(client);

        let error = executor("{}".to_string()).await.expect_err("should fail");
        assert!(error.message.contains("query"));
    }
}
