//! # CRM Agent Core
//!
//! Core types shared by the agent-facing tool crates.
//!
//! A tool is a named capability the host agent framework can offer to an LLM:
//! a `Tool` definition (name, description, JSON input schema) paired with a
//! `ToolExecutorFn` that takes the raw JSON input string and produces a
//! `ToolResult`.
//!
//! ## Design Principles
//!
//! **LLM-Agnostic**: tools return structured, standard data formats (JSON
//! strings) and never assume a specific LLM or format data for a specific API.
//!
//! **Separation of Concerns**:
//! - **Client crates** (`crm-agent-hubspot`, `crm-agent-llamaindex`): typed
//!   request validation, building, and dispatch
//! - **Tools crate** (`crm-agent-tools`): wraps clients as `(Tool, ToolExecutorFn)`
//! - **Host framework**: decides when tools run and feeds results back to the LLM

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Tool definition following the common LLM tool-use schema
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Tool name (used to identify which tool to call)
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON schema for the tool's input parameters
    pub input_schema: serde_json::Value,
}

/// Result from tool execution
pub type ToolResult = Result<String, ToolError>;

/// Tool execution errors
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolError {
    /// Error message
    pub message: String,
}

impl ToolError {
    /// Create a tool error from anything displayable
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ToolError {}

/// Boxed async executor for a tool
///
/// Takes the raw JSON input string the LLM produced and resolves to a
/// `ToolResult`. Executors are `Arc`'d so a registry can hand out clones
/// without re-wrapping the closure.
pub type ToolExecutorFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> + Send + Sync>;

/// Tool executor trait for implementing custom tools
///
/// **Edition 2024**: Uses RPITIT (Return Position Impl Trait In Traits)
pub trait ToolExecutor: Send + Sync {
    /// Execute tool with JSON input string, return result or error
    ///
    /// # Errors
    ///
    /// Returns `ToolError` if the tool execution fails
    fn execute(&self, input: &str) -> impl Future<Output = ToolResult> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let error = ToolError::new("Tool failed");
        assert_eq!(error.to_string(), "Tool failed");
    }

    #[test]
    fn test_tool_serialization_round_trip() {
        let tool = Tool {
            name: "crm".to_string(),
            description: "CRM operations".to_string(),
            input_schema: serde_json::json!({"type": "object"}),
        };

        let json = serde_json::to_string(&tool).unwrap_or_default();
        assert!(json.contains(r#""name":"crm""#));
        assert!(json.contains(r#""input_schema""#));
    }

    #[tokio::test]
    async fn test_executor_fn_shape() {
        let executor: ToolExecutorFn = Arc::new(|input: String| {
            Box::pin(async move { Ok(input) })
                as Pin<Box<dyn Future<Output = ToolResult> + Send>>
        });

        let result = executor("{}".to_string()).await;
        assert_eq!(result.ok(), Some("{}".to_string()));
    }
}
