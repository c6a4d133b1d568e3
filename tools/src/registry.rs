//! Thread-safe tool registry
//!
//! Stores `(Tool, ToolExecutorFn)` pairs for execution by name and hands the
//! tool definitions to the host for the LLM's tool list.

use crm_agent_core::{Tool, ToolError, ToolExecutorFn, ToolResult};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type ToolMap = HashMap<String, (Tool, ToolExecutorFn)>;

/// Registry of agent tools, shareable across tasks
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<ToolMap>>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing tool of the same name
    ///
    /// Returns `true` when an existing tool was replaced.
    pub fn register(&self, tool: Tool, executor: ToolExecutorFn) -> bool {
        self.write()
            .insert(tool.name.clone(), (tool, executor))
            .is_some()
    }

    /// Execute a registered tool by name
    ///
    /// # Errors
    ///
    /// Returns `ToolError` when the tool is unknown or its execution fails.
    pub async fn execute(&self, name: &str, input: String) -> ToolResult {
        // Clone the executor out so the lock is not held across the await.
        let executor = self.read().get(name).map(|(_, e)| Arc::clone(e));
        match executor {
            Some(executor) => executor(input).await,
            None => Err(ToolError::new(format!("Tool not found: {name}"))),
        }
    }

    /// All registered tool definitions, sorted by name
    #[must_use]
    pub fn get_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.read().values().map(|(t, _)| t.clone()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// A specific tool definition by name
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<Tool> {
        self.read().get(name).map(|(t, _)| t.clone())
    }

    /// All registered tool names, sorted
    #[must_use]
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove a tool; returns `true` when it existed
    pub fn unregister(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// Number of registered tools
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> RwLockReadGuard<'_, ToolMap> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ToolMap> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }
}
