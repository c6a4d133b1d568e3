//! Agent tool wrappers for the CRM and retrieval clients
//!
//! Each factory returns a `(Tool, ToolExecutorFn)` pair ready to hand to a
//! host agent framework: the `Tool` carries the JSON input schema shown to
//! the LLM, and the executor validates and dispatches the raw input string.
//!
//! ## Example
//!
//! ```no_run
//! use crm_agent_hubspot::HubSpotClient;
//! use crm_agent_tools::hubspot::hubspot_crm_tool;
//! use crm_agent_tools::registry::ToolRegistry;
//!
//! # fn run() -> Result<(), crm_agent_hubspot::HubSpotError> {
//! let registry = ToolRegistry::new();
//! let (tool, executor) = hubspot_crm_tool(HubSpotClient::from_env()?);
//! registry.register(tool, executor);
//! # Ok(())
//! # }
//! ```

pub mod hubspot;
pub mod llamaindex;
pub mod registry;

pub use hubspot::{hubspot_crm_owner_tool, hubspot_crm_tool};
pub use llamaindex::llama_retrieval_tool;
pub use registry::ToolRegistry;
