//! HubSpot CRM v3 API client for agent tool use
//!
//! A thin, predictable client around the CRM endpoints: inbound calls arrive
//! as `{ "operation": <name>, "data": {...} }`, are validated against a closed
//! operation set, mapped by a pure builder to an HTTP request, and dispatched
//! with bearer authentication. Responses pass through as raw JSON except for
//! the composite `getDealLineItems` operation, which summarizes an inner
//! line-item search.
//!
//! # Example
//!
//! ```no_run
//! use crm_agent_hubspot::HubSpotClient;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), crm_agent_hubspot::HubSpotError> {
//! let client = HubSpotClient::from_env()?;
//! let deal = client
//!     .execute(&json!({
//!         "operation": "createDeal",
//!         "data": { "dealName": "Annual renewal", "dealStage": "Qualified To Buy" }
//!     }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod associations;
pub mod client;
pub mod error;
pub mod line_items;
pub mod operation;
pub mod request;
pub mod search;
pub mod session;
pub mod stages;

pub use client::{DEFAULT_BASE_URL, HubSpotClient};
pub use error::HubSpotError;
pub use operation::OperationRequest;
pub use request::{BuiltRequest, CallContext, HttpMethod, build_request};
pub use session::OwnerSession;
