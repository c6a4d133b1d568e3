//! HubSpot CRM tool factories
//!
//! Wraps a [`HubSpotClient`] as a single `hubspot_crm` tool: the LLM picks an
//! operation from the closed set and supplies its data payload. The
//! owner-session variant additionally accepts an `ownerId` inside `data`,
//! pinning later calls in the session to that owner.

use crm_agent_core::{Tool, ToolError, ToolExecutorFn};
use crm_agent_hubspot::{HubSpotClient, OperationRequest, OwnerSession};
use serde_json::json;
use std::sync::Arc;

fn input_schema(with_owner: bool) -> serde_json::Value {
    let mut data = json!({
        "type": "object",
        "description": "Operation-specific payload. Field names are camelCase \
                        (e.g. dealName, dealStage, fromObjectType)."
    });
    if with_owner {
        data["properties"] = json!({
            "ownerId": {
                "type": "string",
                "description": "Numeric HubSpot owner id; remembered for the rest of the session"
            }
        });
    }
    json!({
        "type": "object",
        "properties": {
            "operation": {
                "type": "string",
                "enum": OperationRequest::operation_names(),
                "description": "CRM operation to perform"
            },
            "data": data
        },
        "required": ["operation"]
    })
}

fn parse_input(input: &str) -> Result<serde_json::Value, ToolError> {
    serde_json::from_str(input).map_err(|e| ToolError::new(format!("Invalid input JSON: {e}")))
}

fn to_output(value: &serde_json::Value) -> Result<String, ToolError> {
    serde_json::to_string(value).map_err(|e| ToolError::new(e.to_string()))
}

/// Create the `hubspot_crm` tool
#[must_use]
pub fn hubspot_crm_tool(client: HubSpotClient) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "hubspot_crm".to_string(),
        description: "Manage HubSpot CRM records: get, create, update, and search contacts, \
                      companies, deals, and line items; manage associations; summarize a \
                      deal's line items."
            .to_string(),
        input_schema: input_schema(false),
    };

    let client = Arc::new(client);
    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let client = Arc::clone(&client);
        Box::pin(async move {
            let call = parse_input(&input)?;
            let response = client
                .execute(&call)
                .await
                .map_err(|e| ToolError::new(e.to_string()))?;
            to_output(&response)
        })
    });

    (tool, executor)
}

/// Create the `hubspot_crm` tool bound to an owner session
///
/// The session is shared with the host: an `ownerId` supplied in any call's
/// `data` is validated, removed from the payload, and stamped onto records
/// created by this and later calls.
#[must_use]
pub fn hubspot_crm_owner_tool(
    client: HubSpotClient,
    session: Arc<OwnerSession>,
) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "hubspot_crm".to_string(),
        description: "Manage HubSpot CRM records on behalf of a specific owner: get, create, \
                      update, and search contacts, companies, deals, and line items; manage \
                      associations; summarize a deal's line items. Pass ownerId once in data \
                      to pin the session to that owner."
            .to_string(),
        input_schema: input_schema(true),
    };

    let client = Arc::new(client);
    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let client = Arc::clone(&client);
        let session = Arc::clone(&session);
        Box::pin(async move {
            let call = parse_input(&input)?;
            let response = client
                .execute_with_owner(&call, &session)
                .await
                .map_err(|e| ToolError::new(e.to_string()))?;
            to_output(&response)
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

    #[test]
    fn test_schema_lists_every_operation() {
        let (tool, _) = hubspot_crm_tool(HubSpotClient::new("t"));
        assert_eq!(tool.name, "hubspot_crm");
        let ops = tool.input_schema["properties"]["operation"]["enum"]
            .as_array()
            .map_or(0, Vec::len);
        assert_eq!(ops, OperationRequest::operation_names().len());
    }

    #[tokio::test]
    async fn test_tool_executes_operation_and_returns_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contacts/101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "101",
                "properties": { "email": "ada@example.com" }
            })))
            .mount(&server)
            .await;

        let client = HubSpotClient::new("t").with_base_url(server.uri());
        let (_, executor) = hubspot_crm_tool(client);

        let input = json!({ "operation": "getContact", "data": { "id": "101" } }).to_string();
        let output = executor(input).await.expect("should succeed");
        let parsed: Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(parsed["id"], "101");
    }

    #[tokio::test]
    async fn test_tool_surfaces_validation_errors() {
        let (_, executor) = hubspot_crm_tool(HubSpotClient::new("t"));

        let input = json!({ "operation": "mergeContacts", "data": {} }).to_string();
        let error = executor(input).await.expect_err("should fail");
        assert!(error.message.contains("Unknown operation"));
    }

    #[tokio::test]
    async fn test_owner_tool_pins_session_across_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/deals"))
            .and(body_partial_json(json!({
                "properties": { "hubspot_owner_id": "4472" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "1" })))
            .expect(2)
            .mount(&server)
            .await;

        let client = HubSpotClient::new("t").with_base_url(server.uri());
        let session = Arc::new(OwnerSession::new());
        let (_, executor) = hubspot_crm_owner_tool(client, Arc::clone(&session));

        let first = json!({
            "operation": "createDeal",
            "data": { "dealName": "First", "ownerId": "4472" }
        })
        .to_string();
        executor(first).await.expect("should succeed");

        // Second call omits ownerId; the session remembers it.
        let second = json!({
            "operation": "createDeal",
            "data": { "dealName": "Second" }
        })
        .to_string();
        executor(second).await.expect("should succeed");

        assert_eq!(session.owner_id().as_deref(), Some("4472"));
    }
}
