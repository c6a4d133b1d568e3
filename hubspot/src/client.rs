//! HTTP client and operation dispatcher for the HubSpot CRM API

use crate::error::HubSpotError;
use crate::line_items;
use crate::operation::OperationRequest;
use crate::request::{BuiltRequest, CallContext, HttpMethod, build_request};
use crate::session::OwnerSession;
use serde_json::{Value, json};

/// Default HubSpot API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

/// Client for the HubSpot CRM v3 API
///
/// Thin by design: requests pass through with bearer authentication, and
/// responses come back as raw JSON for the caller to interpret. The one
/// exception is `getDealLineItems`, which runs an inner search and summarizes
/// the result.
#[derive(Clone, Debug)]
pub struct HubSpotClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HubSpotClient {
    /// Create a client with the given private-app access token
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client from the `HUBSPOT_ACCESS_TOKEN` environment variable
    ///
    /// # Errors
    ///
    /// Returns `HubSpotError::MissingApiKey` if the variable is not set.
    pub fn from_env() -> Result<Self, HubSpotError> {
        let api_key =
            std::env::var("HUBSPOT_ACCESS_TOKEN").map_err(|_| HubSpotError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Override the base URL (for testing)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate and execute an inbound `{operation, data}` call
    ///
    /// # Errors
    ///
    /// Returns validation, precondition, or API errors from the taxonomy in
    /// [`HubSpotError`].
    pub async fn execute(&self, input: &Value) -> Result<Value, HubSpotError> {
        let request = OperationRequest::parse(input)?;
        self.execute_with_context(&request, &CallContext::default())
            .await
    }

    /// Execute an inbound call within an owner session
    ///
    /// An `ownerId` field inside `data` pins the session before validation and
    /// is removed from the payload; the pinned owner is stamped onto created
    /// records via the call context. Every call must carry an owner, either
    /// supplied in `data` or already pinned by an earlier call.
    ///
    /// # Errors
    ///
    /// Returns `HubSpotError::InvalidOwnerId` for a missing or non-numeric
    /// `ownerId`, plus all errors `execute` can return.
    pub async fn execute_with_owner(
        &self,
        input: &Value,
        session: &OwnerSession,
    ) -> Result<Value, HubSpotError> {
        let mut input = input.clone();
        if let Some(data) = input.get_mut("data").and_then(Value::as_object_mut) {
            if let Some(owner) = data.remove("ownerId") {
                match owner {
                    Value::String(id) => session.pin(&id)?,
                    Value::Number(id) => session.pin(&id.to_string())?,
                    other => return Err(HubSpotError::InvalidOwnerId(other.to_string())),
                }
            }
        }
        if session.owner_id().is_none() {
            return Err(HubSpotError::InvalidOwnerId(
                "ownerId is required and no owner is pinned to the session".to_string(),
            ));
        }
        let request = OperationRequest::parse(&input)?;
        self.execute_with_context(&request, &session.context()).await
    }

    /// Execute a validated operation with an explicit call context
    ///
    /// # Errors
    ///
    /// Returns precondition errors from request building and API, transport,
    /// or parse errors from dispatch.
    pub async fn execute_with_context(
        &self,
        request: &OperationRequest,
        ctx: &CallContext,
    ) -> Result<Value, HubSpotError> {
        // The composite operation is the only one that reshapes its response.
        if let OperationRequest::GetDealLineItems(args) = request {
            let search = line_items::search_request(&args.deal_id)?;
            let response = self.send(&search).await?;
            return Ok(line_items::summarize(&response));
        }

        let built = build_request(request, ctx)?;
        self.send(&built).await
    }

    /// Send a built request and interpret the response
    async fn send(&self, built: &BuiltRequest) -> Result<Value, HubSpotError> {
        let url = format!("{}{}", self.base_url, built.path);
        tracing::debug!(method = built.method.as_str(), %url, "sending CRM request");

        let method = match built.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json");
        if !built.query.is_empty() {
            request = request.query(&built.query);
        }
        if let Some(body) = &built.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HubSpotError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HubSpotError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // A 204 on DELETE has no body; everything else passes through.
        if built.method == HttpMethod::Delete && status == reqwest::StatusCode::NO_CONTENT {
            return Ok(json!({ "success": true }));
        }

        let text = response
            .text()
            .await
            .map_err(|e| HubSpotError::RequestFailed(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| HubSpotError::ResponseParseFailed(e.to_string()))
    }
}
