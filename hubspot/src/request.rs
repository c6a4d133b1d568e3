//! Pure mapping from validated operations to outbound HTTP requests
//!
//! `build_request` is a pure function: identical (operation, context) input
//! always yields an identical [`BuiltRequest`]. All precondition checks
//! (missing ids, malformed numeric ids, unknown association pairs) happen
//! here, before any network access.

use crate::associations;
use crate::error::HubSpotError;
use crate::line_items;
use crate::operation::{
    CreateCompany, CreateContact, CreateDeal, CreateLineItem, GetRecord, OperationRequest,
    UpdateCompany, UpdateContact, UpdateDeal,
};
use crate::search;
use crate::stages;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Versioned base path for CRM object endpoints
const OBJECTS_BASE: &str = "/crm/v3/objects";

/// HTTP method of a built request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Wire name of the method
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Outbound request derived deterministically from a validated operation
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltRequest {
    /// Path relative to the API base URL
    pub path: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Ordered query parameters
    pub query: Vec<(String, String)>,
    /// JSON body, when the method carries one
    pub body: Option<Value>,
}

/// Immutable per-call context threaded through request building
///
/// Replaces hidden instance state: the owner id (when the host supplies one
/// via an [`crate::session::OwnerSession`]) is stamped onto created records as
/// `hubspot_owner_id`. Updates stay sparse and are never stamped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallContext {
    /// Owner id for created records
    pub owner_id: Option<String>,
}

/// Map a validated operation to its HTTP request
///
/// # Errors
///
/// Returns `HubSpotError::Precondition` when an operation-specific required
/// value is missing or malformed.
pub fn build_request(
    request: &OperationRequest,
    ctx: &CallContext,
) -> Result<BuiltRequest, HubSpotError> {
    match request {
        OperationRequest::GetContact(args) => get_object("contacts", "getContact", args),
        OperationRequest::CreateContact(args) => {
            Ok(create_object("contacts", contact_create_properties(args, ctx)))
        }
        OperationRequest::UpdateContact(args) => update_object(
            "contacts",
            "updateContact",
            args.id.as_deref(),
            contact_update_properties(args),
        ),
        OperationRequest::SearchContacts(args) => Ok(search_object(
            "contacts",
            &search::contact_filters(args),
            args.limit,
        )),
        OperationRequest::GetCompany(args) => get_object("companies", "getCompany", args),
        OperationRequest::CreateCompany(args) => {
            Ok(create_object("companies", company_create_properties(args, ctx)))
        }
        OperationRequest::UpdateCompany(args) => update_object(
            "companies",
            "updateCompany",
            args.id.as_deref(),
            company_update_properties(args),
        ),
        OperationRequest::SearchCompanies(args) => Ok(search_object(
            "companies",
            &search::company_filters(args),
            args.limit,
        )),
        OperationRequest::GetDeal(args) => get_object("deals", "getDeal", args),
        OperationRequest::CreateDeal(args) => {
            Ok(create_object("deals", deal_create_properties(args, ctx)))
        }
        OperationRequest::UpdateDeal(args) => update_object(
            "deals",
            "updateDeal",
            args.id.as_deref(),
            deal_update_properties(args),
        ),
        OperationRequest::SearchDeals(args) => Ok(search_object(
            "deals",
            &search::deal_filters(args),
            args.limit,
        )),
        OperationRequest::GetLineItem(args) => get_object("line_items", "getLineItem", args),
        OperationRequest::CreateLineItem(args) => Ok(create_line_item(args)),
        OperationRequest::GetDealLineItems(args) => line_items::search_request(&args.deal_id),
        OperationRequest::CreateAssociation(args) => {
            let token = associations::association_type(
                &args.from_object_type,
                &args.to_object_type,
                args.association_type.as_deref(),
            )?;
            Ok(association_request(
                HttpMethod::Put,
                &args.from_object_type,
                &args.from_object_id,
                &args.to_object_type,
                &args.to_object_id,
                &token,
            ))
        }
        OperationRequest::DeleteAssociation(args) => {
            let token = associations::association_type(
                &args.from_object_type,
                &args.to_object_type,
                args.association_type.as_deref(),
            )?;
            Ok(association_request(
                HttpMethod::Delete,
                &args.from_object_type,
                &args.from_object_id,
                &args.to_object_type,
                &args.to_object_id,
                &token,
            ))
        }
        OperationRequest::GetAssociations(args) => Ok(BuiltRequest {
            path: format!(
                "{OBJECTS_BASE}/{}/{}/associations/{}",
                args.from_object_type, args.from_object_id, args.to_object_type
            ),
            method: HttpMethod::Get,
            query: Vec::new(),
            body: None,
        }),
        OperationRequest::GetProperties(args) => Ok(BuiltRequest {
            path: format!("/crm/v3/properties/{}", args.object_type),
            method: HttpMethod::Get,
            query: Vec::new(),
            body: None,
        }),
    }
}

fn get_object(
    object: &str,
    operation: &str,
    args: &GetRecord,
) -> Result<BuiltRequest, HubSpotError> {
    let id = require_id(operation, args.id.as_deref())?;
    let mut query = Vec::new();
    if let Some(properties) = &args.properties {
        if !properties.is_empty() {
            query.push(("properties".to_string(), properties.join(",")));
        }
    }
    Ok(BuiltRequest {
        path: format!("{OBJECTS_BASE}/{object}/{id}"),
        method: HttpMethod::Get,
        query,
        body: None,
    })
}

fn create_object(object: &str, properties: Map<String, Value>) -> BuiltRequest {
    BuiltRequest {
        path: format!("{OBJECTS_BASE}/{object}"),
        method: HttpMethod::Post,
        query: Vec::new(),
        body: Some(json!({ "properties": properties })),
    }
}

fn update_object(
    object: &str,
    operation: &str,
    id: Option<&str>,
    properties: Map<String, Value>,
) -> Result<BuiltRequest, HubSpotError> {
    let id = require_id(operation, id)?;
    Ok(BuiltRequest {
        path: format!("{OBJECTS_BASE}/{object}/{id}"),
        method: HttpMethod::Patch,
        query: Vec::new(),
        body: Some(json!({ "properties": properties })),
    })
}

fn search_object(object: &str, filters: &[search::Filter], limit: Option<u32>) -> BuiltRequest {
    BuiltRequest {
        path: format!("{OBJECTS_BASE}/{object}/search"),
        method: HttpMethod::Post,
        query: Vec::new(),
        body: Some(search::search_body(filters, limit)),
    }
}

fn association_request(
    method: HttpMethod,
    from_type: &str,
    from_id: &str,
    to_type: &str,
    to_id: &str,
    token: &str,
) -> BuiltRequest {
    BuiltRequest {
        path: format!(
            "{OBJECTS_BASE}/{from_type}/{from_id}/associations/{to_type}/{to_id}/{token}"
        ),
        method,
        query: Vec::new(),
        body: None,
    }
}

fn create_line_item(args: &CreateLineItem) -> BuiltRequest {
    let mut props = Map::new();
    set(&mut props, "name", Some(&args.name));
    set_number(&mut props, "quantity", args.quantity);
    set_number(&mut props, "price", args.price);
    set(&mut props, "hs_sku", args.sku.as_deref());

    let mut body = json!({ "properties": props });
    if let Some(deal_id) = args.deal_id.as_deref().filter(|id| !id.trim().is_empty()) {
        // Line item -> deal is HUBSPOT_DEFINED association type 20.
        body["associations"] = json!([{
            "to": { "id": deal_id },
            "types": [{ "associationCategory": "HUBSPOT_DEFINED", "associationTypeId": 20 }],
        }]);
    }

    BuiltRequest {
        path: format!("{OBJECTS_BASE}/line_items"),
        method: HttpMethod::Post,
        query: Vec::new(),
        body: Some(body),
    }
}

fn contact_create_properties(args: &CreateContact, ctx: &CallContext) -> Map<String, Value> {
    let mut props = Map::new();
    set(&mut props, "email", args.email.as_deref());
    set(&mut props, "firstname", args.first_name.as_deref());
    set(&mut props, "lastname", args.last_name.as_deref());
    set(&mut props, "phone", args.phone.as_deref());
    set(&mut props, "company", args.company.as_deref());
    set_extra(&mut props, &args.extra);
    set(&mut props, "hubspot_owner_id", ctx.owner_id.as_deref());
    props
}

fn contact_update_properties(args: &UpdateContact) -> Map<String, Value> {
    let mut props = Map::new();
    set(&mut props, "email", args.email.as_deref());
    set(&mut props, "firstname", args.first_name.as_deref());
    set(&mut props, "lastname", args.last_name.as_deref());
    set(&mut props, "phone", args.phone.as_deref());
    set(&mut props, "company", args.company.as_deref());
    set_extra(&mut props, &args.extra);
    props
}

fn company_create_properties(args: &CreateCompany, ctx: &CallContext) -> Map<String, Value> {
    let mut props = Map::new();
    set(&mut props, "name", args.name.as_deref());
    set(&mut props, "domain", args.domain.as_deref());
    set(&mut props, "industry", args.industry.as_deref());
    set(&mut props, "phone", args.phone.as_deref());
    set_extra(&mut props, &args.extra);
    set(&mut props, "hubspot_owner_id", ctx.owner_id.as_deref());
    props
}

fn company_update_properties(args: &UpdateCompany) -> Map<String, Value> {
    let mut props = Map::new();
    set(&mut props, "name", args.name.as_deref());
    set(&mut props, "domain", args.domain.as_deref());
    set(&mut props, "industry", args.industry.as_deref());
    set(&mut props, "phone", args.phone.as_deref());
    set_extra(&mut props, &args.extra);
    props
}

fn deal_create_properties(args: &CreateDeal, ctx: &CallContext) -> Map<String, Value> {
    let mut props = Map::new();
    set(&mut props, "dealname", Some(&args.deal_name));
    set_number(&mut props, "amount", args.amount);
    set(
        &mut props,
        "dealstage",
        args.deal_stage.as_deref().map(stages::canonical_stage).as_deref(),
    );
    set(
        &mut props,
        "dealtype",
        args.deal_type
            .as_deref()
            .map(stages::normalize_deal_type)
            .as_deref(),
    );
    set(&mut props, "closedate", args.close_date.as_deref());
    set(&mut props, "pipeline", args.pipeline.as_deref());
    set(&mut props, "hubspot_owner_id", ctx.owner_id.as_deref());
    props
}

fn deal_update_properties(args: &UpdateDeal) -> Map<String, Value> {
    let mut props = Map::new();
    set(&mut props, "dealname", args.deal_name.as_deref());
    set_number(&mut props, "amount", args.amount);
    set(
        &mut props,
        "dealstage",
        args.deal_stage.as_deref().map(stages::canonical_stage).as_deref(),
    );
    set(
        &mut props,
        "dealtype",
        args.deal_type
            .as_deref()
            .map(stages::normalize_deal_type)
            .as_deref(),
    );
    set(&mut props, "closedate", args.close_date.as_deref());
    props
}

/// Copy a provided, non-empty string field into the properties map
fn set(props: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !value.trim().is_empty() {
            props.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
}

fn set_number(props: &mut Map<String, Value>, key: &str, value: Option<f64>) {
    if let Some(value) = value {
        props.insert(key.to_string(), json!(value));
    }
}

/// Pass extra caller-supplied properties through unchanged
fn set_extra(props: &mut Map<String, Value>, extra: &BTreeMap<String, Value>) {
    for (key, value) in extra {
        if !value.is_null() {
            props.insert(key.clone(), value.clone());
        }
    }
}

fn require_id(operation: &str, id: Option<&str>) -> Result<String, HubSpotError> {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Ok(id.to_string()),
        None => Err(HubSpotError::Precondition(format!(
            "id is required for {operation}"
        ))),
    }
}
