//! Operation registry and per-operation input schemas
//!
//! The inbound call shape is `{ "operation": <name>, "data": {...} }`.
//! Operations form a closed set: parsing dispatches through one exhaustive
//! match, so adding an operation without handling it everywhere is a compile
//! error.
//!
//! Side-effectful or ambiguous operations (`createDeal`, `updateDeal`,
//! `createLineItem`, `getDealLineItems`, `createAssociation`, contact and
//! company search, property lookup) use strict schemas: any field outside the
//! declared set fails validation. Simple lookups and contact/company writes
//! are permissive and ignore or pass through extra fields.

use crate::error::HubSpotError;
use crate::search::FilterArg;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Wire shape of an inbound call
#[derive(Debug, Deserialize)]
struct RawRequest {
    operation: String,
    #[serde(default)]
    data: Value,
}

/// Fetch a single record by id, optionally selecting properties
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetRecord {
    /// Record id (missing id fails as a precondition, not a schema error)
    pub id: Option<String>,
    /// Property names to include, comma-joined into the query string
    pub properties: Option<Vec<String>>,
}

/// Create a contact (permissive; extra fields pass through as properties)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateContact {
    /// Email address
    pub email: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Company name
    pub company: Option<String>,
    /// Additional properties passed through unchanged
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Update a contact (sparse; only provided fields reach the outgoing body)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContact {
    /// Record id
    pub id: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Company name
    pub company: Option<String>,
    /// Additional properties passed through unchanged
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Create a company (permissive)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompany {
    /// Company name
    pub name: Option<String>,
    /// Web domain
    pub domain: Option<String>,
    /// Industry label
    pub industry: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Additional properties passed through unchanged
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Update a company (sparse)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompany {
    /// Record id
    pub id: Option<String>,
    /// Company name
    pub name: Option<String>,
    /// Web domain
    pub domain: Option<String>,
    /// Industry label
    pub industry: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Additional properties passed through unchanged
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Create a deal (strict schema)
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateDeal {
    /// Deal name (required)
    pub deal_name: String,
    /// Deal amount
    pub amount: Option<f64>,
    /// Stage phrase or token; canonicalized before sending
    pub deal_stage: Option<String>,
    /// Deal type; normalized before sending
    pub deal_type: Option<String>,
    /// Close date, as the caller supplies it
    pub close_date: Option<String>,
    /// Pipeline id
    pub pipeline: Option<String>,
}

/// Update a deal (strict schema, sparse body)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDeal {
    /// Record id
    pub id: Option<String>,
    /// Deal name
    pub deal_name: Option<String>,
    /// Deal amount
    pub amount: Option<f64>,
    /// Stage phrase or token; canonicalized before sending
    pub deal_stage: Option<String>,
    /// Deal type; normalized before sending
    pub deal_type: Option<String>,
    /// Close date
    pub close_date: Option<String>,
}

/// Create a line item (strict schema)
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLineItem {
    /// Line item name (required)
    pub name: String,
    /// Quantity
    pub quantity: Option<f64>,
    /// Unit price
    pub price: Option<f64>,
    /// Stock keeping unit
    pub sku: Option<String>,
    /// Deal to associate the line item with
    pub deal_id: Option<String>,
}

/// Fetch and summarize the line items of a deal (strict schema)
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GetDealLineItems {
    /// Deal id; non-digit characters are stripped before filtering
    pub deal_id: String,
}

/// Create an association between two typed records (strict schema)
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAssociation {
    /// Source object type (e.g. `contacts`)
    pub from_object_type: String,
    /// Source record id
    pub from_object_id: String,
    /// Target object type (e.g. `deals`)
    pub to_object_type: String,
    /// Target record id
    pub to_object_id: String,
    /// Explicit association token, required only for unknown type pairs
    pub association_type: Option<String>,
}

/// Delete an association between two typed records
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssociation {
    /// Source object type
    pub from_object_type: String,
    /// Source record id
    pub from_object_id: String,
    /// Target object type
    pub to_object_type: String,
    /// Target record id
    pub to_object_id: String,
    /// Explicit association token, required only for unknown type pairs
    pub association_type: Option<String>,
}

/// List the associations from one record to an object type
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetAssociations {
    /// Source object type
    pub from_object_type: String,
    /// Source record id
    pub from_object_id: String,
    /// Target object type
    pub to_object_type: String,
}

/// Search contacts (strict schema)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchContacts {
    /// Free-text query, filtered against `email`
    pub query: Option<String>,
    /// Email filter (default operator EQ)
    pub email: Option<FilterArg>,
    /// First name filter (default operator CONTAINS_TOKEN)
    pub first_name: Option<FilterArg>,
    /// Last name filter (default operator CONTAINS_TOKEN)
    pub last_name: Option<FilterArg>,
    /// Company filter (default operator CONTAINS_TOKEN)
    pub company: Option<FilterArg>,
    /// Result limit
    pub limit: Option<u32>,
}

/// Search companies (strict schema)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchCompanies {
    /// Free-text query, filtered against `name`
    pub query: Option<String>,
    /// Name filter (default operator CONTAINS_TOKEN)
    pub name: Option<FilterArg>,
    /// Domain filter (default operator EQ)
    pub domain: Option<FilterArg>,
    /// Industry filter (default operator EQ)
    pub industry: Option<FilterArg>,
    /// Result limit
    pub limit: Option<u32>,
}

/// Search deals (permissive schema)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchDeals {
    /// Free-text query, filtered against `dealname`
    pub query: Option<String>,
    /// Stage value; `"open"`/`"closed"` expand to IN filters
    pub deal_stage: Option<String>,
    /// Deal type filter (normalized, EQ)
    pub deal_type: Option<String>,
    /// Owner filter on `hubspot_owner_id` (default operator EQ)
    pub owner: Option<FilterArg>,
    /// Lower bound on amount (GTE)
    pub min_amount: Option<f64>,
    /// Upper bound on amount (LTE)
    pub max_amount: Option<f64>,
    /// Result limit
    pub limit: Option<u32>,
}

/// Look up the property definitions of an object type (strict schema)
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GetProperties {
    /// Object type whose properties to list (e.g. `deals`)
    pub object_type: String,
}

/// A validated operation request: the closed sum of all supported operations
#[derive(Clone, Debug, PartialEq)]
pub enum OperationRequest {
    /// Fetch a contact by id
    GetContact(GetRecord),
    /// Create a contact
    CreateContact(CreateContact),
    /// Update a contact
    UpdateContact(UpdateContact),
    /// Search contacts
    SearchContacts(SearchContacts),
    /// Fetch a company by id
    GetCompany(GetRecord),
    /// Create a company
    CreateCompany(CreateCompany),
    /// Update a company
    UpdateCompany(UpdateCompany),
    /// Search companies
    SearchCompanies(SearchCompanies),
    /// Fetch a deal by id
    GetDeal(GetRecord),
    /// Create a deal
    CreateDeal(CreateDeal),
    /// Update a deal
    UpdateDeal(UpdateDeal),
    /// Search deals
    SearchDeals(SearchDeals),
    /// Fetch a line item by id
    GetLineItem(GetRecord),
    /// Create a line item
    CreateLineItem(CreateLineItem),
    /// Fetch and summarize a deal's line items (composite)
    GetDealLineItems(GetDealLineItems),
    /// Create an association
    CreateAssociation(CreateAssociation),
    /// Delete an association
    DeleteAssociation(DeleteAssociation),
    /// List associations
    GetAssociations(GetAssociations),
    /// Look up property definitions
    GetProperties(GetProperties),
}

impl OperationRequest {
    /// Parse and validate an inbound `{operation, data}` value
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperation` for names outside the closed set and
    /// `Validation` when `data` does not match the operation's schema.
    pub fn parse(input: &Value) -> Result<Self, HubSpotError> {
        let raw: RawRequest =
            serde_json::from_value(input.clone()).map_err(|e| HubSpotError::Validation {
                operation: "request",
                detail: e.to_string(),
            })?;
        let data = if raw.data.is_null() {
            Value::Object(Map::new())
        } else {
            raw.data
        };
        Self::from_parts(&raw.operation, data)
    }

    /// Parse the data payload for a named operation
    ///
    /// # Errors
    ///
    /// Same as [`OperationRequest::parse`].
    pub fn from_parts(operation: &str, data: Value) -> Result<Self, HubSpotError> {
        let request = match operation {
            "getContact" => Self::GetContact(payload("getContact", data)?),
            "createContact" => Self::CreateContact(payload("createContact", data)?),
            "updateContact" => Self::UpdateContact(payload("updateContact", data)?),
            "searchContacts" => Self::SearchContacts(payload("searchContacts", data)?),
            "getCompany" => Self::GetCompany(payload("getCompany", data)?),
            "createCompany" => Self::CreateCompany(payload("createCompany", data)?),
            "updateCompany" => Self::UpdateCompany(payload("updateCompany", data)?),
            "searchCompanies" => Self::SearchCompanies(payload("searchCompanies", data)?),
            "getDeal" => Self::GetDeal(payload("getDeal", data)?),
            "createDeal" => Self::CreateDeal(payload("createDeal", data)?),
            "updateDeal" => Self::UpdateDeal(payload("updateDeal", data)?),
            "searchDeals" => Self::SearchDeals(payload("searchDeals", data)?),
            "getLineItem" => Self::GetLineItem(payload("getLineItem", data)?),
            "createLineItem" => Self::CreateLineItem(payload("createLineItem", data)?),
            "getDealLineItems" => Self::GetDealLineItems(payload("getDealLineItems", data)?),
            "createAssociation" => Self::CreateAssociation(payload("createAssociation", data)?),
            "deleteAssociation" => Self::DeleteAssociation(payload("deleteAssociation", data)?),
            "getAssociations" => Self::GetAssociations(payload("getAssociations", data)?),
            "getProperties" => Self::GetProperties(payload("getProperties", data)?),
            other => return Err(HubSpotError::UnknownOperation(other.to_string())),
        };
        request.validate()?;
        Ok(request)
    }

    /// The operation's wire name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetContact(_) => "getContact",
            Self::CreateContact(_) => "createContact",
            Self::UpdateContact(_) => "updateContact",
            Self::SearchContacts(_) => "searchContacts",
            Self::GetCompany(_) => "getCompany",
            Self::CreateCompany(_) => "createCompany",
            Self::UpdateCompany(_) => "updateCompany",
            Self::SearchCompanies(_) => "searchCompanies",
            Self::GetDeal(_) => "getDeal",
            Self::CreateDeal(_) => "createDeal",
            Self::UpdateDeal(_) => "updateDeal",
            Self::SearchDeals(_) => "searchDeals",
            Self::GetLineItem(_) => "getLineItem",
            Self::CreateLineItem(_) => "createLineItem",
            Self::GetDealLineItems(_) => "getDealLineItems",
            Self::CreateAssociation(_) => "createAssociation",
            Self::DeleteAssociation(_) => "deleteAssociation",
            Self::GetAssociations(_) => "getAssociations",
            Self::GetProperties(_) => "getProperties",
        }
    }

    /// All supported operation names, in registry order
    #[must_use]
    pub const fn operation_names() -> &'static [&'static str] {
        &[
            "getContact",
            "createContact",
            "updateContact",
            "searchContacts",
            "getCompany",
            "createCompany",
            "updateCompany",
            "searchCompanies",
            "getDeal",
            "createDeal",
            "updateDeal",
            "searchDeals",
            "getLineItem",
            "createLineItem",
            "getDealLineItems",
            "createAssociation",
            "deleteAssociation",
            "getAssociations",
            "getProperties",
        ]
    }

    /// Semantic checks beyond shape (email format)
    fn validate(&self) -> Result<(), HubSpotError> {
        match self {
            Self::CreateContact(args) => check_email(self.name(), args.email.as_deref()),
            Self::UpdateContact(args) => check_email(self.name(), args.email.as_deref()),
            Self::SearchContacts(args) => {
                check_email(self.name(), args.email.as_ref().map(FilterArg::value))
            }
            _ => Ok(()),
        }
    }
}

fn payload<T: DeserializeOwned>(
    operation: &'static str,
    data: Value,
) -> Result<T, HubSpotError> {
    serde_json::from_value(data).map_err(|e| HubSpotError::Validation {
        operation,
        detail: e.to_string(),
    })
}

fn check_email(operation: &'static str, email: Option<&str>) -> Result<(), HubSpotError> {
    match email {
        Some(value) if !value.contains('@') || !value.contains('.') => {
            Err(HubSpotError::Validation {
                operation,
                detail: format!("email must be a valid email address, got {value:?}"),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dispatches_on_operation_name() {
        let input = json!({
            "operation": "getContact",
            "data": { "id": "101", "properties": ["email", "firstname"] }
        });

        let request = OperationRequest::parse(&input);
        assert!(matches!(request, Ok(OperationRequest::GetContact(_))));
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let input = json!({ "operation": "mergeContacts", "data": {} });

        let result = OperationRequest::parse(&input);
        assert!(matches!(result, Err(HubSpotError::UnknownOperation(name)) if name == "mergeContacts"));
    }

    #[test]
    fn test_missing_data_defaults_to_empty_object() {
        let input = json!({ "operation": "searchDeals" });

        let request = OperationRequest::parse(&input);
        assert!(matches!(request, Ok(OperationRequest::SearchDeals(_))));
    }

    #[test]
    fn test_strict_schema_rejects_unknown_field() {
        let input = json!({
            "operation": "createDeal",
            "data": { "dealName": "Big Deal", "priority": "high" }
        });

        let result = OperationRequest::parse(&input);
        match result {
            Err(HubSpotError::Validation { operation, detail }) => {
                assert_eq!(operation, "createDeal");
                assert!(detail.contains("priority"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_schema_names_missing_required_field() {
        let input = json!({ "operation": "createDeal", "data": { "amount": 100 } });

        let result = OperationRequest::parse(&input);
        match result {
            Err(HubSpotError::Validation { operation, detail }) => {
                assert_eq!(operation, "createDeal");
                assert!(detail.contains("dealName"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_permissive_schema_keeps_extra_fields() {
        let input = json!({
            "operation": "createContact",
            "data": { "email": "ada@example.com", "jobtitle": "Engineer" }
        });

        match OperationRequest::parse(&input) {
            Ok(OperationRequest::CreateContact(args)) => {
                assert_eq!(args.email.as_deref(), Some("ada@example.com"));
                assert_eq!(args.extra.get("jobtitle"), Some(&json!("Engineer")));
            }
            other => panic!("expected createContact, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_email_fails_validation() {
        let input = json!({
            "operation": "createContact",
            "data": { "email": "not-an-email" }
        });

        let result = OperationRequest::parse(&input);
        assert!(matches!(
            result,
            Err(HubSpotError::Validation { operation: "createContact", .. })
        ));
    }

    #[test]
    fn test_search_filter_accepts_operator_override() {
        let input = json!({
            "operation": "searchContacts",
            "data": { "firstName": { "value": "Ada", "operator": "EQ" } }
        });

        let request = OperationRequest::parse(&input);
        assert!(matches!(request, Ok(OperationRequest::SearchContacts(_))));
    }

    #[test]
    fn test_every_registry_name_round_trips() {
        for name in OperationRequest::operation_names() {
            // Payload shape differs per operation; an empty object exercises
            // only the name dispatch, so required-field errors are expected.
            let result = OperationRequest::from_parts(name, json!({}));
            match result {
                Ok(request) => assert_eq!(request.name(), *name),
                Err(HubSpotError::Validation { operation, .. }) => assert_eq!(operation, *name),
                Err(other) => panic!("unexpected error for {name}: {other:?}"),
            }
        }
    }
}
