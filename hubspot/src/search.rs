//! Filter-group construction for CRM search operations
//!
//! Every search posts a body of the form
//! `{"filterGroups": [{"filters": [...]}], "limit": n}`. A base filter
//! (`createdate` GTE `"0"`) is always present and always first, so an
//! otherwise-empty search still matches every record. Free-text `query` input
//! maps to a CONTAINS_TOKEN filter on the entity's canonical field.
//!
//! Default operators per field:
//!
//! | entity    | field       | property           | default operator |
//! |-----------|-------------|--------------------|------------------|
//! | contacts  | `query`     | `email`            | CONTAINS_TOKEN   |
//! | contacts  | `email`     | `email`            | EQ               |
//! | contacts  | `firstName` | `firstname`        | CONTAINS_TOKEN   |
//! | contacts  | `lastName`  | `lastname`         | CONTAINS_TOKEN   |
//! | contacts  | `company`   | `company`          | CONTAINS_TOKEN   |
//! | companies | `query`     | `name`             | CONTAINS_TOKEN   |
//! | companies | `name`      | `name`             | CONTAINS_TOKEN   |
//! | companies | `domain`    | `domain`           | EQ               |
//! | companies | `industry`  | `industry`         | EQ               |
//! | deals     | `query`     | `dealname`         | CONTAINS_TOKEN   |
//! | deals     | `dealStage` | `dealstage`        | EQ (or IN)       |
//! | deals     | `dealType`  | `dealtype`         | EQ               |
//! | deals     | `owner`     | `hubspot_owner_id` | EQ               |
//! | deals     | `minAmount` | `amount`           | GTE              |
//! | deals     | `maxAmount` | `amount`           | LTE              |

use crate::operation::{SearchCompanies, SearchContacts, SearchDeals};
use crate::stages;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Filter operators accepted by the search endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    /// Equal
    Eq,
    /// Not equal
    Neq,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Token-level containment for text fields
    ContainsToken,
    /// Membership in a value list
    In,
}

/// A caller-supplied filter value, optionally carrying an operator override
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterArg {
    /// Bare value filtered with the field's default operator
    Value(String),
    /// Value with an explicit operator
    WithOperator {
        /// Value to filter on
        value: String,
        /// Operator overriding the field default
        operator: FilterOperator,
    },
}

impl FilterArg {
    /// The filter value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Value(v) | Self::WithOperator { value: v, .. } => v,
        }
    }

    /// The effective operator, falling back to the field default
    #[must_use]
    pub const fn operator(&self, default: FilterOperator) -> FilterOperator {
        match self {
            Self::Value(_) => default,
            Self::WithOperator { operator, .. } => *operator,
        }
    }
}

/// A single field-level predicate within a filter group
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Internal property name to filter on
    pub property_name: String,
    /// Comparison operator
    pub operator: FilterOperator,
    /// Scalar comparison value (absent for IN filters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Value list for IN filters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl Filter {
    /// Scalar filter on a property
    #[must_use]
    pub fn value(property: &str, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            property_name: property.to_string(),
            operator,
            value: Some(value.into()),
            values: None,
        }
    }

    /// IN filter over a list of values
    #[must_use]
    pub fn within(property: &str, values: Vec<String>) -> Self {
        Self {
            property_name: property.to_string(),
            operator: FilterOperator::In,
            value: None,
            values: Some(values),
        }
    }

    /// The base filter present in every search: `createdate` GTE `"0"`
    #[must_use]
    pub fn base() -> Self {
        Self::value("createdate", FilterOperator::Gte, "0")
    }
}

/// Default result limit for searches
pub const DEFAULT_LIMIT: u32 = 100;

/// Assemble the search request body from filters and an optional limit
#[must_use]
pub fn search_body(filters: &[Filter], limit: Option<u32>) -> Value {
    json!({
        "filterGroups": [{ "filters": filters }],
        "limit": limit.unwrap_or(DEFAULT_LIMIT),
    })
}

/// Filters for a contact search
#[must_use]
pub fn contact_filters(args: &SearchContacts) -> Vec<Filter> {
    let mut filters = vec![Filter::base()];
    if let Some(query) = non_empty(args.query.as_deref()) {
        filters.push(Filter::value("email", FilterOperator::ContainsToken, query));
    }
    push_arg(&mut filters, "email", FilterOperator::Eq, args.email.as_ref());
    push_arg(
        &mut filters,
        "firstname",
        FilterOperator::ContainsToken,
        args.first_name.as_ref(),
    );
    push_arg(
        &mut filters,
        "lastname",
        FilterOperator::ContainsToken,
        args.last_name.as_ref(),
    );
    push_arg(
        &mut filters,
        "company",
        FilterOperator::ContainsToken,
        args.company.as_ref(),
    );
    filters
}

/// Filters for a company search
#[must_use]
pub fn company_filters(args: &SearchCompanies) -> Vec<Filter> {
    let mut filters = vec![Filter::base()];
    if let Some(query) = non_empty(args.query.as_deref()) {
        filters.push(Filter::value("name", FilterOperator::ContainsToken, query));
    }
    push_arg(
        &mut filters,
        "name",
        FilterOperator::ContainsToken,
        args.name.as_ref(),
    );
    push_arg(&mut filters, "domain", FilterOperator::Eq, args.domain.as_ref());
    push_arg(
        &mut filters,
        "industry",
        FilterOperator::Eq,
        args.industry.as_ref(),
    );
    filters
}

/// Filters for a deal search
#[must_use]
pub fn deal_filters(args: &SearchDeals) -> Vec<Filter> {
    let mut filters = vec![Filter::base()];
    if let Some(query) = non_empty(args.query.as_deref()) {
        filters.push(Filter::value(
            "dealname",
            FilterOperator::ContainsToken,
            query,
        ));
    }
    if let Some(stage) = non_empty(args.deal_stage.as_deref()) {
        filters.push(deal_stage_filter(stage));
    }
    if let Some(deal_type) = non_empty(args.deal_type.as_deref()) {
        filters.push(Filter::value(
            "dealtype",
            FilterOperator::Eq,
            stages::normalize_deal_type(deal_type),
        ));
    }
    push_arg(
        &mut filters,
        "hubspot_owner_id",
        FilterOperator::Eq,
        args.owner.as_ref(),
    );
    if let Some(min) = args.min_amount {
        filters.push(Filter::value("amount", FilterOperator::Gte, min.to_string()));
    }
    if let Some(max) = args.max_amount {
        filters.push(Filter::value("amount", FilterOperator::Lte, max.to_string()));
    }
    filters
}

/// Expand the categorical deal-stage value into a stage filter
///
/// `"open"` and `"closed"` expand to IN filters over the fixed stage lists;
/// any other value becomes an EQ filter on the canonical stage token.
#[must_use]
pub fn deal_stage_filter(value: &str) -> Filter {
    match stages::normalize(value).as_str() {
        "open" => Filter::within(
            "dealstage",
            stages::OPEN_STAGES.iter().map(ToString::to_string).collect(),
        ),
        "closed" => Filter::within(
            "dealstage",
            stages::CLOSED_STAGES
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        _ => Filter::value("dealstage", FilterOperator::Eq, stages::canonical_stage(value)),
    }
}

fn push_arg(
    filters: &mut Vec<Filter>,
    property: &str,
    default: FilterOperator,
    arg: Option<&FilterArg>,
) {
    if let Some(arg) = arg {
        if !arg.value().trim().is_empty() {
            filters.push(Filter::value(property, arg.operator(default), arg.value()));
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_filter_is_always_first() {
        let args = SearchDeals::default();
        let filters = deal_filters(&args);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0], Filter::base());
    }

    #[test]
    fn test_query_maps_to_canonical_field() {
        let args = SearchContacts {
            query: Some("smith".to_string()),
            ..SearchContacts::default()
        };
        let filters = contact_filters(&args);
        assert_eq!(filters[1].property_name, "email");
        assert_eq!(filters[1].operator, FilterOperator::ContainsToken);
        assert_eq!(filters[1].value.as_deref(), Some("smith"));
    }

    #[test]
    fn test_operator_override_is_honored() {
        let args = SearchCompanies {
            name: Some(FilterArg::WithOperator {
                value: "Acme".to_string(),
                operator: FilterOperator::Eq,
            }),
            ..SearchCompanies::default()
        };
        let filters = company_filters(&args);
        assert_eq!(filters[1].operator, FilterOperator::Eq);
    }

    #[test]
    fn test_open_stage_expands_to_in_filter() {
        let filter = deal_stage_filter("open");
        assert_eq!(filter.operator, FilterOperator::In);
        let values = filter.values.unwrap_or_default();
        assert!(values.contains(&"qualifiedtobuy".to_string()));
        assert!(!values.contains(&"closedwon".to_string()));
    }

    #[test]
    fn test_closed_stage_expands_to_in_filter() {
        let filter = deal_stage_filter("Closed");
        assert_eq!(filter.operator, FilterOperator::In);
        assert_eq!(
            filter.values,
            Some(vec!["closedwon".to_string(), "closedlost".to_string()])
        );
    }

    #[test]
    fn test_named_stage_becomes_eq_on_canonical_token() {
        let filter = deal_stage_filter("Compelling Client Event");
        assert_eq!(filter.operator, FilterOperator::Eq);
        assert_eq!(filter.value.as_deref(), Some("qualifiedtobuy"));
    }

    #[test]
    fn test_operator_serialization() {
        let json = serde_json::to_string(&FilterOperator::ContainsToken).unwrap_or_default();
        assert_eq!(json, r#""CONTAINS_TOKEN""#);
    }

    #[test]
    fn test_search_body_shape() {
        let body = search_body(&[Filter::base()], None);
        assert_eq!(body["limit"], DEFAULT_LIMIT);
        assert_eq!(body["filterGroups"][0]["filters"][0]["propertyName"], "createdate");
        assert_eq!(body["filterGroups"][0]["filters"][0]["operator"], "GTE");
    }

    #[test]
    fn test_amount_range_filters() {
        let args = SearchDeals {
            min_amount: Some(100.0),
            max_amount: Some(500.0),
            ..SearchDeals::default()
        };
        let filters = deal_filters(&args);
        assert_eq!(filters[1].operator, FilterOperator::Gte);
        assert_eq!(filters[2].operator, FilterOperator::Lte);
        assert_eq!(filters[1].property_name, "amount");
    }
}
