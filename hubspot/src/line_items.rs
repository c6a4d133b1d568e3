//! Line-item retrieval and summary for the composite deal operation
//!
//! `getDealLineItems` is the one operation that reshapes a response instead of
//! passing it through. It is split into two independently testable steps:
//! [`search_request`] builds the inner line-item search, and [`summarize`]
//! projects the raw search response into a total, a count, and a fixed-column
//! table.

use crate::error::HubSpotError;
use crate::request::{BuiltRequest, HttpMethod};
use crate::search::{Filter, FilterOperator, search_body};
use serde_json::{Value, json};

/// Column order of the summary table
pub const TABLE_HEADERS: [&str; 5] = ["Name", "Quantity", "Price", "Amount", "SKU"];

/// Build the inner search request for a deal's line items
///
/// Non-digit characters are stripped from the caller-supplied deal id before
/// filtering.
///
/// # Errors
///
/// Returns `HubSpotError::Precondition` when nothing numeric remains of the
/// deal id.
pub fn search_request(deal_id: &str) -> Result<BuiltRequest, HubSpotError> {
    let digits: String = deal_id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(HubSpotError::Precondition(format!(
            "dealId must contain a numeric id, got {deal_id:?}"
        )));
    }

    let filters = vec![
        Filter::base(),
        Filter::value("associations.deal", FilterOperator::Eq, digits),
    ];
    Ok(BuiltRequest {
        path: "/crm/v3/objects/line_items/search".to_string(),
        method: HttpMethod::Post,
        query: Vec::new(),
        body: Some(search_body(&filters, None)),
    })
}

/// Project a raw line-item search response into the summary structure
///
/// The summary carries the amount total (missing or unparseable amounts count
/// as 0, total rounded to cents), the row count, and a table projection with
/// currency columns formatted to exactly two decimal places.
#[must_use]
pub fn summarize(search_response: &Value) -> Value {
    let results = search_response
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(results.len());
    let mut total = 0.0_f64;
    for item in results {
        let props = item.get("properties");
        let amount = number_property(props, "amount");
        total += amount;
        rows.push(json!([
            string_property(props, "name"),
            string_property(props, "quantity"),
            format!("{:.2}", number_property(props, "price")),
            format!("{amount:.2}"),
            string_property(props, "hs_sku"),
        ]));
    }

    json!({
        "totalAmount": round_cents(total),
        "count": rows.len(),
        "tableData": {
            "headers": TABLE_HEADERS,
            "rows": rows,
        },
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn number_property(props: Option<&Value>, key: &str) -> f64 {
    match props.and_then(|p| p.get(key)) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn string_property(props: Option<&Value>, key: &str) -> String {
    match props.and_then(|p| p.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_strips_non_digits() {
        let request = search_request("deal-4821").unwrap_or_else(|e| panic!("{e}"));
        let filters = &request.body.as_ref().map_or(Value::Null, |b| {
            b["filterGroups"][0]["filters"].clone()
        });
        assert_eq!(filters[1]["propertyName"], "associations.deal");
        assert_eq!(filters[1]["value"], "4821");
        assert_eq!(request.method, HttpMethod::Post);
    }

    #[test]
    fn test_search_request_rejects_non_numeric_id() {
        let result = search_request("no-digits-here");
        assert!(matches!(result, Err(HubSpotError::Precondition(_))));
    }

    #[test]
    fn test_summary_totals_and_table_shape() {
        let response = json!({
            "results": [
                {
                    "properties": {
                        "name": "Widget", "quantity": "2", "price": "99.99",
                        "amount": "199.98", "hs_sku": "WID-1"
                    }
                },
                {
                    "properties": {
                        "name": "Gadget", "quantity": "1", "price": "149.99",
                        "amount": "149.99", "hs_sku": "GAD-7"
                    }
                }
            ]
        });

        let summary = summarize(&response);
        assert_eq!(summary["totalAmount"], 349.97);
        assert_eq!(summary["count"], 2);
        assert_eq!(
            summary["tableData"]["headers"],
            json!(["Name", "Quantity", "Price", "Amount", "SKU"])
        );
        let rows = summary["tableData"]["rows"].as_array().map_or(0, Vec::len);
        assert_eq!(rows, 2);
        assert_eq!(summary["tableData"]["rows"][0][3], "199.98");
    }

    #[test]
    fn test_missing_amounts_count_as_zero() {
        let response = json!({
            "results": [
                { "properties": { "name": "Freebie" } },
                { "properties": { "name": "Broken", "amount": "n/a" } },
                { "properties": { "name": "Paid", "amount": 25 } }
            ]
        });

        let summary = summarize(&response);
        assert_eq!(summary["totalAmount"], 25.0);
        assert_eq!(summary["count"], 3);
        assert_eq!(summary["tableData"]["rows"][0][3], "0.00");
    }

    #[test]
    fn test_empty_response_summarizes_to_zero() {
        let summary = summarize(&json!({}));
        assert_eq!(summary["totalAmount"], 0.0);
        assert_eq!(summary["count"], 0);
    }
}
