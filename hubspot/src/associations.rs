//! Association-type resolution for typed CRM relationships
//!
//! Creating or deleting an association needs the remote service's association
//! token for the (fromType, toType) pair. Four pairs are known up front; any
//! other pair requires the caller to supply the token explicitly, and the call
//! fails before any network access otherwise.

use crate::error::HubSpotError;

/// Canonical association tokens for the known object-type pairs
const DEFAULT_ASSOCIATION_TYPES: &[((&str, &str), &str)] = &[
    (("contacts", "deals"), "contact_to_deal"),
    (("deals", "contacts"), "deal_to_contact"),
    (("contacts", "companies"), "contact_to_company"),
    (("companies", "contacts"), "company_to_contact"),
];

/// Resolve the association token for a (fromType, toType) pair
///
/// Known pairs always use the hard-coded token, even when the caller supplies
/// an override. Unknown pairs use the explicit token or fail.
///
/// # Errors
///
/// Returns `HubSpotError::Precondition` for an unknown pair with no explicit
/// token.
pub fn association_type(
    from_type: &str,
    to_type: &str,
    explicit: Option<&str>,
) -> Result<String, HubSpotError> {
    let from = from_type.trim().to_lowercase();
    let to = to_type.trim().to_lowercase();

    if let Some((_, token)) = DEFAULT_ASSOCIATION_TYPES
        .iter()
        .find(|((f, t), _)| *f == from && *t == to)
    {
        return Ok((*token).to_string());
    }

    match explicit {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(HubSpotError::Precondition(format!(
            "associationType is required for {from} -> {to} associations"
        ))),
    }
}
