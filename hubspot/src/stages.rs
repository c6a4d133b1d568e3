//! Canonicalization of human-readable deal stages and deal types
//!
//! The remote pipeline expects internal stage tokens (`closedwon`,
//! `qualifiedtobuy`, ...). Callers frequently hand us the display phrase
//! instead, so a fixed synonym table maps normalized phrases to tokens.
//! Unrecognized phrases are normalized (lower-cased, whitespace stripped) and
//! passed through unchanged rather than rejected.

/// Normalized human phrase → internal stage token
///
/// Keys are stored pre-normalized (lower-case, no whitespace).
const STAGE_SYNONYMS: &[(&str, &str)] = &[
    ("appointmentscheduled", "appointmentscheduled"),
    ("qualifiedtobuy", "qualifiedtobuy"),
    ("compellingclientevent", "qualifiedtobuy"),
    ("presentationscheduled", "presentationscheduled"),
    ("decisionmakerboughtin", "decisionmakerboughtin"),
    ("contractsent", "contractsent"),
    ("closedwon", "closedwon"),
    ("closedlost", "closedlost"),
];

/// Stage tokens covered by the `"open"` aggregate filter value
pub const OPEN_STAGES: &[&str] = &[
    "appointmentscheduled",
    "qualifiedtobuy",
    "presentationscheduled",
    "decisionmakerboughtin",
    "contractsent",
];

/// Stage tokens covered by the `"closed"` aggregate filter value
pub const CLOSED_STAGES: &[&str] = &["closedwon", "closedlost"];

/// Lower-case a value and strip all whitespace
#[must_use]
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a human-readable stage phrase to its internal stage token
///
/// Unknown phrases fall back to the normalized input so novel pipeline stages
/// still reach the API as-is.
#[must_use]
pub fn canonical_stage(value: &str) -> String {
    let normalized = normalize(value);
    STAGE_SYNONYMS
        .iter()
        .find(|(phrase, _)| *phrase == normalized)
        .map_or(normalized, |(_, token)| (*token).to_string())
}

/// Normalize a deal type value (same transform, no synonym table)
#[must_use]
pub fn normalize_deal_type(value: &str) -> String {
    normalize(value)
}
