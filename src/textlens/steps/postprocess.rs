// SPDX-License-Identifier: MIT

//! Post-processing of raw model completions
//!
//! All three functions are pure and idempotent: feeding their output back
//! in returns the same value.

/// Separator the extraction prompt asks the model to use
pub const ENTITY_SEPARATOR: &str = ", ";

/// Category label. Any string is accepted; the taxonomy is open.
pub fn parse_classification(raw: &str) -> String {
    raw.trim().to_string()
}

/// Split a comma-separated entity list.
///
/// A response without the separator (including "None") becomes a single
/// element, so callers must not read `len() == 1` as "one real entity".
pub fn split_entities(raw: &str) -> Vec<String> {
    raw.trim()
        .split(ENTITY_SEPARATOR)
        .map(str::to_string)
        .collect()
}

/// Markdown summary, kept opaque apart from trimming
pub fn clean_summary(raw: &str) -> String {
    raw.trim().to_string()
}
