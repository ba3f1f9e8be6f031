//! Search query construction.
//!
//! Translates a free-text term and a result limit into the engine's query
//! DSL: a weighted multi-field match over the fields in
//! [`model::SEARCH_FIELDS`](crate::model::SEARCH_FIELDS), highlighting on
//! title and synopsis, and a fixed `_source` projection so engine
//! bookkeeping fields never leak to callers.
//!
//! Single-page only: there is no offset or scroll support. The limit bound
//! protects the engine from unbounded result-set requests.

use serde_json::{json, Value};

use crate::error::{GatewayError, Result};
use crate::model::{HIGHLIGHT_FIELDS, SEARCH_FIELDS, SOURCE_PROJECTION};

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 50;

/// Default page size when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 5;

/// Build the engine query body for `term`, returning at most `limit` hits.
///
/// Fails with a validation error before any I/O if `term` is blank or
/// `limit` falls outside `1..=50`.
pub fn build(term: &str, limit: i64) -> Result<Value> {
    if term.trim().is_empty() {
        return Err(GatewayError::validation("search term must not be empty"));
    }

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(GatewayError::validation(format!(
            "limit must be between {} and {}, got {}",
            MIN_LIMIT, MAX_LIMIT, limit
        )));
    }

    let highlight_fields: Value = HIGHLIGHT_FIELDS
        .iter()
        .map(|field| (field.to_string(), json!({})))
        .collect::<serde_json::Map<String, Value>>()
        .into();

    Ok(json!({
        "size": limit,
        "query": {
            "multi_match": {
                "query": term,
                "fields": SEARCH_FIELDS,
            }
        },
        "highlight": {
            "fields": highlight_fields,
        },
        "_source": SOURCE_PROJECTION,
    }))
}
