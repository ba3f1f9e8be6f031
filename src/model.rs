//! Core data model for the gateway.
//!
//! Defines the canonical [`Book`] document, the search response shapes, and
//! the field weight table every query is built from. The engine itself is
//! schemaless, so this module is the only place document shape is enforced —
//! a write that bypasses these types would be stored without complaint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weighted fields for the multi-field match query, in `field^boost` form.
///
/// The relative weighting is a ranking contract: a title match counts three
/// times as much as a synopsis match, a tag match twice as much. Changing the
/// ratios changes result ordering for every caller.
pub const SEARCH_FIELDS: &[&str] = &["title^3", "tags^2", "synopsis"];

/// Fields the engine is asked to highlight.
pub const HIGHLIGHT_FIELDS: &[&str] = &["title", "synopsis"];

/// Fields returned in search hits. Everything else (tags, file_url, engine
/// bookkeeping) stays out of search responses; a fetch-by-id returns the
/// full stored document.
pub const SOURCE_PROJECTION: &[&str] = &[
    "title",
    "author",
    "published_year",
    "genres",
    "synopsis",
    "language",
];

/// A book record as stored in the engine.
///
/// `title` is the only required field. Every optional field has a concrete
/// default so that absence deserializes to the default, never to a null
/// marker in the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

/// A single search hit: the projected document fields plus engine metadata.
///
/// `highlight` is omitted from the serialized hit entirely when the engine
/// produced no highlights for it — callers must not see an empty placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: f64,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "_highlight", skip_serializing_if = "Option::is_none")]
    pub highlight: Option<BTreeMap<String, Vec<String>>>,
}

/// Search response envelope.
///
/// `total` is the engine-reported count of all matching documents,
/// independent of the requested page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub results: Vec<SearchHit>,
}
