//! Engine response normalization.
//!
//! Maps the raw engine search response into the stable
//! [`SearchResponse`](crate::model::SearchResponse) shape. Document fields
//! come through verbatim from the projected `_source`; the only engine
//! metadata kept per hit is its id, score, and any highlights. The
//! engine-reported total is preserved exactly, never recomputed from the
//! returned page.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{GatewayError, Result};
use crate::model::{SearchHit, SearchResponse};

/// Normalize a raw engine search response.
///
/// A response without the expected `hits` structure is a backend error —
/// the engine is answering, but not in the dialect we speak.
pub fn normalize(raw: &Value) -> Result<SearchResponse> {
    let hits = raw
        .get("hits")
        .ok_or_else(|| GatewayError::backend("engine response missing hits"))?;

    let total = parse_total(hits)?;

    let raw_hits = hits
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::backend("engine response missing hits array"))?;

    let results = raw_hits
        .iter()
        .map(normalize_hit)
        .collect::<Result<Vec<SearchHit>>>()?;

    Ok(SearchResponse { total, results })
}

/// Total match count. Modern engines report `{"value": n, "relation": ..}`,
/// older ones a bare number; both are accepted.
fn parse_total(hits: &Value) -> Result<u64> {
    let total = hits
        .get("total")
        .ok_or_else(|| GatewayError::backend("engine response missing total"))?;

    match total {
        Value::Number(n) => n.as_u64(),
        Value::Object(obj) => obj.get("value").and_then(Value::as_u64),
        _ => None,
    }
    .ok_or_else(|| GatewayError::backend("engine response has malformed total"))
}

fn normalize_hit(raw: &Value) -> Result<SearchHit> {
    let id = raw
        .get("_id")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::backend("engine hit missing _id"))?
        .to_string();

    let score = raw.get("_score").and_then(Value::as_f64).unwrap_or(0.0);

    let fields = match raw.get("_source") {
        Some(Value::Object(map)) => map.clone(),
        _ => serde_json::Map::new(),
    };

    // Highlights are attached only when the engine produced snippets for
    // this hit; a hit without them carries no placeholder key.
    let highlight = raw
        .get("highlight")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(field, snippets)| {
                    let snippets = snippets
                        .as_array()
                        .map(|arr| {
                            arr.iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default();
                    (field.clone(), snippets)
                })
                .collect::<BTreeMap<String, Vec<String>>>()
        })
        .filter(|map| !map.is_empty());

    Ok(SearchHit {
        id,
        score,
        fields,
        highlight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine_response() -> Value {
        json!({
            "took": 3,
            "timed_out": false,
            "_shards": {"total": 1, "successful": 1},
            "hits": {
                "total": {"value": 42, "relation": "eq"},
                "max_score": 7.2,
                "hits": [
                    {
                        "_index": "ebooks",
                        "_id": "a1b2c3d4e5f6",
                        "_score": 7.2,
                        "_source": {"title": "1984", "author": "George Orwell"},
                        "highlight": {"title": ["<em>1984</em>"]}
                    },
                    {
                        "_index": "ebooks",
                        "_id": "0f0f0f0f0f0f",
                        "_score": 1.1,
                        "_source": {"title": "Animal Farm"}
                    }
                ]
            }
        })
    }

    #[test]
    fn test_total_preserved_not_page_size() {
        let response = normalize(&engine_response()).unwrap();
        assert_eq!(response.total, 42);
        assert_eq!(response.results.len(), 2);
    }

    #[test]
    fn test_hit_carries_id_score_and_source_verbatim() {
        let response = normalize(&engine_response()).unwrap();
        let hit = &response.results[0];
        assert_eq!(hit.id, "a1b2c3d4e5f6");
        assert!((hit.score - 7.2).abs() < 1e-9);
        assert_eq!(hit.fields["title"], "1984");
        assert_eq!(hit.fields["author"], "George Orwell");
    }

    #[test]
    fn test_engine_bookkeeping_stripped() {
        let response = normalize(&engine_response()).unwrap();
        let serialized = serde_json::to_value(&response.results[0]).unwrap();
        assert!(serialized.get("_index").is_none());
        assert!(serialized.get("_shards").is_none());
    }

    #[test]
    fn test_highlight_only_when_present() {
        let response = normalize(&engine_response()).unwrap();
        let highlighted = response.results[0].highlight.as_ref().unwrap();
        assert_eq!(highlighted["title"], vec!["<em>1984</em>"]);
        assert!(response.results[1].highlight.is_none());

        let serialized = serde_json::to_value(&response.results[1]).unwrap();
        assert!(serialized.get("_highlight").is_none());
    }

    #[test]
    fn test_bare_numeric_total_accepted() {
        let raw = json!({"hits": {"total": 7, "hits": []}});
        assert_eq!(normalize(&raw).unwrap().total, 7);
    }

    #[test]
    fn test_malformed_response_is_backend_error() {
        for raw in [
            json!({}),
            json!({"hits": {"hits": []}}),
            json!({"hits": {"total": 1}}),
            json!({"hits": {"total": 1, "hits": [{"_score": 2.0}]}}),
        ] {
            assert!(matches!(
                normalize(&raw),
                Err(GatewayError::Backend(_))
            ));
        }
    }
}
