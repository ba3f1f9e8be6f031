//! Minimal in-memory engine speaking the Elasticsearch REST dialect.
//!
//! Implements just enough for the gateway: document CRUD, `_count`,
//! `_cluster/health`, `_bulk`, and a `_search` that honors multi-field
//! boosts, highlighting, `_source` projection, and `size` — so relevance
//! ordering assertions exercise the real query bodies the gateway builds.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type Store = Arc<Mutex<HashMap<String, Value>>>;

/// Start the mock engine on an ephemeral port. Returns its base URL and a
/// handle on the backing document map.
pub async fn start() -> (String, Store) {
    let store: Store = Arc::default();

    let app = Router::new()
        .route(
            "/{index}/_doc/{id}",
            put(put_doc).get(get_doc).delete(delete_doc),
        )
        .route("/{index}/_search", post(search_docs))
        .route("/{index}/_count", get(count_docs))
        .route("/_cluster/health", get(cluster_health))
        .route("/_bulk", post(bulk))
        .with_state(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), store)
}

async fn put_doc(
    State(store): State<Store>,
    Path((_index, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let previous = store.lock().unwrap().insert(id.clone(), body);
    let result = if previous.is_some() { "updated" } else { "created" };
    Json(json!({"_id": id, "result": result}))
}

async fn get_doc(
    State(store): State<Store>,
    Path((_index, id)): Path<(String, String)>,
) -> Response {
    match store.lock().unwrap().get(&id) {
        Some(doc) => Json(json!({"_id": id, "found": true, "_source": doc})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"_id": id, "found": false})),
        )
            .into_response(),
    }
}

async fn delete_doc(
    State(store): State<Store>,
    Path((_index, id)): Path<(String, String)>,
) -> Response {
    match store.lock().unwrap().remove(&id) {
        Some(_) => Json(json!({"_id": id, "result": "deleted"})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"_id": id, "result": "not_found"})),
        )
            .into_response(),
    }
}

async fn count_docs(State(store): State<Store>) -> Json<Value> {
    Json(json!({"count": store.lock().unwrap().len()}))
}

async fn cluster_health() -> Json<Value> {
    Json(json!({
        "cluster_name": "mock",
        "status": "green",
        "number_of_nodes": 1,
    }))
}

async fn bulk(State(store): State<Store>, body: String) -> Json<Value> {
    let mut items = Vec::new();
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());

    while let Some(action_line) = lines.next() {
        let action: Value = serde_json::from_str(action_line).unwrap_or(Value::Null);
        let id = action["index"]["_id"].as_str().map(str::to_string);
        let Some(doc_line) = lines.next() else { break };

        match (id, serde_json::from_str::<Value>(doc_line)) {
            (Some(id), Ok(doc)) => {
                store.lock().unwrap().insert(id.clone(), doc);
                items.push(json!({"index": {"_id": id, "status": 201}}));
            }
            _ => items.push(json!({"index": {"status": 400}})),
        }
    }

    Json(json!({"errors": false, "items": items}))
}

async fn search_docs(
    State(store): State<Store>,
    Path(_index): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let size = body["size"].as_u64().unwrap_or(10) as usize;
    let term = body["query"]["multi_match"]["query"]
        .as_str()
        .unwrap_or("")
        .to_lowercase();

    let fields: Vec<(String, f64)> = body["query"]["multi_match"]["fields"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(parse_boosted_field)
                .collect()
        })
        .unwrap_or_default();

    let highlight_fields: Vec<String> = body["highlight"]["fields"]
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();

    let projection: Vec<String> = body["_source"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut hits: Vec<(String, f64, Value)> = Vec::new();

    for (id, doc) in store.lock().unwrap().iter() {
        let score: f64 = fields
            .iter()
            .map(|(name, boost)| {
                let text = field_text(doc, name).to_lowercase();
                boost * text.matches(&term).count() as f64
            })
            .sum();
        if score <= 0.0 {
            continue;
        }

        let mut highlight = serde_json::Map::new();
        for field in &highlight_fields {
            if let Some(snippet) = highlight_snippet(&field_text(doc, field), &term) {
                highlight.insert(field.clone(), json!([snippet]));
            }
        }

        let mut source = serde_json::Map::new();
        for field in &projection {
            if let Some(value) = doc.get(field) {
                source.insert(field.clone(), value.clone());
            }
        }

        let mut hit = json!({
            "_index": "ebooks",
            "_id": id,
            "_score": score,
            "_source": source,
        });
        if !highlight.is_empty() {
            hit["highlight"] = Value::Object(highlight);
        }
        hits.push((id.clone(), score, hit));
    }

    hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then(a.0.cmp(&b.0)));
    let total = hits.len();
    hits.truncate(size);

    Json(json!({
        "took": 1,
        "hits": {
            "total": {"value": total, "relation": "eq"},
            "hits": hits.into_iter().map(|(_, _, hit)| hit).collect::<Vec<Value>>(),
        }
    }))
}

fn parse_boosted_field(spec: &str) -> (String, f64) {
    match spec.split_once('^') {
        Some((name, boost)) => (name.to_string(), boost.parse().unwrap_or(1.0)),
        None => (spec.to_string(), 1.0),
    }
}

fn field_text(doc: &Value, name: &str) -> String {
    match doc.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn highlight_snippet(text: &str, term: &str) -> Option<String> {
    let pos = text.to_lowercase().find(term)?;
    let end = pos + term.len();
    Some(format!(
        "{}<em>{}</em>{}",
        &text[..pos],
        &text[pos..end],
        &text[end..]
    ))
}
