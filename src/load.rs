//! Bulk loading from the ingestion producer format.
//!
//! `bookdex load` consumes a newline-delimited file of action/document
//! pairs — an `{"index": {"_index": ..., "_id": ...}}` metadata line
//! followed by a book JSON line — and ships them to the engine's `_bulk`
//! endpoint in batches. This is the wire format the bibliographic fetch
//! script produces.
//!
//! Documents that do not parse as a valid book (or carry a blank title)
//! are counted and skipped, never sent: the engine is schemaless and
//! would happily store them. The target index is always the configured
//! one, regardless of what the metadata line names.

use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;

use crate::engine::EngineClient;
use crate::identity::book_id;
use crate::model::Book;

/// An action/document pair ready for the bulk endpoint.
#[derive(Debug, Clone)]
pub struct BulkEntry {
    pub id: String,
    pub book: Book,
}

/// Outcome of parsing a producer file.
#[derive(Debug, Default)]
pub struct ParseSummary {
    pub entries: Vec<BulkEntry>,
    pub skipped: u64,
}

/// Parse the producer format into bulk entries.
///
/// Pairs are consumed two lines at a time (blank lines ignored). A pair is
/// skipped when the metadata line is not an `index` action, the document
/// line is not a valid book, or the title is blank. When the metadata line
/// carries no `_id`, the identifier is derived from the title, matching
/// what an upsert through the API would assign.
pub fn parse_producer_file(content: &str) -> ParseSummary {
    let mut summary = ParseSummary::default();
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    while let Some(action_line) = lines.next() {
        let Some(doc_line) = lines.next() else {
            summary.skipped += 1;
            break;
        };

        let action: Option<Value> = serde_json::from_str(action_line).ok();
        let meta = action.as_ref().and_then(|a| a.get("index"));
        if meta.is_none() {
            summary.skipped += 1;
            continue;
        }

        let book: Book = match serde_json::from_str(doc_line) {
            Ok(book) => book,
            Err(_) => {
                summary.skipped += 1;
                continue;
            }
        };

        if book.title.trim().is_empty() {
            summary.skipped += 1;
            continue;
        }

        let id = meta
            .and_then(|m| m.get("_id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| book_id(&book.title));

        summary.entries.push(BulkEntry { id, book });
    }

    summary
}

/// Serialize a batch of entries as NDJSON for the `_bulk` endpoint.
fn render_batch(index: &str, batch: &[BulkEntry]) -> Result<String> {
    let mut body = String::new();
    for entry in batch {
        let action = serde_json::json!({"index": {"_index": index, "_id": entry.id}});
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&serde_json::to_string(&entry.book)?);
        body.push('\n');
    }
    Ok(body)
}

/// Count per-item failures in a bulk response.
fn count_failures(response: &Value) -> u64 {
    response
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| {
                    item.get("index")
                        .and_then(|i| i.get("status"))
                        .and_then(Value::as_u64)
                        .map(|status| status >= 300)
                        .unwrap_or(true)
                })
                .count() as u64
        })
        .unwrap_or(0)
}

/// CLI entry point for `bookdex load <file>`.
pub async fn run_load(engine: &EngineClient, path: &Path, batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        bail!("batch size must be > 0");
    }

    let content = std::fs::read_to_string(path)?;
    let summary = parse_producer_file(&content);

    let mut indexed = 0u64;
    let mut failed = 0u64;

    for batch in summary.entries.chunks(batch_size) {
        let body = render_batch(engine.index(), batch)?;
        let response = engine.bulk(body).await?;
        let batch_failed = count_failures(&response);
        failed += batch_failed;
        indexed += batch.len() as u64 - batch_failed;
        tracing::debug!(batch = batch.len(), failed = batch_failed, "bulk batch sent");
    }

    println!("load {}", path.display());
    println!("  parsed: {} entries", summary.entries.len());
    println!("  skipped: {}", summary.skipped);
    println!("  indexed: {}", indexed);
    println!("  failed: {}", failed);
    println!("ok");

    Ok(())
}
