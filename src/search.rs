//! Search orchestration.
//!
//! Glue between the query builder, the engine, and the result normalizer.
//! Used by both the `bookdex search` CLI command and `GET /search`.

use anyhow::Result;

use crate::engine::EngineClient;
use crate::error;
use crate::model::SearchResponse;
use crate::normalize::normalize;
use crate::query;

/// Run a full-text search: build the weighted query, execute it, and
/// normalize the engine response.
pub async fn search_books(
    engine: &EngineClient,
    term: &str,
    limit: i64,
) -> error::Result<SearchResponse> {
    let body = query::build(term, limit)?;
    let raw = engine.search(&body).await?;
    normalize(&raw)
}

/// CLI entry point — runs the search and prints ranked results.
pub async fn run_search(engine: &EngineClient, term: &str, limit: Option<i64>) -> Result<()> {
    let limit = limit.unwrap_or(query::DEFAULT_LIMIT);
    let response = search_books(engine, term, limit).await?;

    if response.results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("{} matching books (showing {})", response.total, response.results.len());
    println!();

    for (i, hit) in response.results.iter().enumerate() {
        let title = hit
            .fields
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("(untitled)");
        let author = hit.fields.get("author").and_then(|v| v.as_str());

        match author {
            Some(author) => println!("{}. [{:.2}] {} — {}", i + 1, hit.score, title, author),
            None => println!("{}. [{:.2}] {}", i + 1, hit.score, title),
        }

        if let Some(ref highlight) = hit.highlight {
            for (field, snippets) in highlight {
                for snippet in snippets {
                    println!("    {}: \"{}\"", field, snippet.replace('\n', " ").trim());
                }
            }
        }
        println!("    id: {}", hit.id);
        println!();
    }

    Ok(())
}
