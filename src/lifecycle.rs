//! Document lifecycle: upsert, fetch-by-id, delete-by-id.
//!
//! Each operation is stateless and independent; the engine is the single
//! source of truth between calls. Upsert validates shape before any write
//! (the engine is schemaless and would store anything), derives the
//! document id from the title, and fully overwrites whatever is stored at
//! that id — last write wins, no merge semantics.

use anyhow::Result;
use serde::Serialize;

use crate::engine::EngineClient;
use crate::error::{self, GatewayError};
use crate::identity::book_id;
use crate::model::Book;

/// Confirmation returned by a successful upsert.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertReceipt {
    pub success: bool,
    pub message: String,
    pub book_id: String,
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReceipt {
    pub success: bool,
    pub message: String,
    pub result: String,
}

/// Validate and store a book, overwriting any document at its identifier.
pub async fn upsert_book(engine: &EngineClient, book: &Book) -> error::Result<UpsertReceipt> {
    if book.title.trim().is_empty() {
        return Err(GatewayError::validation("title must not be empty"));
    }

    let id = book_id(&book.title);
    engine.put_document(&id, book).await?;

    Ok(UpsertReceipt {
        success: true,
        message: format!("indexed '{}'", book.title),
        book_id: id,
    })
}

/// Fetch the full stored document. Not-found surfaces as
/// [`GatewayError::NotFound`], a normal reportable outcome.
pub async fn fetch_book(engine: &EngineClient, id: &str) -> error::Result<Book> {
    engine.get_document(id).await
}

/// Delete the document at `id`, returning the engine's result descriptor.
/// Deleting a nonexistent id is a not-found outcome, not a success.
pub async fn delete_book(engine: &EngineClient, id: &str) -> error::Result<DeleteReceipt> {
    let result = engine.delete_document(id).await?;
    Ok(DeleteReceipt {
        success: true,
        message: format!("deleted book {}", id),
        result,
    })
}

/// CLI entry point for `bookdex put <file>` — reads a book JSON file,
/// upserts it, and prints the receipt.
pub async fn run_put(engine: &EngineClient, path: &std::path::Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let book: Book = serde_json::from_str(&content)?;
    let receipt = upsert_book(engine, &book).await?;

    println!("indexed: {}", book.title);
    println!("  id: {}", receipt.book_id);
    Ok(())
}

/// CLI entry point for `bookdex get <id>`.
pub async fn run_get(engine: &EngineClient, id: &str) -> Result<()> {
    let book = match fetch_book(engine, id).await {
        Ok(book) => book,
        Err(GatewayError::NotFound(_)) => {
            eprintln!("No book found with id {}", id);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("--- Book {} ---", id);
    println!("title:          {}", book.title);
    if let Some(ref author) = book.author {
        println!("author:         {}", author);
    }
    println!("language:       {}", book.language);
    if let Some(year) = book.published_year {
        println!("published_year: {}", year);
    }
    if !book.genres.is_empty() {
        println!("genres:         {}", book.genres.join(", "));
    }
    if !book.tags.is_empty() {
        println!("tags:           {}", book.tags.join(", "));
    }
    if let Some(ref url) = book.file_url {
        println!("file_url:       {}", url);
    }
    if !book.synopsis.is_empty() {
        println!();
        println!("{}", book.synopsis);
    }
    Ok(())
}

/// CLI entry point for `bookdex delete <id>`.
pub async fn run_delete(engine: &EngineClient, id: &str) -> Result<()> {
    match delete_book(engine, id).await {
        Ok(receipt) => {
            println!("{} ({})", receipt.message, receipt.result);
            Ok(())
        }
        Err(GatewayError::NotFound(_)) => {
            eprintln!("No book found with id {}", id);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
