//! HTTP client for the external search engine.
//!
//! Wraps the six engine primitives the gateway depends on: upsert-by-id,
//! get-by-id, delete-by-id, search, count, and cluster health, plus the
//! `_bulk` endpoint used by the loader. Speaks the Elasticsearch REST
//! dialect over JSON.
//!
//! One client is constructed at startup from `[engine]` config and shared
//! by every handler; it owns the connection pool, the per-call timeout, and
//! the credentials. Engine 404s on document routes become
//! [`GatewayError::NotFound`]; every other failure — connection errors,
//! non-success statuses, bodies we cannot interpret — becomes
//! [`GatewayError::Backend`] carrying the engine's message.

use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::error::{GatewayError, Result};
use crate::model::Book;

pub struct EngineClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
    auth: Option<(String, String)>,
}

impl EngineClient {
    /// Build a client from configuration. The timeout applies per call.
    pub fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        let auth = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            auth,
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, id)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some((user, pass)) => request.basic_auth(user, Some(pass.as_str())),
            None => request,
        }
    }

    /// Create or fully overwrite the document at `id`. Last write wins.
    pub async fn put_document(&self, id: &str, book: &Book) -> Result<()> {
        let response = self
            .with_auth(self.http.put(self.doc_url(id)).json(book))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_failure(status, response).await);
        }
        Ok(())
    }

    /// Fetch the full stored document at `id`.
    pub async fn get_document(&self, id: &str) -> Result<Book> {
        let response = self.with_auth(self.http.get(self.doc_url(id))).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::not_found(format!("book {}", id)));
        }
        if !status.is_success() {
            return Err(backend_failure(status, response).await);
        }

        let body: Value = response.json().await?;
        let source = body
            .get("_source")
            .cloned()
            .ok_or_else(|| GatewayError::backend("engine response missing _source"))?;
        Ok(serde_json::from_value(source)?)
    }

    /// Delete the document at `id`, returning the engine's result
    /// descriptor (`"deleted"` on success).
    pub async fn delete_document(&self, id: &str) -> Result<String> {
        let response = self
            .with_auth(self.http.delete(self.doc_url(id)))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::not_found(format!("book {}", id)));
        }
        if !status.is_success() {
            return Err(backend_failure(status, response).await);
        }

        let body: Value = response.json().await?;
        Ok(body
            .get("result")
            .and_then(Value::as_str)
            .unwrap_or("deleted")
            .to_string())
    }

    /// Run a search with a prebuilt query body, returning the raw engine
    /// response for the normalizer.
    pub async fn search(&self, query: &Value) -> Result<Value> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let response = self
            .with_auth(self.http.post(url).json(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_failure(status, response).await);
        }
        Ok(response.json().await?)
    }

    /// Total number of documents in the index.
    pub async fn count(&self) -> Result<u64> {
        let url = format!("{}/{}/_count", self.base_url, self.index);
        let response = self.with_auth(self.http.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_failure(status, response).await);
        }

        let body: Value = response.json().await?;
        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| GatewayError::backend("engine count response missing count"))
    }

    /// Cluster health document (`status`, `number_of_nodes`, ...).
    pub async fn cluster_health(&self) -> Result<Value> {
        let url = format!("{}/_cluster/health", self.base_url);
        let response = self.with_auth(self.http.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_failure(status, response).await);
        }
        Ok(response.json().await?)
    }

    /// Submit a batch of NDJSON action/document lines to `_bulk`.
    /// Returns the raw bulk response; the loader inspects per-item errors.
    pub async fn bulk(&self, ndjson: String) -> Result<Value> {
        let url = format!("{}/_bulk", self.base_url);
        let response = self
            .with_auth(
                self.http
                    .post(url)
                    .header("Content-Type", "application/x-ndjson")
                    .body(ndjson),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_failure(status, response).await);
        }
        Ok(response.json().await?)
    }
}

/// Turn a non-success engine response into a backend error, keeping the
/// engine's own message for diagnostics.
async fn backend_failure(status: StatusCode, response: reqwest::Response) -> GatewayError {
    let body = response.text().await.unwrap_or_default();
    GatewayError::backend(format!("engine returned {}: {}", status, body))
}
