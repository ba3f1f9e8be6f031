//! # Bookdex
//!
//! A search gateway for e-book metadata backed by an Elasticsearch-compatible
//! engine. Bookdex owns request shaping, document identity, result
//! normalization, and the error taxonomy; indexing, tokenization, and
//! ranking math stay in the engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────┐
//! │   CLI    │──▶│   Lifecycle /  │──▶│    Engine     │
//! │ (bookdex)│   │ Query Builder │   │ (ES dialect) │
//! └──────────┘   └──────┬────────┘   └──────┬───────┘
//! ┌──────────┐          │                   │
//! │   HTTP   │──────────┘        ┌──────────┘
//! │ (axum)   │                   ▼
//! └──────────┘            Result Normalizer
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! bookdex load dataset/books.jsonl     # bulk-load a producer file
//! bookdex search "gentleman" --limit 10
//! bookdex get a1b2c3d4e5f6
//! bookdex serve                        # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`model`] | Book schema, field weights, response shapes |
//! | [`identity`] | Deterministic title-derived document ids |
//! | [`engine`] | HTTP client for the external engine |
//! | [`query`] | Weighted multi-field query construction |
//! | [`normalize`] | Raw engine hits → stable response envelope |
//! | [`lifecycle`] | Upsert / fetch / delete orchestration |
//! | [`stats`] | Index and cluster diagnostics |
//! | [`load`] | Bulk NDJSON loader |
//! | [`server`] | HTTP API server |

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod load;
pub mod model;
pub mod normalize;
pub mod query;
pub mod search;
pub mod server;
pub mod stats;
