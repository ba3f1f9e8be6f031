//! Index statistics and cluster health overview.
//!
//! Aggregates two independent engine calls — document count and cluster
//! health — into a single diagnostic view. The aggregation never succeeds
//! partially: if either call fails, the whole report fails with a backend
//! error. Used by `bookdex stats` and `GET /stats`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::EngineClient;
use crate::error::{self, GatewayError};

/// Cluster health as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Green,
    Yellow,
    Red,
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterStatus::Green => write!(f, "green"),
            ClusterStatus::Yellow => write!(f, "yellow"),
            ClusterStatus::Red => write!(f, "red"),
        }
    }
}

/// Combined diagnostic view returned by [`report`].
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub index: String,
    pub document_count: u64,
    pub cluster_status: ClusterStatus,
    pub number_of_nodes: u64,
}

/// Gather document count and cluster health into one report.
pub async fn report(engine: &EngineClient) -> error::Result<StatsReport> {
    let document_count = engine.count().await?;
    let health = engine.cluster_health().await?;

    let cluster_status = parse_status(&health)?;
    let number_of_nodes = health
        .get("number_of_nodes")
        .and_then(Value::as_u64)
        .ok_or_else(|| GatewayError::backend("cluster health missing number_of_nodes"))?;

    Ok(StatsReport {
        index: engine.index().to_string(),
        document_count,
        cluster_status,
        number_of_nodes,
    })
}

fn parse_status(health: &Value) -> error::Result<ClusterStatus> {
    let status = health
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::backend("cluster health missing status"))?;

    match status {
        "green" => Ok(ClusterStatus::Green),
        "yellow" => Ok(ClusterStatus::Yellow),
        "red" => Ok(ClusterStatus::Red),
        other => Err(GatewayError::backend(format!(
            "unknown cluster status: {}",
            other
        ))),
    }
}

/// CLI entry point — print the stats report.
pub async fn run_stats(engine: &EngineClient) -> Result<()> {
    let report = report(engine).await?;

    println!("Bookdex — Index Stats");
    println!("=====================");
    println!();
    println!("  Index:      {}", report.index);
    println!("  Documents:  {}", report.document_count);
    println!("  Cluster:    {}", report.cluster_status);
    println!("  Nodes:      {}", report.number_of_nodes);
    println!();

    Ok(())
}
