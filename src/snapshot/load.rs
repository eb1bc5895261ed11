use std::fs;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::model::TopologySnapshot;

pub fn load_snapshot(path: &str) -> Result<TopologySnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read topology snapshot from {path}"))?;

    let snapshot = parse_snapshot(&raw)
        .with_context(|| format!("failed to parse topology snapshot from {path}"))?;

    tracing::info!(
        nodes = snapshot.node_count(),
        edges = snapshot.edge_count(),
        "loaded topology snapshot"
    );

    Ok(snapshot)
}

pub(super) fn parse_snapshot(raw: &str) -> Result<TopologySnapshot> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in topology snapshot")?;
    if !parsed.is_object() {
        return Err(anyhow!("unexpected JSON type for topology snapshot"));
    }

    // Scan API responses wrap the payload in a "topology" key; exported
    // snapshots are the bare object.
    let payload = match parsed.get("topology") {
        Some(inner) => inner,
        None => &parsed,
    };

    TopologySnapshot::deserialize(payload).context("unexpected topology snapshot shape")
}
