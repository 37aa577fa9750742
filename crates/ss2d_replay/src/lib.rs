//! Replay library
//!
//! Loads recorded decision requests from disk and runs them through the
//! tactical core. A file holds either one request or an array of
//! consecutive cycles; for a sequence the agent memory is carried from
//! each cycle to the next.

use anyhow::{Context, Result};
use serde::Serialize;
use ss2d_core::api::{decide_request, DecisionRequest, DecisionResponse};
use ss2d_core::engine::reach::ActorId;
use std::fs;
use std::path::Path;

/// Parse a request file holding one request or an array of them.
pub fn load_requests(path: &Path) -> Result<Vec<DecisionRequest>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read request file: {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    let requests = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| serde_json::from_value(item).with_context(|| format!("Invalid request at index {}", i)))
            .collect::<Result<Vec<_>>>()?,
        other => vec![serde_json::from_value(other).context("Invalid request")?],
    };
    tracing::debug!(count = requests.len(), path = %path.display(), "requests loaded");
    Ok(requests)
}

/// Decide every request in order, threading the memory through.
pub fn replay(requests: &[DecisionRequest]) -> Result<Vec<DecisionResponse>> {
    let mut memory = None;
    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        let mut request = request.clone();
        if request.memory.is_none() {
            request.memory = memory.take();
        }
        let response = decide_request(&request)
            .with_context(|| format!("Decision failed at cycle {}", request.snapshot.cycle))?;
        memory = Some(response.memory.clone());
        responses.push(response);
    }
    Ok(responses)
}

/// One line of the reach report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachRow {
    pub actor: String,
    pub cycles: u32,
    pub unreachable: bool,
}

/// Reach cycles of every actor for the request's ball, fastest first.
pub fn reach_report(request: &DecisionRequest) -> Result<Vec<ReachRow>> {
    let table = request.intercept_table().context("Snapshot rejected")?;
    let mut rows: Vec<ReachRow> = table
        .entries()
        .iter()
        .map(|e| ReachRow {
            actor: actor_label(e.actor),
            cycles: e.min_cycles,
            unreachable: table.is_unreachable(e.min_cycles),
        })
        .collect();
    rows.sort_by_key(|r| r.cycles);
    Ok(rows)
}

fn actor_label(actor: ActorId) -> String {
    match actor {
        ActorId::SelfAgent => "self".to_string(),
        ActorId::Teammate(unum) => format!("teammate {}", unum),
        ActorId::Opponent(unum) => format!("opponent {}", unum),
    }
}
