//! Workflow simulation engine.
//!
//! [`simulate`] performs a dry run over a graph snapshot:
//! 1. Re-checks that the graph has an entry point, collecting a run-level
//!    error if it does not (log generation carries on regardless).
//! 2. Walks the nodes in graph order (not edge order) and records a
//!    `Running` then a `Success` event for each.
//! 3. Returns the whole log at once; pacing its delivery is the player's job.
//!
//! Nothing is executed. Automation references are echoed into the log text
//! and never invoked.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::models::{Graph, Node};
use crate::validator::{missing_entry_point, ValidationProblem};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    Running,
    Success,
    /// Reserved: no node produces it today. Failures surface only in
    /// [`SimulationResult::errors`].
    Error,
}

/// One entry of a simulation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationEvent {
    pub timestamp: DateTime<Utc>,
    pub node_id: String,
    /// Label copied when the event was created; later edits to the node do
    /// not change it.
    pub node_name: String,
    pub status: SimulationStatus,
    pub message: String,
}

impl SimulationEvent {
    fn running(node: &Node) -> Self {
        Self::record(
            node,
            SimulationStatus::Running,
            format!("Executing {} node: {}", node.kind, node.display_label()),
        )
    }

    fn success(node: &Node) -> Self {
        let message = match node.automation_name() {
            Some(automation) => format!("✓ Completed {} ({automation})", node.display_label()),
            None => format!("✓ Completed {}", node.display_label()),
        };
        Self::record(node, SimulationStatus::Success, message)
    }

    fn record(node: &Node, status: SimulationStatus, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            node_id: node.id.clone(),
            node_name: node.display_label().to_owned(),
            status,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Ordered events of one run. Built once and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationLog {
    events: Vec<SimulationEvent>,
}

impl SimulationLog {
    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationEvent> {
        self.events.iter()
    }
}

impl From<Vec<SimulationEvent>> for SimulationLog {
    fn from(events: Vec<SimulationEvent>) -> Self {
        Self { events }
    }
}

impl IntoIterator for SimulationLog {
    type Item = SimulationEvent;
    type IntoIter = std::vec::IntoIter<SimulationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a SimulationLog {
    type Item = &'a SimulationEvent;
    type IntoIter = std::slice::Iter<'a, SimulationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub run_id: Uuid,
    /// `true` iff `errors` is empty.
    pub success: bool,
    pub log: SimulationLog,
    pub duration_millis: u64,
    /// Run-level errors, separate from the per-node log messages.
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

/// Simulate `graph` and return the complete log.
///
/// Callers are expected to have run [`validate`](crate::validate) first; the
/// entry-point check is repeated here and lands in `errors` without stopping
/// the log from being built.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn simulate(graph: &Graph) -> SimulationResult {
    let started = Instant::now();
    let run_id = Uuid::new_v4();
    let mut errors = Vec::new();

    if missing_entry_point(graph) {
        warn!(%run_id, "simulating a graph without an entry point");
        errors.push(ValidationProblem::NoEntryPoint.to_string());
    }

    let mut events = Vec::with_capacity(graph.node_count() * 2);
    for node in &graph.nodes {
        events.push(SimulationEvent::running(node));
        events.push(SimulationEvent::success(node));
        debug!(node_id = %node.id, "node simulated");
    }

    let duration_millis = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let success = errors.is_empty();

    info!(
        %run_id,
        events = events.len(),
        duration_millis,
        success,
        "simulation computed"
    );

    SimulationResult {
        run_id,
        success,
        log: SimulationLog::from(events),
        duration_millis,
        errors,
    }
}
