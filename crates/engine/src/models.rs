//! Core domain models for the workflow graph.
//!
//! These types are the in-memory shape of what the editor draws. They
//! serialise to and from the editor's JSON export (`{ nodes, edges, ... }`),
//! so a saved workflow file can be loaded straight into a [`Graph`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Label used in logs when a node has no (or an empty) `label`.
pub const UNNAMED_LABEL: &str = "Unnamed";

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The four node shapes the editor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Process,
    Decision,
    End,
}

impl NodeKind {
    /// Lowercase tag, as written in the `type` field and in log messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Process => "process",
            Self::Decision => "decision",
            Self::End => "end",
        }
    }

    /// Capitalised name, used as the default label of a freshly placed node.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Process => "Process",
            Self::Decision => "Decision",
            Self::End => "End",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start"    => Ok(Self::Start),
            "process"  => Ok(Self::Process),
            "decision" => Ok(Self::Decision),
            "end"      => Ok(Self::End),
            other      => Err(format!("unknown node kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Canvas coordinate. Presentation only; ignored by validation and simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The `data` object of a node.
///
/// Recognised fields are typed; anything else the editor stored is kept
/// verbatim in `extra` so a load/save cycle does not lose it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Only meaningful on `Process` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_id: Option<String>,
    /// Display name resolved from `automation_id` by the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NodeAttributes {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A typed vertex in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique within one graph (referenced by edges).
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    #[serde(rename = "data", default)]
    pub attributes: NodeAttributes,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            attributes: NodeAttributes::labelled(label),
        }
    }

    /// The label, or [`UNNAMED_LABEL`] when absent or empty.
    pub fn display_label(&self) -> &str {
        match self.attributes.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => UNNAMED_LABEL,
        }
    }

    /// The resolved automation name, if the node carries a non-empty one.
    pub fn automation_name(&self) -> Option<&str> {
        self.attributes
            .automation_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Directed edge from `source` to `target`.
///
/// Endpoints are not checked against the node list; duplicates and
/// self-loops are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Ordered nodes and edges. Node order is insertion order and carries no
/// execution meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Parse an editor export. Keys other than `nodes` / `edges` are ignored.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
