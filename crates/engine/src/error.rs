//! Engine-level error types.
//!
//! Structural problems with a workflow are *not* errors here: the validator
//! and the simulator report them as data. These variants cover misuse of the
//! graph store, graph queries that cannot produce an answer, and unreadable
//! workflow files.

use thiserror::Error;

use crate::models::NodeKind;

#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Store errors ------

    /// No node with this ID exists in the graph.
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    /// No edge with this ID exists in the graph.
    #[error("unknown edge '{0}'")]
    UnknownEdge(String),

    /// Automations can only be attached to `process` nodes.
    #[error("node '{node_id}' is a {kind} node; only process nodes run automations")]
    AutomationNotSupported {
        node_id: String,
        kind: NodeKind,
    },

    // ------ Query errors ------

    /// Topological sort could not order every node.
    #[error("workflow graph contains a cycle")]
    CycleDetected,

    // ------ Load errors ------

    /// The workflow JSON could not be parsed.
    #[error("invalid workflow definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),
}
