//! Workflow validation: run this before every simulation attempt.
//!
//! Checks, in this order, each adding at most one problem:
//! 1. The graph has at least one node.
//! 2. A graph of two or more nodes has at least one edge.
//! 3. At least one node has no incoming edge.
//!
//! Every check runs regardless of earlier failures. An empty report means
//! the graph may be simulated.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::Graph;

/// One structural problem. `Display` yields the exact text shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationProblem {
    #[error("Workflow is empty. Add some nodes first.")]
    EmptyWorkflow,

    #[error("Nodes are not connected. Connect them with edges.")]
    Disconnected,

    #[error("No start node found. Ensure at least one node has no incoming connections.")]
    NoEntryPoint,
}

/// Ordered list of problems found in one graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    problems: Vec<ValidationProblem>,
}

impl ValidationReport {
    /// `true` when nothing blocks simulation.
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn problems(&self) -> &[ValidationProblem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Problems rendered as user-facing strings, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }
}

/// True when some node exists and every node has an incoming edge.
pub(crate) fn missing_entry_point(graph: &Graph) -> bool {
    !graph.is_empty() && graph.entry_nodes().is_empty()
}

/// Run the full battery of structural checks against `graph`.
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn validate(graph: &Graph) -> ValidationReport {
    let mut problems = Vec::new();

    if graph.is_empty() {
        problems.push(ValidationProblem::EmptyWorkflow);
    }

    if graph.edge_count() == 0 && graph.node_count() > 1 {
        problems.push(ValidationProblem::Disconnected);
    }

    if missing_entry_point(graph) {
        problems.push(ValidationProblem::NoEntryPoint);
    }

    debug!(problems = problems.len(), "validation finished");
    ValidationReport { problems }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node, NodeKind};

    fn process(id: &str) -> Node {
        Node::new(id, NodeKind::Process, id)
    }

    #[test]
    fn empty_graph_reports_only_emptiness() {
        let report = validate(&Graph::default());
        assert_eq!(report.problems(), &[ValidationProblem::EmptyWorkflow]);
        assert_eq!(report.messages(), vec!["Workflow is empty. Add some nodes first."]);
    }

    #[test]
    fn single_isolated_node_is_clean() {
        let report = validate(&Graph::new(vec![process("solo")], vec![]));
        assert!(report.is_clean());
    }

    #[test]
    fn unconnected_nodes_only_report_disconnection() {
        // With no edges every node is an entry node, so check 3 stays quiet.
        let graph = Graph::new(vec![process("a"), process("b"), process("c")], vec![]);
        let report = validate(&graph);
        assert_eq!(report.problems(), &[ValidationProblem::Disconnected]);
    }

    #[test]
    fn every_node_targeted_reports_missing_entry() {
        let graph = Graph::new(
            vec![process("a"), process("b")],
            vec![Edge::new("e1", "a", "b"), Edge::new("e2", "b", "a")],
        );
        let report = validate(&graph);
        assert_eq!(report.problems(), &[ValidationProblem::NoEntryPoint]);
        assert_eq!(
            report.messages(),
            vec!["No start node found. Ensure at least one node has no incoming connections."]
        );
    }

    #[test]
    fn self_loop_on_only_node_reports_missing_entry() {
        let graph = Graph::new(vec![process("a")], vec![Edge::new("e1", "a", "a")]);
        assert_eq!(validate(&graph).problems(), &[ValidationProblem::NoEntryPoint]);
    }

    #[test]
    fn start_kind_is_not_required() {
        let graph = Graph::new(
            vec![process("a"), process("b")],
            vec![Edge::new("e1", "a", "b")],
        );
        assert!(validate(&graph).is_clean());
    }

    #[test]
    fn self_loops_and_duplicate_edges_are_permitted() {
        let graph = Graph::new(
            vec![process("a"), process("b")],
            vec![
                Edge::new("e1", "a", "b"),
                Edge::new("e2", "a", "b"),
                Edge::new("e3", "b", "b"),
            ],
        );
        assert!(validate(&graph).is_clean());
    }
}
