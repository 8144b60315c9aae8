//! `GraphStore`: the owned, mutable graph behind the editing surface.
//!
//! Mutations are never validated: the editor may hold any shape of graph,
//! including dangling edges, self-loops and duplicates. The simulation core
//! only ever sees an immutable [`snapshot`](GraphStore::snapshot).

use tracing::debug;

use automations::Automation;

use crate::EngineError;
use crate::models::{Edge, Graph, Node, NodeAttributes, NodeKind, Position};

/// Monotonic id source producing `<prefix>_1`, `<prefix>_2`, …
///
/// Ids are never reused, even after the element they named is deleted.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: &'static str,
    next: u64,
}

impl IdGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: Graph,
    node_ids: IdGenerator,
    edge_ids: IdGenerator,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            graph: Graph::default(),
            node_ids: IdGenerator::new("node"),
            edge_ids: IdGenerator::new("edge"),
        }
    }

    /// Read access to the live graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Independent copy to hand to the validator / simulator.
    pub fn snapshot(&self) -> Graph {
        self.graph.clone()
    }

    /// Place a new node. Its label defaults to the kind's display name.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> &Node {
        let id = self.node_ids.next_id();
        debug!(node_id = %id, %kind, "node added");

        self.graph.nodes.push(Node {
            id,
            kind,
            position,
            attributes: NodeAttributes::labelled(kind.display_name()),
        });
        &self.graph.nodes[self.graph.nodes.len() - 1]
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<(), EngineError> {
        self.node_mut(node_id)?.position = position;
        Ok(())
    }

    /// Replace a node's attributes wholesale, as the property form does.
    pub fn update_attributes(
        &mut self,
        node_id: &str,
        attributes: NodeAttributes,
    ) -> Result<(), EngineError> {
        self.node_mut(node_id)?.attributes = attributes;
        Ok(())
    }

    /// Attach an already-resolved automation to a process node.
    pub fn assign_automation(
        &mut self,
        node_id: &str,
        automation: &Automation,
    ) -> Result<(), EngineError> {
        let node = self.node_mut(node_id)?;
        if node.kind != NodeKind::Process {
            return Err(EngineError::AutomationNotSupported {
                node_id: node_id.to_owned(),
                kind: node.kind,
            });
        }

        node.attributes.automation_id = Some(automation.id.clone());
        node.attributes.automation_name = Some(automation.name.clone());
        debug!(node_id, automation_id = %automation.id, "automation assigned");
        Ok(())
    }

    pub fn clear_automation(&mut self, node_id: &str) -> Result<(), EngineError> {
        let node = self.node_mut(node_id)?;
        node.attributes.automation_id = None;
        node.attributes.automation_name = None;
        Ok(())
    }

    /// Delete a node together with every edge touching it.
    pub fn remove_node(&mut self, node_id: &str) -> Result<Node, EngineError> {
        let index = self
            .graph
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| EngineError::UnknownNode(node_id.to_owned()))?;

        let removed = self.graph.nodes.remove(index);
        self.graph
            .edges
            .retain(|e| e.source != node_id && e.target != node_id);

        debug!(node_id, "node removed");
        Ok(removed)
    }

    /// Add a directed edge. Endpoints are not checked.
    pub fn connect(&mut self, source: &str, target: &str) -> &Edge {
        let id = self.edge_ids.next_id();
        debug!(edge_id = %id, source, target, "edge added");

        self.graph.edges.push(Edge::new(id, source, target));
        &self.graph.edges[self.graph.edges.len() - 1]
    }

    pub fn disconnect(&mut self, edge_id: &str) -> Result<Edge, EngineError> {
        let index = self
            .graph
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or_else(|| EngineError::UnknownEdge(edge_id.to_owned()))?;
        Ok(self.graph.edges.remove(index))
    }

    fn node_mut(&mut self, node_id: &str) -> Result<&mut Node, EngineError> {
        self.graph
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| EngineError::UnknownNode(node_id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn welcome_email() -> Automation {
        Automation::new("auto_1", "Send Welcome Email", "Welcome new hires", "Onboarding")
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut store = GraphStore::new();
        let first = store.add_node(NodeKind::Start, Position::default()).id.clone();
        store.remove_node(&first).unwrap();
        let second = store.add_node(NodeKind::End, Position::default()).id.clone();

        assert_eq!(first, "node_1");
        assert_eq!(second, "node_2");
    }

    #[test]
    fn new_node_is_labelled_after_its_kind() {
        let mut store = GraphStore::new();
        let node = store.add_node(NodeKind::Decision, Position::new(10.0, 20.0));
        assert_eq!(node.display_label(), "Decision");
        assert_eq!(node.attributes.priority, crate::models::Priority::Medium);
    }

    #[test]
    fn removing_a_node_drops_its_edges() {
        let mut store = GraphStore::new();
        let a = store.add_node(NodeKind::Start, Position::default()).id.clone();
        let b = store.add_node(NodeKind::Process, Position::default()).id.clone();
        let c = store.add_node(NodeKind::End, Position::default()).id.clone();
        store.connect(&a, &b);
        store.connect(&b, &c);
        store.connect(&a, &c);

        store.remove_node(&b).unwrap();

        let graph = store.graph();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].source, a);
        assert_eq!(graph.edges[0].target, c);
    }

    #[test]
    fn connect_allows_duplicates_self_loops_and_dangling_targets() {
        let mut store = GraphStore::new();
        let a = store.add_node(NodeKind::Process, Position::default()).id.clone();
        store.connect(&a, &a);
        store.connect(&a, "ghost");
        store.connect(&a, "ghost");

        let ids: Vec<&str> = store.graph().edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["edge_1", "edge_2", "edge_3"]);
    }

    #[test]
    fn disconnect_unknown_edge_fails() {
        let mut store = GraphStore::new();
        assert!(matches!(
            store.disconnect("edge_9"),
            Err(EngineError::UnknownEdge(id)) if id == "edge_9"
        ));
    }

    #[test]
    fn automation_only_attaches_to_process_nodes() {
        let mut store = GraphStore::new();
        let start = store.add_node(NodeKind::Start, Position::default()).id.clone();
        let step = store.add_node(NodeKind::Process, Position::default()).id.clone();

        assert!(matches!(
            store.assign_automation(&start, &welcome_email()),
            Err(EngineError::AutomationNotSupported { kind: NodeKind::Start, .. })
        ));

        store.assign_automation(&step, &welcome_email()).unwrap();
        let node = store.graph().node(&step).unwrap();
        assert_eq!(node.attributes.automation_id.as_deref(), Some("auto_1"));
        assert_eq!(node.automation_name(), Some("Send Welcome Email"));

        store.clear_automation(&step).unwrap();
        assert_eq!(store.graph().node(&step).unwrap().automation_name(), None);
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut store = GraphStore::new();
        let a = store.add_node(NodeKind::Start, Position::default()).id.clone();
        let snapshot = store.snapshot();

        store
            .update_attributes(&a, NodeAttributes::labelled("Renamed"))
            .unwrap();
        store.move_node(&a, Position::new(5.0, 5.0)).unwrap();

        assert_eq!(snapshot.nodes[0].display_label(), "Start");
        assert_eq!(store.graph().nodes[0].display_label(), "Renamed");
    }

    #[test]
    fn editing_unknown_node_fails() {
        let mut store = GraphStore::new();
        assert!(matches!(
            store.move_node("node_7", Position::default()),
            Err(EngineError::UnknownNode(_))
        ));
        assert!(store.remove_node("node_7").is_err());
    }
}
