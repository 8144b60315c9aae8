//! Structural queries over a [`Graph`].
//!
//! All queries are pure and never fail on unknown ids: an id that is not in
//! the graph simply has no edges and reaches nothing. Edges whose endpoints
//! do not name an existing node are tolerated and left out of reachability
//! and ordering results.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::EngineError;
use crate::models::{Edge, Graph, Node};

impl Graph {
    /// Look up a node by id.
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// All edges whose target is `node_id`, in graph order.
    pub fn incoming_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.target == node_id).collect()
    }

    /// All edges whose source is `node_id`, in graph order.
    pub fn outgoing_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.source == node_id).collect()
    }

    /// Ids that appear as the target of at least one edge.
    pub fn target_set(&self) -> HashSet<&str> {
        self.edges.iter().map(|e| e.target.as_str()).collect()
    }

    /// Nodes with no incoming edge, in graph order.
    ///
    /// Driven purely by in-degree: node kind plays no part, and a node with
    /// no edges at all is an entry node.
    pub fn entry_nodes(&self) -> Vec<&Node> {
        let targets = self.target_set();
        self.nodes
            .iter()
            .filter(|n| !targets.contains(n.id.as_str()))
            .collect()
    }

    /// Ids reachable from `start` (inclusive) by following edges forward,
    /// in breadth-first discovery order. Empty if `start` is not a node.
    pub fn reachable_from(&self, start: &str) -> Vec<&str> {
        let Some(origin) = self.node(start) else {
            return Vec::new();
        };

        let adjacency = self.adjacency();
        let mut seen: HashSet<&str> = HashSet::from([origin.id.as_str()]);
        let mut order = vec![origin.id.as_str()];
        let mut queue = VecDeque::from([origin.id.as_str()]);

        while let Some(node_id) = queue.pop_front() {
            for &next in adjacency.get(node_id).into_iter().flatten() {
                if seen.insert(next) {
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }

        order
    }

    /// Nodes reachable from at least one entry node, in graph order.
    pub fn reachable_nodes(&self) -> Vec<&Node> {
        let reached: HashSet<&str> = self
            .entry_nodes()
            .iter()
            .flat_map(|entry| self.reachable_from(&entry.id))
            .collect();

        self.nodes
            .iter()
            .filter(|n| reached.contains(n.id.as_str()))
            .collect()
    }

    /// Nodes no entry node can reach (e.g. members of a cycle with no way in).
    pub fn unreachable_nodes(&self) -> Vec<&Node> {
        let reached: HashSet<&str> = self.reachable_nodes().iter().map(|n| n.id.as_str()).collect();
        self.nodes
            .iter()
            .filter(|n| !reached.contains(n.id.as_str()))
            .collect()
    }

    /// Node ids in a topological order (Kahn's algorithm).
    ///
    /// Ties are broken by graph node order, so the result is deterministic.
    /// Informational only: the simulator walks nodes in graph order.
    ///
    /// # Errors
    /// [`EngineError::CycleDetected`] if a cycle (a self-loop included)
    /// keeps some node from ever reaching in-degree zero.
    pub fn traversal_order(&self) -> Result<Vec<&str>, EngineError> {
        let adjacency = self.adjacency();

        let mut in_degree: HashMap<&str, usize> =
            self.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
        for targets in adjacency.values() {
            for target in targets {
                if let Some(deg) = in_degree.get_mut(target) {
                    *deg += 1;
                }
            }
        }

        // Seed with in-degree-zero nodes in graph order.
        let mut queue: VecDeque<&str> = self
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| in_degree[id] == 0)
            .collect();

        let mut sorted: Vec<&str> = Vec::with_capacity(self.nodes.len());
        let mut emitted: HashSet<&str> = HashSet::new();

        while let Some(node_id) = queue.pop_front() {
            if !emitted.insert(node_id) {
                continue;
            }
            sorted.push(node_id);

            for &neighbour in adjacency.get(node_id).into_iter().flatten() {
                if let Some(deg) = in_degree.get_mut(neighbour) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(neighbour);
                    }
                }
            }
        }

        // If we didn't visit every node the graph contains a cycle.
        if sorted.len() != in_degree.len() {
            return Err(EngineError::CycleDetected);
        }

        Ok(sorted)
    }

    /// Forward adjacency restricted to edges whose endpoints both exist.
    /// Duplicate edges stay duplicated.
    fn adjacency(&self) -> HashMap<&str, Vec<&str>> {
        let known: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();

        for edge in &self.edges {
            if known.contains(edge.source.as_str()) && known.contains(edge.target.as_str()) {
                adjacency
                    .entry(edge.source.as_str())
                    .or_default()
                    .push(edge.target.as_str());
            }
        }

        adjacency
    }
}
