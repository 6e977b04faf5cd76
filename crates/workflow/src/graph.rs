use std::collections::{HashMap, HashSet, VecDeque};

use nebula_core::NodeId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::definition::WorkflowDefinition;
use crate::error::WorkflowError;

/// The scheduling graph derived from a [`WorkflowDefinition`]: vertices are
/// every node minus attached TOOL/MEMORY nodes, edges are `connections`
/// restricted to the remaining vertices (§4.2.1 step 2).
///
/// Stores predecessors and successors both, so readiness checks (§4.2.2a)
/// never have to rescan the edge list.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<NodeId, String>,
    index_of: HashMap<NodeId, NodeIndex>,
}

impl DependencyGraph {
    /// Build the scheduling graph from a workflow, filtering attached nodes
    /// and validating structural invariants (§3.1, §4.2.1).
    pub fn from_definition(workflow: &WorkflowDefinition) -> Result<Self, WorkflowError> {
        workflow.validate_structure()?;

        let attached = workflow.attached_node_ids();
        let mut graph = DiGraph::new();
        let mut index_of = HashMap::new();

        for node in &workflow.nodes {
            if attached.contains(&node.id) {
                continue;
            }
            let idx = graph.add_node(node.id);
            index_of.insert(node.id, idx);
        }

        for conn in &workflow.connections {
            // Connections to/from attached nodes are already rejected by
            // `validate_structure`; anything left references real vertices.
            let from = index_of[&conn.from_node];
            let to = index_of[&conn.to_node];
            graph.add_edge(from, to, conn.output_key.clone());
        }

        let built = Self { graph, index_of };
        built.toposort_order().ok_or(WorkflowError::Cycle)?;
        Ok(built)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.index_of.contains_key(&node_id)
    }

    /// Direct predecessors of `node_id`, paired with the output port of the
    /// edge connecting them (used for readiness checks).
    #[must_use]
    pub fn predecessors(&self, node_id: NodeId) -> Vec<(NodeId, &str)> {
        let Some(&idx) = self.index_of.get(&node_id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .map(|e| (self.graph[e.source()], e.weight().as_str()))
            .collect()
    }

    /// Direct successors of `node_id`, paired with the output port that
    /// feeds each one.
    #[must_use]
    pub fn successors(&self, node_id: NodeId) -> Vec<(NodeId, &str)> {
        let Some(&idx) = self.index_of.get(&node_id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .map(|e| (self.graph[e.target()], e.weight().as_str()))
            .collect()
    }

    /// Nodes with no inbound edges — always ready, and the seed set for
    /// trigger-driven entry points (§4.2.1 step 3).
    #[must_use]
    pub fn entry_nodes(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, petgraph::Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx])
            .collect()
    }

    /// Nodes with no outbound edges.
    #[must_use]
    pub fn exit_nodes(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, petgraph::Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx])
            .collect()
    }

    /// Kahn's-algorithm topological order, used only to confirm acyclicity;
    /// `compute_levels` is what callers use to find same-level parallel work.
    fn toposort_order(&self) -> Option<Vec<NodeId>> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                (
                    idx,
                    self.graph.edges_directed(idx, petgraph::Direction::Incoming).count(),
                )
            })
            .collect();

        let mut queue: VecDeque<NodeIndex> =
            in_degree.iter().filter(|&(_, &d)| d == 0).map(|(&idx, _)| idx).collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(idx) = queue.pop_front() {
            order.push(self.graph[idx]);
            for edge in self.graph.edges_directed(idx, petgraph::Direction::Outgoing) {
                let target = edge.target();
                let degree = in_degree.get_mut(&target).expect("target tracked");
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(target);
                }
            }
        }

        (order.len() == self.graph.node_count()).then_some(order)
    }

    /// Group nodes into topological levels via Kahn's algorithm: each level
    /// is the set of nodes whose predecessors all belong to a previous
    /// level. Nodes within a level have no path between them and may be
    /// scheduled in any order (though the engine's own dispatch is
    /// sequential except for fan-out activations).
    #[must_use]
    pub fn compute_levels(&self) -> Vec<Vec<NodeId>> {
        let mut remaining: HashSet<NodeIndex> = self.graph.node_indices().collect();
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                (
                    idx,
                    self.graph.edges_directed(idx, petgraph::Direction::Incoming).count(),
                )
            })
            .collect();

        let mut levels = Vec::new();
        while !remaining.is_empty() {
            let ready: Vec<NodeIndex> = remaining
                .iter()
                .copied()
                .filter(|idx| in_degree[idx] == 0)
                .collect();
            // `from_definition` already rejects cycles, so `ready` can only
            // be empty here if the graph was mutated after construction,
            // which this type's API never allows.
            debug_assert!(!ready.is_empty(), "cycle slipped past construction-time check");

            for &idx in &ready {
                remaining.remove(&idx);
                for edge in self.graph.edges_directed(idx, petgraph::Direction::Outgoing) {
                    let target = edge.target();
                    if let Some(degree) = in_degree.get_mut(&target) {
                        *degree = degree.saturating_sub(1);
                    }
                }
            }

            levels.push(ready.into_iter().map(|idx| self.graph[idx]).collect());
        }

        levels
    }
}
