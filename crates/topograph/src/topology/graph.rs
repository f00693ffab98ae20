//! Topology graph store
//!
//! Stores typed nodes and attributed, directed edges. Parallel edges and
//! cycles are allowed; an edge can only be added once both of its endpoints
//! exist.

use anyhow::Result;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

use crate::core::{Database, EdgeType, GraphEdge, GraphNode, NodeType, TopologyError};

/// Node and edge counts per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: BTreeMap<NodeType, usize>,
    pub edges_by_type: BTreeMap<EdgeType, usize>,
}

/// Serializable view of a graph: nodes and edges in insertion order
#[derive(Debug, Clone, Serialize)]
pub struct GraphDocument<'a> {
    pub nodes: Vec<&'a GraphNode>,
    pub edges: &'a [GraphEdge],
}

/// Topology graph implementation
///
/// Nodes are indexed by id and remembered in insertion order; edges are kept
/// in insertion order. Both orders are part of the deterministic output of
/// graph construction.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    /// Nodes indexed by ID
    nodes: HashMap<String, GraphNode>,
    /// Node IDs in insertion order (for deterministic iteration)
    node_order: Vec<String>,
    /// Edges in insertion order
    edges: Vec<GraphEdge>,
}

impl TopologyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Edges leaving a node, in insertion order
    pub fn outgoing(&self, node_id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.from == node_id).collect()
    }

    /// Edges entering a node, in insertion order
    pub fn incoming(&self, node_id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.to == node_id).collect()
    }

    /// Nodes of one kind, in insertion order
    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<&GraphNode> {
        self.nodes()
            .filter(|node| node.node_type == node_type)
            .collect()
    }

    /// The node set, without edges, for node pickers
    pub fn available_nodes(&self) -> Vec<&GraphNode> {
        self.nodes().collect()
    }

    /// Borrow all edges as a slice
    pub fn edge_slice(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Borrow the graph as a serializable document
    pub fn to_document(&self) -> GraphDocument<'_> {
        GraphDocument {
            nodes: self.available_nodes(),
            edges: &self.edges,
        }
    }

    /// Node and edge counts per kind
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            ..Default::default()
        };
        for node in self.nodes.values() {
            *stats.nodes_by_type.entry(node.node_type).or_insert(0) += 1;
        }
        for edge in &self.edges {
            *stats.edges_by_type.entry(edge.edge_type).or_insert(0) += 1;
        }
        stats
    }
}

impl Database for TopologyGraph {
    type Node = GraphNode;
    type Edge = GraphEdge;

    fn add_node(&mut self, node: GraphNode) -> Result<()> {
        if self.has_node(&node.id) {
            return Err(TopologyError::duplicate_node(&node.id).into());
        }
        trace!(node_id = %node.id, node_type = %node.node_type, "Adding node");
        self.node_order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Add an edge, assigning its id from type, endpoints and ordinal
    fn add_edge(&mut self, mut edge: GraphEdge) -> Result<()> {
        edge.id = format!(
            "{}:{}->{}#{}",
            edge.edge_type,
            edge.from,
            edge.to,
            self.edges.len()
        );
        for endpoint in [&edge.from, &edge.to] {
            if !self.has_node(endpoint) {
                return Err(TopologyError::dangling_edge(&edge.id, endpoint.as_str()).into());
            }
        }
        trace!(edge_id = %edge.id, "Adding edge");
        self.edges.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.node_order.clear();
        self.edges.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
