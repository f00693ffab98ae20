//! Core layout trait for graph positioning
//!
//! This trait defines the interface for assigning coordinates to the nodes
//! of a graph database.

use anyhow::Result;

use super::Database;

/// Core trait for layout algorithms
///
/// A layout algorithm reads a database and produces positioned output. It
/// never mutates the database, so several layouts (and traces) can run
/// against the same graph at once.
///
/// # Example
/// ```
/// use topograph::core::LayoutAlgorithm;
/// use topograph::topology::{ForceLayoutAlgorithm, TopologyGraph};
///
/// let graph = TopologyGraph::new();
/// let layout = ForceLayoutAlgorithm::new();
/// let positioned = layout.layout(&graph).unwrap();
/// assert!(positioned.nodes.is_empty());
/// ```
pub trait LayoutAlgorithm<D: Database>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange elements in the database using this layout algorithm
    fn layout(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GraphNode, NodeType};
    use crate::topology::{ForceLayoutAlgorithm, TopologyGraph};

    #[test]
    fn test_layout_algorithm_trait_exists() {
        let layout = ForceLayoutAlgorithm::new();
        assert_eq!(layout.name(), "force-directed");
        assert_eq!(layout.version(), "0.1.0");
    }

    #[test]
    fn test_basic_layout() {
        let layout = ForceLayoutAlgorithm::new();
        let mut database = TopologyGraph::new();

        database.add_node(GraphNode::new(NodeType::Tag, "a")).unwrap();
        database.add_node(GraphNode::new(NodeType::Topic, "b")).unwrap();

        let output = layout.layout(&database).unwrap();
        assert_eq!(output.nodes.len(), 2);
    }
}
