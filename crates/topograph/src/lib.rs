//! Topograph - build, lay out and trace data-flow topologies
//!
//! A library that turns the tags, topics, topic filters and mappings of an
//! edge gateway into a directed graph, assigns the graph's nodes 2-D
//! coordinates with a force-directed simulation, and traces how data flows
//! through it from any node.
//!
//! # Quick Start
//!
//! ```rust
//! use topograph::prelude::*;
//!
//! let sources = TopologySources {
//!     tags: vec![Tag::new("temp-sensor")],
//!     northbound_mappings: vec![NorthboundMapping::new("temp-sensor", "factory/temp")],
//!     ..Default::default()
//! };
//!
//! // Build the graph
//! let graph = build_graph(&sources);
//! assert_eq!(graph.node_count(), 2);
//!
//! // Lay it out
//! let layout = ForceLayoutAlgorithm::new().layout(&graph).unwrap();
//! assert_eq!(layout.nodes.len(), 2);
//!
//! // Trace downstream from the tag
//! let result = TraceEngine::new(&graph)
//!     .trace("tag-temp-sensor", TraceDirection::Downstream)
//!     .unwrap();
//! assert_eq!(result.path.len(), 2);
//! ```
//!
//! The library performs no I/O. All operations are synchronous pure
//! functions of their inputs, so layouts and traces may run concurrently
//! against the same graph.

pub mod core;
pub mod topology;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;
pub use topology::{build_graph, layout, trace, LayoutResult, TopologyGraph, TraceResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, EdgeType, GraphEdge, GraphNode, LayoutAlgorithm, NodeType, Position,
        PositionedNode, TopologyError, TraceDirection,
    };
    pub use crate::topology::{
        build_graph, BridgeSubscription, Combiner, DataCombining, ForceLayoutAlgorithm,
        ForceLayoutConfig, LayoutResult, NorthboundMapping, SouthboundMapping, Tag,
        TopicFilter, TopologyBuilder, TopologyGraph, TopologySources, TraceEngine, TraceHop,
        TraceOptions, TraceResult,
    };
}

/// Build a graph from a JSON document of domain collections and lay it out
///
/// # Example
/// ```rust
/// let json = r#"{
///     "tags": [{ "name": "temp-sensor" }],
///     "northboundMappings": [{ "tagName": "temp-sensor", "topic": "factory/temp" }]
/// }"#;
/// let layout = topograph::layout_json(json).unwrap();
/// assert_eq!(layout.nodes.len(), 2);
/// ```
pub fn layout_json(input: &str) -> anyhow::Result<LayoutResult> {
    use crate::core::LayoutAlgorithm as _;

    let sources = topology::TopologySources::from_json(input)?;
    let graph = build_graph(&sources);
    topology::ForceLayoutAlgorithm::new().layout(&graph)
}
