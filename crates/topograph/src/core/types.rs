//! Core type definitions for topology processing
//!
//! This module contains the fundamental types used throughout topograph:
//! node kinds, relationship kinds, trace direction, and the node/edge data
//! structures shared by construction, layout and trace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::TopologyError;

/// Kinds of addressable entities in a topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    /// A device tag: `tag-<name>`
    Tag,
    /// A concrete MQTT topic: `topic-<topic>`
    Topic,
    /// An MQTT topic filter, possibly with wildcards: `filter-<filter>`
    TopicFilter,
}

impl NodeType {
    /// All node kinds, in construction order
    pub fn all() -> &'static [NodeType] {
        &[NodeType::Tag, NodeType::TopicFilter, NodeType::Topic]
    }

    /// The prefix used when deriving node ids for this kind
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeType::Tag => "tag",
            NodeType::Topic => "topic",
            NodeType::TopicFilter => "filter",
        }
    }

    /// Derive the node id for an entity of this kind
    ///
    /// ```
    /// use topograph::NodeType;
    ///
    /// assert_eq!(NodeType::Tag.node_id("temp-sensor"), "tag-temp-sensor");
    /// assert_eq!(NodeType::TopicFilter.node_id("factory/#"), "filter-factory/#");
    /// ```
    pub fn node_id(&self, name: &str) -> String {
        format!("{}-{}", self.id_prefix(), name)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Tag => write!(f, "tag"),
            NodeType::Topic => write!(f, "topic"),
            NodeType::TopicFilter => write!(f, "topic-filter"),
        }
    }
}

impl FromStr for NodeType {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tag" => Ok(NodeType::Tag),
            "topic" => Ok(NodeType::Topic),
            "topic-filter" | "topic_filter" | "filter" => Ok(NodeType::TopicFilter),
            _ => Err(TopologyError::invalid_node_type(s)),
        }
    }
}

/// Kinds of mapping relationships between entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeType {
    /// Tag published to a topic
    Northbound,
    /// Topic filter written back to a tag
    Southbound,
    /// Topic filter forwarded by a bridge into a topic
    Bridge,
    /// Source merged by a data combiner into a topic
    Combiner,
    /// Source merged by an asset mapper into a topic
    AssetMapper,
}

impl EdgeType {
    /// All relationship kinds, in construction order
    pub fn all() -> &'static [EdgeType] {
        &[
            EdgeType::Northbound,
            EdgeType::Southbound,
            EdgeType::Bridge,
            EdgeType::Combiner,
            EdgeType::AssetMapper,
        ]
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeType::Northbound => write!(f, "northbound"),
            EdgeType::Southbound => write!(f, "southbound"),
            EdgeType::Bridge => write!(f, "bridge"),
            EdgeType::Combiner => write!(f, "combiner"),
            EdgeType::AssetMapper => write!(f, "asset-mapper"),
        }
    }
}

/// Direction of a trace through the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    /// Follow edges backwards, towards the data sources
    Upstream,
    /// Follow edges forwards, towards the data consumers
    #[default]
    Downstream,
    /// Both of the above, spliced into one path
    Bidirectional,
}

impl TraceDirection {
    /// Returns true if this direction follows edges forwards
    pub fn includes_downstream(&self) -> bool {
        matches!(self, TraceDirection::Downstream | TraceDirection::Bidirectional)
    }
}

impl fmt::Display for TraceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceDirection::Upstream => write!(f, "upstream"),
            TraceDirection::Downstream => write!(f, "downstream"),
            TraceDirection::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

impl FromStr for TraceDirection {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upstream" | "up" => Ok(TraceDirection::Upstream),
            "downstream" | "down" => Ok(TraceDirection::Downstream),
            "bidirectional" | "both" => Ok(TraceDirection::Bidirectional),
            _ => Err(TopologyError::invalid_direction(s)),
        }
    }
}

/// A node in the topology graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier, derived from kind and name
    pub id: String,
    /// Kind of entity this node stands for
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Display name (tag name, topic or topic filter)
    pub label: String,
}

impl GraphNode {
    /// Create a node for an entity, deriving its id from kind and name
    pub fn new(node_type: NodeType, name: impl Into<String>) -> Self {
        let label = name.into();
        Self {
            id: node_type.node_id(&label),
            node_type,
            label,
        }
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.node_type)
    }
}

/// A directed relationship between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Edge id, assigned by the graph store when the edge is added
    #[serde(default)]
    pub id: String,
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Kind of relationship
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Display attributes (owning mapper, tag name, topic...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl GraphEdge {
    /// Create a new edge without metadata
    pub fn new(from: impl Into<String>, to: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            id: String::new(),
            from: from.into(),
            to: to.into(),
            edge_type,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata attribute
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the endpoint on the far side when walking in `direction`
    ///
    /// Only `Upstream` reverses the edge.
    pub fn far_end(&self, direction: TraceDirection) -> &str {
        if direction.includes_downstream() {
            &self.to
        } else {
            &self.from
        }
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.edge_type, self.to)
    }
}

/// 2-D coordinates assigned by a layout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A node together with its laid-out position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_are_kind_prefixed() {
        assert_eq!(GraphNode::new(NodeType::Tag, "temp").id, "tag-temp");
        assert_eq!(GraphNode::new(NodeType::Topic, "a/b").id, "topic-a/b");
        assert_eq!(
            GraphNode::new(NodeType::TopicFilter, "a/+").id,
            "filter-a/+"
        );
    }

    #[test]
    fn test_node_type_round_trip_through_display() {
        for kind in NodeType::all() {
            assert_eq!(kind.to_string().parse::<NodeType>().unwrap(), *kind);
        }
        assert!("device".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_trace_direction_parsing() {
        assert_eq!(
            "UPSTREAM".parse::<TraceDirection>().unwrap(),
            TraceDirection::Upstream
        );
        assert_eq!(
            "both".parse::<TraceDirection>().unwrap(),
            TraceDirection::Bidirectional
        );
        assert!("sideways".parse::<TraceDirection>().is_err());
    }

    #[test]
    fn test_trace_direction_coverage() {
        assert!(TraceDirection::Bidirectional.includes_downstream());
        assert!(TraceDirection::Downstream.includes_downstream());
        assert!(!TraceDirection::Upstream.includes_downstream());
    }

    #[test]
    fn test_far_end() {
        let edge = GraphEdge::new("tag-a", "topic-b", EdgeType::Northbound);
        assert_eq!(edge.far_end(TraceDirection::Downstream), "topic-b");
        assert_eq!(edge.far_end(TraceDirection::Upstream), "tag-a");
    }

    #[test]
    fn test_edge_serializes_with_kebab_type() {
        let edge = GraphEdge::new("tag-a", "topic-b", EdgeType::AssetMapper)
            .with_metadata("mapperId", "m1");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["type"], "asset-mapper");
        assert_eq!(json["metadata"]["mapperId"], "m1");
    }
}
