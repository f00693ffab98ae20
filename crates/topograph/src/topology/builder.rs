//! Graph construction from domain collections
//!
//! Builds nodes first (tags, topic filters, then the union of all topics
//! any mapping writes to) and edges second. Edges whose endpoints did not
//! become nodes are dropped: the collections are fetched independently and
//! may briefly disagree.

use std::collections::HashSet;
use tracing::{debug, info, span, trace, Level};

use super::sources::{Combiner, TopologySources};
use super::TopologyGraph;
use crate::core::{Database, EdgeType, GraphEdge, GraphNode, NodeType};

/// Builds a [`TopologyGraph`] from [`TopologySources`]
///
/// Construction is a pure function of its input: the same sources always
/// produce the same node ids and the same edges in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologyBuilder;

impl TopologyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the graph
    pub fn build(&self, sources: &TopologySources) -> TopologyGraph {
        let build_span = span!(Level::INFO, "build_graph");
        let _enter = build_span.enter();

        let mut graph = TopologyGraph::new();

        for tag in &sources.tags {
            add_unique(&mut graph, GraphNode::new(NodeType::Tag, &tag.name));
        }
        for filter in &sources.topic_filters {
            add_unique(
                &mut graph,
                GraphNode::new(NodeType::TopicFilter, &filter.topic_filter),
            );
        }
        for topic in collect_topics(sources) {
            add_unique(&mut graph, GraphNode::new(NodeType::Topic, topic));
        }
        debug!(node_count = graph.node_count(), "Created nodes");

        let mut skipped = 0usize;
        let mut connect = |graph: &mut TopologyGraph, edge: GraphEdge| {
            if let Err(e) = graph.add_edge(edge) {
                // Upstream data not settled yet; not an error for callers.
                trace!(error = %e, "Skipping edge");
                skipped += 1;
            }
        };

        for mapping in &sources.northbound_mappings {
            let edge = GraphEdge::new(
                NodeType::Tag.node_id(&mapping.tag_name),
                NodeType::Topic.node_id(&mapping.topic),
                EdgeType::Northbound,
            )
            .with_metadata("tagName", &mapping.tag_name)
            .with_metadata("topic", &mapping.topic);
            connect(&mut graph, edge);
        }

        for mapping in &sources.southbound_mappings {
            let edge = GraphEdge::new(
                NodeType::TopicFilter.node_id(&mapping.topic_filter),
                NodeType::Tag.node_id(&mapping.tag_name),
                EdgeType::Southbound,
            )
            .with_metadata("topicFilter", &mapping.topic_filter)
            .with_metadata("tagName", &mapping.tag_name);
            connect(&mut graph, edge);
        }

        for subscription in &sources.bridge_subscriptions {
            let Some(topic) = subscription.destination_topic() else {
                trace!(bridge_id = %subscription.bridge_id, "Bridge subscription has no destination");
                continue;
            };
            for filter in &subscription.filters {
                let edge = GraphEdge::new(
                    NodeType::TopicFilter.node_id(filter),
                    NodeType::Topic.node_id(topic),
                    EdgeType::Bridge,
                )
                .with_metadata("bridgeId", &subscription.bridge_id)
                .with_metadata("topicFilter", filter)
                .with_metadata("topic", topic);
                connect(&mut graph, edge);
            }
        }

        for (mappers, edge_type) in [
            (&sources.combiners, EdgeType::Combiner),
            (&sources.asset_mappers, EdgeType::AssetMapper),
        ] {
            for mapper in mappers {
                for edge in combining_edges(mapper, edge_type) {
                    connect(&mut graph, edge);
                }
            }
        }

        if skipped > 0 {
            debug!(skipped, "Dropped edges referencing unknown nodes");
        }
        info!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            "Graph built"
        );
        graph
    }
}

/// Build a topology graph from domain collections
///
/// # Example
/// ```
/// use topograph::build_graph;
/// use topograph::topology::{NorthboundMapping, Tag, TopologySources};
/// use topograph::prelude::Database;
///
/// let sources = TopologySources {
///     tags: vec![Tag::new("temp-sensor")],
///     northbound_mappings: vec![NorthboundMapping::new("temp-sensor", "factory/temp")],
///     ..Default::default()
/// };
/// let graph = build_graph(&sources);
/// assert!(graph.has_node("tag-temp-sensor"));
/// assert!(graph.has_node("topic-factory/temp"));
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub fn build_graph(sources: &TopologySources) -> TopologyGraph {
    TopologyBuilder::new().build(sources)
}

fn add_unique(graph: &mut TopologyGraph, node: GraphNode) {
    if graph.has_node(&node.id) {
        trace!(node_id = %node.id, "Node already present");
        return;
    }
    // Presence was checked above, so the store cannot reject it.
    let _ = graph.add_node(node);
}

/// Distinct topics in first-seen order: northbound destinations, bridge
/// destinations, then combiner and asset-mapper destinations
fn collect_topics(sources: &TopologySources) -> Vec<&str> {
    let northbound = sources
        .northbound_mappings
        .iter()
        .map(|m| m.topic.as_str())
        .filter(|t| !t.is_empty());
    let bridged = sources
        .bridge_subscriptions
        .iter()
        .filter_map(|s| s.destination_topic());
    let combined = sources
        .combiners
        .iter()
        .chain(&sources.asset_mappers)
        .flat_map(|c| c.mappings.iter())
        .filter_map(|m| m.destination_topic());

    let mut seen = HashSet::new();
    northbound
        .chain(bridged)
        .chain(combined)
        .filter(|topic| seen.insert(*topic))
        .collect()
}

fn combining_edges(mapper: &Combiner, edge_type: EdgeType) -> Vec<GraphEdge> {
    let mut edges = Vec::new();
    for mapping in &mapper.mappings {
        let Some(topic) = mapping.destination_topic() else {
            trace!(mapper_id = %mapper.id, mapping_id = %mapping.id, "Mapping has no destination topic");
            continue;
        };
        let target = NodeType::Topic.node_id(topic);
        let tag_sources = mapping
            .sources
            .tags
            .iter()
            .map(|tag| NodeType::Tag.node_id(tag));
        let filter_sources = mapping
            .sources
            .topic_filters
            .iter()
            .map(|filter| NodeType::TopicFilter.node_id(filter));

        for source in tag_sources.chain(filter_sources) {
            edges.push(
                GraphEdge::new(source, target.clone(), edge_type)
                    .with_metadata("mapperId", &mapper.id)
                    .with_metadata("mapperName", &mapper.name)
                    .with_metadata("mappingId", &mapping.id),
            );
        }
    }
    edges
}
