//! Property tests for graph construction

use proptest::prelude::*;
use std::collections::HashSet;
use topograph::prelude::*;

const NAMES: &[&str] = &["a", "b", "c", "d", "e/f", "g/#", "h/+/i"];

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES).prop_map(str::to_string)
}

fn names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(name(), 0..max)
}

fn destination() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        name().prop_map(Some),
    ]
}

fn combiner() -> impl Strategy<Value = Combiner> {
    let mapping = (name(), names(3), names(3), destination())
        .prop_map(|(id, tags, filters, topic)| DataCombining::new(id, tags, filters, topic));
    (name(), prop::collection::vec(mapping, 0..3))
        .prop_map(|(id, mappings)| Combiner::new(id.clone(), id, mappings))
}

prop_compose! {
    fn sources()(
        tags in names(6),
        filters in names(6),
        northbound in prop::collection::vec((name(), name()), 0..6),
        southbound in prop::collection::vec((name(), name()), 0..6),
        bridges in prop::collection::vec((name(), names(3), destination()), 0..4),
        combiners in prop::collection::vec(combiner(), 0..3),
        asset_mappers in prop::collection::vec(combiner(), 0..3),
    ) -> TopologySources {
        TopologySources {
            tags: tags.into_iter().map(Tag::new).collect(),
            topic_filters: filters.into_iter().map(TopicFilter::new).collect(),
            northbound_mappings: northbound
                .into_iter()
                .map(|(tag, topic)| NorthboundMapping::new(tag, topic))
                .collect(),
            southbound_mappings: southbound
                .into_iter()
                .map(|(filter, tag)| SouthboundMapping::new(filter, tag))
                .collect(),
            bridge_subscriptions: bridges
                .into_iter()
                .map(|(id, filters, destination)| BridgeSubscription::new(id, filters, destination))
                .collect(),
            combiners,
            asset_mappers,
        }
    }
}

proptest! {
    #[test]
    fn construction_is_deterministic(sources in sources()) {
        let first = build_graph(&sources);
        let second = build_graph(&sources);
        let first_nodes: Vec<&GraphNode> = first.nodes().collect();
        let second_nodes: Vec<&GraphNode> = second.nodes().collect();
        prop_assert_eq!(first_nodes, second_nodes);
        prop_assert_eq!(first.edge_slice(), second.edge_slice());
    }

    #[test]
    fn every_edge_has_both_endpoints(sources in sources()) {
        let graph = build_graph(&sources);
        for edge in graph.edges() {
            prop_assert!(graph.has_node(&edge.from), "missing source of {}", edge);
            prop_assert!(graph.has_node(&edge.to), "missing target of {}", edge);
        }
    }

    #[test]
    fn node_ids_are_unique(sources in sources()) {
        let graph = build_graph(&sources);
        let ids: HashSet<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(ids.len(), graph.node_count());
    }

    #[test]
    fn edge_ids_are_unique(sources in sources()) {
        let graph = build_graph(&sources);
        let ids: HashSet<&str> = graph.edges().map(|e| e.id.as_str()).collect();
        prop_assert_eq!(ids.len(), graph.edge_count());
    }

    #[test]
    fn every_tag_becomes_a_node(sources in sources()) {
        let graph = build_graph(&sources);
        for tag in &sources.tags {
            prop_assert!(graph.has_node(&NodeType::Tag.node_id(&tag.name)));
        }
        for filter in &sources.topic_filters {
            prop_assert!(graph.has_node(&NodeType::TopicFilter.node_id(&filter.topic_filter)));
        }
    }

    #[test]
    fn edge_kinds_connect_the_right_node_kinds(sources in sources()) {
        let graph = build_graph(&sources);
        for edge in graph.edges() {
            let from = graph.get_node(&edge.from).unwrap().node_type;
            let to = graph.get_node(&edge.to).unwrap().node_type;
            match edge.edge_type {
                EdgeType::Northbound => {
                    prop_assert_eq!((from, to), (NodeType::Tag, NodeType::Topic))
                }
                EdgeType::Southbound => {
                    prop_assert_eq!((from, to), (NodeType::TopicFilter, NodeType::Tag))
                }
                EdgeType::Bridge => {
                    prop_assert_eq!((from, to), (NodeType::TopicFilter, NodeType::Topic))
                }
                EdgeType::Combiner | EdgeType::AssetMapper => {
                    prop_assert_ne!(from, NodeType::Topic);
                    prop_assert_eq!(to, NodeType::Topic);
                }
            }
        }
    }

    #[test]
    fn empty_topics_never_become_nodes(sources in sources()) {
        let graph = build_graph(&sources);
        prop_assert!(!graph.has_node("topic-"));
    }
}

#[test]
fn test_northbound_to_unknown_tag_is_dropped() {
    let sources = TopologySources {
        northbound_mappings: vec![NorthboundMapping::new("ghost", "out/ghost")],
        ..Default::default()
    };
    let graph = build_graph(&sources);
    // The topic node still exists; only the edge is dropped.
    assert!(graph.has_node("topic-out/ghost"));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_edge_metadata() {
    let sources = TopologySources {
        tags: vec![Tag::new("temp")],
        topic_filters: vec![TopicFilter::new("in/#")],
        northbound_mappings: vec![NorthboundMapping::new("temp", "out/temp")],
        bridge_subscriptions: vec![BridgeSubscription::new(
            "b1",
            vec!["in/#".to_string()],
            Some("out/temp".into()),
        )],
        ..Default::default()
    };
    let graph = build_graph(&sources);
    let edges: Vec<&GraphEdge> = graph.edges().collect();
    assert_eq!(edges[0].metadata["tagName"], "temp");
    assert_eq!(edges[0].metadata["topic"], "out/temp");
    assert_eq!(edges[1].metadata["bridgeId"], "b1");
    assert_eq!(edges[1].metadata["topicFilter"], "in/#");
}

#[test]
fn test_node_order_is_tags_filters_topics() {
    let sources = TopologySources {
        tags: vec![Tag::new("t")],
        topic_filters: vec![TopicFilter::new("f")],
        northbound_mappings: vec![NorthboundMapping::new("t", "x")],
        ..Default::default()
    };
    let graph = build_graph(&sources);
    let kinds: Vec<NodeType> = graph.nodes().map(|n| n.node_type).collect();
    assert_eq!(kinds, vec![NodeType::Tag, NodeType::TopicFilter, NodeType::Topic]);
}
