//! Integration tests for the public API

use topograph::prelude::*;
use topograph::{layout_json, trace};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A small plant: two sensors publish north, a bridge forwards remote
/// commands, a combiner merges both sensors, and a valve listens south.
fn plant() -> TopologySources {
    TopologySources {
        tags: vec![Tag::new("temp"), Tag::new("pressure"), Tag::new("valve")],
        topic_filters: vec![TopicFilter::new("remote/cmd/#"), TopicFilter::new("cmd/valve")],
        northbound_mappings: vec![
            NorthboundMapping::new("temp", "plant/temp"),
            NorthboundMapping::new("pressure", "plant/pressure"),
        ],
        southbound_mappings: vec![SouthboundMapping::new("cmd/valve", "valve")],
        bridge_subscriptions: vec![BridgeSubscription::new(
            "cloud",
            strings(&["remote/cmd/#"]),
            Some("cmd/valve".into()),
        )],
        combiners: vec![Combiner::new(
            "c1",
            "boiler",
            vec![DataCombining::new(
                "m1",
                strings(&["temp", "pressure"]),
                vec![],
                Some("plant/boiler".into()),
            )],
        )],
        ..Default::default()
    }
}

#[test]
fn test_single_mapping_end_to_end() {
    let sources = TopologySources {
        tags: vec![Tag::new("temp-sensor")],
        northbound_mappings: vec![NorthboundMapping::new("temp-sensor", "factory/temp")],
        ..Default::default()
    };
    let graph = build_graph(&sources);

    let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["tag-temp-sensor", "topic-factory/temp"]);
    let edges: Vec<&GraphEdge> = graph.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].from, "tag-temp-sensor");
    assert_eq!(edges[0].to, "topic-factory/temp");
    assert_eq!(edges[0].edge_type, EdgeType::Northbound);

    let result = trace(&graph, "tag-temp-sensor", TraceDirection::Downstream, 10).unwrap();
    assert_eq!(result.node_ids(), vec!["tag-temp-sensor", "topic-factory/temp"]);
    assert_eq!(result.path[1].hop_number, 1);
    assert_eq!(result.path[1].edge.as_ref().unwrap().edge_type, EdgeType::Northbound);
    assert_eq!(result.end_nodes.len(), 1);
    assert_eq!(result.end_nodes[0].id, "topic-factory/temp");
    assert!(!result.has_cycles);
}

#[test]
fn test_plant_graph_shape() {
    let graph = build_graph(&plant());
    let stats = graph.stats();
    // 3 tags, 2 filters, plant/temp, plant/pressure, cmd/valve, plant/boiler
    assert_eq!(stats.node_count, 9);
    // 2 northbound, 1 southbound, 1 bridge, 2 combiner
    assert_eq!(stats.edge_count, 6);
    assert_eq!(stats.nodes_by_type[&NodeType::Topic], 4);
    assert_eq!(stats.edges_by_type[&EdgeType::Combiner], 2);
}

#[test]
fn test_bridge_topic_and_filter_stay_distinct() {
    let graph = build_graph(&plant());
    // The bridge writes to topic "cmd/valve"; the valve listens on filter
    // "cmd/valve". Identical text, different nodes, no implicit link.
    assert!(graph.has_node("topic-cmd/valve"));
    assert!(graph.has_node("filter-cmd/valve"));
    assert!(graph.outgoing("topic-cmd/valve").is_empty());
}

#[test]
fn test_upstream_from_combined_topic() {
    let graph = build_graph(&plant());
    let result = TraceEngine::new(&graph)
        .trace("topic-plant/boiler", TraceDirection::Upstream)
        .unwrap();
    assert_eq!(result.node_ids(), vec!["topic-plant/boiler", "tag-temp"]);
    let ends: Vec<&str> = result.end_nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ends, vec!["tag-temp", "tag-pressure"]);
}

#[test]
fn test_bidirectional_from_tag() {
    let graph = build_graph(&plant());
    let result = TraceEngine::new(&graph)
        .trace("tag-valve", TraceDirection::Bidirectional)
        .unwrap();
    assert_eq!(result.node_ids(), vec!["filter-cmd/valve", "tag-valve"]);
    assert_eq!(result.start_node.id, "tag-valve");
    assert_eq!(result.direction, TraceDirection::Bidirectional);
}

#[test]
fn test_layout_positions_every_node() {
    let graph = build_graph(&plant());
    let result = ForceLayoutAlgorithm::new().layout(&graph).unwrap();
    assert_eq!(result.nodes.len(), graph.node_count());
    let laid_out: Vec<&str> = result.nodes.iter().map(|n| n.node.id.as_str()).collect();
    let stored: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(laid_out, stored);
    assert!(result.nodes.iter().all(|n| n.position.is_finite()));
}

#[test]
fn test_layout_rejects_invalid_config() {
    let graph = build_graph(&plant());
    let config = ForceLayoutConfig {
        damping: 1.5,
        ..Default::default()
    };
    let err = ForceLayoutAlgorithm::with_config(config)
        .layout(&graph)
        .unwrap_err();
    assert!(err.to_string().contains("Invalid layout configuration"));
}

#[test]
fn test_sources_from_json() {
    let json = r#"{
        "tags": [{ "name": "temp", "description": "boiler temperature" }],
        "topicFilters": [{ "topicFilter": "in/#" }],
        "northboundMappings": [{ "tagName": "temp", "topic": "out/temp" }],
        "bridgeSubscriptions": [
            { "bridgeId": "b1", "filters": ["in/#"], "destination": "out/bridged" }
        ],
        "assetMappers": [{
            "id": "am",
            "name": "asset",
            "mappings": [{
                "id": "m",
                "sources": { "tags": ["temp"], "topicFilters": [] },
                "destination": { "topic": "assets/temp" }
            }]
        }]
    }"#;
    let sources = TopologySources::from_json(json).unwrap();
    let graph = build_graph(&sources);
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 3);
    assert!(graph
        .edges()
        .any(|e| e.edge_type == EdgeType::AssetMapper && e.to == "topic-assets/temp"));
}

#[test]
fn test_layout_json_helper() {
    let json = r#"{ "tags": [{ "name": "a" }, { "name": "b" }] }"#;
    let result = layout_json(json).unwrap();
    assert_eq!(result.nodes.len(), 2);
    assert!(result.bounds.width() > 0.0);
}

#[test]
fn test_trace_result_serializes_camel_case() {
    let graph = build_graph(&plant());
    let result = trace(&graph, "tag-temp", TraceDirection::Downstream, 10).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["direction"], "downstream");
    assert_eq!(json["hasCycles"], false);
    assert_eq!(json["startNode"]["id"], "tag-temp");
    assert_eq!(json["path"][0]["hopNumber"], 0);
    assert!(json["path"][0]["edge"].is_null());
}
