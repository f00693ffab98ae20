//! Tests for logging functionality
//!
//! These tests verify that logging initialization works correctly
//! with different configurations.

use std::str::FromStr;
use topograph::core::logging::{init_logging, LogFormat};
use topograph::prelude::*;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_unset_format_defaults_to_compact() {
    assert_eq!(LogFormat::default(), LogFormat::Compact);
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_operations_run_with_logging_enabled() {
    // Only one global subscriber can win; later calls fail gracefully.
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("json"));

    let sources = TopologySources {
        tags: vec![Tag::new("a")],
        northbound_mappings: vec![NorthboundMapping::new("a", "out/a")],
        // Dropped edge exercises the skip path under trace logging.
        southbound_mappings: vec![SouthboundMapping::new("in/missing", "a")],
        ..Default::default()
    };
    let graph = build_graph(&sources);
    assert_eq!(graph.edge_count(), 1);

    let layout = ForceLayoutAlgorithm::new().layout(&graph).unwrap();
    assert_eq!(layout.nodes.len(), 2);

    let result = TraceEngine::new(&graph)
        .trace("topic-out/a", TraceDirection::Bidirectional)
        .unwrap();
    assert_eq!(result.node_ids(), vec!["tag-a", "topic-out/a"]);
}
