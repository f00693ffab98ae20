//! WebAssembly bindings for Topograph
//!
//! JSON in, JSON out: each function takes the domain collections as a JSON
//! document and returns the graph, layout or trace serialized back to JSON.
//! Errors are raised as JavaScript exceptions.

use wasm_bindgen::prelude::*;

use crate::core::{LayoutAlgorithm, TraceDirection};
use crate::topology::{
    build_graph, ForceLayoutAlgorithm, ForceLayoutConfig, TopologyGraph, TopologySources,
    TraceEngine, TraceOptions,
};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn graph_from_json(sources: &str) -> Result<TopologyGraph, JsValue> {
    let sources = TopologySources::from_json(sources).map_err(to_js_error)?;
    Ok(build_graph(&sources))
}

/// Build the topology graph
///
/// # Returns
/// * `{ "nodes": [...], "edges": [...] }` as a JSON string
#[wasm_bindgen(js_name = buildGraph)]
pub fn build_graph_json(sources: &str) -> Result<String, JsValue> {
    let graph = graph_from_json(sources)?;
    serde_json::to_string(&graph.to_document()).map_err(to_js_error)
}

/// Build the graph and lay it out
///
/// # Arguments
/// * `sources` - Domain collections as JSON
/// * `config` - Optional simulation constants as JSON; missing fields use defaults
#[wasm_bindgen(js_name = layoutGraph)]
pub fn layout_json(sources: &str, config: Option<String>) -> Result<String, JsValue> {
    let graph = graph_from_json(sources)?;
    let config = match config {
        Some(config) => serde_json::from_str::<ForceLayoutConfig>(&config).map_err(to_js_error)?,
        None => ForceLayoutConfig::default(),
    };
    let result = ForceLayoutAlgorithm::with_config(config)
        .layout(&graph)
        .map_err(to_js_error)?;
    serde_json::to_string(&result).map_err(to_js_error)
}

/// Build the graph and trace it from `start_id`
///
/// # Arguments
/// * `direction` - "upstream", "downstream" or "bidirectional"
/// * `max_hops` - Optional hop bound; defaults to 10
///
/// # Returns
/// * The trace result as a JSON string, or `null` if the start node is unknown
#[wasm_bindgen(js_name = traceGraph)]
pub fn trace_json(
    sources: &str,
    start_id: &str,
    direction: &str,
    max_hops: Option<usize>,
) -> Result<String, JsValue> {
    let graph = graph_from_json(sources)?;
    let direction: TraceDirection = direction.parse().map_err(to_js_error)?;
    let options = max_hops
        .map(|max_hops| TraceOptions { max_hops })
        .unwrap_or_default();
    let result = TraceEngine::new(&graph).trace_with_options(start_id, direction, options);
    serde_json::to_string(&result).map_err(to_js_error)
}
