//! Directional trace engine
//!
//! Breadth-first walk from one node, forwards along edges (downstream),
//! backwards (upstream), or both. Reports the first completed path, every
//! terminal node reached, and whether the walk ran into a node it had already
//! expanded.
//!
//! Only the first completed path per direction is returned; alternative
//! branches still contribute their terminal nodes to `end_nodes`.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, span, trace, Level};

use super::TopologyGraph;
use crate::core::{Database, GraphEdge, GraphNode, TraceDirection};

/// Default bound on hop depth
pub const DEFAULT_MAX_HOPS: usize = 10;

/// Trace options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraceOptions {
    /// Branches reaching this hop number are abandoned
    pub max_hops: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

/// One step of a trace path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceHop {
    pub node: GraphNode,
    /// Edge used to reach `node`; `None` for the first hop
    pub edge: Option<GraphEdge>,
    pub hop_number: usize,
}

/// Result of one trace call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceResult {
    pub path: Vec<TraceHop>,
    pub direction: TraceDirection,
    pub has_cycles: bool,
    pub start_node: GraphNode,
    pub end_nodes: Vec<GraphNode>,
}

impl TraceResult {
    /// Node ids along the path, in hop order
    pub fn node_ids(&self) -> Vec<&str> {
        self.path.iter().map(|hop| hop.node.id.as_str()).collect()
    }

    /// Ids of the edges along the path, in hop order
    pub fn edge_ids(&self) -> Vec<&str> {
        self.path
            .iter()
            .filter_map(|hop| hop.edge.as_ref())
            .map(|edge| edge.id.as_str())
            .collect()
    }

    /// Number of hops in the path, including the start
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// A queued branch: node ids paired with the edge index used to reach them
#[derive(Debug, Clone)]
struct Branch<'g> {
    hops: Vec<(&'g str, Option<usize>)>,
}

impl<'g> Branch<'g> {
    fn head(&self) -> &'g str {
        self.hops.last().map(|(id, _)| *id).unwrap_or_default()
    }

    fn uses_edge(&self, edge: usize) -> bool {
        self.hops.iter().any(|(_, used)| *used == Some(edge))
    }
}

/// Outcome of a walk in a single direction
#[derive(Debug, Default)]
struct Walk<'g> {
    first_path: Option<Vec<(&'g str, Option<usize>)>>,
    end_nodes: Vec<&'g str>,
    has_cycles: bool,
}

/// Trace engine over one graph
///
/// Builds forward and reverse adjacency once; each trace call keeps its own
/// queue and visited set, so concurrent traces over one graph do not
/// interfere.
#[derive(Debug)]
pub struct TraceEngine<'g> {
    graph: &'g TopologyGraph,
    edges: &'g [GraphEdge],
    outgoing: HashMap<&'g str, Vec<usize>>,
    incoming: HashMap<&'g str, Vec<usize>>,
}

impl<'g> TraceEngine<'g> {
    pub fn new(graph: &'g TopologyGraph) -> Self {
        let edges = graph.edge_slice();
        let mut outgoing: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.from.as_str()).or_default().push(index);
            incoming.entry(edge.to.as_str()).or_default().push(index);
        }
        Self {
            graph,
            edges,
            outgoing,
            incoming,
        }
    }

    /// Trace with the default hop bound
    pub fn trace(&self, start_id: &str, direction: TraceDirection) -> Option<TraceResult> {
        self.trace_with_options(start_id, direction, TraceOptions::default())
    }

    /// Trace from `start_id`; `None` if the node is not in the graph
    pub fn trace_with_options(
        &self,
        start_id: &str,
        direction: TraceDirection,
        options: TraceOptions,
    ) -> Option<TraceResult> {
        let trace_span = span!(
            Level::INFO,
            "trace",
            start = start_id,
            %direction,
            max_hops = options.max_hops
        );
        let _enter = trace_span.enter();

        let Some(start) = self.graph.get_node(start_id) else {
            debug!("Start node not found");
            return None;
        };
        let start_id = start.id.as_str();

        let (hops, has_cycles, end_ids) = match direction {
            TraceDirection::Bidirectional => {
                let downstream = self.walk(start_id, TraceDirection::Downstream, options.max_hops);
                let upstream = self.walk(start_id, TraceDirection::Upstream, options.max_hops);
                let hops = splice(
                    upstream.first_path.unwrap_or_default(),
                    downstream.first_path.unwrap_or_default(),
                    start_id,
                );
                let ends: Vec<&str> = upstream
                    .end_nodes
                    .into_iter()
                    .chain(downstream.end_nodes)
                    .collect();
                (hops, upstream.has_cycles || downstream.has_cycles, ends)
            }
            single => {
                let walk = self.walk(start_id, single, options.max_hops);
                let hops = walk.first_path.unwrap_or_else(|| vec![(start_id, None)]);
                (hops, walk.has_cycles, walk.end_nodes)
            }
        };

        let mut seen = HashSet::new();
        let end_nodes: Vec<GraphNode> = end_ids
            .into_iter()
            .filter(|id| *id != start_id && seen.insert(*id))
            .filter_map(|id| self.graph.get_node(id).cloned())
            .collect();

        let path: Vec<TraceHop> = hops
            .into_iter()
            .enumerate()
            .filter_map(|(hop_number, (id, edge))| {
                Some(TraceHop {
                    node: self.graph.get_node(id)?.clone(),
                    edge: edge.map(|index| self.edges[index].clone()),
                    hop_number,
                })
            })
            .collect();

        info!(
            path_len = path.len(),
            end_count = end_nodes.len(),
            has_cycles,
            "Trace completed"
        );
        Some(TraceResult {
            path,
            direction,
            has_cycles,
            start_node: start.clone(),
            end_nodes,
        })
    }

    fn adjacent(&self, node: &str, direction: TraceDirection) -> &[usize] {
        let index = if direction.includes_downstream() {
            &self.outgoing
        } else {
            &self.incoming
        };
        index.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Breadth-first walk in one direction
    fn walk(&self, start_id: &'g str, direction: TraceDirection, max_hops: usize) -> Walk<'g> {
        let edges: &'g [GraphEdge] = self.edges;
        let mut walk = Walk::default();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue = VecDeque::from([Branch {
            hops: vec![(start_id, None)],
        }]);

        while let Some(branch) = queue.pop_front() {
            let current = branch.head();
            let hop_number = branch.hops.len() - 1;
            if hop_number >= max_hops {
                trace!(node = current, hop_number, "Hop limit reached, abandoning branch");
                continue;
            }

            let candidates: Vec<usize> = self
                .adjacent(current, direction)
                .iter()
                .copied()
                .filter(|&edge| !branch.uses_edge(edge))
                .collect();

            if candidates.is_empty() {
                trace!(node = current, hop_number, "Reached terminal node");
                walk.end_nodes.push(current);
                if walk.first_path.is_none() {
                    walk.first_path = Some(branch.hops);
                }
                continue;
            }

            for edge in candidates {
                let next = edges[edge].far_end(direction);
                if visited.contains(next) {
                    trace!(from = current, to = next, "Revisited node, cycle detected");
                    walk.has_cycles = true;
                    continue;
                }
                let mut hops = branch.hops.clone();
                hops.push((next, Some(edge)));
                queue.push_back(Branch { hops });
            }
            // Marked only once every edge has been considered; a node queued
            // by converging branches is expanded once per branch.
            visited.insert(current);
        }

        debug!(
            %direction,
            completed = walk.end_nodes.len(),
            has_cycles = walk.has_cycles,
            "Walk finished"
        );
        walk
    }
}

/// Join an upstream and a downstream path around the shared start node
///
/// The upstream path is reversed so the result reads source to sink; each
/// hop keeps the edge connecting it to the hop before it.
fn splice<'g>(
    upstream: Vec<(&'g str, Option<usize>)>,
    downstream: Vec<(&'g str, Option<usize>)>,
    start_id: &'g str,
) -> Vec<(&'g str, Option<usize>)> {
    let mut hops = Vec::with_capacity(upstream.len() + downstream.len() + 1);

    // Upstream hop i was reached over edge e_i; reading backwards, that edge
    // leads from hop i into hop i - 1.
    let mut carried: Option<usize> = None;
    for (id, edge) in upstream.into_iter().skip(1).rev() {
        hops.push((id, carried));
        carried = edge;
    }
    hops.push((start_id, carried));
    hops.extend(downstream.into_iter().skip(1));
    hops
}

/// Trace a graph from `start_id`
///
/// # Example
/// ```
/// use topograph::{build_graph, trace, TraceDirection};
/// use topograph::topology::{NorthboundMapping, Tag, TopologySources};
///
/// let sources = TopologySources {
///     tags: vec![Tag::new("temp-sensor")],
///     northbound_mappings: vec![NorthboundMapping::new("temp-sensor", "factory/temp")],
///     ..Default::default()
/// };
/// let graph = build_graph(&sources);
/// let result = trace(&graph, "tag-temp-sensor", TraceDirection::Downstream, 10).unwrap();
/// assert_eq!(result.node_ids(), vec!["tag-temp-sensor", "topic-factory/temp"]);
/// assert!(!result.has_cycles);
/// ```
pub fn trace(
    graph: &TopologyGraph,
    start_id: &str,
    direction: TraceDirection,
    max_hops: usize,
) -> Option<TraceResult> {
    TraceEngine::new(graph).trace_with_options(start_id, direction, TraceOptions { max_hops })
}
