//! Force-directed layout
//!
//! Places nodes evenly on a circle, then runs a fixed number of simulation
//! steps: pairwise repulsion, directional edge springs, a pull towards the
//! center, and damped integration. There is no early exit, so the cost of a
//! run depends only on the node and edge counts.
//!
//! Repulsion is computed for every pair of nodes, which makes each step
//! O(n²). That is fine for the tens to low hundreds of nodes a topology
//! diagram shows and is the scaling ceiling of this engine.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::{debug, info, span, trace, Level};

use super::TopologyGraph;
use crate::core::{
    Database, GraphEdge, GraphNode, LayoutAlgorithm, Position, PositionedNode, TopologyError,
};

/// Number of simulation steps per run
pub const DEFAULT_ITERATIONS: usize = 200;
/// Scale of the inverse-square repulsion between every pair of nodes
pub const DEFAULT_REPULSION_STRENGTH: f64 = 20000.0;
/// Push applied to the target of an edge shorter than the ideal length
pub const DEFAULT_ATTRACTION_STRENGTH: f64 = 0.1;
/// Pull applied to both ends of an edge longer than the ideal length
pub const DEFAULT_PULL_STRENGTH: f64 = 0.05;
/// Fraction of the target's push applied back to the source
pub const DEFAULT_SOURCE_PUSH_RATIO: f64 = 0.3;
/// Proportional pull of every node towards the center
pub const DEFAULT_CENTERING_STRENGTH: f64 = 0.005;
/// Velocity retained after each step
pub const DEFAULT_DAMPING: f64 = 0.8;
/// Rest length of an edge
pub const DEFAULT_IDEAL_EDGE_LENGTH: f64 = 150.0;
/// Radius of the initial placement circle
pub const DEFAULT_INITIAL_RADIUS: f64 = 300.0;
/// Center of the initial circle and target of the centering force
pub const DEFAULT_CENTER: Position = Position { x: 400.0, y: 300.0 };

/// Distances are clamped to this before dividing by them
const MIN_DISTANCE: f64 = 0.01;

/// Simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceLayoutConfig {
    pub iterations: usize,
    pub repulsion_strength: f64,
    pub attraction_strength: f64,
    pub pull_strength: f64,
    pub source_push_ratio: f64,
    pub centering_strength: f64,
    pub damping: f64,
    pub ideal_edge_length: f64,
    pub initial_radius: f64,
    pub center: Position,
}

impl Default for ForceLayoutConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            repulsion_strength: DEFAULT_REPULSION_STRENGTH,
            attraction_strength: DEFAULT_ATTRACTION_STRENGTH,
            pull_strength: DEFAULT_PULL_STRENGTH,
            source_push_ratio: DEFAULT_SOURCE_PUSH_RATIO,
            centering_strength: DEFAULT_CENTERING_STRENGTH,
            damping: DEFAULT_DAMPING,
            ideal_edge_length: DEFAULT_IDEAL_EDGE_LENGTH,
            initial_radius: DEFAULT_INITIAL_RADIUS,
            center: DEFAULT_CENTER,
        }
    }
}

impl ForceLayoutConfig {
    /// Check that the constants describe a simulation that settles
    pub fn validate(&self) -> Result<(), TopologyError> {
        let scalars = [
            ("repulsionStrength", self.repulsion_strength),
            ("attractionStrength", self.attraction_strength),
            ("pullStrength", self.pull_strength),
            ("sourcePushRatio", self.source_push_ratio),
            ("centeringStrength", self.centering_strength),
            ("damping", self.damping),
            ("idealEdgeLength", self.ideal_edge_length),
            ("initialRadius", self.initial_radius),
            ("center.x", self.center.x),
            ("center.y", self.center.y),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(TopologyError::invalid_config(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(TopologyError::invalid_config(format!(
                "damping must be in [0, 1), got {}",
                self.damping
            )));
        }
        if self.ideal_edge_length <= 0.0 {
            return Err(TopologyError::invalid_config(format!(
                "idealEdgeLength must be positive, got {}",
                self.ideal_edge_length
            )));
        }
        Ok(())
    }
}

/// Bounding box of a layout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl LayoutBounds {
    /// Smallest box containing every position; all zero when empty
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Self {
        let mut iter = positions.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(
            Self {
                min_x: first.x,
                min_y: first.y,
                max_x: first.x,
                max_y: first.y,
            },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                min_y: b.min_y.min(p.y),
                max_x: b.max_x.max(p.x),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Layout output: every input node with a position, plus the bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub nodes: Vec<PositionedNode>,
    pub bounds: LayoutBounds,
}

impl LayoutResult {
    /// Position of a node by id
    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.nodes
            .iter()
            .find(|n| n.node.id == id)
            .map(|n| n.position)
    }
}

/// Per-node simulation state, alive for one run only
#[derive(Debug, Clone, Copy)]
struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

/// Force-directed layout algorithm implementation
#[derive(Debug, Clone, Default)]
pub struct ForceLayoutAlgorithm {
    config: ForceLayoutConfig,
}

impl ForceLayoutAlgorithm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ForceLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForceLayoutConfig {
        &self.config
    }

    /// Lay out a node set with its edges
    ///
    /// Output nodes keep the input order. Edges referencing unknown nodes are
    /// ignored.
    pub fn layout_nodes(&self, nodes: &[GraphNode], edges: &[GraphEdge]) -> LayoutResult {
        let layout_span = span!(
            Level::INFO,
            "layout_force",
            node_count = nodes.len(),
            edge_count = edges.len()
        );
        let _enter = layout_span.enter();

        if nodes.is_empty() {
            debug!("No nodes to lay out");
            return LayoutResult {
                nodes: Vec::new(),
                bounds: LayoutBounds::default(),
            };
        }

        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();
        let springs: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|edge| {
                match (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
                    (Some(&from), Some(&to)) => Some((from, to)),
                    _ => {
                        trace!(from = %edge.from, to = %edge.to, "Edge endpoint not in layout");
                        None
                    }
                }
            })
            .collect();

        let mut bodies = self.initial_bodies(nodes.len());
        for _ in 0..self.config.iterations {
            self.step(&mut bodies, &springs);
        }

        let positioned: Vec<PositionedNode> = nodes
            .iter()
            .zip(&bodies)
            .map(|(node, body)| PositionedNode {
                node: node.clone(),
                position: Position::new(body.x, body.y),
            })
            .collect();
        let bounds = LayoutBounds::from_positions(positioned.iter().map(|n| &n.position));

        info!(
            iterations = self.config.iterations,
            width = bounds.width(),
            height = bounds.height(),
            "Layout completed"
        );
        LayoutResult {
            nodes: positioned,
            bounds,
        }
    }

    /// Node i of n at angle 2πi/n on the initial circle, at rest
    fn initial_bodies(&self, count: usize) -> Vec<Body> {
        let center = self.config.center;
        let radius = self.config.initial_radius;
        (0..count)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / count as f64;
                Body {
                    x: center.x + radius * angle.cos(),
                    y: center.y + radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                }
            })
            .collect()
    }

    fn step(&self, bodies: &mut [Body], springs: &[(usize, usize)]) {
        let config = &self.config;

        // Repulsion between every unordered pair.
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let dx = bodies[j].x - bodies[i].x;
                let dy = bodies[j].y - bodies[i].y;
                let dist_sq = dx * dx + dy * dy;
                let dist = dist_sq.sqrt().max(MIN_DISTANCE);
                let force = config.repulsion_strength / (dist_sq + 1.0);
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                bodies[i].vx -= fx;
                bodies[i].vy -= fy;
                bodies[j].vx += fx;
                bodies[j].vy += fy;
            }
        }

        // Edge springs. Short edges push the target along the edge direction
        // and the source back by a fraction, so diagrams read source to target.
        for &(from, to) in springs {
            let dx = bodies[to].x - bodies[from].x;
            let dy = bodies[to].y - bodies[from].y;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let (ux, uy) = (dx / dist, dy / dist);

            if dist < config.ideal_edge_length {
                let push = (config.ideal_edge_length - dist) * config.attraction_strength;
                bodies[to].vx += ux * push;
                bodies[to].vy += uy * push;
                bodies[from].vx -= ux * push * config.source_push_ratio;
                bodies[from].vy -= uy * push * config.source_push_ratio;
            } else {
                let pull = (dist - config.ideal_edge_length) * config.pull_strength;
                bodies[from].vx += ux * pull;
                bodies[from].vy += uy * pull;
                bodies[to].vx -= ux * pull;
                bodies[to].vy -= uy * pull;
            }
        }

        for body in bodies.iter_mut() {
            body.vx += (config.center.x - body.x) * config.centering_strength;
            body.vy += (config.center.y - body.y) * config.centering_strength;

            body.x += body.vx;
            body.y += body.vy;
            body.vx *= config.damping;
            body.vy *= config.damping;
        }
    }
}

impl LayoutAlgorithm<TopologyGraph> for ForceLayoutAlgorithm {
    type Output = LayoutResult;

    fn layout(&self, database: &TopologyGraph) -> Result<LayoutResult> {
        self.config.validate()?;
        let nodes: Vec<GraphNode> = database.nodes().cloned().collect();
        Ok(self.layout_nodes(&nodes, database.edge_slice()))
    }

    fn name(&self) -> &'static str {
        "force-directed"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

/// Lay out a node set with the default simulation constants
pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge]) -> LayoutResult {
    ForceLayoutAlgorithm::new().layout_nodes(nodes, edges)
}
