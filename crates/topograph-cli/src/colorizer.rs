//! Terminal rendering of trace results
//!
//! Applies ANSI escape codes to trace output using crossterm.

use crossterm::style::{Color, Stylize};
use topograph::prelude::*;

/// Color for a node kind
///
/// - Tags: Green
/// - Topics: Cyan
/// - Topic filters: Magenta
fn node_color(node_type: NodeType) -> Color {
    match node_type {
        NodeType::Tag => Color::Green,
        NodeType::Topic => Color::Cyan,
        NodeType::TopicFilter => Color::Magenta,
    }
}

fn paint(text: &str, color: Color, colored: bool) -> String {
    if colored {
        format!("{}", text.to_string().with(color))
    } else {
        text.to_string()
    }
}

fn node_label(node: &GraphNode, colored: bool) -> String {
    format!(
        "{} [{}]",
        paint(&node.id, node_color(node.node_type), colored),
        node.node_type
    )
}

/// Render a trace result as text, one hop per line
///
/// ```text
/// Trace downstream from tag-temp [tag]
///   0  tag-temp [tag]
///   1  ─northbound─▶ topic-plant/temp [topic]
/// End nodes: topic-plant/temp
/// ```
pub fn format_trace(result: &TraceResult, colored: bool) -> String {
    let mut lines = vec![format!(
        "Trace {} from {}",
        result.direction,
        node_label(&result.start_node, colored)
    )];

    for hop in &result.path {
        let arrow = match &hop.edge {
            Some(edge) => {
                let arrow = format!("─{}─▶ ", edge.edge_type);
                paint(&arrow, Color::Yellow, colored)
            }
            None => String::new(),
        };
        lines.push(format!(
            "{:>3}  {}{}",
            hop.hop_number,
            arrow,
            node_label(&hop.node, colored)
        ));
    }

    let ends: Vec<String> = result
        .end_nodes
        .iter()
        .map(|node| paint(&node.id, node_color(node.node_type), colored))
        .collect();
    if ends.is_empty() {
        lines.push("End nodes: none".to_string());
    } else {
        lines.push(format!("End nodes: {}", ends.join(", ")));
    }

    if result.has_cycles {
        lines.push(paint("Cycle detected", Color::Red, colored));
    }

    lines.join("\n")
}
