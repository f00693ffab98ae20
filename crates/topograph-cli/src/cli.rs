//! Command-line interface for the topograph utility
//!
//! Reads a JSON document of domain collections, builds the topology graph,
//! and prints the graph, its layout, a trace, or summary information.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::colorizer::format_trace;
use topograph::core::logging::init_logging;
use topograph::prelude::*;

/// Topograph - build, lay out and trace data-flow topologies
#[derive(Parser)]
#[command(name = "topograph")]
#[command(about = "Build, lay out and trace data-flow topologies from gateway configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the topology graph and print it as JSON
    Graph {
        /// Input file with domain collections as JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Build the graph, lay it out, and print positions as JSON
    Layout {
        /// Input file with domain collections as JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with simulation constants; missing fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the number of simulation steps
        #[arg(long)]
        iterations: Option<usize>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Trace data flow from a node
    Trace {
        /// Input file with domain collections as JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Id of the node to start from (e.g. tag-temp-sensor)
        #[arg(long)]
        from: String,

        /// Direction to follow edges in
        #[arg(long, value_enum, default_value_t = DirectionChoice::Downstream)]
        direction: DirectionChoice,

        /// Branches reaching this hop number are abandoned
        #[arg(long, default_value_t = topograph::topology::DEFAULT_MAX_HOPS)]
        max_hops: usize,

        /// Print the trace result as JSON
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// List the nodes of the graph
    Nodes {
        /// Input file with domain collections as JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Only list nodes of this kind
        #[arg(long = "type", value_enum)]
        node_type: Option<NodeTypeChoice>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show node and edge counts per kind
    Stats {
        /// Input file with domain collections as JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Trace directions
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum DirectionChoice {
    /// Follow edges backwards, towards sources
    Upstream,
    /// Follow edges forwards, towards sinks
    #[default]
    Downstream,
    /// Both, spliced into one path
    Bidirectional,
}

impl From<DirectionChoice> for TraceDirection {
    fn from(value: DirectionChoice) -> Self {
        match value {
            DirectionChoice::Upstream => TraceDirection::Upstream,
            DirectionChoice::Downstream => TraceDirection::Downstream,
            DirectionChoice::Bidirectional => TraceDirection::Bidirectional,
        }
    }
}

/// Node kinds
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum NodeTypeChoice {
    Tag,
    Topic,
    TopicFilter,
}

impl From<NodeTypeChoice> for NodeType {
    fn from(value: NodeTypeChoice) -> Self {
        match value {
            NodeTypeChoice::Tag => NodeType::Tag,
            NodeTypeChoice::Topic => NodeType::Topic,
            NodeTypeChoice::TopicFilter => NodeType::TopicFilter,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct TopographApp;

impl TopographApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("TOPOGRAPH_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());

        let log_format_str = std::env::var("TOPOGRAPH_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level_str), Some(&log_format_str)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Topograph v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Graph {
                input,
                output,
                pretty,
            } => {
                let sources = self.load_sources(input, cli.verbose)?;
                let rendered = self.graph_command(&sources, pretty)?;
                self.write_output(output, &rendered)
            }
            Commands::Layout {
                input,
                output,
                config,
                iterations,
                pretty,
            } => {
                let sources = self.load_sources(input, cli.verbose)?;
                let config = self.load_layout_config(config, iterations)?;
                let rendered = self.layout_command(&sources, config, pretty)?;
                self.write_output(output, &rendered)
            }
            Commands::Trace {
                input,
                output,
                from,
                direction,
                max_hops,
                json,
                color,
            } => {
                let sources = self.load_sources(input, cli.verbose)?;
                let colored = !json && should_colorize(&output, color);
                let rendered = self.trace_command(
                    &sources,
                    &from,
                    direction.into(),
                    max_hops,
                    json,
                    colored,
                )?;
                self.write_output(output, &rendered)
            }
            Commands::Nodes {
                input,
                node_type,
                json,
            } => {
                let sources = self.load_sources(input, cli.verbose)?;
                let rendered = self.nodes_command(&sources, node_type.map(Into::into), json)?;
                self.write_output(None, &rendered)
            }
            Commands::Stats { input, json } => {
                let sources = self.load_sources(input, cli.verbose)?;
                let rendered = self.stats_command(&sources, json)?;
                self.write_output(None, &rendered)
            }
        }
    }

    /// Handle the graph command
    pub fn graph_command(&self, sources: &TopologySources, pretty: bool) -> Result<String> {
        let graph = build_graph(sources);
        to_json(&graph.to_document(), pretty)
    }

    /// Handle the layout command
    pub fn layout_command(
        &self,
        sources: &TopologySources,
        config: ForceLayoutConfig,
        pretty: bool,
    ) -> Result<String> {
        let graph = build_graph(sources);
        let result = ForceLayoutAlgorithm::with_config(config).layout(&graph)?;
        to_json(&result, pretty)
    }

    /// Handle the trace command
    pub fn trace_command(
        &self,
        sources: &TopologySources,
        from: &str,
        direction: TraceDirection,
        max_hops: usize,
        json: bool,
        colored: bool,
    ) -> Result<String> {
        let graph = build_graph(sources);
        let result = TraceEngine::new(&graph)
            .trace_with_options(from, direction, TraceOptions { max_hops })
            .ok_or_else(|| anyhow!("Node not found: {}", from))?;

        if json {
            to_json(&result, true)
        } else {
            Ok(format_trace(&result, colored))
        }
    }

    /// Handle the nodes command
    pub fn nodes_command(
        &self,
        sources: &TopologySources,
        node_type: Option<NodeType>,
        json: bool,
    ) -> Result<String> {
        let graph = build_graph(sources);
        let nodes: Vec<&GraphNode> = match node_type {
            Some(node_type) => graph.nodes_of_type(node_type),
            None => graph.available_nodes(),
        };

        if json {
            return to_json(&nodes, true);
        }
        let width = nodes.iter().map(|n| n.id.len()).max().unwrap_or(0);
        Ok(nodes
            .iter()
            .map(|n| format!("{:width$}  {}", n.id, n.node_type, width = width))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Handle the stats command
    pub fn stats_command(&self, sources: &TopologySources, json: bool) -> Result<String> {
        let stats = build_graph(sources).stats();

        if json {
            return to_json(&stats, true);
        }
        let mut lines = vec![format!("Nodes: {}", stats.node_count)];
        for node_type in NodeType::all() {
            let count = stats.nodes_by_type.get(node_type).copied().unwrap_or(0);
            lines.push(format!("  {:<14}{}", node_type.to_string(), count));
        }
        lines.push(format!("Edges: {}", stats.edge_count));
        for edge_type in EdgeType::all() {
            let count = stats.edges_by_type.get(edge_type).copied().unwrap_or(0);
            lines.push(format!("  {:<14}{}", edge_type.to_string(), count));
        }
        Ok(lines.join("\n"))
    }

    /// Read and decode the domain collections
    pub fn load_sources(&self, input: Option<PathBuf>, verbose: bool) -> Result<TopologySources> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let sources = TopologySources::from_json(&content).context("Failed to decode input")?;
        debug!(
            tags = sources.tags.len(),
            topic_filters = sources.topic_filters.len(),
            "Loaded sources"
        );
        Ok(sources)
    }

    /// Read simulation constants, apply overrides, and validate them
    pub fn load_layout_config(
        &self,
        path: Option<PathBuf>,
        iterations: Option<usize>,
    ) -> Result<ForceLayoutConfig> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    anyhow!("Failed to read config file '{}': {}", path.display(), e)
                })?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid config file '{}'", path.display()))?
            }
            None => ForceLayoutConfig::default(),
        };
        if let Some(iterations) = iterations {
            config.iterations = iterations;
        }
        config.validate()?;
        Ok(config)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// Determine if we should colorize the output based on color choice and output destination
fn should_colorize(output: &Option<PathBuf>, color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                return false;
            }
            match output {
                Some(p) if p.to_str() != Some("-") => false,
                _ => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
            }
        }
    }
}
