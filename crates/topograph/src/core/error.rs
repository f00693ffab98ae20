//! Core error types for topology processing
//!
//! Graph construction, layout and trace never fail on well-formed input; these
//! errors cover the strict graph store, configuration validation and decoding
//! of source documents.

use thiserror::Error;

/// Core error types for topology processing
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Dangling edge {edge}: endpoint '{endpoint}' is not in the graph")]
    DanglingEdge { edge: String, endpoint: String },

    #[error("Duplicate node: {id}")]
    DuplicateNode { id: String },

    #[error("Invalid layout configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid trace direction: {value} (expected upstream, downstream or bidirectional)")]
    InvalidDirection { value: String },

    #[error("Invalid node type: {value} (expected tag, topic or topic-filter)")]
    InvalidNodeType { value: String },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl TopologyError {
    /// Create a new dangling edge error
    pub fn dangling_edge(edge: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::DanglingEdge {
            edge: edge.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a new duplicate node error
    pub fn duplicate_node(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Create a new invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new invalid direction error
    pub fn invalid_direction(value: impl Into<String>) -> Self {
        Self::InvalidDirection {
            value: value.into(),
        }
    }

    /// Create a new invalid node type error
    pub fn invalid_node_type(value: impl Into<String>) -> Self {
        Self::InvalidNodeType {
            value: value.into(),
        }
    }
}
