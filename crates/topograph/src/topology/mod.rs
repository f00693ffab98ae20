//! Topology graph engine
//!
//! Builds a graph of tags, topics and topic filters from domain collections,
//! lays it out with a force-directed simulation, and traces data flow
//! through it.

mod builder;
mod graph;
mod layout;
mod sources;
mod trace;

pub use builder::*;
pub use graph::*;
pub use layout::*;
pub use sources::*;
pub use trace::*;
