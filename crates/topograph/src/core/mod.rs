//! Core abstractions for topology processing
//!
//! This module defines the storage and layout traits, the shared node/edge
//! types, the error enum and the logging setup.

mod database;
mod error;
mod layout;
pub mod logging;
mod types;

pub use database::*;
pub use error::*;
pub use layout::*;
pub use logging::*;
pub use types::*;
