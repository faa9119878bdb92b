//! CLI command implementations.

pub mod canonicalize;
pub mod common;
pub mod flip;
pub mod stats;
pub mod version;
