//! # lineage
//!
//! Command-line front end for `lineage-core`: loads a profile tree from disk,
//! applies the TOML configuration and renders query results.

pub mod cli;
pub mod config;
pub mod loader;
pub mod render;
pub mod report;
