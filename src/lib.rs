//! typedeps - type-level dependency graph analyzer
//!
//! This crate records which types use which other types across compiled
//! modules, answers structural queries over that graph (direct and
//! transitive neighbours, count filters, circular dependencies) and
//! renders it as DOT, JSON, Mermaid or HTML.
//!
//! Module metadata reaches the crate as JSON edge lists produced by an
//! external extractor; see [`source`]. The [`cli`] drives a file-backed
//! session workflow, also served to agents as MCP tools by [`mcp`].

pub mod cli;
pub mod error;
pub mod export;
pub mod graph;
pub mod mcp;
pub mod query;
pub mod session;
pub mod source;
pub mod suggest;

pub use error::{Error, Result};
pub use graph::TypeGraph;
pub use query::{CountFilter, QueryEngine};
