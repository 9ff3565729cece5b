//! Query engine for type dependency graphs.
//!
//! [`QueryEngine`] wraps a borrowed [`TypeGraph`](crate::graph::TypeGraph)
//! and answers every derived question about it: direct dependents and
//! dependencies, count filters, transitive closures and cycles.
//!
//! # Example
//!
//! ```rust
//! use typedeps::graph::TypeGraph;
//! use typedeps::query::{CountFilter, QueryEngine};
//!
//! let mut graph = TypeGraph::new();
//! graph.add_dependency("A", "B");
//! graph.add_dependency("C", "B");
//! graph.add_dependency("D", "E");
//!
//! let engine = QueryEngine::new(&graph);
//! let popular = engine.types_with_dependent_count_matching(">=2".parse::<CountFilter>().unwrap());
//! assert!(popular.contains("B"));
//! assert_eq!(popular.len(), 1);
//! ```

mod count_filter;
mod cycles;
mod engine;

pub use count_filter::{CountFilter, ExpressionError};
pub use engine::QueryEngine;
