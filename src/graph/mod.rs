//! Graph module for type dependency modeling.
//!
//! This module provides the [`TypeGraph`] store: an interned directed graph
//! of "dependent uses dependency" edges between type names. It only knows
//! how to insert edges and look up direct neighbours; every derived query
//! lives in [`crate::query`].
//!
//! # Example
//!
//! ```rust
//! use typedeps::graph::TypeGraph;
//!
//! let mut graph = TypeGraph::new();
//! graph.add_dependencies("App.Controller", ["App.Service", "App.Model"]);
//! graph.add_dependency("App.Service", "App.Model");
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 3);
//! assert!(graph.dependencies_of("App.Model").is_none());
//! ```

mod type_graph;

pub use type_graph::{GraphSnapshot, TypeGraph};
pub(crate) use type_graph::is_blank;
