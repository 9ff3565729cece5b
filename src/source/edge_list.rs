//! Parser for JSON edge-list files.
//!
//! An edge list is a JSON object mapping each analyzed type to the names of
//! the types it uses, exactly the shape written by the JSON exporter:
//!
//! ```json
//! {
//!   "App.Service": ["App.Repository", "App.Logger"],
//!   "App.Repository": ["App.Entity[]"]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::naming::is_framework_type;
use super::EdgeSource;
use crate::graph::{is_blank, TypeGraph};

/// Errors that can occur while loading raw dependency edges.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The content is valid JSON but not an edge list.
    #[error("Invalid edge list: {0}")]
    InvalidEdgeList(String),
}

/// Result type alias for edge source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Raw edges as they appear in an edge-list file.
pub type RawEdges = BTreeMap<String, Vec<String>>;

/// Loads edge-list files produced by an external metadata extractor.
#[derive(Debug, Clone, Copy)]
pub struct EdgeListSource {
    /// Drop dependencies on framework-owned types (`System*`, `Microsoft*`).
    pub filter_framework: bool,
}

impl Default for EdgeListSource {
    fn default() -> Self {
        Self {
            filter_framework: true,
        }
    }
}

impl EdgeListSource {
    /// Creates a source that keeps every dependency name as written.
    pub fn unfiltered() -> Self {
        Self {
            filter_framework: false,
        }
    }

    /// Builds a graph from already parsed raw edges.
    ///
    /// Types whose dependency list ends up empty are not recorded.
    pub fn build(&self, edges: &RawEdges) -> TypeGraph {
        let mut graph = TypeGraph::with_capacity(edges.len(), edges.len());
        let mut filtered = 0usize;

        for (type_name, dependencies) in edges {
            if is_blank(type_name) {
                tracing::warn!(dependencies = dependencies.len(), "skipping entry with blank type name");
                continue;
            }
            let kept = dependencies.iter().filter(|dependency| {
                let keep = !(self.filter_framework && is_framework_type(dependency));
                if !keep {
                    filtered += 1;
                }
                keep
            });
            if graph.add_dependencies(type_name, kept) == 0 {
                tracing::debug!(type_name = %type_name, "type has no recorded dependencies");
            }
        }

        if filtered > 0 {
            tracing::debug!(filtered, "dropped framework dependencies");
        }
        graph
    }
}

impl EdgeSource for EdgeListSource {
    fn load(&self, path: &Path) -> SourceResult<TypeGraph> {
        let edges = parse_file(path)?;
        let graph = self.build(&edges);
        tracing::debug!(
            path = %path.display(),
            types = graph.type_count(),
            edges = graph.edge_count(),
            "loaded edge list"
        );
        Ok(graph)
    }
}

/// Parses an edge-list file from a file path.
pub fn parse_file(path: &Path) -> SourceResult<RawEdges> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses an edge list from a string.
///
/// # Example
///
/// ```
/// use typedeps::source::parse_str;
///
/// let edges = parse_str(r#"{"A": ["B", "C"]}"#).unwrap();
/// assert_eq!(edges["A"], vec!["B", "C"]);
/// ```
pub fn parse_str(content: &str) -> SourceResult<RawEdges> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(SourceError::InvalidEdgeList(
            "expected a JSON object mapping type names to dependency lists".to_string(),
        ));
    }

    let edges: RawEdges = serde_json::from_value(value)?;
    Ok(edges)
}
