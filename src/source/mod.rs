//! Raw dependency edge sources.
//!
//! The metadata extractor that walks compiled modules lives outside this
//! crate. Its output reaches the graph through an [`EdgeSource`], one call
//! per analyzed module; the resulting graphs are merged into one store.
//!
//! # Supported Formats
//!
//! - **JSON edge list** (`{"Type": ["Dependency", ...]}`) - Fully supported
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use typedeps::source::{EdgeListSource, EdgeSource};
//!
//! let graph = EdgeListSource::default().load(Path::new("MyApp.edges.json"))?;
//! println!("Found {} types", graph.type_count());
//! ```

pub mod edge_list;
pub mod naming;

use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::TypeGraph;

pub use edge_list::{parse_file, parse_str, EdgeListSource, RawEdges, SourceError, SourceResult};
pub use naming::{element_name, is_framework_type, namespace_of};

/// Produces the dependency edges of one analyzed module.
pub trait EdgeSource {
    /// Loads the module at `path` into a fresh graph.
    fn load(&self, path: &Path) -> SourceResult<TypeGraph>;
}

/// Loads every module and merges the results into one graph.
///
/// `on_load` is called with each path before it is loaded. Stops at the
/// first module that fails to load.
pub fn load_all<S, P, F>(source: &S, paths: &[P], mut on_load: F) -> Result<TypeGraph>
where
    S: EdgeSource + ?Sized,
    P: AsRef<Path>,
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut combined = TypeGraph::new();
    for path in paths {
        let path = path.as_ref();
        on_load(path)?;
        let graph = source.load(path).map_err(|source| Error::Analyze {
            path: path.display().to_string(),
            source,
        })?;
        let added = combined.merge(&graph);
        tracing::debug!(path = %path.display(), added, "merged module graph");
    }

    tracing::info!(
        modules = paths.len(),
        types = combined.type_count(),
        edges = combined.edge_count(),
        "loaded modules"
    );
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_all_merges_modules() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        fs::write(&first, r#"{"A": ["B"], "B": ["Shared"]}"#).unwrap();
        fs::write(&second, r#"{"C": ["Shared"], "B": ["Shared", "D"]}"#).unwrap();

        let mut seen = Vec::new();
        let graph = load_all(&EdgeListSource::default(), &[&first, &second], |path| {
            seen.push(path.to_path_buf());
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec![first.clone(), second.clone()]);
        assert_eq!(graph.type_count(), 3);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.dependencies_of("B").unwrap().len(), 2);
    }

    #[test]
    fn test_load_all_stops_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"A": ["B"]}"#).unwrap();
        let missing = dir.path().join("missing.json");

        let result = load_all(&EdgeListSource::default(), &[&good, &missing], |_| Ok(()));
        match result {
            Err(Error::Analyze { path, source }) => {
                assert_eq!(path, missing.display().to_string());
                assert!(matches!(source, SourceError::IoError(_)));
            }
            other => panic!("unexpected result: {:?}", other.map(|g| g.type_count())),
        }
    }

    #[test]
    fn test_load_all_propagates_callback_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"A": ["B"]}"#).unwrap();

        let result = load_all(&EdgeListSource::default(), &[good], |_| {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        });
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
