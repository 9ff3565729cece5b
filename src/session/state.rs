//! On-disk shape of an analysis session.

use serde::{Deserialize, Serialize};

use crate::graph::{GraphSnapshot, TypeGraph};

/// Persisted state of one analysis session.
///
/// # Example
///
/// ```ignore
/// {
///   "sessionId": "0b6c...",
///   "dllPaths": ["/work/bin/App.edges.json"],
///   "generatedGraph": { "App.Service": ["App.Logger", "App.Repository"] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Identifier the state file is keyed by.
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Input module paths added so far, in the order they were added.
    #[serde(rename = "dllPaths", default)]
    pub input_paths: Vec<String>,

    /// The last generated graph, with sorted dependency lists.
    #[serde(rename = "generatedGraph", default)]
    pub generated_graph: Option<GraphSnapshot>,
}

impl SessionState {
    /// Creates an empty session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            input_paths: Vec::new(),
            generated_graph: None,
        }
    }

    /// Adds an input path unless an entry differing only in case exists.
    ///
    /// # Returns
    ///
    /// `true` if the path was added.
    pub fn add_input_path(&mut self, path: &str) -> bool {
        let lowered = path.to_lowercase();
        if self
            .input_paths
            .iter()
            .any(|existing| existing.to_lowercase() == lowered)
        {
            return false;
        }
        self.input_paths.push(path.to_string());
        true
    }

    /// Rebuilds the generated graph, if one has been stored.
    pub fn graph(&self) -> Option<TypeGraph> {
        self.generated_graph.as_ref().map(TypeGraph::from_snapshot)
    }
}
