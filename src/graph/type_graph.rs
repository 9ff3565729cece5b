//! Type dependency graph storage using petgraph.
//!
//! Type names are interned into a petgraph arena; each node keeps its own
//! outgoing and incoming adjacency lists. Nodes are only ever created as
//! endpoints of an edge, so a node with at least one outgoing edge is what
//! the rest of the crate calls a *key*.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Serialized form of a graph: type name -> sorted dependency names.
///
/// Only keys appear in a snapshot; types that are never a dependent are
/// implied by appearing in some dependency list.
pub type GraphSnapshot = BTreeMap<String, Vec<String>>;

/// Returns true if the identifier is empty or whitespace only.
pub(crate) fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// A directed graph of type-to-type dependencies.
///
/// Edges point from the dependent type to the type it uses. Each
/// (dependent, dependency) pair is stored at most once and there is no
/// removal operation.
///
/// # Example
///
/// ```rust
/// use typedeps::graph::TypeGraph;
///
/// let mut graph = TypeGraph::new();
/// graph.add_dependency("App.Service", "App.Repository");
/// graph.add_dependency("App.Service", "App.Logger");
/// graph.add_dependency("App.Service", "App.Logger"); // no-op
///
/// assert!(graph.contains_type("App.Service"));
/// assert!(!graph.contains_type("App.Logger")); // only a dependency target
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TypeGraph {
    /// The underlying directed graph
    graph: DiGraph<String, ()>,
    /// Maps type names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Expected number of distinct types
    /// * `edges` - Expected number of dependency edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Records that `dependent` uses `dependency`.
    ///
    /// Blank identifiers are ignored and repeating an existing edge does
    /// nothing. A type may depend on itself.
    ///
    /// # Returns
    ///
    /// `true` if a new edge was recorded.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) -> bool {
        if is_blank(dependent) || is_blank(dependency) {
            return false;
        }

        let from = self.intern(dependent);
        let to = self.intern(dependency);
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }

        self.graph.add_edge(from, to, ());
        true
    }

    /// Records every edge from `dependent` to the given dependencies.
    ///
    /// An empty sequence records nothing, so a type with no dependencies
    /// does not become a key through this call.
    ///
    /// # Returns
    ///
    /// The number of new edges recorded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typedeps::graph::TypeGraph;
    ///
    /// let mut graph = TypeGraph::new();
    /// assert_eq!(graph.add_dependencies("A", ["B", "C", "B"]), 2);
    /// assert_eq!(graph.add_dependencies("Lonely", Vec::<String>::new()), 0);
    /// assert!(!graph.contains_type("Lonely"));
    /// ```
    pub fn add_dependencies<I, S>(&mut self, dependent: &str, dependencies: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if is_blank(dependent) {
            return 0;
        }

        let mut added = 0;
        for dependency in dependencies {
            if self.add_dependency(dependent, dependency.as_ref()) {
                added += 1;
            }
        }
        added
    }

    /// Merges every edge of `other` into this graph.
    ///
    /// # Returns
    ///
    /// The number of edges that were new to this graph.
    pub fn merge(&mut self, other: &TypeGraph) -> usize {
        let mut added = 0;
        for (dependent, dependencies) in other.dependencies() {
            added += self.add_dependencies(dependent, dependencies);
        }
        added
    }

    /// Checks whether `name` has at least one recorded dependency.
    ///
    /// Types that only appear as dependency targets are not keys.
    pub fn contains_type(&self, name: &str) -> bool {
        self.node_indices
            .get(name)
            .is_some_and(|&idx| self.is_key(idx))
    }

    /// Gets the dependency set of a type.
    ///
    /// # Returns
    ///
    /// `None` if `name` is not a key. This is distinct from an empty set:
    /// it means the type was never recorded as depending on anything.
    pub fn dependencies_of(&self, name: &str) -> Option<HashSet<&str>> {
        let &idx = self.node_indices.get(name)?;
        if !self.is_key(idx) {
            return None;
        }

        Some(
            self.graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|target| self.graph[target].as_str())
                .collect(),
        )
    }

    /// Iterates over every key and its dependencies.
    ///
    /// Keys come in the order they were first seen; each dependency list
    /// holds distinct names in the order their edges were added.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, Vec<&str>)> + '_ {
        self.graph
            .node_indices()
            .filter(|&idx| self.is_key(idx))
            .map(|idx| {
                let targets = self
                    .adjacent(idx, Direction::Outgoing)
                    .into_iter()
                    .map(|target| self.graph[target].as_str())
                    .collect();
                (self.graph[idx].as_str(), targets)
            })
    }

    /// Returns every type in the graph, keys and dependency targets alike.
    pub fn all_types(&self) -> HashSet<&str> {
        self.graph.node_weights().map(String::as_str).collect()
    }

    /// Returns the number of distinct types (keys and targets).
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the number of keys, i.e. types with recorded dependencies.
    pub fn type_count(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&idx| self.is_key(idx))
            .count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Converts the graph into its persisted form with sorted dependency lists.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        self.dependencies()
            .map(|(dependent, dependencies)| {
                let mut sorted: Vec<String> =
                    dependencies.into_iter().map(str::to_string).collect();
                sorted.sort();
                (dependent.to_string(), sorted)
            })
            .collect()
    }

    /// Rebuilds a graph from its persisted form. Each list entry becomes one edge.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let edges = snapshot.values().map(Vec::len).sum();
        let mut graph = Self::with_capacity(snapshot.len(), edges);
        for (dependent, dependencies) in snapshot {
            graph.add_dependencies(dependent, dependencies);
        }
        graph
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    pub(crate) fn name_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub(crate) fn is_key(&self, idx: NodeIndex) -> bool {
        self.degree(idx, Direction::Outgoing) > 0
    }

    pub(crate) fn degree(&self, idx: NodeIndex, direction: Direction) -> usize {
        self.graph.neighbors_directed(idx, direction).count()
    }

    /// Neighbours of `idx` in edge insertion order.
    pub(crate) fn adjacent(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        // petgraph walks adjacency lists newest-first
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.reverse();
        neighbors
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    fn intern(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }

        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }
}
