//! Read-only queries over a [`TypeGraph`].

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::HashSet;

use super::CountFilter;
use crate::graph::{is_blank, TypeGraph};

/// Answers derived queries over one [`TypeGraph`].
///
/// The engine holds a shared borrow of the store and never mutates it or
/// caches anything, so every method is a pure function of the graph's
/// current contents. Blank or unknown type names never fail: they produce
/// an empty result, a zero count or `None`.
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
/// use typedeps::graph::TypeGraph;
/// use typedeps::query::QueryEngine;
///
/// let mut graph = TypeGraph::new();
/// graph.add_dependencies("A", ["B", "C"]);
/// graph.add_dependency("B", "D");
///
/// let engine = QueryEngine::new(&graph);
/// let expected: HashSet<String> = ["B", "C", "D"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(engine.transitive_dependencies_of("A"), expected);
/// assert_eq!(engine.dependent_count("D"), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'g> {
    pub(super) graph: &'g TypeGraph,
}

impl<'g> QueryEngine<'g> {
    /// Creates an engine over `graph`.
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self { graph }
    }

    /// Returns the graph this engine reads from.
    pub fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    /// Gets every type whose dependency set contains `type_name`.
    pub fn dependents_of(&self, type_name: &str) -> HashSet<String> {
        self.direct(type_name, Direction::Incoming)
    }

    /// Gets the direct dependencies of `type_name`.
    ///
    /// # Returns
    ///
    /// `None` if the name is blank or the type is not a key of the graph.
    /// Callers must read `None` as "type not found", not "no dependencies".
    pub fn dependencies_of(&self, type_name: &str) -> Option<HashSet<String>> {
        if is_blank(type_name) {
            return None;
        }

        self.graph
            .dependencies_of(type_name)
            .map(|deps| deps.into_iter().map(str::to_string).collect())
    }

    /// Number of types that directly depend on `type_name`.
    pub fn dependent_count(&self, type_name: &str) -> usize {
        self.count(type_name, Direction::Incoming)
    }

    /// Number of types `type_name` directly depends on.
    pub fn dependency_count(&self, type_name: &str) -> usize {
        self.count(type_name, Direction::Outgoing)
    }

    /// Every type in the graph: keys plus all dependency targets.
    pub fn all_types(&self) -> HashSet<String> {
        self.graph
            .all_types()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Keys that no other key depends on.
    ///
    /// Only keys are candidates, so pure dependency targets never appear
    /// here. A type that depends on itself has a dependent and is excluded.
    pub fn types_with_no_dependents(&self) -> HashSet<String> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.is_key(idx))
            .filter(|&idx| self.graph.degree(idx, Direction::Incoming) == 0)
            .map(|idx| self.graph.name_of(idx).to_string())
            .collect()
    }

    /// Types whose dependent count satisfies `filter`.
    pub fn types_with_dependent_count_matching(&self, filter: CountFilter) -> HashSet<String> {
        self.types_matching(filter, Direction::Incoming)
    }

    /// Types whose dependency count satisfies `filter`.
    pub fn types_with_dependency_count_matching(&self, filter: CountFilter) -> HashSet<String> {
        self.types_matching(filter, Direction::Outgoing)
    }

    /// Types with exactly `count` dependents.
    pub fn types_with_dependent_count(&self, count: usize) -> HashSet<String> {
        self.types_with_dependent_count_matching(CountFilter::Exact(count))
    }

    /// Types with more than `min` dependents.
    pub fn types_with_dependent_count_greater_than(&self, min: usize) -> HashSet<String> {
        self.types_with_dependent_count_matching(CountFilter::GreaterThan(min))
    }

    /// Types with at least `min` dependents.
    pub fn types_with_dependent_count_greater_than_or_equal(&self, min: usize) -> HashSet<String> {
        self.types_with_dependent_count_matching(CountFilter::GreaterThanOrEqual(min))
    }

    /// Types with fewer than `max` dependents.
    pub fn types_with_dependent_count_less_than(&self, max: usize) -> HashSet<String> {
        self.types_with_dependent_count_matching(CountFilter::LessThan(max))
    }

    /// Types with at most `max` dependents.
    pub fn types_with_dependent_count_less_than_or_equal(&self, max: usize) -> HashSet<String> {
        self.types_with_dependent_count_matching(CountFilter::LessThanOrEqual(max))
    }

    /// Types with between `min` and `max` dependents, both inclusive.
    pub fn types_with_dependent_count_range(&self, min: usize, max: usize) -> HashSet<String> {
        self.types_with_dependent_count_matching(CountFilter::Range(min, max))
    }

    /// Types with exactly `count` dependencies.
    pub fn types_with_dependency_count(&self, count: usize) -> HashSet<String> {
        self.types_with_dependency_count_matching(CountFilter::Exact(count))
    }

    /// Types with more than `min` dependencies.
    pub fn types_with_dependency_count_greater_than(&self, min: usize) -> HashSet<String> {
        self.types_with_dependency_count_matching(CountFilter::GreaterThan(min))
    }

    /// Types with at least `min` dependencies.
    pub fn types_with_dependency_count_greater_than_or_equal(
        &self,
        min: usize,
    ) -> HashSet<String> {
        self.types_with_dependency_count_matching(CountFilter::GreaterThanOrEqual(min))
    }

    /// Types with fewer than `max` dependencies.
    pub fn types_with_dependency_count_less_than(&self, max: usize) -> HashSet<String> {
        self.types_with_dependency_count_matching(CountFilter::LessThan(max))
    }

    /// Types with at most `max` dependencies.
    pub fn types_with_dependency_count_less_than_or_equal(&self, max: usize) -> HashSet<String> {
        self.types_with_dependency_count_matching(CountFilter::LessThanOrEqual(max))
    }

    /// Types with between `min` and `max` dependencies, both inclusive.
    pub fn types_with_dependency_count_range(&self, min: usize, max: usize) -> HashSet<String> {
        self.types_with_dependency_count_matching(CountFilter::Range(min, max))
    }

    /// Every type reachable from `type_name` by following dependency edges.
    ///
    /// The origin is never part of the result, even when a cycle leads
    /// back to it.
    pub fn transitive_dependencies_of(&self, type_name: &str) -> HashSet<String> {
        self.reachable(type_name, Direction::Outgoing)
    }

    /// Every type that reaches `type_name` by following dependency edges.
    pub fn transitive_dependents_of(&self, type_name: &str) -> HashSet<String> {
        self.reachable(type_name, Direction::Incoming)
    }

    fn direct(&self, type_name: &str, direction: Direction) -> HashSet<String> {
        if is_blank(type_name) {
            return HashSet::new();
        }
        let Some(idx) = self.graph.index_of(type_name) else {
            return HashSet::new();
        };

        self.graph
            .adjacent(idx, direction)
            .into_iter()
            .map(|neighbor| self.graph.name_of(neighbor).to_string())
            .collect()
    }

    fn count(&self, type_name: &str, direction: Direction) -> usize {
        if is_blank(type_name) {
            return 0;
        }

        self.graph
            .index_of(type_name)
            .map_or(0, |idx| self.graph.degree(idx, direction))
    }

    fn types_matching(&self, filter: CountFilter, direction: Direction) -> HashSet<String> {
        self.graph
            .node_indices()
            .filter(|&idx| filter.matches(self.graph.degree(idx, direction)))
            .map(|idx| self.graph.name_of(idx).to_string())
            .collect()
    }

    /// Depth-first reachability with an explicit stack.
    fn reachable(&self, type_name: &str, direction: Direction) -> HashSet<String> {
        if is_blank(type_name) {
            return HashSet::new();
        }
        let Some(origin) = self.graph.index_of(type_name) else {
            return HashSet::new();
        };

        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut stack: Vec<NodeIndex> = self.graph.adjacent(origin, direction);
        while let Some(current) = stack.pop() {
            if current == origin || !seen.insert(current) {
                continue;
            }
            stack.extend(self.graph.adjacent(current, direction));
        }

        seen.into_iter()
            .map(|idx| self.graph.name_of(idx).to_string())
            .collect()
    }
}
