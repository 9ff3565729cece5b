//! Circular dependency detection.

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::HashSet;

use super::QueryEngine;

/// One pending node of the depth-first walk.
struct Frame {
    node: NodeIndex,
    targets: Vec<NodeIndex>,
    next: usize,
}

impl<'g> QueryEngine<'g> {
    /// Finds circular dependencies with a depth-first search over all types.
    ///
    /// Each cycle is returned as the path from the type where the loop was
    /// entered back to itself, so the first and last entries are equal and
    /// every consecutive pair is a direct dependency edge:
    ///
    /// ```rust
    /// use typedeps::graph::TypeGraph;
    /// use typedeps::query::QueryEngine;
    ///
    /// let mut graph = TypeGraph::new();
    /// graph.add_dependency("A", "B");
    /// graph.add_dependency("B", "A");
    ///
    /// let cycles = QueryEngine::new(&graph).circular_dependencies();
    /// assert_eq!(cycles, vec![vec!["A", "B", "A"]]);
    /// ```
    ///
    /// Roots are tried in the order types were first added and a type is
    /// never explored twice, so the walk reports at least one cycle through
    /// every cyclic region but not every elementary cycle, and the reported
    /// starting points depend on insertion order. Use
    /// [`cyclic_components`](Self::cyclic_components) to see every type that
    /// takes part in some cycle.
    pub fn circular_dependencies(&self) -> Vec<Vec<String>> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut on_stack: HashSet<NodeIndex> = HashSet::new();
        let mut path: Vec<NodeIndex> = Vec::new();
        let mut cycles = Vec::new();

        for root in self.graph.node_indices() {
            if !visited.insert(root) {
                continue;
            }
            on_stack.insert(root);
            path.push(root);
            let mut frames = vec![self.frame(root)];

            while let Some(frame) = frames.last_mut() {
                match frame.targets.get(frame.next).copied() {
                    Some(target) => {
                        frame.next += 1;
                        if visited.insert(target) {
                            on_stack.insert(target);
                            path.push(target);
                            frames.push(self.frame(target));
                        } else if on_stack.contains(&target) {
                            cycles.push(self.close_cycle(&path, target));
                        }
                    }
                    None => {
                        on_stack.remove(&frame.node);
                        frames.pop();
                        path.pop();
                    }
                }
            }
        }

        cycles
    }

    /// Groups of types that are mutually reachable through dependency edges.
    ///
    /// Returns every strongly connected component containing a cycle, i.e.
    /// with more than one type or a single type that depends on itself.
    /// Names within a group are sorted and groups are ordered by their first
    /// name.
    pub fn cyclic_components(&self) -> Vec<Vec<String>> {
        let inner = self.graph.inner();
        let mut components: Vec<Vec<String>> = tarjan_scc(inner)
            .into_iter()
            .filter(|scc| scc.len() > 1 || inner.find_edge(scc[0], scc[0]).is_some())
            .map(|scc| {
                let mut names: Vec<String> = scc
                    .into_iter()
                    .map(|idx| self.graph.name_of(idx).to_string())
                    .collect();
                names.sort();
                names
            })
            .collect();
        components.sort();
        components
    }

    /// Returns true if any type participates in a dependency cycle.
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(self.graph.inner())
    }

    fn frame(&self, node: NodeIndex) -> Frame {
        Frame {
            node,
            targets: self.graph.adjacent(node, Direction::Outgoing),
            next: 0,
        }
    }

    fn close_cycle(&self, path: &[NodeIndex], target: NodeIndex) -> Vec<String> {
        let start = path.iter().position(|&idx| idx == target).unwrap_or(0);
        path[start..]
            .iter()
            .chain(std::iter::once(&target))
            .map(|&idx| self.graph.name_of(idx).to_string())
            .collect()
    }
}
