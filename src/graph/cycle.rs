//! Cycle detection over module dependency edges.

use std::collections::HashMap;

use super::{Graph, ModuleId};

/// Tracks the visitation state of a node during cycle detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

pub(super) fn find(graph: &Graph) -> Option<Vec<String>> {
    let mut detector = CycleDetector::new(graph);
    for module in graph.modules() {
        let id = module.id();
        if detector.is_visited(id) {
            continue;
        }
        if let Some(found) = detector.visit(id) {
            let names = found
                .into_iter()
                .filter_map(|id| graph.module(id).map(|m| m.name().to_owned()))
                .collect();
            return Some(canonicalize_cycle(names));
        }
    }
    None
}

struct CycleDetector<'a> {
    graph: &'a Graph,
    stack: Vec<ModuleId>,
    states: HashMap<ModuleId, VisitState>,
}

impl<'a> CycleDetector<'a> {
    fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            stack: Vec::new(),
            states: HashMap::new(),
        }
    }

    fn is_visited(&self, node: ModuleId) -> bool {
        matches!(self.states.get(&node), Some(VisitState::Visited))
    }

    /// Depth-first search from `root` using an explicit frame stack.
    ///
    /// Each frame holds a node and the position of the next outgoing edge to
    /// follow.
    fn visit(&mut self, root: ModuleId) -> Option<Vec<ModuleId>> {
        match self.states.get(&root) {
            Some(VisitState::Visited) => return None,
            Some(VisitState::Visiting) => return Some(self.cycle_to(root)),
            None => self.enter(root),
        }
        let mut frames = vec![(root, 0_usize)];

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            let Some(target) = self.target(node, next) else {
                frames.pop();
                self.stack.pop();
                self.states.insert(node, VisitState::Visited);
                continue;
            };
            frame.1 = next + 1;
            match self.states.get(&target) {
                Some(VisitState::Visited) => {}
                Some(VisitState::Visiting) => return Some(self.cycle_to(target)),
                None => {
                    self.enter(target);
                    frames.push((target, 0));
                }
            }
        }
        None
    }

    fn enter(&mut self, node: ModuleId) {
        self.states.insert(node, VisitState::Visiting);
        self.stack.push(node);
    }

    /// Target of the `position`-th outgoing edge of `node`.
    fn target(&self, node: ModuleId, position: usize) -> Option<ModuleId> {
        let id = *self.graph.module(node)?.dependencies().get(position)?;
        self.graph.dependency(id).map(|dep| dep.to())
    }

    /// The path from `node`'s position on the stack back to `node`.
    fn cycle_to(&self, node: ModuleId) -> Vec<ModuleId> {
        let idx = self
            .stack
            .iter()
            .position(|n| *n == node)
            .unwrap_or_else(|| {
                debug_assert!(false, "visiting node must be on the stack");
                0
            });
        let mut cycle: Vec<ModuleId> = self.stack.iter().skip(idx).copied().collect();
        cycle.push(node);
        cycle
    }
}

fn canonicalize_cycle(mut cycle: Vec<String>) -> Vec<String> {
    if cycle.len() < 2 {
        return cycle;
    }
    let len = cycle.len() - 1;
    let start = cycle
        .iter()
        .take(len)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(idx, _)| idx);
    let (prefix, suffix) = cycle.split_at_mut(len);
    prefix.rotate_left(start);
    if let (Some(first), Some(slot)) = (prefix.first().cloned(), suffix.first_mut()) {
        slot.clone_from(&first);
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, DependencyDecl};
    use crate::graph::GraphBuilder;

    fn graph(edges: &[(&str, &str)]) -> Graph {
        let decls: Vec<Declaration> = edges
            .iter()
            .map(|(from, to)| Declaration::from(DependencyDecl::new(*from, Some(*to), Vec::new())))
            .collect();
        GraphBuilder::build("modules.txt", &decls).expect("graph")
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let graph = graph(&[("a", "b"), ("b", "c"), ("a", "c")]);
        assert_eq!(graph.find_cycle(), None);
    }

    #[test]
    fn self_edge_is_a_cycle() {
        let graph = graph(&[("a", "a")]);
        assert_eq!(graph.find_cycle(), Some(names(&["a", "a"])));
    }

    #[test]
    fn cycle_is_rotated_to_smallest_name() {
        let graph = graph(&[("c", "a"), ("a", "b"), ("b", "c")]);
        assert_eq!(graph.find_cycle(), Some(names(&["a", "b", "c", "a"])));
    }

    #[test]
    fn detector_marks_nodes_visited_after_traversal() {
        let graph = graph(&[("a", "b")]);
        let a = graph.module_by_name("a").expect("a").id();
        let b = graph.module_by_name("b").expect("b").id();
        let mut detector = CycleDetector::new(&graph);
        assert!(detector.visit(a).is_none());
        assert!(detector.is_visited(a));
        assert!(detector.is_visited(b));
        assert!(detector.stack.is_empty());
    }

    fn chain(len: usize, close: bool) -> Graph {
        let mut decls: Vec<Declaration> = (0..len)
            .map(|i| {
                let from = format!("m{i}");
                let to = format!("m{}", i + 1);
                Declaration::from(DependencyDecl::new(from, Some(to.as_str()), Vec::new()))
            })
            .collect();
        if close {
            let last = format!("m{len}");
            decls.push(Declaration::from(DependencyDecl::new(
                last,
                Some("m0"),
                Vec::new(),
            )));
        }
        GraphBuilder::build("modules.txt", &decls).expect("graph")
    }

    #[test]
    fn long_chain_is_searched_without_deep_recursion() {
        let graph = chain(200_000, false);
        assert_eq!(graph.module_count(), 200_001);
        assert_eq!(graph.find_cycle(), None);
    }

    #[test]
    fn long_ring_is_reported_in_full() {
        let graph = chain(50_000, true);
        let cycle = graph.find_cycle().expect("cycle");
        assert_eq!(cycle.len(), 50_002);
        assert_eq!(cycle.first().map(String::as_str), Some("m0"));
        assert_eq!(cycle.last().map(String::as_str), Some("m0"));
    }

    #[test]
    fn diamond_revisits_are_not_cycles() {
        let graph = graph(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")]);
        assert_eq!(graph.find_cycle(), None);
    }

    #[test]
    fn canonicalize_cycle_handles_reverse_direction() {
        let canonical = canonicalize_cycle(names(&["c", "b", "a", "c"]));
        assert_eq!(canonical, names(&["a", "c", "b", "a"]));
    }
}
