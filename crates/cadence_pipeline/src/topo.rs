//! Deterministic topological sorting of the system graph.
//!
//! Kahn's algorithm over arena indices: the ready queue is seeded with every
//! system that is never the `after` side of an edge, in registration order,
//! and drained FIFO. The same systems plus the same edges therefore always
//! produce the same order. Leftover edges mean the declarations contradict
//! each other; that is reported, never resolved by tie-breaking.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use crate::graph::Edge;
use crate::intent::SystemId;

/// A failed sort: the edges that could never be retired, plus the root set
/// the sort started from.
#[derive(Debug, Clone)]
pub struct Unsortable {
    /// Edges whose `before` system never became ready.
    pub unresolved: Vec<Edge>,
    /// The systems that had no prerequisites at the start.
    pub roots: Vec<SystemId>,
}

/// Order `systems` so that every edge's `before` lands earlier than its
/// `after`.
///
/// `systems` must be given in registration order and every edge endpoint
/// must appear in it. On success, the result contains each system exactly
/// once.
///
/// # Errors
///
/// Returns [`Unsortable`] when the edges contain a cycle.
pub fn sort(systems: &[SystemId], edges: &IndexSet<Edge>) -> Result<Vec<SystemId>, Unsortable> {
    let mut incoming: IndexMap<SystemId, usize> = systems.iter().map(|&s| (s, 0)).collect();
    let mut outgoing: IndexMap<SystemId, Vec<Edge>> = IndexMap::new();
    for &edge in edges {
        incoming[&edge.after] += 1;
        outgoing.entry(edge.before).or_default().push(edge);
    }

    let mut ready: VecDeque<SystemId> = systems
        .iter()
        .copied()
        .filter(|s| incoming[s] == 0)
        .collect();
    let roots: Vec<SystemId> = ready.iter().copied().collect();

    let mut result = Vec::with_capacity(systems.len());
    while let Some(system) = ready.pop_front() {
        result.push(system);
        let Some(out) = outgoing.get(&system) else {
            continue;
        };
        for edge in out {
            let count = &mut incoming[&edge.after];
            *count -= 1;
            if *count == 0 {
                ready.push_back(edge.after);
            }
        }
    }

    if result.len() != systems.len() {
        // A system is stuck exactly when its incoming count never reached
        // zero; an edge is unresolved exactly when its `before` is stuck.
        let unresolved = edges
            .iter()
            .filter(|e| incoming[&e.before] > 0)
            .copied()
            .collect();
        return Err(Unsortable { unresolved, roots });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<SystemId> {
        (0..n).map(SystemId).collect()
    }

    fn edge_set(pairs: &[(usize, usize)]) -> IndexSet<Edge> {
        pairs
            .iter()
            .map(|&(before, after)| Edge {
                before: SystemId(before),
                after: SystemId(after),
            })
            .collect()
    }

    #[test]
    fn test_no_edges_keeps_registration_order() {
        let systems = ids(4);
        let order = sort(&systems, &IndexSet::new()).unwrap();
        assert_eq!(order, systems);
    }

    #[test]
    fn test_linear_chain() {
        let systems = ids(3);
        let order = sort(&systems, &edge_set(&[(2, 1), (1, 0)])).unwrap();
        assert_eq!(order, vec![SystemId(2), SystemId(1), SystemId(0)]);
    }

    #[test]
    fn test_diamond_breaks_ties_by_registration_order() {
        // 0 -> {1, 2} -> 3, with 1 registered before 2.
        let systems = ids(4);
        let order = sort(&systems, &edge_set(&[(0, 1), (0, 2), (1, 3), (2, 3)])).unwrap();
        assert_eq!(
            order,
            vec![SystemId(0), SystemId(1), SystemId(2), SystemId(3)]
        );
    }

    #[test]
    fn test_each_system_appears_exactly_once() {
        let systems = ids(5);
        let order = sort(&systems, &edge_set(&[(4, 0), (3, 1)])).unwrap();
        let mut seen = order.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), systems.len());
    }

    #[test]
    fn test_two_system_cycle_is_reported() {
        let systems = ids(2);
        let err = sort(&systems, &edge_set(&[(0, 1), (1, 0)])).unwrap_err();
        assert_eq!(err.unresolved.len(), 2);
        assert!(err.roots.is_empty());
    }

    #[test]
    fn test_cycle_behind_a_root_keeps_resolved_edges_out() {
        // 0 -> 1 <-> 2: the root edge retires, the cycle stays.
        let systems = ids(3);
        let err = sort(&systems, &edge_set(&[(0, 1), (1, 2), (2, 1)])).unwrap_err();
        assert_eq!(err.roots, vec![SystemId(0)]);
        assert_eq!(err.unresolved, vec![
            Edge {
                before: SystemId(1),
                after: SystemId(2)
            },
            Edge {
                before: SystemId(2),
                after: SystemId(1)
            },
        ]);
    }

    #[test]
    fn test_sort_is_repeatable() {
        let systems = ids(6);
        let edges = edge_set(&[(5, 0), (4, 1), (3, 2), (5, 3)]);
        let first = sort(&systems, &edges).unwrap();
        let second = sort(&systems, &edges).unwrap();
        assert_eq!(first, second);
    }
}
