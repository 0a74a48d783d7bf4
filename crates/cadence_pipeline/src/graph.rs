//! Dependency graph construction from recorded intents.
//!
//! For each component type, the declaration lists are combined pairwise into
//! "must run before" edges according to a fixed precedence:
//!
//! - a type must be created before anything checks, reads, writes, or
//!   removes it;
//! - writes land before reads of the same type, so readers observe the
//!   current tick's mutations;
//! - every access precedes removal of the type, and removal precedes
//!   nothing.
//!
//! Two systems that only check, or only read, the same type are left
//! unordered. Edges across different component types are computed
//! independently and unioned.

use indexmap::IndexSet;

use crate::intent::{Intent, IntentTables, SystemId};

/// A precedence constraint: `before` must execute earlier than `after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// The system that must run first.
    pub before: SystemId,
    /// The system that must wait.
    pub after: SystemId,
}

/// Build the deduplicated edge set for the given declarations.
///
/// Component types are visited in first-declaration order and the result is
/// an insertion-ordered set, so identical inputs always yield the same edge
/// sequence. Self-edges (a system declaring, say, both Mutates and Reads on
/// one type) are skipped; a system never needs an edge to itself.
#[must_use]
pub fn build_edges(tables: &IntentTables) -> IndexSet<Edge> {
    let mut edges = IndexSet::new();

    for intents in tables.iter() {
        let initiates = intents.list(Intent::Initiates);
        let checks = intents.list(Intent::Checks);
        let reads = intents.list(Intent::Reads);
        let mutates = intents.list(Intent::Mutates);
        let terminates = intents.list(Intent::Terminates);

        link(&mut edges, initiates, checks);
        link(&mut edges, initiates, reads);
        link(&mut edges, initiates, mutates);
        link(&mut edges, initiates, terminates);

        link(&mut edges, mutates, reads);

        link(&mut edges, checks, terminates);
        link(&mut edges, reads, terminates);
        link(&mut edges, mutates, terminates);
    }

    edges
}

/// Add one edge for every (before, after) pair of the two lists.
fn link(edges: &mut IndexSet<Edge>, before: &[SystemId], after: &[SystemId]) {
    for &b in before {
        for &a in after {
            if b != a {
                edges.insert(Edge { before: b, after: a });
            }
        }
    }
}
