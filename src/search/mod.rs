mod engine;
mod heuristic;
mod path;
mod record;

use static_assertions::assert_impl_all;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

pub use engine::{search, search_with_events, Search, Step};
pub use heuristic::{Admissibility, CrossProduct, Heuristic, Manhattan, Zero};
pub use path::{reconstruct, Path};
pub use record::{Membership, RecordStore, SearchRecord};

pub type Cost = f64;

/// A directed connection out of a node
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge<N, L> {
    pub label: L,
    pub to: N,
    pub cost: Cost,
}

/// Read-only view of a graph the engine can search.
///
/// Nodes are cheap handles owned by the graph. Edge costs have to be finite
/// and non-negative, the engine stops with an error on the first edge that
/// isn't.
pub trait Graph {
    type Node: Copy + Eq + Hash + Debug;
    type Label: Copy + Debug;

    fn contains(&self, node: Self::Node) -> bool;

    /// Outgoing edges of `node`, relaxed in the returned order
    fn neighbors(&self, node: Self::Node) -> Vec<Edge<Self::Node, Self::Label>>;
}

/// Progress of a search, in the order the state changes happen
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SearchEvent<N> {
    /// The node was selected from the open set
    NodeActivated(N),
    /// The node entered the open set or got a cheaper cost
    NodeDiscoveredOrUpdated(N, Cost),
    /// The node moved to the closed set
    NodeSettled(N),
}

impl<N: Copy> SearchEvent<N> {
    pub fn node(&self) -> N {
        match *self {
            SearchEvent::NodeActivated(n)
            | SearchEvent::NodeDiscoveredOrUpdated(n, _)
            | SearchEvent::NodeSettled(n) => n,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome<N> {
    Found {
        path: Path<N>,
        nodes_expanded: usize,
        elapsed: Duration,
    },
    NotFound {
        nodes_expanded: usize,
        elapsed: Duration,
    },
}

impl<N> SearchOutcome<N> {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn path(&self) -> Option<&Path<N>> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            SearchOutcome::NotFound { .. } => None,
        }
    }

    pub fn into_path(self) -> Option<Path<N>> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            SearchOutcome::NotFound { .. } => None,
        }
    }

    pub fn nodes_expanded(&self) -> usize {
        match self {
            SearchOutcome::Found { nodes_expanded, .. }
            | SearchOutcome::NotFound { nodes_expanded, .. } => *nodes_expanded,
        }
    }

    /// Diagnostic only
    pub fn elapsed(&self) -> Duration {
        match self {
            SearchOutcome::Found { elapsed, .. } | SearchOutcome::NotFound { elapsed, .. } => {
                *elapsed
            }
        }
    }

    pub(crate) fn set_elapsed(&mut self, value: Duration) {
        match self {
            SearchOutcome::Found { elapsed, .. } | SearchOutcome::NotFound { elapsed, .. } => {
                *elapsed = value
            }
        }
    }
}

assert_impl_all!(SearchOutcome<crate::basic::GridPoint>: Send, Sync);
assert_impl_all!(SearchEvent<crate::basic::GridPoint>: Send, Sync, Copy);
