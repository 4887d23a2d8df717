use crate::search::Graph;
use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Display)]
pub enum Owner {
    Ai,
    Player,
}

/// Who owns which tile
#[derive(Clone, Debug)]
pub struct Territory<N> {
    owners: HashMap<N, Owner>,
    ai: usize,
    player: usize,
}

impl<N: Copy + Eq + Hash> Default for Territory<N> {
    fn default() -> Self {
        Self {
            owners: HashMap::new(),
            ai: 0,
            player: 0,
        }
    }
}

impl<N: Copy + Eq + Hash> Territory<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self, tile: N) -> Option<Owner> {
        self.owners.get(&tile).copied()
    }

    pub fn claimed_by(&self, owner: Owner) -> usize {
        match owner {
            Owner::Ai => self.ai,
            Owner::Player => self.player,
        }
    }

    fn count_mut(&mut self, owner: Owner) -> &mut usize {
        match owner {
            Owner::Ai => &mut self.ai,
            Owner::Player => &mut self.player,
        }
    }

    /// Give `tile` to `owner`, taking it from the other side if needed.
    /// Returns the previous owner.
    pub fn claim(&mut self, tile: N, owner: Owner) -> Option<Owner> {
        let previous = match self.owners.entry(tile) {
            Occupied(mut entry) => Some(entry.insert(owner)),
            Vacant(entry) => {
                entry.insert(owner);
                None
            }
        };
        if previous != Some(owner) {
            if let Some(previous) = previous {
                *self.count_mut(previous) -= 1;
            }
            *self.count_mut(owner) += 1;
        }
        previous
    }

    /// Closest tile (in steps, ignoring costs) not owned by `owner`, `from`
    /// itself included. Ties go to the tile reached first when neighbors are
    /// visited in the graph's edge order.
    pub fn nearest_unclaimed<G>(&self, graph: &G, from: N, owner: Owner) -> Option<N>
    where
        G: Graph<Node = N>,
    {
        if !graph.contains(from) {
            return None;
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);

        while let Some(tile) = queue.pop_front() {
            if self.owner(tile) != Some(owner) {
                return Some(tile);
            }
            for edge in graph.neighbors(tile) {
                if seen.insert(edge.to) {
                    queue.push_back(edge.to);
                }
            }
        }
        None
    }
}
