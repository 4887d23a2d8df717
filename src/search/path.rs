use super::record::SearchRecord;
use super::Cost;
use crate::error::{BacklinkCycle, Result};
use std::collections::VecDeque;

/// Nodes from start to goal, both included, and the cost of walking them
#[derive(Clone, Debug, PartialEq)]
pub struct Path<N> {
    pub nodes: VecDeque<N>,
    pub cost: Cost,
}

impl<N: Copy> Path<N> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> Option<N> {
        self.nodes.front().copied()
    }

    pub fn goal(&self) -> Option<N> {
        self.nodes.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }
}

// reverse order iterator of records
struct Backlinks<'a, N> {
    records: &'a [SearchRecord<N>],
    next: Option<usize>,
}

impl<'a, N> Iterator for Backlinks<'a, N> {
    type Item = &'a SearchRecord<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = &self.records[self.next?];
        self.next = record.came_from;
        Some(record)
    }
}

/// Walk the backlinks from `goal` to the record without a predecessor.
///
/// A chain longer than the number of records has to revisit one of them,
/// that is reported as [`BacklinkCycle`] instead of looping forever.
pub fn reconstruct<N: Copy>(records: &[SearchRecord<N>], goal: usize) -> Result<Path<N>> {
    let mut nodes = VecDeque::new();
    let mut reached_start = false;

    for record in (Backlinks {
        records,
        next: Some(goal),
    })
    .take(records.len() + 1)
    {
        nodes.push_front(record.node);
        if record.came_from.is_none() {
            reached_start = true;
        }
    }

    if !reached_start {
        return Err(BacklinkCycle {
            steps: nodes.len(),
            records: records.len(),
        }
        .into());
    }

    Ok(Path {
        nodes,
        cost: records[goal].cost_so_far,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::search::record::RecordStore;

    #[test]
    fn walks_back_to_the_start() {
        let mut store = RecordStore::new();
        let a = store.discover('a', 0., 0., None);
        let b = store.discover('b', 1., 0., Some(a));
        let c = store.discover('c', 3., 0., Some(b));
        store.discover('x', 7., 0., Some(a));

        let path = reconstruct(store.records(), c).unwrap();
        assert_eq!(path.nodes, ['a', 'b', 'c']);
        assert_eq!(path.cost, 3.);
        assert_eq!(path.start(), Some('a'));
        assert_eq!(path.goal(), Some('c'));

        let trivial = reconstruct(store.records(), a).unwrap();
        assert_eq!(trivial.nodes, ['a']);
        assert_eq!(trivial.cost, 0.);
    }

    #[test]
    fn cycle_is_an_internal_error() {
        let mut store = RecordStore::new();
        let a = store.discover('a', 0., 0., None);
        let b = store.discover('b', 2., 0., Some(a));
        let c = store.discover('c', 3., 0., Some(b));
        // corrupt the chain: b <- c <- b
        store.improve(b, 1., c);

        let err = reconstruct(store.records(), c).unwrap_err();
        assert!(err.is_internal());
        match err.error_type() {
            ErrorType::BacklinkCycle(cycle) => {
                assert_eq!(cycle.records, 3);
                assert_eq!(cycle.steps, 4);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
