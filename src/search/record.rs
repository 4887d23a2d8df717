use super::Cost;
use std::cmp::Ordering;
use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// Which side of the open/closed partition a record is on
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Membership {
    Open,
    Closed,
}

/// Bookkeeping for one node discovered during a search
#[derive(Clone, Debug)]
pub struct SearchRecord<N> {
    pub node: N,
    pub cost_so_far: Cost,
    pub estimated_total_cost: Cost,
    /// Index of the predecessor's record, `None` only for the start
    pub came_from: Option<usize>,
    pub membership: Membership,
    heuristic: Cost,
    /// Position in the order records entered the open set, used to break ties
    entered: u64,
    /// Bumped every time the record is (re)queued, stale heap entries
    /// carry an older version
    version: u32,
}

impl<N> SearchRecord<N> {
    /// The heuristic value this record was created with
    pub fn heuristic(&self) -> Cost {
        self.heuristic
    }

    pub fn is_open(&self) -> bool {
        self.membership == Membership::Open
    }
}

// min-heap entry, BinaryHeap is a max-heap so the ordering is reversed
#[derive(Copy, Clone, Debug)]
struct OpenEntry {
    estimated_total_cost: Cost,
    entered: u64,
    index: usize,
    version: u32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimated_total_cost
            .total_cmp(&self.estimated_total_cost)
            .then_with(|| other.entered.cmp(&self.entered))
            .then_with(|| other.version.cmp(&self.version))
    }
}

/// Open and closed sets over an arena of records.
///
/// Records are never removed, only moved between the two sets, so indices
/// handed out by [`RecordStore::discover`] stay valid for the lifetime of
/// the store. Lookup by node goes through a hash map and the open set is a
/// binary heap with lazy invalidation: updating a record pushes a fresh entry
/// and the outdated one is dropped when it surfaces.
#[derive(Debug)]
pub struct RecordStore<N> {
    records: Vec<SearchRecord<N>>,
    index: HashMap<N, usize>,
    open: BinaryHeap<OpenEntry>,
    open_len: usize,
    next_entry: u64,
}

impl<N: Copy + Eq + Hash> Default for RecordStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq + Hash> RecordStore<N> {
    pub fn new() -> Self {
        Self {
            records: vec![],
            index: HashMap::new(),
            open: BinaryHeap::new(),
            open_len: 0,
            next_entry: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records currently in the open set
    pub fn open_len(&self) -> usize {
        self.open_len
    }

    pub fn records(&self) -> &[SearchRecord<N>] {
        &self.records
    }

    pub fn get(&self, index: usize) -> &SearchRecord<N> {
        &self.records[index]
    }

    pub fn find(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Create an open record for a node seen for the first time.
    /// Returns the index of the existing record if the node was already known.
    pub fn discover(
        &mut self,
        node: N,
        cost_so_far: Cost,
        heuristic: Cost,
        came_from: Option<usize>,
    ) -> usize {
        let index = match self.index.entry(node) {
            Occupied(entry) => return *entry.get(),
            Vacant(entry) => *entry.insert(self.records.len()),
        };

        self.records.push(SearchRecord {
            node,
            cost_so_far,
            estimated_total_cost: cost_so_far + heuristic,
            came_from,
            membership: Membership::Closed,
            heuristic,
            entered: 0,
            version: 0,
        });
        self.open_record(index);
        index
    }

    /// Overwrite cost, estimate and predecessor of a known record as a unit,
    /// keeping its heuristic value. A closed record is reopened and queues
    /// behind everything already open with the same estimate.
    pub fn improve(&mut self, index: usize, cost_so_far: Cost, came_from: usize) {
        let record = &mut self.records[index];
        debug_assert!(cost_so_far < record.cost_so_far);

        record.cost_so_far = cost_so_far;
        record.estimated_total_cost = cost_so_far + record.heuristic;
        record.came_from = Some(came_from);

        match record.membership {
            Membership::Closed => self.open_record(index),
            Membership::Open => self.push_entry(index),
        }
    }

    /// Remove and return the open record with the smallest estimated total
    /// cost, the earliest entered one on ties. The record stays a member of
    /// the open set until it is [closed](RecordStore::close).
    pub fn pop_min(&mut self) -> Option<usize> {
        while let Some(entry) = self.open.pop() {
            let record = &self.records[entry.index];
            if record.is_open() && record.version == entry.version {
                return Some(entry.index);
            }
        }
        None
    }

    pub fn close(&mut self, index: usize) {
        let record = &mut self.records[index];
        if record.is_open() {
            record.membership = Membership::Closed;
            self.open_len -= 1;
        }
    }

    fn open_record(&mut self, index: usize) {
        let record = &mut self.records[index];
        record.membership = Membership::Open;
        record.entered = self.next_entry;
        self.next_entry += 1;
        self.open_len += 1;
        self.push_entry(index);
    }

    fn push_entry(&mut self, index: usize) {
        let record = &mut self.records[index];
        record.version = record.version.wrapping_add(1);
        self.open.push(OpenEntry {
            estimated_total_cost: record.estimated_total_cost,
            entered: record.entered,
            index,
            version: record.version,
        });
    }
}
