//! Id-keyed record collection.
//!
//! Each table has:
//! - Records keyed by id, iterated in ascending id order
//! - A monotonic record ID sequence generator

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

/// Records of one kind keyed by id, plus the next id to assign.
///
/// Ids are handed out in increasing order and never reused, so ascending
/// id order is also insertion order.
#[derive(Debug, Clone)]
pub struct Table<T> {
    records: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Table<T> {
    /// Creates an empty table whose first id is 1.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocates the next record ID.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Returns the id the next allocation will hand out.
    pub fn current_next_id(&self) -> u64 {
        self.next_id
    }

    /// Returns the number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if a record with `id` exists.
    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    /// Looks up a record by id.
    pub fn get(&self, id: u64) -> Option<&T> {
        self.records.get(&id)
    }

    /// Looks up a record by id for in-place mutation.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.records.get_mut(&id)
    }

    /// Inserts or replaces the record stored under `id`.
    ///
    /// The id sequence is advanced past `id` so later allocations never
    /// collide with it.
    pub fn insert(&mut self, id: u64, record: T) -> &mut T {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        match self.records.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(record);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(record),
        }
    }

    /// Removes and returns the record stored under `id`.
    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.records.remove(&id)
    }

    /// Iterates over all records in insertion order.
    pub fn iter(&self) -> btree_map::Values<'_, u64, T> {
        self.records.values()
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
