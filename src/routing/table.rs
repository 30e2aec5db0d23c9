//! Route table snapshot.
//!
//! # Responsibilities
//! - Hold the merged, normalized route mapping in insertion order
//! - Keep the raw persisted records used to build it
//! - Answer key lookups and ordered iteration
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Re-inserting an existing key replaces the value but keeps its position
//! - Replaced wholesale by the refresh controller, never mutated in place

use std::collections::HashMap;
use std::time::SystemTime;

use crate::routing::entry::RouteEntry;
use crate::store::RouteRecord;

/// Insertion-ordered map from route key to entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMap {
    entries: Vec<(String, RouteEntry)>,
    index: HashMap<String, usize>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original slot.
    pub fn insert(&mut self, key: String, entry: RouteEntry) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = entry,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, entry));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&RouteEntry> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for RouteMap {
    type Item = (String, RouteEntry);
    type IntoIter = std::vec::IntoIter<(String, RouteEntry)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, RouteEntry)> for RouteMap {
    fn from_iter<I: IntoIterator<Item = (String, RouteEntry)>>(iter: I) -> Self {
        let mut map = RouteMap::new();
        for (key, entry) in iter {
            map.insert(key, entry);
        }
        map
    }
}

/// An immutable, published route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: RouteMap,
    records: Vec<RouteRecord>,
    generation: u64,
    degraded: bool,
    built_at: SystemTime,
}

impl RouteTable {
    pub fn new(routes: RouteMap, records: Vec<RouteRecord>, generation: u64, degraded: bool) -> Self {
        Self {
            routes,
            records,
            generation,
            degraded,
            built_at: SystemTime::now(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RouteEntry> {
        self.routes.get(key)
    }

    /// Routes in table order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.routes.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Raw persisted records this table was built from.
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the store failed and only static routes are present.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn built_at(&self) -> SystemTime {
        self.built_at
    }

    /// Compare routes only (keys, values and order), ignoring build metadata.
    pub fn same_routes(&self, other: &RouteTable) -> bool {
        self.routes == other.routes
    }
}
