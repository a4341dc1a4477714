//! Capacity-bounded LRU over query results.
//!
//! A plain map plus an access-ordered key deque. Lookup and insert both move
//! the key to the back; eviction pops the front. Capacity zero disables
//! caching entirely.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::dataset::GlyphRecord;

#[derive(Debug)]
pub struct QueryCache {
    capacity: usize,
    entries: HashMap<String, Vec<Rc<GlyphRecord>>>,
    /// Least recently used key at the front.
    order: VecDeque<String>,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        QueryCache {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch a cached result list, marking the key most recently used.
    pub fn get(&mut self, query: &str) -> Option<Vec<Rc<GlyphRecord>>> {
        let hit = self.entries.get(query)?.clone();
        self.touch(query);
        Some(hit)
    }

    /// Insert or refresh an entry, evicting the least recently used key once
    /// over capacity.
    pub fn put(&mut self, query: &str, results: Vec<Rc<GlyphRecord>>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(query.to_string(), results).is_some() {
            self.touch(query);
            return;
        }
        self.order.push_back(query.to_string());
        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn touch(&mut self, query: &str) {
        if let Some(pos) = self.order.iter().position(|key| key == query) {
            if let Some(key) = self.order.remove(pos) {
                self.order.push_back(key);
            }
        }
    }
}
