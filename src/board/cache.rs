//! Bounded LRU cache for generated legal move lists.
//!
//! Keyed by a digest of the serialized position (which covers the board,
//! side to move, and any deploy session) plus the generation filter. Any
//! committed or undone mutation clears the cache.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};

use super::types::{Move, MoveFilter};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone, Debug, Default)]
pub(crate) struct MoveCache {
    map: HashMap<u64, Vec<Move>>,
    order: VecDeque<u64>,
    capacity: usize,
}

impl MoveCache {
    pub(crate) fn new() -> Self {
        MoveCache {
            map: HashMap::new(),
            order: VecDeque::new(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub(crate) fn get(&mut self, key: u64) -> Option<&Vec<Move>> {
        if self.map.contains_key(&key) {
            self.touch(key);
        }
        self.map.get(&key)
    }

    pub(crate) fn insert(&mut self, key: u64, moves: Vec<Move>) {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
                #[cfg(feature = "logging")]
                log::trace!("move cache evicted entry {oldest:#x}");
            }
        }
        if self.map.insert(key, moves).is_none() {
            self.order.push_back(key);
        } else {
            self.touch(key);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.order.iter().position(|&k| k == key) {
            self.order.remove(pos);
            self.order.push_back(key);
        }
    }
}

/// Digest of the cache key components.
pub(crate) fn digest(position_key: &str, filter: &MoveFilter) -> u64 {
    let mut hasher = DefaultHasher::new();
    position_key.hash(&mut hasher);
    filter.square.map(super::types::Square::index).hash(&mut hasher);
    filter.kind.map(|k| k.to_char()).hash(&mut hasher);
    hasher.finish()
}
