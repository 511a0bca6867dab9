//! Resume positions keyed by source URL.
//!
//! Bounded, least-recently-used eviction. A missing entry means "start from
//! zero", never an error.

use crate::error::{PlaybackError, Result};
use lru::LruCache;
use std::num::NonZeroUsize;

pub struct PositionCache {
    entries: LruCache<String, u32>,
}

impl PositionCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Build a cache from a configured capacity, rejecting zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(PlaybackError::InvalidCapacity(capacity))
    }

    /// Record `position_ms` for `url`, returning the entry evicted to make
    /// room, if any.
    pub fn put(&mut self, url: &str, position_ms: u32) -> Option<(String, u32)> {
        match self.entries.push(url.to_string(), position_ms) {
            // `push` also reports the replaced value for an existing key.
            Some((key, _)) if key == url => None,
            evicted => evicted,
        }
    }

    /// Look up a position and mark the entry as most recently used.
    pub fn get(&mut self, url: &str) -> Option<u32> {
        self.entries.get(url).copied()
    }

    /// Look up a position without touching recency.
    pub fn peek(&self, url: &str) -> Option<u32> {
        self.entries.peek(url).copied()
    }

    pub fn remove(&mut self, url: &str) -> Option<u32> {
        self.entries.pop(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for PositionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
