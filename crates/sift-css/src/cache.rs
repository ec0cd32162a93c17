//! Compiled selector cache.
//!
//! Selector text is usually a fixed program, so compiled selectors are kept
//! by their trimmed text. The cache holds at most `capacity` entries and
//! evicts the least recently used one when full.

use std::collections::HashMap;
use std::rc::Rc;

use crate::selector::{Selector, SelectorError, parse_selector};

/// Default number of compiled selectors kept.
pub const DEFAULT_CAPACITY: usize = 256;

/// Counters for a [`SelectorCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to compile
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    selector: Rc<Selector>,
    last_access: u64,
}

/// LRU map from selector text to compiled [`Selector`].
#[derive(Debug)]
pub struct SelectorCache {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SelectorCache {
    /// Create a cache holding at most `capacity` selectors (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(1024)),
            capacity,
            clock: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if selector text is cached without touching its recency.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text.trim())
    }

    /// The compiled form of `text`, compiling and caching it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the compile error for malformed text. Failures are not
    /// cached.
    pub fn get_or_compile(&mut self, text: &str) -> Result<Rc<Selector>, SelectorError> {
        let key = text.trim();
        self.clock += 1;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_access = self.clock;
            self.hits += 1;
            tracing::trace!(selector = key, "selector cache hit");
            return Ok(Rc::clone(&entry.selector));
        }

        self.misses += 1;
        tracing::debug!(selector = key, "selector cache miss");
        let selector = Rc::new(parse_selector(key)?);
        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        let _ = self.entries.insert(
            key.to_string(),
            CacheEntry {
                selector: Rc::clone(&selector),
                last_access: self.clock,
            },
        );
        Ok(selector)
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            let _ = self.entries.remove(&key);
            self.evictions += 1;
            tracing::debug!(selector = key, "selector cache eviction");
        }
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}
