//! Results keyed by document identity and valid for exactly one version.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Versioned<V> {
    version: u64,
    value: V,
}

/// A map whose entries answer only for the version they were computed at.
///
/// A lookup at any other version misses; the next insert replaces the stale
/// entry, so at most one version per key is ever held.
#[derive(Debug, Clone)]
pub struct VersionedCache<K, V> {
    entries: HashMap<K, Versioned<V>>,
}

impl<K, V> Default for VersionedCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> VersionedCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<Q>(&self, key: &Q, version: u64) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|entry| entry.version == version)
            .map(|entry| &entry.value)
    }

    pub fn insert(&mut self, key: K, version: u64, value: V) {
        self.entries.insert(key, Versioned { version, value });
    }

    /// Drop the entry for `key`. Returns whether one was held.
    pub fn invalidate<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
