//! Keyed container primitives used by the storage backends.
//!
//! Two interchangeable families implement the same ordered-set/ordered-map
//! contract:
//!
//! - [`SortedVecFamily`]: a sorted `Vec` probed by binary search. Smallest
//!   footprint and the fastest iteration; insert/remove shift the tail, so it
//!   suits graphs that are built once and queried many times.
//! - [`BTreeFamily`]: `std` B-trees. Logarithmic insert/remove for graphs that
//!   keep mutating.
//!
//! Both iterate in ascending key order, which is what keeps traversal output
//! identical across backends.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An ordered set of copyable keys.
pub trait OrderedSet<K>: Default + Clone + fmt::Debug {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &K) -> bool;

    /// Insert `key` if absent. Returns `true` if the set changed.
    fn insert(&mut self, key: K) -> bool;

    /// Remove `key` if present. Returns `true` if the set changed.
    fn remove(&mut self, key: &K) -> bool;

    /// Keys in ascending order.
    fn iter(&self) -> impl Iterator<Item = K> + '_;

    fn first(&self) -> Option<K>;

    fn last(&self) -> Option<K>;

    fn reserve(&mut self, _additional: usize) {}
}

/// An ordered map from copyable keys to values.
pub trait OrderedMap<K, V>: Default + Clone + fmt::Debug {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Insert `(key, value)` if `key` is absent. An existing entry is left
    /// untouched. Returns `true` if the map changed.
    fn insert(&mut self, key: K, value: V) -> bool;

    fn remove(&mut self, key: &K) -> Option<V>;

    /// Entries in ascending key order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (K, &'a V)> + 'a
    where
        V: 'a;

    fn keys<'a>(&'a self) -> impl Iterator<Item = K> + 'a
    where
        V: 'a,
    {
        self.iter().map(|(k, _)| k)
    }

    fn last_key(&self) -> Option<K>;

    fn reserve(&mut self, _additional: usize) {}

    fn clear(&mut self);
}

// ---------------------------------------------------------------------------
// Sorted-sequence variants
// ---------------------------------------------------------------------------

/// Set stored as a sorted, deduplicated `Vec`.
#[derive(Clone, PartialEq, Eq)]
pub struct SortedVecSet<K> {
    items: Vec<K>,
}

impl<K> SortedVecSet<K> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn as_slice(&self) -> &[K] {
        &self.items
    }
}

impl<K> Default for SortedVecSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for SortedVecSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

impl<K: Ord + Copy + fmt::Debug> OrderedSet<K> for SortedVecSet<K> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.items.binary_search(key).is_ok()
    }

    fn insert(&mut self, key: K) -> bool {
        match self.items.binary_search(&key) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, key);
                true
            }
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        match self.items.binary_search(key) {
            Ok(pos) => {
                self.items.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.items.iter().copied()
    }

    fn first(&self) -> Option<K> {
        self.items.first().copied()
    }

    fn last(&self) -> Option<K> {
        self.items.last().copied()
    }

    fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }
}

/// Map stored as a `Vec` of entries sorted by key.
#[derive(Clone, PartialEq, Eq)]
pub struct SortedVecMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> SortedVecMap<K, V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: Ord, V> SortedVecMap<K, V> {
    fn position(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }
}

impl<K, V> Default for SortedVecMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SortedVecMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K, V> OrderedMap<K, V> for SortedVecMap<K, V>
where
    K: Ord + Copy + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.position(key).ok().map(|pos| &self.entries[pos].1)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.position(key) {
            Ok(pos) => Some(&mut self.entries[pos].1),
            Err(_) => None,
        }
    }

    fn insert(&mut self, key: K, value: V) -> bool {
        match self.position(&key) {
            Ok(_) => false,
            Err(pos) => {
                self.entries.insert(pos, (key, value));
                true
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        match self.position(key) {
            Ok(pos) => Some(self.entries.remove(pos).1),
            Err(_) => None,
        }
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (K, &'a V)> + 'a
    where
        V: 'a,
    {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    fn last_key(&self) -> Option<K> {
        self.entries.last().map(|(k, _)| *k)
    }

    fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Tree variants
// ---------------------------------------------------------------------------

impl<K: Ord + Copy + fmt::Debug> OrderedSet<K> for BTreeSet<K> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn contains(&self, key: &K) -> bool {
        BTreeSet::contains(self, key)
    }

    fn insert(&mut self, key: K) -> bool {
        BTreeSet::insert(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        BTreeSet::remove(self, key)
    }

    fn iter(&self) -> impl Iterator<Item = K> + '_ {
        BTreeSet::iter(self).copied()
    }

    fn first(&self) -> Option<K> {
        BTreeSet::first(self).copied()
    }

    fn last(&self) -> Option<K> {
        BTreeSet::last(self).copied()
    }
}

impl<K, V> OrderedMap<K, V> for BTreeMap<K, V>
where
    K: Ord + Copy + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> bool {
        match self.entry(key) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BTreeMap::remove(self, key)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (K, &'a V)> + 'a
    where
        V: 'a,
    {
        BTreeMap::iter(self).map(|(k, v)| (*k, v))
    }

    fn last_key(&self) -> Option<K> {
        BTreeMap::last_key_value(self).map(|(k, _)| *k)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

/// Chooses a set type and a map type together, so a backend can be
/// instantiated over either container strategy.
pub trait ContainerFamily: Clone + Copy + fmt::Debug + Default + 'static {
    type Set<K: Ord + Copy + fmt::Debug>: OrderedSet<K>;
    type Map<K: Ord + Copy + fmt::Debug, V: Clone + fmt::Debug>: OrderedMap<K, V>;

    /// Short name used in log output.
    const NAME: &'static str;
}

/// Sorted `Vec` containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedVecFamily;

impl ContainerFamily for SortedVecFamily {
    type Set<K: Ord + Copy + fmt::Debug> = SortedVecSet<K>;
    type Map<K: Ord + Copy + fmt::Debug, V: Clone + fmt::Debug> = SortedVecMap<K, V>;

    const NAME: &'static str = "sorted-vec";
}

/// `std::collections` B-tree containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BTreeFamily;

impl ContainerFamily for BTreeFamily {
    type Set<K: Ord + Copy + fmt::Debug> = BTreeSet<K>;
    type Map<K: Ord + Copy + fmt::Debug, V: Clone + fmt::Debug> = BTreeMap<K, V>;

    const NAME: &'static str = "btree";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_set<S: OrderedSet<u64>>() {
        let mut set = S::default();
        assert!(set.is_empty());
        assert!(set.insert(5));
        assert!(set.insert(1));
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(set.first(), Some(1));
        assert_eq!(set.last(), Some(5));
        assert!(set.contains(&3));
        assert!(set.remove(&3));
        assert!(!set.remove(&3));
        assert!(!set.contains(&3));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 5]);
    }

    fn exercise_map<M: OrderedMap<u64, &'static str>>() {
        let mut map = M::default();
        assert!(map.insert(20, "b"));
        assert!(map.insert(10, "a"));
        assert!(!map.insert(10, "overwritten"));
        assert_eq!(map.get(&10), Some(&"a"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(map.last_key(), Some(20));

        if let Some(v) = map.get_mut(&20) {
            *v = "c";
        }
        assert_eq!(map.get(&20), Some(&"c"));
        assert_eq!(map.remove(&10), Some("a"));
        assert_eq!(map.remove(&10), None);
        assert!(!map.contains_key(&10));

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.last_key(), None);
    }

    #[test]
    fn test_sorted_vec_set() {
        exercise_set::<SortedVecSet<u64>>();
    }

    #[test]
    fn test_btree_set() {
        exercise_set::<BTreeSet<u64>>();
    }

    #[test]
    fn test_sorted_vec_map() {
        exercise_map::<SortedVecMap<u64, &'static str>>();
    }

    #[test]
    fn test_btree_map() {
        exercise_map::<BTreeMap<u64, &'static str>>();
    }

    #[test]
    fn test_sorted_vec_set_slice_stays_sorted() {
        let mut set = SortedVecSet::new();
        for k in [9u64, 2, 7, 2, 4] {
            set.insert(k);
        }
        assert_eq!(set.as_slice(), &[2, 4, 7, 9]);
    }
}
