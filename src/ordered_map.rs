use core::fmt;

use parking_lot::RwLock;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::Result;
use crate::rb_tree_map::RBTreeMap;

/// A thread-safe ordered map: an [`RBTreeMap`] behind one reader/writer lock.
///
/// Every mutation (`put`, `remove`, `replace`, ...) holds the lock exclusively
/// for its whole duration, rebalancing included, so readers see the tree either
/// entirely before or entirely after a change. Lookups and navigation share the
/// lock.
///
/// Because borrows cannot outlive the lock, results are returned by value:
/// `get` and the navigation queries clone the key or value they return. The
/// whole-map views ([`entry_set`], [`key_set`], [`values`]) are snapshots taken
/// under the shared lock.
///
/// Operations that compare values (`contains_value`, `==`) copy the values out
/// first and compare after the lock is released, so a `PartialEq` that touches
/// the map again cannot deadlock. The conditional mutations
/// (`remove_if_value_matches`, `replace_if_value_matches`) must compare under
/// the write lock to stay atomic; their `PartialEq` must not touch the map.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use rbmap::OrderedMap;
///
/// let map: Arc<OrderedMap<u32, u32>> = Arc::new(OrderedMap::default());
/// let writers: Vec<_> = (0..4)
///     .map(|t| {
///         let map = Arc::clone(&map);
///         thread::spawn(move || {
///             for i in 0..100 {
///                 map.put(t * 100 + i, i);
///             }
///         })
///     })
///     .collect();
/// for writer in writers {
///     writer.join().unwrap();
/// }
///
/// assert_eq!(map.len(), 400);
/// assert_eq!(map.first_key(), Some(0));
/// assert_eq!(map.lower_key(&100), Some(99));
/// ```
///
/// [`entry_set`]: OrderedMap::entry_set
/// [`key_set`]: OrderedMap::key_set
/// [`values`]: OrderedMap::values
pub struct OrderedMap<K, V, C = NaturalOrder> {
    inner: RwLock<RBTreeMap<K, V, C>>,
}

impl<K, V, C> OrderedMap<K, V, C> {
    /// Makes a new, empty `OrderedMap` ordered by `comparator`.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        OrderedMap {
            inner: RwLock::new(RBTreeMap::new(comparator)),
        }
    }

    /// Makes a new, empty `OrderedMap` with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(comparator: C, capacity: usize) -> Self {
        RBTreeMap::with_capacity(comparator, capacity).into()
    }

    /// Consumes the lock and returns the map inside.
    #[must_use]
    pub fn into_inner(self) -> RBTreeMap<K, V, C> {
        self.inner.into_inner()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Returns the number of node slots allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Returns `true` if some key maps to `value`.
    ///
    /// The values are copied out under the shared lock and compared after it is
    /// released.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: Clone + PartialEq,
    {
        self.values().iter().any(|v| v == value)
    }

    /// Returns a snapshot of every entry, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::OrderedMap;
    ///
    /// let map: OrderedMap<_, _> = OrderedMap::default();
    /// map.put(2, "b");
    /// map.put(1, "a");
    /// let snapshot = map.entry_set();
    /// map.clear();
    /// assert_eq!(snapshot, [(1, "a"), (2, "b")]);
    /// ```
    #[must_use]
    pub fn entry_set(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner.read().iter().map(|(key, value)| (key.clone(), value.clone())).collect()
    }

    /// Returns a snapshot of every key, in order.
    #[must_use]
    pub fn key_set(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.read().keys().cloned().collect()
    }

    /// Returns a snapshot of every value, in key order.
    #[must_use]
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().values().cloned().collect()
    }

    /// Returns the least key, or `None` if the map is empty.
    #[must_use]
    pub fn first_key(&self) -> Option<K>
    where
        K: Clone,
    {
        self.inner.read().first_key().cloned()
    }

    /// Returns the greatest key, or `None` if the map is empty.
    #[must_use]
    pub fn last_key(&self) -> Option<K>
    where
        K: Clone,
    {
        self.inner.read().last_key().cloned()
    }

    /// Removes and returns the first entry.
    pub fn pop_first(&self) -> Option<(K, V)> {
        self.inner.write().pop_first()
    }

    /// Removes and returns the last entry.
    pub fn pop_last(&self) -> Option<(K, V)> {
        self.inner.write().pop_last()
    }
}

impl<K, V, C: Comparator<K>> OrderedMap<K, V, C> {
    /// Returns a clone of the value for `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Returns `true` if the map holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Inserts or overwrites the value for `key`, returning the previous value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::OrderedMap;
    ///
    /// let map: OrderedMap<_, _> = OrderedMap::default();
    /// assert_eq!(map.put("k", 1), None);
    /// assert_eq!(map.put("k", 2), Some(1));
    /// assert_eq!(map.get(&"k"), Some(2));
    /// assert_eq!(map.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Inserts only if `key` is absent. Returns a clone of the value already
    /// stored, or `None` after inserting.
    pub fn put_if_absent(&self, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        self.inner.write().put_if_absent(key, value).cloned()
    }

    /// Replaces the value for `key` if present, returning the old value. Never inserts.
    pub fn replace(&self, key: &K, value: V) -> Option<V> {
        self.inner.write().replace(key, value)
    }

    /// Replaces the value for `key` only if it equals `expected`.
    pub fn replace_if_value_matches(&self, key: &K, expected: &V, value: V) -> bool
    where
        V: PartialEq,
    {
        self.inner.write().replace_if_value_matches(key, expected, value)
    }

    /// Removes `key`, returning its value.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    /// Removes `key` only if its value equals `expected`.
    pub fn remove_if_value_matches(&self, key: &K, expected: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.write().remove_if_value_matches(key, expected)
    }

    /// Returns the greatest key strictly less than `key`.
    pub fn lower_key(&self, key: &K) -> Option<K>
    where
        K: Clone,
    {
        self.inner.read().lower_key(key).cloned()
    }

    /// Returns the least key strictly greater than `key`.
    pub fn higher_key(&self, key: &K) -> Option<K>
    where
        K: Clone,
    {
        self.inner.read().higher_key(key).cloned()
    }

    /// Returns the greatest key less than or equal to `key`.
    pub fn floor_key(&self, key: &K) -> Option<K>
    where
        K: Clone,
    {
        self.inner.read().floor_key(key).cloned()
    }

    /// Returns the least key greater than or equal to `key`.
    pub fn ceiling_key(&self, key: &K) -> Option<K>
    where
        K: Clone,
    {
        self.inner.read().ceiling_key(key).cloned()
    }

    /// Checks every structural invariant under the shared lock.
    ///
    /// # Errors
    ///
    /// See [`RBTreeMap::verify`].
    pub fn verify(&self) -> Result<()> {
        self.inner.read().verify()
    }
}

impl<K, V, C> From<RBTreeMap<K, V, C>> for OrderedMap<K, V, C> {
    fn from(map: RBTreeMap<K, V, C>) -> Self {
        OrderedMap {
            inner: RwLock::new(map),
        }
    }
}

impl<K, V, C: Default> Default for OrderedMap<K, V, C> {
    fn default() -> Self {
        OrderedMap::new(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for OrderedMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        RBTreeMap::from_iter(iter).into()
    }
}

/// Equal when both maps hold the same number of entries and every key of the
/// left map maps to an equal value in the right one.
///
/// The left map is snapshotted and its lock released before the right map is
/// read, so the two locks are never held together. Comparing a map with itself
/// therefore takes the shared lock twice in turn and compares every value, so
/// a value that is not equal to itself makes the map unequal to itself.
impl<K: Clone, V: Clone + PartialEq, C, D: Comparator<K>> PartialEq<OrderedMap<K, V, D>> for OrderedMap<K, V, C> {
    fn eq(&self, other: &OrderedMap<K, V, D>) -> bool {
        let entries = self.entry_set();
        let matches: Option<Vec<V>> = {
            let other = other.inner.read();
            if other.len() == entries.len() {
                entries.iter().map(|(key, _)| other.get(key).cloned()).collect()
            } else {
                None
            }
        };

        matches.is_some_and(|values| entries.iter().zip(&values).all(|((_, mine), theirs)| mine == theirs))
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrderedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Some(map) => fmt::Debug::fmt(&*map, f),
            None => f.write_str("OrderedMap { <locked> }"),
        }
    }
}
