use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use tracing::debug;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::Result;
use crate::raw::{InOrder, RawRBTree, SearchResult};

mod capacity;
mod navigation;

/// An ordered map based on a [Red-Black tree].
///
/// Keys are ordered by the [`Comparator`] given at construction, never by
/// `Ord`, `Eq` or `Hash` on the key type. Lookup, insertion and removal take
/// O(log n) comparisons; iterators produce entries in comparator order.
///
/// Nodes live in a single arena and link to each other through indices, so the
/// parent back-links that rebalancing needs carry no ownership. Insertion does
/// at most two rotations and removal at most three; everything else is
/// recoloring.
///
/// It is a logic error for the comparator to answer differently for the same
/// pair of keys over the map's lifetime, or for a key to be modified so that
/// its ordering changes while it is in the map. The behavior resulting from
/// such a logic error is confined to this map and is not undefined behavior:
/// lookups may miss and [`verify`](RBTreeMap::verify) will report the damage.
///
/// # Examples
///
/// ```
/// use rbmap::{NaturalOrder, RBTreeMap};
///
/// let mut stations = RBTreeMap::new(NaturalOrder);
/// stations.insert(40, "Wanaka");
/// stations.insert(10, "Dunedin");
/// stations.insert(25, "Alexandra");
///
/// assert_eq!(stations.get(&25), Some(&"Alexandra"));
/// assert_eq!(stations.first_key(), Some(&10));
/// assert_eq!(stations.higher_key(&10), Some(&25));
///
/// // Replacing a value hands back the old one.
/// assert_eq!(stations.insert(40, "Queenstown"), Some("Wanaka"));
///
/// let names: Vec<_> = stations.values().copied().collect();
/// assert_eq!(names, ["Dunedin", "Alexandra", "Queenstown"]);
/// ```
///
/// Any `Fn(&K, &K) -> Ordering` orders the map:
///
/// ```
/// use rbmap::RBTreeMap;
///
/// let mut words = RBTreeMap::new(|a: &String, b: &String| a.to_lowercase().cmp(&b.to_lowercase()));
/// words.insert("banana".to_string(), 2);
/// words.insert("Apple".to_string(), 1);
/// assert_eq!(words.insert("APPLE".to_string(), 3), Some(1));
/// assert_eq!(words.first_key().map(String::as_str), Some("Apple"));
/// ```
///
/// [Red-Black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct RBTreeMap<K, V, C = NaturalOrder> {
    raw: RawRBTree<K, V, C>,
}

/// An iterator over the entries of an `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`].
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V, C> {
    tree: &'a RawRBTree<K, V, C>,
    walk: InOrder,
    remaining: usize,
}

/// An iterator over the keys of an `RBTreeMap`, in order.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

/// An iterator over the values of an `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `comparator`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::{RBTreeMap, ReverseOrder, NaturalOrder};
    ///
    /// let mut map = RBTreeMap::new(ReverseOrder(NaturalOrder));
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [2, 1]);
    /// ```
    #[must_use]
    pub const fn new(comparator: C) -> Self {
        RBTreeMap {
            raw: RawRBTree::new(comparator),
        }
    }

    /// Returns the comparator ordering this map.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements. The comparator is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, &str> = RBTreeMap::default();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.first_key(), None);
    /// ```
    pub fn clear(&mut self) {
        debug!(len = self.raw.len(), "clearing map");
        self.raw.clear();
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let map: RBTreeMap<_, _> = RBTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            tree: &self.raw,
            walk: self.raw.in_order(),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys {
            inner: self.iter(),
        }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V, C> {
        Values {
            inner: self.iter(),
        }
    }

    /// Returns `true` if some key maps to `value`.
    ///
    /// Values carry no order, so this walks the whole map.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<K, V, C: Comparator<K>> RBTreeMap<K, V, C> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<_, _> = RBTreeMap::default();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and its value.
    ///
    /// The stored key may differ from `key` when the comparator treats distinct
    /// keys as equal.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let handle = self.raw.find(key)?;
        Some(self.raw.entry(handle))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.raw.find(key)?;
        Some(self.raw.value_mut(handle))
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned and the
    /// tree is rebalanced around the new node.
    ///
    /// If the map did have this key present, the value is updated in place,
    /// and the old value is returned. The key is not updated and the tree is
    /// not restructured.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<_, _> = RBTreeMap::default();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Inserts `value` only if `key` is absent.
    ///
    /// Returns the value already stored for `key`, leaving it untouched, or
    /// `None` after inserting.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<_, _> = RBTreeMap::default();
    /// assert_eq!(map.put_if_absent(1, "a"), None);
    /// assert_eq!(map.put_if_absent(1, "b"), Some(&"a"));
    /// assert_eq!(map[&1], "a");
    /// ```
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.raw.search(&key) {
            SearchResult::Found(handle) => Some(self.raw.entry(handle).1),
            SearchResult::NotFound {
                parent,
                side,
            } => {
                self.raw.insert_at(parent, side, key, value);
                None
            }
        }
    }

    /// Replaces the value for `key` if it is present. Never inserts.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<_, _> = RBTreeMap::default();
    /// assert_eq!(map.replace(&1, "a"), None);
    /// assert!(map.is_empty());
    ///
    /// map.insert(1, "a");
    /// assert_eq!(map.replace(&1, "b"), Some("a"));
    /// ```
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        let handle = self.raw.find(key)?;
        Some(self.raw.replace_value(handle, value))
    }

    /// Replaces the value for `key` with `value` only if it currently equals
    /// `expected`. Returns whether the value was replaced.
    pub fn replace_if_value_matches(&mut self, key: &K, expected: &V, value: V) -> bool
    where
        V: PartialEq,
    {
        match self.get_mut(key) {
            Some(current) if *current == *expected => {
                *current = value;
                true
            }
            _ => false,
        }
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<_, _> = RBTreeMap::default();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove(key)
    }

    /// Removes `key` only if its value equals `expected`. Returns whether an
    /// entry was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<_, _> = RBTreeMap::from([(1, "a")]);
    /// assert!(!map.remove_if_value_matches(&1, &"b"));
    /// assert!(map.remove_if_value_matches(&1, &"a"));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_if_value_matches(&mut self, key: &K, expected: &V) -> bool
    where
        V: PartialEq,
    {
        match self.raw.find(key) {
            Some(handle) if self.raw.entry(handle).1 == expected => {
                self.raw.remove_handle(handle);
                true
            }
            _ => false,
        }
    }

    /// Checks every structural invariant of the tree: binary-search order,
    /// black root, no red node with a red child, equal black height on every
    /// path, consistent parent links, and `len` matching the reachable nodes.
    ///
    /// Walks the whole tree; meant for tests and debug assertions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invariant`](crate::Error::Invariant) describing the
    /// first violation found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let map: RBTreeMap<_, _> = (0..100).map(|i| (i, i)).collect();
    /// assert!(map.verify().is_ok());
    /// ```
    pub fn verify(&self) -> Result<()> {
        self.raw.verify()?;
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    /// Creates an empty `RBTreeMap` with the default comparator.
    fn default() -> Self {
        RBTreeMap::new(C::default())
    }
}

/// Two maps are equal when they hold the same number of entries and every key
/// of the left map maps to an equal value in the right one.
impl<K, V: PartialEq, C, D: Comparator<K>> PartialEq<RBTreeMap<K, V, D>> for RBTreeMap<K, V, C> {
    fn eq(&self, other: &RBTreeMap<K, V, D>) -> bool {
        self.len() == other.len() && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K, V: Eq, C: Comparator<K>> Eq for RBTreeMap<K, V, C> {}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C: Comparator<K> + Default, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V, C> {
    /// Converts a `[(K, V); N]` into an `RBTreeMap`. Later duplicates win.
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for RBTreeMap<K, V, C> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RBTreeMap`.
    #[inline]
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let handle = self.walk.next(tree)?;
        self.remaining -= 1;
        Some(tree.entry(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Iter<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

impl<K, V, C> Clone for Keys<'_, K, V, C> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V, C> fmt::Debug for Keys<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

impl<K, V, C> Clone for Values<'_, K, V, C> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug, C> fmt::Debug for Values<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
