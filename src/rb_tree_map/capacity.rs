use super::RBTreeMap;
use crate::raw::RawRBTree;

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`, with room for at least
    /// `capacity` entries before the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::{NaturalOrder, RBTreeMap};
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(NaturalOrder, 32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(comparator: C, capacity: usize) -> Self {
        RBTreeMap {
            raw: RawRBTree::with_capacity(comparator, capacity),
        }
    }

    /// Returns the number of node slots allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Releases unused node slots at the end of the arena.
    ///
    /// Slots freed in the middle by removals stay allocated and are reused by
    /// later insertions.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}
