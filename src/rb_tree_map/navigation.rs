use super::RBTreeMap;
use crate::comparator::Comparator;

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Returns the least key in the map, or `None` if it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let map: RBTreeMap<_, _> = RBTreeMap::from([(1, "a"), (3, "c"), (5, "e"), (7, "g"), (9, "i")]);
    /// assert_eq!(map.first_key(), Some(&1));
    /// assert_eq!(map.last_key(), Some(&9));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first_key(&self) -> Option<&K> {
        self.first_key_value().map(|(key, _)| key)
    }

    /// Returns the greatest key in the map, or `None` if it is empty.
    #[must_use]
    pub fn last_key(&self) -> Option<&K> {
        self.last_key_value().map(|(key, _)| key)
    }

    /// Returns the first key-value pair in the map.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.raw.entry(handle))
    }

    /// Returns the last key-value pair in the map.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.raw.entry(handle))
    }

    /// Removes and returns the first element in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<_, _> = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_first(), Some((1, "a")));
    /// assert_eq!(map.pop_first(), Some((2, "b")));
    /// assert_eq!(map.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let handle = self.raw.first()?;
        Some(self.raw.remove_handle(handle))
    }

    /// Removes and returns the last element in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let handle = self.raw.last()?;
        Some(self.raw.remove_handle(handle))
    }
}

impl<K, V, C: Comparator<K>> RBTreeMap<K, V, C> {
    /// Returns the greatest key strictly less than `key`.
    ///
    /// `key` need not be in the map. The lookup is a single descent from the
    /// root, not a walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let map: RBTreeMap<_, _> = [1, 3, 5, 7, 9].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.lower_key(&5), Some(&3));
    /// assert_eq!(map.lower_key(&4), Some(&3));
    /// assert_eq!(map.lower_key(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_key(&self, key: &K) -> Option<&K> {
        self.raw.lower(key).map(|handle| self.raw.key(handle))
    }

    /// Returns the least key strictly greater than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let map: RBTreeMap<_, _> = [1, 3, 5, 7, 9].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.higher_key(&5), Some(&7));
    /// assert_eq!(map.higher_key(&9), None);
    /// ```
    pub fn higher_key(&self, key: &K) -> Option<&K> {
        self.raw.higher(key).map(|handle| self.raw.key(handle))
    }

    /// Returns the greatest key less than or equal to `key`.
    ///
    /// This is an extension and is not part of the classic sorted-map contract.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::RBTreeMap;
    ///
    /// let map: RBTreeMap<_, _> = [10, 20].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.floor_key(&20), Some(&20));
    /// assert_eq!(map.floor_key(&19), Some(&10));
    /// assert_eq!(map.floor_key(&9), None);
    /// ```
    pub fn floor_key(&self, key: &K) -> Option<&K> {
        self.raw.floor(key).map(|handle| self.raw.key(handle))
    }

    /// Returns the least key greater than or equal to `key`.
    ///
    /// This is an extension and is not part of the classic sorted-map contract.
    pub fn ceiling_key(&self, key: &K) -> Option<&K> {
        self.raw.ceiling(key).map(|handle| self.raw.key(handle))
    }
}
