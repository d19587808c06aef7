use tracing::debug;

use crate::error::{Error, Result};
use crate::ordered_map::OrderedMap;
use crate::rb_tree_map::RBTreeMap;

/// Configures and builds a map.
///
/// A map cannot keep its order without a comparator, so building without one
/// fails instead of producing an unusable map.
///
/// # Examples
///
/// ```
/// use rbmap::{Builder, Error, NaturalOrder};
///
/// let map = Builder::new().comparator(NaturalOrder).capacity(64).build::<u32, &str>()?;
/// map.put(7, "seven");
/// assert!(map.capacity() >= 64);
///
/// let missing = Builder::<NaturalOrder>::new().build::<u32, &str>();
/// assert_eq!(missing.err(), Some(Error::MissingComparator));
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone, Debug)]
#[must_use = "a builder does nothing until `build` is called"]
pub struct Builder<C> {
    comparator: Option<C>,
    capacity: usize,
}

impl<C> Builder<C> {
    /// Starts a configuration with no comparator and no preallocation.
    pub const fn new() -> Self {
        Builder {
            comparator: None,
            capacity: 0,
        }
    }

    /// Sets the comparator that orders the map's keys.
    pub fn comparator(mut self, comparator: C) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// Preallocates node slots for `capacity` entries.
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds a single-owner [`RBTreeMap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingComparator`] if no comparator was set.
    pub fn build_unsync<K, V>(self) -> Result<RBTreeMap<K, V, C>> {
        let comparator = self.comparator.ok_or(Error::MissingComparator)?;
        debug!(capacity = self.capacity, "building map");
        Ok(RBTreeMap::with_capacity(comparator, self.capacity))
    }

    /// Builds a thread-safe [`OrderedMap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingComparator`] if no comparator was set.
    pub fn build<K, V>(self) -> Result<OrderedMap<K, V, C>> {
        self.build_unsync().map(OrderedMap::from)
    }
}

impl<C> Default for Builder<C> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<C: Default> Builder<C> {
    /// Starts a configuration with the comparator's default value already set.
    pub fn with_default_comparator() -> Self {
        Builder::new().comparator(C::default())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::comparator::{NaturalOrder, ReverseOrder};

    #[test]
    fn missing_comparator_is_an_error() {
        let result = Builder::<NaturalOrder>::new().capacity(8).build_unsync::<i32, i32>();
        assert_eq!(result.err(), Some(Error::MissingComparator));
    }

    #[test]
    fn capacity_is_preallocated() {
        let map = Builder::new().comparator(NaturalOrder).capacity(100).build_unsync::<i32, i32>().unwrap();
        assert!(map.capacity() >= 100);
        assert!(map.is_empty());
    }

    #[test]
    fn comparator_is_used() {
        let map = Builder::<ReverseOrder<NaturalOrder>>::with_default_comparator().build::<i32, ()>().unwrap();
        map.put(1, ());
        map.put(2, ());
        assert_eq!(map.key_set(), vec![2, 1]);
    }
}
