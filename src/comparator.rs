use core::cmp::Ordering;

/// A total order over keys, supplied once when a map is built.
///
/// The tree never compares keys any other way: no `Ord`, `Eq` or `Hash` on
/// `K` is consulted. Implementations must be pure and consistent (antisymmetric
/// and transitive); a comparator that changes its answer for the same pair of
/// keys corrupts the ordering the map relies on.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator:
///
/// ```
/// use core::cmp::Ordering;
/// use rbmap::{Comparator, NaturalOrder};
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"ab", &"c"), Ordering::Greater);
/// assert_eq!(NaturalOrder.compare(&"ab", &"c"), Ordering::Less);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the wrapped comparator.
///
/// ```
/// use rbmap::{NaturalOrder, RBTreeMap, ReverseOrder};
///
/// let mut map = RBTreeMap::new(ReverseOrder(NaturalOrder));
/// map.insert(1, "a");
/// map.insert(2, "b");
/// assert_eq!(map.first_key(), Some(&2));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ReverseOrder<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn closures_are_comparators() {
        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        assert_eq!(by_abs.compare(&-3, &2), Ordering::Greater);
        assert_eq!(by_abs.compare(&-2, &2), Ordering::Equal);
    }

    #[test]
    fn unsized_keys() {
        assert_eq!(Comparator::<str>::compare(&NaturalOrder, "a", "b"), Ordering::Less);
        assert_eq!(Comparator::<[u8]>::compare(&ReverseOrder(NaturalOrder), b"a", b"b"), Ordering::Greater);
    }

    proptest! {
        #[test]
        fn reverse_inverts(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(ReverseOrder(NaturalOrder).compare(&a, &b), NaturalOrder.compare(&a, &b).reverse());
        }
    }
}
