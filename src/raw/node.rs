use super::handle::Handle;

/// The color of a Red-Black tree node. Absent children count as `Black`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child of a node. Every fixup case comes in two mirrored halves, so
/// the tree code is written once against a `Side` and its `opposite()`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// One node per stored key. Links are arena handles; `parent` is only a
// back-reference and never keeps a node alive.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// Creates a new red leaf hanging off `parent`.
    pub(crate) const fn new_red(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Returns the key and value together, as stored.
    #[inline]
    pub(crate) const fn entry(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Replaces the value in place, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    /// Exchanges key and value with `other`, leaving colors and links alone.
    pub(crate) fn swap_entry(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.key, &mut other.key);
        core::mem::swap(&mut self.value, &mut other.value);
    }

    /// Consumes the node, returning its key and value.
    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) const fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) const fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns which side `child` hangs on. `None` matches an absent child.
    #[inline]
    pub(crate) fn side_of(&self, child: Option<Handle>) -> Side {
        if self.left == child { Side::Left } else { Side::Right }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_nodes_are_red_leaves() {
        let parent = Handle::from_index(3);
        let node = Node::new_red(1, "one", Some(parent));
        assert!(node.is_red());
        assert_eq!(node.parent(), Some(parent));
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(node.entry(), (&1, &"one"));
    }

    #[test]
    fn child_links_follow_side() {
        let mut node = Node::new_red(0, (), None);
        let a = Handle::from_index(1);
        let b = Handle::from_index(2);
        node.set_child(Side::Left, Some(a));
        node.set_child(Side::Right.opposite().opposite(), Some(b));
        assert_eq!(node.child(Side::Left), Some(a));
        assert_eq!(node.child(Side::Right), Some(b));
        assert_eq!(node.side_of(Some(a)), Side::Left);
        assert_eq!(node.side_of(Some(b)), Side::Right);
    }

    #[test]
    fn swap_entry_keeps_structure() {
        let mut a = Node::new_red(1, 'a', None);
        let mut b = Node::new_red(2, 'b', Some(Handle::from_index(0)));
        b.set_color(Color::Black);
        a.swap_entry(&mut b);
        assert_eq!(a.entry(), (&2, &'b'));
        assert_eq!(b.entry(), (&1, &'a'));
        assert!(a.is_red());
        assert_eq!(b.color(), Color::Black);
        assert_eq!(a.parent(), None);
        assert_eq!(b.into_entry(), (1, 'a'));
    }

    #[test]
    fn replace_value_returns_previous() {
        let mut node = Node::new_red("k", 1, None);
        assert_eq!(node.replace_value(2), 1);
        *node.value_mut() += 1;
        assert_eq!(node.entry(), (&"k", &3));
    }
}
