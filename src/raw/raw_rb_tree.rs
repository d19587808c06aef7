use core::cmp::Ordering;

use smallvec::SmallVec;
use tracing::trace;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::comparator::Comparator;
use crate::error::InvariantViolation;

/// Handles pending an in-order visit. A Red-Black tree holding `n` nodes is at
/// most `2 * log2(n + 1)` deep, so the stack rarely leaves its inline storage.
type Stack = SmallVec<[Handle; 48]>;

/// The Red-Black tree backing `RBTreeMap`.
#[derive(Clone)]
pub(crate) struct RawRBTree<K, V, C> {
    /// Arena owning every node; all links are handles into it.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of reachable nodes.
    len: usize,
    /// The only ordering authority the tree consults.
    comparator: C,
}

/// Result of a key descent.
pub(crate) enum SearchResult {
    /// The key is stored at this node.
    Found(Handle),
    /// The key is absent; a new node for it belongs on `side` of `parent`
    /// (or at the root when `parent` is `None`).
    NotFound { parent: Option<Handle>, side: Side },
}

/// An in-order cursor over a tree. It borrows nothing, so the caller passes the
/// tree on every step.
#[derive(Clone, Default)]
pub(crate) struct InOrder {
    stack: Stack,
}

impl InOrder {
    pub(crate) fn new<K, V, C>(tree: &RawRBTree<K, V, C>) -> Self {
        let mut walk = Self {
            stack: Stack::new(),
        };
        walk.push_left_spine(tree, tree.root);
        walk
    }

    pub(crate) fn next<K, V, C>(&mut self, tree: &RawRBTree<K, V, C>) -> Option<Handle> {
        let handle = self.stack.pop()?;
        self.push_left_spine(tree, tree.nodes.get(handle).right());
        Some(handle)
    }

    fn push_left_spine<K, V, C>(&mut self, tree: &RawRBTree<K, V, C>, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = tree.nodes.get(handle).left();
        }
    }
}

impl<K, V, C> RawRBTree<K, V, C> {
    /// Creates a new, empty tree ordered by `comparator`.
    pub(crate) const fn new(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            comparator,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(comparator: C, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            comparator,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Drops every node. The comparator is kept.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    #[inline]
    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        self.nodes.get(handle).entry()
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.nodes.get(handle).key()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.nodes.get_mut(handle).value_mut()
    }

    /// Replaces the value stored at `handle`. The tree shape is untouched.
    pub(crate) fn replace_value(&mut self, handle: Handle, value: V) -> V {
        self.nodes.get_mut(handle).replace_value(value)
    }

    /// Leftmost node.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// Rightmost node.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    pub(crate) fn in_order(&self) -> InOrder {
        InOrder::new(self)
    }

    /// Follows `side` links from `handle` until there are none.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.nodes.get(handle).child(side) {
            handle = child;
        }
        handle
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).parent()
    }

    #[inline]
    fn child(&self, handle: Handle, side: Side) -> Option<Handle> {
        self.nodes.get(handle).child(side)
    }

    #[inline]
    fn set_child(&mut self, handle: Handle, side: Side, child: Option<Handle>) {
        self.nodes.get_mut(handle).set_child(side, child);
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).set_color(color);
    }

    /// Absent nodes are black.
    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|handle| self.nodes.get(handle).is_red())
    }

    /// Points the link that held `old` (the root link when `parent` is `None`)
    /// at `new`. The caller fixes `new`'s parent link.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.nodes.get(parent).side_of(Some(old));
                self.set_child(parent, side, new);
            }
        }
    }

    /// Rotates `node` down towards `dir`; its child on the other side takes its
    /// place, and that child's inner subtree moves across to `node`.
    fn rotate(&mut self, node: Handle, dir: Side) {
        let up = dir.opposite();
        let pivot = self.child(node, up).expect("`RawRBTree::rotate()` - no child to rotate up!");
        let inner = self.child(pivot, dir);

        self.set_child(node, up, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(node));
        }

        let parent = self.parent(node);
        self.nodes.get_mut(pivot).set_parent(parent);
        self.replace_child(parent, node, Some(pivot));

        self.set_child(pivot, dir, Some(node));
        self.nodes.get_mut(node).set_parent(Some(pivot));
    }

    /// Links a new red leaf at a position found by `search` and rebalances.
    pub(crate) fn insert_at(&mut self, parent: Option<Handle>, side: Side, key: K, value: V) -> Handle {
        let handle = self.nodes.alloc(Node::new_red(key, value, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.set_child(parent, side, Some(handle)),
        }
        self.len += 1;

        let rotations = self.insert_fixup(handle);
        trace!(len = self.len, rotations, "inserted node");
        handle
    }

    /// Restores the red rules after `node` was linked in red. Returns the
    /// number of rotations performed (at most two).
    fn insert_fixup(&mut self, mut node: Handle) -> usize {
        let mut rotations = 0;

        while let Some(parent) = self.parent(node) {
            if !self.nodes.get(parent).is_red() {
                break;
            }
            // A red parent is never the root.
            let grandparent = self.parent(parent).expect("`RawRBTree::insert_fixup()` - red node has no parent!");
            let side = self.nodes.get(grandparent).side_of(Some(parent));
            let uncle = self.child(grandparent, side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.nodes.get(uncle).is_red()) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.child(parent, side.opposite()) == Some(node) {
                // Inner grandchild: straighten the zig-zag first.
                self.rotate(parent, side);
                rotations += 1;
                parent = node;
            }
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            rotations += 1;
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
        rotations
    }

    /// Unlinks the node at `handle` and returns its entry.
    ///
    /// A node with two children first trades its entry with its in-order
    /// successor, which is then the node physically removed.
    pub(crate) fn remove_handle(&mut self, handle: Handle) -> (K, V) {
        let mut target = handle;
        let node = self.nodes.get(handle);
        if let (Some(_), Some(right)) = (node.left(), node.right()) {
            let successor = self.extreme(right, Side::Left);
            let (node, successor_node) = self.nodes.pair_mut(handle, successor);
            node.swap_entry(successor_node);
            target = successor;
        }

        let node = self.nodes.get(target);
        let child = node.left().or(node.right());
        let parent = node.parent();
        let color = node.color();

        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(parent);
        }
        self.replace_child(parent, target, child);
        let removed = self.nodes.take(target);
        self.len -= 1;

        let rotations = match color {
            Color::Black => self.remove_fixup(child, parent),
            Color::Red => 0,
        };
        trace!(len = self.len, rotations, "removed node");
        removed.into_entry()
    }

    /// Restores black height after a black node was spliced out from under
    /// `parent`, leaving `node` (possibly absent) one black short. Returns the
    /// number of rotations performed (at most three).
    fn remove_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) -> usize {
        let mut rotations = 0;

        while node != self.root && !self.is_red(node) {
            let current_parent = parent.expect("`RawRBTree::remove_fixup()` - non-root position has no parent!");
            let side = self.nodes.get(current_parent).side_of(node);
            let far = side.opposite();
            // The short side has black height >= 1 on the other side, so a sibling exists.
            let mut sibling =
                self.child(current_parent, far).expect("`RawRBTree::remove_fixup()` - black-height deficit without a sibling!");

            if self.nodes.get(sibling).is_red() {
                self.set_color(sibling, Color::Black);
                self.set_color(current_parent, Color::Red);
                self.rotate(current_parent, side);
                rotations += 1;
                sibling = self
                    .child(current_parent, far)
                    .expect("`RawRBTree::remove_fixup()` - black-height deficit without a sibling!");
            }

            let near_nephew = self.child(sibling, side);
            let far_nephew = self.child(sibling, far);

            if !self.is_red(near_nephew) && !self.is_red(far_nephew) {
                self.set_color(sibling, Color::Red);
                node = Some(current_parent);
                parent = self.parent(current_parent);
                continue;
            }

            if !self.is_red(far_nephew) {
                if let Some(near_nephew) = near_nephew {
                    self.set_color(near_nephew, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                rotations += 1;
                sibling = self
                    .child(current_parent, far)
                    .expect("`RawRBTree::remove_fixup()` - black-height deficit without a sibling!");
            }

            let parent_color = self.nodes.get(current_parent).color();
            self.set_color(sibling, parent_color);
            self.set_color(current_parent, Color::Black);
            if let Some(far_nephew) = self.child(sibling, far) {
                self.set_color(far_nephew, Color::Black);
            }
            self.rotate(current_parent, side);
            rotations += 1;
            node = self.root;
            break;
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
        rotations
    }
}

impl<K, V, C: Comparator<K>> RawRBTree<K, V, C> {
    /// Descends from the root looking for `key`.
    pub(crate) fn search(&self, key: &K) -> SearchResult {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            side = match self.comparator.compare(key, node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return SearchResult::Found(handle),
            };
            parent = Some(handle);
            current = node.child(side);
        }

        SearchResult::NotFound {
            parent,
            side,
        }
    }

    pub(crate) fn find(&self, key: &K) -> Option<Handle> {
        match self.search(key) {
            SearchResult::Found(handle) => Some(handle),
            SearchResult::NotFound {
                ..
            } => None,
        }
    }

    /// Inserts or overwrites. Returns the previous value when the key was present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            SearchResult::Found(handle) => Some(self.replace_value(handle, value)),
            SearchResult::NotFound {
                parent,
                side,
            } => {
                self.insert_at(parent, side, key, value);
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let handle = self.find(key)?;
        Some(self.remove_handle(handle))
    }

    /// Greatest node strictly below `key`.
    pub(crate) fn lower(&self, key: &K) -> Option<Handle> {
        self.neighbor(key, Side::Left, false)
    }

    /// Least node strictly above `key`.
    pub(crate) fn higher(&self, key: &K) -> Option<Handle> {
        self.neighbor(key, Side::Right, false)
    }

    /// Greatest node at or below `key`.
    pub(crate) fn floor(&self, key: &K) -> Option<Handle> {
        self.neighbor(key, Side::Left, true)
    }

    /// Least node at or above `key`.
    pub(crate) fn ceiling(&self, key: &K) -> Option<Handle> {
        self.neighbor(key, Side::Right, true)
    }

    /// One descent from the root, remembering the closest node seen on `side`
    /// of `key`.
    fn neighbor(&self, key: &K, side: Side, inclusive: bool) -> Option<Handle> {
        let wanted = match side {
            Side::Left => Ordering::Less,
            Side::Right => Ordering::Greater,
        };
        let mut best = None;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let ordering = self.comparator.compare(node.key(), key);
            if ordering == wanted {
                best = Some(handle);
                current = node.child(side.opposite());
            } else if inclusive && ordering == Ordering::Equal {
                return Some(handle);
            } else {
                current = node.child(side);
            }
        }

        best
    }

    /// Checks every structural invariant of the tree.
    pub(crate) fn verify(&self) -> Result<(), InvariantViolation> {
        if let Some(root) = self.root {
            let node = self.nodes.get(root);
            if node.is_red() {
                return Err(InvariantViolation::RedRoot {
                    node: root.to_index(),
                });
            }
            if node.parent().is_some() {
                return Err(InvariantViolation::RootHasParent {
                    node: root.to_index(),
                });
            }
            self.black_height(root)?;
        }

        let mut walk = self.in_order();
        let mut previous: Option<Handle> = None;
        let mut counted = 0;
        while let Some(handle) = walk.next(self) {
            if let Some(previous) = previous
                && self.comparator.compare(self.key(previous), self.key(handle)) != Ordering::Less
            {
                return Err(InvariantViolation::OutOfOrder {
                    node: handle.to_index(),
                });
            }
            previous = Some(handle);
            counted += 1;
        }

        if counted != self.len {
            return Err(InvariantViolation::LenMismatch {
                len: self.len,
                counted,
            });
        }
        if self.nodes.len() != self.len {
            return Err(InvariantViolation::ArenaLenMismatch {
                len: self.len,
                live: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// Black height of the subtree at `handle`, checking links and colors on the way.
    fn black_height(&self, handle: Handle) -> Result<usize, InvariantViolation> {
        let node = self.nodes.get(handle);
        let mut heights = [0; 2];

        for (height, side) in heights.iter_mut().zip([Side::Left, Side::Right]) {
            let Some(child) = node.child(side) else {
                continue;
            };
            let child_node = self.nodes.get(child);
            if child_node.parent() != Some(handle) {
                return Err(InvariantViolation::BrokenParentLink {
                    node: handle.to_index(),
                    child: child.to_index(),
                });
            }
            if node.is_red() && child_node.is_red() {
                return Err(InvariantViolation::RedChildOfRed {
                    node: handle.to_index(),
                    child: child.to_index(),
                });
            }
            *height = self.black_height(child)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch {
                node: handle.to_index(),
                left,
                right,
            });
        }
        Ok(left + usize::from(!node.is_red()))
    }
}
