use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;
use tracing::trace;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, SearchResult};
use super::order::Order;

/// The order-`M` B-tree backing `OrderedSet`.
///
/// Keys live in both leaves and internal nodes. Every node except the root holds between
/// `ceil(M / 2) - 1` and `M - 1` keys and all leaves sit at the same depth.
#[derive(Clone)]
pub(crate) struct RawBTree<K, const M: usize> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, M>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of keys in the tree.
    len: usize,
}

/// Names one stored key: the node holding it and its index within that node.
///
/// Positions are invalidated by any insertion or removal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Position {
    pub(crate) node: Handle,
    pub(crate) index: usize,
}

impl Position {
    const fn new(node: Handle, index: usize) -> Self {
        Self { node, index }
    }
}

impl<K, const M: usize> RawBTree<K, M> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        let () = Order::<M>::VALID;
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Destroys every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the key stored at `position`.
    #[inline]
    pub(crate) fn key(&self, position: Position) -> &K {
        self.nodes.get(position.node).key(position.index)
    }

    /// Position of the smallest key.
    pub(crate) fn first(&self) -> Option<Position> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Position of the largest key.
    pub(crate) fn last(&self) -> Option<Position> {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return Some(Position::new(current, node.key_count() - 1));
            }
            current = node.child(node.child_count() - 1);
        }
    }

    /// Position of the key that follows `position` in ascending order.
    ///
    /// Walks parent links instead of keeping a stack: from a leaf with no key to the right, it
    /// climbs until it arrives from a child that has a separator to its right.
    pub(crate) fn successor(&self, position: Position) -> Option<Position> {
        let node = self.nodes.get(position.node);
        if !node.is_leaf() {
            return Some(self.leftmost(node.child(position.index + 1)));
        }
        if position.index + 1 < node.key_count() {
            return Some(Position::new(position.node, position.index + 1));
        }

        let mut child = position.node;
        let mut parent = node.parent();
        while let Some(handle) = parent {
            let node = self.nodes.get(handle);
            let slot = node.child_index(child);
            if slot < node.key_count() {
                return Some(Position::new(handle, slot));
            }
            child = handle;
            parent = node.parent();
        }
        None
    }

    fn leftmost(&self, mut current: Handle) -> Position {
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return Position::new(current, 0);
            }
            current = node.child(0);
        }
    }

    fn rightmost_leaf(&self, mut current: Handle) -> Handle {
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return current;
            }
            current = node.child(node.child_count() - 1);
        }
    }

    /// Moves every key out in ascending order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len);
        if let Some(root) = self.root.take() {
            self.drain_subtree(root, &mut keys);
        }
        self.clear();
        keys
    }

    fn drain_subtree(&mut self, handle: Handle, out: &mut Vec<K>) {
        let (keys, children) = self.nodes.take(handle).into_parts();
        let mut children = children.into_iter();
        for key in keys {
            if let Some(child) = children.next() {
                self.drain_subtree(child, out);
            }
            out.push(key);
        }
        for child in children {
            self.drain_subtree(child, out);
        }
    }
}

impl<K: Ord, const M: usize> RawBTree<K, M> {
    /// Locates `key`, descending from the root with a binary search in every node.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(index) => return Some(Position::new(current, index)),
                SearchResult::GoDown(_) if node.is_leaf() => return None,
                SearchResult::GoDown(index) => current = node.child(index),
            }
        }
    }

    /// Returns 1 if `key` is present, 0 otherwise.
    pub(crate) fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        usize::from(self.find(key).is_some())
    }

    /// Position of the first key that is not less than `key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound(key, true)
    }

    /// Position of the first key that is greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound(key, false)
    }

    // Single descent. Every key on the way that satisfies the bound is smaller than the
    // previous candidate, so the last one seen is the answer.
    fn bound<Q>(&self, key: &Q, inclusive: bool) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        let mut candidate = None;
        loop {
            let node = self.nodes.get(current);
            let index = node.bound_index(key, inclusive);
            if index < node.key_count() {
                if inclusive && node.key(index).borrow() == key {
                    return Some(Position::new(current, index));
                }
                candidate = Some(Position::new(current, index));
            }
            if node.is_leaf() {
                return candidate;
            }
            current = node.child(index);
        }
    }

    /// Inserts `key` unless an equal key is already stored.
    ///
    /// Returns the position of the stored key and whether it was newly inserted. An existing key
    /// is left untouched and the tree is not restructured.
    pub(crate) fn insert_unique(&mut self, key: K) -> (Position, bool) {
        let Some(root) = self.root else {
            let mut leaf = Node::new_leaf();
            leaf.insert_key(0, key);
            let handle = self.nodes.alloc(leaf);
            self.root = Some(handle);
            self.len = 1;
            return (Position::new(handle, 0), true);
        };

        let mut current = root;
        let index = loop {
            let node = self.nodes.get(current);
            match node.search(&key) {
                SearchResult::Found(index) => return (Position::new(current, index), false),
                SearchResult::GoDown(index) if node.is_leaf() => break index,
                SearchResult::GoDown(index) => current = node.child(index),
            }
        };

        self.nodes.get_mut(current).insert_key(index, key);
        self.len += 1;
        (self.split_upward(Position::new(current, index)), true)
    }

    /// Splits overflowing nodes from the leaf at `inserted` towards the root.
    ///
    /// Returns where the inserted key ends up: it stays put, moves into the new right sibling,
    /// or is itself the median and moves up into the parent.
    fn split_upward(&mut self, inserted: Position) -> Position {
        let mut tracked = inserted;
        let mut current = inserted.node;

        while self.nodes.get(current).is_overflowing() {
            let (median, right) = self.nodes.get_mut(current).split();
            let mid = self.nodes.get(current).key_count();
            let right = self.nodes.alloc(right);
            self.adopt_children(right);

            let (parent, slot) = if let Some(parent) = self.nodes.get(current).parent() {
                (parent, self.nodes.get(parent).child_index(current))
            } else {
                let parent = self.nodes.alloc(Node::new_root(current));
                self.nodes.get_mut(current).set_parent(Some(parent));
                self.root = Some(parent);
                trace!(root = ?parent, "root split, tree grew one level");
                (parent, 0)
            };
            self.nodes.get_mut(parent).insert_separator(slot, median, right);
            self.nodes.get_mut(right).set_parent(Some(parent));
            trace!(left = ?current, ?right, ?parent, "split node");

            if tracked.node == current {
                tracked = match tracked.index.cmp(&mid) {
                    Ordering::Less => tracked,
                    Ordering::Equal => Position::new(parent, slot),
                    Ordering::Greater => Position::new(right, tracked.index - mid - 1),
                };
            }
            current = parent;
        }
        tracked
    }

    /// Points every child of `handle` back at it.
    fn adopt_children(&mut self, handle: Handle) {
        let children: SmallVec<[Handle; 16]> = self.nodes.get(handle).children().iter().copied().collect();
        for child in children {
            self.nodes.get_mut(child).set_parent(Some(handle));
        }
    }

    /// Removes `key` and returns how many keys were removed (0 or 1).
    pub(crate) fn erase_unique<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        usize::from(self.remove(key).is_some())
    }

    /// Removes `key` and returns the stored key, if present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let position = self.find(key)?;
        Some(self.remove_at(position))
    }

    /// Removes the key at `position`.
    ///
    /// A key in an internal node is swapped with its in-order predecessor, so the physical
    /// removal always happens in a leaf.
    pub(crate) fn remove_at(&mut self, position: Position) -> K {
        let node = self.nodes.get(position.node);
        let (leaf, removed) = if node.is_leaf() {
            (position.node, self.nodes.get_mut(position.node).remove_key(position.index))
        } else {
            let leaf = self.rightmost_leaf(node.child(position.index));
            let (predecessor, _) = self
                .nodes
                .get_mut(leaf)
                .pop_back()
                .expect("`RawBTree::remove_at()` - predecessor leaf is empty!");
            (leaf, self.nodes.get_mut(position.node).replace_key(position.index, predecessor))
        };
        self.len -= 1;

        if self.len == 0 {
            self.clear();
        } else {
            self.rebalance(leaf);
        }
        removed
    }

    /// Restores minimum occupancy from `handle` upwards after a removal.
    fn rebalance(&mut self, mut current: Handle) {
        loop {
            let node = self.nodes.get(current);
            let Some(parent) = node.parent() else {
                if node.key_count() == 0 && !node.is_leaf() {
                    let child = node.child(0);
                    self.nodes.free(current);
                    self.nodes.get_mut(child).set_parent(None);
                    self.root = Some(child);
                    trace!(root = ?child, "root emptied, tree shrank one level");
                }
                return;
            };
            if !node.is_underflowing() {
                return;
            }

            let parent_node = self.nodes.get(parent);
            let slot = parent_node.child_index(current);
            let left = slot.checked_sub(1).map(|index| parent_node.child(index));
            let right = (slot + 1 < parent_node.child_count()).then(|| parent_node.child(slot + 1));

            if left.is_some_and(|left| self.nodes.get(left).can_lend()) {
                self.rotate_right(parent, slot - 1);
                return;
            }
            if right.is_some_and(|right| self.nodes.get(right).can_lend()) {
                self.rotate_left(parent, slot);
                return;
            }

            if left.is_some() {
                self.merge_children(parent, slot - 1);
            } else {
                self.merge_children(parent, slot);
            }
            current = parent;
        }
    }

    /// Moves the last key of child `separator` up into the parent and the parent's separator
    /// down to the front of child `separator + 1`.
    fn rotate_right(&mut self, parent: Handle, separator: usize) {
        let (left, right) = self.siblings(parent, separator);
        let (key, child) = self
            .nodes
            .get_mut(left)
            .pop_back()
            .expect("`RawBTree::rotate_right()` - left sibling is empty!");
        let down = self.nodes.get_mut(parent).replace_key(separator, key);
        self.nodes.get_mut(right).push_front(down, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(Some(right));
        }
        trace!(from = ?left, to = ?right, "rotated key right");
    }

    /// Mirror of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, parent: Handle, separator: usize) {
        let (left, right) = self.siblings(parent, separator);
        let (key, child) = self
            .nodes
            .get_mut(right)
            .pop_front()
            .expect("`RawBTree::rotate_left()` - right sibling is empty!");
        let down = self.nodes.get_mut(parent).replace_key(separator, key);
        self.nodes.get_mut(left).push_back(down, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(Some(left));
        }
        trace!(from = ?right, to = ?left, "rotated key left");
    }

    /// Folds child `separator + 1` and the separator key into child `separator`.
    fn merge_children(&mut self, parent: Handle, separator: usize) {
        let (key, right) = self.nodes.get_mut(parent).remove_separator(separator);
        let left = self.nodes.get(parent).child(separator);
        let right_node = self.nodes.take(right);
        for &child in right_node.children() {
            self.nodes.get_mut(child).set_parent(Some(left));
        }
        self.nodes.get_mut(left).merge_with_right(key, right_node);
        trace!(?left, freed = ?right, ?parent, "merged siblings");
    }

    fn siblings(&self, parent: Handle, separator: usize) -> (Handle, Handle) {
        let node = self.nodes.get(parent);
        (node.child(separator), node.child(separator + 1))
    }
}
