use alloc::vec::Vec;
use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;
use super::order::Order;

/// A node of an order-`M` B-tree.
///
/// Leaves and internal nodes share this layout; a leaf simply has no children. Keys are kept
/// strictly increasing and an internal node with `k` keys has `k + 1` children.
#[derive(Clone)]
pub(crate) struct Node<K, const M: usize> {
    // Non-owning back-reference; `None` for the root.
    parent: Option<Handle>,
    // `M` slots: `M - 1` keys plus the overflow key that triggers a split.
    keys: SmallVec<[K; M]>,
    children: Vec<Handle>,
}

/// Result of searching a single node for a key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SearchResult {
    /// Key is stored at this index.
    Found(usize),
    /// Key is absent; it belongs in child `index` (or at `index` in a leaf).
    GoDown(usize),
}

impl<K, const M: usize> Node<K, M> {
    pub(crate) fn new_leaf() -> Self {
        Self {
            parent: None,
            keys: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a key-less internal node whose only child is `child`. Used when the root splits.
    pub(crate) fn new_root(child: Handle) -> Self {
        let mut children = Vec::with_capacity(M + 1);
        children.push(child);
        Self {
            parent: None,
            keys: SmallVec::new(),
            children,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Returns the slot of `child` in this node's child list.
    pub(crate) fn child_index(&self, child: Handle) -> usize {
        self.children
            .iter()
            .position(|&handle| handle == child)
            .expect("`Node::child_index()` - `child` is not a child of this node!")
    }

    /// True once an insertion has pushed the node past `M - 1` keys.
    pub(crate) fn is_overflowing(&self) -> bool {
        self.keys.len() > Order::<M>::MAX_KEYS
    }

    pub(crate) fn is_underflowing(&self) -> bool {
        self.keys.len() < Order::<M>::MIN_KEYS
    }

    /// True if a key can be rotated out without this node underflowing.
    pub(crate) fn can_lend(&self) -> bool {
        self.keys.len() > Order::<M>::MIN_KEYS
    }

    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::GoDown(index),
        }
    }

    /// Index of the first key that is not less than `key` (`inclusive`) or greater than `key`.
    pub(crate) fn bound_index<Q>(&self, key: &Q, inclusive: bool) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if inclusive {
            self.keys.partition_point(|k| k.borrow() < key)
        } else {
            self.keys.partition_point(|k| k.borrow() <= key)
        }
    }

    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    /// Inserts `key` at `index` with `right` as the child just after it.
    pub(crate) fn insert_separator(&mut self, index: usize, key: K, right: Handle) {
        self.keys.insert(index, key);
        self.children.insert(index + 1, right);
    }

    /// Removes key `index` and the child to its right.
    pub(crate) fn remove_separator(&mut self, index: usize) -> (K, Handle) {
        let key = self.keys.remove(index);
        let right = self.children.remove(index + 1);
        (key, right)
    }

    /// Removes the first key together with the first child, if any.
    pub(crate) fn pop_front(&mut self) -> Option<(K, Option<Handle>)> {
        if self.keys.is_empty() {
            return None;
        }
        let key = self.keys.remove(0);
        let child = (!self.children.is_empty()).then(|| self.children.remove(0));
        Some((key, child))
    }

    /// Removes the last key together with the last child, if any.
    pub(crate) fn pop_back(&mut self) -> Option<(K, Option<Handle>)> {
        let key = self.keys.pop()?;
        let child = self.children.pop();
        Some((key, child))
    }

    pub(crate) fn push_front(&mut self, key: K, child: Option<Handle>) {
        self.keys.insert(0, key);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    pub(crate) fn push_back(&mut self, key: K, child: Option<Handle>) {
        self.keys.push(key);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Splits an overflowing node around its median key.
    ///
    /// Keys before the median stay here, keys after it (and the children between them) move to
    /// the returned right sibling. The right sibling inherits this node's parent; its children
    /// still point at this node and must be re-parented by the caller.
    pub(crate) fn split(&mut self) -> (K, Node<K, M>) {
        let mid = self.keys.len() / 2;

        let mut right = Node {
            parent: self.parent,
            keys: self.keys.drain(mid + 1..).collect(),
            children: Vec::new(),
        };
        if !self.is_leaf() {
            right.children.reserve(M + 1);
            right.children.extend(self.children.drain(mid + 1..));
        }

        let median = self.keys.pop().expect("`Node::split()` - node has no median key!");
        (median, right)
    }

    pub(crate) fn into_parts(self) -> (SmallVec<[K; M]>, Vec<Handle>) {
        (self.keys, self.children)
    }

    /// Appends `separator` and all of `right`'s keys and children to this node.
    pub(crate) fn merge_with_right(&mut self, separator: K, right: Node<K, M>) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;

    fn leaf(keys: &[i32]) -> Node<i32, 4> {
        let mut node = Node::new_leaf();
        for (index, &key) in keys.iter().enumerate() {
            node.insert_key(index, key);
        }
        node
    }

    fn handles(indices: &[usize]) -> Vec<Handle> {
        indices.iter().map(|&index| Handle::from_index(index)).collect()
    }

    #[test]
    fn search_reports_found_and_descent_slot() {
        let node = leaf(&[10, 20, 30]);
        assert_eq!(node.search(&20), SearchResult::Found(1));
        assert_eq!(node.search(&5), SearchResult::GoDown(0));
        assert_eq!(node.search(&25), SearchResult::GoDown(2));
        assert_eq!(node.search(&35), SearchResult::GoDown(3));
    }

    #[test]
    fn bound_index_inclusive_and_exclusive() {
        let node = leaf(&[10, 20, 30]);
        assert_eq!(node.bound_index(&20, true), 1);
        assert_eq!(node.bound_index(&20, false), 2);
        assert_eq!(node.bound_index(&31, true), 3);
        assert_eq!(node.bound_index(&0, false), 0);
    }

    #[test]
    fn occupancy_thresholds() {
        assert!(leaf(&[]).is_underflowing());
        assert!(!leaf(&[1]).is_underflowing());
        assert!(!leaf(&[1]).can_lend());
        assert!(leaf(&[1, 2]).can_lend());
        assert!(!leaf(&[1, 2, 3]).is_overflowing());
        assert!(leaf(&[1, 2, 3, 4]).is_overflowing());
    }

    #[test]
    fn leaf_split_promotes_median() {
        let mut node = leaf(&[1, 2, 3, 4]);
        let (median, right) = node.split();
        assert_eq!(median, 3);
        assert_eq!(node.keys(), &[1, 2]);
        assert_eq!(right.keys(), &[4]);
        assert!(right.is_leaf());
    }

    #[test]
    fn internal_split_moves_right_children() {
        let mut node: Node<i32, 4> = Node::new_root(Handle::from_index(0));
        for (index, key) in [10, 20, 30, 40].into_iter().enumerate() {
            node.insert_separator(index, key, Handle::from_index(index + 1));
        }
        node.set_parent(Some(Handle::from_index(99)));

        let (median, right) = node.split();
        assert_eq!(median, 30);
        assert_eq!(node.keys(), &[10, 20]);
        assert_eq!(node.children(), handles(&[0, 1, 2]).as_slice());
        assert_eq!(right.keys(), &[40]);
        assert_eq!(right.children(), handles(&[3, 4]).as_slice());
        assert_eq!(right.parent(), Some(Handle::from_index(99)));
    }

    #[test]
    fn merge_pulls_separator_between_halves() {
        let mut left = leaf(&[1]);
        left.merge_with_right(5, leaf(&[7]));
        assert_eq!(left.keys(), &[1, 5, 7]);
        assert!(left.is_leaf());
    }

    #[test]
    fn rotations_carry_children() {
        let mut node: Node<i32, 4> = Node::new_root(Handle::from_index(0));
        node.insert_separator(0, 10, Handle::from_index(1));
        node.insert_separator(1, 20, Handle::from_index(2));

        assert_eq!(node.pop_back(), Some((20, Some(Handle::from_index(2)))));
        assert_eq!(node.pop_front(), Some((10, Some(Handle::from_index(0)))));
        assert_eq!(node.children(), handles(&[1]).as_slice());

        node.push_front(5, Some(Handle::from_index(7)));
        node.push_back(15, Some(Handle::from_index(8)));
        assert_eq!(node.keys(), &[5, 15]);
        assert_eq!(node.children(), handles(&[7, 1, 8]).as_slice());
        assert_eq!(node.child_index(Handle::from_index(8)), 2);
    }

    #[test]
    fn separator_round_trip() {
        let mut node: Node<i32, 4> = Node::new_root(Handle::from_index(0));
        node.insert_separator(0, 10, Handle::from_index(1));
        assert_eq!(node.remove_separator(0), (10, Handle::from_index(1)));
        assert_eq!(node.key_count(), 0);
        assert_eq!(node.children(), vec![Handle::from_index(0)].as_slice());
    }
}
