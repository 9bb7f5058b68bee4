use alloc::vec;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Position, RawBTree};

/// An ordered set of unique values backed by an order-`M` B-tree.
///
/// Every node holds at most `M - 1` values and, apart from the root, at least
/// `ceil(M / 2) - 1`. `M` must be at least 3; smaller orders are rejected at compile time.
/// The default order of 4 gives the classic 2-3-4 tree.
///
/// It is a logic error for a value to be modified in such a way that its ordering relative to
/// any other value, as determined by the [`Ord`] trait, changes while it is in the set.
///
/// # Examples
///
/// ```
/// use mway_set::OrderedSet;
///
/// let mut set: OrderedSet<i32> = OrderedSet::new();
/// assert!(set.insert(5));
/// assert!(set.insert(3));
/// assert!(!set.insert(5));
///
/// assert_eq!(set.erase(&3), 1);
/// assert_eq!(set.erase(&3), 0);
/// assert_eq!(set.to_string(), "{5}");
/// ```
///
/// A wider node only changes the shape of the tree, never the contents:
///
/// ```
/// use mway_set::OrderedSet;
///
/// let narrow: OrderedSet<i32, 3> = (0..100).collect();
/// let wide: OrderedSet<i32, 64> = (0..100).rev().collect();
/// assert!(narrow.iter().eq(wide.iter()));
/// ```
pub struct OrderedSet<T, const M: usize = 4> {
    tree: RawBTree<T, M>,
}

/// A lazy, ascending iterator over (a suffix of) an [`OrderedSet`].
///
/// Created by [`OrderedSet::iter`], [`OrderedSet::find`], [`OrderedSet::lower_bound`] and
/// [`OrderedSet::upper_bound`]. An exhausted iterator plays the role of the end position.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, const M: usize = 4> {
    tree: &'a RawBTree<T, M>,
    front: Option<Position>,
}

/// An owning iterator over the values of an [`OrderedSet`] in ascending order.
pub struct IntoIter<T> {
    inner: vec::IntoIter<T>,
}

impl<T, const M: usize> OrderedSet<T, M> {
    /// Makes a new, empty `OrderedSet`. Does not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        OrderedSet { tree: RawBTree::new() }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every element and releases all nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = OrderedSet::from([1, 2, 3]);
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.first(), None);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator that visits the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::from([3, 1, 2]);
    /// let values: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(values, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, M> {
        self.iter_from(self.tree.first())
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first().map(|position| self.tree.key(position))
    }

    /// Returns the largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last().map(|position| self.tree.key(position))
    }

    fn iter_from(&self, front: Option<Position>) -> Iter<'_, T, M> {
        Iter { tree: &self.tree, front }
    }
}

impl<T: Ord, const M: usize> OrderedSet<T, M> {
    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was newly inserted. An equal value already in the set is kept
    /// and `value` is dropped.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert_unique(value).1
    }

    /// Removes a value from the set and returns how many values were removed (0 or 1).
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = OrderedSet::from([1, 2]);
    /// assert_eq!(set.erase(&2), 1);
    /// assert_eq!(set.erase(&2), 0);
    /// ```
    pub fn erase<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.erase_unique(value)
    }

    /// Removes a value from the set, returning whether it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(value)
    }

    /// Removes and returns the smallest element.
    pub fn pop_first(&mut self) -> Option<T> {
        let position = self.tree.first()?;
        Some(self.tree.remove_at(position))
    }

    /// Removes and returns the largest element.
    pub fn pop_last(&mut self) -> Option<T> {
        let position = self.tree.last()?;
        Some(self.tree.remove_at(position))
    }

    /// Returns `true` if the set contains a value.
    ///
    /// The value may be any borrowed form of the set's element type, but the ordering on the
    /// borrowed form *must* match the ordering on the element type.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.find(value).is_some()
    }

    /// Returns the number of elements equal to `value`: 0 or 1.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.count(value)
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.find(value).map(|position| self.tree.key(position))
    }

    /// Returns an iterator starting at `value`, or an exhausted one if `value` is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::from([1, 3, 5, 7]);
    /// assert_eq!(set.find(&3).copied().collect::<Vec<_>>(), [3, 5, 7]);
    /// assert_eq!(set.find(&4).next(), None);
    /// ```
    pub fn find<Q>(&self, value: &Q) -> Iter<'_, T, M>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.iter_from(self.tree.find(value))
    }

    /// Returns an iterator starting at the first element that is not less than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::from([1, 3, 5, 7]);
    /// assert_eq!(set.lower_bound(&4).peek(), Some(&5));
    /// assert_eq!(set.lower_bound(&5).peek(), Some(&5));
    /// assert_eq!(set.lower_bound(&8).peek(), None);
    /// ```
    pub fn lower_bound<Q>(&self, value: &Q) -> Iter<'_, T, M>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.iter_from(self.tree.lower_bound(value))
    }

    /// Returns an iterator starting at the first element that is greater than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::from([1, 3, 5, 7]);
    /// assert_eq!(set.upper_bound(&5).peek(), Some(&7));
    /// assert_eq!(set.upper_bound(&7).peek(), None);
    /// ```
    pub fn upper_bound<Q>(&self, value: &Q) -> Iter<'_, T, M>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.iter_from(self.tree.upper_bound(value))
    }
}

impl<'a, T, const M: usize> Iter<'a, T, M> {
    /// Returns the element the next call to `next` would yield, without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<&'a T> {
        self.front.map(|position| self.tree.key(position))
    }
}

impl<T: Clone, const M: usize> Clone for OrderedSet<T, M> {
    fn clone(&self) -> Self {
        OrderedSet {
            tree: self.tree.clone(),
        }
    }
}

impl<T: PartialEq, const M: usize> PartialEq for OrderedSet<T, M> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const M: usize> Eq for OrderedSet<T, M> {}

impl<T: fmt::Debug, const M: usize> fmt::Debug for OrderedSet<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Prints the elements in ascending order as `{a,b,c}`; the empty set prints as `{}`.
impl<T: fmt::Display, const M: usize> fmt::Display for OrderedSet<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            fmt::Display::fmt(value, f)?;
        }
        f.write_str("}")
    }
}

impl<T, const M: usize> Default for OrderedSet<T, M> {
    fn default() -> Self {
        OrderedSet::new()
    }
}

impl<T: Ord, const M: usize> FromIterator<T> for OrderedSet<T, M> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord, const M: usize> Extend<T> for OrderedSet<T, M> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy, const M: usize> Extend<&'a T> for OrderedSet<T, M> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const M: usize, const N: usize> From<[T; N]> for OrderedSet<T, M> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, const M: usize> IntoIterator for OrderedSet<T, M> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Moves the values out in ascending order.
    ///
    /// ```
    /// use mway_set::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::from([4, 2, 3, 1]);
    /// let values: Vec<_> = set.into_iter().collect();
    /// assert_eq!(values, [1, 2, 3, 4]);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.tree.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T, const M: usize> IntoIterator for &'a OrderedSet<T, M> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, M>;

    fn into_iter(self) -> Iter<'a, T, M> {
        self.iter()
    }
}

impl<'a, T, const M: usize> Iterator for Iter<'a, T, M> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let position = self.front?;
        self.front = self.tree.successor(position);
        Some(self.tree.key(position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.front {
            Some(_) => (1, Some(self.tree.len())),
            None => (0, Some(0)),
        }
    }
}

impl<T, const M: usize> FusedIterator for Iter<'_, T, M> {}

impl<T, const M: usize> Clone for Iter<'_, T, M> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
        }
    }
}

impl<T: fmt::Debug, const M: usize> fmt::Debug for Iter<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
    }
}
