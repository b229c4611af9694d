//! [`OrderedSet`], an ordered set based on an unbalanced binary search tree.
//!
//! # Iteration
//!
//! Besides the usual borrowing iterator returned by [`OrderedSet::iter`], the set offers
//! fail-fast iterators ( [`InOrderIter`] and [`PreOrderIter`] ) which do not hold a borrow of the
//! set between steps. Each step is given the set, and fails with
//! [`Error::ConcurrentModification`] if the set was changed since the iterator was created,
//! other than through the iterator's own `remove`. [`SnapshotIter`] copies the elements when
//! created and is never affected by later changes.
//!
//! # Example
//!
//! ```
//!     use ordstd::collections::OrderedSet;
//!     let mut set = OrderedSet::new();
//!     for x in [5, 3, 8, 1, 4] {
//!         set.insert(x);
//!     }
//!     set.remove(&3);
//!     assert_eq!(set.to_vec(), [1, 4, 5, 8]);
//!     assert!(!set.contains(&3));
//! ```
//!
//! # Tree shape
//!
//! No rebalancing is done. Inserting elements in ascending order produces a tree whose height
//! equals its size, and each operation then takes time proportional to the size. All walks use
//! explicit stacks, so a tall tree does not exhaust the call stack.

use std::borrow::Borrow;
use std::fmt::{self, Debug, Display};
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use super::Error;

mod arena;
use arena::{Tree, SENTINEL};

mod iter;
pub use iter::{InOrderIter, PreOrderIter, SnapshotIter};

/// Source of set identities, so a fail-fast iterator can tell its own set from any other.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity and modification count of a set at some point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stamp {
    id: u64,
    mods: u64,
}

/// An ordered set based on a binary search tree.
///
/// # Guide to methods
///
/// Set Creation: [`new`]
///
/// Properties: [`len`], [`is_empty`], [`height`], [`contains`], [`first`], [`last`]
///
/// Insertion: [`insert`], [`try_insert`]
///
/// Removal: [`remove`], [`try_remove`], [`clear`]
///
/// Traversals: [`pre_order`], [`in_order`], [`post_order`], [`to_vec`]
///
/// Iterators: [`iter`], [`in_order_iter`], [`pre_order_iter`], [`snapshot_iter`]
///
/// [`new`]: OrderedSet::new
/// [`len`]: OrderedSet::len
/// [`is_empty`]: OrderedSet::is_empty
/// [`height`]: OrderedSet::height
/// [`contains`]: OrderedSet::contains
/// [`first`]: OrderedSet::first
/// [`last`]: OrderedSet::last
/// [`insert`]: OrderedSet::insert
/// [`try_insert`]: OrderedSet::try_insert
/// [`remove`]: OrderedSet::remove
/// [`try_remove`]: OrderedSet::try_remove
/// [`clear`]: OrderedSet::clear
/// [`pre_order`]: OrderedSet::pre_order
/// [`in_order`]: OrderedSet::in_order
/// [`post_order`]: OrderedSet::post_order
/// [`to_vec`]: OrderedSet::to_vec
/// [`iter`]: OrderedSet::iter
/// [`in_order_iter`]: OrderedSet::in_order_iter
/// [`pre_order_iter`]: OrderedSet::pre_order_iter
/// [`snapshot_iter`]: OrderedSet::snapshot_iter
pub struct OrderedSet<T> {
    tree: Tree<T>,
    len: usize,
    id: u64,
    mods: u64,
}

impl<T> OrderedSet<T> {
    /// Returns a new, empty `OrderedSet`.
    ///
    /// # Example
    ///
    /// ```
    /// # #![allow(unused_mut)]
    /// use ordstd::collections::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = OrderedSet::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            len: 0,
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            mods: 0,
        }
    }

    /// Returns number of elements in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Does the set have any elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of edges on the longest path from the root to a leaf.
    ///
    /// An empty set has height -1 and a set with one element has height 0.
    ///
    /// # Example
    ///
    /// ```
    /// use ordstd::collections::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert_eq!(set.height(), -1);
    /// set.insert(2);
    /// assert_eq!(set.height(), 0);
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.height(), 1);
    /// ```
    pub fn height(&self) -> isize {
        self.tree.height()
    }

    /// Removes all elements.
    ///
    /// Storage freed by [`OrderedSet::remove`] is kept for reuse by later inserts while the set
    /// is non-empty. It is released here, and when the last element is removed.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
        self.mods += 1;
    }

    /// Returns a reference to the smallest element.
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns a reference to the largest element.
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Elements in pre-order ( node, left subtree, right subtree ).
    pub fn pre_order(&self) -> Vec<&T> {
        self.tree.pre_order()
    }

    /// Elements in ascending order.
    pub fn in_order(&self) -> Vec<&T> {
        self.tree.in_order()
    }

    /// Elements in post-order ( left subtree, right subtree, node ).
    pub fn post_order(&self) -> Vec<&T> {
        self.tree.post_order()
    }

    /// Clones the elements into a `Vec` in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Gets an iterator that visits the elements in ascending order.
    ///
    /// # Example
    ///
    /// ```
    /// use ordstd::collections::OrderedSet;
    ///
    /// let set = OrderedSet::from([3, 1, 2]);
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let mut stack = Vec::new();
        self.tree.push_left_spine(&mut stack, self.tree.root());
        Iter {
            tree: &self.tree,
            stack,
            remaining: self.len,
        }
    }

    /// Gets a fail-fast in-order iterator, see [`InOrderIter`].
    pub fn in_order_iter(&self) -> InOrderIter<T> {
        InOrderIter::new(self)
    }

    /// Gets a fail-fast pre-order iterator, see [`PreOrderIter`].
    pub fn pre_order_iter(&self) -> PreOrderIter<T> {
        PreOrderIter::new(self)
    }

    /// Gets an iterator over a copy of the elements, see [`SnapshotIter`].
    pub fn snapshot_iter(&self) -> SnapshotIter<T>
    where
        T: Clone,
    {
        SnapshotIter::new(self.to_vec())
    }

    pub(crate) fn stamp(&self) -> Stamp {
        Stamp {
            id: self.id,
            mods: self.mods,
        }
    }

    /// Removes node ix through the same path as [`OrderedSet::remove`], returning the element
    /// and the index that took its place.
    pub(crate) fn remove_node(&mut self, ix: usize) -> (T, usize)
    where
        T: Ord,
    {
        let (at, found) = self.tree.locate(&self.tree.node(ix).elem);
        debug_assert!(found == ix);
        self.unlink(at, found)
    }

    fn unlink(&mut self, at: arena::Link, ix: usize) -> (T, usize) {
        let result = self.tree.unlink(at, ix);
        self.len -= 1;
        self.mods += 1;
        if self.len == 0 {
            // Free slots are only reused, so release them once nothing is live.
            self.tree.clear();
        }
        result
    }
}

impl<T: Ord> OrderedSet<T> {
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. If an equal value is already present
    /// the set is left unchanged and `false` is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use ordstd::collections::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let (at, ix) = self.tree.locate(&value);
        if ix != SENTINEL {
            return false;
        }
        self.tree.attach(at, value);
        self.len += 1;
        self.mods += 1;
        true
    }

    /// Like [`OrderedSet::insert`] for a value that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if value is `None`, the set is not changed.
    pub fn try_insert(&mut self, value: Option<T>) -> Result<bool, Error> {
        let value = value.ok_or(Error::InvalidArgument)?;
        Ok(self.insert(value))
    }

    /// Returns `true` if the set contains an element equal to the value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.locate(value).1 != SENTINEL
    }

    /// Removes the element equal to value, returning whether it was present.
    ///
    /// # Example
    ///
    /// ```
    /// use ordstd::collections::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([2]);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (at, ix) = self.tree.locate(value);
        if ix == SENTINEL {
            return false;
        }
        self.unlink(at, ix);
        true
    }

    /// Like [`OrderedSet::remove`] for a value that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if value is `None`, the set is not changed.
    pub fn try_remove<Q>(&mut self, value: Option<&Q>) -> Result<bool, Error>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let value = value.ok_or(Error::InvalidArgument)?;
        Ok(self.remove(value))
    }
}

impl<T> Default for OrderedSet<T> {
    /// Creates an empty `OrderedSet`.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for OrderedSet<T> {
    /// The clone is a separate set, iterators of the original do not apply to it.
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            len: self.len,
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            mods: 0,
        }
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

impl<T: Debug> Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Display> Display for OrderedSet<T> {
    /// Writes the elements in ascending order as `[a, b, c]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OrderedSet<T> {
    /// Converts a `[T; N]` into an `OrderedSet<T>`, inserting in array order.
    ///
    /// If the array contains any equal values,
    /// all but the first will be dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use ordstd::collections::OrderedSet;
    ///
    /// let set1 = OrderedSet::from([1, 2, 3, 4]);
    /// let set2: OrderedSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        let mut result = OrderedSet::new();
        for e in arr {
            result.insert(e);
        }
        result
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<X: IntoIterator<Item = T>>(iter: X) -> OrderedSet<T> {
        let mut result = OrderedSet::new();
        for k in iter {
            result.insert(k);
        }
        result
    }
}

impl<T: Ord> Extend<T> for OrderedSet<T> {
    #[inline]
    fn extend<Iter: IntoIterator<Item = T>>(&mut self, iter: Iter) {
        iter.into_iter().for_each(move |elem| {
            self.insert(elem);
        });
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An iterator over the elements of an `OrderedSet` in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedSet`].
/// The set is borrowed for the lifetime of the iterator, so it cannot be changed while iterating.
///
/// [`iter`]: OrderedSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    tree: &'a Tree<T>,
    stack: Vec<usize>,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let ix = self.stack.pop()?;
        let n = self.tree.node(ix);
        self.tree.push_left_spine(&mut self.stack, n.right);
        self.remaining -= 1;
        Some(&n.elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn min(mut self) -> Option<&'a T>
    where
        &'a T: Ord,
    {
        self.next()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(feature = "serde")]
use serde::{
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[cfg(feature = "serde")]
impl<T: Serialize> Serialize for OrderedSet<T> {
    /// Elements are written in pre-order, so inserting them in sequence rebuilds the same tree shape.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for e in self.pre_order() {
            seq.serialize_element(e)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedSetVisitor<T> {
    marker: std::marker::PhantomData<fn() -> OrderedSet<T>>,
}

#[cfg(feature = "serde")]
impl<'de, T> Visitor<'de> for OrderedSetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = OrderedSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("OrderedSet")
    }

    fn visit_seq<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: SeqAccess<'de>,
    {
        let mut set = OrderedSet::new();
        while let Some(e) = access.next_element()? {
            set.insert(e);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> Deserialize<'de> for OrderedSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

#[cfg(test)]
mod tests;
