use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::arena::SENTINEL;
use super::{Error, OrderedSet, Stamp};

/// Checks that set is the set the iterator was created from and has not been changed since.
fn verify<T>(stamp: Stamp, set: &OrderedSet<T>) -> Result<(), Error> {
    let found = set.stamp();
    if stamp == found {
        Ok(())
    } else {
        tracing::debug!(?stamp, ?found, "fail-fast iterator rejected changed set");
        Err(Error::ConcurrentModification)
    }
}

/// Fail-fast iterator over an [`OrderedSet`] in ascending order.
///
/// Created by [`OrderedSet::in_order_iter`]. The iterator does not borrow the set, instead the
/// set is passed to each call of [`next`] and [`remove`]. If the set has been changed since the
/// iterator was created ( other than by this iterator's [`remove`] ), or a different set is
/// passed, the call fails with [`Error::ConcurrentModification`] and the iterator does not advance.
///
/// # Example
///
/// ```
/// use ordstd::collections::{Error, OrderedSet};
///
/// let mut set = OrderedSet::from([1, 2, 3]);
/// let mut it = set.in_order_iter();
/// assert_eq!(it.next(&set), Ok(&1));
/// set.insert(4);
/// assert_eq!(it.next(&set), Err(Error::ConcurrentModification));
/// ```
///
/// [`next`]: InOrderIter::next
/// [`remove`]: InOrderIter::remove
pub struct InOrderIter<T> {
    stack: Vec<usize>,
    stamp: Stamp,
    /// Node returned by the last `next`, cleared by `remove`.
    last: Option<usize>,
    marker: PhantomData<fn(&T)>,
}

impl<T> InOrderIter<T> {
    pub(super) fn new(set: &OrderedSet<T>) -> Self {
        let mut stack = Vec::new();
        set.tree.push_left_spine(&mut stack, set.tree.root());
        Self {
            stack,
            stamp: set.stamp(),
            last: None,
            marker: PhantomData,
        }
    }

    /// Are there more elements to visit.
    pub fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Advances the iterator, returning the next element.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] if there are no more elements,
    /// [`Error::ConcurrentModification`] if the set has been changed.
    #[allow(clippy::should_implement_trait)]
    pub fn next<'a>(&mut self, set: &'a OrderedSet<T>) -> Result<&'a T, Error> {
        let Some(&ix) = self.stack.last() else {
            return Err(Error::NoSuchElement);
        };
        verify(self.stamp, set)?;
        self.stack.pop();
        let n = set.tree.node(ix);
        set.tree.push_left_spine(&mut self.stack, n.right);
        self.last = Some(ix);
        Ok(&n.elem)
    }

    /// Removes the element most recently returned by [`InOrderIter::next`] from the set and returns it.
    ///
    /// The iterator stays usable afterwards. Other iterators over the set will fail.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalState`] if `next` has not been called since the last `remove`, or there
    /// are no more elements to visit, [`Error::ConcurrentModification`] if the set has been changed.
    pub fn remove(&mut self, set: &mut OrderedSet<T>) -> Result<T, Error>
    where
        T: Ord,
    {
        let ix = match self.last {
            Some(ix) if self.has_next() => ix,
            _ => return Err(Error::IllegalState),
        };
        verify(self.stamp, set)?;
        // Nodes still on the stack are unvisited, removal only frees the removed node or its
        // already visited predecessor, so the stack stays valid.
        let (elem, _) = set.remove_node(ix);
        self.last = None;
        self.stamp = set.stamp();
        Ok(elem)
    }
}

impl<T> fmt::Debug for InOrderIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InOrderIter")
            .field("pending", &self.stack.len())
            .field("stamp", &self.stamp)
            .finish()
    }
}

/// Fail-fast iterator over an [`OrderedSet`] in pre-order ( node, left subtree, right subtree ).
///
/// Created by [`OrderedSet::pre_order_iter`], with the same contract as [`InOrderIter`].
///
/// # Example
///
/// ```
/// use ordstd::collections::OrderedSet;
///
/// let set = OrderedSet::from([2, 1, 3]);
/// let mut it = set.pre_order_iter();
/// let mut v = Vec::new();
/// while it.has_next() {
///     v.push(*it.next(&set).unwrap());
/// }
/// assert_eq!(v, [2, 1, 3]);
/// ```
pub struct PreOrderIter<T> {
    stack: Vec<usize>,
    stamp: Stamp,
    last: Option<usize>,
    /// Number of children the last `next` pushed.
    pushed: usize,
    marker: PhantomData<fn(&T)>,
}

impl<T> PreOrderIter<T> {
    pub(super) fn new(set: &OrderedSet<T>) -> Self {
        let root = set.tree.root();
        let stack = if root == SENTINEL { Vec::new() } else { vec![root] };
        Self {
            stack,
            stamp: set.stamp(),
            last: None,
            pushed: 0,
            marker: PhantomData,
        }
    }

    /// Are there more elements to visit.
    pub fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Advances the iterator, returning the next element.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] if there are no more elements,
    /// [`Error::ConcurrentModification`] if the set has been changed.
    #[allow(clippy::should_implement_trait)]
    pub fn next<'a>(&mut self, set: &'a OrderedSet<T>) -> Result<&'a T, Error> {
        let Some(&ix) = self.stack.last() else {
            return Err(Error::NoSuchElement);
        };
        verify(self.stamp, set)?;
        self.stack.pop();
        let n = set.tree.node(ix);
        self.pushed = 0;
        for child in [n.right, n.left] {
            if child != SENTINEL {
                self.stack.push(child);
                self.pushed += 1;
            }
        }
        self.last = Some(ix);
        Ok(&n.elem)
    }

    /// Removes the element most recently returned by [`PreOrderIter::next`] from the set and returns it.
    ///
    /// The iterator stays usable and visits the remaining elements of the changed set.
    ///
    /// # Errors
    ///
    /// As for [`InOrderIter::remove`].
    pub fn remove(&mut self, set: &mut OrderedSet<T>) -> Result<T, Error>
    where
        T: Ord,
    {
        let ix = match self.last {
            Some(ix) if self.has_next() => ix,
            _ => return Err(Error::IllegalState),
        };
        verify(self.stamp, set)?;
        // The children of the removed node are on top of the stack and still unvisited. Whatever
        // replaces the node ( a child, or the node itself now holding its predecessor ) roots
        // exactly the unvisited elements of that subtree.
        let keep = self.stack.len() - self.pushed;
        self.stack.truncate(keep);
        let (elem, replacement) = set.remove_node(ix);
        if replacement != SENTINEL {
            self.stack.push(replacement);
        }
        self.last = None;
        self.pushed = 0;
        self.stamp = set.stamp();
        Ok(elem)
    }
}

impl<T> fmt::Debug for PreOrderIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreOrderIter")
            .field("pending", &self.stack.len())
            .field("stamp", &self.stamp)
            .finish()
    }
}

/// Iterator over a copy of the elements of an [`OrderedSet`] in ascending order.
///
/// Created by [`OrderedSet::snapshot_iter`]. Later changes to the set are not seen.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct SnapshotIter<T> {
    iter: std::vec::IntoIter<T>,
}

impl<T> SnapshotIter<T> {
    pub(super) fn new(elems: Vec<T>) -> Self {
        Self {
            iter: elems.into_iter(),
        }
    }

    /// Are there more elements to visit.
    pub fn has_next(&self) -> bool {
        self.iter.len() > 0
    }
}

impl<T> Iterator for SnapshotIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for SnapshotIter<T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for SnapshotIter<T> {}
