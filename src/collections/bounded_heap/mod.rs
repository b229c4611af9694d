//! [`BoundedArrayHeap`], a binary heap stored in an array.
//!
//! Elements are addressed 1..=len, the children of element i are 2i and 2i + 1 and its parent
//! is i / 2. Which element is "better" is decided by an ordering function fixed at
//! construction, the heap keeps the best element at the root.
//!
//! There are two modes:
//!
//! - A growable priority queue ( [`BoundedArrayHeap::new`], [`BoundedArrayHeap::with_order`] ),
//!   which owns a `Vec` that grows and shrinks by exactly one slot for each insert or delete.
//!
//! - A heap built over a caller's slice ( [`BoundedArrayHeap::from_array`] ) with the reverse of
//!   the natural ordering. Each [`delete_min`] moves the current largest element into the slot
//!   given up at the end of the live region, so deleting until empty leaves the slice sorted.
//!   This is what [`crate::slice::heap_sort`] does.
//!
//! Both modes share the same sift routines, ties between two children go to the left child.
//!
//! [`delete_min`]: BoundedArrayHeap::delete_min

use std::cmp::Ordering;
use std::fmt::{self, Debug};

use super::Error;

/// Function deciding the heap order, `Less` means the first argument belongs nearer the root.
pub type Compare<T> = fn(&T, &T) -> Ordering;

fn reverse<T: Ord>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}

// The sift routines work on the live elements h, element i being h[i - 1].

/// Child of i that the element at i must swap with to restore heap order, if any.
fn perc_target<T>(h: &[T], i: usize, compare: Compare<T>) -> Option<usize> {
    let left = 2 * i;
    if left > h.len() {
        return None;
    }
    let right = left + 1;
    let child = if right <= h.len() && compare(&h[right - 1], &h[left - 1]) == Ordering::Less {
        right
    } else {
        left
    };
    (compare(&h[child - 1], &h[i - 1]) == Ordering::Less).then_some(child)
}

fn sift_down<T>(h: &mut [T], mut i: usize, compare: Compare<T>) {
    while let Some(child) = perc_target(h, i, compare) {
        h.swap(i - 1, child - 1);
        i = child;
    }
}

fn sift_up<T>(h: &mut [T], mut i: usize, compare: Compare<T>) {
    while i > 1 {
        let parent = i / 2;
        if compare(&h[parent - 1], &h[i - 1]) != Ordering::Greater {
            break;
        }
        h.swap(parent - 1, i - 1);
        i = parent;
    }
}

/// A binary heap stored in an array, see the [module documentation](self).
///
/// `S` is the backing storage: `Vec<T>` for the growable priority queue, `&mut [T]` for a heap
/// built over a caller's slice.
///
/// # Example
///
/// ```
/// use ordstd::collections::BoundedArrayHeap;
///
/// let mut heap = BoundedArrayHeap::new();
/// for x in [5, 3, 8, 1] {
///     heap.insert(x);
/// }
/// assert_eq!(heap.delete_min(), Some(1));
/// assert_eq!(heap.delete_min(), Some(3));
/// assert_eq!(heap.delete_min(), Some(5));
/// assert_eq!(heap.delete_min(), Some(8));
/// assert_eq!(heap.delete_min(), None);
/// ```
pub struct BoundedArrayHeap<T, S = Vec<T>> {
    slots: S,
    /// Slot holding element 1.
    base: usize,
    len: usize,
    compare: Compare<T>,
}

impl<T, S> BoundedArrayHeap<T, S>
where
    S: AsRef<[T]> + AsMut<[T]>,
{
    /// Number of elements in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the heap empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The element at the root ( the next one [`delete_min`](Self::delete_min) returns ), if any.
    pub fn peek(&self) -> Option<&T> {
        self.live().first()
    }

    /// Would the element at position i ( 1-based ) have to move down to restore heap order.
    ///
    /// Returns `false` for positions outside 1..=len.
    pub fn should_perc(&self, i: usize) -> bool {
        i >= 1 && i <= self.len && perc_target(self.live(), i, self.compare).is_some()
    }

    fn live(&self) -> &[T] {
        &self.slots.as_ref()[self.base..self.base + self.len]
    }

    fn live_mut(&mut self) -> &mut [T] {
        let (base, len) = (self.base, self.len);
        &mut self.slots.as_mut()[base..base + len]
    }

    fn build(&mut self) {
        let compare = self.compare;
        let h = self.live_mut();
        for i in (1..=h.len() / 2).rev() {
            sift_down(h, i, compare);
        }
    }

    /// Moves the root into the last live slot, shrinks the live region by one and restores heap
    /// order over what remains. Returns the slot now holding the old root.
    fn extract(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let compare = self.compare;
        let h = self.live_mut();
        let last = h.len() - 1;
        h.swap(0, last);
        sift_down(&mut h[..last], 1, compare);
        self.len -= 1;
        Some(self.base + self.len)
    }
}

impl<T: Ord> BoundedArrayHeap<T> {
    /// Returns a new, empty priority queue, smallest element first.
    #[must_use]
    pub fn new() -> Self {
        Self::with_order(T::cmp)
    }
}

impl<T> BoundedArrayHeap<T> {
    /// Returns a new, empty priority queue ordered by compare.
    ///
    /// # Example
    ///
    /// ```
    /// use ordstd::collections::BoundedArrayHeap;
    ///
    /// let mut heap = BoundedArrayHeap::with_order(|a: &i32, b: &i32| b.cmp(a));
    /// heap.extend([1, 7, 4]);
    /// assert_eq!(heap.delete_min(), Some(7));
    /// ```
    #[must_use]
    pub fn with_order(compare: Compare<T>) -> Self {
        Self {
            slots: Vec::new(),
            base: 0,
            len: 0,
            compare,
        }
    }

    /// Adds an element, growing the storage by one slot.
    pub fn insert(&mut self, elem: T) {
        self.slots.reserve_exact(1);
        self.slots.push(elem);
        self.len += 1;
        let (i, compare) = (self.len, self.compare);
        sift_up(self.live_mut(), i, compare);
    }

    /// Removes and returns the root element, shrinking the storage by one slot.
    /// Returns `None` if the heap is empty.
    pub fn delete_min(&mut self) -> Option<T> {
        self.extract()?;
        let result = self.slots.pop();
        self.slots.shrink_to_fit();
        result
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drains the heap into a `Vec`, root first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut result = Vec::with_capacity(self.len);
        while let Some(e) = self.delete_min() {
            result.push(e);
        }
        result
    }
}

impl<'a, T: Ord> BoundedArrayHeap<T, &'a mut [T]> {
    /// Builds a heap over slots, which is borrowed for the lifetime of the heap.
    ///
    /// The smallest element is moved to `slots[0]` ( see [`spare`](Self::spare) ), the rest are
    /// arranged as a heap with the largest element at the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if slots is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use ordstd::collections::BoundedArrayHeap;
    ///
    /// let mut v = [4, 9, 1, 6];
    /// let mut heap = BoundedArrayHeap::from_array(&mut v).unwrap();
    /// assert_eq!(heap.spare(), &1);
    /// assert_eq!(heap.len(), 3);
    /// assert_eq!(heap.delete_min(), Some(&9));
    /// ```
    pub fn from_array(slots: &'a mut [T]) -> Result<Self, Error> {
        if slots.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let mut min = 0;
        for i in 1..slots.len() {
            if slots[min] > slots[i] {
                min = i;
            }
        }
        slots.swap(0, min);
        let len = slots.len() - 1;
        let mut heap = Self {
            slots,
            base: 1,
            len,
            compare: reverse::<T>,
        };
        heap.build();
        tracing::trace!(len, "built heap over slice");
        Ok(heap)
    }
}

impl<'a, T> BoundedArrayHeap<T, &'a mut [T]> {
    /// Moves the root element to the end of the live region and returns a reference to it there.
    /// Returns `None` if the heap is empty.
    pub fn delete_min(&mut self) -> Option<&T> {
        let at = self.extract()?;
        Some(&self.slots[at])
    }

    /// The smallest element of the original slice, kept in `slots[0]`.
    pub fn spare(&self) -> &T {
        &self.slots[0]
    }

    /// Ends the heap, returning the slice.
    pub fn into_inner(self) -> &'a mut [T] {
        self.slots
    }
}

impl<T: Ord> Default for BoundedArrayHeap<T> {
    /// Creates an empty priority queue.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug, S: AsRef<[T]> + AsMut<[T]>> Debug for BoundedArrayHeap<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.live()).finish()
    }
}

impl<T> Extend<T> for BoundedArrayHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for e in iter {
            self.insert(e);
        }
    }
}

impl<T: Ord> FromIterator<T> for BoundedArrayHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}
