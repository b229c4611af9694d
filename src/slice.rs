use crate::collections::BoundedArrayHeap;

/// Sorts the slice in ascending order, in place, using [`BoundedArrayHeap::from_array`].
///
/// The sort is not stable and uses no extra storage. It takes *O*(*n* \* log(*n*)) time.
///
/// # Example
///
/// ```
/// let mut v = [9, 1, 5, 2, 7, 3];
/// ordstd::slice::heap_sort(&mut v);
/// assert_eq!(v, [1, 2, 3, 5, 7, 9]);
/// ```
pub fn heap_sort<T: Ord>(v: &mut [T]) {
    let Ok(mut heap) = BoundedArrayHeap::from_array(v) else {
        return; // Empty.
    };
    let n = heap.len();
    for _ in 0..n {
        heap.delete_min();
    }
    tracing::trace!(n, "heap sort done");
}
