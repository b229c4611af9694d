pub mod ordered_set;

pub use ordered_set::OrderedSet;

pub mod bounded_heap;

pub use bounded_heap::BoundedArrayHeap;

use std::fmt;

/// The error type for [`OrderedSet`] and its fail-fast iterators.
///
/// An empty [`BoundedArrayHeap`] is not an error, [`BoundedArrayHeap::delete_min`] returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An absent element was passed where an element is required.
    InvalidArgument,

    /// An iterator was advanced past its last element.
    NoSuchElement,

    /// An iterator `remove` was called without a preceding `next`, or twice for the same element.
    IllegalState,

    /// The set was changed by someone other than the iterator since the iterator was created.
    ConcurrentModification,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "element argument is absent"),
            Error::NoSuchElement => write!(f, "iterator has no more elements"),
            Error::IllegalState => write!(f, "no element available to remove"),
            Error::ConcurrentModification => {
                write!(f, "set was modified while the iterator was in use")
            }
        }
    }
}

impl std::error::Error for Error {}
