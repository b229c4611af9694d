#![deny(missing_docs)]

//! Ordered containers, in particular [`collections::OrderedSet`] ( an unbalanced binary search tree with fail-fast iterators ),
//! [`collections::BoundedArrayHeap`] ( an array-backed binary heap ) and [`slice::heap_sort`].

//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`collections::OrderedSet`] via serde crate.
//! - `cap` : tests report allocated memory using the cap crate instead of using mimalloc.

/// Containers.
pub mod collections;

/// In-place sorting of slices.
pub mod slice;

// Tests.

#[cfg(all(test, not(miri), feature = "cap"))]
#[global_allocator]
static ALLOCATOR: cap::Cap<std::alloc::System> =
    cap::Cap::new(std::alloc::System, usize::max_value());

#[cfg(test)]
pub(crate) fn print_memory() {
    #[cfg(all(test, not(miri), feature = "cap"))]
    println!("Memory allocated: {} bytes", ALLOCATOR.allocated());
}

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri), not(feature = "cap")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
