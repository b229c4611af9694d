//! Node storage for [`OrderedSet`](super::OrderedSet).
//!
//! Nodes live in a vector of slots and refer to their children by index. Slot `SENTINEL` is
//! reserved and stands for "no subtree", so a child index can always be looked up: the lookup
//! yields `None` for the sentinel and every walk uses that as its base case.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

/// Index of the reserved empty-subtree slot.
pub(super) const SENTINEL: usize = 0;

#[derive(Clone)]
pub(super) struct Node<T> {
    pub elem: T,
    pub left: usize,
    pub right: usize,
}

#[derive(Clone)]
enum Slot<T> {
    Sentinel,
    Node(Node<T>),
    /// Unused slot, holds the next free slot ( or SENTINEL ).
    Free(usize),
}

/// Position of the link that owns a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Link {
    Root,
    Left(usize),
    Right(usize),
}

/// Binary search tree over an arena of slots.
#[derive(Clone)]
pub(super) struct Tree<T> {
    root: usize,
    slots: Vec<Slot<T>>,
    free: usize,
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            root: SENTINEL,
            slots: vec![Slot::Sentinel],
            free: SENTINEL,
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Drops every node and hands spare slot storage back to the allocator.
    pub fn clear(&mut self) {
        self.root = SENTINEL;
        self.slots.truncate(1);
        self.slots.shrink_to_fit();
        self.free = SENTINEL;
    }

    /// Slots held, live or free, including the sentinel.
    #[cfg(test)]
    pub fn slot_capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Node at ix, `None` for the sentinel.
    #[inline]
    pub fn get(&self, ix: usize) -> Option<&Node<T>> {
        match &self.slots[ix] {
            Slot::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Node at ix, which must be live.
    #[inline]
    pub fn node(&self, ix: usize) -> &Node<T> {
        match &self.slots[ix] {
            Slot::Node(n) => n,
            _ => unreachable!("slot {ix} is not a live node"),
        }
    }

    #[inline]
    fn node_mut(&mut self, ix: usize) -> &mut Node<T> {
        match &mut self.slots[ix] {
            Slot::Node(n) => n,
            _ => unreachable!("slot {ix} is not a live node"),
        }
    }

    fn link_mut(&mut self, at: Link) -> &mut usize {
        match at {
            Link::Root => &mut self.root,
            Link::Left(ix) => &mut self.node_mut(ix).left,
            Link::Right(ix) => &mut self.node_mut(ix).right,
        }
    }

    fn alloc(&mut self, elem: T) -> usize {
        let node = Slot::Node(Node {
            elem,
            left: SENTINEL,
            right: SENTINEL,
        });
        if self.free == SENTINEL {
            self.slots.push(node);
            self.slots.len() - 1
        } else {
            let ix = self.free;
            match mem::replace(&mut self.slots[ix], node) {
                Slot::Free(next) => self.free = next,
                _ => unreachable!("free list corrupt"),
            }
            ix
        }
    }

    fn release(&mut self, ix: usize) -> T {
        match mem::replace(&mut self.slots[ix], Slot::Free(self.free)) {
            Slot::Node(n) => {
                self.free = ix;
                n.elem
            }
            _ => unreachable!("slot {ix} is not a live node"),
        }
    }

    /// Descends by comparison from the root. Returns the link where key is ( or would be ) and
    /// the node index found there, SENTINEL if the key is not present.
    pub fn locate<Q>(&self, key: &Q) -> (Link, usize)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut at = Link::Root;
        let mut ix = self.root;
        while let Some(n) = self.get(ix) {
            match key.cmp(n.elem.borrow()) {
                Ordering::Less => {
                    at = Link::Left(ix);
                    ix = n.left;
                }
                Ordering::Greater => {
                    at = Link::Right(ix);
                    ix = n.right;
                }
                Ordering::Equal => break,
            }
        }
        (at, ix)
    }

    /// Hangs a new node holding elem on the link at, which must currently hold the sentinel.
    pub fn attach(&mut self, at: Link, elem: T) {
        let ix = self.alloc(elem);
        let link = self.link_mut(at);
        debug_assert!(*link == SENTINEL);
        *link = ix;
    }

    /// Removes node ix, owned by link at. Returns the removed element and whatever now occupies the link.
    pub fn unlink(&mut self, at: Link, ix: usize) -> (T, usize) {
        let (left, right) = {
            let n = self.node(ix);
            (n.left, n.right)
        };
        if left == SENTINEL || right == SENTINEL {
            let replacement = if left == SENTINEL { right } else { left };
            *self.link_mut(at) = replacement;
            (self.release(ix), replacement)
        } else {
            // Two children: take over the in-order predecessor, the rightmost node of the left subtree.
            let mut pat = Link::Left(ix);
            let mut p = left;
            loop {
                let r = self.node(p).right;
                if r == SENTINEL {
                    break;
                }
                pat = Link::Right(p);
                p = r;
            }
            let (pred, _) = self.unlink(pat, p);
            (mem::replace(&mut self.node_mut(ix).elem, pred), ix)
        }
    }

    /// Pushes ix and then its chain of left children.
    pub fn push_left_spine(&self, stack: &mut Vec<usize>, mut ix: usize) {
        while let Some(n) = self.get(ix) {
            stack.push(ix);
            ix = n.left;
        }
    }

    pub fn first(&self) -> Option<&T> {
        let mut n = self.get(self.root)?;
        while let Some(l) = self.get(n.left) {
            n = l;
        }
        Some(&n.elem)
    }

    pub fn last(&self) -> Option<&T> {
        let mut n = self.get(self.root)?;
        while let Some(r) = self.get(n.right) {
            n = r;
        }
        Some(&n.elem)
    }

    /// Number of edges on the longest root-to-leaf path, -1 for an empty tree.
    pub fn height(&self) -> isize {
        let mut result = -1;
        let mut stack = vec![(self.root, 0)];
        while let Some((ix, depth)) = stack.pop() {
            if let Some(n) = self.get(ix) {
                result = result.max(depth);
                stack.push((n.left, depth + 1));
                stack.push((n.right, depth + 1));
            }
        }
        result
    }

    pub fn pre_order(&self) -> Vec<&T> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(ix) = stack.pop() {
            if let Some(n) = self.get(ix) {
                result.push(&n.elem);
                stack.push(n.right);
                stack.push(n.left);
            }
        }
        result
    }

    pub fn in_order(&self) -> Vec<&T> {
        let mut result = Vec::new();
        let mut stack = Vec::new();
        self.push_left_spine(&mut stack, self.root);
        while let Some(ix) = stack.pop() {
            let n = self.node(ix);
            result.push(&n.elem);
            self.push_left_spine(&mut stack, n.right);
        }
        result
    }

    pub fn post_order(&self) -> Vec<&T> {
        // Root, right, left reversed is left, right, root.
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(ix) = stack.pop() {
            if let Some(n) = self.get(ix) {
                result.push(&n.elem);
                stack.push(n.left);
                stack.push(n.right);
            }
        }
        result.reverse();
        result
    }
}
