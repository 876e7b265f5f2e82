//! Cursors and iterators over a [`RedBlackTree`].
//!
//! A [`Cursor`] is a detached position handle: it does not borrow the tree,
//! so it can be held across mutations and handed back to the tree later.
//! The tree resolves it on every use and treats a cursor whose node has
//! been removed, or that belongs to another tree, as pointing nowhere.
//!
//! Erasing a node with children moves a neighbouring pair (its in-order
//! predecessor, or its only child) into that node. Cursors at the moved pair
//! go stale along with the erased one; the cursor returned by the erase is
//! the one to keep using.
//!
//! Stepping is computed from parent and child links only. Moving forward
//! from the maximum lands on the end position; moving backward from the end
//! position re-derives the maximum from the root; moving backward from the
//! minimum also lands on the end position, and moving forward from the end
//! position wraps to the minimum.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering};

use super::RedBlackTree;
use super::node::NodeId;

// =============================================================================
// Sentinel
// =============================================================================

/// Identity of a tree's end position.
///
/// A fresh sentinel is issued when a tree receives its first element and is
/// dropped again by `clear`, so end positions of distinct trees (and of the
/// same tree across a `clear`) never compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Sentinel(u64);

impl Sentinel {
    pub(crate) fn issue() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// Cursor
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Position {
    Node(NodeId),
    End,
}

/// A bidirectional position inside a [`RedBlackTree`] or one of the
/// associative containers built on it.
///
/// A cursor records the node it points at together with the root and the
/// end sentinel of the tree that produced it. Two cursors are equal only
/// when all three match, which means that cursors taken from a tree and from
/// its clone never compare equal, even at the same logical place. Every
/// operation that returns a cursor stamps it with the tree's current root.
///
/// # Examples
///
/// ```rust
/// use rbcontainers::tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::unique();
/// tree.insert(2, "two");
/// tree.insert(1, "one");
///
/// let cursor = tree.begin();
/// assert_eq!(tree.get(cursor), Some((&1, &"one")));
///
/// let cursor = tree.next(cursor);
/// assert_eq!(tree.get(cursor), Some((&2, &"two")));
/// assert_eq!(tree.next(cursor), tree.end());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cursor {
    pub(crate) position: Position,
    pub(crate) root: Option<NodeId>,
    pub(crate) sentinel: Option<Sentinel>,
}

impl Cursor {
    /// Returns `true` if the cursor is an end position.
    #[inline]
    pub const fn is_end(&self) -> bool {
        matches!(self.position, Position::End)
    }
}

/// A cursor resolved against the tree that owns it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Location {
    Node(usize),
    End,
}

impl Location {
    pub(crate) const fn from_index(index: Option<usize>) -> Self {
        match index {
            Some(index) => Self::Node(index),
            None => Self::End,
        }
    }

    pub(crate) const fn index(self) -> Option<usize> {
        match self {
            Self::Node(index) => Some(index),
            Self::End => None,
        }
    }
}

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An in-order iterator over the entries of a [`RedBlackTree`].
///
/// Each step follows parent and child links, so creating the iterator is
/// O(log N) and the whole traversal is O(N).
pub struct Iter<'a, K, V> {
    tree: &'a RedBlackTree<K, V>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a RedBlackTree<K, V>) -> Self {
        Self {
            tree,
            front: tree.first_index(),
            back: tree.last_index(),
            remaining: tree.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        self.front = self.tree.successor(index);
        self.remaining -= 1;
        Some(self.tree.entry(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        self.back = self.tree.predecessor(index);
        self.remaining -= 1;
        Some(self.tree.entry(index))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An in-order iterator over the keys of a [`RedBlackTree`].
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An in-order iterator over the values of a [`RedBlackTree`].
#[derive(Clone)]
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

// =============================================================================
// Mutable Iterator
// =============================================================================

/// An in-order iterator yielding mutable references to the values of a
/// [`RedBlackTree`].
///
/// Mutable references into the arena are gathered up front in key order,
/// since the borrow checker cannot split them lazily along tree links.
pub struct IterMut<'a, K, V> {
    entries: std::vec::IntoIter<(&'a K, &'a mut V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut RedBlackTree<K, V>) -> Self {
        let order = tree.in_order_indices();
        let mut rank = vec![usize::MAX; tree.arena.slot_count()];
        for (position, &index) in order.iter().enumerate() {
            rank[index] = position;
        }

        let mut ranked: Vec<Option<(&'a K, &'a mut V)>> = Vec::with_capacity(order.len());
        ranked.resize_with(order.len(), || None);
        for (index, node) in tree.arena.occupied_mut() {
            let (key, value) = &mut *node.entry;
            if let Some(slot) = ranked.get_mut(rank[index]) {
                *slot = Some((&*key, value));
            }
        }

        Self {
            entries: ranked.into_iter().flatten().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An in-order iterator over mutable references to the values of a
/// [`RedBlackTree`].
pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning in-order iterator over the entries of a [`RedBlackTree`].
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(mut tree: RedBlackTree<K, V>) -> Self {
        let order = tree.in_order_indices();
        let entries: Vec<(K, V)> = order
            .into_iter()
            .map(|index| *tree.arena.release(index))
            .collect();
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
