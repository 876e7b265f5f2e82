//! Ordered associative containers built on [`RedBlackTree`].
//!
//! Every container here is a thin facade over the tree engine:
//!
//! - [`TreeMap`]: unique keys mapped to values
//! - [`TreeSet`]: unique keys
//! - [`TreeMultiset`]: keys with duplicates, kept in insertion order among
//!   equals
//!
//! All three share the engine's [`Cursor`] protocol. A cursor is a detached
//! handle that the container resolves on each use, so it survives
//! insertions. An erasure moves a neighbouring pair into the erased node
//! when that node has children; cursors at the erased entry and at the
//! moved neighbour go stale, and every other cursor stays valid.
//!
//! # Examples
//!
//! ```rust
//! use rbcontainers::associative::{TreeMap, TreeMultiset, TreeSet};
//!
//! let mut map = TreeMap::new();
//! map.insert("b", 2);
//! map.insert("a", 1);
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
//!
//! let set: TreeSet<i32> = [3, 1, 3].into_iter().collect();
//! assert_eq!(set.len(), 2);
//!
//! let multiset: TreeMultiset<i32> = [3, 1, 3].into_iter().collect();
//! assert_eq!(multiset.count(&3), 2);
//! ```
//!
//! [`RedBlackTree`]: crate::tree::RedBlackTree

mod map;
mod multiset;
mod set;

pub use crate::tree::Cursor;
pub use map::TreeMap;
pub use multiset::TreeMultiset;
pub use set::TreeSet;

use std::iter::FusedIterator;

use crate::tree;

// =============================================================================
// Key Iterators
// =============================================================================

/// An in-order iterator over the keys of a [`TreeSet`] or [`TreeMultiset`].
#[derive(Clone)]
pub struct KeyIter<'a, K> {
    inner: tree::Keys<'a, K, ()>,
}

impl<'a, K> KeyIter<'a, K> {
    pub(crate) const fn new(inner: tree::Keys<'a, K, ()>) -> Self {
        Self { inner }
    }
}

impl<'a, K> Iterator for KeyIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for KeyIter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for KeyIter<'_, K> {}

impl<K> FusedIterator for KeyIter<'_, K> {}

/// An owning in-order iterator over the keys of a [`TreeSet`] or
/// [`TreeMultiset`].
pub struct KeyIntoIter<K> {
    inner: tree::IntoIter<K, ()>,
}

impl<K> KeyIntoIter<K> {
    pub(crate) const fn new(inner: tree::IntoIter<K, ()>) -> Self {
        Self { inner }
    }
}

impl<K> Iterator for KeyIntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, ())| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for KeyIntoIter<K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, ())| key)
    }
}

impl<K> ExactSizeIterator for KeyIntoIter<K> {}

impl<K> FusedIterator for KeyIntoIter<K> {}

/// Writes keys in the `{a, b, c}` form shared by sets and multisets.
pub(crate) fn display_keys<'a, K, I>(formatter: &mut std::fmt::Formatter<'_>, keys: I) -> std::fmt::Result
where
    K: std::fmt::Display + 'a,
    I: IntoIterator<Item = &'a K>,
{
    write!(formatter, "{{")?;
    let mut first = true;
    for key in keys {
        if first {
            first = false;
        } else {
            write!(formatter, ", ")?;
        }
        write!(formatter, "{key}")?;
    }
    write!(formatter, "}}")
}
