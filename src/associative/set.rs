//! Ordered set of unique keys.

use std::borrow::Borrow;
use std::fmt;

use super::{KeyIntoIter, KeyIter, display_keys};
use crate::error::ContainerError;
use crate::sequence::Vector;
use crate::tree::{Cursor, RedBlackTree};

/// An ordered set of unique keys backed by a red-black tree.
///
/// # Examples
///
/// ```rust
/// use rbcontainers::associative::TreeSet;
///
/// let mut set = TreeSet::new();
/// let (_, inserted) = set.insert(3);
/// assert!(inserted);
/// let (existing, inserted) = set.insert(3);
/// assert!(!inserted);
/// assert_eq!(set.get(existing), Some(&3));
///
/// set.insert_many([1, 2]);
/// assert_eq!(format!("{set}"), "{1, 2, 3}");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct TreeSet<K> {
    tree: RedBlackTree<K, ()>,
}

impl<K> TreeSet<K> {
    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RedBlackTree::unique(),
        }
    }

    /// Returns the number of keys.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set holds no keys.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the theoretical maximum number of keys.
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Returns a cursor at the smallest key.
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.tree.begin()
    }

    /// Returns the end cursor.
    #[must_use]
    pub fn end(&self) -> Cursor {
        self.tree.end()
    }

    /// Read-only alias of [`begin`](Self::begin).
    #[must_use]
    pub fn cbegin(&self) -> Cursor {
        self.tree.cbegin()
    }

    /// Read-only alias of [`end`](Self::end).
    #[must_use]
    pub fn cend(&self) -> Cursor {
        self.tree.cend()
    }

    /// Returns the cursor after `cursor`. See [`RedBlackTree::next`].
    #[must_use]
    pub fn next(&self, cursor: Cursor) -> Cursor {
        self.tree.next(cursor)
    }

    /// Returns the cursor before `cursor`. See [`RedBlackTree::prev`].
    #[must_use]
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        self.tree.prev(cursor)
    }

    /// Moves `cursor` forward `steps` times.
    #[must_use]
    pub fn advance(&self, cursor: Cursor, steps: usize) -> Cursor {
        self.tree.advance(cursor, steps)
    }

    /// Moves `cursor` backward `steps` times.
    #[must_use]
    pub fn retreat(&self, cursor: Cursor, steps: usize) -> Cursor {
        self.tree.retreat(cursor, steps)
    }

    /// Returns the key under `cursor`.
    #[must_use]
    pub fn get(&self, cursor: Cursor) -> Option<&K> {
        self.tree.get(cursor).map(|(key, ())| key)
    }

    /// Returns an in-order iterator over the keys.
    #[must_use]
    pub fn iter(&self) -> KeyIter<'_, K> {
        KeyIter::new(self.tree.keys())
    }

    /// Returns the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|(key, ())| key)
    }

    /// Returns the largest key.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|(key, ())| key)
    }

    /// Erases the key under `cursor` and returns a cursor at the next one.
    pub fn erase_at(&mut self, cursor: Cursor) -> Cursor {
        self.tree.erase_at(cursor)
    }

    /// Erases every key in `[first, last)`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::InvalidRange`] if the cursors do not form a
    /// forward range of this set.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Result<Cursor, ContainerError> {
        self.tree.erase_range(first, last)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two sets.
    pub const fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Renders the underlying tree for debugging.
    #[must_use]
    pub fn structure(&self) -> String
    where
        K: fmt::Debug,
    {
        self.tree.structure()
    }
}

impl<K: Ord> TreeSet<K> {
    /// Inserts a key. On a duplicate the cursor points at the key already
    /// present and the flag is `false`.
    pub fn insert(&mut self, key: K) -> (Cursor, bool) {
        self.tree.emplace(key, ())
    }

    /// Same as [`insert`](Self::insert).
    pub fn emplace(&mut self, key: K) -> (Cursor, bool) {
        self.insert(key)
    }

    /// Inserts every key of `keys` in order and reports each result.
    pub fn insert_many<I>(&mut self, keys: I) -> Vector<(Cursor, bool)>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| self.insert(key)).collect()
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key).is_some()
    }

    /// Returns a cursor at `key`, or the end cursor.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    /// Returns `true` if the set holds `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Moves the keys of `other` that are missing here into this set.
    /// Keys present in both stay in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K> Default for TreeSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for TreeSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Ord> Extend<K> for TreeSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> IntoIterator for TreeSet<K> {
    type Item = K;
    type IntoIter = KeyIntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        KeyIntoIter::new(self.tree.into_iter())
    }
}

impl<'a, K> IntoIterator for &'a TreeSet<K> {
    type Item = &'a K;
    type IntoIter = KeyIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug> fmt::Debug for TreeSet<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display> fmt::Display for TreeSet<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_keys(formatter, self)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize> serde::Serialize for TreeSet<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for TreeSet<K>
where
    K: serde::Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let keys = <Vector<K> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(keys.into_iter().collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
