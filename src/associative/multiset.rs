//! Ordered multiset.
//!
//! Equal keys are stored side by side in insertion order. Range queries
//! (`lower_bound`, `upper_bound`, `equal_range`) descend the tree in
//! O(log N); `count` then walks the matching run.

use std::borrow::Borrow;
use std::fmt;

use super::{KeyIntoIter, KeyIter, display_keys};
use crate::error::ContainerError;
use crate::sequence::Vector;
use crate::tree::{Cursor, RedBlackTree};

/// An ordered collection of keys that allows duplicates.
///
/// # Examples
///
/// ```rust
/// use rbcontainers::associative::TreeMultiset;
///
/// let mut multiset: TreeMultiset<i32> = [1, 2, 2, 3, 3].into_iter().collect();
/// assert_eq!(multiset.count(&2), 2);
///
/// let (lower, upper) = multiset.equal_range(&3);
/// assert_eq!(multiset.get(lower), Some(&3));
/// assert_eq!(upper, multiset.end());
///
/// assert_eq!(multiset.remove_all(&2), 2);
/// assert_eq!(multiset.to_string(), "{1, 3, 3}");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct TreeMultiset<K> {
    tree: RedBlackTree<K, ()>,
}

impl<K> TreeMultiset<K> {
    /// Creates an empty multiset.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RedBlackTree::non_unique(),
        }
    }

    /// Returns the number of keys, duplicates included.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset holds no keys.
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

    /// Returns the cursor after `cursor`.
    #[must_use]
    pub fn next(&self, cursor: Cursor) -> Cursor {
        self.tree.next(cursor)
    }

    /// Returns the cursor before `cursor`.
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

    /// Returns an in-order iterator over the keys, duplicates included.
    #[must_use]
    pub fn iter(&self) -> KeyIter<'_, K> {
        KeyIter::new(self.tree.keys())
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
    /// forward range of this multiset.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Result<Cursor, ContainerError> {
        self.tree.erase_range(first, last)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two multisets.
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

impl<K: Ord> TreeMultiset<K> {
    /// Inserts a key after any equal keys already present.
    pub fn insert(&mut self, key: K) -> Cursor {
        self.tree.insert(key, ())
    }

    /// Same as [`insert`](Self::insert).
    pub fn emplace(&mut self, key: K) -> Cursor {
        self.insert(key)
    }

    /// Inserts every key of `keys` in order. Every flag is `true`.
    pub fn insert_many<I>(&mut self, keys: I) -> Vector<(Cursor, bool)>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| (self.insert(key), true)).collect()
    }

    /// Returns the number of keys equal to `key`.
    #[must_use]
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.count(key)
    }

    /// Returns a cursor at the first key not less than `key`.
    #[must_use]
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.lower_bound(key)
    }

    /// Returns a cursor at the first key greater than `key`.
    #[must_use]
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.upper_bound(key)
    }

    /// Returns the cursor range holding every key equal to `key`.
    #[must_use]
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor, Cursor)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.equal_range(key)
    }

    /// Returns a cursor at one of the keys equal to `key`, or the end
    /// cursor.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    /// Returns `true` if at least one key equals `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Removes one key equal to `key`, returning whether one was present.
    pub fn remove_one<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key).is_some()
    }

    /// Removes every key equal to `key` and returns how many were removed.
    pub fn remove_all<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let matching = self.tree.count(key);
        let (first, last) = self.tree.equal_range(key);
        self.tree
            .erase_range(first, last)
            .map_or(0, |_| matching)
    }

    /// Moves every key of `other` into this multiset, leaving `other`
    /// empty.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K> Default for TreeMultiset<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for TreeMultiset<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

impl<K: Ord> Extend<K> for TreeMultiset<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> IntoIterator for TreeMultiset<K> {
    type Item = K;
    type IntoIter = KeyIntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        KeyIntoIter::new(self.tree.into_iter())
    }
}

impl<'a, K> IntoIterator for &'a TreeMultiset<K> {
    type Item = &'a K;
    type IntoIter = KeyIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug> fmt::Debug for TreeMultiset<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display> fmt::Display for TreeMultiset<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_keys(formatter, self)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize> serde::Serialize for TreeMultiset<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for TreeMultiset<K>
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


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_roundtrip_keeps_duplicates() {
        let multiset: TreeMultiset<i32> = [2, 1, 2].into_iter().collect();
        let json = serde_json::to_string(&multiset).unwrap();
        assert_eq!(json, "[1,2,2]");
        let restored: TreeMultiset<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(multiset, restored);
    }
}
