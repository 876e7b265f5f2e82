//! Ordered map with unique keys.
//!
//! [`TreeMap`] keeps its entries sorted by key in a red-black tree. Plain
//! insertion never overwrites; use [`TreeMap::insert_or_assign`] or
//! [`TreeMap::get_or_insert_default`] to update values.
//!
//! # Examples
//!
//! ```rust
//! use rbcontainers::associative::TreeMap;
//!
//! let mut map = TreeMap::new();
//! map.insert("apple", 3);
//! let (_, inserted) = map.insert("apple", 5);
//! assert!(!inserted);
//! assert_eq!(map["apple"], 3);
//!
//! let (_, inserted) = map.insert_or_assign("apple", 5);
//! assert!(!inserted);
//! assert_eq!(map.at("apple"), Ok(&5));
//!
//! *map.get_or_insert_default("pear") += 1;
//! assert_eq!(map.to_string(), "{apple: 5, pear: 1}");
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::ops::Index;

use crate::error::ContainerError;
use crate::sequence::Vector;
use crate::tree::{Cursor, IntoIter, Iter, IterMut, Keys, RedBlackTree, Values, ValuesMut};

/// An ordered map with unique keys backed by a red-black tree.
///
/// # Time Complexity
///
/// | Operation                        | Complexity |
/// |----------------------------------|------------|
/// | `get` / `at` / `contains`        | O(log N)   |
/// | `insert` / `insert_or_assign`    | O(log N)   |
/// | `remove` / `erase_at`            | O(log N)   |
/// | `merge`                          | O(M log N) |
/// | `iter`                           | O(N)       |
#[derive(Clone, PartialEq, Eq)]
pub struct TreeMap<K, V> {
    tree: RedBlackTree<K, V>,
}

impl<K, V> TreeMap<K, V> {
    /// Creates an empty map.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RedBlackTree::unique(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the theoretical maximum number of entries.
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    // =========================================================================
    // Cursors
    // =========================================================================

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

    /// Returns the entry under `cursor`.
    #[must_use]
    pub fn get_at(&self, cursor: Cursor) -> Option<(&K, &V)> {
        self.tree.get(cursor)
    }

    /// Returns the entry under `cursor` with a mutable value.
    pub fn get_at_mut(&mut self, cursor: Cursor) -> Option<(&K, &mut V)> {
        self.tree.get_mut(cursor)
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Returns an in-order iterator over the entries.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Returns an in-order iterator with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.tree.iter_mut()
    }

    /// Returns an in-order iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        self.tree.keys()
    }

    /// Returns an in-order iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        self.tree.values()
    }

    /// Returns an in-order iterator over mutable values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        self.tree.values_mut()
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first()
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last()
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Erases the entry under `cursor` and returns a cursor at the next one.
    pub fn erase_at(&mut self, cursor: Cursor) -> Cursor {
        self.tree.erase_at(cursor)
    }

    /// Erases every entry in `[first, last)`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::InvalidRange`] if the cursors do not form a
    /// forward range of this map.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Result<Cursor, ContainerError> {
        self.tree.erase_range(first, last)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two maps.
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

impl<K: Ord, V> TreeMap<K, V> {
    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::KeyNotFound`] if the key is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, ContainerError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_value(key).ok_or(ContainerError::KeyNotFound)
    }

    /// Returns the value for `key`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::KeyNotFound`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, ContainerError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_value_mut(key).ok_or(ContainerError::KeyNotFound)
    }

    /// Returns the value for `key`, or `None`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_value(key)
    }

    /// Returns the value for `key` mutably, or `None`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_value_mut(key)
    }

    /// Returns the value for `key`, inserting `V::default()` first if the
    /// key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.tree.get_or_insert_with(key, V::default)
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

    /// Returns `true` if the map holds `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Inserts a pair unless the key is present. An existing value is never
    /// overwritten; the flag reports whether the pair was added.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        self.tree.emplace(key, value)
    }

    /// Inserts a pair, or overwrites the value of an existing key. The flag
    /// is `true` on insertion and `false` on assignment.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Cursor, bool) {
        self.tree.insert_or_assign(key, value)
    }

    /// Inserts a value built by `make_value`, calling it only when the key
    /// is absent.
    pub fn emplace<F>(&mut self, key: K, make_value: F) -> (Cursor, bool)
    where
        F: FnOnce() -> V,
    {
        self.tree.emplace_with(key, make_value)
    }

    /// Inserts every pair of `entries` in order and reports each result.
    pub fn insert_many<I>(&mut self, entries: I) -> Vector<(Cursor, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .map(|(key, value)| self.insert(key, value))
            .collect()
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key).map(|(_, value)| value)
    }

    /// Moves the entries of `other` whose keys are missing here into this
    /// map. Entries with keys present in both stay in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, Q, V> Index<&Q> for TreeMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is absent.
    fn index(&self, key: &Q) -> &Self::Output {
        self.get(key).unwrap_or_else(|| panic!("key not found"))
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    /// Builds a map; for repeated keys the first pair wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut TreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for TreeMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self)
    }
}

#[cfg(feature = "serde")]
struct TreeMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for TreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = TreeMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = TreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert_or_assign(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for TreeMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> TreeMap<i32, String> {
        [(3, "three"), (1, "one"), (2, "two")]
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect()
    }

    // =========================================================================
    // Lookup Tests
    // =========================================================================

    #[rstest]
    fn test_at_reports_missing_key() {
        let map = sample();
        assert_eq!(map.at(&1).map(String::as_str), Ok("one"));
        assert_eq!(map.at(&4), Err(ContainerError::KeyNotFound));
    }

    #[rstest]
    fn test_at_mut_updates_value() {
        let mut map = sample();
        if let Ok(value) = map.at_mut(&2) {
            value.push('!');
        }
        assert_eq!(map.get(&2).map(String::as_str), Some("two!"));
        assert!(map.at_mut(&9).is_err());
    }

    #[rstest]
    fn test_index_returns_value() {
        let map = sample();
        assert_eq!(map[&3], "three");
    }

    #[rstest]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_key_panics() {
        let map = sample();
        let _ = &map[&10];
    }

    #[rstest]
    fn test_get_or_insert_default_never_fails() {
        let mut map: TreeMap<&str, i32> = TreeMap::new();
        *map.get_or_insert_default("a") += 1;
        *map.get_or_insert_default("a") += 1;
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    // =========================================================================
    // Insertion Tests
    // =========================================================================

    #[rstest]
    fn test_insert_never_overwrites() {
        let mut map = sample();
        let (cursor, inserted) = map.insert(1, "uno".to_string());
        assert!(!inserted);
        assert_eq!(map.get_at(cursor).map(|(_, value)| value.as_str()), Some("one"));
    }

    #[rstest]
    fn test_insert_or_assign_flags() {
        let mut map = sample();
        let (_, inserted) = map.insert_or_assign(1, "uno".to_string());
        assert!(!inserted);
        let (cursor, inserted) = map.insert_or_assign(4, "four".to_string());
        assert!(inserted);
        assert_eq!(map.get_at(cursor).map(|(key, _)| *key), Some(4));
        assert_eq!(map.get(&1).map(String::as_str), Some("uno"));
    }

    #[rstest]
    fn test_emplace_builds_value_lazily() {
        let mut map = sample();
        let (_, inserted) = map.emplace(1, || unreachable!("key is present"));
        assert!(!inserted);
        let (_, inserted) = map.emplace(5, || "five".to_string());
        assert!(inserted);
        assert_eq!(map.len(), 4);
    }

    #[rstest]
    fn test_insert_many_reports_each_pair() {
        let mut map: TreeMap<i32, i32> = TreeMap::new();
        let results = map.insert_many([(1, 1), (2, 2), (1, 3)]);
        let flags: Vec<bool> = results.iter().map(|(_, inserted)| *inserted).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(map.get(&1), Some(&1));
    }

    // =========================================================================
    // Removal Tests
    // =========================================================================

    #[rstest]
    fn test_remove_returns_value() {
        let mut map = sample();
        assert_eq!(map.remove(&2), Some("two".to_string()));
        assert_eq!(map.remove(&2), None);
        assert!(!map.contains(&2));
    }

    #[rstest]
    fn test_erase_at_and_range() {
        let mut map: TreeMap<i32, i32> = (0..10).map(|key| (key, key)).collect();
        let next = map.erase_at(map.find(&0));
        assert_eq!(map.get_at(next), Some((&1, &1)));

        let first = map.find(&3);
        let last = map.find(&7);
        assert!(map.erase_range(first, last).is_ok());
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 7, 8, 9]);
        assert_eq!(map.erase_range(map.end(), map.begin()), Err(ContainerError::InvalidRange));
    }

    #[rstest]
    fn test_merge_keeps_destination_values() {
        let mut first: TreeMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
        let mut second: TreeMap<i32, &str> = [(2, "x"), (3, "c")].into_iter().collect();
        first.merge(&mut second);
        assert_eq!(first.get(&2), Some(&"b"));
        assert_eq!(first.get(&3), Some(&"c"));
        assert_eq!(second.len(), 1);
    }

    // =========================================================================
    // Iteration Tests
    // =========================================================================

    #[rstest]
    fn test_cursor_walk_with_mutation() {
        let mut map: TreeMap<i32, i32> = (1..=3).map(|key| (key, 0)).collect();
        let mut cursor = map.begin();
        while cursor != map.end() {
            if let Some((key, value)) = map.get_at_mut(cursor) {
                *value = key * 100;
            }
            cursor = map.next(cursor);
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![100, 200, 300]);
        assert_eq!(map.prev(map.end()), map.retreat(map.cend(), 1));
        assert_eq!(map.advance(map.cbegin(), 3), map.end());
    }

    #[rstest]
    fn test_values_mut_and_iter_mut() {
        let mut map: TreeMap<i32, i32> = (1..=3).map(|key| (key, key)).collect();
        for value in map.values_mut() {
            *value += 1;
        }
        for (_, value) in &mut map {
            *value *= 2;
        }
        assert_eq!(map.iter().map(|(_, value)| *value).collect::<Vec<_>>(), vec![4, 6, 8]);
        assert_eq!(map.first_key_value(), Some((&1, &4)));
        assert_eq!(map.last_key_value(), Some((&3, &8)));
    }

    #[rstest]
    fn test_display_and_debug() {
        let map: TreeMap<i32, i32> = [(2, 20), (1, 10)].into_iter().collect();
        assert_eq!(map.to_string(), "{1: 10, 2: 20}");
        assert_eq!(format!("{map:?}"), "{1: 10, 2: 20}");
        assert_eq!(TreeMap::<i32, i32>::new().to_string(), "{}");
    }

    #[rstest]
    fn test_clone_is_equal_but_cursors_differ() {
        let map = sample();
        let copy = map.clone();
        assert_eq!(map, copy);
        assert_ne!(map.begin(), copy.begin());
    }

    #[rstest]
    fn test_swap_and_clear() {
        let mut first = sample();
        let mut second = TreeMap::new();
        first.swap(&mut second);
        assert!(first.is_empty());
        assert_eq!(second.len(), 3);
        second.clear();
        assert!(second.is_empty());
        assert!(second.structure().is_empty());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_sorted() {
        let map: TreeMap<String, i32> = [("b".to_string(), 2), ("a".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"a":1,"b":2}"#);
    }

    #[rstest]
    fn test_deserialize_last_value_wins() {
        let map: TreeMap<String, i32> = serde_json::from_str(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(map.get("a"), Some(&2));
    }
}
