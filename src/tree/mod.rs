//! Red-black tree engine shared by every associative container.
//!
//! This module provides [`RedBlackTree`], a mutable ordered tree of key-value
//! pairs with either unique or non-unique keys, and the [`Cursor`] protocol
//! used to walk and edit it.
//!
//! # Overview
//!
//! - O(log N) find, insert and erase
//! - O(log N) `lower_bound` / `upper_bound`, O(log N + k) `count`
//! - O(1) amortized cursor steps, O(N) full traversal
//! - O(N log N) merge and deep copy
//!
//! Nodes live in an arena and link to each other by index. Child links carry
//! ownership in the structural sense (a node is freed only when it is cut from
//! its parent); parent links are back-references used for traversal and
//! rebalancing only.
//!
//! # Invariants
//!
//! 1. The root is black.
//! 2. A red node never has a red parent.
//! 3. Every path from a node to a missing child passes through the same
//!    number of black nodes.
//! 4. Missing children count as black.
//!
//! # Examples
//!
//! ```rust
//! use rbcontainers::tree::RedBlackTree;
//!
//! let mut tree = RedBlackTree::non_unique();
//! for key in [3, 1, 2, 2] {
//!     tree.insert(key, ());
//! }
//! let keys: Vec<&i32> = tree.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &2, &3]);
//! assert_eq!(tree.count(&2), 2);
//! ```

mod cursor;
mod node;

pub use cursor::{Cursor, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::error::ContainerError;
use cursor::{Location, Position, Sentinel};
use node::{Arena, Color};

/// Inline capacity of the explicit stacks used by tree walks. A red-black
/// tree of height 48 already holds more nodes than fit in memory.
const WALK_STACK: usize = 48;

// =============================================================================
// Uniqueness Mode
// =============================================================================

/// Whether a [`RedBlackTree`] accepts duplicate keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Uniqueness {
    /// Inserting a key that is already present is rejected.
    #[default]
    Unique,
    /// Every insertion adds a node; equal keys keep insertion order.
    NonUnique,
}

// =============================================================================
// Double-Black Cases
// =============================================================================

/// Shape around a node carrying a black-height deficit.
///
/// "Near" and "far" nephews are named relative to the deficient node: the
/// near nephew is the sibling's child on the deficient node's side.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum DoubleBlackCase {
    /// Red sibling under a black parent: rotate to get a black sibling.
    RedSibling,
    /// Black sibling whose far child is red: one rotation resolves it.
    RedFarNephew,
    /// Black sibling whose near child is red (far one black): rotate the
    /// sibling to turn it into the far-nephew case.
    RedNearNephew,
    /// Black sibling with black children under a red parent: recolor only.
    BlackNephewsRedParent,
    /// Black sibling with black children under a black parent: the deficit
    /// moves up to the parent.
    BlackNephewsBlackParent,
}

/// Where a key would be placed by an insertion descent.
enum Placement {
    Occupied(usize),
    Vacant { parent: Option<usize>, left: bool },
}

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// A mutable red-black tree of key-value pairs.
///
/// Keys must implement `Ord`. The tree runs in one of two modes chosen at
/// construction: [`Uniqueness::Unique`] rejects duplicate keys and
/// [`Uniqueness::NonUnique`] keeps every inserted pair.
///
/// # Time Complexity
///
/// | Operation                      | Complexity   |
/// |--------------------------------|--------------|
/// | `find` / `contains`            | O(log N)     |
/// | `insert` / `emplace`           | O(log N)     |
/// | `erase` / `erase_at`           | O(log N)     |
/// | `erase_range`                  | O(k log N)   |
/// | `lower_bound` / `upper_bound`  | O(log N)     |
/// | `count`                        | O(log N + k) |
/// | `merge`                        | O(M log N)   |
/// | `clone`                        | O(N log N)   |
/// | `len` / `is_empty`             | O(1)         |
///
/// # Examples
///
/// ```rust
/// use rbcontainers::tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::unique();
/// let inserted = tree.insert(1, "one");
/// assert_eq!(tree.get(inserted), Some((&1, &"one")));
///
/// // A duplicate key is rejected with the end cursor
/// assert_eq!(tree.insert(1, "uno"), tree.end());
/// assert_eq!(tree.len(), 1);
/// ```
pub struct RedBlackTree<K, V> {
    arena: Arena<K, V>,
    root: Option<usize>,
    sentinel: Option<Sentinel>,
    length: usize,
    uniqueness: Uniqueness,
}

impl<K, V> RedBlackTree<K, V> {
    /// Creates an empty tree in the given mode.
    #[inline]
    #[must_use]
    pub const fn new(uniqueness: Uniqueness) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            sentinel: None,
            length: 0,
            uniqueness,
        }
    }

    /// Creates an empty tree that rejects duplicate keys.
    #[inline]
    #[must_use]
    pub const fn unique() -> Self {
        Self::new(Uniqueness::Unique)
    }

    /// Creates an empty tree that keeps duplicate keys.
    #[inline]
    #[must_use]
    pub const fn non_unique() -> Self {
        Self::new(Uniqueness::NonUnique)
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the theoretical maximum number of entries, derived from the
    /// address space and the size of one node.
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        Arena::<K, V>::max_len()
    }

    /// Returns the duplicate-key mode of the tree.
    #[inline]
    #[must_use]
    pub const fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    /// Removes every entry and drops the end sentinel.
    ///
    /// Cursors taken before the call never resolve again.
    pub fn clear(&mut self) {
        tracing::trace!(
            length = self.length,
            slots = self.arena.slot_count(),
            "clearing red-black tree"
        );
        self.arena = Arena::new();
        self.root = None;
        self.sentinel = None;
        self.length = 0;
    }

    /// Exchanges the contents of two trees, including their modes.
    ///
    /// Cursors follow the contents they were taken from.
    pub const fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    // =========================================================================
    // Cursors
    // =========================================================================

    /// Returns a cursor at the smallest key, or the end cursor if empty.
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.cursor_at(self.first_index())
    }

    /// Returns the end cursor, one past the largest key.
    #[must_use]
    pub fn end(&self) -> Cursor {
        self.cursor_at(None)
    }

    /// Read-only alias of [`begin`](Self::begin).
    #[must_use]
    pub fn cbegin(&self) -> Cursor {
        self.begin()
    }

    /// Read-only alias of [`end`](Self::end).
    #[must_use]
    pub fn cend(&self) -> Cursor {
        self.end()
    }

    /// Returns the cursor after `cursor`.
    ///
    /// The maximum steps to the end position and the end position wraps to
    /// the minimum. A stale or foreign cursor steps to the end position.
    #[must_use]
    pub fn next(&self, cursor: Cursor) -> Cursor {
        match self.locate(cursor) {
            Some(Location::Node(index)) => self.cursor_at(self.successor(index)),
            Some(Location::End) => self.cursor_at(self.first_index()),
            None => self.end(),
        }
    }

    /// Returns the cursor before `cursor`.
    ///
    /// The end position steps back to the maximum and the minimum steps to
    /// the end position. A stale or foreign cursor steps to the end position.
    #[must_use]
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        match self.locate(cursor) {
            Some(Location::Node(index)) => self.cursor_at(self.predecessor(index)),
            Some(Location::End) => self.cursor_at(self.last_index()),
            None => self.end(),
        }
    }

    /// Moves `cursor` forward `steps` times.
    #[must_use]
    pub fn advance(&self, cursor: Cursor, steps: usize) -> Cursor {
        (0..steps).fold(cursor, |current, _| self.next(current))
    }

    /// Moves `cursor` backward `steps` times.
    #[must_use]
    pub fn retreat(&self, cursor: Cursor, steps: usize) -> Cursor {
        (0..steps).fold(cursor, |current, _| self.prev(current))
    }

    /// Returns the entry under `cursor`, or `None` for end, stale or foreign
    /// cursors.
    #[must_use]
    pub fn get(&self, cursor: Cursor) -> Option<(&K, &V)> {
        self.locate(cursor)
            .and_then(Location::index)
            .map(|index| self.entry(index))
    }

    /// Returns the entry under `cursor` with a mutable value.
    #[must_use]
    pub fn get_mut(&mut self, cursor: Cursor) -> Option<(&K, &mut V)> {
        let index = self.locate(cursor).and_then(Location::index)?;
        let (key, value) = &mut *self.arena[index].entry;
        Some((&*key, value))
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Returns an in-order iterator over the entries.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Returns an in-order iterator with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self)
    }

    /// Returns an in-order iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an in-order iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an in-order iterator over mutable values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.first_index().map(|index| self.entry(index))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.last_index().map(|index| self.entry(index))
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Checks the red-black invariants, the parent links and the key order.
    ///
    /// Returns the black height of the tree (0 when empty) if every check
    /// passes, or `None` on the first violation.
    #[must_use]
    pub fn black_height(&self) -> Option<usize>
    where
        K: Ord,
    {
        let Some(root) = self.root else {
            return (self.length == 0).then_some(0);
        };
        if self.arena[root].color != Color::Black || self.arena[root].parent.is_some() {
            return None;
        }

        let mut expected: Option<usize> = None;
        let mut reachable = 0;
        let mut stack: SmallVec<[(usize, usize); WALK_STACK]> = SmallVec::new();
        stack.push((root, 1));
        while let Some((index, blacks)) = stack.pop() {
            reachable += 1;
            let node = &self.arena[index];
            for child in [node.left, node.right] {
                let Some(child) = child else {
                    if *expected.get_or_insert(blacks) != blacks {
                        return None;
                    }
                    continue;
                };
                let child_node = &self.arena[child];
                if child_node.parent != Some(index)
                    || (node.color == Color::Red && child_node.color == Color::Red)
                {
                    return None;
                }
                let child_blacks = blacks + usize::from(child_node.color == Color::Black);
                stack.push((child, child_blacks));
            }
        }

        let ordered = self
            .iter()
            .zip(self.iter().skip(1))
            .all(|((previous, _), (current, _))| match self.uniqueness {
                Uniqueness::Unique => previous < current,
                Uniqueness::NonUnique => previous <= current,
            });
        (ordered && reachable == self.length)
            .then_some(expected.unwrap_or(1))
    }

    /// Renders the tree as indented text with per-node colors.
    ///
    /// Meant for debugging only; the format is not stable.
    #[must_use]
    pub fn structure(&self) -> String
    where
        K: fmt::Debug,
    {
        Structure { tree: self }.to_string()
    }

    fn render(
        &self,
        index: usize,
        prefix: &str,
        last: bool,
        top: bool,
        output: &mut impl fmt::Write,
    ) -> fmt::Result
    where
        K: fmt::Debug,
    {
        let node = &self.arena[index];
        let branch = match (top, last) {
            (true, _) => "",
            (false, true) => "`-- ",
            (false, false) => "|-- ",
        };
        writeln!(
            output,
            "{prefix}{branch}{:?} ({})",
            node.key(),
            node.color.label()
        )?;
        let child_prefix = match (top, last) {
            (true, _) => prefix.to_string(),
            (false, true) => format!("{prefix}    "),
            (false, false) => format!("{prefix}|   "),
        };
        let children: SmallVec<[usize; 2]> = [node.left, node.right].into_iter().flatten().collect();
        for (position, &child) in children.iter().enumerate() {
            self.render(
                child,
                &child_prefix,
                position + 1 == children.len(),
                false,
                output,
            )?;
        }
        Ok(())
    }

    // =========================================================================
    // Navigation Helpers
    // =========================================================================

    pub(crate) fn entry(&self, index: usize) -> (&K, &V) {
        let (key, value) = &*self.arena[index].entry;
        (key, value)
    }

    fn cursor_at(&self, index: Option<usize>) -> Cursor {
        Cursor {
            position: index.map_or(Position::End, |index| Position::Node(self.arena.id(index))),
            root: self.root.map(|root| self.arena.id(root)),
            sentinel: self.sentinel,
        }
    }

    /// Resolves a cursor against this tree, rejecting stale and foreign ones.
    fn locate(&self, cursor: Cursor) -> Option<Location> {
        if cursor.sentinel != self.sentinel {
            return None;
        }
        match cursor.position {
            Position::End => Some(Location::End),
            Position::Node(id) => self.arena.resolve(id).map(Location::Node),
        }
    }

    fn minimum(&self, mut index: usize) -> usize {
        while let Some(left) = self.arena[index].left {
            index = left;
        }
        index
    }

    fn maximum(&self, mut index: usize) -> usize {
        while let Some(right) = self.arena[index].right {
            index = right;
        }
        index
    }

    pub(crate) fn first_index(&self) -> Option<usize> {
        self.root.map(|root| self.minimum(root))
    }

    pub(crate) fn last_index(&self) -> Option<usize> {
        self.root.map(|root| self.maximum(root))
    }

    /// In-order successor, or `None` past the maximum.
    pub(crate) fn successor(&self, index: usize) -> Option<usize> {
        if let Some(right) = self.arena[index].right {
            return Some(self.minimum(right));
        }
        let mut child = index;
        let mut parent = self.arena[index].parent;
        while let Some(ancestor) = parent {
            if self.arena[ancestor].left == Some(child) {
                return Some(ancestor);
            }
            child = ancestor;
            parent = self.arena[ancestor].parent;
        }
        None
    }

    /// In-order predecessor, or `None` before the minimum.
    pub(crate) fn predecessor(&self, index: usize) -> Option<usize> {
        if let Some(left) = self.arena[index].left {
            return Some(self.maximum(left));
        }
        let mut child = index;
        let mut parent = self.arena[index].parent;
        while let Some(ancestor) = parent {
            if self.arena[ancestor].right == Some(child) {
                return Some(ancestor);
            }
            child = ancestor;
            parent = self.arena[ancestor].parent;
        }
        None
    }

    pub(crate) fn in_order_indices(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.length);
        let mut current = self.first_index();
        while let Some(index) = current {
            order.push(index);
            current = self.successor(index);
        }
        order
    }

    fn color(&self, index: Option<usize>) -> Color {
        index.map_or(Color::Black, |index| self.arena[index].color)
    }

    fn is_red(&self, index: Option<usize>) -> bool {
        self.color(index) == Color::Red
    }

    fn set_color(&mut self, index: usize, color: Color) {
        self.arena[index].color = color;
    }

    fn ensure_sentinel(&mut self) {
        if self.sentinel.is_none() {
            self.sentinel = Some(Sentinel::issue());
        }
    }

    // =========================================================================
    // Rotations
    // =========================================================================

    /// Replaces `old` with `new` in the child slot of `old`'s parent, or in
    /// the root slot.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: usize) {
        match parent {
            None => self.root = Some(new),
            Some(parent) if self.arena[parent].left == Some(old) => {
                self.arena[parent].left = Some(new);
            }
            Some(parent) => self.arena[parent].right = Some(new),
        }
    }

    fn rotate_left(&mut self, pivot: usize) {
        let Some(raised) = self.arena[pivot].right else {
            return;
        };
        let inner = self.arena[raised].left;
        self.arena[pivot].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(pivot);
        }
        let parent = self.arena[pivot].parent;
        self.arena[raised].parent = parent;
        self.replace_child(parent, pivot, raised);
        self.arena[raised].left = Some(pivot);
        self.arena[pivot].parent = Some(raised);
    }

    fn rotate_right(&mut self, pivot: usize) {
        let Some(raised) = self.arena[pivot].left else {
            return;
        };
        let inner = self.arena[raised].right;
        self.arena[pivot].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(pivot);
        }
        let parent = self.arena[pivot].parent;
        self.arena[raised].parent = parent;
        self.replace_child(parent, pivot, raised);
        self.arena[raised].right = Some(pivot);
        self.arena[pivot].parent = Some(raised);
    }

    /// Rotates left at `pivot` when `toward_left` is set, right otherwise.
    fn rotate_toward(&mut self, pivot: usize, toward_left: bool) {
        if toward_left {
            self.rotate_left(pivot);
        } else {
            self.rotate_right(pivot);
        }
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Links a boxed pair at a vacant placement and rebalances.
    fn attach(&mut self, entry: Box<(K, V)>, parent: Option<usize>, left: bool) -> usize {
        let index = self.arena.allocate(entry, parent);
        match parent {
            None => self.root = Some(index),
            Some(parent) if left => self.arena[parent].left = Some(index),
            Some(parent) => self.arena[parent].right = Some(index),
        }
        self.length += 1;
        self.ensure_sentinel();
        self.rebalance_after_insert(index);
        index
    }

    fn rebalance_after_insert(&mut self, mut node: usize) {
        while let Some(mut parent) = self.arena[node].parent.filter(|&parent| self.is_red(Some(parent))) {
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.arena[parent].parent else {
                break;
            };
            let parent_is_left = self.arena[grandparent].left == Some(parent);
            let uncle = if parent_is_left {
                self.arena[grandparent].right
            } else {
                self.arena[grandparent].left
            };

            if let Some(uncle) = uncle.filter(|&uncle| self.is_red(Some(uncle))) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let node_is_inner = if parent_is_left {
                self.arena[parent].right == Some(node)
            } else {
                self.arena[parent].left == Some(node)
            };
            if node_is_inner {
                self.rotate_toward(parent, parent_is_left);
                std::mem::swap(&mut node, &mut parent);
            }
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate_toward(grandparent, !parent_is_left);
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Exchanges the pairs of two nodes and keeps `tracked` pointing at the
    /// nodes that hold the same pairs as before.
    fn relocate(&mut self, first: usize, second: usize, tracked: &mut [Option<usize>]) {
        self.arena.swap_entries(first, second);
        for slot in tracked.iter_mut() {
            if *slot == Some(first) {
                *slot = Some(second);
            } else if *slot == Some(second) {
                *slot = Some(first);
            }
        }
    }

    /// Removes the pair held by `target` from the tree.
    ///
    /// The physically removed node may differ from `target`: pairs are
    /// relocated first so that the node cut from the tree has at most one
    /// child. Entries of `tracked` are updated to follow their pairs.
    #[allow(clippy::unnecessary_box_returns)] // merge reattaches the same box
    fn extract(&mut self, target: usize, tracked: &mut [Option<usize>]) -> Box<(K, V)> {
        let mut node = target;

        if let (Some(left), Some(_)) = (self.arena[node].left, self.arena[node].right) {
            // The maximum of the left subtree never has a right child.
            let predecessor = self.maximum(left);
            self.relocate(node, predecessor, tracked);
            node = predecessor;
        }

        let child = self.arena[node].left.or(self.arena[node].right);
        let removed = match child {
            Some(child) => {
                // A lone child is a red leaf under a black node.
                self.relocate(node, child, tracked);
                self.arena[node].left = None;
                self.arena[node].right = None;
                child
            }
            None => {
                if self.arena[node].color == Color::Black && self.root != Some(node) {
                    self.fix_double_black(node);
                }
                self.detach_leaf(node);
                node
            }
        };

        self.length -= 1;
        self.arena.release(removed)
    }

    fn detach_leaf(&mut self, leaf: usize) {
        match self.arena[leaf].parent {
            None => self.root = None,
            Some(parent) if self.arena[parent].left == Some(leaf) => {
                self.arena[parent].left = None;
            }
            Some(parent) => self.arena[parent].right = None,
        }
        self.arena[leaf].parent = None;
    }

    fn classify_double_black(
        &self,
        parent: usize,
        sibling: usize,
        node_is_left: bool,
    ) -> DoubleBlackCase {
        if self.arena[sibling].color == Color::Red {
            return DoubleBlackCase::RedSibling;
        }
        let (near, far) = if node_is_left {
            (self.arena[sibling].left, self.arena[sibling].right)
        } else {
            (self.arena[sibling].right, self.arena[sibling].left)
        };
        if self.is_red(far) {
            DoubleBlackCase::RedFarNephew
        } else if self.is_red(near) {
            DoubleBlackCase::RedNearNephew
        } else if self.arena[parent].color == Color::Red {
            DoubleBlackCase::BlackNephewsRedParent
        } else {
            DoubleBlackCase::BlackNephewsBlackParent
        }
    }

    /// Restores black height around `node`, which is one black short.
    ///
    /// `node` is still linked while this runs; the caller detaches it.
    fn fix_double_black(&mut self, mut node: usize) {
        while self.root != Some(node) {
            let Some(parent) = self.arena[node].parent else {
                break;
            };
            let node_is_left = self.arena[parent].left == Some(node);
            let sibling = if node_is_left {
                self.arena[parent].right
            } else {
                self.arena[parent].left
            };
            // A black-height deficit implies a non-empty sibling subtree.
            let Some(sibling) = sibling else {
                node = parent;
                continue;
            };

            match self.classify_double_black(parent, sibling, node_is_left) {
                DoubleBlackCase::RedSibling => {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_toward(parent, node_is_left);
                }
                DoubleBlackCase::RedFarNephew => {
                    let far = if node_is_left {
                        self.arena[sibling].right
                    } else {
                        self.arena[sibling].left
                    };
                    self.set_color(sibling, self.arena[parent].color);
                    self.set_color(parent, Color::Black);
                    if let Some(far) = far {
                        self.set_color(far, Color::Black);
                    }
                    self.rotate_toward(parent, node_is_left);
                    return;
                }
                DoubleBlackCase::RedNearNephew => {
                    let near = if node_is_left {
                        self.arena[sibling].left
                    } else {
                        self.arena[sibling].right
                    };
                    if let Some(near) = near {
                        self.set_color(near, Color::Black);
                    }
                    self.set_color(sibling, Color::Red);
                    self.rotate_toward(sibling, !node_is_left);
                }
                DoubleBlackCase::BlackNephewsRedParent => {
                    self.set_color(sibling, Color::Red);
                    self.set_color(parent, Color::Black);
                    return;
                }
                DoubleBlackCase::BlackNephewsBlackParent => {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                }
            }
        }
    }

    /// Erases the node at `index` and returns a cursor at the element that
    /// followed it.
    fn erase_index(&mut self, index: usize) -> Cursor {
        let mut tracked = [self.successor(index)];
        drop(self.extract(index, &mut tracked));
        self.cursor_at(tracked[0])
    }

    /// Erases the entry under `cursor` and returns a cursor at the entry that
    /// followed it.
    ///
    /// End, stale and foreign cursors leave the tree untouched and yield the
    /// end cursor. When the erased node has children, its pair is first
    /// swapped with a neighbour's and the neighbour's node is cut instead, so
    /// cursors at that neighbour go stale.
    pub fn erase_at(&mut self, cursor: Cursor) -> Cursor {
        match self.locate(cursor) {
            Some(Location::Node(index)) => self.erase_index(index),
            _ => self.end(),
        }
    }

    /// Removes the entry under `cursor` and returns it.
    pub fn remove_at(&mut self, cursor: Cursor) -> Option<(K, V)> {
        let index = self.locate(cursor).and_then(Location::index)?;
        Some(*self.extract(index, &mut []))
    }

    /// Erases every entry in `[first, last)` and returns a cursor at the
    /// entry `last` pointed to.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::InvalidRange`] without touching the tree if
    /// either cursor is stale or foreign, or if `last` cannot be reached by
    /// stepping forward from `first`.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Result<Cursor, ContainerError> {
        let (Some(start), Some(stop)) = (self.locate(first), self.locate(last)) else {
            return Err(ContainerError::InvalidRange);
        };

        let mut span = 0;
        let mut probe = start;
        while probe != stop {
            let Location::Node(index) = probe else {
                return Err(ContainerError::InvalidRange);
            };
            probe = Location::from_index(self.successor(index));
            span += 1;
        }

        let mut tracked = [start.index(), stop.index()];
        for _ in 0..span {
            let Some(current) = tracked[0] else {
                break;
            };
            let mut neighbours = [self.successor(current), tracked[1]];
            drop(self.extract(current, &mut neighbours));
            tracked = neighbours;
        }

        tracing::debug!(erased = span, remaining = self.length, "erased cursor range");
        Ok(self.cursor_at(tracked[1]))
    }
}

impl<K: Ord, V> RedBlackTree<K, V> {
    // =========================================================================
    // Lookup
    // =========================================================================

    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(index) = current {
            current = match key.cmp(self.arena[index].key().borrow()) {
                Ordering::Less => self.arena[index].left,
                Ordering::Greater => self.arena[index].right,
                Ordering::Equal => return Some(index),
            };
        }
        None
    }

    /// Returns a cursor at an entry with the given key, or the end cursor.
    ///
    /// With duplicate keys any one of the matching entries may be returned.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor_at(self.find_index(key))
    }

    /// Returns `true` if an entry with the given key exists.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_index(key).is_some()
    }

    /// Returns the value of an entry with the given key.
    #[must_use]
    pub fn get_value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_index(key).map(|index| self.arena[index].value())
    }

    /// Returns the value of an entry with the given key, mutably.
    pub fn get_value_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find_index(key)?;
        Some(&mut self.arena[index].entry.1)
    }

    fn lower_bound_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut bound = None;
        let mut current = self.root;
        while let Some(index) = current {
            if self.arena[index].key().borrow() < key {
                current = self.arena[index].right;
            } else {
                bound = Some(index);
                current = self.arena[index].left;
            }
        }
        bound
    }

    fn upper_bound_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut bound = None;
        let mut current = self.root;
        while let Some(index) = current {
            if self.arena[index].key().borrow() <= key {
                current = self.arena[index].right;
            } else {
                bound = Some(index);
                current = self.arena[index].left;
            }
        }
        bound
    }

    /// Returns a cursor at the first entry whose key is not less than `key`.
    #[must_use]
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor_at(self.lower_bound_index(key))
    }

    /// Returns a cursor at the first entry whose key is greater than `key`.
    #[must_use]
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor_at(self.upper_bound_index(key))
    }

    /// Returns the `[lower_bound, upper_bound)` pair for `key`.
    #[must_use]
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor, Cursor)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns the number of entries with the given key.
    #[must_use]
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut total = 0;
        let mut current = self.lower_bound_index(key);
        while let Some(index) = current {
            if self.arena[index].key().borrow() != key {
                break;
            }
            total += 1;
            current = self.successor(index);
        }
        total
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Finds where `key` goes. Equal keys descend right, so duplicates keep
    /// insertion order; in unique mode an equal key reports its node.
    fn place(&self, key: &K) -> Placement {
        let mut parent = None;
        let mut left = false;
        let mut current = self.root;
        while let Some(index) = current {
            parent = Some(index);
            match key.cmp(self.arena[index].key()) {
                Ordering::Less => {
                    left = true;
                    current = self.arena[index].left;
                }
                Ordering::Equal if self.uniqueness == Uniqueness::Unique => {
                    return Placement::Occupied(index);
                }
                Ordering::Equal | Ordering::Greater => {
                    left = false;
                    current = self.arena[index].right;
                }
            }
        }
        Placement::Vacant { parent, left }
    }

    fn insert_entry(&mut self, entry: Box<(K, V)>) -> Result<usize, (usize, Box<(K, V)>)> {
        match self.place(&entry.0) {
            Placement::Occupied(index) => Err((index, entry)),
            Placement::Vacant { parent, left } => Ok(self.attach(entry, parent, left)),
        }
    }

    /// Inserts a pair and returns a cursor at it.
    ///
    /// In unique mode an existing key rejects the pair: it is dropped and the
    /// end cursor is returned.
    pub fn insert(&mut self, key: K, value: V) -> Cursor {
        match self.insert_entry(Box::new((key, value))) {
            Ok(index) => self.cursor_at(Some(index)),
            Err(_) => self.end(),
        }
    }

    /// Inserts a pair, reporting whether it was added.
    ///
    /// On a rejected duplicate the cursor points at the entry already
    /// present and the flag is `false`.
    pub fn emplace(&mut self, key: K, value: V) -> (Cursor, bool) {
        match self.insert_entry(Box::new((key, value))) {
            Ok(index) => (self.cursor_at(Some(index)), true),
            Err((existing, _)) => (self.cursor_at(Some(existing)), false),
        }
    }

    /// Inserts a pair built lazily, only if the key is absent (or always in
    /// non-unique mode).
    pub fn emplace_with<F>(&mut self, key: K, make_value: F) -> (Cursor, bool)
    where
        F: FnOnce() -> V,
    {
        match self.place(&key) {
            Placement::Occupied(index) => (self.cursor_at(Some(index)), false),
            Placement::Vacant { parent, left } => {
                let index = self.attach(Box::new((key, make_value())), parent, left);
                (self.cursor_at(Some(index)), true)
            }
        }
    }

    /// Inserts a pair, or overwrites the value of the entry already holding
    /// the key. The flag is `true` on insertion and `false` on assignment.
    ///
    /// In non-unique mode this always inserts.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Cursor, bool) {
        match self.place(&key) {
            Placement::Occupied(index) => {
                self.arena[index].entry.1 = value;
                (self.cursor_at(Some(index)), false)
            }
            Placement::Vacant { parent, left } => {
                let index = self.attach(Box::new((key, value)), parent, left);
                (self.cursor_at(Some(index)), true)
            }
        }
    }

    /// Returns the value stored under `key`, inserting one built by
    /// `make_value` first if the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, make_value: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let index = match self.place(&key) {
            Placement::Occupied(index) => index,
            Placement::Vacant { parent, left } => {
                self.attach(Box::new((key, make_value())), parent, left)
            }
        };
        &mut self.arena[index].entry.1
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Erases one entry with the given key and returns a cursor at the entry
    /// that followed it. An absent key is a no-op returning the end cursor.
    pub fn erase<Q>(&mut self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(index) = self.find_index(key) else {
            return self.end();
        };
        self.erase_index(index)
    }

    /// Removes one entry with the given key and returns it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find_index(key)?;
        Some(*self.extract(index, &mut []))
    }

    /// Moves entries from `other` into `self`, one extraction at a time.
    ///
    /// In unique mode keys already present in `self` stay behind in `other`;
    /// otherwise `other` ends up empty. Pairs move by their box and are
    /// never cloned.
    pub fn merge(&mut self, other: &mut Self) {
        let mut moved = 0;
        let mut current = other.first_index();
        while let Some(index) = current {
            if let Placement::Vacant { parent, left } = self.place(other.arena[index].key()) {
                let mut tracked = [other.successor(index)];
                let entry = other.extract(index, &mut tracked);
                self.attach(entry, parent, left);
                moved += 1;
                current = tracked[0];
            } else {
                current = other.successor(index);
            }
        }
        tracing::debug!(moved, left_behind = other.length, "merged red-black trees");
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for RedBlackTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::unique()
    }
}

impl<K: Clone, V: Clone> Clone for RedBlackTree<K, V> {
    /// Deep copy by re-inserting every pair, in key order, into a fresh tree.
    ///
    /// The copy has the same entries in the same order (duplicates included)
    /// but not necessarily the same shape, and it gets its own end sentinel.
    fn clone(&self) -> Self {
        let mut copy = Self::new(self.uniqueness);
        let mut current = self.first_index();
        while let Some(index) = current {
            let parent = copy.last_index();
            copy.attach(Box::new((*self.arena[index].entry).clone()), parent, false);
            current = self.successor(index);
        }
        copy
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedBlackTree<K, V> {
    /// Builds a unique-key tree; later duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::unique();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedBlackTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for RedBlackTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, K, V> IntoIterator for &'a RedBlackTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut RedBlackTree<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RedBlackTree<K, V> {
    /// Trees are equal when they hold the same entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RedBlackTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

/// Display adaptor behind [`RedBlackTree::structure`].
struct Structure<'a, K, V> {
    tree: &'a RedBlackTree<K, V>,
}

impl<K: fmt::Debug, V> fmt::Display for Structure<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree
            .root
            .map_or(Ok(()), |root| self.tree.render(root, "", true, true, formatter))
    }
}

static_assertions::assert_impl_all!(RedBlackTree<i32, String>: Send, Sync);
static_assertions::assert_impl_all!(Cursor: Send, Sync, Copy);

// =============================================================================
// Tests
// =============================================================================
