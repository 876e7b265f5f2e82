//! Property-based tests for RedBlackTree.
//!
//! These tests drive the tree through random operation sequences and check
//! the balancing invariants and the contents against a `BTreeMap` model.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rbcontainers::tree::{RedBlackTree, Uniqueness};

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Clone, Debug)]
enum Operation {
    Insert(i16),
    Erase(i16),
    EraseAt(usize),
}

fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (-64i16..64).prop_map(Operation::Insert),
        1 => (-64i16..64).prop_map(Operation::Erase),
        1 => (0usize..128).prop_map(Operation::EraseAt),
    ]
}

fn arbitrary_operations() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(arbitrary_operation(), 0..200)
}

fn arbitrary_keys(max_size: usize) -> impl Strategy<Value = Vec<i16>> {
    prop::collection::vec(-100i16..100, 0..max_size)
}

fn non_unique_tree(keys: &[i16]) -> RedBlackTree<i16, usize> {
    let mut tree = RedBlackTree::non_unique();
    for (position, &key) in keys.iter().enumerate() {
        tree.insert(key, position);
    }
    tree
}

/// Multiset model: key to number of copies.
fn count_model(keys: &[i16]) -> BTreeMap<i16, usize> {
    let mut model = BTreeMap::new();
    for &key in keys {
        *model.entry(key).or_insert(0) += 1;
    }
    model
}

fn model_keys(model: &BTreeMap<i16, usize>) -> Vec<i16> {
    model
        .iter()
        .flat_map(|(&key, &copies)| std::iter::repeat_n(key, copies))
        .collect()
}

// =============================================================================
// Balancing Laws
// =============================================================================

proptest! {
    /// Law: the red-black invariants hold after every operation, in both
    /// modes, and the contents match the model.
    #[test]
    fn prop_invariants_hold_after_every_operation(
        operations in arbitrary_operations(),
        unique: bool
    ) {
        let uniqueness = if unique { Uniqueness::Unique } else { Uniqueness::NonUnique };
        let mut tree: RedBlackTree<i16, ()> = RedBlackTree::new(uniqueness);
        let mut model: BTreeMap<i16, usize> = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(key) => {
                    let (_, inserted) = tree.emplace(key, ());
                    let copies = model.entry(key).or_insert(0);
                    prop_assert_eq!(inserted, !unique || *copies == 0);
                    if inserted {
                        *copies += 1;
                    }
                }
                Operation::Erase(key) => {
                    tree.erase(&key);
                    if let Some(copies) = model.get_mut(&key) {
                        *copies -= 1;
                        if *copies == 0 {
                            model.remove(&key);
                        }
                    }
                }
                Operation::EraseAt(rank) => {
                    if tree.is_empty() {
                        continue;
                    }
                    let rank = rank % tree.len();
                    let cursor = tree.advance(tree.begin(), rank);
                    let key = tree.get(cursor).map(|(key, ())| *key);
                    let next = tree.erase_at(cursor);
                    let expected_next = model_keys(&model).into_iter().nth(rank + 1);
                    if let Some(key) = key {
                        if let Some(copies) = model.get_mut(&key) {
                            *copies -= 1;
                            if *copies == 0 {
                                model.remove(&key);
                            }
                        }
                    }
                    prop_assert_eq!(tree.get(next).map(|(key, ())| *key), expected_next);
                }
            }
            prop_assert!(tree.black_height().is_some(), "{}", tree.structure());
            prop_assert_eq!(tree.len(), model.values().sum::<usize>());
        }

        prop_assert_eq!(tree.keys().copied().collect::<Vec<_>>(), model_keys(&model));
    }

    /// Law: a tree of black height h holds at least 2^h - 1 nodes.
    #[test]
    fn prop_black_height_bounds_size(keys in arbitrary_keys(300)) {
        let tree = non_unique_tree(&keys);
        let black_height = tree.black_height();
        prop_assert!(black_height.is_some());
        let minimum = (1usize << black_height.unwrap_or(0)) - 1;
        prop_assert!(tree.len() >= minimum);
    }
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: in-order traversal is sorted, and duplicates keep insertion
    /// order.
    #[test]
    fn prop_traversal_is_stable_sort(keys in arbitrary_keys(100)) {
        let tree = non_unique_tree(&keys);
        let mut expected: Vec<(i16, usize)> = keys.iter().copied().zip(0..).collect();
        expected.sort_by_key(|(key, _)| *key);
        let actual: Vec<(i16, usize)> = tree.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Law: unique mode keeps the first value inserted for each key.
    #[test]
    fn prop_unique_mode_keeps_first(keys in arbitrary_keys(100)) {
        let mut tree = RedBlackTree::unique();
        let mut model = BTreeMap::new();
        for (position, &key) in keys.iter().enumerate() {
            tree.insert(key, position);
            model.entry(key).or_insert(position);
        }
        let actual: Vec<(i16, usize)> = tree.iter().map(|(key, value)| (*key, *value)).collect();
        let expected: Vec<(i16, usize)> = model.into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    /// Law: walking cursors forward and backward visits the same entries as
    /// the iterator.
    #[test]
    fn prop_cursor_walks_match_iterator(keys in arbitrary_keys(100)) {
        let tree = non_unique_tree(&keys);
        let expected: Vec<i16> = tree.keys().copied().collect();

        let mut forward = Vec::new();
        let mut cursor = tree.begin();
        while cursor != tree.end() {
            forward.extend(tree.get(cursor).map(|(key, _)| *key));
            cursor = tree.next(cursor);
        }

        let mut backward = Vec::new();
        let mut cursor = tree.prev(tree.end());
        while cursor != tree.end() {
            backward.extend(tree.get(cursor).map(|(key, _)| *key));
            cursor = tree.prev(cursor);
        }
        backward.reverse();

        prop_assert_eq!(&forward, &expected);
        prop_assert_eq!(&backward, &expected);
    }

    /// Law: bounds and counts agree with the model.
    #[test]
    fn prop_bounds_match_model(keys in arbitrary_keys(100), probe in -110i16..110) {
        let tree = non_unique_tree(&keys);
        let model = count_model(&keys);
        let sorted = model_keys(&model);

        let below = sorted.iter().filter(|&&key| key < probe).count();
        let not_above = sorted.iter().filter(|&&key| key <= probe).count();

        prop_assert_eq!(tree.lower_bound(&probe), tree.advance(tree.begin(), below));
        prop_assert_eq!(tree.upper_bound(&probe), tree.advance(tree.begin(), not_above));
        prop_assert_eq!(tree.count(&probe), model.get(&probe).copied().unwrap_or(0));
        prop_assert_eq!(tree.contains(&probe), model.contains_key(&probe));
    }
}

// =============================================================================
// Bulk Operation Laws
// =============================================================================

proptest! {
    /// Law: erasing a cursor range removes exactly that slice of the
    /// traversal and returns a cursor at the element after it.
    #[test]
    fn prop_erase_range_removes_slice(
        keys in arbitrary_keys(100),
        start in 0usize..100,
        width in 0usize..100
    ) {
        let mut tree = non_unique_tree(&keys);
        let before: Vec<i16> = tree.keys().copied().collect();
        let start = start.min(before.len());
        let stop = (start + width).min(before.len());

        let first = tree.advance(tree.begin(), start);
        let last = tree.advance(tree.begin(), stop);
        let next = tree.erase_range(first, last);

        let mut expected = before.clone();
        expected.drain(start..stop);
        prop_assert!(next.is_ok());
        let next_key = next.ok().and_then(|cursor| tree.get(cursor)).map(|(key, _)| *key);
        prop_assert_eq!(next_key, before.get(stop).copied());
        prop_assert_eq!(tree.keys().copied().collect::<Vec<_>>(), expected);
        prop_assert!(tree.black_height().is_some());
    }

    /// Law: merge conserves entries; in unique mode the destination ends
    /// up with the union and the source with the intersection.
    #[test]
    fn prop_merge_conserves_entries(
        left in arbitrary_keys(60),
        right in arbitrary_keys(60),
        unique: bool
    ) {
        let uniqueness = if unique { Uniqueness::Unique } else { Uniqueness::NonUnique };
        let mut destination = RedBlackTree::new(uniqueness);
        let mut source = RedBlackTree::new(uniqueness);
        destination.extend(left.iter().map(|&key| (key, ())));
        source.extend(right.iter().map(|&key| (key, ())));
        let total = destination.len() + source.len();

        destination.merge(&mut source);

        prop_assert_eq!(destination.len() + source.len(), total);
        prop_assert!(destination.black_height().is_some());
        prop_assert!(source.black_height().is_some());
        if unique {
            prop_assert!(source.keys().all(|key| destination.contains(key)));
        } else {
            prop_assert!(source.is_empty());
        }
    }

    /// Law: a clone has the same entries in the same order and is
    /// independent of the original.
    #[test]
    fn prop_clone_is_deep(keys in arbitrary_keys(100)) {
        let original = non_unique_tree(&keys);
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        prop_assert!(copy.black_height().is_some());

        copy.clear();
        prop_assert_eq!(original.len(), keys.len());
    }
}
