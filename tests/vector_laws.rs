#![cfg(feature = "sequence")]
//! Property-based tests for Vector.
//!
//! A `Vector` is checked against `Vec` under random edits, and its capacity
//! against the doubling policy.

use proptest::prelude::*;
use rbcontainers::sequence::Vector;

#[derive(Clone, Debug)]
enum Operation {
    PushBack(i32),
    PopBack,
    Insert(usize, i32),
    Erase(usize),
    Reserve(usize),
    ShrinkToFit,
}

fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => any::<i32>().prop_map(Operation::PushBack),
        1 => Just(Operation::PopBack),
        2 => (0usize..64, any::<i32>()).prop_map(|(index, value)| Operation::Insert(index, value)),
        1 => (0usize..64).prop_map(Operation::Erase),
        1 => (0usize..128).prop_map(Operation::Reserve),
        1 => Just(Operation::ShrinkToFit),
    ]
}

proptest! {
    /// Law: a Vector holds the same elements as a Vec under the same edits,
    /// and its length never exceeds its capacity.
    #[test]
    fn prop_vector_matches_vec(operations in prop::collection::vec(arbitrary_operation(), 0..150)) {
        let mut vector = Vector::new();
        let mut model = Vec::new();

        for operation in operations {
            match operation {
                Operation::PushBack(value) => {
                    vector.push_back(value);
                    model.push(value);
                }
                Operation::PopBack => {
                    prop_assert_eq!(vector.pop_back(), model.pop());
                }
                Operation::Insert(index, value) => {
                    let result = vector.insert(index, value);
                    if index <= model.len() {
                        model.insert(index, value);
                        prop_assert_eq!(result, Ok(index));
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Operation::Erase(index) => {
                    let result = vector.erase(index);
                    if index < model.len() {
                        prop_assert_eq!(result, Ok(model.remove(index)));
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Operation::Reserve(capacity) => {
                    let before = vector.capacity();
                    prop_assert!(vector.reserve(capacity).is_ok());
                    prop_assert_eq!(vector.capacity(), before.max(capacity));
                }
                Operation::ShrinkToFit => {
                    vector.shrink_to_fit();
                    prop_assert_eq!(vector.capacity(), vector.len());
                }
            }
            prop_assert!(vector.len() <= vector.capacity());
            prop_assert_eq!(vector.as_slice(), model.as_slice());
        }
    }

    /// Law: appending to an empty vector keeps the capacity at zero or a
    /// power of two.
    #[test]
    fn prop_push_back_capacity_is_power_of_two(count in 0usize..300) {
        let mut vector = Vector::new();
        for element in 0..count {
            vector.push_back(element);
            prop_assert!(vector.capacity().is_power_of_two());
            prop_assert!(vector.capacity() < 2 * vector.len());
        }
        prop_assert_eq!(vector.len(), count);
    }

    /// Law: insert_many at a position splices like `Vec::splice`.
    #[test]
    fn prop_insert_many_splices(
        base in prop::collection::vec(any::<i8>(), 0..30),
        inserted in prop::collection::vec(any::<i8>(), 0..30),
        position in 0usize..40
    ) {
        let mut vector: Vector<i8> = base.iter().copied().collect();
        let result = vector.insert_many(position, inserted.iter().copied());
        if position <= base.len() {
            let mut model = base.clone();
            model.splice(position..position, inserted);
            prop_assert_eq!(result, Ok(position));
            prop_assert_eq!(vector.as_slice(), model.as_slice());
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(vector.as_slice(), base.as_slice());
        }
    }
}
