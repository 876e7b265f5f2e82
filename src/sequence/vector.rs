//! Growable contiguous vector with an explicit growth policy.
//!
//! This module provides [`Vector`], a sequence that keeps its element count
//! and its logical capacity apart and grows the capacity by doubling.
//!
//! # Growth Policy
//!
//! - An empty vector has capacity 0.
//! - An append or insert that would exceed the capacity doubles it, starting
//!   at 1 from 0, until the new length fits.
//! - [`Vector::reserve`] grows to exactly the requested capacity and never
//!   shrinks.
//! - [`Vector::shrink_to_fit`] sets the capacity to the length.
//! - [`Vector::clear`] releases the buffer: length and capacity both become 0.
//!
//! # Examples
//!
//! ```rust
//! use rbcontainers::sequence::Vector;
//!
//! let mut vector = Vector::new();
//! let mut capacities = vec![vector.capacity()];
//! for element in 1..=5 {
//!     vector.push_back(element);
//!     capacities.push(vector.capacity());
//! }
//! assert_eq!(capacities, vec![0, 1, 2, 4, 4, 8]);
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::ContainerError;

// =============================================================================
// Vector Definition
// =============================================================================

/// A growable sequence with a doubling growth policy.
///
/// Elements are stored contiguously and positions are plain indices.
/// Positional operations check their index and report
/// [`ContainerError::OutOfRange`] instead of panicking; `Index` and
/// `IndexMut` panic past the length, as slices do.
///
/// # Time Complexity
///
/// | Operation               | Complexity     |
/// |-------------------------|----------------|
/// | `at` / `[]`             | O(1)           |
/// | `push_back`             | O(1) amortized |
/// | `pop_back`              | O(1)           |
/// | `insert` / `erase`      | O(N)           |
/// | `reserve` / `shrink`    | O(N)           |
///
/// # Examples
///
/// ```rust
/// use rbcontainers::sequence::Vector;
///
/// let mut vector: Vector<i32> = [1, 2, 4].into_iter().collect();
/// vector.insert(2, 3).unwrap();
/// assert_eq!(vector.as_slice(), &[1, 2, 3, 4]);
/// assert!(vector.at(10).is_err());
/// ```
pub struct Vector<T> {
    elements: Vec<T>,
    capacity: usize,
}

impl<T> Vector<T> {
    /// Creates an empty vector with capacity 0.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            capacity: 0,
        }
    }

    /// Creates a vector of `length` default elements, with capacity equal to
    /// the length.
    #[must_use]
    pub fn with_len(length: usize) -> Self
    where
        T: Default,
    {
        let mut elements = Vec::with_capacity(length);
        elements.resize_with(length, T::default);
        Self {
            elements,
            capacity: length,
        }
    }

    // =========================================================================
    // Capacity
    // =========================================================================

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the vector holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the logical capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the largest capacity the address space allows for `T`.
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        let element = size_of::<T>();
        let element = if element == 0 { 1 } else { element };
        isize::MAX.unsigned_abs() / element
    }

    /// Grows the capacity to `capacity` if it is larger than the current
    /// one. Never shrinks.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::CapacityOverflow`] if `capacity` exceeds
    /// [`max_size`](Self::max_size).
    pub fn reserve(&mut self, capacity: usize) -> Result<(), ContainerError> {
        let maximum = self.max_size();
        if capacity > maximum {
            return Err(ContainerError::CapacityOverflow {
                requested: capacity,
                maximum,
            });
        }
        if capacity > self.capacity {
            self.reallocate(capacity);
        }
        Ok(())
    }

    /// Reduces the capacity to the length.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity > self.elements.len() {
            self.reallocate(self.elements.len());
        }
    }

    fn reallocate(&mut self, capacity: usize) {
        tracing::trace!(from = self.capacity, to = capacity, "reallocating vector");
        if capacity > self.elements.capacity() {
            self.elements.reserve_exact(capacity - self.elements.len());
        } else {
            self.elements.shrink_to(capacity);
        }
        self.capacity = capacity;
    }

    /// Makes room for `additional` more elements, doubling as needed.
    ///
    /// # Panics
    ///
    /// Panics if the new length would exceed `max_size`.
    fn grow_for(&mut self, additional: usize) {
        let needed = self.elements.len().saturating_add(additional);
        if needed <= self.capacity {
            return;
        }
        let maximum = self.max_size();
        assert!(needed <= maximum, "capacity overflow");
        let mut capacity = self.capacity.max(1);
        while capacity < needed {
            capacity = capacity.saturating_mul(2);
        }
        self.reallocate(capacity.min(maximum));
    }

    // =========================================================================
    // Element Access
    // =========================================================================

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T, ContainerError> {
        let length = self.elements.len();
        self.elements
            .get(index)
            .ok_or(ContainerError::OutOfRange { index, length })
    }

    /// Returns the element at `index`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ContainerError> {
        let length = self.elements.len();
        self.elements
            .get_mut(index)
            .ok_or(ContainerError::OutOfRange { index, length })
    }

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Empty`] if the vector is empty.
    pub fn front(&self) -> Result<&T, ContainerError> {
        self.elements
            .first()
            .ok_or(ContainerError::Empty { operation: "front" })
    }

    /// Returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Empty`] if the vector is empty.
    pub fn back(&self) -> Result<&T, ContainerError> {
        self.elements
            .last()
            .ok_or(ContainerError::Empty { operation: "back" })
    }

    /// Returns the elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.elements
    }

    /// Alias of [`as_slice`](Self::as_slice).
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[T] {
        self.as_slice()
    }

    /// Returns an iterator over the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Returns an iterator over mutable references to the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Removes every element and releases the buffer, so the capacity drops
    /// to 0 as well.
    pub fn clear(&mut self) {
        tracing::trace!(from = self.capacity, to = 0, "releasing vector buffer");
        self.elements = Vec::new();
        self.capacity = 0;
    }

    /// Inserts `value` before position `index`, shifting later elements, and
    /// returns the position of the new element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, ContainerError> {
        self.check_insert_position(index)?;
        self.grow_for(1);
        self.elements.insert(index, value);
        Ok(index)
    }

    /// Removes and returns the element at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<T, ContainerError> {
        let length = self.elements.len();
        if index >= length {
            return Err(ContainerError::OutOfRange { index, length });
        }
        Ok(self.elements.remove(index))
    }

    /// Appends an element.
    pub fn push_back(&mut self, value: T) {
        self.grow_for(1);
        self.elements.push(value);
    }

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        self.elements.pop()
    }

    /// Exchanges the contents and capacities of two vectors.
    pub const fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Inserts every element of `values` before position `index`, keeping
    /// their order, and returns the position of the first inserted element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index > len()`; nothing is
    /// inserted in that case.
    pub fn insert_many<I>(&mut self, index: usize, values: I) -> Result<usize, ContainerError>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_insert_position(index)?;
        let incoming: Vec<T> = values.into_iter().collect();
        self.grow_for(incoming.len());
        drop(self.elements.splice(index..index, incoming));
        Ok(index)
    }

    /// Appends every element of `values`.
    pub fn insert_many_back<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push_back(value);
        }
    }

    fn check_insert_position(&self, index: usize) -> Result<(), ContainerError> {
        let length = self.elements.len();
        if index > length {
            Err(ContainerError::OutOfRange { index, length })
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for Vector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    /// Copies the elements and keeps the logical capacity.
    fn clone(&self) -> Self {
        let mut elements = Vec::with_capacity(self.capacity);
        elements.extend(self.elements.iter().cloned());
        Self {
            elements,
            capacity: self.capacity,
        }
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.elements[index]
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Self::new();
        vector.insert_many_back(iter);
        vector
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter);
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    /// Compares elements only; capacities may differ.
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Vector<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct VectorVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::de::Visitor<'de> for VectorVisitor<T> {
    type Value = Vector<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut vector = Vector::new();
        while let Some(element) = access.next_element()? {
            vector.push_back(element);
        }
        Ok(vector)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Vector<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(VectorVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

static_assertions::assert_impl_all!(Vector<String>: Send, Sync, Clone);

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_as_sequence() {
        let vector: Vector<i32> = (1..=3).collect();
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, "[1,2,3]");
    }

    #[rstest]
    fn test_roundtrip() {
        let original: Vector<String> = ["a", "b"].iter().map(ToString::to_string).collect();
        let json = serde_json::to_string(&original).unwrap();
        let restored: Vector<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
