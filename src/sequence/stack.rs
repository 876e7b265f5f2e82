//! LIFO adaptor over [`Vector`].

use std::fmt;

use super::Vector;
use crate::error::ContainerError;

/// A last-in, first-out stack backed by a [`Vector`].
///
/// # Examples
///
/// ```rust
/// use rbcontainers::sequence::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1);
/// stack.push(2);
/// assert_eq!(stack.top(), Ok(&2));
/// assert_eq!(stack.pop(), Ok(2));
/// assert_eq!(stack.len(), 1);
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Stack<T> {
    elements: Vector<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vector::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the stack holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the most recently pushed element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Empty`] if the stack is empty.
    pub fn top(&self) -> Result<&T, ContainerError> {
        self.elements
            .back()
            .map_err(|_| ContainerError::Empty { operation: "top" })
    }

    /// Pushes an element on top.
    pub fn push(&mut self, value: T) {
        self.elements.push_back(value);
    }

    /// Removes and returns the top element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Empty`] if the stack is empty.
    pub fn pop(&mut self) -> Result<T, ContainerError> {
        self.elements
            .pop_back()
            .ok_or(ContainerError::Empty { operation: "pop" })
    }

    /// Exchanges the contents of two stacks.
    pub const fn swap(&mut self, other: &mut Self) {
        self.elements.swap(&mut other.elements);
    }

    /// Pushes every element of `values` in order, so the last one ends up
    /// on top.
    pub fn insert_many_back<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.elements.insert_many_back(values);
    }

    /// Returns an iterator from the bottom of the stack to the top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter);
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}
