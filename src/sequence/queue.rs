//! FIFO adaptor over [`VecDeque`].

use std::collections::VecDeque;
use std::fmt;

use crate::error::ContainerError;

/// A first-in, first-out queue.
///
/// # Examples
///
/// ```rust
/// use rbcontainers::sequence::Queue;
///
/// let mut queue = Queue::new();
/// queue.push(1);
/// queue.push(2);
/// assert_eq!(queue.front(), Ok(&1));
/// assert_eq!(queue.back(), Ok(&2));
/// assert_eq!(queue.pop(), Ok(1));
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Queue<T> {
    elements: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: VecDeque::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the queue holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the oldest element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Empty`] if the queue is empty.
    pub fn front(&self) -> Result<&T, ContainerError> {
        self.elements
            .front()
            .ok_or(ContainerError::Empty { operation: "front" })
    }

    /// Returns the newest element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Empty`] if the queue is empty.
    pub fn back(&self) -> Result<&T, ContainerError> {
        self.elements
            .back()
            .ok_or(ContainerError::Empty { operation: "back" })
    }

    /// Appends an element at the back.
    pub fn push(&mut self, value: T) {
        self.elements.push_back(value);
    }

    /// Removes and returns the front element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Empty`] if the queue is empty.
    pub fn pop(&mut self) -> Result<T, ContainerError> {
        self.elements
            .pop_front()
            .ok_or(ContainerError::Empty { operation: "pop" })
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Exchanges the contents of two queues.
    pub const fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.elements, &mut other.elements);
    }

    /// Appends every element of `values` in order.
    pub fn insert_many_back<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.elements.extend(values);
    }

    /// Returns an iterator from the front of the queue to the back.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter);
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_pop_order_is_fifo() {
        let mut queue: Queue<i32> = (1..=3).collect();
        assert_eq!(queue.pop(), Ok(1));
        assert_eq!(queue.pop(), Ok(2));
        assert_eq!(queue.front(), Ok(&3));
        assert_eq!(queue.back(), Ok(&3));
    }

    #[rstest]
    #[case("front")]
    #[case("back")]
    #[case("pop")]
    fn test_empty_queue_reports_operation(#[case] operation: &'static str) {
        let mut queue: Queue<i32> = Queue::new();
        let error = match operation {
            "front" => queue.front().map(|_| ()),
            "back" => queue.back().map(|_| ()),
            _ => queue.pop().map(|_| ()),
        };
        assert_eq!(error, Err(ContainerError::Empty { operation }));
    }

    #[rstest]
    fn test_insert_many_back_and_clear() {
        let mut queue = Queue::new();
        queue.push(0);
        queue.insert_many_back([1, 2]);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[rstest]
    fn test_swap() {
        let mut first: Queue<i32> = [1].into_iter().collect();
        let mut second: Queue<i32> = [2, 3].into_iter().collect();
        first.swap(&mut second);
        assert_eq!(first.len(), 2);
        assert_eq!(second.front(), Ok(&1));
    }

    #[rstest]
    fn test_borrowed_iteration_runs_front_to_back() {
        let queue: Queue<i32> = (1..=3).collect();
        let mut seen = Vec::new();
        for value in &queue {
            seen.push(*value);
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
