//! Error type shared by every container in the crate.
//!
//! Failures are limited to element-access boundaries and range validation.
//! Rebalancing never fails, and a rejected duplicate key is reported through
//! the normal result shape (a `bool` flag or an end cursor), not through
//! this type.

use thiserror::Error;

/// Errors reported by fallible container operations.
///
/// # Examples
///
/// ```rust
/// use rbcontainers::ContainerError;
///
/// let error = ContainerError::OutOfRange { index: 5, length: 3 };
/// assert_eq!(
///     format!("{error}"),
///     "index 5 is out of range for a container of length 3"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// A keyed lookup found no matching element.
    #[error("key not found")]
    KeyNotFound,

    /// A positional access or insertion went past the end of a sequence.
    #[error("index {index} is out of range for a container of length {length}")]
    OutOfRange {
        /// The requested position.
        index: usize,
        /// The number of elements at the time of the call.
        length: usize,
    },

    /// An element was requested from an empty container.
    #[error("{operation} called on an empty container")]
    Empty {
        /// The name of the operation that needed an element.
        operation: &'static str,
    },

    /// A cursor range did not describe a forward walk inside one container.
    #[error("invalid cursor range: endpoints are stale, foreign, or out of order")]
    InvalidRange,

    /// A capacity request exceeded the largest representable container.
    #[error("requested capacity {requested} exceeds the maximum of {maximum}")]
    CapacityOverflow {
        /// The requested capacity.
        requested: usize,
        /// The value of `max_size` for the container.
        maximum: usize,
    },
}
