//! Sequence containers.
//!
//! - [`Vector`]: contiguous growable sequence with a doubling growth policy
//! - [`Stack`]: last-in, first-out adaptor over [`Vector`]
//! - [`Queue`]: first-in, first-out adaptor
//!
//! # Examples
//!
//! ```rust
//! use rbcontainers::sequence::{Queue, Stack, Vector};
//!
//! let vector: Vector<i32> = (1..=3).collect();
//! let stack: Stack<i32> = vector.iter().copied().collect();
//! let queue: Queue<i32> = vector.iter().copied().collect();
//!
//! assert_eq!(stack.top(), Ok(&3));
//! assert_eq!(queue.front(), Ok(&1));
//! ```

mod queue;
mod stack;
mod vector;

pub use queue::Queue;
pub use stack::Stack;
pub use vector::Vector;
