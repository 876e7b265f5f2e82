//! # rbcontainers
//!
//! Ordered and sequence containers for Rust, built around an arena-backed
//! red-black tree.
//!
//! ## Overview
//!
//! - **Tree Engine**: [`tree::RedBlackTree`], a mutable red-black tree with
//!   unique or non-unique keys and a detached [`tree::Cursor`] protocol
//! - **Associative Containers**: `TreeMap`, `TreeSet`, `TreeMultiset`
//! - **Sequence Containers**: `Vector` with a doubling growth policy, plus
//!   the `Stack` and `Queue` adaptors
//!
//! ## Feature Flags
//!
//! - `associative`: map, set and multiset (enables `sequence`)
//! - `sequence`: vector, stack and queue
//! - `serde`: `Serialize` / `Deserialize` for every container
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use rbcontainers::prelude::*;
//!
//! let mut map = TreeMap::new();
//! map.insert(2, "two");
//! map.insert(1, "one");
//!
//! let mut cursor = map.begin();
//! let mut keys = Vector::new();
//! while cursor != map.end() {
//!     if let Some((key, _)) = map.get_at(cursor) {
//!         keys.push_back(*key);
//!     }
//!     cursor = map.next(cursor);
//! }
//! assert_eq!(keys.as_slice(), &[1, 2]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the containers, the cursor type and the error type.
///
/// # Usage
///
/// ```rust
/// use rbcontainers::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::ContainerError;
    pub use crate::tree::{Cursor, RedBlackTree, Uniqueness};

    #[cfg(feature = "associative")]
    pub use crate::associative::*;

    #[cfg(feature = "sequence")]
    pub use crate::sequence::*;
}

pub mod error;
pub mod tree;

#[cfg(feature = "associative")]
pub mod associative;

#[cfg(feature = "sequence")]
pub mod sequence;

pub use error::ContainerError;
