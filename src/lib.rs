//! # persistent-array
//!
//! An immutable, index-addressable dynamic array for Rust.
//!
//! ## Overview
//!
//! - **Persistent Array**: [`PersistentArray`](persistent::PersistentArray),
//!   a dense sequence with value semantics. Every update returns a new
//!   version and leaves the receiver untouched.
//! - **Signed Indexing**: negative indices count back from the end, and every
//!   indexed operation is bounds-checked, either returning a `Result` or
//!   panicking through its `strict_*` counterpart.
//! - **Type Classes**: [`Reducible`](typeclass::Reducible) for folds the
//!   consumer can halt or suspend, and
//!   [`Collectable`](typeclass::Collectable) for incremental construction.
//! - **Control**: the [`Step`](control::Step) and
//!   [`Reduction`](control::Reduction) signals that drive those folds.
//!
//! ## Feature Flags
//!
//! - `typeclass`: `Reducible` and `Collectable`
//! - `control`: fold control signals
//! - `persistent`: the persistent array
//! - `arc`: share chunks through `Arc` so arrays are `Send + Sync`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use persistent_array::prelude::*;
//!
//! let array: PersistentArray<i32> = (1..=3).collect();
//! let extended = array.add(4);
//!
//! assert_eq!(extended.to_vec(), vec![1, 2, 3, 4]);
//! assert_eq!(array.to_vec(), vec![1, 2, 3]);
//! assert_eq!(extended.length(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use persistent_array::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "persistent")]
pub mod persistent;
