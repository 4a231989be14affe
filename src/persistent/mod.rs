//! Persistent (immutable) data structures.
//!
//! - [`PersistentArray`]: dense array addressed by signed position
//! - [`PersistentArrayBuilder`]: in-place builder that finishes as a
//!   `PersistentArray`
//!
//! Every update returns a new version; existing versions are never modified.
//!
//! # Signed Indexing
//!
//! Indexed operations accept an `isize`. Non-negative values count from the
//! front, negative values from the back. Reads, replacements and removals
//! accept `-len..len`; insertions also accept `len` (append). See
//! [`normalize`].
//!
//! # Examples
//!
//! ```rust
//! use persistent_array::persistent::PersistentArray;
//!
//! let array: PersistentArray<i32> = (1..=3).collect();
//! let updated = array.set(1, 20).unwrap();
//!
//! assert_eq!(array.get(1), Ok(&2));     // Original unchanged
//! assert_eq!(updated.get(1), Ok(&20));  // New version
//! assert_eq!(updated.get(-2), Ok(&20)); // Same position from the back
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod array;
mod error;
mod index;
mod reindex;

pub use array::PersistentArray;
pub use array::PersistentArrayBuilder;
pub use array::PersistentArrayIntoIterator;
pub use array::PersistentArrayIterator;
pub use error::OutOfBoundsError;
pub use index::{Bounds, normalize};

// =============================================================================
// Tests
// =============================================================================
