//! Error types for persistent collections.

use thiserror::Error;

/// The requested index does not address a valid position.
///
/// `index` is the caller-supplied index before sign normalization, so the
/// message names exactly what was passed in.
///
/// # Examples
///
/// ```rust
/// use persistent_array::persistent::OutOfBoundsError;
///
/// let error = OutOfBoundsError::new(3, 3);
/// assert_eq!(error.to_string(), "Index 3 is out of bounds for length 3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("Index {index} is out of bounds for length {length}")]
pub struct OutOfBoundsError {
    /// The index as supplied by the caller.
    pub index: isize,
    /// The length of the collection at the time of the call.
    pub length: usize,
}

impl OutOfBoundsError {
    /// Creates a new error for `index` against a collection of `length` elements.
    #[inline]
    #[must_use]
    pub const fn new(index: isize, length: usize) -> Self {
        Self { index, length }
    }
}
