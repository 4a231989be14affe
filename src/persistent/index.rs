//! Signed index normalization and bounds checking.
//!
//! Callers address positions with signed indices: non-negative values count
//! from the front, negative values count back from the end (`-1` is the last
//! element). [`normalize`] turns such an index into an absolute position and
//! checks it against one of two [`Bounds`] policies.

use super::error::OutOfBoundsError;

/// Which positions an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bounds {
    /// `0 <= position < length`: reading, replacing or removing an element.
    Access,
    /// `0 <= position <= length`: inserting, where `length` means append.
    Insertion,
}

impl Bounds {
    #[inline]
    const fn admits(self, position: usize, length: usize) -> bool {
        match self {
            Self::Access => position < length,
            Self::Insertion => position <= length,
        }
    }
}

/// Translates a signed `index` into an absolute position within `length`.
///
/// A negative index is taken relative to the end (`length + index`). The
/// result is never clamped or wrapped: anything outside the policy's range
/// is rejected.
///
/// # Errors
///
/// Returns [`OutOfBoundsError`] carrying the original `index` when the
/// normalized position falls outside the range admitted by `bounds`.
///
/// # Examples
///
/// ```rust
/// use persistent_array::persistent::{Bounds, normalize};
///
/// assert_eq!(normalize(-1, 3, Bounds::Access), Ok(2));
/// assert!(normalize(3, 3, Bounds::Access).is_err());
/// assert_eq!(normalize(3, 3, Bounds::Insertion), Ok(3));
/// ```
pub fn normalize(index: isize, length: usize, bounds: Bounds) -> Result<usize, OutOfBoundsError> {
    let position = if index < 0 {
        length.checked_sub(index.unsigned_abs())
    } else {
        Some(index.unsigned_abs())
    };

    match position {
        Some(position) if bounds.admits(position, length) => Ok(position),
        _ => {
            tracing::debug!(index, length, ?bounds, "index rejected");
            Err(OutOfBoundsError::new(index, length))
        }
    }
}
