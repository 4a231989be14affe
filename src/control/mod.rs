//! Control structures for driving folds.
//!
//! - [`Step`]: the signal a consumer emits after each element
//! - [`Reduction`]: how a traversal ended, including a paused cursor
//!
//! # Examples
//!
//! ```rust
//! use persistent_array::control::{Reduction, Step};
//! use persistent_array::typeclass::Reducible;
//!
//! // Pause after the second element, then resume from the third.
//! let reduction = (1..=5).reduce_with(Step::Continue(0), |sum, element| {
//!     if element == 2 { Step::Suspend(sum + element) } else { Step::Continue(sum + element) }
//! });
//! let (sum, cursor) = reduction.into_suspended().unwrap();
//! assert_eq!(sum, 3);
//!
//! let resumed = cursor.reduce_with(Step::Continue(sum), |sum, element| Step::Continue(sum + element));
//! assert!(matches!(resumed, Reduction::Done(15)));
//! ```

mod step;

pub use step::{Reduction, Step};
