//! Control signals for early-terminable, resumable folds.
//!
//! A fold driven through [`Reducible`](crate::typeclass::Reducible) is steered
//! by the consumer: after every element the step function answers with a
//! [`Step`] telling the producer whether to keep going, stop for good, or
//! pause. The producer reports how the traversal ended with a [`Reduction`].
//!
//! # Examples
//!
//! ```rust
//! use persistent_array::control::{Reduction, Step};
//! use persistent_array::typeclass::Reducible;
//!
//! let reduction = (1..=10).reduce_with(Step::Continue(0), |sum, element| {
//!     if element == 4 { Step::Halt(sum) } else { Step::Continue(sum + element) }
//! });
//! assert!(matches!(reduction, Reduction::Halted(6)));
//! ```

/// The signal a consumer emits at every step of a fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<A> {
    /// Advance to the next element with this accumulator.
    Continue(A),
    /// Stop immediately; the fold ends as [`Reduction::Halted`].
    Halt(A),
    /// Pause; the fold ends as [`Reduction::Suspended`] carrying a cursor
    /// positioned at the next unvisited element.
    Suspend(A),
}

impl<A> Step<A> {
    /// Returns the accumulator carried by this signal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::control::Step;
    ///
    /// assert_eq!(Step::Halt(3).into_accumulator(), 3);
    /// ```
    #[inline]
    pub fn into_accumulator(self) -> A {
        match self {
            Self::Continue(accumulator) | Self::Halt(accumulator) | Self::Suspend(accumulator) => {
                accumulator
            }
        }
    }

    /// Applies a function to the accumulator, keeping the signal.
    #[inline]
    pub fn map<B, F>(self, function: F) -> Step<B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::Continue(accumulator) => Step::Continue(function(accumulator)),
            Self::Halt(accumulator) => Step::Halt(function(accumulator)),
            Self::Suspend(accumulator) => Step::Suspend(function(accumulator)),
        }
    }

    /// Returns `true` if this is a `Continue` signal.
    #[inline]
    pub const fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// How a fold ended.
///
/// `S` is the paused cursor returned on suspension. Resuming is just another
/// `reduce_with` call (or `next`) on that cursor.
pub enum Reduction<A, S> {
    /// Every element was visited with a `Continue` signal.
    Done(A),
    /// The consumer emitted `Halt`.
    Halted(A),
    /// The consumer emitted `Suspend`; the cursor resumes at the next
    /// unvisited element.
    Suspended(A, S),
}

impl<A, S> Reduction<A, S> {
    /// Returns the accumulator, dropping any suspended cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::control::{Reduction, Step};
    /// use persistent_array::typeclass::Reducible;
    ///
    /// let total = (1..=4).reduce_with(Step::Continue(0), |sum, element| Step::Continue(sum + element));
    /// assert_eq!(total.into_accumulator(), 10);
    /// ```
    #[inline]
    pub fn into_accumulator(self) -> A {
        match self {
            Self::Done(accumulator)
            | Self::Halted(accumulator)
            | Self::Suspended(accumulator, _) => accumulator,
        }
    }

    /// Returns a reference to the accumulator.
    #[inline]
    pub const fn accumulator(&self) -> &A {
        match self {
            Self::Done(accumulator)
            | Self::Halted(accumulator)
            | Self::Suspended(accumulator, _) => accumulator,
        }
    }

    /// Returns `true` if the traversal ran to completion.
    #[inline]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Returns `true` if the consumer halted the traversal.
    #[inline]
    pub const fn is_halted(&self) -> bool {
        matches!(self, Self::Halted(_))
    }

    /// Returns `true` if the traversal is paused.
    #[inline]
    pub const fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended(_, _))
    }

    /// Splits a suspended reduction into its accumulator and cursor.
    ///
    /// Returns `None` for `Done` and `Halted`.
    #[inline]
    pub fn into_suspended(self) -> Option<(A, S)> {
        match self {
            Self::Suspended(accumulator, cursor) => Some((accumulator, cursor)),
            Self::Done(_) | Self::Halted(_) => None,
        }
    }
}

impl<A: std::fmt::Debug, S> std::fmt::Debug for Reduction<A, S> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done(accumulator) => formatter.debug_tuple("Done").field(accumulator).finish(),
            Self::Halted(accumulator) => formatter.debug_tuple("Halted").field(accumulator).finish(),
            Self::Suspended(accumulator, _) => formatter
                .debug_tuple("Suspended")
                .field(accumulator)
                .field(&"..")
                .finish(),
        }
    }
}
