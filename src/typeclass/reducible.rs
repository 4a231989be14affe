//! Reducible type class - lazy, early-terminable, resumable traversal.
//!
//! `Reducible` is the producer side of a fold. The consumer drives the
//! traversal one element at a time by answering with a [`Step`]; the producer
//! never advances on its own. Because a consumer can stop (`Halt`) or pause
//! (`Suspend`) at any element, composed pipelines short-circuit without
//! building intermediate sequences.
//!
//! Every [`Iterator`] is `Reducible`, and a suspended traversal hands back a
//! cursor that is itself `Reducible`, so resuming is an ordinary
//! `reduce_with` call on the cursor.
//!
//! # Provided Methods
//!
//! `length`, `member` and `slice` have generic fallbacks written in terms of
//! `reduce_with`. Implementors that know better (for example, a container that
//! stores its length) override them.
//!
//! # Examples
//!
//! ```rust
//! use std::num::NonZeroUsize;
//! use persistent_array::typeclass::Reducible;
//!
//! let numbers = 10..20;
//! assert_eq!(numbers.length(), 10);
//! assert!(numbers.member(&15));
//!
//! let step = NonZeroUsize::new(3).unwrap();
//! assert_eq!(numbers.slice(1, 3, step), vec![11, 14, 17]);
//! ```

use std::num::NonZeroUsize;

use crate::control::{Reduction, Step};

/// A type class for producers that can be folded under consumer control.
///
/// # Laws
///
/// - A traversal that only ever sees `Continue` visits every element exactly
///   once, in order, and ends with [`Reduction::Done`].
/// - Suspending after element `k` and resuming the returned cursor visits
///   exactly the elements after `k`.
pub trait Reducible: Sized {
    /// The element type produced by the traversal.
    type Item;

    /// The paused traversal returned on suspension.
    type Cursor: Reducible<Item = Self::Item>;

    /// Folds the elements, consulting the consumer after every element.
    ///
    /// `initial` is itself a signal: `Halt` and `Suspend` end the traversal
    /// before the first element is visited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::control::{Reduction, Step};
    /// use persistent_array::typeclass::Reducible;
    ///
    /// let visited = (0..100).reduce_with(Step::Continue(Vec::new()), |mut seen, element| {
    ///     seen.push(element);
    ///     if element == 1 { Step::Halt(seen) } else { Step::Continue(seen) }
    /// });
    /// assert!(matches!(visited, Reduction::Halted(ref seen) if seen == &[0, 1]));
    /// ```
    fn reduce_with<A, F>(self, initial: Step<A>, function: F) -> Reduction<A, Self::Cursor>
    where
        F: FnMut(A, Self::Item) -> Step<A>;

    /// Returns the number of elements.
    ///
    /// The fallback counts by traversing a clone of the producer.
    fn length(&self) -> usize
    where
        Self: Clone,
    {
        self.clone()
            .reduce_with(Step::Continue(0usize), |count, _| Step::Continue(count + 1))
            .into_accumulator()
    }

    /// Returns `true` if any element equals `target`.
    ///
    /// The fallback is a linear scan that halts at the first match.
    fn member(&self, target: &Self::Item) -> bool
    where
        Self: Clone,
        Self::Item: PartialEq,
    {
        self.clone()
            .reduce_with(Step::Continue(false), |_, element| {
                if element == *target {
                    Step::Halt(true)
                } else {
                    Step::Continue(false)
                }
            })
            .into_accumulator()
    }

    /// Returns up to `count` elements at positions `start, start + step, ...`.
    ///
    /// Terms that would fall past the last element are omitted. The fallback
    /// walks the producer from the beginning and halts once `count` elements
    /// have been taken.
    fn slice(&self, start: usize, count: usize, step: NonZeroUsize) -> Vec<Self::Item>
    where
        Self: Clone,
    {
        if count == 0 {
            return Vec::new();
        }

        let step = step.get();
        let (_, selected) = self
            .clone()
            .reduce_with(
                Step::Continue((0usize, Vec::new())),
                |(position, mut selected), element| {
                    if position >= start && (position - start) % step == 0 {
                        selected.push(element);
                        if selected.len() == count {
                            return Step::Halt((position + 1, selected));
                        }
                    }
                    Step::Continue((position + 1, selected))
                },
            )
            .into_accumulator();
        selected
    }
}

impl<I: Iterator> Reducible for I {
    type Item = <I as Iterator>::Item;
    type Cursor = I;

    fn reduce_with<A, F>(mut self, initial: Step<A>, mut function: F) -> Reduction<A, Self>
    where
        F: FnMut(A, <I as Iterator>::Item) -> Step<A>,
    {
        let mut accumulator = match initial {
            Step::Continue(accumulator) => accumulator,
            Step::Halt(accumulator) => return Reduction::Halted(accumulator),
            Step::Suspend(accumulator) => return Reduction::Suspended(accumulator, self),
        };

        while let Some(element) = self.next() {
            match function(accumulator, element) {
                Step::Continue(next) => accumulator = next,
                Step::Halt(next) => return Reduction::Halted(next),
                Step::Suspend(next) => return Reduction::Suspended(next, self),
            }
        }

        Reduction::Done(accumulator)
    }
}
