//! Collectable type class - incremental construction from an external source.
//!
//! A [`Collectable`] hands out a [`Collector`], which accepts exactly three
//! signals from a producer:
//!
//! - [`Command::Element`]: absorb one element, in arrival order
//! - [`Command::Done`]: finish and return the built value
//! - [`Command::Abort`]: discard the work and return the [`Aborted`] marker
//!
//! # Examples
//!
//! ```rust
//! use persistent_array::typeclass::{Collecting, Collectable, Collector, Command};
//!
//! let collector = Vec::new().collector().element(1).element(2);
//! match collector.accept(Command::Done) {
//!     Collecting::Finished(built) => assert_eq!(built, vec![1, 2]),
//!     _ => unreachable!(),
//! }
//! ```

use crate::control::Step;

use super::reducible::Reducible;

/// A signal sent from a producer to a [`Collector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<T> {
    /// Absorb one element.
    Element(T),
    /// Finish the construction.
    Done,
    /// Abandon the construction.
    Abort,
}

/// Marker returned when a construction is abandoned.
///
/// It deliberately carries nothing: an aborted construction leaves no usable
/// value behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Aborted;

/// The state of a collector after accepting a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collecting<C, O> {
    /// The collector is waiting for more signals.
    Pending(C),
    /// The construction finished with this value.
    Finished(O),
    /// The construction was abandoned.
    Aborted(Aborted),
}

/// An in-progress construction.
pub trait Collector: Sized {
    /// The element type accepted.
    type Item;

    /// The value produced on completion.
    type Output;

    /// Absorbs one element and returns the updated collector.
    #[must_use]
    fn element(self, element: Self::Item) -> Self;

    /// Finishes the construction.
    fn done(self) -> Self::Output;

    /// Abandons the construction.
    fn abort(self) -> Aborted {
        Aborted
    }

    /// Dispatches a [`Command`] to `element`, `done` or `abort`.
    fn accept(self, command: Command<Self::Item>) -> Collecting<Self, Self::Output> {
        match command {
            Command::Element(element) => Collecting::Pending(self.element(element)),
            Command::Done => Collecting::Finished(self.done()),
            Command::Abort => Collecting::Aborted(self.abort()),
        }
    }
}

/// A type class for values that can be built incrementally.
///
/// The collector starts from `self`, so collecting into a non-empty value
/// appends after its existing elements.
pub trait Collectable: Sized {
    /// The element type accepted.
    type Item;

    /// The collector that builds `Self`.
    type Collector: Collector<Item = Self::Item, Output = Self>;

    /// Starts a construction seeded with `self`.
    fn collector(self) -> Self::Collector;
}

impl<T> Collector for Vec<T> {
    type Item = T;
    type Output = Self;

    #[inline]
    fn element(mut self, element: T) -> Self {
        self.push(element);
        self
    }

    #[inline]
    fn done(self) -> Self {
        self
    }
}

impl<T> Collectable for Vec<T> {
    type Item = T;
    type Collector = Self;

    #[inline]
    fn collector(self) -> Self {
        self
    }
}

/// Streams every element of `source` into `target`.
///
/// The producer is folded straight into the collector, so no intermediate
/// sequence is built.
///
/// # Examples
///
/// ```rust
/// use persistent_array::typeclass::collect_into;
///
/// let evens = collect_into((1..=6).filter(|value| value % 2 == 0), vec![0]);
/// assert_eq!(evens, vec![0, 2, 4, 6]);
/// ```
pub fn collect_into<R, C>(source: R, target: C) -> C
where
    R: Reducible,
    C: Collectable<Item = R::Item>,
{
    source
        .reduce_with(Step::Continue(target.collector()), |collector, element| {
            Step::Continue(collector.element(element))
        })
        .into_accumulator()
        .done()
}
