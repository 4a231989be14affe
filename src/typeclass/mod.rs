//! Type classes for producing and consuming sequences.
//!
//! - [`Reducible`]: consumer-driven folds that can halt or suspend
//! - [`Collectable`]: incremental construction from a producer
//!
//! The two meet in [`collect_into`], which folds any `Reducible` straight
//! into any `Collectable`.
//!
//! # Examples
//!
//! ```rust
//! use persistent_array::typeclass::{Reducible, collect_into};
//!
//! let doubled = collect_into((1..=3).map(|value| value * 2), Vec::new());
//! assert_eq!(doubled, vec![2, 4, 6]);
//! assert!(doubled.into_iter().member(&4));
//! ```

mod collectable;
mod reducible;

pub use collectable::{Aborted, Collectable, Collecting, Collector, Command, collect_into};
pub use reducible::Reducible;
