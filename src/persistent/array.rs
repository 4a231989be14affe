//! Persistent (immutable) array with signed, bounds-checked indexing.
//!
//! This module provides [`PersistentArray`], an immutable dense sequence whose
//! elements are addressed by position. Every operation that changes the
//! contents returns a new array and leaves the receiver untouched.
//!
//! # Overview
//!
//! - O(1) `len` and clone, O(log32 N) `get` (effectively constant)
//! - Indices may be negative: `-1` is the last element, `-len` the first
//! - Each indexed operation comes in two flavours: a `Result`-returning one
//!   and a `strict_*` one that panics with
//!   `Index {index} is out of bounds for length {length}`
//! - `add` and `remove` work on a tail chunk and never touch the other
//!   elements
//! - Insertion and removal away from the tail shift only the elements after
//!   the affected position
//!
//! # Internal Structure
//!
//! The elements are split into chunks of 32. Every full chunk except the last
//! is a leaf of a 32-way radix tree; the last chunk (1 to 32 elements) is kept
//! apart as the tail. Versions share every chunk and branch they have in
//! common. Appending or popping rebuilds only the tail, or one root-to-leaf
//! path when the tail fills up or runs empty.
//!
//! # Examples
//!
//! ```rust
//! use persistent_array::persistent::PersistentArray;
//!
//! let array: PersistentArray<i32> = [1, 2, 3].into_iter().collect();
//!
//! let inserted = array.add_at(-2, 4).unwrap();
//! assert_eq!(inserted.to_vec(), vec![1, 4, 2, 3]);
//!
//! // The original array is preserved
//! assert_eq!(array.to_vec(), vec![1, 2, 3]);
//! assert_eq!(array.get(-1), Ok(&3));
//! assert!(array.get(3).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::num::NonZeroUsize;
use std::ops::Index;

use super::ReferenceCounter;
use super::error::OutOfBoundsError;
use super::index::{Bounds, normalize};
use super::reindex;

use crate::control::{Reduction, Step};
use crate::typeclass::{Collectable, Collector, Reducible, collect_into};

/// Number of children per branch and elements per chunk.
const BRANCHING_FACTOR: usize = 32;

/// log2 of `BRANCHING_FACTOR`.
const BITS_PER_LEVEL: usize = 5;

/// Selects the slot within one level.
const MASK: usize = BRANCHING_FACTOR - 1;

// =============================================================================
// Node Definition
// =============================================================================

/// A node of the radix tree.
enum Node<T> {
    /// Children packed from the left
    Branch(ReferenceCounter<Vec<Node<T>>>),
    /// A full chunk of `BRANCHING_FACTOR` elements
    Leaf(ReferenceCounter<Vec<T>>),
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Branch(children) => Self::Branch(children.clone()),
            Self::Leaf(elements) => Self::Leaf(elements.clone()),
        }
    }
}

impl<T> Node<T> {
    fn empty_branch() -> Self {
        Self::Branch(ReferenceCounter::new(Vec::new()))
    }

    /// Wraps `leaf` in single-child branches until it sits at `level`.
    fn new_path(level: usize, leaf: Self) -> Self {
        if level == 0 {
            leaf
        } else {
            Self::Branch(ReferenceCounter::new(vec![Self::new_path(
                level - BITS_PER_LEVEL,
                leaf,
            )]))
        }
    }

    /// Finds the chunk holding `position` below a node at `level`.
    fn leaf(&self, level: usize, position: usize) -> Option<&ReferenceCounter<Vec<T>>> {
        let mut node = self;
        let mut level = level;
        loop {
            match node {
                Self::Branch(children) => {
                    node = children.get((position >> level) & MASK)?;
                    level = level.saturating_sub(BITS_PER_LEVEL);
                }
                Self::Leaf(elements) => return Some(elements),
            }
        }
    }

    /// Returns a copy of this branch with `leaf` stored as the chunk starting
    /// at `position`, which must be the first position past the tree.
    fn push_leaf(&self, level: usize, position: usize, leaf: Self) -> Self {
        let Self::Branch(children) = self else {
            return leaf;
        };
        let mut children = children.as_ref().clone();
        let slot = (position >> level) & MASK;
        if level == BITS_PER_LEVEL {
            children.push(leaf);
        } else if let Some(child) = children.get(slot) {
            let replaced = child.push_leaf(level - BITS_PER_LEVEL, position, leaf);
            children[slot] = replaced;
        } else {
            children.push(Self::new_path(level - BITS_PER_LEVEL, leaf));
        }
        Self::Branch(ReferenceCounter::new(children))
    }

    /// Returns a copy of this branch without its rightmost chunk, which holds
    /// `position`. `None` means nothing is left.
    fn pop_leaf(&self, level: usize, position: usize) -> Option<Self> {
        let Self::Branch(children) = self else {
            return None;
        };
        let mut children = children.as_ref().clone();
        let slot = (position >> level) & MASK;
        let popped = if level > BITS_PER_LEVEL {
            children
                .get(slot)
                .and_then(|child| child.pop_leaf(level - BITS_PER_LEVEL, position))
        } else {
            None
        };
        match popped {
            Some(child) => children[slot] = child,
            None => children.truncate(slot),
        }
        if children.is_empty() {
            None
        } else {
            Some(Self::Branch(ReferenceCounter::new(children)))
        }
    }

    /// Appends every chunk below this node to `chunks` in position order.
    ///
    /// Branches held by nobody else are taken apart rather than copied, so
    /// chunks that only this tree references stay uniquely owned.
    fn into_chunks(self, chunks: &mut VecDeque<ReferenceCounter<Vec<T>>>) {
        match self {
            Self::Leaf(elements) => chunks.push_back(elements),
            Self::Branch(children) => {
                for child in ReferenceCounter::unwrap_or_clone(children) {
                    child.into_chunks(chunks);
                }
            }
        }
    }
}

impl<T: Clone> Node<T> {
    /// Returns a copy of the path to `position` with `element` stored there.
    fn update(&self, level: usize, position: usize, element: T) -> Self {
        match self {
            Self::Branch(children) => {
                let mut children = children.as_ref().clone();
                let slot = (position >> level) & MASK;
                if let Some(child) = children.get(slot) {
                    let replaced =
                        child.update(level.saturating_sub(BITS_PER_LEVEL), position, element);
                    children[slot] = replaced;
                }
                Self::Branch(ReferenceCounter::new(children))
            }
            Self::Leaf(elements) => {
                let mut elements = elements.as_ref().clone();
                if let Some(slot) = elements.get_mut(position & MASK) {
                    *slot = element;
                }
                Self::Leaf(ReferenceCounter::new(elements))
            }
        }
    }
}

// =============================================================================
// PersistentArray Definition
// =============================================================================

/// A persistent (immutable) array addressed by signed position.
///
/// # Time Complexity
///
/// | Operation            | Complexity             |
/// |----------------------|------------------------|
/// | `new`                | O(1)                   |
/// | `len`                | O(1)                   |
/// | `get`                | O(log32 N)             |
/// | `set`                | O(log32 N)             |
/// | `add`                | O(1) amortized         |
/// | `add_at`             | O(N)                   |
/// | `remove`             | O(1) amortized         |
/// | `remove_at`          | O(N)                   |
/// | `to_vec`             | O(N)                   |
/// | `clone`              | O(1)                   |
///
/// `add` and `remove` copy at most one 32-element chunk, plus one
/// O(log32 N) tree path once every 32 calls.
///
/// # Examples
///
/// ```rust
/// use persistent_array::persistent::PersistentArray;
///
/// let array = PersistentArray::new().add(1).add(2).add(3);
/// assert_eq!(array.len(), 3);
/// assert_eq!(array.get(0), Ok(&1));
/// assert_eq!(array.get(-1), Ok(&3));
/// ```
pub struct PersistentArray<T> {
    /// Total number of elements
    length: usize,
    /// Level of the root branch; leaves sit at level 0
    shift: usize,
    /// Full chunks, positions `0..length - tail.len()`
    root: Node<T>,
    /// The last chunk, 1 to 32 elements unless the array is empty
    tail: ReferenceCounter<Vec<T>>,
}

impl<T> Clone for PersistentArray<T> {
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            shift: self.shift,
            root: self.root.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<T> PersistentArray<T> {
    /// Creates a new empty array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = PersistentArray::new();
    /// assert!(array.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            length: 0,
            shift: BITS_PER_LEVEL,
            root: Node::empty_branch(),
            tail: ReferenceCounter::new(Vec::new()),
        }
    }

    /// Creates an array containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array = PersistentArray::singleton(42);
    /// assert_eq!(array.len(), 1);
    /// assert_eq!(array.get(0), Ok(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::from(vec![element])
    }

    /// Returns the number of elements in the array.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Negative indices count back from the end.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBoundsError`] unless `-len <= index < len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// assert_eq!(array.get(0), Ok(&1));
    /// assert_eq!(array.get(-1), Ok(&3));
    /// assert!(array.get(3).is_err());
    /// assert!(array.get(-4).is_err());
    /// ```
    pub fn get(&self, index: isize) -> Result<&T, OutOfBoundsError> {
        let position = normalize(index, self.len(), Bounds::Access)?;
        self.element(position)
            .ok_or_else(|| OutOfBoundsError::new(index, self.len()))
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics with `Index {index} is out of bounds for length {length}` when
    /// [`get`](Self::get) would fail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// assert_eq!(*array.strict_get(-2), 2);
    /// ```
    ///
    /// ```rust,should_panic
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// let _ = array.strict_get(3); // Index 3 is out of bounds for length 3
    /// ```
    #[must_use]
    pub fn strict_get(&self, index: isize) -> &T {
        match self.get(index) {
            Ok(element) => element,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.element(0)
    }

    /// Returns a reference to the last element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tail.last()
    }

    /// Returns an iterator over references to the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// let collected: Vec<&i32> = array.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3]);
    /// ```
    #[inline]
    pub fn iter(&self) -> PersistentArrayIterator<'_, T> {
        PersistentArrayIterator {
            array: self,
            front: 0,
            back: self.length,
            front_chunk: std::slice::Iter::default(),
            back_chunk: std::slice::Iter::default(),
        }
    }

    /// Builds a new array by applying `function` to every element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// let labels = array.map(|value| value.to_string());
    /// assert_eq!(labels.to_vec(), vec!["1", "2", "3"]);
    /// ```
    pub fn map<B, F>(&self, function: F) -> PersistentArray<B>
    where
        F: FnMut(&T) -> B,
    {
        PersistentArray::from(self.iter().map(function).collect::<Vec<B>>())
    }

    /// Number of elements stored in the tree, i.e. the first tail position.
    #[inline]
    fn tail_offset(&self) -> usize {
        self.length - self.tail.len()
    }

    /// Returns the chunk holding `position` and the position of its first
    /// element.
    fn chunk(&self, position: usize) -> Option<(&[T], usize)> {
        if position >= self.length {
            return None;
        }
        let tail_offset = self.tail_offset();
        if position >= tail_offset {
            Some((self.tail.as_slice(), tail_offset))
        } else {
            self.root
                .leaf(self.shift, position)
                .map(|leaf| (leaf.as_slice(), position & !MASK))
        }
    }

    /// Reads an already normalized position.
    fn element(&self, position: usize) -> Option<&T> {
        let (chunk, start) = self.chunk(position)?;
        chunk.get(position - start)
    }

    /// Packs `elements` into full leaves plus a tail, building the tree
    /// bottom-up.
    fn from_vec(mut elements: Vec<T>) -> Self {
        let length = elements.len();
        if length == 0 {
            return Self::new();
        }

        let tail = elements.split_off((length - 1) & !MASK);

        let mut nodes: Vec<Node<T>> = Vec::with_capacity(elements.len() / BRANCHING_FACTOR);
        let mut rest = elements.into_iter();
        loop {
            let chunk: Vec<T> = rest.by_ref().take(BRANCHING_FACTOR).collect();
            if chunk.is_empty() {
                break;
            }
            nodes.push(Node::Leaf(ReferenceCounter::new(chunk)));
        }

        let mut shift = BITS_PER_LEVEL;
        while nodes.len() > BRANCHING_FACTOR {
            let mut parents = Vec::with_capacity(nodes.len().div_ceil(BRANCHING_FACTOR));
            let mut children = nodes.into_iter();
            loop {
                let group: Vec<Node<T>> = children.by_ref().take(BRANCHING_FACTOR).collect();
                if group.is_empty() {
                    break;
                }
                parents.push(Node::Branch(ReferenceCounter::new(group)));
            }
            nodes = parents;
            shift += BITS_PER_LEVEL;
        }

        Self {
            length,
            shift,
            root: Node::Branch(ReferenceCounter::new(nodes)),
            tail: ReferenceCounter::new(tail),
        }
    }
}

impl<T: Clone> PersistentArray<T> {
    /// Creates an array holding a copy of `slice`.
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        Self::from(slice.to_vec())
    }

    /// Returns a new array with `element` appended at position `len`.
    ///
    /// Never fails. Only the tail chunk is copied; once it is full it moves
    /// into the tree as is and a fresh tail is started.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// let extended = array.add(4);
    /// assert_eq!(extended.to_vec(), vec![1, 2, 3, 4]);
    /// assert_eq!(array.len(), 3);
    /// ```
    #[must_use]
    pub fn add(&self, element: T) -> Self {
        if self.tail.len() < BRANCHING_FACTOR {
            let mut tail = Vec::with_capacity(self.tail.len() + 1);
            tail.extend_from_slice(&self.tail);
            tail.push(element);
            return Self {
                length: self.length + 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::new(tail),
            };
        }

        let tail_offset = self.tail_offset();
        let leaf = Node::Leaf(self.tail.clone());
        let (root, shift) = if tail_offset == 1 << (self.shift + BITS_PER_LEVEL) {
            let shift = self.shift + BITS_PER_LEVEL;
            tracing::trace!(shift, "tree grown");
            let children = vec![self.root.clone(), Node::new_path(self.shift, leaf)];
            (Node::Branch(ReferenceCounter::new(children)), shift)
        } else {
            (self.root.push_leaf(self.shift, tail_offset, leaf), self.shift)
        };

        Self {
            length: self.length + 1,
            shift,
            root,
            tail: ReferenceCounter::new(vec![element]),
        }
    }

    /// Returns a new array with `element` inserted at `index`.
    ///
    /// Elements at and after the normalized position move one place right.
    /// An index equal to `len` appends.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBoundsError`] unless `-len <= index <= len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// assert_eq!(array.add_at(1, 4).unwrap().to_vec(), vec![1, 4, 2, 3]);
    /// assert_eq!(array.add_at(3, 4).unwrap().to_vec(), vec![1, 2, 3, 4]);
    /// assert!(array.add_at(4, 4).is_err());
    /// ```
    pub fn add_at(&self, index: isize, element: T) -> Result<Self, OutOfBoundsError> {
        let position = normalize(index, self.len(), Bounds::Insertion)?;
        if position == self.len() {
            return Ok(self.add(element));
        }
        let mut elements = self.to_vec();
        reindex::insert_at(&mut elements, position, element);
        Ok(Self::from_vec(elements))
    }

    /// Returns a new array with `element` inserted at `index`.
    ///
    /// # Panics
    ///
    /// Panics with `Index {index} is out of bounds for length {length}` when
    /// [`add_at`](Self::add_at) would fail.
    #[must_use]
    pub fn strict_add_at(&self, index: isize, element: T) -> Self {
        match self.add_at(index, element) {
            Ok(array) => array,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns a new array with the element at `index` replaced.
    ///
    /// Copies one chunk and the tree path above it.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBoundsError`] unless `-len <= index < len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// let updated = array.set(-1, 30).unwrap();
    /// assert_eq!(updated.to_vec(), vec![1, 2, 30]);
    /// assert_eq!(array.get(-1), Ok(&3));
    /// ```
    pub fn set(&self, index: isize, element: T) -> Result<Self, OutOfBoundsError> {
        let position = normalize(index, self.len(), Bounds::Access)?;
        let tail_offset = self.tail_offset();
        if position >= tail_offset {
            let mut tail = self.tail.as_ref().clone();
            if let Some(slot) = tail.get_mut(position - tail_offset) {
                *slot = element;
            }
            return Ok(Self {
                tail: ReferenceCounter::new(tail),
                ..self.clone()
            });
        }
        Ok(Self {
            root: self.root.update(self.shift, position, element),
            ..self.clone()
        })
    }

    /// Returns a new array with the element at `index` replaced.
    ///
    /// # Panics
    ///
    /// Panics with `Index {index} is out of bounds for length {length}` when
    /// [`set`](Self::set) would fail.
    #[must_use]
    pub fn strict_set(&self, index: isize, element: T) -> Self {
        match self.set(index, element) {
            Ok(array) => array,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns a new array without its last element.
    ///
    /// Removing from an empty array is a no-op and returns an empty array.
    /// When the tail runs empty, the last chunk of the tree becomes the new
    /// tail without being copied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// assert_eq!(array.remove().to_vec(), vec![1, 2]);
    ///
    /// let empty: PersistentArray<i32> = PersistentArray::new();
    /// assert!(empty.remove().is_empty());
    /// ```
    #[must_use]
    pub fn remove(&self) -> Self {
        match self.length {
            0 => return self.clone(),
            1 => return Self::new(),
            _ => {}
        }

        if self.tail.len() > 1 {
            return Self {
                length: self.length - 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::new(self.tail[..self.tail.len() - 1].to_vec()),
            };
        }

        let last = self.tail_offset() - 1;
        let Some(tail) = self.root.leaf(self.shift, last).cloned() else {
            let mut elements = self.to_vec();
            elements.pop();
            return Self::from_vec(elements);
        };

        let mut root = self
            .root
            .pop_leaf(self.shift, last)
            .unwrap_or_else(Node::empty_branch);
        let mut shift = self.shift;
        while shift > BITS_PER_LEVEL {
            let only = match &root {
                Node::Branch(children) if children.len() == 1 => children[0].clone(),
                _ => break,
            };
            root = only;
            shift -= BITS_PER_LEVEL;
            tracing::trace!(shift, "tree collapsed");
        }

        Self {
            length: self.length - 1,
            shift,
            root,
            tail,
        }
    }

    /// Returns a new array with the element at `index` removed.
    ///
    /// Elements after the normalized position move one place left.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBoundsError`] unless `-len <= index < len`. An empty
    /// array has no valid index, so this always fails on one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// assert_eq!(array.remove_at(1).unwrap().to_vec(), vec![1, 3]);
    /// assert_eq!(array.remove_at(-2).unwrap().to_vec(), vec![1, 3]);
    /// assert!(PersistentArray::<i32>::new().remove_at(0).is_err());
    /// ```
    pub fn remove_at(&self, index: isize) -> Result<Self, OutOfBoundsError> {
        let position = normalize(index, self.len(), Bounds::Access)?;
        if position + 1 == self.len() {
            return Ok(self.remove());
        }
        let mut elements = self.to_vec();
        reindex::remove_at(&mut elements, position);
        Ok(Self::from_vec(elements))
    }

    /// Returns a new array with the element at `index` removed.
    ///
    /// # Panics
    ///
    /// Panics with `Index {index} is out of bounds for length {length}` when
    /// [`remove_at`](Self::remove_at) would fail.
    #[must_use]
    pub fn strict_remove_at(&self, index: isize) -> Self {
        match self.remove_at(index) {
            Ok(array) => array,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns every element in position order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array = PersistentArray::new().add('a').add('b');
    /// assert_eq!(array.to_vec(), vec!['a', 'b']);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut elements = Vec::with_capacity(self.length);
        elements.extend(self.iter().cloned());
        elements
    }

    /// Starts a builder seeded with this array's elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_array::persistent::PersistentArray;
    ///
    /// let array = PersistentArray::singleton(1).builder().add(2).add(3).build();
    /// assert_eq!(array.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn builder(&self) -> PersistentArrayBuilder<T> {
        PersistentArrayBuilder::from(self.clone())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// An in-progress [`PersistentArray`] that appends in place.
///
/// The builder owns a flat buffer, so every `add` is an amortized O(1) push,
/// and `build` packs it into chunks once. It is the [`Collector`] behind
/// `collect` and [`collect_into`].
///
/// # Examples
///
/// ```rust
/// use persistent_array::persistent::PersistentArray;
/// use persistent_array::typeclass::{Collecting, Collectable, Collector, Command};
///
/// let builder = PersistentArray::new().collector().element(1).element(2);
/// match builder.accept(Command::Done) {
///     Collecting::Finished(array) => assert_eq!(array.to_vec(), vec![1, 2]),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PersistentArrayBuilder<T> {
    elements: Vec<T>,
}

impl<T> PersistentArrayBuilder<T> {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Appends `element` after everything added so far.
    #[inline]
    #[must_use]
    pub fn add(mut self, element: T) -> Self {
        self.elements.push(element);
        self
    }

    /// Returns the number of elements added so far, including the seed.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if nothing has been added and the seed was empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Finishes the construction.
    #[inline]
    #[must_use]
    pub fn build(self) -> PersistentArray<T> {
        PersistentArray::from(self.elements)
    }
}

impl<T> Default for PersistentArrayBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> From<PersistentArray<T>> for PersistentArrayBuilder<T> {
    /// Moves the array's elements into the builder, copying only the chunks
    /// another version still shares.
    fn from(array: PersistentArray<T>) -> Self {
        Self {
            elements: array.into_iter().collect(),
        }
    }
}

impl<T> Collector for PersistentArrayBuilder<T> {
    type Item = T;
    type Output = PersistentArray<T>;

    #[inline]
    fn element(self, element: T) -> Self {
        self.add(element)
    }

    #[inline]
    fn done(self) -> PersistentArray<T> {
        self.build()
    }
}

impl<T: Clone> Collectable for PersistentArray<T> {
    type Item = T;
    type Collector = PersistentArrayBuilder<T>;

    #[inline]
    fn collector(self) -> PersistentArrayBuilder<T> {
        PersistentArrayBuilder::from(self)
    }
}

// =============================================================================
// Iterator Implementations
// =============================================================================

/// An iterator over references to elements of a [`PersistentArray`].
///
/// Walks one chunk at a time from either end, so a full traversal visits the
/// tree once per 32 elements.
#[derive(Debug, Clone)]
pub struct PersistentArrayIterator<'a, T> {
    array: &'a PersistentArray<T>,
    /// Next position to yield from the front
    front: usize,
    /// One past the next position to yield from the back
    back: usize,
    front_chunk: std::slice::Iter<'a, T>,
    back_chunk: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for PersistentArrayIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        if self.front_chunk.len() == 0 {
            let array = self.array;
            let (chunk, start) = array.chunk(self.front)?;
            self.front_chunk = chunk.get(self.front - start..)?.iter();
        }
        self.front += 1;
        self.front_chunk.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for PersistentArrayIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        if self.back_chunk.len() == 0 {
            let array = self.array;
            let (chunk, start) = array.chunk(self.back - 1)?;
            self.back_chunk = chunk.get(..self.back - start)?.iter();
        }
        self.back -= 1;
        self.back_chunk.next_back()
    }
}

impl<T> ExactSizeIterator for PersistentArrayIterator<'_, T> {}

impl<T> FusedIterator for PersistentArrayIterator<'_, T> {}

/// One chunk being drained by [`PersistentArrayIntoIterator`].
#[derive(Clone)]
enum Chunk<T> {
    /// Nobody else references the chunk; elements are moved out
    Owned(std::vec::IntoIter<T>),
    /// Another version still shares the chunk; elements are cloned out
    Shared {
        elements: ReferenceCounter<Vec<T>>,
        front: usize,
        back: usize,
    },
}

impl<T> Chunk<T> {
    fn new(elements: ReferenceCounter<Vec<T>>) -> Self {
        match ReferenceCounter::try_unwrap(elements) {
            Ok(elements) => Self::Owned(elements.into_iter()),
            Err(elements) => Self::Shared {
                front: 0,
                back: elements.len(),
                elements,
            },
        }
    }
}

impl<T: Clone> Chunk<T> {
    fn take_front(&mut self) -> Option<T> {
        match self {
            Self::Owned(elements) => elements.next(),
            Self::Shared {
                elements,
                front,
                back,
            } => {
                if *front >= *back {
                    return None;
                }
                *front += 1;
                elements.get(*front - 1).cloned()
            }
        }
    }

    fn take_back(&mut self) -> Option<T> {
        match self {
            Self::Owned(elements) => elements.next_back(),
            Self::Shared {
                elements,
                front,
                back,
            } => {
                if *front >= *back {
                    return None;
                }
                *back -= 1;
                elements.get(*back).cloned()
            }
        }
    }
}

/// An owning iterator over elements of a [`PersistentArray`].
///
/// It holds the array's chunks and remembers the next unvisited position,
/// which makes it the paused cursor of a suspended
/// [`Reducible::reduce_with`] traversal. Chunks the iterator owns outright
/// are drained by move; chunks still shared with another version are cloned
/// from element by element.
#[derive(Clone)]
pub struct PersistentArrayIntoIterator<T> {
    /// Chunks not yet opened, in position order
    chunks: VecDeque<ReferenceCounter<Vec<T>>>,
    front: Option<Chunk<T>>,
    back: Option<Chunk<T>>,
    /// Next position to yield from the front
    position: usize,
    /// Elements left between both ends
    remaining: usize,
}

impl<T> PersistentArrayIntoIterator<T> {
    fn new(array: PersistentArray<T>) -> Self {
        let remaining = array.length;
        let mut chunks = VecDeque::with_capacity(remaining.div_ceil(BRANCHING_FACTOR));
        if remaining > 0 {
            array.root.into_chunks(&mut chunks);
            chunks.push_back(array.tail);
        }
        Self {
            chunks,
            front: None,
            back: None,
            position: 0,
            remaining,
        }
    }

    /// Returns the position of the next element to be yielded from the front.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the elements not yet visited as a new array.
    #[must_use]
    pub fn remaining(&self) -> PersistentArray<T>
    where
        T: Clone,
    {
        PersistentArray::from(self.clone().collect::<Vec<T>>())
    }
}

impl<T: Clone> Iterator for PersistentArrayIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if let Some(element) = self.front.as_mut().and_then(Chunk::take_front) {
                self.position += 1;
                self.remaining -= 1;
                return Some(element);
            }
            match self.chunks.pop_front() {
                Some(elements) => self.front = Some(Chunk::new(elements)),
                None => {
                    let element = self.back.as_mut().and_then(Chunk::take_front)?;
                    self.position += 1;
                    self.remaining -= 1;
                    return Some(element);
                }
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for PersistentArrayIntoIterator<T> {
    fn next_back(&mut self) -> Option<T> {
        loop {
            if let Some(element) = self.back.as_mut().and_then(Chunk::take_back) {
                self.remaining -= 1;
                return Some(element);
            }
            match self.chunks.pop_back() {
                Some(elements) => self.back = Some(Chunk::new(elements)),
                None => {
                    let element = self.front.as_mut().and_then(Chunk::take_back)?;
                    self.remaining -= 1;
                    return Some(element);
                }
            }
        }
    }
}

impl<T: Clone> ExactSizeIterator for PersistentArrayIntoIterator<T> {}

impl<T: Clone> FusedIterator for PersistentArrayIntoIterator<T> {}

impl<T> fmt::Debug for PersistentArrayIntoIterator<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PersistentArrayIntoIterator")
            .field("position", &self.position)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentArray<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for PersistentArray<T> {
    #[inline]
    fn from(elements: Vec<T>) -> Self {
        Self::from_vec(elements)
    }
}

impl<T: Clone> FromIterator<T> for PersistentArray<T> {
    /// Builds the array by appending each element in iteration order.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        collect_into(iter.into_iter(), Self::new())
    }
}

impl<T: Clone> Extend<T> for PersistentArray<T> {
    /// Rebinds `self` to a new array with the elements appended.
    ///
    /// Other clones of the previous value are unaffected.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let seed = std::mem::take(self);
        *self = collect_into(iter.into_iter(), seed);
    }
}

impl<T: Clone> IntoIterator for PersistentArray<T> {
    type Item = T;
    type IntoIter = PersistentArrayIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentArrayIntoIterator::new(self)
    }
}

impl<'a, T> IntoIterator for &'a PersistentArray<T> {
    type Item = &'a T;
    type IntoIter = PersistentArrayIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<isize> for PersistentArray<T> {
    type Output = T;

    /// Same as [`PersistentArray::strict_get`].
    #[inline]
    fn index(&self, index: isize) -> &T {
        self.strict_get(index)
    }
}

impl<T: PartialEq> PartialEq for PersistentArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentArray<T> {}

impl<T: Hash> Hash for PersistentArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentArray<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentArray<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T: Clone> Reducible for PersistentArray<T> {
    type Item = T;
    type Cursor = PersistentArrayIntoIterator<T>;

    fn reduce_with<A, F>(self, initial: Step<A>, function: F) -> Reduction<A, Self::Cursor>
    where
        F: FnMut(A, T) -> Step<A>,
    {
        self.into_iter().reduce_with(initial, function)
    }

    #[inline]
    fn length(&self) -> usize
    where
        Self: Clone,
    {
        self.len()
    }

    /// Reads positions `start, start + step, ...` directly, without visiting
    /// the elements in between.
    fn slice(&self, start: usize, count: usize, step: NonZeroUsize) -> Vec<T>
    where
        Self: Clone,
    {
        let step = step.get();
        (0..count)
            .map_while(|term| {
                term.checked_mul(step)
                    .and_then(|offset| start.checked_add(offset))
            })
            .map_while(|position| self.element(position).cloned())
            .collect()
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentArray<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentArrayIntoIterator<String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentArray<i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
