//! Position shifting for insertion and removal away from the tail.
//!
//! The array's chunks are laid out as one contiguous buffer before shifting,
//! so re-indexing only touches the suffix that starts at the pivot;
//! everything in front of it keeps its position.

/// Which way the suffix moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    /// Every position `k >= pivot` becomes `k + 1`. The element parked in the
    /// last slot lands at `pivot`.
    Right,
    /// Every position `k > pivot` becomes `k - 1`. The element at `pivot`
    /// ends up in the last slot, ready to be truncated.
    Left,
}

/// Rotates `elements[pivot..]` by one slot in `direction`.
///
/// Insertion pushes the new element onto the tail and shifts right; removal
/// shifts left and then pops the tail.
pub(crate) fn shift_after<T>(elements: &mut [T], pivot: usize, direction: Direction) {
    let Some(suffix) = elements.get_mut(pivot..).filter(|suffix| suffix.len() > 1) else {
        return;
    };
    tracing::trace!(pivot, ?direction, moved = suffix.len(), "shifting positions");

    match direction {
        Direction::Right => suffix.rotate_right(1),
        Direction::Left => suffix.rotate_left(1),
    }
}

/// Inserts `element` at `position`, shifting the following elements right.
pub(crate) fn insert_at<T>(elements: &mut Vec<T>, position: usize, element: T) {
    elements.push(element);
    shift_after(elements, position, Direction::Right);
}

/// Removes the element at `position`, shifting the following elements left.
///
/// Returns `None` if `position` is not occupied.
pub(crate) fn remove_at<T>(elements: &mut Vec<T>, position: usize) -> Option<T> {
    if position >= elements.len() {
        return None;
    }
    shift_after(elements, position, Direction::Left);
    elements.pop()
}
