#![cfg(feature = "persistent")]
//! Unit tests for PersistentArray.
//!
//! Organized by operation: construction, access, update, insertion, removal.

use persistent_array::persistent::{OutOfBoundsError, PersistentArray};
use rstest::{fixture, rstest};
use std::cell::Cell;
use std::panic::{AssertUnwindSafe, catch_unwind};

#[fixture]
fn one_two_three() -> PersistentArray<i32> {
    PersistentArray::from(vec![1, 2, 3])
}

fn panic_message<R>(function: impl FnOnce() -> R) -> String {
    let payload = match catch_unwind(AssertUnwindSafe(function)) {
        Ok(_) => panic!("expected a panic"),
        Err(payload) => payload,
    };
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|message| (*message).to_string()))
        .unwrap_or_default()
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_new_creates_empty_array() {
    let array: PersistentArray<i32> = PersistentArray::new();
    assert!(array.is_empty());
    assert_eq!(array.len(), 0);
    assert_eq!(array.to_vec(), Vec::<i32>::new());
}

#[rstest]
fn test_collect_preserves_order() {
    let array: PersistentArray<&str> = ["a", "b", "c"].into_iter().collect();
    assert_eq!(array.to_vec(), vec!["a", "b", "c"]);
}

#[rstest]
fn test_from_slice_and_from_vec_agree() {
    assert_eq!(
        PersistentArray::from_slice(&[1, 2, 3]),
        PersistentArray::from(vec![1, 2, 3])
    );
}

#[rstest]
fn test_default_is_empty() {
    assert_eq!(PersistentArray::<i32>::default(), PersistentArray::new());
}

#[rstest]
fn test_extend_leaves_previous_clone_unchanged(one_two_three: PersistentArray<i32>) {
    let previous = one_two_three.clone();
    let mut extended = one_two_three;
    extended.extend([4, 5]);
    assert_eq!(extended.to_vec(), vec![1, 2, 3, 4, 5]);
    assert_eq!(previous.to_vec(), vec![1, 2, 3]);
}

// =============================================================================
// get
// =============================================================================

#[rstest]
#[case(0, 1)]
#[case(2, 3)]
#[case(-1, 3)]
#[case(-3, 1)]
fn test_get_valid_index(one_two_three: PersistentArray<i32>, #[case] index: isize, #[case] expected: i32) {
    assert_eq!(one_two_three.get(index), Ok(&expected));
}

#[rstest]
#[case(3)]
#[case(100)]
#[case(-4)]
fn test_get_out_of_bounds(one_two_three: PersistentArray<i32>, #[case] index: isize) {
    assert_eq!(one_two_three.get(index), Err(OutOfBoundsError::new(index, 3)));
}

#[rstest]
fn test_get_on_empty_fails() {
    let array: PersistentArray<i32> = PersistentArray::new();
    assert!(array.get(0).is_err());
    assert!(array.get(-1).is_err());
}

#[rstest]
fn test_strict_get_panic_message(one_two_three: PersistentArray<i32>) {
    let message = panic_message(|| *one_two_three.strict_get(3));
    assert_eq!(message, "Index 3 is out of bounds for length 3");
}

#[rstest]
fn test_strict_get_reports_original_negative_index(one_two_three: PersistentArray<i32>) {
    let message = panic_message(|| *one_two_three.strict_get(-5));
    assert_eq!(message, "Index -5 is out of bounds for length 3");
}

#[rstest]
fn test_index_operator(one_two_three: PersistentArray<i32>) {
    assert_eq!(one_two_three[0], 1);
    assert_eq!(one_two_three[-1], 3);
}

#[rstest]
fn test_first_and_last(one_two_three: PersistentArray<i32>) {
    assert_eq!(one_two_three.first(), Some(&1));
    assert_eq!(one_two_three.last(), Some(&3));
    assert_eq!(PersistentArray::<i32>::new().last(), None);
}

// =============================================================================
// set
// =============================================================================

#[rstest]
#[case(0, vec![9, 2, 3])]
#[case(-1, vec![1, 2, 9])]
#[case(-2, vec![1, 9, 3])]
fn test_set_replaces_element(
    one_two_three: PersistentArray<i32>,
    #[case] index: isize,
    #[case] expected: Vec<i32>,
) {
    let updated = one_two_three.set(index, 9).unwrap();
    assert_eq!(updated.to_vec(), expected);
    assert_eq!(updated.len(), 3);
    assert_eq!(one_two_three.to_vec(), vec![1, 2, 3]);
}

#[rstest]
fn test_set_out_of_bounds(one_two_three: PersistentArray<i32>) {
    assert_eq!(one_two_three.set(3, 9), Err(OutOfBoundsError::new(3, 3)));
}

#[rstest]
fn test_strict_set_panic_message(one_two_three: PersistentArray<i32>) {
    let message = panic_message(|| one_two_three.strict_set(-4, 0));
    assert_eq!(message, "Index -4 is out of bounds for length 3");
}

// =============================================================================
// add / add_at
// =============================================================================

#[rstest]
fn test_add_appends(one_two_three: PersistentArray<i32>) {
    let extended = one_two_three.add(4);
    assert_eq!(extended.to_vec(), vec![1, 2, 3, 4]);
    assert_eq!(one_two_three.len(), 3);
}

#[rstest]
#[case(1)]
#[case(-2)]
fn test_add_at_inserts_and_shifts(one_two_three: PersistentArray<i32>, #[case] index: isize) {
    let inserted = one_two_three.add_at(index, 4).unwrap();
    assert_eq!(inserted.to_vec(), vec![1, 4, 2, 3]);
    assert_eq!(one_two_three.to_vec(), vec![1, 2, 3]);
}

#[rstest]
fn test_add_at_front(one_two_three: PersistentArray<i32>) {
    assert_eq!(one_two_three.add_at(0, 0).unwrap().to_vec(), vec![0, 1, 2, 3]);
    assert_eq!(one_two_three.add_at(-3, 0).unwrap().to_vec(), vec![0, 1, 2, 3]);
}

#[rstest]
fn test_add_at_length_appends(one_two_three: PersistentArray<i32>) {
    assert_eq!(one_two_three.add_at(3, 4).unwrap(), one_two_three.add(4));
}

#[rstest]
#[case(4)]
#[case(-4)]
fn test_add_at_out_of_bounds(one_two_three: PersistentArray<i32>, #[case] index: isize) {
    assert_eq!(one_two_three.add_at(index, 4), Err(OutOfBoundsError::new(index, 3)));
}

#[rstest]
fn test_add_at_zero_on_empty() {
    let array = PersistentArray::new().add_at(0, 'x').unwrap();
    assert_eq!(array.to_vec(), vec!['x']);
}

#[rstest]
fn test_strict_add_at_panic_message(one_two_three: PersistentArray<i32>) {
    let message = panic_message(|| one_two_three.strict_add_at(4, 4));
    assert_eq!(message, "Index 4 is out of bounds for length 3");
}

// =============================================================================
// remove / remove_at
// =============================================================================

#[rstest]
fn test_remove_drops_last(one_two_three: PersistentArray<i32>) {
    assert_eq!(one_two_three.remove().to_vec(), vec![1, 2]);
    assert_eq!(one_two_three.len(), 3);
}

#[rstest]
fn test_remove_on_empty_is_noop() {
    let empty: PersistentArray<i32> = PersistentArray::new();
    assert_eq!(empty.remove(), PersistentArray::new());
    assert!(empty.remove().remove().is_empty());
}

#[rstest]
#[case(1, vec![1, 3])]
#[case(-2, vec![1, 3])]
#[case(0, vec![2, 3])]
#[case(2, vec![1, 2])]
#[case(-1, vec![1, 2])]
fn test_remove_at(one_two_three: PersistentArray<i32>, #[case] index: isize, #[case] expected: Vec<i32>) {
    assert_eq!(one_two_three.remove_at(index).unwrap().to_vec(), expected);
    assert_eq!(one_two_three.to_vec(), vec![1, 2, 3]);
}

#[rstest]
fn test_remove_at_on_empty_fails() {
    let empty: PersistentArray<i32> = PersistentArray::new();
    assert_eq!(empty.remove_at(0), Err(OutOfBoundsError::new(0, 0)));
}

#[rstest]
fn test_remove_at_out_of_bounds(one_two_three: PersistentArray<i32>) {
    assert!(one_two_three.remove_at(3).is_err());
    assert!(one_two_three.remove_at(-4).is_err());
}

#[rstest]
fn test_strict_remove_at_panic_message() {
    let empty: PersistentArray<i32> = PersistentArray::new();
    let message = panic_message(|| empty.strict_remove_at(0));
    assert_eq!(message, "Index 0 is out of bounds for length 0");
}

// =============================================================================
// Boundary asymmetry
// =============================================================================

#[rstest]
fn test_length_is_readable_only_for_insertion(one_two_three: PersistentArray<i32>) {
    let length = isize::try_from(one_two_three.len()).unwrap();
    assert!(one_two_three.get(length).is_err());
    assert!(one_two_three.add_at(length, 4).is_ok());
}

// =============================================================================
// Derived operations and std traits
// =============================================================================

#[rstest]
fn test_map_builds_new_array(one_two_three: PersistentArray<i32>) {
    let doubled = one_two_three.map(|value| value * 2);
    assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
}

#[rstest]
fn test_iter_is_exact_and_reversible(one_two_three: PersistentArray<i32>) {
    let iterator = one_two_three.iter();
    assert_eq!(iterator.len(), 3);
    assert_eq!(iterator.rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
}

#[rstest]
fn test_equal_arrays_hash_equally() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(PersistentArray::from(vec![1, 2]));
    assert!(set.contains(&PersistentArray::new().add(1).add(2)));
    assert!(!set.contains(&PersistentArray::from(vec![2, 1])));
}

#[rstest]
fn test_long_chain_of_insertions() {
    let mut array = PersistentArray::new();
    for value in 0..200 {
        array = array.add_at(0, value).unwrap();
    }
    let expected: Vec<i32> = (0..200).rev().collect();
    assert_eq!(array.to_vec(), expected);
}

#[rstest]
fn test_clone_of_nan_array_is_not_equal() {
    let array = PersistentArray::singleton(f64::NAN);
    assert_ne!(array, array.clone());
    assert_eq!(array.to_vec() == array.clone().to_vec(), array == array.clone());
}

// =============================================================================
// Element copies made by tail operations and owning iteration
// =============================================================================

thread_local! {
    static CLONES: Cell<usize> = const { Cell::new(0) };
}

/// An element that records how often it is cloned on the current thread.
#[derive(Debug, PartialEq, Eq)]
struct Counted(usize);

impl Clone for Counted {
    fn clone(&self) -> Self {
        CLONES.with(|clones| clones.set(clones.get() + 1));
        Self(self.0)
    }
}

/// Returns the number of `Counted` clones `function` made.
fn clones_during<R>(function: impl FnOnce() -> R) -> (R, usize) {
    CLONES.with(|clones| clones.set(0));
    let result = function();
    (result, CLONES.with(Cell::get))
}

fn counted(length: usize) -> PersistentArray<Counted> {
    (0..length).map(Counted).collect()
}

#[rstest]
#[case(10_000)]
#[case(10_016)]
#[case(10_024)]
fn test_add_copies_at_most_one_chunk(#[case] length: usize) {
    let array = counted(length);
    let (extended, clones) = clones_during(|| array.add(Counted(length)));
    assert!(clones <= 32, "add cloned {clones} elements");
    assert_eq!(extended.len(), length + 1);
    assert_eq!(extended.last(), Some(&Counted(length)));
}

#[rstest]
#[case(10_000)]
#[case(10_017)]
fn test_remove_copies_at_most_one_chunk(#[case] length: usize) {
    let array = counted(length);
    let (shrunk, clones) = clones_during(|| array.remove());
    assert!(clones <= 32, "remove cloned {clones} elements");
    assert_eq!(shrunk.len(), length - 1);
    assert_eq!(shrunk.last(), Some(&Counted(length - 2)));
}

#[rstest]
fn test_add_chain_is_not_quadratic() {
    let length = 5000;
    let (array, clones) = clones_during(|| {
        let mut array = PersistentArray::new();
        for value in 0..length {
            array = array.add(Counted(value));
        }
        array
    });
    assert!(clones <= length * 32, "{length} adds cloned {clones} elements");
    assert_eq!(array.to_vec(), (0..length).map(Counted).collect::<Vec<_>>());

    let (emptied, clones) = clones_during(|| {
        let mut array = array.clone();
        while !array.is_empty() {
            array = array.remove();
        }
        array
    });
    assert!(clones <= length * 32, "{length} removes cloned {clones} elements");
    assert!(emptied.is_empty());
    assert_eq!(array.len(), length);
}

#[rstest]
fn test_into_iter_moves_uniquely_owned_elements() {
    let array = counted(100);
    let (drained, clones) = clones_during(|| array.into_iter().collect::<Vec<_>>());
    assert_eq!(clones, 0);
    assert_eq!(drained, (0..100).map(Counted).collect::<Vec<_>>());
}

#[rstest]
fn test_into_iter_clones_shared_elements() {
    let array = counted(100);
    let kept = array.clone();
    let (drained, clones) = clones_during(|| array.into_iter().rev().collect::<Vec<_>>());
    assert_eq!(clones, 100);
    assert_eq!(drained, (0..100).rev().map(Counted).collect::<Vec<_>>());
    assert_eq!(kept.len(), 100);
}

#[rstest]
fn test_into_iter_moves_chunks_no_longer_shared() {
    let array = counted(100);
    let extended = array.add(Counted(100));
    drop(array);
    let (drained, clones) = clones_during(|| extended.into_iter().collect::<Vec<_>>());
    assert_eq!(clones, 0);
    assert_eq!(drained.len(), 101);
}
