// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use bastion_storage::StorageError;

use crate::{ArrayError, DynArray, ElementError};

use super::support::{Fragile, Probe, Tracked, values};

fn filled_fragile(probe: &Probe, len: i32) -> DynArray<Fragile> {
    let mut array = DynArray::new();
    for i in 0..len {
        array
            .push_back(probe.fragile(i))
            .expect("Failed to push_back(..)");
    }
    array
}

fn filled_tracked(probe: &Probe, len: i32) -> DynArray<Tracked> {
    let mut array = DynArray::new();
    for i in 0..len {
        array
            .push_back(probe.tracked(i))
            .expect("Failed to push_back(..)");
    }
    array
}

// =============================================================================
// Growth policy
// =============================================================================

#[test]
fn test_capacity_doubles_with_floor_of_len_plus_one() -> Result<(), ArrayError> {
    let mut array = DynArray::new();
    let mut observed = Vec::new();

    for i in 0..9u8 {
        array.push_back(i)?;
        observed.push(array.capacity());
    }

    assert_eq!(observed, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    Ok(())
}

#[test]
fn test_growth_after_reserve_doubles_reserved_capacity() -> Result<(), ArrayError> {
    let mut array = DynArray::new();
    array.reserve(3)?;
    for i in 0..4 {
        array.push_back(i)?;
    }

    assert_eq!(array.capacity(), 6);
    Ok(())
}

// =============================================================================
// reserve()
// =============================================================================

#[test]
fn test_reserve_smaller_or_equal_is_noop() -> Result<(), ArrayError> {
    let mut array = DynArray::new();
    for i in 0..4 {
        array.push_back(i)?;
    }
    let ptr = array.as_ptr();
    let capacity = array.capacity();

    array.reserve(0)?;
    array.reserve(capacity)?;

    assert_eq!(array.capacity(), capacity);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(array, [0, 1, 2, 3]);
    Ok(())
}

#[test]
fn test_reserve_is_exact_and_preserves_values() -> Result<(), ArrayError> {
    let mut array = DynArray::new();
    for word in ["alpha", "beta", "gamma"] {
        array.push_back(String::from(word))?;
    }

    array.reserve(100)?;

    assert_eq!(array.capacity(), 100);
    assert_eq!(array, ["alpha", "beta", "gamma"]);
    Ok(())
}

#[test]
fn test_reserve_on_empty_array() -> Result<(), ArrayError> {
    let mut array: DynArray<u64> = DynArray::new();

    array.reserve(5)?;

    assert!(array.is_empty());
    assert_eq!(array.capacity(), 5);
    Ok(())
}

#[test]
fn test_reserve_overflow_is_reported() {
    let mut array: DynArray<u64> = DynArray::new();

    let result = array.reserve(usize::MAX);

    assert!(matches!(
        result,
        Err(ArrayError::Storage(StorageError::CapacityOverflow))
    ));
    assert_eq!(array.capacity(), 0);
}

// =============================================================================
// Transfer strategy
// =============================================================================

#[test]
fn test_move_path_never_copies_or_drops() {
    let probe = Probe::new();
    let array = filled_tracked(&probe, 9);

    assert_eq!(probe.copies(), 0);
    assert_eq!(probe.drops(), 0);
    assert_eq!(values(&array), [0, 1, 2, 3, 4, 5, 6, 7, 8]);

    drop(array);
    assert_eq!(probe.drops(), 9);
}

#[test]
fn test_copy_path_copies_then_destroys_originals() {
    let probe = Probe::new();

    // Growth 0 -> 1 -> 2 -> 4: 0 + 1 + 2 elements carried over.
    let array = filled_fragile(&probe, 4);

    assert_eq!(probe.copies(), 3);
    assert_eq!(probe.drops(), 3);
    assert_eq!(values(&array), [0, 1, 2, 3]);

    drop(array);
    assert_eq!(probe.drops(), 7);
}

#[test]
fn test_copy_path_reserve_copies_each_element_once() -> Result<(), ArrayError> {
    let probe = Probe::new();
    let mut array = filled_fragile(&probe, 4);
    let copies = probe.copies();

    array.reserve(64)?;

    assert_eq!(probe.copies() - copies, 4);
    assert_eq!(values(&array), [0, 1, 2, 3]);
    Ok(())
}

// =============================================================================
// Strong guarantee on the copy path
// =============================================================================

#[test]
fn test_reserve_copy_failure_leaves_array_unchanged() {
    let probe = Probe::new();
    let mut array = filled_fragile(&probe, 4);
    let ptr = array.as_ptr();
    let drops = probe.drops();

    probe.fail_copies_after(1);
    let result = array.reserve(10);

    assert!(matches!(
        result,
        Err(ArrayError::Element(ElementError::Failed(_)))
    ));
    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(values(&array), [0, 1, 2, 3]);
    // Only the single completed copy was destroyed.
    assert_eq!(probe.drops() - drops, 1);
}

#[test]
fn test_push_back_copy_failure_leaves_array_unchanged() {
    let probe = Probe::new();
    let mut array = filled_fragile(&probe, 4);
    let ptr = array.as_ptr();
    let drops = probe.drops();

    probe.fail_copies_after(2);
    let result = array.push_back(probe.fragile(99));

    assert!(matches!(result, Err(ArrayError::Element(_))));
    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(values(&array), [0, 1, 2, 3]);
    // Two completed copies plus the pending element.
    assert_eq!(probe.drops() - drops, 3);

    probe.allow_all_copies();
    array
        .push_back(probe.fragile(99))
        .expect("Failed to push_back(..)");
    assert_eq!(values(&array), [0, 1, 2, 3, 99]);
}

#[test]
fn test_constructor_failure_during_growth_leaves_array_unchanged() {
    let probe = Probe::new();
    let mut array = filled_tracked(&probe, 4);
    let ptr = array.as_ptr();

    let result = array.try_emplace_back_with(|| Err::<Tracked, _>("constructor failed"));

    assert!(matches!(result, Err(ArrayError::Element(_))));
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(values(&array), [0, 1, 2, 3]);
    assert_eq!(probe.drops(), 0);
}

#[test]
fn test_constructor_runs_before_transfer() {
    let probe = Probe::new();
    let mut array = filled_fragile(&probe, 2);
    let copies = probe.copies();

    let observed = std::cell::Cell::new(usize::MAX);
    array
        .emplace_back_with(|| {
            observed.set(probe.copies());
            probe.fragile(2)
        })
        .expect("Failed to emplace_back_with(..)");

    // No element had been copied yet when the constructor ran.
    assert_eq!(observed.get(), copies);
    assert_eq!(probe.copies() - copies, 2);
    assert_eq!(values(&array), [0, 1, 2]);
}

#[test]
fn test_constructor_panic_during_growth_keeps_array_valid() {
    let probe = Probe::new();
    let mut array = filled_tracked(&probe, 2);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = array.emplace_back_with(|| -> Tracked { panic!("constructor panicked") });
    }));

    assert!(result.is_err());
    assert_eq!(array.capacity(), 2);
    assert_eq!(values(&array), [0, 1]);
}

// =============================================================================
// Allocation failure
// =============================================================================

#[test]
fn test_allocation_failure_is_propagated() {
    let probe = Probe::new();
    let mut array = filled_tracked(&probe, 2);
    let ptr = array.as_ptr();

    array.change_behaviour(crate::ArrayBehaviour::FailAtAllocate);
    let result = array.push_back(probe.tracked(2));

    assert!(matches!(
        result,
        Err(ArrayError::Storage(StorageError::AllocationFailed { .. }))
    ));
    assert_eq!(array.capacity(), 2);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(values(&array), [0, 1]);
    // The rejected value was dropped, nothing else.
    assert_eq!(probe.drops(), 1);
}

#[test]
fn test_spare_capacity_needs_no_allocation() -> Result<(), ArrayError> {
    let mut array = DynArray::with_capacity(2)?;
    array.change_behaviour(crate::ArrayBehaviour::FailAtAllocate);

    array.push_back(1u8)?;
    array.push_back(2u8)?;

    assert!(array.push_back(3u8).is_err());
    assert_eq!(array, [1, 2]);
    Ok(())
}
