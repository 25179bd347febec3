// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Element placement into uninitialized slots.

use core::mem;
use core::ptr;

use crate::error::ElementError;
use crate::relocate::{Relocate, TransferStrategy};

/// Tracks a run of slots initialized from `start` onward.
///
/// Until [`disarm`](Self::disarm) is called, dropping the guard drops every value
/// written so far. This is what unwinds a half-built destination block when a
/// copy fails or panics.
pub(crate) struct InitGuard<T> {
    start: *mut T,
    initialized: usize,
}

impl<T> InitGuard<T> {
    #[inline(always)]
    pub(crate) fn new(start: *mut T) -> Self {
        Self {
            start,
            initialized: 0,
        }
    }

    /// Writes `value` into the next slot of the run.
    ///
    /// # Safety
    ///
    /// The slot at `start + initialized` must be valid for writes and uninitialized.
    #[inline(always)]
    pub(crate) unsafe fn push(&mut self, value: T) {
        // SAFETY (PRECONDITIONS ARE MET): guaranteed by the caller.
        unsafe { ptr::write(self.start.add(self.initialized), value) };
        self.initialized += 1;
    }

    /// Marks `count` more slots as initialized by a bulk relocation.
    ///
    /// # Safety
    ///
    /// The `count` slots following the run must hold live values.
    #[inline(always)]
    unsafe fn assume_init(&mut self, count: usize) {
        self.initialized += count;
    }

    #[inline(always)]
    fn end(&self) -> *mut T {
        self.start.wrapping_add(self.initialized)
    }

    /// Hands ownership of the run to the caller and returns its length.
    #[inline(always)]
    pub(crate) fn disarm(self) -> usize {
        let initialized = self.initialized;
        mem::forget(self);
        initialized
    }
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY (PRECONDITIONS ARE MET): [start, start + initialized) were written by this guard.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.initialized));
        }
    }
}

/// Carries `count` live elements starting at `src` onto the end of `dst`.
///
/// With [`TransferStrategy::Move`] the source slots are logically uninitialized
/// afterwards and must not be dropped. With [`TransferStrategy::Copy`] they stay
/// live; on failure the copies made so far remain owned by `dst`, which drops them
/// unless it is disarmed.
///
/// # Safety
///
/// - `src..src + count` must hold live elements.
/// - `dst` must have `count` writable, uninitialized slots past its end that do not
///   overlap the source.
/// - A moved-from source must not be used again once this returns `Ok`.
pub(crate) unsafe fn transfer<T: Relocate>(
    strategy: TransferStrategy,
    src: *const T,
    count: usize,
    dst: &mut InitGuard<T>,
) -> Result<(), ElementError> {
    match strategy {
        TransferStrategy::Move => {
            // SAFETY (PRECONDITIONS ARE MET): non-overlapping regions guaranteed by the caller.
            unsafe {
                ptr::copy_nonoverlapping(src, dst.end(), count);
                dst.assume_init(count);
            }
        }
        TransferStrategy::Copy => {
            for i in 0..count {
                // SAFETY (PRECONDITIONS ARE MET): i < count, slot src + i is live.
                let copy = unsafe { (*src.add(i)).try_copy()? };
                // SAFETY (PRECONDITIONS ARE MET): dst has count free slots.
                unsafe { dst.push(copy) };
            }
        }
    }

    Ok(())
}
