// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt;
use core::iter::FusedIterator;
use core::ptr;
use core::slice;

use bastion_storage::RawStorage;

use crate::dyn_array::DynArray;

/// An owning iterator over the elements of a [`DynArray`].
///
/// Elements not yet yielded are dropped with the iterator, then the storage is
/// released.
pub struct IntoIter<T> {
    storage: RawStorage<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Returns the elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY (PRECONDITIONS ARE MET): [start, end) are live.
        unsafe {
            slice::from_raw_parts(
                self.storage.element_address(self.start),
                self.end - self.start,
            )
        }
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let (storage, len) = self.into_raw_parts();

        IntoIter {
            storage,
            start: 0,
            end: len,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        // SAFETY (PRECONDITIONS ARE MET): start < end, the slot is live and leaves the live range.
        let item = unsafe { ptr::read(self.storage.element_address(self.start)) };
        self.start += 1;

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;
        // SAFETY (PRECONDITIONS ARE MET): the slot at end was live and leaves the live range.
        Some(unsafe { ptr::read(self.storage.element_address(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = ptr::slice_from_raw_parts_mut(
            self.storage.element_address_mut(self.start),
            self.end - self.start,
        );

        // SAFETY (PRECONDITIONS ARE MET): [start, end) are the elements not yet yielded.
        unsafe { ptr::drop_in_place(remaining) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
