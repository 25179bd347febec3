// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::alloc::{Layout, alloc, dealloc};
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use crate::error::StorageError;

/// An owned block of uninitialized memory with room for `capacity` values of `T`.
///
/// `RawStorage` never reads, writes or drops elements. Callers place values with
/// raw pointer writes through [`element_address_mut`](Self::element_address_mut)
/// and are responsible for dropping them before the block is released.
///
/// # Example
///
/// ```rust
/// use bastion_storage::RawStorage;
///
/// let mut a = RawStorage::<u32>::allocate(8).unwrap();
/// let mut b = RawStorage::<u32>::new();
///
/// a.swap(&mut b);
/// assert_eq!(a.capacity(), 0);
/// assert_eq!(b.capacity(), 8);
///
/// let c = b.take();
/// assert!(b.is_empty());
/// assert_eq!(c.capacity(), 8);
/// ```
pub struct RawStorage<T> {
    buffer: Option<NonNull<T>>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawStorage uniquely owns its block; sending it sends the slots it may hold.
unsafe impl<T: Send> Send for RawStorage<T> {}
// SAFETY: shared access only yields addresses, never references into the block.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    /// Creates an empty storage with no block and zero capacity.
    pub const fn new() -> Self {
        Self {
            buffer: None,
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Acquires an uninitialized block sized for `capacity` elements of `T`.
    ///
    /// A zero `capacity` yields an empty storage without calling the allocator.
    /// Zero-sized `T` gets a dangling, well-aligned block that is never freed.
    ///
    /// # Errors
    ///
    /// - [`StorageError::CapacityOverflow`] if the block size overflows a layout.
    /// - [`StorageError::AllocationFailed`] if the allocator returns null.
    pub fn allocate(capacity: usize) -> Result<Self, StorageError> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Self::layout_for(capacity)?;

        let buffer = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: layout has a non-zero size.
            let ptr = unsafe { alloc(layout) };

            NonNull::new(ptr.cast::<T>()).ok_or(StorageError::AllocationFailed {
                size: layout.size(),
                align: layout.align(),
            })?
        };

        Ok(Self {
            buffer: Some(buffer),
            capacity,
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    fn layout_for(capacity: usize) -> Result<Layout, StorageError> {
        Layout::array::<T>(capacity).map_err(|_| StorageError::CapacityOverflow)
    }

    /// Returns the number of element slots in the block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if no block is owned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }

    /// Returns the base address of the block.
    ///
    /// For an empty storage this is a dangling, well-aligned address, so it can
    /// back a zero-length slice but must never be dereferenced.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.unwrap_or(NonNull::dangling()).as_ptr()
    }

    /// Returns the mutable base address of the block.
    ///
    /// See [`as_ptr`](Self::as_ptr) for the empty case.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.unwrap_or(NonNull::dangling()).as_ptr()
    }

    /// Returns the address of the slot at `offset`.
    ///
    /// `offset` may range over `[0, capacity]`; the one-past-end address is
    /// allowed for cursor arithmetic and must never be dereferenced.
    ///
    /// Requesting `offset > capacity` is a contract violation, checked in debug
    /// builds only.
    #[inline]
    pub fn element_address(&self, offset: usize) -> *const T {
        debug_assert!(
            offset <= self.capacity,
            "offset (is {offset}) should be <= capacity (is {})",
            self.capacity
        );

        self.as_ptr().wrapping_add(offset)
    }

    /// Returns the mutable address of the slot at `offset`.
    ///
    /// Same contract as [`element_address`](Self::element_address).
    #[inline]
    pub fn element_address_mut(&mut self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "offset (is {offset}) should be <= capacity (is {})",
            self.capacity
        );

        self.as_mut_ptr().wrapping_add(offset)
    }

    /// Exchanges blocks and capacities with `other`. No allocation takes place.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buffer, &mut other.buffer);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Moves the block out, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        let Some(buffer) = self.buffer.take() else {
            return;
        };

        // The layout was validated when the block was acquired.
        if let Ok(layout) = Self::layout_for(self.capacity) {
            if layout.size() != 0 {
                // SAFETY: buffer was returned by `alloc` with exactly this layout.
                unsafe { dealloc(buffer.as_ptr().cast::<u8>(), layout) };
            }
        }
    }
}

impl<T> fmt::Debug for RawStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("capacity", &self.capacity)
            .field("allocated", &self.buffer.is_some())
            .finish_non_exhaustive()
    }
}
