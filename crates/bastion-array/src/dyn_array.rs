// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr;
use core::slice;

use bastion_storage::{RawStorage, StorageError};

#[cfg(any(test, feature = "test-utils"))]
use crate::behaviour::ArrayBehaviour;
use crate::error::{ArrayError, ElementError};
use crate::relocate::{Relocate, TransferStrategy};
use crate::transfer::{self, InitGuard};

/// A growable, contiguous array owning a [`RawStorage<T>`] and its live elements.
///
/// Slots `[0, len)` hold live values, slots `[len, capacity)` are uninitialized.
/// Capacity grows through [`reserve`](Self::reserve) or implicitly on insertion,
/// and never shrinks.
///
/// # Growth
///
/// When an insertion finds no spare slot, the array:
/// 1. Allocates a block of `max(2 * capacity, len + 1)` slots
/// 2. Builds the new element at its final position in that block
/// 3. Transfers the live elements around it ([`TransferStrategy::of`])
/// 4. Destroys the old elements (copy path only) and adopts the new block
///
/// A failure at step 1, 2 or during a copying step 3 leaves the array exactly as
/// it was.
///
/// # Example
///
/// ```rust
/// use bastion_array::{ArrayError, DynArray};
///
/// fn example() -> Result<(), ArrayError> {
///     let mut array = DynArray::new();
///
///     for i in 0..5 {
///         array.push_back(i)?;
///     }
///
///     assert_eq!(array.len(), 5);
///     assert_eq!(array.capacity(), 8);
///     assert_eq!(array[4], 4);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct DynArray<T> {
    storage: RawStorage<T>,
    len: usize,
    #[cfg(any(test, feature = "test-utils"))]
    behaviour: ArrayBehaviour,
}

impl<T> DynArray<T> {
    /// Creates an empty array. No memory is allocated.
    pub const fn new() -> Self {
        Self::from_parts(RawStorage::new(), 0)
    }

    const fn from_parts(storage: RawStorage<T>, len: usize) -> Self {
        Self {
            storage,
            len,
            #[cfg(any(test, feature = "test-utils"))]
            behaviour: ArrayBehaviour::None,
        }
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Storage`] if the block cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Ok(Self::from_parts(RawStorage::allocate(capacity)?, 0))
    }

    /// Creates an array of `len` default-constructed elements with capacity `len`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bastion_array::DynArray;
    ///
    /// let array = DynArray::<String>::with_len(3).unwrap();
    /// assert_eq!(array.len(), 3);
    /// assert!(array.iter().all(String::is_empty));
    /// ```
    pub fn with_len(len: usize) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        let mut array = Self::with_capacity(len)?;
        array.fill_default(len);
        Ok(array)
    }

    /// Creates an array holding copies of every element of `src`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Element`] if copying any element fails; the copies
    /// made so far are dropped.
    pub fn try_from_slice(src: &[T]) -> Result<Self, ArrayError>
    where
        T: Relocate,
    {
        Self::new().build_copy(src, T::try_copy)
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of element slots in the owned storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns a slice over the live elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY (PRECONDITIONS ARE MET): [0, len) are live and the base pointer is aligned and non-null.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// Returns a mutable slice over the live elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY (PRECONDITIONS ARE MET): [0, len) are live and uniquely borrowed through self.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Returns the address of the first slot (the `begin` cursor).
    ///
    /// Together with `as_ptr().wrapping_add(len())` this brackets the live range.
    /// Cursors are invalidated by any reallocation, and by insertions or removals
    /// at or before their position.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Returns the mutable address of the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Changes the failure-injection behaviour of this array.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn change_behaviour(&mut self, behaviour: ArrayBehaviour) {
        self.behaviour = behaviour;
    }

    fn allocate_storage(&self, capacity: usize) -> Result<RawStorage<T>, ArrayError> {
        #[cfg(any(test, feature = "test-utils"))]
        if matches!(self.behaviour, ArrayBehaviour::FailAtAllocate) && capacity > 0 {
            return Err(StorageError::AllocationFailed {
                size: capacity.saturating_mul(mem::size_of::<T>()),
                align: mem::align_of::<T>(),
            }
            .into());
        }

        Ok(RawStorage::allocate(capacity)?)
    }

    /// Capacity for the next growth step: `max(2 * capacity, len + 1)`.
    fn grown_capacity(&self) -> Result<usize, ArrayError> {
        let doubled = self
            .capacity()
            .checked_mul(2)
            .ok_or(StorageError::CapacityOverflow)?;
        let required = self
            .len
            .checked_add(1)
            .ok_or(StorageError::CapacityOverflow)?;

        Ok(doubled.max(required))
    }

    /// Ensures room for at least `capacity` elements in total.
    ///
    /// Does nothing if `capacity <= self.capacity()`: capacity and element
    /// addresses are left unchanged. Otherwise the live elements are transferred
    /// into a block of exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// - [`ArrayError::Storage`] if the new block cannot be allocated.
    /// - [`ArrayError::Element`] if a copying transfer fails.
    ///
    /// In both cases the array is unchanged.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), ArrayError>
    where
        T: Relocate,
    {
        if capacity <= self.capacity() {
            return Ok(());
        }

        self.rebuild::<fn() -> Result<T, ArrayError>>(capacity, None)
    }

    /// Moves the live elements into a fresh block of `new_capacity` slots.
    ///
    /// With `insertion = Some((index, make))` the block also receives the value
    /// produced by `make` at `index`. That value is built before any element is
    /// transferred; the prefix `[0, index)` and suffix `[index, len)` are then
    /// carried around it.
    #[cold]
    #[inline(never)]
    fn rebuild<F>(
        &mut self,
        new_capacity: usize,
        insertion: Option<(usize, F)>,
    ) -> Result<(), ArrayError>
    where
        T: Relocate,
        F: FnOnce() -> Result<T, ArrayError>,
    {
        debug_assert!(new_capacity > self.capacity());

        let strategy = TransferStrategy::of::<T>();
        let mut new_storage = self.allocate_storage(new_capacity)?;
        let base = new_storage.as_mut_ptr();

        let (gap, inserted) = match insertion {
            Some((index, make)) => {
                let value = make()?;
                let mut slot = InitGuard::new(base.wrapping_add(index));
                // SAFETY (PRECONDITIONS ARE MET): index <= len < new_capacity, the slot is fresh.
                unsafe { slot.push(value) };
                (index, Some(slot))
            }
            None => (self.len, None),
        };
        let shift = usize::from(inserted.is_some());
        let old = self.storage.as_ptr();

        let mut prefix = InitGuard::new(base);
        let mut suffix = InitGuard::new(base.wrapping_add(gap + shift));

        // SAFETY (PRECONDITIONS ARE MET): [0, len) are live in the old block; the new block has
        // room for len + shift elements and does not overlap the old one. On error the guards
        // drop the copies and the new element, then new_storage is freed.
        unsafe {
            transfer::transfer(strategy, old, gap, &mut prefix)?;
            transfer::transfer(strategy, old.add(gap), self.len - gap, &mut suffix)?;
        }

        prefix.disarm();
        suffix.disarm();
        if let Some(slot) = inserted {
            slot.disarm();
        }

        let old_len = self.len;
        let mut old_storage = mem::replace(&mut self.storage, new_storage);
        self.len = old_len + shift;

        if strategy == TransferStrategy::Copy {
            // SAFETY (PRECONDITIONS ARE MET): the originals are still live and no longer reachable.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    old_storage.as_mut_ptr(),
                    old_len,
                ));
            }
        }

        Ok(())
    }

    /// Constructs the value from `make` at `index`, shifting `[index, len)` right.
    fn emplace_at<F>(&mut self, index: usize, make: F) -> Result<usize, ArrayError>
    where
        T: Relocate,
        F: FnOnce() -> Result<T, ArrayError>,
    {
        assert!(
            index <= self.len,
            "insertion index (is {index}) should be <= len (is {})",
            self.len
        );

        if self.len == self.capacity() {
            let new_capacity = self.grown_capacity()?;
            self.rebuild(new_capacity, Some((index, make)))?;

            return Ok(index);
        }

        // Built in a temporary first: a failing constructor leaves the array untouched.
        let value = make()?;
        let slot = self.storage.element_address_mut(index);

        // SAFETY (PRECONDITIONS ARE MET): len < capacity, so the last live element moves into
        // the spare slot at len and [index, len - 1) shifts one slot right inside the block.
        unsafe {
            ptr::copy(slot, slot.add(1), self.len - index);
            ptr::write(slot, value);
        }
        self.len += 1;

        Ok(index)
    }

    /// Appends `value` and returns a reference to it.
    ///
    /// Amortized O(1). With spare capacity the value is written into the next
    /// slot and only then counted. Without it the array grows (see the type docs).
    ///
    /// # Errors
    ///
    /// - [`ArrayError::Storage`] if growing fails.
    /// - [`ArrayError::Element`] if a copying transfer fails; `value` is dropped.
    ///
    /// The array is unchanged on error.
    pub fn push_back(&mut self, value: T) -> Result<&mut T, ArrayError>
    where
        T: Relocate,
    {
        self.emplace_back_with(move || value)
    }

    /// Appends the value produced by `make` and returns a reference to it.
    ///
    /// When the array must grow, `make` runs after the new block is allocated and
    /// before any element is transferred.
    pub fn emplace_back_with<F>(&mut self, make: F) -> Result<&mut T, ArrayError>
    where
        T: Relocate,
        F: FnOnce() -> T,
    {
        let index = self.emplace_at(self.len, move || Ok(make()))?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Appends the value produced by the fallible constructor `make`.
    ///
    /// # Errors
    ///
    /// A constructor error is returned as [`ArrayError::Element`] and leaves the
    /// array unchanged, including its capacity.
    pub fn try_emplace_back_with<F, E>(&mut self, make: F) -> Result<&mut T, ArrayError>
    where
        T: Relocate,
        F: FnOnce() -> Result<T, E>,
        E: fmt::Debug + Send + Sync + 'static,
    {
        let index = self.emplace_at(self.len, move || {
            make().map_err(|e| ElementError::failed(e).into())
        })?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Inserts `value` at `index`, shifting later elements right.
    ///
    /// Returns the position of the inserted element (always `index`).
    ///
    /// Mid-array insertion with spare capacity relocates the tail one slot to the
    /// right (Rust's move assignment); insertion that grows the array requires the
    /// transfer capability of [`Relocate`].
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, ArrayError>
    where
        T: Relocate,
    {
        self.emplace_at(index, move || Ok(value))
    }

    /// Inserts the value produced by `make` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn emplace_with<F>(&mut self, index: usize, make: F) -> Result<usize, ArrayError>
    where
        T: Relocate,
        F: FnOnce() -> T,
    {
        self.emplace_at(index, move || Ok(make()))
    }

    /// Inserts the value produced by the fallible constructor `make` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_emplace_with<F, E>(&mut self, index: usize, make: F) -> Result<usize, ArrayError>
    where
        T: Relocate,
        F: FnOnce() -> Result<T, E>,
        E: fmt::Debug + Send + Sync + 'static,
    {
        self.emplace_at(index, move || {
            make().map_err(|e| ElementError::failed(e).into())
        })
    }

    /// Destroys the last element.
    ///
    /// Calling this on an empty array is a contract violation, reported in debug
    /// builds. Release builds leave an empty array untouched.
    pub fn pop_back(&mut self) {
        debug_assert!(!self.is_empty(), "pop_back() called on an empty DynArray");

        drop(self.pop());
    }

    /// Removes the last element and returns it, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        // SAFETY (PRECONDITIONS ARE MET): the slot at len was live and is now outside [0, len).
        Some(unsafe { ptr::read(self.storage.element_address(self.len)) })
    }

    /// Removes the element at `index`, shifting later elements left, and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index (is {index}) should be < len (is {})",
            self.len
        );

        let slot = self.storage.element_address_mut(index);

        // SAFETY (PRECONDITIONS ARE MET): index < len; the tail [index + 1, len) moves over the
        // vacated slot, leaving the last slot logically uninitialized.
        let value = unsafe {
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            value
        };
        self.len -= 1;

        value
    }

    /// Destroys the element at `index`, shifting later elements left.
    ///
    /// Returns the position that follows the erased element, which is `index`
    /// itself and may now equal `len()`. The element is dropped after the array
    /// is consistent again.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Destroys the elements in `[len, self.len())`. Does nothing if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let tail = ptr::slice_from_raw_parts_mut(
            self.storage.element_address_mut(len),
            self.len - len,
        );
        self.len = len;

        // SAFETY (PRECONDITIONS ARE MET): the tail was live and is now outside [0, len).
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Destroys every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `new_len` elements.
    ///
    /// Shrinking destroys `[new_len, len)`. Growing reserves `new_len` slots and
    /// default-constructs `[len, new_len)`.
    ///
    /// # Errors
    ///
    /// Returns the error of [`reserve`](Self::reserve); the array is then unchanged.
    pub fn resize(&mut self, new_len: usize) -> Result<(), ArrayError>
    where
        T: Relocate + Default,
    {
        if new_len < self.len {
            self.truncate(new_len);
        } else if new_len > self.len {
            self.reserve(new_len)?;
            self.fill_default(new_len);
        }

        Ok(())
    }

    fn fill_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        debug_assert!(new_len <= self.capacity());

        while self.len < new_len {
            let value = T::default();
            // SAFETY (PRECONDITIONS ARE MET): len < new_len <= capacity, the slot is uninitialized.
            unsafe { ptr::write(self.storage.element_address_mut(self.len), value) };
            self.len += 1;
        }
    }

    /// Exchanges contents with `other` without moving any element.
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the contents out, leaving `self` empty with zero capacity.
    pub fn take(&mut self) -> Self {
        let mut taken = Self::new();
        self.swap_with(&mut taken);
        taken
    }

    /// Returns a deep copy whose capacity equals `len()`.
    ///
    /// # Errors
    ///
    /// - [`ArrayError::Storage`] if the copy's block cannot be allocated.
    /// - [`ArrayError::Element`] if copying an element fails.
    pub fn try_clone(&self) -> Result<Self, ArrayError>
    where
        T: Relocate,
    {
        self.build_copy(self.as_slice(), T::try_copy)
    }

    /// Replaces the contents with copies of `src`.
    ///
    /// If `src` fits in the current capacity the storage is reused: the
    /// overlapping prefix is copy-assigned, the remainder copy-constructed and any
    /// surplus destroyed. Otherwise a complete copy is built first and swapped in,
    /// so a failure leaves `self` unchanged.
    pub fn try_assign_from(&mut self, src: &Self) -> Result<(), ArrayError>
    where
        T: Relocate,
    {
        self.assign_with(src.as_slice(), T::try_copy, |dst, item| {
            *dst = item.try_copy()?;
            Ok(())
        })
    }

    fn build_copy<C>(&self, src: &[T], mut copy: C) -> Result<Self, ArrayError>
    where
        C: FnMut(&T) -> Result<T, ElementError>,
    {
        let mut storage = self.allocate_storage(src.len())?;
        let mut built = InitGuard::new(storage.as_mut_ptr());

        for item in src {
            let value = copy(item)?;
            // SAFETY (PRECONDITIONS ARE MET): fewer than src.len() == capacity slots are written.
            unsafe { built.push(value) };
        }

        let len = built.disarm();
        Ok(Self::from_parts(storage, len))
    }

    fn assign_with<C, A>(&mut self, src: &[T], mut copy: C, mut assign: A) -> Result<(), ArrayError>
    where
        C: FnMut(&T) -> Result<T, ElementError>,
        A: FnMut(&mut T, &T) -> Result<(), ElementError>,
    {
        if src.len() > self.capacity() {
            let mut fresh = self.build_copy(src, copy)?;
            self.swap_with(&mut fresh);

            return Ok(());
        }

        let overlap = self.len.min(src.len());
        for (dst, item) in self.as_mut_slice()[..overlap].iter_mut().zip(src) {
            assign(dst, item)?;
        }

        if src.len() > self.len {
            for item in &src[self.len..] {
                let value = copy(item)?;
                // SAFETY (PRECONDITIONS ARE MET): len < src.len() <= capacity, the slot is uninitialized.
                unsafe { ptr::write(self.storage.element_address_mut(self.len), value) };
                self.len += 1;
            }
        } else {
            self.truncate(src.len());
        }

        Ok(())
    }

    pub(crate) fn into_raw_parts(self) -> (RawStorage<T>, usize) {
        let mut this = ManuallyDrop::new(self);
        let len = this.len;

        (this.storage.take(), len)
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY (PRECONDITIONS ARE MET): [0, len) are live; storage releases the block afterwards.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    /// # Panics
    ///
    /// Panics if the copy's storage cannot be allocated.
    fn clone(&self) -> Self {
        match self.build_copy(self.as_slice(), |item| Ok(item.clone())) {
            Ok(array) => array,
            Err(e) => panic!("DynArray::clone() failed: {e}"),
        }
    }

    /// Reuses the existing storage when `source` fits in it.
    ///
    /// # Panics
    ///
    /// Panics if a larger storage cannot be allocated; `self` is then unchanged.
    fn clone_from(&mut self, source: &Self) {
        let result = self.assign_with(
            source.as_slice(),
            |item| Ok(item.clone()),
            |dst, item| {
                dst.clone_from(item);
                Ok(())
            },
        );

        if let Err(e) = result {
            panic!("DynArray::clone_from() failed: {e}");
        }
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for DynArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        debug_assert!(
            index < self.len,
            "index (is {index}) should be < len (is {})",
            self.len
        );

        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for DynArray<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(
            index < self.len,
            "index (is {index}) should be < len (is {})",
            self.len
        );

        &mut self.as_mut_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<DynArray<U>> for DynArray<T> {
    fn eq(&self, other: &DynArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for DynArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Relocate> FromIterator<T> for DynArray<T> {
    /// # Panics
    ///
    /// Panics if the array cannot grow to hold the iterator's items.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::new();

        if let Err(e) = array.reserve(iter.size_hint().0) {
            panic!("DynArray::from_iter() failed: {e}");
        }

        for item in iter {
            if let Err(e) = array.push_back(item) {
                panic!("DynArray::from_iter() failed: {e}");
            }
        }

        array
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
