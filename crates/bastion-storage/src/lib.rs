// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Owned blocks of uninitialized memory sized for `N` elements of `T`.
//!
//! [`RawStorage<T>`] is the lowest layer of the Bastion containers. It only hands
//! out and reclaims addresses: it never constructs, drops or tracks elements.
//! Knowing which slots hold live values is the job of the container built on top
//! of it (see `bastion-array`).
//!
//! # Guarantees
//!
//! - **Null iff empty**: the block is absent exactly when `capacity() == 0`, and no
//!   allocator call is made for a zero capacity.
//! - **Exact width**: the block is `capacity * size_of::<T>()` bytes, nothing more is
//!   tracked.
//! - **Single owner**: ownership moves (Rust moves, [`RawStorage::swap`],
//!   [`RawStorage::take`]) but is never duplicated; `RawStorage` is not `Clone`.
//! - **Released once**: the block is freed (not dropped element-wise) when its
//!   owner is dropped.
//!
//! # Example
//!
//! ```rust
//! use bastion_storage::{RawStorage, StorageError};
//!
//! fn example() -> Result<(), StorageError> {
//!     let mut storage = RawStorage::<u64>::allocate(4)?;
//!     assert_eq!(storage.capacity(), 4);
//!
//!     // SAFETY: slot 0 is inside the block and is read back before the block is freed.
//!     unsafe {
//!         storage.element_address_mut(0).write(42);
//!         assert_eq!(storage.element_address(0).read(), 42);
//!     }
//!
//!     // The one-past-end address is valid to compute, never to dereference.
//!     let _end = storage.element_address(4);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod error;
mod raw_storage;

pub use error::StorageError;
pub use raw_storage::RawStorage;
