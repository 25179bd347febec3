// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Growable contiguous array with strong error-safety during reallocation.
//!
//! `DynArray<T>` owns a [`RawStorage<T>`](bastion_storage::RawStorage) and a count of
//! live elements. It manages every element lifetime itself: construction into raw
//! slots, relocation into larger blocks, and destruction.
//!
//! # Core Guarantees
//!
//! - **Construct before destroy**: when growing, the pending element is built in the
//!   new block first, the live elements are transferred next, and the old elements
//!   are only destroyed once the new block is complete.
//! - **Strong guarantee on the copy path**: if a transfer that copies fails, the
//!   array keeps its length, capacity and values; the partial copies are dropped and
//!   the new block is freed.
//! - **Fallible growth**: allocation failure is returned as [`ArrayError`], never
//!   retried or swallowed.
//! - **Capacity only grows**: doubling with a floor of `len + 1`.
//!
//! # Transfer Policy
//!
//! Element types declare through [`Relocate`] whether a move can fail and whether
//! they can be copied. [`TransferStrategy::of`] resolves the policy once per
//! transfer: move when moving cannot fail or copying is unavailable, copy otherwise.
//!
//! # Example: Basic Usage
//!
//! ```rust
//! use bastion_array::{ArrayError, DynArray};
//!
//! fn example() -> Result<(), ArrayError> {
//!     let mut array = DynArray::new();
//!     array.push_back(1)?;
//!     array.push_back(2)?;
//!     array.push_back(3)?;
//!
//!     let at = array.insert(1, 9)?;
//!     assert_eq!(array, [1, 9, 2, 3]);
//!
//!     array.erase(at);
//!     assert_eq!(array, [1, 2, 3]);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Example: Fallible Construction
//!
//! ```rust
//! use bastion_array::{ArrayError, DynArray};
//!
//! fn example() -> Result<(), ArrayError> {
//!     let mut array: DynArray<u32> = DynArray::new();
//!
//!     let result = array.try_emplace_back_with(|| "42x".parse::<u32>());
//!     assert!(matches!(result, Err(ArrayError::Element(_))));
//!
//!     // Nothing was constructed, nothing changed.
//!     assert!(array.is_empty());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Test Utilities
//!
//! Enable the `test-utils` feature to inject allocation failures:
//!
//! ```toml
//! [dev-dependencies]
//! bastion-array = { version = "*", features = ["test-utils"] }
//! ```
//!
//! Then use [`ArrayBehaviour`] to exercise error paths:
//!
//! ```rust
//! // test-utils feature required in dev-dependencies
//! #[cfg(test)]
//! mod tests {
//!     use bastion_array::{ArrayBehaviour, DynArray};
//!
//!     #[test]
//!     fn test_handles_allocation_failure() {
//!         let mut array = DynArray::<u8>::new();
//!         array.change_behaviour(ArrayBehaviour::FailAtAllocate);
//!
//!         assert!(array.push_back(1).is_err());
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[cfg(test)]
mod tests;

#[cfg(any(test, feature = "test-utils"))]
mod behaviour;

mod dyn_array;
mod error;
mod into_iter;
mod relocate;
mod transfer;

pub use dyn_array::DynArray;
pub use error::{ArrayError, ElementError};
pub use into_iter::IntoIter;
pub use relocate::{Relocate, TransferStrategy};

#[cfg(any(test, feature = "test-utils"))]
pub use behaviour::ArrayBehaviour;
