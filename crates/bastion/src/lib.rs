// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! <p align="center"><em>Growable arrays that never lose elements when growth fails.</em></p>
//!
//! ---
//!
//! Bastion is a contiguous, growable array built in two layers: an owned block of
//! uninitialized slots ([`storage::RawStorage`]) and the array that manages live
//! elements on top of it ([`DynArray`]). Every reallocation offers the strong
//! guarantee: if allocating, constructing or copying fails, the array is left
//! exactly as it was.
//!
//! # Features
//!
//! - **Strong guarantee on growth** - new element built first, old elements released last
//! - **Move or copy, chosen per type** - elements whose moves may fail are copied instead
//! - **Fallible everything** - allocation and construction errors are values, not aborts
//! - **`no_std` compatible** - only needs `alloc`
//!
//! # Installation
//!
//! ```toml
//! [dependencies]
//! bastion = "0.1.0"
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use bastion::{ArrayError, DynArray};
//!
//! fn main() -> Result<(), ArrayError> {
//!     let mut numbers = DynArray::new();
//!
//!     numbers.push_back(1)?;
//!     numbers.push_back(2)?;
//!     numbers.push_back(3)?;
//!
//!     numbers.insert(1, 9)?;
//!     assert_eq!(numbers, [1, 9, 2, 3]);
//!
//!     numbers.erase(1);
//!     assert_eq!(numbers, [1, 2, 3]);
//!
//!     numbers.resize(5)?;
//!     assert_eq!(numbers, [1, 2, 3, 0, 0]);
//!     assert_eq!(numbers.capacity(), 5);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Growth
//!
//! Capacity only changes when an insertion finds no spare slot, or on an explicit
//! [`DynArray::reserve`]. Implicit growth picks `max(2 * capacity, len + 1)`:
//!
//! ```rust
//! # use bastion::DynArray;
//! let mut array = DynArray::new();
//! let mut seen = Vec::new();
//! for i in 0..5u8 {
//!     array.push_back(i).unwrap();
//!     seen.push(array.capacity());
//! }
//! assert_eq!(seen, [1, 2, 4, 4, 8]);
//! ```
//!
//! # Move or copy
//!
//! Element types opt into the array through [`Relocate`]. A type that declares
//! its moves fallible *and* offers a copy is transferred by copying, so a failed
//! copy never leaves half-moved elements behind:
//!
//! ```rust
//! use bastion::{ElementError, Relocate, TransferStrategy};
//!
//! #[derive(Clone)]
//! struct Ledger(Vec<u64>);
//!
//! impl Relocate for Ledger {
//!     const MOVE_IS_INFALLIBLE: bool = false;
//!     const IS_COPYABLE: bool = true;
//!
//!     fn try_copy(&self) -> Result<Self, ElementError> {
//!         Ok(self.clone())
//!     }
//! }
//!
//! assert_eq!(TransferStrategy::of::<Ledger>(), TransferStrategy::Copy);
//! assert_eq!(TransferStrategy::of::<u64>(), TransferStrategy::Move);
//! ```
//!
//! # Testing
//!
//! With the `test-utils` feature an array can be told to fail its next
//! allocations, which makes error paths reachable from tests:
//!
//! ```rust,ignore
//! use bastion::{ArrayBehaviour, DynArray};
//!
//! let mut array: DynArray<u8> = DynArray::new();
//! array.change_behaviour(ArrayBehaviour::FailAtAllocate);
//!
//! assert!(array.push_back(1).is_err());
//! assert!(array.is_empty());
//! ```
//!
//! # License
//!
//! GPL-3.0-only

#![cfg_attr(not(test), no_std)]

pub use bastion_array as array;
pub use bastion_storage as storage;

pub use bastion_array::{ArrayError, DynArray, ElementError, IntoIter, Relocate, TransferStrategy};

#[cfg(feature = "test-utils")]
pub use bastion_array::ArrayBehaviour;
