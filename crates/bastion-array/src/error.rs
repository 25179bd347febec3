// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for bastion-array.

use alloc::boxed::Box;
use core::fmt;

use bastion_storage::StorageError;
use thiserror::Error;

/// Failure raised by an element operation: construction, copy or relocation.
#[derive(Debug, Error)]
pub enum ElementError {
    /// The element type does not support copy construction.
    #[error("type `{0}` does not support copy construction")]
    NotCopyable(&'static str),

    /// A user-supplied constructor or copy reported an error.
    #[error("element operation failed: {0:?}")]
    Failed(Box<dyn fmt::Debug + Send + Sync + 'static>),
}

impl ElementError {
    /// Creates a `Failed` error from any Debug + Send + Sync error.
    pub fn failed<E: fmt::Debug + Send + Sync + 'static>(e: E) -> Self {
        Self::Failed(Box::new(e))
    }

    /// Creates a `NotCopyable` error naming `T`.
    pub fn not_copyable<T>() -> Self {
        Self::NotCopyable(core::any::type_name::<T>())
    }
}

/// Errors that can occur when working with a [`DynArray`](crate::DynArray).
///
/// Contract violations (out-of-range indices, popping an empty array) are not
/// part of this type: they are programmer errors checked by assertions.
#[derive(Debug, Error)]
pub enum ArrayError {
    /// Acquiring a storage block failed.
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),

    /// An element could not be constructed or copied.
    #[error("ElementError: {0}")]
    Element(#[from] ElementError),
}
