// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for bastion-storage.

use thiserror::Error;

/// Errors that can occur while acquiring a storage block.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum StorageError {
    /// The requested capacity does not fit in a valid allocation layout.
    ///
    /// Raised when `capacity * size_of::<T>()` overflows or exceeds `isize::MAX`.
    #[error("capacity overflow: requested block exceeds isize::MAX bytes")]
    CapacityOverflow,

    /// The global allocator could not satisfy the request.
    #[error("allocation of {size} bytes (align {align}) failed")]
    AllocationFailed {
        /// Requested block size in bytes.
        size: usize,
        /// Requested block alignment in bytes.
        align: usize,
    },
}
