// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// Failure injection for the allocation path of a [`DynArray`](crate::DynArray).
///
/// Available under `cfg(test)` and with the `test-utils` feature. A behaviour
/// stays in effect until it is changed again.
///
/// # Example
///
/// A failed growth leaves the array as it was, and the rejected element is
/// dropped:
///
/// ```rust
/// use bastion_array::{ArrayBehaviour, ArrayError, DynArray};
/// use bastion_storage::StorageError;
///
/// let mut journal = DynArray::with_capacity(1).unwrap();
/// journal.push_back(String::from("opened")).unwrap();
///
/// journal.change_behaviour(ArrayBehaviour::FailAtAllocate);
/// let result = journal.push_back(String::from("rejected"));
///
/// assert!(matches!(
///     result,
///     Err(ArrayError::Storage(StorageError::AllocationFailed { .. }))
/// ));
/// assert_eq!(journal, ["opened"]);
/// assert_eq!(journal.capacity(), 1);
///
/// journal.change_behaviour(ArrayBehaviour::None);
/// journal.push_back(String::from("closed")).unwrap();
/// assert_eq!(journal, ["opened", "closed"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayBehaviour {
    /// Normal behaviour - no injected failures.
    None,
    /// Every storage allocation with a non-zero capacity fails with
    /// `StorageError::AllocationFailed`.
    FailAtAllocate,
}

impl Default for ArrayBehaviour {
    fn default() -> Self {
        Self::None
    }
}
