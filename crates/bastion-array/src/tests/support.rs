// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Instrumented element types for accounting drops and copies.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{DynArray, ElementError, Relocate};

const UNLIMITED: usize = usize::MAX;

#[derive(Debug)]
struct Counts {
    drops: AtomicUsize,
    copies: AtomicUsize,
    copy_budget: AtomicUsize,
}

/// Shared counters observed by every element created from it.
///
/// Clones share state (Arc), so the test keeps a handle while elements are
/// moved, copied and dropped inside the array.
#[derive(Debug, Clone)]
pub(crate) struct Probe(Arc<Counts>);

impl Probe {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Counts {
            drops: AtomicUsize::new(0),
            copies: AtomicUsize::new(0),
            copy_budget: AtomicUsize::new(UNLIMITED),
        }))
    }

    pub(crate) fn drops(&self) -> usize {
        self.0.drops.load(Ordering::SeqCst)
    }

    pub(crate) fn copies(&self) -> usize {
        self.0.copies.load(Ordering::SeqCst)
    }

    /// Lets `remaining` more copies succeed; every copy after that fails.
    pub(crate) fn fail_copies_after(&self, remaining: usize) {
        self.0.copy_budget.store(remaining, Ordering::SeqCst);
    }

    pub(crate) fn allow_all_copies(&self) {
        self.0.copy_budget.store(UNLIMITED, Ordering::SeqCst);
    }

    fn spend_copy(&self) -> bool {
        let spent = self
            .0
            .copy_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |budget| match budget {
                0 => None,
                UNLIMITED => Some(UNLIMITED),
                n => Some(n - 1),
            })
            .is_ok();

        if spent {
            self.0.copies.fetch_add(1, Ordering::SeqCst);
        }

        spent
    }

    /// An element whose moves are declared infallible (transferred by move).
    pub(crate) fn tracked(&self, value: i32) -> Tracked {
        Instrumented {
            value,
            probe: self.clone(),
        }
    }

    /// An element whose moves are declared fallible (transferred by copy).
    pub(crate) fn fragile(&self, value: i32) -> Fragile {
        Instrumented {
            value,
            probe: self.clone(),
        }
    }
}

pub(crate) struct Instrumented<const MOVE_IS_INFALLIBLE: bool> {
    pub(crate) value: i32,
    probe: Probe,
}

pub(crate) type Tracked = Instrumented<true>;
pub(crate) type Fragile = Instrumented<false>;

impl<const M: bool> Relocate for Instrumented<M> {
    const MOVE_IS_INFALLIBLE: bool = M;
    const IS_COPYABLE: bool = true;

    fn try_copy(&self) -> Result<Self, ElementError> {
        if !self.probe.spend_copy() {
            return Err(ElementError::failed("copy budget exhausted"));
        }

        Ok(Self {
            value: self.value,
            probe: self.probe.clone(),
        })
    }
}

impl<const M: bool> Clone for Instrumented<M> {
    fn clone(&self) -> Self {
        assert!(self.probe.spend_copy(), "copy budget exhausted");

        Self {
            value: self.value,
            probe: self.probe.clone(),
        }
    }
}

impl<const M: bool> Drop for Instrumented<M> {
    fn drop(&mut self) {
        self.probe.0.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl<const M: bool> PartialEq for Instrumented<M> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<const M: bool> fmt::Debug for Instrumented<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

pub(crate) fn values<const M: bool>(array: &DynArray<Instrumented<M>>) -> Vec<i32> {
    array.iter().map(|e| e.value).collect()
}

/// Move-only element with the default capabilities.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MoveOnly(pub(crate) u32);

impl Relocate for MoveOnly {}

/// Declares fallible moves but offers no copy, so moving is still the only option.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Stubborn(pub(crate) u32);

impl Relocate for Stubborn {
    const MOVE_IS_INFALLIBLE: bool = false;
}
