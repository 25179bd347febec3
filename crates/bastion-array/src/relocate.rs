// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Transfer-safety capabilities of element types.

use alloc::borrow::{Cow, ToOwned};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::dyn_array::DynArray;
use crate::error::{ArrayError, ElementError};

/// Declares how values of a type may be carried into a new storage block.
///
/// Moving a value in Rust is a bitwise relocation that cannot fail, so the
/// defaults describe a move-only type whose moves are infallible. A type sets
/// [`MOVE_IS_INFALLIBLE`](Self::MOVE_IS_INFALLIBLE) to `false` to require that
/// reallocation keeps the originals intact until the new block is complete, which
/// routes transfers through [`try_copy`](Self::try_copy) when
/// [`IS_COPYABLE`](Self::IS_COPYABLE) is `true`.
///
/// **Note:** This trait is NOT dyn-compatible (has associated constants).
///
/// # Example
///
/// ```rust
/// use bastion_array::{ElementError, Relocate, TransferStrategy};
///
/// // Move-only, infallible moves: defaults are enough.
/// struct Handle(u32);
/// impl Relocate for Handle {}
///
/// // Originals must survive a failed reallocation.
/// #[derive(Clone)]
/// struct Journal(Vec<u8>);
///
/// impl Relocate for Journal {
///     const MOVE_IS_INFALLIBLE: bool = false;
///     const IS_COPYABLE: bool = true;
///
///     fn try_copy(&self) -> Result<Self, ElementError> {
///         Ok(self.clone())
///     }
/// }
///
/// assert_eq!(TransferStrategy::of::<Handle>(), TransferStrategy::Move);
/// assert_eq!(TransferStrategy::of::<Journal>(), TransferStrategy::Copy);
/// ```
pub trait Relocate: Sized {
    /// Whether relocating a value by move can never fail.
    const MOVE_IS_INFALLIBLE: bool = true;

    /// Whether [`try_copy`](Self::try_copy) produces copies.
    const IS_COPYABLE: bool = false;

    /// Copy-constructs a new value from `self`.
    ///
    /// # Errors
    ///
    /// Types that cannot be copied return [`ElementError::NotCopyable`]. Copyable
    /// types return [`ElementError::Failed`] when a copy cannot be produced.
    fn try_copy(&self) -> Result<Self, ElementError> {
        Err(ElementError::not_copyable::<Self>())
    }
}

/// How live elements are carried into a new block during reallocation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TransferStrategy {
    /// Bitwise relocation. The source slots are abandoned without being dropped.
    Move,
    /// Copy construction. The source elements stay live until the copy completes.
    Copy,
}

impl TransferStrategy {
    /// Resolves the strategy for `T`: move when moving cannot fail or copying is
    /// unavailable, copy otherwise.
    #[inline(always)]
    pub const fn of<T: Relocate>() -> Self {
        if T::MOVE_IS_INFALLIBLE || !T::IS_COPYABLE {
            Self::Move
        } else {
            Self::Copy
        }
    }
}

macro_rules! impl_relocate_by_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Relocate for $ty {
                const IS_COPYABLE: bool = true;

                #[inline(always)]
                fn try_copy(&self) -> Result<Self, ElementError> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

impl_relocate_by_clone!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, (),
    String,
);

impl<T: Relocate> Relocate for Box<T> {
    const IS_COPYABLE: bool = T::IS_COPYABLE;

    fn try_copy(&self) -> Result<Self, ElementError> {
        Ok(Box::new((**self).try_copy()?))
    }
}

// Stored inline: moving the Option moves the T.
impl<T: Relocate> Relocate for Option<T> {
    const MOVE_IS_INFALLIBLE: bool = T::MOVE_IS_INFALLIBLE;
    const IS_COPYABLE: bool = T::IS_COPYABLE;

    fn try_copy(&self) -> Result<Self, ElementError> {
        self.as_ref().map(Relocate::try_copy).transpose()
    }
}

impl<T: Relocate> Relocate for Vec<T> {
    const IS_COPYABLE: bool = T::IS_COPYABLE;

    fn try_copy(&self) -> Result<Self, ElementError> {
        self.iter().map(Relocate::try_copy).collect()
    }
}

impl<T: Relocate> Relocate for DynArray<T> {
    const IS_COPYABLE: bool = T::IS_COPYABLE;

    fn try_copy(&self) -> Result<Self, ElementError> {
        self.try_clone().map_err(|e| match e {
            ArrayError::Element(e) => e,
            ArrayError::Storage(e) => ElementError::failed(e),
        })
    }
}

impl<T: Relocate, const N: usize> Relocate for [T; N] {
    const MOVE_IS_INFALLIBLE: bool = T::MOVE_IS_INFALLIBLE;
    const IS_COPYABLE: bool = T::IS_COPYABLE;

    fn try_copy(&self) -> Result<Self, ElementError> {
        let copies = self
            .iter()
            .map(Relocate::try_copy)
            .collect::<Result<Vec<T>, _>>()?;

        copies
            .try_into()
            .map_err(|_| ElementError::failed("array copy produced a different length"))
    }
}

impl<T: ?Sized> Relocate for &T {
    const IS_COPYABLE: bool = true;

    #[inline(always)]
    fn try_copy(&self) -> Result<Self, ElementError> {
        Ok(*self)
    }
}

impl<T: ?Sized> Relocate for &mut T {}

impl<T: ?Sized> Relocate for Rc<T> {
    const IS_COPYABLE: bool = true;

    #[inline(always)]
    fn try_copy(&self) -> Result<Self, ElementError> {
        Ok(Rc::clone(self))
    }
}

impl<T: ?Sized> Relocate for Arc<T> {
    const IS_COPYABLE: bool = true;

    #[inline(always)]
    fn try_copy(&self) -> Result<Self, ElementError> {
        Ok(Arc::clone(self))
    }
}

impl<B: ?Sized + ToOwned> Relocate for Cow<'_, B> {
    const IS_COPYABLE: bool = true;

    fn try_copy(&self) -> Result<Self, ElementError> {
        Ok(self.clone())
    }
}

macro_rules! impl_relocate_for_tuple {
    ($(($($name:ident . $idx:tt),+)),* $(,)?) => {
        $(
            impl<$($name: Relocate),+> Relocate for ($($name,)+) {
                const MOVE_IS_INFALLIBLE: bool = true $(&& $name::MOVE_IS_INFALLIBLE)+;
                const IS_COPYABLE: bool = true $(&& $name::IS_COPYABLE)+;

                fn try_copy(&self) -> Result<Self, ElementError> {
                    Ok(($(self.$idx.try_copy()?,)+))
                }
            }
        )*
    };
}

impl_relocate_for_tuple!(
    (A.0),
    (A.0, B.1),
    (A.0, B.1, C.2),
    (A.0, B.1, C.2, D.3),
    (A.0, B.1, C.2, D.3, E.4),
    (A.0, B.1, C.2, D.3, E.4, F.5),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11),
);
