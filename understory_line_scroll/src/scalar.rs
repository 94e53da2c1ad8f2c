// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction used for cell widths, offsets, and scroll positions.
//!
//! This trait is intentionally small and only implemented for `f32` and `f64`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Scalar type used for cell widths, offsets, and scroll positions.
///
/// This is currently implemented for `f32` and `f64`. The trait is deliberately
/// minimal and geared toward floating-point coordinates.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity (typically `0.0`).
    fn zero() -> Self;

    /// Returns `true` if the value is finite (not NaN or infinite).
    fn is_finite(self) -> bool;

    /// Constructs from an `isize` lossily.
    fn from_isize(value: isize) -> Self;

    /// Returns half of the value.
    fn half(self) -> Self;

    /// Widens to `f64` for diagnostics.
    fn to_f64(self) -> f64;

    /// Constructs from an `f64` lossily; used for `kurbo` coordinates.
    fn from_f64(value: f64) -> Self;

    /// Rounds toward negative infinity and converts to `isize`.
    ///
    /// Values outside the `isize` range saturate. NaN maps to `0`; callers are
    /// expected to reject non-finite input before getting here.
    fn floor_to_isize(self) -> isize;
}

impl Scalar for f32 {
    fn zero() -> Self {
        0.0
    }

    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    fn from_isize(value: isize) -> Self {
        value as Self
    }

    fn half(self) -> Self {
        self * 0.5
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Pointer coordinates comfortably fit in f32"
        )]
        {
            value as Self
        }
    }

    fn floor_to_isize(self) -> isize {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Truncation toward zero is corrected to a floor below"
        )]
        let truncated = self as isize;
        if (truncated as Self) > self {
            truncated.saturating_sub(1)
        } else {
            truncated
        }
    }
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    fn from_isize(value: isize) -> Self {
        value as Self
    }

    fn half(self) -> Self {
        self * 0.5
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn floor_to_isize(self) -> isize {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Truncation toward zero is corrected to a floor below"
        )]
        let truncated = self as isize;
        if (truncated as Self) > self {
            truncated.saturating_sub(1)
        } else {
            truncated
        }
    }
}
