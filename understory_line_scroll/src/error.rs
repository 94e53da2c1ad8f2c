// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the geometry engine, the cell pool, and the controller.

use core::fmt;
use core::ops::RangeInclusive;

/// Errors reported by line scroll operations.
///
/// All of these indicate a misconfigured integration rather than a transient
/// condition, so nothing here is retried or clamped silently. Scroll offsets
/// outside the data range (elastic overscroll and the like) are never an
/// error; see [`ShouldShowIndex`](crate::ShouldShowIndex) for declining them.
#[derive(Clone, PartialEq)]
pub enum LineScrollError {
    /// The cell width is zero, negative, or not finite.
    ///
    /// The width is carried as `f64` regardless of the scalar type in use.
    InvalidConfiguration {
        /// The rejected cell width.
        cell_width: f64,
    },
    /// The viewport width is zero, negative, or not finite.
    InvalidViewport {
        /// The rejected viewport width.
        viewport_width: f64,
    },
    /// A cell was requested before any cell factory was registered.
    NoFactoryRegistered,
    /// An explicit current index lies outside the configured index bounds.
    IndexOutOfBounds {
        /// The requested index.
        index: isize,
        /// The bounds in force when the request was made.
        bounds: RangeInclusive<isize>,
    },
    /// A state-changing call was made while notifications were being dispatched.
    ReentrantUpdate,
}

impl fmt::Debug for LineScrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { cell_width } => {
                write!(f, "InvalidConfiguration {{ cell_width: {cell_width:?} }}")
            }
            Self::InvalidViewport { viewport_width } => {
                write!(f, "InvalidViewport {{ viewport_width: {viewport_width:?} }}")
            }
            Self::NoFactoryRegistered => f.write_str("NoFactoryRegistered"),
            Self::IndexOutOfBounds { index, bounds } => write!(
                f,
                "IndexOutOfBounds {{ index: {index:?}, bounds: {bounds:?} }}"
            ),
            Self::ReentrantUpdate => f.write_str("ReentrantUpdate"),
        }
    }
}

impl fmt::Display for LineScrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { cell_width } => {
                write!(f, "cell width must be finite and positive, got {cell_width}")
            }
            Self::InvalidViewport { viewport_width } => write!(
                f,
                "viewport width must be finite and positive, got {viewport_width}"
            ),
            Self::NoFactoryRegistered => {
                f.write_str("no cell factory registered; call `register_cell_class` first")
            }
            Self::IndexOutOfBounds { index, bounds } => write!(
                f,
                "index {index} is outside the valid range {}..={}",
                bounds.start(),
                bounds.end()
            ),
            Self::ReentrantUpdate => {
                f.write_str("line scroll state cannot change while notifications are dispatched")
            }
        }
    }
}

impl core::error::Error for LineScrollError {}
