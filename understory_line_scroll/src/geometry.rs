// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry engine: exact mappings between scroll offsets and cell indices.
//!
//! Cells are laid out edge to edge, cell `i` covering `[i * w, (i + 1) * w)`.
//! Indices are signed so that elastic overscroll before the start of the
//! strip maps to negative indices instead of being clamped.
//!
//! The free functions validate the cell width on every call. Hot paths hold a
//! [`CellWidth`], which is validated once and then maps infallibly.

use core::ops::RangeInclusive;

use crate::{LineScrollError, Scalar};

/// A validated cell width: finite and strictly positive.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct CellWidth<S>(S);

impl<S: Scalar> CellWidth<S> {
    /// Validates `width` as a cell width.
    ///
    /// Returns [`LineScrollError::InvalidConfiguration`] when `width` is zero,
    /// negative, NaN, or infinite.
    pub fn new(width: S) -> Result<Self, LineScrollError> {
        if width.is_finite() && width > S::zero() {
            Ok(Self(width))
        } else {
            Err(LineScrollError::InvalidConfiguration {
                cell_width: width.to_f64(),
            })
        }
    }

    /// Returns the raw width.
    #[must_use]
    pub fn get(self) -> S {
        self.0
    }

    /// Returns the index of the cell containing `offset`.
    ///
    /// This is `floor(offset / width)`, corrected so that it is always the
    /// largest `i` with `offset_for_index(i) <= offset`. The correction keeps
    /// the two mappings exact inverses at cell boundaries even where the
    /// floating-point quotient lands a hair below an integer.
    #[must_use]
    pub fn index_for_offset(self, offset: S) -> isize {
        let index = (offset / self.0).floor_to_isize();
        if self.offset_for_index(index) > offset {
            index.saturating_sub(1)
        } else if self.offset_for_index(index.saturating_add(1)) <= offset {
            index.saturating_add(1)
        } else {
            index
        }
    }

    /// Returns the leading edge of cell `index`.
    #[must_use]
    pub fn offset_for_index(self, index: isize) -> S {
        S::from_isize(index) * self.0
    }

    /// Returns the inclusive range of indices touched by `[offset, offset + viewport_width]`.
    ///
    /// The result is never empty for a non-negative `viewport_width`.
    #[must_use]
    pub fn visible_range(self, offset: S, viewport_width: S) -> RangeInclusive<isize> {
        self.index_for_offset(offset)..=self.index_for_offset(offset + viewport_width)
    }
}

/// Which point of the viewport decides the current index.
///
/// The same rule is used when mapping an organic scroll offset to a current
/// index and when computing the offset for an explicit current-index jump, so
/// a jump to `i` always reports `i` as current afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferencePoint {
    /// The cell under the leading (left) edge of the viewport is current.
    ///
    /// Jumping to `i` aligns the leading edge of cell `i` with the viewport's
    /// leading edge.
    #[default]
    LeadingEdge,
    /// The cell under the viewport centre is current.
    ///
    /// Jumping to `i` centres cell `i` in the viewport.
    Center,
}

impl ReferencePoint {
    /// Returns the current index for a viewport at `offset`.
    #[must_use]
    pub fn current_index<S: Scalar>(
        self,
        width: CellWidth<S>,
        offset: S,
        viewport_width: S,
    ) -> isize {
        match self {
            Self::LeadingEdge => width.index_for_offset(offset),
            Self::Center => width.index_for_offset(offset + viewport_width.half()),
        }
    }

    /// Returns the scroll offset at which `index` becomes current.
    #[must_use]
    pub fn offset_for_current<S: Scalar>(
        self,
        width: CellWidth<S>,
        index: isize,
        viewport_width: S,
    ) -> S {
        let leading = width.offset_for_index(index);
        match self {
            Self::LeadingEdge => leading,
            Self::Center => leading + width.get().half() - viewport_width.half(),
        }
    }
}

/// Returns the index of the leftmost cell touching `offset`.
///
/// Negative and past-the-end offsets are fine and simply produce indices
/// outside whatever range the host considers valid.
pub fn index_for_offset<S: Scalar>(offset: S, cell_width: S) -> Result<isize, LineScrollError> {
    Ok(CellWidth::new(cell_width)?.index_for_offset(offset))
}

/// Returns the leading edge of cell `index`; the inverse of [`index_for_offset`].
pub fn offset_for_index<S: Scalar>(index: isize, cell_width: S) -> Result<S, LineScrollError> {
    Ok(CellWidth::new(cell_width)?.offset_for_index(index))
}

/// Returns the inclusive `(first, last)` index range visible in a viewport.
///
/// `first` is `index_for_offset(offset)` and `last` is
/// `index_for_offset(offset + viewport_width)`. The viewport width must be
/// finite and positive, otherwise [`LineScrollError::InvalidViewport`] is
/// returned.
pub fn visible_range<S: Scalar>(
    offset: S,
    viewport_width: S,
    cell_width: S,
) -> Result<RangeInclusive<isize>, LineScrollError> {
    let width = CellWidth::new(cell_width)?;
    check_viewport_width(viewport_width)?;
    Ok(width.visible_range(offset, viewport_width))
}

pub(crate) fn check_viewport_width<S: Scalar>(viewport_width: S) -> Result<S, LineScrollError> {
    if viewport_width.is_finite() && viewport_width > S::zero() {
        Ok(viewport_width)
    } else {
        Err(LineScrollError::InvalidViewport {
            viewport_width: viewport_width.to_f64(),
        })
    }
}
