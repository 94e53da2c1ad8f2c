// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cells: recyclable view instances and their stable identifiers.

use crate::Scalar;

/// Stable identifier for a cell instance.
///
/// A `CellId` is assigned when the pool constructs a cell and stays with that
/// instance across every rebind, so hosts can key per-view state on it.
///
/// ### Notes
///
/// - Identifiers are never reused within one [`CellPool`](crate::CellPool),
///   including across factory replacements.
/// - They come from a 64-bit counter, which would only wrap after 2^64
///   constructions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u64);

impl CellId {
    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A view instance bound to at most one logical index at a time.
///
/// While bound, the cell sits at `offset == index * width` in content
/// coordinates. Unbound cells live in the [`CellPool`](crate::CellPool) and
/// report no index.
#[derive(Debug)]
pub struct Cell<V, S> {
    id: CellId,
    generation: u32,
    index: Option<isize>,
    offset: S,
    width: S,
    view: V,
}

impl<V, S: Scalar> Cell<V, S> {
    pub(crate) fn new(id: CellId, generation: u32, view: V) -> Self {
        Self {
            id,
            generation,
            index: None,
            offset: S::zero(),
            width: S::zero(),
            view,
        }
    }

    /// Returns the identifier of this instance.
    #[must_use]
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Returns the index this cell is bound to, or `None` while pooled.
    #[must_use]
    pub fn index(&self) -> Option<isize> {
        self.index
    }

    /// Returns the leading edge of the cell in content coordinates.
    #[must_use]
    pub fn offset(&self) -> S {
        self.offset
    }

    /// Returns the width of the cell.
    #[must_use]
    pub fn width(&self) -> S {
        self.width
    }

    /// Returns the host view.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Returns the host view mutably, for configuring it for its index.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn bind(&mut self, index: isize) {
        self.index = Some(index);
    }

    pub(crate) fn place(&mut self, offset: S, width: S) {
        self.offset = offset;
        self.width = width;
    }

    pub(crate) fn unbind(&mut self) {
        self.index = None;
    }
}
