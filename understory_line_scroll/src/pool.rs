// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell pool: constructs cell views on demand and recycles retired ones.
//!
//! ## Usage
//!
//! 1) Install a factory with [`CellPool::register_factory`].
//! 2) Call [`CellPool::acquire`] for each index that becomes visible.
//! 3) Hand cells back with [`CellPool::release`] when their index leaves the
//!    window. The next `acquire` reuses them instead of calling the factory.
//!
//! ## Minimal example
//!
//! ```
//! use understory_line_scroll::CellPool;
//!
//! let mut pool = CellPool::<String, f64>::new();
//! pool.register_factory(String::new);
//!
//! let cell = pool.acquire(3).unwrap();
//! assert_eq!(cell.index(), Some(3));
//! let id = cell.id();
//!
//! pool.release(cell);
//! assert_eq!(pool.pooled(), 1);
//!
//! // The retired instance comes back for the next index.
//! let cell = pool.acquire(4).unwrap();
//! assert_eq!(cell.id(), id);
//! assert_eq!(pool.constructed(), 1);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::{Cell, CellId, LineScrollError, Scalar};

type Factory<V> = Box<dyn FnMut() -> V>;

/// Pool of reusable cells for one concrete view type `V`.
///
/// Acquisition is amortized O(1): retired cells are kept on a free list and
/// rebound rather than rebuilt, so steady-state scrolling never calls the
/// factory once the pool has grown to the window size.
pub struct CellPool<V, S> {
    factory: Option<Factory<V>>,
    generation: u32,
    free: Vec<Cell<V, S>>,
    next_id: u64,
    constructed: usize,
}

impl<V, S: Scalar> CellPool<V, S> {
    /// Creates an empty pool with no factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factory: None,
            generation: 0,
            free: Vec::new(),
            next_id: 0,
            constructed: 0,
        }
    }

    /// Installs the factory used to construct new cell views.
    ///
    /// Replacing an existing factory drops every pooled cell. Cells that are
    /// still checked out keep working, but are dropped rather than pooled when
    /// they are released.
    pub fn register_factory(&mut self, factory: impl FnMut() -> V + 'static) {
        if self.factory.is_some() {
            log::debug!(
                "CellPool: factory replaced, discarding {} pooled cells",
                self.free.len()
            );
        }
        self.factory = Some(Box::new(factory));
        self.generation = self.generation.wrapping_add(1);
        self.free.clear();
    }

    /// Returns `true` once a factory has been registered.
    #[must_use]
    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Returns a cell bound to `index`.
    ///
    /// A pooled cell is reused when one is available; otherwise the factory
    /// constructs a new one. Fails with [`LineScrollError::NoFactoryRegistered`]
    /// before a factory exists.
    pub fn acquire(&mut self, index: isize) -> Result<Cell<V, S>, LineScrollError> {
        let Some(factory) = self.factory.as_mut() else {
            return Err(LineScrollError::NoFactoryRegistered);
        };
        let mut cell = match self.free.pop() {
            Some(cell) => cell,
            None => {
                let id = CellId(self.next_id);
                self.next_id = self.next_id.wrapping_add(1);
                self.constructed += 1;
                log::trace!("CellPool: constructing cell {id:?} for index {index}");
                Cell::new(id, self.generation, factory())
            }
        };
        cell.bind(index);
        Ok(cell)
    }

    /// Unbinds `cell` and keeps it for reuse.
    ///
    /// Cells built by a factory that has since been replaced are dropped.
    pub fn release(&mut self, mut cell: Cell<V, S>) {
        cell.unbind();
        if cell.generation() == self.generation {
            self.free.push(cell);
        } else {
            log::trace!("CellPool: dropping stale cell {:?}", cell.id());
        }
    }

    /// Returns how many cells the factory has constructed so far.
    #[must_use]
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    /// Returns how many unbound cells are waiting for reuse.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.free.len()
    }
}

impl<V, S: Scalar> Default for CellPool<V, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> fmt::Debug for CellPool<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellPool")
            .field("has_factory", &self.factory.is_some())
            .field("generation", &self.generation)
            .field("pooled", &self.free.len())
            .field("constructed", &self.constructed)
            .finish_non_exhaustive()
    }
}
