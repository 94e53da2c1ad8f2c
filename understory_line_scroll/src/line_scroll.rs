// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtualization controller for a horizontal strip of equally sized cells.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;
use core::ops::RangeInclusive;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::callbacks::Callbacks;
use crate::geometry::check_viewport_width;
use crate::{Cell, CellId, CellPool, CellWidth, LineScrollError, ReferencePoint, Scalar};

type IndexList = SmallVec<[isize; 16]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Render {
    /// Diff the new window against the previous one.
    Incremental,
    /// Release everything and bind the new window from scratch.
    Reload,
}

/// Controller that keeps one bound cell per visible index of a horizontal strip.
///
/// The host drives it with [`LineScroll::set_scroll_offset`] whenever its
/// scroll position changes. Each call recomputes the visible window, releases
/// cells whose index left it, acquires cells for indices that entered it, and
/// leaves everything else untouched. Work per call is proportional to the
/// number of indices entering or leaving the window.
///
/// The visible window is empty until the first scroll update, reload, or
/// current-index jump.
pub struct LineScroll<V, S = f64> {
    width: CellWidth<S>,
    viewport_width: S,
    offset: S,
    reference: ReferencePoint,
    index_bounds: Option<RangeInclusive<isize>>,
    window: Option<RangeInclusive<isize>>,
    cells: HashMap<isize, Cell<V, S>>,
    cell_indices: HashMap<CellId, isize>,
    pool: CellPool<V, S>,
    current_index: isize,
    current_direction: bool,
    callbacks: Callbacks<V, S>,
    dispatching: bool,
}

impl<V, S: Scalar> LineScroll<V, S> {
    /// Creates a controller for cells of `cell_width` in a viewport of `viewport_width`.
    ///
    /// Both widths must be finite and positive. The scroll offset starts at
    /// zero and no cells are bound yet.
    pub fn new(cell_width: S, viewport_width: S) -> Result<Self, LineScrollError> {
        let width = CellWidth::new(cell_width)?;
        let viewport_width = check_viewport_width(viewport_width)?;
        let reference = ReferencePoint::default();
        Ok(Self {
            width,
            viewport_width,
            offset: S::zero(),
            reference,
            index_bounds: None,
            window: None,
            cells: HashMap::new(),
            cell_indices: HashMap::new(),
            pool: CellPool::new(),
            current_index: reference.current_index(width, S::zero(), viewport_width),
            current_direction: false,
            callbacks: Callbacks::default(),
            dispatching: false,
        })
    }

    /// Sets the point of the viewport that decides the current index.
    ///
    /// Behaves like [`LineScroll::set_reference_point`].
    #[must_use]
    pub fn with_reference_point(mut self, reference: ReferencePoint) -> Self {
        // Rendering only fails without a factory, and a window implies one.
        if let Err(err) = self.apply_reference_point(reference) {
            log::warn!("LineScroll: reference point not applied: {err}");
        }
        self
    }

    /// Changes the point of the viewport that decides the current index.
    ///
    /// The current index stays current: the scroll offset is re-anchored so
    /// the index sits at the new reference point, and the window is diffed
    /// like a scroll update. Read [`LineScroll::scroll_offset`] afterwards to
    /// move the host scroll view.
    pub fn set_reference_point(
        &mut self,
        reference: ReferencePoint,
    ) -> Result<(), LineScrollError> {
        self.ensure_idle()?;
        self.apply_reference_point(reference)
    }

    /// Returns the point of the viewport that decides the current index.
    #[must_use]
    pub fn reference_point(&self) -> ReferencePoint {
        self.reference
    }

    /// Installs the constructor for cell views.
    ///
    /// Cells that are currently bound stay in place until the next
    /// [`LineScroll::reload_cells`]; pooled cells are discarded. Allowed from
    /// inside `will_show_index`: cells of the running dispatch are already
    /// bound, so the new factory takes effect on the next update.
    pub fn register_cell_class(&mut self, factory: impl FnMut() -> V + 'static) {
        self.pool.register_factory(factory);
    }

    /// Installs the filter deciding whether an index gets a cell.
    ///
    /// Allowed from inside `will_show_index`. The running dispatch has already
    /// consulted the filter, so the new one applies from the next update.
    pub fn set_should_show_index(&mut self, filter: impl FnMut(isize) -> bool + 'static) {
        self.callbacks.should_show_index = Some(Box::new(filter));
    }

    /// Installs the notification fired for each index entering the visible set.
    ///
    /// When called from inside `will_show_index`, the running dispatch keeps
    /// notifying the old callback and the replacement is used from the next
    /// update on.
    pub fn set_will_show_index(&mut self, callback: impl FnMut(&mut Self, isize, bool) + 'static) {
        self.callbacks.will_show_index = Some(Box::new(callback));
    }

    /// Installs the handler for [`LineScroll::touch_began`].
    pub fn set_touch_began(&mut self, handler: impl FnMut(Point) + 'static) {
        self.callbacks.touch_began = Some(Box::new(handler));
    }

    /// Installs the handler for [`LineScroll::touch_ended`].
    pub fn set_touch_ended(&mut self, handler: impl FnMut(Point) + 'static) {
        self.callbacks.touch_ended = Some(Box::new(handler));
    }

    /// Removes every installed callback.
    ///
    /// Fails with [`LineScrollError::ReentrantUpdate`] inside `will_show_index`,
    /// since the running callback would be reinstalled when dispatch ends.
    pub fn clear_callbacks(&mut self) -> Result<(), LineScrollError> {
        self.ensure_idle()?;
        self.callbacks = Callbacks::default();
        Ok(())
    }

    /// Restricts the indices accepted by [`LineScroll::set_current_index`].
    ///
    /// Scrolling is never restricted; use the
    /// [`should_show_index`](LineScroll::set_should_show_index) filter to
    /// leave out-of-range indices empty.
    pub fn set_index_bounds(&mut self, bounds: Option<RangeInclusive<isize>>) {
        self.index_bounds = bounds;
    }

    /// Returns the indices accepted by [`LineScroll::set_current_index`], if restricted.
    #[must_use]
    pub fn index_bounds(&self) -> Option<&RangeInclusive<isize>> {
        self.index_bounds.as_ref()
    }

    /// Applies a new scroll offset reported by the host.
    ///
    /// Offsets outside the data range are fine. Non-finite offsets are
    /// ignored.
    pub fn set_scroll_offset(&mut self, offset: S) -> Result<(), LineScrollError> {
        self.ensure_idle()?;
        if !offset.is_finite() {
            log::warn!("LineScroll: ignoring non-finite scroll offset {offset:?}");
            return Ok(());
        }
        self.ensure_factory()?;
        self.offset = offset;
        self.render(Render::Incremental)
    }

    /// Moves the viewport so that `index` becomes current, then reloads.
    ///
    /// Every bound index is notified with `is_reload == true`. Returns the new
    /// scroll offset, which the host should apply to its own scroll view.
    pub fn set_current_index(&mut self, index: isize) -> Result<S, LineScrollError> {
        self.ensure_idle()?;
        if let Some(bounds) = &self.index_bounds {
            if !bounds.contains(&index) {
                return Err(LineScrollError::IndexOutOfBounds {
                    index,
                    bounds: bounds.clone(),
                });
            }
        }
        self.ensure_factory()?;
        self.offset = self
            .reference
            .offset_for_current(self.width, index, self.viewport_width);
        log::debug!(
            "LineScroll: jumping to index {index} at offset {:?}",
            self.offset
        );
        self.render(Render::Reload)?;
        Ok(self.offset)
    }

    /// Releases every bound cell and binds the current window again.
    ///
    /// The filter is consulted afresh and every bound index is notified with
    /// `is_reload == true`.
    pub fn reload_cells(&mut self) -> Result<(), LineScrollError> {
        self.ensure_idle()?;
        self.ensure_factory()?;
        log::debug!("LineScroll: reloading {} cells", self.cells.len());
        self.render(Render::Reload)
    }

    /// Changes the width shared by all cells.
    ///
    /// The viewport is re-anchored so the current index stays current, and
    /// bound cells are reloaded at their new positions.
    pub fn set_cell_width(&mut self, cell_width: S) -> Result<(), LineScrollError> {
        self.ensure_idle()?;
        let width = CellWidth::new(cell_width)?;
        if width == self.width {
            return Ok(());
        }
        self.width = width;
        self.offset = self
            .reference
            .offset_for_current(width, self.current_index, self.viewport_width);
        if self.window.is_some() {
            self.render(Render::Reload)?;
        }
        Ok(())
    }

    /// Changes the viewport width.
    ///
    /// The window is diffed like a scroll update; cells that stay visible are
    /// not rebound.
    pub fn set_viewport_width(&mut self, viewport_width: S) -> Result<(), LineScrollError> {
        self.ensure_idle()?;
        let viewport_width = check_viewport_width(viewport_width)?;
        if viewport_width == self.viewport_width {
            return Ok(());
        }
        self.viewport_width = viewport_width;
        if self.window.is_some() {
            self.render(Render::Incremental)?;
        } else {
            self.refresh_current_index();
        }
        Ok(())
    }

    /// Forwards a touch-down at `point` (viewport-local) to the host callback.
    pub fn touch_began(&mut self, point: Point) {
        if let Some(handler) = self.callbacks.touch_began.as_mut() {
            handler(point);
        }
    }

    /// Forwards a touch-up at `point` (viewport-local) to the host callback.
    pub fn touch_ended(&mut self, point: Point) {
        if let Some(handler) = self.callbacks.touch_ended.as_mut() {
            handler(point);
        }
    }

    /// Returns the index of the cell under a viewport-local point.
    ///
    /// Only the X coordinate is used.
    #[must_use]
    pub fn index_at_point(&self, point: Point) -> isize {
        self.width.index_for_offset(self.offset + S::from_f64(point.x))
    }

    /// Returns the bound cell for `index`, if any.
    #[must_use]
    pub fn visible_cell_at_index(&self, index: isize) -> Option<&Cell<V, S>> {
        self.cells.get(&index)
    }

    /// Returns the bound cell for `index` mutably, if any.
    pub fn visible_cell_at_index_mut(&mut self, index: isize) -> Option<&mut Cell<V, S>> {
        self.cells.get_mut(&index)
    }

    /// Returns the index a visible cell is bound to.
    #[must_use]
    pub fn index_of_visible_cell(&self, cell: CellId) -> Option<isize> {
        self.cell_indices.get(&cell).copied()
    }

    /// Iterates bound cells in ascending index order.
    pub fn visible_cells(&self) -> impl Iterator<Item = &Cell<V, S>> {
        self.window
            .clone()
            .into_iter()
            .flatten()
            .filter_map(move |index| self.cells.get(&index))
    }

    /// Returns the number of bound cells.
    #[must_use]
    pub fn visible_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the logical visible window, including indices declined by the filter.
    #[must_use]
    pub fn visible_window(&self) -> Option<RangeInclusive<isize>> {
        self.window.clone()
    }

    /// Returns the current index.
    #[must_use]
    pub fn current_index(&self) -> isize {
        self.current_index
    }

    /// Returns `true` if the last change of the current index was a decrease.
    ///
    /// A decreasing index means the content offset is decreasing, i.e. the
    /// viewport is heading toward the start of the strip. The value is kept
    /// as long as the current index does not change.
    #[must_use]
    pub fn current_direction(&self) -> bool {
        self.current_direction
    }

    /// Returns the scroll offset last applied.
    #[must_use]
    pub fn scroll_offset(&self) -> S {
        self.offset
    }

    /// Returns the cell width.
    #[must_use]
    pub fn cell_width(&self) -> S {
        self.width.get()
    }

    /// Returns the viewport width.
    #[must_use]
    pub fn viewport_width(&self) -> S {
        self.viewport_width
    }

    /// Returns the cell pool.
    #[must_use]
    pub fn pool(&self) -> &CellPool<V, S> {
        &self.pool
    }

    /// Snapshot of the controller state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> LineScrollDebugInfo<S> {
        LineScrollDebugInfo {
            visible_window: self.window.clone(),
            bound_cells: self.cells.len(),
            current_index: self.current_index,
            current_direction: self.current_direction,
            scroll_offset: self.offset,
            cell_width: self.width.get(),
            viewport_width: self.viewport_width,
            reference_point: self.reference,
            pooled_cells: self.pool.pooled(),
            constructed_cells: self.pool.constructed(),
        }
    }

    fn ensure_idle(&self) -> Result<(), LineScrollError> {
        if self.dispatching {
            Err(LineScrollError::ReentrantUpdate)
        } else {
            Ok(())
        }
    }

    fn ensure_factory(&self) -> Result<(), LineScrollError> {
        if self.pool.has_factory() {
            Ok(())
        } else {
            Err(LineScrollError::NoFactoryRegistered)
        }
    }

    fn apply_reference_point(
        &mut self,
        reference: ReferencePoint,
    ) -> Result<(), LineScrollError> {
        if reference == self.reference {
            return Ok(());
        }
        self.reference = reference;
        self.offset =
            reference.offset_for_current(self.width, self.current_index, self.viewport_width);
        log::debug!(
            "LineScroll: reference point {reference:?}, offset {:?}",
            self.offset
        );
        if self.window.is_some() {
            self.render(Render::Incremental)?;
        }
        Ok(())
    }

    /// Brings the bound set in line with the window at the current offset.
    ///
    /// Callers check for a factory before changing any state, so the error
    /// path is only reached if that check is skipped.
    fn render(&mut self, mode: Render) -> Result<(), LineScrollError> {
        let next = self.width.visible_range(self.offset, self.viewport_width);
        let previous = self.window.take();
        let entering: IndexList = match (mode, &previous) {
            (Render::Incremental, Some(previous)) => {
                for index in difference(previous, &next) {
                    self.release_index(index);
                }
                difference(&next, previous).collect()
            }
            _ => {
                self.release_all();
                next.clone().collect()
            }
        };

        let mut bound = IndexList::new();
        for index in entering {
            if !self.callbacks.should_show(index) {
                log::trace!("LineScroll: index {index} declined by filter");
                continue;
            }
            let mut cell = self.pool.acquire(index)?;
            cell.place(self.width.offset_for_index(index), self.width.get());
            log::trace!("LineScroll: bound {:?} to index {index}", cell.id());
            self.cell_indices.insert(cell.id(), index);
            self.cells.insert(index, cell);
            bound.push(index);
        }

        if previous.as_ref() != Some(&next) {
            log::trace!("LineScroll: window {next:?}");
        }
        self.window = Some(next);
        self.refresh_current_index();
        self.dispatch_will_show(&bound, mode == Render::Reload);
        Ok(())
    }

    fn release_index(&mut self, index: isize) {
        if let Some(cell) = self.cells.remove(&index) {
            self.cell_indices.remove(&cell.id());
            log::trace!("LineScroll: retired {:?} from index {index}", cell.id());
            self.pool.release(cell);
        }
    }

    fn release_all(&mut self) {
        let mut bound: Vec<_> = self.cells.drain().map(|(_, cell)| cell).collect();
        self.cell_indices.clear();
        // Highest index first, so the lowest index is the first to be reused.
        bound.sort_unstable_by_key(|cell| Reverse(cell.index()));
        for cell in bound {
            self.pool.release(cell);
        }
    }

    fn refresh_current_index(&mut self) {
        let index = self
            .reference
            .current_index(self.width, self.offset, self.viewport_width);
        if index != self.current_index {
            self.current_direction = index < self.current_index;
            log::trace!(
                "LineScroll: current index {} -> {index}",
                self.current_index
            );
            self.current_index = index;
        }
    }

    fn dispatch_will_show(&mut self, indices: &[isize], is_reload: bool) {
        if indices.is_empty() {
            return;
        }
        let Some(mut callback) = self.callbacks.will_show_index.take() else {
            return;
        };
        self.dispatching = true;
        for &index in indices {
            callback(self, index, is_reload);
        }
        self.dispatching = false;
        // Keep a replacement installed from inside the callback.
        if self.callbacks.will_show_index.is_none() {
            self.callbacks.will_show_index = Some(callback);
        }
    }
}

/// Indices of `range` that are not in `other`, in ascending order.
fn difference(
    range: &RangeInclusive<isize>,
    other: &RangeInclusive<isize>,
) -> impl Iterator<Item = isize> {
    let (start, end) = (*range.start(), *range.end());
    let before = start..=end.min(other.start().saturating_sub(1));
    let after = start.max(other.end().saturating_add(1))..=end;
    before.chain(after)
}

impl<V: fmt::Debug, S: Scalar> fmt::Debug for LineScroll<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineScroll")
            .field("width", &self.width)
            .field("viewport_width", &self.viewport_width)
            .field("offset", &self.offset)
            .field("reference", &self.reference)
            .field("index_bounds", &self.index_bounds)
            .field("window", &self.window)
            .field("cells", &self.cells)
            .field("current_index", &self.current_index)
            .field("current_direction", &self.current_direction)
            .field("pool", &self.pool)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

/// Debug snapshot of a [`LineScroll`] state.
#[derive(Clone, Debug, PartialEq)]
pub struct LineScrollDebugInfo<S> {
    /// Logical visible window, `None` before the first render.
    pub visible_window: Option<RangeInclusive<isize>>,
    /// Number of bound cells (the window minus filtered gaps).
    pub bound_cells: usize,
    /// Current index.
    pub current_index: isize,
    /// Current direction; see [`LineScroll::current_direction`].
    pub current_direction: bool,
    /// Scroll offset last applied.
    pub scroll_offset: S,
    /// Cell width.
    pub cell_width: S,
    /// Viewport width.
    pub viewport_width: S,
    /// Reference point used for the current index.
    pub reference_point: ReferencePoint,
    /// Cells waiting in the pool.
    pub pooled_cells: usize,
    /// Cells constructed by the factory so far.
    pub constructed_cells: usize,
}
