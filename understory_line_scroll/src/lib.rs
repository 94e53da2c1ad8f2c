// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_line_scroll --heading-base-level=0

//! Understory Line Scroll: the core of a horizontally scrolling line selector.
//!
//! A line selector is a strip of equally wide cells, one of which is the
//! logically *current* one. This crate owns the part that is easy to get
//! wrong: deciding which indices are visible for a scroll offset, recycling
//! cell views as indices enter and leave the viewport, and keeping a stable
//! current index and scroll direction while the offset changes continuously.
//!
//! The pieces, leaves first:
//!
//! - [`geometry`]: exact mappings between offsets and indices
//!   ([`index_for_offset`], [`offset_for_index`], [`visible_range`]) plus the
//!   validated [`CellWidth`] and the [`ReferencePoint`] deciding which cell is
//!   current.
//! - [`CellPool`]: constructs cell views through a registered factory and
//!   reuses retired ones, so steady-state scrolling never allocates views.
//! - [`LineScroll`]: the controller. It owns the visible window, diffs it on
//!   every scroll update, binds and retires [`Cell`]s, and notifies the host.
//!
//! This crate deliberately does **not** know about view hierarchies, touch
//! recognition, or styling. Host frameworks are responsible for:
//!
//! - Calling [`LineScroll::set_scroll_offset`] whenever their scroll view moves.
//! - Applying the offset returned by [`LineScroll::set_current_index`] to their
//!   scroll view after an explicit jump.
//! - Placing each bound cell's view at [`Cell::offset`] in content coordinates,
//!   typically from the `will_show_index` callback.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_line_scroll::LineScroll;
//!
//! // Cells 50 wide in a 320 wide viewport; the views are plain labels here.
//! let mut line = LineScroll::<String, f64>::new(50.0, 320.0).unwrap();
//! line.register_cell_class(String::new);
//!
//! // Configure each cell as it becomes visible.
//! line.set_will_show_index(|line, index, _is_reload| {
//!     if let Some(cell) = line.visible_cell_at_index_mut(index) {
//!         *cell.view_mut() = format!("#{index}");
//!     }
//! });
//!
//! line.reload_cells().unwrap();
//! assert_eq!(line.visible_window(), Some(0..=6));
//!
//! // Scroll one and a half cells; only the cells that entered are bound.
//! line.set_scroll_offset(75.0).unwrap();
//! assert_eq!(line.visible_window(), Some(1..=7));
//! assert_eq!(line.visible_cell_at_index(7).unwrap().view(), "#7");
//! assert_eq!(line.current_index(), 1);
//!
//! // Jump to index 7; the host applies the returned offset to its scroll view.
//! let offset = line.set_current_index(7).unwrap();
//! assert_eq!(offset, 350.0);
//! assert_eq!(line.visible_window(), Some(7..=13));
//! ```
//!
//! ## Filtering
//!
//! Indices outside the data range are not an error; elastic overscroll simply
//! produces them. Install a filter with [`LineScroll::set_should_show_index`]
//! to leave them empty. Declined indices are gaps: no cell is bound, no
//! notification fires, and neighbouring cells do not shift.
//!
//! All widths and offsets live in a caller-chosen 1D coordinate space
//! (typically logical pixels). This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod callbacks;
mod cell;
mod error;
pub mod geometry;
mod line_scroll;
mod pool;
mod scalar;

pub use callbacks::{ShouldShowIndex, TouchHandler, WillShowIndex};
pub use cell::{Cell, CellId};
pub use error::LineScrollError;
pub use geometry::{CellWidth, ReferencePoint, index_for_offset, offset_for_index, visible_range};
pub use line_scroll::{LineScroll, LineScrollDebugInfo};
pub use pool::CellPool;
pub use scalar::Scalar;
