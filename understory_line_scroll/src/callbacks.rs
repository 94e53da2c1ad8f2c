// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional host hooks consulted or notified by [`LineScroll`].
//!
//! Every slot defaults to the permissive no-op: all indices are shown and no
//! notifications are delivered.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;

use crate::LineScroll;

/// Filter deciding whether an index gets a cell at all.
///
/// Declined indices stay in the logical window as gaps; their neighbours do
/// not shift.
pub type ShouldShowIndex = Box<dyn FnMut(isize) -> bool>;

/// Notification fired once for each index entering the visible set.
///
/// The flag is `true` when the index was bound by a reload or an explicit
/// current-index jump and `false` during incremental scrolling. The callback
/// receives the controller so it can look up and configure the new cell;
/// state-changing calls made from here fail with
/// [`LineScrollError::ReentrantUpdate`](crate::LineScrollError::ReentrantUpdate).
pub type WillShowIndex<V, S> = Box<dyn FnMut(&mut LineScroll<V, S>, isize, bool)>;

/// Raw touch forwarding, in viewport-local coordinates.
pub type TouchHandler = Box<dyn FnMut(Point)>;

pub(crate) struct Callbacks<V, S> {
    pub(crate) should_show_index: Option<ShouldShowIndex>,
    pub(crate) will_show_index: Option<WillShowIndex<V, S>>,
    pub(crate) touch_began: Option<TouchHandler>,
    pub(crate) touch_ended: Option<TouchHandler>,
}

impl<V, S> Callbacks<V, S> {
    pub(crate) fn should_show(&mut self, index: isize) -> bool {
        self.should_show_index.as_mut().is_none_or(|f| f(index))
    }
}

impl<V, S> Default for Callbacks<V, S> {
    fn default() -> Self {
        Self {
            should_show_index: None,
            will_show_index: None,
            touch_began: None,
            touch_ended: None,
        }
    }
}

impl<V, S> fmt::Debug for Callbacks<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("should_show_index", &self.should_show_index.is_some())
            .field("will_show_index", &self.will_show_index.is_some())
            .field("touch_began", &self.touch_began.is_some())
            .field("touch_ended", &self.touch_ended.is_some())
            .finish()
    }
}
