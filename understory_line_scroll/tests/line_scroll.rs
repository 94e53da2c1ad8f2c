// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_line_scroll` crate.
//!
//! These drive [`LineScroll`] the way a host scroll view would and check the
//! bound cell set, the notifications it produces, and the recycling behavior
//! of the pool underneath.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use understory_line_scroll::{LineScroll, LineScrollError, ReferencePoint};

type Log = Rc<RefCell<Vec<(isize, bool)>>>;

/// A 50-wide cell strip in a 320-wide viewport whose views record their serial number.
fn line_scroll() -> LineScroll<u32, f64> {
    let mut line = LineScroll::new(50.0, 320.0).unwrap();
    let mut serial = 0;
    line.register_cell_class(move || {
        serial += 1;
        serial
    });
    line
}

fn record_will_show(line: &mut LineScroll<u32, f64>) -> Log {
    let log = Log::default();
    let sink = Rc::clone(&log);
    line.set_will_show_index(move |_, index, is_reload| {
        sink.borrow_mut().push((index, is_reload));
    });
    log
}

fn bound_indices(line: &LineScroll<u32, f64>) -> Vec<isize> {
    line.visible_cells().filter_map(|cell| cell.index()).collect()
}

#[test]
fn initial_reload_binds_leading_window() {
    let mut line = line_scroll();
    let log = record_will_show(&mut line);

    line.reload_cells().unwrap();

    assert_eq!(line.visible_window(), Some(0..=6));
    assert_eq!(bound_indices(&line), [0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(
        *log.borrow(),
        (0..=6).map(|i| (i, true)).collect::<Vec<_>>()
    );
    for cell in line.visible_cells() {
        let index = cell.index().unwrap();
        assert_eq!(cell.offset(), index as f64 * 50.0);
        assert_eq!(cell.width(), 50.0);
    }
}

#[test]
fn scrolling_notifies_only_entering_indices() {
    let mut line = line_scroll();
    line.reload_cells().unwrap();
    let log = record_will_show(&mut line);
    let kept = line.visible_cell_at_index(3).unwrap().id();

    line.set_scroll_offset(110.0).unwrap();

    assert_eq!(line.visible_window(), Some(2..=8));
    assert_eq!(*log.borrow(), [(7, false), (8, false)]);
    // Cells that stay visible are not rebound.
    assert_eq!(line.visible_cell_at_index(3).unwrap().id(), kept);
    assert!(line.visible_cell_at_index(0).is_none());
    assert!(line.visible_cell_at_index(1).is_none());
}

#[test]
fn current_index_jump_reloads_new_window() {
    let mut line = line_scroll();
    line.reload_cells().unwrap();
    let log = record_will_show(&mut line);

    let offset = line.set_current_index(7).unwrap();

    assert_eq!(offset, 350.0);
    assert_eq!(line.scroll_offset(), 350.0);
    assert_eq!(line.current_index(), 7);
    assert_eq!(line.visible_window(), Some(7..=13));
    assert_eq!(
        *log.borrow(),
        (7..=13).map(|i| (i, true)).collect::<Vec<_>>()
    );
    // The jump reused the seven cells of the first window.
    assert_eq!(line.pool().constructed(), 7);
}

#[test]
fn declined_index_is_a_gap() {
    let mut line = line_scroll();
    let log = record_will_show(&mut line);
    line.set_should_show_index(|index| index != 3);

    line.reload_cells().unwrap();

    assert_eq!(line.visible_window(), Some(0..=6));
    assert!(line.visible_cell_at_index(3).is_none());
    assert_eq!(bound_indices(&line), [0, 1, 2, 4, 5, 6]);
    assert_eq!(line.pool().constructed(), 6);
    assert!(log.borrow().iter().all(|&(index, _)| index != 3));
    // Neighbours keep their own positions.
    assert_eq!(line.visible_cell_at_index(4).unwrap().offset(), 200.0);
}

#[test]
fn overscroll_indices_can_be_declined() {
    let mut line = line_scroll();
    line.set_should_show_index(|index| (0..20).contains(&index));
    line.reload_cells().unwrap();

    line.set_scroll_offset(-60.0).unwrap();

    assert_eq!(line.visible_window(), Some(-2..=5));
    assert_eq!(bound_indices(&line), [0, 1, 2, 3, 4, 5]);
    assert_eq!(line.current_index(), -2);
}

#[test]
fn window_stays_contiguous_while_scrolling() {
    let mut line = line_scroll();
    line.reload_cells().unwrap();

    let mut offset = 0.0;
    for step in [13.0, 47.5, 120.0, -33.0, 500.0, -800.0, 0.25, 49.75] {
        offset += step;
        line.set_scroll_offset(offset).unwrap();

        let window = line.visible_window().unwrap();
        let bound = bound_indices(&line);
        assert_eq!(bound, window.clone().collect::<Vec<_>>(), "offset {offset}");
        assert_eq!(line.visible_cell_count(), bound.len());
        for cell in line.visible_cells() {
            assert_eq!(line.index_of_visible_cell(cell.id()), cell.index());
        }
    }
}

#[test]
fn pool_never_grows_past_window_size() {
    let mut line = line_scroll();
    // A viewport of exactly six cells always straddles seven of them.
    line.set_viewport_width(300.0).unwrap();
    line.reload_cells().unwrap();
    let window_size = line.visible_cell_count();
    assert_eq!(window_size, 7);

    for tick in 0..2_000 {
        line.set_scroll_offset(f64::from(tick) * 10.0).unwrap();
        assert_eq!(line.visible_cell_count(), window_size);
    }
    for tick in (0..500).rev() {
        line.set_scroll_offset(f64::from(tick) * 50.0).unwrap();
    }

    assert_eq!(line.pool().constructed(), window_size);
}

#[test]
fn direction_follows_index_changes_and_holds_otherwise() {
    let mut line = line_scroll();
    line.reload_cells().unwrap();
    assert!(!line.current_direction());

    line.set_scroll_offset(260.0).unwrap();
    assert_eq!(line.current_index(), 5);
    assert!(!line.current_direction());

    line.set_scroll_offset(140.0).unwrap();
    assert_eq!(line.current_index(), 2);
    assert!(line.current_direction());

    // Same index, moved within the cell: direction is kept.
    line.set_scroll_offset(149.0).unwrap();
    assert_eq!(line.current_index(), 2);
    assert!(line.current_direction());

    line.set_scroll_offset(101.0).unwrap();
    assert!(line.current_direction());

    line.set_current_index(9).unwrap();
    assert!(!line.current_direction());

    // Reloading without moving does not touch the direction.
    line.reload_cells().unwrap();
    assert!(!line.current_direction());
}

#[test]
fn reload_is_idempotent() {
    let mut line = line_scroll();
    line.set_should_show_index(|index| index % 4 != 1);
    line.set_scroll_offset(130.0).unwrap();
    let log = record_will_show(&mut line);

    line.reload_cells().unwrap();
    let first_bound = bound_indices(&line);
    let first_ids: Vec<_> = line.visible_cells().map(|cell| cell.id()).collect();
    let first_log = log.take();

    line.reload_cells().unwrap();
    let second_ids: Vec<_> = line.visible_cells().map(|cell| cell.id()).collect();

    assert_eq!(bound_indices(&line), first_bound);
    assert_eq!(second_ids, first_ids);
    assert_eq!(*log.borrow(), first_log);
    assert_eq!(first_bound, [2, 3, 4, 6, 7, 8]);
}

#[test]
fn callbacks_can_query_but_not_recompute() {
    let mut line = line_scroll();
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    line.set_will_show_index(move |line, index, _| {
        let cell = line.visible_cell_at_index(index).expect("entering index is bound");
        assert_eq!(line.index_of_visible_cell(cell.id()), Some(index));
        sink.borrow_mut().push(line.reload_cells());
        sink.borrow_mut().push(line.set_scroll_offset(999.0));
        sink.borrow_mut().push(line.set_current_index(0).map(|_| ()));
        sink.borrow_mut().push(line.set_reference_point(ReferencePoint::Center));
        sink.borrow_mut().push(line.clear_callbacks());
    });

    line.reload_cells().unwrap();

    assert_eq!(outcomes.borrow().len(), 35);
    assert!(
        outcomes
            .borrow()
            .iter()
            .all(|outcome| *outcome == Err(LineScrollError::ReentrantUpdate))
    );
    assert_eq!(line.scroll_offset(), 0.0);
    assert_eq!(line.visible_window(), Some(0..=6));
    assert_eq!(line.reference_point(), ReferencePoint::LeadingEdge);

    // Outside of dispatch everything works again.
    line.set_scroll_offset(50.0).unwrap();
    assert_eq!(line.visible_window(), Some(1..=7));
}

#[test]
fn callbacks_installed_during_dispatch_apply_to_next_update() {
    let mut line = line_scroll();
    let first = Log::default();
    let second = Log::default();
    let first_sink = Rc::clone(&first);
    let second_sink = Rc::clone(&second);
    line.set_will_show_index(move |line, index, is_reload| {
        first_sink.borrow_mut().push((index, is_reload));
        if index == 0 {
            let sink = Rc::clone(&second_sink);
            line.set_will_show_index(move |_, index, is_reload| {
                sink.borrow_mut().push((index, is_reload));
            });
            line.set_should_show_index(|index| index != 8);
            line.register_cell_class(|| 100);
        }
    });

    line.reload_cells().unwrap();
    // The running dispatch finishes with the callback it started with.
    assert_eq!(
        *first.borrow(),
        (0..=6).map(|i| (i, true)).collect::<Vec<_>>()
    );
    assert!(second.borrow().is_empty());

    line.set_scroll_offset(100.0).unwrap();
    assert_eq!(first.borrow().len(), 7);
    assert_eq!(*second.borrow(), [(7, false)]);
    assert!(line.visible_cell_at_index(8).is_none());
    assert_eq!(*line.visible_cell_at_index(7).unwrap().view(), 100);
    // Cells from the replaced factory are dropped, not pooled.
    assert_eq!(line.pool().pooled(), 0);
}

#[test]
fn reference_point_change_keeps_current_index() {
    let mut line = line_scroll();
    line.set_scroll_offset(260.0).unwrap();
    line.set_scroll_offset(140.0).unwrap();
    assert_eq!(line.current_index(), 2);
    assert!(line.current_direction());
    let kept = line.visible_cell_at_index(3).unwrap().id();

    line.set_reference_point(ReferencePoint::Center).unwrap();

    assert_eq!(line.current_index(), 2);
    assert!(line.current_direction());
    // The centre of cell 2 now sits at the viewport centre.
    assert_eq!(line.scroll_offset(), -35.0);
    assert_eq!(line.visible_window(), Some(-1..=5));
    // The window was diffed, not reloaded.
    assert_eq!(line.visible_cell_at_index(3).unwrap().id(), kept);

    // Organic scrolling now uses the centre.
    line.set_scroll_offset(40.0).unwrap();
    assert_eq!(line.current_index(), 4);
    assert!(!line.current_direction());
}

#[test]
fn current_index_respects_bounds() {
    let mut line = line_scroll();
    line.set_index_bounds(Some(0..=9));

    assert_eq!(
        line.set_current_index(10),
        Err(LineScrollError::IndexOutOfBounds {
            index: 10,
            bounds: 0..=9
        })
    );
    assert_eq!(line.visible_window(), None);
    assert_eq!(line.set_current_index(9), Ok(450.0));
}

#[test]
fn operations_before_factory_fail_fast() {
    let mut line = LineScroll::<u32, f64>::new(50.0, 320.0).unwrap();
    assert_eq!(line.reload_cells(), Err(LineScrollError::NoFactoryRegistered));
    assert_eq!(
        line.set_current_index(3),
        Err(LineScrollError::NoFactoryRegistered)
    );
    // Configuration still works without cells.
    line.set_cell_width(40.0).unwrap();
    assert_eq!(line.cell_width(), 40.0);
}

#[test]
fn new_cell_class_applies_after_reload() {
    let mut line = line_scroll();
    line.reload_cells().unwrap();

    line.register_cell_class(|| 100);
    line.set_scroll_offset(50.0).unwrap();
    // Existing cells stay; the entering index gets a view from the new factory.
    assert!(line.visible_cell_at_index(1).unwrap().view() < &100);
    assert_eq!(*line.visible_cell_at_index(7).unwrap().view(), 100);

    line.reload_cells().unwrap();
    assert!(line.visible_cells().all(|cell| *cell.view() == 100));
}

#[test]
fn touches_are_forwarded_and_mapped() {
    let mut line = line_scroll();
    line.set_scroll_offset(25.0).unwrap();

    let touches = Rc::new(RefCell::new(Vec::new()));
    let began = Rc::clone(&touches);
    let ended = Rc::clone(&touches);
    line.set_touch_began(move |point| began.borrow_mut().push(("began", point)));
    line.set_touch_ended(move |point| ended.borrow_mut().push(("ended", point)));

    let point = Point::new(30.0, 12.0);
    line.touch_began(point);
    line.touch_ended(point);

    assert_eq!(*touches.borrow(), [("began", point), ("ended", point)]);
    assert_eq!(line.index_at_point(point), 1);
    assert_eq!(line.index_at_point(Point::new(10.0, 0.0)), 0);

    line.clear_callbacks().unwrap();
    line.touch_began(point);
    assert_eq!(touches.borrow().len(), 2);
}

#[test]
fn f32_coordinates_are_supported() {
    let mut line = LineScroll::<(), f32>::new(0.1, 1.0).unwrap();
    line.register_cell_class(|| ());
    line.set_current_index(30).unwrap();
    assert_eq!(line.current_index(), 30);
    assert_eq!(line.visible_window().map(|w| *w.start()), Some(30));
}
