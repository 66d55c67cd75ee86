// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `loupe::Viewer`, driven through a recording host.
//!
//! These walk the viewer through opening, navigating, zooming and closing the
//! way a shell would: forwarding input, reporting decodes and transition ends,
//! and calling `frame` with an advancing clock.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{
    FakeHost, decode_all, frames, gallery, open_ready, record_viewer, records, settle,
    until_ready, viewer_with,
};
use kurbo::{Point, Size, Vec2};
use loupe::{
    BoxFlags, BoxParams, CancellationToken, ContainerMotion, ControlId, DOWNLOAD, DownloadExtension, EmbedMedia,
    Extension, Hooks, ItemConfig, Key, Media, OpenRegistry, OverlayState, Phase, PointerId,
    PointerInput, Projection, SlideDirection, Source, SourceError, Viewer, ViewerConfig, ViewIndex,
};

fn slide(direction: SlideDirection) -> ContainerMotion {
    ContainerMotion::Slide {
        direction,
        duration: loupe::DEFAULT_ANIMATION_DURATION_MS,
    }
}

fn touch(id: u64, x: f64, y: f64) -> PointerInput {
    PointerInput::new(PointerId(id), Point::new(x, y))
}

#[test]
fn open_builds_window_and_activates_after_two_frames() {
    let mut viewer = record_viewer(5);
    viewer.open(0);

    assert_eq!(viewer.phase(), Phase::Opening);
    assert_eq!(viewer.current_index(), Some(0));
    let host = viewer.host();
    assert!(host.overlay_mounted);
    assert!(host.scroll_locked);
    assert_eq!(host.navigation_visible, Some(true));
    assert_eq!(host.index_display, "1 / 5");
    assert_eq!(
        host.description,
        ("Picture 0".to_owned(), "Image 1 of 5: Picture 0".to_owned())
    );
    assert!(host.disabled.contains(&ControlId::ZoomOut));
    let window: Vec<(isize, usize)> = viewer
        .boxes()
        .iter()
        .map(|b| (b.position(), b.index()))
        .collect();
    assert_eq!(window, [(-1, 4), (0, 0), (1, 1)]);

    frames(&mut viewer, 1);
    assert_eq!(viewer.phase(), Phase::Opening);
    frames(&mut viewer, 1);
    assert_eq!(viewer.phase(), Phase::Open);
    assert_eq!(viewer.host().overlay_states, [OverlayState::Active]);

    viewer.on_root_transition_end();
    assert!(viewer.is_settled());
    assert_eq!(
        viewer.host().overlay_states,
        [OverlayState::Active, OverlayState::Settled]
    );
}

#[test]
fn decoded_box_waits_then_reveals_to_full_size() {
    let mut viewer = record_viewer(3);
    viewer.open(0);
    decode_all(&mut viewer);

    frames(&mut viewer, 10);
    let current = viewer.current_box().unwrap();
    assert!(current.flags().contains(BoxFlags::LOADED));
    assert!(!current.is_ready());
    assert_eq!(current.state().width, 0.0);

    until_ready(&mut viewer);
    let current = viewer.current_box().unwrap();
    assert!(viewer.host().now >= loupe::REVEAL_DELAY_MS);
    assert!((current.state().width - current.bounds().full.width).abs() < 0.5);
    assert!((current.state().height - current.bounds().full.height).abs() < 0.5);
    assert_eq!(current.bounds().full, Size::new(800.0, 600.0));
}

#[test]
fn indices_wrap_in_both_directions() {
    let mut viewer = record_viewer(5);
    viewer.open(-1);
    assert_eq!(viewer.current_index(), Some(4));
    assert_eq!(viewer.host().index_display, "5 / 5");

    viewer.next();
    assert_eq!(viewer.current_index(), Some(0));
    assert_eq!(
        viewer.host().last_container(),
        Some(&slide(SlideDirection::Forward))
    );
    viewer.on_transition_end();

    viewer.host_mut().now += 1000;
    viewer.prev();
    assert_eq!(viewer.current_index(), Some(4));
    assert_eq!(
        viewer.host().last_container(),
        Some(&slide(SlideDirection::Backward))
    );

    let mut other = record_viewer(5);
    other.open(5);
    assert_eq!(other.current_index(), Some(0));
}

#[test]
fn slide_completes_on_transition_end() {
    let views = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&views);
    let hooks = Hooks::new().on_image_view(move |data| seen.borrow_mut().push(data.index));
    let mut viewer = viewer_with(
        Source::Records(records(5)),
        ViewerConfig::default(),
        hooks,
        FakeHost::default(),
        OpenRegistry::new(),
    );
    open_ready(&mut viewer, 0);
    views.borrow_mut().clear();
    let old: Vec<_> = viewer.boxes().iter().map(|b| b.id()).collect();

    viewer.host_mut().now += 1000;
    viewer.next();
    assert!(viewer.is_transitioning());
    assert!(views.borrow().is_empty());
    assert!(old.iter().all(|id| !viewer.host().detached.contains(id)));

    viewer.on_transition_end();
    assert!(!viewer.is_transitioning());
    assert_eq!(viewer.host().last_container(), Some(&ContainerMotion::Reset));
    assert_eq!(
        *views.borrow(),
        [ViewIndex {
            from: Some(0),
            to: 1
        }]
    );
    assert!(old.iter().all(|id| viewer.host().detached.contains(id)));
    assert_eq!(viewer.host().index_display, "2 / 5");
}

#[test]
fn jumps_swap_without_sliding() {
    let mut viewer = record_viewer(5);
    open_ready(&mut viewer, 0);
    viewer.host_mut().container.clear();

    viewer.host_mut().now += 1000;
    viewer.view(3);
    assert!(!viewer.is_transitioning());
    assert_eq!(viewer.current_index(), Some(3));
    assert_eq!(viewer.host().container, [ContainerMotion::Reset]);
}

#[test]
fn reduced_motion_and_custom_transitions_skip_the_slide() {
    let host = FakeHost {
        reduced_motion: true,
        ..FakeHost::default()
    };
    let mut viewer = viewer_with(
        Source::Records(records(3)),
        ViewerConfig::default(),
        Hooks::new(),
        host,
        OpenRegistry::new(),
    );
    viewer.open(0);
    viewer.next();
    assert!(!viewer.is_transitioning());

    let mut custom = viewer_with(
        Source::Records(records(3)),
        ViewerConfig::default(),
        Hooks::new().with_transition(|_, _| None),
        FakeHost::default(),
        OpenRegistry::new(),
    );
    custom.open(0);
    custom.next();
    assert!(!custom.is_transitioning());
    assert_eq!(custom.current_index(), Some(1));
}

#[test]
fn rapid_navigation_swaps_immediately_and_recovers() {
    let mut viewer = record_viewer(5);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    viewer.host_mut().now += 1000;
    viewer.next();
    assert!(viewer.is_transitioning());
    assert!(!viewer.is_rapid());
    let first: Vec<_> = viewer.boxes().iter().map(|b| b.id()).collect();
    viewer.host_mut().container.clear();

    viewer.host_mut().now += 50;
    viewer.next();
    assert_eq!(viewer.current_index(), Some(2));
    assert!(viewer.is_rapid());
    assert!(!viewer.is_transitioning());
    assert!(first.iter().all(|id| viewer.host().detached.contains(id)));
    assert!(
        viewer
            .host()
            .container
            .iter()
            .all(|m| !matches!(m, ContainerMotion::Slide { .. }))
    );

    frames(&mut viewer, 25);
    assert!(!viewer.is_rapid());
}

#[test]
fn next_window_keeps_the_look_of_an_item_already_shown() {
    let mut viewer = record_viewer(5);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);
    let neighbour = viewer.boxes().iter().find(|b| b.index() == 1).unwrap();
    assert!(neighbour.is_ready());
    let size = neighbour.state().size();

    viewer.host_mut().now += 1000;
    viewer.next();
    viewer.on_transition_end();
    let current = viewer.current_box().unwrap();
    assert!(current.flags().contains(BoxFlags::LOADED));
    assert_eq!(current.state().size(), size);

    decode_all(&mut viewer);
    assert!(viewer.current_box().unwrap().is_ready());
}

#[test]
fn single_item_hides_navigation_and_ignores_next() {
    let mut viewer = record_viewer(1);
    viewer.open(0);
    assert_eq!(viewer.host().navigation_visible, Some(false));
    viewer.next();
    viewer.prev();
    assert_eq!(viewer.current_index(), Some(0));
    assert!(viewer.host().container.is_empty());
}

#[test]
fn animated_close_releases_then_tears_down() {
    let closes = Rc::new(RefCell::new(0));
    let counted = Rc::clone(&closes);
    let hooks = Hooks::new().on_close(move |_| *counted.borrow_mut() += 1);
    let mut viewer = viewer_with(
        Source::Records(records(3)),
        ViewerConfig::default(),
        hooks,
        FakeHost::default(),
        OpenRegistry::new(),
    );
    open_ready(&mut viewer, 0);
    let ids: Vec<_> = viewer.boxes().iter().map(|b| b.id()).collect();

    let done = viewer.close(true);
    assert!(!done.is_resolved());
    assert_eq!(viewer.phase(), Phase::Closing);
    assert_eq!(
        viewer.host().overlay_states.last(),
        Some(&OverlayState::Closing)
    );
    let again = viewer.close(true);
    assert!(!again.is_resolved());

    viewer.on_root_transition_end();
    assert_eq!(viewer.boxes().len(), 3);
    viewer.on_root_transition_end();
    assert!(viewer.boxes().is_empty());
    assert!(ids.iter().all(|id| viewer.host().detached.contains(id)));
    assert!(!done.is_resolved());

    viewer.on_root_transition_end();
    assert!(done.is_resolved());
    assert!(again.is_resolved());
    assert_eq!(viewer.phase(), Phase::Closed);
    assert_eq!(viewer.current_index(), None);
    assert!(!viewer.host().overlay_mounted);
    assert!(!viewer.host().scroll_locked);
    assert_eq!(*closes.borrow(), 1);

    assert!(viewer.close(true).is_resolved());
    assert_eq!(*closes.borrow(), 1);
}

#[test]
fn closing_a_viewer_that_never_opened_is_a_no_op() {
    let closes = Rc::new(RefCell::new(0));
    let counted = Rc::clone(&closes);
    let mut viewer = viewer_with(
        Source::Records(records(3)),
        ViewerConfig::default(),
        Hooks::new().on_close(move |_| *counted.borrow_mut() += 1),
        FakeHost::default(),
        OpenRegistry::new(),
    );

    assert!(viewer.close(true).is_resolved());
    assert!(viewer.close(false).is_resolved());
    assert_eq!(viewer.phase(), Phase::Closed);
    assert!(viewer.host().overlay_states.is_empty());
    assert!(viewer.host().detached.is_empty());
    assert_eq!(*closes.borrow(), 0);
}

#[test]
fn transitions_observe_superseded_navigation() {
    let signals: Rc<RefCell<Vec<CancellationToken>>> = Rc::default();
    let seen = Rc::clone(&signals);
    let hooks = Hooks::new().with_transition(move |_, env| {
        seen.borrow_mut().push(env.signal.clone());
        Some(slide(SlideDirection::Forward))
    });
    let mut viewer = viewer_with(
        Source::Records(records(5)),
        ViewerConfig::default(),
        hooks,
        FakeHost::default(),
        OpenRegistry::new(),
    );
    open_ready(&mut viewer, 0);

    viewer.host_mut().now += 1000;
    viewer.next();
    viewer.on_transition_end();
    assert!(!signals.borrow()[0].is_cancelled());

    viewer.host_mut().now += 1000;
    viewer.next();
    assert!(!signals.borrow()[1].is_cancelled());
    viewer.host_mut().now += 1000;
    viewer.next();
    assert!(signals.borrow()[1].is_cancelled());
    assert!(!signals.borrow()[2].is_cancelled());

    viewer.close(false);
    assert!(signals.borrow()[2].is_cancelled());
    assert_eq!(signals.borrow().len(), 3);
}

#[test]
fn dropping_an_open_viewer_releases_the_registry() {
    let registry = OpenRegistry::new();
    let mut a = record_viewer_in(&registry);
    let mut b = record_viewer_in(&registry);
    a.open(0);
    assert!(registry.is_open());

    drop(a);
    assert!(!registry.is_open());
    b.open(0);
    assert_eq!(b.phase(), Phase::Opening);
}

fn record_viewer_in(registry: &OpenRegistry) -> Viewer<FakeHost> {
    viewer_with(
        Source::Records(records(2)),
        ViewerConfig::default(),
        Hooks::new(),
        FakeHost::default(),
        registry.clone(),
    )
}

#[test]
fn close_during_a_slide_finishes_the_swap() {
    let mut viewer = record_viewer(5);
    open_ready(&mut viewer, 0);
    viewer.host_mut().now += 1000;
    viewer.next();
    assert!(viewer.is_transitioning());

    let done = viewer.close(false);
    assert!(done.is_resolved());
    assert!(!viewer.is_transitioning());
    assert_eq!(viewer.phase(), Phase::Closed);
    // Three old boxes, three new ones.
    assert_eq!(viewer.host().detached.len(), 6);
}

#[test]
fn only_one_viewer_is_open_at_a_time() {
    let registry = OpenRegistry::new();
    let mut a = viewer_with(
        Source::Records(records(2)),
        ViewerConfig::default(),
        Hooks::new(),
        FakeHost::default(),
        registry.clone(),
    );
    let mut b = viewer_with(
        Source::Records(records(2)),
        ViewerConfig::default(),
        Hooks::new(),
        FakeHost::default(),
        registry.clone(),
    );

    a.open(0);
    b.open(0);
    assert_eq!(b.phase(), Phase::Closed);
    assert!(!b.host().overlay_mounted);

    b.next();
    assert_eq!(b.current_index(), None);

    a.close(false);
    assert!(!registry.is_open());
    b.open(1);
    assert_eq!(b.phase(), Phase::Opening);
}

#[test]
fn element_source_lifts_and_restores_thumbnails() {
    let host = FakeHost {
        elements: gallery(3),
        ..FakeHost::default()
    };
    let mut viewer = viewer_with(
        Source::Selector("a.gallery".into()),
        ViewerConfig::default(),
        Hooks::new(),
        host,
        OpenRegistry::new(),
    );
    assert_eq!(viewer.total(), 3);
    assert_eq!(viewer.host().bound.len(), 3);

    viewer.open(1);
    let current = viewer.current_box().unwrap();
    assert_eq!(current.config().src, "full1.jpg");
    let id = current.id();
    assert_eq!(viewer.host().taken, [loupe::ElementId(101)]);
    assert_eq!(viewer.host().hidden, [loupe::ElementId(2)]);
    assert!(
        viewer
            .host()
            .projections_of(id)
            .any(|p| matches!(p, Projection::Thumbnail(_)))
    );

    viewer.close(false);
    assert_eq!(viewer.host().restored, [loupe::ElementId(101)]);
    assert!(viewer.host().hidden.is_empty());

    viewer.destroy();
    assert!(viewer.host().bound.is_empty());
}

#[test]
fn invalid_sources_are_rejected() {
    let make = |source: Source| {
        Viewer::try_new(
            source,
            ViewerConfig::default(),
            Hooks::new(),
            FakeHost::default(),
            OpenRegistry::new(),
        )
        .map(|_| ())
    };
    assert_eq!(
        make(Source::Records(Vec::new())),
        Err(SourceError::EmptyRecords)
    );
    assert_eq!(
        make(Source::Records(vec![
            ItemConfig::new("a.jpg"),
            ItemConfig::new("")
        ])),
        Err(SourceError::MissingRecordSource(1))
    );
    assert_eq!(
        make(Source::Selector("a.none".into())),
        Err(SourceError::NoMatchingElements("a.none".into()))
    );
    assert!(
        Viewer::new(
            Source::Records(Vec::new()),
            ViewerConfig::default(),
            Hooks::new(),
            FakeHost::default(),
            OpenRegistry::new(),
        )
        .is_none()
    );
}

#[test]
fn failed_media_is_projected() {
    let mut viewer = record_viewer(3);
    viewer.open(0);
    let id = viewer.current_box().unwrap().id();
    viewer.on_media_failed(id, "404");

    assert!(viewer.current_box().unwrap().flags().contains(BoxFlags::FAILED));
    assert!(
        viewer
            .host()
            .projections_of(id)
            .any(|p| *p == Projection::Failed)
    );
}

#[test]
fn keyboard_zoom_updates_controls_and_reports_content() {
    let changes = Rc::new(RefCell::new(0));
    let counted = Rc::clone(&changes);
    let hooks = Hooks::new().on_content_change(move |_| *counted.borrow_mut() += 1);
    let mut viewer = viewer_with(
        Source::Records(records(3)),
        ViewerConfig::default(),
        hooks,
        FakeHost::default(),
        OpenRegistry::new(),
    );
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    assert!(viewer.key_down(Key::ArrowUp));
    // Throttled: a second step in the same instant is dropped.
    viewer.zoom_in();
    settle(&mut viewer);

    assert!(viewer.is_zoomed_in());
    assert!(!viewer.host().disabled.contains(&ControlId::ZoomOut));
    let width = viewer.current_box().unwrap().state().width;
    assert!((width - 800.0 * loupe::ZOOM_IN_FACTOR).abs() < 1.0);
    assert_eq!(*changes.borrow(), 1);

    assert!(!viewer.key_down(Key::Other));
}

#[test]
fn wheel_zooms_about_the_cursor() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    assert!(viewer.wheel(Point::new(100.0, 100.0), -120.0));
    assert_eq!(
        viewer.current_box().unwrap().anchor(),
        Point::new(100.0, 100.0)
    );
    settle(&mut viewer);
    assert!(viewer.is_zoomed_in());
    assert!(!viewer.wheel(Point::new(100.0, 100.0), 0.0));
}

#[test]
fn escape_closes_unless_keyboard_is_disabled() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    assert!(viewer.key_down(Key::Escape));
    assert_eq!(viewer.phase(), Phase::Closing);

    let mut quiet = viewer_with(
        Source::Records(records(3)),
        ViewerConfig::default().with_keyboard_listeners(false),
        Hooks::new(),
        FakeHost::default(),
        OpenRegistry::new(),
    );
    open_ready(&mut quiet, 0);
    assert!(!quiet.key_down(Key::Escape));
    assert_eq!(quiet.phase(), Phase::Open);
}

#[test]
fn swipe_down_closes_and_swipe_left_navigates() {
    let mut viewer = record_viewer(5);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    viewer.pointer_down(touch(1, 400.0, 300.0));
    viewer.pointer_move(touch(1, 300.0, 305.0));
    viewer.pointer_up(touch(1, 300.0, 305.0));
    assert_eq!(viewer.current_index(), Some(1));

    viewer.host_mut().now += 1000;
    viewer.pointer_down(touch(1, 400.0, 300.0));
    viewer.pointer_move(touch(1, 405.0, 350.0));
    viewer.pointer_move(touch(1, 405.0, 500.0));
    viewer.pointer_up(touch(1, 405.0, 500.0));
    assert_eq!(viewer.phase(), Phase::Closing);
}

#[test]
fn init_hook_replaces_swipe_navigation() {
    let mut viewer = viewer_with(
        Source::Records(records(3)),
        ViewerConfig::default(),
        Hooks::new().with_init(|_| {}),
        FakeHost::default(),
        OpenRegistry::new(),
    );
    open_ready(&mut viewer, 0);

    viewer.pointer_down(touch(1, 400.0, 300.0));
    viewer.pointer_move(touch(1, 405.0, 500.0));
    viewer.pointer_up(touch(1, 405.0, 500.0));
    assert_eq!(viewer.phase(), Phase::Open);
}

#[test]
fn pinch_release_keeps_zoom() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    viewer.pointer_down(touch(1, 350.0, 300.0));
    viewer.pointer_down(touch(2, 450.0, 300.0));
    viewer.pointer_move(touch(2, 500.0, 300.0));
    assert!(viewer.is_zoomed_in());
    viewer.pointer_up(touch(2, 500.0, 300.0));
    viewer.pointer_up(touch(1, 350.0, 300.0));

    let current = viewer.current_box().unwrap();
    assert!((current.state().width - 1200.0).abs() < 1.0);
    assert_eq!(current.state().transform.scale, 1.0);
    assert_eq!(viewer.phase(), Phase::Open);
}

#[test]
fn pinch_about_a_fixed_center_doubles_the_box() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    viewer.pointer_down(touch(1, 350.0, 300.0));
    viewer.pointer_down(touch(2, 450.0, 300.0));
    viewer.pointer_move(touch(1, 300.0, 300.0));
    viewer.pointer_move(touch(2, 500.0, 300.0));
    assert!((viewer.current_box().unwrap().state().transform.scale - 2.0).abs() < 1e-9);
    viewer.pointer_up(touch(2, 500.0, 300.0));

    let state = *viewer.current_box().unwrap().state();
    assert!((state.width - 1600.0).abs() < 1e-9);
    assert!((state.height - 1200.0).abs() < 1e-9);
    assert!(state.translate.hypot() < 1e-9);
}

/// Pinch about (400, 300) to twice the fitted size, then lift finger 2.
/// Finger 1 stays down at (300, 300).
fn pinch_to_double(viewer: &mut Viewer<FakeHost>) {
    viewer.pointer_down(touch(1, 350.0, 300.0));
    viewer.pointer_down(touch(2, 450.0, 300.0));
    viewer.pointer_move(touch(1, 300.0, 300.0));
    viewer.pointer_move(touch(2, 500.0, 300.0));
    viewer.pointer_up(touch(2, 500.0, 300.0));
}

#[test]
fn pinch_about_an_off_center_point_keeps_it_under_the_fingers() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    // (200, 150) is a quarter of the way into the fitted 800x600 box.
    viewer.pointer_down(touch(1, 150.0, 150.0));
    viewer.pointer_down(touch(2, 250.0, 150.0));
    viewer.pointer_move(touch(1, 100.0, 150.0));
    viewer.pointer_move(touch(2, 300.0, 150.0));
    viewer.pointer_up(touch(2, 300.0, 150.0));
    viewer.pointer_up(touch(1, 100.0, 150.0));

    let state = *viewer.current_box().unwrap().state();
    assert!((state.width - 1600.0).abs() < 1e-9);
    assert_eq!(state.transform.scale, 1.0);
    let bounds = state.bounds(Point::new(400.0, 300.0));
    let x = bounds.x0 + 0.25 * bounds.width();
    let y = bounds.y0 + 0.25 * bounds.height();
    assert!((x - 200.0).abs() < 1e-9, "x = {x}");
    assert!((y - 150.0).abs() < 1e-9, "y = {y}");
}

#[test]
fn remaining_finger_pans_from_where_it_is_after_a_pinch() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);
    pinch_to_double(&mut viewer);
    assert!(viewer.is_zoomed_in());
    let translate = viewer.current_box().unwrap().state().translate;

    // Past the pinch cooldown.
    frames(&mut viewer, 30);
    viewer.pointer_move(touch(1, 301.0, 300.0));
    let state = *viewer.current_box().unwrap().state();
    assert_eq!(state.transform.offset(), Vec2::ZERO);
    assert_eq!(state.translate, translate);

    viewer.pointer_move(touch(1, 311.0, 300.0));
    let state = *viewer.current_box().unwrap().state();
    assert!((state.transform.x - 10.0).abs() < 1e-9);
    assert_eq!(state.transform.y, 0.0);
    assert_eq!(state.transform.scale, 1.0);
}

#[test]
fn second_finger_during_a_drag_keeps_the_pan() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);
    pinch_to_double(&mut viewer);
    viewer.pointer_up(touch(1, 300.0, 300.0));
    frames(&mut viewer, 30);

    viewer.pointer_down(touch(1, 400.0, 300.0));
    viewer.pointer_move(touch(1, 450.0, 300.0));
    assert!((viewer.current_box().unwrap().state().transform.x - 50.0).abs() < 1e-9);

    viewer.pointer_down(touch(2, 550.0, 300.0));
    let state = *viewer.current_box().unwrap().state();
    assert!((state.translate.x - 50.0).abs() < 1e-9);
    assert_eq!(state.transform.offset(), Vec2::ZERO);

    // Both fingers hold still: the content does not move.
    viewer.pointer_move(touch(2, 550.0, 300.0));
    let state = *viewer.current_box().unwrap().state();
    assert!((state.translate.x + state.transform.x - 50.0).abs() < 1e-9);
    assert_eq!(state.transform.scale, 1.0);
    assert!((state.width - 1600.0).abs() < 1e-9);
}

#[test]
fn pinch_below_close_threshold_closes_on_next_frame() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    viewer.pointer_down(touch(1, 350.0, 300.0));
    viewer.pointer_down(touch(2, 450.0, 300.0));
    viewer.pointer_move(touch(1, 380.0, 300.0));
    viewer.pointer_move(touch(2, 420.0, 300.0));
    viewer.pointer_up(touch(1, 380.0, 300.0));
    assert_eq!(viewer.phase(), Phase::Open);

    frames(&mut viewer, 1);
    assert_eq!(viewer.phase(), Phase::Closing);
}

#[test]
fn deactivated_controls_return_on_the_next_swap() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    viewer.deactivate_ui(&[ControlId::ZoomIn], None);
    assert!(viewer.host().disabled.contains(&ControlId::ZoomIn));
    viewer.zoom_in();
    viewer.activate_control(&ControlId::ZoomIn);
    settle(&mut viewer);
    assert!(!viewer.is_zoomed_in());

    viewer.host_mut().now += 1000;
    viewer.next();
    assert!(viewer.ui().deactivated().is_empty());
    assert!(!viewer.host().disabled.contains(&ControlId::ZoomIn));
}

#[test]
fn download_control_downloads_current_item() {
    let mut viewer = record_viewer(3).with_extension(DownloadExtension::new());
    open_ready(&mut viewer, 0);
    assert_eq!(viewer.host().overlay_controls, [DOWNLOAD]);

    viewer.activate_control(&ControlId::extension(DOWNLOAD));
    assert_eq!(
        viewer.host().downloads,
        [("img0.jpg".to_owned(), "Picture 0.jpg".to_owned())]
    );
}

#[derive(Debug)]
struct EmbedSecond;

impl Extension for EmbedSecond {
    fn name(&self) -> &str {
        "embed-second"
    }

    fn initialize_box(&mut self, params: &BoxParams<'_>) -> Option<Box<dyn Media>> {
        if params.index != 1 {
            return None;
        }
        Some(Box::new(EmbedMedia::new("https://video.example/1")))
    }
}

#[test]
fn extensions_can_supply_media() {
    let mut viewer = record_viewer(3).with_extension(EmbedSecond);
    viewer.open(1);
    let current = viewer.current_box().unwrap();
    assert_eq!(current.media().kind(), "embed");
    assert_eq!(current.source(), "https://video.example/1");
    let id = current.id();
    assert!(viewer.host().loads.iter().all(|(load, _)| *load != id));
    assert_eq!(viewer.host().loads.len(), 2);

    decode_all(&mut viewer);
    until_ready(&mut viewer);
    let current = viewer.current_box().unwrap();
    assert!((current.state().width - 800.0).abs() < 0.5);
    assert!((current.state().height - 450.0).abs() < 0.5);
}

#[test]
fn resize_refits_boxes_at_rest() {
    let mut viewer = record_viewer(3);
    open_ready(&mut viewer, 0);
    settle(&mut viewer);

    viewer.host_mut().viewport = Some(Size::new(400.0, 300.0));
    viewer.resize();
    let current = viewer.current_box().unwrap();
    assert_eq!(current.bounds().full, Size::new(400.0, 300.0));
    assert_eq!(current.state().width, 400.0);
}

#[test]
fn late_decodes_are_ignored() {
    let mut viewer = record_viewer(3);
    viewer.open(0);
    let ids = viewer.host_mut().take_loads();
    viewer.close(false);
    for id in ids {
        viewer.on_media_loaded(id, Size::new(10.0, 10.0));
    }
    assert_eq!(viewer.phase(), Phase::Closed);
}
