#![allow(clippy::float_cmp)]

use super::*;
use crate::fixtures_test::{MockStage, MockViewer};
use crate::geometry::Point;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn snapshot(x: f64, y: f64, zoom: f64, image_width: f64, container_width: f64) -> Snapshot {
    Snapshot {
        viewport: ViewportState { bounds_top_left: Point::new(x, y), zoom },
        content: Size::new(image_width, image_width),
        container: Size::new(container_width, container_width * 0.75),
    }
}

// =============================================================
// compute_transform
// =============================================================

#[test]
fn worked_example_scale_and_offset() {
    let t = compute_transform(&snapshot(0.25, 0.25, 2.0, 1000.0, 800.0)).unwrap();
    assert!(approx_eq(t.scale, 1.6));
    assert!(approx_eq(t.offset_x, -400.0));
    assert!(approx_eq(t.offset_y, -400.0));
}

#[test]
fn home_view_maps_image_width_to_container_width() {
    // Zoom 1 with bounds at the origin shows the full image width.
    let t = compute_transform(&snapshot(0.0, 0.0, 1.0, 4000.0, 1000.0)).unwrap();
    assert!(approx_eq(t.scale, 0.25));
    let right_edge = t.image_to_screen(Point::new(4000.0, 0.0));
    assert!(approx_eq(right_edge.x, 1000.0));
}

#[test]
fn origin_lands_on_visible_top_left() {
    let snap = snapshot(0.1, 0.3, 3.0, 2000.0, 500.0);
    let t = compute_transform(&snap).unwrap();
    // The visible top-left corner in image pixels is bounds * image_width.
    let visible_top_left = Point::new(0.1 * 2000.0, 0.3 * 2000.0);
    let screen = t.image_to_screen(visible_top_left);
    assert!(approx_eq(screen.x, 0.0));
    assert!(approx_eq(screen.y, 0.0));
}

#[test]
fn negative_bounds_shift_image_right_and_down() {
    let t = compute_transform(&snapshot(-0.5, -0.25, 1.0, 1000.0, 800.0)).unwrap();
    assert!(approx_eq(t.offset_x, 400.0));
    assert!(approx_eq(t.offset_y, 200.0));
}

#[test]
fn scale_is_uniform_regardless_of_container_height() {
    let mut snap = snapshot(0.0, 0.0, 1.5, 1200.0, 600.0);
    let a = compute_transform(&snap).unwrap();
    snap.container.height = 10.0;
    let b = compute_transform(&snap).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_container_height_still_computes() {
    let mut snap = snapshot(0.0, 0.0, 1.0, 1000.0, 500.0);
    snap.container.height = 0.0;
    assert!(compute_transform(&snap).is_ok());
}

#[test]
fn zero_image_width_is_empty_content() {
    let err = compute_transform(&snapshot(0.0, 0.0, 1.0, 0.0, 800.0)).unwrap_err();
    assert_eq!(err, SkipReason::EmptyContent);
}

#[test]
fn nan_image_width_is_empty_content() {
    let err = compute_transform(&snapshot(0.0, 0.0, 1.0, f64::NAN, 800.0)).unwrap_err();
    assert_eq!(err, SkipReason::EmptyContent);
}

#[test]
fn zero_container_width_is_empty_container() {
    let err = compute_transform(&snapshot(0.0, 0.0, 1.0, 1000.0, 0.0)).unwrap_err();
    assert_eq!(err, SkipReason::EmptyContainer);
}

#[test]
fn zero_zoom_is_degenerate() {
    let err = compute_transform(&snapshot(0.0, 0.0, 0.0, 1000.0, 800.0)).unwrap_err();
    assert_eq!(err, SkipReason::Degenerate);
}

#[test]
fn negative_zoom_is_degenerate() {
    let err = compute_transform(&snapshot(0.0, 0.0, -2.0, 1000.0, 800.0)).unwrap_err();
    assert_eq!(err, SkipReason::Degenerate);
}

#[test]
fn infinite_bounds_is_degenerate() {
    let err = compute_transform(&snapshot(f64::INFINITY, 0.0, 1.0, 1000.0, 800.0)).unwrap_err();
    assert_eq!(err, SkipReason::Degenerate);
}

// =============================================================
// Snapshot::read
// =============================================================

#[test]
fn read_without_viewport_is_no_viewport() {
    let viewer = MockViewer::ready();
    viewer.set_has_viewport(false);
    assert_eq!(Snapshot::read(&viewer, ViewportReading::Target), Err(SkipReason::NoViewport));
}

#[test]
fn read_when_closed_is_not_open() {
    let viewer = MockViewer::ready();
    viewer.set_open(false);
    assert_eq!(Snapshot::read(&viewer, ViewportReading::Target), Err(SkipReason::NotOpen));
}

#[test]
fn read_without_content_is_no_content() {
    let viewer = MockViewer::ready();
    viewer.set_content(None);
    assert_eq!(Snapshot::read(&viewer, ViewportReading::Target), Err(SkipReason::NoContent));
}

#[test]
fn read_picks_target_or_current() {
    let viewer = MockViewer::ready();
    viewer.set_current_view(0.5, 0.5, 4.0);
    let target = Snapshot::read(&viewer, ViewportReading::Target).unwrap();
    let current = Snapshot::read(&viewer, ViewportReading::Current).unwrap();
    assert_eq!(target.viewport.zoom, 2.0);
    assert_eq!(current.viewport.zoom, 4.0);
}

// =============================================================
// SyncEngine::sync
// =============================================================

#[test]
fn sync_applies_size_transform_and_draw() {
    let viewer = MockViewer::ready();
    let mut stage = MockStage::default();
    let mut engine = SyncEngine::default();

    let outcome = engine.sync(&viewer, &mut stage);

    let t = outcome.transform().unwrap();
    assert!(approx_eq(t.scale, 1.6));
    assert_eq!(stage.size(), Some(Size::new(800.0, 600.0)));
    assert_eq!(stage.transform(), Some(t));
    assert_eq!(stage.draws(), 1);
    assert_eq!(engine.last_transform(), Some(t));
}

#[test]
fn sync_is_idempotent() {
    let viewer = MockViewer::ready();
    let mut stage = MockStage::default();
    let mut engine = SyncEngine::default();

    let first = engine.sync(&viewer, &mut stage);
    let second = engine.sync(&viewer, &mut stage);
    assert_eq!(first, second);
    assert_eq!(stage.transform(), first.transform());
}

#[test]
fn sync_not_open_leaves_stage_untouched() {
    let viewer = MockViewer::ready();
    viewer.set_open(false);
    let mut stage = MockStage::default();
    let mut engine = SyncEngine::default();

    let outcome = engine.sync(&viewer, &mut stage);

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NotOpen));
    assert_eq!(stage.mutations(), 0);
    assert_eq!(stage.draws(), 0);
    assert!(engine.last_transform().is_none());
}

#[test]
fn sync_without_content_does_not_resize_stage() {
    let viewer = MockViewer::ready();
    viewer.set_content(None);
    let mut stage = MockStage::default();
    let mut engine = SyncEngine::default();

    engine.sync(&viewer, &mut stage);
    assert!(stage.size().is_none());
}

#[test]
fn skipped_sync_keeps_prior_transform() {
    let viewer = MockViewer::ready();
    let mut stage = MockStage::default();
    let mut engine = SyncEngine::default();
    let applied = engine.sync(&viewer, &mut stage).transform();

    viewer.set_content(None);
    viewer.set_view(0.0, 0.0, 9.0);
    let outcome = engine.sync(&viewer, &mut stage);

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NoContent));
    assert_eq!(stage.transform(), applied);
    assert_eq!(engine.last_transform(), applied);
}

#[test]
fn sync_propagates_resize() {
    let viewer = MockViewer::ready();
    let mut stage = MockStage::default();
    let mut engine = SyncEngine::default();
    engine.sync(&viewer, &mut stage);

    viewer.set_container(1024.0, 768.0);
    engine.sync(&viewer, &mut stage);

    assert_eq!(stage.size(), Some(Size::new(1024.0, 768.0)));
    let t = stage.transform().unwrap();
    assert!(approx_eq(t.scale, 1024.0 * 2.0 / 1000.0));
}

#[test]
fn sync_with_current_reading_tracks_animation() {
    let viewer = MockViewer::ready();
    viewer.set_current_view(0.0, 0.0, 1.0);
    let mut stage = MockStage::default();
    let mut engine = SyncEngine::new(ViewportReading::Current);

    let t = engine.sync(&viewer, &mut stage).transform().unwrap();
    assert!(approx_eq(t.scale, 0.8));
    assert!(approx_eq(t.offset_x, 0.0));
}

#[test]
fn skipped_outcome_has_no_transform() {
    assert!(SyncOutcome::Skipped(SkipReason::Destroyed).transform().is_none());
}
