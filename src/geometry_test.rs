#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point / Size ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn size_default_is_zero() {
    assert_eq!(Size::default(), Size::new(0.0, 0.0));
}

// --- Transform ---

#[test]
fn transform_default_is_identity() {
    let t = Transform::default();
    let p = Point::new(12.5, -4.0);
    assert!(point_approx_eq(t.image_to_screen(p), p));
    assert!(point_approx_eq(t.screen_to_image(p), p));
}

#[test]
fn image_to_screen_applies_scale_then_offset() {
    let t = Transform { scale: 1.6, offset_x: -400.0, offset_y: -300.0 };
    let screen = t.image_to_screen(Point::new(250.0, 250.0));
    assert!(point_approx_eq(screen, Point::new(0.0, 100.0)));
}

#[test]
fn origin_maps_to_offset() {
    let t = Transform { scale: 3.0, offset_x: 17.0, offset_y: -9.0 };
    let screen = t.image_to_screen(Point::new(0.0, 0.0));
    assert!(point_approx_eq(screen, Point::new(17.0, -9.0)));
}

#[test]
fn screen_to_image_inverts_image_to_screen() {
    let t = Transform { scale: 0.37, offset_x: 120.0, offset_y: -45.5 };
    let p = Point::new(812.0, 97.25);
    assert!(point_approx_eq(t.screen_to_image(t.image_to_screen(p)), p));
}

#[test]
fn transform_validity() {
    assert!(Transform::default().is_valid());
    assert!(!Transform { scale: 0.0, offset_x: 0.0, offset_y: 0.0 }.is_valid());
    assert!(!Transform { scale: f64::INFINITY, offset_x: 0.0, offset_y: 0.0 }.is_valid());
    assert!(!Transform { scale: 1.0, offset_x: f64::NAN, offset_y: 0.0 }.is_valid());
}
