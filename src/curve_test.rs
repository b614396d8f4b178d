#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::{FunctionCurve, FunctionForm, Marker, Parabola, TwoPointLine};
use crate::hit::{HandlePart, HandleRef, LineEnd};
use crate::scene::Scene;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// 200x200 canvas showing x and y in -10..10.
fn vp() -> Viewport {
    Viewport { origin_x: 100.0, origin_y: 100.0, scale: 10.0 }
}

fn line(p1: Point, p2: Point) -> Shape {
    Shape::Line(TwoPointLine {
        id: Uuid::new_v4(),
        p1,
        p2,
        color: "#ffffff".into(),
        name: String::new(),
        opacity_pct: 100.0,
        show_endpoint_handles: true,
    })
}

fn spline(points: Vec<Point>, straight_mode: bool) -> SplineCurve {
    SplineCurve {
        id: Uuid::new_v4(),
        control_points: points,
        color: "#ffffff".into(),
        name: String::new(),
        opacity_pct: 100.0,
        straight_mode,
        show_handles: true,
    }
}

fn function(form: FunctionForm) -> Shape {
    Shape::Function(FunctionCurve { id: Uuid::new_v4(), form, color: "#ffffff".into(), label: String::new(), opacity_pct: 100.0 })
}

// =============================================================
// sample_function
// =============================================================

#[test]
fn sample_function_spans_width() {
    let runs = sample_function(|x| x, &vp(), 200.0, 2.0);
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.len(), 101);
    assert_eq!(run[0], pt(0.0, 200.0));
    assert_eq!(run[100], pt(200.0, 0.0));
}

#[test]
fn sample_function_breaks_at_pole() {
    let runs = sample_function(|x| 1.0 / x, &vp(), 200.0, 2.0);
    assert_eq!(runs.len(), 2);
    assert!(runs[0].iter().all(|p| p.x < 100.0));
    assert!(runs[1].iter().all(|p| p.x > 100.0));
}

#[test]
fn sample_function_breaks_beyond_limit() {
    let runs = sample_function(|x| if x.abs() < 1.0 { 1e7 } else { 0.0 }, &vp(), 200.0, 2.0);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].last().map(|p| p.x), Some(90.0));
    assert_eq!(runs[1].first().map(|p| p.x), Some(110.0));
}

#[test]
fn sample_function_all_invalid_is_empty() {
    assert!(sample_function(|_| f64::NAN, &vp(), 200.0, 2.0).is_empty());
}

#[test]
fn sample_function_tiny_step_is_clamped() {
    let runs = sample_function(|x| x, &vp(), 200.0, 1e-9);
    assert_eq!(runs.first().map(Vec::len), Some(801));
}

#[test]
fn sample_function_bad_step_falls_back() {
    let runs = sample_function(|x| x, &vp(), 200.0, 0.0);
    assert_eq!(runs.first().map(Vec::len), Some(101));
}

// =============================================================
// sample_shape
// =============================================================

#[test]
fn marker_has_no_runs() {
    let m = Shape::Marker(Marker {
        id: Uuid::new_v4(),
        position: pt(0.0, 0.0),
        label: String::new(),
        color: "#ffffff".into(),
        size_px: 8.0,
        opacity_pct: 100.0,
        show_coords: false,
        parent_line_id: None,
    });
    assert!(sample_shape(&m, &vp(), 200.0, 200.0, &Sampling::default()).is_empty());
}

#[test]
fn degenerate_line_has_no_runs() {
    let l = line(pt(1.0, 1.0), pt(1.0, 1.0));
    assert!(sample_shape(&l, &vp(), 200.0, 200.0, &Sampling::default()).is_empty());
}

#[test]
fn vertical_line_spans_height() {
    let l = line(pt(2.0, -1.0), pt(2.0, 3.0));
    let runs = sample_shape(&l, &vp(), 200.0, 150.0, &Sampling::default());
    assert_eq!(runs, vec![vec![pt(120.0, 0.0), pt(120.0, 150.0)]]);
}

#[test]
fn sloped_line_extends_past_points() {
    let l = line(pt(0.0, 0.0), pt(1.0, 1.0));
    let runs = sample_shape(&l, &vp(), 200.0, 200.0, &Sampling::default());
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].first(), Some(&pt(0.0, 200.0)));
}

#[test]
fn parabola_crosses_axis_at_roots() {
    let p = Shape::Parabola(Parabola {
        id: Uuid::new_v4(),
        root1_x: -2.0,
        root2_x: 2.0,
        vertex_y: -4.0,
        fallback_a: 1.0,
        color: "#ffffff".into(),
        name: String::new(),
        opacity_pct: 100.0,
        show_handles: true,
    });
    let runs = sample_shape(&p, &vp(), 200.0, 200.0, &Sampling::default());
    let at = |sx: f64| runs[0].iter().find(|q| approx_eq(q.x, sx)).map(|q| q.y);
    assert_eq!(runs.len(), 1);
    assert!(at(80.0).is_some_and(|y| approx_eq(y, 100.0)));
    assert!(at(120.0).is_some_and(|y| approx_eq(y, 100.0)));
    assert!(at(100.0).is_some_and(|y| approx_eq(y, 140.0)));
}

#[test]
fn straight_spline_is_its_control_points() {
    let s = spline(vec![pt(0.0, 0.0), pt(1.0, 2.0), pt(3.0, -1.0)], true);
    let runs = sample_shape(&Shape::Spline(s), &vp(), 200.0, 200.0, &Sampling::default());
    assert_eq!(runs, vec![vec![pt(100.0, 100.0), pt(110.0, 80.0), pt(130.0, 110.0)]]);
}

#[test]
fn smooth_spline_passes_through_ends() {
    let s = spline(vec![pt(0.0, 0.0), pt(1.0, 2.0), pt(3.0, -1.0)], false);
    let sampling = Sampling { step_px: 2.0, t_step: 0.25 };
    let runs = sample_shape(&Shape::Spline(s), &vp(), 200.0, 200.0, &sampling);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].len(), 9);
    assert_eq!(runs[0].first(), Some(&pt(100.0, 100.0)));
    let last = runs[0].last().copied().unwrap_or_default();
    assert!(approx_eq(last.x, 130.0) && approx_eq(last.y, 110.0));
}

#[test]
fn spline_path_straight_vs_smooth() {
    let points = vec![pt(0.0, 0.0), pt(1.0, 1.0)];
    assert_eq!(spline_path(&spline(points.clone(), true), 0.1), points);
    assert_eq!(spline_path(&spline(points, false), 0.1).len(), 11);
}

#[test]
fn function_curve_samples_form() {
    let f = function(FunctionForm::Linear { slope: 0.0, intercept: 2.0 });
    let runs = sample_shape(&f, &vp(), 200.0, 200.0, &Sampling::default());
    assert!(runs[0].iter().all(|p| p.y == 80.0));
}

#[test]
fn dragged_line_end_resamples_flat() {
    let mut scene = Scene::new();
    scene.viewport = vp();
    let id = scene.add_line(pt(0.0, 0.0), pt(2.0, 2.0));
    let h = HandleRef { shape: id, part: HandlePart::LineEnd(LineEnd::P2) };
    assert!(scene.move_handle(&h, pt(4.2, 0.3), 1.0).is_ok());
    let shape = scene.get(&id).cloned();
    let runs = shape.map(|s| sample_shape(&s, &scene.viewport, 200.0, 200.0, &Sampling::default())).unwrap_or_default();
    assert_eq!(runs.len(), 1);
    assert!(runs[0].iter().all(|p| p.y == 100.0));
}

// =============================================================
// label_anchor
// =============================================================

#[test]
fn label_anchor_function_at_canvas_middle() {
    let f = function(FunctionForm::Linear { slope: 1.0, intercept: 3.0 });
    assert_eq!(label_anchor(&f, &vp(), 200.0), Some(pt(100.0, 70.0)));
}

#[test]
fn label_anchor_spline_last_point() {
    let s = Shape::Spline(spline(vec![pt(0.0, 0.0), pt(2.0, 1.0)], false));
    assert_eq!(label_anchor(&s, &vp(), 200.0), Some(pt(120.0, 90.0)));
}

#[test]
fn label_anchor_vertical_line_midpoint() {
    let l = line(pt(-1.0, 0.0), pt(-1.0, 4.0));
    assert_eq!(label_anchor(&l, &vp(), 200.0), Some(pt(90.0, 80.0)));
}

#[test]
fn label_anchor_none_for_degenerate_and_empty() {
    assert_eq!(label_anchor(&line(pt(1.0, 1.0), pt(1.0, 1.0)), &vp(), 200.0), None);
    assert_eq!(label_anchor(&Shape::Spline(spline(Vec::new(), false)), &vp(), 200.0), None);
}

#[test]
fn label_anchor_none_when_off_limits() {
    let f = function(FunctionForm::Linear { slope: 0.0, intercept: 1e9 });
    assert_eq!(label_anchor(&f, &vp(), 200.0), None);
}
