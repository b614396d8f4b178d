#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::RootSide;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn handle(shape: ShapeId, part: HandlePart) -> HandleRef {
    HandleRef { shape, part }
}

fn marker_at(scene: &Scene, id: &ShapeId) -> Option<Marker> {
    match scene.get(id) {
        Some(Shape::Marker(m)) => Some(m.clone()),
        _ => None,
    }
}

fn line_of(scene: &Scene, id: &ShapeId) -> Option<TwoPointLine> {
    match scene.get(id) {
        Some(Shape::Line(l)) => Some(l.clone()),
        _ => None,
    }
}

fn parabola_of(scene: &Scene, id: &ShapeId) -> Option<Parabola> {
    match scene.get(id) {
        Some(Shape::Parabola(p)) => Some(p.clone()),
        _ => None,
    }
}

// =============================================================
// Creation and queries
// =============================================================

#[test]
fn new_scene_is_empty() {
    let scene = Scene::new();
    assert!(scene.is_empty());
    assert_eq!(scene.len(), 0);
    assert_eq!(scene.axis_labels, AxisLabels::default());
}

#[test]
fn add_shapes_keeps_insertion_order() {
    let mut scene = Scene::new();
    let a = scene.add_marker(pt(0.0, 0.0));
    let b = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    let c = scene.add_spline(vec![pt(0.0, 0.0)]);
    let ids: Vec<ShapeId> = scene.shapes().iter().map(Shape::id).collect();
    assert_eq!(ids, vec![a, b, c]);
}

#[test]
fn new_shapes_get_auto_colors() {
    let mut scene = Scene::new();
    let id = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    assert_eq!(scene.get(&id).map(Shape::color), Some(auto_color(&id).as_str()));
}

#[test]
fn list_by_kind_filters() {
    let mut scene = Scene::new();
    scene.add_marker(pt(0.0, 0.0));
    let l1 = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    scene.add_marker(pt(1.0, 0.0));
    let l2 = scene.add_line(pt(0.0, 1.0), pt(1.0, 2.0));
    let lines: Vec<ShapeId> = scene.list_by_kind(ShapeKind::Line).iter().map(|s| s.id()).collect();
    assert_eq!(lines, vec![l1, l2]);
    assert_eq!(scene.list_by_kind(ShapeKind::Marker).len(), 2);
    assert!(scene.list_by_kind(ShapeKind::Function).is_empty());
}

#[test]
fn function_limit_is_enforced() {
    let mut scene = Scene::new();
    for _ in 0..MAX_FUNCTION_CURVES {
        assert!(scene.add_function(FunctionForm::default()).is_some());
    }
    assert!(scene.add_function(FunctionForm::default()).is_none());
    assert_eq!(scene.list_by_kind(ShapeKind::Function).len(), MAX_FUNCTION_CURVES);
}

#[test]
fn function_limit_frees_on_delete() {
    let mut scene = Scene::with_function_limit(1);
    let f = scene.add_function(FunctionForm::default());
    assert!(scene.add_function(FunctionForm::default()).is_none());
    if let Some(f) = f {
        assert!(scene.delete(&f).is_ok());
    }
    assert!(scene.add_function(FunctionForm::default()).is_some());
}

#[test]
fn add_parabola_solves_a() {
    let mut scene = Scene::new();
    let id = scene.add_parabola(0.0, 2.0, 2.0);
    let p = parabola_of(&scene, &id);
    assert!(p.is_some_and(|p| approx_eq(p.fallback_a, -2.0)));
}

#[test]
fn handle_position_reports_world_point() {
    let mut scene = Scene::new();
    let id = scene.add_line(pt(1.0, 2.0), pt(3.0, 4.0));
    assert_eq!(scene.handle_position(&handle(id, HandlePart::LineEnd(LineEnd::P2))), Some(pt(3.0, 4.0)));
    assert_eq!(scene.handle_position(&handle(id, HandlePart::ParabolaVertex)), None);
}

// =============================================================
// Update / delete
// =============================================================

#[test]
fn update_unknown_shape() {
    let mut scene = Scene::new();
    let ghost = ShapeId::new_v4();
    let err = scene.update(&ghost, &ShapePatch::default());
    assert_eq!(err, Err(SceneError::UnknownShape(ghost)));
}

#[test]
fn update_inapplicable_field_leaves_shape() {
    let mut scene = Scene::new();
    let id = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    let before = scene.get(&id).cloned();
    let patch = ShapePatch { name: Some("n".into()), form: Some(FunctionForm::default()), ..Default::default() };
    assert!(matches!(scene.update(&id, &patch), Err(SceneError::InapplicableField { field: "form", .. })));
    assert_eq!(scene.get(&id).cloned(), before);
}

#[test]
fn update_function_form_reprojects_markers() {
    let mut scene = Scene::new();
    let f = scene.add_function(FunctionForm::default()).unwrap_or_default();
    let m = scene.add_marker(pt(2.0, 0.0));
    assert!(scene.attach_marker(&m, &f).is_ok());
    assert_eq!(marker_at(&scene, &m).map(|m| m.position), Some(pt(2.0, 2.0)));

    let patch = ShapePatch { form: Some(FunctionForm::Linear { slope: 3.0, intercept: 1.0 }), ..Default::default() };
    assert!(scene.update(&f, &patch).is_ok());
    assert_eq!(marker_at(&scene, &m).map(|m| m.position), Some(pt(2.0, 7.0)));
}

#[test]
fn delete_detaches_children() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 0.0), pt(2.0, 2.0));
    let m = scene.add_marker(pt(1.0, 5.0));
    assert!(scene.attach_marker(&m, &l).is_ok());
    let removed = scene.delete(&l);
    assert!(matches!(removed, Ok(Shape::Line(_))));
    let marker = marker_at(&scene, &m);
    assert!(marker.as_ref().is_some_and(|m| m.parent_line_id.is_none()));
    assert_eq!(marker.map(|m| m.position), Some(pt(1.0, 1.0)));
}

#[test]
fn delete_unknown_shape() {
    let mut scene = Scene::new();
    let ghost = ShapeId::new_v4();
    assert_eq!(scene.delete(&ghost), Err(SceneError::UnknownShape(ghost)));
}

#[test]
fn axis_label_is_truncated() {
    let mut scene = Scene::new();
    scene.set_axis_label(Axis::Y, "temperature in degrees celsius");
    assert_eq!(scene.axis_labels.y.chars().count(), MAX_AXIS_LABEL_CHARS);
    assert_eq!(scene.axis_labels.x, "x");
}

// =============================================================
// Attachment
// =============================================================

#[test]
fn attach_marker_projects_onto_line() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 1.0), pt(1.0, 3.0));
    let m = scene.add_marker(pt(2.0, -10.0));
    assert!(scene.attach_marker(&m, &l).is_ok());
    let marker = marker_at(&scene, &m);
    assert_eq!(marker.as_ref().and_then(|m| m.parent_line_id), Some(l));
    assert_eq!(marker.map(|m| m.position), Some(pt(2.0, 5.0)));
}

#[test]
fn attach_marker_to_marker_is_rejected() {
    let mut scene = Scene::new();
    let a = scene.add_marker(pt(0.0, 0.0));
    let b = scene.add_marker(pt(1.0, 1.0));
    assert!(matches!(scene.attach_marker(&a, &b), Err(SceneError::WrongKind { .. })));
}

#[test]
fn attach_non_marker_is_rejected() {
    let mut scene = Scene::new();
    let l1 = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    let l2 = scene.add_line(pt(0.0, 1.0), pt(1.0, 1.0));
    assert_eq!(
        scene.attach_marker(&l1, &l2),
        Err(SceneError::WrongKind { id: l1, expected: ShapeKind::Marker, actual: ShapeKind::Line })
    );
}

#[test]
fn detach_marker_clears_parent() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    let m = scene.add_marker(pt(0.0, 0.0));
    assert!(scene.attach_marker(&m, &l).is_ok());
    assert!(scene.detach_marker(&m).is_ok());
    assert!(marker_at(&scene, &m).is_some_and(|m| m.parent_line_id.is_none()));
}

// =============================================================
// move_handle
// =============================================================

#[test]
fn move_line_end_snaps() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 0.0), pt(2.0, 2.0));
    let h = handle(l, HandlePart::LineEnd(LineEnd::P2));
    assert!(scene.move_handle(&h, pt(3.9, 0.2), 1.0).is_ok());
    assert_eq!(line_of(&scene, &l).map(|l| l.p2), Some(pt(4.0, 0.0)));
}

#[test]
fn moving_line_end_drags_attached_marker() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 0.0), pt(2.0, 2.0));
    let m = scene.add_marker(pt(1.0, 1.0));
    assert!(scene.attach_marker(&m, &l).is_ok());
    assert!(scene.move_handle(&handle(l, HandlePart::LineEnd(LineEnd::P2)), pt(2.0, 4.0), 0.0).is_ok());
    assert_eq!(marker_at(&scene, &m).map(|m| m.position), Some(pt(1.0, 2.0)));
}

#[test]
fn move_free_marker_snaps_both_axes() {
    let mut scene = Scene::new();
    let m = scene.add_marker(pt(0.0, 0.0));
    assert!(scene.move_handle(&handle(m, HandlePart::Marker), pt(1.3, 2.8), 0.5).is_ok());
    assert_eq!(marker_at(&scene, &m).map(|m| m.position), Some(pt(1.5, 3.0)));
}

#[test]
fn move_attached_marker_follows_curve() {
    let mut scene = Scene::new();
    let f = scene
        .add_function(FunctionForm::Quadratic(crate::geometry::Quadratic { a: 1.0, b: 0.0, c: 0.0 }))
        .unwrap_or_default();
    let m = scene.add_marker(pt(0.0, 0.0));
    assert!(scene.attach_marker(&m, &f).is_ok());
    assert!(scene.move_handle(&handle(m, HandlePart::Marker), pt(2.9, -5.0), 1.0).is_ok());
    assert_eq!(marker_at(&scene, &m).map(|m| m.position), Some(pt(3.0, 9.0)));
}

#[test]
fn marker_on_vertical_line_moves_in_y() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(2.0, 0.0), pt(2.0, 5.0));
    let m = scene.add_marker(pt(0.0, 1.0));
    assert!(scene.attach_marker(&m, &l).is_ok());
    assert_eq!(marker_at(&scene, &m).map(|m| m.position), Some(pt(2.0, 1.0)));
    assert!(scene.move_handle(&handle(m, HandlePart::Marker), pt(9.0, 3.2), 0.5).is_ok());
    assert_eq!(marker_at(&scene, &m).map(|m| m.position), Some(pt(2.0, 3.0)));
}

#[test]
fn move_spline_point_out_of_range() {
    let mut scene = Scene::new();
    let s = scene.add_spline(vec![pt(0.0, 0.0), pt(1.0, 1.0)]);
    let h = handle(s, HandlePart::SplinePoint(5));
    assert_eq!(scene.move_handle(&h, pt(0.0, 0.0), 0.0), Err(SceneError::NoSuchHandle { id: s, part: h.part }));
}

#[test]
fn move_spline_point() {
    let mut scene = Scene::new();
    let s = scene.add_spline(vec![pt(0.0, 0.0), pt(1.0, 1.0)]);
    assert!(scene.move_handle(&handle(s, HandlePart::SplinePoint(1)), pt(2.2, 2.6), 0.5).is_ok());
    let points = match scene.get(&s) {
        Some(Shape::Spline(sp)) => sp.control_points.clone(),
        _ => Vec::new(),
    };
    assert_eq!(points, vec![pt(0.0, 0.0), pt(2.0, 2.5)]);
}

#[test]
fn move_parabola_root_keeps_vertex_midpoint() {
    let mut scene = Scene::new();
    let id = scene.add_parabola(0.0, 2.0, -1.0);
    let h = handle(id, HandlePart::ParabolaRoot(RootSide::Second));
    assert!(scene.move_handle(&h, pt(6.2, 3.0), 1.0).is_ok());
    let p = parabola_of(&scene, &id);
    assert!(p.as_ref().is_some_and(|p| p.root2_x == 6.0 && p.vertex_x() == 3.0 && p.vertex_y == -1.0));
    let q = p.map(|p| p.coefficients());
    assert!(q.is_some_and(|q| approx_eq(q.eval(0.0), 0.0) && approx_eq(q.eval(6.0), 0.0)));
}

#[test]
fn move_parabola_vertex_only_changes_height() {
    let mut scene = Scene::new();
    let id = scene.add_parabola(-2.0, 2.0, -4.0);
    assert!(scene.move_handle(&handle(id, HandlePart::ParabolaVertex), pt(10.0, 8.0), 0.0).is_ok());
    let p = parabola_of(&scene, &id);
    assert!(p.is_some_and(|p| p.vertex() == pt(0.0, 8.0) && approx_eq(p.fallback_a, -2.0)));
}

#[test]
fn move_wrong_handle_for_kind() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    let h = handle(l, HandlePart::ParabolaVertex);
    assert!(matches!(scene.move_handle(&h, pt(0.0, 0.0), 0.0), Err(SceneError::NoSuchHandle { .. })));
    let h = handle(l, HandlePart::Marker);
    assert!(matches!(scene.move_handle(&h, pt(0.0, 0.0), 0.0), Err(SceneError::NoSuchHandle { .. })));
}

#[test]
fn move_non_finite_is_rejected() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    let h = handle(l, HandlePart::LineEnd(LineEnd::P1));
    assert!(matches!(scene.move_handle(&h, pt(f64::NAN, 0.0), 0.0), Err(SceneError::NonFinite { .. })));
    assert_eq!(line_of(&scene, &l).map(|l| l.p1), Some(pt(0.0, 0.0)));
}

#[test]
fn move_unknown_shape() {
    let mut scene = Scene::new();
    let ghost = ShapeId::new_v4();
    let h = handle(ghost, HandlePart::Marker);
    assert_eq!(scene.move_handle(&h, pt(0.0, 0.0), 0.0), Err(SceneError::UnknownShape(ghost)));
}

// =============================================================
// Placement edits
// =============================================================

#[test]
fn append_control_point_snaps() {
    let mut scene = Scene::new();
    let s = scene.add_spline(vec![pt(0.0, 0.0)]);
    assert!(scene.append_control_point(&s, pt(1.1, 0.9), 1.0).is_ok());
    assert!(matches!(scene.get(&s), Some(Shape::Spline(sp)) if sp.control_points == vec![pt(0.0, 0.0), pt(1.0, 1.0)]));
}

#[test]
fn append_control_point_wrong_kind() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(0.0, 0.0), pt(1.0, 1.0));
    assert!(matches!(scene.append_control_point(&l, pt(0.0, 0.0), 0.0), Err(SceneError::WrongKind { .. })));
}

#[test]
fn place_second_root_keeps_opening() {
    let mut scene = Scene::new();
    let id = scene.add_parabola(1.0, 1.0, 0.0);
    assert!(scene.place_second_root(&id, 4.8, 1.0).is_ok());
    let p = parabola_of(&scene, &id);
    assert!(p.is_some_and(|p| p.root2_x == 5.0 && approx_eq(p.vertex_y, -4.0) && approx_eq(p.coefficients().a, 1.0)));
}

// =============================================================
// constrain_to
// =============================================================

#[test]
fn constrain_to_degenerate_line_is_p1() {
    let mut scene = Scene::new();
    let l = scene.add_line(pt(1.0, 1.0), pt(1.0, 1.0));
    let shape = scene.get(&l).cloned();
    assert_eq!(shape.and_then(|s| constrain_to(&s, pt(5.0, 5.0), 0.0)), Some(pt(1.0, 1.0)));
}

#[test]
fn constrain_to_marker_is_none() {
    let mut scene = Scene::new();
    let m = scene.add_marker(pt(0.0, 0.0));
    let shape = scene.get(&m).cloned();
    assert_eq!(shape.and_then(|s| constrain_to(&s, pt(1.0, 1.0), 0.0)), None);
}

#[test]
fn constrain_to_steep_function_beyond_limit_is_none() {
    let mut scene = Scene::new();
    let f = scene.add_function(FunctionForm::Linear { slope: 1e9, intercept: 0.0 }).unwrap_or_default();
    let shape = scene.get(&f).cloned();
    assert_eq!(shape.and_then(|s| constrain_to(&s, pt(1.0, 0.0), 0.0)), None);
}

#[test]
fn constrain_to_straight_spline_projects() {
    let mut scene = Scene::new();
    let s = scene.add_spline(vec![pt(0.0, 0.0), pt(4.0, 0.0)]);
    let shape = scene.get(&s).cloned();
    let p = shape.and_then(|s| constrain_to(&s, pt(2.0, 3.0), 0.0));
    assert!(p.is_some_and(|p| approx_eq(p.x, 2.0) && approx_eq(p.y, 0.0)));
}

#[test]
fn constrain_to_single_point_spline() {
    let mut scene = Scene::new();
    let s = scene.add_spline(vec![pt(3.0, 3.0)]);
    let shape = scene.get(&s).cloned();
    assert_eq!(shape.and_then(|s| constrain_to(&s, pt(0.0, 0.0), 0.0)), Some(pt(3.0, 3.0)));
}
