//! Hit-testing: which handle or curve body is under the cursor.
//!
//! All distances are measured in screen pixels so thresholds feel the same at
//! every zoom level. Candidates are resolved in a fixed priority order:
//!
//! 1. markers,
//! 2. control handles (line endpoints, spline control points, parabola roots
//!    and vertex),
//! 3. the nearest point on any curve body.
//!
//! Within a category the globally nearest candidate wins. On an exact
//! distance tie the shape that comes first in scene order wins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::curve::{Sampling, sample_shape};
use crate::doc::{RootSide, Shape, ShapeId};
use crate::geometry::project_to_segment;
use crate::scene::Scene;

/// Which end of a two-point line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    P1,
    P2,
}

/// Which draggable part of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlePart {
    /// The marker itself.
    Marker,
    /// One endpoint of a two-point line.
    LineEnd(LineEnd),
    /// Control point by index.
    SplinePoint(usize),
    /// One root of a parabola.
    ParabolaRoot(RootSide),
    /// The parabola vertex; drags vertically.
    ParabolaVertex,
}

/// A handle on a specific shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleRef {
    pub shape: ShapeId,
    pub part: HandlePart,
}

/// A handle within reach of the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleHit {
    pub handle: HandleRef,
    /// Screen position of the handle.
    pub screen: Point,
    /// Pixel distance from the cursor.
    pub distance: f64,
}

/// The nearest point on a curve body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    pub shape: ShapeId,
    /// Screen position of the projected point.
    pub screen: Point,
    /// World position of the projected point.
    pub world: Point,
    /// Pixel distance from the cursor.
    pub distance: f64,
}

/// Result of a full hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Handle(HandleHit),
    Curve(CurveHit),
}

/// Canvas size, thresholds and sampling used for one hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitParams {
    pub width: f64,
    pub height: f64,
    /// Reach of markers and control handles, in pixels.
    pub handle_px: f64,
    /// Reach of curve bodies, in pixels.
    pub curve_px: f64,
    pub sampling: Sampling,
}

/// Every handle of `shape` with its world position, visible or not.
#[must_use]
pub fn handles_of(shape: &Shape) -> Vec<(HandlePart, Point)> {
    match shape {
        Shape::Marker(m) => vec![(HandlePart::Marker, m.position)],
        Shape::Line(l) => vec![
            (HandlePart::LineEnd(LineEnd::P1), l.p1),
            (HandlePart::LineEnd(LineEnd::P2), l.p2),
        ],
        Shape::Spline(s) => s
            .control_points
            .iter()
            .enumerate()
            .map(|(i, p)| (HandlePart::SplinePoint(i), *p))
            .collect(),
        Shape::Parabola(p) => vec![
            (HandlePart::ParabolaRoot(RootSide::First), p.root1()),
            (HandlePart::ParabolaRoot(RootSide::Second), p.root2()),
            (HandlePart::ParabolaVertex, p.vertex()),
        ],
        Shape::Function(_) => Vec::new(),
    }
}

/// Whether the shape currently shows (and so exposes) its handles.
#[must_use]
pub fn handles_visible(shape: &Shape) -> bool {
    match shape {
        Shape::Marker(_) => true,
        Shape::Line(l) => l.show_endpoint_handles,
        Shape::Spline(s) => s.show_handles,
        Shape::Parabola(p) => p.show_handles,
        Shape::Function(_) => false,
    }
}

fn nearest_handle_where(
    scene: &Scene,
    screen: Point,
    threshold_px: f64,
    include: impl Fn(&Shape) -> bool,
) -> Option<HandleHit> {
    let mut best: Option<HandleHit> = None;
    for shape in scene.shapes().iter().filter(|s| include(s) && handles_visible(s)) {
        for (part, world) in handles_of(shape) {
            let at = scene.viewport.world_to_screen(world);
            let distance = at.distance(screen);
            if distance > threshold_px {
                continue;
            }
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(HandleHit { handle: HandleRef { shape: shape.id(), part }, screen: at, distance });
            }
        }
    }
    best
}

/// Nearest marker or visible control handle within `threshold_px`.
///
/// Any marker in reach beats every control handle, however close.
#[must_use]
pub fn find_nearest_handle(scene: &Scene, screen: Point, threshold_px: f64) -> Option<HandleHit> {
    nearest_handle_where(scene, screen, threshold_px, |s| matches!(s, Shape::Marker(_)))
        .or_else(|| nearest_handle_where(scene, screen, threshold_px, |s| !matches!(s, Shape::Marker(_))))
}

/// Nearest point on any drawn curve within `params.curve_px`.
#[must_use]
pub fn find_nearest_on_curve(scene: &Scene, screen: Point, params: &HitParams) -> Option<CurveHit> {
    let viewport = &scene.viewport;
    let mut best: Option<CurveHit> = None;
    for shape in scene.shapes().iter().filter(|s| s.is_curve()) {
        for run in sample_shape(shape, viewport, params.width, params.height, &params.sampling) {
            for seg in run.windows(2) {
                let proj = project_to_segment(screen, seg[0], seg[1]);
                if best.is_none_or(|b| proj.distance < b.distance) {
                    best = Some(CurveHit {
                        shape: shape.id(),
                        screen: proj.point,
                        world: viewport.screen_to_world(proj.point),
                        distance: proj.distance,
                    });
                }
            }
        }
    }
    best.filter(|b| b.distance <= params.curve_px)
}

/// Full hit test in priority order: markers, control handles, curve bodies.
#[must_use]
pub fn hit_test(scene: &Scene, screen: Point, params: &HitParams) -> Option<Hit> {
    if let Some(h) = find_nearest_handle(scene, screen, params.handle_px) {
        return Some(Hit::Handle(h));
    }
    find_nearest_on_curve(scene, screen, params).map(Hit::Curve)
}
