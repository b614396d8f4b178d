//! Geometric primitives shared by the curve evaluator, hit-testing and editing.
//!
//! Everything here is pure math on [`Point`]s. Degenerate inputs (zero-length
//! segments, coincident roots, vertical lines) take explicit branches and never
//! produce NaN.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{GEOM_EPSILON, MIN_SPLINE_T_STEP, SPLINE_T_STEP};

// =============================================================
// Point-to-segment projection
// =============================================================

/// Closest point on a segment to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// The clamped projection of the query point onto the segment.
    pub point: Point,
    /// Euclidean distance from the query point to `point`.
    pub distance: f64,
    /// Segment parameter of `point`, in `[0, 1]` (0 = `a`, 1 = `b`).
    pub t: f64,
}

/// Project `p` onto segment `a`–`b`, clamping the parameter to `[0, 1]`.
///
/// A zero-length segment projects every point onto `a`.
#[must_use]
pub fn project_to_segment(p: Point, a: Point, b: Point) -> Projection {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let len2 = vx * vx + vy * vy;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * vx + (p.y - a.y) * vy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let point = Point::new(a.x + t * vx, a.y + t * vy);
    Projection { point, distance: p.distance(point), t }
}

// =============================================================
// Catmull–Rom
// =============================================================

/// Evaluate the uniform Catmull–Rom basis between `p1` (t = 0) and `p2` (t = 1).
#[must_use]
pub fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |c0: f64, c1: f64, c2: f64, c3: f64| {
        0.5 * ((2.0 * c1)
            + (-c0 + c2) * t
            + (2.0 * c0 - 5.0 * c1 + 4.0 * c2 - c3) * t2
            + (-c0 + 3.0 * c1 - 3.0 * c2 + c3) * t3)
    };
    Point::new(axis(p0.x, p1.x, p2.x, p3.x), axis(p0.y, p1.y, p2.y, p3.y))
}

/// Sample a Catmull–Rom spline through every control point.
///
/// Segment `i` runs from `points[i]` to `points[i + 1]`; its outer neighbours
/// are clamped to the first/last control point at the ends. Each segment is
/// stepped by `t_step` (falls back to [`SPLINE_T_STEP`] when not a positive
/// finite number, and is never finer than [`MIN_SPLINE_T_STEP`]). The result starts at the first and ends at the last
/// control point.
#[must_use]
pub fn catmull_rom_chain(points: &[Point], t_step: f64) -> Vec<Point> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let step = if t_step.is_finite() && t_step > 0.0 { t_step.max(MIN_SPLINE_T_STEP) } else { SPLINE_T_STEP };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (1.0 / step).round().max(1.0) as usize;

    let mut out = Vec::with_capacity((n - 1) * steps + 1);
    out.push(points[0]);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        for k in 1..=steps {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 / steps as f64;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out
}

// =============================================================
// Analytic forms
// =============================================================

/// Analytic form of the infinite line through two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineForm {
    /// `y = slope * x + intercept`.
    Sloped { slope: f64, intercept: f64 },
    /// `x = x` (the two points share an x coordinate).
    Vertical { x: f64 },
    /// The two points coincide; there is no line.
    Degenerate,
}

impl LineForm {
    /// Derive the line through `p1` and `p2`.
    #[must_use]
    pub fn through(p1: Point, p2: Point) -> Self {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        if dx.abs() < GEOM_EPSILON {
            if dy.abs() < GEOM_EPSILON {
                return Self::Degenerate;
            }
            return Self::Vertical { x: p1.x };
        }
        let slope = dy / dx;
        Self::Sloped { slope, intercept: p1.y - slope * p1.x }
    }

    /// `y` at `x`, or `None` for vertical and degenerate lines.
    #[must_use]
    pub fn y_at(self, x: f64) -> Option<f64> {
        match self {
            Self::Sloped { slope, intercept } => Some(slope.mul_add(x, intercept)),
            Self::Vertical { .. } | Self::Degenerate => None,
        }
    }
}

/// `y = a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quadratic {
    #[must_use]
    pub fn eval(self, x: f64) -> f64 {
        self.a.mul_add(x * x, self.b.mul_add(x, self.c))
    }

    /// Monic quadratic with the given roots: `(x - r1)(x - r2)`.
    #[must_use]
    pub fn from_roots(r1: f64, r2: f64) -> Self {
        Self::scaled_from_roots(1.0, r1, r2)
    }

    /// `a·(x - r1)(x - r2)` expanded: `b = -a(r1 + r2)`, `c = a·r1·r2`.
    #[must_use]
    pub fn scaled_from_roots(a: f64, r1: f64, r2: f64) -> Self {
        Self { a, b: -a * (r1 + r2), c: a * r1 * r2 }
    }
}

/// Leading coefficient of the parabola through roots `r1`, `r2` whose vertex
/// (at `x = (r1 + r2) / 2`) has height `vertex_y`.
///
/// Returns `None` when the roots coincide (the denominator vanishes).
#[must_use]
pub fn parabola_leading_coefficient(r1: f64, r2: f64, vertex_y: f64) -> Option<f64> {
    let vx = (r1 + r2) * 0.5;
    let denom = (vx - r1) * (vx - r2);
    if denom.abs() < GEOM_EPSILON {
        return None;
    }
    let a = vertex_y / denom;
    a.is_finite().then_some(a)
}

/// Coefficients of the parabola through `r1`, `r2` with vertex height
/// `vertex_y`, using `fallback_a` when the roots coincide.
#[must_use]
pub fn parabola_from_roots(r1: f64, r2: f64, vertex_y: f64, fallback_a: f64) -> Quadratic {
    let a = parabola_leading_coefficient(r1, r2, vertex_y).unwrap_or(fallback_a);
    Quadratic::scaled_from_roots(a, r1, r2)
}

// =============================================================
// Grid snapping
// =============================================================

/// Round `value` to the nearest multiple of `step`; `step <= 0` is unsnapped.
#[must_use]
pub fn snap(value: f64, step: f64) -> f64 {
    if step > 0.0 && step.is_finite() {
        (value / step).round() * step
    } else {
        value
    }
}

/// Snap both coordinates of `p`.
#[must_use]
pub fn snap_point(p: Point, step: f64) -> Point {
    Point::new(snap(p.x, step), snap(p.y, step))
}
