//! Curve evaluator: turns a shape into screen-space polyline runs.
//!
//! A run is a connected sequence of screen points; consecutive runs are not
//! joined. `y = f(x)` curves are sampled every `step_px` pixels across the
//! canvas width. A sample that is not finite, or whose magnitude exceeds
//! [`Y_LIMIT`] world units, ends the current run so asymptotes leave a gap.
//! Splines are sampled parametrically in world space and then transformed.
//!
//! The renderer strokes these runs and the hit-tester projects onto them, so
//! what is hit is exactly what is drawn.

#[cfg(test)]
#[path = "curve_test.rs"]
mod curve_test;

use crate::camera::{Point, Viewport};
use crate::consts::{MIN_SAMPLE_STEP_PX, SAMPLE_STEP_PX, SPLINE_T_STEP, Y_LIMIT};
use crate::doc::{Shape, SplineCurve};
use crate::geometry::{LineForm, catmull_rom_chain};

/// A connected screen-space polyline.
pub type Run = Vec<Point>;

/// Sampling resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    /// Horizontal pixel step for `y = f(x)` curves.
    pub step_px: f64,
    /// Parameter step per Catmull–Rom segment.
    pub t_step: f64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { step_px: SAMPLE_STEP_PX, t_step: SPLINE_T_STEP }
    }
}

/// Sample `f` across `0..=width` screen pixels.
#[must_use]
pub fn sample_function(f: impl Fn(f64) -> f64, viewport: &Viewport, width: f64, step_px: f64) -> Vec<Run> {
    let step = if step_px.is_finite() && step_px > 0.0 { step_px.max(MIN_SAMPLE_STEP_PX) } else { SAMPLE_STEP_PX };
    let mut runs = Vec::new();
    let mut current: Run = Vec::new();
    let mut px = 0.0;
    while px <= width {
        let y = f(viewport.screen_to_world_x(px));
        if y.is_finite() && y.abs() <= Y_LIMIT {
            current.push(Point::new(px, viewport.world_to_screen_y(y)));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
        px += step;
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// World-space path of a spline: its control points in straight mode,
/// otherwise the Catmull–Rom chain through them.
#[must_use]
pub fn spline_path(spline: &SplineCurve, t_step: f64) -> Vec<Point> {
    if spline.straight_mode {
        spline.control_points.clone()
    } else {
        catmull_rom_chain(&spline.control_points, t_step)
    }
}

/// Map a world-space path to screen space, breaking at non-finite points.
fn world_path_runs(path: &[Point], viewport: &Viewport) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut current: Run = Vec::new();
    for p in path {
        if p.is_finite() && p.x.abs() <= Y_LIMIT && p.y.abs() <= Y_LIMIT {
            current.push(viewport.world_to_screen(*p));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Screen-space runs for `shape` on a `width` x `height` canvas.
///
/// Markers have no curve and yield no runs. A line whose points coincide
/// yields no runs; a vertical line is one run spanning the canvas height.
#[must_use]
pub fn sample_shape(shape: &Shape, viewport: &Viewport, width: f64, height: f64, sampling: &Sampling) -> Vec<Run> {
    match shape {
        Shape::Marker(_) => Vec::new(),
        Shape::Line(l) => match l.form() {
            LineForm::Sloped { slope, intercept } => {
                sample_function(|x| slope.mul_add(x, intercept), viewport, width, sampling.step_px)
            }
            LineForm::Vertical { x } => {
                let sx = viewport.world_to_screen(Point::new(x, 0.0)).x;
                if sx.is_finite() {
                    vec![vec![Point::new(sx, 0.0), Point::new(sx, height)]]
                } else {
                    Vec::new()
                }
            }
            LineForm::Degenerate => Vec::new(),
        },
        Shape::Spline(s) => world_path_runs(&spline_path(s, sampling.t_step), viewport),
        Shape::Parabola(p) => {
            let q = p.coefficients();
            sample_function(|x| q.eval(x), viewport, width, sampling.step_px)
        }
        Shape::Function(f) => {
            let form = f.form;
            sample_function(|x| form.eval(x), viewport, width, sampling.step_px)
        }
    }
}

/// Screen point where a shape's name label is anchored, if it has one.
///
/// Function-like curves use the canvas's horizontal middle; splines use the
/// last control point. Markers are labeled by the renderer directly.
#[must_use]
pub fn label_anchor(shape: &Shape, viewport: &Viewport, width: f64) -> Option<Point> {
    let mid_x = viewport.screen_to_world_x(width * 0.5);
    let world = match shape {
        Shape::Marker(_) => return None,
        Shape::Line(l) => match l.form() {
            LineForm::Sloped { slope, intercept } => Point::new(mid_x, slope.mul_add(mid_x, intercept)),
            LineForm::Vertical { x } => Point::new(x, (l.p1.y + l.p2.y) * 0.5),
            LineForm::Degenerate => return None,
        },
        Shape::Spline(s) => *s.control_points.last()?,
        Shape::Parabola(p) => Point::new(mid_x, p.coefficients().eval(mid_x)),
        Shape::Function(f) => Point::new(mid_x, f.form.eval(mid_x)),
    };
    (world.is_finite() && world.y.abs() <= Y_LIMIT).then(|| viewport.world_to_screen(world))
}
