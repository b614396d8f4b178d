//! Shape model: the plotted objects, their styles, and sparse panel updates.
//!
//! Each shape kind is its own struct carrying only its own fields; [`Shape`]
//! is the sum type the evaluator, hit-tester and renderer match on. Derived
//! analytic parameters (line slope, parabola coefficients) are never stored.
//! They are recomputed from the canonical points on every query.
//!
//! [`ShapePatch`] is the partial-update type used by style/editor panels.
//! Fields that do not apply to a shape's kind are rejected as a whole.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::color::normalize_hex_color;
use crate::consts::{DEFAULT_MARKER_SIZE_PX, MARKER_SIZE_MAX_PX, MARKER_SIZE_MIN_PX, MAX_NAME_CHARS};
use crate::entry::truncate_chars;
use crate::geometry::{LineForm, Quadratic, parabola_from_roots, parabola_leading_coefficient};
use crate::scene::SceneError;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Labeled point, standalone or attached to a curve.
    Marker,
    /// Infinite line through two points.
    Line,
    /// Curve through an ordered list of control points.
    Spline,
    /// Parabola defined by two roots and a vertex height.
    Parabola,
    /// Linear or quadratic function given by coefficients.
    Function,
}

/// Which axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Free-text axis captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

impl Default for AxisLabels {
    fn default() -> Self {
        Self { x: "x".into(), y: "y".into() }
    }
}

impl AxisLabels {
    #[must_use]
    pub fn get(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

// =============================================================
// Shape kinds
// =============================================================

/// A labeled point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: ShapeId,
    pub position: Point,
    pub label: String,
    pub color: String,
    /// Diameter in pixels.
    pub size_px: f64,
    pub opacity_pct: f64,
    /// Draw `(x, y)` next to the label.
    pub show_coords: bool,
    /// Curve this marker is constrained to, if any.
    pub parent_line_id: Option<ShapeId>,
}

/// An infinite line through `p1` and `p2`. Nothing is drawn when they coincide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoPointLine {
    pub id: ShapeId,
    pub p1: Point,
    pub p2: Point,
    pub color: String,
    pub name: String,
    pub opacity_pct: f64,
    pub show_endpoint_handles: bool,
}

impl TwoPointLine {
    /// Analytic form, derived from the two stored points.
    #[must_use]
    pub fn form(&self) -> LineForm {
        LineForm::through(self.p1, self.p2)
    }
}

/// A curve through its control points: smooth (Catmull–Rom) or a polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineCurve {
    pub id: ShapeId,
    pub control_points: Vec<Point>,
    pub color: String,
    pub name: String,
    pub opacity_pct: f64,
    pub straight_mode: bool,
    pub show_handles: bool,
}

/// A parabola through `(root1_x, 0)` and `(root2_x, 0)` whose vertex sits at
/// the roots' midpoint with height `vertex_y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parabola {
    pub id: ShapeId,
    pub root1_x: f64,
    pub root2_x: f64,
    pub vertex_y: f64,
    /// Leading coefficient used while the roots coincide; tracks the last
    /// non-degenerate solve.
    pub fallback_a: f64,
    pub color: String,
    pub name: String,
    pub opacity_pct: f64,
    pub show_handles: bool,
}

/// Which root of a parabola.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSide {
    First,
    Second,
}

impl Parabola {
    /// Vertex x: always the midpoint of the roots.
    #[must_use]
    pub fn vertex_x(&self) -> f64 {
        (self.root1_x + self.root2_x) * 0.5
    }

    #[must_use]
    pub fn vertex(&self) -> Point {
        Point::new(self.vertex_x(), self.vertex_y)
    }

    #[must_use]
    pub fn root1(&self) -> Point {
        Point::new(self.root1_x, 0.0)
    }

    #[must_use]
    pub fn root2(&self) -> Point {
        Point::new(self.root2_x, 0.0)
    }

    /// `a, b, c` through both roots and the vertex.
    #[must_use]
    pub fn coefficients(&self) -> Quadratic {
        parabola_from_roots(self.root1_x, self.root2_x, self.vertex_y, self.fallback_a)
    }

    /// Move one root, holding the vertex height.
    pub fn set_root(&mut self, side: RootSide, x: f64) {
        match side {
            RootSide::First => self.root1_x = x,
            RootSide::Second => self.root2_x = x,
        }
        self.remember_a();
    }

    /// Move the vertex vertically, holding both roots.
    pub fn set_vertex_y(&mut self, y: f64) {
        self.vertex_y = y;
        self.remember_a();
    }

    /// Pick the vertex height that keeps the current leading coefficient
    /// for the current roots.
    pub fn keep_opening(&mut self) {
        let vx = self.vertex_x();
        self.vertex_y = self.fallback_a * (vx - self.root1_x) * (vx - self.root2_x);
    }

    fn remember_a(&mut self) {
        match parabola_leading_coefficient(self.root1_x, self.root2_x, self.vertex_y) {
            Some(a) if a != 0.0 => self.fallback_a = a,
            Some(_) => {}
            None => log::warn!("parabola {}: roots coincide, keeping a = {}", self.id, self.fallback_a),
        }
    }
}

/// Coefficient form of a function curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FunctionForm {
    /// `y = slope·x + intercept`.
    Linear { slope: f64, intercept: f64 },
    /// `y = a·x² + b·x + c`.
    Quadratic(Quadratic),
}

impl Default for FunctionForm {
    fn default() -> Self {
        Self::Linear { slope: 1.0, intercept: 0.0 }
    }
}

impl FunctionForm {
    #[must_use]
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Self::Linear { slope, intercept } => slope.mul_add(x, intercept),
            Self::Quadratic(q) => q.eval(x),
        }
    }
}

/// A `y = f(x)` curve given by coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCurve {
    pub id: ShapeId,
    pub form: FunctionForm,
    pub color: String,
    pub label: String,
    pub opacity_pct: f64,
}

// =============================================================
// Shape
// =============================================================

/// Any plotted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Marker(Marker),
    Line(TwoPointLine),
    Spline(SplineCurve),
    Parabola(Parabola),
    Function(FunctionCurve),
}

impl Shape {
    #[must_use]
    pub fn id(&self) -> ShapeId {
        match self {
            Self::Marker(m) => m.id,
            Self::Line(l) => l.id,
            Self::Spline(s) => s.id,
            Self::Parabola(p) => p.id,
            Self::Function(f) => f.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Marker(_) => ShapeKind::Marker,
            Self::Line(_) => ShapeKind::Line,
            Self::Spline(_) => ShapeKind::Spline,
            Self::Parabola(_) => ShapeKind::Parabola,
            Self::Function(_) => ShapeKind::Function,
        }
    }

    /// Stroke/fill color as `#rrggbb`.
    #[must_use]
    pub fn color(&self) -> &str {
        match self {
            Self::Marker(m) => &m.color,
            Self::Line(l) => &l.color,
            Self::Spline(s) => &s.color,
            Self::Parabola(p) => &p.color,
            Self::Function(f) => &f.color,
        }
    }

    /// Display name (marker and function labels included).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Marker(m) => &m.label,
            Self::Line(l) => &l.name,
            Self::Spline(s) => &s.name,
            Self::Parabola(p) => &p.name,
            Self::Function(f) => &f.label,
        }
    }

    #[must_use]
    pub fn opacity_pct(&self) -> f64 {
        match self {
            Self::Marker(m) => m.opacity_pct,
            Self::Line(l) => l.opacity_pct,
            Self::Spline(s) => s.opacity_pct,
            Self::Parabola(p) => p.opacity_pct,
            Self::Function(f) => f.opacity_pct,
        }
    }

    /// Whether this shape draws a curve that markers can attach to.
    #[must_use]
    pub fn is_curve(&self) -> bool {
        !matches!(self, Self::Marker(_))
    }

    /// Apply a sparse update. Nothing changes if any present field does not
    /// apply to this shape's kind.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InapplicableField`] naming the first such field.
    pub fn apply_patch(&mut self, patch: &ShapePatch) -> Result<(), SceneError> {
        if let Some(field) = patch.inapplicable_field(self.kind()) {
            return Err(SceneError::InapplicableField { field, kind: self.kind() });
        }
        if let Some(name) = &patch.name {
            let name = truncate_chars(name, MAX_NAME_CHARS);
            match self {
                Self::Marker(m) => m.label = name,
                Self::Line(l) => l.name = name,
                Self::Spline(s) => s.name = name,
                Self::Parabola(p) => p.name = name,
                Self::Function(f) => f.label = name,
            }
        }
        if let Some(color) = &patch.color {
            let color = normalize_hex_color(color, self.color());
            match self {
                Self::Marker(m) => m.color = color,
                Self::Line(l) => l.color = color,
                Self::Spline(s) => s.color = color,
                Self::Parabola(p) => p.color = color,
                Self::Function(f) => f.color = color,
            }
        }
        if let Some(opacity) = patch.opacity_pct {
            let opacity = clamp_opacity(opacity);
            match self {
                Self::Marker(m) => m.opacity_pct = opacity,
                Self::Line(l) => l.opacity_pct = opacity,
                Self::Spline(s) => s.opacity_pct = opacity,
                Self::Parabola(p) => p.opacity_pct = opacity,
                Self::Function(f) => f.opacity_pct = opacity,
            }
        }
        match self {
            Self::Marker(m) => {
                if let Some(size) = patch.size_px {
                    m.size_px = clamp_marker_size(size);
                }
                if let Some(show) = patch.show_coords {
                    m.show_coords = show;
                }
            }
            Self::Line(l) => {
                if let Some(show) = patch.show_handles {
                    l.show_endpoint_handles = show;
                }
            }
            Self::Spline(s) => {
                if let Some(show) = patch.show_handles {
                    s.show_handles = show;
                }
                if let Some(straight) = patch.straight_mode {
                    s.straight_mode = straight;
                }
            }
            Self::Parabola(p) => {
                if let Some(show) = patch.show_handles {
                    p.show_handles = show;
                }
            }
            Self::Function(f) => {
                if let Some(form) = patch.form {
                    f.form = form;
                }
            }
        }
        Ok(())
    }
}

/// Sparse update for a shape. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePatch {
    /// New name (marker/function label), truncated to 40 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New color; unparseable values keep the current color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New opacity in percent, clamped to 0..=100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity_pct: Option<f64>,
    /// Show or hide control handles (lines, splines, parabolas).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_handles: Option<bool>,
    /// Marker diameter in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_px: Option<f64>,
    /// Show marker coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_coords: Option<bool>,
    /// Spline polyline mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub straight_mode: Option<bool>,
    /// Function coefficients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FunctionForm>,
}

impl ShapePatch {
    /// First present field that `kind` does not have.
    #[must_use]
    pub fn inapplicable_field(&self, kind: ShapeKind) -> Option<&'static str> {
        let marker = kind == ShapeKind::Marker;
        if self.show_handles.is_some() && matches!(kind, ShapeKind::Marker | ShapeKind::Function) {
            return Some("show_handles");
        }
        if self.size_px.is_some() && !marker {
            return Some("size_px");
        }
        if self.show_coords.is_some() && !marker {
            return Some("show_coords");
        }
        if self.straight_mode.is_some() && kind != ShapeKind::Spline {
            return Some("straight_mode");
        }
        if self.form.is_some() && kind != ShapeKind::Function {
            return Some("form");
        }
        None
    }

    /// Whether applying this patch can move the shape's curve.
    #[must_use]
    pub fn changes_geometry(&self) -> bool {
        self.form.is_some() || self.straight_mode.is_some()
    }
}

/// Clamp an opacity percentage to `0..=100`; non-finite becomes fully opaque.
#[must_use]
pub fn clamp_opacity(pct: f64) -> f64 {
    if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 100.0 }
}

/// Clamp a marker diameter to the allowed pixel range.
#[must_use]
pub fn clamp_marker_size(px: f64) -> f64 {
    if px.is_finite() {
        px.clamp(MARKER_SIZE_MIN_PX, MARKER_SIZE_MAX_PX)
    } else {
        DEFAULT_MARKER_SIZE_PX
    }
}

