//! Scene state: the ordered shape collection, the viewport, and axis labels.
//!
//! `Scene` is the single owner of every shape. Input handlers mutate it
//! through its methods; the render pass only reads it. Shapes are kept in
//! insertion order, which is also the hit-test iteration order.
//!
//! Handle moves apply grid snapping and the dependent recomputation each kind
//! needs (parabola vertex x follows its roots, attached markers follow their
//! parent curve).

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::camera::{Point, Viewport};
use crate::color::auto_color;
use crate::consts::{
    DEFAULT_MARKER_SIZE_PX, DEFAULT_PARABOLA_A, MAX_AXIS_LABEL_CHARS, MAX_FUNCTION_CURVES, SPLINE_T_STEP, Y_LIMIT,
};
use crate::curve::spline_path;
use crate::doc::{
    Axis, AxisLabels, FunctionCurve, FunctionForm, Marker, Parabola, Shape, ShapeId, ShapeKind, ShapePatch,
    SplineCurve, TwoPointLine,
};
use crate::entry::truncate_chars;
use crate::geometry::{LineForm, project_to_segment, snap, snap_point};
use crate::hit::{HandlePart, HandleRef, LineEnd, handles_of};

/// Errors returned by scene mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// No shape with this id exists.
    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),
    /// A patch field does not exist on the target shape's kind.
    #[error("field `{field}` does not apply to {kind:?} shapes")]
    InapplicableField { field: &'static str, kind: ShapeKind },
    /// The shape exists but is the wrong kind for this operation.
    #[error("shape {id} is a {actual:?}, expected {expected:?}")]
    WrongKind { id: ShapeId, expected: ShapeKind, actual: ShapeKind },
    /// The handle does not exist on the shape.
    #[error("shape {id} has no handle {part:?}")]
    NoSuchHandle { id: ShapeId, part: HandlePart },
    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// All shapes plus view state.
#[derive(Debug, Clone)]
pub struct Scene {
    shapes: Vec<Shape>,
    /// Current pan/zoom.
    pub viewport: Viewport,
    /// Axis captions.
    pub axis_labels: AxisLabels,
    max_function_curves: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene with the default function-curve limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_function_limit(MAX_FUNCTION_CURVES)
    }

    /// An empty scene allowing at most `max_function_curves` function curves.
    #[must_use]
    pub fn with_function_limit(max_function_curves: usize) -> Self {
        Self {
            shapes: Vec::new(),
            viewport: Viewport::default(),
            axis_labels: AxisLabels::default(),
            max_function_curves,
        }
    }

    // --- Creation ---

    /// Add a standalone marker.
    pub fn add_marker(&mut self, position: Point) -> ShapeId {
        let id = ShapeId::new_v4();
        self.insert(Shape::Marker(Marker {
            id,
            position,
            label: String::new(),
            color: auto_color(&id),
            size_px: DEFAULT_MARKER_SIZE_PX,
            opacity_pct: 100.0,
            show_coords: false,
            parent_line_id: None,
        }))
    }

    /// Add a two-point line.
    pub fn add_line(&mut self, p1: Point, p2: Point) -> ShapeId {
        let id = ShapeId::new_v4();
        self.insert(Shape::Line(TwoPointLine {
            id,
            p1,
            p2,
            color: auto_color(&id),
            name: String::new(),
            opacity_pct: 100.0,
            show_endpoint_handles: true,
        }))
    }

    /// Add a smooth spline through `control_points`.
    pub fn add_spline(&mut self, control_points: Vec<Point>) -> ShapeId {
        let id = ShapeId::new_v4();
        self.insert(Shape::Spline(SplineCurve {
            id,
            control_points,
            color: auto_color(&id),
            name: String::new(),
            opacity_pct: 100.0,
            straight_mode: false,
            show_handles: true,
        }))
    }

    /// Add a parabola through the two roots with the given vertex height.
    pub fn add_parabola(&mut self, root1_x: f64, root2_x: f64, vertex_y: f64) -> ShapeId {
        let id = ShapeId::new_v4();
        let mut parabola = Parabola {
            id,
            root1_x,
            root2_x,
            vertex_y,
            fallback_a: DEFAULT_PARABOLA_A,
            color: auto_color(&id),
            name: String::new(),
            opacity_pct: 100.0,
            show_handles: true,
        };
        parabola.set_vertex_y(vertex_y);
        self.insert(Shape::Parabola(parabola))
    }

    /// Add a function curve, or `None` when the limit is reached.
    pub fn add_function(&mut self, form: FunctionForm) -> Option<ShapeId> {
        let count = self.shapes.iter().filter(|s| s.kind() == ShapeKind::Function).count();
        if count >= self.max_function_curves {
            log::warn!("function curve limit of {} reached", self.max_function_curves);
            return None;
        }
        let id = ShapeId::new_v4();
        Some(self.insert(Shape::Function(FunctionCurve {
            id,
            form,
            color: auto_color(&id),
            label: String::new(),
            opacity_pct: 100.0,
        })))
    }

    fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        log::info!("created {:?} {id}", shape.kind());
        self.shapes.push(shape);
        id
    }

    // --- Queries ---

    /// Every shape in insertion order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shapes of one kind, in insertion order.
    #[must_use]
    pub fn list_by_kind(&self, kind: ShapeKind) -> Vec<&Shape> {
        self.shapes.iter().filter(|s| s.kind() == kind).collect()
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == *id)
    }

    fn get_mut(&mut self, id: &ShapeId) -> Result<&mut Shape, SceneError> {
        self.shapes.iter_mut().find(|s| s.id() == *id).ok_or(SceneError::UnknownShape(*id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// World position of a handle, if the shape and handle exist.
    #[must_use]
    pub fn handle_position(&self, handle: &HandleRef) -> Option<Point> {
        let shape = self.get(&handle.shape)?;
        handles_of(shape)
            .into_iter()
            .find(|(part, _)| *part == handle.part)
            .map(|(_, p)| p)
    }

    // --- Panel updates ---

    /// Apply a sparse style/editor update.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`] or
    /// [`SceneError::InapplicableField`]; the shape is unchanged on error.
    pub fn update(&mut self, id: &ShapeId, patch: &ShapePatch) -> Result<(), SceneError> {
        let shape = self.get_mut(id)?;
        if let Err(e) = shape.apply_patch(patch) {
            log::warn!("rejected update for {id}: {e}");
            return Err(e);
        }
        if patch.changes_geometry() {
            self.reproject_children(id);
        }
        Ok(())
    }

    /// Remove a shape. Markers attached to it become standalone.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`] if no such shape exists.
    pub fn delete(&mut self, id: &ShapeId) -> Result<Shape, SceneError> {
        let index = self
            .shapes
            .iter()
            .position(|s| s.id() == *id)
            .ok_or(SceneError::UnknownShape(*id))?;
        let removed = self.shapes.remove(index);
        for shape in &mut self.shapes {
            if let Shape::Marker(m) = shape {
                if m.parent_line_id == Some(*id) {
                    m.parent_line_id = None;
                    log::info!("marker {} detached from deleted {id}", m.id);
                }
            }
        }
        log::info!("deleted {:?} {id}", removed.kind());
        Ok(removed)
    }

    /// Set an axis caption, truncated to 20 characters.
    pub fn set_axis_label(&mut self, axis: Axis, text: &str) {
        let text = truncate_chars(text, MAX_AXIS_LABEL_CHARS);
        match axis {
            Axis::X => self.axis_labels.x = text,
            Axis::Y => self.axis_labels.y = text,
        }
    }

    // --- Attachment ---

    /// Constrain a marker to a curve and move it onto that curve.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`] for either id, or
    /// [`SceneError::WrongKind`] when `marker` is not a marker or `parent` is.
    pub fn attach_marker(&mut self, marker: &ShapeId, parent: &ShapeId) -> Result<(), SceneError> {
        let parent_shape = self.get(parent).ok_or(SceneError::UnknownShape(*parent))?;
        if !parent_shape.is_curve() {
            return Err(SceneError::WrongKind { id: *parent, expected: ShapeKind::Line, actual: ShapeKind::Marker });
        }
        let current = self.marker(marker)?.position;
        let onto = constrain_to(parent_shape, current, 0.0);
        let m = self.marker_mut(marker)?;
        m.parent_line_id = Some(*parent);
        if let Some(p) = onto {
            m.position = p;
        }
        log::info!("marker {marker} attached to {parent}");
        Ok(())
    }

    /// Make an attached marker standalone again.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`] or [`SceneError::WrongKind`].
    pub fn detach_marker(&mut self, marker: &ShapeId) -> Result<(), SceneError> {
        self.marker_mut(marker)?.parent_line_id = None;
        Ok(())
    }

    fn marker(&self, id: &ShapeId) -> Result<&Marker, SceneError> {
        match self.get(id) {
            Some(Shape::Marker(m)) => Ok(m),
            Some(other) => Err(wrong_kind(*id, ShapeKind::Marker, other.kind())),
            None => Err(SceneError::UnknownShape(*id)),
        }
    }

    fn marker_mut(&mut self, id: &ShapeId) -> Result<&mut Marker, SceneError> {
        match self.get_mut(id)? {
            Shape::Marker(m) => Ok(m),
            other => Err(wrong_kind(*id, ShapeKind::Marker, other.kind())),
        }
    }

    // --- Geometry edits ---

    /// Append a snapped control point to a spline.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`], [`SceneError::WrongKind`], or
    /// [`SceneError::NonFinite`].
    pub fn append_control_point(&mut self, id: &ShapeId, world: Point, step: f64) -> Result<(), SceneError> {
        check_finite(world)?;
        match self.get_mut(id)? {
            Shape::Spline(s) => s.control_points.push(snap_point(world, step)),
            other => return Err(wrong_kind(*id, ShapeKind::Spline, other.kind())),
        }
        self.reproject_children(id);
        Ok(())
    }

    /// Set a parabola's second root and pick the vertex height that keeps
    /// its current opening.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`], [`SceneError::WrongKind`], or
    /// [`SceneError::NonFinite`].
    pub fn place_second_root(&mut self, id: &ShapeId, x: f64, step: f64) -> Result<(), SceneError> {
        check_finite(Point::new(x, 0.0))?;
        match self.get_mut(id)? {
            Shape::Parabola(p) => {
                p.root2_x = snap(x, step);
                p.keep_opening();
            }
            other => return Err(wrong_kind(*id, ShapeKind::Parabola, other.kind())),
        }
        self.reproject_children(id);
        Ok(())
    }

    /// Move a handle to `world`, snapping to `step` and recomputing whatever
    /// depends on it.
    ///
    /// Markers attached to a curve stay on it; when the curve has no finite
    /// value under the cursor the marker keeps its position.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`], [`SceneError::NoSuchHandle`], or
    /// [`SceneError::NonFinite`]. The scene is unchanged on error.
    pub fn move_handle(&mut self, handle: &HandleRef, world: Point, step: f64) -> Result<(), SceneError> {
        check_finite(world)?;
        let id = handle.shape;
        let no_handle = SceneError::NoSuchHandle { id, part: handle.part };

        if handle.part == HandlePart::Marker {
            let parent = match self.get(&id) {
                Some(Shape::Marker(m)) => m.parent_line_id,
                Some(_) => return Err(no_handle),
                None => return Err(SceneError::UnknownShape(id)),
            };
            let target = match parent.and_then(|pid| self.get(&pid)) {
                Some(parent) => constrain_to(parent, world, step),
                None => Some(snap_point(world, step)),
            };
            if let Some(p) = target {
                self.marker_mut(&id)?.position = p;
            }
            return Ok(());
        }

        match (self.get_mut(&id)?, handle.part) {
            (Shape::Line(l), HandlePart::LineEnd(end)) => {
                let p = snap_point(world, step);
                match end {
                    LineEnd::P1 => l.p1 = p,
                    LineEnd::P2 => l.p2 = p,
                }
            }
            (Shape::Spline(s), HandlePart::SplinePoint(i)) => {
                let Some(slot) = s.control_points.get_mut(i) else {
                    return Err(no_handle);
                };
                *slot = snap_point(world, step);
            }
            (Shape::Parabola(p), HandlePart::ParabolaRoot(side)) => p.set_root(side, snap(world.x, step)),
            (Shape::Parabola(p), HandlePart::ParabolaVertex) => p.set_vertex_y(snap(world.y, step)),
            _ => return Err(no_handle),
        }
        self.reproject_children(&id);
        Ok(())
    }

    /// Put every marker attached to `parent` back onto it.
    fn reproject_children(&mut self, parent: &ShapeId) {
        let Some(parent_shape) = self.get(parent) else {
            return;
        };
        let moves: Vec<(usize, Point)> = self
            .shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                Shape::Marker(m) if m.parent_line_id == Some(*parent) => {
                    constrain_to(parent_shape, m.position, 0.0).map(|p| (i, p))
                }
                _ => None,
            })
            .collect();
        for (i, p) in moves {
            if let Some(Shape::Marker(m)) = self.shapes.get_mut(i) {
                m.position = p;
            }
        }
    }
}

fn wrong_kind(id: ShapeId, expected: ShapeKind, actual: ShapeKind) -> SceneError {
    SceneError::WrongKind { id, expected, actual }
}

fn check_finite(p: Point) -> Result<(), SceneError> {
    if p.is_finite() { Ok(()) } else { Err(SceneError::NonFinite { x: p.x, y: p.y }) }
}

/// Closest admissible point on `parent` for a marker dragged to `wanted`.
///
/// Function-like curves snap x and evaluate y; vertical lines keep x and snap
/// y; splines project onto the sampled curve. `None` means the curve has no
/// usable value there.
#[must_use]
pub fn constrain_to(parent: &Shape, wanted: Point, step: f64) -> Option<Point> {
    let on_graph = |f: &dyn Fn(f64) -> f64| {
        let x = snap(wanted.x, step);
        let y = f(x);
        (y.is_finite() && y.abs() <= Y_LIMIT).then_some(Point::new(x, y))
    };
    match parent {
        Shape::Marker(_) => None,
        Shape::Line(l) => match l.form() {
            LineForm::Sloped { slope, intercept } => on_graph(&|x| slope.mul_add(x, intercept)),
            LineForm::Vertical { x } => Some(Point::new(x, snap(wanted.y, step))),
            LineForm::Degenerate => Some(l.p1),
        },
        Shape::Function(f) => on_graph(&|x| f.form.eval(x)),
        Shape::Parabola(p) => {
            let q = p.coefficients();
            on_graph(&|x| q.eval(x))
        }
        Shape::Spline(s) => {
            let path = spline_path(s, SPLINE_T_STEP);
            match path.as_slice() {
                [] => None,
                [only] => Some(*only),
                _ => path
                    .windows(2)
                    .map(|w| project_to_segment(wanted, w[0], w[1]))
                    .reduce(|best, p| if p.distance < best.distance { p } else { best })
                    .map(|p| p.point),
            }
        }
    }
}
