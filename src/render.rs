//! Rendering: draws one frame of the plot onto a [`Surface`].
//!
//! The render pass reads the scene, the ephemeral UI state and the theme and
//! produces pixels. It does not mutate any of them. The one thing it reports
//! back is the frame layout (the axis label hit boxes), which the engine
//! stores for the next pointer-down.
//!
//! All fallible surface calls propagate errors via `Result<_, S::Error>`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::Point;
use crate::color::with_opacity;
use crate::consts::{GRID_MAJOR_EVERY, GRID_MAX_LINES};
use crate::curve::{Sampling, label_anchor, sample_shape};
use crate::doc::{Axis, Marker, Shape};
use crate::hit::{CurveHit, HandleRef, handles_of, handles_visible};
use crate::input::{AxisLabelRects, UiState};
use crate::routing::Rect;
use crate::scene::Scene;
use crate::theme::Theme;

/// Curve stroke width in pixels.
const CURVE_WIDTH_PX: f64 = 2.0;

/// Handle circle radius in pixels; the grabbed handle is drawn larger.
const HANDLE_RADIUS_PX: f64 = 5.0;
const ACTIVE_HANDLE_RADIUS_PX: f64 = 7.0;

/// Offset of curve name labels from their anchor.
const LABEL_OFFSET_PX: f64 = 6.0;

/// Tooltip geometry.
const TOOLTIP_PAD_X: f64 = 6.0;
const TOOLTIP_HEIGHT: f64 = 18.0;
const TOOLTIP_GAP: f64 = 10.0;
const BOX_RADIUS: f64 = 6.0;

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Measured text extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

/// The drawing primitives the render pass needs.
///
/// Coordinates are CSS pixels with the origin at the top-left of the canvas.
pub trait Surface {
    type Error;

    /// Canvas size `(width, height)` in CSS pixels.
    fn size(&self) -> (f64, f64);

    /// Fill the whole canvas with `color`.
    fn fill_background(&mut self, color: &str) -> Result<(), Self::Error>;

    fn set_stroke(&mut self, color: &str, width: f64);

    fn set_fill(&mut self, color: &str);

    /// Stroke one segment.
    fn line(&mut self, a: Point, b: Point) -> Result<(), Self::Error>;

    /// Stroke a connected polyline. Fewer than two points draws nothing.
    fn polyline(&mut self, points: &[Point]) -> Result<(), Self::Error> {
        for seg in points.windows(2) {
            self.line(seg[0], seg[1])?;
        }
        Ok(())
    }

    /// Draw a circle, filled and/or stroked with the current styles.
    fn circle(&mut self, center: Point, radius: f64, fill: bool, stroke: bool) -> Result<(), Self::Error>;

    /// Fill a rounded rectangle with the current fill style.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64) -> Result<(), Self::Error>;

    /// Size of `text` in the label font.
    fn measure_text(&mut self, text: &str) -> Result<TextSize, Self::Error>;

    /// Fill `text` anchored at `at`.
    fn text(&mut self, text: &str, at: Point, h: HAlign, v: VAlign) -> Result<(), Self::Error>;
}

/// Everything one frame reads.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub ui: &'a UiState,
    pub theme: &'a Theme,
    pub sampling: Sampling,
    /// Handle being dragged, drawn enlarged.
    pub active_handle: Option<HandleRef>,
}

/// Screen layout produced by a frame and fed back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameLayout {
    pub axis_labels: AxisLabelRects,
}

/// Draw the full frame: grid, axes, curves, handles, markers, hover tooltip
/// and the cursor HUD.
///
/// # Errors
///
/// Returns the surface's error if any drawing call fails.
pub fn draw<S: Surface>(s: &mut S, frame: &Frame<'_>) -> Result<FrameLayout, S::Error> {
    let (width, height) = s.size();
    let theme = frame.theme;

    // Layer 1: background, grid, axes.
    s.fill_background(theme.canvas_bg)?;
    draw_grid(s, frame.scene, width, height, theme)?;
    let axis_labels = draw_axes(s, frame.scene, width, height, theme)?;

    // Layer 2: curves and their labels.
    for shape in frame.scene.shapes().iter().filter(|sh| sh.is_curve()) {
        draw_curve(s, shape, frame, width, height)?;
    }

    // Layer 3: handles, then markers above them.
    for shape in frame.scene.shapes().iter().filter(|sh| sh.is_curve() && handles_visible(sh)) {
        draw_handles(s, shape, frame)?;
    }
    for shape in frame.scene.shapes() {
        if let Shape::Marker(m) = shape {
            draw_marker(s, m, frame)?;
        }
    }

    // Layer 4: hover tooltip and HUD.
    if let Some(hover) = &frame.ui.hover {
        draw_hover_tip(s, hover, frame, width)?;
    }
    if let Some(pointer) = frame.ui.pointer {
        draw_hud(s, frame, pointer, height)?;
    }

    Ok(FrameLayout { axis_labels })
}

// =============================================================
// Grid and axes
// =============================================================

fn is_major(v: f64) -> bool {
    v.rem_euclid(GRID_MAJOR_EVERY).abs() < 1e-9
}

fn draw_grid<S: Surface>(s: &mut S, scene: &Scene, width: f64, height: f64, theme: &Theme) -> Result<(), S::Error> {
    let vp = &scene.viewport;
    let (left, right) = vp.visible_x_range(width);
    let (bottom, top) = vp.visible_y_range(height);
    let xs = unit_steps(left, right);
    let ys = unit_steps(bottom, top);

    for (major, color) in [(false, theme.grid_minor), (true, theme.grid_major)] {
        s.set_stroke(color, 1.0);
        for &x in xs.iter().filter(|&&x| is_major(x) == major) {
            let sx = vp.world_to_screen(Point::new(x, 0.0)).x;
            s.line(Point::new(sx, 0.0), Point::new(sx, height))?;
        }
        for &y in ys.iter().filter(|&&y| is_major(y) == major) {
            let sy = vp.world_to_screen_y(y);
            s.line(Point::new(0.0, sy), Point::new(width, sy))?;
        }
    }
    Ok(())
}

/// Whole world units covering `lo..=hi`, at most [`GRID_MAX_LINES`] of them.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn unit_steps(lo: f64, hi: f64) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi < lo {
        return Vec::new();
    }
    let first = lo.floor();
    let count = ((hi.ceil() - first) as usize).min(GRID_MAX_LINES - 1);
    (0..=count).map(|i| first + i as f64).collect()
}

fn draw_axes<S: Surface>(
    s: &mut S,
    scene: &Scene,
    width: f64,
    height: f64,
    theme: &Theme,
) -> Result<AxisLabelRects, S::Error> {
    let origin = scene.viewport.world_to_screen(Point::new(0.0, 0.0));
    s.set_stroke(theme.axis, 2.0);
    s.line(Point::new(origin.x, 0.0), Point::new(origin.x, height))?;
    s.line(Point::new(0.0, origin.y), Point::new(width, origin.y))?;

    s.set_fill(theme.muted);
    let x_at = Point::new(4.0, origin.y - LABEL_OFFSET_PX);
    let x_rect = draw_axis_label(s, scene.axis_labels.get(Axis::X), "x", x_at, VAlign::Bottom)?;
    let y_at = Point::new(origin.x + LABEL_OFFSET_PX, 4.0);
    let y_rect = draw_axis_label(s, scene.axis_labels.get(Axis::Y), "y", y_at, VAlign::Top)?;
    Ok(AxisLabelRects { x: Some(x_rect), y: Some(y_rect) })
}

/// Draw one axis caption and return its hit box (text box padded by 3px).
fn draw_axis_label<S: Surface>(
    s: &mut S,
    label: &str,
    fallback: &str,
    at: Point,
    v: VAlign,
) -> Result<Rect, S::Error> {
    let text = if label.is_empty() { fallback } else { label };
    let size = s.measure_text(text)?;
    s.text(text, at, HAlign::Left, v)?;
    let top = match v {
        VAlign::Top => at.y,
        VAlign::Middle => at.y - size.height * 0.5,
        VAlign::Bottom => at.y - size.height,
    };
    Ok(Rect::new(at.x, top, size.width, size.height).padded(3.0))
}

// =============================================================
// Shapes
// =============================================================

fn draw_curve<S: Surface>(s: &mut S, shape: &Shape, frame: &Frame<'_>, width: f64, height: f64) -> Result<(), S::Error> {
    let vp = &frame.scene.viewport;
    s.set_stroke(&with_opacity(shape.color(), shape.opacity_pct()), CURVE_WIDTH_PX);
    for run in sample_shape(shape, vp, width, height, &frame.sampling) {
        s.polyline(&run)?;
    }

    let name = shape.name().trim();
    if name.is_empty() {
        return Ok(());
    }
    if let Some(anchor) = label_anchor(shape, vp, width) {
        s.set_fill(frame.theme.hud_text);
        let at = Point::new(anchor.x + LABEL_OFFSET_PX, anchor.y - LABEL_OFFSET_PX);
        s.text(name, at, HAlign::Left, VAlign::Bottom)?;
    }
    Ok(())
}

fn draw_handles<S: Surface>(s: &mut S, shape: &Shape, frame: &Frame<'_>) -> Result<(), S::Error> {
    s.set_stroke(&with_opacity(shape.color(), shape.opacity_pct()), 2.0);
    s.set_fill(frame.theme.canvas_bg);
    for (part, world) in handles_of(shape) {
        let active = frame.active_handle == Some(HandleRef { shape: shape.id(), part });
        let radius = if active { ACTIVE_HANDLE_RADIUS_PX } else { HANDLE_RADIUS_PX };
        s.circle(frame.scene.viewport.world_to_screen(world), radius, true, true)?;
    }
    Ok(())
}

fn draw_marker<S: Surface>(s: &mut S, m: &Marker, frame: &Frame<'_>) -> Result<(), S::Error> {
    let at = frame.scene.viewport.world_to_screen(m.position);
    if !at.is_finite() {
        return Ok(());
    }
    let radius = m.size_px * 0.5;
    s.set_fill(&with_opacity(&m.color, m.opacity_pct));
    s.set_stroke(frame.theme.canvas_bg, 1.0);
    s.circle(at, radius, true, true)?;

    let text = marker_caption(m);
    if !text.is_empty() {
        s.set_fill(frame.theme.hud_text);
        let offset = radius + 4.0;
        s.text(&text, Point::new(at.x + offset, at.y - offset), HAlign::Left, VAlign::Bottom)?;
    }
    Ok(())
}

/// Marker label, followed by its coordinates when `show_coords` is set.
#[must_use]
pub fn marker_caption(m: &Marker) -> String {
    let label = m.label.trim();
    if !m.show_coords {
        return label.to_owned();
    }
    let coords = format_point(m.position);
    if label.is_empty() { coords } else { format!("{label} {coords}") }
}

/// `(x.xx, y.yy)`.
#[must_use]
pub fn format_point(p: Point) -> String {
    format!("({:.2}, {:.2})", p.x, p.y)
}

// =============================================================
// Hover tooltip and HUD
// =============================================================

/// Tooltip box for a hover point: up-right of it, flipped left or below when
/// it would leave the canvas.
#[must_use]
pub fn tooltip_rect(point: Point, text_width: f64, canvas_width: f64) -> Rect {
    let w = text_width + TOOLTIP_PAD_X * 2.0;
    let mut x = point.x + TOOLTIP_GAP;
    let mut y = point.y - TOOLTIP_HEIGHT - TOOLTIP_GAP;
    if x + w > canvas_width {
        x = point.x - w - TOOLTIP_GAP;
    }
    if y < 0.0 {
        y = point.y + TOOLTIP_GAP;
    }
    Rect::new(x, y, w, TOOLTIP_HEIGHT)
}

fn draw_hover_tip<S: Surface>(s: &mut S, hit: &CurveHit, frame: &Frame<'_>, width: f64) -> Result<(), S::Error> {
    let theme = frame.theme;
    let color = frame.scene.get(&hit.shape).map_or(theme.plot, Shape::color);
    s.set_stroke(color, 2.0);
    s.set_fill(theme.canvas_bg);
    s.circle(hit.screen, 3.0, true, true)?;

    let label = format_point(hit.world);
    let size = s.measure_text(&label)?;
    let rect = tooltip_rect(hit.screen, size.width, width);

    s.set_stroke(theme.muted, 1.0);
    s.line(hit.screen, Point::new(rect.x + rect.w * 0.5, rect.y + rect.h))?;
    s.set_fill(theme.hud_bg);
    s.fill_rounded_rect(rect, BOX_RADIUS)?;
    s.set_fill(theme.hud_text);
    s.text(&label, Point::new(rect.x + TOOLTIP_PAD_X, rect.y + rect.h * 0.5), HAlign::Left, VAlign::Middle)
}

fn draw_hud<S: Surface>(s: &mut S, frame: &Frame<'_>, pointer: Point, height: f64) -> Result<(), S::Error> {
    let world = frame.scene.viewport.screen_to_world(pointer);
    let label = format!("x={:.2}, y={:.2}", world.x, world.y);
    let size = s.measure_text(&label)?;
    s.set_fill(frame.theme.hud_bg);
    s.fill_rounded_rect(Rect::new(10.0, height - 30.0, size.width + 14.0, 22.0), BOX_RADIUS)?;
    s.set_fill(frame.theme.hud_text);
    s.text(&label, Point::new(17.0, height - 19.0), HAlign::Left, VAlign::Middle)
}
