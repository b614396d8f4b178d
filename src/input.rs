//! Input model: buttons, keys, touches, placement tools, and the gesture
//! state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! Each active variant carries the context needed to apply the next move.
//! `UiState` holds the ephemeral interaction state the renderer reads (hover,
//! cursor, pending prompt, axis label hit boxes).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{Axis, ShapeId};
use crate::hit::{CurveHit, HandleRef};
use crate::routing::Rect;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button; always pans.
    Middle,
    /// Right mouse button; ignored by the canvas.
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub dy: f64,
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Browser touch identifier.
    pub id: i32,
    /// Screen position relative to the canvas.
    pub pos: Point,
}

/// Grid snap step applied to every coordinate written by a drag or placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapStep {
    /// Raw coordinates.
    #[default]
    Off,
    /// 0.25 world units.
    Quarter,
    /// 0.5 world units.
    Half,
    /// 1 world unit.
    Unit,
}

impl SnapStep {
    /// Step in world units; 0 when snapping is off.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::Unit => 1.0,
        }
    }

    /// The step whose value is exactly `v`, if any.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_value(v: f64) -> Option<Self> {
        [Self::Off, Self::Quarter, Self::Half, Self::Unit].into_iter().find(|s| s.value() == v)
    }
}

/// What a multi-click placement builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// One click; attaches to the curve under the click, if any.
    Marker,
    /// Two clicks: `p1`, then `p2`.
    Line,
    /// One click per control point.
    Spline { points: usize },
    /// Three clicks: first root x, second root x, vertex height.
    Parabola,
}

impl PlacementKind {
    /// Number of clicks needed to complete the shape.
    #[must_use]
    pub fn clicks(self) -> usize {
        match self {
            Self::Marker => 1,
            Self::Line => 2,
            Self::Spline { points } => points.max(1),
            Self::Parabola => 3,
        }
    }
}

/// A text prompt the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Rename an axis label.
    RenameAxis(Axis),
    /// Name the curve that was clicked.
    NameCurve(ShapeId),
}

/// Hit boxes of the axis labels from the last frame, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisLabelRects {
    pub x: Option<Rect>,
    pub y: Option<Rect>,
}

impl AxisLabelRects {
    /// The axis whose label box contains `p`.
    #[must_use]
    pub fn axis_at(&self, p: Point) -> Option<Axis> {
        if self.x.is_some_and(|r| r.contains(p)) {
            Some(Axis::X)
        } else if self.y.is_some_and(|r| r.contains(p)) {
            Some(Axis::Y)
        } else {
            None
        }
    }
}

/// Ephemeral interaction state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Last known pointer position over the canvas.
    pub pointer: Option<Point>,
    /// Curve point highlighted under the cursor.
    pub hover: Option<CurveHit>,
    /// Current CSS cursor name.
    pub cursor: String,
    /// Prompt waiting for `submit_prompt` or Escape.
    pub pending_prompt: Option<Prompt>,
    /// Axis label hit boxes reported by the last render.
    pub axis_label_rects: AxisLabelRects,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            pointer: None,
            hover: None,
            cursor: "default".into(),
            pending_prompt: None,
            axis_label_rects: AxisLabelRects::default(),
        }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging empty canvas to pan.
    PanningBackground {
        /// Screen position of the previous pointer event, used for the pan delta.
        last_screen: Point,
    },
    /// Dragging a handle.
    DraggingHandle {
        /// The grabbed handle.
        handle: HandleRef,
    },
    /// Collecting clicks for a new shape.
    PlacingPoints {
        /// What is being built.
        kind: PlacementKind,
        /// The shape created by the first click; `None` before it.
        shape: Option<ShapeId>,
        /// Clicks still needed.
        remaining: usize,
    },
    /// Two-finger pinch zoom.
    Pinching {
        /// Finger distance at the previous touch event.
        last_distance: f64,
        /// Finger midpoint at the previous touch event.
        last_mid: Point,
    },
}

impl InputState {
    /// Whether a drag-style gesture (pan, handle drag, pinch) is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::PanningBackground { .. } | Self::DraggingHandle { .. } | Self::Pinching { .. })
    }
}
