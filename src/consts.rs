//! Shared numeric constants for the plotting engine.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed scale, in pixels per world unit.
pub const SCALE_MIN: f64 = 10.0;

/// Largest allowed scale, in pixels per world unit.
pub const SCALE_MAX: f64 = 120.0;

/// Scale applied on startup and by "reset view".
pub const DEFAULT_SCALE: f64 = 40.0;

/// Multiplicative zoom factor for one wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.08;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit radius in pixels for markers and control handles.
pub const HANDLE_HIT_PX: f64 = 12.0;

/// Screen-space hit distance in pixels for curve bodies.
pub const CURVE_HIT_PX: f64 = 10.0;

// ── Sampling ────────────────────────────────────────────────────

/// Horizontal pixel step used when sampling `y = f(x)` curves.
pub const SAMPLE_STEP_PX: f64 = 2.0;

/// Parameter step used when sampling one Catmull–Rom segment.
pub const SPLINE_T_STEP: f64 = 0.05;

/// Finest accepted sampling steps; smaller values are clamped up to these.
pub const MIN_SAMPLE_STEP_PX: f64 = 0.25;
pub const MIN_SPLINE_T_STEP: f64 = 1e-3;

/// Magnitude guard in world units; samples beyond it break the curve.
pub const Y_LIMIT: f64 = 1e6;

/// Threshold below which a length or denominator counts as zero.
pub const GEOM_EPSILON: f64 = 1e-9;

// ── Grid ────────────────────────────────────────────────────────

/// Every Nth unit grid line is drawn as a major line.
pub const GRID_MAJOR_EVERY: f64 = 5.0;

/// Upper bound on grid lines per direction in one frame.
pub const GRID_MAX_LINES: usize = 4096;

// ── Shapes ──────────────────────────────────────────────────────

/// Leading coefficient used when parabola roots coincide and no earlier
/// coefficient is known.
pub const DEFAULT_PARABOLA_A: f64 = 1.0;

/// Default marker diameter in pixels.
pub const DEFAULT_MARKER_SIZE_PX: f64 = 8.0;

/// Marker diameter limits in pixels.
pub const MARKER_SIZE_MIN_PX: f64 = 2.0;
pub const MARKER_SIZE_MAX_PX: f64 = 40.0;

/// Maximum number of function curves alive at once.
pub const MAX_FUNCTION_CURVES: usize = 3;

/// Control points placed by the spline tool when no count is given.
pub const DEFAULT_SPLINE_POINTS: usize = 4;

// ── Text ────────────────────────────────────────────────────────

/// Axis labels are truncated to this many characters.
pub const MAX_AXIS_LABEL_CHARS: usize = 20;

/// Shape names and marker labels are truncated to this many characters.
pub const MAX_NAME_CHARS: usize = 40;

/// Font size for labels, tooltips and the HUD, in pixels.
pub const LABEL_FONT_PX: f64 = 12.0;
