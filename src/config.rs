//! Host-supplied engine configuration.
//!
//! The host passes a JSON object; every field is optional and missing fields
//! take the defaults from [`crate::consts`]. `validate` runs after decoding so
//! a config built in Rust goes through the same checks.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CURVE_HIT_PX, DEFAULT_SCALE, DEFAULT_SPLINE_POINTS, HANDLE_HIT_PX, MAX_FUNCTION_CURVES, MIN_SAMPLE_STEP_PX,
    MIN_SPLINE_T_STEP, SAMPLE_STEP_PX, SCALE_MAX, SCALE_MIN, SPLINE_T_STEP, WHEEL_ZOOM_STEP,
};
use crate::curve::Sampling;
use crate::input::SnapStep;

/// Errors produced while loading or validating a [`PlotConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON text could not be decoded.
    #[error("failed to decode config: {0}")]
    Json(#[from] serde_json::Error),
    /// `snap_step` is not one of 0, 0.25, 0.5 or 1.
    #[error("invalid snap step: {0}")]
    SnapStep(f64),
    /// A pixel threshold or step is zero, negative, or not finite.
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    /// A sampling step is finer than the engine can draw per frame.
    #[error("{field} must be at least {min}, got {value}")]
    TooFine { field: &'static str, value: f64, min: f64 },
    /// The wheel zoom factor must be greater than one.
    #[error("wheel_zoom_step must be greater than 1, got {0}")]
    WheelStep(f64),
    /// `default_scale` is outside the zoom range.
    #[error("default_scale {0} is outside {min}..={max}", min = SCALE_MIN, max = SCALE_MAX)]
    Scale(f64),
    /// A count that must be at least one is zero.
    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),
}

/// Engine tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Grid snap step in world units (0 disables snapping).
    pub snap_step: f64,
    /// Hit radius for markers and control handles, in pixels.
    pub handle_hit_px: f64,
    /// Hit distance for curve bodies, in pixels.
    pub curve_hit_px: f64,
    /// Horizontal sampling step for `y = f(x)` curves, in pixels.
    pub sample_step_px: f64,
    /// Parameter step per Catmull–Rom segment.
    pub spline_t_step: f64,
    /// Scale factor per wheel notch.
    pub wheel_zoom_step: f64,
    /// Scale used on startup and by reset view.
    pub default_scale: f64,
    /// Maximum number of function curves.
    pub max_function_curves: usize,
    /// Clicks requested by the spline tool when no count is given.
    pub default_spline_points: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            snap_step: 0.0,
            handle_hit_px: HANDLE_HIT_PX,
            curve_hit_px: CURVE_HIT_PX,
            sample_step_px: SAMPLE_STEP_PX,
            spline_t_step: SPLINE_T_STEP,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
            default_scale: DEFAULT_SCALE,
            max_function_curves: MAX_FUNCTION_CURVES,
            default_spline_points: DEFAULT_SPLINE_POINTS,
        }
    }
}

impl PlotConfig {
    /// Decode and validate a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and any
    /// [`PlotConfig::validate`] error for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.snap()?;
        for (field, value) in [
            ("handle_hit_px", self.handle_hit_px),
            ("curve_hit_px", self.curve_hit_px),
            ("sample_step_px", self.sample_step_px),
            ("spline_t_step", self.spline_t_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        for (field, value, min) in [
            ("sample_step_px", self.sample_step_px, MIN_SAMPLE_STEP_PX),
            ("spline_t_step", self.spline_t_step, MIN_SPLINE_T_STEP),
        ] {
            if value < min {
                return Err(ConfigError::TooFine { field, value, min });
            }
        }
        if !(self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 1.0) {
            return Err(ConfigError::WheelStep(self.wheel_zoom_step));
        }
        if !(SCALE_MIN..=SCALE_MAX).contains(&self.default_scale) {
            return Err(ConfigError::Scale(self.default_scale));
        }
        if self.max_function_curves == 0 {
            return Err(ConfigError::ZeroCount("max_function_curves"));
        }
        if self.default_spline_points == 0 {
            return Err(ConfigError::ZeroCount("default_spline_points"));
        }
        Ok(())
    }

    /// The configured snap step as a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SnapStep`] when `snap_step` is not an allowed step.
    pub fn snap(&self) -> Result<SnapStep, ConfigError> {
        SnapStep::from_value(self.snap_step).ok_or(ConfigError::SnapStep(self.snap_step))
    }

    /// Curve sampling steps.
    #[must_use]
    pub fn sampling(&self) -> Sampling {
        Sampling { step_px: self.sample_step_px, t_step: self.spline_t_step }
    }
}
