#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn empty_object_gives_defaults() {
    let config = PlotConfig::from_json("{}").unwrap();
    assert_eq!(config, PlotConfig::default());
    assert_eq!(config.handle_hit_px, 12.0);
    assert_eq!(config.curve_hit_px, 10.0);
    assert_eq!(config.max_function_curves, 3);
}

#[test]
fn partial_object_overrides_named_fields() {
    let config = PlotConfig::from_json(r#"{"snap_step": 0.5, "curve_hit_px": 6}"#).unwrap();
    assert_eq!(config.snap_step, 0.5);
    assert_eq!(config.curve_hit_px, 6.0);
    assert_eq!(config.sample_step_px, 2.0);
    assert_eq!(config.snap().unwrap(), SnapStep::Half);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(PlotConfig::from_json("{snap_step:"), Err(ConfigError::Json(_))));
}

#[test]
fn snap_step_must_be_allowed_value() {
    let err = PlotConfig::from_json(r#"{"snap_step": 0.3}"#).unwrap_err();
    assert!(matches!(err, ConfigError::SnapStep(v) if v == 0.3));
}

#[test]
fn non_positive_thresholds_are_rejected() {
    let config = PlotConfig { handle_hit_px: 0.0, ..PlotConfig::default() };
    assert!(matches!(config.validate(), Err(ConfigError::NonPositive { field: "handle_hit_px", .. })));

    let config = PlotConfig { spline_t_step: f64::NAN, ..PlotConfig::default() };
    assert!(matches!(config.validate(), Err(ConfigError::NonPositive { field: "spline_t_step", .. })));
}

#[test]
fn sampling_steps_have_a_floor() {
    let err = PlotConfig::from_json(r#"{"spline_t_step": 1e-30}"#).unwrap_err();
    assert!(matches!(err, ConfigError::TooFine { field: "spline_t_step", .. }));

    let err = PlotConfig::from_json(r#"{"sample_step_px": 1e-9}"#).unwrap_err();
    assert!(matches!(err, ConfigError::TooFine { field: "sample_step_px", min, .. } if min == 0.25));
}

#[test]
fn sampling_steps_at_the_floor_are_accepted() {
    let config = PlotConfig::from_json(r#"{"spline_t_step": 0.001, "sample_step_px": 0.25}"#).unwrap();
    assert_eq!(config.sampling(), Sampling { step_px: 0.25, t_step: 0.001 });
}

#[test]
fn wheel_step_must_zoom() {
    let config = PlotConfig { wheel_zoom_step: 1.0, ..PlotConfig::default() };
    assert!(matches!(config.validate(), Err(ConfigError::WheelStep(_))));
}

#[test]
fn default_scale_must_be_in_zoom_range() {
    let config = PlotConfig { default_scale: 200.0, ..PlotConfig::default() };
    assert!(matches!(config.validate(), Err(ConfigError::Scale(_))));
}

#[test]
fn zero_counts_are_rejected() {
    let config = PlotConfig { max_function_curves: 0, ..PlotConfig::default() };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroCount("max_function_curves"))));
}

#[test]
fn error_messages_name_the_field() {
    let err = ConfigError::NonPositive { field: "curve_hit_px", value: -1.0 };
    assert_eq!(err.to_string(), "curve_hit_px must be a positive finite number, got -1");
}

#[test]
fn sampling_mirrors_fields() {
    let config = PlotConfig { sample_step_px: 4.0, spline_t_step: 0.1, ..PlotConfig::default() };
    let sampling = config.sampling();
    assert_eq!(sampling.step_px, 4.0);
    assert_eq!(sampling.t_step, 0.1);
}
