use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::Point;
use crate::config::{ConfigError, PlotConfig};
use crate::consts::{MAX_AXIS_LABEL_CHARS, MAX_NAME_CHARS};
use crate::doc::{Axis, FunctionForm, Shape, ShapeId, ShapeKind, ShapePatch};
use crate::entry::{FunctionEntry, form_from_entry};
use crate::geometry::{snap, snap_point};
use crate::hit::{HandlePart, HandleRef, Hit, HitParams, LineEnd, find_nearest_handle, find_nearest_on_curve, hit_test};
use crate::input::{Button, InputState, Key, PlacementKind, Prompt, SnapStep, TouchPoint, UiState, WheelDelta};
use crate::render::{self, Frame, FrameLayout};
use crate::routing::{Rect, UiRegions};
use crate::scene::{Scene, SceneError, constrain_to};
use crate::surface::CanvasSurface;
use crate::theme::{LocalStorageThemeStore, Theme, ThemeError, load_theme, select_theme};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Install the console logger and panic hook.
///
/// # Errors
///
/// Returns the logger error if a logger is already installed.
pub fn init_logging(level: log::Level) -> Result<(), log::SetLoggerError> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(level)
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShapeCreated { id: ShapeId, kind: ShapeKind },
    ShapeUpdated { id: ShapeId },
    ShapeDeleted { id: ShapeId },
    /// A placement finished or was cancelled; `id` is the shape it built, if kept.
    PlacementEnded { id: Option<ShapeId> },
    /// Show a text prompt prefilled with `initial`, accepting `max_chars`.
    PromptRequested { prompt: Prompt, initial: String, max_chars: usize },
    AxisLabelChanged { axis: Axis, text: String },
    /// Scale changed; sync any external zoom slider.
    ZoomChanged { scale: f64 },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub scene: Scene,
    pub ui: UiState,
    pub input: InputState,
    pub regions: UiRegions,
    pub config: PlotConfig,
    pub theme: Theme,
    pub snap: SnapStep,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    centered: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::from_valid_config(PlotConfig::default(), SnapStep::Off)
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from a host-supplied config.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn with_config(config: PlotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let snap = config.snap()?;
        Ok(Self::from_valid_config(config, snap))
    }

    fn from_valid_config(config: PlotConfig, snap: SnapStep) -> Self {
        let mut scene = Scene::with_function_limit(config.max_function_curves);
        scene.viewport.scale = config.default_scale;
        Self {
            scene,
            ui: UiState::default(),
            input: InputState::default(),
            regions: UiRegions::new(),
            config,
            theme: Theme::default(),
            snap,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            centered: false,
        }
    }

    fn hit_params(&self) -> HitParams {
        HitParams {
            width: self.viewport_width,
            height: self.viewport_height,
            handle_px: self.config.handle_hit_px,
            curve_px: self.config.curve_hit_px,
            sampling: self.config.sampling(),
        }
    }

    fn center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }

    // --- Viewport ---

    /// Update canvas size. The first non-empty size centers the origin.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        if !self.centered && width_css > 0.0 && height_css > 0.0 {
            let c = self.center();
            self.scene.viewport.origin_x = c.x;
            self.scene.viewport.origin_y = c.y;
            self.centered = true;
        }
    }

    /// Default scale with the origin at the canvas center.
    pub fn reset_view(&mut self) -> Vec<Action> {
        let c = self.center();
        let vp = &mut self.scene.viewport;
        vp.origin_x = c.x;
        vp.origin_y = c.y;
        vp.scale = self.config.default_scale;
        log::debug!("view reset");
        vec![Action::ZoomChanged { scale: vp.scale }, Action::RenderNeeded]
    }

    /// Apply a zoom slider value, anchored at the canvas center.
    pub fn set_scale(&mut self, scale: f64) -> Vec<Action> {
        let c = self.center();
        self.scene.viewport.set_zoom(scale, c);
        vec![Action::ZoomChanged { scale: self.scene.viewport.scale }, Action::RenderNeeded]
    }

    pub fn set_snap_step(&mut self, snap: SnapStep) {
        self.snap = snap;
    }

    pub fn set_theme(&mut self, theme: Theme) -> Vec<Action> {
        self.theme = theme;
        vec![Action::RenderNeeded]
    }

    // --- UI regions ---

    pub fn register_ui_region(&mut self, name: &str, rect: Rect) {
        self.regions.register(name, rect);
    }

    pub fn remove_ui_region(&mut self, name: &str) -> bool {
        self.regions.remove(name)
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if self.regions.captures(screen_pt) {
            return Vec::new();
        }
        self.ui.pointer = Some(screen_pt);
        match button {
            Button::Secondary => Vec::new(),
            Button::Middle => self.start_pan(screen_pt),
            Button::Primary => {
                if matches!(self.input, InputState::PlacingPoints { .. }) {
                    return self.place_click(screen_pt);
                }
                if let Some(axis) = self.ui.axis_label_rects.axis_at(screen_pt) {
                    return self.request_prompt(Prompt::RenameAxis(axis));
                }
                match hit_test(&self.scene, screen_pt, &self.hit_params()) {
                    Some(Hit::Handle(h)) => {
                        log::debug!("input: idle -> dragging {:?}", h.handle);
                        self.input = InputState::DraggingHandle { handle: h.handle };
                        self.ui.hover = None;
                        let mut actions = self.set_cursor("grabbing");
                        actions.push(Action::RenderNeeded);
                        actions
                    }
                    Some(Hit::Curve(c)) => self.request_prompt(Prompt::NameCurve(c.shape)),
                    None => self.start_pan(screen_pt),
                }
            }
        }
    }

    fn start_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        log::debug!("input: -> panning");
        self.input = InputState::PanningBackground { last_screen: screen_pt };
        self.ui.hover = None;
        let mut actions = self.set_cursor("grabbing");
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.ui.pointer = Some(screen_pt);
        match self.input.clone() {
            InputState::PanningBackground { last_screen } => {
                self.scene.viewport.pan(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::PanningBackground { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingHandle { handle } => {
                let world = self.scene.viewport.screen_to_world(screen_pt);
                match self.scene.move_handle(&handle, world, self.snap.value()) {
                    Ok(()) => vec![Action::ShapeUpdated { id: handle.shape }, Action::RenderNeeded],
                    Err(e) => {
                        log::warn!("drag ignored: {e}");
                        Vec::new()
                    }
                }
            }
            InputState::Pinching { .. } => Vec::new(),
            InputState::Idle | InputState::PlacingPoints { .. } => {
                let mut actions = self.refresh_hover(screen_pt);
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    /// Release ends any pan, handle drag or pinch. Placement keeps collecting
    /// clicks until it completes or is cancelled.
    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        log::debug!("input: release -> idle");
        self.input = InputState::Idle;
        let mut actions = self.refresh_hover(screen_pt);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The pointer left the canvas; hide hover and HUD.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.ui.pointer = None;
        self.ui.hover = None;
        vec![Action::RenderNeeded]
    }

    /// Recompute hover highlight and cursor for an idle pointer at `screen_pt`.
    fn refresh_hover(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.regions.captures(screen_pt) {
            self.ui.hover = None;
            return self.set_cursor("default");
        }
        let params = self.hit_params();
        self.ui.hover = find_nearest_on_curve(&self.scene, screen_pt, &params);
        let cursor = if matches!(self.input, InputState::PlacingPoints { .. }) {
            "crosshair"
        } else if find_nearest_handle(&self.scene, screen_pt, params.handle_px).is_some() {
            "grab"
        } else if self.ui.hover.is_some() || self.ui.axis_label_rects.axis_at(screen_pt).is_some() {
            "pointer"
        } else {
            "default"
        };
        self.set_cursor(cursor)
    }

    fn set_cursor(&mut self, cursor: &str) -> Vec<Action> {
        if self.ui.cursor == cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor.to_owned();
        vec![Action::SetCursor(cursor.to_owned())]
    }

    // --- Wheel and touch ---

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        if self.regions.captures(screen_pt) || delta.dy == 0.0 || !delta.dy.is_finite() {
            return Vec::new();
        }
        let step = self.config.wheel_zoom_step;
        let factor = if delta.dy < 0.0 { step } else { 1.0 / step };
        self.scene.viewport.zoom_by(factor, screen_pt);
        vec![Action::ZoomChanged { scale: self.scene.viewport.scale }, Action::RenderNeeded]
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) -> Vec<Action> {
        match touches {
            [] => Vec::new(),
            [one] => self.on_pointer_down(one.pos, Button::Primary),
            [a, b, ..] => {
                let mut actions = self.cancel_placement();
                log::debug!("input: -> pinching");
                self.input = InputState::Pinching { last_distance: a.pos.distance(b.pos), last_mid: midpoint(a.pos, b.pos) };
                self.ui.hover = None;
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> Vec<Action> {
        match (self.input.clone(), touches) {
            (InputState::Pinching { last_distance, last_mid }, [a, b, ..]) => {
                let distance = a.pos.distance(b.pos);
                let mid = midpoint(a.pos, b.pos);
                if last_distance > 0.0 && distance > 0.0 {
                    self.scene.viewport.zoom_by(distance / last_distance, mid);
                }
                self.scene.viewport.pan(mid.x - last_mid.x, mid.y - last_mid.y);
                self.input = InputState::Pinching { last_distance: distance, last_mid: mid };
                vec![Action::ZoomChanged { scale: self.scene.viewport.scale }, Action::RenderNeeded]
            }
            (InputState::Pinching { .. }, _) | (_, []) => Vec::new(),
            (_, [one, ..]) => self.on_pointer_move(one.pos),
        }
    }

    /// `remaining` lists the touches still down after this event. A finger
    /// left on the canvas after a pinch keeps panning.
    pub fn on_touch_end(&mut self, remaining: &[TouchPoint]) -> Vec<Action> {
        let pinching = matches!(self.input, InputState::Pinching { .. });
        match remaining {
            [] if pinching => {
                log::debug!("input: pinch -> idle");
                self.input = InputState::Idle;
                vec![Action::RenderNeeded]
            }
            [] => {
                let at = self.ui.pointer.unwrap_or_default();
                self.on_pointer_up(at, Button::Primary)
            }
            [one] if pinching => {
                log::debug!("input: pinch -> panning");
                self.ui.pointer = Some(one.pos);
                self.input = InputState::PanningBackground { last_screen: one.pos };
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    // --- Keyboard and prompts ---

    /// Escape cancels a pending prompt; no other key is handled.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.0 == "Escape" && self.ui.pending_prompt.take().is_some() {
            log::debug!("prompt cancelled");
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    fn request_prompt(&mut self, prompt: Prompt) -> Vec<Action> {
        let (initial, max_chars) = match prompt {
            Prompt::RenameAxis(axis) => (self.scene.axis_labels.get(axis).to_owned(), MAX_AXIS_LABEL_CHARS),
            Prompt::NameCurve(id) => (self.scene.get(&id).map(|s| s.name().to_owned()).unwrap_or_default(), MAX_NAME_CHARS),
        };
        self.ui.pending_prompt = Some(prompt);
        vec![Action::PromptRequested { prompt, initial, max_chars }]
    }

    /// Commit text for the pending prompt.
    pub fn submit_prompt(&mut self, text: &str) -> Vec<Action> {
        match self.ui.pending_prompt.take() {
            None => Vec::new(),
            Some(Prompt::RenameAxis(axis)) => {
                self.scene.set_axis_label(axis, text);
                let text = self.scene.axis_labels.get(axis).to_owned();
                vec![Action::AxisLabelChanged { axis, text }, Action::RenderNeeded]
            }
            Some(Prompt::NameCurve(id)) => {
                let patch = ShapePatch { name: Some(text.to_owned()), ..Default::default() };
                match self.scene.update(&id, &patch) {
                    Ok(()) => vec![Action::ShapeUpdated { id }, Action::RenderNeeded],
                    Err(e) => {
                        log::warn!("prompt discarded: {e}");
                        Vec::new()
                    }
                }
            }
        }
    }

    // --- Placement ---

    /// Start collecting clicks for a new shape, cancelling any placement
    /// already in progress. A spline of zero points uses the configured count.
    pub fn begin_placement(&mut self, kind: PlacementKind) -> Vec<Action> {
        let kind = match kind {
            PlacementKind::Spline { points: 0 } => PlacementKind::Spline { points: self.config.default_spline_points },
            other => other,
        };
        let mut actions = self.cancel_placement();
        log::debug!("input: -> placing {kind:?}");
        self.input = InputState::PlacingPoints { kind, shape: None, remaining: kind.clicks() };
        actions.extend(self.set_cursor("crosshair"));
        actions
    }

    /// End placement early. A line or parabola that never got its second
    /// click is deleted.
    pub fn cancel_placement(&mut self) -> Vec<Action> {
        let InputState::PlacingPoints { kind, shape, remaining } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        let mut actions = self.set_cursor("default");
        let placed = kind.clicks() - remaining;
        let incomplete = matches!(kind, PlacementKind::Line | PlacementKind::Parabola) && placed < 2;
        let kept = match shape {
            Some(id) if incomplete => {
                match self.scene.delete(&id) {
                    Ok(_) => actions.push(Action::ShapeDeleted { id }),
                    Err(e) => log::warn!("cancel placement: {e}"),
                }
                None
            }
            other => other,
        };
        actions.push(Action::PlacementEnded { id: kept });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn place_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let InputState::PlacingPoints { kind, shape, remaining } = self.input else {
            return Vec::new();
        };
        let world = self.scene.viewport.screen_to_world(screen_pt);
        let step = self.snap.value();
        let mut actions = Vec::new();

        let id = match shape {
            None => {
                let id = self.create_placed(kind, screen_pt, world, step);
                actions.push(Action::ShapeCreated { id, kind: placement_shape_kind(kind) });
                id
            }
            Some(id) => {
                let result = match kind {
                    PlacementKind::Line => {
                        self.scene.move_handle(&HandleRef { shape: id, part: HandlePart::LineEnd(LineEnd::P2) }, world, step)
                    }
                    PlacementKind::Spline { .. } => self.scene.append_control_point(&id, world, step),
                    PlacementKind::Parabola if remaining == 2 => self.scene.place_second_root(&id, world.x, step),
                    PlacementKind::Parabola => {
                        self.scene.move_handle(&HandleRef { shape: id, part: HandlePart::ParabolaVertex }, world, step)
                    }
                    PlacementKind::Marker => Ok(()),
                };
                if let Err(e) = result {
                    log::warn!("placement aborted: {e}");
                    self.input = InputState::Idle;
                    actions.extend(self.set_cursor("default"));
                    actions.push(Action::PlacementEnded { id: None });
                    return actions;
                }
                actions.push(Action::ShapeUpdated { id });
                id
            }
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            log::debug!("input: placement complete -> idle");
            self.input = InputState::Idle;
            actions.extend(self.set_cursor("default"));
            actions.push(Action::PlacementEnded { id: Some(id) });
        } else {
            self.input = InputState::PlacingPoints { kind, shape: Some(id), remaining };
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// First click of a placement.
    fn create_placed(&mut self, kind: PlacementKind, screen_pt: Point, world: Point, step: f64) -> ShapeId {
        match kind {
            PlacementKind::Marker => {
                let Some(curve) = find_nearest_on_curve(&self.scene, screen_pt, &self.hit_params()) else {
                    return self.scene.add_marker(snap_point(world, step));
                };
                let at = self.scene.get(&curve.shape).and_then(|parent| constrain_to(parent, curve.world, step));
                let id = self.scene.add_marker(at.unwrap_or(curve.world));
                if let Err(e) = self.scene.attach_marker(&id, &curve.shape) {
                    log::warn!("marker left standalone: {e}");
                }
                id
            }
            PlacementKind::Line => {
                let p = snap_point(world, step);
                self.scene.add_line(p, p)
            }
            PlacementKind::Spline { .. } => self.scene.add_spline(vec![snap_point(world, step)]),
            PlacementKind::Parabola => {
                let x = snap(world.x, step);
                self.scene.add_parabola(x, x, 0.0)
            }
        }
    }

    // --- Panel contract ---

    #[must_use]
    pub fn list_shapes_by_kind(&self, kind: ShapeKind) -> Vec<&Shape> {
        self.scene.list_by_kind(kind)
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.scene.get(id)
    }

    /// Apply a panel edit.
    ///
    /// # Errors
    ///
    /// Returns the scene's error; nothing changes on error.
    pub fn update_shape(&mut self, id: &ShapeId, patch: &ShapePatch) -> Result<Vec<Action>, SceneError> {
        self.scene.update(id, patch)?;
        Ok(vec![Action::ShapeUpdated { id: *id }, Action::RenderNeeded])
    }

    /// Replace a function curve's coefficients from editor text.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`] or, for non-function shapes,
    /// [`SceneError::InapplicableField`].
    pub fn set_function_entry(&mut self, id: &ShapeId, entry: &FunctionEntry) -> Result<Vec<Action>, SceneError> {
        let patch = ShapePatch { form: Some(form_from_entry(entry)), ..Default::default() };
        self.update_shape(id, &patch)
    }

    /// Delete a shape, dropping any gesture or hover that refers to it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownShape`] if no such shape exists.
    pub fn delete_shape(&mut self, id: &ShapeId) -> Result<Vec<Action>, SceneError> {
        self.scene.delete(id)?;
        let refers = match &self.input {
            InputState::DraggingHandle { handle } => handle.shape == *id,
            InputState::PlacingPoints { shape, .. } => *shape == Some(*id),
            _ => false,
        };
        if refers {
            self.input = InputState::Idle;
        }
        if self.ui.hover.is_some_and(|h| h.shape == *id) {
            self.ui.hover = None;
        }
        if self.ui.pending_prompt == Some(Prompt::NameCurve(*id)) {
            self.ui.pending_prompt = None;
        }
        Ok(vec![Action::ShapeDeleted { id: *id }, Action::RenderNeeded])
    }

    /// Add a function curve with default coefficients, unless the limit is reached.
    pub fn add_function_curve(&mut self) -> Vec<Action> {
        match self.scene.add_function(FunctionForm::default()) {
            Some(id) => vec![Action::ShapeCreated { id, kind: ShapeKind::Function }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Constrain a marker to a curve.
    ///
    /// # Errors
    ///
    /// Returns the scene's attachment error.
    pub fn attach_marker(&mut self, marker: &ShapeId, parent: &ShapeId) -> Result<Vec<Action>, SceneError> {
        self.scene.attach_marker(marker, parent)?;
        Ok(vec![Action::ShapeUpdated { id: *marker }, Action::RenderNeeded])
    }

    // --- Render support ---

    /// Read-only view for the render pass.
    #[must_use]
    pub fn frame(&self) -> Frame<'_> {
        let active_handle = match &self.input {
            InputState::DraggingHandle { handle } => Some(*handle),
            _ => None,
        };
        Frame { scene: &self.scene, ui: &self.ui, theme: &self.theme, sampling: self.config.sampling(), active_handle }
    }

    /// Store the layout reported by the last frame.
    pub fn apply_layout(&mut self, layout: FrameLayout) {
        self.ui.axis_label_rects = layout.axis_labels;
    }
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

fn placement_shape_kind(kind: PlacementKind) -> ShapeKind {
    match kind {
        PlacementKind::Marker => ShapeKind::Marker,
        PlacementKind::Line => ShapeKind::Line,
        PlacementKind::Spline { .. } => ShapeKind::Spline,
        PlacementKind::Parabola => ShapeKind::Parabola,
    }
}

/// The full plotting engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    store: LocalStorageThemeStore,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `canvas`, restoring the persisted theme.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self::with_core(canvas, EngineCore::new())
    }

    /// Create an engine from a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed or invalid config.
    pub fn with_config_json(canvas: HtmlCanvasElement, json: &str) -> Result<Self, ConfigError> {
        let core = EngineCore::with_config(PlotConfig::from_json(json)?)?;
        Ok(Self::with_core(canvas, core))
    }

    fn with_core(canvas: HtmlCanvasElement, mut core: EngineCore) -> Self {
        let store = LocalStorageThemeStore;
        core.theme = load_theme(&store);
        Self { canvas, store, core }
    }

    // --- Viewport ---

    /// Resize the backing store for `dpr` and update the core's viewport.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let dpr = self.core.dpr;
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.core.reset_view()
    }

    pub fn set_scale(&mut self, scale: f64) -> Vec<Action> {
        self.core.set_scale(scale)
    }

    /// Switch and persist the theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Unknown`] for an unrecognised key.
    pub fn set_theme(&mut self, key: &str) -> Result<Vec<Action>, ThemeError> {
        let theme = select_theme(&self.store, key)?;
        Ok(self.core.set_theme(theme))
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        let mut surface = CanvasSurface::new(&ctx, self.core.viewport_width, self.core.viewport_height);
        surface.begin(self.core.dpr)?;
        let layout = render::draw(&mut surface, &self.core.frame())?;
        self.core.apply_layout(layout);
        Ok(())
    }
}
