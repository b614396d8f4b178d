//! Viewport transform between world (math, Y-up) and screen (pixel, Y-down) space.
//!
//! The viewport is the screen position of the world origin plus a uniform
//! scale in pixels per world unit:
//!
//! ```text
//! screen_x = origin_x + world_x * scale
//! screen_y = origin_y - world_y * scale
//! ```
//!
//! Pan adds a screen delta straight to the origin. Zoom changes the scale
//! while keeping one screen point (the wheel cursor or the pinch midpoint)
//! pinned to the same world point.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCALE, SCALE_MAX, SCALE_MIN};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pan/zoom state for the coordinate plane.
///
/// `origin_x` / `origin_y` are the screen position of world `(0, 0)` in CSS
/// pixels. `scale` is pixels per world unit, always within
/// [`SCALE_MIN`]..=[`SCALE_MAX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, scale: DEFAULT_SCALE }
    }
}

impl Viewport {
    /// A viewport with the origin at the center of a `width` x `height` canvas.
    #[must_use]
    pub fn centered(width: f64, height: f64) -> Self {
        Self { origin_x: width * 0.5, origin_y: height * 0.5, scale: DEFAULT_SCALE }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: self.origin_x + world.x * self.scale,
            y: self.origin_y - world.y * self.scale,
        }
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin_x) / self.scale,
            y: (self.origin_y - screen.y) / self.scale,
        }
    }

    /// World x under screen column `sx`.
    #[must_use]
    pub fn screen_to_world_x(&self, sx: f64) -> f64 {
        (sx - self.origin_x) / self.scale
    }

    /// Screen row of world height `y`.
    #[must_use]
    pub fn world_to_screen_y(&self, y: f64) -> f64 {
        self.origin_y - y * self.scale
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Shift the origin by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.origin_x += dx;
        self.origin_y += dy;
    }

    /// Set the scale (clamped), keeping the world point under `anchor` fixed.
    ///
    /// Non-finite requests leave the viewport untouched.
    pub fn set_zoom(&mut self, new_scale: f64, anchor: Point) {
        if !new_scale.is_finite() || !anchor.is_finite() {
            return;
        }
        let before = self.screen_to_world(anchor);
        self.scale = new_scale.clamp(SCALE_MIN, SCALE_MAX);
        let after = self.world_to_screen(before);
        self.origin_x += anchor.x - after.x;
        self.origin_y += anchor.y - after.y;
    }

    /// Multiply the scale by `factor` around `anchor`.
    ///
    /// Used for wheel notches (`1.08` or its inverse) and for pinch gestures
    /// (ratio of the new to the previous finger distance).
    pub fn zoom_by(&mut self, factor: f64, anchor: Point) {
        if factor <= 0.0 {
            return;
        }
        self.set_zoom(self.scale * factor, anchor);
    }

    /// World-space x range covered by a canvas `width` pixels wide.
    #[must_use]
    pub fn visible_x_range(&self, width: f64) -> (f64, f64) {
        (self.screen_to_world_x(0.0), self.screen_to_world_x(width))
    }

    /// World-space y range covered by a canvas `height` pixels tall, bottom first.
    #[must_use]
    pub fn visible_y_range(&self, height: f64) -> (f64, f64) {
        ((self.origin_y - height) / self.scale, self.origin_y / self.scale)
    }
}
