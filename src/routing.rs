//! Capture-phase input routing.
//!
//! The host registers the screen rectangles covered by its own UI (toolbars,
//! panels, prompt boxes). Pointer and wheel events that land inside any
//! registered region are consumed before they reach the canvas pipeline.

#[cfg(test)]
#[path = "routing_test.rs"]
mod routing_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Axis-aligned screen rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Grow by `pad` pixels on every side.
    #[must_use]
    pub fn padded(self, pad: f64) -> Self {
        Self { x: self.x - pad, y: self.y - pad, w: self.w + 2.0 * pad, h: self.h + 2.0 * pad }
    }
}

/// Named exclusion regions, checked in registration order.
#[derive(Debug, Clone, Default)]
pub struct UiRegions {
    regions: Vec<(String, Rect)>,
}

impl UiRegions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the region called `name`.
    pub fn register(&mut self, name: &str, rect: Rect) {
        if let Some(slot) = self.regions.iter_mut().find(|(n, _)| n == name) {
            slot.1 = rect;
        } else {
            self.regions.push((name.to_owned(), rect));
        }
    }

    /// Remove a region. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.regions.len();
        self.regions.retain(|(n, _)| n != name);
        self.regions.len() != before
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Name of the first region containing `p`.
    #[must_use]
    pub fn region_at(&self, p: Point) -> Option<&str> {
        self.regions.iter().find(|(_, r)| r.contains(p)).map(|(n, _)| n.as_str())
    }

    /// Whether `p` is over any registered UI region.
    #[must_use]
    pub fn captures(&self, p: Point) -> bool {
        self.region_at(p).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
