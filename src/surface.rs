//! [`Surface`] over a browser `CanvasRenderingContext2d`.
//!
//! This is the only module that touches the 2D context. The caller sets the
//! device-pixel-ratio transform once per frame via [`CanvasSurface::begin`].

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Point;
use crate::consts::LABEL_FONT_PX;
use crate::render::{HAlign, Surface, TextSize, VAlign};
use crate::routing::Rect;

/// A 2D canvas context plus its CSS-pixel size.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl<'a> CanvasSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    /// Reset the transform for `dpr` and select the label font.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    pub fn begin(&self, dpr: f64) -> Result<(), JsValue> {
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.ctx.set_font(&format!("{LABEL_FONT_PX}px sans-serif"));
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        Ok(())
    }
}

impl Surface for CanvasSurface<'_> {
    type Error = JsValue;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_background(&mut self, color: &str) -> Result<(), JsValue> {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
    }

    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn line(&mut self, a: Point, b: Point) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.move_to(a.x, a.y);
        self.ctx.line_to(b.x, b.y);
        self.ctx.stroke();
        Ok(())
    }

    fn polyline(&mut self, points: &[Point]) -> Result<(), JsValue> {
        let [first, rest @ ..] = points else {
            return Ok(());
        };
        if rest.is_empty() {
            return Ok(());
        }
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.stroke();
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f64, fill: bool, stroke: bool) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
        if fill {
            self.ctx.fill();
        }
        if stroke {
            self.ctx.stroke();
        }
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64) -> Result<(), JsValue> {
        let r = radius.min(rect.w * 0.5).min(rect.h * 0.5).max(0.0);
        let (x, y, w, h) = (rect.x, rect.y, rect.w, rect.h);
        self.ctx.begin_path();
        self.ctx.move_to(x + r, y);
        self.ctx.arc_to(x + w, y, x + w, y + h, r)?;
        self.ctx.arc_to(x + w, y + h, x, y + h, r)?;
        self.ctx.arc_to(x, y + h, x, y, r)?;
        self.ctx.arc_to(x, y, x + w, y, r)?;
        self.ctx.close_path();
        self.ctx.fill();
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> Result<TextSize, JsValue> {
        let metrics = self.ctx.measure_text(text)?;
        let height = metrics.actual_bounding_box_ascent() + metrics.actual_bounding_box_descent();
        Ok(TextSize { width: metrics.width(), height: if height > 0.0 { height } else { LABEL_FONT_PX } })
    }

    fn text(&mut self, text: &str, at: Point, h: HAlign, v: VAlign) -> Result<(), JsValue> {
        self.ctx.set_text_align(match h {
            HAlign::Left => "left",
            HAlign::Center => "center",
            HAlign::Right => "right",
        });
        self.ctx.set_text_baseline(match v {
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        });
        self.ctx.fill_text(text, at.x, at.y)
    }
}
