//! Browser 2D canvas backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{Color, DrawSurface, Glow, Rect, TextStyle};
use crate::error::{GameError, Result};

/// [`DrawSurface`] over a `<canvas>` element's 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Size the canvas and acquire its 2D context
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32) -> Result<Self> {
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| GameError::SurfaceUnavailable("2d context".to_string()))?;

        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn round_rect_path(&self, rect: Rect, radius: f32) {
        let (x, y, w, h, r) = (
            rect.x as f64,
            rect.y as f64,
            rect.w as f64,
            rect.h as f64,
            radius as f64,
        );
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.line_to(x + w - r, y);
        ctx.quadratic_curve_to(x + w, y, x + w, y + r);
        ctx.line_to(x + w, y + h - r);
        ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
        ctx.line_to(x + r, y + h);
        ctx.quadratic_curve_to(x, y + h, x, y + h - r);
        ctx.line_to(x, y + r);
        ctx.quadratic_curve_to(x, y, x + r, y);
        ctx.close_path();
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }

    fn apply_text_style(&self, style: TextStyle) {
        self.ctx.set_font(&style.font.css());
        self.ctx.set_text_align(style.align.as_str());
        self.ctx.set_text_baseline(style.baseline.as_str());
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx
            .stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.round_rect_path(rect, radius);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, color: Color, line_width: f32) {
        self.round_rect_path(rect, radius);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.circle_path(center, radius);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32, dash: Option<[f32; 2]>) {
        let segments = js_sys::Array::new();
        if let Some([on, off]) = dash {
            segments.push(&JsValue::from_f64(on as f64));
            segments.push(&JsValue::from_f64(off as f64));
        }
        let _ = self.ctx.set_line_dash(&segments);

        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();

        if dash.is_some() {
            let _ = self.ctx.set_line_dash(&js_sys::Array::new());
        }
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Color) {
        self.apply_text_style(style);
        self.ctx.set_fill_style_str(&color.css());
        let _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }

    fn stroke_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Color, line_width: f32) {
        self.apply_text_style(style);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        let _ = self.ctx.stroke_text(text, at.x as f64, at.y as f64);
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        match glow {
            Some(glow) => {
                self.ctx.set_shadow_color(&glow.color.css());
                self.ctx.set_shadow_blur(glow.blur as f64);
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx
            .rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        self.ctx.clip();
    }

    fn pop_clip(&mut self) {
        self.ctx.restore();
    }
}
