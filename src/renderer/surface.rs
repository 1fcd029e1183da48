//! 2D drawing surface abstraction
//!
//! The minimal set of canvas primitives the games draw with. Implemented by
//! the browser canvas and by [`super::RecordingSurface`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use crate::sim::collision::Rect;

/// RGBA colour, alpha in 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rgb`
    pub fn hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#')?;
        let channel = |h: &str| u8::from_str_radix(h, 16).ok();
        match s.len() {
            6 => Some(Self::rgb(
                channel(&s[0..2])?,
                channel(&s[2..4])?,
                channel(&s[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&s[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    /// HSL with hue in degrees and saturation/lightness in percent
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |mut t: f32| {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round() as u8
        };

        Self::rgb(
            channel(h + 1.0 / 3.0),
            channel(h),
            channel(h - 1.0 / 3.0),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string
    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Baseline {
    #[default]
    Alphabetic,
    Middle,
}

impl Baseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Baseline::Alphabetic => "alphabetic",
            Baseline::Middle => "middle",
        }
    }
}

/// Monospace font at a pixel size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }

    pub fn css(&self) -> String {
        if self.bold {
            format!("bold {}px \"IBM Plex Mono\"", self.size)
        } else {
            format!("{}px \"IBM Plex Mono\"", self.size)
        }
    }
}

/// Font plus alignment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: Font,
    pub align: TextAlign,
    pub baseline: Baseline,
}

impl TextStyle {
    pub const fn centered(font: Font) -> Self {
        Self {
            font,
            align: TextAlign::Center,
            baseline: Baseline::Alphabetic,
        }
    }

    pub const fn left(font: Font) -> Self {
        Self {
            font,
            align: TextAlign::Left,
            baseline: Baseline::Alphabetic,
        }
    }

    pub const fn middle(self) -> Self {
        Self {
            baseline: Baseline::Middle,
            ..self
        }
    }
}

/// Shadow glow behind subsequent fills
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub color: Color,
    pub blur: f32,
}

impl Glow {
    pub const fn new(color: Color, blur: f32) -> Self {
        Self { color, blur }
    }
}

/// Fixed-size 2D drawing target
pub trait DrawSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);
    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color);
    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, color: Color, line_width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32);
    /// Straight line, optionally dashed (`[dash, gap]`)
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32, dash: Option<[f32; 2]>);
    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Color);
    fn stroke_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Color, line_width: f32);

    /// Glow applied to following fills, `None` clears it
    fn set_glow(&mut self, glow: Option<Glow>);
    /// Global alpha multiplier for following draws
    fn set_alpha(&mut self, alpha: f32);
    /// Restrict drawing to `rect` until the matching [`DrawSurface::pop_clip`]
    fn push_clip(&mut self, rect: Rect);
    fn pop_clip(&mut self);

    /// Fill the whole surface
    fn clear(&mut self, color: Color) {
        let rect = Rect::new(0.0, 0.0, self.width(), self.height());
        self.fill_rect(rect, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::hex("#ffc233"), Some(Color::rgb(255, 194, 51)));
        assert_eq!(Color::hex("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::hex("ffc233"), None);
        assert_eq!(Color::hex("#zzzzzz"), None);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::hsl(0.0, 100.0, 50.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::hsl(120.0, 100.0, 50.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::hsl(240.0, 100.0, 50.0), Color::rgb(0, 0, 255));
        assert_eq!(Color::hsl(0.0, 0.0, 100.0), Color::rgb(255, 255, 255));
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Color::rgb(10, 10, 15).css(), "#0a0a0f");
        assert_eq!(Color::rgba(5, 5, 10, 0.7).css(), "rgba(5, 5, 10, 0.7)");
        assert_eq!(Font::bold(24.0).css(), "bold 24px \"IBM Plex Mono\"");
    }
}
