//! Draw-command recorder
//!
//! Captures everything drawn as data so a state's rendering can be asserted
//! or snapshotted as JSON.

use glam::Vec2;
use serde::Serialize;

use super::surface::{Color, DrawSurface, Glow, Rect, TextStyle};

/// One recorded primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, line_width: f32 },
    FillRoundRect { rect: Rect, radius: f32, color: Color },
    StrokeRoundRect { rect: Rect, radius: f32, color: Color, line_width: f32 },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color, line_width: f32 },
    Line { from: Vec2, to: Vec2, color: Color, line_width: f32, dash: Option<[f32; 2]> },
    FillText { text: String, at: Vec2, style: TextStyle, color: Color },
    StrokeText { text: String, at: Vec2, style: TextStyle, color: Color, line_width: f32 },
    SetGlow { glow: Option<Glow> },
    SetAlpha { alpha: f32 },
    PushClip { rect: Rect },
    PopClip,
}

/// Surface that records instead of drawing
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// JSON snapshot of the recorded frame
    pub fn snapshot(&self) -> String {
        serde_json::to_string_pretty(&self.commands).unwrap_or_default()
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, line_width });
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillRoundRect { rect, radius, color });
    }

    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRoundRect {
            rect,
            radius,
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            line_width,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32, dash: Option<[f32; 2]>) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
            dash,
        });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
            style,
            color,
        });
    }

    fn stroke_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeText {
            text: text.to_string(),
            at,
            style,
            color,
            line_width,
        });
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.commands.push(DrawCommand::SetGlow { glow });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetAlpha { alpha });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip { rect });
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}
