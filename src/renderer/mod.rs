//! 2D canvas rendering module
//!
//! Games draw through the [`DrawSurface`] trait. Draw functions only read
//! state, so a given state always produces the same command list.

pub mod breakout;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;
pub mod slots;
pub mod snake;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{Baseline, Color, DrawSurface, Font, Glow, Rect, TextAlign, TextStyle};

use glam::Vec2;

/// Shared colours
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(10, 10, 15);
    pub const GOLD: Color = Color::rgb(255, 194, 51);
    pub const GOLD_DIM: Color = Color::rgb(212, 160, 23);
    pub const GOLD_DARK: Color = Color::rgb(184, 134, 11);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const MUTED: Color = Color::rgb(156, 163, 175);
    pub const FAINT: Color = Color::rgb(107, 114, 128);
    pub const TEXT: Color = Color::rgb(229, 229, 229);
    pub const RED: Color = Color::rgb(248, 113, 113);
    pub const GREEN: Color = Color::rgb(52, 211, 153);
    pub const WIN_GREEN: Color = Color::rgb(34, 197, 94);
    pub const REEL: Color = Color::rgb(26, 26, 46);
    pub const SHADE: Color = Color::rgba(5, 5, 10, 0.7);
}

/// Host facts that change what gets drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawOptions {
    /// Prompts mention buttons and swipes instead of keys
    pub touch_controls: bool,
    /// The final score set a new record
    pub new_record: bool,
}

/// Dim the whole surface and print a centred pause prompt
pub(crate) fn draw_pause_overlay(surface: &mut dyn DrawSurface, resume_hint: &str) {
    let (w, h) = (surface.width(), surface.height());
    surface.clear(palette::SHADE);
    surface.fill_text(
        "PAUSED",
        Vec2::new(w / 2.0, h / 2.0),
        TextStyle::centered(Font::bold(24.0)),
        palette::GOLD,
    );
    surface.fill_text(
        resume_hint,
        Vec2::new(w / 2.0, h / 2.0 + 30.0),
        TextStyle::centered(Font::regular(14.0)),
        palette::MUTED,
    );
}

/// Layout of the game-over card, offsets relative to the centre
pub(crate) struct GameOverCard<'a> {
    pub title_size: f32,
    pub score_size: f32,
    pub shade: f32,
    pub title_dy: f32,
    pub score_dy: f32,
    pub score: u64,
    /// Extra muted line and its offset
    pub detail: Option<(&'a str, f32)>,
    /// Offset of the high-score banner, `None` when no record was set
    pub record_dy: Option<f32>,
}

/// Red flash, dark shade, then the final score card
pub(crate) fn draw_game_over(surface: &mut dyn DrawSurface, card: &GameOverCard) {
    let cx = surface.width() / 2.0;
    let cy = surface.height() / 2.0;

    surface.clear(Color::rgba(248, 113, 113, 0.3));
    surface.clear(Color::rgba(5, 5, 10, card.shade));

    surface.fill_text(
        "GAME OVER",
        Vec2::new(cx, cy + card.title_dy),
        TextStyle::centered(Font::bold(card.title_size)),
        palette::RED,
    );
    surface.fill_text(
        &format!("Score: {}", card.score),
        Vec2::new(cx, cy + card.score_dy),
        TextStyle::centered(Font::regular(card.score_size)),
        palette::GOLD,
    );
    if let Some((detail, dy)) = card.detail {
        surface.fill_text(
            detail,
            Vec2::new(cx, cy + dy),
            TextStyle::centered(Font::regular(14.0)),
            palette::MUTED,
        );
    }
    if let Some(dy) = card.record_dy {
        surface.fill_text(
            "NEW HIGH SCORE!",
            Vec2::new(cx, cy + dy),
            TextStyle::centered(Font::regular(12.0)),
            palette::GREEN,
        );
    }
}
