//! Slot machine scene
//!
//! Layers, bottom to top: title and paytable icon, the three reels, the
//! dashed pay line, particles, last win, then the jackpot and paytable
//! overlays.

use std::f32::consts::TAU;

use glam::Vec2;

use super::{Color, DrawOptions, DrawSurface, Font, Glow, Rect, TextStyle, palette};
use crate::config::SlotsConfig;
use crate::sim::SlotState;

const PAYLINE: Color = Color::rgba(255, 194, 51, 0.5);
const PAYTABLE_ROW_START: f32 = 82.0;
const PAYTABLE_ROW_HEIGHT: f32 = 24.0;

/// Centre of the round paytable toggle in the top-right corner
pub fn paytable_icon_center(config: &SlotsConfig) -> Vec2 {
    Vec2::new(config.canvas_width - 35.0, 28.0)
}

pub const PAYTABLE_ICON_RADIUS: f32 = 12.0;

/// Colour of symbol `index`, gold if the table entry is missing or invalid
pub fn symbol_color(config: &SlotsConfig, index: usize) -> Color {
    config
        .symbols
        .get(index)
        .and_then(|s| Color::hex(&s.color))
        .unwrap_or(palette::GOLD)
}

pub fn draw(state: &SlotState, _options: DrawOptions, surface: &mut dyn DrawSurface) {
    let c = &state.config;
    surface.clear(palette::BACKGROUND);

    surface.fill_text(
        "LUCKY TERMINAL",
        Vec2::new(c.canvas_width / 2.0, 35.0),
        TextStyle::centered(Font::bold(18.0)),
        palette::GOLD,
    );

    let icon = paytable_icon_center(c);
    let icon_fill = if state.show_paytable { palette::GOLD } else { palette::GOLD_DIM };
    surface.fill_circle(icon, PAYTABLE_ICON_RADIUS, icon_fill);
    surface.stroke_circle(icon, PAYTABLE_ICON_RADIUS, palette::GOLD_DARK, 2.0);
    surface.fill_text(
        "$",
        icon,
        TextStyle::centered(Font::bold(14.0)).middle(),
        palette::BACKGROUND,
    );

    for index in 0..state.reels.len() {
        draw_reel(state, index, surface);
    }

    let line_y = c.reel_start_y + c.reel_height / 2.0 - 12.0;
    surface.line(
        Vec2::new(c.reel_start_x, line_y),
        Vec2::new(c.reel_start_x + c.reels_span(), line_y),
        PAYLINE,
        2.0,
        Some([5.0, 5.0]),
    );

    for particle in &state.particles {
        let alpha = particle.alpha();
        surface.set_alpha(alpha);
        surface.fill_circle(particle.pos, particle.size * alpha, symbol_color(c, particle.color));
    }
    if !state.particles.is_empty() {
        surface.set_alpha(1.0);
    }

    if state.last_win > 0 && !state.spinning {
        surface.fill_text(
            &format!("WIN: {}", state.last_win),
            Vec2::new(c.canvas_width / 2.0, c.canvas_height - 8.0),
            TextStyle::centered(Font::bold(14.0)),
            palette::WIN_GREEN,
        );
    }

    if let Some(frame) = state.jackpot_frame {
        draw_jackpot(c, frame, surface);
    }

    if state.show_paytable {
        draw_paytable(c, surface);
    }
}

fn draw_reel(state: &SlotState, index: usize, surface: &mut dyn DrawSurface) {
    let c = &state.config;
    let n = c.symbols.len();
    if n == 0 {
        return;
    }
    let reel = &state.reels[index];
    let rect = Rect::new(c.reel_x(index), c.reel_start_y, c.reel_width, c.reel_height);

    surface.fill_rect(rect, palette::REEL);
    surface.stroke_rect(rect, palette::GOLD_DIM, 2.0);
    surface.push_clip(rect);

    let winning = state
        .highlight
        .as_ref()
        .filter(|h| h.reels.contains(&index));

    for i in -1i32..=2 {
        let symbol = (reel.symbol as i32 + i).rem_euclid(n as i32) as usize;
        let color = symbol_color(c, symbol);
        let y = rect.y + c.reel_height / 2.0 - 15.0 + i as f32 * c.symbol_height - reel.offset;

        if i == 0 && !state.spinning {
            let glow = match winning {
                Some(h) => {
                    let (speed, blur) = if h.jackpot { (0.25, 25.0) } else { (0.35, 20.0) };
                    let pulse = (h.frame as f32 * speed).sin() * 0.5 + 0.5;
                    Glow::new(symbol_color(c, h.symbol), blur * pulse + 5.0)
                }
                None => Glow::new(color, 10.0),
            };
            surface.set_glow(Some(glow));
        }

        let glyph = c.symbols[symbol].glyph.to_string();
        surface.fill_text(
            &glyph,
            Vec2::new(rect.x + c.reel_width / 2.0, y + 15.0),
            TextStyle::centered(Font::bold(48.0)),
            color,
        );
        if i == 0 && !state.spinning {
            surface.set_glow(None);
        }
    }

    surface.pop_clip();
}

fn draw_jackpot(c: &SlotsConfig, frame: u32, surface: &mut dyn DrawSurface) {
    let f = frame as f32;
    let center = Vec2::new(c.canvas_width / 2.0, c.canvas_height / 2.0);

    let flash = (f * 0.3).sin() * 0.3 + 0.3;
    surface.clear(Color::rgba(255, 215, 0, flash));

    let hue = (f * 5.0) % 360.0;
    let at = center + Vec2::new(0.0, (f * 0.2).sin() * 10.0);
    let style = TextStyle::centered(Font::bold(36.0));
    surface.stroke_text("JACKPOT!", at, style, Color::rgb(0, 0, 0), 3.0);
    surface.fill_text("JACKPOT!", at, style, Color::hsl(hue, 100.0, 50.0));

    for i in 0..8 {
        let angle = i as f32 / 8.0 * TAU + f * 0.05;
        let radius = 80.0 + (f * 0.1 + i as f32).sin() * 20.0;
        let dot = center + Vec2::new(angle.cos(), angle.sin()) * radius;
        let color = Color::hsl((hue + i as f32 * 45.0) % 360.0, 100.0, 50.0);
        surface.fill_circle(dot, 8.0, color);
    }
}

fn draw_paytable(c: &SlotsConfig, surface: &mut dyn DrawSurface) {
    let panel = Rect::new(15.0, 40.0, c.canvas_width - 30.0, c.canvas_height - 55.0);
    surface.fill_rect(panel, Color::rgba(0, 0, 0, 0.9));
    surface.stroke_rect(panel, palette::GOLD, 2.0);

    surface.fill_text(
        "PAYTABLE",
        Vec2::new(c.canvas_width / 2.0, 58.0),
        TextStyle::centered(Font::bold(14.0)),
        palette::GOLD,
    );

    for (i, symbol) in c.symbols.iter().enumerate() {
        let y = PAYTABLE_ROW_START + i as f32 * PAYTABLE_ROW_HEIGHT;
        surface.fill_text(
            &symbol.glyph.to_string(),
            Vec2::new(50.0, y),
            TextStyle::centered(Font::bold(18.0)),
            symbol_color(c, i),
        );
        surface.fill_text(
            &format!("3x = {}x", symbol.payout),
            Vec2::new(85.0, y),
            TextStyle::left(Font::regular(13.0)),
            palette::TEXT,
        );
        surface.fill_text(
            &format!("2x = {}x", symbol.payout / 5),
            Vec2::new(200.0, y),
            TextStyle::left(Font::regular(13.0)),
            palette::MUTED,
        );
    }

    let divider = PAYTABLE_ROW_START + c.symbols.len() as f32 * PAYTABLE_ROW_HEIGHT + 4.0;
    surface.line(
        Vec2::new(30.0, divider),
        Vec2::new(c.canvas_width - 30.0, divider),
        palette::GOLD,
        1.0,
        None,
    );

    if let Some(jackpot) = c.jackpot_symbol() {
        let glyph = c.symbols[jackpot].glyph;
        surface.fill_text(
            &format!("{glyph} {glyph} {glyph}"),
            Vec2::new(50.0, divider + 20.0),
            TextStyle::centered(Font::bold(18.0)),
            symbol_color(c, jackpot),
        );
        surface.fill_text(
            "JACKPOT! (2x bonus)",
            Vec2::new(85.0, divider + 20.0),
            TextStyle::left(Font::bold(13.0)),
            palette::GOLD,
        );
    }

    surface.fill_text(
        "tap to close",
        Vec2::new(c.canvas_width / 2.0, c.canvas_height - 22.0),
        TextStyle::centered(Font::regular(10.0)),
        palette::FAINT,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::rng::ScriptedSource;
    use crate::sim::WinHighlight;

    fn machine() -> SlotState {
        SlotState::new(SlotsConfig::default(), 100, 0)
    }

    fn render(state: &SlotState) -> RecordingSurface {
        let mut surface = RecordingSurface::new(360.0, 240.0);
        draw(state, DrawOptions::default(), &mut surface);
        surface
    }

    #[test]
    fn test_idle_machine() {
        let surface = render(&machine());
        let texts = surface.texts();
        assert_eq!(texts[0], "LUCKY TERMINAL");
        assert_eq!(texts[1], "$");
        // Four visible symbols per reel
        assert_eq!(texts.len(), 2 + 12);
        // Resting reels show symbol 0 on the line, 5 above and 1, 2 below
        assert_eq!(&texts[2..6], &["&", "7", "$", "*"]);

        assert_eq!(surface.count(|c| matches!(c, DrawCommand::PushClip { .. })), 3);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::PopClip)), 3);
        assert!(surface.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Line { dash: Some(_), from, .. } if from.y == 120.5
        )));
        assert!(!surface.contains_text("WIN: 0"));
    }

    #[test]
    fn test_spinning_reels_have_no_glow() {
        let mut state = machine();
        state.spin(0.0, &mut ScriptedSource::constant(0.0)).unwrap();
        let surface = render(&state);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::SetGlow { glow: Some(_) })), 0);
    }

    #[test]
    fn test_winning_reel_pulses_in_win_colour() {
        let mut state = machine();
        state.last_win = 50;
        state.highlight = Some(WinHighlight {
            reels: vec![0, 1],
            frame: 0,
            symbol: 1,
            jackpot: false,
        });
        let surface = render(&state);
        let glows: Vec<Glow> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetGlow { glow: Some(g) } => Some(*g),
                _ => None,
            })
            .collect();
        let green = Color::hex("#22c55e").unwrap();
        let red = Color::hex("#ef4444").unwrap();
        // sin(0) pulse: 20 * 0.5 + 5
        assert_eq!(glows, vec![Glow::new(green, 15.0), Glow::new(green, 15.0), Glow::new(red, 10.0)]);
        assert!(surface.contains_text("WIN: 50"));
    }

    #[test]
    fn test_jackpot_overlay() {
        let mut state = machine();
        state.jackpot_frame = Some(10);
        let surface = render(&state);
        assert!(surface.contains_text("JACKPOT!"));
        assert_eq!(
            surface.count(|c| matches!(c, DrawCommand::StrokeText { text, .. } if text == "JACKPOT!")),
            1
        );
        // Eight orbiting dots plus the paytable icon
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::FillCircle { .. })), 9);
    }

    #[test]
    fn test_paytable_overlay() {
        let mut state = machine();
        state.toggle_paytable();
        let surface = render(&state);
        for text in ["PAYTABLE", "3x = 100x", "2x = 20x", "3x = 5x", "2x = 1x", "7 7 7", "tap to close"] {
            assert!(surface.contains_text(text), "missing {text}");
        }
        assert!(surface.commands.iter().any(|c| matches!(
            c,
            DrawCommand::FillCircle { color, .. } if *color == palette::GOLD
        )));
    }

    #[test]
    fn test_particles_fade_and_restore_alpha() {
        let mut state = machine();
        let mut rng = ScriptedSource::constant(0.5);
        state.particles = crate::sim::particles::burst(Vec2::new(180.0, 132.0), 6, 1, 60, &mut rng);
        state.particles[0].life = 30;
        let surface = render(&state);
        let alphas: Vec<f32> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetAlpha { alpha } => Some(*alpha),
                _ => None,
            })
            .collect();
        assert_eq!(alphas.len(), 7);
        assert_eq!(alphas[0], 0.5);
        assert_eq!(*alphas.last().unwrap(), 1.0);
    }
}
