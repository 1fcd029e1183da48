//! Snake scene

use glam::Vec2;

use super::{
    Color, DrawOptions, DrawSurface, Font, GameOverCard, Glow, Rect, TextStyle, draw_game_over,
    draw_pause_overlay, palette,
};
use crate::sim::{SnakePhase, SnakeState};

const GRID_LINE: Color = Color::rgba(212, 160, 23, 0.05);

pub fn draw(state: &SnakeState, options: DrawOptions, surface: &mut dyn DrawSurface) {
    let grid = state.config.grid_size as f32;
    let size = state.config.canvas_size() as f32;
    surface.clear(palette::BACKGROUND);

    for i in 0..=state.config.tile_count {
        let pos = i as f32 * grid;
        surface.line(Vec2::new(pos, 0.0), Vec2::new(pos, size), GRID_LINE, 1.0, None);
        surface.line(Vec2::new(0.0, pos), Vec2::new(size, pos), GRID_LINE, 1.0, None);
    }

    let len = state.body.len() as f32;
    for (index, segment) in state.body.iter().enumerate() {
        let color = if index == 0 {
            surface.set_glow(Some(Glow::new(palette::GOLD, 8.0)));
            palette::GOLD
        } else {
            surface.set_glow(None);
            palette::GOLD_DIM.with_alpha(1.0 - (index as f32 / len) * 0.5)
        };
        let rect = Rect::new(
            segment.x as f32 * grid + 2.0,
            segment.y as f32 * grid + 2.0,
            grid - 4.0,
            grid - 4.0,
        );
        surface.fill_round_rect(rect, 3.0, color);
    }
    surface.set_glow(None);

    surface.set_glow(Some(Glow::new(palette::RED, 10.0)));
    surface.fill_circle(
        Vec2::new(
            state.food.x as f32 * grid + grid / 2.0,
            state.food.y as f32 * grid + grid / 2.0,
        ),
        grid / 2.0 - 4.0,
        palette::RED,
    );
    surface.set_glow(None);

    match state.phase() {
        SnakePhase::Paused => {
            let hint = if options.touch_controls {
                "Tap pause button to resume"
            } else {
                "Press SPACE to resume"
            };
            draw_pause_overlay(surface, hint);
        }
        SnakePhase::Idle => {
            surface.clear(Color::rgba(5, 5, 10, 0.5));
            let prompt = if options.touch_controls {
                "Swipe or use buttons to start"
            } else {
                "Press arrow keys to start"
            };
            surface.fill_text(
                prompt,
                Vec2::new(size / 2.0, size / 2.0),
                TextStyle::centered(Font::regular(14.0)),
                palette::GOLD,
            );
        }
        SnakePhase::GameOver => draw_game_over(
            surface,
            &GameOverCard {
                title_size: 20.0,
                score_size: 16.0,
                shade: 0.8,
                title_dy: -20.0,
                score_dy: 10.0,
                score: state.score,
                detail: None,
                record_dy: options.new_record.then_some(35.0),
            },
        ),
        SnakePhase::Moving => {}
    }
}
