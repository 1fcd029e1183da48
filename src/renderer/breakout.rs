//! Breakout scene

use super::{
    Color, DrawOptions, DrawSurface, GameOverCard, Glow, Rect, draw_game_over, draw_pause_overlay,
    palette,
};
use crate::sim::{BreakoutPhase, BreakoutState};

/// Row colour: warmer and darker toward the bottom
pub fn brick_color(row: usize) -> Color {
    let row = row as f32;
    Color::hsl(35.0 + row * 5.0, 80.0, 55.0 - row * 5.0)
}

pub fn draw(state: &BreakoutState, options: DrawOptions, surface: &mut dyn DrawSurface) {
    let c = &state.config;
    surface.clear(palette::BACKGROUND);

    for bricks in &state.bricks {
        for (row, brick) in bricks.iter().enumerate() {
            if !brick.alive {
                continue;
            }
            let color = brick_color(row);
            surface.set_glow(Some(Glow::new(color, 5.0)));
            surface.fill_round_rect(
                Rect::new(brick.x, brick.y, c.brick_width, c.brick_height),
                3.0,
                color,
            );
        }
    }
    surface.set_glow(None);

    surface.set_glow(Some(Glow::new(palette::GOLD, 8.0)));
    surface.fill_round_rect(state.paddle_rect(), 4.0, palette::GOLD);

    surface.set_glow(Some(Glow::new(palette::GOLD, 10.0)));
    surface.fill_circle(state.ball.pos, state.ball.radius, palette::WHITE);
    surface.set_glow(None);

    match state.phase {
        BreakoutPhase::Paused | BreakoutPhase::LevelTransition { .. } => {
            let hint = if options.touch_controls {
                "Tap pause to resume"
            } else {
                "Press SPACE to resume"
            };
            draw_pause_overlay(surface, hint);
        }
        BreakoutPhase::GameOver => {
            let level = format!("Level: {}", state.level);
            draw_game_over(
                surface,
                &GameOverCard {
                    title_size: 24.0,
                    score_size: 18.0,
                    shade: 0.85,
                    title_dy: -30.0,
                    score_dy: 5.0,
                    score: state.score,
                    detail: Some((&level, 30.0)),
                    record_dy: options.new_record.then_some(55.0),
                },
            );
        }
        BreakoutPhase::Ready | BreakoutPhase::Running => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakoutConfig;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::rng::ScriptedSource;

    fn scene() -> BreakoutState {
        let mut state = BreakoutState::new(BreakoutConfig::default());
        state.start(&mut ScriptedSource::constant(0.5));
        state
    }

    fn round_rects(surface: &RecordingSurface) -> usize {
        surface.count(|c| matches!(c, DrawCommand::FillRoundRect { .. }))
    }

    #[test]
    fn test_running_scene() {
        let state = scene();
        let mut surface = RecordingSurface::new(400.0, 300.0);
        draw(&state, DrawOptions::default(), &mut surface);

        // 40 bricks plus the paddle
        assert_eq!(round_rects(&surface), 41);
        assert!(surface.texts().is_empty());
        assert!(matches!(
            surface.commands.iter().find(|c| matches!(c, DrawCommand::FillCircle { .. })),
            Some(DrawCommand::FillCircle { radius, .. }) if *radius == 6.0
        ));
    }

    #[test]
    fn test_dead_bricks_are_not_drawn() {
        let mut state = scene();
        state.bricks[0][0].alive = false;
        state.bricks[7][4].alive = false;
        let mut surface = RecordingSurface::new(400.0, 300.0);
        draw(&state, DrawOptions::default(), &mut surface);
        assert_eq!(round_rects(&surface), 39);
    }

    #[test]
    fn test_pause_prompt_depends_on_touch() {
        let mut state = scene();
        state.toggle_pause();

        let mut surface = RecordingSurface::new(400.0, 300.0);
        draw(&state, DrawOptions::default(), &mut surface);
        assert_eq!(surface.texts(), vec!["PAUSED", "Press SPACE to resume"]);

        let mut surface = RecordingSurface::new(400.0, 300.0);
        let touch = DrawOptions { touch_controls: true, new_record: false };
        draw(&state, touch, &mut surface);
        assert!(surface.contains_text("Tap pause to resume"));
    }

    #[test]
    fn test_game_over_card() {
        let mut state = scene();
        state.phase = BreakoutPhase::GameOver;
        state.score = 120;
        state.level = 2;

        let mut surface = RecordingSurface::new(400.0, 300.0);
        draw(&state, DrawOptions { touch_controls: false, new_record: true }, &mut surface);
        assert_eq!(
            surface.texts(),
            vec!["GAME OVER", "Score: 120", "Level: 2", "NEW HIGH SCORE!"]
        );

        let mut surface = RecordingSurface::new(400.0, 300.0);
        draw(&state, DrawOptions::default(), &mut surface);
        assert!(!surface.contains_text("NEW HIGH SCORE!"));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let state = scene();
        let mut a = RecordingSurface::new(400.0, 300.0);
        let mut b = RecordingSurface::new(400.0, 300.0);
        draw(&state, DrawOptions::default(), &mut a);
        draw(&state, DrawOptions::default(), &mut b);
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
