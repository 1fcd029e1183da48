//! Game tuning and layout
//!
//! Defaults reproduce the shipped arcade. Overrides can be stored as JSON in
//! LocalStorage; any field left out keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Breakout layout and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per tick while a direction is held
    pub paddle_speed: f32,
    /// Gap between the paddle and the bottom edge
    pub paddle_margin: f32,
    pub ball_radius: f32,
    /// Launch speed at level 0; each level adds `ball_speed_per_level`
    pub ball_speed: f32,
    pub ball_speed_per_level: f32,
    pub brick_rows: usize,
    pub brick_columns: usize,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_offset_left: f32,
    /// Points per brick are `points_per_brick * level`
    pub points_per_brick: u64,
    pub lives: u32,
    pub update_interval_ms: u32,
    /// Auto-pause after a cleared level
    pub level_pause_ms: u32,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 400.0,
            canvas_height: 300.0,
            paddle_width: 70.0,
            paddle_height: 10.0,
            paddle_speed: 8.0,
            paddle_margin: 5.0,
            ball_radius: 6.0,
            ball_speed: 4.0,
            ball_speed_per_level: 0.5,
            brick_rows: 5,
            brick_columns: 8,
            brick_width: 45.0,
            brick_height: 15.0,
            brick_padding: 2.0,
            brick_offset_top: 30.0,
            brick_offset_left: 13.0,
            points_per_brick: 10,
            lives: 3,
            update_interval_ms: 16,
            level_pause_ms: 1000,
        }
    }
}

/// Snake grid and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Pixel size of one cell
    pub grid_size: u32,
    /// Cells per side
    pub tile_count: i32,
    pub interval_ms: u32,
    pub interval_step_ms: u32,
    pub min_interval_ms: u32,
    pub points_per_food: u64,
    pub initial_length: usize,
    /// Minimum swipe travel (px) on the dominant axis
    pub min_swipe_distance: f32,
}

impl SnakeConfig {
    pub fn canvas_size(&self) -> u32 {
        self.grid_size * self.tile_count.max(0) as u32
    }

    /// Longest starting body that still fits left of the centre cell
    pub fn max_initial_length(&self) -> usize {
        (self.tile_count.max(1) / 2 + 1) as usize
    }

    /// Replace values the grid cannot hold
    fn validated(self) -> Self {
        if self.tile_count < 1 {
            log::warn!(
                "Ignoring snake config: tile_count {} leaves no grid",
                self.tile_count
            );
            return Self::default();
        }

        let max = self.max_initial_length();
        let initial_length = self.initial_length.clamp(1, max);
        if initial_length != self.initial_length {
            log::warn!(
                "Snake initial_length {} clamped to {}",
                self.initial_length,
                initial_length
            );
        }
        Self {
            initial_length,
            ..self
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tile_count: 15,
            interval_ms: 100,
            interval_step_ms: 2,
            min_interval_ms: 50,
            points_per_food: 10,
            initial_length: 3,
            min_swipe_distance: 30.0,
        }
    }
}

/// One entry of the reel symbol table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub glyph: char,
    /// CSS hex colour
    pub color: String,
    pub weight: u32,
    /// Multiplier applied to the bet on a triple
    pub payout: u64,
    /// Triple of this symbol doubles the payout
    #[serde(default)]
    pub jackpot: bool,
}

impl SymbolSpec {
    fn new(glyph: char, color: &str, weight: u32, payout: u64) -> Self {
        Self {
            glyph,
            color: color.to_string(),
            weight,
            payout,
            jackpot: false,
        }
    }
}

/// Slot machine layout, economy and animation lengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub reel_width: f32,
    pub reel_height: f32,
    pub reel_gap: f32,
    pub reel_start_x: f32,
    pub reel_start_y: f32,
    pub symbol_height: f32,
    pub default_balance: u64,
    pub default_bet: u64,
    pub min_bet: u64,
    pub max_bet: u64,
    pub bet_step: u64,
    /// Scroll pixels per frame while a reel spins
    pub spin_speed: f32,
    pub stop_delays_ms: [u32; 3],
    pub highlight_frames: u32,
    pub jackpot_highlight_frames: u32,
    pub jackpot_frames: u32,
    /// Gravity applied to particle vertical velocity per frame
    pub particle_gravity: f32,
    pub symbols: Vec<SymbolSpec>,
}

impl SlotsConfig {
    /// Index of the first symbol flagged as jackpot
    pub fn jackpot_symbol(&self) -> Option<usize> {
        self.symbols.iter().position(|s| s.jackpot)
    }

    pub fn weights(&self) -> Vec<u32> {
        self.symbols.iter().map(|s| s.weight).collect()
    }

    /// Left edge of reel `index`
    pub fn reel_x(&self, index: usize) -> f32 {
        self.reel_start_x + index as f32 * (self.reel_width + self.reel_gap)
    }

    /// Total width of the three reels including gaps
    pub fn reels_span(&self) -> f32 {
        3.0 * self.reel_width + 2.0 * self.reel_gap
    }

    /// Restore the default symbol table when nothing could be drawn from it
    fn validated(self) -> Self {
        if self.weights().iter().any(|&w| w > 0) {
            return self;
        }
        log::warn!(
            "Ignoring slot symbols: {} entries with no positive weight",
            self.symbols.len()
        );
        Self {
            symbols: Self::default().symbols,
            ..self
        }
    }
}

impl Default for SlotsConfig {
    fn default() -> Self {
        let mut seven = SymbolSpec::new('7', "#ef4444", 5, 100);
        seven.jackpot = true;

        Self {
            canvas_width: 360.0,
            canvas_height: 240.0,
            reel_width: 100.0,
            reel_height: 165.0,
            reel_gap: 15.0,
            reel_start_x: 15.0,
            reel_start_y: 50.0,
            symbol_height: 60.0,
            default_balance: 100,
            default_bet: 10,
            min_bet: 5,
            max_bet: 100,
            bet_step: 5,
            spin_speed: 20.0,
            stop_delays_ms: [1000, 1500, 2000],
            highlight_frames: 60,
            jackpot_highlight_frames: 90,
            jackpot_frames: 120,
            particle_gravity: 0.1,
            symbols: vec![
                seven,
                SymbolSpec::new('$', "#22c55e", 10, 50),
                SymbolSpec::new('*', "#ffc233", 15, 25),
                SymbolSpec::new('#', "#3b82f6", 20, 15),
                SymbolSpec::new('@', "#a855f7", 25, 10),
                SymbolSpec::new('&', "#06b6d4", 25, 5),
            ],
        }
    }
}

/// Configuration for all three games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub breakout: BreakoutConfig,
    pub snake: SnakeConfig,
    pub slots: SlotsConfig,
}

impl GamesConfig {
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "arcade_config";

    /// Parse a (possibly partial) JSON override. Values the games cannot
    /// run with are clamped or reset to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    fn validated(self) -> Self {
        Self {
            breakout: self.breakout,
            snake: self.snake.validated(),
            slots: self.slots.validated(),
        }
    }

    /// Load overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded game config overrides");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored game config: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native builds always use the defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::sim::snake::{Cell, SnakeState};

    #[test]
    fn test_defaults_match_shipped_layout() {
        let config = GamesConfig::default();
        assert_eq!(config.breakout.brick_rows * config.breakout.brick_columns, 40);
        assert_eq!(config.snake.canvas_size(), 300);
        assert_eq!(config.slots.symbols.len(), 6);
        assert_eq!(config.slots.jackpot_symbol(), Some(0));
        assert_eq!(config.slots.weights().iter().sum::<u32>(), 100);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config =
            GamesConfig::from_json(r#"{ "snake": { "tile_count": 20 } }"#).unwrap();
        assert_eq!(config.snake.tile_count, 20);
        assert_eq!(config.snake.interval_ms, 100);
        assert_eq!(config.breakout, BreakoutConfig::default());
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        assert!(GamesConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_round_trip() {
        let config = GamesConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GamesConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_zero_initial_length_is_clamped() {
        let config =
            GamesConfig::from_json(r#"{ "snake": { "initial_length": 0 } }"#).unwrap();
        assert_eq!(config.snake.initial_length, 1);

        let mut rng = ScriptedSource::constant(0.0);
        let state = SnakeState::new(config.snake, &mut rng);
        assert_eq!(state.body.len(), 1);
        assert_eq!(state.head(), Cell::new(7, 7));
    }

    #[test]
    fn test_long_initial_length_stays_on_grid() {
        let config = GamesConfig::from_json(
            r#"{ "snake": { "tile_count": 10, "initial_length": 40 } }"#,
        )
        .unwrap();
        assert_eq!(config.snake.initial_length, 6);

        let mut rng = ScriptedSource::constant(0.0);
        let state = SnakeState::new(config.snake, &mut rng);
        assert_eq!(state.body.back(), Some(&Cell::new(0, 5)));
        assert!(state.body.iter().all(|c| (0..10).contains(&c.x)));
    }

    #[test]
    fn test_empty_grid_falls_back_to_defaults() {
        let config = GamesConfig::from_json(
            r#"{ "snake": { "tile_count": 0, "interval_ms": 70 } }"#,
        )
        .unwrap();
        assert_eq!(config.snake, SnakeConfig::default());
    }

    #[test]
    fn test_empty_symbol_table_falls_back_to_defaults() {
        let config = GamesConfig::from_json(
            r#"{ "slots": { "symbols": [], "default_balance": 500 } }"#,
        )
        .unwrap();
        assert_eq!(config.slots.symbols, SlotsConfig::default().symbols);
        assert_eq!(config.slots.default_balance, 500);
    }

    #[test]
    fn test_weightless_symbols_fall_back_to_defaults() {
        let config = GamesConfig::from_json(
            r##"{ "slots": { "symbols": [
                { "glyph": "X", "color": "#ffffff", "weight": 0, "payout": 5 }
            ] } }"##,
        )
        .unwrap();
        assert_eq!(config.slots.symbols.len(), 6);
    }

    #[test]
    fn test_valid_overrides_are_kept() {
        let config = GamesConfig::from_json(
            r##"{ "snake": { "tile_count": 4, "initial_length": 3 },
                  "slots": { "symbols": [
                      { "glyph": "X", "color": "#ffffff", "weight": 1, "payout": 5 }
                  ] } }"##,
        )
        .unwrap();
        assert_eq!(config.snake.initial_length, 3);
        assert_eq!(config.slots.symbols.len(), 1);
    }

    #[test]
    fn test_reel_geometry() {
        let slots = SlotsConfig::default();
        assert_eq!(slots.reel_x(0), 15.0);
        assert_eq!(slots.reel_x(2), 245.0);
        assert_eq!(slots.reels_span(), 330.0);
    }
}
