//! Game command dispatch
//!
//! The terminal hands every command line here first. Game commands print
//! their intro and launch through the [`Mount`]; anything else is left to
//! the terminal.

use crate::config::GamesConfig;
use crate::error::{GameError, Result};
use crate::games::{BreakoutGame, Game, GameKind, SlotMachineGame, SnakeGame};
use crate::notice::{Notice, Tone};
use crate::persistence::SharedStore;
use crate::platform::{Mount, SharedTerminal};
use crate::rng::PcgSource;

pub struct Arcade {
    host: Box<dyn Mount>,
    terminal: SharedTerminal,
    store: SharedStore,
    config: GamesConfig,
}

impl Arcade {
    pub fn new(
        host: Box<dyn Mount>,
        terminal: SharedTerminal,
        store: SharedStore,
        config: GamesConfig,
    ) -> Self {
        Self {
            host,
            terminal,
            store,
            config,
        }
    }

    /// Handle one command line. Returns false when it is not a game command.
    pub fn run(&mut self, line: &str) -> bool {
        let mut words = line.split_whitespace();
        let Some(kind) = words.next().and_then(GameKind::from_command) else {
            return false;
        };

        if kind == GameKind::Slots && words.next() == Some("reset") {
            self.reset_slots();
            return true;
        }

        if let Err(e) = self.launch(kind.command()) {
            log::warn!("Could not start {}: {}", kind, e);
            self.print(Notice::line(Tone::Error, format!("Could not start {}: {}", kind, e)));
        }
        true
    }

    /// Print the intro for `name` and mount a fresh game
    pub fn launch(&mut self, name: &str) -> Result<()> {
        let kind =
            GameKind::from_command(name).ok_or_else(|| GameError::UnknownGame(name.to_string()))?;
        for notice in intro(kind) {
            self.print(notice);
        }
        let game = self.build(kind);
        self.host.mount(game)
    }

    /// Stop the active game, if any
    pub fn stop(&mut self) {
        self.host.unmount();
    }

    fn build(&self, kind: GameKind) -> Box<dyn Game> {
        let capabilities = self.host.capabilities();
        let rng = Box::new(PcgSource::from_clock());
        let store = self.store.clone();
        match kind {
            GameKind::Breakout => Box::new(BreakoutGame::new(
                self.config.breakout.clone(),
                store,
                rng,
                capabilities,
            )),
            GameKind::Snake => Box::new(SnakeGame::new(
                self.config.snake.clone(),
                store,
                rng,
                capabilities,
            )),
            GameKind::Slots => Box::new(SlotMachineGame::new(
                self.config.slots.clone(),
                store,
                rng,
                capabilities,
            )),
        }
    }

    fn reset_slots(&mut self) {
        SlotMachineGame::reset_balance(&self.store, &self.config.slots);
        self.print(Notice::line(
            Tone::Success,
            format!("Balance reset to {}!", self.config.slots.default_balance),
        ));
    }

    fn print(&self, notice: Notice) {
        self.terminal.borrow_mut().print(&notice.to_html());
    }
}

fn intro(kind: GameKind) -> [Notice; 3] {
    let (title, hint, last) = match kind {
        GameKind::Snake => (
            "SNAKE",
            "Use arrow keys or WASD to move",
            "Press ESC to quit",
        ),
        GameKind::Breakout => (
            "BREAKOUT",
            "Use arrow keys, A/D, or mouse to move paddle",
            "Press SPACE to pause, ESC to quit",
        ),
        GameKind::Slots => (
            "LUCKY TERMINAL SLOTS",
            "Use buttons to play | ESC to quit",
            "Type \"slots reset\" to reset balance",
        ),
    };
    [
        Notice::line(Tone::Accent, title).spaced_before(),
        Notice::line(Tone::Muted, hint),
        Notice::line(Tone::Muted, last).spaced_after(),
    ]
}
