//! Terminal Arcade entry point
//!
//! The browser build starts from `platform::web::start`. Natively this runs a
//! short headless session of each game and prints what the terminal would
//! have shown.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use terminal_arcade::config::GamesConfig;
    use terminal_arcade::games::{BreakoutGame, Game, SlotMachineGame, SnakeGame};
    use terminal_arcade::persistence::SharedStore;
    use terminal_arcade::platform::{
        BufferTerminal, Capabilities, ControlAction, HeadlessHost, InputEvent, Key, Mount, Schedule,
    };
    use terminal_arcade::rng::PcgSource;

    /// Longest a demo game may run on the virtual clock
    const LIMIT_MS: f64 = 120_000.0;

    pub fn run(seed: u64) {
        let config = GamesConfig::load();
        let store = terminal_arcade::persistence::open_default();
        let terminal = BufferTerminal::shared();
        let mut host = HeadlessHost::new(terminal.clone(), Capabilities::default());

        play(
            &mut host,
            snake(&config, &store, seed),
            &[InputEvent::KeyDown(Key::Up)],
        );
        play(
            &mut host,
            breakout(&config, &store, seed),
            &[InputEvent::KeyDown(Key::Right)],
        );
        play(
            &mut host,
            slots(&config, &store, seed),
            &[InputEvent::ControlPressed(ControlAction::Spin)],
        );

        print_transcript(&terminal);
    }

    fn snake(config: &GamesConfig, store: &SharedStore, seed: u64) -> Box<dyn Game> {
        Box::new(SnakeGame::new(
            config.snake.clone(),
            store.clone(),
            Box::new(PcgSource::seeded(seed)),
            Capabilities::default(),
        ))
    }

    fn breakout(config: &GamesConfig, store: &SharedStore, seed: u64) -> Box<dyn Game> {
        Box::new(BreakoutGame::new(
            config.breakout.clone(),
            store.clone(),
            Box::new(PcgSource::seeded(seed)),
            Capabilities::default(),
        ))
    }

    fn slots(config: &GamesConfig, store: &SharedStore, seed: u64) -> Box<dyn Game> {
        Box::new(SlotMachineGame::new(
            config.slots.clone(),
            store.clone(),
            Box::new(PcgSource::seeded(seed)),
            Capabilities::default(),
        ))
    }

    /// Mount, feed the scripted input, then let the clock run until nothing is pending
    fn play(host: &mut HeadlessHost, game: Box<dyn Game>, script: &[InputEvent]) {
        let kind = game.kind();
        if let Err(e) = host.mount(game) {
            log::error!("Failed to mount {}: {}", kind, e);
            return;
        }
        for event in script {
            host.send(*event);
        }

        let start = host.clock();
        // Slots goes idle once the spin settles
        while host.is_active()
            && host.installed() != Schedule::Idle
            && host.clock() - start < LIMIT_MS
        {
            host.advance(100.0);
        }

        if let Some(session) = host.session() {
            let status: Vec<String> = session
                .status()
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect();
            println!(
                "{:<9} {:>7.0} ms  {:>5} draw calls  {}",
                kind,
                host.clock() - start,
                session.surface().commands.len(),
                status.join(" | ")
            );
        }
        host.unmount();
    }

    fn print_transcript(terminal: &Rc<RefCell<BufferTerminal>>) {
        println!("\nTerminal output:");
        for line in terminal.borrow().plain_lines() {
            if !line.is_empty() {
                println!("  {}", line);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Terminal Arcade (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start
}
