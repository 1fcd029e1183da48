//! Slot machine engine
//!
//! Idle between spins. A spin switches the schedule to animation frames
//! until the reels, highlight, jackpot overlay and particles have all run
//! their course.

use super::{Game, GameKind};
use crate::config::SlotsConfig;
use crate::notice::{Notice, Outbox, Tone};
use crate::persistence::{SharedStore, keys, read_number, write_number};
use crate::platform::{Capabilities, ControlAction, ControlButton, InputEvent, Key, Schedule};
use crate::renderer::slots::{PAYTABLE_ICON_RADIUS, paytable_icon_center};
use crate::renderer::{self, DrawOptions, DrawSurface};
use crate::rng::RandomSource;
use crate::sim::{Payout, SlotEvent, SlotState, SpinRejection, WinKind};

/// Extra pixels around the paytable icon that still count as a hit
const ICON_HIT_SLOP: f32 = 5.0;

pub struct SlotMachineGame {
    state: SlotState,
    store: SharedStore,
    rng: Box<dyn RandomSource>,
    capabilities: Capabilities,
    outbox: Outbox,
    running: bool,
}

impl SlotMachineGame {
    /// Machine with the persisted balance and lifetime winnings
    pub fn new(
        config: SlotsConfig,
        store: SharedStore,
        rng: Box<dyn RandomSource>,
        capabilities: Capabilities,
    ) -> Self {
        let (balance, total_winnings) = {
            let store = store.borrow();
            (
                read_number(&*store, keys::SLOTS_BALANCE, config.default_balance),
                read_number(&*store, keys::SLOTS_TOTAL_WINNINGS, 0),
            )
        };
        Self {
            state: SlotState::new(config, balance, total_winnings),
            store,
            rng,
            capabilities,
            outbox: Outbox::default(),
            running: false,
        }
    }

    /// Restore the default balance and clear lifetime winnings
    ///
    /// Works on the store alone, whether or not a machine is running.
    pub fn reset_balance(store: &SharedStore, config: &SlotsConfig) {
        let mut store = store.borrow_mut();
        write_number(&mut *store, keys::SLOTS_BALANCE, config.default_balance);
        write_number(&mut *store, keys::SLOTS_TOTAL_WINNINGS, 0);
        log::info!("Slot balance reset to {}", config.default_balance);
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    fn quit(&mut self) {
        self.stop();
        self.outbox.send(
            Notice::line(Tone::Muted, "Thanks for playing! Type \"slots\" to play again.")
                .spaced_before()
                .spaced_after(),
        );
    }

    fn spin(&mut self, now_ms: f64) {
        match self.state.spin(now_ms, self.rng.as_mut()) {
            Ok(()) => {
                // Debit is persisted as soon as the spin is accepted
                let mut store = self.store.borrow_mut();
                write_number(&mut *store, keys::SLOTS_BALANCE, self.state.balance);
            }
            Err(SpinRejection::InsufficientFunds) => {
                self.outbox.send(Notice::line(
                    Tone::Error,
                    "Not enough balance! Reset with \"slots reset\"",
                ));
            }
            Err(SpinRejection::AlreadySpinning) => {}
        }
    }

    fn click(&mut self, x: f32, y: f32) -> bool {
        let icon = paytable_icon_center(&self.state.config);
        let reach = PAYTABLE_ICON_RADIUS + ICON_HIT_SLOP;
        if (x - icon.x).abs() < reach && (y - icon.y).abs() < reach {
            self.state.toggle_paytable();
            true
        } else if self.state.show_paytable {
            self.state.show_paytable = false;
            true
        } else {
            false
        }
    }

    fn settled(&mut self, payout: Option<Payout>) {
        let mut store = self.store.borrow_mut();
        write_number(&mut *store, keys::SLOTS_BALANCE, self.state.balance);
        let Some(win) = payout else {
            return;
        };
        write_number(&mut *store, keys::SLOTS_TOTAL_WINNINGS, self.state.total_winnings);
        drop(store);

        match win.kind {
            WinKind::Jackpot => self.outbox.send(
                Notice::new()
                    .success("*** JACKPOT! ***")
                    .plain(" You won ")
                    .accent(win.amount.to_string())
                    .plain("!")
                    .spaced_before(),
            ),
            WinKind::Triple => self.outbox.send(
                Notice::new()
                    .success("Three of a kind!")
                    .plain(" Won ")
                    .accent(win.amount.to_string()),
            ),
            WinKind::Pair => {}
        }
    }
}

impl Game for SlotMachineGame {
    fn kind(&self) -> GameKind {
        GameKind::Slots
    }

    fn surface_size(&self) -> (u32, u32) {
        let c = &self.state.config;
        (c.canvas_width as u32, c.canvas_height as u32)
    }

    fn start(&mut self, _now_ms: f64) {
        if self.running {
            return;
        }
        self.running = true;
        log::info!("Slots started (balance {})", self.state.balance);
    }

    fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }

        let bet_step = self.state.config.bet_step as i64;
        match *event {
            InputEvent::KeyDown(Key::Escape) => {
                self.quit();
                true
            }
            InputEvent::PointerDown { x, y } => self.click(x, y),
            InputEvent::ControlPressed(ControlAction::Spin) => {
                self.spin(now_ms);
                true
            }
            InputEvent::ControlPressed(ControlAction::BetDown) => {
                self.state.change_bet(-bet_step);
                true
            }
            InputEvent::ControlPressed(ControlAction::BetUp) => {
                self.state.change_bet(bet_step);
                true
            }
            _ => false,
        }
    }

    fn update(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }

        for event in self.state.frame(now_ms, self.rng.as_mut()) {
            match event {
                SlotEvent::Settled { payout, .. } => self.settled(payout),
                SlotEvent::ReelStopped { reel, symbol } => {
                    log::debug!("Reel {} stopped on {}", reel, symbol);
                }
                SlotEvent::JackpotStarted | SlotEvent::JackpotFinished => {}
            }
        }
    }

    fn schedule(&self) -> Schedule {
        if self.running && self.state.needs_frames() {
            Schedule::Frames
        } else {
            Schedule::Idle
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let options = DrawOptions {
            touch_controls: self.capabilities.touch_controls,
            new_record: false,
        };
        renderer::slots::draw(&self.state, options, surface);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("Slots stopped (balance {})", self.state.balance);
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        self.outbox.drain()
    }

    fn controls(&self) -> Vec<ControlButton> {
        let spin_label = if self.state.spinning { "..." } else { "SPIN" };
        vec![
            ControlButton::tap(ControlAction::BetDown, "BET -", "Decrease bet"),
            ControlButton::tap(ControlAction::Spin, spin_label, "Spin"),
            ControlButton::tap(ControlAction::BetUp, "BET +", "Increase bet"),
        ]
    }

    fn status(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Balance", self.state.balance.to_string()),
            ("Bet", self.state.bet.to_string()),
            ("Won", self.state.total_winnings.to_string()),
        ]
    }
}
