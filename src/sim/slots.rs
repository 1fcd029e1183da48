//! Three-reel slot machine
//!
//! A spin debits the bet, draws three weighted targets and lets the reels
//! scroll until their staggered stop deadlines. Everything after the spin is
//! driven by [`SlotState::frame`], called once per animation frame: reel
//! stops, scrolling, the win highlight, the jackpot overlay and particles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particles::{self, Particle};
use crate::config::SlotsConfig;
use crate::rng::{RandomSource, weighted_index};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    /// Symbol index currently on the pay line
    pub symbol: usize,
    /// Resting symbol for the spin in flight
    pub target: usize,
    /// Scroll offset in pixels, `0..symbol_height`
    pub offset: f32,
    /// Scroll pixels per frame, 0 when stopped
    pub speed: f32,
    pub stop_at_ms: Option<f64>,
}

impl Reel {
    fn idle() -> Self {
        Self {
            symbol: 0,
            target: 0,
            offset: 0.0,
            speed: 0.0,
            stop_at_ms: None,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.speed > 0.0
    }
}

/// Why a spin was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpinRejection {
    AlreadySpinning,
    InsufficientFunds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinKind {
    Pair,
    Triple,
    Jackpot,
}

/// Outcome of a settled spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub amount: u64,
    pub kind: WinKind,
    /// Matching symbol index
    pub symbol: usize,
    /// Reels that formed the win
    pub reels: Vec<usize>,
}

/// Evaluate a final reel line
///
/// Three of a kind pay `payout * bet`, doubled for the jackpot symbol. Two
/// adjacent matches (reels 0-1 or 1-2) pay `floor(payout * bet * 0.2)`.
/// Reels 0 and 2 matching alone pay nothing.
pub fn evaluate(line: [usize; 3], bet: u64, config: &SlotsConfig) -> Option<Payout> {
    let [r1, r2, r3] = line;
    let payout_of = |i: usize| config.symbols.get(i).map_or(0, |s| s.payout);

    let (amount, kind, symbol, reels) = if r1 == r2 && r2 == r3 {
        let jackpot = config.symbols.get(r1).is_some_and(|s| s.jackpot);
        let base = payout_of(r1) * bet;
        if jackpot {
            (base * 2, WinKind::Jackpot, r1, vec![0, 1, 2])
        } else {
            (base, WinKind::Triple, r1, vec![0, 1, 2])
        }
    } else if r1 == r2 || r2 == r3 {
        let (symbol, reels) = if r1 == r2 { (r1, vec![0, 1]) } else { (r2, vec![1, 2]) };
        // payout * bet * 0.2, floored
        ((payout_of(symbol) * bet) / 5, WinKind::Pair, symbol, reels)
    } else {
        return None;
    };

    (amount > 0).then_some(Payout {
        amount,
        kind,
        symbol,
        reels,
    })
}

/// Pulsing emphasis over the winning reels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinHighlight {
    pub reels: Vec<usize>,
    pub frame: u32,
    pub symbol: usize,
    pub jackpot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SlotEvent {
    ReelStopped { reel: usize, symbol: usize },
    /// Last reel stopped and the line was paid out (or not)
    Settled { line: [usize; 3], payout: Option<Payout> },
    JackpotStarted,
    JackpotFinished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotState {
    pub config: SlotsConfig,
    pub reels: [Reel; 3],
    pub balance: u64,
    pub total_winnings: u64,
    pub bet: u64,
    pub spinning: bool,
    pub last_win: u64,
    pub highlight: Option<WinHighlight>,
    pub particles: Vec<Particle>,
    /// Frames into the jackpot overlay, `None` when not showing
    pub jackpot_frame: Option<u32>,
    pub show_paytable: bool,
}

impl SlotState {
    pub fn new(config: SlotsConfig, balance: u64, total_winnings: u64) -> Self {
        Self {
            bet: config.default_bet,
            config,
            reels: [Reel::idle(); 3],
            balance,
            total_winnings,
            spinning: false,
            last_win: 0,
            highlight: None,
            particles: Vec::new(),
            jackpot_frame: None,
            show_paytable: false,
        }
    }

    pub fn line(&self) -> [usize; 3] {
        [self.reels[0].symbol, self.reels[1].symbol, self.reels[2].symbol]
    }

    /// Start a spin
    ///
    /// Refused with no state change while a spin is in flight or when the
    /// bet exceeds the balance.
    pub fn spin(&mut self, now_ms: f64, rng: &mut dyn RandomSource) -> Result<(), SpinRejection> {
        if self.spinning {
            return Err(SpinRejection::AlreadySpinning);
        }
        if self.balance < self.bet {
            return Err(SpinRejection::InsufficientFunds);
        }

        self.balance -= self.bet;
        self.last_win = 0;

        let weights = self.config.weights();
        for (reel, delay) in self.reels.iter_mut().zip(self.config.stop_delays_ms) {
            reel.target = weighted_index(&weights, rng);
            reel.speed = self.config.spin_speed;
            reel.offset = 0.0;
            reel.stop_at_ms = Some(now_ms + delay as f64);
        }
        self.spinning = true;

        log::debug!(
            "Spin: bet {} targets {:?}",
            self.bet,
            self.reels.map(|r| r.target)
        );
        Ok(())
    }

    /// Step the bet by `delta`
    ///
    /// Applied only if the result stays within
    /// `[min_bet, min(max_bet, balance)]`; otherwise ignored.
    pub fn change_bet(&mut self, delta: i64) -> bool {
        let Some(next) = self.bet.checked_add_signed(delta) else {
            return false;
        };
        if next >= self.config.min_bet && next <= self.config.max_bet.min(self.balance) {
            self.bet = next;
            true
        } else {
            false
        }
    }

    pub fn toggle_paytable(&mut self) {
        self.show_paytable = !self.show_paytable;
    }

    /// Whether the animation loop has anything left to do
    pub fn needs_frames(&self) -> bool {
        self.spinning
            || self.highlight.is_some()
            || self.jackpot_frame.is_some()
            || !self.particles.is_empty()
    }

    /// Advance one animation frame
    pub fn frame(&mut self, now_ms: f64, rng: &mut dyn RandomSource) -> Vec<SlotEvent> {
        let mut events = Vec::new();

        // Due stops, in reel order
        for i in 0..self.reels.len() {
            let reel = &mut self.reels[i];
            if reel.stop_at_ms.is_some_and(|at| now_ms >= at) {
                reel.speed = 0.0;
                reel.symbol = reel.target;
                reel.offset = 0.0;
                reel.stop_at_ms = None;
                events.push(SlotEvent::ReelStopped {
                    reel: i,
                    symbol: reel.symbol,
                });
                if self.spinning && self.reels.iter().all(|r| !r.is_spinning()) {
                    self.spinning = false;
                    events.push(self.settle(rng));
                }
            }
        }

        let n = self.config.symbols.len().max(1);
        let symbol_height = self.config.symbol_height;
        for reel in self.reels.iter_mut().filter(|r| r.is_spinning()) {
            reel.offset += reel.speed;
            if reel.offset >= symbol_height {
                reel.offset = 0.0;
                reel.symbol = (reel.symbol + 1) % n;
            }
        }

        if let Some(highlight) = self.highlight.as_mut() {
            highlight.frame += 1;
            let duration = if highlight.jackpot {
                self.config.jackpot_highlight_frames
            } else {
                self.config.highlight_frames
            };
            if highlight.frame >= duration {
                if highlight.jackpot {
                    self.jackpot_frame = Some(0);
                    events.push(SlotEvent::JackpotStarted);
                }
                self.highlight = None;
            }
        }

        if let Some(frame) = self.jackpot_frame {
            let frame = frame + 1;
            if frame > self.config.jackpot_frames {
                self.jackpot_frame = None;
                events.push(SlotEvent::JackpotFinished);
            } else {
                self.jackpot_frame = Some(frame);
            }
        }

        particles::step(&mut self.particles, self.config.particle_gravity);

        events
    }

    /// Pay out the stopped line and start the win effects
    fn settle(&mut self, rng: &mut dyn RandomSource) -> SlotEvent {
        let line = self.line();
        let payout = evaluate(line, self.bet, &self.config);

        if let Some(win) = &payout {
            self.balance += win.amount;
            self.total_winnings += win.amount;
            self.last_win = win.amount;
            self.highlight = Some(WinHighlight {
                reels: win.reels.clone(),
                frame: 0,
                symbol: win.symbol,
                jackpot: win.kind == WinKind::Jackpot,
            });

            let burst = match win.kind {
                WinKind::Jackpot => None,
                WinKind::Pair => Some((6, 60)),
                WinKind::Triple if win.symbol <= 2 => Some((14, 100)),
                WinKind::Triple => Some((10, 80)),
            };
            if let Some((count, life)) = burst {
                let center = Vec2::new(
                    self.config.reel_start_x + self.config.reels_span() / 2.0,
                    self.config.reel_start_y + self.config.reel_height / 2.0,
                );
                self.particles
                    .extend(particles::burst(center, count, win.symbol, life, rng));
            }
            log::info!("Spin settled {:?}: won {}", line, win.amount);
        } else {
            log::debug!("Spin settled {:?}: no win", line);
        }

        SlotEvent::Settled { line, payout }
    }
}
