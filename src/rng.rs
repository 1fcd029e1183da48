//! Random draws shared by all games
//!
//! Every game pulls its randomness through [`RandomSource`] so a run can be
//! replayed from a seed, and tests can script exact outcomes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random draws
pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        ((self.next_f64() * n as f64).floor() as u32).min(n - 1)
    }

    /// Uniform float in `[lo, hi)`
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// PCG-backed source used in production
#[derive(Debug, Clone)]
pub struct PcgSource {
    rng: Pcg32,
}

impl PcgSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the wall clock
    pub fn from_clock() -> Self {
        Self::seeded(clock_seed())
    }
}

impl RandomSource for PcgSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed cycle of draws
///
/// Values are clamped into `[0, 1)`. An empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// A source that always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Weighted index draw
///
/// Draws a uniform float over the total weight and subtracts each weight in
/// table order until the remainder is `<= 0`. If rounding keeps the remainder
/// positive past the end of the table the last index is returned.
pub fn weighted_index(weights: &[u32], rng: &mut dyn RandomSource) -> usize {
    let total: u64 = weights.iter().map(|&w| w as u64).sum();
    let mut remaining = rng.next_f64() * total as f64;

    for (i, &w) in weights.iter().enumerate() {
        remaining -= w as f64;
        if remaining <= 0.0 {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
