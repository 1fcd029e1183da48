//! Win-burst particles
//!
//! Purely cosmetic. A burst starts at one point and flies outward; gravity
//! pulls each particle down and it fades out as its life runs out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Symbol index for colour lookup
    pub color: usize,
    pub size: f32,
    /// Frames remaining
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Opacity from remaining life, 1 at spawn down to 0
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}

/// Spawn `count` particles evenly around a circle with some jitter
pub fn burst(
    center: Vec2,
    count: usize,
    color: usize,
    life: u32,
    rng: &mut dyn RandomSource,
) -> Vec<Particle> {
    (0..count)
        .map(|i| {
            let angle = (i as f64 / count as f64) * std::f64::consts::TAU + rng.next_f64() * 0.5;
            let speed = 2.0 + rng.next_f64() * 3.0;
            let size = 4.0 + rng.next_f64() * 4.0;
            Particle {
                pos: center,
                vel: Vec2::new(
                    (angle.cos() * speed) as f32,
                    (angle.sin() * speed - 1.0) as f32,
                ),
                color,
                size: size as f32,
                life,
                max_life: life,
            }
        })
        .collect()
}

/// Advance one frame and drop expired particles
pub fn step(particles: &mut Vec<Particle>, gravity: f32) {
    particles.retain_mut(|p| {
        p.pos += p.vel;
        p.vel.y += gravity;
        p.life = p.life.saturating_sub(1);
        p.life > 0
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    #[test]
    fn test_burst_layout() {
        let mut rng = ScriptedSource::constant(0.0);
        let particles = burst(Vec2::new(180.0, 132.5), 4, 2, 60, &mut rng);
        assert_eq!(particles.len(), 4);

        // First particle: angle 0, speed 2, lifted by 1
        let p = &particles[0];
        assert_eq!(p.pos, Vec2::new(180.0, 132.5));
        assert!((p.vel.x - 2.0).abs() < 1e-6);
        assert!((p.vel.y + 1.0).abs() < 1e-6);
        assert_eq!(p.size, 4.0);
        assert_eq!(p.alpha(), 1.0);
    }

    #[test]
    fn test_step_applies_gravity_and_expires() {
        let mut rng = ScriptedSource::constant(0.0);
        let mut particles = burst(Vec2::ZERO, 1, 0, 3, &mut rng);

        step(&mut particles, 0.1);
        assert_eq!(particles[0].pos, Vec2::new(2.0, -1.0));
        assert!((particles[0].vel.y + 0.9).abs() < 1e-6);
        assert_eq!(particles[0].life, 2);

        step(&mut particles, 0.1);
        assert_eq!(particles.len(), 1);
        step(&mut particles, 0.1);
        assert!(particles.is_empty());
    }
}
