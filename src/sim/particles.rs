//! Debris particles spawned where a voxel was removed
//!
//! Motion is a fixed displacement per animation tick while expiry follows the
//! wall clock, so a fast display moves debris further before it disappears.
//! `ParticleMotion::Elapsed` switches motion to real time instead.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Hsl;
use crate::consts::{PARTICLE_COUNT, PARTICLE_LIFETIME, PARTICLE_STEP};
use crate::settings::ParticleMotion;

/// A debris cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Scene-local position
    pub pos: Vec3,
    pub vel: Vec3,
    /// Wall-clock spawn time (seconds)
    pub spawn_time: f64,
    pub color: Hsl,
}

impl Particle {
    /// Seconds since spawn
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawn_time
    }

    #[inline]
    pub fn expired(&self, now: f64) -> bool {
        self.age(now) > PARTICLE_LIFETIME
    }
}

/// Owns live debris and advances it each frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleEmitter {
    pub particles: Vec<Particle>,
    pub motion: ParticleMotion,
    /// Time of the previous tick, for `ParticleMotion::Elapsed`
    last_tick: Option<f64>,
}

impl ParticleEmitter {
    pub fn new(motion: ParticleMotion) -> Self {
        Self {
            particles: Vec::new(),
            motion,
            last_tick: None,
        }
    }

    /// Spawn `PARTICLE_COUNT` particles at a removal site
    pub fn spawn(&mut self, pos: Vec3, color: Hsl, now: f64, rng: &mut impl Rng) {
        self.spawn_n(pos, color, now, PARTICLE_COUNT, rng);
    }

    /// Spawn `count` particles with independent hemisphere-biased velocities
    pub fn spawn_n(&mut self, pos: Vec3, color: Hsl, now: f64, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let vel = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(0.0..2.0),
                rng.random_range(-1.0..1.0),
            );
            self.particles.push(Particle {
                pos,
                vel,
                spawn_time: now,
                color,
            });
        }
    }

    /// Advance every particle one animation tick, then retire expired ones
    pub fn tick(&mut self, now: f64) {
        let step = match self.motion {
            ParticleMotion::FixedStep => PARTICLE_STEP,
            ParticleMotion::Elapsed => {
                let dt = self.last_tick.map_or(0.0, |last| (now - last).max(0.0));
                dt as f32
            }
        };
        self.last_tick = Some(now);

        for particle in &mut self.particles {
            particle.pos += particle.vel * step;
        }
        self.particles.retain(|p| !p.expired(now));
    }

    /// Recolor every live particle
    pub fn recolor(&mut self, mut color: impl FnMut() -> Hsl) {
        for particle in &mut self.particles {
            particle.color = color();
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const RED: Hsl = Hsl::new(0.0, 0.8, 0.5);

    fn emitter_with_burst(now: f64) -> ParticleEmitter {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut emitter = ParticleEmitter::new(ParticleMotion::FixedStep);
        emitter.spawn(Vec3::new(1.0, 2.0, 3.0), RED, now, &mut rng);
        emitter
    }

    #[test]
    fn test_spawn_count_and_velocity_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut emitter = ParticleEmitter::new(ParticleMotion::FixedStep);
        for _ in 0..50 {
            emitter.spawn(Vec3::ZERO, RED, 0.0, &mut rng);
        }
        assert_eq!(emitter.len(), 50 * PARTICLE_COUNT);
        for p in &emitter.particles {
            assert!((-1.0..1.0).contains(&p.vel.x));
            assert!((0.0..2.0).contains(&p.vel.y));
            assert!((-1.0..1.0).contains(&p.vel.z));
            assert_eq!(p.color, RED);
            assert_eq!(p.pos, Vec3::ZERO);
        }
    }

    #[test]
    fn test_fixed_step_motion_ignores_elapsed_time() {
        let mut emitter = emitter_with_burst(0.0);
        let start: Vec<Vec3> = emitter.particles.iter().map(|p| p.pos).collect();

        // Two ticks with very different real gaps move the same amount
        emitter.tick(0.001);
        emitter.tick(0.5);
        for (p, s) in emitter.particles.iter().zip(start.iter()) {
            let expected = *s + p.vel * PARTICLE_STEP * 2.0;
            assert!((p.pos - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_no_expiry_before_lifetime_without_ticks() {
        let mut emitter = emitter_with_burst(0.0);
        // First tick lands just before the lifetime runs out
        emitter.tick(0.79);
        assert_eq!(emitter.len(), PARTICLE_COUNT);
        // At exactly the lifetime it is still alive (strictly greater expires)
        emitter.tick(0.8);
        assert_eq!(emitter.len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_many_rapid_ticks_still_expire_on_wall_clock() {
        let mut emitter = emitter_with_burst(0.0);
        // 1000 ticks inside 0.5s: nobody expires
        for i in 0..1000 {
            emitter.tick(i as f64 * 0.0005);
        }
        assert_eq!(emitter.len(), PARTICLE_COUNT);

        emitter.tick(0.81);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_bursts_expire_independently() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut emitter = ParticleEmitter::new(ParticleMotion::FixedStep);
        emitter.spawn(Vec3::ZERO, RED, 0.0, &mut rng);
        emitter.spawn(Vec3::ONE, RED, 0.5, &mut rng);

        emitter.tick(0.9);
        assert_eq!(emitter.len(), PARTICLE_COUNT);
        assert!(emitter.particles.iter().all(|p| p.spawn_time == 0.5));

        emitter.tick(1.31);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_elapsed_motion_scales_with_time() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut emitter = ParticleEmitter::new(ParticleMotion::Elapsed);
        emitter.spawn(Vec3::ZERO, RED, 0.0, &mut rng);

        // First tick only establishes the clock
        emitter.tick(0.0);
        assert!(emitter.particles.iter().all(|p| p.pos == Vec3::ZERO));

        emitter.tick(0.25);
        for p in &emitter.particles {
            assert!((p.pos - p.vel * 0.25).length() < 1e-5);
        }
    }

    #[test]
    fn test_recolor() {
        let mut emitter = emitter_with_burst(0.0);
        let blue = Hsl::new(240.0, 1.0, 0.5);
        emitter.recolor(|| blue);
        assert!(emitter.particles.iter().all(|p| p.color == blue));
    }
}
