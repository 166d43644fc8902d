//! Spawn context for particle pool initialization.
//!
//! Wraps the RNG so the network builder never touches it directly.

use crate::particle::Particle;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random helpers used while filling the particle pool.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(150, 1000.0);
/// let particles: Vec<Particle> = (0..ctx.count).map(|_| ctx.spawn_particle(1.0)).collect();
/// ```
pub struct SpawnContext {
    /// Total number of particles being spawned.
    pub count: u32,
    /// Half-width of the spawn cube.
    pub bounds: f32,
    /// Internal RNG - use helper methods instead of accessing directly.
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context seeded from the wall clock, so each run differs.
    pub fn new(count: u32, bounds: f32) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed, count, bounds)
    }

    /// Create a context with a fixed seed for reproducible pools.
    pub fn seeded(seed: u64, count: u32, bounds: f32) -> Self {
        Self {
            count,
            bounds,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 in the given inclusive range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..=max)
    }

    /// Random point inside a cube of given half-size, centered at origin.
    pub fn random_in_cube(&mut self, half_size: f32) -> Vec3 {
        Vec3::new(
            self.random_range(-half_size, half_size),
            self.random_range(-half_size, half_size),
            self.random_range(-half_size, half_size),
        )
    }

    /// Random point within the spawn bounds.
    pub fn random_in_bounds(&mut self) -> Vec3 {
        self.random_in_cube(self.bounds)
    }

    /// Velocity with each axis drawn independently from `[-max_speed, max_speed]`.
    pub fn random_velocity(&mut self, max_speed: f32) -> Vec3 {
        self.random_in_cube(max_speed)
    }

    /// One fresh particle somewhere in bounds.
    pub fn spawn_particle(&mut self, max_speed: f32) -> Particle {
        let position = self.random_in_bounds();
        let velocity = self.random_velocity(max_speed);
        Particle::new(position, velocity)
    }

    /// Fill a whole pool of `count` particles.
    pub fn spawn_pool(&mut self, max_speed: f32) -> Vec<Particle> {
        (0..self.count).map(|_| self.spawn_particle(max_speed)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_in_cube_bounds() {
        let mut ctx = SpawnContext::seeded(7, 1, 1000.0);
        for _ in 0..500 {
            let pos = ctx.random_in_bounds();
            assert!(pos.abs().max_element() <= 1000.0);
        }
    }

    #[test]
    fn test_random_velocity_range() {
        let mut ctx = SpawnContext::seeded(11, 1, 1000.0);
        for _ in 0..500 {
            let v = ctx.random_velocity(1.0);
            assert!(v.abs().max_element() <= 1.0);
        }
    }

    #[test]
    fn test_spawn_pool_size_and_reproducibility() {
        let a = SpawnContext::seeded(3, 150, 1000.0).spawn_pool(1.0);
        let b = SpawnContext::seeded(3, 150, 1000.0).spawn_pool(1.0);
        assert_eq!(a.len(), 150);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| p.connections == 0));
    }
}
