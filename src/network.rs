//! Particle pool and proximity edges.
//!
//! Every frame the pool advances by one velocity step and the edge set is
//! rebuilt from scratch with a greedy O(N²) pair scan. Nothing here knows
//! about the GPU; the result is plain vertex data a [`DrawSurface`] uploads.
//!
//! [`DrawSurface`]: crate::scene::DrawSurface

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use tracing::debug;

use crate::config::NetworkConfig;
use crate::particle::Particle;
use crate::spawn::SpawnContext;

/// Largest pool the edge buffer is allocated for.
///
/// The buffer holds N² edges of two [`EdgeVertex`] each; at this size that is
/// 192 MiB, inside the 256 MiB default `max_buffer_size` of a wgpu device.
pub const MAX_PARTICLES: u32 = 2048;

/// One endpoint of an edge line segment, laid out for a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct EdgeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Preallocated line-segment storage with a live-range marker.
///
/// Holds two vertices per edge. Only the first `draw_count` edges are valid;
/// every vertex after them is zero.
#[derive(Debug, Clone)]
pub struct EdgeBuffer {
    vertices: Vec<EdgeVertex>,
    capacity: usize,
    draw_count: usize,
}

impl EdgeBuffer {
    /// Allocate room for `capacity` edges, all zeroed.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: vec![EdgeVertex::zeroed(); capacity * 2],
            capacity,
            draw_count: 0,
        }
    }

    /// Maximum number of edges the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of valid edges written by the last rebuild.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// The whole backing store, valid range first.
    #[inline]
    pub fn vertices(&self) -> &[EdgeVertex] {
        &self.vertices
    }

    /// Only the vertices of valid edges.
    #[inline]
    pub fn valid_vertices(&self) -> &[EdgeVertex] {
        &self.vertices[..self.draw_count * 2]
    }

    fn write(&mut self, slot: usize, a: Vec3, b: Vec3, color: Vec3) {
        let color = color.to_array();
        self.vertices[slot * 2] = EdgeVertex {
            position: a.to_array(),
            color,
        };
        self.vertices[slot * 2 + 1] = EdgeVertex {
            position: b.to_array(),
            color,
        };
    }

    /// Close a rebuild at `count` edges.
    ///
    /// Slots past the previous draw count are already zero, so only the
    /// stale range `[count, previous)` needs clearing.
    fn finish(&mut self, count: usize) {
        let stale_end = self.draw_count.max(count) * 2;
        self.vertices[count * 2..stale_end].fill(EdgeVertex::zeroed());
        self.draw_count = count;
    }
}

/// Blend from `primary` (touching) to `secondary` (at the threshold).
///
/// The factor is `distance / threshold`, clamped to `[0, 1]`.
#[inline]
pub fn edge_color(primary: Vec3, secondary: Vec3, distance: f32, threshold: f32) -> Vec3 {
    let t = if threshold > 0.0 {
        (distance / threshold).clamp(0.0, 1.0)
    } else {
        1.0
    };
    primary.lerp(secondary, t)
}

/// A fixed pool of particles plus the edges between close pairs.
pub struct ParticleNetwork {
    particles: Vec<Particle>,
    positions: Vec<[f32; 3]>,
    edges: EdgeBuffer,
    bounds: f32,
    link_distance: f32,
    max_connections: u32,
    primary_color: Vec3,
    secondary_color: Vec3,
}

impl ParticleNetwork {
    /// Spawn a pool as described by `config`.
    ///
    /// Uses `config.seed` when set, otherwise the wall clock.
    pub fn new(config: &NetworkConfig) -> Self {
        let mut ctx = match config.seed {
            Some(seed) => SpawnContext::seeded(seed, config.particle_count, config.bounds),
            None => SpawnContext::new(config.particle_count, config.bounds),
        };
        let particles = ctx.spawn_pool(config.max_speed);
        debug!(
            count = particles.len(),
            bounds = config.bounds,
            "spawned particle pool"
        );
        Self::from_particles(particles, config)
    }

    /// Build a network around an existing pool.
    ///
    /// The edge buffer is sized for N² edges, which covers every pair.
    pub fn from_particles(particles: Vec<Particle>, config: &NetworkConfig) -> Self {
        let n = particles.len();
        let positions = particles.iter().map(|p| p.position.to_array()).collect();
        Self {
            particles,
            positions,
            edges: EdgeBuffer::with_capacity(n * n),
            bounds: config.bounds,
            link_distance: config.link_distance,
            max_connections: config.max_connections,
            primary_color: Vec3::from_array(config.primary_color),
            secondary_color: Vec3::from_array(config.secondary_color),
        }
    }

    /// Advance one frame: move every particle, then rebuild edges.
    ///
    /// Returns the number of edges drawn this frame.
    pub fn step(&mut self) -> usize {
        self.advance();
        self.rebuild_edges()
    }

    /// Move every particle by its velocity with toroidal wrap.
    pub fn advance(&mut self) {
        for (particle, position) in self.particles.iter_mut().zip(self.positions.iter_mut()) {
            particle.advance(self.bounds);
            *position = particle.position.to_array();
        }
    }

    /// Rebuild the edge buffer from current positions.
    ///
    /// Pairs are visited in index order `(i, j)`, `i < j`, and a pair is
    /// skipped once either side has `max_connections` edges. The result is
    /// greedy and order-dependent, not a nearest-neighbour matching.
    pub fn rebuild_edges(&mut self) -> usize {
        for particle in &mut self.particles {
            particle.connections = 0;
        }

        let n = self.particles.len();
        let max = self.max_connections;
        let mut cursor = 0;

        'outer: for i in 0..n {
            if self.particles[i].connections >= max {
                continue;
            }
            for j in (i + 1)..n {
                if self.particles[i].connections >= max {
                    break;
                }
                if self.particles[j].connections >= max {
                    continue;
                }

                let a = self.particles[i].position;
                let b = self.particles[j].position;
                let distance = a.distance(b);
                if distance >= self.link_distance {
                    continue;
                }
                if cursor >= self.edges.capacity() {
                    break 'outer;
                }

                let color = edge_color(
                    self.primary_color,
                    self.secondary_color,
                    distance,
                    self.link_distance,
                );
                self.edges.write(cursor, a, b, color);
                cursor += 1;
                self.particles[i].connections += 1;
                self.particles[j].connections += 1;
            }
        }

        self.edges.finish(cursor);
        cursor
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particle positions in pool order, ready for upload.
    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn edges(&self) -> &EdgeBuffer {
        &self.edges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: f32, y: f32, z: f32) -> Particle {
        Particle::new(Vec3::new(x, y, z), Vec3::ZERO)
    }

    fn config() -> NetworkConfig {
        NetworkConfig::default()
    }

    #[test]
    fn test_edge_buffer_starts_empty() {
        let buffer = EdgeBuffer::with_capacity(4);
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.draw_count(), 0);
        assert_eq!(buffer.vertices().len(), 8);
        assert!(buffer.valid_vertices().is_empty());
    }

    #[test]
    fn test_close_pair_gets_one_edge() {
        let mut net = ParticleNetwork::from_particles(
            vec![still(0.0, 0.0, 0.0), still(100.0, 0.0, 0.0)],
            &config(),
        );
        assert_eq!(net.rebuild_edges(), 1);

        let v = net.edges().valid_vertices();
        assert_eq!(v[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(v[1].position, [100.0, 0.0, 0.0]);
        assert_eq!(v[0].color, v[1].color);
        assert_eq!(net.particles()[0].connections, 1);
        assert_eq!(net.particles()[1].connections, 1);
    }

    #[test]
    fn test_pair_at_threshold_is_not_linked() {
        let mut net = ParticleNetwork::from_particles(
            vec![still(0.0, 0.0, 0.0), still(200.0, 0.0, 0.0)],
            &config(),
        );
        assert_eq!(net.rebuild_edges(), 0);
    }

    #[test]
    fn test_connection_cap_is_greedy_in_index_order() {
        // Particle 0 has four close neighbours. The three lowest indices win,
        // even though particle 4 is the closest.
        let mut net = ParticleNetwork::from_particles(
            vec![
                still(0.0, 0.0, 0.0),
                still(150.0, 0.0, 0.0),
                still(0.0, 150.0, 0.0),
                still(0.0, 0.0, 150.0),
                still(1.0, 0.0, 0.0),
            ],
            &config(),
        );
        net.rebuild_edges();

        let p = net.particles();
        assert_eq!(p[0].connections, 3);
        assert!(p.iter().all(|p| p.connections <= 3));

        let v = net.edges().valid_vertices();
        let first_three_targets: Vec<[f32; 3]> = (0..3).map(|e| v[e * 2 + 1].position).collect();
        assert_eq!(
            first_three_targets,
            vec![[150.0, 0.0, 0.0], [0.0, 150.0, 0.0], [0.0, 0.0, 150.0]]
        );
    }

    #[test]
    fn test_shrinking_edge_set_zeroes_stale_slots() {
        let mut net = ParticleNetwork::from_particles(
            vec![still(0.0, 0.0, 0.0), still(50.0, 0.0, 0.0), still(0.0, 50.0, 0.0)],
            &config(),
        );
        assert_eq!(net.rebuild_edges(), 3);

        // Spread them apart and rebuild.
        net.particles[1].position = Vec3::new(900.0, 0.0, 0.0);
        net.particles[2].position = Vec3::new(-900.0, 0.0, 0.0);
        assert_eq!(net.rebuild_edges(), 0);
        assert!(net
            .edges()
            .vertices()
            .iter()
            .all(|v| *v == EdgeVertex::zeroed()));
    }

    #[test]
    fn test_edge_color_endpoints_and_monotonic() {
        let primary = Vec3::new(0.0, 1.0, 0.0);
        let secondary = Vec3::new(1.0, 0.0, 0.0);

        assert_eq!(edge_color(primary, secondary, 0.0, 200.0), primary);
        assert_eq!(edge_color(primary, secondary, 200.0, 200.0), secondary);

        let mut last = -1.0;
        for d in 0..=200 {
            let c = edge_color(primary, secondary, d as f32, 200.0);
            assert!(c.x >= last);
            last = c.x;
        }
    }

    #[test]
    fn test_step_keeps_particles_in_bounds() {
        let mut cfg = config();
        cfg.seed = Some(99);
        let mut net = ParticleNetwork::new(&cfg);
        for _ in 0..500 {
            net.step();
        }
        for p in net.particles() {
            assert!(p.position.abs().max_element() <= cfg.bounds);
        }
        for (pos, p) in net.positions().iter().zip(net.particles()) {
            assert_eq!(*pos, p.position.to_array());
        }
    }
}
