//! A single node of the particle network.

use glam::Vec3;

/// Default half-width of the cube particles live in.
pub const DEFAULT_BOUNDS: f32 = 1000.0;

/// One animated node.
///
/// Velocity is assigned once at spawn and never changes. The connection
/// count is scratch state owned by the edge rebuild and is reset at the
/// start of every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in world units.
    pub position: Vec3,
    /// Per-frame displacement.
    pub velocity: Vec3,
    /// Edges counted against this particle in the current frame.
    pub connections: u32,
}

impl Particle {
    /// Create a particle with no connections.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            connections: 0,
        }
    }

    /// Move by one velocity step, wrapping each axis inside `[-bounds, bounds]`.
    ///
    /// Also clears the connection counter for the coming edge pass.
    #[inline]
    pub fn advance(&mut self, bounds: f32) {
        let moved = self.position + self.velocity;
        self.position = Vec3::new(
            wrap_axis(moved.x, bounds),
            wrap_axis(moved.y, bounds),
            wrap_axis(moved.z, bounds),
        );
        self.connections = 0;
    }
}

/// Toroidal wrap: leaving one face re-enters exactly at the opposite face.
///
/// This is not a modulo. A coordinate past `+bounds` becomes `-bounds`
/// regardless of how far past it went.
#[inline]
pub fn wrap_axis(value: f32, bounds: f32) -> f32 {
    if value > bounds {
        -bounds
    } else if value < -bounds {
        bounds
    } else {
        value
    }
}
