//! Per-frame composition of the particle network.
//!
//! [`NetworkScene`] owns the network, the camera and the group rotation and
//! runs the fixed frame sequence: advance particles, rebuild edges, drift the
//! camera, rotate the group, draw once. Drawing goes through the
//! [`DrawSurface`] capability so the whole sequence runs without a GPU in
//! tests.

use glam::{Mat4, Vec2};

use crate::camera::DriftCamera;
use crate::config::NetworkConfig;
use crate::network::{EdgeVertex, ParticleNetwork};

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Projection * view * group rotation.
    pub transform: Mat4,
    /// Particle positions in group space.
    pub particles: &'a [[f32; 3]],
    /// Vertices of the valid edges only, two per edge.
    pub edges: &'a [EdgeVertex],
}

impl Frame<'_> {
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }
}

/// Something that can put a [`Frame`] on screen.
pub trait DrawSurface {
    type Error;

    /// The drawing area changed size.
    fn resize(&mut self, width: u32, height: u32);

    /// Issue the draw for one frame.
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

/// The animated particle network with its camera.
pub struct NetworkScene {
    network: ParticleNetwork,
    camera: DriftCamera,
    rotation_y: f32,
    rotation_speed: f32,
}

impl NetworkScene {
    /// Spawn a fresh network for a surface with the given aspect ratio.
    pub fn new(config: &NetworkConfig, aspect: f32) -> Self {
        Self::from_network(ParticleNetwork::new(config), config, aspect)
    }

    pub fn from_network(network: ParticleNetwork, config: &NetworkConfig, aspect: f32) -> Self {
        Self {
            network,
            camera: DriftCamera::new(config, aspect),
            rotation_y: 0.0,
            rotation_speed: config.rotation_speed,
        }
    }

    /// Run the simulation half of a frame. Returns the edge count.
    pub fn update(&mut self, pointer_offset: Vec2) -> usize {
        let edges = self.network.step();
        self.camera.drift(pointer_offset);
        self.rotation_y += self.rotation_speed;
        edges
    }

    /// Snapshot of the current state for drawing.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            transform: self.camera.view_proj() * self.model_matrix(),
            particles: self.network.positions(),
            edges: self.network.edges().valid_vertices(),
        }
    }

    /// Update, then draw once.
    pub fn render<S: DrawSurface>(
        &mut self,
        pointer_offset: Vec2,
        surface: &mut S,
    ) -> Result<usize, S::Error> {
        let edges = self.update(pointer_offset);
        surface.draw(&self.frame())?;
        Ok(edges)
    }

    /// Recompute projection and resize the surface.
    pub fn resize<S: DrawSurface>(&mut self, width: u32, height: u32, surface: &mut S) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_viewport(width, height);
        surface.resize(width, height);
    }

    /// Rotation of the particle group about Y.
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }

    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    #[inline]
    pub fn network(&self) -> &ParticleNetwork {
        &self.network
    }

    #[inline]
    pub fn camera(&self) -> &DriftCamera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSurface {
        draws: usize,
        last_edges: usize,
        last_particles: usize,
        size: Option<(u32, u32)>,
    }

    impl DrawSurface for CountingSurface {
        type Error = ();

        fn resize(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn draw(&mut self, frame: &Frame<'_>) -> Result<(), ()> {
            self.draws += 1;
            self.last_edges = frame.edge_count();
            self.last_particles = frame.particles.len();
            Ok(())
        }
    }

    fn seeded() -> NetworkConfig {
        NetworkConfig {
            seed: Some(1),
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_render_draws_once_per_frame() {
        let mut scene = NetworkScene::new(&seeded(), 1.5);
        let mut surface = CountingSurface::default();
        for _ in 0..10 {
            let edges = scene.render(Vec2::ZERO, &mut surface).unwrap();
            assert_eq!(edges, surface.last_edges);
        }
        assert_eq!(surface.draws, 10);
        assert_eq!(surface.last_particles, 150);
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut scene = NetworkScene::new(&seeded(), 1.0);
        for _ in 0..4 {
            scene.update(Vec2::ZERO);
        }
        assert!((scene.rotation_y() - 0.002).abs() < 1e-7);
    }

    #[test]
    fn test_pointer_moves_camera() {
        let mut scene = NetworkScene::new(&seeded(), 1.0);
        scene.update(Vec2::new(400.0, 0.0));
        assert!(scene.camera().position.x > 0.0);
    }

    #[test]
    fn test_resize_updates_aspect_and_surface() {
        let mut scene = NetworkScene::new(&seeded(), 1.0);
        let mut surface = CountingSurface::default();
        scene.resize(1920, 1080, &mut surface);
        assert_eq!(surface.size, Some((1920, 1080)));
        assert!((scene.camera().aspect - 1920.0 / 1080.0).abs() < 1e-6);

        scene.resize(0, 1080, &mut surface);
        assert_eq!(surface.size, Some((1920, 1080)));
    }
}
