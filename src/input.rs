//! Pointer tracking.
//!
//! The camera drift only needs one thing from input: where the pointer is
//! relative to the window centre, in pixels. [`Pointer`] folds winit events
//! into that value and keeps the window size needed to compute it.

use glam::Vec2;
use winit::event::WindowEvent;

/// Last known pointer position and the window it was measured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    position: Vec2,
    offset: Vec2,
    window_size: (u32, u32),
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pointer {
    /// A pointer resting at the centre of an 800x600 window.
    pub fn new() -> Self {
        Self {
            position: Vec2::new(400.0, 300.0),
            offset: Vec2::ZERO,
            window_size: (800, 600),
        }
    }

    /// Pointer offset from the window centre in pixels.
    ///
    /// X grows to the right, Y grows downward (window convention).
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Record a pointer move in window pixels.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.recompute();
    }

    /// Record a window resize. Zero-sized windows are ignored.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.window_size = (width, height);
        self.recompute();
    }

    fn recompute(&mut self) {
        let (w, h) = self.window_size;
        let center = Vec2::new(w as f32 / 2.0, h as f32 / 2.0);
        self.offset = self.position - center;
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(position.x as f32, position.y as f32);
            }
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }
            _ => {}
        }
    }
}
