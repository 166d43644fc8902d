//! Portfolio builder and window loop.

use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::{HeroConfig, NetworkConfig, SiteConfig, TerminalConfig, TypewriterConfig};
use crate::contact::ContactForm;
use crate::error::AppError;
use crate::gpu::GpuSurface;
use crate::input::Pointer;
use crate::overlay::Overlay;
use crate::scene::{DrawSurface, NetworkScene};
use crate::time::Time;

/// A portfolio front-end builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
pub struct Portfolio {
    config: SiteConfig,
    contacts: Vec<ContactForm>,
}

impl Portfolio {
    /// Create a portfolio with the default site configuration.
    pub fn new() -> Self {
        Self::with_config(SiteConfig::default())
    }

    /// Start from a complete site configuration.
    pub fn with_config(config: SiteConfig) -> Self {
        Self {
            config,
            contacts: Vec::new(),
        }
    }

    /// Set the window title prefix.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Replace the particle-network settings.
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.config.network = network;
        self
    }

    /// Add a typewriter effect.
    pub fn with_typewriter(mut self, typewriter: TypewriterConfig) -> Self {
        self.config.typewriters.push(typewriter);
        self
    }

    /// Add a terminal-style typewriter effect.
    pub fn with_terminal(mut self, terminal: TerminalConfig) -> Self {
        self.config.terminals.push(terminal);
        self
    }

    /// Set the one-shot hero line.
    pub fn with_hero(mut self, hero: HeroConfig) -> Self {
        self.config.hero = Some(hero);
        self
    }

    /// Queue a contact form to submit once the window is up.
    pub fn with_contact(mut self, form: ContactForm) -> Self {
        self.contacts.push(form);
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Validate the configuration and run until the window closes.
    pub fn run(self) -> Result<(), AppError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config, self.contacts);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new()
    }
}

/// `"{prefix} | {caption}"`, or just the prefix while nothing is shown.
pub fn window_title(prefix: &str, caption: &str) -> String {
    if caption.is_empty() {
        prefix.to_owned()
    } else {
        format!("{prefix} | {caption}")
    }
}

struct App {
    title: String,
    network: NetworkConfig,
    window: Option<Arc<Window>>,
    surface: Option<GpuSurface>,
    scene: Option<NetworkScene>,
    pointer: Pointer,
    overlay: Overlay,
    contacts: Vec<ContactForm>,
    time: Time,
    /// First fatal error, reported once the loop returns.
    error: Option<AppError>,
}

impl App {
    fn new(config: SiteConfig, contacts: Vec<ContactForm>) -> Self {
        let overlay = Overlay::from_config(&config);
        Self {
            title: config.title,
            network: config.network,
            window: None,
            surface: None,
            scene: None,
            pointer: Pointer::new(),
            overlay,
            contacts,
            time: Time::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!(error = %err, "fatal error");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&window_title(&self.title, &self.overlay.caption()));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.time.update() {
            debug!(fps = self.time.fps(), frame = self.time.frame(), "frame rate");
        }

        if self.overlay.update(self.time.now_ms()) {
            self.refresh_title();
        }

        if let (Some(scene), Some(surface)) = (&mut self.scene, &mut self.surface) {
            match scene.render(self.pointer.offset(), surface) {
                Ok(edges) => trace!(edges, delta = self.time.delta(), "frame drawn"),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (width, height) = surface.size();
                    surface.resize(width, height);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => warn!(error = %e, "render error"),
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let size = window.inner_size();
        self.pointer.set_window_size(size.width, size.height);
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;

        match pollster::block_on(GpuSurface::new(window.clone(), &self.network)) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => return self.fail(event_loop, e.into()),
        }
        self.scene = Some(NetworkScene::new(&self.network, aspect));
        self.window = Some(window.clone());

        self.time.update();
        let now = self.time.now_ms();
        self.overlay.start(now);
        for mut form in self.contacts.drain(..) {
            self.overlay.submit(&mut form, now);
        }

        info!(
            width = size.width,
            height = size.height,
            effects = self.overlay.len(),
            "window ready"
        );
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.pointer.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                self.overlay.dispose();
                info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let (Some(scene), Some(surface)) = (&mut self.scene, &mut self.surface) {
                    scene.resize(size.width, size.height, surface);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
