//! # Plexus
//!
//! A portfolio front-end rendered natively: an animated 3D particle network
//! behind text-cycling typewriter effects and a simulated contact form.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plexus::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     Portfolio::new()
//!         .with_title("root@portfolio")
//!         .with_typewriter(TypewriterConfig {
//!             target: "role".into(),
//!             strings: vec!["Penetration Tester".into(), "CTF Player".into()],
//!             ..Default::default()
//!         })
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particle network
//!
//! [`ParticleNetwork`] holds a fixed pool of particles drifting inside a
//! wrap-around cube. Every frame they advance, then pairs closer than the
//! link distance are joined greedily in index order until each particle has
//! reached its connection cap. Edges are written into a buffer sized for
//! every pair, and only the leading draw count is valid.
//!
//! ### Text effects
//!
//! Effects implement [`TextEffect`] and run on a virtual millisecond
//! timeline: each owns one pending deadline and [`TextEffect::update`] runs
//! every tick due by `now`. That makes every timing rule testable without
//! a clock:
//!
//! ```ignore
//! let mut effect = TypewriterEffect::new(&config);
//! let mut renders = Vec::new();
//! effect.start(0);
//! effect.update(0, &mut renders);   // "C"
//! effect.update(100, &mut renders); // "Cy"
//! ```
//!
//! ### Contact form
//!
//! [`ContactForm::submit`] never leaves the process. It returns a
//! [`Banner`] that a [`BannerStack`] shows for five seconds before a short
//! slide-out.
//!
//! ## Logging
//!
//! Everything logs through `tracing`. The binary installs a
//! `tracing-subscriber` formatter honouring `RUST_LOG`.

pub mod app;
pub mod camera;
pub mod config;
pub mod contact;
pub mod error;
mod gpu;
pub mod input;
pub mod network;
pub mod overlay;
pub mod particle;
pub mod scene;
mod spawn;
pub mod time;
pub mod timer;
pub mod typewriter;

pub use app::Portfolio;
pub use camera::DriftCamera;
pub use config::{HeroConfig, NetworkConfig, SiteConfig, TerminalConfig, TypewriterConfig};
pub use contact::{Banner, BannerKind, BannerStack, ContactForm};
pub use error::{AppError, ConfigError, GpuError};
pub use glam::{Mat4, Vec2, Vec3};
pub use gpu::GpuSurface;
pub use network::{EdgeBuffer, EdgeVertex, ParticleNetwork};
pub use overlay::Overlay;
pub use particle::Particle;
pub use scene::{DrawSurface, Frame, NetworkScene};
pub use spawn::SpawnContext;
pub use timer::{Deferred, Millis};
pub use typewriter::{
    TerminalTypewriterEffect, TextBoard, TextCycle, TextEffect, TextSink, TypeOnce,
    TypewriterEffect,
};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use plexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::Portfolio;
    pub use crate::config::{
        HeroConfig, NetworkConfig, SiteConfig, TerminalConfig, TypewriterConfig,
    };
    pub use crate::contact::{Banner, BannerKind, BannerStack, ContactForm};
    pub use crate::error::AppError;
    pub use crate::network::ParticleNetwork;
    pub use crate::overlay::Overlay;
    pub use crate::scene::{DrawSurface, Frame, NetworkScene};
    pub use crate::timer::Millis;
    pub use crate::typewriter::{
        TerminalTypewriterEffect, TextBoard, TextEffect, TextSink, TypeOnce, TypewriterEffect,
    };
    pub use crate::{Vec2, Vec3};
}
