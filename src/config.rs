//! Configuration types for the portfolio effects.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. Configs round-trip through JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::network::MAX_PARTICLES;
use crate::particle::DEFAULT_BOUNDS;

/// `0xRRGGBB` to RGB components in `[0, 1]`.
pub fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// sRGB-encoded components to linear light, for sRGB render targets.
pub fn srgb_to_linear(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

/// Particle-network renderer settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub particle_count: u32,
    /// Half-width of the wrap cube.
    pub bounds: f32,
    /// Per-axis velocity is drawn from `[-max_speed, max_speed]`.
    pub max_speed: f32,
    /// Pairs closer than this are linked.
    pub link_distance: f32,
    /// Edges a single particle may take part in per frame.
    pub max_connections: u32,
    /// Edge colour for touching pairs.
    pub primary_color: [f32; 3],
    /// Edge colour at `link_distance`.
    pub secondary_color: [f32; 3],
    /// Alpha applied to every edge.
    pub edge_opacity: f32,
    pub particle_color: [f32; 3],
    /// Point sprite half-size in clip space units.
    pub particle_size: f32,
    pub background_color: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Starting camera distance from the origin along +Z.
    pub camera_distance: f32,
    /// Pointer offset (pixels) to camera target scale.
    pub pointer_scale: f32,
    /// Exponential smoothing factor per frame.
    pub camera_smoothing: f32,
    /// Group rotation about Y per frame, radians.
    pub rotation_speed: f32,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
            bounds: DEFAULT_BOUNDS,
            max_speed: 1.0,
            link_distance: 200.0,
            max_connections: 3,
            primary_color: hex_rgb(0x9fef00),
            secondary_color: hex_rgb(0xa4b1cd),
            edge_opacity: 0.6,
            particle_color: hex_rgb(0x9fef00),
            particle_size: 0.006,
            background_color: hex_rgb(0x141d2b),
            fov_degrees: 75.0,
            camera_distance: 1000.0,
            pointer_scale: 0.05,
            camera_smoothing: 0.05,
            rotation_speed: 0.0005,
            seed: None,
        }
    }
}

/// Plain typewriter: separate typing and backspacing speeds and an
/// end-of-word dwell.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypewriterConfig {
    /// Identifier of the hosting element.
    pub target: String,
    pub strings: Vec<String>,
    pub typing_ms: u64,
    pub backspacing_ms: u64,
    pub dwell_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            target: "typewriter".into(),
            strings: vec![
                "Cybersecurity Researcher".into(),
                "Penetration Tester".into(),
                "CTF Player".into(),
            ],
            typing_ms: 100,
            backspacing_ms: 50,
            dwell_ms: 2000,
        }
    }
}

/// Terminal typewriter: one typing speed, fixed dwells.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerminalConfig {
    pub target: String,
    pub strings: Vec<String>,
    pub typing_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            target: "terminal".into(),
            strings: vec!["whoami".into(), "nmap -sV portfolio".into(), "cat about.txt".into()],
            typing_ms: 100,
        }
    }
}

/// One-shot hero line typed once after page load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeroConfig {
    pub target: String,
    pub text: String,
    pub start_delay_ms: u64,
    pub typing_ms: u64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            target: "hero".into(),
            text: "root@portfolio:~$".into(),
            start_delay_ms: 1000,
            typing_ms: 50,
        }
    }
}

/// Complete site configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Window title prefix.
    pub title: String,
    pub network: NetworkConfig,
    pub typewriters: Vec<TypewriterConfig>,
    pub terminals: Vec<TerminalConfig>,
    pub hero: Option<HeroConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "portfolio".into(),
            network: NetworkConfig::default(),
            typewriters: vec![TypewriterConfig::default()],
            terminals: vec![TerminalConfig::default()],
            hero: Some(HeroConfig::default()),
        }
    }
}

impl SiteConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the effects cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let net = &self.network;
        if net.particle_count == 0 {
            return Err(ConfigError::Invalid("network.particle_count must be > 0".into()));
        }
        if net.particle_count > MAX_PARTICLES {
            return Err(ConfigError::Invalid(format!(
                "network.particle_count must be <= {MAX_PARTICLES}"
            )));
        }
        if net.bounds <= 0.0 {
            return Err(ConfigError::Invalid("network.bounds must be > 0".into()));
        }
        if net.link_distance <= 0.0 {
            return Err(ConfigError::Invalid("network.link_distance must be > 0".into()));
        }
        if net.max_connections == 0 {
            return Err(ConfigError::Invalid("network.max_connections must be > 0".into()));
        }
        for tw in &self.typewriters {
            check_cycle(&tw.target, &tw.strings, tw.typing_ms)?;
        }
        for term in &self.terminals {
            check_cycle(&term.target, &term.strings, term.typing_ms)?;
        }
        if let Some(hero) = &self.hero {
            if hero.typing_ms == 0 {
                return Err(ConfigError::Invalid(format!("{}: typing_ms must be > 0", hero.target)));
            }
        }
        Ok(())
    }
}

fn check_cycle(target: &str, strings: &[String], typing_ms: u64) -> Result<(), ConfigError> {
    if strings.is_empty() {
        return Err(ConfigError::Invalid(format!("{target}: needs at least one string")));
    }
    if strings.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Invalid(format!("{target}: strings must not be empty")));
    }
    if typing_ms == 0 {
        return Err(ConfigError::Invalid(format!("{target}: typing_ms must be > 0")));
    }
    Ok(())
}
