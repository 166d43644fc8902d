//! Text shown over the network: typewriter effects and form banners.
//!
//! The native window has no DOM, so every effect renders into a shared
//! [`TextBoard`] and the overlay folds the board and the visible banners
//! into a single caption line.

use crate::config::SiteConfig;
use crate::contact::{BannerKind, BannerStack, BannerStage, ContactForm};
use crate::timer::Millis;
use crate::typewriter::{
    TerminalTypewriterEffect, TextBoard, TextEffect, TypeOnce, TypewriterEffect,
};

/// Separator between caption segments.
const SEPARATOR: &str = " | ";

/// All text effects plus the banner stack, driven from one clock.
#[derive(Default)]
pub struct Overlay {
    effects: Vec<Box<dyn TextEffect>>,
    board: TextBoard,
    banners: BannerStack,
    started: Option<Millis>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every effect a site config declares, hero line first.
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut overlay = Self::new();
        if let Some(hero) = &config.hero {
            overlay.push(Box::new(TypeOnce::new(hero)));
        }
        for tw in &config.typewriters {
            overlay.push(Box::new(TypewriterEffect::new(tw)));
        }
        for term in &config.terminals {
            overlay.push(Box::new(TerminalTypewriterEffect::new(term)));
        }
        overlay
    }

    /// Add an effect. Effects added after [`start`](Self::start) begin at
    /// the start time.
    pub fn push(&mut self, mut effect: Box<dyn TextEffect>) {
        if let Some(at) = self.started {
            effect.start(at);
        }
        self.effects.push(effect);
    }

    /// Start every effect at `now`.
    pub fn start(&mut self, now: Millis) {
        if self.started.is_some() {
            return;
        }
        self.started = Some(now);
        for effect in &mut self.effects {
            effect.start(now);
        }
        tracing::debug!(effects = self.effects.len(), now, "overlay started");
    }

    /// Submit `form` and show the resulting banner from `now`.
    pub fn submit(&mut self, form: &mut ContactForm, now: Millis) -> BannerKind {
        let banner = form.submit();
        let kind = banner.kind;
        self.banners.push(banner, now);
        kind
    }

    /// Run every due tick and expire banners.
    ///
    /// Returns `true` when the caption may have changed.
    pub fn update(&mut self, now: Millis) -> bool {
        let mut ticks = 0;
        for effect in &mut self.effects {
            ticks += effect.update(now, &mut self.board);
        }
        let before = self.banner_state();
        self.banners.update(now);
        ticks > 0 || self.banner_state() != before
    }

    /// Banner count and how many of them are still fully visible.
    fn banner_state(&self) -> (usize, usize) {
        let visible = self
            .banners
            .iter()
            .filter(|(_, stage)| *stage == BannerStage::Visible)
            .count();
        (self.banners.len(), visible)
    }

    /// Board texts followed by visible banners.
    pub fn caption(&self) -> String {
        let mut parts = Vec::new();
        let text = self.board.join(SEPARATOR);
        if !text.is_empty() {
            parts.push(text);
        }
        for (banner, stage) in self.banners.iter() {
            if stage == BannerStage::Visible {
                parts.push(format!("{} {}", banner.title, banner.body));
            }
        }
        parts.join(SEPARATOR)
    }

    /// Cancel every pending tick.
    pub fn dispose(&mut self) {
        for effect in &mut self.effects {
            effect.dispose();
        }
    }

    /// Whether any effect still has a pending tick.
    pub fn is_active(&self) -> bool {
        self.effects.iter().any(|e| e.is_active())
    }

    #[inline]
    pub fn board(&self) -> &TextBoard {
        &self.board
    }

    #[inline]
    pub fn banners(&self) -> &BannerStack {
        &self.banners
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TerminalConfig, TypewriterConfig};
    use crate::contact::{BANNER_LEAVE_MS, BANNER_VISIBLE_MS};

    fn two_effects() -> Overlay {
        let mut overlay = Overlay::new();
        overlay.push(Box::new(TypewriterEffect::new(&TypewriterConfig {
            target: "role".into(),
            strings: vec!["ab".into()],
            typing_ms: 10,
            backspacing_ms: 5,
            dwell_ms: 100,
        })));
        overlay.push(Box::new(TerminalTypewriterEffect::new(&TerminalConfig {
            target: "shell".into(),
            strings: vec!["ls".into()],
            typing_ms: 10,
        })));
        overlay
    }

    #[test]
    fn test_from_config_builds_all_effects() {
        // Hero line, one typewriter, one terminal.
        let overlay = Overlay::from_config(&SiteConfig::default());
        assert_eq!(overlay.len(), 3);
        assert!(!overlay.is_active());
    }

    #[test]
    fn test_caption_joins_targets() {
        let mut overlay = two_effects();
        overlay.start(0);
        assert!(overlay.update(0));
        assert_eq!(overlay.caption(), "a | l");
        assert!(overlay.update(10));
        assert_eq!(overlay.caption(), "ab | ls");
        assert!(!overlay.update(15));
    }

    #[test]
    fn test_late_push_starts_at_start_time() {
        let mut overlay = Overlay::new();
        overlay.start(100);
        overlay.push(Box::new(TerminalTypewriterEffect::new(&TerminalConfig {
            target: "shell".into(),
            strings: vec!["x".into()],
            typing_ms: 10,
        })));
        assert!(overlay.is_active());
        overlay.update(100);
        assert_eq!(overlay.board().get("shell"), Some("x"));
    }

    #[test]
    fn test_banner_shows_then_expires() {
        let mut overlay = Overlay::new();
        let mut form = ContactForm::new("Ada", "ada@example.com", "hi");
        assert_eq!(overlay.submit(&mut form, 0), BannerKind::Success);
        assert!(overlay.caption().starts_with("[SUCCESS] Message Sent!"));

        assert!(overlay.update(BANNER_VISIBLE_MS));
        assert_eq!(overlay.caption(), "");
        assert_eq!(overlay.banners().len(), 1);

        assert!(overlay.update(BANNER_VISIBLE_MS + BANNER_LEAVE_MS));
        assert!(overlay.banners().is_empty());
    }

    #[test]
    fn test_dispose_stops_everything() {
        let mut overlay = two_effects();
        overlay.start(0);
        overlay.update(0);
        overlay.dispose();
        assert!(!overlay.is_active());
        assert!(!overlay.update(10_000));
        assert_eq!(overlay.caption(), "a | l");
    }
}
