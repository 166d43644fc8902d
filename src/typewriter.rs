//! Text-cycling effects.
//!
//! [`TextCycle`] types a string out one character per tick, dwells, erases
//! it one character per tick, dwells again and moves on to the next string,
//! forever. [`TypewriterEffect`] and [`TerminalTypewriterEffect`] are the two
//! configured flavours of it. [`TypeOnce`] types a single line and stops.
//!
//! Effects never touch the display directly. Each tick re-renders through a
//! [`TextSink`], keyed by the effect's target id, and the effect owns exactly
//! one [`Deferred`] slot so only one tick is pending at a time.
//!
//! ```ignore
//! let mut fx = TypewriterEffect::new(&TypewriterConfig::default());
//! let mut board = TextBoard::default();
//! fx.start(0);
//! fx.update(now_ms, &mut board);
//! ```

use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::config::{HeroConfig, TerminalConfig, TypewriterConfig};
use crate::timer::{Deferred, Millis};

/// Dwell on the empty string before typing the next one.
pub const EMPTY_DWELL_MS: Millis = 500;

/// Dwell on the full string for the terminal flavour.
pub const TERMINAL_FULL_DWELL_MS: Millis = 2000;

/// Upper bound on ticks run by a single `update` call.
///
/// A stalled frame (window hidden, debugger) would otherwise replay every
/// missed tick at once; past this the schedule restarts from `now`.
const MAX_CATCH_UP: usize = 64;

/// Where effects render their text.
pub trait TextSink {
    /// Replace the content shown for `target`.
    fn show(&mut self, target: &str, text: &str);
}

/// Records every render in order, ignoring the target.
impl TextSink for Vec<String> {
    fn show(&mut self, _target: &str, text: &str) {
        self.push(text.to_owned());
    }
}

/// Latest text per target, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBoard {
    slots: Vec<(String, String)>,
}

impl TextBoard {
    /// Current text for `target`, if it was ever shown.
    pub fn get(&self, target: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(t, _)| t == target)
            .map(|(_, text)| text.as_str())
    }

    /// All slots in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().map(|(t, text)| (t.as_str(), text.as_str()))
    }

    /// Non-empty texts joined with `sep`.
    pub fn join(&self, sep: &str) -> String {
        self.slots
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl TextSink for TextBoard {
    fn show(&mut self, target: &str, text: &str) {
        match self.slots.iter_mut().find(|(t, _)| t == target) {
            Some((_, slot)) => {
                slot.clear();
                slot.push_str(text);
            }
            None => self.slots.push((target.to_owned(), text.to_owned())),
        }
    }
}

/// Common driving surface for every text effect.
pub trait TextEffect {
    /// Identifier of the hosting element.
    fn target(&self) -> &str;

    /// Text currently displayed.
    fn text(&self) -> &str;

    /// Schedule the first tick relative to `now`.
    fn start(&mut self, now: Millis);

    /// Run every tick due at `now`, rendering each one into `sink`.
    ///
    /// Returns the number of ticks run.
    fn update(&mut self, now: Millis, sink: &mut dyn TextSink) -> usize;

    /// Cancel the pending tick. A disposed effect never ticks again.
    fn dispose(&mut self);

    /// Whether a tick is still pending.
    fn is_active(&self) -> bool;
}

/// Named phase of a [`TextCycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Growing the shown prefix by one character per tick.
    Typing,
    /// Holding the full string.
    PausingAtFull,
    /// Shrinking the shown prefix by one character per tick.
    Deleting,
    /// Holding the empty string before moving to the next one.
    PausingAtEmpty,
    /// Disposed, or constructed with nothing to show.
    Stopped,
}

/// Per-tick delays of a [`TextCycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTiming {
    pub typing_ms: Millis,
    pub deleting_ms: Millis,
    /// Delay before the tick that leaves the full string.
    pub full_dwell_ms: Millis,
    /// Delay before the tick that leaves the empty string.
    pub empty_dwell_ms: Millis,
}

/// The type-dwell-erase-dwell loop over a fixed list of strings.
#[derive(Debug, Clone)]
pub struct TextCycle {
    target: String,
    strings: Vec<String>,
    index: usize,
    /// Shown prefix length in chars.
    shown: usize,
    text: String,
    phase: CyclePhase,
    timing: CycleTiming,
    timer: Deferred,
}

impl TextCycle {
    /// Build a cycle. An empty list yields a stopped cycle that never ticks.
    pub fn new(target: impl Into<String>, strings: Vec<String>, timing: CycleTiming) -> Self {
        let target = target.into();
        let phase = if strings.is_empty() {
            warn!(id = %target, "text cycle has no strings; not starting");
            CyclePhase::Stopped
        } else {
            CyclePhase::Typing
        };
        Self {
            target,
            strings,
            index: 0,
            shown: 0,
            text: String::new(),
            phase,
            timing,
            timer: Deferred::idle(),
        }
    }

    #[inline]
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Index of the string currently being typed or erased.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The full string at the current index.
    pub fn current(&self) -> &str {
        self.strings.get(self.index).map(String::as_str).unwrap_or("")
    }

    #[inline]
    pub fn is_deleting(&self) -> bool {
        self.phase == CyclePhase::Deleting
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, CyclePhase::PausingAtFull | CyclePhase::PausingAtEmpty)
    }

    #[inline]
    pub fn timing(&self) -> CycleTiming {
        self.timing
    }

    /// Deadline of the pending tick.
    #[inline]
    pub fn next_tick(&self) -> Option<Millis> {
        self.timer.due()
    }

    /// Run one tick and return the delay before the next one.
    ///
    /// Returns `None` once stopped.
    pub fn tick(&mut self) -> Option<Millis> {
        let delay = match self.phase {
            CyclePhase::Typing => {
                let full = self.current().chars().count();
                if self.shown < full {
                    self.shown += 1;
                }
                if self.shown >= full {
                    self.phase = CyclePhase::PausingAtFull;
                    self.timing.full_dwell_ms
                } else {
                    self.timing.typing_ms
                }
            }
            CyclePhase::PausingAtFull => {
                self.phase = CyclePhase::Deleting;
                self.timing.deleting_ms
            }
            CyclePhase::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.phase = CyclePhase::PausingAtEmpty;
                    self.timing.empty_dwell_ms
                } else {
                    self.timing.deleting_ms
                }
            }
            CyclePhase::PausingAtEmpty => {
                self.index = (self.index + 1) % self.strings.len();
                self.phase = CyclePhase::Typing;
                self.timing.typing_ms
            }
            CyclePhase::Stopped => return None,
        };
        self.render_prefix();
        Some(delay)
    }

    fn render_prefix(&mut self) {
        let current = self.strings.get(self.index).map(String::as_str).unwrap_or("");
        let end = current
            .char_indices()
            .nth(self.shown)
            .map(|(i, _)| i)
            .unwrap_or(current.len());
        self.text.clear();
        self.text.push_str(&current[..end]);
    }
}

impl TextEffect for TextCycle {
    fn target(&self) -> &str {
        &self.target
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn start(&mut self, now: Millis) {
        if self.phase != CyclePhase::Stopped {
            self.timer.schedule(now, 0);
        }
    }

    fn update(&mut self, now: Millis, sink: &mut dyn TextSink) -> usize {
        let mut ran = 0;
        while let Some(due) = self.timer.fire(now) {
            let Some(delay) = self.tick() else { break };
            sink.show(&self.target, &self.text);
            ran += 1;
            if ran >= MAX_CATCH_UP {
                self.timer.schedule(now, delay);
                break;
            }
            self.timer.schedule(due, delay);
        }
        ran
    }

    fn dispose(&mut self) {
        if self.phase != CyclePhase::Stopped {
            debug!(id = %self.target, "text cycle disposed");
        }
        self.timer.cancel();
        self.phase = CyclePhase::Stopped;
    }

    fn is_active(&self) -> bool {
        self.timer.is_pending()
    }
}

/// Typewriter with configurable typing, backspacing and end-of-word dwell.
#[derive(Debug, Clone)]
pub struct TypewriterEffect {
    cycle: TextCycle,
}

impl TypewriterEffect {
    pub fn new(config: &TypewriterConfig) -> Self {
        let timing = CycleTiming {
            typing_ms: config.typing_ms,
            deleting_ms: config.backspacing_ms,
            full_dwell_ms: config.dwell_ms,
            empty_dwell_ms: EMPTY_DWELL_MS,
        };
        Self {
            cycle: TextCycle::new(config.target.clone(), config.strings.clone(), timing),
        }
    }
}

/// Terminal-style typewriter: one typing speed, fixed 2000 ms / 500 ms dwells.
///
/// Erases at half the typing delay.
#[derive(Debug, Clone)]
pub struct TerminalTypewriterEffect {
    cycle: TextCycle,
}

impl TerminalTypewriterEffect {
    pub fn new(config: &TerminalConfig) -> Self {
        let timing = CycleTiming {
            typing_ms: config.typing_ms,
            deleting_ms: (config.typing_ms / 2).max(1),
            full_dwell_ms: TERMINAL_FULL_DWELL_MS,
            empty_dwell_ms: EMPTY_DWELL_MS,
        };
        Self {
            cycle: TextCycle::new(config.target.clone(), config.strings.clone(), timing),
        }
    }
}

macro_rules! delegate_cycle {
    ($ty:ty) => {
        impl Deref for $ty {
            type Target = TextCycle;

            fn deref(&self) -> &TextCycle {
                &self.cycle
            }
        }

        impl DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut TextCycle {
                &mut self.cycle
            }
        }

        impl TextEffect for $ty {
            fn target(&self) -> &str {
                self.cycle.target()
            }

            fn text(&self) -> &str {
                self.cycle.text()
            }

            fn start(&mut self, now: Millis) {
                self.cycle.start(now)
            }

            fn update(&mut self, now: Millis, sink: &mut dyn TextSink) -> usize {
                self.cycle.update(now, sink)
            }

            fn dispose(&mut self) {
                self.cycle.dispose()
            }

            fn is_active(&self) -> bool {
                self.cycle.is_active()
            }
        }
    };
}

delegate_cycle!(TypewriterEffect);
delegate_cycle!(TerminalTypewriterEffect);

/// Phase of a [`TypeOnce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOncePhase {
    /// Waiting out the start delay.
    Waiting,
    Typing,
    /// Fully typed, or disposed.
    Done,
}

/// Types one line after a start delay, then stops.
#[derive(Debug, Clone)]
pub struct TypeOnce {
    target: String,
    line: String,
    shown: usize,
    text: String,
    phase: TypeOncePhase,
    start_delay_ms: Millis,
    typing_ms: Millis,
    timer: Deferred,
}

impl TypeOnce {
    pub fn new(config: &HeroConfig) -> Self {
        Self {
            target: config.target.clone(),
            line: config.text.clone(),
            shown: 0,
            text: String::new(),
            phase: TypeOncePhase::Waiting,
            start_delay_ms: config.start_delay_ms,
            typing_ms: config.typing_ms,
            timer: Deferred::idle(),
        }
    }

    #[inline]
    pub fn phase(&self) -> TypeOncePhase {
        self.phase
    }

    fn tick(&mut self) -> Option<Millis> {
        match self.phase {
            TypeOncePhase::Waiting => {
                self.text.clear();
                self.phase = TypeOncePhase::Typing;
                if self.line.is_empty() {
                    self.phase = TypeOncePhase::Done;
                    return None;
                }
                Some(self.typing_ms)
            }
            TypeOncePhase::Typing => {
                if let Some(c) = self.line.chars().nth(self.shown) {
                    self.text.push(c);
                    self.shown += 1;
                }
                if self.shown >= self.line.chars().count() {
                    self.phase = TypeOncePhase::Done;
                    None
                } else {
                    Some(self.typing_ms)
                }
            }
            TypeOncePhase::Done => None,
        }
    }
}

impl TextEffect for TypeOnce {
    fn target(&self) -> &str {
        &self.target
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn start(&mut self, now: Millis) {
        if self.phase == TypeOncePhase::Waiting {
            self.timer.schedule(now, self.start_delay_ms);
        }
    }

    fn update(&mut self, now: Millis, sink: &mut dyn TextSink) -> usize {
        let mut ran = 0;
        while let Some(due) = self.timer.fire(now) {
            let next = self.tick();
            sink.show(&self.target, &self.text);
            ran += 1;
            match next {
                Some(delay) => self.timer.schedule(due, delay),
                None => break,
            }
        }
        ran
    }

    fn dispose(&mut self) {
        self.timer.cancel();
        self.phase = TypeOncePhase::Done;
    }

    fn is_active(&self) -> bool {
        self.timer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(strings: &[&str], timing: CycleTiming) -> TextCycle {
        TextCycle::new("t", strings.iter().map(|s| s.to_string()).collect(), timing)
    }

    fn timing(typing: Millis, deleting: Millis, dwell: Millis) -> CycleTiming {
        CycleTiming {
            typing_ms: typing,
            deleting_ms: deleting,
            full_dwell_ms: dwell,
            empty_dwell_ms: EMPTY_DWELL_MS,
        }
    }

    #[test]
    fn test_text_board_keeps_latest_per_target() {
        let mut board = TextBoard::default();
        board.show("a", "one");
        board.show("b", "two");
        board.show("a", "three");
        assert_eq!(board.get("a"), Some("three"));
        assert_eq!(board.get("b"), Some("two"));
        assert_eq!(board.get("c"), None);
        assert_eq!(board.join(" | "), "three | two");
    }

    #[test]
    fn test_tick_sequence_for_two_short_strings() {
        let mut c = cycle(&["ab", "cd"], timing(10, 5, 0));
        let mut shown = Vec::new();
        for _ in 0..8 {
            c.tick();
            shown.push(c.text().to_owned());
        }
        assert_eq!(shown, ["a", "ab", "ab", "a", "", "", "c", "cd"]);
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn test_only_one_flag_at_a_time() {
        let mut c = cycle(&["abc", "de"], timing(10, 5, 100));
        for _ in 0..50 {
            c.tick();
            assert!(!(c.is_deleting() && c.is_waiting()));
        }
    }

    #[test]
    fn test_length_changes_by_one_while_typing_or_deleting() {
        let mut c = cycle(&["hello", "yo"], timing(10, 5, 100));
        let mut prev = 0;
        for _ in 0..60 {
            let phase = c.phase();
            c.tick();
            let len = c.text().chars().count();
            match phase {
                CyclePhase::Typing => assert_eq!(len, prev + 1),
                CyclePhase::Deleting => assert_eq!(len + 1, prev),
                _ => assert_eq!(len, prev),
            }
            prev = len;
        }
    }

    #[test]
    fn test_multibyte_chars_are_typed_whole() {
        let mut c = cycle(&["héé"], timing(10, 5, 0));
        c.tick();
        c.tick();
        assert_eq!(c.text(), "hé");
    }

    #[test]
    fn test_empty_list_never_ticks() {
        let mut c = cycle(&[], timing(10, 5, 0));
        assert_eq!(c.phase(), CyclePhase::Stopped);
        c.start(0);
        assert!(!c.is_active());
        let mut out: Vec<String> = Vec::new();
        assert_eq!(c.update(10_000, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_dispose_cancels_pending_tick() {
        let mut c = cycle(&["abc"], timing(10, 5, 0));
        let mut out: Vec<String> = Vec::new();
        c.start(0);
        c.update(0, &mut out);
        assert!(c.is_active());

        c.dispose();
        assert!(!c.is_active());
        assert_eq!(c.phase(), CyclePhase::Stopped);
        assert_eq!(c.update(10_000, &mut out), 0);
        assert_eq!(out, ["a"]);
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let mut c = cycle(&["abcdefgh"], timing(1, 1, 0));
        let mut out: Vec<String> = Vec::new();
        c.start(0);
        let ran = c.update(1_000_000, &mut out);
        assert_eq!(ran, MAX_CATCH_UP);
        assert!(c.next_tick().unwrap() > 1_000_000);
    }

    #[test]
    fn test_terminal_timing_constants() {
        let fx = TerminalTypewriterEffect::new(&TerminalConfig {
            target: "term".into(),
            strings: vec!["ls".into()],
            typing_ms: 80,
        });
        let t = fx.timing();
        assert_eq!(t.typing_ms, 80);
        assert_eq!(t.deleting_ms, 40);
        assert_eq!(t.full_dwell_ms, 2000);
        assert_eq!(t.empty_dwell_ms, 500);
    }

    #[test]
    fn test_type_once_waits_then_types_and_stops() {
        let mut hero = TypeOnce::new(&HeroConfig {
            target: "hero".into(),
            text: "hi!".into(),
            start_delay_ms: 1000,
            typing_ms: 50,
        });
        let mut out: Vec<String> = Vec::new();
        hero.start(0);

        assert_eq!(hero.update(999, &mut out), 0);
        assert_eq!(hero.update(1000, &mut out), 1);
        assert_eq!(hero.phase(), TypeOncePhase::Typing);
        assert_eq!(hero.text(), "");

        hero.update(1150, &mut out);
        assert_eq!(out, ["", "h", "hi", "hi!"]);
        assert_eq!(hero.phase(), TypeOncePhase::Done);
        assert!(!hero.is_active());
    }
}
