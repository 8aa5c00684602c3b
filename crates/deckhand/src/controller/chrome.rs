use std::fmt;
use std::time::Duration;

use super::settings::ChromeLayout;

/// Current-position and total-count readouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub current: usize,
    pub total: usize,
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.total)
    }
}

/// Progress fill, as a percentage of its track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFill {
    pub percent: f32,
}

impl ProgressFill {
    pub fn fraction(&self) -> f32 {
        self.percent / 100.0
    }
}

/// A previous/next arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub enabled: bool,
}

impl Affordance {
    pub const DIMMED_OPACITY: f32 = 0.3;
    pub const OPACITY: f32 = 0.7;

    pub fn opacity(&self) -> f32 {
        if self.enabled {
            Self::OPACITY
        } else {
            Self::DIMMED_OPACITY
        }
    }

    /// Disabled arrows ignore the pointer entirely.
    pub fn accepts_pointer(&self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Shown,
    Fading { since: Duration },
    Removed,
}

/// Everything drawn around the slides: readouts, progress, arrows, the
/// onboarding hint and the keyboard navigating cue.
#[derive(Debug, Clone)]
pub struct Chrome {
    counter: Option<Counter>,
    progress: Option<ProgressFill>,
    prev: Option<Affordance>,
    next: Option<Affordance>,
    hint: Option<Hint>,
    navigating: bool,
}

impl Chrome {
    pub fn new(layout: ChromeLayout, current: usize, total: usize) -> Self {
        let mut chrome = Self {
            counter: layout.counter.then_some(Counter { current, total }),
            progress: layout.progress.then_some(ProgressFill { percent: 0.0 }),
            prev: layout.arrows.then_some(Affordance { enabled: true }),
            next: layout.arrows.then_some(Affordance { enabled: true }),
            hint: layout.hint.then_some(Hint::Shown),
            navigating: false,
        };
        chrome.sync(current, total);
        chrome
    }

    /// Refresh readouts, progress and arrow enablement for `current` of `total`.
    pub fn sync(&mut self, current: usize, total: usize) {
        if let Some(counter) = self.counter.as_mut() {
            *counter = Counter { current, total };
        }
        if let Some(progress) = self.progress.as_mut() {
            progress.percent = current as f32 / total as f32 * 100.0;
        }
        if let Some(prev) = self.prev.as_mut() {
            prev.enabled = current != 1;
        }
        if let Some(next) = self.next.as_mut() {
            next.enabled = current != total;
        }
    }

    pub fn counter(&self) -> Option<Counter> {
        self.counter
    }

    pub fn progress(&self) -> Option<ProgressFill> {
        self.progress
    }

    pub fn prev(&self) -> Option<Affordance> {
        self.prev
    }

    pub fn next(&self) -> Option<Affordance> {
        self.next
    }

    pub fn hint(&self) -> Option<Hint> {
        self.hint
    }

    pub fn fade_hint(&mut self, now: Duration) {
        if self.hint == Some(Hint::Shown) {
            self.hint = Some(Hint::Fading { since: now });
        }
    }

    pub fn remove_hint(&mut self) {
        if let Some(hint) = self.hint.as_mut() {
            *hint = Hint::Removed;
        }
    }

    /// Hint opacity at `now`, `None` once it is removed or absent.
    pub fn hint_opacity(&self, now: Duration, fade: Duration) -> Option<f32> {
        match self.hint? {
            Hint::Shown => Some(1.0),
            Hint::Fading { since } => {
                let total = fade.as_secs_f32();
                if total <= 0.0 {
                    return Some(0.0);
                }
                let t = now.saturating_sub(since).as_secs_f32() / total;
                Some((1.0 - t).clamp(0.0, 1.0))
            }
            Hint::Removed => None,
        }
    }

    pub fn navigating(&self) -> bool {
        self.navigating
    }

    pub fn set_navigating(&mut self, on: bool) {
        self.navigating = on;
    }
}
