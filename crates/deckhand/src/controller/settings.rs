use std::time::Duration;

use eframe::egui::Color32;

use crate::theme::CONFETTI_PALETTE;

/// Fixed parameters of a presentation session. Nothing here changes after
/// the controller is built.
#[derive(Debug, Clone)]
pub struct Settings {
    pub total_slides: usize,
    /// Minimum horizontal travel for a touch to count as a swipe (inclusive).
    pub min_swipe_distance: f32,
    /// Delay between requesting a transition and committing it.
    pub settle_delay: Duration,
    /// Length of the slide hand-off animation.
    pub transition_duration: Duration,
    pub hint_delay: Duration,
    pub hint_fade: Duration,
    pub double_tap_window: Duration,
    pub navigating_cue: Duration,
    /// Extra grace after the settle delay before a stuck transition is forced
    /// to commit. `None` disables the watchdog.
    pub watchdog: Option<Duration>,
    pub confetti: ConfettiSettings,
    pub chrome: ChromeLayout,
}

impl Settings {
    pub fn new(total_slides: usize) -> Self {
        Self {
            total_slides: total_slides.max(1),
            min_swipe_distance: 50.0,
            settle_delay: Duration::from_millis(600),
            transition_duration: Duration::from_millis(600),
            hint_delay: Duration::from_millis(5000),
            hint_fade: Duration::from_millis(300),
            double_tap_window: Duration::from_millis(300),
            navigating_cue: Duration::from_millis(200),
            watchdog: None,
            confetti: ConfettiSettings::default(),
            chrome: ChromeLayout::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfettiSettings {
    pub count: usize,
    pub stagger: Duration,
    pub min_lifetime: Duration,
    pub max_lifetime: Duration,
    pub palette: Vec<Color32>,
}

impl Default for ConfettiSettings {
    fn default() -> Self {
        Self {
            count: 50,
            stagger: Duration::from_millis(100),
            min_lifetime: Duration::from_millis(3000),
            max_lifetime: Duration::from_millis(5000),
            palette: CONFETTI_PALETTE.to_vec(),
        }
    }
}

/// Which optional display elements exist. Absent elements are skipped
/// silently when the display is refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeLayout {
    pub counter: bool,
    pub progress: bool,
    pub arrows: bool,
    pub hint: bool,
}

impl Default for ChromeLayout {
    fn default() -> Self {
        Self {
            counter: true,
            progress: true,
            arrows: true,
            hint: true,
        }
    }
}
