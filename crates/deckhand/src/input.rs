//! Translation of raw input into navigation commands, plus the
//! environment-level interception that keeps the window from scrolling,
//! zooming or opening menus underneath the presentation.

use std::collections::HashSet;
use std::time::Duration;

use eframe::egui;

use crate::controller::Command;

/// Keys the presentation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    PageUp,
    PageDown,
    Home,
    End,
    Escape,
    Enter,
}

impl Key {
    pub fn from_egui(key: egui::Key) -> Option<Self> {
        match key {
            egui::Key::ArrowLeft => Some(Self::ArrowLeft),
            egui::Key::ArrowRight => Some(Self::ArrowRight),
            egui::Key::Space => Some(Self::Space),
            egui::Key::PageUp => Some(Self::PageUp),
            egui::Key::PageDown => Some(Self::PageDown),
            egui::Key::Home => Some(Self::Home),
            egui::Key::End => Some(Self::End),
            egui::Key::Escape => Some(Self::Escape),
            egui::Key::Enter => Some(Self::Enter),
            _ => None,
        }
    }

    /// Keys that light up the navigating cue while held down.
    pub fn shows_navigating_cue(self) -> bool {
        matches!(
            self,
            Self::ArrowLeft | Self::ArrowRight | Self::Space | Self::PageUp | Self::PageDown
        )
    }

    /// Keys that activate a focused arrow.
    pub fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Navigation command bound to `key`, if any.
pub fn key_command(key: Key) -> Option<Command> {
    match key {
        Key::ArrowRight | Key::Space | Key::PageDown => Some(Command::Advance),
        Key::ArrowLeft | Key::PageUp => Some(Command::Retreat),
        Key::Home | Key::Escape => Some(Command::JumpToFirst),
        Key::End => Some(Command::JumpToLast),
        Key::Enter => None,
    }
}

/// Classify a horizontal swipe by `start_x - end_x`. The threshold is inclusive.
pub fn classify_swipe(delta: f32, min_distance: f32) -> Option<Command> {
    if delta.abs() < min_distance {
        None
    } else if delta > 0.0 {
        Some(Command::Advance)
    } else {
        Some(Command::Retreat)
    }
}

/// Remembers where the current touch started and classifies it when it ends.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start_x: f32,
    end_x: f32,
    min_distance: f32,
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            start_x: 0.0,
            end_x: 0.0,
            min_distance,
        }
    }

    pub fn begin(&mut self, x: f32) {
        self.start_x = x;
    }

    pub fn finish(&mut self, x: f32) -> Option<Command> {
        self.end_x = x;
        let delta = self.start_x - self.end_x;
        classify_swipe(delta, self.min_distance)
    }
}

/// Flags the second of two touch ends that land within the window.
#[derive(Debug, Clone)]
pub struct DoubleTapGuard {
    window: Duration,
    last_end: Option<Duration>,
}

impl DoubleTapGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_end: None,
        }
    }

    /// Record a touch end; true if its default action should be suppressed.
    pub fn touch_end(&mut self, now: Duration) -> bool {
        let suppress = self
            .last_end
            .is_some_and(|last| now.saturating_sub(last) <= self.window);
        self.last_end = Some(now);
        suppress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    Keep,
    Drop,
}

/// What the controller gets to see from one raw event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    KeyDown(Key),
    TouchStart { id: u64, x: f32 },
    TouchEnd { id: u64, x: f32 },
    TouchCancel { id: u64 },
}

/// Contacts currently down, in the order they landed. Only the first one
/// sets the swipe origin.
#[derive(Debug, Clone, Default)]
pub struct Contacts {
    down: Vec<u64>,
}

impl Contacts {
    /// Record a new contact. True if it is the only one down.
    pub fn press(&mut self, id: u64) -> bool {
        if !self.down.contains(&id) {
            self.down.push(id);
        }
        self.down.len() == 1
    }

    pub fn release(&mut self, id: u64) {
        self.down.retain(|&d| d != id);
    }
}

/// Environment-level suppression of default behaviour. This runs on the
/// raw input before any widget sees it and knows nothing about slides.
#[derive(Debug, Clone)]
pub struct InputGuard {
    double_tap: DoubleTapGuard,
    contacts: HashSet<u64>,
}

impl InputGuard {
    pub fn new(double_tap_window: Duration) -> Self {
        Self {
            double_tap: DoubleTapGuard::new(double_tap_window),
            contacts: HashSet::new(),
        }
    }

    /// A second simultaneous contact would start a pinch zoom.
    pub fn touch_start(&mut self, id: u64) -> Intercept {
        self.contacts.insert(id);
        if self.contacts.len() > 1 {
            Intercept::Drop
        } else {
            Intercept::Keep
        }
    }

    pub fn touch_end(&mut self, id: u64, now: Duration) -> Intercept {
        self.contacts.remove(&id);
        if self.double_tap.touch_end(now) {
            Intercept::Drop
        } else {
            Intercept::Keep
        }
    }

    pub fn touch_cancel(&mut self, id: u64) {
        self.contacts.remove(&id);
    }

    pub fn intercept(&mut self, event: &egui::Event, now: Duration) -> Intercept {
        match event {
            egui::Event::MouseWheel { .. } | egui::Event::Zoom(_) => Intercept::Drop,
            egui::Event::PointerButton {
                button: egui::PointerButton::Secondary,
                ..
            } => Intercept::Drop,
            egui::Event::Key { key, .. } if Key::from_egui(*key).is_some() => Intercept::Drop,
            egui::Event::Text(text) if text == " " => Intercept::Drop,
            egui::Event::Touch { id, phase, .. } => match phase {
                egui::TouchPhase::Start => self.touch_start(id.0),
                egui::TouchPhase::End => self.touch_end(id.0, now),
                egui::TouchPhase::Cancel => {
                    self.touch_cancel(id.0);
                    Intercept::Keep
                }
                egui::TouchPhase::Move => Intercept::Keep,
            },
            _ => Intercept::Keep,
        }
    }

    /// Strip suppressed events from a frame's raw input.
    pub fn filter(&mut self, events: &mut Vec<egui::Event>, now: Duration) {
        events.retain(|event| self.intercept(event, now) == Intercept::Keep);
    }
}

/// Gestures the controller cares about in one frame's raw events. Call this
/// before `InputGuard::filter`: suppressing a default action does not hide
/// the event from the presentation.
pub fn collect_gestures(events: &[egui::Event]) -> Vec<Gesture> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                ..
            } => Key::from_egui(*key).map(Gesture::KeyDown),
            egui::Event::Touch { id, phase, pos, .. } => match phase {
                egui::TouchPhase::Start => Some(Gesture::TouchStart { id: id.0, x: pos.x }),
                egui::TouchPhase::End => Some(Gesture::TouchEnd { id: id.0, x: pos.x }),
                egui::TouchPhase::Cancel => Some(Gesture::TouchCancel { id: id.0 }),
                egui::TouchPhase::Move => None,
            },
            _ => None,
        })
        .collect()
}
