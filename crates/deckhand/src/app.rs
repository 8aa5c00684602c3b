use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::controller::chrome::Hint;
use crate::controller::{NavigationController, Settings};
use crate::deck::Deck;
use crate::input::{self, Contacts, Gesture, InputGuard};
use crate::render;
use crate::render::chrome::Side;
use crate::theme::Theme;

/// How the presentation was asked to start.
pub struct Launch {
    pub file: Option<PathBuf>,
    pub slides: usize,
    pub windowed: bool,
    pub hint: bool,
}

struct PresentationApp {
    deck: Deck,
    controller: NavigationController,
    guard: InputGuard,
    contacts: Contacts,
    theme: Theme,
    clock: Instant,
    /// Gestures captured from raw input, waiting for the next update.
    gestures: Vec<Gesture>,
}

impl PresentationApp {
    fn new(deck: Deck, theme: Theme, hint: bool) -> Self {
        let mut settings = Settings::new(deck.len());
        settings.chrome.hint = hint;
        let guard = InputGuard::new(settings.double_tap_window);

        let clock = Instant::now();
        let controller = NavigationController::new(settings, Duration::ZERO);
        Self {
            deck,
            controller,
            guard,
            contacts: Contacts::default(),
            theme,
            clock,
            gestures: Vec::new(),
        }
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Click or keyboard activation of an edge arrow.
    fn activate(&mut self, side: Side, now: Duration) {
        if self.controller.is_transitioning() {
            return;
        }
        match side {
            Side::Prev => self.controller.retreat(now),
            Side::Next => self.controller.advance(now),
        };
    }

    fn focused_arrow(ctx: &egui::Context) -> Option<Side> {
        ctx.memory(|m| {
            [Side::Prev, Side::Next]
                .into_iter()
                .find(|side| m.has_focus(side.id()))
        })
    }

    /// Take gestures out of a frame's raw events, then strip the events whose
    /// default action is suppressed. The presentation still sees every
    /// gesture the guard drops.
    fn capture(&mut self, events: &mut Vec<egui::Event>, now: Duration) {
        self.gestures.extend(input::collect_gestures(events));
        self.guard.filter(events, now);
    }

    /// Route pending gestures. `focused` is the arrow holding keyboard focus.
    fn dispatch(&mut self, focused: Option<Side>, now: Duration) {
        for gesture in std::mem::take(&mut self.gestures) {
            match gesture {
                Gesture::KeyDown(key) => {
                    if let Some(side) = focused.filter(|_| key.activates()) {
                        self.activate(side, now);
                    }
                    self.controller.press_key(key, now);
                }
                Gesture::TouchStart { id, x } => {
                    if self.contacts.press(id) {
                        self.controller.touch_start(x);
                    }
                }
                Gesture::TouchCancel { id } => self.contacts.release(id),
                Gesture::TouchEnd { id, x } => {
                    self.contacts.release(id);
                    if let Some(command) = self.controller.touch_end(x, now) {
                        tracing::debug!(?command, "swipe");
                    }
                }
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Duration) {
        let chrome = self.controller.chrome();
        let hint_fading = matches!(chrome.hint(), Some(Hint::Fading { .. }));
        if self.controller.stage().is_animating(now)
            || !self.controller.particles().is_empty()
            || hint_fading
        {
            ctx.request_repaint();
        } else if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_sub(now));
        }
    }

    fn draw(&mut self, ui: &egui::Ui, rect: egui::Rect, now: Duration) {
        let scale = render::compute_scale(rect);

        for (position, pose) in self.controller.stage().visible(now) {
            if let Some(slide) = self.deck.slide(position) {
                render::render_slide(ui, slide, &self.theme, rect, pose, scale);
            }
        }

        let chrome = self.controller.chrome().clone();
        if let Some(progress) = chrome.progress() {
            let navigating = chrome.navigating();
            render::chrome::draw_progress(ui, progress, navigating, &self.theme, rect, scale);
        }
        if let Some(counter) = chrome.counter() {
            render::chrome::draw_counter(ui, counter, &self.theme, rect, scale);
        }
        for (side, affordance) in [(Side::Prev, chrome.prev()), (Side::Next, chrome.next())] {
            let Some(affordance) = affordance else {
                continue;
            };
            let response =
                render::chrome::draw_arrow(ui, side, affordance, &self.theme, rect, scale);
            if response.clicked() {
                self.activate(side, now);
            }
        }
        let fade = self.controller.settings().hint_fade;
        if let Some(opacity) = chrome.hint_opacity(now, fade) {
            render::chrome::draw_hint(ui, opacity, &self.theme, rect, scale);
        }

        render::confetti::draw_particles(ui, self.controller.particles(), now, rect, scale);
    }
}

impl eframe::App for PresentationApp {
    fn raw_input_hook(&mut self, _ctx: &egui::Context, raw_input: &mut egui::RawInput) {
        let now = self.now();
        self.capture(&mut raw_input.events, now);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.now();
        self.controller.tick(now);
        let focused = Self::focused_arrow(ctx);
        self.dispatch(focused, now);

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                self.draw(ui, rect, now);
            });

        self.schedule_repaint(ctx, now);
    }
}

pub fn run(launch: Launch) -> anyhow::Result<()> {
    let deck = match &launch.file {
        Some(file) => Deck::load(file)?,
        None => Deck::builtin(launch.slides),
    };

    let config = Config::load_or_default();
    let windowed = launch.windowed || config.windowed();
    let hint = launch.hint && config.hint();
    let theme = Theme::from_name(config.theme());

    let title = deck.title.clone().unwrap_or_else(|| match &launch.file {
        Some(file) => format!(
            "deckhand - {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "deckhand".to_string(),
    });

    tracing::info!(slides = deck.len(), windowed, theme = %theme.name, "starting presentation");

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PresentationApp::new(deck, theme, hint)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn app(slides: usize) -> PresentationApp {
        PresentationApp::new(Deck::builtin(slides), Theme::dark(), false)
    }

    /// Feed gestures, dispatch them and let the settle delay pass.
    fn press(app: &mut PresentationApp, key: Key, focused: Option<Side>, now: &mut Duration) {
        app.gestures.push(Gesture::KeyDown(key));
        app.dispatch(focused, *now);
        *now += app.controller.settings().settle_delay;
        app.controller.tick(*now);
    }

    fn touch(id: u64, phase: egui::TouchPhase, x: f32) -> egui::Event {
        egui::Event::Touch {
            device_id: egui::TouchDeviceId(0),
            id: egui::TouchId(id),
            phase,
            pos: egui::pos2(x, 400.0),
            force: None,
        }
    }

    #[test]
    fn test_enter_on_focused_prev_retreats() {
        let mut app = app(5);
        let mut now = ms(0);
        app.controller.jump_to(3, now);
        now += ms(600);
        app.controller.tick(now);

        press(&mut app, Key::Enter, Some(Side::Prev), &mut now);
        assert_eq!(app.controller.current(), 2);
    }

    #[test]
    fn test_space_on_focused_next_advances_once() {
        let mut app = app(5);
        let mut now = ms(0);
        press(&mut app, Key::Space, Some(Side::Next), &mut now);
        assert_eq!(app.controller.current(), 2);
        assert!(!app.controller.is_transitioning());
    }

    #[test]
    fn test_enter_without_focus_does_nothing() {
        let mut app = app(5);
        let mut now = ms(0);
        press(&mut app, Key::Enter, None, &mut now);
        assert_eq!(app.controller.current(), 1);
        assert!(!app.controller.is_transitioning());
    }

    #[test]
    fn test_arrow_click_ignored_mid_transition() {
        let mut app = app(5);
        app.controller.advance(ms(0));
        app.activate(Side::Next, ms(100));
        app.controller.tick(ms(600));
        assert_eq!(app.controller.current(), 2);
        app.controller.tick(ms(1200));
        assert_eq!(app.controller.current(), 2);
        assert!(!app.controller.is_transitioning());
    }

    #[test]
    fn test_focused_arrow_from_memory() {
        let ctx = egui::Context::default();
        assert_eq!(PresentationApp::focused_arrow(&ctx), None);
        ctx.memory_mut(|m| m.request_focus(Side::Prev.id()));
        assert_eq!(PresentationApp::focused_arrow(&ctx), Some(Side::Prev));
    }

    #[test]
    fn test_double_tap_end_is_dropped_but_still_swipes() {
        let mut app = app(5);
        let mut events = vec![
            touch(1, egui::TouchPhase::Start, 300.0),
            touch(1, egui::TouchPhase::End, 300.0),
        ];
        app.capture(&mut events, ms(1000));
        app.dispatch(None, ms(1000));
        assert!(!app.controller.is_transitioning());

        let mut events = vec![
            touch(2, egui::TouchPhase::Start, 300.0),
            touch(2, egui::TouchPhase::End, 200.0),
        ];
        app.capture(&mut events, ms(1200));
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            egui::Event::Touch {
                phase: egui::TouchPhase::Start,
                ..
            }
        ));
        assert_eq!(
            app.gestures.last(),
            Some(&Gesture::TouchEnd { id: 2, x: 200.0 })
        );

        app.dispatch(None, ms(1200));
        assert!(app.controller.is_transitioning());
        app.controller.tick(ms(1800));
        assert_eq!(app.controller.current(), 2);
    }

    #[test]
    fn test_second_contact_keeps_swipe_origin() {
        let mut app = app(5);
        let mut events = vec![
            touch(1, egui::TouchPhase::Start, 300.0),
            touch(2, egui::TouchPhase::Start, 10.0),
            touch(2, egui::TouchPhase::End, 200.0),
        ];
        app.capture(&mut events, ms(0));
        app.dispatch(None, ms(0));
        assert!(app.controller.is_transitioning());
        app.controller.tick(ms(600));
        assert_eq!(app.controller.current(), 2);
    }
}
