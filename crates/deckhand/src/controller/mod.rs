//! Slide navigation state machine.
//!
//! The controller owns the current position, the transition gate, the
//! per-slide visual state and every deferred action. It is driven by two
//! things only: command calls from the input layer and `tick` calls from
//! the frame loop. Time is a monotonic `Duration` since the session began.

pub mod chrome;
pub mod confetti;
pub mod scheduler;
pub mod settings;
pub mod stage;

use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::input::{self, Key, SwipeTracker};

use chrome::Chrome;
use confetti::{Confetti, Particle};
use scheduler::{Scheduler, Task};
pub use settings::Settings;
use stage::{Direction, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Advance,
    Retreat,
    /// Jump to a 1-based position.
    JumpTo(usize),
    JumpToFirst,
    JumpToLast,
}

/// Snapshot of where the presentation is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideInfo {
    pub current: usize,
    pub total: usize,
    pub progress_percent: f32,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: u64,
    from: usize,
    to: usize,
    direction: Direction,
    requested_at: Duration,
}

pub struct NavigationController<R = StdRng> {
    settings: Settings,
    current: usize,
    transitioning: bool,
    transition: Option<InFlight>,
    next_transition_id: u64,
    swipe: SwipeTracker,
    stage: Stage,
    chrome: Chrome,
    confetti: Confetti<R>,
    scheduler: Scheduler,
}

impl NavigationController<StdRng> {
    pub fn new(settings: Settings, now: Duration) -> Self {
        Self::with_rng(settings, now, StdRng::from_entropy())
    }
}

impl<R: Rng> NavigationController<R> {
    /// Build a controller positioned on slide 1 at time `now`.
    pub fn with_rng(settings: Settings, now: Duration, rng: R) -> Self {
        let total = settings.total_slides;
        let stage = Stage::new(total, 1, settings.transition_duration);
        let chrome = Chrome::new(settings.chrome, 1, total);
        let confetti = Confetti::new(settings.confetti.clone(), rng);
        let swipe = SwipeTracker::new(settings.min_swipe_distance);

        let mut scheduler = Scheduler::new();
        if settings.chrome.hint {
            scheduler.schedule(now, settings.hint_delay, Task::FadeHint);
        }

        Self {
            settings,
            current: 1,
            transitioning: false,
            transition: None,
            next_transition_id: 0,
            swipe,
            stage,
            chrome,
            confetti,
            scheduler,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.settings.total_slides
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Direction of the transition in flight, if any.
    pub fn direction(&self) -> Option<Direction> {
        self.transition.map(|t| t.direction)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn info(&self) -> SlideInfo {
        SlideInfo {
            current: self.current,
            total: self.total(),
            progress_percent: self.current as f32 / self.total() as f32 * 100.0,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn particles(&self) -> &[Particle] {
        self.confetti.particles()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn advance(&mut self, now: Duration) -> bool {
        if self.transitioning || self.current >= self.total() {
            tracing::trace!(current = self.current, "advance ignored");
            return false;
        }
        self.request_transition(self.current + 1, now)
    }

    pub fn retreat(&mut self, now: Duration) -> bool {
        if self.transitioning || self.current <= 1 {
            tracing::trace!(current = self.current, "retreat ignored");
            return false;
        }
        self.request_transition(self.current - 1, now)
    }

    pub fn jump_to(&mut self, target: usize, now: Duration) -> bool {
        if self.transitioning || target == self.current || !(1..=self.total()).contains(&target)
        {
            tracing::trace!(current = self.current, target, "jump ignored");
            return false;
        }
        self.request_transition(target, now)
    }

    pub fn jump_to_first(&mut self, now: Duration) -> bool {
        self.jump_to(1, now)
    }

    pub fn jump_to_last(&mut self, now: Duration) -> bool {
        self.jump_to(self.total(), now)
    }

    /// Run a command. Returns whether it started a transition.
    pub fn execute(&mut self, command: Command, now: Duration) -> bool {
        match command {
            Command::Advance => self.advance(now),
            Command::Retreat => self.retreat(now),
            Command::JumpTo(target) => self.jump_to(target, now),
            Command::JumpToFirst => self.jump_to_first(now),
            Command::JumpToLast => self.jump_to_last(now),
        }
    }

    /// Handle a key press. Returns true if the key is one the presentation
    /// owns, in which case its default action must be suppressed whether or
    /// not a transition is running.
    pub fn press_key(&mut self, key: Key, now: Duration) -> bool {
        if key.shows_navigating_cue() {
            self.chrome.set_navigating(true);
            self.scheduler
                .schedule(now, self.settings.navigating_cue, Task::EndNavigatingCue);
        }
        match input::key_command(key) {
            Some(command) => {
                self.execute(command, now);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&mut self, x: f32) {
        self.swipe.begin(x);
    }

    /// Finish a touch. Returns the command it classified as, if any.
    pub fn touch_end(&mut self, x: f32, now: Duration) -> Option<Command> {
        if self.transitioning {
            return None;
        }
        let command = self.swipe.finish(x)?;
        self.execute(command, now);
        Some(command)
    }

    /// Run every task due at `now`. Returns how many ran.
    pub fn tick(&mut self, now: Duration) -> usize {
        let mut ran = 0;
        while let Some((due, task)) = self.scheduler.pop_due(now) {
            self.run(task, due);
            ran += 1;
        }

        if let (Some(grace), Some(t)) = (self.settings.watchdog, self.transition) {
            if now >= t.requested_at + self.settings.settle_delay + grace {
                tracing::warn!(from = t.from, to = t.to, "transition stuck, forcing commit");
                self.commit(t.id, now);
            }
        }
        ran
    }

    fn run(&mut self, task: Task, at: Duration) {
        match task {
            Task::CommitTransition(id) => self.commit(id, at),
            Task::SpawnParticle(_) => {
                self.confetti.spawn(at, &mut self.scheduler);
            }
            Task::RemoveParticle(id) => {
                self.confetti.remove(id);
            }
            Task::FadeHint => {
                self.chrome.fade_hint(at);
                self.scheduler
                    .schedule(at, self.settings.hint_fade, Task::RemoveHint);
            }
            Task::RemoveHint => self.chrome.remove_hint(),
            Task::EndNavigatingCue => self.chrome.set_navigating(false),
        }
    }

    fn request_transition(&mut self, target: usize, now: Duration) -> bool {
        self.transitioning = true;

        let from = self.current;
        let direction = Direction::between(from, target);
        let id = self.next_transition_id;
        self.next_transition_id += 1;

        tracing::debug!(from, to = target, ?direction, "transition requested");

        self.stage.begin_hand_off(from, target, direction, now);
        self.transition = Some(InFlight {
            id,
            from,
            to: target,
            direction,
            requested_at: now,
        });
        self.scheduler
            .schedule(now, self.settings.settle_delay, Task::CommitTransition(id));
        true
    }

    fn commit(&mut self, id: u64, now: Duration) {
        let Some(t) = self.transition.filter(|t| t.id == id) else {
            return;
        };
        self.transition = None;

        self.stage.finish_hand_off(t.from, t.to, now);
        self.current = t.to;
        self.chrome.sync(self.current, self.total());
        self.transitioning = false;

        tracing::debug!(current = self.current, "transition committed");

        if t.to == self.total() {
            tracing::info!("last slide reached, launching confetti");
            self.confetti.launch(now, &mut self.scheduler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::chrome::Hint;
    use super::stage::{OFFSET_DISTANCE, Pose, SlideRole};
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn deck(total: usize) -> NavigationController<StdRng> {
        NavigationController::with_rng(Settings::new(total), ms(0), StdRng::seed_from_u64(7))
    }

    /// Run a command and let the settle delay pass.
    fn settle(c: &mut NavigationController<StdRng>, now: &mut Duration) {
        *now += c.settings().settle_delay;
        c.tick(*now);
    }

    fn spawn_tasks(c: &NavigationController<StdRng>) -> Vec<Duration> {
        c.scheduler()
            .pending()
            .into_iter()
            .filter(|(_, t)| matches!(t, Task::SpawnParticle(_)))
            .map(|(d, _)| d)
            .collect()
    }

    #[test]
    fn test_starts_on_first_slide() {
        let c = deck(12);
        assert_eq!(c.current(), 1);
        assert!(!c.is_transitioning());
        assert_eq!(c.chrome().counter().unwrap().to_string(), "1 / 12");
        assert_eq!(c.stage().role(1), Some(SlideRole::Active));
    }

    #[test]
    fn test_jump_to_every_position() {
        for p in 1..=12 {
            let mut c = deck(12);
            let mut now = ms(0);
            let started = c.jump_to(p, now);
            assert_eq!(started, p != 1);
            settle(&mut c, &mut now);
            assert_eq!(c.current(), p);
            assert!(!c.is_transitioning());
        }
    }

    #[test]
    fn test_out_of_range_jump_is_ignored() {
        let mut c = deck(5);
        assert!(!c.jump_to(0, ms(0)));
        assert!(!c.jump_to(6, ms(0)));
        assert!(!c.jump_to(1, ms(0)));
        assert!(!c.is_transitioning());
    }

    #[test]
    fn test_bounds_are_no_ops() {
        let mut c = deck(3);
        let mut now = ms(0);
        assert!(!c.retreat(now));
        assert!(!c.is_transitioning());

        c.jump_to_last(now);
        settle(&mut c, &mut now);
        assert_eq!(c.current(), 3);
        assert!(!c.advance(now));
        assert!(!c.is_transitioning());
        assert_eq!(c.current(), 3);
    }

    #[test]
    fn test_commands_dropped_while_transitioning() {
        let mut c = deck(12);
        let mut now = ms(0);
        assert!(c.advance(now));
        assert!(c.is_transitioning());

        now += ms(100);
        assert!(!c.advance(now));
        assert!(!c.retreat(now));
        assert!(!c.jump_to(7, now));
        assert!(!c.jump_to_last(now));
        assert!(c.is_transitioning());
        assert_eq!(c.current(), 1);

        now = ms(600);
        c.tick(now);
        assert_eq!(c.current(), 2);
        assert!(!c.is_transitioning());
        now += ms(600);
        c.tick(now);
        assert_eq!(c.current(), 2, "dropped commands are not queued");
    }

    #[test]
    fn test_commit_waits_for_settle_delay() {
        let mut c = deck(4);
        c.advance(ms(0));
        c.tick(ms(599));
        assert_eq!(c.current(), 1);
        assert!(c.is_transitioning());
        c.tick(ms(600));
        assert_eq!(c.current(), 2);
    }

    #[test]
    fn test_jump_to_last_animates_forward_in_one_hop() {
        let mut c = deck(12);
        c.jump_to_last(ms(0));
        assert_eq!(c.direction(), Some(Direction::Forward));
        assert_eq!(c.stage().role(1), Some(SlideRole::Leaving(Direction::Forward)));
        assert_eq!(c.stage().pose(12, ms(0)).unwrap().offset, OFFSET_DISTANCE);
        for p in 2..12 {
            assert_eq!(c.stage().role(p), Some(SlideRole::Hidden));
        }
        c.tick(ms(600));
        assert_eq!(c.current(), 12);
    }

    #[test]
    fn test_jump_to_first_animates_backward() {
        let mut c = deck(12);
        let mut now = ms(0);
        c.jump_to(9, now);
        settle(&mut c, &mut now);
        c.jump_to_first(now);
        assert_eq!(c.direction(), Some(Direction::Backward));
        assert_eq!(c.stage().pose(1, now).unwrap().offset, -OFFSET_DISTANCE);
    }

    #[test]
    fn test_stage_settles_after_commit() {
        let mut c = deck(4);
        let mut now = ms(0);
        c.advance(now);
        settle(&mut c, &mut now);
        assert_eq!(c.stage().role(1), Some(SlideRole::Hidden));
        assert_eq!(c.stage().role(2), Some(SlideRole::Active));
        assert_eq!(c.stage().inline(2), None);
        assert_eq!(c.stage().visible(now), vec![(2, Pose::SHOWN)]);
    }

    #[test]
    fn test_affordances_track_boundaries() {
        let mut c = deck(3);
        let mut now = ms(0);
        assert!(!c.chrome().prev().unwrap().enabled);
        assert!(c.chrome().next().unwrap().enabled);

        c.advance(now);
        settle(&mut c, &mut now);
        assert!(c.chrome().prev().unwrap().enabled);
        assert!(c.chrome().next().unwrap().enabled);

        c.advance(now);
        settle(&mut c, &mut now);
        assert!(c.chrome().prev().unwrap().enabled);
        assert!(!c.chrome().next().unwrap().enabled);

        c.retreat(now);
        settle(&mut c, &mut now);
        assert!(c.chrome().next().unwrap().enabled);
    }

    #[test]
    fn test_celebration_on_each_arrival() {
        let mut c = deck(4);
        let mut now = ms(0);
        c.jump_to_last(now);
        assert!(spawn_tasks(&c).is_empty());
        settle(&mut c, &mut now);
        // the first spawn is due at once and has already run
        assert_eq!(spawn_tasks(&c).len(), 49);
        assert_eq!(c.particles().len(), 1);

        c.retreat(now);
        settle(&mut c, &mut now);
        c.advance(now);
        settle(&mut c, &mut now);
        assert_eq!(c.current(), 4);
        assert_eq!(spawn_tasks(&c).last(), Some(&(now + ms(4900))));
    }

    #[test]
    fn test_no_celebration_away_from_last_slide() {
        let mut c = deck(4);
        let mut now = ms(0);
        c.jump_to(3, now);
        settle(&mut c, &mut now);
        assert!(spawn_tasks(&c).is_empty());
        assert!(c.particles().is_empty());
    }

    #[test]
    fn test_particles_remove_themselves() {
        let mut c = deck(2);
        let mut now = ms(0);
        c.advance(now);
        settle(&mut c, &mut now);
        now += ms(4900);
        c.tick(now);
        assert!(spawn_tasks(&c).is_empty());
        assert!(!c.particles().is_empty());
        now += ms(5000);
        c.tick(now);
        assert!(c.particles().is_empty());
    }

    #[test]
    fn test_swipes() {
        let mut c = deck(5);
        let mut now = ms(0);
        c.touch_start(300.0);
        assert_eq!(c.touch_end(251.0, now), None);
        assert!(!c.is_transitioning());

        c.touch_start(300.0);
        assert_eq!(c.touch_end(250.0, now), Some(Command::Advance));
        settle(&mut c, &mut now);
        assert_eq!(c.current(), 2);

        c.touch_start(250.0);
        assert_eq!(c.touch_end(300.0, now), Some(Command::Retreat));
        settle(&mut c, &mut now);
        assert_eq!(c.current(), 1);
    }

    #[test]
    fn test_swipe_ignored_mid_transition() {
        let mut c = deck(5);
        c.advance(ms(0));
        c.touch_start(300.0);
        assert_eq!(c.touch_end(100.0, ms(10)), None);
        c.tick(ms(600));
        assert_eq!(c.current(), 2);
    }

    #[test]
    fn test_keys_are_owned_even_mid_transition() {
        let mut c = deck(5);
        assert!(c.press_key(Key::ArrowRight, ms(0)));
        assert!(c.is_transitioning());
        assert!(c.press_key(Key::ArrowRight, ms(10)));
        assert!(c.press_key(Key::End, ms(20)));
        assert!(!c.press_key(Key::Enter, ms(30)));
        c.tick(ms(600));
        assert_eq!(c.current(), 2);
    }

    #[test]
    fn test_escape_and_home_go_to_first() {
        for key in [Key::Escape, Key::Home] {
            let mut c = deck(5);
            let mut now = ms(0);
            c.press_key(Key::End, now);
            settle(&mut c, &mut now);
            c.press_key(key, now);
            settle(&mut c, &mut now);
            assert_eq!(c.current(), 1);
        }
    }

    #[test]
    fn test_navigating_cue() {
        let mut c = deck(5);
        c.press_key(Key::Space, ms(0));
        assert!(c.chrome().navigating());
        c.tick(ms(199));
        assert!(c.chrome().navigating());
        c.tick(ms(200));
        assert!(!c.chrome().navigating());

        c.press_key(Key::Home, ms(1000));
        assert!(!c.chrome().navigating());
    }

    #[test]
    fn test_hint_lifecycle() {
        let mut c = deck(5);
        assert_eq!(c.chrome().hint(), Some(Hint::Shown));
        c.tick(ms(5000));
        assert_eq!(c.chrome().hint(), Some(Hint::Fading { since: ms(5000) }));
        c.tick(ms(5300));
        assert_eq!(c.chrome().hint(), Some(Hint::Removed));
    }

    #[test]
    fn test_no_watchdog_by_default() {
        let c = deck(5);
        assert_eq!(c.settings().watchdog, None);
    }

    #[test]
    fn test_watchdog_forces_commit_once() {
        let mut settings = Settings::new(5);
        settings.watchdog = Some(ms(1000));
        let mut c = NavigationController::with_rng(settings, ms(0), StdRng::seed_from_u64(1));

        c.advance(ms(0));
        // The watchdog check runs after the queue is drained; the real commit
        // wins when it is on time.
        c.tick(ms(600));
        assert_eq!(c.current(), 2);
        assert!(!c.is_transitioning());

        c.tick(ms(5000));
        assert_eq!(c.current(), 2);
    }

    #[test]
    fn test_stale_commit_is_ignored() {
        let mut c = deck(5);
        c.advance(ms(0));
        c.commit(0, ms(100));
        assert_eq!(c.current(), 2);
        c.advance(ms(100));
        // The original commit task for transition 0 fires at 600 and must not
        // commit transition 1 early.
        c.tick(ms(600));
        assert_eq!(c.current(), 2);
        assert!(c.is_transitioning());
        c.tick(ms(700));
        assert_eq!(c.current(), 3);
    }

    #[test]
    fn test_info() {
        let mut c = deck(4);
        c.advance(ms(0));
        c.tick(ms(600));
        assert_eq!(
            c.info(),
            SlideInfo {
                current: 2,
                total: 4,
                progress_percent: 50.0
            }
        );
    }

    #[test]
    fn test_twelve_slide_walkthrough() {
        let mut c = deck(12);
        let mut now = ms(0);

        c.press_key(Key::ArrowRight, now);
        settle(&mut c, &mut now);
        assert_eq!(c.chrome().counter().unwrap().to_string(), "2 / 12");
        let percent = c.chrome().progress().unwrap().percent;
        assert!((percent - 16.67).abs() < 0.01);
        assert!(c.chrome().prev().unwrap().enabled);
        assert!(c.chrome().next().unwrap().enabled);

        c.press_key(Key::End, now);
        let commit_at = now + ms(600);
        now = commit_at - ms(1);
        c.tick(now);
        assert_eq!(c.current(), 2);
        now = commit_at;
        // Observe the queue right at commit, before the first spawn runs.
        while let Some((due, task)) = c.scheduler.pop_due(now) {
            c.run(task, due);
            if matches!(task, Task::CommitTransition(_)) {
                break;
            }
        }
        assert_eq!(c.chrome().counter().unwrap().to_string(), "12 / 12");
        assert_eq!(c.chrome().progress().unwrap().percent, 100.0);
        assert!(!c.chrome().next().unwrap().enabled);
        assert!(c.chrome().prev().unwrap().enabled);

        let spawns = spawn_tasks(&c);
        assert_eq!(spawns.len(), 50);
        assert_eq!(spawns[0], commit_at);
        assert_eq!(*spawns.last().unwrap(), commit_at + ms(4900));
    }
}
