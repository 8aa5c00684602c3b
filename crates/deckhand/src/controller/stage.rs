//! Visual state of every slide and the hand-off choreography between them.
//!
//! Each slide carries a role (what the stylesheet would give it) and an
//! optional inline pose override. Whenever a slide's target pose changes the
//! stage tweens from what is currently shown to the new target, which is how
//! a CSS transition behaves. `commit_layout` snaps a slide to its target
//! without animating, the equivalent of forcing a reflow.

use std::time::Duration;

/// Horizontal distance an incoming or leaving slide sits off its rest place.
pub const OFFSET_DISTANCE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Forward iff `to` comes after `from`, regardless of distance.
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub offset: f32,
    pub opacity: f32,
}

impl Pose {
    pub const SHOWN: Pose = Pose {
        offset: 0.0,
        opacity: 1.0,
    };
    pub const HIDDEN: Pose = Pose {
        offset: 0.0,
        opacity: 0.0,
    };

    /// Off-screen starting pose for a slide entering in `direction`.
    pub fn entering(direction: Direction) -> Self {
        Self {
            offset: direction.sign() * OFFSET_DISTANCE,
            opacity: 0.0,
        }
    }

    fn lerp(self, to: Pose, t: f32) -> Pose {
        Pose {
            offset: self.offset + (to.offset - self.offset) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }

    fn is_invisible(self) -> bool {
        self.opacity <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRole {
    Hidden,
    Active,
    /// Outgoing slide during a hand-off in the given direction.
    Leaving(Direction),
}

impl SlideRole {
    /// Pose the stylesheet assigns to this role.
    pub fn pose(self) -> Pose {
        match self {
            Self::Hidden => Pose::HIDDEN,
            Self::Active => Pose::SHOWN,
            Self::Leaving(direction) => Pose {
                offset: -direction.sign() * OFFSET_DISTANCE,
                opacity: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: Pose,
    to: Pose,
    start: Duration,
}

#[derive(Debug, Clone)]
struct SlideStyle {
    role: SlideRole,
    inline: Option<Pose>,
    tween: Option<Tween>,
}

impl SlideStyle {
    fn target(&self) -> Pose {
        self.inline.unwrap_or(self.role.pose())
    }
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    slides: Vec<SlideStyle>,
    duration: Duration,
}

impl Stage {
    /// A stage of `count` slides with `active` (1-based) shown.
    pub fn new(count: usize, active: usize, duration: Duration) -> Self {
        let slides = (1..=count)
            .map(|position| SlideStyle {
                role: if position == active {
                    SlideRole::Active
                } else {
                    SlideRole::Hidden
                },
                inline: None,
                tween: None,
            })
            .collect();
        Self { slides, duration }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn role(&self, position: usize) -> Option<SlideRole> {
        self.style(position).map(|s| s.role)
    }

    pub fn inline(&self, position: usize) -> Option<Pose> {
        self.style(position).and_then(|s| s.inline)
    }

    /// Pose the slide is displayed with at `now`.
    pub fn pose(&self, position: usize, now: Duration) -> Option<Pose> {
        self.style(position).map(|s| self.displayed(s, now))
    }

    /// Whether any slide is still moving toward its target.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.slides
            .iter()
            .any(|s| s.tween.is_some_and(|t| now < t.start + self.duration))
    }

    /// Slides with non-zero opacity at `now`, active slide last so it paints on top.
    pub fn visible(&self, now: Duration) -> Vec<(usize, Pose)> {
        let mut shown: Vec<(usize, Pose, bool)> = self
            .slides
            .iter()
            .enumerate()
            .map(|(i, s)| (i + 1, self.displayed(s, now), s.role == SlideRole::Active))
            .filter(|(_, pose, _)| !pose.is_invisible())
            .collect();
        shown.sort_by_key(|(_, _, active)| *active);
        shown.into_iter().map(|(p, pose, _)| (p, pose)).collect()
    }

    /// Start the animated hand-off from `from` to `to`.
    pub fn begin_hand_off(&mut self, from: usize, to: usize, direction: Direction, now: Duration) {
        self.restyle(from, now, |s| s.role = SlideRole::Leaving(direction));

        self.restyle(to, now, |s| s.inline = Some(Pose::entering(direction)));
        self.commit_layout(to);

        self.restyle(to, now, |s| {
            s.role = SlideRole::Active;
            s.inline = Some(Pose::SHOWN);
        });
    }

    /// Clear the transient roles and inline overrides left by a hand-off.
    pub fn finish_hand_off(&mut self, from: usize, to: usize, now: Duration) {
        self.restyle(from, now, |s| {
            s.role = SlideRole::Hidden;
            s.inline = None;
        });
        self.restyle(to, now, |s| s.inline = None);
    }

    fn style(&self, position: usize) -> Option<&SlideStyle> {
        position.checked_sub(1).and_then(|i| self.slides.get(i))
    }

    fn displayed(&self, style: &SlideStyle, now: Duration) -> Pose {
        match style.tween {
            Some(tween) => {
                let elapsed = now.saturating_sub(tween.start).as_secs_f32();
                let total = self.duration.as_secs_f32();
                let t = if total > 0.0 {
                    (elapsed / total).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                tween.from.lerp(tween.to, ease_in_out(t))
            }
            None => style.target(),
        }
    }

    fn restyle(&mut self, position: usize, now: Duration, change: impl FnOnce(&mut SlideStyle)) {
        let Some(index) = position.checked_sub(1) else {
            return;
        };
        let Some(style) = self.slides.get(index) else {
            return;
        };
        let shown = self.displayed(style, now);
        let before = style.target();

        let style = &mut self.slides[index];
        change(style);
        let after = style.target();

        if after == before {
            return;
        }
        style.tween = if shown.is_invisible() && after.is_invisible() {
            None
        } else {
            Some(Tween {
                from: shown,
                to: after,
                start: now,
            })
        };
    }

    /// Snap a slide to its current target, dropping any running tween.
    fn commit_layout(&mut self, position: usize) {
        if let Some(style) = position.checked_sub(1).and_then(|i| self.slides.get_mut(i)) {
            style.tween = None;
        }
    }
}
