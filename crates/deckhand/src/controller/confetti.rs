use std::time::Duration;

use eframe::egui::Color32;
use rand::Rng;

use super::scheduler::{Scheduler, Task};
use super::settings::ConfettiSettings;

/// Particles start this far above the top edge.
pub const START_ABOVE: f32 = 10.0;
/// ...and finish this far below the bottom edge.
pub const END_BELOW: f32 = 50.0;
/// Extra rotation over a particle's lifetime.
pub const SPIN_DEGREES: f32 = 720.0;
pub const PARTICLE_SIZE: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub color: Color32,
    /// Horizontal start position as a fraction of the viewport width.
    pub x_fraction: f32,
    pub round: bool,
    pub rotation: f32,
    pub spawned_at: Duration,
    pub lifetime: Duration,
}

/// Where a particle is drawn at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub y: f32,
    pub rotation: f32,
    pub opacity: f32,
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(2)
}

impl Particle {
    /// Linear progress through the lifetime, clamped to `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        let total = self.lifetime.as_secs_f32();
        if total <= 0.0 {
            return 1.0;
        }
        (now.saturating_sub(self.spawned_at).as_secs_f32() / total).clamp(0.0, 1.0)
    }

    pub fn frame(&self, now: Duration, viewport_height: f32) -> ParticleFrame {
        let t = ease_out(self.progress(now));
        let start = -START_ABOVE;
        let end = viewport_height + END_BELOW;
        ParticleFrame {
            y: start + (end - start) * t,
            rotation: self.rotation + SPIN_DEGREES * t,
            opacity: 1.0 - t,
        }
    }
}

/// The one-shot celebration shown on reaching the last slide.
#[derive(Debug)]
pub struct Confetti<R> {
    settings: ConfettiSettings,
    rng: R,
    particles: Vec<Particle>,
    next_id: u64,
}

impl<R: Rng> Confetti<R> {
    pub fn new(settings: ConfettiSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            particles: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule every particle spawn of one celebration, staggered from `now`.
    pub fn launch(&self, now: Duration, scheduler: &mut Scheduler) {
        for i in 0..self.settings.count {
            let delay = self.settings.stagger * i as u32;
            scheduler.schedule(now, delay, Task::SpawnParticle(i));
        }
    }

    /// Create one particle and schedule its own removal.
    pub fn spawn(&mut self, now: Duration, scheduler: &mut Scheduler) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let palette = &self.settings.palette;
        let color = if palette.is_empty() {
            Color32::WHITE
        } else {
            palette[self.rng.gen_range(0..palette.len())]
        };

        let min = self.settings.min_lifetime.as_millis() as u64;
        let max = self.settings.max_lifetime.as_millis() as u64;
        let lifetime = if max > min {
            Duration::from_millis(self.rng.gen_range(min..max))
        } else {
            self.settings.min_lifetime
        };

        let particle = Particle {
            id,
            color,
            x_fraction: self.rng.gen_range(0.0..1.0),
            round: self.rng.gen_bool(0.5),
            rotation: self.rng.gen_range(0.0..360.0),
            spawned_at: now,
            lifetime,
        };
        scheduler.schedule(now, lifetime, Task::RemoveParticle(id));
        self.particles.push(particle);
        id
    }

    /// Remove a finished particle. Returns false if it was already gone.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.particles.len();
        self.particles.retain(|p| p.id != id);
        self.particles.len() != before
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
