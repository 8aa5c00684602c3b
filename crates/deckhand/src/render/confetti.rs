use std::time::Duration;

use eframe::egui;

use crate::controller::confetti::{PARTICLE_SIZE, Particle};
use crate::theme::Theme;

/// Corners of a square of half-size `half` centered on `center`, rotated by
/// `degrees`.
fn rotated_square(center: egui::Pos2, half: f32, degrees: f32) -> Vec<egui::Pos2> {
    let rot = egui::emath::Rot2::from_angle(degrees.to_radians());
    [
        egui::vec2(-half, -half),
        egui::vec2(half, -half),
        egui::vec2(half, half),
        egui::vec2(-half, half),
    ]
    .into_iter()
    .map(|corner| center + rot * corner)
    .collect()
}

/// Paint every live particle over the whole viewport.
pub fn draw_particles(
    ui: &egui::Ui,
    particles: &[Particle],
    now: Duration,
    rect: egui::Rect,
    scale: f32,
) {
    let half = PARTICLE_SIZE * scale.max(0.5) / 2.0;
    for particle in particles {
        let frame = particle.frame(now, rect.height());
        if frame.opacity <= 0.0 {
            continue;
        }
        let color = Theme::with_opacity(particle.color, frame.opacity);
        let center = egui::pos2(
            rect.left() + particle.x_fraction * rect.width(),
            rect.top() + frame.y,
        );
        if particle.round {
            ui.painter().circle_filled(center, half, color);
        } else {
            ui.painter().add(egui::Shape::convex_polygon(
                rotated_square(center, half, frame.rotation),
                color,
                egui::Stroke::NONE,
            ));
        }
    }
}
