pub mod chrome;
pub mod confetti;

use eframe::egui;

use crate::controller::stage::Pose;
use crate::deck::Slide;
use crate::theme::Theme;

/// Reference resolution the theme sizes are designed for.
const REFERENCE_WIDTH: f32 = 1920.0;
const REFERENCE_HEIGHT: f32 = 1080.0;

pub fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / REFERENCE_WIDTH).min(rect.height() / REFERENCE_HEIGHT)
}

/// Render a slide at its animated pose. The pose offset is in reference
/// units and shifts the slide horizontally.
pub fn render_slide(
    ui: &egui::Ui,
    slide: &Slide,
    theme: &Theme,
    rect: egui::Rect,
    pose: Pose,
    scale: f32,
) {
    if pose.opacity <= 0.0 {
        return;
    }
    let rect = rect.translate(egui::vec2(pose.offset * scale, 0.0));
    let padding = 120.0 * scale;
    let content_rect = rect.shrink(padding);

    let heading_color = Theme::with_opacity(theme.heading_color, pose.opacity);
    let body_color = Theme::with_opacity(theme.foreground, pose.opacity);

    let heading_galley = ui.painter().layout(
        slide.heading.clone(),
        egui::FontId::proportional(theme.heading_size * scale),
        heading_color,
        content_rect.width(),
    );
    let body_galley = ui.painter().layout(
        slide.body.clone(),
        egui::FontId::proportional(theme.body_size * scale),
        body_color,
        content_rect.width(),
    );

    let gap = if slide.body.is_empty() {
        0.0
    } else {
        48.0 * scale
    };
    let total_height = heading_galley.rect.height() + gap + body_galley.rect.height();
    let top = (content_rect.center().y - total_height / 2.0).max(content_rect.top());

    let heading_pos = egui::pos2(
        content_rect.center().x - heading_galley.rect.width() / 2.0,
        top,
    );
    let body_top = top + heading_galley.rect.height() + gap;
    let body_pos = egui::pos2(
        content_rect.center().x - body_galley.rect.width() / 2.0,
        body_top,
    );

    ui.painter()
        .galley(heading_pos, heading_galley, heading_color);
    ui.painter().galley(body_pos, body_galley, body_color);
}
