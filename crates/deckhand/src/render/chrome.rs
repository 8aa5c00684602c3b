use eframe::egui;

use crate::controller::chrome::{Affordance, Counter, ProgressFill};
use crate::theme::Theme;

pub const HINT_TEXT: &str =
    "\u{2190} \u{2192} / Space: navigate  |  Home / End: first / last  |  Swipe on touch screens";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Prev,
    Next,
}

impl Side {
    pub fn id(self) -> egui::Id {
        match self {
            Self::Prev => egui::Id::new("prev-arrow"),
            Self::Next => egui::Id::new("next-arrow"),
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Self::Prev => "\u{2039}",
            Self::Next => "\u{203A}",
        }
    }
}

/// Screen rect of an edge arrow.
pub fn arrow_rect(side: Side, rect: egui::Rect, scale: f32) -> egui::Rect {
    let size = 72.0 * scale;
    let margin = 32.0 * scale;
    let x = match side {
        Side::Prev => rect.left() + margin + size / 2.0,
        Side::Next => rect.right() - margin - size / 2.0,
    };
    egui::Rect::from_center_size(egui::pos2(x, rect.center().y), egui::vec2(size, size))
}

/// Draw an edge arrow and return its interaction. Disabled arrows only
/// sense hover so they never report clicks.
pub fn draw_arrow(
    ui: &egui::Ui,
    side: Side,
    affordance: Affordance,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
) -> egui::Response {
    let arrow_rect = arrow_rect(side, rect, scale);
    let sense = if affordance.accepts_pointer() {
        egui::Sense::click()
    } else {
        egui::Sense::hover()
    };
    let response = ui.interact(arrow_rect, side.id(), sense);

    let mut opacity = affordance.opacity();
    if affordance.accepts_pointer() && response.hovered() {
        opacity = 1.0;
    }

    let painter = ui.painter();
    painter.circle_filled(
        arrow_rect.center(),
        arrow_rect.width() / 2.0,
        Theme::with_opacity(theme.track, opacity),
    );
    if response.has_focus() {
        painter.circle_stroke(
            arrow_rect.center(),
            arrow_rect.width() / 2.0 + 3.0 * scale,
            egui::Stroke::new(2.0 * scale, Theme::with_opacity(theme.accent, opacity)),
        );
    }
    let glyph_color = Theme::with_opacity(theme.heading_color, opacity);
    let galley = painter.layout_no_wrap(
        side.glyph().to_string(),
        egui::FontId::proportional(56.0 * scale),
        glyph_color,
    );
    let pos = arrow_rect.center() - galley.rect.size() / 2.0;
    painter.galley(pos, galley, glyph_color);

    response
}

pub fn draw_counter(ui: &egui::Ui, counter: Counter, theme: &Theme, rect: egui::Rect, scale: f32) {
    let color = Theme::with_opacity(theme.foreground, 0.6);
    let galley = ui.painter().layout_no_wrap(
        counter.to_string(),
        egui::FontId::monospace(theme.chrome_size * scale),
        color,
    );
    let pos = egui::pos2(
        rect.right() - galley.rect.width() - 24.0 * scale,
        rect.bottom() - galley.rect.height() - 24.0 * scale,
    );
    ui.painter().galley(pos, galley, color);
}

/// Progress track along the bottom edge. The fill glows while the keyboard
/// navigating cue is on.
pub fn draw_progress(
    ui: &egui::Ui,
    progress: ProgressFill,
    navigating: bool,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
) {
    let height = 6.0 * scale;
    let track = egui::Rect::from_min_max(
        egui::pos2(rect.left(), rect.bottom() - height),
        rect.right_bottom(),
    );
    ui.painter().rect_filled(track, 0.0, theme.track);

    let fill = egui::Rect::from_min_size(
        track.min,
        egui::vec2(track.width() * progress.fraction().clamp(0.0, 1.0), height),
    );
    let opacity = if navigating { 1.0 } else { 0.8 };
    ui.painter()
        .rect_filled(fill, 0.0, Theme::with_opacity(theme.accent, opacity));
}

pub fn draw_hint(ui: &egui::Ui, opacity: f32, theme: &Theme, rect: egui::Rect, scale: f32) {
    if opacity <= 0.0 {
        return;
    }
    let color = Theme::with_opacity(theme.foreground, 0.7 * opacity);
    let bg = Theme::with_opacity(theme.track, 0.9 * opacity);
    let galley = ui.painter().layout_no_wrap(
        HINT_TEXT.to_string(),
        egui::FontId::proportional(theme.chrome_size * scale),
        color,
    );
    let padding = 14.0 * scale;
    let hint_rect = egui::Rect::from_min_size(
        egui::pos2(
            rect.center().x - galley.rect.width() / 2.0 - padding,
            rect.bottom() - 96.0 * scale,
        ),
        galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0),
    );
    ui.painter().rect_filled(hint_rect, 8.0 * scale, bg);
    ui.painter()
        .galley(hint_rect.min + egui::vec2(padding, padding), galley, color);
}
