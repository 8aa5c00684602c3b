use eframe::egui::Color32;

/// Colors of the celebration on the last slide.
pub const CONFETTI_PALETTE: [Color32; 5] = [
    Color32::from_rgb(0x63, 0x66, 0xF1), // indigo
    Color32::from_rgb(0x8B, 0x5C, 0xF6), // violet
    Color32::from_rgb(0xEC, 0x48, 0x99), // pink
    Color32::from_rgb(0x14, 0xB8, 0xA6), // teal
    Color32::from_rgb(0xF5, 0x9E, 0x0B), // amber
];

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub track: Color32,
    pub heading_size: f32,
    pub body_size: f32,
    pub chrome_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0F, 0x17, 0x2A),
            foreground: Color32::from_rgb(0xCB, 0xD5, 0xE1),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x63, 0x66, 0xF1),
            track: Color32::from_rgb(0x1E, 0x29, 0x3B),
            heading_size: 84.0,
            body_size: 40.0,
            chrome_size: 18.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x33, 0x41, 0x55),
            heading_color: Color32::from_rgb(0x0F, 0x17, 0x2A),
            accent: Color32::from_rgb(0x63, 0x66, 0xF1),
            track: Color32::from_rgb(0xE2, 0xE8, 0xF0),
            heading_size: 84.0,
            body_size: 40.0,
            chrome_size: 18.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (opacity.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }
}
