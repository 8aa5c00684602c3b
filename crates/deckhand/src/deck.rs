use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Read-only slide content. The deck is fixed once the presentation starts.
#[derive(Debug, Clone, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub title: Option<String>,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slide {
    pub heading: String,
    #[serde(default)]
    pub body: String,
}

const BUILTIN: [(&str, &str); 12] = [
    (
        "Welcome",
        "A fixed deck of slides, one step at a time.\n\nPress \u{2192} or swipe left to begin.",
    ),
    (
        "Moving Forward",
        "Right arrow, Space and Page Down all advance by one slide.",
    ),
    (
        "Going Back",
        "Left arrow and Page Up step back. Nothing happens on the first slide.",
    ),
    (
        "Jumping",
        "Home and Escape return to the start. End goes straight to the last slide.",
    ),
    (
        "Touch",
        "Swipe left to advance and right to go back. Short drags are ignored.",
    ),
    (
        "Arrows",
        "The arrows at the edges work with the mouse or with Enter once focused.",
    ),
    (
        "One at a Time",
        "While a slide is sliding in, further input is dropped rather than queued.",
    ),
    (
        "Progress",
        "The bar along the bottom and the counter always show where you are.",
    ),
    (
        "Direction",
        "Slides enter from the side you are heading toward, however far you jump.",
    ),
    (
        "Quiet Window",
        "Scrolling, pinch zoom and context menus are switched off underneath.",
    ),
    (
        "Almost There",
        "One more slide to go.",
    ),
    (
        "Thank You",
        "That's the end of the deck.",
    ),
];

impl Deck {
    /// The built-in demonstration deck with `count` slides.
    pub fn builtin(count: usize) -> Self {
        let count = count.max(1);
        let closing = BUILTIN[BUILTIN.len() - 1];
        let middle = &BUILTIN[..BUILTIN.len() - 1];
        let slides = (1..=count)
            .map(|position| {
                let (heading, body) = if position == count {
                    (closing.0.to_string(), closing.1.to_string())
                } else if let Some((heading, body)) = middle.get(position - 1) {
                    (heading.to_string(), body.to_string())
                } else {
                    (format!("Slide {position}"), String::new())
                };
                Slide { heading, body }
            })
            .collect();
        Self {
            title: None,
            slides,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid deck {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let deck: Deck = serde_yaml::from_str(contents)?;
        if deck.slides.is_empty() {
            anyhow::bail!("deck has no slides");
        }
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide at a 1-based position.
    pub fn slide(&self, position: usize) -> Option<&Slide> {
        position.checked_sub(1).and_then(|i| self.slides.get(i))
    }
}
