//! Text measurement and the label tiles used for status lines and buttons.
//!
//! Glyphs are rasterised by the egui overlay at paint time; the scene only
//! needs sizes, so measurement goes through `TextMetrics`.

use glam::Vec2;

pub trait TextMetrics {
    /// Size of `text` laid out without wrapping. Newlines start a new line.
    fn measure(&self, text: &str, font_size: f32) -> Vec2;
}

/// Fixed advance per character, expressed as a fraction of the font size.
/// Deterministic, so layout can be checked without a font backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoMetrics {
    pub advance_em: f32,
    pub line_height_em: f32,
}

impl Default for MonoMetrics {
    fn default() -> Self {
        Self {
            advance_em: 0.56,
            line_height_em: 1.25,
        }
    }
}

impl TextMetrics for MonoMetrics {
    fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        let mut widest = 0usize;
        let mut lines = 0usize;
        for line in text.split('\n') {
            widest = widest.max(line.chars().count());
            lines += 1;
        }
        Vec2::new(
            widest as f32 * self.advance_em * font_size,
            lines as f32 * self.line_height_em * font_size,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font_size: f32,
    pub color: [f32; 4],
    pub padding: Vec2,
    pub background: Option<[f32; 4]>,
    pub border: Option<[f32; 4]>,
    /// Outer size including padding.
    pub size: Vec2,
}

impl Label {
    pub fn measured(
        text: &str,
        font_size: f32,
        color: [f32; 4],
        padding: Vec2,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let size = metrics.measure(text, font_size) + padding * 2.0;
        Self {
            text: text.to_string(),
            font_size,
            color,
            padding,
            background: None,
            border: None,
            size,
        }
    }

    pub fn with_background(mut self, background: [f32; 4]) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_border(mut self, border: [f32; 4]) -> Self {
        self.border = Some(border);
        self
    }

    pub fn text_origin(&self) -> Vec2 {
        self.padding
    }
}

/// Produces button tiles. Implemented by the harness UI so widgets in this
/// crate can re-render themselves without knowing the visual style.
pub trait ButtonSkin {
    fn button(&self, text: &str) -> Label;
}
