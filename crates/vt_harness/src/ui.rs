//! Label and button styling shared by the menu and the tests.

use glam::Vec2;
use vt_core::scene::{LayerContent, LayerId, LayerTree};
use vt_core::text::{ButtonSkin, Label, MonoMetrics, TextMetrics};

use crate::test::Action;

const TEXT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const BUTTON_FILL: [f32; 4] = [0.87, 0.87, 0.87, 1.0];
const BORDER_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

pub struct Ui {
    metrics: Box<dyn TextMetrics>,
    pub font_size: f32,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(MonoMetrics::default(), 16.0)
    }
}

impl Ui {
    pub fn new(metrics: impl TextMetrics + 'static, font_size: f32) -> Self {
        Self {
            metrics: Box::new(metrics),
            font_size,
        }
    }

    /// Plain text tile, optionally outlined.
    pub fn format_text(&self, text: &str, border: bool) -> Label {
        let label = Label::measured(
            text,
            self.font_size,
            TEXT_COLOR,
            Vec2::new(3.0, 2.0),
            self.metrics.as_ref(),
        );
        if border {
            label.with_border(BORDER_COLOR)
        } else {
            label
        }
    }

    pub fn format_button(&self, text: &str) -> Label {
        Label::measured(
            text,
            self.font_size,
            TEXT_COLOR,
            Vec2::new(10.0, 6.0),
            self.metrics.as_ref(),
        )
        .with_background(BUTTON_FILL)
        .with_border(BORDER_COLOR)
    }

    /// Adds a button layer at `(x, y)` that triggers `action` on pointer start.
    pub fn create_button(
        &self,
        tree: &mut LayerTree<Action>,
        parent: LayerId,
        text: &str,
        action: Action,
        x: f32,
        y: f32,
    ) -> LayerId {
        let id = tree.add_at(parent, LayerContent::Label(self.format_button(text)), x, y);
        if let Some(layer) = tree.layer_mut(id) {
            layer.set_action(Some(action));
        }
        id
    }

    /// Size a button for `text` would have, without creating it.
    pub fn button_size(&self, text: &str) -> Vec2 {
        self.format_button(text).size
    }
}

impl ButtonSkin for Ui {
    fn button(&self, text: &str) -> Label {
        self.format_button(text)
    }
}
