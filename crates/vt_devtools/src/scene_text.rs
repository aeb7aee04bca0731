//! Everything the overlay paints on behalf of the scene: label glyph runs,
//! label borders and the optional layer bounds.

use glam::Vec2;
use vt_core::scene::{DrawItem, LayerContent};

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Top-left of the first line, in view space.
    pub pos: Vec2,
    pub text: String,
    pub font_size: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub min: Vec2,
    pub max: Vec2,
    pub color: [f32; 4],
}

const DEBUG_RECT_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

pub fn text_runs(items: &[DrawItem<'_>]) -> Vec<TextRun> {
    items
        .iter()
        .filter_map(|item| {
            let LayerContent::Label(label) = item.content else {
                return None;
            };
            if label.text.is_empty() {
                return None;
            }
            let scale = item.transform.matrix2.determinant().abs().sqrt();
            let mut color = label.color;
            color[3] *= item.alpha;
            Some(TextRun {
                pos: item.transform.transform_point2(label.text_origin()),
                text: label.text.clone(),
                font_size: label.font_size * scale,
                color,
            })
        })
        .filter(|run| run.font_size > 0.0)
        .collect()
}

pub fn label_borders(items: &[DrawItem<'_>]) -> Vec<Outline> {
    items
        .iter()
        .filter_map(|item| match item.content {
            LayerContent::Label(label) => label.border.map(|mut color| {
                color[3] *= item.alpha;
                let (min, max) = item.bounds();
                Outline { min, max, color }
            }),
            _ => None,
        })
        .collect()
}

/// Bounds of every sized layer, skipping view-filling backgrounds.
pub fn debug_rects(items: &[DrawItem<'_>]) -> Vec<Outline> {
    items
        .iter()
        .filter(|item| !matches!(item.content, LayerContent::ViewFill { .. }))
        .map(|item| {
            let (min, max) = item.bounds();
            Outline {
                min,
                max,
                color: DEBUG_RECT_COLOR,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_core::scene::LayerTree;
    use vt_core::text::{Label, MonoMetrics};

    const VIEW: Vec2 = Vec2::new(320.0, 240.0);

    fn label(text: &str) -> Label {
        Label::measured(
            text,
            10.0,
            [0.0, 0.0, 0.0, 1.0],
            Vec2::new(4.0, 2.0),
            &MonoMetrics::default(),
        )
    }

    #[test]
    fn text_runs_follow_translation_scale_and_alpha() {
        let mut tree: LayerTree<()> = LayerTree::new();
        let root = tree.root();
        let id = tree.add_at(root, LayerContent::Label(label("Back")), 50.0, 20.0);
        tree.layer_mut(id)
            .expect("label layer")
            .set_scale(2.0)
            .set_alpha(0.5);

        let items = tree.flatten(VIEW);
        let runs = text_runs(&items);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].pos, Vec2::new(58.0, 24.0));
        assert_eq!(runs[0].font_size, 20.0);
        assert_eq!(runs[0].color[3], 0.5);
    }

    #[test]
    fn empty_and_invisible_labels_paint_nothing() {
        let mut tree: LayerTree<()> = LayerTree::new();
        let root = tree.root();
        tree.add(root, LayerContent::Label(label("")));
        let hidden = tree.add(root, LayerContent::Label(label("hidden")));
        tree.layer_mut(hidden).expect("layer").set_visible(false);

        let items = tree.flatten(VIEW);
        assert!(text_runs(&items).is_empty());
    }

    #[test]
    fn borders_only_for_bordered_labels() {
        let mut tree: LayerTree<()> = LayerTree::new();
        let root = tree.root();
        tree.add(root, LayerContent::Label(label("plain")));
        tree.add_at(
            root,
            LayerContent::Label(label("button").with_border([0.0, 0.0, 0.0, 1.0])),
            10.0,
            10.0,
        );

        let items = tree.flatten(VIEW);
        let borders = label_borders(&items);
        assert_eq!(borders.len(), 1);
        assert_eq!(borders[0].min, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn debug_rects_skip_view_fill() {
        let mut tree: LayerTree<()> = LayerTree::new();
        let root = tree.root();
        tree.add(root, LayerContent::ViewFill { color: [1.0; 4] });
        tree.add_at(
            root,
            LayerContent::Solid {
                size: Vec2::new(8.0, 6.0),
                color: [1.0; 4],
            },
            2.0,
            3.0,
        );

        let items = tree.flatten(VIEW);
        let rects = debug_rects(&items);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].max, Vec2::new(10.0, 9.0));
    }
}
