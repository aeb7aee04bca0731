//! The registered visual tests, in menu order.

pub mod alpha_layer;
pub mod clear_background;
pub mod pointer_input;

use crate::test::Test;

pub fn all() -> Vec<Box<dyn Test>> {
    vec![
        Box::new(alpha_layer::AlphaLayerTest::default()),
        Box::new(image_scaling::ImageScalingTest::default()),
        Box::new(clear_background::ClearBackgroundTest::default()),
        Box::new(pointer_input::PointerInputTest::default()),
        Box::new(fullscreen::FullscreenTest::default()),
    ]
}

#[cfg(test)]
pub(crate) mod support {
    use glam::Vec2;
    use vt_core::assets::Assets;
    use vt_core::scene::{LayerContent, LayerId, LayerTree};
    use vt_platform::window::PlatformCaps;

    use crate::test::{Action, PlatformRequest, TestContext};
    use crate::ui::Ui;

    pub struct Run<R> {
        pub tree: LayerTree<Action>,
        pub requests: Vec<PlatformRequest>,
        pub result: R,
    }

    /// Runs `f` against a fresh 800x600 context.
    pub fn run<R>(caps: PlatformCaps, f: impl FnOnce(&mut TestContext<'_>) -> R) -> Run<R> {
        let mut tree = LayerTree::new();
        let mut requests = Vec::new();
        let assets = Assets::new(std::env::temp_dir());
        let ui = Ui::default();
        let result = {
            let mut ctx = TestContext::new(
                &mut tree,
                &assets,
                &ui,
                Vec2::new(800.0, 600.0),
                caps,
                &mut requests,
            );
            f(&mut ctx)
        };
        Run {
            tree,
            requests,
            result,
        }
    }

    pub fn label_text(tree: &LayerTree<Action>, id: LayerId) -> Option<String> {
        match tree.get(id).map(|l| l.content()) {
            Some(LayerContent::Label(label)) => Some(label.text.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_platform::window::PlatformCaps;

    #[test]
    fn registry_names_are_unique() {
        let tests = all();
        let mut names: Vec<&str> = tests.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), tests.len());
    }

    #[test]
    fn only_pointer_input_is_positional() {
        let tests = all();
        let positional: Vec<&str> = tests
            .iter()
            .filter(|t| t.uses_positional_inputs())
            .map(|t| t.name())
            .collect();
        assert_eq!(positional, vec!["PointerInput"]);
    }

    #[test]
    fn fullscreen_needs_platform_support() {
        let tests = all();
        let without = PlatformCaps::default();
        let with = PlatformCaps {
            fullscreen: true,
            touch: false,
        };
        let count = |caps: &PlatformCaps| tests.iter().filter(|t| t.available(caps)).count();
        assert_eq!(count(&without), tests.len() - 1);
        assert_eq!(count(&with), tests.len());
    }
}
