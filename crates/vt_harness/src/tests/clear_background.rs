use vt_core::scene::{LayerContent, LayerId};
use vt_core::toggle::NToggle;

use crate::test::{Action, Test, TestContext};

const PICK_COLOR: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Swatch {
    name: &'static str,
    color: [f32; 4],
}

const SWATCHES: [Swatch; 5] = [
    Swatch {
        name: "red",
        color: [1.0, 0.0, 0.0, 1.0],
    },
    Swatch {
        name: "green",
        color: [0.0, 1.0, 0.0, 1.0],
    },
    Swatch {
        name: "blue",
        color: [0.0, 0.0, 1.0, 1.0],
    },
    Swatch {
        name: "black",
        color: [0.0, 0.0, 0.0, 1.0],
    },
    Swatch {
        name: "translucent gray",
        color: [0.5, 0.5, 0.5, 0.5],
    },
];

/// Fills the whole view with a colour chosen by a toggle.
#[derive(Default)]
pub struct ClearBackgroundTest {
    fill: Option<LayerId>,
    picker: Option<NToggle<Swatch>>,
}

impl ClearBackgroundTest {
    fn apply(&self, ctx: &mut TestContext<'_>) {
        let (Some(fill), Some(picker)) = (self.fill, &self.picker) else {
            return;
        };
        if let Some(layer) = ctx.tree.layer_mut(fill) {
            layer.set_content(LayerContent::ViewFill {
                color: picker.value().color,
            });
        }
    }
}

impl Test for ClearBackgroundTest {
    fn name(&self) -> &str {
        "ClearBackground"
    }

    fn description(&self) -> &str {
        "Fills the view with a solid colour, including a translucent one."
    }

    fn init(&mut self, ctx: &mut TestContext<'_>) {
        let fill = ctx.tree.add(ctx.root, LayerContent::ViewFill { color: [0.0; 4] });
        if let Some(layer) = ctx.tree.layer_mut(fill) {
            // above the harness background, below everything else
            layer.set_depth(-1.0);
        }
        self.fill = Some(fill);

        let picker = NToggle::with_format(
            "Color",
            SWATCHES.to_vec(),
            |s: &Swatch| s.name.to_string(),
            ctx.tree,
            ctx.root,
            Action::Test(PICK_COLOR),
            ctx.ui,
        );
        if let Some(layer) = ctx.tree.layer_mut(picker.layer()) {
            layer.set_translation(20.0, 20.0);
        }
        self.picker = Some(picker);
        self.apply(ctx);
    }

    fn on_action(&mut self, ctx: &mut TestContext<'_>, tag: u32) {
        if tag != PICK_COLOR {
            return;
        }
        if let Some(picker) = self.picker.as_mut() {
            picker.advance(ctx.tree, ctx.ui);
        }
        self.apply(ctx);
    }

    fn dispose(&mut self) {
        self.fill = None;
        self.picker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{label_text, run};
    use vt_platform::window::PlatformCaps;

    fn fill_color(tree: &vt_core::scene::LayerTree<Action>, id: LayerId) -> Option<[f32; 4]> {
        match tree.get(id).map(|l| l.content()) {
            Some(LayerContent::ViewFill { color }) => Some(*color),
            _ => None,
        }
    }

    #[test]
    fn starts_red_and_cycles_through_swatches() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = ClearBackgroundTest::default();
            test.init(ctx);
            let first = test.fill.and_then(|id| fill_color(ctx.tree, id));
            for _ in 0..SWATCHES.len() - 1 {
                test.on_action(ctx, PICK_COLOR);
            }
            (first, test.fill, test.picker.as_ref().map(|p| p.layer()))
        });

        let (first, Some(fill), Some(picker)) = out.result else {
            panic!("test did not build its layers");
        };
        assert_eq!(first, Some(SWATCHES[0].color));
        assert_eq!(fill_color(&out.tree, fill), Some(SWATCHES[4].color));
        assert_eq!(
            label_text(&out.tree, picker).as_deref(),
            Some("Color: translucent gray")
        );
    }

    #[test]
    fn fill_paints_behind_the_picker() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = ClearBackgroundTest::default();
            test.init(ctx);
            test.fill
        });
        let fill = out.result.expect("fill layer");
        let items = out.tree.flatten(glam::Vec2::new(800.0, 600.0));
        assert_eq!(items.first().map(|i| i.layer), Some(fill));
    }

    #[test]
    fn foreign_actions_are_ignored() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = ClearBackgroundTest::default();
            test.init(ctx);
            test.on_action(ctx, PICK_COLOR + 1);
            test.picker.as_ref().map(|p| p.value_idx())
        });
        assert_eq!(out.result, Some(0));
    }
}
