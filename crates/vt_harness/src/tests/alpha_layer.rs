use std::sync::Arc;

use vt_core::assets::{collect, Collect, CollectPoll, Image, TextureConfig};
use vt_core::scene::{LayerContent, LayerId};
use vt_core::time::Clock;
use vt_core::toggle::NToggle;

use crate::test::{Action, Test, TestContext};

const IMAGE: &str = "images/princess.png";
const ALPHAS: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
const PICK_ALPHA: u32 = 0;

fn percent(alpha: &f32) -> String {
    format!("{:.0}%", alpha * 100.0)
}

/// One image at a ladder of alpha values, plus a larger copy whose alpha is
/// picked with a toggle.
#[derive(Default)]
pub struct AlphaLayerTest {
    pending: Option<Collect>,
    picker: Option<NToggle<f32>>,
    highlight: Option<LayerId>,
}

impl AlphaLayerTest {
    fn build(&mut self, ctx: &mut TestContext<'_>, image: &Arc<Image>) {
        let step = image.width() as f32 + 20.0;
        for (i, alpha) in ALPHAS.iter().enumerate() {
            let x = 20.0 + i as f32 * step;
            let id = ctx.tree.add_at(
                ctx.root,
                LayerContent::Image {
                    image: image.clone(),
                    config: TextureConfig::DEFAULT,
                },
                x,
                60.0,
            );
            if let Some(layer) = ctx.tree.layer_mut(id) {
                layer.set_alpha(*alpha);
            }
            let caption = ctx.ui.format_text(&percent(alpha), false);
            ctx.tree.add_at(
                ctx.root,
                LayerContent::Label(caption),
                x,
                70.0 + image.height() as f32,
            );
        }

        let top = 120.0 + image.height() as f32;
        let highlight = ctx.tree.add_at(
            ctx.root,
            LayerContent::Image {
                image: image.clone(),
                config: TextureConfig::DEFAULT,
            },
            20.0,
            top,
        );
        if let Some(layer) = ctx.tree.layer_mut(highlight) {
            layer.set_scale(2.0);
        }
        self.highlight = Some(highlight);
        self.apply_alpha(ctx);
    }

    fn apply_alpha(&self, ctx: &mut TestContext<'_>) {
        let (Some(picker), Some(id)) = (&self.picker, self.highlight) else {
            return;
        };
        if let Some(layer) = ctx.tree.layer_mut(id) {
            layer.set_alpha(*picker.value());
        }
    }
}

impl Test for AlphaLayerTest {
    fn name(&self) -> &str {
        "AlphaLayer"
    }

    fn description(&self) -> &str {
        "Draws an image with a range of layer alpha values."
    }

    fn init(&mut self, ctx: &mut TestContext<'_>) {
        self.highlight = None;
        let picker = NToggle::with_format(
            "Alpha",
            ALPHAS.to_vec(),
            percent,
            ctx.tree,
            ctx.root,
            Action::Test(PICK_ALPHA),
            ctx.ui,
        );
        if let Some(layer) = ctx.tree.layer_mut(picker.layer()) {
            layer.set_translation(20.0, 20.0);
        }
        self.picker = Some(picker);
        self.pending = Some(collect(vec![ctx.assets.get_image(IMAGE)]));
    }

    fn paint(&mut self, ctx: &mut TestContext<'_>, _clock: &Clock) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        match pending.poll() {
            CollectPoll::Pending => {}
            CollectPoll::Ready(images) => {
                self.pending = None;
                if let Some(image) = images.first() {
                    self.build(ctx, image);
                }
            }
            CollectPoll::Failed(err) => {
                self.pending = None;
                log::error!("AlphaLayer could not load {IMAGE}: {err}");
            }
        }
    }

    fn on_action(&mut self, ctx: &mut TestContext<'_>, tag: u32) {
        if tag != PICK_ALPHA {
            return;
        }
        if let Some(picker) = self.picker.as_mut() {
            picker.advance(ctx.tree, ctx.ui);
        }
        self.apply_alpha(ctx);
    }

    fn dispose(&mut self) {
        self.pending = None;
        self.picker = None;
        self.highlight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{label_text, run};
    use vt_core::assets::ImageFuture;
    use vt_platform::window::PlatformCaps;

    #[test]
    fn picker_cycles_highlight_alpha() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = AlphaLayerTest::default();
            test.init(ctx);
            let image = Arc::new(Image::solid(IMAGE, 16, 16, [255, 0, 0, 255]));
            test.pending = Some(collect(vec![ImageFuture::resolved(Ok(image))]));
            test.paint(
                ctx,
                &Clock { dt_ms: 16.0 },
            );
            test.on_action(ctx, PICK_ALPHA);
            test.on_action(ctx, PICK_ALPHA);
            let picker = test.picker.as_ref().map(|p| p.layer());
            (test.highlight, picker)
        });

        let (Some(highlight), Some(picker)) = out.result else {
            panic!("layers not built");
        };
        assert_eq!(out.tree.get(highlight).map(|l| l.alpha()), Some(0.5));
        assert_eq!(label_text(&out.tree, picker).as_deref(), Some("Alpha: 50%"));
        // five ladder images, five captions, the highlight and the picker
        assert_eq!(out.tree.len(), 1 + 5 + 5 + 1 + 1);
    }

    #[test]
    fn reinit_resets_picker() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = AlphaLayerTest::default();
            test.init(ctx);
            test.on_action(ctx, PICK_ALPHA);
            test.dispose();
            test.init(ctx);
            test.picker.as_ref().map(|p| *p.value())
        });
        assert_eq!(out.result, Some(0.0));
    }
}
