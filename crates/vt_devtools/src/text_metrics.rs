//! Label measurement backed by the same egui fonts the overlay paints with.

use glam::Vec2;
use vt_core::text::TextMetrics;

/// Font every scene label is painted in.
pub fn label_font(font_size: f32) -> egui::FontId {
    egui::FontId::proportional(font_size)
}

/// egui only creates its fonts inside `Context::run`. Runs one empty pass so
/// measurement works before the first real frame. The returned delta holds
/// the font atlas and must reach the renderer.
pub fn warm_up(ctx: &egui::Context) -> egui::TexturesDelta {
    ctx.run(egui::RawInput::default(), |_| {}).textures_delta
}

/// Measures text with egui's font layout. The context must have run at least
/// once (see `warm_up`).
#[derive(Clone)]
pub struct EguiMetrics {
    ctx: egui::Context,
}

impl EguiMetrics {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl TextMetrics for EguiMetrics {
    fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        let size = self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(
                    text.to_owned(),
                    label_font(font_size),
                    egui::Color32::BLACK,
                )
                .size()
        });
        Vec2::new(size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> EguiMetrics {
        let ctx = egui::Context::default();
        let delta = warm_up(&ctx);
        assert!(!delta.set.is_empty(), "font atlas should be created");
        EguiMetrics::new(ctx)
    }

    #[test]
    fn wide_glyphs_measure_wider_than_narrow_ones() {
        let metrics = metrics();
        let wide = metrics.measure("WWWWMMMM", 16.0);
        let narrow = metrics.measure("iiiiiiii", 16.0);
        assert!(wide.x > narrow.x * 2.0, "{wide:?} vs {narrow:?}");
        assert_eq!(wide.y, narrow.y);
    }

    #[test]
    fn measurement_matches_painted_galley() {
        let metrics = metrics();
        let painted = metrics.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(
                    "ClearBackground".to_owned(),
                    label_font(16.0),
                    egui::Color32::BLACK,
                )
                .size()
        });
        let measured = metrics.measure("ClearBackground", 16.0);
        assert_eq!(measured, Vec2::new(painted.x, painted.y));
    }

    #[test]
    fn size_scales_with_font_size() {
        let metrics = metrics();
        let small = metrics.measure("Back", 10.0);
        let large = metrics.measure("Back", 20.0);
        assert!(large.x > small.x * 1.5);
        assert!(large.y > small.y);
    }

    #[test]
    fn extra_lines_add_height() {
        let metrics = metrics();
        let one = metrics.measure("Back", 16.0);
        let two = metrics.measure("Back\nBack", 16.0);
        assert!(two.y > one.y * 1.5);
        assert_eq!(two.x, one.x);
    }
}
