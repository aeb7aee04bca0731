use std::collections::VecDeque;

use glam::Vec2;
use vt_core::input::{Phase, PointerEvent};
use vt_core::scene::{LayerContent, LayerId};
use vt_core::toggle::Toggle;

use crate::test::{Action, Test, TestContext};

const LOGGING: u32 = 0;
const MAX_MARKERS: usize = 64;
const MARKER_SIZE: f32 = 6.0;
const MOUSE_MARKER: [f32; 4] = [0.2, 0.4, 1.0, 1.0];
const TOUCH_MARKER: [f32; 4] = [1.0, 0.5, 0.0, 1.0];

/// Leaves a marker wherever the pointer goes and reports the latest event.
/// Consumes positional input, so only Escape and the Back button leave it.
#[derive(Default)]
pub struct PointerInputTest {
    logging: Option<Toggle>,
    status: Option<LayerId>,
    markers: VecDeque<LayerId>,
}

fn describe(event: &PointerEvent) -> String {
    format!(
        "{:?} {} at ({:.0}, {:.0})",
        event.phase,
        if event.is_touch { "touch" } else { "mouse" },
        event.x,
        event.y
    )
}

impl PointerInputTest {
    fn add_marker(&mut self, ctx: &mut TestContext<'_>, event: &PointerEvent) {
        let color = if event.is_touch { TOUCH_MARKER } else { MOUSE_MARKER };
        let id = ctx.tree.add_at(
            ctx.root,
            LayerContent::Solid {
                size: Vec2::splat(MARKER_SIZE),
                color,
            },
            event.x,
            event.y,
        );
        if let Some(layer) = ctx.tree.layer_mut(id) {
            layer.set_origin(MARKER_SIZE / 2.0, MARKER_SIZE / 2.0);
        }
        self.markers.push_back(id);
        while self.markers.len() > MAX_MARKERS {
            if let Some(oldest) = self.markers.pop_front() {
                ctx.tree.dispose(oldest);
            }
        }
    }
}

impl Test for PointerInputTest {
    fn name(&self) -> &str {
        "PointerInput"
    }

    fn description(&self) -> &str {
        "Tracks mouse and touch input as a single pointer stream."
    }

    fn uses_positional_inputs(&self) -> bool {
        true
    }

    fn init(&mut self, ctx: &mut TestContext<'_>) {
        self.markers.clear();
        let logging = Toggle::toggle(
            "Log events",
            ctx.tree,
            ctx.root,
            Action::Test(LOGGING),
            ctx.ui,
        );
        if let Some(layer) = ctx.tree.layer_mut(logging.layer()) {
            layer.set_translation(20.0, 20.0);
        }
        self.logging = Some(logging);

        let hint = if ctx.caps.touch {
            "Touch and drag anywhere"
        } else {
            "Press and drag anywhere"
        };
        let status = ctx.ui.format_text(hint, true);
        self.status = Some(
            ctx.tree
                .add_at(ctx.root, LayerContent::Label(status), 20.0, 70.0),
        );
    }

    fn on_pointer(&mut self, ctx: &mut TestContext<'_>, event: &PointerEvent) {
        let text = describe(event);
        if self.logging.as_ref().is_some_and(|t| *t.value()) {
            log::info!("Pointer {text}");
        }
        if let Some(id) = self.status {
            let label = ctx.ui.format_text(&text, true);
            if let Some(layer) = ctx.tree.layer_mut(id) {
                layer.set_content(LayerContent::Label(label));
            }
        }
        if matches!(event.phase, Phase::Start | Phase::Move) {
            self.add_marker(ctx, event);
        }
    }

    fn on_action(&mut self, ctx: &mut TestContext<'_>, tag: u32) {
        if tag != LOGGING {
            return;
        }
        if let Some(logging) = self.logging.as_mut() {
            logging.advance(ctx.tree, ctx.ui);
            log::info!(
                "Pointer event logging {}",
                if *logging.value() { "enabled" } else { "disabled" }
            );
        }
    }

    fn dispose(&mut self) {
        self.logging = None;
        self.status = None;
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{label_text, run};
    use vt_platform::window::PlatformCaps;

    fn pointer(phase: Phase, x: f32, y: f32) -> PointerEvent {
        PointerEvent {
            phase,
            x,
            y,
            is_touch: false,
        }
    }

    #[test]
    fn markers_follow_start_and_move_only() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = PointerInputTest::default();
            test.init(ctx);
            test.on_pointer(ctx, &pointer(Phase::Start, 100.0, 100.0));
            test.on_pointer(ctx, &pointer(Phase::Move, 110.0, 105.0));
            test.on_pointer(ctx, &pointer(Phase::End, 110.0, 105.0));
            (test.markers.iter().copied().collect::<Vec<_>>(), test.status)
        });

        let (markers, status) = out.result;
        assert_eq!(markers.len(), 2);
        let first = out.tree.get(markers[0]).expect("marker");
        assert_eq!(first.translation(), Vec2::new(100.0, 100.0));
        let status = status.expect("status label");
        assert_eq!(
            label_text(&out.tree, status).as_deref(),
            Some("End mouse at (110, 105)")
        );
    }

    #[test]
    fn marker_trail_is_bounded() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = PointerInputTest::default();
            test.init(ctx);
            for i in 0..(MAX_MARKERS + 10) {
                test.on_pointer(ctx, &pointer(Phase::Move, i as f32, 0.0));
            }
            test.markers.len()
        });
        assert_eq!(out.result, MAX_MARKERS);
        // root, toggle, status and the live markers
        assert_eq!(out.tree.len(), 3 + MAX_MARKERS);
    }

    #[test]
    fn logging_toggle_flips_on_action() {
        let out = run(PlatformCaps::default(), |ctx| {
            let mut test = PointerInputTest::default();
            test.init(ctx);
            test.on_action(ctx, LOGGING);
            test.logging.as_ref().map(|t| (*t.value(), t.layer()))
        });
        let (enabled, layer) = out.result.expect("toggle");
        assert!(enabled);
        assert_eq!(
            label_text(&out.tree, layer).as_deref(),
            Some("Log events: true")
        );
    }
}
