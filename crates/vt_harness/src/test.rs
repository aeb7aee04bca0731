//! The contract between the harness and each visual test.

use glam::Vec2;
use vt_core::assets::Assets;
use vt_core::input::PointerEvent;
use vt_core::scene::{LayerId, LayerTree};
use vt_core::time::Clock;
use vt_platform::window::PlatformCaps;

use crate::ui::Ui;

/// Payload carried by activatable layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartTest(usize),
    BackToMenu,
    /// A layer owned by the running test; the tag is the test's own.
    Test(u32),
}

/// Window-level changes a test can ask for. Applied by the shell after the
/// current callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformRequest {
    Fullscreen(bool),
}

pub struct TestContext<'a> {
    pub tree: &'a mut LayerTree<Action>,
    pub root: LayerId,
    pub assets: &'a Assets,
    pub ui: &'a Ui,
    pub view: Vec2,
    pub caps: PlatformCaps,
    requests: &'a mut Vec<PlatformRequest>,
}

impl<'a> TestContext<'a> {
    pub fn new(
        tree: &'a mut LayerTree<Action>,
        assets: &'a Assets,
        ui: &'a Ui,
        view: Vec2,
        caps: PlatformCaps,
        requests: &'a mut Vec<PlatformRequest>,
    ) -> Self {
        let root = tree.root();
        Self {
            tree,
            root,
            assets,
            ui,
            view,
            caps,
            requests,
        }
    }

    pub fn request(&mut self, request: PlatformRequest) {
        self.requests.push(request);
    }
}

/// A single visual test.
///
/// A test instance lives for the whole run and is re-initialised every time
/// it is started, so `init` must reset any state a previous run left behind.
/// Layers added under `ctx.root` are disposed by the harness when the test
/// ends; `dispose` only needs to drop what the test holds itself.
pub trait Test {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    fn available(&self, _caps: &PlatformCaps) -> bool {
        true
    }

    /// True when the test consumes raw pointer and touch input itself, which
    /// turns off the right-click and two-finger exit gestures.
    fn uses_positional_inputs(&self) -> bool {
        false
    }

    fn init(&mut self, ctx: &mut TestContext<'_>);

    /// Fixed-rate step.
    fn update(&mut self, _ctx: &mut TestContext<'_>, _delta_ms: u32) {}

    /// Once per rendered frame.
    fn paint(&mut self, _ctx: &mut TestContext<'_>, _clock: &Clock) {}

    fn on_pointer(&mut self, _ctx: &mut TestContext<'_>, _event: &PointerEvent) {}

    fn on_action(&mut self, _ctx: &mut TestContext<'_>, _tag: u32) {}

    fn dispose(&mut self) {}
}
