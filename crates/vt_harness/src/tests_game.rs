//! The harness: test menu, test lifecycle and the global exit gestures.
//!
//! Nothing here touches the window or the GPU. The shell in `main.rs` feeds
//! translated input events in, drains next-frame tasks at the top of every
//! frame, and renders whatever is in `tree()`.

use glam::Vec2;
use vt_core::assets::Assets;
use vt_core::exec::TaskQueue;
use vt_core::input::{KeyEvent, MouseBtn, MouseButtonEvent, Phase, PointerEvent, TouchEvent};
use vt_core::layout::FlowLayout;
use vt_core::router::{InputRouter, Route};
use vt_core::scene::{LayerContent, LayerTree};
use vt_core::time::Clock;
use vt_platform::window::PlatformCaps;

use crate::test::{Action, PlatformRequest, Test, TestContext};
use crate::ui::Ui;

const MENU_GAP: f32 = 20.0;
const BACK_INSET: f32 = 10.0;
const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Describes the output surface on the menu status line.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayInfo {
    pub renderer: String,
    pub screen: Option<(u32, u32)>,
}

enum Task {
    DisplayMenu,
}

pub struct TestsGame {
    tests: Vec<Box<dyn Test>>,
    current: Option<usize>,
    tree: LayerTree<Action>,
    router: InputRouter,
    tasks: TaskQueue<Task>,
    assets: Assets,
    ui: Ui,
    caps: PlatformCaps,
    view: Vec2,
    info: DisplayInfo,
    debug_rects: bool,
    requests: Vec<PlatformRequest>,
}

impl TestsGame {
    pub fn new(
        tests: Vec<Box<dyn Test>>,
        assets: Assets,
        ui: Ui,
        caps: PlatformCaps,
        view: Vec2,
        info: DisplayInfo,
    ) -> Self {
        log::info!("Right click, touch with two fingers, or type ESC to return to test menu.");
        Self {
            tests,
            current: None,
            tree: LayerTree::new(),
            router: InputRouter::new(),
            tasks: TaskQueue::new(),
            assets,
            ui,
            caps,
            view,
            info,
            debug_rects: false,
            requests: Vec::new(),
        }
    }

    /// Builds the menu, then starts `start_test` if one was requested.
    pub fn start(&mut self, start_test: Option<usize>) {
        self.display_menu();
        if let Some(index) = start_test {
            self.start_test(index);
        }
    }

    pub fn tree(&self) -> &LayerTree<Action> {
        &self.tree
    }

    pub fn view(&self) -> Vec2 {
        self.view
    }

    pub fn debug_rects(&self) -> bool {
        self.debug_rects
    }

    pub fn is_menu_showing(&self) -> bool {
        self.current.is_none()
    }

    pub fn current_name(&self) -> &str {
        self.current
            .and_then(|i| self.tests.get(i))
            .map_or("Menu", |t| t.name())
    }

    pub fn set_display_info(&mut self, info: DisplayInfo) {
        self.info = info;
    }

    pub fn take_platform_requests(&mut self) -> Vec<PlatformRequest> {
        std::mem::take(&mut self.requests)
    }

    fn status_line(&self) -> String {
        let screen = match self.info.screen {
            Some((w, h)) => format!("{w}x{h}"),
            None => "unknown".to_string(),
        };
        format!(
            "Renderer: {} / Screen: {} / Window: {}x{}",
            self.info.renderer,
            screen,
            self.view.x.round() as u32,
            self.view.y.round() as u32
        )
    }

    fn reset_root(&mut self) {
        let root = self.tree.root();
        self.tree.dispose_all(root);
        let bg = self.tree.add(root, LayerContent::ViewFill { color: BACKGROUND });
        if let Some(layer) = self.tree.layer_mut(bg) {
            layer.set_depth(f32::NEG_INFINITY);
        }
    }

    pub fn display_menu(&mut self) {
        self.clear_test();
        self.reset_root();
        let root = self.tree.root();

        let status = self.ui.format_text(&self.status_line(), false);
        let status_height = status.size.y;
        self.tree
            .add_at(root, LayerContent::Label(status), MENU_GAP, MENU_GAP);

        let mut layout = FlowLayout::new(
            self.view.x,
            MENU_GAP,
            MENU_GAP + status_height + MENU_GAP,
        );
        let mut shown = 0usize;
        for (index, test) in self.tests.iter().enumerate() {
            if !test.available(&self.caps) {
                continue;
            }
            let pos = layout.place(self.ui.button_size(test.name()));
            self.ui.create_button(
                &mut self.tree,
                root,
                test.name(),
                Action::StartTest(index),
                pos.x,
                pos.y,
            );
            shown += 1;
        }
        log::debug!("Menu shows {shown} of {} tests", self.tests.len());
    }

    /// Shows the menu at the start of the next frame, so the event that asked
    /// for it is not also handled by the new menu.
    pub fn display_menu_later(&mut self) {
        self.tasks.invoke_later(Task::DisplayMenu);
    }

    fn clear_test(&mut self) {
        if let Some(index) = self.current.take() {
            if let Some(test) = self.tests.get_mut(index) {
                log::debug!("Disposing {}", test.name());
                test.dispose();
            }
        }
    }

    /// Returns false when `index` names no test that can run here.
    pub fn start_test(&mut self, index: usize) -> bool {
        let Some(test) = self.tests.get(index) else {
            log::warn!(
                "No test #{index}; {} tests are registered",
                self.tests.len()
            );
            return false;
        };
        if !test.available(&self.caps) {
            log::warn!("Test '{}' is not available on this platform", test.name());
            return false;
        }

        self.clear_test();
        self.current = Some(index);
        self.reset_root();

        if let Some(test) = self.tests.get(index) {
            log::info!("Starting {}", test.name());
            log::info!(" Description: {}", test.description());
        }
        self.with_current(|test, ctx| test.init(ctx));

        let root = self.tree.root();
        let back_size = self.ui.button_size("Back");
        let back = self.ui.create_button(
            &mut self.tree,
            root,
            "Back",
            Action::BackToMenu,
            self.view.x - back_size.x - BACK_INSET,
            BACK_INSET,
        );
        if let Some(layer) = self.tree.layer_mut(back) {
            layer.set_depth(f32::INFINITY);
        }
        true
    }

    fn with_current<R>(
        &mut self,
        f: impl FnOnce(&mut dyn Test, &mut TestContext<'_>) -> R,
    ) -> Option<R> {
        let test = self.tests.get_mut(self.current?)?;
        let mut ctx = TestContext::new(
            &mut self.tree,
            &self.assets,
            &self.ui,
            self.view,
            self.caps,
            &mut self.requests,
        );
        Some(f(test.as_mut(), &mut ctx))
    }

    fn positional_test(&self) -> bool {
        self.current
            .and_then(|i| self.tests.get(i))
            .is_some_and(|t| t.uses_positional_inputs())
    }

    /// Runs tasks queued before this frame began.
    pub fn run_tasks(&mut self) {
        for task in self.tasks.take_ready() {
            match task {
                Task::DisplayMenu => self.display_menu(),
            }
        }
    }

    pub fn update(&mut self, delta_ms: u32) {
        self.with_current(|test, ctx| test.update(ctx, delta_ms));
    }

    pub fn paint(&mut self, clock: &Clock) {
        self.with_current(|test, ctx| test.paint(ctx, clock));
    }

    fn apply_route(&mut self, route: Route) {
        match route {
            Route::Pass => {}
            Route::MenuNextFrame => self.display_menu_later(),
            Route::MenuNow => self.display_menu(),
            Route::DebugRects {
                enabled,
                dump_layers,
            } => {
                self.debug_rects = enabled;
                if dump_layers {
                    self.tree.debug_print();
                }
            }
        }
    }

    pub fn on_key(&mut self, event: &KeyEvent) {
        let route = self.router.on_key(event);
        self.apply_route(route);
    }

    pub fn on_mouse_button(&mut self, event: &MouseButtonEvent) {
        let positional = self.positional_test();
        let route = self.router.on_mouse_button(event, positional);
        self.apply_route(route);
        match event.button {
            MouseBtn::Left => {
                let phase = if event.down { Phase::Start } else { Phase::End };
                self.on_pointer(&PointerEvent {
                    phase,
                    x: event.x,
                    y: event.y,
                    is_touch: false,
                });
            }
            MouseBtn::Back if event.down => {
                self.on_hardware_back();
            }
            _ => {}
        }
    }

    pub fn on_mouse_move(&mut self, x: f32, y: f32, left_held: bool) {
        if left_held {
            self.on_pointer(&PointerEvent {
                phase: Phase::Move,
                x,
                y,
                is_touch: false,
            });
        }
    }

    pub fn on_touches(&mut self, events: &[TouchEvent]) {
        let positional = self.positional_test();
        let route = self.router.on_touches(events, positional);
        self.apply_route(route);
        for touch in events {
            self.on_pointer(&PointerEvent::from_touch(touch));
        }
    }

    /// Activates the layer under a starting pointer, then forwards the event
    /// to the running test unless the activation switched tests.
    pub fn on_pointer(&mut self, event: &PointerEvent) {
        let before = self.current;
        if event.phase == Phase::Start {
            if let Some((_, action)) = self.tree.hit_test(event.x, event.y, self.view) {
                self.activate(action);
            }
        }
        if self.current.is_some() && self.current == before {
            self.with_current(|test, ctx| test.on_pointer(ctx, event));
        }
    }

    fn activate(&mut self, action: Action) {
        match action {
            Action::StartTest(index) => {
                self.start_test(index);
            }
            Action::BackToMenu => self.display_menu_later(),
            Action::Test(tag) => {
                self.with_current(|test, ctx| test.on_action(ctx, tag));
            }
        }
    }

    /// Platform back button. Returns true when it was used to leave a test.
    pub fn on_hardware_back(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.display_menu_later();
        true
    }

    pub fn resize(&mut self, view: Vec2) {
        if view == self.view {
            return;
        }
        self.view = view;
        if self.current.is_none() {
            self.display_menu();
        }
    }
}
