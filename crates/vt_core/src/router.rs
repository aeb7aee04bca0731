//! Decides which raw input events navigate back to the test menu.
//!
//! Exit gestures (right click, a second simultaneous touch) are only watched
//! while the active test does not consume positional input itself. The
//! keyboard shortcuts are always live.

use std::collections::HashSet;

use crate::input::{Key, KeyEvent, MouseBtn, MouseButtonEvent, Phase, TouchEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not an exit gesture; leave it to pointer dispatch and the active test.
    Pass,
    /// Show the menu on the next frame so the triggering event is not also
    /// delivered to the freshly built menu.
    MenuNextFrame,
    MenuNow,
    DebugRects { enabled: bool, dump_layers: bool },
}

#[derive(Debug, Default)]
pub struct InputRouter {
    active_touches: HashSet<u64>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mouse_button(&mut self, event: &MouseButtonEvent, positional_test: bool) -> Route {
        if positional_test {
            return Route::Pass;
        }
        if event.button == MouseBtn::Right && event.down {
            Route::MenuNextFrame
        } else {
            Route::Pass
        }
    }

    /// Handles one platform batch of touches. The batch kind is taken from its
    /// first event. Ended touches are always forgotten, so a finger lifted
    /// inside a positional test cannot count towards a later gesture.
    pub fn on_touches(&mut self, events: &[TouchEvent], positional_test: bool) -> Route {
        let Some(first) = events.first() else {
            return Route::Pass;
        };
        match first.phase {
            Phase::Start if positional_test => {}
            Phase::Start => {
                self.active_touches.extend(events.iter().map(|e| e.id));
                if self.active_touches.len() > 1 {
                    return Route::MenuNextFrame;
                }
            }
            Phase::End | Phase::Cancel => {
                for event in events {
                    self.active_touches.remove(&event.id);
                }
            }
            Phase::Move => {}
        }
        Route::Pass
    }

    pub fn on_key(&self, event: &KeyEvent) -> Route {
        match event.key {
            Key::Escape if event.down => Route::MenuNow,
            Key::D => Route::DebugRects {
                enabled: event.down,
                dump_layers: event.down && event.is_shift_down(),
            },
            _ => Route::Pass,
        }
    }

    pub fn active_touch_count(&self) -> usize {
        self.active_touches.len()
    }
}
