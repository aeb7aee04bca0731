//! Input events and the little state needed to build them.
//!
//! The harness is event driven: every platform event is translated into one of
//! the event structs below and handed to the router and the active test as it
//! arrives. `InputState` remembers the Shift modifier, the held mouse buttons
//! and the cursor position, since winit reports those separately.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    D,
    F3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
    Back,
}

/// Phase shared by pointer and touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub down: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn is_shift_down(&self) -> bool {
        self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    pub button: MouseBtn,
    pub down: bool,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: Phase,
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

/// Unified positional input: the left mouse button and every touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: Phase,
    pub x: f32,
    pub y: f32,
    pub is_touch: bool,
}

impl PointerEvent {
    pub fn from_touch(touch: &TouchEvent) -> Self {
        Self {
            phase: touch.phase,
            x: touch.x,
            y: touch.y,
            is_touch: true,
        }
    }
}

pub struct InputState {
    mouse_held: HashSet<MouseBtn>,
    shift: bool,

    pub mouse_position: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_held: HashSet::new(),
            shift: false,
            mouse_position: (0.0, 0.0),
        }
    }

    /// Key event stamped with the current Shift state.
    pub fn key(&self, key: Key, down: bool) -> KeyEvent {
        KeyEvent {
            key,
            down,
            shift: self.shift,
        }
    }

    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// Records a mouse button transition at the current cursor position.
    /// Returns `None` for a release of a button that was never pressed.
    pub fn mouse_button(&mut self, button: MouseBtn, down: bool) -> Option<MouseButtonEvent> {
        let changed = if down {
            self.mouse_held.insert(button)
        } else {
            self.mouse_held.remove(&button)
        };
        if !changed && !down {
            return None;
        }
        Some(MouseButtonEvent {
            button,
            down,
            x: self.mouse_position.0,
            y: self.mouse_position.1,
        })
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_carries_shift_modifier() {
        let mut input = InputState::new();
        input.set_shift(true);
        let event = input.key(Key::D, true);
        assert!(event.down);
        assert!(event.is_shift_down());

        input.set_shift(false);
        let event = input.key(Key::D, false);
        assert!(!event.down);
        assert!(!event.is_shift_down());
    }

    #[test]
    fn mouse_button_uses_cursor_position() {
        let mut input = InputState::new();
        input.mouse_position = (12.0, 34.0);
        let event = input.mouse_button(MouseBtn::Right, true).expect("press event");
        assert_eq!(event.button, MouseBtn::Right);
        assert_eq!((event.x, event.y), (12.0, 34.0));
        assert!(input.is_mouse_held(MouseBtn::Right));
    }

    #[test]
    fn stray_mouse_release_is_dropped() {
        let mut input = InputState::new();
        assert!(input.mouse_button(MouseBtn::Left, false).is_none());
        input.mouse_button(MouseBtn::Left, true);
        assert!(input.mouse_button(MouseBtn::Left, false).is_some());
        assert!(!input.is_mouse_held(MouseBtn::Left));
    }

    #[test]
    fn pointer_from_touch_keeps_phase_and_position() {
        let touch = TouchEvent {
            phase: Phase::Cancel,
            id: 7,
            x: 5.0,
            y: 6.0,
        };
        let pointer = PointerEvent::from_touch(&touch);
        assert_eq!(pointer.phase, Phase::Cancel);
        assert!(pointer.is_touch);
        assert_eq!((pointer.x, pointer.y), (5.0, 6.0));
    }
}
