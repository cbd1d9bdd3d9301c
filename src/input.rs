//! Keyboard input: raw window events in, per-frame intents out.
//!
//! Flow per frame:
//! 1. `render::app` converts winit events into `InputEvent`s and pushes them onto an
//!    `EventQueue` as they arrive.
//! 2. The game drains the queue, folding key presses/releases into a `KeyState`.
//! 3. `sample()` reduces the held keys to an `Intent`.
//!
//! Only the last step is consulted by the update step, so how long a key has been
//! held never matters: a held arrow moves the shape by the same amount every frame.

use std::collections::{HashSet, VecDeque};

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The per-frame reduction of the keyboard state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    /// -1 (left), 0, or 1 (right).
    pub move_x: i8,
    /// -1 (up), 0, or 1 (down).
    pub move_y: i8,
    pub grow: bool,
    pub shrink: bool,
}

impl Intent {
    pub const NONE: Self = Self {
        move_x: 0,
        move_y: 0,
        grow: false,
        shrink: false,
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Which physical keys drive which intent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub grow: KeyCode,
    pub shrink: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            grow: KeyCode::KeyZ,
            shrink: KeyCode::KeyX,
        }
    }
}

/// Window events the game cares about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    CloseRequested,
    Key { code: KeyCode, pressed: bool },
    /// The window lost keyboard focus; release events for held keys will never arrive.
    FocusLost,
}

impl InputEvent {
    /// Convert a winit window event, dropping anything the game ignores.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CloseRequested => Some(Self::CloseRequested),
            WindowEvent::Focused(false) => Some(Self::FocusLost),
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => Some(Self::Key {
                    code,
                    pressed: event.state == ElementState::Pressed,
                }),
                PhysicalKey::Unidentified(_) => None,
            },
            _ => None,
        }
    }
}

/// Pending events, drained once per frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// True if a close request is waiting; the loop uses this to skip the frame wait.
    pub fn close_pending(&self) -> bool {
        self.pending.contains(&InputEvent::CloseRequested)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every event queued so far, oldest first.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, InputEvent> {
        self.pending.drain(..)
    }
}

/// The set of physical keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<KeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: KeyCode) {
        self.held.insert(code);
    }

    pub fn release(&mut self, code: KeyCode) {
        self.held.remove(&code);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    #[inline]
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Fold one event into the key set. Close requests are not key events and are ignored.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key {
                code,
                pressed: true,
            } => self.press(code),
            InputEvent::Key {
                code,
                pressed: false,
            } => self.release(code),
            InputEvent::FocusLost => self.release_all(),
            InputEvent::CloseRequested => {}
        }
    }
}

/// Reduce held keys to an intent. Opposite directions held together cancel out.
pub fn sample(keys: &KeyState, bindings: &KeyBindings) -> Intent {
    let axis = |neg: KeyCode, pos: KeyCode| -> i8 {
        keys.is_held(pos) as i8 - keys.is_held(neg) as i8
    };

    Intent {
        move_x: axis(bindings.left, bindings.right),
        move_y: axis(bindings.up, bindings.down),
        grow: keys.is_held(bindings.grow),
        shrink: keys.is_held(bindings.shrink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(codes: &[KeyCode]) -> KeyState {
        let mut keys = KeyState::new();
        for &c in codes {
            keys.press(c);
        }
        keys
    }

    #[test]
    fn no_keys_yields_zero_intent() {
        let intent = sample(&KeyState::new(), &KeyBindings::default());
        assert!(intent.is_none());
    }

    #[test]
    fn arrows_map_to_axes_with_up_negative() {
        let b = KeyBindings::default();
        assert_eq!(sample(&held(&[KeyCode::ArrowLeft]), &b).move_x, -1);
        assert_eq!(sample(&held(&[KeyCode::ArrowRight]), &b).move_x, 1);
        assert_eq!(sample(&held(&[KeyCode::ArrowUp]), &b).move_y, -1);
        assert_eq!(sample(&held(&[KeyCode::ArrowDown]), &b).move_y, 1);
    }

    #[test]
    fn opposite_arrows_cancel() {
        let intent = sample(
            &held(&[KeyCode::ArrowLeft, KeyCode::ArrowRight, KeyCode::ArrowUp]),
            &KeyBindings::default(),
        );
        assert_eq!(intent.move_x, 0);
        assert_eq!(intent.move_y, -1);
    }

    #[test]
    fn z_and_x_grow_and_shrink() {
        let intent = sample(
            &held(&[KeyCode::KeyZ, KeyCode::KeyX]),
            &KeyBindings::default(),
        );
        assert!(intent.grow);
        assert!(intent.shrink);
        assert_eq!((intent.move_x, intent.move_y), (0, 0));
    }

    #[test]
    fn custom_bindings_are_honored() {
        let b = KeyBindings {
            grow: KeyCode::Equal,
            shrink: KeyCode::Minus,
            ..Default::default()
        };
        let intent = sample(&held(&[KeyCode::Equal, KeyCode::KeyZ]), &b);
        assert!(intent.grow);
        assert!(!intent.shrink);
    }

    #[test]
    fn release_and_focus_loss_clear_keys() {
        let mut keys = KeyState::new();
        keys.apply(InputEvent::Key {
            code: KeyCode::ArrowRight,
            pressed: true,
        });
        keys.apply(InputEvent::Key {
            code: KeyCode::KeyZ,
            pressed: true,
        });
        keys.apply(InputEvent::Key {
            code: KeyCode::ArrowRight,
            pressed: false,
        });
        assert!(!keys.is_held(KeyCode::ArrowRight));
        assert!(keys.is_held(KeyCode::KeyZ));

        keys.apply(InputEvent::FocusLost);
        assert!(!keys.is_held(KeyCode::KeyZ));
    }

    #[test]
    fn queue_drains_in_order_and_empties() {
        let mut q = EventQueue::new();
        q.push(InputEvent::Key {
            code: KeyCode::ArrowUp,
            pressed: true,
        });
        q.push(InputEvent::CloseRequested);
        assert!(q.close_pending());
        assert_eq!(q.len(), 2);

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained.last(), Some(&InputEvent::CloseRequested));
        assert!(q.is_empty());
        assert!(!q.close_pending());
        assert_eq!(q.drain().count(), 0);
    }

    #[test]
    fn window_events_convert() {
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::CloseRequested),
            Some(InputEvent::CloseRequested)
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Focused(false)),
            Some(InputEvent::FocusLost)
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Focused(true)),
            None
        );
    }
}
