//! Polled input.
//!
//! The frame loop never sees winit events directly. It asks an
//! [`InputSource`] whether the viewer is paused, which bindings are held and
//! how far the mouse moved since it last asked. [`InputState`] is the winit
//! backed implementation.

use std::{collections::HashMap, fmt, str::FromStr};

use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    Forward,
    Back,
    Left,
    Right,
}

impl Binding {
    pub const ALL: [Binding; 4] = [Binding::Forward, Binding::Back, Binding::Left, Binding::Right];

    pub fn name(self) -> &'static str {
        match self {
            Binding::Forward => "forward",
            Binding::Back => "back",
            Binding::Left => "left",
            Binding::Right => "right",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a known binding")]
pub struct UnknownBinding(pub String);

impl FromStr for Binding {
    type Err = UnknownBinding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Binding::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| UnknownBinding(s.to_string()))
    }
}

/// Snapshot of one binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindingState {
    pub is_down: bool,
    /// Went down since the last [`InputState::flush`].
    pub pressed: bool,
    /// Went up since the last [`InputState::flush`].
    pub released: bool,
}

/// What the frame loop reads every frame.
pub trait InputSource {
    fn is_paused(&self) -> bool;

    fn binding(&self, binding: Binding) -> BindingState;

    /// Horizontal mouse movement since the previous call. Positive turns
    /// left.
    fn take_mouse_delta_x(&mut self) -> f32;

    /// Vertical mouse movement since the previous call. Positive looks up.
    fn take_mouse_delta_y(&mut self) -> f32;
}

/// Input collected from winit window and device events.
#[derive(Debug)]
pub struct InputState {
    paused: bool,
    keymap: HashMap<KeyCode, Binding>,
    bindings: [BindingState; Binding::ALL.len()],
    mouse_dx: f64,
    mouse_dy: f64,
}

impl Default for InputState {
    fn default() -> Self {
        Self::with_keymap(default_keymap())
    }
}

/// W/S/A/D.
pub fn default_keymap() -> HashMap<KeyCode, Binding> {
    HashMap::from([
        (KeyCode::KeyW, Binding::Forward),
        (KeyCode::KeyS, Binding::Back),
        (KeyCode::KeyA, Binding::Left),
        (KeyCode::KeyD, Binding::Right),
    ])
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keymap(keymap: HashMap<KeyCode, Binding>) -> Self {
        Self {
            paused: false,
            keymap,
            bindings: Default::default(),
            mouse_dx: 0.0,
            mouse_dy: 0.0,
        }
    }

    /// Tracks focus and bound keys. Returns whether the event was used.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Focused(true) => {
                self.resume();
                true
            }
            WindowEvent::Focused(false) => {
                self.pause();
                true
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => match self.keymap.get(code).copied() {
                Some(binding) => {
                    self.set_binding(binding, *state == ElementState::Pressed);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Accumulates raw pointer motion.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.accumulate_mouse(*dx, *dy);
        }
    }

    pub fn set_binding(&mut self, binding: Binding, down: bool) {
        if self.paused && down {
            return;
        }
        let state = &mut self.bindings[binding.index()];
        if down && !state.is_down {
            state.pressed = true;
        }
        if !down && state.is_down {
            state.released = true;
        }
        state.is_down = down;
    }

    pub fn accumulate_mouse(&mut self, dx: f64, dy: f64) {
        if self.paused {
            return;
        }
        self.mouse_dx += dx;
        self.mouse_dy += dy;
    }

    /// Stops input and lets go of everything held.
    pub fn pause(&mut self) {
        self.paused = true;
        self.bindings = Default::default();
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Clears the per-frame pressed/released edges. Call once per frame
    /// after the input was read.
    pub fn flush(&mut self) {
        for state in &mut self.bindings {
            state.pressed = false;
            state.released = false;
        }
    }
}

impl InputSource for InputState {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn binding(&self, binding: Binding) -> BindingState {
        self.bindings[binding.index()]
    }

    fn take_mouse_delta_x(&mut self) -> f32 {
        -std::mem::take(&mut self.mouse_dx) as f32
    }

    fn take_mouse_delta_y(&mut self) -> f32 {
        -std::mem::take(&mut self.mouse_dy) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_deltas_are_negated_and_consumed() {
        let mut input = InputState::new();
        input.accumulate_mouse(3.0, -2.0);
        input.accumulate_mouse(1.0, 0.5);
        assert_eq!(input.take_mouse_delta_x(), -4.0);
        assert_eq!(input.take_mouse_delta_y(), 1.5);
        assert_eq!(input.take_mouse_delta_x(), 0.0);
        assert_eq!(input.take_mouse_delta_y(), 0.0);
    }

    #[test]
    fn pausing_releases_everything() {
        let mut input = InputState::new();
        input.set_binding(Binding::Forward, true);
        input.accumulate_mouse(5.0, 5.0);
        input.pause();
        assert!(input.is_paused());
        assert!(!input.binding(Binding::Forward).is_down);
        assert_eq!(input.take_mouse_delta_x(), 0.0);

        input.set_binding(Binding::Left, true);
        assert!(!input.binding(Binding::Left).is_down);

        input.resume();
        input.set_binding(Binding::Left, true);
        assert!(input.binding(Binding::Left).is_down);
    }

    #[test]
    fn edges_last_until_flushed() {
        let mut input = InputState::new();
        input.set_binding(Binding::Back, true);
        assert!(input.binding(Binding::Back).pressed);
        input.flush();
        let state = input.binding(Binding::Back);
        assert!(state.is_down && !state.pressed);
        input.set_binding(Binding::Back, false);
        assert!(input.binding(Binding::Back).released);
    }

    #[test]
    fn binding_names_parse() {
        assert_eq!("forward".parse::<Binding>(), Ok(Binding::Forward));
        assert!("jump".parse::<Binding>().is_err());
    }
}
