//! Flight control bindings.
//!
//! Maps each [`FlightControl`] to one physical key and samples the keyboard
//! into a [`ControlState`] once per frame. Defaults are the arrow keys for
//! turning, W/S for forward/backward and Q/E for climb/descend.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keyboard::KeyboardState;

/// A flight control the integrator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightControl {
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
    Climb,
    Descend,
}

impl FlightControl {
    /// Every control, in display order.
    pub const ALL: [FlightControl; 6] = [
        FlightControl::TurnLeft,
        FlightControl::TurnRight,
        FlightControl::Forward,
        FlightControl::Backward,
        FlightControl::Climb,
        FlightControl::Descend,
    ];

    /// Config name of the control (snake_case).
    pub fn name(self) -> &'static str {
        match self {
            FlightControl::TurnLeft => "turn_left",
            FlightControl::TurnRight => "turn_right",
            FlightControl::Forward => "forward",
            FlightControl::Backward => "backward",
            FlightControl::Climb => "climb",
            FlightControl::Descend => "descend",
        }
    }

    /// Look up a control by its config name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for FlightControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from applying binding overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown flight control `{0}`")]
    UnknownControl(String),

    #[error("unknown key `{key}` for control `{control}`")]
    UnknownKey { control: FlightControl, key: String },
}

/// Snapshot of which controls are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub turn_left: bool,
    pub turn_right: bool,
    pub forward: bool,
    pub backward: bool,
    pub climb: bool,
    pub descend: bool,
}

impl ControlState {
    /// Sets the flag for one control.
    pub fn set(&mut self, control: FlightControl, held: bool) {
        match control {
            FlightControl::TurnLeft => self.turn_left = held,
            FlightControl::TurnRight => self.turn_right = held,
            FlightControl::Forward => self.forward = held,
            FlightControl::Backward => self.backward = held,
            FlightControl::Climb => self.climb = held,
            FlightControl::Descend => self.descend = held,
        }
    }

    /// Convenience constructor for tests and scripted runs.
    pub fn holding(controls: &[FlightControl]) -> Self {
        let mut state = Self::default();
        for &c in controls {
            state.set(c, true);
        }
        state
    }

    /// True when no control is held.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// One physical key per flight control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBindings {
    keys: HashMap<FlightControl, KeyCode>,
}

impl Default for ControlBindings {
    fn default() -> Self {
        let keys = HashMap::from([
            (FlightControl::TurnLeft, KeyCode::ArrowLeft),
            (FlightControl::TurnRight, KeyCode::ArrowRight),
            (FlightControl::Forward, KeyCode::KeyW),
            (FlightControl::Backward, KeyCode::KeyS),
            (FlightControl::Climb, KeyCode::KeyQ),
            (FlightControl::Descend, KeyCode::KeyE),
        ]);
        Self { keys }
    }
}

impl ControlBindings {
    /// Key currently bound to `control`.
    pub fn key_for(&self, control: FlightControl) -> Option<KeyCode> {
        self.keys.get(&control).copied()
    }

    /// Rebind a single control.
    pub fn bind(&mut self, control: FlightControl, key: KeyCode) {
        self.keys.insert(control, key);
    }

    /// Apply one `control name -> key name` override.
    pub fn apply_override(&mut self, control: &str, key: &str) -> Result<(), BindingError> {
        let control = FlightControl::from_name(control)
            .ok_or_else(|| BindingError::UnknownControl(control.to_string()))?;
        let code = parse_key_code(key).ok_or_else(|| BindingError::UnknownKey {
            control,
            key: key.to_string(),
        })?;
        self.bind(control, code);
        Ok(())
    }

    /// Build bindings from defaults plus config overrides.
    ///
    /// Invalid entries are logged and skipped; the default stays in place.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut bindings = Self::default();
        for (control, key) in overrides {
            if let Err(e) = bindings.apply_override(control, key) {
                warn!("Ignoring keybinding override: {e}");
            }
        }
        bindings
    }

    /// Sample the keyboard into a [`ControlState`].
    pub fn sample(&self, keyboard: &KeyboardState) -> ControlState {
        let mut state = ControlState::default();
        for (&control, &code) in &self.keys {
            state.set(control, keyboard.is_pressed(PhysicalKey::Code(code)));
        }
        state
    }
}

/// Parse a key name in winit `KeyCode` spelling (`"KeyW"`, `"ArrowLeft"`, ...).
pub fn parse_key_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "Space" => KeyCode::Space,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "Numpad2" => KeyCode::Numpad2,
        "Numpad4" => KeyCode::Numpad4,
        "Numpad6" => KeyCode::Numpad6,
        "Numpad8" => KeyCode::Numpad8,
        _ => return None,
    };
    Some(code)
}
