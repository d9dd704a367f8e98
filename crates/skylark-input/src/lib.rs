//! Keyboard input: a held-key map fed by winit events and the flight control
//! bindings sampled from it every frame.

pub mod controls;
pub mod keyboard;

pub use controls::{BindingError, ControlBindings, ControlState, FlightControl, parse_key_code};
pub use keyboard::{KeyboardState, RawKeyEvent};
