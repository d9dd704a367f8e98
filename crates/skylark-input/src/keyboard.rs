//! Frame-coherent keyboard state tracker.
//!
//! [`KeyboardState`] keeps a map from physical key to held state. Key-down
//! writes `true`, key-up writes `false`, and a key never seen reads as not held.
//! It also remembers which keys changed during the current frame.
//!
//! Physical key codes are used throughout so that WASD-style bindings work
//! identically regardless of the user's keyboard layout.

use std::collections::{HashMap, HashSet};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is a repeat event.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// A non-repeat press of `key`.
    pub fn pressed(key: PhysicalKey) -> Self {
        Self {
            key,
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    /// A release of `key`.
    pub fn released(key: PhysicalKey) -> Self {
        Self {
            key,
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Tracks per-frame keyboard state using physical (scan-code) keys.
///
/// # Usage
///
/// 1. Forward every [`KeyEvent`] to [`process_event`](Self::process_event).
/// 2. Query state with [`is_pressed`](Self::is_pressed),
///    [`just_pressed`](Self::just_pressed), [`just_released`](Self::just_released).
/// 3. Call [`clear_transients`](Self::clear_transients) at the end of each frame.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashMap<PhysicalKey, bool>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`], updating internal state.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Processes a [`RawKeyEvent`] (platform-independent, test-friendly).
    ///
    /// Repeat events are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                self.held.insert(event.key, true);
                self.just_pressed.insert(event.key);
            }
            ElementState::Released => {
                self.held.insert(event.key, false);
                self.just_released.insert(event.key);
            }
        }
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }

    /// Returns `true` only during the frame the key transitioned to pressed.
    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Returns `true` only during the frame the key transitioned to released.
    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.just_released.contains(&key)
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.held.values().filter(|held| **held).count()
    }

    /// Marks every key as released. Used when the window loses focus, since
    /// the matching key-up events never arrive.
    pub fn release_all(&mut self) {
        for (key, held) in &mut self.held {
            if *held {
                *held = false;
                self.just_released.insert(*key);
            }
        }
    }

    /// Clears `just_pressed` and `just_released` sets. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
