//! Flight simulation: aircraft state, the per-frame integrator, the chase
//! camera, and the HUD/FPS readouts derived from them.
//!
//! Everything here is plain arithmetic over injected time so it can be tested
//! without a window or GPU.

pub mod chase;
pub mod fps;
pub mod hud;
pub mod integrator;
pub mod state;

pub use chase::{ChaseParams, chase_view};
pub use fps::FpsCounter;
pub use hud::build_hud;
pub use integrator::{FlightParams, integrate};
pub use state::FlightState;
