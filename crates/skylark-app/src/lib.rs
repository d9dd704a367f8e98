//! Skylark application: the flight session that ties input, simulation and a
//! viewer together, the winit event handler, and the headless runner.

pub mod app;
pub mod frame;
pub mod headless;
pub mod platform;
