//! The viewer boundary: what the flight loop asks of whatever draws the globe.
//!
//! [`Viewer`] is implemented by the wgpu globe renderer and by
//! [`HeadlessViewer`], which records calls instead of drawing.

mod entity;
mod headless;
mod viewer;

pub use entity::{Color, Entity, EntityId, EntitySpec, EntityStore, LabelSpec, ModelSpec, PointSpec};
pub use headless::HeadlessViewer;
pub use viewer::{CameraView, HudText, Viewer, ViewerError};
