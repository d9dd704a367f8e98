//! The [`Viewer`] trait and the data passed across it.

use glam::DQuat;
use skylark_geo::{Geodetic, HeadingPitchRoll};

use crate::entity::{EntityId, EntitySpec};

/// Errors a viewer reports for a single update. None of them are fatal: the
/// caller logs and skips the affected update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("{0} does not exist")]
    UnknownEntity(EntityId),

    #[error("no HUD surface to write to")]
    HudUnavailable,
}

/// Camera placement: a geodetic destination plus an attitude in the local
/// east-north-up frame at that destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub destination: Geodetic,
    pub orientation: HeadingPitchRoll,
}

/// Pre-formatted HUD strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HudText {
    /// `lon, lat, alt`.
    pub position: String,
    /// Heading in whole degrees, `[0, 360)`.
    pub heading: String,
    /// Frames counted in the last full second.
    pub fps: String,
    /// Extra readouts (speed, distance home).
    pub extra: String,
}

impl HudText {
    /// Single-line rendering used for window titles and log lines.
    pub fn line(&self) -> String {
        let mut line = format!(
            "POS: {} | HDG: {}\u{00b0} | FPS: {}",
            self.position, self.heading, self.fps
        );
        if !self.extra.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.extra);
        }
        line
    }
}

/// Everything the flight loop needs from a globe viewer.
pub trait Viewer {
    /// Create an entity and return its handle.
    fn add_entity(&mut self, spec: EntitySpec) -> EntityId;

    /// Move an entity; `None` keeps its current orientation.
    fn set_entity_pose(
        &mut self,
        id: EntityId,
        position: Geodetic,
        orientation: Option<DQuat>,
    ) -> Result<(), ViewerError>;

    /// Place the camera.
    fn set_camera_view(&mut self, view: &CameraView);

    /// Publish HUD text.
    fn set_hud(&mut self, hud: &HudText) -> Result<(), ViewerError>;

    /// Initialization finished; hide any loading indicator.
    fn show_ready(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_line_without_extra() {
        let hud = HudText {
            position: "103.9915, 1.3644, 500".to_string(),
            heading: "90".to_string(),
            fps: "60".to_string(),
            extra: String::new(),
        };
        assert_eq!(hud.line(), "POS: 103.9915, 1.3644, 500 | HDG: 90° | FPS: 60");
    }

    #[test]
    fn test_hud_line_with_extra() {
        let hud = HudText {
            extra: "GS: 50 m/s".to_string(),
            ..HudText::default()
        };
        assert!(hud.line().ends_with(" | GS: 50 m/s"));
    }
}
