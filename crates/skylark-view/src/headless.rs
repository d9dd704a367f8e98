//! A viewer that draws nothing and remembers what it was told.

use glam::DQuat;
use skylark_geo::Geodetic;
use tracing::{debug, info};

use crate::entity::{Entity, EntityId, EntitySpec, EntityStore};
use crate::viewer::{CameraView, HudText, Viewer, ViewerError};

/// Recording [`Viewer`] for tests and `--headless` runs.
#[derive(Debug)]
pub struct HeadlessViewer {
    entities: EntityStore,
    camera: Option<CameraView>,
    hud: Option<HudText>,
    hud_attached: bool,
    ready: bool,
    pose_updates: u64,
    camera_updates: u64,
}

impl Default for HeadlessViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessViewer {
    pub fn new() -> Self {
        Self {
            entities: EntityStore::new(),
            camera: None,
            hud: None,
            hud_attached: true,
            ready: false,
            pose_updates: 0,
            camera_updates: 0,
        }
    }

    /// A viewer with no HUD surface; every `set_hud` fails.
    pub fn without_hud() -> Self {
        Self {
            hud_attached: false,
            ..Self::new()
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn camera(&self) -> Option<&CameraView> {
        self.camera.as_ref()
    }

    pub fn hud(&self) -> Option<&HudText> {
        self.hud.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn pose_updates(&self) -> u64 {
        self.pose_updates
    }

    pub fn camera_updates(&self) -> u64 {
        self.camera_updates
    }
}

impl Viewer for HeadlessViewer {
    fn add_entity(&mut self, spec: EntitySpec) -> EntityId {
        let name = spec.name.clone();
        let id = self.entities.insert(spec);
        debug!("Added {id} ({name})");
        id
    }

    fn set_entity_pose(
        &mut self,
        id: EntityId,
        position: Geodetic,
        orientation: Option<DQuat>,
    ) -> Result<(), ViewerError> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(ViewerError::UnknownEntity(id))?;
        entity.spec.position = position;
        if orientation.is_some() {
            entity.spec.orientation = orientation;
        }
        self.pose_updates += 1;
        Ok(())
    }

    fn set_camera_view(&mut self, view: &CameraView) {
        self.camera = Some(*view);
        self.camera_updates += 1;
    }

    fn set_hud(&mut self, hud: &HudText) -> Result<(), ViewerError> {
        if !self.hud_attached {
            return Err(ViewerError::HudUnavailable);
        }
        self.hud = Some(hud.clone());
        Ok(())
    }

    fn show_ready(&mut self) {
        self.ready = true;
        info!("Headless viewer ready with {} entities", self.entities.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylark_geo::HeadingPitchRoll;

    #[test]
    fn test_pose_update_moves_entity() {
        let mut viewer = HeadlessViewer::new();
        let id = viewer.add_entity(EntitySpec::new("aircraft", Geodetic::new(0.0, 0.0, 500.0)));

        viewer
            .set_entity_pose(id, Geodetic::new(1.0, 2.0, 600.0), Some(DQuat::IDENTITY))
            .unwrap();

        let e = viewer.entity(id).unwrap();
        assert_eq!(e.position(), Geodetic::new(1.0, 2.0, 600.0));
        assert_eq!(e.orientation(), Some(DQuat::IDENTITY));
        assert_eq!(viewer.pose_updates(), 1);
    }

    #[test]
    fn test_none_orientation_keeps_previous() {
        let mut viewer = HeadlessViewer::new();
        let id = viewer.add_entity(EntitySpec::new("aircraft", Geodetic::default()));
        let q = DQuat::from_rotation_z(0.5);
        viewer.set_entity_pose(id, Geodetic::default(), Some(q)).unwrap();
        viewer.set_entity_pose(id, Geodetic::default(), None).unwrap();
        assert_eq!(viewer.entity(id).unwrap().orientation(), Some(q));
    }

    #[test]
    fn test_unknown_entity_is_error() {
        let mut viewer = HeadlessViewer::new();
        let result = viewer.set_entity_pose(EntityId(42), Geodetic::default(), None);
        assert_eq!(result, Err(ViewerError::UnknownEntity(EntityId(42))));
        assert_eq!(viewer.pose_updates(), 0);
    }

    #[test]
    fn test_missing_hud_is_error() {
        let mut viewer = HeadlessViewer::without_hud();
        assert_eq!(
            viewer.set_hud(&HudText::default()),
            Err(ViewerError::HudUnavailable)
        );
        assert!(viewer.hud().is_none());
    }

    #[test]
    fn test_camera_and_ready_recorded() {
        let mut viewer = HeadlessViewer::new();
        assert!(!viewer.is_ready());
        let view = CameraView {
            destination: Geodetic::new(103.97, 1.36, 800.0),
            orientation: HeadingPitchRoll::from_degrees(90.0, -20.0, 0.0),
        };
        viewer.set_camera_view(&view);
        viewer.show_ready();
        assert_eq!(viewer.camera(), Some(&view));
        assert_eq!(viewer.camera_updates(), 1);
        assert!(viewer.is_ready());
    }
}
