//! Scene entities placed on the globe.

use std::fmt;

use glam::DQuat;
use skylark_geo::Geodetic;

/// Linear RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Color = Color([1.0, 1.0, 0.0, 1.0]);
    pub const CYAN: Color = Color([0.0, 1.0, 1.0, 1.0]);
}

/// Handle to an entity owned by a viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Procedural aircraft model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelSpec {
    /// Uniform scale applied to the unit-sized mesh (meters per mesh unit).
    pub scale: f32,
}

/// Text attached to an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSpec {
    pub text: String,
    pub color: Color,
    /// Screen-space offset in pixels (x right, y down).
    pub pixel_offset: [f32; 2],
}

/// Screen-sized point marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSpec {
    pub pixel_size: f32,
    pub color: Color,
}

/// Everything needed to create an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySpec {
    pub name: String,
    pub position: Geodetic,
    pub orientation: Option<DQuat>,
    pub model: Option<ModelSpec>,
    pub label: Option<LabelSpec>,
    pub point: Option<PointSpec>,
}

impl EntitySpec {
    /// A bare entity at `position`; add visuals with the builder methods.
    pub fn new(name: impl Into<String>, position: Geodetic) -> Self {
        Self {
            name: name.into(),
            position,
            orientation: None,
            model: None,
            label: None,
            point: None,
        }
    }

    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_label(mut self, label: LabelSpec) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_point(mut self, point: PointSpec) -> Self {
        self.point = Some(point);
        self
    }
}

/// A live entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub spec: EntitySpec,
}

impl Entity {
    pub fn position(&self) -> Geodetic {
        self.spec.position
    }

    pub fn orientation(&self) -> Option<DQuat> {
        self.spec.orientation
    }
}

/// Id-allocating entity storage shared by viewer implementations.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec: EntitySpec) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity { id, spec });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_stable() {
        let mut store = EntityStore::new();
        let a = store.insert(EntitySpec::new("a", Geodetic::default()));
        let b = store.insert(EntitySpec::new("b", Geodetic::default()));
        assert_ne!(a, b);
        assert_eq!(store.get(a).map(|e| e.spec.name.as_str()), Some("a"));
        assert_eq!(store.get(b).map(|e| e.spec.name.as_str()), Some("b"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let store = EntityStore::new();
        assert!(store.get(EntityId(7)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_builder_sets_visuals() {
        let spec = EntitySpec::new("aircraft", Geodetic::new(1.0, 2.0, 3.0))
            .with_model(ModelSpec { scale: 50.0 })
            .with_point(PointSpec {
                pixel_size: 15.0,
                color: Color::RED,
            });
        assert_eq!(spec.model, Some(ModelSpec { scale: 50.0 }));
        assert!(spec.label.is_none());
        assert_eq!(spec.point.map(|p| p.color), Some(Color::RED));
    }
}
