// src/matrix/scene.rs

//! A flat scene graph with explicit ownership.
//!
//! The `Scene` owns every `GroupNode` and `Entity` and hands out indices.
//! Each entity belongs to exactly one group, is listed in that group's
//! members, and stores its position in the group's frame:
//!
//! ```text
//! world = group.rotation · local
//! ```
//!
//! Moving an entity to another group keeps it where it is in the world.

use glam::{Mat3, Vec3};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("no group {0:?} in scene")]
    UnknownGroup(GroupId),
    #[error("no entity {0:?} in scene")]
    UnknownEntity(EntityId),
}

#[derive(Debug, Clone)]
pub struct GroupNode {
    pub rotation: Mat3,
    members: Vec<EntityId>,
}

impl GroupNode {
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub label: String,
    pub local: Vec3,
    group: GroupId,
}

impl Entity {
    pub fn group(&self) -> GroupId {
        self.group
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    groups: Vec<GroupNode>,
    entities: Vec<Entity>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// A scene holding only the root group, with identity rotation.
    pub fn new() -> Self {
        Scene {
            groups: vec![GroupNode {
                rotation: Mat3::IDENTITY,
                members: Vec::new(),
            }],
            entities: Vec::new(),
        }
    }

    pub fn root(&self) -> GroupId {
        GroupId(0)
    }

    pub fn add_group(&mut self, rotation: Mat3) -> GroupId {
        self.groups.push(GroupNode {
            rotation,
            members: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    pub fn add_entity(
        &mut self,
        group: GroupId,
        label: impl Into<String>,
        local: Vec3,
    ) -> Result<EntityId, SceneError> {
        let id = EntityId(self.entities.len());
        self.group_mut(group)?.members.push(id);
        self.entities.push(Entity {
            label: label.into(),
            local,
            group,
        });
        Ok(id)
    }

    pub fn group(&self, id: GroupId) -> Result<&GroupNode, SceneError> {
        self.groups.get(id.0).ok_or(SceneError::UnknownGroup(id))
    }

    fn group_mut(&mut self, id: GroupId) -> Result<&mut GroupNode, SceneError> {
        self.groups.get_mut(id.0).ok_or(SceneError::UnknownGroup(id))
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.entities.get(id.0).ok_or(SceneError::UnknownEntity(id))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, SceneError> {
        self.entities.get_mut(id.0).ok_or(SceneError::UnknownEntity(id))
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> {
        (0..self.entities.len()).map(EntityId)
    }

    pub fn set_rotation(&mut self, group: GroupId, rotation: Mat3) -> Result<(), SceneError> {
        self.group_mut(group)?.rotation = rotation;
        Ok(())
    }

    pub fn world_position(&self, id: EntityId) -> Result<Vec3, SceneError> {
        let entity = self.entity(id)?;
        Ok(self.group(entity.group)?.rotation * entity.local)
    }

    /// Moves `entity` into group `to`, preserving its world position.
    ///
    /// The new local position is `to.rotationᵀ · world`; rotations are
    /// orthonormal, so the transpose is the inverse.
    pub fn reparent(&mut self, entity: EntityId, to: GroupId) -> Result<(), SceneError> {
        let target_rotation = self.group(to)?.rotation;
        let from = self.entity(entity)?.group;
        if from == to {
            return Ok(());
        }
        let world = self.world_position(entity)?;

        self.group_mut(from)?.members.retain(|&m| m != entity);
        self.group_mut(to)?.members.push(entity);

        let moved = self.entity_mut(entity)?;
        moved.group = to;
        moved.local = target_rotation.transpose() * world;
        Ok(())
    }

    /// Every entity is listed by exactly one group, and that group is the
    /// entity's own.
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![0usize; self.entities.len()];
        for (gi, group) in self.groups.iter().enumerate() {
            for &EntityId(e) in &group.members {
                match self.entities.get(e) {
                    Some(entity) if entity.group == GroupId(gi) => seen[e] += 1,
                    _ => return false,
                }
            }
        }
        seen.iter().all(|&n| n == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn world_is_group_rotation_times_local() {
        let mut scene = Scene::new();
        let turned = scene.add_group(Mat3::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let e = scene.add_entity(turned, "word", Vec3::X).unwrap();
        assert!(close(scene.world_position(e).unwrap(), Vec3::Y));
    }

    #[test]
    fn reparent_preserves_world_position_and_membership() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.set_rotation(root, Mat3::from_rotation_y(0.7)).unwrap();
        let other = scene.add_group(Mat3::from_rotation_x(-1.1));
        let a = scene.add_entity(root, "a", Vec3::new(1.0, -1.0, 1.0)).unwrap();
        let b = scene.add_entity(root, "b", Vec3::new(0.0, 1.0, -1.0)).unwrap();

        let before = scene.world_position(a).unwrap();
        scene.reparent(a, other).unwrap();
        assert!(close(scene.world_position(a).unwrap(), before));
        assert_eq!(scene.entity(a).unwrap().group(), other);
        assert_eq!(scene.group(root).unwrap().members(), &[b]);
        assert_eq!(scene.group(other).unwrap().members(), &[a]);
        assert!(scene.is_consistent());

        scene.reparent(a, root).unwrap();
        assert!(close(scene.world_position(a).unwrap(), before));
        assert!(scene.is_consistent());
    }

    #[test]
    fn reparent_to_same_group_is_a_no_op() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_entity(root, "a", Vec3::Z).unwrap();
        scene.reparent(a, root).unwrap();
        assert_eq!(scene.group(root).unwrap().members(), &[a]);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.add_entity(GroupId(9), "x", Vec3::ZERO),
            Err(SceneError::UnknownGroup(GroupId(9)))
        );
        assert_eq!(
            scene.reparent(EntityId(3), scene.root()),
            Err(SceneError::UnknownEntity(EntityId(3)))
        );
    }
}
