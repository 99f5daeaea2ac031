//! Drone directory: id → entity lookup backing duplicate-id rejection.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::ecs::DroneId;

#[derive(Debug, Default, Resource)]
pub struct DroneDirectory {
    by_id: HashMap<DroneId, Entity>,
}

impl DroneDirectory {
    pub fn contains(&self, id: &DroneId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &DroneId) -> Option<Entity> {
        self.by_id.get(id).copied()
    }

    pub fn insert(&mut self, id: DroneId, entity: Entity) {
        self.by_id.insert(id, entity);
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Ids in sorted order, for deterministic reporting.
    pub fn sorted_ids(&self) -> Vec<DroneId> {
        let mut ids: Vec<DroneId> = self.by_id.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_registered_ids() {
        let mut directory = DroneDirectory::default();
        let id = DroneId("delivery_0".to_string());
        assert!(!directory.contains(&id));

        directory.insert(id.clone(), Entity::from_raw(1));
        assert!(directory.contains(&id));
        assert_eq!(directory.get(&id), Some(Entity::from_raw(1)));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn sorted_ids_are_deterministic() {
        let mut directory = DroneDirectory::default();
        directory.insert(DroneId("b".to_string()), Entity::from_raw(1));
        directory.insert(DroneId("a".to_string()), Entity::from_raw(2));

        let ids: Vec<String> = directory
            .sorted_ids()
            .into_iter()
            .map(|id| id.0)
            .collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
