//! Spatial index: uniform hash grid over 3D cells for radius-bounded
//! neighbor queries.
//!
//! Rebuilt once per frame from a snapshot of every drone's position and
//! velocity. The snapshot is the frame's canonical pre-integration state:
//! steering, collision proximity, and stream clustering all read it, so no
//! drone ever observes another drone's updated state within a frame.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource};
use nalgebra::Vector3;

/// Position/velocity snapshot of one drone at frame start.
#[derive(Debug, Clone, Copy)]
pub struct DroneSample {
    pub entity: Entity,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// One neighbor returned from a radius query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub entity: Entity,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub distance: f64,
}

#[derive(Debug, Resource)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<[i64; 3], Vec<usize>>,
    samples: Vec<DroneSample>,
    by_entity: HashMap<Entity, usize>,
}

impl SpatialIndex {
    /// `cell_size` should match the largest query radius in regular use
    /// (the perception range) so queries touch at most a 3x3x3 block.
    pub fn new(cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            samples: Vec::new(),
            by_entity: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Replace the index contents with a fresh snapshot.
    pub fn rebuild<I>(&mut self, snapshot: I)
    where
        I: IntoIterator<Item = DroneSample>,
    {
        self.cells.clear();
        self.samples.clear();
        self.by_entity.clear();

        for sample in snapshot {
            let slot = self.samples.len();
            let cell = self.cell_of(sample.position);
            self.cells.entry(cell).or_default().push(slot);
            self.by_entity.insert(sample.entity, slot);
            self.samples.push(sample);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[DroneSample] {
        &self.samples
    }

    pub fn sample(&self, entity: Entity) -> Option<&DroneSample> {
        self.by_entity.get(&entity).map(|&slot| &self.samples[slot])
    }

    /// All drones within `radius` of `entity`'s snapshot position, excluding
    /// the drone itself. Coincident drones are returned at distance 0.
    ///
    /// Returns an empty set for an entity missing from the snapshot.
    pub fn neighbors_within(&self, entity: Entity, radius: f64) -> Vec<Neighbor> {
        let Some(center) = self.sample(entity) else {
            return Vec::new();
        };
        self.collect_neighbors(center.position, radius, Some(entity))
    }

    /// All drones within `radius` of an arbitrary point.
    pub fn neighbors_near(&self, point: Vector3<f64>, radius: f64) -> Vec<Neighbor> {
        self.collect_neighbors(point, radius, None)
    }

    fn collect_neighbors(
        &self,
        center: Vector3<f64>,
        radius: f64,
        exclude: Option<Entity>,
    ) -> Vec<Neighbor> {
        let mut neighbors = Vec::new();
        let min = self.cell_of(center - Vector3::repeat(radius));
        let max = self.cell_of(center + Vector3::repeat(radius));

        for cx in min[0]..=max[0] {
            for cy in min[1]..=max[1] {
                for cz in min[2]..=max[2] {
                    let Some(slots) = self.cells.get(&[cx, cy, cz]) else {
                        continue;
                    };
                    for &slot in slots {
                        let sample = &self.samples[slot];
                        if exclude == Some(sample.entity) {
                            continue;
                        }
                        let distance = (sample.position - center).norm();
                        if distance <= radius {
                            neighbors.push(Neighbor {
                                entity: sample.entity,
                                position: sample.position,
                                velocity: sample.velocity,
                                distance,
                            });
                        }
                    }
                }
            }
        }
        neighbors
    }

    fn cell_of(&self, point: Vector3<f64>) -> [i64; 3] {
        [
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
            (point.z / self.cell_size).floor() as i64,
        ]
    }
}
