//! Traffic-stream clustering.
//!
//! Two drones are stream-connected when they are within the stream formation
//! distance of each other and their velocities point the same way (cosine
//! similarity at or above the configured threshold). Connectivity is
//! transitive: connected components over this relation form the streams.
//! Components of size >= 2 are numbered 0.. in order of their smallest
//! member id; singletons stay unassigned. Labels are recomputed from scratch
//! every frame — identity is deterministic, not tracked incrementally.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::config::FlockingConfig;
use crate::ecs::{DroneId, StreamMembership};
use crate::spatial::SpatialIndex;

/// Frame-current stream-size table, refreshed by the stream assignment
/// system and read by the metrics collector.
#[derive(Debug, Default, Resource)]
pub struct StreamRegistry {
    pub sizes: HashMap<i32, usize>,
}

impl StreamRegistry {
    /// Number of active streams (the unassigned pool is not a stream).
    pub fn active_streams(&self) -> usize {
        self.sizes
            .keys()
            .filter(|&&id| id != StreamMembership::NO_STREAM)
            .count()
    }
}

/// Result of one clustering pass.
#[derive(Debug, Default)]
pub struct StreamAssignment {
    /// Stream label per drone; `StreamMembership::NO_STREAM` for singletons.
    pub labels: HashMap<Entity, i32>,
    /// Members per stream label, including the unassigned pool when present.
    pub sizes: HashMap<i32, usize>,
}

impl StreamAssignment {
    /// Number of active streams (the unassigned pool is not a stream).
    pub fn active_streams(&self) -> usize {
        self.sizes
            .keys()
            .filter(|&&id| id != StreamMembership::NO_STREAM)
            .count()
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

fn velocities_aligned(
    a: nalgebra::Vector3<f64>,
    b: nalgebra::Vector3<f64>,
    min_cosine: f64,
) -> bool {
    let norms = a.norm() * b.norm();
    // Cosine similarity is undefined for a zero velocity; such pairs are
    // never stream-connected.
    if norms <= f64::EPSILON {
        return false;
    }
    a.dot(&b) / norms >= min_cosine
}

/// Cluster the frame snapshot into streams.
///
/// `ids` maps every indexed entity to its drone id; ids order the resulting
/// stream labels deterministically.
pub fn assign_streams(
    index: &SpatialIndex,
    ids: &HashMap<Entity, DroneId>,
    config: &FlockingConfig,
) -> StreamAssignment {
    let samples = index.samples();
    let slot_of: HashMap<Entity, usize> = samples
        .iter()
        .enumerate()
        .map(|(slot, sample)| (sample.entity, slot))
        .collect();

    let mut union_find = UnionFind::new(samples.len());
    for (slot, sample) in samples.iter().enumerate() {
        for neighbor in index.neighbors_within(sample.entity, config.stream_formation_distance) {
            if !velocities_aligned(
                sample.velocity,
                neighbor.velocity,
                config.stream_alignment_cosine,
            ) {
                continue;
            }
            let other = slot_of[&neighbor.entity];
            union_find.union(slot, other);
        }
    }

    let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
    for slot in 0..samples.len() {
        let root = union_find.find(slot);
        components.entry(root).or_default().push(slot);
    }

    // Streams are components of size >= 2, numbered by smallest member id.
    let mut streams: Vec<(DroneId, Vec<usize>)> = components
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|members| {
            let min_id = members
                .iter()
                .map(|&slot| {
                    ids.get(&samples[slot].entity)
                        .expect("indexed drone has an id")
                        .clone()
                })
                .min()
                .expect("stream component is non-empty");
            (min_id, members)
        })
        .collect();
    streams.sort_by(|a, b| a.0.cmp(&b.0));

    let mut assignment = StreamAssignment::default();
    for sample in samples {
        assignment
            .labels
            .insert(sample.entity, StreamMembership::NO_STREAM);
    }
    for (stream_id, (_, members)) in streams.into_iter().enumerate() {
        let label = stream_id as i32;
        assignment.sizes.insert(label, members.len());
        for slot in members {
            assignment.labels.insert(samples[slot].entity, label);
        }
    }

    let unassigned = assignment
        .labels
        .values()
        .filter(|&&label| label == StreamMembership::NO_STREAM)
        .count();
    if unassigned > 0 {
        assignment
            .sizes
            .insert(StreamMembership::NO_STREAM, unassigned);
    }

    assignment
}
