use crate::config::FlockingConfig;

/// Default volume: a 50 x 50 x 30 corridor block.
const DEFAULT_SPACE: (f64, f64, f64) = (50.0, 50.0, 30.0);

/// Parameters for building a demo scenario.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub space_size: (f64, f64, f64),
    /// Drones spawned for each of the three mission types.
    pub drones_per_mission: usize,
    pub num_obstacles: usize,
    /// Timestep the demo driver passes to `step_frame`.
    pub frame_dt: f64,
    /// Seed for reproducible placement. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub config: FlockingConfig,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            space_size: DEFAULT_SPACE,
            drones_per_mission: 5,
            num_obstacles: 5,
            frame_dt: 0.1,
            seed: None,
            config: FlockingConfig::default(),
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_space_size(mut self, x: f64, y: f64, z: f64) -> Self {
        self.space_size = (x, y, z);
        self
    }

    pub fn with_drones_per_mission(mut self, count: usize) -> Self {
        self.drones_per_mission = count;
        self
    }

    pub fn with_num_obstacles(mut self, count: usize) -> Self {
        self.num_obstacles = count;
        self
    }

    /// Override the three flocking weights exposed to demo drivers.
    pub fn with_weights(mut self, separation: f64, alignment: f64, cohesion: f64) -> Self {
        self.config.separation_weight = separation;
        self.config.alignment_weight = alignment;
        self.config.cohesion_weight = cohesion;
        self
    }

    pub fn with_config(mut self, config: FlockingConfig) -> Self {
        self.config = config;
        self
    }
}
