//! Frame timing instrumentation.

use std::time::Duration;

use bevy_ecs::prelude::Resource;

/// Wall-clock timing of executed frames, recorded by the runner.
#[derive(Debug, Clone, Default, Resource)]
pub struct FrameTimings {
    total: Duration,
    frames: u64,
    min: Duration,
    max: Duration,
}

impl FrameTimings {
    pub fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.frames += 1;
        if duration < self.min || self.min == Duration::ZERO {
            self.min = duration;
        }
        if duration > self.max {
            self.max = duration;
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn average(&self) -> Duration {
        if self.frames == 0 {
            Duration::ZERO
        } else {
            let avg_nanos = self.total.as_nanos() / u128::from(self.frames);
            Duration::from_nanos(avg_nanos as u64)
        }
    }
}
