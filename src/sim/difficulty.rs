//! Difficulty curves and spawn timing
//!
//! Runner difficulty is a pure function of distance travelled. Meteor
//! difficulty escalates on a wall-clock interval and keeps its own state.

use serde::{Deserialize, Serialize};

use crate::settings::{MeteorTuning, RunnerTuning};

/// Runner pacing derived from distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceDifficulty {
    pub level: u32,
    /// Obstacle scroll speed (pixels per tick)
    pub speed: f32,
    pub spawn_interval_ms: f64,
}

/// `level = floor(distance / distance_step)`; speed and spawn interval follow
/// in closed form so the result never depends on history.
pub fn distance_difficulty(distance: f32, tuning: &RunnerTuning) -> DistanceDifficulty {
    let level = if tuning.distance_step > 0.0 {
        (distance.max(0.0) / tuning.distance_step).floor() as u32
    } else {
        0
    };
    let speed = tuning.base_speed + level as f32 * tuning.speed_step;
    let spawn_interval_ms = (tuning.base_spawn_interval_ms
        - level as f64 * tuning.spawn_interval_step_ms)
        .max(tuning.min_spawn_interval_ms);

    DistanceDifficulty {
        level,
        speed,
        spawn_interval_ms,
    }
}

/// Fires when the interval since the last spawn has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub last_spawn_ms: f64,
}

impl SpawnTimer {
    pub fn new(start_ms: f64) -> Self {
        Self {
            last_spawn_ms: start_ms,
        }
    }

    /// True when `now - last_spawn >= interval` (the boundary is due).
    /// The timer restarts from `now`, not from zero.
    pub fn poll(&mut self, now_ms: f64, interval_ms: f64) -> bool {
        if now_ms - self.last_spawn_ms >= interval_ms {
            self.last_spawn_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Meteor pacing: speed level and spawn interval escalate every
/// `escalation_interval_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedDifficulty {
    pub speed_level: u32,
    pub spawn_interval_ms: f64,
    pub last_escalation_ms: f64,
}

impl TimedDifficulty {
    pub fn new(start_ms: f64, tuning: &MeteorTuning) -> Self {
        Self {
            speed_level: 0,
            spawn_interval_ms: tuning.spawn_interval_ms.max(tuning.min_spawn_interval_ms),
            last_escalation_ms: start_ms,
        }
    }

    /// Step up once if an escalation interval has passed. Returns true on level-up.
    pub fn escalate_if_due(&mut self, now_ms: f64, tuning: &MeteorTuning) -> bool {
        if now_ms - self.last_escalation_ms < tuning.escalation_interval_ms {
            return false;
        }
        self.speed_level += 1;
        self.spawn_interval_ms = (self.spawn_interval_ms - tuning.spawn_interval_step_ms)
            .max(tuning.min_spawn_interval_ms);
        self.last_escalation_ms = now_ms;
        true
    }

    /// Fall speed for a meteor spawned now
    pub fn meteor_speed(&self, tuning: &MeteorTuning) -> f32 {
        tuning.base_speed + self.speed_level as f32 * tuning.speed_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_difficulty_levels() {
        let t = RunnerTuning::default();
        let d0 = distance_difficulty(0.0, &t);
        assert_eq!(d0.level, 0);
        assert_eq!(d0.speed, t.base_speed);
        assert_eq!(d0.spawn_interval_ms, t.base_spawn_interval_ms);

        let d = distance_difficulty(249.9, &t);
        assert_eq!(d.level, 0);

        let d = distance_difficulty(250.0, &t);
        assert_eq!(d.level, 1);
        assert_eq!(d.speed, t.base_speed + t.speed_step);
        assert_eq!(d.spawn_interval_ms, t.base_spawn_interval_ms - t.spawn_interval_step_ms);
    }

    #[test]
    fn test_distance_difficulty_is_pure() {
        let t = RunnerTuning::default();
        for distance in [0.0, 12.5, 250.0, 777.7, 10_000.0] {
            assert_eq!(distance_difficulty(distance, &t), distance_difficulty(distance, &t));
        }
    }

    #[test]
    fn test_distance_interval_floor() {
        let t = RunnerTuning::default();
        let d = distance_difficulty(1_000_000.0, &t);
        assert_eq!(d.spawn_interval_ms, t.min_spawn_interval_ms);
    }

    #[test]
    fn test_spawn_timer_boundary_is_due() {
        let mut timer = SpawnTimer::new(0.0);
        assert!(!timer.poll(999.0, 1000.0));
        assert!(timer.poll(1000.0, 1000.0));
        assert_eq!(timer.last_spawn_ms, 1000.0);
        assert!(!timer.poll(1500.0, 1000.0));
        assert!(timer.poll(2000.0, 1000.0));
    }

    #[test]
    fn test_timed_escalation() {
        let t = MeteorTuning::default();
        let mut d = TimedDifficulty::new(0.0, &t);
        assert!(!d.escalate_if_due(59_999.0, &t));
        assert!(d.escalate_if_due(60_000.0, &t));
        assert_eq!(d.speed_level, 1);
        assert_eq!(d.spawn_interval_ms, t.spawn_interval_ms - t.spawn_interval_step_ms);
        assert_eq!(d.meteor_speed(&t), t.base_speed + t.speed_step);

        // Interval counts from the last escalation
        assert!(!d.escalate_if_due(100_000.0, &t));
        assert!(d.escalate_if_due(120_000.0, &t));
    }

    #[test]
    fn test_timed_interval_floor() {
        let t = MeteorTuning::default();
        let mut d = TimedDifficulty::new(0.0, &t);
        for step in 1..=50 {
            d.escalate_if_due(step as f64 * t.escalation_interval_ms, &t);
        }
        assert_eq!(d.speed_level, 50);
        assert_eq!(d.spawn_interval_ms, t.min_spawn_interval_ms);
    }
}
