//! Game settings and tuning
//!
//! Every gameplay constant is overridable from a JSON file; missing fields
//! fall back to the defaults in [`crate::consts`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{CollisionMode, Surface};

/// Player size and movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Pixels per tick while a direction is held
    pub speed: f32,
    /// Avoider player may not climb above `surface.height * min_y_fraction`
    pub min_y_fraction: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            min_y_fraction: PLAYER_MIN_Y_FRACTION,
        }
    }
}

/// Endless runner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    pub gravity: f32,
    /// Negative: up
    pub jump_force: f32,
    pub ground_height: f32,
    pub player_x: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub distance_step: f32,
    pub distance_scale: f32,
    pub base_spawn_interval_ms: f64,
    pub spawn_interval_step_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub obstacle_base_size: f32,
    /// Height varies by `1 ± jitter`
    pub obstacle_size_jitter: f32,
    /// Width / height when the sprite's own aspect is unknown
    pub obstacle_aspect: f32,
    pub min_obstacle_size: f32,
    pub collision: CollisionMode,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            gravity: RUNNER_GRAVITY,
            jump_force: RUNNER_JUMP_FORCE,
            ground_height: RUNNER_GROUND_HEIGHT,
            player_x: RUNNER_PLAYER_X,
            base_speed: RUNNER_BASE_SPEED,
            speed_step: RUNNER_SPEED_STEP,
            distance_step: RUNNER_DISTANCE_STEP,
            distance_scale: RUNNER_DISTANCE_SCALE,
            base_spawn_interval_ms: RUNNER_BASE_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: RUNNER_SPAWN_INTERVAL_STEP_MS,
            min_spawn_interval_ms: RUNNER_MIN_SPAWN_INTERVAL_MS,
            obstacle_base_size: OBSTACLE_BASE_SIZE,
            obstacle_size_jitter: OBSTACLE_SIZE_JITTER,
            obstacle_aspect: OBSTACLE_ASPECT,
            min_obstacle_size: MIN_ENTITY_EXTENT * 4.0,
            collision: CollisionMode::Aabb,
        }
    }
}

/// Meteor dodge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorTuning {
    pub base_size: f32,
    pub min_size: f32,
    /// Width / height when the sprite's own aspect is unknown
    pub aspect: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub spawn_interval_ms: f64,
    pub spawn_interval_step_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub escalation_interval_ms: f64,
    pub collision: CollisionMode,
}

impl Default for MeteorTuning {
    fn default() -> Self {
        Self {
            base_size: METEOR_BASE_SIZE,
            min_size: MIN_ENTITY_EXTENT * 4.0,
            aspect: 1.0,
            base_speed: METEOR_BASE_SPEED,
            speed_step: METEOR_SPEED_STEP,
            spawn_interval_ms: METEOR_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: METEOR_SPAWN_INTERVAL_STEP_MS,
            min_spawn_interval_ms: METEOR_MIN_SPAWN_INTERVAL_MS,
            escalation_interval_ms: METEOR_ESCALATION_INTERVAL_MS,
            collision: CollisionMode::Pixel,
        }
    }
}

/// Bird hunt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub attack_speed: f32,
    pub attack_probability: f64,
    pub attack_cooldown_min: i32,
    pub attack_cooldown_max: i32,
    /// 0 disables eggs
    pub shoot_interval_ticks: u32,
    pub egg_radius: f32,
    pub egg_speed: f32,
    pub spawn_top: f32,
    pub spawn_band: f32,
    pub initial_hits: i32,
    pub birds_per_room: u32,
    pub birds_per_room_step: u32,
    pub room_advance_delay_ms: f64,
    pub hit_grace_ticks: u32,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            width: BIRD_WIDTH,
            height: BIRD_HEIGHT,
            speed: BIRD_SPEED,
            attack_speed: BIRD_ATTACK_SPEED,
            attack_probability: BIRD_ATTACK_PROBABILITY,
            attack_cooldown_min: BIRD_ATTACK_COOLDOWN_MIN,
            attack_cooldown_max: BIRD_ATTACK_COOLDOWN_MAX,
            shoot_interval_ticks: BIRD_SHOOT_INTERVAL_TICKS,
            egg_radius: EGG_RADIUS,
            egg_speed: EGG_SPEED,
            spawn_top: BIRD_SPAWN_TOP,
            spawn_band: BIRD_SPAWN_BAND,
            initial_hits: INITIAL_HITS,
            birds_per_room: BIRDS_PER_ROOM,
            birds_per_room_step: BIRDS_PER_ROOM_STEP,
            room_advance_delay_ms: ROOM_ADVANCE_DELAY_MS,
            hit_grace_ticks: HIT_GRACE_TICKS,
        }
    }
}

impl BirdTuning {
    /// Birds to eat in a 1-based room
    pub fn birds_for_room(&self, room: u32) -> u32 {
        self.birds_per_room + room.saturating_sub(1) * self.birds_per_room_step
    }
}

/// All tuning for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial surface size (hosts may resize later)
    pub surface: Surface,
    pub player: PlayerTuning,
    pub runner: RunnerTuning,
    pub meteors: MeteorTuning,
    pub birds: BirdTuning,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("invalid settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize settings")
    }

    /// Load and validate a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::from_json(&json)
            .with_context(|| format!("failed to load settings from {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject tuning that would produce degenerate geometry or stalled timers
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.surface.width > 0.0 && self.surface.height > 0.0,
            "surface size must be positive"
        );

        let p = &self.player;
        ensure!(p.width > 0.0 && p.height > 0.0, "player size must be positive");
        ensure!(p.speed >= 0.0, "player speed must not be negative");
        ensure!(
            (0.0..=1.0).contains(&p.min_y_fraction),
            "player.min_y_fraction must be within [0, 1]"
        );

        let r = &self.runner;
        ensure!(r.jump_force < 0.0, "runner.jump_force must be negative (up)");
        ensure!(r.distance_step > 0.0, "runner.distance_step must be positive");
        ensure!(r.min_spawn_interval_ms > 0.0, "runner.min_spawn_interval_ms must be positive");
        ensure!(
            r.obstacle_base_size > 0.0 && r.min_obstacle_size > 0.0,
            "runner obstacle sizes must be positive"
        );
        ensure!(
            (0.0..1.0).contains(&r.obstacle_size_jitter),
            "runner.obstacle_size_jitter must be within [0, 1)"
        );
        ensure!(r.obstacle_aspect > 0.0, "runner.obstacle_aspect must be positive");

        let m = &self.meteors;
        ensure!(m.base_size > 0.0 && m.min_size > 0.0, "meteor sizes must be positive");
        ensure!(m.aspect > 0.0, "meteors.aspect must be positive");
        ensure!(m.min_spawn_interval_ms > 0.0, "meteors.min_spawn_interval_ms must be positive");
        ensure!(
            m.escalation_interval_ms > 0.0,
            "meteors.escalation_interval_ms must be positive"
        );

        let b = &self.birds;
        ensure!(b.width > 0.0 && b.height > 0.0, "bird size must be positive");
        ensure!(b.attack_speed > 0.0, "birds.attack_speed must be positive");
        ensure!(
            (0.0..=1.0).contains(&b.attack_probability),
            "birds.attack_probability must be within [0, 1]"
        );
        ensure!(
            b.attack_cooldown_min <= b.attack_cooldown_max,
            "birds.attack_cooldown_min must not exceed attack_cooldown_max"
        );
        ensure!(b.initial_hits > 0, "birds.initial_hits must be positive");
        ensure!(b.birds_per_room > 0, "birds.birds_per_room must be positive");
        ensure!(b.room_advance_delay_ms >= 0.0, "birds.room_advance_delay_ms must not be negative");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "birds": { "birds_per_room": 7 } }"#).unwrap();
        assert_eq!(settings.birds.birds_per_room, 7);
        assert_eq!(settings.birds.initial_hits, INITIAL_HITS);
        assert_eq!(settings.runner, RunnerTuning::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::default();
        settings.meteors.collision = CollisionMode::Aabb;
        settings.surface = Surface::new(640.0, 480.0);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = Settings::from_json(r#"{ "birds": { "attack_probability": 2.0 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("attack_probability"));

        assert!(Settings::from_json(r#"{ "runner": { "jump_force": 5.0 } }"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_birds_for_room() {
        let b = BirdTuning::default();
        assert_eq!(b.birds_for_room(1), BIRDS_PER_ROOM);
        assert_eq!(b.birds_for_room(3), BIRDS_PER_ROOM + 2 * BIRDS_PER_ROOM_STEP);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("dino-arcade-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.runner.collision = CollisionMode::Pixel;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read settings"));
    }
}
