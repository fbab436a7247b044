//! Dino Arcade - simulation core for a family of small dino arcade games
//!
//! Three variants share one loop: an endless runner that jumps obstacles,
//! a meteor dodger, and a bird hunt with lives and rooms.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, difficulty, game state)
//! - `driver`: Cancellable per-frame scheduling
//! - `platform`: Input/render/HUD/surface collaborator seams
//! - `game`: Update-then-draw shell
//! - `settings`: Data-driven game balance (JSON)
//! - `autopilot`: Idle/demo mode input planner

pub mod autopilot;
pub mod driver;
pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default drawing surface size (pixels)
    pub const SURFACE_WIDTH: f32 = 800.0;
    pub const SURFACE_HEIGHT: f32 = 400.0;

    /// Largest frame delta fed to the simulation (tab switches, debugger pauses)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Smallest width/height any rectangle may have
    pub const MIN_ENTITY_EXTENT: f32 = 1.0;

    /// Player defaults: a 40px square moving 4px/tick
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Avoider player may not climb above this fraction of the surface
    pub const PLAYER_MIN_Y_FRACTION: f32 = 0.5;

    /// Runner physics (per tick)
    pub const RUNNER_GRAVITY: f32 = 0.6;
    pub const RUNNER_JUMP_FORCE: f32 = -12.0;
    pub const RUNNER_GROUND_HEIGHT: f32 = 20.0;
    pub const RUNNER_PLAYER_X: f32 = 50.0;

    /// Runner difficulty curve
    pub const RUNNER_BASE_SPEED: f32 = 6.0;
    pub const RUNNER_SPEED_STEP: f32 = 0.5;
    pub const RUNNER_DISTANCE_STEP: f32 = 250.0;
    /// Distance units gained per pixel scrolled
    pub const RUNNER_DISTANCE_SCALE: f32 = 0.1;
    pub const RUNNER_BASE_SPAWN_INTERVAL_MS: f64 = 1500.0;
    pub const RUNNER_SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
    pub const RUNNER_MIN_SPAWN_INTERVAL_MS: f64 = 600.0;
    pub const OBSTACLE_BASE_SIZE: f32 = 40.0;
    pub const OBSTACLE_SIZE_JITTER: f32 = 0.25;
    pub const OBSTACLE_ASPECT: f32 = 0.5;

    /// Meteor defaults
    pub const METEOR_BASE_SIZE: f32 = 40.0;
    pub const METEOR_BASE_SPEED: f32 = 3.0;
    pub const METEOR_SPEED_STEP: f32 = 1.0;
    pub const METEOR_SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const METEOR_SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
    pub const METEOR_MIN_SPAWN_INTERVAL_MS: f64 = 400.0;
    pub const METEOR_ESCALATION_INTERVAL_MS: f64 = 60_000.0;

    /// Bird defaults
    pub const BIRD_WIDTH: f32 = 30.0;
    pub const BIRD_HEIGHT: f32 = 20.0;
    pub const BIRD_SPEED: f32 = 2.0;
    pub const BIRD_ATTACK_SPEED: f32 = 5.0;
    /// Per-tick chance of a ready bird diving at the player
    pub const BIRD_ATTACK_PROBABILITY: f64 = 0.01;
    pub const BIRD_ATTACK_COOLDOWN_MIN: i32 = 100;
    pub const BIRD_ATTACK_COOLDOWN_MAX: i32 = 200;
    pub const BIRD_SHOOT_INTERVAL_TICKS: u32 = 100;
    pub const BIRD_SPAWN_TOP: f32 = 50.0;
    pub const BIRD_SPAWN_BAND: f32 = 100.0;
    pub const EGG_RADIUS: f32 = 5.0;
    pub const EGG_SPEED: f32 = 6.0;

    /// Bird hunt rules
    pub const INITIAL_HITS: i32 = 3;
    pub const BIRDS_PER_ROOM: u32 = 5;
    pub const BIRDS_PER_ROOM_STEP: u32 = 1;
    pub const ROOM_ADVANCE_DELAY_MS: f64 = 1000.0;
    /// Ticks after a hit during which contact is ignored
    pub const HIT_GRACE_TICKS: u32 = 60;
}
