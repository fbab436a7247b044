//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as a tick argument, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod events;
pub mod geom;
pub mod mask;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionMode, Placed, circle_rect_overlap, pixel_overlap, rects_overlap, sprites_collide,
};
pub use difficulty::{DistanceDifficulty, SpawnTimer, TimedDifficulty, distance_difficulty};
pub use entity::{Bird, BirdState, Hostile, Meteor, Obstacle, PlayArea, Player, Projectile};
pub use events::{DeferredEvent, EventQueue};
pub use geom::{Circle, PixelRect, Rect, Surface};
pub use mask::{AlphaGrid, AlphaSampler, Bitmap, NoSprites, SpriteKind, SpriteSheet};
pub use state::{GameEvent, GamePhase, GameSession, Hud, Pacing, Progress, SessionClock, Variant};
pub use tick::{Intent, tick};
