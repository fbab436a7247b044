//! Player and hostile entities
//!
//! Hostiles are a tagged enum; each kind has its own per-tick update and the
//! tick step dispatches on the tag.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Placed;
use super::geom::{Circle, Rect, Surface};
use super::mask::SpriteKind;
use super::tick::Intent;
use crate::settings::BirdTuning;

/// The dino
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Runner uses `vel.y` as its vertical velocity
    pub vel: Vec2,
    pub grounded: bool,
    /// Pixels per tick for avoider movement
    pub speed: f32,
}

impl Player {
    pub fn new(rect: Rect, speed: f32) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            grounded: false,
            speed,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn placed(&self) -> Placed {
        Placed::new(SpriteKind::Dino, self.rect)
    }

    /// Start a jump; ignored while airborne
    pub fn jump(&mut self, jump_force: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel.y = jump_force;
        self.grounded = false;
        true
    }

    /// Gravity step, landing on `ground_top`
    pub fn update_runner(&mut self, gravity: f32, ground_top: f32) {
        self.vel.y += gravity;
        self.rect.y += self.vel.y;

        if self.rect.bottom() >= ground_top {
            self.rect.y = ground_top - self.rect.height;
            self.vel.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Apply held directions, drag and pointer follow, then clamp into `area`
    pub fn update_avoider(&mut self, intent: &Intent, area: &PlayArea) {
        let mut delta = Vec2::ZERO;
        if intent.move_left {
            delta.x -= self.speed;
        }
        if intent.move_right {
            delta.x += self.speed;
        }
        if intent.move_up {
            delta.y -= self.speed;
        }
        if intent.move_down {
            delta.y += self.speed;
        }
        if intent.drag_delta_x.is_finite() {
            delta.x += intent.drag_delta_x;
        }

        // Touch follow: step toward the pointer unless already within one step
        if let Some(target) = intent.pointer_target.filter(|t| t.is_finite()) {
            let to_target = target - self.center();
            let dist = to_target.length();
            if dist > self.speed {
                delta += to_target / dist * self.speed;
            }
        }

        self.vel = delta;
        self.rect.translate(delta);
        area.clamp(&mut self.rect);
    }
}

/// Region the avoider player may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl PlayArea {
    /// Whole surface width, lower part of the surface from `min_y_fraction` down
    pub fn lower(surface: &Surface, min_y_fraction: f32) -> Self {
        Self {
            min: Vec2::new(0.0, surface.height * min_y_fraction.clamp(0.0, 1.0)),
            max: surface.size(),
        }
    }

    /// Clamp `rect` inside the area, never letting it leave the surface
    pub fn clamp(&self, rect: &mut Rect) {
        // If the band is thinner than the rect, let it extend upward
        let min = Vec2::new(self.min.x, self.min.y.min(self.max.y - rect.height).max(0.0));
        rect.clamp_into(min, self.max);
    }
}

/// Ground obstacle (runner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub rect: Rect,
}

impl Obstacle {
    pub fn advance(&mut self, game_speed: f32) {
        self.rect.x -= game_speed;
    }
}

/// Falling meteor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub id: u32,
    pub rect: Rect,
    /// Fixed at spawn
    pub speed: f32,
}

impl Meteor {
    pub fn advance(&mut self) {
        self.rect.y += self.speed;
    }
}

/// Bird behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BirdState {
    Patrol,
    /// Diving at the player's center as it was when the dive began
    Attack { target: Vec2 },
}

/// Patrolling / diving bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub id: u32,
    pub rect: Rect,
    /// +1 right, -1 left
    pub direction: f32,
    pub speed: f32,
    pub state: BirdState,
    /// Ticks until a dive may be rolled
    pub attack_cooldown: i32,
    /// Ticks until the next egg
    pub shoot_cooldown: u32,
}

/// What a bird did during its update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BirdAction {
    None,
    /// Dropped an egg from this point
    Drop(Vec2),
    StartedAttack,
    EndedAttack,
}

impl Bird {
    pub fn new(id: u32, rect: Rect, tuning: &BirdTuning, rng: &mut impl Rng) -> Self {
        Self {
            id,
            rect,
            direction: 1.0,
            speed: tuning.speed,
            state: BirdState::Patrol,
            attack_cooldown: roll_attack_cooldown(tuning, rng),
            shoot_cooldown: 0,
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.state, BirdState::Attack { .. })
    }

    pub fn update(
        &mut self,
        surface: &Surface,
        player_center: Vec2,
        tuning: &BirdTuning,
        rng: &mut impl Rng,
    ) -> BirdAction {
        match self.state {
            BirdState::Patrol => self.patrol(surface, player_center, tuning, rng),
            BirdState::Attack { target } => self.seek(target, tuning, rng),
        }
    }

    fn patrol(
        &mut self,
        surface: &Surface,
        player_center: Vec2,
        tuning: &BirdTuning,
        rng: &mut impl Rng,
    ) -> BirdAction {
        self.rect.x += self.speed * self.direction;
        self.rect.clamp_into(Vec2::ZERO, surface.size());
        if self.rect.left() <= 0.0 || self.rect.right() >= surface.width {
            self.direction *= -1.0;
        }

        if self.attack_cooldown > 0 {
            self.attack_cooldown -= 1;
        }
        if self.attack_cooldown <= 0 && rng.random_bool(tuning.attack_probability.clamp(0.0, 1.0)) {
            self.state = BirdState::Attack {
                target: player_center,
            };
            log::debug!("Bird {} attacking toward {:?}", self.id, player_center);
            return BirdAction::StartedAttack;
        }

        if tuning.shoot_interval_ticks > 0 {
            if self.shoot_cooldown > 0 {
                self.shoot_cooldown -= 1;
            } else {
                self.shoot_cooldown = tuning.shoot_interval_ticks;
                return BirdAction::Drop(Vec2::new(self.rect.center().x, self.rect.bottom()));
            }
        }

        BirdAction::None
    }

    fn seek(&mut self, target: Vec2, tuning: &BirdTuning, rng: &mut impl Rng) -> BirdAction {
        let to_target = target - self.rect.center();
        let dist = to_target.length();

        // Arrived (a zero-length vector lands here too, before normalizing)
        if dist == 0.0 || dist < tuning.attack_speed {
            self.end_attack(tuning, rng);
            return BirdAction::EndedAttack;
        }

        self.rect.translate(to_target / dist * tuning.attack_speed);
        BirdAction::None
    }

    /// Back to Patrol with a fresh randomized cooldown
    pub fn end_attack(&mut self, tuning: &BirdTuning, rng: &mut impl Rng) {
        self.state = BirdState::Patrol;
        self.attack_cooldown = roll_attack_cooldown(tuning, rng);
    }
}

fn roll_attack_cooldown(tuning: &BirdTuning, rng: &mut impl Rng) -> i32 {
    if tuning.attack_cooldown_max <= tuning.attack_cooldown_min {
        return tuning.attack_cooldown_min;
    }
    rng.random_range(tuning.attack_cooldown_min..tuning.attack_cooldown_max)
}

/// Egg dropped by a patrolling bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub circle: Circle,
    pub speed: f32,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.circle.center.y += self.speed;
    }

    pub fn is_off_surface(&self, surface: &Surface) -> bool {
        self.circle.center.y - self.circle.radius > surface.height
    }
}

/// Any entity that can end the game or be removed by player contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Hostile {
    Obstacle(Obstacle),
    Meteor(Meteor),
    Bird(Bird),
}

impl Hostile {
    pub fn id(&self) -> u32 {
        match self {
            Hostile::Obstacle(o) => o.id,
            Hostile::Meteor(m) => m.id,
            Hostile::Bird(b) => b.id,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Hostile::Obstacle(o) => o.rect,
            Hostile::Meteor(m) => m.rect,
            Hostile::Bird(b) => b.rect,
        }
    }

    pub fn sprite(&self) -> SpriteKind {
        match self {
            Hostile::Obstacle(_) => SpriteKind::Obstacle,
            Hostile::Meteor(_) => SpriteKind::Meteor,
            Hostile::Bird(_) => SpriteKind::Bird,
        }
    }

    pub fn placed(&self) -> Placed {
        Placed::new(self.sprite(), self.rect())
    }

    /// Obstacles leave to the left, meteors through the bottom; birds never leave
    pub fn is_off_surface(&self, surface: &Surface) -> bool {
        match self {
            Hostile::Obstacle(o) => o.rect.right() < 0.0,
            Hostile::Meteor(m) => m.rect.top() > surface.height,
            Hostile::Bird(_) => false,
        }
    }

    pub fn as_bird(&self) -> Option<&Bird> {
        match self {
            Hostile::Bird(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bird_mut(&mut self) -> Option<&mut Bird> {
        match self {
            Hostile::Bird(b) => Some(b),
            _ => None,
        }
    }
}
