//! Game session state
//!
//! Everything mutable about one play session lives in [`GameSession`]. Reset
//! throws it all away and builds a fresh one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{DistanceDifficulty, SpawnTimer, TimedDifficulty, distance_difficulty};
use super::entity::{Bird, Hostile, PlayArea, Player, Projectile};
use super::events::EventQueue;
use super::geom::{Rect, Surface};
use crate::settings::Settings;

/// Which game is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Endless runner jumping ground obstacles
    Runner,
    /// Dodge falling meteors
    Meteors,
    /// Eat patrolling birds, survive their dives and eggs
    Birds,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Runner, Variant::Meteors, Variant::Birds];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Runner => "runner",
            Variant::Meteors => "meteors",
            Variant::Birds => "birds",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "runner" | "dino" => Some(Variant::Runner),
            "meteors" | "meteor" => Some(Variant::Meteors),
            "birds" | "bird" => Some(Variant::Birds),
            _ => None,
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Terminal until reset
    GameOver,
}

/// Counters shown to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Runner distance
    pub distance: f32,
    pub score: u64,
    /// Difficulty level reached
    pub level: u32,
    /// Bird hunt room, 1-based
    pub room: u32,
    pub birds_to_eat: u32,
    pub hits_left: i32,
    /// Ticks of contact immunity left after a hit
    pub grace_ticks: u32,
}

/// Per-variant pacing state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pacing {
    Distance(DistanceDifficulty),
    Timed(TimedDifficulty),
    /// Bird hunt pacing comes from rooms
    Rooms,
}

/// Session time, measured from the first tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionClock {
    pub started_at_ms: Option<f64>,
    pub now_ms: f64,
    pub ticks: u64,
}

impl SessionClock {
    /// Record a tick at `now_ms`; time never runs backward.
    /// Non-finite timestamps still count the tick but leave the time alone.
    pub fn advance(&mut self, now_ms: f64) {
        self.ticks += 1;
        if !now_ms.is_finite() {
            log::trace!("Ignoring non-finite tick time {now_ms}");
            return;
        }
        match self.started_at_ms {
            None => {
                self.started_at_ms = Some(now_ms);
                self.now_ms = now_ms;
            }
            Some(_) => self.now_ms = self.now_ms.max(now_ms),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started_at_ms.map_or(0.0, |start| self.now_ms - start)
    }
}

/// Things that happened during a tick, for the HUD collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Spawned { id: u32 },
    LevelUp { level: u32 },
    BirdEaten { id: u32, birds_to_eat: u32 },
    PlayerHit { hits_left: i32 },
    RoomCleared { room: u32 },
    RoomAdvanced { room: u32 },
    GameOver { score: u64 },
}

/// Snapshot pushed to the score display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub variant: Variant,
    pub phase: GamePhase,
    pub score: u64,
    pub distance: f32,
    pub level: u32,
    pub room: u32,
    pub birds_to_eat: u32,
    pub hits_left: i32,
    pub ticks: u64,
}

/// One play session
#[derive(Debug, Clone)]
pub struct GameSession {
    pub variant: Variant,
    pub settings: Settings,
    pub phase: GamePhase,
    pub surface: Surface,
    pub player: Player,
    /// Sorted by id
    pub hostiles: Vec<Hostile>,
    pub projectiles: Vec<Projectile>,
    pub progress: Progress,
    pub pacing: Pacing,
    pub spawn_timer: SpawnTimer,
    pub clock: SessionClock,
    pub timers: EventQueue,
    seed: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameSession {
    /// New session on the settings' initial surface
    pub fn new(variant: Variant, settings: Settings, seed: u64) -> Self {
        let surface = settings.surface;
        Self::with_surface(variant, settings, seed, surface)
    }

    pub fn with_surface(variant: Variant, settings: Settings, seed: u64, surface: Surface) -> Self {
        let player = Self::initial_player(variant, &settings, &surface);
        let pacing = match variant {
            Variant::Runner => Pacing::Distance(distance_difficulty(0.0, &settings.runner)),
            Variant::Meteors => Pacing::Timed(TimedDifficulty::new(0.0, &settings.meteors)),
            Variant::Birds => Pacing::Rooms,
        };
        let progress = Progress {
            distance: 0.0,
            score: 0,
            level: 0,
            room: 1,
            birds_to_eat: settings.birds.birds_for_room(1),
            hits_left: settings.birds.initial_hits,
            grace_ticks: 0,
        };

        let mut session = Self {
            variant,
            settings,
            phase: GamePhase::Running,
            surface,
            player,
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            progress,
            pacing,
            spawn_timer: SpawnTimer::new(0.0),
            clock: SessionClock::default(),
            timers: EventQueue::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        if variant == Variant::Birds {
            session.spawn_birds();
        }

        session
    }

    fn initial_player(variant: Variant, settings: &Settings, surface: &Surface) -> Player {
        let tuning = &settings.player;
        match variant {
            Variant::Runner => {
                let ground_top =
                    (surface.height - settings.runner.ground_height).max(tuning.height);
                let rect = Rect::new(
                    settings.runner.player_x,
                    ground_top - tuning.height,
                    tuning.width,
                    tuning.height,
                );
                let mut player = Player::new(rect, tuning.speed);
                player.grounded = true;
                player
            }
            Variant::Meteors | Variant::Birds => {
                let mut rect = Rect::new(
                    surface.width / 2.0 - tuning.width / 2.0,
                    surface.height - tuning.height * 2.0,
                    tuning.width,
                    tuning.height,
                );
                PlayArea::lower(surface, tuning.min_y_fraction).clamp(&mut rect);
                Player::new(rect, tuning.speed)
            }
        }
    }

    /// Throw away all state and start over.
    ///
    /// Pending timers are cancelled; the surface size is kept.
    pub fn reset(&mut self, seed: u64) {
        let mut timers = std::mem::take(&mut self.timers);
        timers.cancel_all();

        *self = Self::with_surface(self.variant, self.settings.clone(), seed, self.surface);
        self.timers = timers;
        log::info!("Session reset ({}, seed {})", self.variant.as_str(), seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Runner ground line
    pub fn ground_top(&self) -> f32 {
        (self.surface.height - self.settings.runner.ground_height).max(self.player.rect.height)
    }

    pub fn play_area(&self) -> PlayArea {
        PlayArea::lower(&self.surface, self.settings.player.min_y_fraction)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    pub fn birds(&self) -> impl Iterator<Item = &Bird> {
        self.hostiles.iter().filter_map(Hostile::as_bird)
    }

    /// Apply a new surface size, pulling entities back on screen.
    ///
    /// Returns true if the size changed.
    pub fn set_surface(&mut self, surface: Surface) -> bool {
        if surface == self.surface {
            return false;
        }
        log::debug!(
            "Surface resized {}x{} -> {}x{}",
            self.surface.width,
            self.surface.height,
            surface.width,
            surface.height
        );
        self.surface = surface;

        match self.variant {
            Variant::Runner => {
                let ground_top = self.ground_top();
                if self.player.rect.bottom() >= ground_top {
                    self.player.rect.y = ground_top - self.player.rect.height;
                    self.player.vel.y = 0.0;
                    self.player.grounded = true;
                } else {
                    // Ground dropped away; fall to it before jumping again
                    self.player.grounded = false;
                }
                let max_x = (surface.width - self.player.rect.width).max(0.0);
                self.player.rect.x = self.player.rect.x.clamp(0.0, max_x);
            }
            Variant::Meteors | Variant::Birds => {
                let area = self.play_area();
                area.clamp(&mut self.player.rect);
            }
        }

        for hostile in &mut self.hostiles {
            if let Some(bird) = hostile.as_bird_mut() {
                bird.rect.clamp_into(Vec2::ZERO, surface.size());
            }
        }
        true
    }

    pub fn hud(&self) -> Hud {
        Hud {
            variant: self.variant,
            phase: self.phase,
            score: self.progress.score,
            distance: self.progress.distance,
            level: self.progress.level,
            room: self.progress.room,
            birds_to_eat: self.progress.birds_to_eat,
            hits_left: self.progress.hits_left,
            ticks: self.clock.ticks,
        }
    }

    /// Transition to GameOver
    pub(crate) fn end_game(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over ({}): score {}, {} ticks",
            self.variant.as_str(),
            self.progress.score,
            self.clock.ticks
        );
        events.push(GameEvent::GameOver {
            score: self.progress.score,
        });
    }

    /// Populate the current room with `birds_to_eat` birds
    pub(crate) fn spawn_birds(&mut self) {
        let tuning = self.settings.birds;
        let max_x = (self.surface.width - tuning.width).max(0.0);

        for _ in 0..self.progress.birds_to_eat {
            let id = self.next_entity_id();
            let x = self.rng.random::<f32>() * max_x;
            let y = tuning.spawn_top + self.rng.random::<f32>() * tuning.spawn_band;
            let mut rect = Rect::new(x, y, tuning.width, tuning.height);
            rect.clamp_into(Vec2::ZERO, self.surface.size());
            let bird = Bird::new(id, rect, &tuning, &mut self.rng);
            self.hostiles.push(Hostile::Bird(bird));
        }
    }

    /// Keep iteration order stable by entity ID
    pub fn normalize_order(&mut self) {
        self.hostiles.sort_by_key(Hostile::id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
