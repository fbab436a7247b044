//! Per-tick simulation step
//!
//! Core game loop that advances a session by one display frame. Each tick:
//! fire due deferred events, move the player, spawn, move hostiles, then test
//! collisions and apply state transitions.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{circle_rect_overlap, rects_overlap, sprites_collide};
use super::difficulty::{TimedDifficulty, distance_difficulty};
use super::entity::{BirdAction, Hostile, Meteor, Obstacle, Projectile};
use super::events::DeferredEvent;
use super::geom::{Circle, Rect};
use super::mask::{AlphaSampler, SpriteKind};
use super::state::{GameEvent, GamePhase, GameSession, Pacing, Variant};
use crate::settings::{MeteorTuning, RunnerTuning};

/// Input intents for a single tick, consumed once
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Runner jump (space/tap)
    pub jump_requested: bool,
    /// Horizontal touch-drag since last tick (pixels)
    pub drag_delta_x: f32,
    /// Touch point to walk toward
    pub pointer_target: Option<Vec2>,
}

/// Advance the session by one tick at session-independent time `now_ms`.
///
/// Does nothing once the game is over. Returns what happened.
pub fn tick(
    session: &mut GameSession,
    input: &Intent,
    now_ms: f64,
    sampler: &dyn AlphaSampler,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.phase == GamePhase::GameOver {
        return events;
    }

    session.clock.advance(now_ms);
    let elapsed = session.clock.elapsed_ms();

    for deferred in session.timers.pop_due(elapsed) {
        match deferred {
            DeferredEvent::AdvanceRoom => advance_room(session, &mut events),
        }
    }

    match session.variant {
        Variant::Runner => tick_runner(session, input, elapsed, sampler, &mut events),
        Variant::Meteors => tick_meteors(session, input, elapsed, sampler, &mut events),
        Variant::Birds => tick_birds(session, input, elapsed, &mut events),
    }

    // Ensure deterministic ordering
    session.normalize_order();
    events
}

fn tick_runner(
    session: &mut GameSession,
    input: &Intent,
    elapsed: f64,
    sampler: &dyn AlphaSampler,
    events: &mut Vec<GameEvent>,
) {
    let tuning = session.settings.runner;

    // Recomputed from distance every tick, never accumulated
    let difficulty = distance_difficulty(session.progress.distance, &tuning);
    session.pacing = Pacing::Distance(difficulty);
    if difficulty.level > session.progress.level {
        session.progress.level = difficulty.level;
        log::info!(
            "Runner level {} (speed {:.1}, spawn every {:.0} ms)",
            difficulty.level,
            difficulty.speed,
            difficulty.spawn_interval_ms
        );
        events.push(GameEvent::LevelUp {
            level: difficulty.level,
        });
    }

    if input.jump_requested && session.player.jump(tuning.jump_force) {
        events.push(GameEvent::Jumped);
    }
    let ground_top = session.ground_top();
    session.player.update_runner(tuning.gravity, ground_top);

    if session.spawn_timer.poll(elapsed, difficulty.spawn_interval_ms) {
        spawn_obstacle(session, &tuning, ground_top, sampler, events);
    }

    for hostile in &mut session.hostiles {
        if let Hostile::Obstacle(obstacle) = hostile {
            obstacle.advance(difficulty.speed);
        }
    }
    let surface = session.surface;
    session.hostiles.retain(|h| !h.is_off_surface(&surface));

    let player = session.player.placed();
    let hit = session
        .hostiles
        .iter()
        .any(|h| sprites_collide(tuning.collision, sampler, &player, &h.placed()));
    if hit {
        session.end_game(events);
        return;
    }

    session.progress.distance += difficulty.speed * tuning.distance_scale;
    session.progress.score = session.progress.distance.floor() as u64;
}

fn spawn_obstacle(
    session: &mut GameSession,
    tuning: &RunnerTuning,
    ground_top: f32,
    sampler: &dyn AlphaSampler,
    events: &mut Vec<GameEvent>,
) {
    let jitter = tuning.obstacle_size_jitter;
    let scale = if jitter > 0.0 {
        session.rng.random_range(1.0 - jitter..=1.0 + jitter)
    } else {
        1.0
    };
    let aspect = sprite_aspect(sampler, SpriteKind::Obstacle).unwrap_or(tuning.obstacle_aspect);
    let height = (tuning.obstacle_base_size * scale).max(tuning.min_obstacle_size);
    let width = (height * aspect).max(tuning.min_obstacle_size);

    let id = session.next_entity_id();
    let rect = Rect::new(session.surface.width, ground_top - height, width, height);
    session.hostiles.push(Hostile::Obstacle(Obstacle { id, rect }));
    events.push(GameEvent::Spawned { id });
}

fn tick_meteors(
    session: &mut GameSession,
    input: &Intent,
    elapsed: f64,
    sampler: &dyn AlphaSampler,
    events: &mut Vec<GameEvent>,
) {
    let tuning = session.settings.meteors;

    let mut pacing = match session.pacing {
        Pacing::Timed(pacing) => pacing,
        _ => TimedDifficulty::new(elapsed, &tuning),
    };
    if pacing.escalate_if_due(elapsed, &tuning) {
        session.progress.level = pacing.speed_level;
        log::info!(
            "Meteor level {} (speed {:.1}, spawn every {:.0} ms)",
            pacing.speed_level,
            pacing.meteor_speed(&tuning),
            pacing.spawn_interval_ms
        );
        events.push(GameEvent::LevelUp {
            level: pacing.speed_level,
        });
    }
    session.pacing = Pacing::Timed(pacing);

    let area = session.play_area();
    session.player.update_avoider(input, &area);

    if session.spawn_timer.poll(elapsed, pacing.spawn_interval_ms) {
        spawn_meteor(session, &tuning, pacing.meteor_speed(&tuning), sampler, events);
    }

    for hostile in &mut session.hostiles {
        if let Hostile::Meteor(meteor) = hostile {
            meteor.advance();
        }
    }

    // Every meteor that falls past the bottom has been dodged
    let surface = session.surface;
    let before = session.hostiles.len();
    session.hostiles.retain(|h| !h.is_off_surface(&surface));
    session.progress.score += (before - session.hostiles.len()) as u64;

    let player = session.player.placed();
    let hit = session
        .hostiles
        .iter()
        .any(|h| sprites_collide(tuning.collision, sampler, &player, &h.placed()));
    if hit {
        session.end_game(events);
    }
}

fn spawn_meteor(
    session: &mut GameSession,
    tuning: &MeteorTuning,
    speed: f32,
    sampler: &dyn AlphaSampler,
    events: &mut Vec<GameEvent>,
) {
    let aspect = sprite_aspect(sampler, SpriteKind::Meteor).unwrap_or(tuning.aspect);
    let height = tuning.base_size.max(tuning.min_size);
    let width = (height * aspect).max(tuning.min_size);

    // Fully on-surface horizontally
    let max_x = (session.surface.width - width).max(0.0);
    let x = session.rng.random::<f32>() * max_x;

    let id = session.next_entity_id();
    let rect = Rect::new(x, -height, width, height);
    session.hostiles.push(Hostile::Meteor(Meteor { id, rect, speed }));
    events.push(GameEvent::Spawned { id });
}

fn sprite_aspect(sampler: &dyn AlphaSampler, sprite: SpriteKind) -> Option<f32> {
    sampler
        .aspect_ratio(sprite)
        .filter(|aspect| aspect.is_finite() && *aspect > 0.0)
}

fn tick_birds(
    session: &mut GameSession,
    input: &Intent,
    elapsed: f64,
    events: &mut Vec<GameEvent>,
) {
    let tuning = session.settings.birds;

    let area = session.play_area();
    session.player.update_avoider(input, &area);
    let player_center = session.player.center();
    let surface = session.surface;

    let mut drops = Vec::new();
    for hostile in &mut session.hostiles {
        if let Hostile::Bird(bird) = hostile {
            let action = bird.update(&surface, player_center, &tuning, &mut session.rng);
            if let BirdAction::Drop(at) = action {
                drops.push(at);
            }
        }
    }
    for at in drops {
        let id = session.next_entity_id();
        session.projectiles.push(Projectile {
            id,
            circle: Circle::new(at, tuning.egg_radius),
            speed: tuning.egg_speed,
        });
    }
    for projectile in &mut session.projectiles {
        projectile.advance();
    }
    session.projectiles.retain(|p| !p.is_off_surface(&surface));

    if session.progress.grace_ticks > 0 {
        session.progress.grace_ticks -= 1;
        return;
    }

    let player_rect = session.player.rect;

    if let Some(idx) = session
        .projectiles
        .iter()
        .position(|p| circle_rect_overlap(&p.circle, &player_rect))
    {
        session.projectiles.remove(idx);
        register_hit(session, events);
        return;
    }

    let mut attacker = None;
    let mut eaten = Vec::new();
    for bird in session.birds() {
        if !rects_overlap(&bird.rect, &player_rect) {
            continue;
        }
        if bird.is_attacking() {
            attacker = Some(bird.id);
            break;
        }
        eaten.push(bird.id);
    }

    // A diving bird hurts; it is not eaten and goes back to patrolling
    if let Some(id) = attacker {
        if let Some(bird) = session
            .hostiles
            .iter_mut()
            .filter_map(Hostile::as_bird_mut)
            .find(|b| b.id == id)
        {
            bird.end_attack(&tuning, &mut session.rng);
        }
        register_hit(session, events);
        return;
    }

    if eaten.is_empty() {
        return;
    }
    session.hostiles.retain(|h| !eaten.contains(&h.id()));
    for id in eaten {
        session.progress.birds_to_eat = session.progress.birds_to_eat.saturating_sub(1);
        session.progress.score += 1;
        events.push(GameEvent::BirdEaten {
            id,
            birds_to_eat: session.progress.birds_to_eat,
        });
    }

    let room_cleared = session.progress.birds_to_eat == 0;
    if room_cleared && !session.timers.is_pending(DeferredEvent::AdvanceRoom) {
        let room = session.progress.room;
        session
            .timers
            .schedule(elapsed + tuning.room_advance_delay_ms, DeferredEvent::AdvanceRoom);
        log::info!("Room {} cleared", room);
        events.push(GameEvent::RoomCleared { room });
    }
}

/// Lose a life; out of lives ends the game, otherwise grants a grace period
fn register_hit(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    session.progress.hits_left -= 1;
    let hits_left = session.progress.hits_left;
    log::debug!("Player hit, {} hit(s) left", hits_left);
    events.push(GameEvent::PlayerHit { hits_left });

    if hits_left <= 0 {
        session.end_game(events);
    } else {
        session.progress.grace_ticks = session.settings.birds.hit_grace_ticks;
    }
}

fn advance_room(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    if session.variant != Variant::Birds {
        return;
    }
    let tuning = session.settings.birds;

    session.progress.room += 1;
    let room = session.progress.room;
    session.progress.birds_to_eat = tuning.birds_for_room(room);
    session.progress.hits_left = tuning.initial_hits;
    session.progress.grace_ticks = 0;
    session.projectiles.clear();
    session.hostiles.clear();
    session.spawn_birds();

    log::info!("Room {}: {} birds to eat", room, session.progress.birds_to_eat);
    events.push(GameEvent::RoomAdvanced { room });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::collision::CollisionMode;
    use crate::sim::entity::{Bird, BirdState};
    use crate::sim::mask::{Bitmap, NoSprites, SpriteSheet};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn idle() -> Intent {
        Intent::default()
    }

    fn bird_settings() -> Settings {
        let mut settings = Settings::default();
        settings.birds.attack_probability = 0.0;
        settings.birds.shoot_interval_ticks = 0;
        settings
    }

    /// Move every bird onto the player
    fn stack_birds_on_player(session: &mut GameSession) {
        let center = session.player.center();
        for hostile in &mut session.hostiles {
            if let Some(bird) = hostile.as_bird_mut() {
                bird.rect = Rect::from_center(center, bird.rect.size());
            }
        }
    }

    fn obstacle_on_player(session: &mut GameSession) {
        let p = session.player.rect;
        let id = session.next_entity_id();
        session.hostiles.push(Hostile::Obstacle(Obstacle {
            id,
            rect: Rect::new(p.x + 5.0, p.y, 20.0, p.height),
        }));
    }

    // ── Runner ──

    #[test]
    fn test_runner_jump_only_when_grounded() {
        let mut session = GameSession::new(Variant::Runner, Settings::default(), 1);
        let jump = Intent {
            jump_requested: true,
            ..Default::default()
        };

        let events = tick(&mut session, &jump, 0.0, &NoSprites);
        assert!(events.contains(&GameEvent::Jumped));
        assert!(!session.player.grounded);
        assert!(session.player.vel.y < 0.0);

        let events = tick(&mut session, &jump, FRAME_MS, &NoSprites);
        assert!(!events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_runner_spawns_on_interval() {
        let mut session = GameSession::new(Variant::Runner, Settings::default(), 1);
        let interval = session.settings.runner.base_spawn_interval_ms;

        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(session.hostiles.is_empty());

        let events = tick(&mut session, &idle(), interval, &NoSprites);
        assert_eq!(session.hostiles.len(), 1);
        assert!(matches!(events[0], GameEvent::Spawned { .. }));
        assert_eq!(session.spawn_timer.last_spawn_ms, interval);

        let obstacle = session.hostiles[0].rect();
        let speed = session.settings.runner.base_speed;
        assert_eq!(obstacle.x, session.surface.width - speed);
        assert!((obstacle.bottom() - session.ground_top()).abs() < 1e-3);
    }

    #[test]
    fn test_runner_obstacles_leave_left_edge() {
        let mut session = GameSession::new(Variant::Runner, Settings::default(), 1);
        let id = session.next_entity_id();
        session.hostiles.push(Hostile::Obstacle(Obstacle {
            id,
            rect: Rect::new(-15.0, 100.0, 20.0, 20.0),
        }));
        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(session.hostiles.is_empty());
    }

    #[test]
    fn test_runner_collision_ends_game_and_halts() {
        let mut session = GameSession::new(Variant::Runner, Settings::default(), 1);
        obstacle_on_player(&mut session);

        let events = tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
        assert!(session.is_game_over());

        // Frozen until reset
        let ticks = session.clock.ticks;
        let events = tick(&mut session, &idle(), 100.0, &NoSprites);
        assert!(events.is_empty());
        assert_eq!(session.clock.ticks, ticks);
    }

    #[test]
    fn test_runner_distance_and_level() {
        let mut settings = Settings::default();
        settings.runner.base_spawn_interval_ms = 1e12;
        settings.runner.min_spawn_interval_ms = 1e12;
        let mut session = GameSession::new(Variant::Runner, settings, 1);

        let mut leveled = false;
        for i in 0..1000 {
            let events = tick(&mut session, &idle(), i as f64 * FRAME_MS, &NoSprites);
            leveled |= events.contains(&GameEvent::LevelUp { level: 1 });
        }
        assert!(leveled);
        assert!(session.progress.distance > 250.0);
        assert_eq!(session.progress.score, session.progress.distance.floor() as u64);
        let expected = distance_difficulty(session.progress.distance, &session.settings.runner);
        let level = session.progress.level;
        assert!(level == expected.level || level + 1 == expected.level);
    }

    #[test]
    fn test_runner_reset_after_game_over() {
        let mut session = GameSession::new(Variant::Runner, Settings::default(), 1);
        for i in 0..200 {
            tick(&mut session, &idle(), i as f64 * FRAME_MS, &NoSprites);
        }
        obstacle_on_player(&mut session);
        tick(&mut session, &idle(), 201.0 * FRAME_MS, &NoSprites);
        assert!(session.is_game_over());

        session.reset(2);
        assert!(session.is_running());
        assert_eq!(session.progress.distance, 0.0);
        assert_eq!(session.progress.score, 0);
        assert_eq!(session.progress.level, 0);
        assert!(session.hostiles.is_empty());
        assert_eq!(session.clock.ticks, 0);
        assert_eq!(session.seed(), 2);
    }

    // ── Meteors ──

    #[test]
    fn test_meteor_spawn_boundary_is_due() {
        let mut session = GameSession::new(Variant::Meteors, Settings::default(), 3);
        let interval = session.settings.meteors.spawn_interval_ms;

        tick(&mut session, &idle(), 10_000.0, &NoSprites);
        tick(&mut session, &idle(), 10_000.0 + interval - 1.0, &NoSprites);
        assert!(session.hostiles.is_empty());

        tick(&mut session, &idle(), 10_000.0 + interval, &NoSprites);
        assert_eq!(session.hostiles.len(), 1);
        // Timer restarts from the spawn time, not from zero
        assert_eq!(session.spawn_timer.last_spawn_ms, interval);

        tick(&mut session, &idle(), 10_000.0 + 2.0 * interval - 1.0, &NoSprites);
        assert_eq!(session.hostiles.len(), 1);
        tick(&mut session, &idle(), 10_000.0 + 2.0 * interval, &NoSprites);
        assert_eq!(session.hostiles.len(), 2);
    }

    #[test]
    fn test_meteor_spawn_fully_on_surface() {
        let mut session = GameSession::new(Variant::Meteors, Settings::default(), 3);
        let mut events = Vec::new();
        let tuning = session.settings.meteors;
        for _ in 0..200 {
            spawn_meteor(&mut session, &tuning, 1.0, &NoSprites, &mut events);
        }
        for hostile in &session.hostiles {
            let r = hostile.rect();
            assert!(r.left() >= 0.0 && r.right() <= session.surface.width);
            assert_eq!(r.width, tuning.base_size);
            assert_eq!(r.bottom(), 0.0);
        }
    }

    #[test]
    fn test_meteor_size_follows_sprite_aspect() {
        let mut session = GameSession::new(Variant::Meteors, Settings::default(), 3);
        let sheet = SpriteSheet::new().with(SpriteKind::Meteor, Bitmap::filled(20, 10, 255));
        let mut events = Vec::new();
        let tuning = session.settings.meteors;
        spawn_meteor(&mut session, &tuning, 1.0, &sheet, &mut events);
        let r = session.hostiles[0].rect();
        assert_eq!(r.height, tuning.base_size);
        assert_eq!(r.width, tuning.base_size * 2.0);
    }

    fn meteor_on_player(session: &mut GameSession) {
        let id = session.next_entity_id();
        let rect = session.player.rect;
        session.hostiles.push(Hostile::Meteor(Meteor {
            id,
            rect: Rect::new(rect.x, rect.y - 2.0, rect.width, rect.height),
            speed: 1.0,
        }));
    }

    #[test]
    fn test_meteor_hit_aabb() {
        let mut settings = Settings::default();
        settings.meteors.collision = CollisionMode::Aabb;
        let mut session = GameSession::new(Variant::Meteors, settings, 3);
        meteor_on_player(&mut session);
        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(session.is_game_over());
    }

    #[test]
    fn test_meteor_pixel_mode_without_alpha_is_harmless() {
        let mut session = GameSession::new(Variant::Meteors, Settings::default(), 3);
        assert_eq!(session.settings.meteors.collision, CollisionMode::Pixel);
        meteor_on_player(&mut session);
        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(session.is_running());

        // Once sprites are available the same contact is lethal
        tick(&mut session, &idle(), FRAME_MS, &SpriteSheet::procedural());
        assert!(session.is_game_over());
    }

    #[test]
    fn test_meteor_dodged_scores() {
        let mut session = GameSession::new(Variant::Meteors, Settings::default(), 3);
        let id = session.next_entity_id();
        let h = session.surface.height;
        session.hostiles.push(Hostile::Meteor(Meteor {
            id,
            rect: Rect::new(0.0, h - 1.0, 10.0, 10.0),
            speed: 5.0,
        }));
        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(session.hostiles.is_empty());
        assert_eq!(session.progress.score, 1);
    }

    #[test]
    fn test_meteor_escalation() {
        let mut session = GameSession::new(Variant::Meteors, Settings::default(), 3);
        // Keep the sky clear so nothing interferes
        session.settings.meteors.spawn_interval_ms = 1e12;
        session.settings.meteors.min_spawn_interval_ms = 1e12;
        session.pacing = Pacing::Timed(TimedDifficulty::new(0.0, &session.settings.meteors));

        tick(&mut session, &idle(), 0.0, &NoSprites);
        let events = tick(&mut session, &idle(), 60_000.0, &NoSprites);
        assert!(events.contains(&GameEvent::LevelUp { level: 1 }));
        assert_eq!(session.progress.level, 1);
    }

    // ── Birds ──

    #[test]
    fn test_eating_birds_advances_room_after_delay() {
        let mut session = GameSession::new(Variant::Birds, bird_settings(), 42);
        stack_birds_on_player(&mut session);

        let events = tick(&mut session, &idle(), 0.0, &NoSprites);
        assert_eq!(session.progress.birds_to_eat, 0);
        assert_eq!(session.progress.score, 5);
        assert!(session.hostiles.is_empty());
        assert!(events.contains(&GameEvent::RoomCleared { room: 1 }));
        assert!(session.timers.is_pending(DeferredEvent::AdvanceRoom));

        tick(&mut session, &idle(), 999.0, &NoSprites);
        assert_eq!(session.progress.room, 1);

        let events = tick(&mut session, &idle(), 1000.0, &NoSprites);
        assert!(events.contains(&GameEvent::RoomAdvanced { room: 2 }));
        assert_eq!(session.progress.room, 2);
        assert_eq!(session.progress.birds_to_eat, 6);
        assert_eq!(session.birds().count(), 6);
        assert!(session.timers.is_empty());
    }

    #[test]
    fn test_reset_cancels_pending_room_advance() {
        let mut session = GameSession::new(Variant::Birds, bird_settings(), 42);
        stack_birds_on_player(&mut session);
        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(session.timers.is_pending(DeferredEvent::AdvanceRoom));

        session.reset(42);
        assert!(session.timers.is_empty());

        for t in [5000.0, 6000.0, 7000.0] {
            let events = tick(&mut session, &idle(), t, &NoSprites);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::RoomAdvanced { .. })));
        }
        assert_eq!(session.progress.room, 1);
        assert_eq!(session.progress.birds_to_eat, 5);
    }

    #[test]
    fn test_attack_contact_costs_a_life_and_reverts_bird() {
        let mut session = GameSession::new(Variant::Birds, bird_settings(), 42);
        let center = session.player.center();
        let bird_id = session.birds().next().unwrap().id;
        if let Some(bird) = session.hostiles[0].as_bird_mut() {
            bird.rect = Rect::from_center(center, bird.rect.size());
            bird.state = BirdState::Attack {
                target: center - Vec2::new(0.0, 300.0),
            };
        }

        let events = tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(events.contains(&GameEvent::PlayerHit { hits_left: 2 }));
        assert_eq!(session.progress.hits_left, 2);
        assert!(session.is_running());

        let bird = session.birds().find(|b| b.id == bird_id).unwrap();
        assert_eq!(bird.state, BirdState::Patrol);
        assert!(bird.attack_cooldown >= session.settings.birds.attack_cooldown_min);

        // Grace period: the now-patrolling bird is not eaten on contact
        tick(&mut session, &idle(), FRAME_MS, &NoSprites);
        assert_eq!(session.progress.birds_to_eat, 5);
        assert_eq!(session.birds().count(), 5);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut session = GameSession::new(Variant::Birds, bird_settings(), 42);
        session.progress.hits_left = 1;
        let center = session.player.center();
        if let Some(bird) = session.hostiles[0].as_bird_mut() {
            bird.rect = Rect::from_center(center, bird.rect.size());
            bird.state = BirdState::Attack {
                target: center - Vec2::new(0.0, 300.0),
            };
        }

        let events = tick(&mut session, &idle(), 0.0, &NoSprites);
        assert!(events.contains(&GameEvent::PlayerHit { hits_left: 0 }));
        assert!(session.is_game_over());
    }

    #[test]
    fn test_egg_hit() {
        let mut session = GameSession::new(Variant::Birds, bird_settings(), 42);
        let id = session.next_entity_id();
        let center = session.player.center();
        session.projectiles.push(Projectile {
            id,
            circle: Circle::new(center, 5.0),
            speed: 6.0,
        });

        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert_eq!(session.progress.hits_left, 2);
        assert!(session.projectiles.is_empty());
    }

    #[test]
    fn test_patrolling_birds_drop_eggs() {
        let mut settings = bird_settings();
        settings.birds.shoot_interval_ticks = 10;
        let mut session = GameSession::new(Variant::Birds, settings, 42);

        // Every bird drops on its first update
        tick(&mut session, &idle(), 0.0, &NoSprites);
        assert_eq!(session.projectiles.len(), 5);

        for i in 1..11 {
            tick(&mut session, &idle(), i as f64 * FRAME_MS, &NoSprites);
        }
        assert_eq!(session.projectiles.len(), 5);
        tick(&mut session, &idle(), 11.0 * FRAME_MS, &NoSprites);
        assert_eq!(session.projectiles.len(), 10);
    }

    #[test]
    fn test_bird_reset_after_game_over_restores_initial_values() {
        let mut session = GameSession::new(Variant::Birds, Settings::default(), 42);
        session.progress.hits_left = 1;
        session.progress.room = 4;
        session.progress.birds_to_eat = 2;
        if let Some(bird) = session.hostiles[0].as_bird_mut() {
            bird.state = BirdState::Attack {
                target: Vec2::new(1.0, 2.0),
            };
        }
        session.phase = GamePhase::GameOver;

        session.reset(42);
        assert_eq!(session.progress.hits_left, 3);
        assert_eq!(session.progress.room, 1);
        assert_eq!(session.progress.birds_to_eat, 5);
        assert_eq!(session.birds().count(), 5);
        assert!(session.birds().all(|b: &Bird| b.state == BirdState::Patrol));
        assert!(session.projectiles.is_empty());
        assert!(session.is_running());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameSession::new(Variant::Birds, Settings::default(), 99_999);
        let mut b = GameSession::new(Variant::Birds, Settings::default(), 99_999);

        let inputs = [
            Intent {
                move_left: true,
                ..Default::default()
            },
            Intent {
                pointer_target: Some(Vec2::new(600.0, 380.0)),
                ..Default::default()
            },
            Intent::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            let now = i as f64 * FRAME_MS;
            assert_eq!(tick(&mut a, input, now, &NoSprites), tick(&mut b, input, now, &NoSprites));
        }

        let rects = |s: &GameSession| s.hostiles.iter().map(Hostile::rect).collect::<Vec<_>>();
        assert_eq!(rects(&a), rects(&b));
        assert_eq!(a.progress, b.progress);
        assert_eq!(a.player.rect, b.player.rect);
    }
}
