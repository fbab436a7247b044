//! Autopilot for idle/demo mode and headless runs
//!
//! Reads the session through a shared borrow and produces the same [`Intent`]
//! a human would. Runner: jump when the next obstacle is close. Meteors and
//! birds: score a few candidate positions by how much falling danger lines
//! up with them, and in the bird hunt chase any bird low enough to eat.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::platform::InputSource;
use crate::sim::{BirdState, GameSession, Hostile, Intent, Pacing, Rect, Variant};

/// Planner knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Jump when an obstacle will reach the dino within this many ticks
    pub jump_lead_ticks: f32,
    /// Ignore falling threats further away than this many ticks
    pub lookahead_ticks: f32,
    /// Extra horizontal clearance around the player (pixels)
    pub threat_margin: f32,
    /// How far ahead (in ticks of movement) a dodge candidate is evaluated
    pub commit_ticks: f32,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            jump_lead_ticks: 12.0,
            lookahead_ticks: 60.0,
            threat_margin: 6.0,
            commit_ticks: 15.0,
        }
    }
}

/// Something heading for the player
#[derive(Debug, Clone, Copy)]
struct Threat {
    rect: Rect,
    /// Pixels per tick downward
    fall_speed: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    config: AutopilotConfig,
    jumps: u64,
    dodges: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AutopilotConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Jumps and dodges issued so far
    pub fn stats(&self) -> (u64, u64) {
        (self.jumps, self.dodges)
    }

    pub fn plan(&mut self, session: &GameSession) -> Intent {
        if !session.is_running() {
            return Intent::default();
        }
        match session.variant {
            Variant::Runner => self.plan_runner(session),
            Variant::Meteors | Variant::Birds => self.plan_avoider(session),
        }
    }

    fn plan_runner(&mut self, session: &GameSession) -> Intent {
        let player = session.player.rect;
        let speed = match session.pacing {
            Pacing::Distance(d) => d.speed,
            _ => session.settings.runner.base_speed,
        };

        let nearest_gap = session
            .hostiles
            .iter()
            .map(Hostile::rect)
            .filter(|r| r.right() >= player.left())
            .map(|r| r.left() - player.right())
            .fold(f32::INFINITY, f32::min);

        let jump = session.player.grounded && nearest_gap <= speed * self.config.jump_lead_ticks;
        if jump {
            self.jumps += 1;
        }
        Intent {
            jump_requested: jump,
            ..Default::default()
        }
    }

    fn plan_avoider(&mut self, session: &GameSession) -> Intent {
        let threats = collect_threats(session);
        let player = session.player.rect;
        let area = session.play_area();
        let reach = session.player.speed * self.config.commit_ticks;

        let danger_here = self.danger(&player, &threats);

        // Bird hunt: walk toward the nearest bird that has come down low
        if danger_here == 0.0 {
            return Intent {
                pointer_target: edible_target(session),
                ..Default::default()
            };
        }

        let mut best = (0.0_f32, danger_here);
        for dir in [-1.0_f32, 1.0] {
            let mut candidate = player;
            candidate.x += dir * reach;
            area.clamp(&mut candidate);
            let danger = self.danger(&candidate, &threats);
            if danger < best.1 {
                best = (dir, danger);
            }
        }

        if best.0 == 0.0 {
            return Intent::default();
        }
        self.dodges += 1;
        Intent {
            move_left: best.0 < 0.0,
            move_right: best.0 > 0.0,
            ..Default::default()
        }
    }

    /// Weighted count of threats that line up with `rect` within the lookahead
    fn danger(&self, rect: &Rect, threats: &[Threat]) -> f32 {
        let margin = self.config.threat_margin;
        threats
            .iter()
            .filter(|t| {
                t.rect.right() + margin >= rect.left() && t.rect.left() - margin <= rect.right()
            })
            .filter_map(|t| {
                if t.rect.top() > rect.bottom() {
                    return None;
                }
                let gap = rect.top() - t.rect.bottom();
                let ticks = if gap <= 0.0 {
                    0.0
                } else if t.fall_speed > 0.0 {
                    gap / t.fall_speed
                } else {
                    return None;
                };
                (ticks <= self.config.lookahead_ticks).then(|| 1.0 / (1.0 + ticks))
            })
            .sum()
    }
}

impl InputSource for Autopilot {
    fn sample(&mut self, session: &GameSession) -> Intent {
        self.plan(session)
    }
}

fn collect_threats(session: &GameSession) -> Vec<Threat> {
    let mut threats: Vec<Threat> = session
        .projectiles
        .iter()
        .map(|p| Threat {
            rect: p.circle.bounding_rect(),
            fall_speed: p.speed,
        })
        .collect();

    for hostile in &session.hostiles {
        match hostile {
            Hostile::Meteor(m) => threats.push(Threat {
                rect: m.rect,
                fall_speed: m.speed,
            }),
            // A diving bird will end up centered on its target
            Hostile::Bird(b) => {
                if let BirdState::Attack { target } = b.state {
                    threats.push(Threat {
                        rect: Rect::from_center(target, b.rect.size()),
                        fall_speed: 0.0,
                    });
                }
            }
            Hostile::Obstacle(_) => {}
        }
    }
    threats
}

/// Center of the nearest patrolling bird inside the play area
fn edible_target(session: &GameSession) -> Option<Vec2> {
    let area = session.play_area();
    let from = session.player.center();
    session
        .birds()
        .filter(|b| b.state == BirdState::Patrol && b.rect.bottom() >= area.min.y)
        .map(|b| b.rect.center())
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
}
