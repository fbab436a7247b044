//! Platform abstraction layer
//!
//! Seams between the simulation and whatever hosts it:
//! - Input (keyboard/touch or a planner) sampled once per tick
//! - Drawing, which only ever sees a shared borrow of the session
//! - Score display, push-only
//! - Drawing surface geometry

use std::collections::VecDeque;

use crate::sim::{GameEvent, GameSession, Hud, Intent, Surface};

/// Produces the intent for the coming tick
pub trait InputSource {
    fn sample(&mut self, session: &GameSession) -> Intent;
}

impl<F> InputSource for F
where
    F: FnMut(&GameSession) -> Intent,
{
    fn sample(&mut self, session: &GameSession) -> Intent {
        self(session)
    }
}

/// Draws the session after it has been updated
pub trait RenderSink {
    fn draw(&mut self, session: &GameSession);
}

/// Receives score/lives/room after each tick
pub trait HudSink {
    fn update(&mut self, hud: &Hud, events: &[GameEvent]);
}

/// Reports the current drawing surface size
pub trait SurfaceProvider {
    fn size(&self) -> Surface;
}

impl SurfaceProvider for Surface {
    fn size(&self) -> Surface {
        *self
    }
}

/// Replays a fixed list of intents, then stays idle
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<Intent>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            queue: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self, _session: &GameSession) -> Intent {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Headless renderer; only counts frames
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRender {
    pub frames: u64,
}

impl RenderSink for NullRender {
    fn draw(&mut self, _session: &GameSession) {
        self.frames += 1;
    }
}

/// HUD that writes notable events to the log and keeps the last snapshot
#[derive(Debug, Clone, Default)]
pub struct LogHud {
    pub last: Option<Hud>,
    pub events_seen: usize,
}

impl HudSink for LogHud {
    fn update(&mut self, hud: &Hud, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Jumped | GameEvent::Spawned { .. } => {
                    log::trace!("{:?}", event)
                }
                _ => log::debug!("[{}] {:?}", hud.variant.as_str(), event),
            }
        }
        self.events_seen += events.len();
        self.last = Some(hud.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::Variant;

    #[test]
    fn test_scripted_input_then_idle() {
        let session = GameSession::new(Variant::Runner, Settings::default(), 1);
        let jump = Intent {
            jump_requested: true,
            ..Default::default()
        };
        let mut input = ScriptedInput::new([jump.clone()]);
        assert_eq!(input.sample(&session), jump);
        assert_eq!(input.sample(&session), Intent::default());
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_closure_input() {
        let session = GameSession::new(Variant::Meteors, Settings::default(), 1);
        let mut calls = 0;
        let mut input = |_: &GameSession| {
            calls += 1;
            Intent {
                move_left: true,
                ..Default::default()
            }
        };
        assert!(input.sample(&session).move_left);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_log_hud_keeps_snapshot() {
        let session = GameSession::new(Variant::Birds, Settings::default(), 1);
        let mut hud = LogHud::default();
        hud.update(&session.hud(), &[GameEvent::PlayerHit { hits_left: 2 }]);
        assert_eq!(hud.events_seen, 1);
        assert_eq!(hud.last.as_ref().map(|h| h.hits_left), Some(3));
    }
}
