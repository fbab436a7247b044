//! Game shell
//!
//! Owns one session and the frame driver, and runs each delivered frame in a
//! fixed order: surface sync, input, tick, draw, HUD push, reschedule.

use crate::driver::{FrameDriver, FrameRequest};
use crate::platform::{HudSink, InputSource, RenderSink, SurfaceProvider};
use crate::settings::Settings;
use crate::sim::{AlphaSampler, GameEvent, GameSession, Variant, tick};

/// Collaborators a frame talks to
pub struct Host<'a> {
    pub input: &'a mut dyn InputSource,
    pub surface: &'a dyn SurfaceProvider,
    pub render: &'a mut dyn RenderSink,
    pub hud: &'a mut dyn HudSink,
}

pub struct Game {
    session: GameSession,
    driver: FrameDriver,
    sampler: Box<dyn AlphaSampler>,
}

impl Game {
    pub fn new(
        variant: Variant,
        settings: Settings,
        seed: u64,
        sampler: Box<dyn AlphaSampler>,
    ) -> Self {
        log::info!("New {} game (seed {})", variant.as_str(), seed);
        Self {
            session: GameSession::new(variant, settings, seed),
            driver: FrameDriver::new(),
            sampler,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    /// Schedule the first frame
    pub fn start(&mut self) -> FrameRequest {
        self.driver.request()
    }

    /// Stop the loop without touching the session
    pub fn suspend(&mut self) -> bool {
        self.driver.cancel()
    }

    /// Run one frame for `request`.
    ///
    /// Returns the next request while the session is running. Stale requests
    /// do nothing and return `None`.
    pub fn frame(
        &mut self,
        request: FrameRequest,
        timestamp_ms: f64,
        host: &mut Host<'_>,
    ) -> Option<FrameRequest> {
        let frame = self.driver.on_frame(request, timestamp_ms)?;

        self.session.set_surface(host.surface.size());
        let intent = host.input.sample(&self.session);
        let sampler = self.sampler.as_ref();
        let events: Vec<GameEvent> = tick(&mut self.session, &intent, frame.elapsed_ms, sampler);

        host.render.draw(&self.session);
        host.hud.update(&self.session.hud(), &events);

        if self.session.is_running() {
            Some(self.driver.request())
        } else {
            log::debug!("Frame loop halted after {} frames", self.driver.frames());
            None
        }
    }

    /// Reset the session and restart the frame loop from a zero delta
    pub fn restart(&mut self, seed: u64) -> FrameRequest {
        self.session.reset(seed);
        self.driver.restart()
    }
}
