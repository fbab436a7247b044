//! Frame scheduling
//!
//! Stand-in for the display's animation-frame callback. The driver hands out
//! request handles, turns host timestamps into clamped deltas, and can be
//! cancelled and restarted without ever having two frames scheduled at once.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DELTA_MS;

/// Handle for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRequest(u64);

/// Timing for one delivered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Host timestamp as delivered
    pub timestamp_ms: f64,
    /// Clamped time since the previous frame; zero for the first frame
    pub delta_ms: f64,
    /// Sum of clamped deltas since the last restart
    pub elapsed_ms: f64,
    pub index: u64,
}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    pending: Option<FrameRequest>,
    next_id: u64,
    last_timestamp_ms: Option<f64>,
    elapsed_ms: f64,
    frames: u64,
    max_delta_ms: f64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::with_max_delta(MAX_FRAME_DELTA_MS)
    }

    pub fn with_max_delta(max_delta_ms: f64) -> Self {
        Self {
            pending: None,
            next_id: 1,
            last_timestamp_ms: None,
            elapsed_ms: 0.0,
            frames: 0,
            max_delta_ms: max_delta_ms.max(0.0),
        }
    }

    /// Schedule the next frame. While one is already pending its handle is
    /// returned instead of scheduling another.
    pub fn request(&mut self) -> FrameRequest {
        if let Some(pending) = self.pending {
            return pending;
        }
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending = Some(request);
        request
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Stop future frames. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Cancel, forget timing history and schedule a fresh first frame
    pub fn restart(&mut self) -> FrameRequest {
        self.cancel();
        self.last_timestamp_ms = None;
        self.elapsed_ms = 0.0;
        self.frames = 0;
        log::debug!("Frame driver restarted");
        self.request()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Host callback for `request`. Stale or cancelled handles yield `None`.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) -> Option<Frame> {
        if self.pending != Some(request) {
            log::trace!("Ignoring stale frame request {}", request.0);
            return None;
        }
        self.pending = None;

        let delta_ms = match self.last_timestamp_ms {
            Some(last) if timestamp_ms.is_finite() => {
                (timestamp_ms - last).clamp(0.0, self.max_delta_ms)
            }
            _ => 0.0,
        };
        if timestamp_ms.is_finite() {
            // Timestamps that run backward do not rewind the reference point
            let last = self.last_timestamp_ms.map_or(timestamp_ms, |last| last.max(timestamp_ms));
            self.last_timestamp_ms = Some(last);
        }

        self.elapsed_ms += delta_ms;
        let frame = Frame {
            timestamp_ms,
            delta_ms,
            elapsed_ms: self.elapsed_ms,
            index: self.frames,
        };
        self.frames += 1;
        Some(frame)
    }
}
