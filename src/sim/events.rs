//! Deferred transitions
//!
//! Fire-once timers keyed by session time. They only fire from inside a tick,
//! and a reset cancels everything pending.

use serde::{Deserialize, Serialize};

/// Transitions that happen some time after their cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredEvent {
    /// Move the bird hunt to its next room
    AdvanceRoom,
}

#[derive(Debug, Clone)]
struct Scheduled {
    generation: u32,
    seq: u64,
    due_ms: f64,
    event: DeferredEvent,
}

/// Pending deferred events
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<Scheduled>,
    generation: u32,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, event: DeferredEvent) {
        self.pending.push(Scheduled {
            generation: self.generation,
            seq: self.next_seq,
            due_ms,
            event,
        });
        self.next_seq += 1;
    }

    /// Drop everything pending; nothing scheduled before this call can fire
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timer(s)", self.pending.len());
        }
        self.pending.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_pending(&self, event: DeferredEvent) -> bool {
        self.pending.iter().any(|s| s.event == event)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return events due at `now_ms`, earliest first
    pub fn pop_due(&mut self, now_ms: f64) -> Vec<DeferredEvent> {
        let generation = self.generation;
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.generation != generation {
                return false;
            }
            if s.due_ms <= now_ms {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.event).collect()
    }
}
