//! Countdown clock for a timed attempt.
//!
//! The clock is a caller-driven state machine. It does not use internal
//! threads or timers - the driver is responsible for calling `tick()` once
//! per second while the attempt is in progress.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Expired | Idle)
//! ```
//!
//! `start` while already running replaces the countdown with the new value;
//! timers never stack, so a restart cannot leave a second registration
//! behind.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPhase {
    Idle,
    Running,
    Expired,
}

/// One-second countdown from a total number of seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    phase: ClockPhase,
    remaining_secs: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            phase: ClockPhase::Idle,
            remaining_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.phase == ClockPhase::Running
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or restart) the countdown from `total_secs`.
    ///
    /// A start while already running replaces the running countdown with the
    /// new value; it never stacks a second one.
    pub fn start(&mut self, total_secs: u64) {
        self.phase = ClockPhase::Running;
        self.remaining_secs = total_secs;
    }

    /// Halt without expiring. Idempotent; a stop after expiry keeps the
    /// clock expired.
    pub fn stop(&mut self) {
        if self.phase == ClockPhase::Running {
            self.phase = ClockPhase::Idle;
        }
    }

    /// Advance by one second. Call once per second while running.
    ///
    /// Every call while running yields a `Tick` carrying the new remaining
    /// value; the tick that reaches zero is followed by exactly one
    /// `Expired`, after which the clock is inert and yields nothing.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.phase != ClockPhase::Running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let mut events = vec![Event::Tick {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }];
        if self.remaining_secs == 0 {
            self.phase = ClockPhase::Expired;
            events.push(Event::Expired { at: Utc::now() });
        }
        events
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
