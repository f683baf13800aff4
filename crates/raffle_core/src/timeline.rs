//! Timed display transitions of a draw: drawing, revealed, hidden.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::timers::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Suspense interval between starting a draw and revealing the winner.
    pub draw_delay: Duration,
    pub confetti: Duration,
    pub announcement: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            draw_delay: Duration::from_millis(2_500),
            confetti: Duration::from_millis(6_000),
            announcement: Duration::from_millis(7_000),
        }
    }
}

impl Timings {
    pub fn immediate() -> Self {
        Self {
            draw_delay: Duration::ZERO,
            confetti: Duration::ZERO,
            announcement: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Reveal,
    StopConfetti,
    HideAnnouncement,
}

#[derive(Debug, Clone)]
pub struct RevealTimeline {
    timings: Timings,
    timers: TimerQueue<Transition>,
    announcement_visible: bool,
    confetti_active: bool,
}

impl RevealTimeline {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            timers: TimerQueue::new(),
            announcement_visible: false,
            confetti_active: false,
        }
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn is_announcement_visible(&self) -> bool {
        self.announcement_visible
    }

    pub fn is_confetti_active(&self) -> bool {
        self.confetti_active
    }

    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Supersedes whatever the previous draw left running.
    pub fn start_draw(&mut self, now: Instant) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "cancelled stale reveal timers");
        }
        self.announcement_visible = false;
        self.confetti_active = false;
        self.timers
            .schedule(Transition::Reveal, now + self.timings.draw_delay);
    }

    /// Shows the announcement and confetti, scheduling both to switch off
    /// relative to `at`.
    pub fn reveal(&mut self, at: Instant) {
        self.announcement_visible = true;
        self.confetti_active = true;
        self.timers
            .schedule(Transition::StopConfetti, at + self.timings.confetti);
        self.timers
            .schedule(Transition::HideAnnouncement, at + self.timings.announcement);
    }

    /// Pops the next due transition. Display-only transitions are applied
    /// here; `Reveal` is returned for the caller to resolve the draw.
    pub fn next_due(&mut self, now: Instant) -> Option<(Instant, Transition)> {
        let (at, transition) = self.timers.pop_due(now)?;
        match transition {
            Transition::Reveal => {}
            Transition::StopConfetti => self.confetti_active = false,
            Transition::HideAnnouncement => self.announcement_visible = false,
        }
        Some((at, transition))
    }

    pub fn cancel_all(&mut self) {
        self.timers.cancel_all();
        self.announcement_visible = false;
        self.confetti_active = false;
    }
}
