//! Self-scheduling re-fetch while list items have pending tasks.
//!
//! The supervisor never sleeps or fetches on its own. The owning view asks it
//! what to do and reports back:
//!
//! ```text
//! Idle ──observe(pending)──► Scheduled{due} ──fire(now ≥ due)──► InFlight{seq}
//!  ▲                              │   ▲                               │
//!  │                              │   └────────observe(pending)───────┤
//!  └──────observe(!pending) / failed / cancel ◄───────────────────────┘
//! ```
//!
//! There is never more than one deadline, so the number of pending items does
//! not change how many fetches go out.

use std::time::Duration;

use tokio::time::Instant;

use crate::state::RequestSeq;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Scheduled { due: Instant },
    InFlight { seq: RequestSeq },
}

/// What the supervisor decided after a result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Schedule { due: Instant },
    Stop,
}

#[derive(Debug, Clone)]
pub struct PollSupervisor {
    delay: Duration,
    state: PollState,
}

impl PollSupervisor {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: PollState::Idle,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn state(&self) -> PollState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, PollState::Idle)
    }

    /// The single pending deadline, if one is armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            PollState::Scheduled { due } => Some(due),
            PollState::Idle | PollState::InFlight { .. } => None,
        }
    }

    /// Re-evaluate after a fetch result was applied.
    ///
    /// Replaces any existing deadline.
    pub fn observe(&mut self, any_pending: bool, now: Instant) -> PollDecision {
        if any_pending {
            let due = now + self.delay;
            self.state = PollState::Scheduled { due };
            tracing::debug!(delay_ms = self.delay.as_millis() as u64, "poll scheduled");
            PollDecision::Schedule { due }
        } else {
            if self.is_active() {
                tracing::debug!("no pending items, polling stopped");
            }
            self.state = PollState::Idle;
            PollDecision::Stop
        }
    }

    /// The latest fetch failed. Polling stops; nothing is retried.
    pub fn observe_failure(&mut self) {
        self.state = PollState::Idle;
    }

    /// True when the deadline has passed and a poll fetch should go out now.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.state, PollState::Scheduled { due } if now >= due)
    }

    /// Record the poll fetch that was issued for the elapsed deadline.
    pub fn mark_in_flight(&mut self, seq: RequestSeq) {
        self.state = PollState::InFlight { seq };
    }

    pub fn cancel(&mut self) {
        self.state = PollState::Idle;
    }
}
