//! Click/drag disambiguation for a single pointer.
//!
//! A press starts a hold timer. Releasing before it elapses is a click; holding
//! past it turns the press into a drag, and the following release is a drop.
//!
//! ```text
//!   Idle ──down──▶ PendingDrag ──timer──▶ Dragging
//!    ▲                 │                     │
//!    └──── up (click) ─┘                     │
//!    └──────────────── up (drop) ────────────┘
//! ```
//!
//! There is no timer thread. The host reports elapsed timers through
//! [`GestureDisambiguator::timer_elapsed`] or polls with
//! [`GestureDisambiguator::poll`]; either way the machine only moves on the
//! current session, so a timer left over from an earlier press is ignored.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::trace;

use crate::config::GestureConfig;
use crate::item::Schedulable;
use crate::reschedule::{reschedule, ProposedRange};
use crate::slot::SlotGranularity;

/// Identifies one press-to-release interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    /// Pointer is down and the hold timer is armed until `deadline`.
    PendingDrag { session: SessionId, deadline: Instant },
    Dragging { session: SessionId },
}

/// What a transition means to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Released before the hold threshold: open or select the item.
    Click,
    /// Hold threshold passed with the pointer still down.
    DragStarted,
    /// Released while dragging: reschedule at the release point.
    Drop,
    /// The host cancelled the interaction before release.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct GestureDisambiguator {
    hold_threshold: Duration,
    state: GestureState,
    next_session: u64,
}

impl Default for GestureDisambiguator {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureDisambiguator {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            hold_threshold: Duration::from_millis(config.hold_threshold_ms),
            state: GestureState::Idle,
            next_session: 0,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// When the armed hold timer fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            GestureState::PendingDrag { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Start a new session, cancelling whatever the previous one was doing.
    pub fn pointer_down(&mut self, now: Instant) -> SessionId {
        if self.state != GestureState::Idle {
            trace!("pointer down while {:?}; previous session cancelled", self.state);
        }
        let session = SessionId(self.next_session);
        self.next_session += 1;
        self.state = GestureState::PendingDrag {
            session,
            deadline: now + self.hold_threshold,
        };
        session
    }

    /// The hold timer armed for `session` fired.
    ///
    /// Returns [`GestureEvent::DragStarted`] if that session is still pending;
    /// timers from superseded or finished sessions do nothing.
    pub fn timer_elapsed(&mut self, session: SessionId) -> Option<GestureEvent> {
        match self.state {
            GestureState::PendingDrag { session: current, .. } if current == session => {
                self.state = GestureState::Dragging { session };
                trace!("session {:?} became a drag", session);
                Some(GestureEvent::DragStarted)
            }
            _ => None,
        }
    }

    /// Fire the hold timer if `now` has reached its deadline.
    pub fn poll(&mut self, now: Instant) -> Option<GestureEvent> {
        match self.state {
            GestureState::PendingDrag { session, deadline } if now >= deadline => {
                self.timer_elapsed(session)
            }
            _ => None,
        }
    }

    /// Release the pointer.
    ///
    /// A pending press whose deadline has already passed counts as a drag that
    /// was never polled, so it drops rather than clicks.
    pub fn pointer_up(&mut self, now: Instant) -> Option<GestureEvent> {
        let event = match self.state {
            GestureState::Idle => return None,
            GestureState::PendingDrag { deadline, .. } if now < deadline => GestureEvent::Click,
            GestureState::PendingDrag { .. } | GestureState::Dragging { .. } => GestureEvent::Drop,
        };
        trace!("pointer up while {:?}: {:?}", self.state, event);
        self.state = GestureState::Idle;
        Some(event)
    }

    /// Abandon the current session without a click or drop.
    pub fn abort(&mut self) -> Option<GestureEvent> {
        if self.state == GestureState::Idle {
            return None;
        }
        self.state = GestureState::Idle;
        Some(GestureEvent::Aborted)
    }
}

/// The range to propose for `item` after `event`, if the event was a drop.
pub fn proposal_for(
    event: GestureEvent,
    item: &Schedulable,
    drop: DateTime<Utc>,
    granularity: SlotGranularity,
) -> Option<ProposedRange> {
    match event {
        GestureEvent::Drop => reschedule(item, drop, granularity),
        GestureEvent::Click | GestureEvent::DragStarted | GestureEvent::Aborted => None,
    }
}
