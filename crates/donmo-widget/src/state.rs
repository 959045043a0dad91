//! Widget donation state and phase machine.
//!
//! # State diagram
//!
//! ```text
//!   build()                 quote shown              create ok
//!  Uninitialized ──► Idle ───────────────► Pending ──────────► Confirmed
//!                     ▲                      ▲                     │
//!                     │       remove ok      │     quote shown     │
//!                     └──────────────────────┴─────────────────────┘
//! ```
//!
//! `refresh` may force any built phase into `Pending` (a fresh quote) or
//! `Confirmed` (the cart already holds the right donation), and a cancel
//! may land from any built phase into `Idle` (the cart can hold a donation
//! this session never confirmed). The error overlay is tracked separately
//! and does not change the phase.

use donmo_schemas::Amount;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WidgetPhase {
    /// `build()` has not completed.
    Uninitialized,
    /// Built, no donation in play.
    Idle,
    /// A quoted donation is displayed but not confirmed.
    Pending,
    /// The donation is in the cart (and on the backend unless backend-based).
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Built,
    Quoted,
    RoundedUp,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: WidgetPhase,
    pub event: PhaseEvent,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "illegal widget transition: {:?} + {:?}", self.from, self.event)
    }
}

impl std::error::Error for TransitionError {}

impl WidgetPhase {
    /// Phase after `event`, or the reason it cannot apply.
    pub fn next(self, event: PhaseEvent) -> Result<WidgetPhase, TransitionError> {
        use PhaseEvent::*;
        use WidgetPhase::*;

        match (self, event) {
            (Uninitialized, Built) => Ok(Idle),
            (Uninitialized, _) | (_, Built) => Err(TransitionError { from: self, event }),
            (_, Quoted) => Ok(Pending),
            (_, RoundedUp) => Ok(Confirmed),
            (_, Cancelled) => Ok(Idle),
        }
    }
}

/// In-memory state owned by one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonationState {
    pub current_donation: Amount,
    pub currency_symbol: String,
    pub is_loaded: bool,
    /// The error overlay is on screen and a revert is pending.
    pub showing_error: bool,
    phase: WidgetPhase,
}

impl DonationState {
    pub fn new(default_donation: Amount) -> Self {
        Self {
            current_donation: default_donation,
            currency_symbol: String::new(),
            is_loaded: false,
            showing_error: false,
            phase: WidgetPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> WidgetPhase {
        self.phase
    }

    /// Rounded up exactly when the phase is `Confirmed`.
    pub fn is_rounded_up(&self) -> bool {
        self.phase == WidgetPhase::Confirmed
    }

    pub fn apply(&mut self, event: PhaseEvent) -> Result<WidgetPhase, TransitionError> {
        self.phase = self.phase.next(event)?;
        Ok(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_but_build_leaves_uninitialized() {
        for ev in [PhaseEvent::Quoted, PhaseEvent::RoundedUp, PhaseEvent::Cancelled] {
            let err = WidgetPhase::Uninitialized.next(ev).unwrap_err();
            assert_eq!(err.from, WidgetPhase::Uninitialized);
        }
        assert_eq!(
            WidgetPhase::Uninitialized.next(PhaseEvent::Built),
            Ok(WidgetPhase::Idle)
        );
    }

    #[test]
    fn build_twice_is_illegal() {
        assert!(WidgetPhase::Idle.next(PhaseEvent::Built).is_err());
        assert!(WidgetPhase::Confirmed.next(PhaseEvent::Built).is_err());
    }

    #[test]
    fn rounded_up_tracks_confirmed_phase() {
        let mut s = DonationState::new(Amount::from_cents(1));
        assert!(!s.is_rounded_up());
        s.apply(PhaseEvent::Built).unwrap();
        s.apply(PhaseEvent::Quoted).unwrap();
        assert!(!s.is_rounded_up());
        s.apply(PhaseEvent::RoundedUp).unwrap();
        assert!(s.is_rounded_up());
        s.apply(PhaseEvent::Cancelled).unwrap();
        assert_eq!(s.phase(), WidgetPhase::Idle);
        assert!(!s.is_rounded_up());
    }

    #[test]
    fn failed_transition_leaves_phase_unchanged() {
        let mut s = DonationState::new(Amount::from_cents(1));
        assert!(s.apply(PhaseEvent::RoundedUp).is_err());
        assert_eq!(s.phase(), WidgetPhase::Uninitialized);
    }
}
