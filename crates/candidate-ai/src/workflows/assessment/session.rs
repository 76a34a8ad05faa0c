//! Live-session violation monitor.
//!
//! The monitor is a finite-state machine over discrete events, driven by
//! event injection rather than real timers so it is fully testable. Three
//! triggers can end a session (manual submit, timer expiry, visibility
//! loss); a single-writer guard, checked-and-set before any submission
//! work begins, guarantees exactly one of them executes the terminal
//! submission.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::domain::ViolationLog;
use crate::workflows::screening::domain::Opportunity;

/// Session length when the opportunity does not specify one.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Active,
    SuspendedForced,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            SessionState::Active => "active",
            SessionState::SuspendedForced => "suspended_forced",
        }
    }
}

/// Discrete inputs to the monitor. `Tick` advances the countdown by one
/// second; the rest map to browser-side signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick,
    VisibilityLost,
    PasteAttempt,
    ManualSubmit,
}

/// Which trigger won the race to execute the terminal submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionTrigger {
    Manual,
    TimerExpired,
    ViolationForced,
}

#[derive(Debug)]
pub struct SessionMonitor {
    state: SessionState,
    remaining_seconds: u32,
    elapsed_seconds: u32,
    focus_loss_count: u32,
    paste_attempt_count: u32,
    violation_flag: bool,
    submit_guard: AtomicBool,
}

impl SessionMonitor {
    pub fn new(duration_minutes: Option<u32>) -> Self {
        let minutes = duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        Self {
            state: SessionState::Active,
            remaining_seconds: minutes * 60,
            elapsed_seconds: 0,
            focus_loss_count: 0,
            paste_attempt_count: 0,
            violation_flag: false,
            submit_guard: AtomicBool::new(false),
        }
    }

    pub fn for_opportunity(opportunity: &Opportunity) -> Self {
        Self::new(opportunity.duration_minutes)
    }

    /// Feed one event through the machine. Returns the submission trigger
    /// exactly once across the whole session; every later trigger is a
    /// no-op.
    pub fn apply(&mut self, event: SessionEvent) -> Option<SubmissionTrigger> {
        match event {
            SessionEvent::Tick => {
                if self.state != SessionState::Active {
                    return None;
                }
                self.elapsed_seconds += 1;
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                if self.remaining_seconds == 0 && self.arm_submission() {
                    // Expiry keeps the violation flag at whatever the
                    // session accumulated; it is not itself a violation.
                    return Some(SubmissionTrigger::TimerExpired);
                }
                None
            }
            SessionEvent::VisibilityLost => {
                self.focus_loss_count += 1;
                self.violation_flag = true;
                self.state = SessionState::SuspendedForced;
                if self.arm_submission() {
                    return Some(SubmissionTrigger::ViolationForced);
                }
                None
            }
            SessionEvent::PasteAttempt => {
                // Rejected and counted; the session stays live.
                self.paste_attempt_count += 1;
                None
            }
            SessionEvent::ManualSubmit => {
                if self.arm_submission() {
                    return Some(SubmissionTrigger::Manual);
                }
                None
            }
        }
    }

    /// Check-and-set the single-writer guard. Must run before any oracle
    /// work so concurrent triggers cannot both start a submission.
    fn arm_submission(&self) -> bool {
        self.submit_guard
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn violation_flag(&self) -> bool {
        self.violation_flag
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn violation_log(&self) -> ViolationLog {
        ViolationLog {
            focus_loss_count: self.focus_loss_count,
            paste_attempt_count: self.paste_attempt_count,
            elapsed_seconds: self.elapsed_seconds,
        }
    }
}
