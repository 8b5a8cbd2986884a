//! Leading/trailing rate limiter.
//!
//! Time is passed in rather than read from the clock, so the event loop
//! decides when to poll and tests drive it deterministically.

use std::time::{Duration, Instant};

/// Which edges of a burst fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Fire on the first call of a window.
    pub leading: bool,
    /// Fire once at the end of a window that saw further calls.
    pub trailing: bool,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

/// Rate limiter allowing at most one fire per window.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    policy: ThrottlePolicy,
    window_start: Option<Instant>,
    pending: bool,
}

impl Throttle {
    /// Create a throttle with the given window and policy.
    pub fn new(window: Duration, policy: ThrottlePolicy) -> Self {
        Self {
            window,
            policy,
            window_start: None,
            pending: false,
        }
    }

    /// Register a call. Returns `true` when the caller should run now.
    pub fn call(&mut self, now: Instant) -> bool {
        match self.window_start {
            Some(start) if now.saturating_duration_since(start) < self.window => {
                self.pending |= self.policy.trailing;
                false
            }
            _ => {
                self.window_start = Some(now);
                if self.policy.leading {
                    self.pending = false;
                    true
                } else {
                    self.pending = self.policy.trailing;
                    false
                }
            }
        }
    }

    /// Returns `true` when a trailing call is due.
    ///
    /// A trailing fire opens a new window, so calls right after it are
    /// throttled again.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(start) = self.window_start else {
            return false;
        };
        if now.saturating_duration_since(start) < self.window {
            return false;
        }
        if self.pending {
            self.pending = false;
            self.window_start = Some(now);
            true
        } else {
            self.window_start = None;
            false
        }
    }

    /// When the pending trailing call becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.pending {
            self.window_start.map(|start| start + self.window)
        } else {
            None
        }
    }

    /// Whether a trailing call is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
