//! Eased scroll animation for `ScrollBehaviour::Animated` jumps.

use std::time::{Duration, Instant};

/// Easing curve applied to the animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start and end.
    #[default]
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress `t` in `0.0..=1.0` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
        }
    }
}

/// Scroll offset moving from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTween {
    from: usize,
    to: usize,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl ScrollTween {
    /// Tween from `from` to `to` starting at `started`.
    pub fn new(from: usize, to: usize, started: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            started,
            duration: duration.max(Duration::from_millis(1)),
            easing,
        }
    }

    /// Final offset.
    pub fn target(&self) -> usize {
        self.to
    }

    /// Whether the tween has reached its target.
    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Offset at `now`, clamped to the end points.
    pub fn sample(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        let eased = self.easing.apply(t);
        let from = self.from as f32;
        let to = self.to as f32;
        (from + (to - from) * eased).round().max(0.0) as usize
    }

    /// Move both end points by `delta` while the animation runs.
    ///
    /// Used when the sticky block changes height mid-flight and the host
    /// compensates the scroll offset.
    pub fn shift(&mut self, delta: isize) {
        self.from = self.from.saturating_add_signed(delta);
        self.to = self.to.saturating_add_signed(delta);
    }
}
