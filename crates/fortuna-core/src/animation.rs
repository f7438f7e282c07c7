//! Easing curves and tweens for wheel and reel motion.
//!
//! The browser adapter hands [`CubicBezier::to_css`] to CSS transitions, while
//! frame-driven renderers sample [`Tween::value_at`] directly. Both describe the
//! same curve, so either path lands on the same frame.

use serde::{Deserialize, Serialize};

// =============================================================================
// CubicBezier
// =============================================================================

/// CSS-style cubic Bézier timing curve through (0,0), (x1,y1), (x2,y2), (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    /// First control point x (clamped to [0, 1])
    pub x1: f64,
    /// First control point y
    pub y1: f64,
    /// Second control point x (clamped to [0, 1])
    pub x2: f64,
    /// Second control point y
    pub y2: f64,
}

impl CubicBezier {
    /// Long decelerating spin of the wheel.
    pub const WHEEL_SPIN: Self = Self::new(0.17, 0.67, 0.12, 0.99);
    /// Short settle of a slot column onto its number.
    pub const REEL_STOP: Self = Self::new(0.25, 0.46, 0.45, 0.94);

    /// Create a curve.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f64, a2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn sample_dx(&self, t: f64) -> f64 {
        let (x1, x2) = (self.x1.clamp(0.0, 1.0), self.x2.clamp(0.0, 1.0));
        let u = 1.0 - t;
        3.0 * u * u * x1 + 6.0 * u * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
    }

    /// Curve parameter whose x equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let (x1, x2) = (self.x1.clamp(0.0, 1.0), self.x2.clamp(0.0, 1.0));

        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(x1, x2, t) - x;
            if err.abs() < 1e-7 {
                return t;
            }
            let d = self.sample_dx(t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        // Newton stalled; x(t) is monotonic so bisection always converges.
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..64 {
            let v = Self::sample(x1, x2, t);
            if (v - x).abs() < 1e-7 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in [0, 1].
    #[must_use]
    pub fn apply(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }

    /// CSS `transition-timing-function` value.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

// =============================================================================
// Easing
// =============================================================================

/// Timing function applied to a tween.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// Custom cubic Bézier curve
    Bezier(CubicBezier),
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Bezier(curve) => curve.apply(t),
        }
    }

    /// CSS timing function for this easing.
    #[must_use]
    pub fn to_css(self) -> String {
        match self {
            Self::Linear => "linear".to_string(),
            Self::Bezier(curve) => curve.to_css(),
        }
    }
}

// =============================================================================
// Tween
// =============================================================================

/// A value moving from `from` to `to` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    /// Start value
    pub from: f64,
    /// End value
    pub to: f64,
    /// Total duration in milliseconds
    pub duration_ms: u64,
    /// Easing function
    pub easing: Easing,
}

impl Tween {
    /// Create a linear tween.
    #[must_use]
    pub const fn new(from: f64, to: f64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    /// Set easing function.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Progress from 0.0 to 1.0 after `elapsed_ms`.
    #[must_use]
    pub fn progress(&self, elapsed_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            1.0
        } else {
            (elapsed_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
        }
    }

    /// Value after `elapsed_ms`.
    #[must_use]
    pub fn value_at(&self, elapsed_ms: u64) -> f64 {
        let eased = self.easing.apply(self.progress(elapsed_ms));
        (self.to - self.from).mul_add(eased, self.from)
    }

    /// Whether the tween has finished after `elapsed_ms`.
    #[must_use]
    pub const fn is_complete(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}
