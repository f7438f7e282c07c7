//! Frame timestamps to whole-millisecond steps.

use fortuna_core::Millis;

/// Turns `requestAnimationFrame` timestamps into [`Millis`] steps.
///
/// The fractional part of each frame is carried into the next, so the steps
/// add up to the wall-clock time elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last: Option<f64>,
    carry: f64,
}

impl FrameClock {
    /// Create a clock that has seen no frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds to advance for a frame at `now_ms`.
    ///
    /// The first frame advances nothing; a timestamp earlier than the previous
    /// one is treated as no time passing.
    pub fn tick(&mut self, now_ms: f64) -> Millis {
        let elapsed = self.last.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last = Some(now_ms);
        let total = elapsed + self.carry;
        let whole = total.floor();
        self.carry = total - whole;
        whole as Millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_advances_nothing() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(12_345.5), 0);
        assert_eq!(clock.tick(12_355.5), 10);
    }

    #[test]
    fn test_sixty_hz_frames_add_up() {
        let mut clock = FrameClock::new();
        let mut total = 0;
        for frame in 0..=240 {
            total += clock.tick(f64::from(frame) * 1000.0 / 60.0);
        }
        // Rounding each 16.67 ms frame would have given 4080.
        assert!((3_999..=4_000).contains(&total), "advanced {total} ms");
    }

    #[test]
    fn test_fractions_carry_over() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(0.25), 0);
        assert_eq!(clock.tick(0.75), 0);
        assert_eq!(clock.tick(1.25), 1);
        assert_eq!(clock.tick(2.0), 1);
        assert_eq!(clock.tick(2.25), 0);
    }

    #[test]
    fn test_backwards_timestamp_is_ignored() {
        let mut clock = FrameClock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0), 0);
        assert_eq!(clock.tick(75.0), 25);
    }
}
