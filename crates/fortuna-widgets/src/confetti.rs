//! Celebration bursts handed to an external particle effect.
//!
//! The wheel does not draw particles itself. It describes each burst and
//! passes it to whatever [`ParticleEffect`] the host installed; with none
//! installed the celebration is simply skipped.

use fortuna_core::{ConfettiConfig, Millis, Point};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Parameters of one particle burst.
///
/// Serializes with camelCase keys, matching the options object of common
/// browser confetti libraries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiBurst {
    /// Number of particles
    pub particle_count: u32,
    /// Launch direction in degrees
    pub angle: f64,
    /// Spread in degrees
    pub spread: f64,
    /// Launch point as a fraction of the viewport
    pub origin: Point,
    /// Hex colors
    pub colors: Vec<String>,
    /// Particle shapes
    pub shapes: Vec<String>,
    /// Downward acceleration
    pub gravity: f64,
    /// Particle lifetime in ticks
    pub ticks: u32,
    /// Velocity decay per tick
    pub decay: f64,
    /// Initial velocity
    pub start_velocity: f64,
    /// Sideways drift
    pub drift: f64,
    /// Size multiplier
    pub scalar: f64,
    /// Stacking order
    pub z_index: i32,
}

/// Something that can render a confetti burst.
pub trait ParticleEffect {
    /// Launch one burst.
    fn fire(&self, burst: &ConfettiBurst);
}

/// The timed bursts of one celebration, launched from `origin`.
///
/// Returns `(delay_ms, burst)` pairs; empty when confetti is disabled.
#[must_use]
pub fn celebration(config: &ConfettiConfig, origin: Point) -> Vec<(Millis, ConfettiBurst)> {
    if !config.enabled {
        return Vec::new();
    }
    config
        .bursts
        .iter()
        .map(|spec| {
            (
                spec.delay_ms,
                ConfettiBurst {
                    particle_count: spec.particle_count,
                    angle: config.angle,
                    spread: config.spread,
                    origin,
                    colors: config.palette.clone(),
                    shapes: config.shapes.clone(),
                    gravity: spec.gravity,
                    ticks: spec.ticks,
                    decay: spec.decay,
                    start_velocity: spec.start_velocity,
                    drift: spec.drift,
                    scalar: spec.scalar,
                    z_index: config.z_index,
                },
            )
        })
        .collect()
}

/// A [`ParticleEffect`] that records bursts instead of drawing them.
///
/// Useful for tests and for hosts that replay bursts later.
#[derive(Debug, Default)]
pub struct RecordingEffect {
    fired: RefCell<Vec<ConfettiBurst>>,
}

impl RecordingEffect {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bursts fired so far.
    #[must_use]
    pub fn fired(&self) -> Vec<ConfettiBurst> {
        self.fired.borrow().clone()
    }

    /// Number of bursts fired so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.fired.borrow().len()
    }
}

impl ParticleEffect for RecordingEffect {
    fn fire(&self, burst: &ConfettiBurst) {
        self.fired.borrow_mut().push(burst.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_celebration_has_three_staggered_bursts() {
        let bursts = celebration(&ConfettiConfig::default(), Point::new(0.5, 0.4));
        let delays: Vec<Millis> = bursts.iter().map(|(d, _)| *d).collect();
        assert_eq!(delays, vec![0, 100, 200]);

        let counts: Vec<u32> = bursts.iter().map(|(_, b)| b.particle_count).collect();
        assert_eq!(counts, vec![400, 250, 200]);
        assert!(bursts.iter().all(|(_, b)| b.origin == Point::new(0.5, 0.4)));
        assert!(bursts.iter().all(|(_, b)| b.spread == 360.0 && b.colors.len() == 12));
    }

    #[test]
    fn test_disabled_celebration_is_empty() {
        let config = ConfettiConfig {
            enabled: false,
            ..ConfettiConfig::default()
        };
        assert!(celebration(&config, Point::ORIGIN).is_empty());
    }

    #[test]
    fn test_burst_serializes_camel_case() {
        let (_, burst) = celebration(&ConfettiConfig::default(), Point::new(0.25, 0.75))
            .into_iter()
            .next()
            .unwrap();
        let json = serde_json::to_value(&burst).unwrap();
        assert_eq!(json["particleCount"], 400);
        assert_eq!(json["startVelocity"], 45.0);
        assert_eq!(json["zIndex"], 9999);
        assert_eq!(json["origin"]["x"], 0.25);
    }

    #[test]
    fn test_recording_effect() {
        let effect = RecordingEffect::new();
        for (_, burst) in celebration(&ConfettiConfig::default(), Point::ORIGIN) {
            effect.fire(&burst);
        }
        assert_eq!(effect.count(), 3);
        assert_eq!(effect.fired()[2].particle_count, 200);
    }
}
