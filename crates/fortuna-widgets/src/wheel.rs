//! Prize wheel: option list, rotation state and spin-to-selection.
//!
//! A wheel moves through three phases:
//!
//! ```text
//! Idle ──spin──▶ Spinning ──(spin_duration)──▶ Settled ──spin──▶ Spinning …
//!   ▲                                             │
//!   └──────────────────reset──────────────────────┘
//! ```
//!
//! The pointer is fixed at 12 o'clock and the wheel turns clockwise. Sector
//! `i` spans `[i * s, (i + 1) * s)` degrees of the wheel face, `s = 360 / N`.
//! Every transition after `spin` happens on the wheel's own [`Timeline`], so
//! tests drive it by calling [`Wheel::advance`] instead of sleeping.

use crate::confetti::{celebration, ConfettiBurst, ParticleEffect};
use crate::error::WheelError;
use crate::options::PrizeOptions;
use fortuna_core::{
    normalize_degrees, ConfettiConfig, CubicBezier, Easing, Millis, Point, Timeline, Tween,
    WheelConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

// =============================================================================
// Sector math
// =============================================================================

/// Sector under the pointer when the wheel is turned `rotation` degrees.
///
/// `floor((360 - normalized) / sector) mod N`; `count == 0` is treated as one sector.
#[must_use]
pub fn sector_under_pointer(rotation: f64, count: usize) -> usize {
    let count = count.max(1);
    let sector = 360.0 / count as f64;
    let normalized = normalize_degrees(rotation);
    ((360.0 - normalized) / sector).floor() as usize % count
}

/// Rotation (in `[0, 360)`) that puts the middle of sector `index` under the pointer.
#[must_use]
pub fn sector_center_rotation(index: usize, count: usize) -> f64 {
    let count = count.max(1);
    let sector = 360.0 / count as f64;
    normalize_degrees((index as f64 + 0.5).mul_add(-sector, 360.0))
}

/// Where a spin starts, where it stops, and what it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    /// Rotation when the spin starts
    pub from: f64,
    /// Absolute rotation the wheel settles at
    pub target: f64,
    /// Sector under the pointer at `target`
    pub selected_index: usize,
}

impl SpinPlan {
    /// Plan a spin of roughly `amount` degrees from `from` over `count` sectors.
    ///
    /// The selected sector is the one under the pointer at `from + amount`.
    /// The target then drops the residual offset inside that sector and adds
    /// half a sector, so the wheel always stops dead centre on the sector it
    /// reports and never on a neighbour.
    #[must_use]
    pub fn resolve(from: f64, amount: f64, count: usize) -> Self {
        let end = from + amount;
        let normalized = normalize_degrees(end);
        let selected_index = sector_under_pointer(normalized, count);
        let target = end - normalized + sector_center_rotation(selected_index, count);
        Self {
            from,
            target,
            selected_index,
        }
    }
}

// =============================================================================
// State and events
// =============================================================================

/// Lifecycle phase of a wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WheelPhase {
    /// Never spun, or reset
    #[default]
    Idle,
    /// Spin animation in progress
    Spinning,
    /// Spin finished; a selection may be pending
    Settled,
}

/// Snapshot of a wheel's observable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelState {
    /// Current rotation in degrees
    pub rotation_degrees: f64,
    /// Whether a spin is in progress
    pub is_spinning: bool,
    /// Settled selection awaiting removal, if any
    pub selected_index: Option<usize>,
    /// Lifecycle phase
    pub phase: WheelPhase,
}

/// Notifications emitted while a wheel's timeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    /// The wheel stopped; `index` is under the pointer
    Settled {
        /// Wheel id
        wheel: usize,
        /// Selected sector
        index: usize,
        /// Selected label
        label: String,
    },
    /// A confetti burst was launched
    Confetti {
        /// Wheel id
        wheel: usize,
        /// Burst parameters
        burst: ConfettiBurst,
    },
    /// The prize overlay opened with the chosen label
    PrizeSelected {
        /// Wheel id
        wheel: usize,
        /// Selected label
        label: String,
    },
}

#[derive(Debug, Clone)]
enum WheelTimer {
    Settle,
    Burst(Box<ConfettiBurst>),
    Reveal(String),
}

#[derive(Debug, Clone, Copy)]
struct ActiveSpin {
    plan: SpinPlan,
    tween: Tween,
    started_at: Millis,
}

// =============================================================================
// Wheel
// =============================================================================

/// A single prize wheel.
pub struct Wheel {
    id: usize,
    config: WheelConfig,
    confetti: ConfettiConfig,
    options: PrizeOptions,
    rotation: f64,
    phase: WheelPhase,
    selected_index: Option<usize>,
    spin: Option<ActiveSpin>,
    overlay: Option<String>,
    effect_origin: Point,
    effects: Option<Rc<dyn ParticleEffect>>,
    timeline: Timeline<WheelTimer>,
    rng: StdRng,
    revision: u64,
}

impl std::fmt::Debug for Wheel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wheel")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("rotation", &self.rotation)
            .field("phase", &self.phase)
            .field("selected_index", &self.selected_index)
            .field("overlay", &self.overlay)
            .field("has_effects", &self.effects.is_some())
            .field("pending_timers", &self.timeline.pending_count())
            .finish_non_exhaustive()
    }
}

impl Wheel {
    /// Create a wheel with default configuration.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self::with_config(id, WheelConfig::default(), ConfettiConfig::default())
    }

    /// Create a wheel from explicit configuration.
    #[must_use]
    pub fn with_config(id: usize, config: WheelConfig, confetti: ConfettiConfig) -> Self {
        let options = PrizeOptions::new(
            config.default_options.iter().cloned(),
            &config.empty_options_label,
        );
        Self {
            id,
            config,
            confetti,
            options,
            rotation: 0.0,
            phase: WheelPhase::Idle,
            selected_index: None,
            spin: None,
            overlay: None,
            effect_origin: Point::new(0.5, 0.5),
            effects: None,
            timeline: Timeline::new(),
            rng: StdRng::from_entropy(),
            revision: 0,
        }
    }

    /// Use a deterministic random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Install the particle effect fired when the wheel settles.
    #[must_use]
    pub fn with_effects(mut self, effects: Rc<dyn ParticleEffect>) -> Self {
        self.effects = Some(effects);
        self
    }

    /// Replace or remove the particle effect.
    pub fn set_effects(&mut self, effects: Option<Rc<dyn ParticleEffect>>) {
        self.effects = effects;
    }

    /// Set where confetti launches from, as a fraction of the viewport.
    pub fn set_effect_origin(&mut self, origin: Point) {
        self.effect_origin = origin;
    }

    // === Accessors ===

    /// Wheel identifier.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &PrizeOptions {
        &self.options
    }

    /// Wheel configuration.
    #[must_use]
    pub const fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// Rotation in degrees. Normalized to `[0, 360)` whenever the wheel is at rest.
    #[must_use]
    pub const fn rotation_degrees(&self) -> f64 {
        self.rotation
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> WheelPhase {
        self.phase
    }

    /// Whether a spin is in progress.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.phase == WheelPhase::Spinning
    }

    /// Settled selection awaiting removal.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Label of the settled selection.
    #[must_use]
    pub fn selected_prize(&self) -> Option<&str> {
        self.selected_index.and_then(|i| self.options.get(i))
    }

    /// Label shown in the prize overlay, if it is open.
    #[must_use]
    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// CSS transition the prize overlay fades in and out with.
    ///
    /// Visibility switches at the end of the fade, so a closing overlay stays
    /// visible until it has faded out.
    #[must_use]
    pub fn overlay_transition(&self) -> String {
        let ms = self.config.overlay_fade_ms;
        format!("opacity {ms}ms ease, visibility {ms}ms")
    }

    /// Bumped whenever the segmentation must be redrawn.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Virtual time of this wheel.
    #[must_use]
    pub const fn now(&self) -> Millis {
        self.timeline.now()
    }

    /// Plan of the spin in progress.
    #[must_use]
    pub fn current_spin(&self) -> Option<SpinPlan> {
        self.spin.map(|s| s.plan)
    }

    /// Snapshot of the observable state.
    #[must_use]
    pub fn state(&self) -> WheelState {
        WheelState {
            rotation_degrees: self.rotation,
            is_spinning: self.is_spinning(),
            selected_index: self.selected_index,
            phase: self.phase,
        }
    }

    /// Rotation at virtual time `now`, eased along the spin curve while spinning.
    #[must_use]
    pub fn rotation_at(&self, now: Millis) -> f64 {
        match self.spin {
            Some(spin) => spin.tween.value_at(now.saturating_sub(spin.started_at)),
            None => self.rotation,
        }
    }

    /// Rotation to draw right now.
    #[must_use]
    pub fn displayed_rotation(&self) -> f64 {
        self.rotation_at(self.timeline.now())
    }

    /// Timing function the spin animation follows.
    #[must_use]
    pub const fn spin_easing(&self) -> Easing {
        Easing::Bezier(CubicBezier::WHEEL_SPIN)
    }

    // === Operations ===

    /// Spin by a random amount. Returns `false` if a spin is already running.
    pub fn spin(&mut self) -> bool {
        if self.is_spinning() {
            return false;
        }
        let turns = self
            .rng
            .gen::<f64>()
            .mul_add(self.config.extra_turns, self.config.min_turns);
        let offset = self.rng.gen::<f64>() * 360.0;
        self.spin_by(turns.mul_add(360.0, offset))
    }

    /// Spin by exactly `amount` degrees before the settle correction.
    ///
    /// Returns `false` if a spin is already running.
    pub fn spin_by(&mut self, amount: f64) -> bool {
        if self.is_spinning() {
            return false;
        }

        self.overlay = None;
        // A reveal still pending from the last spin would describe a stale result.
        self.timeline
            .retain(|t| !matches!(t, WheelTimer::Reveal(_)));

        let plan = SpinPlan::resolve(self.rotation, amount, self.options.count());
        let tween = Tween::new(plan.from, plan.target, self.config.spin_duration_ms)
            .with_easing(self.spin_easing());

        self.phase = WheelPhase::Spinning;
        self.selected_index = None;
        self.spin = Some(ActiveSpin {
            plan,
            tween,
            started_at: self.timeline.now(),
        });
        self.timeline
            .schedule_in(self.config.spin_duration_ms, WheelTimer::Settle);

        log::debug!(
            "wheel {}: spinning {:.1}° -> {:.1}°",
            self.id,
            plan.from,
            plan.target
        );
        true
    }

    /// Advance this wheel's clock by `dt` milliseconds, firing due transitions.
    pub fn advance(&mut self, dt: Millis) -> Vec<WheelEvent> {
        let target = self.timeline.now().saturating_add(dt);
        let mut events = Vec::new();
        while let Some(timer) = self.timeline.pop_due(target) {
            self.fire(timer, &mut events);
        }
        self.timeline.advance_to(target);
        events
    }

    fn fire(&mut self, timer: WheelTimer, events: &mut Vec<WheelEvent>) {
        match timer {
            WheelTimer::Settle => self.settle(events),
            WheelTimer::Burst(burst) => {
                if let Some(effects) = &self.effects {
                    effects.fire(&burst);
                }
                events.push(WheelEvent::Confetti {
                    wheel: self.id,
                    burst: *burst,
                });
            }
            WheelTimer::Reveal(label) => {
                log::info!("wheel {}: prize selected: {label}", self.id);
                self.overlay = Some(label.clone());
                events.push(WheelEvent::PrizeSelected {
                    wheel: self.id,
                    label,
                });
            }
        }
    }

    fn settle(&mut self, events: &mut Vec<WheelEvent>) {
        let Some(spin) = self.spin.take() else {
            return;
        };
        let index = spin.plan.selected_index;
        self.rotation = normalize_degrees(spin.plan.target);
        self.phase = WheelPhase::Settled;
        self.selected_index = Some(index);

        let label = self.options.get(index).unwrap_or_default().to_string();
        log::debug!("wheel {}: settled on sector {index} ({label})", self.id);
        events.push(WheelEvent::Settled {
            wheel: self.id,
            index,
            label: label.clone(),
        });

        for (delay, burst) in celebration(&self.confetti, self.effect_origin) {
            self.timeline
                .schedule_in(delay, WheelTimer::Burst(Box::new(burst)));
        }
        self.timeline
            .schedule_in(self.config.reveal_delay_ms, WheelTimer::Reveal(label));
    }

    /// Close the prize overlay. Returns `false` if it was not open.
    pub fn close_overlay(&mut self) -> bool {
        self.overlay.take().is_some()
    }

    /// Remove the settled selection from the options.
    ///
    /// The last prize is replaced by the exhausted placeholder. Fails (and logs)
    /// when no selection is pending.
    pub fn remove_selected_prize(&mut self) -> Result<String, WheelError> {
        let Some(index) = self.selected_index else {
            log::warn!("wheel {}: no selected prize to remove", self.id);
            return Err(WheelError::NoSelection);
        };
        let len = self.options.count();
        let Some(removed) = self.options.remove(index, &self.config.exhausted_label) else {
            log::warn!("wheel {}: invalid prize index {index} of {len}", self.id);
            self.selected_index = None;
            return Err(WheelError::StaleSelection { index, len });
        };

        self.overlay = None;
        self.timeline
            .retain(|t| !matches!(t, WheelTimer::Reveal(_)));
        self.selected_index = None;
        self.revision += 1;
        log::info!(
            "wheel {}: removed '{removed}', {} option(s) left",
            self.id,
            self.options.count()
        );
        Ok(removed)
    }

    /// Replace the options. Empty input becomes a single placeholder.
    ///
    /// Ignored (returns `false`) while spinning, since the running spin was
    /// planned against the current sectors.
    pub fn update_options<I, S>(&mut self, options: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.is_spinning() {
            log::warn!("wheel {}: options not updated while spinning", self.id);
            return false;
        }
        self.options = PrizeOptions::new(options, &self.config.empty_options_label);
        self.selected_index = None;
        self.timeline
            .retain(|t| !matches!(t, WheelTimer::Reveal(_)));
        self.revision += 1;
        true
    }

    /// Restore default options, zero rotation and the idle phase.
    ///
    /// Pending transitions are cancelled.
    pub fn reset(&mut self) {
        self.timeline.cancel_all();
        self.options = PrizeOptions::new(
            self.config.default_options.iter().cloned(),
            &self.config.empty_options_label,
        );
        self.rotation = 0.0;
        self.phase = WheelPhase::Idle;
        self.selected_index = None;
        self.spin = None;
        self.overlay = None;
        self.revision += 1;
    }
}
