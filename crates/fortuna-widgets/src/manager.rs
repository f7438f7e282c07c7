//! Bounded collection of wheels and the layout it implies.

use crate::confetti::ParticleEffect;
use crate::wheel::{Wheel, WheelEvent};
use fortuna_core::{ConfettiConfig, Millis, WheelConfig};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Most wheels shown at once.
pub const MAX_WHEELS: usize = 2;
/// Fewest wheels shown at once.
pub const MIN_WHEELS: usize = 1;

/// How the wheels share the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// One centred wheel
    #[default]
    Single,
    /// Two wheels side by side with a divider between them
    Split,
}

impl LayoutMode {
    /// Layout for `count` wheels.
    #[must_use]
    pub const fn for_count(count: usize) -> Self {
        if count > 1 {
            Self::Split
        } else {
            Self::Single
        }
    }

    /// Whether the divider between wheels is shown.
    #[must_use]
    pub const fn shows_divider(self) -> bool {
        matches!(self, Self::Split)
    }

    /// CSS class applied to the container.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Single => "single-wheel",
            Self::Split => "two-wheels",
        }
    }
}

/// Owns one or two wheels.
pub struct WheelManager {
    wheels: Vec<Wheel>,
    layout: LayoutMode,
    wheel_config: WheelConfig,
    confetti: ConfettiConfig,
    effects: Option<Rc<dyn ParticleEffect>>,
    seed: Option<u64>,
}

impl std::fmt::Debug for WheelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelManager")
            .field("wheels", &self.wheels)
            .field("layout", &self.layout)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Default for WheelManager {
    fn default() -> Self {
        Self::new(WheelConfig::default(), ConfettiConfig::default())
    }
}

impl WheelManager {
    /// Create a manager holding a single wheel.
    #[must_use]
    pub fn new(wheel_config: WheelConfig, confetti: ConfettiConfig) -> Self {
        let mut manager = Self {
            wheels: Vec::with_capacity(MAX_WHEELS),
            layout: LayoutMode::Single,
            wheel_config,
            confetti,
            effects: None,
            seed: None,
        };
        manager.push_wheel();
        manager
    }

    /// Seed every wheel deterministically (wheel `i` uses `seed + i`).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.wheels = self
            .wheels
            .drain(..)
            .map(|w| {
                let id = w.id() as u64;
                w.with_seed(seed.wrapping_add(id))
            })
            .collect();
        self
    }

    /// Install a particle effect on current and future wheels.
    #[must_use]
    pub fn with_effects(mut self, effects: Rc<dyn ParticleEffect>) -> Self {
        for wheel in &mut self.wheels {
            wheel.set_effects(Some(Rc::clone(&effects)));
        }
        self.effects = Some(effects);
        self
    }

    fn push_wheel(&mut self) {
        let id = self.wheels.len();
        let mut wheel =
            Wheel::with_config(id, self.wheel_config.clone(), self.confetti.clone());
        if let Some(seed) = self.seed {
            wheel = wheel.with_seed(seed.wrapping_add(id as u64));
        }
        wheel.set_effects(self.effects.clone());
        self.wheels.push(wheel);
    }

    /// Add a wheel. Returns `false` at the cap.
    pub fn add_wheel(&mut self) -> bool {
        if self.wheels.len() >= MAX_WHEELS {
            log::debug!("wheel cap of {MAX_WHEELS} reached");
            return false;
        }
        self.push_wheel();
        self.update_layout();
        log::info!("added wheel {}", self.wheels.len() - 1);
        true
    }

    /// Remove the most recently added wheel. Returns `false` at the floor.
    ///
    /// The removed wheel's pending transitions are dropped with it.
    pub fn remove_wheel(&mut self) -> bool {
        if self.wheels.len() <= MIN_WHEELS {
            return false;
        }
        if let Some(wheel) = self.wheels.pop() {
            log::info!("removed wheel {}", wheel.id());
        }
        self.update_layout();
        true
    }

    /// Recompute the layout from the wheel count.
    pub fn update_layout(&mut self) {
        self.layout = LayoutMode::for_count(self.wheels.len());
    }

    /// Collapse to one wheel and reset it.
    pub fn reset_all(&mut self) {
        self.wheels.truncate(MIN_WHEELS);
        for wheel in &mut self.wheels {
            wheel.reset();
        }
        self.update_layout();
    }

    /// Current layout.
    #[must_use]
    pub const fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Number of wheels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.wheels.len()
    }

    /// Wheel at `index`.
    #[must_use]
    pub fn get_wheel(&self, index: usize) -> Option<&Wheel> {
        self.wheels.get(index)
    }

    /// Mutable wheel at `index`.
    pub fn get_wheel_mut(&mut self, index: usize) -> Option<&mut Wheel> {
        self.wheels.get_mut(index)
    }

    /// All wheels in order.
    #[must_use]
    pub fn wheels(&self) -> &[Wheel] {
        &self.wheels
    }

    /// Advance every wheel's clock by `dt`, collecting their events in wheel order.
    pub fn advance(&mut self, dt: Millis) -> Vec<WheelEvent> {
        self.wheels
            .iter_mut()
            .flat_map(|wheel| wheel.advance(dt))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confetti::RecordingEffect;
    use crate::wheel::WheelPhase;
    use proptest::prelude::*;

    #[test]
    fn test_starts_with_one_wheel() {
        let manager = WheelManager::default();
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.layout(), LayoutMode::Single);
        assert!(!manager.layout().shows_divider());
    }

    #[test]
    fn test_add_until_cap() {
        let mut manager = WheelManager::default();
        assert!(manager.add_wheel());
        assert_eq!(manager.layout(), LayoutMode::Split);
        assert!(manager.layout().shows_divider());
        assert!(!manager.add_wheel());
        assert_eq!(manager.count(), 2);
        assert_eq!(manager.get_wheel(1).map(Wheel::id), Some(1));
    }

    #[test]
    fn test_remove_stops_at_floor() {
        let mut manager = WheelManager::default();
        assert!(!manager.remove_wheel());
        manager.add_wheel();
        assert!(manager.remove_wheel());
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.layout(), LayoutMode::Single);
    }

    #[test]
    fn test_removed_wheel_timers_are_dropped() {
        let mut manager = WheelManager::default().with_seed(1);
        manager.add_wheel();
        manager.get_wheel_mut(1).unwrap().spin();
        manager.remove_wheel();
        assert!(manager.advance(10_000).is_empty());
    }

    #[test]
    fn test_reset_all_collapses_and_resets() {
        let mut manager = WheelManager::default().with_seed(5);
        manager.add_wheel();
        {
            let wheel = manager.get_wheel_mut(0).unwrap();
            wheel.update_options(["X"]);
            wheel.spin();
        }
        manager.reset_all();

        assert_eq!(manager.count(), 1);
        assert_eq!(manager.layout(), LayoutMode::Single);
        let wheel = manager.get_wheel(0).unwrap();
        assert_eq!(wheel.phase(), WheelPhase::Idle);
        assert_eq!(wheel.options().count(), 8);
        assert!(manager.advance(10_000).is_empty());
    }

    #[test]
    fn test_advance_reaches_every_wheel() {
        let effect = Rc::new(RecordingEffect::new());
        let mut manager = WheelManager::default()
            .with_seed(3)
            .with_effects(effect.clone());
        manager.add_wheel();
        manager.get_wheel_mut(0).unwrap().spin();
        manager.get_wheel_mut(1).unwrap().spin();

        let events = manager.advance(4000);
        let settled: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                WheelEvent::Settled { wheel, .. } => Some(*wheel),
                _ => None,
            })
            .collect();
        assert_eq!(settled, vec![0, 1]);
        assert_eq!(effect.count(), 2);
    }

    #[test]
    fn test_layout_css_class() {
        assert_eq!(LayoutMode::Single.css_class(), "single-wheel");
        assert_eq!(LayoutMode::Split.css_class(), "two-wheels");
    }

    proptest! {
        #[test]
        fn prop_count_stays_within_bounds(ops in proptest::collection::vec(any::<bool>(), 0..40)) {
            let mut manager = WheelManager::default();
            for add in ops {
                if add {
                    manager.add_wheel();
                } else {
                    manager.remove_wheel();
                }
                prop_assert!((MIN_WHEELS..=MAX_WHEELS).contains(&manager.count()));
                prop_assert_eq!(manager.layout(), LayoutMode::for_count(manager.count()));
            }
        }
    }
}
