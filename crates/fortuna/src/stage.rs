//! The stage: one wheel manager and one slot machine under a single clock.

use fortuna_core::{ConfigError, FortunaConfig, Millis, Point};
use fortuna_widgets::{
    ParticleEffect, SlotError, SlotEvent, SlotMachine, SpinStart, Wheel, WheelError, WheelEvent,
    WheelManager,
};
use serde::Serialize;
use std::rc::Rc;

/// Anything that happened during [`Stage::advance`] or a stage operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "event", rename_all = "snake_case")]
pub enum StageEvent {
    /// From a wheel
    Wheel(WheelEvent),
    /// From the slot machine
    Slot(SlotEvent),
}

/// Owns every widget on the page.
#[derive(Debug)]
pub struct Stage {
    config: FortunaConfig,
    manager: WheelManager,
    slot: SlotMachine,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(FortunaConfig::default())
    }
}

impl Stage {
    /// Build a stage from configuration.
    #[must_use]
    pub fn new(config: FortunaConfig) -> Self {
        let manager = WheelManager::new(config.wheel.clone(), config.confetti.clone());
        let slot = SlotMachine::new(config.slot.clone());
        Self {
            config,
            manager,
            slot,
        }
    }

    /// Build a stage from a YAML manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(FortunaConfig::from_yaml(yaml)?))
    }

    /// Seed every widget deterministically.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.manager = self.manager.with_seed(seed);
        self.slot = self.slot.with_seed(seed.rotate_left(32));
        self
    }

    /// Install the particle effect used by every wheel.
    #[must_use]
    pub fn with_effects(mut self, effects: Rc<dyn ParticleEffect>) -> Self {
        self.manager = self.manager.with_effects(effects);
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &FortunaConfig {
        &self.config
    }

    /// The wheels.
    #[must_use]
    pub const fn manager(&self) -> &WheelManager {
        &self.manager
    }

    /// The wheels, mutably.
    pub fn manager_mut(&mut self) -> &mut WheelManager {
        &mut self.manager
    }

    /// The slot machine.
    #[must_use]
    pub const fn slot(&self) -> &SlotMachine {
        &self.slot
    }

    /// The slot machine, mutably.
    pub fn slot_mut(&mut self) -> &mut SlotMachine {
        &mut self.slot
    }

    fn wheel_mut(&mut self, id: usize) -> Result<&mut Wheel, WheelError> {
        self.manager
            .get_wheel_mut(id)
            .ok_or(WheelError::UnknownWheel { id })
    }

    // === Wheel operations ===

    /// Spin wheel `id`. Returns `Ok(false)` if it is already spinning.
    pub fn spin(&mut self, id: usize) -> Result<bool, WheelError> {
        Ok(self.wheel_mut(id)?.spin())
    }

    /// Spin wheel `id` with confetti launched from `origin`.
    pub fn spin_from(&mut self, id: usize, origin: Point) -> Result<bool, WheelError> {
        let wheel = self.wheel_mut(id)?;
        wheel.set_effect_origin(origin);
        Ok(wheel.spin())
    }

    /// Remove the settled prize of wheel `id`.
    pub fn remove_selected_prize(&mut self, id: usize) -> Result<String, WheelError> {
        self.wheel_mut(id)?.remove_selected_prize()
    }

    /// Replace the options of wheel `id`.
    pub fn update_options(&mut self, id: usize, options: Vec<String>) -> Result<bool, WheelError> {
        Ok(self.wheel_mut(id)?.update_options(options))
    }

    /// Close the prize overlay of wheel `id`.
    pub fn close_overlay(&mut self, id: usize) -> Result<bool, WheelError> {
        Ok(self.wheel_mut(id)?.close_overlay())
    }

    /// Add a wheel (at most two).
    pub fn add_wheel(&mut self) -> bool {
        self.manager.add_wheel()
    }

    /// Remove the newest wheel (at least one stays).
    pub fn remove_wheel(&mut self) -> bool {
        self.manager.remove_wheel()
    }

    /// Collapse to one freshly reset wheel.
    pub fn reset_all(&mut self) {
        self.manager.reset_all();
    }

    // === Slot operations ===

    /// Open the slot machine for `prize`.
    pub fn open_slot(&mut self, prize: &str) {
        self.slot.open(prize);
    }

    /// Start the slot machine from raw range field text.
    pub fn start_slot(&mut self, start_text: &str, end_text: &str) -> Result<SpinStart, SlotError> {
        self.slot.start_spin_from_input(start_text, end_text)
    }

    /// Reset the slot machine without closing it.
    pub fn reset_slot(&mut self) {
        self.slot.reset_slot();
    }

    /// Close the slot machine.
    pub fn close_slot(&mut self) -> StageEvent {
        StageEvent::Slot(self.slot.close())
    }

    /// Advance every widget by `dt` milliseconds.
    ///
    /// Wheel events come first, in wheel order, then slot events.
    pub fn advance(&mut self, dt: Millis) -> Vec<StageEvent> {
        let mut events: Vec<StageEvent> = self
            .manager
            .advance(dt)
            .into_iter()
            .map(StageEvent::Wheel)
            .collect();
        events.extend(self.slot.advance(dt).into_iter().map(StageEvent::Slot));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortuna_widgets::{RecordingEffect, WheelPhase};

    #[test]
    fn test_default_stage() {
        let stage = Stage::default();
        assert_eq!(stage.manager().count(), 1);
        assert!(!stage.slot().is_open());
    }

    #[test]
    fn test_from_yaml_applies_config() {
        let stage = Stage::from_yaml(
            "wheel:\n  default_options: [Car, Boat]\nslot:\n  history: per_session\n",
        )
        .unwrap();
        let wheel = stage.manager().get_wheel(0).unwrap();
        assert_eq!(wheel.options().labels(), ["Car", "Boat"]);
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        assert!(Stage::from_yaml("wheel:\n  spin_duration_ms: 0\n").is_err());
    }

    #[test]
    fn test_unknown_wheel() {
        let mut stage = Stage::default();
        assert_eq!(stage.spin(1), Err(WheelError::UnknownWheel { id: 1 }));
        stage.add_wheel();
        assert_eq!(stage.spin(1), Ok(true));
        assert_eq!(stage.spin(1), Ok(false));
    }

    #[test]
    fn test_advance_routes_events() {
        let effect = Rc::new(RecordingEffect::new());
        let mut stage = Stage::default().with_seed(8).with_effects(effect.clone());
        stage.spin_from(0, Point::new(0.3, 0.6)).unwrap();
        stage.open_slot("bike");
        stage.start_slot("0", "9").unwrap();

        let events = stage.advance(3000);
        assert!(events.iter().any(|e| matches!(e, StageEvent::Slot(_))));
        assert!(!events.iter().any(|e| matches!(e, StageEvent::Wheel(_))));

        let events = stage.advance(1000);
        assert!(matches!(
            events.first(),
            Some(StageEvent::Wheel(WheelEvent::Settled { wheel: 0, .. }))
        ));
        assert_eq!(effect.fired()[0].origin, Point::new(0.3, 0.6));
        assert_eq!(
            stage.manager().get_wheel(0).map(Wheel::phase),
            Some(WheelPhase::Settled)
        );
    }

    #[test]
    fn test_close_slot_event_serializes() {
        let mut stage = Stage::default();
        stage.open_slot("x");
        let json = serde_json::to_string(&stage.close_slot()).unwrap();
        assert_eq!(json, r#"{"source":"slot","event":{"type":"closed"}}"#);
    }
}
