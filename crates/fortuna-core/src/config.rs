//! Widget configuration, loadable from a YAML manifest.
//!
//! Every field has a default, so a manifest only lists what it changes:
//!
//! ```
//! use fortuna_core::{FortunaConfig, HistoryMode};
//!
//! let config = FortunaConfig::from_yaml(
//!     "wheel:\n  spin_duration_ms: 2000\nslot:\n  history: per_session\n",
//! )
//! .unwrap();
//! assert_eq!(config.wheel.spin_duration_ms, 2000);
//! assert_eq!(config.wheel.reveal_delay_ms, 2500);
//! assert_eq!(config.slot.history, HistoryMode::PerSession);
//! ```

use crate::error::ConfigError;
use crate::timeline::Millis;
use serde::{Deserialize, Serialize};

/// Top-level configuration for a stage with wheels and a slot machine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FortunaConfig {
    /// Wheel timing and option defaults
    pub wheel: WheelConfig,
    /// Slot machine timing and sampling
    pub slot: SlotConfig,
    /// Celebration bursts fired when a wheel settles
    pub confetti: ConfettiConfig,
}

impl FortunaConfig {
    /// Parse and validate a YAML manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        if let Err(err) = config.validate() {
            log::warn!("rejected configuration: {err}");
            return Err(err);
        }
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wheel.validate()?;
        self.slot.validate()?;
        self.confetti.validate()
    }
}

// =============================================================================
// Wheel
// =============================================================================

/// Wheel timing and option defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Duration of the spin animation
    pub spin_duration_ms: Millis,
    /// Delay between settling and the prize reveal
    pub reveal_delay_ms: Millis,
    /// Fade-out duration of the prize overlay
    pub overlay_fade_ms: Millis,
    /// Minimum whole turns per spin
    pub min_turns: f64,
    /// Random extra turns on top of `min_turns`, drawn from [0, extra_turns)
    pub extra_turns: f64,
    /// Options a new or reset wheel starts with
    pub default_options: Vec<String>,
    /// Substituted when `update_options` receives an empty list
    pub empty_options_label: String,
    /// Substituted when the last prize is removed
    pub exhausted_label: String,
    /// Number of rim lights
    pub light_count: usize,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: 4000,
            reveal_delay_ms: 2500,
            overlay_fade_ms: 300,
            min_turns: 5.0,
            extra_turns: 5.0,
            default_options: (1..=8).map(|i| format!("Prize {i}")).collect(),
            empty_options_label: "Prize 1".to_string(),
            exhausted_label: "Final Prize".to_string(),
            light_count: 18,
        }
    }
}

impl WheelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.spin_duration_ms == 0 {
            return Err(ConfigError::invalid(
                "wheel.spin_duration_ms",
                "must be positive",
            ));
        }
        if !(self.min_turns >= 1.0 && self.min_turns.is_finite()) {
            return Err(ConfigError::invalid(
                "wheel.min_turns",
                "must be at least 1",
            ));
        }
        if !(self.extra_turns >= 0.0 && self.extra_turns.is_finite()) {
            return Err(ConfigError::invalid(
                "wheel.extra_turns",
                "must be a non-negative number",
            ));
        }
        if self.default_options.is_empty() {
            return Err(ConfigError::invalid(
                "wheel.default_options",
                "must list at least one prize",
            ));
        }
        if self.empty_options_label.is_empty() || self.exhausted_label.is_empty() {
            return Err(ConfigError::invalid(
                "wheel.exhausted_label",
                "placeholder labels must not be empty",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Slot machine
// =============================================================================

/// Whether drawn numbers are remembered across slot resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// Numbers are never redrawn for the lifetime of the machine
    #[default]
    Persistent,
    /// History is cleared whenever the slot is reset
    PerSession,
}

/// Slot machine timing and sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Gap between consecutive column stops (first stop included)
    pub stop_interval_ms: Millis,
    /// Time a spinning column spends on each cell
    pub reel_step_ms: Millis,
    /// Height of one number cell in pixels
    pub cell_height: f64,
    /// Duration of the settle transition when a column stops
    pub stop_transition_ms: Millis,
    /// Time between blink toggles of the revealed result
    pub blink_interval_ms: Millis,
    /// Number of blink toggles (two per visible blink)
    pub blink_toggles: u32,
    /// Delay between the final blink and the reset button appearing
    pub reset_delay_ms: Millis,
    /// Candidates drawn per column before the deterministic fallback
    pub max_attempts: u32,
    /// History retention
    pub history: HistoryMode,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            stop_interval_ms: 3000,
            reel_step_ms: 100,
            cell_height: 60.0,
            stop_transition_ms: 500,
            blink_interval_ms: 300,
            blink_toggles: 6,
            reset_delay_ms: 500,
            max_attempts: 100,
            history: HistoryMode::Persistent,
        }
    }
}

impl SlotConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.stop_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "slot.stop_interval_ms",
                "must be positive",
            ));
        }
        if self.reel_step_ms == 0 {
            return Err(ConfigError::invalid("slot.reel_step_ms", "must be positive"));
        }
        if !(self.cell_height > 0.0 && self.cell_height.is_finite()) {
            return Err(ConfigError::invalid("slot.cell_height", "must be positive"));
        }
        if self.blink_toggles % 2 != 0 {
            return Err(ConfigError::invalid(
                "slot.blink_toggles",
                "must be even so the result ends visible",
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("slot.max_attempts", "must be positive"));
        }
        Ok(())
    }
}

// =============================================================================
// Confetti
// =============================================================================

/// One timed confetti burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstSpec {
    /// Delay after the wheel settles
    pub delay_ms: Millis,
    /// Number of particles
    pub particle_count: u32,
    /// Downward acceleration
    pub gravity: f64,
    /// Particle lifetime in animation ticks
    pub ticks: u32,
    /// Velocity decay per tick
    pub decay: f64,
    /// Initial particle velocity
    pub start_velocity: f64,
    /// Sideways drift
    pub drift: f64,
    /// Particle size multiplier
    pub scalar: f64,
}

/// Celebration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    /// Whether bursts fire at all
    pub enabled: bool,
    /// Launch direction in degrees (90 = up)
    pub angle: f64,
    /// Spread in degrees
    pub spread: f64,
    /// Hex colors particles are drawn from
    pub palette: Vec<String>,
    /// Particle shapes
    pub shapes: Vec<String>,
    /// Stacking order of the effect layer
    pub z_index: i32,
    /// Bursts, in firing order
    pub bursts: Vec<BurstSpec>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        #[allow(clippy::too_many_arguments)]
        const fn burst(
            delay_ms: Millis,
            particle_count: u32,
            gravity: f64,
            ticks: u32,
            decay: f64,
            start_velocity: f64,
            drift: f64,
            scalar: f64,
        ) -> BurstSpec {
            BurstSpec {
                delay_ms,
                particle_count,
                gravity,
                ticks,
                decay,
                start_velocity,
                drift,
                scalar,
            }
        }

        Self {
            enabled: true,
            angle: 90.0,
            spread: 360.0,
            palette: [
                "#FF0000", "#FFD700", "#00FF00", "#0000FF", "#FF00FF", "#00FFFF", "#FFA500",
                "#FF1493", "#32CD32", "#FF69B4", "#00CED1", "#FF6347",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            shapes: vec!["square".to_string(), "circle".to_string()],
            z_index: 9999,
            bursts: vec![
                burst(0, 400, 0.5, 200, 0.94, 45.0, 0.2, 1.3),
                burst(100, 250, 0.4, 180, 0.93, 40.0, 0.15, 1.2),
                burst(200, 200, 0.45, 170, 0.92, 35.0, 0.25, 1.1),
            ],
        }
    }
}

impl ConfettiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for color in &self.palette {
            crate::Color::from_hex(color).map_err(|e| {
                ConfigError::invalid("confetti.palette", format!("{color}: {e}"))
            })?;
        }
        if self.bursts.iter().any(|b| !(0.0..=1.0).contains(&b.decay)) {
            return Err(ConfigError::invalid(
                "confetti.bursts",
                "decay must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(FortunaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_wheel_options() {
        let wheel = WheelConfig::default();
        assert_eq!(wheel.default_options.len(), 8);
        assert_eq!(wheel.default_options[0], "Prize 1");
        assert_eq!(wheel.default_options[7], "Prize 8");
    }

    #[test]
    fn test_empty_manifest_is_default() {
        let config = FortunaConfig::from_yaml("{}").unwrap();
        assert_eq!(config, FortunaConfig::default());
    }

    #[test]
    fn test_partial_manifest() {
        let yaml = r"
wheel:
  default_options: [Car, Boat]
slot:
  max_attempts: 10
confetti:
  enabled: false
";
        let config = FortunaConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.wheel.default_options, vec!["Car", "Boat"]);
        assert_eq!(config.wheel.spin_duration_ms, 4000);
        assert_eq!(config.slot.max_attempts, 10);
        assert!(!config.confetti.enabled);
        assert_eq!(config.confetti.bursts.len(), 3);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = FortunaConfig::default().to_yaml().unwrap();
        assert_eq!(FortunaConfig::from_yaml(&yaml).unwrap(), FortunaConfig::default());
    }

    #[test]
    fn test_rejects_zero_spin_duration() {
        let err = FortunaConfig::from_yaml("wheel:\n  spin_duration_ms: 0\n").unwrap_err();
        assert!(err.to_string().contains("wheel.spin_duration_ms"));
    }

    #[test]
    fn test_rejects_empty_default_options() {
        let err = FortunaConfig::from_yaml("wheel:\n  default_options: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_odd_blink_toggles() {
        let err = FortunaConfig::from_yaml("slot:\n  blink_toggles: 5\n").unwrap_err();
        assert!(err.to_string().contains("slot.blink_toggles"));
    }

    #[test]
    fn test_rejects_bad_palette() {
        let err = FortunaConfig::from_yaml("confetti:\n  palette: ['#12']\n").unwrap_err();
        assert!(err.to_string().contains("confetti.palette"));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = FortunaConfig::from_yaml("wheel: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
