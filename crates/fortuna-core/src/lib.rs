//! Core types for the Fortuna prize widgets.
//!
//! This crate provides the pieces the widgets are built from:
//! - Segment palette: [`segment_color`], [`text_color_for`] on top of [`Color`]
//! - Geometry: [`Point`] and angle normalization
//! - Motion: [`CubicBezier`], [`Easing`], [`Tween`]
//! - Scheduling: [`Timeline`], a virtual clock with an ordered timer queue
//! - Configuration: [`FortunaConfig`] loaded from YAML

pub mod animation;
mod color;
mod config;
mod error;
mod geometry;
mod timeline;

pub use animation::{CubicBezier, Easing, Tween};
pub use color::{segment_color, text_color_for, Color, ColorParseError};
pub use config::{
    BurstSpec, ConfettiConfig, FortunaConfig, HistoryMode, SlotConfig, WheelConfig,
};
pub use error::ConfigError;
pub use geometry::{normalize_degrees, Point};
pub use timeline::{Millis, Timeline};
