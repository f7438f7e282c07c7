//! Prize wheel and slot machine widgets.
//!
//! Widgets hold pure state and advance on their own virtual clock; they never
//! touch a document. A host calls `advance(dt)`, reads the returned events and
//! renders from the state accessors.

pub mod confetti;
mod error;
pub mod face;
pub mod manager;
mod options;
pub mod slot;
pub mod wheel;

pub use confetti::{celebration, ConfettiBurst, ParticleEffect, RecordingEffect};
pub use error::{SlotError, WheelError};
pub use face::{rim_lights, FaceGeometry, FaceSegment, RimLight, WheelFace};
pub use manager::{LayoutMode, WheelManager, MAX_WHEELS, MIN_WHEELS};
pub use options::PrizeOptions;
pub use slot::{
    parse_bound, reel_offset, ReelState, SlotEvent, SlotHistory, SlotMachine, SlotResult,
    SlotView, SpinStart, REEL_COUNT,
};
pub use wheel::{
    sector_under_pointer, SpinPlan, Wheel, WheelEvent, WheelPhase, WheelState,
};
