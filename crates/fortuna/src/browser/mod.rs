//! Browser runtime for Fortuna.
//!
//! Projects the [`Stage`](crate::Stage) onto the page: wheels into a container
//! element, the slot machine as a modal on the body.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod confetti;
#[cfg(target_arch = "wasm32")]
mod dom;

// Cross-platform modules
mod clock;
mod error;
mod intent;

#[cfg(target_arch = "wasm32")]
pub use app::FortunaApp;
#[cfg(target_arch = "wasm32")]
pub use confetti::JsConfetti;
pub use clock::FrameClock;
pub use error::MountError;
pub use intent::Intent;
