//! Fortuna: prize wheels and a slot machine for the browser.
//!
//! The widgets are plain state machines on a virtual clock (see
//! [`widgets`]); a [`Stage`] owns them all, and on `wasm32` the
//! `FortunaApp` export draws the stage into the page.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { FortunaApp } from './fortuna.js';
//!
//! async function main() {
//!     await init();
//!     const app = new FortunaApp('mainContainer');
//!     const frame = (now) => {
//!         const events = JSON.parse(app.tick(now));
//!         requestAnimationFrame(frame);
//!     };
//!     requestAnimationFrame(frame);
//! }
//! ```
//!
//! # Native Usage
//!
//! ```
//! use fortuna::{Stage, StageEvent};
//!
//! let mut stage = Stage::default().with_seed(42);
//! stage.spin(0).unwrap();
//! let events = stage.advance(4_000);
//! assert!(matches!(events.first(), Some(StageEvent::Wheel(_))));
//! ```

pub use fortuna_core::*;
pub use fortuna_widgets as widgets;

pub mod browser;
mod stage;

#[cfg(target_arch = "wasm32")]
pub use browser::FortunaApp;

pub use browser::{FrameClock, Intent, MountError};
pub use stage::{Stage, StageEvent};
