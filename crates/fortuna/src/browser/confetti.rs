//! `window.confetti` as a particle effect.

use fortuna_widgets::{ConfettiBurst, ParticleEffect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Fires bursts through a page-level `confetti(options)` function.
///
/// The function is looked up on every burst, so a library loaded after the
/// app starts is still picked up. Without it bursts are dropped silently.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsConfetti;

impl JsConfetti {
    fn function() -> Option<js_sys::Function> {
        let window = web_sys::window()?;
        js_sys::Reflect::get(&window, &JsValue::from_str("confetti"))
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
    }
}

impl ParticleEffect for JsConfetti {
    fn fire(&self, burst: &ConfettiBurst) {
        let Some(confetti) = Self::function() else {
            return;
        };
        let Ok(json) = serde_json::to_string(burst) else {
            return;
        };
        let Ok(options) = js_sys::JSON::parse(&json) else {
            return;
        };
        if let Err(err) = confetti.call1(&JsValue::NULL, &options) {
            log::warn!("confetti call failed: {err:?}");
        }
    }
}
