//! WASM application entry point.

use super::clock::FrameClock;
use super::confetti::JsConfetti;
use super::dom::{SlotDom, WheelsDom};
use super::error::MountError;
use super::intent::Intent;
use crate::stage::{Stage, StageEvent};
use fortuna_core::FortunaConfig;
use fortuna_widgets::SpinStart;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, MouseEvent, Window};

/// Prize wheels and the slot machine mounted on the page.
///
/// The host page drives it by calling [`FortunaApp::tick`] from
/// `requestAnimationFrame`; clicks on rendered controls are queued and applied
/// on the next tick.
#[wasm_bindgen]
pub struct FortunaApp {
    stage: Stage,
    window: Window,
    document: Document,
    wheels: Option<WheelsDom>,
    wheel_mount_error: Option<String>,
    slot: SlotDom,
    intents: Rc<RefCell<Vec<Intent>>>,
    pending: Vec<StageEvent>,
    clock: FrameClock,
    click_callback: Option<Closure<dyn FnMut(MouseEvent)>>,
}

#[wasm_bindgen]
impl FortunaApp {
    /// Mount the wheels into `container_id` and the slot machine into the body.
    ///
    /// `config_yaml` overrides the defaults. A missing wheel container is
    /// logged and reported by [`FortunaApp::wheel_mount_error`]; the slot
    /// machine is mounted regardless.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config_yaml: Option<String>) -> Result<FortunaApp, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_yaml {
            Some(yaml) => FortunaConfig::from_yaml(&yaml)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => FortunaConfig::default(),
        };

        let window = window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;
        let (wheels, wheel_mount_error) = match WheelsDom::mount(&document, container_id) {
            Ok(wheels) => (Some(wheels), None),
            Err(err) => {
                log::error!("cannot mount wheels: {err}");
                (None, Some(err.to_string()))
            }
        };
        let slot = SlotDom::mount(&document).map_err(|err| {
            log::error!("cannot mount slot machine: {err}");
            err
        })?;

        let stage = Stage::new(config).with_effects(Rc::new(JsConfetti));
        let mut app = Self {
            stage,
            window,
            document,
            wheels,
            wheel_mount_error,
            slot,
            intents: Rc::new(RefCell::new(Vec::new())),
            pending: Vec::new(),
            clock: FrameClock::new(),
            click_callback: None,
        };
        app.listen_for_clicks()?;
        app.render();
        if app.wheels.is_some() {
            log::info!("fortuna mounted in #{container_id}");
        }
        Ok(app)
    }

    /// Why the wheels were not mounted, or `undefined` if they were.
    #[wasm_bindgen(getter, js_name = wheelMountError)]
    pub fn wheel_mount_error(&self) -> Option<String> {
        self.wheel_mount_error.clone()
    }

    /// Spin wheel `wheel`. Returns `false` if it is busy or unknown.
    pub fn spin(&mut self, wheel: usize) -> bool {
        let origin = self
            .wheels
            .as_ref()
            .and_then(|wheels| wheels.get(wheel))
            .map(|w| w.effect_origin(&self.window));
        let spun = match origin {
            Some(origin) => self.stage.spin_from(wheel, origin),
            None => self.stage.spin(wheel),
        };
        spun.unwrap_or(false)
    }

    /// Add a second wheel.
    pub fn add_wheel(&mut self) -> bool {
        let added = self.stage.add_wheel();
        self.render();
        added
    }

    /// Remove the second wheel.
    pub fn remove_wheel(&mut self) -> bool {
        let removed = self.stage.remove_wheel();
        self.render();
        removed
    }

    /// Collapse to one freshly reset wheel.
    pub fn reset_all(&mut self) {
        self.stage.reset_all();
        self.render();
    }

    /// Remove the settled prize of `wheel`, returning its label.
    pub fn remove_selected_prize(&mut self, wheel: usize) -> Option<String> {
        self.stage.remove_selected_prize(wheel).ok()
    }

    /// Replace the options of `wheel` from a JSON array of strings.
    pub fn update_options(&mut self, wheel: usize, options_json: &str) -> Result<bool, JsValue> {
        let options: Vec<String> = serde_json::from_str(options_json)
            .map_err(|e| JsValue::from_str(&format!("JSON parse error: {e}")))?;
        self.stage
            .update_options(wheel, options)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Close the prize overlay of `wheel`.
    pub fn close_overlay(&mut self, wheel: usize) {
        if let Err(err) = self.stage.close_overlay(wheel) {
            log::warn!("cannot close overlay: {err}");
        }
    }

    /// Open the slot machine for `prize`.
    pub fn open_slot(&mut self, prize: &str) {
        self.stage.open_slot(prize);
        self.render();
    }

    /// Start the slot machine from its range fields.
    ///
    /// Invalid ranges are reported with a blocking alert.
    pub fn start_slot(&mut self) {
        let (start, end) = self.slot.range_text();
        match self.stage.start_slot(&start, &end) {
            Ok(SpinStart::Started(_) | SpinStart::Busy) => {}
            Err(err) => {
                if self.window.alert_with_message(&err.to_string()).is_err() {
                    log::warn!("{err}");
                }
            }
        }
    }

    /// Close the slot machine and notify the page with `casinoClosed`.
    pub fn close_slot(&mut self) {
        let event = self.stage.close_slot();
        self.pending.push(event);
        self.notify_closed();
        self.render();
    }

    /// Advance to `now_ms` (a `requestAnimationFrame` timestamp), apply queued
    /// clicks and redraw. Returns the events of this frame as JSON.
    pub fn tick(&mut self, now_ms: f64) -> String {
        let dt = self.clock.tick(now_ms);

        let intents: Vec<Intent> = self.intents.borrow_mut().drain(..).collect();
        for intent in intents {
            self.apply(intent);
        }

        let advanced = self.stage.advance(dt);
        self.pending.extend(advanced);
        self.render();

        let events = std::mem::take(&mut self.pending);
        serde_json::to_string(&events).unwrap_or_default()
    }
}

impl FortunaApp {
    /// The stage behind the page.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    fn listen_for_clicks(&mut self) -> Result<(), JsValue> {
        let intents = Rc::clone(&self.intents);
        let cb = Closure::new(move |e: MouseEvent| {
            let action = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
                .and_then(|el| el.get_attribute("data-action"));
            if let Some(intent) = action.as_deref().and_then(Intent::parse) {
                intents.borrow_mut().push(intent);
            }
        });
        self.document
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        self.click_callback = Some(cb);
        Ok(())
    }

    fn apply(&mut self, intent: Intent) {
        log::debug!("intent {intent}");
        match intent {
            Intent::Spin(id) => {
                self.spin(id);
            }
            Intent::RemovePrize(id) => {
                self.remove_selected_prize(id);
            }
            Intent::CloseOverlay(id) => self.close_overlay(id),
            Intent::StartSlot => self.start_slot(),
            Intent::CloseSlot => self.close_slot(),
        }
    }

    fn notify_closed(&self) {
        match web_sys::CustomEvent::new("casinoClosed") {
            Ok(event) => {
                if let Err(err) = self.window.dispatch_event(&event) {
                    log::warn!("casinoClosed dispatch failed: {err:?}");
                }
            }
            Err(err) => log::warn!("cannot create casinoClosed: {err:?}"),
        }
    }

    fn render(&mut self) {
        let manager = self.stage.manager();
        if let Some(wheels) = self.wheels.as_mut() {
            if let Err(err) = wheels.render(&self.document, manager.wheels(), manager.layout()) {
                log::error!("wheel render failed: {err}");
            }
        }
        self.slot.render(self.stage.slot());
    }
}

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}
