//! DOM projection of the stage.
//!
//! Elements are created once per widget and then only restyled each frame.
//! The wheel face SVG is rebuilt when the wheel's revision changes.

use super::error::MountError;
use super::intent::Intent;
use fortuna_core::Point;
use fortuna_widgets::face::{rim_lights, WheelFace};
use fortuna_widgets::{LayoutMode, SlotMachine, SlotView, Wheel, REEL_COUNT};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, Window,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn element<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T, MountError> {
    let el = document.create_element(tag)?;
    el.set_class_name(class);
    el.dyn_into::<T>()
        .map_err(|_| MountError::Dom(format!("<{tag}> has an unexpected type")))
}

fn div(document: &Document, class: &str) -> Result<HtmlElement, MountError> {
    element(document, "div", class)
}

fn button(
    document: &Document,
    class: &str,
    label: &str,
    intent: Intent,
) -> Result<HtmlButtonElement, MountError> {
    let btn: HtmlButtonElement = element(document, "button", class)?;
    btn.set_text_content(Some(label));
    btn.set_attribute("data-action", &intent.to_string())?;
    Ok(btn)
}

fn svg(document: &Document, tag: &str) -> Result<Element, MountError> {
    Ok(document.create_element_ns(Some(SVG_NS), tag)?)
}

fn set_style(el: &HtmlElement, name: &str, value: &str) {
    if let Err(err) = el.style().set_property(name, value) {
        log::warn!("failed to set {name}: {err:?}");
    }
}

fn toggle_class(el: &Element, class: &str, on: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, on) {
        log::warn!("failed to toggle {class}: {err:?}");
    }
}

/// Centre of `el` as a fraction of the viewport.
fn viewport_center(window: &Window, el: &Element) -> Point {
    let rect = el.get_bounding_client_rect();
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    Point::new(
        (rect.left() + rect.width() / 2.0) / width.max(1.0),
        (rect.top() + rect.height() / 2.0) / height.max(1.0),
    )
}

// =============================================================================
// Wheels
// =============================================================================

/// Elements of one mounted wheel.
pub(crate) struct WheelDom {
    root: HtmlElement,
    frame: HtmlElement,
    lights: HtmlElement,
    inner: HtmlElement,
    svg: Element,
    overlay: HtmlElement,
    overlay_prize: HtmlElement,
    drawn_revision: Option<u64>,
    lights_drawn: bool,
}

impl WheelDom {
    pub(crate) fn mount(
        document: &Document,
        container: &Element,
        id: usize,
    ) -> Result<Self, MountError> {
        let root = div(document, "wheel-container")?;
        root.set_id(&format!("wheelContainer{id}"));

        let frame = div(document, "wheel-frame")?;
        frame.set_attribute("data-action", &Intent::Spin(id).to_string())?;
        let lights = div(document, "wheel-lights")?;
        let inner = div(document, "wheel-inner")?;
        let svg = svg(document, "svg")?;
        svg.set_attribute("class", "wheel")?;
        svg.set_attribute("viewBox", &fortuna_widgets::FaceGeometry::STANDARD.view_box_attr())?;
        let pointer = div(document, "wheel-pointer")?;

        inner.append_child(&svg)?;
        frame.append_child(&lights)?;
        frame.append_child(&inner)?;
        frame.append_child(&pointer)?;
        root.append_child(&frame)?;

        let overlay = div(document, "prize-overlay")?;
        overlay.set_id(&format!("prizeOverlay{id}"));
        let content = div(document, "prize-overlay-content")?;
        let title: HtmlElement = element(document, "h2", "prize-overlay-title")?;
        title.set_text_content(Some("Prize selected!"));
        let overlay_prize = div(document, "prize-overlay-prize")?;
        let buttons = div(document, "prize-overlay-buttons")?;
        buttons.append_child(&button(
            document,
            "prize-overlay-remove-btn",
            "Remove from wheel",
            Intent::RemovePrize(id),
        )?)?;
        buttons.append_child(&button(
            document,
            "prize-overlay-close-btn",
            "Close",
            Intent::CloseOverlay(id),
        )?)?;
        content.append_child(&title)?;
        content.append_child(&overlay_prize)?;
        content.append_child(&buttons)?;
        overlay.append_child(&content)?;
        root.append_child(&overlay)?;

        container.append_child(&root)?;

        Ok(Self {
            root,
            frame,
            lights,
            inner,
            svg,
            overlay,
            overlay_prize,
            drawn_revision: None,
            lights_drawn: false,
        })
    }

    pub(crate) fn unmount(&self) {
        self.root.remove();
    }

    pub(crate) fn effect_origin(&self, window: &Window) -> Point {
        viewport_center(window, &self.root)
    }

    pub(crate) fn render(&mut self, document: &Document, wheel: &Wheel) -> Result<(), MountError> {
        if self.drawn_revision != Some(wheel.revision()) {
            self.draw_face(document, wheel)?;
            self.drawn_revision = Some(wheel.revision());
        }
        if !self.lights_drawn {
            self.lights_drawn = self.draw_lights(document, wheel.config().light_count)?;
        }

        set_style(
            &self.inner,
            "transform",
            &format!("rotate({}deg)", wheel.displayed_rotation()),
        );
        set_style(
            &self.frame,
            "cursor",
            if wheel.is_spinning() { "not-allowed" } else { "pointer" },
        );

        // The last label stays in place while the overlay fades out.
        let prize = wheel.overlay();
        if let Some(label) = prize {
            self.overlay_prize.set_text_content(Some(label));
        }
        set_style(&self.overlay, "transition", &wheel.overlay_transition());
        set_style(&self.overlay, "opacity", if prize.is_some() { "1" } else { "0" });
        set_style(
            &self.overlay,
            "visibility",
            if prize.is_some() { "visible" } else { "hidden" },
        );
        toggle_class(&self.overlay, "active", prize.is_some());
        Ok(())
    }

    fn draw_face(&self, document: &Document, wheel: &Wheel) -> Result<(), MountError> {
        self.svg.set_inner_html("");
        let face = WheelFace::project(wheel.options());

        for segment in &face.segments {
            let path = svg(document, "path")?;
            path.set_attribute("d", &segment.path)?;
            path.set_attribute("fill", &segment.fill)?;
            path.set_attribute("class", "wheel-segment-path")?;
            self.svg.append_child(&path)?;
        }
        for segment in &face.segments {
            let text = svg(document, "text")?;
            text.set_attribute("x", &segment.label_position.x.to_string())?;
            text.set_attribute("y", &segment.label_position.y.to_string())?;
            text.set_attribute("text-anchor", "middle")?;
            text.set_attribute("dominant-baseline", "middle")?;
            text.set_attribute("font-size", &segment.font_size.to_string())?;
            text.set_attribute("font-weight", "600")?;
            text.set_attribute("font-family", "Arial, sans-serif")?;
            text.set_attribute("class", "wheel-segment-text")?;
            text.set_attribute("transform", &segment.label_transform())?;
            text.set_attribute("fill", &segment.text_color)?;
            text.set_text_content(Some(segment.label.as_str()));
            self.svg.append_child(&text)?;
        }
        Ok(())
    }

    /// Returns `false` while the frame has not been laid out yet.
    fn draw_lights(&self, document: &Document, count: usize) -> Result<bool, MountError> {
        let lights = rim_lights(f64::from(self.frame.offset_width()), count);
        if lights.is_empty() {
            return Ok(false);
        }
        self.lights.set_inner_html("");
        for light in lights {
            let el = div(document, "wheel-light")?;
            set_style(&el, "position", "absolute");
            set_style(&el, "left", &format!("calc(50% + {}px)", light.offset.x));
            set_style(&el, "top", &format!("calc(50% + {}px)", light.offset.y));
            set_style(&el, "transform", "translate(-50%, -50%)");
            set_style(&el, "z-index", "10");
            set_style(&el, "animation-delay", &format!("{}s", light.delay_s));
            self.lights.append_child(&el)?;
        }
        Ok(true)
    }
}

/// Wheels plus their shared container.
pub(crate) struct WheelsDom {
    container: Element,
    divider: Option<HtmlElement>,
    wheels: Vec<WheelDom>,
}

impl WheelsDom {
    pub(crate) fn mount(document: &Document, container_id: &str) -> Result<Self, MountError> {
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| MountError::MissingElement {
                id: container_id.to_string(),
            })?;
        let divider = document
            .get_element_by_id("wheelDivider")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        Ok(Self {
            container,
            divider,
            wheels: Vec::new(),
        })
    }

    pub(crate) fn get(&self, id: usize) -> Option<&WheelDom> {
        self.wheels.get(id)
    }

    pub(crate) fn render(
        &mut self,
        document: &Document,
        wheels: &[Wheel],
        layout: LayoutMode,
    ) -> Result<(), MountError> {
        while self.wheels.len() > wheels.len() {
            if let Some(dom) = self.wheels.pop() {
                dom.unmount();
            }
        }
        while self.wheels.len() < wheels.len() {
            let dom = WheelDom::mount(document, &self.container, self.wheels.len())?;
            self.wheels.push(dom);
        }
        for (dom, wheel) in self.wheels.iter_mut().zip(wheels) {
            dom.render(document, wheel)?;
        }

        toggle_class(&self.container, LayoutMode::Split.css_class(), layout == LayoutMode::Split);
        if let Some(divider) = &self.divider {
            set_style(
                divider,
                "display",
                if layout.shows_divider() { "block" } else { "none" },
            );
        }
        Ok(())
    }
}

// =============================================================================
// Slot machine
// =============================================================================

/// Elements of the slot machine modal.
pub(crate) struct SlotDom {
    body: HtmlElement,
    overlay: HtmlElement,
    title: HtmlElement,
    start_input: HtmlInputElement,
    end_input: HtmlInputElement,
    columns: Vec<HtmlElement>,
    start_button: HtmlButtonElement,
    result_area: HtmlElement,
    result_number: HtmlElement,
    refresh_button: HtmlButtonElement,
}

impl SlotDom {
    pub(crate) fn mount(document: &Document) -> Result<Self, MountError> {
        let body = document.body().ok_or(MountError::NoDocument)?;

        let overlay = div(document, "casino-modal-overlay")?;
        overlay.set_id("casinoModal");
        let content = div(document, "casino-modal-content")?;

        let header = div(document, "casino-header")?;
        let title: HtmlElement = element(document, "h1", "casino-prize-title")?;
        title.set_id("casinoPrizeTitle");
        title.set_text_content(Some("PRIZE DRAWN"));
        header.append_child(&title)?;

        let config = div(document, "casino-config")?;
        let start_input = number_input(document, "numberStartInput")?;
        let end_input = number_input(document, "numberEndInput")?;
        for (label, input) in [("Start number:", &start_input), ("End number:", &end_input)] {
            let el: HtmlElement = element(document, "label", "")?;
            el.set_text_content(Some(label));
            config.append_child(&el)?;
            config.append_child(input)?;
        }

        let area = div(document, "casino-slot-area")?;
        let strip = div(document, "casino-slot-container")?;
        let mut columns = Vec::with_capacity(REEL_COUNT);
        for i in 0..REEL_COUNT {
            let column = div(document, "casino-slot-column")?;
            column.set_id(&format!("slotColumn{i}"));
            for digit in 0..10 {
                let cell = div(document, "casino-slot-number")?;
                cell.set_text_content(Some(digit.to_string().as_str()));
                column.append_child(&cell)?;
            }
            strip.append_child(&column)?;
            columns.push(column);
        }
        area.append_child(&strip)?;

        let start_button = button(document, "casino-start-button", "START", Intent::StartSlot)?;
        start_button.set_id("casinoStartButton");

        let result_area = div(document, "casino-result-area")?;
        result_area.set_id("casinoResultArea");
        let result_number = div(document, "casino-result-number")?;
        result_number.set_id("casinoResultNumber");
        let refresh_button = button(document, "casino-refresh-button", "↻", Intent::CloseSlot)?;
        refresh_button.set_id("casinoRefreshButton");
        result_area.append_child(&result_number)?;
        result_area.append_child(&refresh_button)?;

        content.append_child(&header)?;
        content.append_child(&config)?;
        content.append_child(&area)?;
        content.append_child(&start_button)?;
        content.append_child(&result_area)?;
        overlay.append_child(&content)?;
        body.append_child(&overlay)?;

        Ok(Self {
            body,
            overlay,
            title,
            start_input,
            end_input,
            columns,
            start_button,
            result_area,
            result_number,
            refresh_button,
        })
    }

    /// Raw text of the start and end fields.
    pub(crate) fn range_text(&self) -> (String, String) {
        (self.start_input.value(), self.end_input.value())
    }

    pub(crate) fn render(&self, slot: &SlotMachine) {
        let view: SlotView = slot.view();

        toggle_class(&self.overlay, "active", view.is_open);
        set_style(&self.body, "overflow", if view.is_open { "hidden" } else { "" });
        if let Some(title) = view.title.as_deref() {
            self.title.set_text_content(Some(title));
        }

        let stop_transition = format!(
            "transform {}ms {}",
            slot.config().stop_transition_ms,
            slot.stop_easing().to_css()
        );
        for (i, column) in self.columns.iter().enumerate() {
            let stopped = view.column_stopped[i];
            toggle_class(column, "stopped", stopped);
            let transition = if stopped {
                stop_transition.as_str()
            } else {
                "none"
            };
            set_style(column, "transition", transition);
            set_style(
                column,
                "transform",
                &format!("translateY({}px)", view.column_offsets[i]),
            );
        }

        self.start_button.set_disabled(!view.start_enabled);
        set_style(
            &self.result_area,
            "display",
            if view.result_text.is_some() { "block" } else { "none" },
        );
        if let Some(text) = view.result_text.as_deref() {
            self.result_number.set_text_content(Some(text));
        }
        toggle_class(&self.result_number, "blink", view.blink_on);
        toggle_class(&self.result_number, "highlighted", view.highlighted);
        set_style(
            &self.refresh_button,
            "display",
            if view.reset_visible { "block" } else { "none" },
        );
    }
}

fn number_input(document: &Document, id: &str) -> Result<HtmlInputElement, MountError> {
    let input: HtmlInputElement = element(document, "input", "")?;
    input.set_type("number");
    input.set_id(id);
    input.set_value("0");
    input.set_min("0");
    Ok(input)
}
