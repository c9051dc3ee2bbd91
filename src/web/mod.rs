//! Browser binding: an OpenSeadragon viewer driving a Konva stage.
//!
//! `KonvaOverlay` is the class exported to JavaScript. It builds the overlay
//! container `div` inside the viewer's canvas element, creates a
//! `Konva.Stage` in it, and hands both to the generic [`Overlay`]. Pointer
//! listeners on the stage feed the arbiter and apply its effects to the
//! container and the native event.

mod konva;
mod osd;
mod resize;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlDivElement};

pub use konva::{KonvaEvent, KonvaLayerJs, KonvaStage, KonvaStageFactory, KonvaStageJs};
pub use osd::{OsdSource, Viewer};
pub use resize::{ElementObserver, WindowResize};

use crate::config::{ConfigError, OverlayConfig};
use crate::consts::{
    CONTAINER_ID_PREFIX, POINTER_CANCEL_EVENTS, POINTER_DOWN_EVENTS, POINTER_EVENTS_ACCEPT, POINTER_EVENTS_PASS,
    POINTER_LEAVE_EVENTS, POINTER_UP_EVENTS, STAGE_EVENT_NAMESPACE, STAGE_OPTIONS_KEY,
};
use crate::error::{OverlayError, describe_js};
use crate::geometry::Point;
use crate::input::{PointerEffect, PointerEvent, PointerPhase, PointerState, PointerTarget};
use crate::overlay::Overlay;
use crate::router::ResizeChain;

type BrowserOverlay = Overlay<OsdSource, KonvaStage>;

/// Install the console logger and panic hook.
///
/// `level` is a `log` level name (`"debug"`, `"info"`, ...); defaults to
/// `info`. Calling this more than once keeps the first logger.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    console_error_panic_hook::set_once();
    let level = match level.as_deref().map(str::parse::<log::Level>) {
        Some(Ok(level)) => level,
        _ => log::Level::Info,
    };
    if console_log::init_with_level(level).is_err() {
        log::debug!("logger already installed");
    }
}

/// A point returned to JavaScript.
#[wasm_bindgen(js_name = OverlayPoint)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for JsPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// A Konva stage glued to an OpenSeadragon viewer.
#[wasm_bindgen]
pub struct KonvaOverlay {
    overlay: Rc<RefCell<BrowserOverlay>>,
    container: HtmlDivElement,
    pointer: Option<PointerWiring>,
}

#[wasm_bindgen]
impl KonvaOverlay {
    /// `new KonvaOverlay(viewer, config, id)`.
    ///
    /// `config` may be `undefined`. `config.stageOptions` is passed to
    /// `Konva.Stage` as-is after the computed container and size.
    #[wasm_bindgen(constructor)]
    pub fn new(viewer: JsValue, config: JsValue, id: u32) -> Result<KonvaOverlay, JsValue> {
        Self::build(viewer.unchecked_into(), &config, id).map_err(JsValue::from)
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.overlay.borrow().id()
    }

    /// Whether viewer events still reach the overlay.
    #[wasm_bindgen(getter, js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.overlay.borrow().is_attached()
    }

    /// The default `Konva.Layer`, or `undefined` after `destroy()`.
    #[wasm_bindgen(js_name = getLayer)]
    pub fn get_layer(&self) -> JsValue {
        self.overlay.borrow().layer().map_or(JsValue::UNDEFINED, JsValue::from)
    }

    /// The `Konva.Stage`, or `undefined` after `destroy()`.
    #[wasm_bindgen(js_name = getStage)]
    pub fn get_stage(&self) -> JsValue {
        self.overlay
            .borrow()
            .stage()
            .map_or(JsValue::UNDEFINED, |stage| JsValue::from(stage.js().clone()))
    }

    #[wasm_bindgen(js_name = clearLayer)]
    pub fn clear_layer(&self) {
        self.overlay.borrow().clear_layer();
    }

    /// Force a sync. Returns whether a transform was applied.
    pub fn sync(&self) -> bool {
        self.overlay.borrow().sync().transform().is_some()
    }

    /// `"idle"` or `"active"`.
    #[wasm_bindgen(js_name = pointerState)]
    pub fn pointer_state(&self) -> String {
        match self.overlay.borrow().pointer_state() {
            PointerState::Idle => "idle".to_owned(),
            PointerState::Active => "active".to_owned(),
        }
    }

    #[wasm_bindgen(js_name = imagePixelToViewport)]
    pub fn image_pixel_to_viewport(&self, x: f64, y: f64) -> JsPoint {
        self.overlay.borrow().image_pixel_to_viewport(Point::new(x, y)).into()
    }

    #[wasm_bindgen(js_name = viewportToImagePixel)]
    pub fn viewport_to_image_pixel(&self, x: f64, y: f64) -> JsPoint {
        self.overlay.borrow().viewport_to_image_pixel(Point::new(x, y)).into()
    }

    #[wasm_bindgen(js_name = imagePixelToStage)]
    pub fn image_pixel_to_stage(&self, x: f64, y: f64) -> JsPoint {
        self.overlay.borrow().image_pixel_to_stage(Point::new(x, y)).into()
    }

    #[wasm_bindgen(js_name = stageToImagePixel)]
    pub fn stage_to_image_pixel(&self, x: f64, y: f64) -> JsPoint {
        self.overlay.borrow().stage_to_image_pixel(Point::new(x, y)).into()
    }

    /// Screen position of an image pixel, or `undefined` before the first sync.
    #[wasm_bindgen(js_name = imagePixelToScreen)]
    pub fn image_pixel_to_screen(&self, x: f64, y: f64) -> Option<JsPoint> {
        self.overlay.borrow().image_pixel_to_screen(Point::new(x, y)).map(JsPoint::from)
    }

    /// Image pixel under a screen position, or `undefined` before the first sync.
    #[wasm_bindgen(js_name = screenToImagePixel)]
    pub fn screen_to_image_pixel(&self, x: f64, y: f64) -> Option<JsPoint> {
        self.overlay.borrow().screen_to_image_pixel(Point::new(x, y)).map(JsPoint::from)
    }

    /// Unsubscribe, destroy the stage, and remove the container. Safe to call
    /// more than once.
    pub fn destroy(&mut self) {
        self.teardown();
    }
}

impl KonvaOverlay {
    fn build(viewer: Viewer, config: &JsValue, id: u32) -> Result<Self, OverlayError> {
        let cfg = read_config(config)?;
        let raw_options = raw_stage_options(config)?;
        let window = web_sys::window().ok_or(OverlayError::NoWindow)?;
        let document = window.document().ok_or(OverlayError::NoDocument)?;
        let host = viewer.canvas().ok_or(OverlayError::MissingElement("canvas"))?;
        let observed = viewer.container().ok_or(OverlayError::MissingElement("container"))?;

        let container = create_container(&document, id)?;
        host.append_child(&container)?;

        let factory = KonvaStageFactory::new(container.clone(), raw_options);
        let resize = ResizeChain::new(ElementObserver::new(observed), cfg.resize_fallback.then_some(WindowResize));
        let overlay = match Overlay::build(OsdSource::new(viewer), &factory, &cfg, id, Some(&resize)) {
            Ok(overlay) => overlay,
            Err(err) => {
                container.remove();
                return Err(err);
            }
        };
        set_pointer_events(&container, overlay.initial_pointer_acceptance());

        let stage = overlay.stage();
        let overlay = Rc::new(RefCell::new(overlay));
        let pointer = match stage {
            Some(stage) if cfg.intercepts_pointer() => Some(PointerWiring::attach(stage.js(), &overlay, &container)),
            _ => None,
        };

        Ok(Self { overlay, container, pointer })
    }

    fn teardown(&mut self) {
        if let Some(wiring) = self.pointer.take() {
            wiring.release();
        }
        let effects = match self.overlay.try_borrow_mut() {
            Ok(mut overlay) => overlay.destroy(),
            Err(_) => {
                log::warn!("overlay busy during teardown; stage left to drop");
                Vec::new()
            }
        };
        apply_effects(&effects, None, &self.container);
        self.container.remove();
    }
}

impl Drop for KonvaOverlay {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Stage listeners that feed pointer arbitration.
struct PointerWiring {
    stage: KonvaStageJs,
    callbacks: Vec<Closure<dyn FnMut(KonvaEvent)>>,
}

impl PointerWiring {
    fn attach(stage: &KonvaStageJs, overlay: &Rc<RefCell<BrowserOverlay>>, container: &HtmlDivElement) -> Self {
        let bindings = [
            (POINTER_DOWN_EVENTS, PointerPhase::Down),
            (POINTER_UP_EVENTS, PointerPhase::Up),
            (POINTER_LEAVE_EVENTS, PointerPhase::Leave),
            (POINTER_CANCEL_EVENTS, PointerPhase::Cancel),
        ];
        let callbacks = bindings
            .into_iter()
            .map(|(events, phase)| {
                let weak = Rc::downgrade(overlay);
                let stage_ref = stage.clone();
                let container = container.clone();
                let callback = Closure::<dyn FnMut(KonvaEvent)>::new(move |event: KonvaEvent| {
                    let Some(overlay) = weak.upgrade() else {
                        return;
                    };
                    let target = if Object::is(&event.target(), stage_ref.as_ref()) {
                        PointerTarget::Background
                    } else {
                        PointerTarget::Shape
                    };
                    let Ok(overlay) = overlay.try_borrow() else {
                        return;
                    };
                    let effects = overlay.on_pointer(PointerEvent::new(phase, target));
                    apply_effects(&effects, event.evt().as_ref(), &container);
                });
                stage.on(&namespaced(events), callback.as_ref().unchecked_ref());
                callback
            })
            .collect();
        Self { stage: stage.clone(), callbacks }
    }

    fn release(self) {
        self.stage.off(&format!(".{STAGE_EVENT_NAMESPACE}"));
        log::debug!("released {} stage pointer listeners", self.callbacks.len());
    }
}

/// `"mousedown touchstart"` becomes `"mousedown.overlay touchstart.overlay"`.
fn namespaced(events: &str) -> String {
    events
        .split_whitespace()
        .map(|name| format!("{name}.{STAGE_EVENT_NAMESPACE}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn apply_effects(effects: &[PointerEffect], event: Option<&web_sys::Event>, container: &HtmlDivElement) {
    for effect in effects {
        match effect {
            PointerEffect::StopPropagation => {
                if let Some(event) = event {
                    event.stop_propagation();
                }
            }
            PointerEffect::AcceptPointerEvents(accept) => set_pointer_events(container, *accept),
        }
    }
}

fn set_pointer_events(container: &HtmlDivElement, accept: bool) {
    let value = if accept { POINTER_EVENTS_ACCEPT } else { POINTER_EVENTS_PASS };
    if let Err(err) = container.style().set_property("pointer-events", value) {
        log::warn!("failed to set pointer-events: {}", describe_js(&err));
    }
}

/// Read the config object.
///
/// `stageOptions` is read on its own: it goes through the same validation as
/// the rest, and the object itself is later handed to Konva unparsed.
fn read_config(config: &JsValue) -> Result<OverlayConfig, OverlayError> {
    if config.is_undefined() || config.is_null() {
        return Ok(OverlayConfig::default());
    }
    if !config.is_object() {
        return Err(OverlayError::Js(format!("config must be an object, got {}", describe_js(config))));
    }
    let rest = Object::assign(&Object::new(), config.unchecked_ref());
    Reflect::delete_property(&rest, &STAGE_OPTIONS_KEY.into())?;
    let rest = String::from(js_sys::JSON::stringify(&rest)?);

    let raw = Reflect::get(config, &STAGE_OPTIONS_KEY.into())?;
    let stage_options = stage_options_json(&raw)?;
    Ok(config_from_parts(&rest, stage_options.as_deref())?)
}

/// JSON text for a `stageOptions` value, or `None` when it is absent.
fn stage_options_json(raw: &JsValue) -> Result<Option<String>, ConfigError> {
    if raw.is_undefined() {
        return Ok(None);
    }
    if raw.is_null() {
        return Ok(Some("null".to_owned()));
    }
    if !raw.is_object() {
        let kind = raw.js_typeof().as_string().unwrap_or_default();
        return Err(ConfigError::StageOptionsNotObject(kind));
    }
    match js_sys::JSON::stringify(raw) {
        Ok(text) => Ok(Some(String::from(text))),
        Err(err) => {
            log::debug!("stageOptions not JSON-serializable ({}); passing it to Konva as-is", describe_js(&err));
            Ok(Some("{}".to_owned()))
        }
    }
}

/// Assemble the config from the JSON of everything but `stageOptions` and
/// the JSON of `stageOptions` itself.
fn config_from_parts(rest: &str, stage_options: Option<&str>) -> Result<OverlayConfig, ConfigError> {
    let mut value: Value = serde_json::from_str(rest)?;
    if let (Some(text), Some(map)) = (stage_options, value.as_object_mut()) {
        map.insert(STAGE_OPTIONS_KEY.to_owned(), serde_json::from_str(text)?);
    }
    OverlayConfig::from_value(value)
}

/// The caller's `stageOptions` object. Only called after [`read_config`]
/// accepted it.
fn raw_stage_options(config: &JsValue) -> Result<Option<Object>, OverlayError> {
    if !config.is_object() {
        return Ok(None);
    }
    let raw = Reflect::get(config, &STAGE_OPTIONS_KEY.into())?;
    if raw.is_object() && !Array::is_array(&raw) {
        return Ok(Some(raw.unchecked_into()));
    }
    Ok(None)
}

/// The overlay container, passing pointer input through until the overlay
/// says otherwise.
fn create_container(document: &Document, id: u32) -> Result<HtmlDivElement, OverlayError> {
    let container: HtmlDivElement = document
        .create_element("div")?
        .dyn_into()
        .map_err(|_| OverlayError::Js("created element is not a div".to_owned()))?;
    container.set_id(&format!("{CONTAINER_ID_PREFIX}{id}"));

    let style = container.style();
    for (property, value) in [
        ("position", "absolute"),
        ("top", "0"),
        ("left", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("pointer-events", POINTER_EVENTS_PASS),
    ] {
        style.set_property(property, value)?;
    }
    Ok(container)
}
