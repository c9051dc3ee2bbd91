//! Konva stage bindings.

use js_sys::{Object, Reflect};
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use web_sys::HtmlDivElement;

use crate::config::ConfigError;
use crate::error::OverlayError;
use crate::geometry::{Size, Transform};
use crate::stage::{Stage, StageFactory};

#[wasm_bindgen(js_namespace = Konva)]
extern "C" {
    /// `Konva.Stage`.
    #[wasm_bindgen(js_name = Stage)]
    #[derive(Debug, Clone)]
    pub type KonvaStageJs;

    #[wasm_bindgen(catch, constructor, js_class = "Stage")]
    fn new(config: &Object) -> Result<KonvaStageJs, JsValue>;

    #[wasm_bindgen(method, js_name = width)]
    fn set_width(this: &KonvaStageJs, value: f64);

    #[wasm_bindgen(method, js_name = height)]
    fn set_height(this: &KonvaStageJs, value: f64);

    #[wasm_bindgen(method, js_name = scaleX)]
    fn set_scale_x(this: &KonvaStageJs, value: f64);

    #[wasm_bindgen(method, js_name = scaleY)]
    fn set_scale_y(this: &KonvaStageJs, value: f64);

    #[wasm_bindgen(method, js_name = x)]
    fn set_x(this: &KonvaStageJs, value: f64);

    #[wasm_bindgen(method, js_name = y)]
    fn set_y(this: &KonvaStageJs, value: f64);

    #[wasm_bindgen(method, js_name = batchDraw)]
    fn batch_draw(this: &KonvaStageJs);

    #[wasm_bindgen(method)]
    fn add(this: &KonvaStageJs, layer: &KonvaLayerJs);

    #[wasm_bindgen(method)]
    fn destroy(this: &KonvaStageJs);

    #[wasm_bindgen(method)]
    pub fn on(this: &KonvaStageJs, events: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method)]
    pub fn off(this: &KonvaStageJs, events: &str);

    /// `Konva.Layer`.
    #[wasm_bindgen(js_name = Layer)]
    #[derive(Debug, Clone)]
    pub type KonvaLayerJs;

    #[wasm_bindgen(catch, constructor, js_class = "Layer")]
    fn new() -> Result<KonvaLayerJs, JsValue>;

    #[wasm_bindgen(method, js_name = destroyChildren)]
    fn destroy_children(this: &KonvaLayerJs);

    #[wasm_bindgen(method)]
    fn draw(this: &KonvaLayerJs);

    /// Event object passed to stage listeners.
    pub type KonvaEvent;

    #[wasm_bindgen(method, getter)]
    pub fn target(this: &KonvaEvent) -> JsValue;

    #[wasm_bindgen(method, getter)]
    pub fn evt(this: &KonvaEvent) -> Option<web_sys::Event>;
}

/// A Konva stage with the single default layer shapes are added to.
#[derive(Debug, Clone)]
pub struct KonvaStage {
    stage: KonvaStageJs,
    layer: KonvaLayerJs,
}

impl KonvaStage {
    /// Construct `new Konva.Stage(config)` and attach a fresh default layer.
    pub fn create(config: &Object) -> Result<Self, JsValue> {
        let stage = KonvaStageJs::new(config)?;
        let layer = match KonvaLayerJs::new() {
            Ok(layer) => layer,
            Err(err) => {
                stage.destroy();
                return Err(err);
            }
        };
        stage.add(&layer);
        Ok(Self { stage, layer })
    }

    #[must_use]
    pub fn js(&self) -> &KonvaStageJs {
        &self.stage
    }
}

impl Stage for KonvaStage {
    type Layer = KonvaLayerJs;

    fn set_size(&mut self, size: Size) {
        self.stage.set_width(size.width);
        self.stage.set_height(size.height);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.stage.set_scale_x(transform.scale);
        self.stage.set_scale_y(transform.scale);
        self.stage.set_x(transform.offset_x);
        self.stage.set_y(transform.offset_y);
    }

    fn batch_draw(&mut self) {
        self.stage.batch_draw();
    }

    fn layer(&self) -> &KonvaLayerJs {
        &self.layer
    }

    fn clear_layer(&mut self) {
        self.layer.destroy_children();
        self.layer.draw();
    }

    fn destroy(&mut self) {
        self.stage.destroy();
    }
}

/// Creates the [`KonvaStage`] inside the overlay container.
///
/// The stage config is `container`, `width` and `height`, then the parsed
/// `stageOptions`, then the caller's own `stageOptions` object. Assigning
/// that object last keeps values JSON cannot carry, such as DOM nodes and
/// functions.
#[derive(Debug, Clone)]
pub struct KonvaStageFactory {
    container: HtmlDivElement,
    raw_options: Option<Object>,
}

impl KonvaStageFactory {
    #[must_use]
    pub fn new(container: HtmlDivElement, raw_options: Option<Object>) -> Self {
        Self { container, raw_options }
    }
}

impl StageFactory for KonvaStageFactory {
    type Stage = KonvaStage;
    type Error = OverlayError;

    fn create(&self, size: Size, options: &Map<String, Value>) -> Result<KonvaStage, OverlayError> {
        let config = Object::new();
        Reflect::set(&config, &"container".into(), &self.container)?;
        Reflect::set(&config, &"width".into(), &size.width.into())?;
        Reflect::set(&config, &"height".into(), &size.height.into())?;

        let mut config = config;
        if !options.is_empty() {
            let text = serde_json::to_string(options).map_err(ConfigError::from)?;
            let parsed = js_sys::JSON::parse(&text)?;
            config = Object::assign(&config, parsed.unchecked_ref());
        }
        if let Some(raw) = &self.raw_options {
            config = Object::assign(&config, raw);
        }
        Ok(KonvaStage::create(&config)?)
    }
}
