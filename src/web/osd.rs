//! OpenSeadragon viewer bindings.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::config::ViewportReading;
use crate::geometry::{Point, Size};
use crate::viewer::{Handler, Subscription, ViewerEvents, ViewportSource, ViewportState};

#[wasm_bindgen]
extern "C" {
    /// `OpenSeadragon.Viewer`.
    #[derive(Debug, Clone)]
    pub type Viewer;

    #[wasm_bindgen(method, js_name = isOpen)]
    fn is_open(this: &Viewer) -> bool;

    #[wasm_bindgen(method, getter)]
    fn viewport(this: &Viewer) -> Option<Viewport>;

    #[wasm_bindgen(method, getter)]
    fn world(this: &Viewer) -> Option<World>;

    #[wasm_bindgen(method, getter)]
    pub fn container(this: &Viewer) -> Option<HtmlElement>;

    #[wasm_bindgen(method, getter)]
    pub fn canvas(this: &Viewer) -> Option<HtmlElement>;

    #[wasm_bindgen(method, js_name = addHandler)]
    fn add_handler(this: &Viewer, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = removeHandler)]
    fn remove_handler(this: &Viewer, event: &str, handler: &js_sys::Function);

    /// `OpenSeadragon.Viewport`.
    type Viewport;

    #[wasm_bindgen(method, js_name = getBounds)]
    fn get_bounds(this: &Viewport, current: bool) -> Rect;

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &Viewport, current: bool) -> f64;

    /// `OpenSeadragon.Rect`.
    type Rect;

    #[wasm_bindgen(method, getter)]
    fn x(this: &Rect) -> f64;

    #[wasm_bindgen(method, getter)]
    fn y(this: &Rect) -> f64;

    /// `OpenSeadragon.World`.
    type World;

    #[wasm_bindgen(method, js_name = getItemAt)]
    fn get_item_at(this: &World, index: u32) -> Option<TiledImage>;

    /// `OpenSeadragon.TiledImage`.
    type TiledImage;

    #[wasm_bindgen(method, js_name = getContentSize)]
    fn get_content_size(this: &TiledImage) -> OsdPoint;

    /// `OpenSeadragon.Point`.
    type OsdPoint;

    #[wasm_bindgen(method, getter)]
    fn x(this: &OsdPoint) -> f64;

    #[wasm_bindgen(method, getter)]
    fn y(this: &OsdPoint) -> f64;
}

/// [`ViewportSource`] and [`ViewerEvents`] over a live OpenSeadragon viewer.
#[derive(Debug, Clone)]
pub struct OsdSource {
    viewer: Viewer,
}

impl OsdSource {
    #[must_use]
    pub fn new(viewer: Viewer) -> Self {
        Self { viewer }
    }
}

impl ViewportSource for OsdSource {
    fn is_open(&self) -> bool {
        self.viewer.is_open()
    }

    fn viewport(&self, reading: ViewportReading) -> Option<ViewportState> {
        let viewport = self.viewer.viewport()?;
        let current = reading == ViewportReading::Current;
        let bounds = viewport.get_bounds(current);
        Some(ViewportState {
            bounds_top_left: Point::new(bounds.x(), bounds.y()),
            zoom: viewport.get_zoom(current),
        })
    }

    fn content_size(&self) -> Option<Size> {
        let item = self.viewer.world()?.get_item_at(0)?;
        let size = item.get_content_size();
        Some(Size::new(size.x(), size.y()))
    }

    fn container_size(&self) -> Size {
        match self.viewer.container() {
            Some(el) => Size::new(f64::from(el.client_width()), f64::from(el.client_height())),
            None => Size::default(),
        }
    }
}

impl ViewerEvents for OsdSource {
    fn subscribe(&self, event: &str, handler: Handler) -> Subscription {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| handler());
        self.viewer.add_handler(event, callback.as_ref().unchecked_ref());

        let viewer = self.viewer.clone();
        let name = event.to_owned();
        Subscription::new(event, move || {
            viewer.remove_handler(&name, callback.as_ref().unchecked_ref());
            drop(callback);
        })
    }
}
