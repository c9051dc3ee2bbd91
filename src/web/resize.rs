//! Container resize notification backed by `ResizeObserver`, with a global
//! `window` resize listener as fallback.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlElement, ResizeObserver};

use crate::consts::WINDOW_RESIZE_EVENT;
use crate::error::describe_js;
use crate::viewer::{Handler, ResizeSource, Subscription};

/// Observes one element with a `ResizeObserver`.
#[derive(Debug, Clone)]
pub struct ElementObserver {
    target: HtmlElement,
}

impl ElementObserver {
    #[must_use]
    pub fn new(target: HtmlElement) -> Self {
        Self { target }
    }
}

fn resize_observer_supported() -> bool {
    matches!(
        js_sys::Reflect::has(&js_sys::global(), &"ResizeObserver".into()),
        Ok(true)
    )
}

impl ResizeSource for ElementObserver {
    fn watch(&self, handler: Handler) -> Option<Subscription> {
        if !resize_observer_supported() {
            return None;
        }
        let callback = Closure::<dyn FnMut(js_sys::Array, ResizeObserver)>::new(
            move |_entries: js_sys::Array, _observer: ResizeObserver| handler(),
        );
        let observer = match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                log::warn!("ResizeObserver construction failed: {}", describe_js(&err));
                return None;
            }
        };
        observer.observe(&self.target);

        Some(Subscription::new("resize-observer", move || {
            observer.disconnect();
            drop(callback);
        }))
    }
}

/// Listens for the global `window` resize event.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowResize;

impl ResizeSource for WindowResize {
    fn watch(&self, handler: Handler) -> Option<Subscription> {
        let window = web_sys::window()?;
        let callback = Closure::<dyn FnMut()>::new(move || handler());
        if let Err(err) =
            window.add_event_listener_with_callback(WINDOW_RESIZE_EVENT, callback.as_ref().unchecked_ref())
        {
            log::warn!("window resize listener failed: {}", describe_js(&err));
            return None;
        }

        Some(Subscription::new("window:resize", move || {
            if let Err(err) =
                window.remove_event_listener_with_callback(WINDOW_RESIZE_EVENT, callback.as_ref().unchecked_ref())
            {
                log::warn!("window resize listener removal failed: {}", describe_js(&err));
            }
            drop(callback);
        }))
    }
}
