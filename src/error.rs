//! Errors raised while building an overlay in the browser.
//!
//! Runtime conditions (viewer not ready, content missing) are never errors;
//! see [`crate::sync::SkipReason`]. Only construction can fail.

use wasm_bindgen::{JsCast, JsValue};

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// There is no global `window` (not running in a browser main thread).
    #[error("no global window")]
    NoWindow,
    /// The window has no `document`.
    #[error("window has no document")]
    NoDocument,
    /// The viewer object lacks an element the overlay attaches to.
    #[error("viewer has no {0} element")]
    MissingElement(&'static str),
    /// The config object could not be read.
    #[error("invalid overlay config: {0}")]
    Config(#[from] ConfigError),
    /// A DOM or library call threw.
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for OverlayError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe_js(&value))
    }
}

impl From<OverlayError> for JsValue {
    fn from(err: OverlayError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}
