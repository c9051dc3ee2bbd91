//! Seams to the external deep-zoom viewer.
//!
//! The viewer owns all viewport and content state; the overlay only reads
//! snapshots through [`ViewportSource`] and learns about changes through
//! [`ViewerEvents`] and [`ResizeSource`]. Handler registration returns a
//! [`Subscription`] whose release undoes it.

#[cfg(test)]
#[path = "viewer_test.rs"]
mod viewer_test;

use std::fmt;
use std::rc::Rc;

use crate::config::ViewportReading;
use crate::geometry::{Point, Size};

/// Callback invoked when a subscribed event fires. Payloads are never passed;
/// handlers re-read live state.
pub type Handler = Rc<dyn Fn()>;

/// A snapshot of the viewer's viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Top-left of the visible bounds in normalized image coordinates.
    /// Both axes are relative to the image width.
    pub bounds_top_left: Point,
    /// Viewer zoom factor.
    pub zoom: f64,
}

/// Read access to the viewer's live state.
pub trait ViewportSource {
    /// Whether the viewer has finished opening its content.
    fn is_open(&self) -> bool;

    /// The viewport's zoom and bounds, or `None` before the viewer has built
    /// its viewport.
    fn viewport(&self, reading: ViewportReading) -> Option<ViewportState>;

    /// Pixel size of the first loaded content item, if any.
    fn content_size(&self) -> Option<Size>;

    /// Current size of the viewer's container element in screen pixels.
    fn container_size(&self) -> Size;
}

/// Event subscription on the viewer.
pub trait ViewerEvents {
    fn subscribe(&self, event: &str, handler: Handler) -> Subscription;
}

/// Container resize notification.
///
/// Returns `None` when no resize notification mechanism is available.
pub trait ResizeSource {
    fn watch(&self, handler: Handler) -> Option<Subscription>;
}

/// A registered handler, released exactly once.
///
/// Release happens on [`Subscription::release`] or on drop, whichever comes
/// first.
pub struct Subscription {
    name: String,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a release callback for the handler registered under `name`.
    pub fn new(name: impl Into<String>, release: impl FnOnce() + 'static) -> Self {
        Self { name: name.into(), release: Some(Box::new(release)) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the release callback has not yet run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Run the release callback. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            log::debug!("releasing subscription {}", self.name);
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("active", &self.is_active())
            .finish()
    }
}
