//! Viewport → stage transform synchronization.
//!
//! [`compute_transform`] is the pure mapping from a viewer snapshot to the
//! stage transform. [`SyncEngine::sync`] reads live state, computes the
//! transform, and applies it to a [`Stage`] in one step. Nothing is applied
//! unless every input is ready, so a skipped sync leaves the stage exactly as
//! the previous successful sync left it.
//!
//! ## Math
//!
//! The viewer's normalized coordinates put the image's left edge at `x = 0`
//! and its right edge at `x = 1`, with `y` measured in the same (width)
//! units. At zoom `z` one normalized unit spans `container_width * z` screen
//! pixels, so:
//!
//! ```text
//! scale    = (1 / image_width) * (container_width * z)
//! offset_x = (0 - bounds.x) * container_width * z
//! offset_y = (0 - bounds.y) * container_width * z
//! ```

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::config::ViewportReading;
use crate::geometry::{Size, Transform};
use crate::stage::Stage;
use crate::viewer::{ViewportSource, ViewportState};

/// Why a sync did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The viewer has not built its viewport yet.
    NoViewport,
    /// The viewer has not opened any content.
    NotOpen,
    /// No image is present in the viewer's content set.
    NoContent,
    /// The content reports a zero, negative, or non-finite width.
    EmptyContent,
    /// The container has a zero, negative, or non-finite width.
    EmptyContainer,
    /// Zoom or bounds produced a non-finite or non-positive transform.
    Degenerate,
    /// The overlay has been destroyed.
    Destroyed,
}

/// Result of a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// The transform was applied and a redraw requested.
    Applied(Transform),
    /// Nothing was touched.
    Skipped(SkipReason),
}

impl SyncOutcome {
    /// The applied transform, if any.
    #[must_use]
    pub fn transform(self) -> Option<Transform> {
        match self {
            Self::Applied(t) => Some(t),
            Self::Skipped(_) => None,
        }
    }
}

/// Everything the transform depends on, read in one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub viewport: ViewportState,
    pub content: Size,
    pub container: Size,
}

impl Snapshot {
    /// Read a snapshot from the viewer, or report why it is not ready.
    pub fn read<V: ViewportSource + ?Sized>(viewer: &V, reading: ViewportReading) -> Result<Self, SkipReason> {
        let Some(viewport) = viewer.viewport(reading) else {
            return Err(SkipReason::NoViewport);
        };
        if !viewer.is_open() {
            return Err(SkipReason::NotOpen);
        }
        let Some(content) = viewer.content_size() else {
            return Err(SkipReason::NoContent);
        };
        Ok(Self { viewport, content, container: viewer.container_size() })
    }
}

/// Map a snapshot to the stage transform.
///
/// Image pixel (0, 0) lands on the screen position of the image's top-left
/// corner, and one image pixel spans `scale` screen pixels on both axes.
pub fn compute_transform(snapshot: &Snapshot) -> Result<Transform, SkipReason> {
    let image_width = snapshot.content.width;
    if !(image_width.is_finite() && image_width > 0.0) {
        return Err(SkipReason::EmptyContent);
    }
    let container_width = snapshot.container.width;
    if !(container_width.is_finite() && container_width > 0.0) {
        return Err(SkipReason::EmptyContainer);
    }

    // Screen pixels per normalized viewport unit.
    let viewport_to_screen = container_width * snapshot.viewport.zoom;
    let image_to_viewport = 1.0 / image_width;
    let top_left = snapshot.viewport.bounds_top_left;

    let transform = Transform {
        scale: image_to_viewport * viewport_to_screen,
        offset_x: (0.0 - top_left.x) * viewport_to_screen,
        offset_y: (0.0 - top_left.y) * viewport_to_screen,
    };
    if !transform.is_valid() {
        return Err(SkipReason::Degenerate);
    }
    Ok(transform)
}

/// Drives a [`Stage`] from a [`ViewportSource`].
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    reading: ViewportReading,
    last: Option<Transform>,
}

impl SyncEngine {
    #[must_use]
    pub fn new(reading: ViewportReading) -> Self {
        Self { reading, last: None }
    }

    /// Recompute the transform from live viewer state and apply it.
    ///
    /// Applies the container size, then the transform, then requests a
    /// redraw. Applies nothing when any input is missing or degenerate.
    pub fn sync<V, S>(&mut self, viewer: &V, stage: &mut S) -> SyncOutcome
    where
        V: ViewportSource + ?Sized,
        S: Stage,
    {
        let result = Snapshot::read(viewer, self.reading)
            .and_then(|snapshot| compute_transform(&snapshot).map(|t| (snapshot.container, t)));
        let (container, transform) = match result {
            Ok(applied) => applied,
            Err(reason) => {
                log::debug!("sync skipped: {reason:?}");
                return SyncOutcome::Skipped(reason);
            }
        };

        stage.set_size(container);
        stage.set_transform(transform);
        stage.batch_draw();

        self.last = Some(transform);
        SyncOutcome::Applied(transform)
    }

    /// The most recently applied transform.
    #[must_use]
    pub fn last_transform(&self) -> Option<Transform> {
        self.last
    }
}
