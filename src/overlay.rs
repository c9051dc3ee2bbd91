use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::OverlayConfig;
use crate::geometry::{Point, Transform};
use crate::input::{PointerArbiter, PointerEffect, PointerEvent, PointerState};
use crate::router::EventRouter;
use crate::stage::{Stage, StageFactory};
use crate::sync::{SkipReason, SyncEngine, SyncOutcome};
use crate::viewer::{Handler, ResizeSource, ViewerEvents, ViewportSource};

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

/// Core overlay state: everything that doesn't depend on event wiring.
///
/// Separated from `Overlay` so sync, arbitration and conversions can be
/// tested without subscriptions.
pub struct OverlayCore<V, S: Stage> {
    id: u32,
    viewer: V,
    stage: Option<S>,
    engine: SyncEngine,
    arbiter: PointerArbiter,
}

impl<V: ViewportSource, S: Stage> OverlayCore<V, S> {
    #[must_use]
    pub fn new(id: u32, viewer: V, stage: S, config: &OverlayConfig) -> Self {
        Self {
            id,
            viewer,
            stage: Some(stage),
            engine: SyncEngine::new(config.viewport_reading),
            arbiter: PointerArbiter::new(config.pointer_mode),
        }
    }

    // --- Sync ---

    /// Recompute and apply the stage transform from live viewer state.
    pub fn sync(&mut self) -> SyncOutcome {
        let Some(stage) = self.stage.as_mut() else {
            return SyncOutcome::Skipped(SkipReason::Destroyed);
        };
        self.engine.sync(&self.viewer, stage)
    }

    // --- Pointer arbitration ---

    /// Feed a stage pointer event through arbitration.
    pub fn on_pointer(&mut self, event: PointerEvent) -> Vec<PointerEffect> {
        if self.stage.is_none() {
            return Vec::new();
        }
        self.arbiter.on_pointer(event)
    }

    #[must_use]
    pub fn pointer_state(&self) -> PointerState {
        self.arbiter.state()
    }

    #[must_use]
    pub fn initial_pointer_acceptance(&self) -> bool {
        self.arbiter.initial_acceptance()
    }

    // --- Stage access ---

    #[must_use]
    pub fn stage(&self) -> Option<&S> {
        self.stage.as_ref()
    }

    #[must_use]
    pub fn layer(&self) -> Option<&S::Layer> {
        self.stage.as_ref().map(Stage::layer)
    }

    /// Remove every shape from the default layer and redraw it.
    pub fn clear_layer(&mut self) {
        if let Some(stage) = self.stage.as_mut() {
            stage.clear_layer();
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// The transform applied by the most recent successful sync.
    #[must_use]
    pub fn transform(&self) -> Option<Transform> {
        self.engine.last_transform()
    }

    // --- Coordinate conversion ---

    /// Image pixels to normalized viewport coordinates.
    ///
    /// Both axes are divided by the image width, matching the viewer's
    /// width-relative viewport space. Returns the input unchanged until
    /// content is loaded.
    #[must_use]
    pub fn image_pixel_to_viewport(&self, image: Point) -> Point {
        match self.content_width() {
            Some(width) => Point::new(image.x / width, image.y / width),
            None => image,
        }
    }

    /// Normalized viewport coordinates to image pixels.
    #[must_use]
    pub fn viewport_to_image_pixel(&self, viewport: Point) -> Point {
        match self.content_width() {
            Some(width) => Point::new(viewport.x * width, viewport.y * width),
            None => viewport,
        }
    }

    /// Image pixels to stage coordinates. Stage space is image-pixel space
    /// once the transform is applied, so this is the identity.
    #[must_use]
    pub fn image_pixel_to_stage(&self, image: Point) -> Point {
        image
    }

    /// Stage coordinates to image pixels. The identity, see
    /// [`Self::image_pixel_to_stage`].
    #[must_use]
    pub fn stage_to_image_pixel(&self, stage: Point) -> Point {
        stage
    }

    /// Image pixels to screen pixels under the last applied transform.
    #[must_use]
    pub fn image_pixel_to_screen(&self, image: Point) -> Option<Point> {
        self.transform().map(|t| t.image_to_screen(image))
    }

    /// Screen pixels to image pixels under the last applied transform.
    #[must_use]
    pub fn screen_to_image_pixel(&self, screen: Point) -> Option<Point> {
        self.transform().map(|t| t.screen_to_image(screen))
    }

    fn content_width(&self) -> Option<f64> {
        self.viewer
            .content_size()
            .map(|size| size.width)
            .filter(|width| width.is_finite() && *width > 0.0)
    }
}

impl<V, S: Stage> OverlayCore<V, S> {
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.stage.is_none()
    }

    /// Destroy the stage and reset arbitration.
    ///
    /// Returns the effects that restore pointer pass-through; empty when the
    /// core was already destroyed.
    pub fn destroy(&mut self) -> Vec<PointerEffect> {
        let Some(mut stage) = self.stage.take() else {
            return Vec::new();
        };
        stage.destroy();
        self.arbiter.reset()
    }
}

/// A stage kept aligned with a viewer, with its event subscriptions.
pub struct Overlay<V, S: Stage> {
    core: Rc<RefCell<OverlayCore<V, S>>>,
    router: EventRouter,
}

impl<V, S> Overlay<V, S>
where
    V: ViewportSource + ViewerEvents + 'static,
    S: Stage + 'static,
{
    /// Create the overlay, subscribe it to `viewer` and `resize`, and run the
    /// initial sync.
    pub fn new<R>(viewer: V, stage: S, config: &OverlayConfig, id: u32, resize: Option<&R>) -> Self
    where
        R: ResizeSource + ?Sized,
    {
        let core = Rc::new(RefCell::new(OverlayCore::new(id, viewer, stage, config)));
        let handler = sync_handler(Rc::downgrade(&core));
        let router = EventRouter::attach(core.borrow().viewer(), resize, &handler);

        let outcome = core.borrow_mut().sync();
        log::info!("overlay {id} attached (initial sync: {outcome:?})");
        Self { core, router }
    }

    /// Create the stage through `factory` with the container size and
    /// `config.stage_options`, then attach as [`Overlay::new`] does.
    ///
    /// Nothing is subscribed when the factory fails.
    pub fn build<F, R>(
        viewer: V,
        factory: &F,
        config: &OverlayConfig,
        id: u32,
        resize: Option<&R>,
    ) -> Result<Self, F::Error>
    where
        F: StageFactory<Stage = S> + ?Sized,
        R: ResizeSource + ?Sized,
    {
        let size = viewer.container_size();
        log::debug!("overlay {id}: creating {}x{} stage", size.width, size.height);
        let stage = factory.create(size, &config.stage_options)?;
        Ok(Self::new(viewer, stage, config, id, resize))
    }

    /// Force a sync outside of the event flow.
    pub fn sync(&self) -> SyncOutcome {
        self.core.borrow_mut().sync()
    }

    pub fn on_pointer(&self, event: PointerEvent) -> Vec<PointerEffect> {
        self.core.borrow_mut().on_pointer(event)
    }

    #[must_use]
    pub fn pointer_state(&self) -> PointerState {
        self.core.borrow().pointer_state()
    }

    #[must_use]
    pub fn initial_pointer_acceptance(&self) -> bool {
        self.core.borrow().initial_pointer_acceptance()
    }

    /// A handle to the default layer, or `None` after teardown.
    #[must_use]
    pub fn layer(&self) -> Option<S::Layer>
    where
        S::Layer: Clone,
    {
        self.core.borrow().layer().cloned()
    }

    /// A handle to the stage, or `None` after teardown.
    #[must_use]
    pub fn stage(&self) -> Option<S>
    where
        S: Clone,
    {
        self.core.borrow().stage().cloned()
    }

    pub fn clear_layer(&self) {
        self.core.borrow_mut().clear_layer();
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.core.borrow().id()
    }

    #[must_use]
    pub fn transform(&self) -> Option<Transform> {
        self.core.borrow().transform()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.core.borrow().is_destroyed()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.router.is_attached()
    }

    #[must_use]
    pub fn image_pixel_to_viewport(&self, image: Point) -> Point {
        self.core.borrow().image_pixel_to_viewport(image)
    }

    #[must_use]
    pub fn viewport_to_image_pixel(&self, viewport: Point) -> Point {
        self.core.borrow().viewport_to_image_pixel(viewport)
    }

    #[must_use]
    pub fn image_pixel_to_stage(&self, image: Point) -> Point {
        self.core.borrow().image_pixel_to_stage(image)
    }

    #[must_use]
    pub fn stage_to_image_pixel(&self, stage: Point) -> Point {
        self.core.borrow().stage_to_image_pixel(stage)
    }

    #[must_use]
    pub fn image_pixel_to_screen(&self, image: Point) -> Option<Point> {
        self.core.borrow().image_pixel_to_screen(image)
    }

    #[must_use]
    pub fn screen_to_image_pixel(&self, screen: Point) -> Option<Point> {
        self.core.borrow().screen_to_image_pixel(screen)
    }

    /// Unsubscribe from everything and destroy the stage.
    ///
    /// Safe to call repeatedly. Returns the pointer effects needed to restore
    /// pass-through on the container (empty on repeat calls).
    pub fn destroy(&mut self) -> Vec<PointerEffect> {
        self.router.detach();
        let mut core = self.core.borrow_mut();
        if core.is_destroyed() {
            return Vec::new();
        }
        log::info!("overlay {} destroyed", core.id());
        core.destroy()
    }
}

impl<V, S: Stage> Drop for Overlay<V, S> {
    fn drop(&mut self) {
        self.router.detach();
        if let Ok(mut core) = self.core.try_borrow_mut() {
            core.destroy();
        }
    }
}

/// Build the handler every subscription shares.
///
/// Holds only a weak reference, so late events after the overlay is dropped
/// are ignored. An event arriving while a sync is already running is skipped;
/// that sync reads the same live state.
fn sync_handler<V, S>(core: Weak<RefCell<OverlayCore<V, S>>>) -> Handler
where
    V: ViewportSource + 'static,
    S: Stage + 'static,
{
    Rc::new(move || {
        let Some(core) = core.upgrade() else {
            return;
        };
        let Ok(mut guard) = core.try_borrow_mut() else {
            log::debug!("sync already in progress; skipping re-entrant event");
            return;
        };
        guard.sync();
    })
}
