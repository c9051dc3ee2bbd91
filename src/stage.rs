//! Seam to the external scene-graph stage.
//!
//! The overlay never inspects shapes. It only sizes the stage, sets its
//! aggregate transform, asks for redraws, and clears the default layer.

use serde_json::{Map, Value};

use crate::geometry::{Size, Transform};

/// A renderable surface holding layers of shapes in image-pixel coordinates.
pub trait Stage {
    /// Handle to the default layer shapes are added to.
    type Layer;

    /// Resize the stage to the container's screen-pixel size.
    fn set_size(&mut self, size: Size);

    /// Set the uniform scale and screen-space position of the stage.
    fn set_transform(&mut self, transform: Transform);

    /// Schedule a redraw of every layer.
    fn batch_draw(&mut self);

    /// The default layer.
    fn layer(&self) -> &Self::Layer;

    /// Remove every shape from the default layer and redraw it.
    fn clear_layer(&mut self);

    /// Release the stage and everything it renders.
    fn destroy(&mut self);
}

/// Builds the stage an overlay draws into.
pub trait StageFactory {
    type Stage: Stage;
    type Error;

    /// Create a stage of `size` screen pixels.
    ///
    /// `options` are applied after the computed size, so they may override
    /// it.
    fn create(&self, size: Size, options: &Map<String, Value>) -> Result<Self::Stage, Self::Error>;
}
