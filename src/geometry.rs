#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in image-pixel, normalized viewport, or screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair. Used for both content size (image pixels) and
/// container geometry (screen pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The mapping from image-pixel space to screen space.
///
/// `scale` is uniform on both axes. `offset_x` / `offset_y` are in screen
/// pixels and give the screen position of image pixel (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Transform {
    /// Convert an image-pixel point to screen pixels.
    #[must_use]
    pub fn image_to_screen(&self, image: Point) -> Point {
        Point {
            x: image.x * self.scale + self.offset_x,
            y: image.y * self.scale + self.offset_y,
        }
    }

    /// Convert a screen-pixel point back to image pixels.
    #[must_use]
    pub fn screen_to_image(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Scale and offsets are all finite and the scale is positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.offset_x.is_finite() && self.offset_y.is_finite()
    }
}
