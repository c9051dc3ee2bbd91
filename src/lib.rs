//! Keeps a Konva drawing stage aligned with an OpenSeadragon deep-zoom viewer.
//!
//! Shapes are authored in image-pixel coordinates. Whenever the viewer pans,
//! zooms, animates, opens an image, or resizes, the stage is given a uniform
//! scale and offset so those shapes stay glued to the image. Pointer input is
//! arbitrated so drags on shapes stay with the stage while drags on empty
//! space still pan the image.
//!
//! The math and the state machine are host-independent and tested natively;
//! [`web`] binds them to the real viewer and stage in the browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`overlay`] | The overlay object and its testable [`overlay::OverlayCore`] |
//! | [`sync`] | Viewport snapshot and the image-to-screen transform |
//! | [`router`] | Viewer and resize subscriptions that trigger a sync |
//! | [`input`] | Pointer arbitration state machine |
//! | [`viewer`] | Traits the viewer side implements, and [`viewer::Subscription`] |
//! | [`stage`] | Trait the drawing stage implements |
//! | [`geometry`] | Points, sizes, and the stage transform |
//! | [`config`] | Overlay options parsed from JSON |
//! | [`error`] | Error types |
//! | [`web`] | `wasm-bindgen` class `KonvaOverlay` over OpenSeadragon and Konva |
//! | [`consts`] | Event names and DOM constants |

pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod input;
pub mod overlay;
pub mod router;
pub mod stage;
pub mod sync;
pub mod viewer;
pub mod web;
