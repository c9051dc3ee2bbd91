//! Shared constants for the overlay crate.

// ── Viewer events ───────────────────────────────────────────────

/// Viewer events that can move or resize the image on screen. Each one
/// triggers a sync.
pub const VIEWER_SYNC_EVENTS: [&str; 6] = [
    "animation",
    "animation-finish",
    "viewport-change",
    "update-viewport",
    "open",
    "resize",
];

/// Global fallback event used when element resize observation is unavailable.
pub const WINDOW_RESIZE_EVENT: &str = "resize";

// ── Pointer events ──────────────────────────────────────────────

/// Stage events that begin a gesture.
pub const POINTER_DOWN_EVENTS: &str = "mousedown touchstart";

/// Stage events that end a gesture.
pub const POINTER_UP_EVENTS: &str = "mouseup touchend";

/// Stage event fired when the pointer leaves the overlay.
pub const POINTER_LEAVE_EVENTS: &str = "mouseleave";

/// Stage event fired when the platform aborts a touch gesture.
pub const POINTER_CANCEL_EVENTS: &str = "touchcancel";

// ── Container ───────────────────────────────────────────────────

/// CSS `pointer-events` value while the container intercepts input.
pub const POINTER_EVENTS_ACCEPT: &str = "auto";

/// CSS `pointer-events` value while input passes through to the viewer.
pub const POINTER_EVENTS_PASS: &str = "none";

/// Prefix of the overlay container's DOM id; the overlay id is appended.
pub const CONTAINER_ID_PREFIX: &str = "overlay-";

/// Konva event namespace for the overlay's own stage listeners.
pub const STAGE_EVENT_NAMESPACE: &str = "overlay";

/// Config key whose object is forwarded to the stage constructor.
pub const STAGE_OPTIONS_KEY: &str = "stageOptions";
