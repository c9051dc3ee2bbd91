//! Overlay configuration.
//!
//! The host passes a JSON object (camelCase keys). Every field is optional;
//! absent fields take the defaults documented on each type.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::STAGE_OPTIONS_KEY;

/// Error returned by [`OverlayConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not valid JSON or did not match the expected shape.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    /// `stageOptions` was present but not an object.
    #[error("stageOptions must be an object, got {0}")]
    StageOptionsNotObject(String),
}

/// How the overlay container treats pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerMode {
    /// Pass input through to the viewer unless a gesture starts on a shape.
    #[default]
    Arbitrated,
    /// The container always accepts input; shape gestures are still tracked.
    Captured,
    /// The overlay never intercepts input.
    Disabled,
}

/// Which viewport values to read on sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportReading {
    /// The viewer's target (settled) zoom and bounds.
    #[default]
    Target,
    /// The viewer's current, possibly mid-animation, zoom and bounds.
    Current,
}

/// Construction options for an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayConfig {
    /// Handed to [`StageFactory::create`](crate::stage::StageFactory::create)
    /// after the computed container, width and height, so callers can
    /// override them.
    pub stage_options: Map<String, Value>,
    pub pointer_mode: PointerMode,
    pub viewport_reading: ViewportReading,
    /// Listen for window resizes when element resize observation is missing.
    pub resize_fallback: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            stage_options: Map::new(),
            pointer_mode: PointerMode::default(),
            viewport_reading: ViewportReading::default(),
            resize_fallback: true,
        }
    }
}

impl OverlayConfig {
    /// Parse a config from JSON text. Empty input and `null` yield the default.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(trimmed)?;
        Self::from_value(value)
    }

    /// Build a config from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match &value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => {
                if let Some(options) = map.get(STAGE_OPTIONS_KEY) {
                    if !options.is_object() && !options.is_null() {
                        return Err(ConfigError::StageOptionsNotObject(json_kind(options).to_owned()));
                    }
                }
            }
            _ => {}
        }
        let mut value = value;
        if let Some(map) = value.as_object_mut() {
            if map.get(STAGE_OPTIONS_KEY).is_some_and(Value::is_null) {
                map.remove(STAGE_OPTIONS_KEY);
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Whether pointer arbitration is wired at all.
    #[must_use]
    pub fn intercepts_pointer(&self) -> bool {
        self.pointer_mode != PointerMode::Disabled
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
