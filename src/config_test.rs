use serde_json::json;

use super::*;

#[test]
fn empty_input_is_default() {
    let cfg = OverlayConfig::from_json("").unwrap();
    assert_eq!(cfg, OverlayConfig::default());
}

#[test]
fn null_is_default() {
    let cfg = OverlayConfig::from_json("null").unwrap();
    assert_eq!(cfg, OverlayConfig::default());
}

#[test]
fn empty_object_is_default() {
    let cfg = OverlayConfig::from_json("{}").unwrap();
    assert_eq!(cfg, OverlayConfig::default());
}

#[test]
fn defaults_are_documented_values() {
    let cfg = OverlayConfig::default();
    assert!(cfg.stage_options.is_empty());
    assert_eq!(cfg.pointer_mode, PointerMode::Arbitrated);
    assert_eq!(cfg.viewport_reading, ViewportReading::Target);
    assert!(cfg.resize_fallback);
}

#[test]
fn stage_options_are_kept_verbatim() {
    let cfg = OverlayConfig::from_json(r#"{"stageOptions": {"draggable": true, "width": 10, "nested": {"a": [1, 2]}}}"#)
        .unwrap();
    assert_eq!(cfg.stage_options.get("draggable"), Some(&json!(true)));
    assert_eq!(cfg.stage_options.get("width"), Some(&json!(10)));
    assert_eq!(cfg.stage_options.get("nested"), Some(&json!({"a": [1, 2]})));
}

#[test]
fn null_stage_options_is_empty() {
    let cfg = OverlayConfig::from_json(r#"{"stageOptions": null}"#).unwrap();
    assert!(cfg.stage_options.is_empty());
}

#[test]
fn non_object_stage_options_rejected() {
    let err = OverlayConfig::from_json(r#"{"stageOptions": [1, 2]}"#).unwrap_err();
    assert!(matches!(err, ConfigError::StageOptionsNotObject(ref kind) if kind == "array"));
    assert!(err.to_string().contains("stageOptions"));
}

#[test]
fn pointer_mode_parses_lowercase() {
    let cfg = OverlayConfig::from_json(r#"{"pointerMode": "captured"}"#).unwrap();
    assert_eq!(cfg.pointer_mode, PointerMode::Captured);
    let cfg = OverlayConfig::from_json(r#"{"pointerMode": "disabled"}"#).unwrap();
    assert_eq!(cfg.pointer_mode, PointerMode::Disabled);
}

#[test]
fn unknown_pointer_mode_is_parse_error() {
    let err = OverlayConfig::from_json(r#"{"pointerMode": "sometimes"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn viewport_reading_parses() {
    let cfg = OverlayConfig::from_json(r#"{"viewportReading": "current"}"#).unwrap();
    assert_eq!(cfg.viewport_reading, ViewportReading::Current);
}

#[test]
fn resize_fallback_can_be_disabled() {
    let cfg = OverlayConfig::from_json(r#"{"resizeFallback": false}"#).unwrap();
    assert!(!cfg.resize_fallback);
}

#[test]
fn malformed_json_is_parse_error() {
    let err = OverlayConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn intercepts_pointer_only_when_not_disabled() {
    let mut cfg = OverlayConfig::default();
    assert!(cfg.intercepts_pointer());
    cfg.pointer_mode = PointerMode::Captured;
    assert!(cfg.intercepts_pointer());
    cfg.pointer_mode = PointerMode::Disabled;
    assert!(!cfg.intercepts_pointer());
}

#[test]
fn serializes_camel_case() {
    let value = serde_json::to_value(OverlayConfig::default()).unwrap();
    assert_eq!(value["pointerMode"], json!("arbitrated"));
    assert_eq!(value["viewportReading"], json!("target"));
    assert_eq!(value["resizeFallback"], json!(true));
    assert_eq!(value["stageOptions"], json!({}));
}
