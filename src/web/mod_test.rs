use super::*;

// --- Stage event names ---

#[test]
fn namespaced_tags_each_event() {
    assert_eq!(namespaced("mousedown touchstart"), "mousedown.overlay touchstart.overlay");
}

#[test]
fn namespaced_single_event() {
    assert_eq!(namespaced("mouseleave"), "mouseleave.overlay");
}

// --- Config assembly ---

#[test]
fn config_without_stage_options_is_default() {
    let cfg = config_from_parts("{}", None).unwrap();
    assert_eq!(cfg, OverlayConfig::default());
}

#[test]
fn config_keeps_stage_options_and_other_keys() {
    let cfg = config_from_parts(r#"{"pointerMode":"captured"}"#, Some(r#"{"draggable":true}"#)).unwrap();
    assert_eq!(cfg.pointer_mode, crate::config::PointerMode::Captured);
    assert_eq!(cfg.stage_options.get("draggable"), Some(&Value::Bool(true)));
}

#[test]
fn config_null_stage_options_is_empty() {
    let cfg = config_from_parts("{}", Some("null")).unwrap();
    assert!(cfg.stage_options.is_empty());
}

#[test]
fn config_rejects_number_stage_options() {
    let err = config_from_parts("{}", Some("5")).unwrap_err();
    assert!(matches!(err, ConfigError::StageOptionsNotObject(kind) if kind == "number"));
}

#[test]
fn config_rejects_array_stage_options() {
    let err = config_from_parts("{}", Some("[1, 2]")).unwrap_err();
    assert!(matches!(err, ConfigError::StageOptionsNotObject(kind) if kind == "array"));
}
