use super::*;
use serde_json::json;

#[test]
fn empty_patch_yields_defaults() {
    let cfg = OverlayConfig::from_json_value(&json!({}));
    assert_eq!(cfg, OverlayConfig::default());
    assert_eq!(cfg.scale_x, 1.0);
    assert!(cfg.loop_playback);
    assert!(cfg.animation.clockwise);
}

#[test]
fn wire_names_match_config_forms() {
    let cfg = OverlayConfig::from_json_value(&json!({
        "parentID": "halo",
        "pOffsetX": 4,
        "limitOnHUD": true,
        "loop": false,
        "linkDimensionsY": true,
        "anchor": [0.0, 1.0],
    }));
    assert_eq!(cfg.parent(), Some("halo"));
    assert_eq!(cfg.p_offset_x, 4.0);
    assert!(cfg.limit_on_hud);
    assert!(!cfg.loop_playback);
    assert!(cfg.link_dimensions_y);
    assert_eq!(cfg.anchor, Some(Anchor { x: 0.0, y: 1.0 }));
}

#[test]
fn malformed_field_keeps_previous_value() {
    let base = OverlayConfig {
        alpha: 0.5,
        ..OverlayConfig::default()
    };
    let cfg = base.merged(&json!({ "alpha": "very", "angle": 45 }));
    assert_eq!(cfg.alpha, 0.5);
    assert_eq!(cfg.angle, 45.0);
}

#[test]
fn nested_objects_merge_instead_of_replacing() {
    let base = OverlayConfig::from_json_value(&json!({
        "animation": { "rotate": true, "duration": 1000 }
    }));
    let cfg = base.merged(&json!({ "animation": { "clockwise": false } }));
    assert!(cfg.animation.rotate);
    assert!(!cfg.animation.clockwise);
    assert_eq!(cfg.animation.duration, 1000.0);
}

#[test]
fn legacy_link_dimensions_expands_to_both_axes() {
    let cfg = OverlayConfig::from_json_value(&json!({ "linkDimensions": true }));
    assert!(cfg.link_dimensions_x);
    assert!(cfg.link_dimensions_y);

    let cfg = OverlayConfig::from_json_value(&json!({
        "linkDimensions": true,
        "linkDimensionsX": false,
    }));
    assert!(!cfg.link_dimensions_x);
    assert!(!cfg.link_dimensions_y);
}

#[test]
fn non_object_patch_is_ignored() {
    let base = OverlayConfig::default();
    assert_eq!(base.merged(&json!([1, 2, 3])), base);
    assert_eq!(base.merged(&serde_json::Value::Null), base);
}

#[test]
fn null_clears_optional_fields() {
    let base = OverlayConfig::from_json_value(&json!({ "tint": "#ff0000", "width": 50 }));
    let cfg = base.merged(&json!({ "tint": null }));
    assert_eq!(cfg.tint, None);
    assert_eq!(cfg.explicit_width(), Some(50.0));
}

#[test]
fn sentinels_read_as_absent() {
    let cfg = OverlayConfig::from_json_value(&json!({
        "filter": "NONE",
        "parentID": "",
        "limitOnEffect": "  ",
        "width": 0,
    }));
    assert_eq!(cfg.filter_id(), None);
    assert_eq!(cfg.parent(), None);
    assert_eq!(cfg.limit_effect(), None);
    assert_eq!(cfg.explicit_width(), None);
}

#[test]
fn invalid_json_text_is_an_error() {
    assert!(OverlayConfig::from_json_str("{ nope").is_err());
    let cfg = OverlayConfig::from_json_str(r#"{"alpha": 0.25}"#).unwrap();
    assert_eq!(cfg.alpha, 0.25);
}

#[test]
fn interaction_limits_detected() {
    let mut cfg = OverlayConfig::default();
    assert!(!cfg.has_interaction_limits());
    cfg.limit_on_any_target = true;
    assert!(cfg.has_interaction_limits());
}

#[test]
fn rejected_comparator_survives_merges() {
    let cfg = OverlayConfig::from_json_value(&json!({ "limitOnProperty": "nonsense" }));
    assert!(Comparator::parse("nonsense").is_err());
    assert_eq!(cfg.limit_property(), Some("nonsense"));

    let next = cfg.merged(&json!({ "alpha": 0.5 }));
    assert_eq!(next.limit_property(), Some("nonsense"));
    assert_eq!(next.alpha, 0.5);
}
