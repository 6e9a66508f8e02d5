use super::*;

#[test]
fn layer_opts_fill_missing_fields() {
    let opts = LayerOpts::from_json_str(r#"{ "animationPrefix": "fx." }"#).unwrap();
    assert_eq!(opts.animation_prefix, "fx.");
    assert_eq!(opts.sort_offset, 9999.0);
    assert!(!opts.always_refresh_filters);
}

#[test]
fn layer_opts_reject_malformed_json() {
    let err = LayerOpts::from_json_str("{ sortOffset: 1 }").unwrap_err();
    assert!(matches!(err, OverlayError::Serde(_)));
}

#[test]
fn unknown_ids_are_lifecycle_errors() {
    let err = unknown(OverlayId(7));
    assert!(matches!(err, OverlayError::Lifecycle(_)));
}
