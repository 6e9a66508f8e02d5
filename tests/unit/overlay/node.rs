use super::*;

#[test]
fn default_refresh_is_full_and_persisted() {
    let opts = RefreshOpts::default();
    assert!(opts.full_refresh);
    assert!(!opts.preview);
    assert!(!opts.refresh_filters);
}

#[test]
fn partial_and_preview_skip_full_steps() {
    assert!(!RefreshOpts::partial().full_refresh);

    let source = ContentSource::Image {
        path: "p.png".to_owned(),
    };
    let preview = RefreshOpts::preview(Some(source.clone()));
    assert!(preview.preview);
    assert!(!preview.full_refresh);
    assert_eq!(preview.preview_texture, Some(source));
}

#[test]
fn set_texture_refreshes_by_default() {
    let opts = SetTextureOpts::default();
    assert!(opts.refresh);
    assert!(!opts.preview);
    assert!(opts.patch.is_none());
}
