use super::*;
use serde_json::json;

fn tok() -> EntityState {
    EntityState {
        sort: 5.0,
        elevation: 3.0,
        z_index: 2.0,
        sort_layer: 700.0,
        last_sorted_index: 30,
        ..EntityState::default()
    }
}

#[test]
fn plain_overlay_follows_entity() {
    let z = resolve_zorder(&OverlayConfig::default(), &tok(), 9999.0, 4);
    assert_eq!(
        z,
        ZOrder {
            sort_layer: 700.0,
            sort: 5.0,
            elevation: 3.0,
            z_index: 2.0,
            last_sorted_index: 34,
        }
    );
}

#[test]
fn top_raises_sort_and_elevation() {
    let c = OverlayConfig::from_json_value(&json!({ "top": true }));
    let z = resolve_zorder(&c, &tok(), 100.0, 0);
    assert_eq!(z.sort, 105.0);
    assert_eq!(z.elevation, 103.0);
    assert_eq!(z.z_index, 2.0);
}

#[test]
fn bottom_lowers_sort_and_clamps_elevation() {
    let c = OverlayConfig::from_json_value(&json!({ "bottom": true }));
    let z = resolve_zorder(&c, &tok(), 100.0, 0);
    assert_eq!(z.sort, -95.0);
    assert_eq!(z.elevation, 0.0);
    assert_eq!(z.z_index, 2.0);

    let mut sunk = tok();
    sunk.elevation = -4.0;
    assert_eq!(resolve_zorder(&c, &sunk, 100.0, 0).elevation, -4.0);
}

#[test]
fn ui_bottom_lowers_z_index() {
    let c = OverlayConfig::from_json_value(&json!({ "ui": true, "bottom": true }));
    assert_eq!(resolve_zorder(&c, &tok(), 100.0, 0).z_index, -98.0);
}
