use super::*;
use serde_json::json;

#[test]
fn entity_defaults_are_neutral() {
    let e: EntityState = serde_json::from_value(json!({ "id": "t1", "w": 100, "h": 50 })).unwrap();
    assert_eq!(e.id, EntityId::from("t1"));
    assert!(e.visible);
    assert_eq!(e.alpha, 1.0);
    assert_eq!(e.mirror_sign(), Vec2::new(1.0, 1.0));
    assert_eq!(e.center(), Point::new(50.0, 25.0));
}

#[test]
fn mirror_sign_follows_texture_scale() {
    let e = EntityState {
        texture_scale_x: -0.8,
        texture_scale_y: 1.2,
        ..EntityState::default()
    };
    assert_eq!(e.mirror_sign(), Vec2::new(-1.0, 1.0));
}

#[test]
fn stage_scale_reads_zoom() {
    let scene = SceneState {
        stage_transform: Affine::scale_non_uniform(2.0, 0.5),
        viewport: Size::new(800.0, 600.0),
    };
    let s = scene.stage_scale();
    assert!((s.x - 2.0).abs() < 1e-12);
    assert!((s.y - 0.5).abs() < 1e-12);
}

#[test]
fn canvas_from_client_inverts_stage() {
    let scene = SceneState {
        stage_transform: Affine::translate((100.0, 50.0)) * Affine::scale(2.0),
        viewport: Size::new(800.0, 600.0),
    };
    let p = scene.canvas_from_client(Point::new(300.0, 250.0));
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 100.0).abs() < 1e-9);
}

#[test]
fn degenerate_stage_maps_identity() {
    let scene = SceneState {
        stage_transform: Affine::scale(0.0),
        viewport: Size::ZERO,
    };
    assert_eq!(scene.canvas_from_client(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
}

#[test]
fn providers_find_entities() {
    let a = EntityState {
        id: EntityId::from("a"),
        ..EntityState::default()
    };
    let list = vec![a.clone()];
    assert!(list.entity(&EntityId::from("a")).is_some());
    assert!(list.entity(&EntityId::from("b")).is_none());

    let mut map = BTreeMap::new();
    map.insert(a.id.clone(), a);
    assert!(map.entity(&EntityId::from("a")).is_some());
}
