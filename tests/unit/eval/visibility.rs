use super::*;
use crate::foundation::ids::EntityId;
use serde_json::json;

fn tok() -> EntityState {
    EntityState {
        id: EntityId::from("tok"),
        w: 100.0,
        h: 100.0,
        ..EntityState::default()
    }
}

fn viewer() -> ViewerState {
    ViewerState {
        user_id: "u1".to_owned(),
        ..ViewerState::default()
    }
}

fn eval(config: &OverlayConfig, entity: &EntityState, viewer: &ViewerState) -> bool {
    let others: Vec<EntityState> = vec![entity.clone()];
    evaluate_visibility(&VisibilityInput {
        config,
        entity,
        viewer,
        entities: &others,
        ready: true,
    })
}

#[test]
fn default_config_is_visible() {
    assert!(eval(&OverlayConfig::default(), &tok(), &viewer()));
}

#[test]
fn not_ready_is_hidden() {
    let cfg = OverlayConfig::default();
    let e = tok();
    let v = viewer();
    let list: Vec<EntityState> = vec![];
    assert!(!evaluate_visibility(&VisibilityInput {
        config: &cfg,
        entity: &e,
        viewer: &v,
        entities: &list,
        ready: false,
    }));
}

#[test]
fn hidden_entity_short_circuits_everything() {
    let e = EntityState {
        visible: false,
        hover: true,
        controlled: true,
        ..tok()
    };
    let cfg = OverlayConfig::from_json_value(&json!({
        "limitOnHover": true,
        "limitOnControl": true,
        "impreciseVisible": true,
    }));
    assert!(!eval(&cfg, &e, &viewer()));

    let always = cfg.merged(&json!({ "alwaysVisible": true }));
    assert!(eval(&always, &e, &viewer()));
}

#[test]
fn owner_and_user_limits() {
    let cfg = OverlayConfig::from_json_value(&json!({ "limitedToOwner": true }));
    assert!(!eval(&cfg, &tok(), &viewer()));
    let owned = EntityState {
        is_owner: true,
        ..tok()
    };
    assert!(eval(&cfg, &owned, &viewer()));

    let cfg = OverlayConfig::from_json_value(&json!({ "limitedUsers": ["u2", "u3"] }));
    assert!(!eval(&cfg, &tok(), &viewer()));
    let cfg = OverlayConfig::from_json_value(&json!({ "limitedUsers": ["u1"] }));
    assert!(eval(&cfg, &tok(), &viewer()));
}

#[test]
fn effect_limit_requires_speaker_entity() {
    let cfg = OverlayConfig::from_json_value(&json!({ "limitOnEffect": "Blessed" }));
    // No speaker at all.
    assert!(!eval(&cfg, &tok(), &viewer()));

    let v = ViewerState {
        speaker: Some(EntityId::from("tok")),
        ..viewer()
    };
    assert!(!eval(&cfg, &tok(), &v));

    let blessed = EntityState {
        effects: vec!["Blessed".to_owned()],
        ..tok()
    };
    assert!(eval(&cfg, &blessed, &v));
}

#[test]
fn property_limit_uses_comparator() {
    let cfg = OverlayConfig::from_json_value(&json!({ "limitOnProperty": "hp.value < 10" }));
    let v = ViewerState {
        speaker: Some(EntityId::from("tok")),
        ..viewer()
    };
    let hurt = EntityState {
        data: json!({ "hp": { "value": 3 } }),
        ..tok()
    };
    let healthy = EntityState {
        data: json!({ "hp": { "value": 30 } }),
        ..tok()
    };
    assert!(eval(&cfg, &hurt, &v));
    assert!(!eval(&cfg, &healthy, &v));

    let broken = OverlayConfig::from_json_value(&json!({ "limitOnProperty": "nonsense" }));
    assert!(!eval(&broken, &hurt, &v));
}

#[test]
fn imprecise_detection_collapses_to_flag() {
    let e = EntityState {
        detection_level: DetectionLevel::Imprecise,
        hover: true,
        ..tok()
    };
    let cfg = OverlayConfig::from_json_value(&json!({ "limitOnHover": true }));
    assert!(!eval(&cfg, &e, &viewer()));
    let cfg = cfg.merged(&json!({ "limitOnHover": false, "impreciseVisible": true }));
    assert!(eval(&cfg, &e, &viewer()));
}

#[test]
fn interaction_block_is_exclusive() {
    let cfg = OverlayConfig::from_json_value(&json!({
        "limitOnHover": true,
        "limitOnControl": true,
    }));
    assert!(!eval(&cfg, &tok(), &viewer()));

    let hovered = EntityState {
        hover: true,
        ..tok()
    };
    assert!(eval(&cfg, &hovered, &viewer()));

    let ruler = ViewerState {
        ruler_active: true,
        ..viewer()
    };
    assert!(!eval(&cfg, &hovered, &ruler));

    let controlled = EntityState {
        controlled: true,
        ..tok()
    };
    assert!(eval(&cfg, &controlled, &ruler));
}

#[test]
fn target_predicates() {
    let targeted_by_other = EntityState {
        targeted_by: vec!["u9".to_owned()],
        ..tok()
    };
    let mine = OverlayConfig::from_json_value(&json!({ "limitOnTarget": true }));
    let any = OverlayConfig::from_json_value(&json!({ "limitOnAnyTarget": true }));
    assert!(!eval(&mine, &targeted_by_other, &viewer()));
    assert!(eval(&any, &targeted_by_other, &viewer()));

    let targeted_by_me = EntityState {
        targeted_by: vec!["u1".to_owned()],
        ..tok()
    };
    assert!(eval(&mine, &targeted_by_me, &viewer()));
}

#[test]
fn highlight_and_hud_predicates() {
    let hl = OverlayConfig::from_json_value(&json!({ "limitOnHighlight": true }));
    let v = ViewerState {
        highlight_objects: true,
        ..viewer()
    };
    assert!(eval(&hl, &tok(), &v));
    assert!(!eval(&hl, &tok(), &viewer()));

    let hud = OverlayConfig::from_json_value(&json!({ "limitOnHUD": true }));
    let open = EntityState {
        has_active_hud: true,
        ..tok()
    };
    assert!(eval(&hud, &open, &viewer()));
}
