use super::*;
use serde_json::json;

#[derive(Debug)]
struct Stub {
    uniforms: Map<String, JsonValue>,
}

impl OverlayFilter for Stub {
    fn uniforms(&self) -> &Map<String, JsonValue> {
        &self.uniforms
    }

    fn update(&mut self, options: &Map<String, JsonValue>) {
        self.uniforms = options.clone();
    }
}

#[derive(Default)]
struct Factory {
    built: Vec<String>,
}

impl FilterFactory for Factory {
    fn construct(&mut self, id: &str, args: FilterArgs) -> Option<Box<dyn OverlayFilter>> {
        if id == "Missing" {
            return None;
        }
        self.built.push(id.to_owned());
        let uniforms = match &args {
            FilterArgs::Options(m) => m.clone(),
            _ => Map::new(),
        };
        Some(Box::new(Stub { uniforms }))
    }
}

fn config(filter: &str, options: JsonValue) -> OverlayConfig {
    OverlayConfig::from_json_value(&json!({ "filter": filter, "filterOptions": options }))
}

fn external() -> AppliedFilter {
    AppliedFilter::external(
        "host-glow",
        Box::new(Stub {
            uniforms: Map::new(),
        }),
    )
}

#[test]
fn applies_once_per_full_refresh_unless_forced() {
    let mut p = FilterPipeline::default();
    assert!(p.needs_apply(true, false));
    assert!(!p.needs_apply(false, true));

    let mut filters = Vec::new();
    p.apply(
        &config("BlurFilter", json!({})),
        &FilterRegistry::with_builtin(),
        &mut Factory::default(),
        &mut filters,
    );
    assert!(!p.needs_apply(true, false));
    assert!(p.needs_apply(true, true));

    p.mark_stale();
    assert!(p.needs_apply(true, false));
}

#[test]
fn engine_filter_replaced_external_kept() {
    let reg = FilterRegistry::with_builtin();
    let mut factory = Factory::default();
    let mut p = FilterPipeline::default();
    let mut filters = vec![external()];

    p.apply(&config("BlurFilter", json!({ "strength": 2 })), &reg, &mut factory, &mut filters);
    p.apply(&config("AlphaFilter", json!({})), &reg, &mut factory, &mut filters);

    let ids: Vec<_> = filters.iter().map(|f| (f.id.as_str(), f.owner)).collect();
    assert_eq!(
        ids,
        vec![("host-glow", FilterOwner::External), ("AlphaFilter", FilterOwner::Engine)]
    );
    assert_eq!(factory.built, vec!["BlurFilter", "AlphaFilter"]);
}

#[test]
fn unknown_or_none_clears_engine_filters_only() {
    let reg = FilterRegistry::with_builtin();
    let mut factory = Factory::default();
    let mut p = FilterPipeline::default();
    let mut filters = vec![external()];

    p.apply(&config("BlurFilter", json!({})), &reg, &mut factory, &mut filters);
    assert_eq!(filters.len(), 2);
    p.apply(&config("Missing", json!({})), &reg, &mut factory, &mut filters);
    assert_eq!(filters.len(), 1);
    assert!(!filters[0].is_engine());

    p.apply(&config("BlurFilter", json!({})), &reg, &mut factory, &mut filters);
    p.apply(&config("NONE", json!({})), &reg, &mut factory, &mut filters);
    assert_eq!(filters.len(), 1);
    assert!(!filters[0].is_engine());
}

#[test]
fn unregistered_but_constructible_filter_gets_no_args() {
    let reg = FilterRegistry::new();
    let mut factory = Factory::default();
    let mut filters = Vec::new();
    FilterPipeline::default().apply(
        &config("HostOnly", json!({ "x": 1 })),
        &reg,
        &mut factory,
        &mut filters,
    );
    assert_eq!(filters.len(), 1);
    assert!(filters[0].filter.uniforms().is_empty());
}

#[test]
fn options_filter_is_updated_in_place() {
    let reg = FilterRegistry::with_builtin();
    let mut factory = Factory::default();
    let mut p = FilterPipeline::default();
    let mut filters = Vec::new();

    p.apply(
        &config("OutlineOverlayFilter", json!({ "trueThickness": 3 })),
        &reg,
        &mut factory,
        &mut filters,
    );
    p.apply(
        &config("OutlineOverlayFilter", json!({ "trueThickness": 5 })),
        &reg,
        &mut factory,
        &mut filters,
    );

    assert_eq!(factory.built.len(), 1);
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].filter.uniforms().get("trueThickness"), Some(&json!(5)));
    assert_eq!(filters[0].filter.uniforms().get("animate"), Some(&json!(false)));
}
