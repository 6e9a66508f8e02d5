use super::*;
use serde_json::json;

#[derive(Default)]
struct Log(Vec<(bool, HookTrigger, OverlayId)>);

impl HookService for Log {
    fn subscribe(&mut self, trigger: HookTrigger, overlay: OverlayId) {
        self.0.push((true, trigger, overlay));
    }

    fn unsubscribe(&mut self, trigger: HookTrigger, overlay: OverlayId) {
        self.0.push((false, trigger, overlay));
    }
}

fn cfg(v: serde_json::Value) -> OverlayConfig {
    OverlayConfig::from_json_value(&v)
}

#[test]
fn triggers_follow_config() {
    assert!(required_triggers(&cfg(json!({}))).is_empty());
    assert_eq!(
        required_triggers(&cfg(json!({ "linkStageScale": true, "ui": true })))
            .into_iter()
            .collect::<Vec<_>>(),
        vec![HookTrigger::CanvasPan, HookTrigger::Ticker]
    );
}

#[test]
fn sync_diffs_and_is_idempotent() {
    let id = OverlayId(3);
    let mut log = Log::default();
    let mut subs = HookSubscriptions::default();

    subs.sync(&mut log, id, &cfg(json!({ "linkStageScale": true })));
    subs.sync(&mut log, id, &cfg(json!({ "linkStageScale": true })));
    assert_eq!(log.0, vec![(true, HookTrigger::CanvasPan, id)]);

    subs.sync(&mut log, id, &cfg(json!({ "ui": true })));
    assert_eq!(
        &log.0[1..],
        &[(false, HookTrigger::CanvasPan, id), (true, HookTrigger::Ticker, id)]
    );

    subs.clear(&mut log, id);
    subs.clear(&mut log, id);
    assert_eq!(log.0.len(), 4);
    assert!(subs.active().is_empty());
}

#[test]
fn registry_tolerates_repeats() {
    let mut reg = HookRegistry::new();
    reg.subscribe(HookTrigger::Ticker, OverlayId(2));
    reg.subscribe(HookTrigger::Ticker, OverlayId(2));
    reg.subscribe(HookTrigger::Ticker, OverlayId(1));
    assert_eq!(reg.subscribers(HookTrigger::Ticker), vec![OverlayId(1), OverlayId(2)]);

    reg.unsubscribe(HookTrigger::CanvasPan, OverlayId(2));
    reg.unsubscribe(HookTrigger::Ticker, OverlayId(2));
    reg.unsubscribe(HookTrigger::Ticker, OverlayId(2));
    assert!(!reg.is_subscribed(HookTrigger::Ticker, OverlayId(2)));
    assert!(reg.is_subscribed(HookTrigger::Ticker, OverlayId(1)));
    assert_eq!(HookTrigger::CanvasPan.to_string(), "canvasPan");
}
