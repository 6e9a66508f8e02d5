use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::foundation::ids::OverlayId;

/// External event that forces an overlay refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookTrigger {
    /// The view was panned or zoomed.
    CanvasPan,
    /// Once per rendered frame.
    Ticker,
}

impl HookTrigger {
    /// Wire name of the trigger.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CanvasPan => "canvasPan",
            Self::Ticker => "ticker",
        }
    }
}

impl fmt::Display for HookTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host event subscription service. Both calls must tolerate repeats.
pub trait HookService {
    /// Deliver `trigger` to `overlay` from now on.
    fn subscribe(&mut self, trigger: HookTrigger, overlay: OverlayId);

    /// Stop delivering `trigger` to `overlay`.
    fn unsubscribe(&mut self, trigger: HookTrigger, overlay: OverlayId);
}

/// Triggers a configuration needs to stay current.
pub fn required_triggers(config: &OverlayConfig) -> BTreeSet<HookTrigger> {
    let mut out = BTreeSet::new();
    if config.link_stage_scale {
        out.insert(HookTrigger::CanvasPan);
    }
    if config.ui {
        out.insert(HookTrigger::Ticker);
    }
    out
}

/// Subscriptions currently held by one overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookSubscriptions {
    active: BTreeSet<HookTrigger>,
}

impl HookSubscriptions {
    /// Held triggers.
    pub fn active(&self) -> &BTreeSet<HookTrigger> {
        &self.active
    }

    /// Diff the held triggers against what `config` requires.
    pub fn sync(&mut self, service: &mut dyn HookService, overlay: OverlayId, config: &OverlayConfig) {
        let required = required_triggers(config);
        for &trigger in self.active.difference(&required) {
            service.unsubscribe(trigger, overlay);
            tracing::debug!(%overlay, %trigger, "hook unsubscribed");
        }
        for &trigger in required.difference(&self.active) {
            service.subscribe(trigger, overlay);
            tracing::debug!(%overlay, %trigger, "hook subscribed");
        }
        self.active = required;
    }

    /// Drop every held subscription.
    pub fn clear(&mut self, service: &mut dyn HookService, overlay: OverlayId) {
        for trigger in std::mem::take(&mut self.active) {
            service.unsubscribe(trigger, overlay);
            tracing::debug!(%overlay, %trigger, "hook unsubscribed");
        }
    }
}

/// In-memory [`HookService`] keyed by trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookRegistry {
    subscribers: BTreeMap<HookTrigger, BTreeSet<OverlayId>>,
}

impl HookRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays subscribed to `trigger`, in id order.
    pub fn subscribers(&self, trigger: HookTrigger) -> Vec<OverlayId> {
        self.subscribers
            .get(&trigger)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `overlay` is subscribed to `trigger`.
    pub fn is_subscribed(&self, trigger: HookTrigger, overlay: OverlayId) -> bool {
        self.subscribers
            .get(&trigger)
            .is_some_and(|s| s.contains(&overlay))
    }
}

impl HookService for HookRegistry {
    fn subscribe(&mut self, trigger: HookTrigger, overlay: OverlayId) {
        self.subscribers.entry(trigger).or_default().insert(overlay);
    }

    fn unsubscribe(&mut self, trigger: HookTrigger, overlay: OverlayId) {
        if let Some(set) = self.subscribers.get_mut(&trigger) {
            set.remove(&overlay);
            if set.is_empty() {
                self.subscribers.remove(&trigger);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hooks/coordinator.rs"]
mod tests;
